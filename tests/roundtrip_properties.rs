//! Property tests: a peak list survives flattening, storage and reconstruction.

use mzpeaklist::attributes::SettingsSnapshot;
use mzpeaklist::container::{ContainerReader, ContainerWriter, ReadOptions, WriterConfig};
use mzpeaklist::peak_list::{FormulaCandidate, IonType, Peak, PeakList, PeakListBuilder};
use mzpeaklist::schema::columns;
use mzpeaklist::table::{FlattenOptions, RowCodec};
use proptest::prelude::*;
use tempfile::tempdir;

#[derive(Debug, Clone)]
enum Assignment {
    None,
    Mono(Vec<(u32, u32, u32, u32, u8)>),
    Isotopologue(usize),
}

fn ion_type(code: u8) -> IonType {
    match code % 3 {
        0 => IonType::DeOrProtonated,
        1 => IonType::Radical,
        _ => IonType::Adduct,
    }
}

fn composition() -> impl Strategy<Value = (u32, u32, u32, u32, u8)> {
    (2u32..40, 1u32..80, 0u32..12, 0u32..3, any::<u8>())
}

fn assignment() -> impl Strategy<Value = Assignment> {
    prop_oneof![
        Just(Assignment::None),
        prop::collection::vec(composition(), 1..3).prop_map(Assignment::Mono),
        any::<prop::sample::Index>().prop_map(|i| Assignment::Isotopologue(i.index(usize::MAX))),
    ]
}

fn peak_specs() -> impl Strategy<Value = Vec<(f64, f64, i64, f64, Assignment)>> {
    prop::collection::vec(
        (
            100.0f64..1200.0,
            1.0e3f64..1.0e8,
            prop_oneof![Just(-1i64), Just(1i64)],
            -2.0f64..2.0,
            assignment(),
        ),
        1..30,
    )
}

/// Isotopologues point at an earlier monoisotopic peak; without one the
/// peak stays unassigned.
fn build_list(specs: &[(f64, f64, i64, f64, Assignment)]) -> PeakList {
    let mut builder = PeakListBuilder::new(42).polarity(-1).retention_time(3.0).tic(5.0e9);
    let mut monos: Vec<(usize, (u32, u32, u32, u32, u8))> = Vec::new();

    for (position, (mz, abundance, charge, ppm, assignment)) in specs.iter().enumerate() {
        let mut peak = Peak::new(*mz, *abundance, *charge).signal_to_noise(abundance / 1.0e3);
        match assignment {
            Assignment::None => {}
            Assignment::Mono(compositions) => {
                // identical rows are dropped on flatten
                let mut seen = Vec::new();
                for composition in compositions {
                    if seen.contains(composition) {
                        continue;
                    }
                    seen.push(*composition);
                    let (c, h, o, n, code) = composition;
                    let mut candidate = FormulaCandidate::new(
                        [("C", *c), ("H", *h), ("O", *o), ("N", *n)],
                        mz - ppm * mz * 1.0e-6,
                        ion_type(*code),
                    )
                    .mz_error_ppm(*ppm)
                    .confidence_score(f64::from(*code) / 255.0);
                    if candidate.ion_type == IonType::Adduct {
                        candidate = candidate.adduct("Cl");
                    }
                    peak = peak.with_candidate(candidate);
                }
                monos.push((position, compositions[0]));
            }
            Assignment::Isotopologue(pick) => {
                if !monos.is_empty() {
                    let (mono, (c, h, o, n, code)) = monos[pick % monos.len()];
                    let mut candidate = FormulaCandidate::new(
                        [("C", c - 1), ("13C", 1), ("H", h), ("O", o), ("N", n)],
                        mz - ppm * mz * 1.0e-6,
                        ion_type(code),
                    )
                    .mz_error_ppm(*ppm)
                    .isotopologue_similarity(0.9)
                    .isotopologue_of(mono);
                    if candidate.ion_type == IonType::Adduct {
                        candidate = candidate.adduct("Cl");
                    }
                    peak = peak.with_candidate(candidate);
                }
            }
        }
        builder = builder.add_peak(peak);
    }
    builder.build()
}

proptest! {
    #[test]
    fn prop_flatten_reconstruct_preserves_peaks(specs in peak_specs()) {
        let list = build_list(&specs);
        let codec = RowCodec::default();

        let table = codec.flatten(&list, &FlattenOptions::default()).unwrap();
        let rows: usize = list
            .peaks
            .iter()
            .map(|p| p.candidates.len().max(1))
            .sum();
        prop_assert_eq!(table.len(), rows);

        let symbols: std::collections::BTreeSet<&str> = list
            .peaks
            .iter()
            .flat_map(|p| p.candidates.iter())
            .flat_map(|c| c.atoms.keys().map(String::as_str))
            .collect();
        prop_assert_eq!(table.atom_labels(), codec.ordering().sorted(symbols));

        let monoisotopic: Vec<i64> = table
            .records
            .iter()
            .filter(|r| r.get(columns::IS_ISOTOPOLOGUE).as_i64() == Some(0))
            .filter_map(|r| r.get(columns::INDEX).as_i64())
            .collect();
        for record in &table.records {
            if record.get(columns::IS_ISOTOPOLOGUE).as_i64() == Some(1) {
                let parent = record.get(columns::MONO_ISOTOPIC_INDEX).as_i64();
                prop_assert!(parent.is_some_and(|p| monoisotopic.contains(&p)));
            }
        }

        let table = codec.reconstruct(table).unwrap();
        let peaks = codec.build_peaks(&table).unwrap();
        prop_assert_eq!(peaks, list.peaks);
    }

    #[test]
    fn prop_without_no_match_rows_keeps_assigned_peaks(specs in peak_specs()) {
        let list = build_list(&specs);
        let codec = RowCodec::default();
        let options = FlattenOptions {
            include_no_match: false,
            ..Default::default()
        };

        let table = codec.flatten(&list, &options).unwrap();
        let indices: Vec<usize> = table.records.iter().filter_map(|r| r.index()).collect();
        for (position, peak) in list.peaks.iter().enumerate() {
            prop_assert_eq!(indices.contains(&position), peak.is_assigned());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_container_roundtrip(specs in peak_specs()) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prop.mzpl");
        let list = build_list(&specs);

        ContainerWriter::new(&path, WriterConfig::default())
            .write(&list, &SettingsSnapshot::default())
            .unwrap();

        let mut reader = ContainerReader::open(&path).unwrap();
        let snapshot = reader
            .read_snapshot("42", -1, &ReadOptions::default())
            .unwrap();
        let restored = snapshot.peak_list.unwrap();
        prop_assert_eq!(restored.scan_number, 42);
        prop_assert_eq!(restored.attrs, list.attrs);
        prop_assert_eq!(restored.peaks, list.peaks);
    }
}

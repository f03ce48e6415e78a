use super::*;
use crate::schema::ElementOrdering;

fn glucose() -> FormulaCandidate {
    FormulaCandidate::new([("C", 6), ("H", 12), ("O", 6)], 179.0561, IonType::DeOrProtonated)
}

#[test]
fn test_formula_string_priority_order() {
    let candidate = FormulaCandidate::new(
        [("O", 6), ("13C", 1), ("H", 12), ("C", 5)],
        180.0595,
        IonType::DeOrProtonated,
    );
    assert_eq!(
        candidate.formula_string(&ElementOrdering::default()),
        "C5 H12 O6 13C1"
    );
}

#[test]
fn test_ratios_fold_isotopes() {
    let candidate = FormulaCandidate::new(
        [("C", 5), ("13C", 1), ("H", 12), ("O", 5), ("18O", 1)],
        0.0,
        IonType::Radical,
    );
    assert_eq!(candidate.h_c(), Some(2.0));
    assert_eq!(candidate.o_c(), Some(1.0));
}

#[test]
fn test_ratios_without_carbon() {
    let candidate = FormulaCandidate::new([("H", 2), ("O", 1)], 0.0, IonType::Radical);
    assert_eq!(candidate.h_c(), None);
    assert_eq!(candidate.nosc(), None);
}

#[test]
fn test_derived_values() {
    let c = glucose();
    assert_eq!(c.dbe, 1.0);
    assert_eq!(c.heteroatom_class, "O6");
    // 1 + 6 - 6 - 0 - 6 <= 0
    assert_eq!(c.aromaticity_index(), 0.0);
    // NOSC of glucose is 0
    assert!(c.nosc().unwrap().abs() < 1e-12);

    // benzoic acid C7 H6 O2: AImod = (1 + 7 - 1 - 3) / (7 - 1) = 4/6
    let benzoic = FormulaCandidate::new([("C", 7), ("H", 6), ("O", 2)], 0.0, IonType::Radical);
    assert!((benzoic.aromaticity_index_modified() - 4.0 / 6.0).abs() < 1e-12);
}

#[test]
fn test_hydrocarbon_class() {
    let c = FormulaCandidate::new([("C", 10), ("H", 8)], 0.0, IonType::Radical);
    assert_eq!(c.heteroatom_class, "HC");
    let c = FormulaCandidate::new([("C", 10), ("H", 8), ("S", 1), ("N", 2)], 0.0, IonType::Radical);
    assert_eq!(c.heteroatom_class, "N2 S1");
}

#[test]
fn test_ion_type_labels() {
    assert_eq!(IonType::DeOrProtonated.to_string(), "de_or_protonated");
    assert_eq!("RADICAL".parse::<IonType>().unwrap(), IonType::Radical);
    assert!("protonated".parse::<IonType>().is_err());
}

#[test]
fn test_parse_formula_tokens() {
    let atoms = parse_formula("C6 H12 O6 13C1");
    assert_eq!(atoms.get("C"), Some(&6));
    assert_eq!(atoms.get("H"), Some(&12));
    assert_eq!(atoms.get("13C"), Some(&1));
    assert_eq!(atoms.len(), 4);
}

#[test]
fn test_parse_formula_two_letter_symbols() {
    let atoms = parse_formula("C12 H9 Cl1 N1 Na1");
    assert_eq!(atoms.get("Cl"), Some(&1));
    assert_eq!(atoms.get("C"), Some(&12));
    assert_eq!(atoms.get("N"), Some(&1));
    assert_eq!(atoms.get("Na"), Some(&1));
}

#[test]
fn test_parse_formula_compact() {
    let atoms = parse_formula("C6H12O6");
    assert_eq!(atoms.get("C"), Some(&6));
    assert_eq!(atoms.get("O"), Some(&6));
    let atoms = parse_formula("CH4");
    assert_eq!(atoms.get("C"), Some(&1));
    assert_eq!(atoms.get("H"), Some(&4));
}

#[test]
fn test_parse_formula_overflowing_counts_skipped() {
    let atoms = parse_formula("C4000000000 C4000000000 H2");
    assert_eq!(atoms.get("C"), Some(&4_000_000_000));
    assert_eq!(atoms.get("H"), Some(&2));

    let atoms = parse_formula("C4000000000H4000000000C4000000000 O99999999999");
    assert_eq!(atoms.get("C"), Some(&4_000_000_000));
    assert_eq!(atoms.get("H"), Some(&4_000_000_000));
    assert_eq!(atoms.get("O"), None);
}

#[test]
fn test_best_candidate() {
    let peak = Peak::new(179.05, 1.0, -1)
        .with_candidate(glucose().confidence_score(0.5))
        .with_candidate(glucose().mz_error_ppm(0.1).confidence_score(0.8))
        .with_candidate(glucose().mz_error_ppm(0.2).confidence_score(0.8));
    assert_eq!(peak.best_candidate().unwrap().mz_error_ppm, 0.1);
    assert!(Peak::new(1.0, 1.0, 1).best_candidate().is_none());
}

#[test]
fn test_raw_profile_lengths() {
    assert!(RawProfile::new(vec![1.0, 2.0], vec![3.0]).is_none());
    assert_eq!(RawProfile::new(vec![1.0], vec![3.0]).unwrap().len(), 1);
}

#[test]
fn test_builder() {
    let list = PeakListBuilder::new(3)
        .polarity(-1)
        .retention_time(2.5)
        .raw_profile(RawProfile::new(vec![1.0], vec![2.0]).unwrap())
        .add_peak(Peak::new(100.0, 10.0, -1).with_candidate(glucose()))
        .add_peak(Peak::new(101.0, 5.0, -1))
        .build();
    assert_eq!(list.scan_label(), "3");
    assert!(!list.is_centroid);
    assert_eq!(list.len(), 2);
    assert_eq!(list.assigned_count(), 1);
    assert_eq!(list.attrs.polarity, -1);
}

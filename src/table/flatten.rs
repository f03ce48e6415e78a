use std::collections::{HashMap, HashSet};

use log::debug;

use super::codec::RowCodec;
use super::error::TableError;
use super::options::{AdditionalColumn, CandidateSelection, FlattenOptions};
use super::record::{FlatRecord, RecordTable, Value};
use crate::peak_list::{CandidateKind, FormulaCandidate, Peak, PeakList};
use crate::schema::{columns, UNASSIGNED};

/// The three shapes a row can take.
#[derive(Debug, Clone, Copy)]
pub enum RowVariant<'a> {
    /// Peak without an (acceptable) assignment
    Unmatched,
    /// Monoisotopic candidate
    Monoisotopic(&'a FormulaCandidate),
    /// Isotopologue candidate and the index of its parent peak
    Isotopologue(&'a FormulaCandidate, usize),
}

impl<'a> RowVariant<'a> {
    /// Variant for a candidate, from its kind
    pub fn of(candidate: &'a FormulaCandidate) -> Self {
        match candidate.kind {
            CandidateKind::Monoisotopic => RowVariant::Monoisotopic(candidate),
            CandidateKind::Isotopologue { mono_index } => {
                RowVariant::Isotopologue(candidate, mono_index)
            }
        }
    }
}

type Row<'a> = (usize, &'a Peak, RowVariant<'a>);

impl RowCodec {
    /// Flatten a peak list into records.
    ///
    /// Unknown derived columns are rejected before any row is built.
    /// Identical records are collapsed, keeping the first occurrence.
    pub fn flatten(
        &self,
        list: &PeakList,
        options: &FlattenOptions,
    ) -> Result<RecordTable, TableError> {
        let additional = options.resolve_additional_columns()?;
        let atoms = self.atom_columns(list);
        let labels = self.column_labels(&additional, &atoms);

        let rows = match options.selection {
            CandidateSelection::All => select_all(list, options),
            CandidateSelection::BestScore => select_best(list, options),
        };

        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(rows.len());
        for (index, peak, variant) in rows {
            let record = self.build_record(index, peak, variant, &additional);
            if seen.insert(record.clone()) {
                records.push(record);
            }
        }

        debug!(
            "Flattened scan {}: {} peaks -> {} records, {} atom columns",
            list.scan_number,
            list.len(),
            records.len(),
            atoms.len()
        );
        Ok(RecordTable::new(labels, records))
    }

    /// Build the record for one row
    pub fn build_record(
        &self,
        index: usize,
        peak: &Peak,
        variant: RowVariant<'_>,
        additional: &[AdditionalColumn],
    ) -> FlatRecord {
        let mut record = FlatRecord::new();
        record.set(columns::INDEX, index as i64);
        record.set(columns::MZ, peak.mz_exp);
        record.set(columns::CALIBRATED_MZ, peak.mz_calibrated);
        record.set(columns::PEAK_HEIGHT, peak.abundance);
        record.set(columns::PEAK_AREA, peak.area);
        record.set(columns::RESOLVING_POWER, peak.resolving_power);
        record.set(columns::SIGNAL_TO_NOISE, peak.signal_to_noise);
        record.set(columns::ION_CHARGE, peak.ion_charge);

        let candidate = match variant {
            RowVariant::Unmatched => {
                record.set(columns::HETEROATOM_CLASS, UNASSIGNED);
                return record;
            }
            RowVariant::Monoisotopic(c) => {
                record.set(columns::IS_ISOTOPOLOGUE, 0i64);
                c
            }
            RowVariant::Isotopologue(c, mono_index) => {
                record.set(columns::IS_ISOTOPOLOGUE, 1i64);
                record.set(columns::MONO_ISOTOPIC_INDEX, mono_index as i64);
                c
            }
        };

        record.set(columns::CALCULATED_MZ, candidate.calculated_mz);
        record.set(columns::MZ_ERROR_PPM, candidate.mz_error_ppm);
        record.set(columns::MZ_ERROR_SCORE, candidate.mz_error_score);
        record.set(
            columns::ISOTOPOLOGUE_SIMILARITY,
            candidate.isotopologue_similarity,
        );
        record.set(columns::CONFIDENCE_SCORE, candidate.confidence_score);
        record.set(columns::DBE, candidate.dbe);
        record.set(columns::H_C, candidate.h_c());
        record.set(columns::O_C, candidate.o_c());
        record.set(columns::HETEROATOM_CLASS, candidate.heteroatom_class.as_str());
        record.set(columns::ION_TYPE, candidate.ion_type.as_str());
        if let Some(adduct) = &candidate.adduct {
            record.set(columns::ADDUCT, adduct.as_str());
        }
        record.set(
            columns::MOLECULAR_FORMULA,
            candidate.formula_string(self.ordering()),
        );
        for column in additional {
            record.set(column.name(), column.compute(candidate));
        }
        for (symbol, count) in &candidate.atoms {
            record.set(symbol.as_str(), Value::Int(i64::from(*count)));
        }
        record
    }
}

/// Every candidate of every peak, in two passes.
fn select_all<'a>(list: &'a PeakList, options: &FlattenOptions) -> Vec<Row<'a>> {
    let mut rows: Vec<Row<'a>> = Vec::new();

    for (index, peak) in list.iter() {
        if !peak.is_assigned() {
            if options.include_no_match && options.no_match_inline {
                rows.push((index, peak, RowVariant::Unmatched));
            }
            continue;
        }
        for candidate in &peak.candidates {
            if !options.passes_score(candidate) {
                rows.push((index, peak, RowVariant::Unmatched));
                continue;
            }
            match RowVariant::of(candidate) {
                variant @ RowVariant::Isotopologue(..) => {
                    if options.include_isotopologues && options.isotopologue_inline {
                        rows.push((index, peak, variant));
                    }
                }
                variant => rows.push((index, peak, variant)),
            }
        }
    }

    if options.include_isotopologues && !options.isotopologue_inline {
        for (index, peak) in list.iter() {
            for candidate in peak.candidates.iter().filter(|c| c.is_isotopologue()) {
                if options.passes_score(candidate) {
                    rows.push((index, peak, RowVariant::of(candidate)));
                }
            }
        }
    }

    push_deferred_unmatched(list, options, &mut rows);
    rows
}

/// Best monoisotopic candidate per peak, each followed by its isotopologues.
fn select_best<'a>(list: &'a PeakList, options: &FlattenOptions) -> Vec<Row<'a>> {
    let mut isotopologues: HashMap<usize, Vec<(usize, &'a Peak, &'a FormulaCandidate)>> =
        HashMap::new();
    for (index, peak) in list.iter() {
        for candidate in &peak.candidates {
            if let Some(mono_index) = candidate.mono_index() {
                isotopologues
                    .entry(mono_index)
                    .or_default()
                    .push((index, peak, candidate));
            }
        }
    }

    let mut rows: Vec<Row<'a>> = Vec::new();
    for (index, peak) in list.iter() {
        let Some(best) = peak.best_candidate() else {
            if options.include_no_match && options.no_match_inline {
                rows.push((index, peak, RowVariant::Unmatched));
            }
            continue;
        };
        if best.is_isotopologue() {
            continue;
        }
        if !options.passes_score(best) {
            rows.push((index, peak, RowVariant::Unmatched));
            continue;
        }
        rows.push((index, peak, RowVariant::Monoisotopic(best)));
        if options.include_isotopologues {
            for (iso_index, iso_peak, iso) in isotopologues.get(&index).into_iter().flatten() {
                rows.push((*iso_index, *iso_peak, RowVariant::Isotopologue(*iso, index)));
            }
        }
    }

    push_deferred_unmatched(list, options, &mut rows);
    rows
}

fn push_deferred_unmatched<'a>(
    list: &'a PeakList,
    options: &FlattenOptions,
    rows: &mut Vec<Row<'a>>,
) {
    if options.include_no_match && !options.no_match_inline {
        for (index, peak) in list.iter().filter(|(_, p)| !p.is_assigned()) {
            rows.push((index, peak, RowVariant::Unmatched));
        }
    }
}

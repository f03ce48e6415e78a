use std::collections::BTreeMap;

use log::warn;

use super::codec::RowCodec;
use super::error::TableError;
use super::record::{FlatRecord, RecordTable, Value};
use crate::peak_list::{parse_formula, CandidateKind, FormulaCandidate, IonType, Peak};
use crate::schema::{columns, validate_labels, UNASSIGNED};

impl RowCodec {
    /// Normalize a stored table before it is turned back into peaks.
    ///
    /// Rejects tables without the sentinel columns, casts `m/z` and
    /// `Peak Height` to floats, backfills atom counts from formula text when
    /// no atom column carries a value, and sorts rows by `Index` (stable).
    pub fn reconstruct(&self, mut table: RecordTable) -> Result<RecordTable, TableError> {
        validate_labels(&table.labels)?;

        for column in [columns::MZ, columns::PEAK_HEIGHT] {
            cast_to_float(&mut table.records, column)?;
        }

        self.backfill_atoms(&mut table);

        for (row, record) in table.records.iter().enumerate() {
            if record.index().is_none() {
                return Err(TableError::InvalidIndex {
                    row,
                    reason: format!("'{}' is not a non-negative integer", record.get(columns::INDEX)),
                });
            }
        }
        table.records.sort_by_key(|r| r.index());
        Ok(table)
    }

    /// Fill atom columns from `Molecular Formula` text.
    ///
    /// Only applies when formula text is present and every atom column is
    /// empty. Symbols without a column get one, placed by element priority.
    fn backfill_atoms(&self, table: &mut RecordTable) {
        let has_formula = table
            .column(columns::MOLECULAR_FORMULA)
            .any(|v| v.as_str().is_some());
        if !has_formula {
            return;
        }
        let atom_labels: Vec<String> = table.atom_labels().into_iter().map(String::from).collect();
        let has_atoms = table
            .records
            .iter()
            .any(|r| atom_labels.iter().any(|l| r.has(l)));
        if has_atoms {
            return;
        }

        warn!("Atom columns are empty, recovering atom counts from Molecular Formula text");
        let mut discovered: Vec<String> = Vec::new();
        for record in &mut table.records {
            let Some(text) = record.get(columns::MOLECULAR_FORMULA).as_str().map(str::to_owned)
            else {
                continue;
            };
            for (symbol, count) in parse_formula(&text) {
                if !atom_labels.contains(&symbol) && !discovered.contains(&symbol) {
                    discovered.push(symbol.clone());
                }
                record.set(symbol, Value::Int(i64::from(count)));
            }
        }
        table.labels.extend(self.ordering().sorted(discovered));
    }

    /// Rebuild peaks from a normalized table.
    ///
    /// Rows sharing an `Index` become one peak; rows carrying a formula
    /// become its candidates, in row order. When the index set has gaps the peaks are
    /// compacted and isotopologue back-references remapped to the new
    /// positions.
    pub fn build_peaks(&self, table: &RecordTable) -> Result<Vec<Peak>, TableError> {
        let atom_labels = table.atom_labels();

        let mut order: Vec<(usize, usize, &FlatRecord)> = Vec::with_capacity(table.len());
        for (row, record) in table.records.iter().enumerate() {
            let index = record.index().ok_or_else(|| TableError::InvalidIndex {
                row,
                reason: "missing or negative".to_string(),
            })?;
            order.push((index, row, record));
        }
        order.sort_by_key(|(index, _, _)| *index);

        let mut peaks: Vec<Peak> = Vec::new();
        let mut positions: BTreeMap<usize, usize> = BTreeMap::new();
        let mut current: Option<usize> = None;

        for (index, row, record) in order {
            if current != Some(index) {
                positions.insert(index, peaks.len());
                peaks.push(peak_from_record(record, row)?);
                current = Some(index);
            }
            if is_assigned_row(record) {
                let candidate = candidate_from_record(record, row, &atom_labels)?;
                if let Some(peak) = peaks.last_mut() {
                    peak.candidates.push(candidate);
                }
            }
        }

        let compacted = positions.iter().any(|(index, pos)| index != pos);
        if compacted {
            warn!(
                "Peak indices are not contiguous ({} peaks, max index {}), compacting",
                peaks.len(),
                positions.keys().next_back().copied().unwrap_or_default()
            );
        }
        for (index, peak) in positions.keys().zip(peaks.iter_mut()) {
            for candidate in &mut peak.candidates {
                if let CandidateKind::Isotopologue { mono_index } = candidate.kind {
                    let remapped = positions.get(&mono_index).copied().ok_or(
                        TableError::DanglingIsotopologue {
                            index: *index,
                            mono_index,
                        },
                    )?;
                    candidate.kind = CandidateKind::Isotopologue {
                        mono_index: remapped,
                    };
                }
            }
        }

        Ok(peaks)
    }
}

fn cast_to_float(records: &mut [FlatRecord], column: &str) -> Result<(), TableError> {
    for (row, record) in records.iter_mut().enumerate() {
        let value = record.get(column);
        if matches!(value, Value::Null | Value::Float(_)) {
            continue;
        }
        let cast = value.as_f64().ok_or_else(|| TableError::InvalidValue {
            column: column.to_string(),
            row,
            reason: format!("'{}' is not a number", value),
        })?;
        record.set(column, Value::Float(cast));
    }
    Ok(())
}

fn is_assigned_row(record: &FlatRecord) -> bool {
    record.get(columns::HETEROATOM_CLASS).as_str() != Some(UNASSIGNED)
        && (record.has(columns::MOLECULAR_FORMULA) || record.has(columns::IS_ISOTOPOLOGUE))
}

fn required_f64(record: &FlatRecord, column: &str, row: usize) -> Result<f64, TableError> {
    record
        .get(column)
        .as_f64()
        .ok_or_else(|| TableError::MissingValue {
            column: column.to_string(),
            row,
        })
}

fn peak_from_record(record: &FlatRecord, row: usize) -> Result<Peak, TableError> {
    let mz = required_f64(record, columns::MZ, row)?;
    Ok(Peak {
        mz_exp: mz,
        mz_calibrated: record.get(columns::CALIBRATED_MZ).as_f64().unwrap_or(mz),
        abundance: required_f64(record, columns::PEAK_HEIGHT, row)?,
        area: record.get(columns::PEAK_AREA).as_f64(),
        resolving_power: record.get(columns::RESOLVING_POWER).as_f64(),
        signal_to_noise: record.get(columns::SIGNAL_TO_NOISE).as_f64(),
        ion_charge: record.get(columns::ION_CHARGE).as_i64().unwrap_or(0),
        candidates: Vec::new(),
    })
}

fn candidate_from_record(
    record: &FlatRecord,
    row: usize,
    atom_labels: &[&str],
) -> Result<FormulaCandidate, TableError> {
    let mut atoms: BTreeMap<String, u32> = BTreeMap::new();
    for label in atom_labels {
        if let Some(count) = record.get(label).as_i64() {
            let count = u32::try_from(count).map_err(|_| TableError::InvalidValue {
                column: label.to_string(),
                row,
                reason: format!("atom count {} out of range", count),
            })?;
            atoms.insert(label.to_string(), count);
        }
    }
    if atoms.is_empty() {
        if let Some(text) = record.get(columns::MOLECULAR_FORMULA).as_str() {
            atoms = parse_formula(text);
        }
    }

    let ion_type = match record.get(columns::ION_TYPE) {
        Value::Null => IonType::DeOrProtonated,
        value => value
            .as_str()
            .ok_or_else(|| format!("'{}' is not text", value))
            .and_then(|s| s.parse::<IonType>())
            .map_err(|reason| TableError::InvalidValue {
                column: columns::ION_TYPE.to_string(),
                row,
                reason,
            })?,
    };

    let calculated_mz = record
        .get(columns::CALCULATED_MZ)
        .as_f64()
        .unwrap_or(f64::NAN);
    let mut candidate = FormulaCandidate::new(atoms, calculated_mz, ion_type);
    candidate.mz_error_ppm = record.get(columns::MZ_ERROR_PPM).as_f64().unwrap_or(f64::NAN);
    candidate.mz_error_score = record.get(columns::MZ_ERROR_SCORE).as_f64();
    candidate.isotopologue_similarity = record.get(columns::ISOTOPOLOGUE_SIMILARITY).as_f64();
    candidate.confidence_score = record.get(columns::CONFIDENCE_SCORE).as_f64();
    if let Some(dbe) = record.get(columns::DBE).as_f64() {
        candidate.dbe = dbe;
    }
    if let Some(label) = record.get(columns::HETEROATOM_CLASS).as_str() {
        candidate.heteroatom_class = label.to_string();
    }
    candidate.adduct = record.get(columns::ADDUCT).as_str().map(String::from);

    if record.get(columns::IS_ISOTOPOLOGUE).as_i64() == Some(1) {
        let mono_index = record
            .get(columns::MONO_ISOTOPIC_INDEX)
            .as_i64()
            .and_then(|i| usize::try_from(i).ok())
            .ok_or_else(|| TableError::MissingValue {
                column: columns::MONO_ISOTOPIC_INDEX.to_string(),
                row,
            })?;
        candidate.kind = CandidateKind::Isotopologue { mono_index };
    }
    Ok(candidate)
}

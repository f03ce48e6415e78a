use std::collections::HashSet;

use crate::container::ContainerAddress;
use crate::schema::{columns, validate_labels};
use crate::table::{FlatRecord, RecordTable};

use super::{ValidationCheck, ValidationReport};

/// Step 4: contents of one time-index table.
pub(crate) fn check_table(
    address: &ContainerAddress,
    table: &RecordTable,
    report: &mut ValidationReport,
) {
    report.add_check(ValidationCheck::from_result(
        format!("Dataset {}: sentinel columns", address),
        validate_labels(&table.labels),
    ));
    report.add_check(ValidationCheck::from_result(
        format!("Dataset {}: Index values", address),
        check_index(table),
    ));
    report.add_check(ValidationCheck::from_result(
        format!("Dataset {}: isotopologue references", address),
        check_isotopologue_refs(table),
    ));
}

/// Every row has a non-negative `Index`.
pub(crate) fn check_index(table: &RecordTable) -> Result<(), String> {
    let bad: Vec<String> = table
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.index().is_none())
        .map(|(row, r)| format!("row {} ({})", row, r.get(columns::INDEX)))
        .collect();
    if bad.is_empty() {
        Ok(())
    } else {
        Err(format!("invalid Index at {}", bad.join(", ")))
    }
}

/// Every isotopologue row points at the `Index` of a non-isotopologue row.
pub(crate) fn check_isotopologue_refs(table: &RecordTable) -> Result<(), String> {
    let is_isotopologue = |r: &FlatRecord| r.get(columns::IS_ISOTOPOLOGUE).as_i64() == Some(1);
    let parents: HashSet<usize> = table
        .records
        .iter()
        .filter(|r| !is_isotopologue(r))
        .filter_map(|r| r.index())
        .collect();

    let mut dangling = Vec::new();
    for (row, record) in table.records.iter().enumerate() {
        if !is_isotopologue(record) {
            continue;
        }
        let target = record.get(columns::MONO_ISOTOPIC_INDEX).as_i64();
        let ok = target
            .and_then(|t| usize::try_from(t).ok())
            .is_some_and(|t| parents.contains(&t));
        if !ok {
            dangling.push(format!(
                "row {} -> {}",
                row,
                record.get(columns::MONO_ISOTOPIC_INDEX)
            ));
        }
    }

    if dangling.is_empty() {
        Ok(())
    } else {
        Err(format!("dangling references: {}", dangling.join(", ")))
    }
}

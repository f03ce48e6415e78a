use crate::peak_list::PeakList;
use crate::schema::{ElementOrdering, CORE_COLUMNS};

use super::options::AdditionalColumn;

/// Converts peak lists to flat records and back.
///
/// The codec owns the element ordering used for atom columns and formula
/// text, so the same ordering drives both the rows and the column labels of
/// one export.
#[derive(Debug, Clone, Default)]
pub struct RowCodec {
    ordering: ElementOrdering,
}

impl RowCodec {
    /// Create a codec with a specific element ordering
    pub fn new(ordering: ElementOrdering) -> Self {
        Self { ordering }
    }

    /// The element ordering in use
    pub fn ordering(&self) -> &ElementOrdering {
        &self.ordering
    }

    /// Union of the elements used by any candidate, in priority order.
    pub fn atom_columns(&self, list: &PeakList) -> Vec<String> {
        self.ordering.sorted(list.used_symbols())
    }

    /// Full label list: core columns, derived columns, atom columns.
    pub fn column_labels(&self, additional: &[AdditionalColumn], atoms: &[String]) -> Vec<String> {
        CORE_COLUMNS
            .iter()
            .map(|s| s.to_string())
            .chain(additional.iter().map(|c| c.name().to_string()))
            .chain(atoms.iter().cloned())
            .collect()
    }
}

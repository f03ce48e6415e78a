use crate::schema::SchemaValidationError;

/// Errors raised by the row codec
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Arrow error while building or reading a record batch
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// The table is not a peak table
    #[error("Invalid peak table: {0}")]
    InvalidSchema(#[from] SchemaValidationError),

    /// An additional output column was requested that the codec cannot compute
    #[error("Unsupported additional column: {0}")]
    UnsupportedColumn(String),

    /// A row has a missing or negative `Index`
    #[error("Invalid Index in row {row}: {reason}")]
    InvalidIndex {
        /// Row position in the table
        row: usize,
        /// What was wrong
        reason: String,
    },

    /// A value required to rebuild a peak is null
    #[error("Missing value for column '{column}' in row {row}")]
    MissingValue {
        /// Column name
        column: String,
        /// Row position in the table
        row: usize,
    },

    /// A value cannot be interpreted as the column's type
    #[error("Invalid value for column '{column}' in row {row}: {reason}")]
    InvalidValue {
        /// Column name
        column: String,
        /// Row position in the table
        row: usize,
        /// What was wrong
        reason: String,
    },

    /// An isotopologue row points at a peak that is not a monoisotopic row of the table
    #[error("Isotopologue on peak {index} references peak {mono_index}, which has no monoisotopic row")]
    DanglingIsotopologue {
        /// Index of the isotopologue row
        index: usize,
        /// Referenced monoisotopic index
        mono_index: usize,
    },
}

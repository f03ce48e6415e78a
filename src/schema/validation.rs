use arrow::datatypes::Schema;

use super::columns;

/// Checks that a column label list carries every sentinel column.
///
/// A table lacking any of `H/C`, `O/C`, `Heteroatom Class`, `Ion Type` or
/// `Is Isotopologue` is not a peak table and must not be reconstructed.
pub fn validate_labels<S: AsRef<str>>(labels: &[S]) -> Result<(), SchemaValidationError> {
    let missing: Vec<String> = columns::SENTINEL_COLUMNS
        .iter()
        .filter(|sentinel| !labels.iter().any(|l| l.as_ref() == **sentinel))
        .map(|s| s.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaValidationError::MissingSentinelColumns(missing))
    }
}

/// Validates that an Arrow schema is a peak table schema.
///
/// Besides the sentinel columns, `Index` must be present. Column types are
/// not checked here because readers normalize them on load.
pub fn validate_schema(schema: &Schema) -> Result<(), SchemaValidationError> {
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    validate_labels(&names)?;

    if !names.contains(&columns::INDEX) {
        return Err(SchemaValidationError::MissingColumn(
            columns::INDEX.to_string(),
        ));
    }

    Ok(())
}

/// Errors that can occur during schema validation
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaValidationError {
    /// A required column is missing from the schema
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// One or more sentinel columns are absent
    #[error("Not a peak table, missing sentinel columns: {}", .0.join(", "))]
    MissingSentinelColumns(Vec<String>),
}

use std::collections::HashMap;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaBuilder};

use super::columns;
use super::constants::MZPEAKLIST_FORMAT_VERSION;
use crate::table::AdditionalColumn;

/// Arrow type a peak-table column is stored with.
///
/// Integer core columns and atom counts are Int64, text labels are Utf8 and
/// everything else (masses, abundances, scores, ratios) is Float64.
pub fn column_data_type(name: &str) -> DataType {
    if columns::INTEGER_COLUMNS.contains(&name) {
        DataType::Int64
    } else if columns::TEXT_COLUMNS.contains(&name) {
        DataType::Utf8
    } else if columns::is_core_column(name) || AdditionalColumn::is_additional(name) {
        DataType::Float64
    } else {
        // atom count column
        DataType::Int64
    }
}

/// Creates the peak table schema for a resolved column label list.
///
/// Only `Index` is non-nullable: unassigned rows leave every formula column
/// null and matched rows leave absent elements null.
///
/// # Example
///
/// ```
/// use mzpeaklist::schema::{create_peak_table_schema, CORE_COLUMNS};
///
/// let mut labels: Vec<String> = CORE_COLUMNS.iter().map(|s| s.to_string()).collect();
/// labels.push("C".to_string());
/// let schema = create_peak_table_schema(&labels);
/// assert_eq!(schema.fields().len(), 23);
/// ```
pub fn create_peak_table_schema(labels: &[String]) -> Schema {
    let mut builder = SchemaBuilder::new();
    for label in labels {
        let nullable = label != columns::INDEX;
        builder.push(Field::new(label, column_data_type(label), nullable));
    }

    let mut metadata = HashMap::new();
    metadata.insert(
        "mzpeaklist:format_version".to_string(),
        MZPEAKLIST_FORMAT_VERSION.to_string(),
    );
    builder.finish().with_metadata(metadata)
}

/// Creates the peak table schema wrapped in an Arc
pub fn create_peak_table_schema_arc(labels: &[String]) -> Arc<Schema> {
    Arc::new(create_peak_table_schema(labels))
}

/// Creates the raw profile schema (two equally long Float64 channels).
pub fn create_raw_profile_schema() -> Schema {
    Schema::new(vec![
        Field::new(columns::raw::MZ_PROFILE, DataType::Float64, false),
        Field::new(columns::raw::ABUNDANCE_PROFILE, DataType::Float64, false),
    ])
}

/// Creates the raw profile schema wrapped in an Arc
pub fn create_raw_profile_schema_arc() -> Arc<Schema> {
    Arc::new(create_raw_profile_schema())
}

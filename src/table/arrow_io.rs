use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, Float64Array, Float64Builder, Int64Array, Int64Builder, StringArray,
    StringBuilder,
};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use log::warn;

use super::error::TableError;
use super::record::{FlatRecord, RecordTable, Value};
use crate::peak_list::RawProfile;
use crate::schema::{columns, create_peak_table_schema_arc, create_raw_profile_schema_arc};

// ============================================================================
// Write side
// ============================================================================

/// Convert a record table to a single Arrow record batch.
///
/// Column types follow [`crate::schema::column_data_type`]; values that do
/// not fit their column type are rejected.
pub fn table_to_record_batch(table: &RecordTable) -> Result<RecordBatch, TableError> {
    let schema = create_peak_table_schema_arc(&table.labels);
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.labels.len());

    for field in schema.fields() {
        let name = field.name().as_str();
        let array: ArrayRef = match field.data_type() {
            DataType::Int64 => Arc::new(build_int64(&table.records, name, field.is_nullable())?),
            DataType::Float64 => Arc::new(build_float64(&table.records, name)?),
            _ => Arc::new(build_utf8(&table.records, name)),
        };
        arrays.push(array);
    }

    Ok(RecordBatch::try_new(schema, arrays)?)
}

fn build_int64(
    records: &[FlatRecord],
    name: &str,
    nullable: bool,
) -> Result<Int64Array, TableError> {
    let mut builder = Int64Builder::with_capacity(records.len());
    for (row, record) in records.iter().enumerate() {
        match record.get(name) {
            Value::Null if nullable => builder.append_null(),
            Value::Null => {
                return Err(TableError::MissingValue {
                    column: name.to_string(),
                    row,
                })
            }
            value => {
                let v = value.as_i64().ok_or_else(|| TableError::InvalidValue {
                    column: name.to_string(),
                    row,
                    reason: format!("'{}' is not an integer", value),
                })?;
                builder.append_value(v);
            }
        }
    }
    Ok(builder.finish())
}

fn build_float64(records: &[FlatRecord], name: &str) -> Result<Float64Array, TableError> {
    let mut builder = Float64Builder::with_capacity(records.len());
    for (row, record) in records.iter().enumerate() {
        match record.get(name) {
            Value::Null => builder.append_null(),
            value => {
                let v = value.as_f64().ok_or_else(|| TableError::InvalidValue {
                    column: name.to_string(),
                    row,
                    reason: format!("'{}' is not a number", value),
                })?;
                builder.append_value(v);
            }
        }
    }
    Ok(builder.finish())
}

fn build_utf8(records: &[FlatRecord], name: &str) -> StringArray {
    let mut builder = StringBuilder::with_capacity(records.len(), records.len() * 8);
    for record in records {
        match record.get(name) {
            Value::Null => builder.append_null(),
            Value::Text(s) => builder.append_value(s),
            other => builder.append_value(other.to_string()),
        }
    }
    builder.finish()
}

/// Convert a raw profile into a two-column record batch (`mz`, `abundance`).
pub fn raw_profile_to_record_batch(raw: &RawProfile) -> Result<RecordBatch, TableError> {
    let arrays: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from(raw.mz.clone())),
        Arc::new(Float64Array::from(raw.abundance.clone())),
    ];
    Ok(RecordBatch::try_new(create_raw_profile_schema_arc(), arrays)?)
}

// ============================================================================
// Read side
// ============================================================================

/// Type a stored column is normalized to before values are extracted
fn normalized_type(data_type: &DataType) -> DataType {
    match data_type {
        DataType::Boolean
        | DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => DataType::Int64,
        DataType::Float16
        | DataType::Float32
        | DataType::Float64
        | DataType::Decimal128(_, _)
        | DataType::Decimal256(_, _) => DataType::Float64,
        DataType::Null => DataType::Null,
        _ => DataType::Utf8,
    }
}

/// Extract the values of one column, normalizing its type first.
fn column_values(array: &ArrayRef, name: &str) -> Result<Vec<Value>, TableError> {
    let target = normalized_type(array.data_type());
    if target == DataType::Null {
        return Ok(vec![Value::Null; array.len()]);
    }
    let array = if array.data_type() == &target {
        array.clone()
    } else {
        cast(array, &target)?
    };

    let invalid = |expected: &str| TableError::InvalidValue {
        column: name.to_string(),
        row: 0,
        reason: format!("column could not be read as {}", expected),
    };

    let values = match target {
        DataType::Int64 => {
            let arr = array
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| invalid("Int64"))?;
            (0..arr.len())
                .map(|i| {
                    if arr.is_null(i) {
                        Value::Null
                    } else {
                        Value::Int(arr.value(i))
                    }
                })
                .collect()
        }
        DataType::Float64 => {
            let arr = array
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| invalid("Float64"))?;
            (0..arr.len())
                .map(|i| {
                    if arr.is_null(i) {
                        Value::Null
                    } else {
                        Value::float(arr.value(i))
                    }
                })
                .collect()
        }
        _ => {
            let arr = array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| invalid("Utf8"))?;
            (0..arr.len())
                .map(|i| {
                    if arr.is_null(i) {
                        Value::Null
                    } else {
                        Value::text(arr.value(i))
                    }
                })
                .collect()
        }
    };
    Ok(values)
}

/// Convert stored record batches back into a record table.
///
/// `stored_labels` is the `ColumnsLabels` attribute of the dataset. It names
/// the columns positionally when its length matches the batch; otherwise
/// the Arrow field names are used.
pub fn record_batches_to_table(
    batches: &[RecordBatch],
    stored_labels: Option<Vec<String>>,
) -> Result<RecordTable, TableError> {
    let Some(first) = batches.first() else {
        return Ok(RecordTable::new(stored_labels.unwrap_or_default(), Vec::new()));
    };
    let field_names: Vec<String> = first
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();

    let labels = match stored_labels {
        Some(labels) if labels.len() == field_names.len() => labels,
        Some(labels) => {
            warn!(
                "ColumnsLabels has {} entries but the table has {} columns, using field names",
                labels.len(),
                field_names.len()
            );
            field_names
        }
        None => field_names,
    };

    let mut records = Vec::new();
    for batch in batches {
        let mut rows = vec![FlatRecord::new(); batch.num_rows()];
        for (label, array) in labels.iter().zip(batch.columns()) {
            for (row, value) in column_values(array, label)?.into_iter().enumerate() {
                rows[row].set(label.as_str(), value);
            }
        }
        records.extend(rows);
    }

    Ok(RecordTable::new(labels, records))
}

/// Convert stored record batches back into a raw profile.
pub fn record_batches_to_raw_profile(batches: &[RecordBatch]) -> Result<RawProfile, TableError> {
    let mut raw = RawProfile::default();
    for batch in batches {
        for (name, target) in [
            (columns::raw::MZ_PROFILE, &mut raw.mz),
            (columns::raw::ABUNDANCE_PROFILE, &mut raw.abundance),
        ] {
            let array = batch.column_by_name(name).ok_or_else(|| TableError::MissingValue {
                column: name.to_string(),
                row: 0,
            })?;
            for value in column_values(array, name)? {
                target.push(value.as_f64().unwrap_or(f64::NAN));
            }
        }
    }
    Ok(raw)
}

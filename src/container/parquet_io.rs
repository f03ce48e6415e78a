use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use super::error::ContainerError;
use crate::attributes::AttributeSet;

/// Serialize one record batch as an in-memory Parquet file.
pub(super) fn write_parquet(
    batch: &RecordBatch,
    props: WriterProperties,
) -> Result<Vec<u8>, ContainerError> {
    let mut writer = ArrowWriter::try_new(Vec::new(), batch.schema(), Some(props))?;
    writer.write(batch)?;
    Ok(writer.into_inner()?)
}

/// Footer key/value metadata of a Parquet file, without Arrow's own keys.
pub(super) fn read_parquet_attributes(bytes: Bytes) -> Result<AttributeSet, ContainerError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(bytes)?;
    Ok(footer_attributes(&builder))
}

/// Read every batch of a Parquet file along with its footer attributes.
pub(super) fn read_parquet(
    bytes: Bytes,
) -> Result<(Vec<RecordBatch>, AttributeSet), ContainerError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(bytes)?;
    let attrs = footer_attributes(&builder);
    let reader = builder.build()?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch?);
    }
    Ok((batches, attrs))
}

fn footer_attributes(builder: &ParquetRecordBatchReaderBuilder<Bytes>) -> AttributeSet {
    builder
        .metadata()
        .file_metadata()
        .key_value_metadata()
        .map(|kvs| {
            kvs.iter()
                .filter(|kv| !kv.key.starts_with("ARROW:"))
                .filter_map(|kv| kv.value.clone().map(|v| (kv.key.clone(), v)))
                .collect()
        })
        .unwrap_or_default()
}

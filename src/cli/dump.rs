use anyhow::{Context, Result};
use serde_json::{Map, Value as JsonValue};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use mzpeaklist::container::{ContainerReader, ReadOptions};
use mzpeaklist::table::RecordTable;

/// Print one snapshot as JSON lines, one object per record
pub fn run(file: PathBuf, scan: String, time_index: i64, settings: bool) -> Result<()> {
    let mut reader = ContainerReader::open(&file)
        .with_context(|| format!("Failed to open container: {}", file.display()))?;

    let options = ReadOptions {
        load_settings: settings,
        ..ReadOptions::table_only()
    };
    let snapshot = reader
        .read_snapshot(&scan, time_index, &options)
        .with_context(|| format!("Failed to read scan {} time index {}", scan, time_index))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if let Some(settings) = &snapshot.settings {
        writeln!(out, "{}", serde_json::to_string(settings)?)?;
    }
    for line in json_lines(&snapshot.table)? {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    Ok(())
}

/// Render each record as a JSON object, nulls omitted
fn json_lines(table: &RecordTable) -> Result<Vec<String>> {
    table
        .records
        .iter()
        .map(|record| {
            let mut object = Map::new();
            for label in &table.labels {
                let value = record.get(label);
                if !value.is_null() {
                    object.insert(label.clone(), serde_json::to_value(value)?);
                }
            }
            Ok(serde_json::to_string(&JsonValue::Object(object))?)
        })
        .collect()
}

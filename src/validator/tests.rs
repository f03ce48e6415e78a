use std::fs::File;
use std::io::Write;

use tempfile::tempdir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::tables::{check_index, check_isotopologue_refs};
use super::*;
use crate::attributes::SettingsSnapshot;
use crate::container::{ContainerWriter, WriterConfig};
use crate::peak_list::{FormulaCandidate, IonType, Peak, PeakListBuilder};
use crate::schema::columns;
use crate::table::{FlatRecord, RecordTable, Value};

#[test]
fn test_validation_report_display() {
    let mut report = ValidationReport::new("test.mzpl");
    report.add_check(ValidationCheck::ok("Test check 1"));
    report.add_check(ValidationCheck::warning("Test check 2", "This is a warning"));
    report.add_check(ValidationCheck::failed("Test check 3", "This failed"));

    let output = format!("{}", report);
    assert!(output.contains("✓"));
    assert!(output.contains("⚠"));
    assert!(output.contains("✗"));
    assert!(output.contains("1 passed, 1 warnings, 1 failed"));
    assert!(output.contains("Validation FAILED"));
    assert!(!report.is_valid());
    assert_eq!(report.failures().count(), 1);
}

fn write_container(path: &std::path::Path, snapshots: usize) {
    let mono = FormulaCandidate::new([("C", 6), ("H", 6)], 78.0464, IonType::Radical)
        .confidence_score(0.9);
    let iso = FormulaCandidate::new([("C", 5), ("13C", 1), ("H", 6)], 79.05, IonType::Radical)
        .isotopologue_of(0);
    let list = PeakListBuilder::new(0)
        .add_peak(Peak::new(78.0465, 1.0e5, 1).with_candidate(mono))
        .add_peak(Peak::new(79.0499, 6.6e3, 1).with_candidate(iso))
        .build();
    let writer = ContainerWriter::new(path, WriterConfig::default());
    for _ in 0..snapshots {
        writer.write(&list, &SettingsSnapshot::default()).unwrap();
    }
}

#[test]
fn test_written_container_is_valid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzpl");
    write_container(&path, 2);

    let report = validate_container(&path).unwrap();
    assert!(report.is_valid(), "{}", report);
    assert!(!report.has_warnings(), "{}", report);
    assert!(report
        .checks
        .iter()
        .any(|c| c.name == "Scan 0: time-index keys 0..2"));
}

#[test]
fn test_missing_file_is_error() {
    let dir = tempdir().unwrap();
    assert!(validate_container(&dir.path().join("absent.mzpl")).is_err());
}

#[test]
fn test_compressed_mimetype_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.mzpl");
    {
        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file("mimetype", deflated).unwrap();
        zip.write_all(b"application/vnd.mzpeaklist").unwrap();
        zip.finish().unwrap();
    }

    let report = validate_container(&path).unwrap();
    assert!(!report.is_valid());
    assert!(report.failures().any(|c| c.name == "mimetype entry"));
}

#[test]
fn test_compressed_entries_warn() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("deflated.mzpl");
    write_container(&path, 1);
    {
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .unwrap();
        let mut zip = ZipWriter::new_append(file).unwrap();
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file("notes/readme.txt", deflated).unwrap();
        zip.write_all(b"processed with default settings").unwrap();
        zip.finish().unwrap();
    }

    let report = validate_container(&path).unwrap();
    let check = report
        .checks
        .iter()
        .find(|c| c.name == "Entries stored uncompressed")
        .unwrap();
    match &check.status {
        CheckStatus::Warning(message) => assert!(message.contains("notes/readme.txt")),
        other => panic!("unexpected status: {other:?}"),
    }
}

#[test]
fn test_gap_in_time_keys_warns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzpl");
    write_container(&path, 1);
    {
        let bytes = std::fs::read(&path).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let mut dataset = Vec::new();
        std::io::Read::read_to_end(&mut archive.by_name("0/0.parquet").unwrap(), &mut dataset)
            .unwrap();

        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .unwrap();
        let mut zip = ZipWriter::new_append(file).unwrap();
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file("0/5.parquet", stored).unwrap();
        zip.write_all(&dataset).unwrap();
        zip.finish().unwrap();
    }

    let report = validate_container(&path).unwrap();
    assert!(report.is_valid(), "{}", report);
    assert!(report.checks.iter().any(|c| {
        c.name == "Scan 0: time-index keys" && matches!(c.status, CheckStatus::Warning(_))
    }));
}

fn row(index: i64, isotopologue: Option<i64>) -> FlatRecord {
    let mut record = FlatRecord::new();
    record.set(columns::INDEX, Value::Int(index));
    if let Some(mono) = isotopologue {
        record.set(columns::IS_ISOTOPOLOGUE, Value::Int(1));
        record.set(columns::MONO_ISOTOPIC_INDEX, Value::Int(mono));
    } else {
        record.set(columns::IS_ISOTOPOLOGUE, Value::Int(0));
    }
    record
}

#[test]
fn test_isotopologue_reference_checks() {
    let labels = vec![columns::INDEX.to_string()];
    let good = RecordTable::new(labels.clone(), vec![row(0, None), row(1, Some(0))]);
    assert!(check_isotopologue_refs(&good).is_ok());

    let to_isotopologue = RecordTable::new(
        labels.clone(),
        vec![row(0, None), row(1, Some(0)), row(2, Some(1))],
    );
    let err = check_isotopologue_refs(&to_isotopologue).unwrap_err();
    assert!(err.contains("row 2"));

    let missing = RecordTable::new(labels, vec![row(1, Some(7))]);
    assert!(check_isotopologue_refs(&missing).is_err());
}

#[test]
fn test_negative_index_fails() {
    let labels = vec![columns::INDEX.to_string()];
    let table = RecordTable::new(labels, vec![row(0, None), row(-3, None)]);
    let err = check_index(&table).unwrap_err();
    assert!(err.contains("row 1"));
}

use std::fs::File;
use std::io::Read;

use serde_json::json;
use tempfile::tempdir;
use zip::{CompressionMethod, ZipArchive};

use super::*;
use crate::attributes::{AcquisitionInfo, Settings, SettingsSnapshot};
use crate::peak_list::{FormulaCandidate, IonType, Peak, PeakList, PeakListBuilder, RawProfile};
use crate::schema::columns;

fn annotated(scan: i64) -> PeakList {
    let mono = FormulaCandidate::new([("C", 10), ("H", 8), ("O", 2)], 159.0452, IonType::Radical)
        .mz_error_ppm(-0.4)
        .confidence_score(0.8);
    let iso = FormulaCandidate::new(
        [("C", 9), ("H", 8), ("O", 2), ("13C", 1)],
        160.0486,
        IonType::Radical,
    )
    .confidence_score(0.6)
    .isotopologue_of(0);

    PeakListBuilder::new(scan)
        .polarity(-1)
        .retention_time(12.5)
        .tic(3.0e9)
        .baseline_noise(150.0, 12.0)
        .info(AcquisitionInfo {
            file_name: "sample.raw".into(),
            analyzer: "ICR".into(),
            instrument_label: "12T".into(),
            sample_name: "crude".into(),
        })
        .add_peak(Peak::new(159.0451, 2.0e7, -1).with_candidate(mono))
        .add_peak(Peak::new(160.0485, 2.1e6, -1).with_candidate(iso))
        .add_peak(Peak::new(163.5, 4.0e4, -1))
        .build()
}

fn settings() -> SettingsSnapshot {
    let mut search = Settings::new();
    search.insert("min_ppm_error".into(), json!(-1.0));
    search.insert("max_ppm_error".into(), json!(1.0));
    SettingsSnapshot {
        molecular_search: search,
        ..Default::default()
    }
}

// ============================================================================
// Addressing
// ============================================================================

#[test]
fn test_resolve_time_key_integer_order() {
    let keys = ["10", "2", "0"];
    assert_eq!(resolve_time_key(&keys, -1).as_deref(), Some("10"));
    assert_eq!(resolve_time_key(&keys, -3).as_deref(), Some("0"));
    assert_eq!(resolve_time_key(&keys, 1).as_deref(), Some("2"));
    assert_eq!(resolve_time_key(&keys, -4), None);
    assert_eq!(resolve_time_key(&keys, 3), None);
    assert_eq!(resolve_time_key::<&str>(&[], -1), None);
}

#[test]
fn test_resolve_time_key_ignores_non_numeric() {
    assert_eq!(resolve_time_key(&["notes", "1"], -1).as_deref(), Some("1"));
}

#[test]
fn test_index_from_entry_names() {
    let index = ContainerIndex::from_entry_names([
        "mimetype",
        "attributes.json",
        "3/attributes.json",
        "3/raw_ms.parquet",
        "3/0.parquet",
        "3/1.parquet",
        "mass_spectra/12/0.parquet",
        "stray.txt",
    ]);
    assert!(index.has_mimetype);
    assert!(index.has_root_attributes);

    let group = index.group("3").unwrap();
    assert!(group.has_attributes);
    assert!(group.has_raw);
    assert_eq!(group.time_index_count(), 2);
    assert_eq!(group.time_keys(), vec!["0", "1"]);

    assert_eq!(index.scan_path("3").as_deref(), Some("3"));
    assert_eq!(index.scan_path("12").as_deref(), Some("mass_spectra/12"));
    assert_eq!(index.scan_path("4"), None);
    assert_eq!(index.scans(), vec!["3", "mass_spectra/12"]);
}

#[test]
fn test_entry_names() {
    assert_eq!(dataset_entry("5", "0"), "5/0.parquet");
    assert_eq!(raw_entry("mass_spectra/5"), "mass_spectra/5/raw_ms.parquet");
    assert_eq!(group_attributes_entry(""), "attributes.json");
    assert_eq!(group_attributes_entry("5"), "5/attributes.json");
    assert_eq!(ContainerAddress::new("5", "2").to_string(), "5/2");
    assert_eq!(scan_label("mass_spectra/5"), "5");
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_read_options_validation() {
    assert!(ReadOptions::default().validate().is_ok());
    assert!(ReadOptions::table_only().validate().is_ok());

    let bad = ReadOptions {
        auto_process: false,
        load_molecular_formula: true,
        ..Default::default()
    };
    assert!(matches!(
        bad.validate(),
        Err(ContainerError::InconsistentRequest(_))
    ));
}

#[test]
fn test_group_path_prefix() {
    let mut config = WriterConfig::default();
    assert_eq!(config.group_path("7"), "7");
    config.group_prefix = Some("mass_spectra/".into());
    assert_eq!(config.group_path("7"), "mass_spectra/7");
}

#[test]
fn test_compression_presets() {
    assert_eq!(CompressionType::default(), CompressionType::Zstd(3));
    assert_eq!(CompressionType::max_compression(), CompressionType::Zstd(22));
    assert_eq!(CompressionType::fast(), CompressionType::Snappy);
}

// ============================================================================
// Write / read
// ============================================================================

#[test]
fn test_new_archive_layout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzpl");
    let writer = ContainerWriter::new(&path, WriterConfig::default());
    let address = writer.write(&annotated(1), &settings()).unwrap();
    assert_eq!(address, ContainerAddress::new("1", "0"));

    let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
    {
        let mut first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), CompressionMethod::Stored);
        let mut text = String::new();
        first.read_to_string(&mut text).unwrap();
        assert_eq!(text, "application/vnd.mzpeaklist");
    }
    for i in 0..archive.len() {
        assert_eq!(
            archive.by_index(i).unwrap().compression(),
            CompressionMethod::Stored
        );
    }
    let names: Vec<&str> = archive.file_names().collect();
    assert!(names.contains(&"attributes.json"));
    assert!(names.contains(&"1/attributes.json"));
    assert!(names.contains(&"1/0.parquet"));
    assert!(!names.contains(&"1/raw_ms.parquet"));
}

#[test]
fn test_write_then_read_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzpl");
    let list = annotated(4);
    ContainerWriter::new(&path, WriterConfig::default())
        .write(&list, &settings())
        .unwrap();

    let mut reader = ContainerReader::open(&path).unwrap();
    assert_eq!(reader.scans(), vec!["4"]);
    assert_eq!(reader.acquisition_info(), list.info);
    assert_eq!(
        reader.root_attributes().get("data_structure").map(String::as_str),
        Some("mass_spectrum")
    );

    let snapshot = reader.read_snapshot("4", -1, &ReadOptions::default()).unwrap();
    assert_eq!(snapshot.address.time_key, "0");
    assert!(snapshot.date_utc.is_some());
    assert_eq!(snapshot.table.len(), 3);
    assert!(snapshot.table.has_column("13C"));
    assert_eq!(snapshot.settings.unwrap(), settings());
    assert!(snapshot.raw.is_none());

    let rebuilt = snapshot.peak_list.unwrap();
    assert_eq!(rebuilt.scan_number, 4);
    assert!(rebuilt.is_centroid);
    assert_eq!(rebuilt.attrs, list.attrs);
    assert_eq!(rebuilt.len(), 3);
    assert_eq!(rebuilt.peaks[0].candidates, list.peaks[0].candidates);
    assert_eq!(rebuilt.peaks[1].candidates[0].mono_index(), Some(0));
    assert!(rebuilt.peaks[2].candidates.is_empty());
}

#[test]
fn test_snapshot_without_formulas() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzpl");
    ContainerWriter::new(&path, WriterConfig::default())
        .write(&annotated(0), &settings())
        .unwrap();

    let mut reader = ContainerReader::open(&path).unwrap();
    let options = ReadOptions {
        load_molecular_formula: false,
        load_settings: false,
        ..Default::default()
    };
    let snapshot = reader.read_snapshot("0", 0, &options).unwrap();
    assert!(snapshot.settings.is_none());
    let list = snapshot.peak_list.unwrap();
    assert!(list.peaks.iter().all(|p| p.candidates.is_empty()));

    let snapshot = reader.read_snapshot("0", 0, &ReadOptions::table_only()).unwrap();
    assert!(snapshot.peak_list.is_none());
    assert_eq!(snapshot.table.len(), 3);
}

#[test]
fn test_raw_profile_stored_with_scan_attributes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzpl");
    let raw = RawProfile::new(vec![159.0, 159.01, 159.02], vec![1.0, 5.0, 2.0]).unwrap();
    let mut list = annotated(2);
    list.is_centroid = false;
    list.raw = Some(raw.clone());

    let mut snapshot_settings = settings();
    let mut transient = Settings::new();
    transient.insert("apodization_method".into(), json!("Hanning"));
    snapshot_settings.transient = Some(transient.clone());

    ContainerWriter::new(&path, WriterConfig::default())
        .write(&list, &snapshot_settings)
        .unwrap();

    let mut reader = ContainerReader::open(&path).unwrap();
    assert!(reader.index().group("2").unwrap().has_raw);

    let scan = reader.scan_attributes("2").unwrap();
    let raw_attrs = scan.raw_profile.as_ref().unwrap();
    assert!(raw_attrs.contains_key("MassSpecAttrs"));
    assert!(raw_attrs.contains_key("TransientSetting"));
    assert!(scan.scan_group.is_empty());

    assert_eq!(reader.raw_profile("2").unwrap(), Some(raw.clone()));
    assert_eq!(reader.mass_spec_attrs("2").unwrap(), list.attrs);

    let snapshot = reader.read_snapshot("2", -1, &ReadOptions::default()).unwrap();
    assert_eq!(snapshot.raw, Some(raw));
    assert_eq!(snapshot.settings.unwrap().transient, Some(transient));
    assert!(!snapshot.peak_list.unwrap().is_centroid);
}

#[test]
fn test_raw_export_disabled() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzpl");
    let mut list = annotated(2);
    list.is_centroid = false;
    list.raw = RawProfile::new(vec![1.0], vec![2.0]);

    let config = WriterConfig {
        export_raw: false,
        ..Default::default()
    };
    ContainerWriter::new(&path, config).write(&list, &settings()).unwrap();

    let mut reader = ContainerReader::open(&path).unwrap();
    assert_eq!(reader.raw_profile("2").unwrap(), None);
    let scan = reader.scan_attributes("2").unwrap();
    assert!(scan.raw_profile.is_none());
    assert!(scan.scan_group.contains_key("MassSpecAttrs"));
}

#[test]
fn test_group_prefix_resolution() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzpl");
    let config = WriterConfig {
        group_prefix: Some("mass_spectra".into()),
        ..Default::default()
    };
    let address = ContainerWriter::new(&path, config)
        .write(&annotated(9), &settings())
        .unwrap();
    assert_eq!(address.scan, "mass_spectra/9");

    let mut reader = ContainerReader::open(&path).unwrap();
    let snapshot = reader.read_snapshot("9", -1, &ReadOptions::default()).unwrap();
    assert_eq!(snapshot.address.scan, "mass_spectra/9");
    assert_eq!(snapshot.peak_list.unwrap().scan_number, 9);
}

#[test]
fn test_setting_lookup() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzpl");
    let address = ContainerWriter::new(&path, WriterConfig::default())
        .write(&annotated(0), &settings())
        .unwrap();

    let mut reader = ContainerReader::open(&path).unwrap();
    assert_eq!(
        reader
            .setting(&address, "MoleculaSearchSetting", Some("max_ppm_error"))
            .unwrap(),
        Some(json!(1.0))
    );
    assert_eq!(
        reader
            .setting(&address, "MoleculaSearchSetting", Some("absent"))
            .unwrap(),
        None
    );
    assert_eq!(
        reader.setting(&address, "MassSpecPeakSetting", None).unwrap(),
        Some(json!({}))
    );
}

#[test]
fn test_stored_column_labels() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzpl");
    let address = ContainerWriter::new(&path, WriterConfig::default())
        .write(&annotated(0), &settings())
        .unwrap();

    let mut reader = ContainerReader::open(&path).unwrap();
    let attrs = reader.dataset_attributes(&address).unwrap();
    let labels: Vec<String> = serde_json::from_str(&attrs["ColumnsLabels"]).unwrap();
    assert_eq!(labels[0], columns::INDEX);
    assert_eq!(&labels[labels.len() - 4..], ["C", "H", "O", "13C"]);
    assert!(attrs.contains_key("date_utc"));
    assert!(!attrs.keys().any(|k| k.starts_with("ARROW:")));

    let table = reader.read_table(&address).unwrap();
    assert_eq!(table.labels, labels);
}

#[test]
fn test_missing_scan_and_time_index() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzpl");
    ContainerWriter::new(&path, WriterConfig::default())
        .write(&annotated(0), &settings())
        .unwrap();

    let mut reader = ContainerReader::open(&path).unwrap();
    assert!(matches!(
        reader.read_snapshot("1", -1, &ReadOptions::default()),
        Err(ContainerError::ScanNotFound(_))
    ));
    assert!(matches!(
        reader.read_snapshot("0", 5, &ReadOptions::default()),
        Err(ContainerError::TimeIndexOutOfRange { available: 1, .. })
    ));
}

#[test]
fn test_rejects_foreign_archive() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("other.zip");
    {
        let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
        zip.start_file("readme.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        std::io::Write::write_all(&mut zip, b"hello").unwrap();
        zip.finish().unwrap();
    }

    assert!(matches!(
        ContainerReader::open(&path),
        Err(ContainerError::InvalidFormat(_))
    ));
    let writer = ContainerWriter::new(&path, WriterConfig::default());
    assert!(matches!(
        writer.write(&annotated(0), &settings()),
        Err(ContainerError::InvalidFormat(_))
    ));
}

#[test]
fn test_unsupported_column_leaves_file_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzpl");
    let mut config = WriterConfig::default();
    config.flatten.additional_columns.push("Kendrick Mass".into());

    let result = ContainerWriter::new(&path, config).write(&annotated(0), &settings());
    assert!(matches!(result, Err(ContainerError::TableError(_))));
    assert!(!path.exists());
}

#[test]
fn test_non_finite_spectrum_attributes_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzpl");
    let writer = ContainerWriter::new(&path, WriterConfig::default());

    let mut noisy = annotated(1);
    noisy.attrs.baseline_noise = f64::NAN;
    noisy.attrs.baseline_noise_std = f64::NAN;
    let result = writer.write(&noisy, &settings());
    assert!(matches!(result, Err(ContainerError::AttributeError(_))));
    assert!(!path.exists());

    // an existing archive is left byte-for-byte unchanged
    writer.write(&annotated(0), &settings()).unwrap();
    let before = std::fs::read(&path).unwrap();
    assert!(writer.write(&noisy, &settings()).is_err());
    assert_eq!(std::fs::read(&path).unwrap(), before);

    let mut reader = ContainerReader::open(&path).unwrap();
    assert_eq!(reader.scans(), vec!["0"]);
    assert!(reader
        .read_snapshot("0", -1, &ReadOptions::default())
        .unwrap()
        .peak_list
        .is_some());
}

#[test]
fn test_export_worker_writes_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzpl");
    let worker = ExportWorker::with_capacity(&path, WriterConfig::default(), 2).unwrap();

    let tasks: Vec<ExportTask> = (0..3)
        .map(|_| worker.submit(annotated(0), settings()).unwrap())
        .collect();
    let keys: Vec<String> = tasks
        .into_iter()
        .map(|t| t.wait().unwrap().time_key)
        .collect();
    assert_eq!(keys, vec!["0", "1", "2"]);
    worker.check_error().unwrap();
    worker.finish().unwrap();

    let reader = ContainerReader::open(&path).unwrap();
    assert_eq!(reader.time_keys("0").unwrap(), vec!["0", "1", "2"]);
}

#[test]
fn test_export_worker_reports_errors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.mzpl");
    let mut config = WriterConfig::default();
    config.flatten.additional_columns.push("bogus".into());
    let worker = ExportWorker::new(&path, config).unwrap();

    let task = worker.submit(annotated(0), settings()).unwrap();
    assert!(task.wait().is_err());
    assert!(worker.check_error().is_err());
    worker.finish().unwrap();
}

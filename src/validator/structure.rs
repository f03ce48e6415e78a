use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use anyhow::Result;
use bytes::Bytes;
use zip::{CompressionMethod, ZipArchive};

use crate::attributes::parse_date_utc;
use crate::container::{ContainerAddress, ContainerReader};
use crate::schema::{
    ATTR_ANALYZER, ATTR_DATA_STRUCTURE, ATTR_DATE_UTC, ATTR_FILE_NAME, ATTR_INSTRUMENT_LABEL,
    ATTR_SAMPLE_NAME, DATA_STRUCTURE_MASS_SPECTRUM, MIMETYPE_ENTRY, MZPEAKLIST_MIMETYPE,
};

use super::tables::check_table;
use super::{ValidationCheck, ValidationError, ValidationReport};

/// Step 1: the file is a ZIP archive whose first entry is the stored mimetype.
pub(crate) fn check_archive(path: &Path, report: &mut ValidationReport) -> Result<Bytes> {
    if !path.is_file() {
        report.add_check(ValidationCheck::failed(
            "File exists",
            format!("{} is not a file", path.display()),
        ));
        anyhow::bail!(ValidationError::StructureError("File does not exist".to_string()));
    }
    report.add_check(ValidationCheck::ok("File exists"));

    let bytes = Bytes::from(fs::read(path)?);
    let mut archive = match ZipArchive::new(Cursor::new(bytes.clone())) {
        Ok(archive) => archive,
        Err(e) => {
            report.add_check(ValidationCheck::failed("ZIP archive", e.to_string()));
            anyhow::bail!(ValidationError::StructureError("Not a ZIP archive".to_string()));
        }
    };
    report.add_check(ValidationCheck::ok("ZIP archive"));

    if archive.is_empty() {
        report.add_check(ValidationCheck::failed("mimetype entry", "archive is empty"));
        anyhow::bail!(ValidationError::StructureError("Empty archive".to_string()));
    }

    {
        let mut first = archive.by_index(0)?;
        if first.name() != MIMETYPE_ENTRY {
            report.add_check(ValidationCheck::failed(
                "mimetype entry",
                format!("first entry is '{}'", first.name()),
            ));
        } else if first.compression() != CompressionMethod::Stored {
            report.add_check(ValidationCheck::failed(
                "mimetype entry",
                format!("mimetype is compressed ({:?})", first.compression()),
            ));
        } else {
            let mut content = String::new();
            first.read_to_string(&mut content)?;
            if content == MZPEAKLIST_MIMETYPE {
                report.add_check(ValidationCheck::ok("mimetype entry"));
            } else {
                report.add_check(ValidationCheck::failed(
                    "mimetype entry",
                    format!("unexpected mimetype '{}'", content),
                ));
            }
        }
    }

    let compressed: Vec<String> = (0..archive.len())
        .filter_map(|i| {
            let entry = archive.by_index_raw(i).ok()?;
            (entry.compression() != CompressionMethod::Stored).then(|| entry.name().to_string())
        })
        .collect();
    if compressed.is_empty() {
        report.add_check(ValidationCheck::ok("Entries stored uncompressed"));
    } else {
        report.add_check(ValidationCheck::warning(
            "Entries stored uncompressed",
            format!("compressed entries: {}", compressed.join(", ")),
        ));
    }

    Ok(bytes)
}

/// Step 2: root attributes.
pub(crate) fn check_root(reader: &ContainerReader, report: &mut ValidationReport) {
    if !reader.index().has_root_attributes {
        report.add_check(ValidationCheck::failed(
            "Root attributes",
            "missing attributes.json",
        ));
        return;
    }
    let root = reader.root_attributes();

    let missing: Vec<&str> = [
        ATTR_DATE_UTC,
        ATTR_FILE_NAME,
        ATTR_DATA_STRUCTURE,
        ATTR_ANALYZER,
        ATTR_INSTRUMENT_LABEL,
        ATTR_SAMPLE_NAME,
    ]
    .into_iter()
    .filter(|key| !root.contains_key(*key))
    .collect();
    if missing.is_empty() {
        report.add_check(ValidationCheck::ok("Root attributes"));
    } else {
        report.add_check(ValidationCheck::warning(
            "Root attributes",
            format!("missing: {}", missing.join(", ")),
        ));
    }

    if let Some(date) = root.get(ATTR_DATE_UTC) {
        if parse_date_utc(date).is_some() {
            report.add_check(ValidationCheck::ok("Root date_utc"));
        } else {
            report.add_check(ValidationCheck::warning(
                "Root date_utc",
                format!("unrecognized timestamp '{}'", date),
            ));
        }
    }

    if let Some(kind) = root.get(ATTR_DATA_STRUCTURE) {
        if kind != DATA_STRUCTURE_MASS_SPECTRUM {
            report.add_check(ValidationCheck::warning(
                "Root data_structure",
                format!("expected '{}', found '{}'", DATA_STRUCTURE_MASS_SPECTRUM, kind),
            ));
        }
    }
}

/// Step 3: every scan group, its attributes and its time-index datasets.
pub(crate) fn check_scans(reader: &mut ContainerReader, report: &mut ValidationReport) {
    let scans = reader.scans();
    if scans.is_empty() {
        report.add_check(ValidationCheck::warning("Scan groups", "container holds no scans"));
        return;
    }
    report.add_check(ValidationCheck::ok(format!("Scan groups ({})", scans.len())));

    for scan in scans {
        let attrs = reader.mass_spec_attrs(&scan).map(|_| ());
        report.add_check(ValidationCheck::from_result(
            format!("Scan {}: MassSpecAttrs", scan),
            attrs,
        ));

        let keys = reader.time_keys(&scan).unwrap_or_default();
        if keys.is_empty() {
            report.add_check(ValidationCheck::failed(
                format!("Scan {}: time-index datasets", scan),
                "no time-index dataset",
            ));
            continue;
        }

        let numbers: Vec<Option<i64>> = keys.iter().map(|k| k.parse().ok()).collect();
        let bad: Vec<&str> = keys
            .iter()
            .zip(&numbers)
            .filter(|(_, n)| n.is_none())
            .map(|(k, _)| k.as_str())
            .collect();
        if !bad.is_empty() {
            report.add_check(ValidationCheck::failed(
                format!("Scan {}: time-index keys", scan),
                format!("non-integer keys: {}", bad.join(", ")),
            ));
        } else if numbers
            .iter()
            .enumerate()
            .all(|(i, n)| *n == Some(i as i64))
        {
            report.add_check(ValidationCheck::ok(format!(
                "Scan {}: time-index keys 0..{}",
                scan,
                keys.len()
            )));
        } else {
            report.add_check(ValidationCheck::warning(
                format!("Scan {}: time-index keys", scan),
                format!("keys are not contiguous: {}", keys.join(", ")),
            ));
        }

        for key in keys.iter().filter(|k| k.parse::<i64>().is_ok()) {
            let address = ContainerAddress::new(scan.clone(), key.clone());
            match reader.read_table(&address) {
                Ok(table) => check_table(&address, &table, report),
                Err(e) => report.add_check(ValidationCheck::failed(
                    format!("Dataset {}: readable", address),
                    e.to_string(),
                )),
            }
        }
    }
}

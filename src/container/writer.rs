use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::address::{
    dataset_entry, group_attributes_entry, raw_entry, ContainerAddress, ContainerIndex,
};
use super::config::WriterConfig;
use super::error::ContainerError;
use super::parquet_io::write_parquet;
use crate::attributes::{
    encode_value, format_date_utc, write_group, AttributeSet, SettingsSnapshot,
};
use crate::peak_list::PeakList;
use crate::schema::{
    ATTR_COLUMNS_LABELS, ATTR_DATE_UTC, ATTR_MASS_SPEC_ATTRS, ATTR_TRANSIENT_SETTING,
    MIMETYPE_ENTRY, MZPEAKLIST_MIMETYPE,
};
use crate::table::{raw_profile_to_record_batch, table_to_record_batch, RowCodec};

/// A fully encoded ZIP entry waiting to be appended.
struct PendingEntry {
    name: String,
    data: Vec<u8>,
}

/// Appends peak-list snapshots to a container file.
///
/// Each [`write`](ContainerWriter::write) opens the archive, appends the new
/// entries and closes it again. Nothing is written until the snapshot has
/// been flattened and encoded, so a rejected peak list leaves the file
/// untouched.
///
/// # Example
///
/// ```no_run
/// use mzpeaklist::prelude::*;
///
/// let list = PeakListBuilder::new(0)
///     .add_peak(Peak::new(301.1234, 1.5e6, 1))
///     .build();
///
/// let writer = ContainerWriter::new("run.mzpl", WriterConfig::default());
/// let address = writer.write(&list, &SettingsSnapshot::default())?;
/// assert_eq!(address.time_key, "0");
/// # Ok::<(), mzpeaklist::container::ContainerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ContainerWriter {
    path: PathBuf,
    config: WriterConfig,
    codec: RowCodec,
}

impl ContainerWriter {
    /// Create a writer for the container at `path`
    pub fn new<P: AsRef<Path>>(path: P, config: WriterConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
            codec: RowCodec::default(),
        }
    }

    /// Use a specific row codec (for a custom element ordering)
    pub fn with_codec(mut self, codec: RowCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Container path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writer configuration
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Append one snapshot of `list` and return where it was stored.
    ///
    /// The scan group is created on first use, along with its spectrum
    /// attributes and, for profile data with raw export enabled, the raw
    /// profile. The time-index key is the number of time-index datasets
    /// already in the group.
    pub fn write(
        &self,
        list: &PeakList,
        settings: &SettingsSnapshot,
    ) -> Result<ContainerAddress, ContainerError> {
        list.attrs.check_finite()?;
        let table = self.codec.flatten(list, &self.config.flatten)?;
        let batch = table_to_record_batch(&table)?;

        let index = self.read_index()?;
        let is_new_archive = index.is_none();
        let index = index.unwrap_or_default();

        let group = self.config.group_path(&list.scan_label());
        let existing = index.group(&group);
        let is_new_group = existing.is_none();
        let time_key = existing
            .map(|g| g.time_index_count())
            .unwrap_or(0)
            .to_string();
        if existing.is_some_and(|g| g.datasets.contains(&time_key)) {
            return Err(ContainerError::InvalidFormat(format!(
                "{}: time index {} already exists, keys are not contiguous",
                group, time_key
            )));
        }
        let address = ContainerAddress::new(group.clone(), time_key);
        debug!(
            "Writing {} rows to {} (new archive: {}, new group: {})",
            table.len(),
            address,
            is_new_archive,
            is_new_group
        );

        let now = Utc::now();
        let mut entries = Vec::new();

        if is_new_archive {
            let root = list.info.to_root_attributes(now);
            entries.push(PendingEntry {
                name: group_attributes_entry(""),
                data: encode_value(&root)?.into_bytes(),
            });
        }

        if is_new_group {
            entries.extend(self.encode_scan_group(&group, list, settings)?);
        }

        let mut dataset_attrs = AttributeSet::new();
        dataset_attrs.insert(ATTR_DATE_UTC.to_string(), format_date_utc(now));
        dataset_attrs.insert(ATTR_COLUMNS_LABELS.to_string(), encode_value(&table.labels)?);
        settings.write_run_groups(&mut dataset_attrs)?;
        entries.push(PendingEntry {
            name: dataset_entry(&address.scan, &address.time_key),
            data: write_parquet(&batch, self.config.to_writer_properties(&dataset_attrs))?,
        });

        self.append_entries(is_new_archive, entries)?;

        info!(
            "Wrote scan {} time index {} ({} rows, {} columns) to {}",
            address.scan,
            address.time_key,
            table.len(),
            table.labels.len(),
            self.path.display()
        );
        Ok(address)
    }

    /// Entries written once, when a scan group is created.
    fn encode_scan_group(
        &self,
        group: &str,
        list: &PeakList,
        settings: &SettingsSnapshot,
    ) -> Result<Vec<PendingEntry>, ContainerError> {
        let mut scan_attrs = AttributeSet::new();
        write_group(&mut scan_attrs, ATTR_MASS_SPEC_ATTRS, &list.attrs.to_settings()?)?;
        if let Some(transient) = &settings.transient {
            write_group(&mut scan_attrs, ATTR_TRANSIENT_SETTING, transient)?;
        }

        let raw = match &list.raw {
            Some(raw) if !list.is_centroid && self.config.export_raw => Some(raw),
            _ => None,
        };

        let mut entries = Vec::new();
        match raw {
            Some(raw) => {
                debug!("Scan {}: storing {} raw points", group, raw.len());
                let batch = raw_profile_to_record_batch(raw)?;
                entries.push(PendingEntry {
                    name: raw_entry(group),
                    data: write_parquet(&batch, self.config.to_writer_properties(&scan_attrs))?,
                });
                entries.push(PendingEntry {
                    name: group_attributes_entry(group),
                    data: encode_value(&AttributeSet::new())?.into_bytes(),
                });
            }
            None => {
                entries.push(PendingEntry {
                    name: group_attributes_entry(group),
                    data: encode_value(&scan_attrs)?.into_bytes(),
                });
            }
        }
        Ok(entries)
    }

    /// Index of the existing archive, `None` when the file does not exist yet.
    fn read_index(&self) -> Result<Option<ContainerIndex>, ContainerError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.path)?;
        let archive = ZipArchive::new(BufReader::new(file))?;
        let index = ContainerIndex::from_entry_names(archive.file_names());
        if !index.has_mimetype {
            return Err(ContainerError::InvalidFormat(format!(
                "{} has no '{}' entry",
                self.path.display(),
                MIMETYPE_ENTRY
            )));
        }
        Ok(Some(index))
    }

    fn append_entries(
        &self,
        is_new_archive: bool,
        entries: Vec<PendingEntry>,
    ) -> Result<(), ContainerError> {
        // Parquet files are already compressed; storing them lets readers
        // seek inside the archive.
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .unix_permissions(0o644);

        let mut zip = if is_new_archive {
            let file = File::create(&self.path)?;
            let mut zip = ZipWriter::new(file);
            zip.start_file(MIMETYPE_ENTRY, options)?;
            zip.write_all(MZPEAKLIST_MIMETYPE.as_bytes())?;
            zip
        } else {
            let file = OpenOptions::new().read(true).write(true).open(&self.path)?;
            ZipWriter::new_append(file)?
        };

        for entry in entries {
            zip.start_file(entry.name.as_str(), options)?;
            zip.write_all(&entry.data)?;
        }
        zip.finish()?;
        Ok(())
    }
}

use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde_json::Value as JsonValue;
use zip::result::ZipError;
use zip::ZipArchive;

use super::address::{
    group_attributes_entry, raw_entry, resolve_time_key, scan_label, ContainerAddress,
    ContainerIndex,
};
use super::config::ReadOptions;
use super::error::ContainerError;
use super::parquet_io::{read_parquet, read_parquet_attributes};
use crate::attributes::{
    decode_settings, parse_date_utc, read_group, AcquisitionInfo, AttributeSet, MassSpecAttrs,
    SettingsSnapshot,
};
use crate::compat::{CompatResolver, ScanAttributes};
use crate::peak_list::{PeakList, RawProfile};
use crate::schema::{
    ATTR_COLUMNS_LABELS, ATTR_DATE_UTC, ATTR_TRANSIENT_SETTING, MIMETYPE_ENTRY,
    MZPEAKLIST_MIMETYPE,
};
use crate::table::{
    record_batches_to_raw_profile, record_batches_to_table, RecordTable, RowCodec,
};

/// Everything loaded for one `(scan, time index)` request.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Where the snapshot was read from
    pub address: ContainerAddress,
    /// Creation time of the dataset
    pub date_utc: Option<DateTime<Utc>>,
    /// Records, validated and sorted by `Index`
    pub table: RecordTable,
    /// Rebuilt peak list, when `auto_process` was requested
    pub peak_list: Option<PeakList>,
    /// Settings in effect for the run, when `load_settings` was requested
    pub settings: Option<SettingsSnapshot>,
    /// Raw profile, when requested and stored
    pub raw: Option<RawProfile>,
}

/// Reads snapshots out of a container.
///
/// The whole archive is held in memory; every read decodes one entry.
pub struct ContainerReader {
    archive: ZipArchive<Cursor<Bytes>>,
    index: ContainerIndex,
    root: AttributeSet,
    resolver: CompatResolver,
    codec: RowCodec,
}

impl ContainerReader {
    /// Open a container file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ContainerError> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        debug!("Loaded {} ({} bytes)", path.display(), buf.len());
        Self::from_bytes(Bytes::from(buf))
    }

    /// Open a container already materialized in memory
    pub fn from_bytes(bytes: Bytes) -> Result<Self, ContainerError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let index = ContainerIndex::from_entry_names(archive.file_names());

        if !index.has_mimetype {
            return Err(ContainerError::InvalidFormat(format!(
                "missing '{}' entry",
                MIMETYPE_ENTRY
            )));
        }
        let mimetype = read_entry(&mut archive, MIMETYPE_ENTRY)?;
        if mimetype.as_ref() != MZPEAKLIST_MIMETYPE.as_bytes() {
            return Err(ContainerError::InvalidFormat(format!(
                "unexpected mimetype '{}'",
                String::from_utf8_lossy(&mimetype)
            )));
        }

        let root = if index.has_root_attributes {
            read_attribute_entry(&mut archive, "")?
        } else {
            AttributeSet::new()
        };

        Ok(Self {
            archive,
            index,
            root,
            resolver: CompatResolver::default(),
            codec: RowCodec::default(),
        })
    }

    /// Use a specific legacy-lookup chain
    pub fn with_resolver(mut self, resolver: CompatResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Use a specific row codec (for a custom element ordering)
    pub fn with_codec(mut self, codec: RowCodec) -> Self {
        self.codec = codec;
        self
    }

    // ========================================================================
    // Layout
    // ========================================================================

    /// Group structure of the archive
    pub fn index(&self) -> &ContainerIndex {
        &self.index
    }

    /// Root attributes as stored
    pub fn root_attributes(&self) -> &AttributeSet {
        &self.root
    }

    /// Instrument and sample labels from the root attributes
    pub fn acquisition_info(&self) -> AcquisitionInfo {
        AcquisitionInfo::from_root_attributes(&self.root)
    }

    /// Scan group paths in scan order
    pub fn scans(&self) -> Vec<String> {
        self.index.scans()
    }

    /// Group path of a scan label or path
    pub fn scan_path(&self, scan: &str) -> Result<String, ContainerError> {
        self.index
            .scan_path(scan)
            .ok_or_else(|| ContainerError::ScanNotFound(scan.to_string()))
    }

    /// Time-index keys of a scan in integer order
    pub fn time_keys(&self, scan: &str) -> Result<Vec<String>, ContainerError> {
        let path = self.scan_path(scan)?;
        Ok(self
            .index
            .group(&path)
            .map(|g| g.time_keys())
            .unwrap_or_default())
    }

    /// Resolve `(scan, time_index)` to a dataset address.
    ///
    /// `time_index` counts from the oldest dataset, or from the newest when
    /// negative (`-1` is the most recent snapshot).
    pub fn resolve_address(
        &self,
        scan: &str,
        time_index: i64,
    ) -> Result<ContainerAddress, ContainerError> {
        let path = self.scan_path(scan)?;
        let keys = self
            .index
            .group(&path)
            .map(|g| g.time_keys())
            .unwrap_or_default();
        let key = resolve_time_key(&keys, time_index).ok_or_else(|| {
            ContainerError::TimeIndexOutOfRange {
                scan: path.clone(),
                time_index,
                available: keys.len(),
            }
        })?;
        debug!("Resolved scan {} time index {} to key {}", scan, time_index, key);
        Ok(ContainerAddress::new(path, key))
    }

    // ========================================================================
    // Datasets
    // ========================================================================

    /// Raw records of a time-index dataset, exactly as stored.
    pub fn read_table(&mut self, address: &ContainerAddress) -> Result<RecordTable, ContainerError> {
        let bytes = read_entry(&mut self.archive, &address.entry_name())?;
        let (batches, attrs) = read_parquet(bytes)?;
        let labels = stored_labels(&attrs);
        Ok(record_batches_to_table(&batches, labels)?)
    }

    /// Footer attributes of a time-index dataset
    pub fn dataset_attributes(
        &mut self,
        address: &ContainerAddress,
    ) -> Result<AttributeSet, ContainerError> {
        let bytes = read_entry(&mut self.archive, &address.entry_name())?;
        read_parquet_attributes(bytes)
    }

    /// Settings in effect when a dataset was written.
    ///
    /// The transient settings come from the dataset when stored there,
    /// otherwise from the scan-level attributes.
    pub fn settings(
        &mut self,
        address: &ContainerAddress,
    ) -> Result<SettingsSnapshot, ContainerError> {
        let attrs = self.dataset_attributes(address)?;
        self.settings_from(&address.scan, &attrs)
    }

    fn settings_from(
        &mut self,
        scan: &str,
        attrs: &AttributeSet,
    ) -> Result<SettingsSnapshot, ContainerError> {
        let mut snapshot = SettingsSnapshot::read_run_groups(attrs)?;
        if snapshot.transient.is_none() {
            let scan_attrs = self.scan_attributes(scan)?;
            snapshot.transient = self.resolver.group(&scan_attrs, ATTR_TRANSIENT_SETTING)?;
        }
        Ok(snapshot)
    }

    /// One settings group of a dataset, or a single key inside it.
    ///
    /// Returns `None` when the key is absent; a missing group reads as empty.
    pub fn setting(
        &mut self,
        address: &ContainerAddress,
        group: &str,
        key: Option<&str>,
    ) -> Result<Option<JsonValue>, ContainerError> {
        let attrs = self.dataset_attributes(address)?;
        let mut settings = read_group(&attrs, group)?;
        Ok(match key {
            Some(key) => settings.remove(key),
            None => Some(JsonValue::Object(settings)),
        })
    }

    // ========================================================================
    // Per-scan attributes
    // ========================================================================

    /// Both attribute sets that may hold per-scan metadata.
    pub fn scan_attributes(&mut self, scan: &str) -> Result<ScanAttributes, ContainerError> {
        let path = self.scan_path(scan)?;
        let Some(entries) = self.index.group(&path).cloned() else {
            return Err(ContainerError::ScanNotFound(scan.to_string()));
        };

        let raw_profile = if entries.has_raw {
            let bytes = read_entry(&mut self.archive, &raw_entry(&path))?;
            Some(read_parquet_attributes(bytes)?)
        } else {
            None
        };
        let scan_group = if entries.has_attributes {
            read_attribute_entry(&mut self.archive, &path)?
        } else {
            AttributeSet::new()
        };

        Ok(ScanAttributes {
            scan: path,
            raw_profile,
            scan_group,
        })
    }

    /// One per-scan attribute, with legacy placement and key fallbacks
    pub fn scan_attribute(
        &mut self,
        scan: &str,
        group: &str,
        key: &str,
    ) -> Result<JsonValue, ContainerError> {
        let attrs = self.scan_attributes(scan)?;
        Ok(self.resolver.resolve(&attrs, group, key)?)
    }

    /// Typed spectrum attributes of a scan
    pub fn mass_spec_attrs(&mut self, scan: &str) -> Result<MassSpecAttrs, ContainerError> {
        let attrs = self.scan_attributes(scan)?;
        Ok(self.resolver.mass_spec_attrs(&attrs)?)
    }

    /// Raw profile of a scan, `None` for centroid scans
    pub fn raw_profile(&mut self, scan: &str) -> Result<Option<RawProfile>, ContainerError> {
        let path = self.scan_path(scan)?;
        let has_raw = self.index.group(&path).map(|g| g.has_raw).unwrap_or(false);
        if !has_raw {
            return Ok(None);
        }
        let bytes = read_entry(&mut self.archive, &raw_entry(&path))?;
        let (batches, _) = read_parquet(bytes)?;
        Ok(Some(record_batches_to_raw_profile(&batches)?))
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Load one snapshot of a scan.
    ///
    /// Inconsistent options are rejected before anything is decoded. The
    /// table is validated, cast and sorted; a table missing any sentinel
    /// column is not a peak table and fails here.
    pub fn read_snapshot(
        &mut self,
        scan: &str,
        time_index: i64,
        options: &ReadOptions,
    ) -> Result<Snapshot, ContainerError> {
        options.validate()?;
        let address = self.resolve_address(scan, time_index)?;

        let bytes = read_entry(&mut self.archive, &address.entry_name())?;
        let (batches, attrs) = read_parquet(bytes)?;
        let date_utc = attrs.get(ATTR_DATE_UTC).and_then(|s| parse_date_utc(s));

        let table = record_batches_to_table(&batches, stored_labels(&attrs))?;
        let table = self.codec.reconstruct(table)?;

        let settings = if options.load_settings {
            Some(self.settings_from(&address.scan, &attrs)?)
        } else {
            None
        };

        let is_centroid = !self
            .index
            .group(&address.scan)
            .map(|g| g.has_raw)
            .unwrap_or(false);
        let raw = if options.load_raw {
            self.raw_profile(&address.scan)?
        } else {
            None
        };

        let peak_list = if options.auto_process {
            Some(self.build_peak_list(&address, &table, is_centroid, raw.clone(), options)?)
        } else {
            None
        };

        Ok(Snapshot {
            address,
            date_utc,
            table,
            peak_list,
            settings,
            raw,
        })
    }

    fn build_peak_list(
        &mut self,
        address: &ContainerAddress,
        table: &RecordTable,
        is_centroid: bool,
        raw: Option<RawProfile>,
        options: &ReadOptions,
    ) -> Result<PeakList, ContainerError> {
        let label = scan_label(&address.scan);
        let scan_number: i64 = label.parse().map_err(|_| {
            ContainerError::InvalidFormat(format!("scan label '{}' is not a number", label))
        })?;

        let mut peaks = self.codec.build_peaks(table)?;
        if !options.load_molecular_formula {
            for peak in &mut peaks {
                peak.candidates.clear();
            }
        }

        Ok(PeakList {
            scan_number,
            attrs: self.mass_spec_attrs(&address.scan)?,
            info: self.acquisition_info(),
            is_centroid,
            raw,
            peaks,
        })
    }
}

/// `ColumnsLabels` of a dataset, if present and well-formed.
fn stored_labels(attrs: &AttributeSet) -> Option<Vec<String>> {
    let text = attrs.get(ATTR_COLUMNS_LABELS)?;
    match serde_json::from_str::<Vec<String>>(text) {
        Ok(labels) => Some(labels),
        Err(e) => {
            warn!("Ignoring malformed {}: {}", ATTR_COLUMNS_LABELS, e);
            None
        }
    }
}

/// Read a whole ZIP entry into memory.
pub(super) fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Bytes, ContainerError> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(ContainerError::InvalidFormat(format!(
                "missing entry '{}'",
                name
            )))
        }
        Err(e) => return Err(e.into()),
    };
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    Ok(Bytes::from(buf))
}

/// Decode a group `attributes.json` into a flat attribute set.
///
/// Non-string values are kept as their JSON text.
pub(super) fn read_attribute_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    group: &str,
) -> Result<AttributeSet, ContainerError> {
    let name = group_attributes_entry(group);
    let bytes = read_entry(archive, &name)?;
    let text = String::from_utf8_lossy(&bytes);
    let map = decode_settings(&name, &text)?;
    Ok(map
        .into_iter()
        .map(|(k, v)| match v {
            JsonValue::String(s) => (k, s),
            other => (k, other.to_string()),
        })
        .collect())
}

use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;
use serde::{Deserialize, Serialize};

use super::error::ContainerError;
use crate::attributes::AttributeSet;
use crate::table::FlattenOptions;

/// Compression applied inside each Parquet dataset.
///
/// ZIP entries themselves are always stored uncompressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionType {
    /// ZSTD compression with a level
    Zstd(i32),
    /// Snappy compression
    Snappy,
    /// No compression
    Uncompressed,
}

impl Default for CompressionType {
    fn default() -> Self {
        Self::Zstd(3)
    }
}

impl CompressionType {
    /// Maximum compression (slower write, smallest files)
    pub fn max_compression() -> Self {
        Self::Zstd(22)
    }

    /// Fast compression (faster write, larger files)
    pub fn fast() -> Self {
        Self::Snappy
    }

    fn to_parquet(self) -> Compression {
        match self {
            CompressionType::Zstd(level) => {
                Compression::ZSTD(ZstdLevel::try_new(level).unwrap_or_default())
            }
            CompressionType::Snappy => Compression::SNAPPY,
            CompressionType::Uncompressed => Compression::UNCOMPRESSED,
        }
    }
}

/// Configuration for [`ContainerWriter`](super::ContainerWriter)
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Compression used inside each dataset
    pub compression: CompressionType,

    /// Store the raw profile of non-centroided peak lists
    pub export_raw: bool,

    /// Parent group for scan groups (`mass_spectra` for multi-spectrum runs)
    pub group_prefix: Option<String>,

    /// Row selection policy
    pub flatten: FlattenOptions,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: CompressionType::default(),
            export_raw: true,
            group_prefix: None,
            flatten: FlattenOptions::default(),
        }
    }
}

impl WriterConfig {
    /// Group path of a scan, including the optional prefix
    pub fn group_path(&self, scan_label: &str) -> String {
        match &self.group_prefix {
            Some(prefix) if !prefix.is_empty() => {
                format!("{}/{}", prefix.trim_end_matches('/'), scan_label)
            }
            _ => scan_label.to_string(),
        }
    }

    /// Parquet writer properties carrying `attrs` as footer key/value metadata
    pub(super) fn to_writer_properties(&self, attrs: &AttributeSet) -> WriterProperties {
        let kv_metadata: Vec<KeyValue> = attrs
            .iter()
            .map(|(k, v)| KeyValue {
                key: k.clone(),
                value: Some(v.clone()),
            })
            .collect();

        WriterProperties::builder()
            .set_compression(self.compression.to_parquet())
            .set_key_value_metadata(Some(kv_metadata))
            .build()
    }
}

/// What to load when reading a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Rebuild a peak list from the table
    pub auto_process: bool,
    /// Load the settings snapshot
    pub load_settings: bool,
    /// Load the raw profile, when the scan has one
    pub load_raw: bool,
    /// Attach formula candidates to the rebuilt peaks
    pub load_molecular_formula: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            auto_process: true,
            load_settings: true,
            load_raw: true,
            load_molecular_formula: true,
        }
    }
}

impl ReadOptions {
    /// Table and settings only, no peak list
    pub fn table_only() -> Self {
        Self {
            auto_process: false,
            load_molecular_formula: false,
            ..Default::default()
        }
    }

    /// Reject option combinations that cannot be honored.
    pub fn validate(&self) -> Result<(), ContainerError> {
        if self.load_molecular_formula && !self.auto_process {
            return Err(ContainerError::InconsistentRequest(
                "molecular formulas can only be loaded into a processed peak list (auto_process)"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

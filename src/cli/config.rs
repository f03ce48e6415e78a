//! TOML configuration file support.
//!
//! Export behaviour can be set in a config file instead of flags:
//!
//! ```toml
//! # mzpeaklist.toml
//! [export]
//! compression_level = 9
//! export_raw = false
//! include_no_match = true
//! isotopologue_inline = false
//! selection = "best_score"
//! min_confidence_score = 0.5
//! additional_columns = ["NOSC"]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use mzpeaklist::container::{CompressionType, WriterConfig};
use mzpeaklist::table::CandidateSelection;

/// Root configuration structure for mzpeaklist.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// Settings for writing containers. Unset fields keep the writer defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ExportConfig {
    /// ZSTD compression level (1-22).
    pub compression_level: Option<i32>,

    /// Store raw profiles of profile-mode scans.
    pub export_raw: Option<bool>,

    /// Parent group for scan groups.
    pub group_prefix: Option<String>,

    /// Emit rows for peaks without an assignment.
    pub include_no_match: Option<bool>,

    /// Emit isotopologue rows.
    pub include_isotopologues: Option<bool>,

    /// Keep isotopologue rows next to their peak.
    pub isotopologue_inline: Option<bool>,

    /// Keep unassigned rows at their peak position.
    pub no_match_inline: Option<bool>,

    /// Candidate selection policy.
    pub selection: Option<CandidateSelection>,

    /// Minimum confidence score of an exported candidate.
    pub min_confidence_score: Option<f64>,

    /// Derived columns to add.
    pub additional_columns: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

impl ExportConfig {
    /// Overlay the configured values onto a writer configuration.
    pub fn apply(&self, config: &mut WriterConfig) {
        if let Some(level) = self.compression_level {
            config.compression = CompressionType::Zstd(level);
        }
        if let Some(export_raw) = self.export_raw {
            config.export_raw = export_raw;
        }
        if let Some(prefix) = &self.group_prefix {
            config.group_prefix = Some(prefix.clone());
        }

        let flatten = &mut config.flatten;
        if let Some(v) = self.include_no_match {
            flatten.include_no_match = v;
        }
        if let Some(v) = self.include_isotopologues {
            flatten.include_isotopologues = v;
        }
        if let Some(v) = self.isotopologue_inline {
            flatten.isotopologue_inline = v;
        }
        if let Some(v) = self.no_match_inline {
            flatten.no_match_inline = v;
        }
        if let Some(selection) = self.selection {
            flatten.selection = selection;
        }
        if self.min_confidence_score.is_some() {
            flatten.min_confidence_score = self.min_confidence_score;
        }
        if let Some(columns) = &self.additional_columns {
            flatten.additional_columns = columns.clone();
        }
    }
}

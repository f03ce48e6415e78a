use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::codec::AttributeSet;
use crate::schema::{
    ATTR_ANALYZER, ATTR_DATA_STRUCTURE, ATTR_DATE_UTC, ATTR_FILE_NAME, ATTR_INSTRUMENT_LABEL,
    ATTR_SAMPLE_NAME, DATA_STRUCTURE_MASS_SPECTRUM, DATE_UTC_FORMAT,
};

/// Instrument-level labels carried by a peak list and stored at the container root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionInfo {
    /// Name of the source data file
    pub file_name: String,
    /// Mass analyzer label
    pub analyzer: String,
    /// Instrument label
    pub instrument_label: String,
    /// Sample name
    pub sample_name: String,
}

impl AcquisitionInfo {
    /// Build the root attribute set, stamped with `now`.
    pub fn to_root_attributes(&self, now: DateTime<Utc>) -> AttributeSet {
        let mut attrs = AttributeSet::new();
        attrs.insert(ATTR_DATE_UTC.to_string(), format_date_utc(now));
        attrs.insert(ATTR_FILE_NAME.to_string(), self.file_name.clone());
        attrs.insert(
            ATTR_DATA_STRUCTURE.to_string(),
            DATA_STRUCTURE_MASS_SPECTRUM.to_string(),
        );
        attrs.insert(ATTR_ANALYZER.to_string(), self.analyzer.clone());
        attrs.insert(
            ATTR_INSTRUMENT_LABEL.to_string(),
            self.instrument_label.clone(),
        );
        attrs.insert(ATTR_SAMPLE_NAME.to_string(), self.sample_name.clone());
        attrs
    }

    /// Read labels back from root attributes. Missing labels become empty strings.
    pub fn from_root_attributes(attrs: &AttributeSet) -> Self {
        let get = |key: &str| attrs.get(key).cloned().unwrap_or_default();
        Self {
            file_name: get(ATTR_FILE_NAME),
            analyzer: get(ATTR_ANALYZER),
            instrument_label: get(ATTR_INSTRUMENT_LABEL),
            sample_name: get(ATTR_SAMPLE_NAME),
        }
    }
}

/// Format a timestamp the way every `date_utc` attribute is written.
pub fn format_date_utc(time: DateTime<Utc>) -> String {
    time.format(DATE_UTC_FORMAT).to_string()
}

/// Parse a `date_utc` attribute, `None` if it does not follow the container layout.
pub fn parse_date_utc(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim().trim_end_matches("UTC").trim_end();
    chrono::NaiveDateTime::parse_from_str(trimmed, "%d/%m/%Y %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

//! # Attribute Codec
//!
//! Settings and instrument metadata travel next to every table as named
//! attribute groups holding canonical JSON text. This module encodes and
//! decodes those groups and provides the typed views used by the container.
//!
//! ## Groups
//!
//! | Node | Groups |
//! |------|--------|
//! | root | `date_utc`, `file_name`, `data_structure`, `analyzer`, `instrument_label`, `sample_name` |
//! | scan group / `raw_ms` | `MassSpecAttrs`, `TransientSetting` |
//! | time-index dataset | `date_utc`, `ColumnsLabels`, `MoleculaSearchSetting`, `MassSpecPeakSetting`, `MassSpectrumSetting` |
//!
//! ## Example
//!
//! ```
//! use mzpeaklist::attributes::{encode_settings, read_group, AttributeSet, Settings};
//!
//! let mut settings = Settings::new();
//! settings.insert("min_ppm_error".into(), (-1.0).into());
//! let mut attrs = AttributeSet::new();
//! attrs.insert("MoleculaSearchSetting".into(), encode_settings(&settings)?);
//!
//! assert_eq!(read_group(&attrs, "MoleculaSearchSetting")?, settings);
//! assert!(read_group(&attrs, "MassSpecPeakSetting")?.is_empty());
//! # Ok::<(), mzpeaklist::attributes::AttributeError>(())
//! ```

mod codec;
mod error;
mod mass_spec;
mod root;
mod settings;

#[cfg(test)]
mod tests;

pub use codec::{
    decode_settings, encode_settings, encode_value, read_group, read_group_key, write_group,
    AttributeSet, Settings,
};
pub use error::AttributeError;
pub use mass_spec::MassSpecAttrs;
pub use root::{format_date_utc, parse_date_utc, AcquisitionInfo};
pub use settings::SettingsSnapshot;

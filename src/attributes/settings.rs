use serde::{Deserialize, Serialize};

use super::codec::{read_group, write_group, AttributeSet, Settings};
use super::error::AttributeError;
use crate::schema::{
    ATTR_MASS_SPECTRUM_SETTING, ATTR_MASS_SPEC_PEAK_SETTING, ATTR_MOLECULAR_SEARCH_SETTING,
    ATTR_TRANSIENT_SETTING,
};

/// The settings in effect for one processing run.
///
/// Values are opaque to the container: whatever flat mapping the settings
/// provider hands over is stored and returned unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    /// Molecular formula search settings
    pub molecular_search: Settings,
    /// Peak picking settings
    pub mass_spec_peak: Settings,
    /// Spectrum processing settings
    pub mass_spectrum: Settings,
    /// Transient settings, only for frequency-domain sources
    pub transient: Option<Settings>,
}

impl SettingsSnapshot {
    /// Write the per-run groups onto a time-index dataset's attributes.
    pub fn write_run_groups(&self, attrs: &mut AttributeSet) -> Result<(), AttributeError> {
        write_group(attrs, ATTR_MOLECULAR_SEARCH_SETTING, &self.molecular_search)?;
        write_group(attrs, ATTR_MASS_SPEC_PEAK_SETTING, &self.mass_spec_peak)?;
        write_group(attrs, ATTR_MASS_SPECTRUM_SETTING, &self.mass_spectrum)?;
        if let Some(transient) = &self.transient {
            write_group(attrs, ATTR_TRANSIENT_SETTING, transient)?;
        }
        Ok(())
    }

    /// Read the per-run groups back. Absent groups are empty, an absent
    /// transient group is `None`.
    pub fn read_run_groups(attrs: &AttributeSet) -> Result<Self, AttributeError> {
        let transient = if attrs.contains_key(ATTR_TRANSIENT_SETTING) {
            Some(read_group(attrs, ATTR_TRANSIENT_SETTING)?)
        } else {
            None
        };
        Ok(Self {
            molecular_search: read_group(attrs, ATTR_MOLECULAR_SEARCH_SETTING)?,
            mass_spec_peak: read_group(attrs, ATTR_MASS_SPEC_PEAK_SETTING)?,
            mass_spectrum: read_group(attrs, ATTR_MASS_SPECTRUM_SETTING)?,
            transient,
        })
    }
}

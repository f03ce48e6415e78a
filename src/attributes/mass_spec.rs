use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::codec::Settings;
use super::error::AttributeError;
use crate::schema::ATTR_MASS_SPEC_ATTRS;

/// Spectrum-level attributes stored in the `MassSpecAttrs` group.
///
/// Field names on disk follow the historical key spelling (`Aterm`,
/// `baseline_noise`, ...). Mobility and calibration terms are optional; the
/// rest must be present when reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassSpecAttrs {
    /// Ionization polarity, -1 or 1
    pub polarity: i32,
    /// Retention time in minutes
    pub rt: f64,
    /// Total ion current
    pub tic: f64,
    /// Ion mobility scan number
    #[serde(default)]
    pub mobility_scan: Option<i64>,
    /// Ion mobility retention time
    #[serde(default)]
    pub mobility_rt: Option<f64>,
    /// Calibration term A
    #[serde(rename = "Aterm", default)]
    pub a_term: Option<f64>,
    /// Calibration term B
    #[serde(rename = "Bterm", default)]
    pub b_term: Option<f64>,
    /// Calibration term C
    #[serde(rename = "Cterm", default)]
    pub c_term: Option<f64>,
    /// Baseline noise level
    pub baseline_noise: f64,
    /// Standard deviation of the baseline noise
    pub baseline_noise_std: f64,
}

impl Default for MassSpecAttrs {
    fn default() -> Self {
        Self {
            polarity: 1,
            rt: 0.0,
            tic: 0.0,
            mobility_scan: None,
            mobility_rt: None,
            a_term: None,
            b_term: None,
            c_term: None,
            baseline_noise: 0.0,
            baseline_noise_std: 0.0,
        }
    }
}

impl MassSpecAttrs {
    /// Keys that must resolve on read
    pub const REQUIRED_KEYS: [&'static str; 5] =
        ["polarity", "rt", "tic", "baseline_noise", "baseline_noise_std"];

    /// Keys that may be absent or null
    pub const OPTIONAL_KEYS: [&'static str; 5] =
        ["mobility_scan", "mobility_rt", "Aterm", "Bterm", "Cterm"];

    /// Reject non-finite required values.
    ///
    /// JSON has no NaN or infinity; such a value would be written as `null`
    /// and the attributes could not be read back.
    pub fn check_finite(&self) -> Result<(), AttributeError> {
        let required = [
            ("rt", self.rt),
            ("tic", self.tic),
            ("baseline_noise", self.baseline_noise),
            ("baseline_noise_std", self.baseline_noise_std),
        ];
        for (key, value) in required {
            if !value.is_finite() {
                return Err(AttributeError::InvalidAttribute {
                    group: ATTR_MASS_SPEC_ATTRS.to_string(),
                    key: key.to_string(),
                    reason: format!("{} is not a finite number", value),
                });
            }
        }
        Ok(())
    }

    /// Convert to the settings mapping written to disk.
    ///
    /// Non-finite optional values are written as `null` and read back as `None`.
    pub fn to_settings(&self) -> Result<Settings, AttributeError> {
        self.check_finite()?;
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(AttributeError::NotAnObject {
                group: ATTR_MASS_SPEC_ATTRS.to_string(),
            }),
        }
    }

    /// Assemble the attributes one key at a time.
    ///
    /// `lookup` resolves a single key (including any legacy fallbacks) and
    /// reports a missing key as [`AttributeError::MissingAttribute`]. Missing
    /// optional keys become `None`; missing required keys are returned as
    /// errors.
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self, AttributeError>
    where
        F: FnMut(&str) -> Result<Value, AttributeError>,
    {
        let mut map = Settings::new();
        for key in Self::REQUIRED_KEYS {
            map.insert(key.to_string(), lookup(key)?);
        }
        for key in Self::OPTIONAL_KEYS {
            match lookup(key) {
                Ok(value) => {
                    map.insert(key.to_string(), value);
                }
                Err(AttributeError::MissingAttribute { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Self::from_settings(map)
    }

    /// Parse a complete settings mapping (keys already in current spelling).
    pub fn from_settings(map: Settings) -> Result<Self, AttributeError> {
        for key in Self::REQUIRED_KEYS {
            if map.get(key).map_or(true, Value::is_null) {
                return Err(AttributeError::InvalidAttribute {
                    group: ATTR_MASS_SPEC_ATTRS.to_string(),
                    key: key.to_string(),
                    reason: "required value is missing or null".to_string(),
                });
            }
        }
        serde_json::from_value(Value::Object(map)).map_err(|e| AttributeError::InvalidAttribute {
            group: ATTR_MASS_SPEC_ATTRS.to_string(),
            key: "*".to_string(),
            reason: e.to_string(),
        })
    }
}

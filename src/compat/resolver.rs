use log::{debug, warn};
use serde_json::Value;

use crate::attributes::{read_group, AttributeError, AttributeSet, MassSpecAttrs, Settings};
use crate::schema::ATTR_MASS_SPEC_ATTRS;

/// Attribute sets that may carry per-scan metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanAttributes {
    /// Scan group label
    pub scan: String,
    /// Attributes of the `raw_ms` dataset, if the scan has one
    pub raw_profile: Option<AttributeSet>,
    /// Attributes of the scan group itself
    pub scan_group: AttributeSet,
}

/// One place a per-scan attribute group can be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeSource {
    /// Attributes of the raw profile dataset (oldest layout)
    RawProfile,
    /// Attributes of the scan group (current layout)
    ScanGroup,
}

impl AttributeSource {
    /// The attribute set this source reads from, if it exists
    pub fn attributes<'a>(&self, scan: &'a ScanAttributes) -> Option<&'a AttributeSet> {
        match self {
            AttributeSource::RawProfile => scan.raw_profile.as_ref(),
            AttributeSource::ScanGroup => Some(&scan.scan_group),
        }
    }
}

/// A historical key spelling, tried once when the current spelling is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRename {
    /// Substring in the current spelling
    pub from: String,
    /// Substring in the stored legacy spelling
    pub to: String,
}

impl KeyRename {
    /// Create a rename rule
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Legacy spelling of `key`, `None` when the rule does not apply
    pub fn apply(&self, key: &str) -> Option<String> {
        key.contains(&self.from)
            .then(|| key.replace(&self.from, &self.to))
    }
}

/// Resolves per-scan attribute lookups across historical layouts.
///
/// Sources are tried in order and the first one holding the group is
/// final. Inside that group the key is tried as given, then once per rename
/// rule.
#[derive(Debug, Clone)]
pub struct CompatResolver {
    chain: Vec<AttributeSource>,
    renames: Vec<KeyRename>,
}

impl Default for CompatResolver {
    fn default() -> Self {
        Self {
            chain: vec![AttributeSource::RawProfile, AttributeSource::ScanGroup],
            renames: vec![KeyRename::new("baseline", "baselise")],
        }
    }
}

impl CompatResolver {
    /// Create a resolver with an explicit source chain and rename rules
    pub fn new(chain: Vec<AttributeSource>, renames: Vec<KeyRename>) -> Self {
        Self { chain, renames }
    }

    /// Find the first source holding `group` and decode it.
    pub fn resolve_group(
        &self,
        scan: &ScanAttributes,
        group: &str,
    ) -> Result<(AttributeSource, Settings), AttributeError> {
        for source in &self.chain {
            let Some(attrs) = source.attributes(scan) else {
                continue;
            };
            if attrs.contains_key(group) {
                debug!("Scan {}: '{}' found in {:?}", scan.scan, group, source);
                return Ok((*source, read_group(attrs, group)?));
            }
        }
        Err(AttributeError::MissingAttribute {
            scan: scan.scan.clone(),
            group: group.to_string(),
            key: String::new(),
        })
    }

    /// Look up one key of a per-scan group.
    pub fn resolve(
        &self,
        scan: &ScanAttributes,
        group: &str,
        key: &str,
    ) -> Result<Value, AttributeError> {
        let missing = || AttributeError::MissingAttribute {
            scan: scan.scan.clone(),
            group: group.to_string(),
            key: key.to_string(),
        };

        let (source, settings) = self.resolve_group(scan, group).map_err(|e| match e {
            AttributeError::MissingAttribute { .. } => missing(),
            other => other,
        })?;

        if let Some(value) = settings.get(key) {
            return Ok(value.clone());
        }
        for rename in &self.renames {
            let Some(legacy) = rename.apply(key) else {
                continue;
            };
            if let Some(value) = settings.get(&legacy) {
                warn!(
                    "Scan {}: '{}' stored under legacy key '{}' in {:?}",
                    scan.scan, key, legacy, source
                );
                return Ok(value.clone());
            }
        }
        Err(missing())
    }

    /// Assemble the typed spectrum attributes of a scan.
    pub fn mass_spec_attrs(&self, scan: &ScanAttributes) -> Result<MassSpecAttrs, AttributeError> {
        MassSpecAttrs::from_lookup(|key| self.resolve(scan, ATTR_MASS_SPEC_ATTRS, key))
    }

    /// Decode a whole per-scan group, `None` when no source has it.
    pub fn group(
        &self,
        scan: &ScanAttributes,
        group: &str,
    ) -> Result<Option<Settings>, AttributeError> {
        match self.resolve_group(scan, group) {
            Ok((_, settings)) => Ok(Some(settings)),
            Err(AttributeError::MissingAttribute { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

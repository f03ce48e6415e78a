//! Entry naming and time-index resolution.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use serde::Serialize;

use crate::schema::{
    DATASET_SUFFIX, GROUP_ATTRIBUTES_ENTRY, MASS_SPECTRA_GROUP, MIMETYPE_ENTRY, RAW_DATASET,
};

/// Location of one time-index dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ContainerAddress {
    /// Scan group path, including any `mass_spectra/` prefix
    pub scan: String,
    /// Time-index dataset key
    pub time_key: String,
}

impl ContainerAddress {
    /// Create an address
    pub fn new(scan: impl Into<String>, time_key: impl Into<String>) -> Self {
        Self {
            scan: scan.into(),
            time_key: time_key.into(),
        }
    }

    /// ZIP entry name of the dataset
    pub fn entry_name(&self) -> String {
        dataset_entry(&self.scan, &self.time_key)
    }
}

impl fmt::Display for ContainerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.scan, self.time_key)
    }
}

/// Entry name of a dataset inside a group
pub fn dataset_entry(group: &str, name: &str) -> String {
    format!("{}/{}{}", group, name, DATASET_SUFFIX)
}

/// Entry name of the raw profile dataset of a scan group
pub fn raw_entry(group: &str) -> String {
    dataset_entry(group, RAW_DATASET)
}

/// Entry name of a group's attribute file; the empty group is the root.
pub fn group_attributes_entry(group: &str) -> String {
    if group.is_empty() {
        GROUP_ATTRIBUTES_ENTRY.to_string()
    } else {
        format!("{}/{}", group, GROUP_ATTRIBUTES_ENTRY)
    }
}

/// Integer value of a time-index key, `None` for non-numeric keys
pub fn parse_time_key(key: &str) -> Option<i64> {
    key.parse().ok()
}

/// Pick a time-index key.
///
/// Keys are ordered by integer value, never lexicographically, so `"10"`
/// follows `"2"`. Non-negative indices count from the oldest dataset and
/// negative ones from the newest (`-1` is the newest). Keys that are not
/// integers are ignored.
///
/// # Example
///
/// ```
/// use mzpeaklist::container::resolve_time_key;
///
/// assert_eq!(resolve_time_key(&["2", "10"], -1).as_deref(), Some("10"));
/// assert_eq!(resolve_time_key(&["2", "10"], 0).as_deref(), Some("2"));
/// assert_eq!(resolve_time_key(&["2", "10"], 2), None);
/// ```
pub fn resolve_time_key<S: AsRef<str>>(keys: &[S], time_index: i64) -> Option<String> {
    let mut numbered: Vec<(i64, &str)> = keys
        .iter()
        .filter_map(|k| parse_time_key(k.as_ref()).map(|n| (n, k.as_ref())))
        .collect();
    numbered.sort_by_key(|(n, _)| *n);

    let len = numbered.len() as i64;
    let position = if time_index < 0 {
        len + time_index
    } else {
        time_index
    };
    if !(0..len).contains(&position) {
        return None;
    }
    numbered.get(position as usize).map(|(_, k)| k.to_string())
}

/// Entries of one group, as found in the archive listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupEntries {
    /// The group has an `attributes.json`
    pub has_attributes: bool,
    /// The group has a `raw_ms` dataset
    pub has_raw: bool,
    /// Names of the other datasets, in archive order
    pub datasets: Vec<String>,
}

impl GroupEntries {
    /// Number of time-index datasets, which is also the next key to write
    pub fn time_index_count(&self) -> usize {
        self.datasets.len()
    }

    /// Dataset keys in integer order; non-numeric names sort last
    pub fn time_keys(&self) -> Vec<String> {
        let mut keys = self.datasets.clone();
        keys.sort_by(|a, b| match (parse_time_key(a), parse_time_key(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(b),
        });
        keys
    }
}

/// Group structure of a container, rebuilt from the ZIP entry names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerIndex {
    /// A `mimetype` entry is present
    pub has_mimetype: bool,
    /// A root `attributes.json` is present
    pub has_root_attributes: bool,
    groups: BTreeMap<String, GroupEntries>,
}

impl ContainerIndex {
    /// Build the index from archive entry names.
    pub fn from_entry_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = ContainerIndex::default();
        for name in names {
            let name = name.as_ref();
            if name == MIMETYPE_ENTRY {
                index.has_mimetype = true;
                continue;
            }
            if name == GROUP_ATTRIBUTES_ENTRY {
                index.has_root_attributes = true;
                continue;
            }
            if name.ends_with('/') {
                continue;
            }
            let Some((group, file)) = name.rsplit_once('/') else {
                debug!("Ignoring unexpected root entry '{}'", name);
                continue;
            };
            let entries = index.groups.entry(group.to_string()).or_default();
            if file == GROUP_ATTRIBUTES_ENTRY {
                entries.has_attributes = true;
            } else if let Some(stem) = file.strip_suffix(DATASET_SUFFIX) {
                if stem == RAW_DATASET {
                    entries.has_raw = true;
                } else {
                    entries.datasets.push(stem.to_string());
                }
            } else {
                debug!("Ignoring unexpected entry '{}'", name);
            }
        }
        index
    }

    /// Entries of a group path
    pub fn group(&self, path: &str) -> Option<&GroupEntries> {
        self.groups.get(path)
    }

    /// True if the group path exists
    pub fn contains_group(&self, path: &str) -> bool {
        self.groups.contains_key(path)
    }

    /// Group path of a scan: the label itself or `mass_spectra/{label}`.
    pub fn scan_path(&self, scan: &str) -> Option<String> {
        if self.groups.contains_key(scan) {
            return Some(scan.to_string());
        }
        let nested = format!("{}/{}", MASS_SPECTRA_GROUP, scan);
        self.groups.contains_key(&nested).then_some(nested)
    }

    /// Every scan group path, ordered by scan number where the label is numeric
    pub fn scans(&self) -> Vec<String> {
        let mut scans: Vec<String> = self.groups.keys().cloned().collect();
        scans.sort_by(|a, b| {
            match (parse_time_key(scan_label(a)), parse_time_key(scan_label(b))) {
                (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
                _ => a.cmp(b),
            }
        });
        scans
    }

    /// Iterate over `(group path, entries)` pairs
    pub fn groups(&self) -> impl Iterator<Item = (&str, &GroupEntries)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Last path segment of a scan group path
pub fn scan_label(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

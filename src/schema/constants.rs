/// Container format version - follows semantic versioning
pub const MZPEAKLIST_FORMAT_VERSION: &str = "1.0.0";

/// File extension for peak-list containers
pub const MZPEAKLIST_EXTENSION: &str = "mzpl";

/// MIME type stored as the first (uncompressed) entry of every container
pub const MZPEAKLIST_MIMETYPE: &str = "application/vnd.mzpeaklist";

/// Name of the mimetype entry
pub const MIMETYPE_ENTRY: &str = "mimetype";

/// Name of the group attribute entry (root and scan groups)
pub const GROUP_ATTRIBUTES_ENTRY: &str = "attributes.json";

/// Dataset name of the raw profile array inside a scan group
pub const RAW_DATASET: &str = "raw_ms";

/// File suffix of every dataset entry
pub const DATASET_SUFFIX: &str = ".parquet";

/// Optional parent group for multi-spectrum runs
pub const MASS_SPECTRA_GROUP: &str = "mass_spectra";

/// `data_structure` value written at the root
pub const DATA_STRUCTURE_MASS_SPECTRUM: &str = "mass_spectrum";

/// Heteroatom class sentinel for peaks without an assignment
pub const UNASSIGNED: &str = "unassigned";

/// Timestamp layout of every `date_utc` attribute
pub const DATE_UTC_FORMAT: &str = "%d/%m/%Y %H:%M:%S UTC";

// Root attributes

/// Creation timestamp (root and time-index datasets)
pub const ATTR_DATE_UTC: &str = "date_utc";
/// Source file name
pub const ATTR_FILE_NAME: &str = "file_name";
/// Kind of data stored in the container
pub const ATTR_DATA_STRUCTURE: &str = "data_structure";
/// Mass analyzer label
pub const ATTR_ANALYZER: &str = "analyzer";
/// Instrument label
pub const ATTR_INSTRUMENT_LABEL: &str = "instrument_label";
/// Sample name
pub const ATTR_SAMPLE_NAME: &str = "sample_name";

// Scan-level attribute groups

/// Spectrum-level attributes (polarity, rt, tic, calibration, noise)
pub const ATTR_MASS_SPEC_ATTRS: &str = "MassSpecAttrs";
/// Transient (frequency-domain) settings
pub const ATTR_TRANSIENT_SETTING: &str = "TransientSetting";

// Time-index attribute groups

/// Resolved column label list (JSON array)
pub const ATTR_COLUMNS_LABELS: &str = "ColumnsLabels";
/// Molecular formula search settings
pub const ATTR_MOLECULAR_SEARCH_SETTING: &str = "MoleculaSearchSetting";
/// Peak picking settings
pub const ATTR_MASS_SPEC_PEAK_SETTING: &str = "MassSpecPeakSetting";
/// Spectrum processing settings
pub const ATTR_MASS_SPECTRUM_SETTING: &str = "MassSpectrumSetting";

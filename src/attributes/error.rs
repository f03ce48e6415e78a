/// Errors that can occur while encoding, decoding or looking up attributes
#[derive(Debug, thiserror::Error)]
pub enum AttributeError {
    /// JSON serialization or parsing failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A stored attribute group is valid JSON but not an object
    #[error("Attribute group '{group}' is not a JSON object")]
    NotAnObject {
        /// Group name
        group: String,
    },

    /// The group or key was found in none of the lookup locations
    #[error("Missing attribute '{key}' in group '{group}' for scan {scan}")]
    MissingAttribute {
        /// Scan group label
        scan: String,
        /// Attribute group name
        group: String,
        /// Requested key inside the group
        key: String,
    },

    /// A required typed field is absent or has the wrong JSON type
    #[error("Invalid attribute '{key}' in group '{group}': {reason}")]
    InvalidAttribute {
        /// Attribute group name
        group: String,
        /// Key inside the group
        key: String,
        /// What was wrong with it
        reason: String,
    },
}

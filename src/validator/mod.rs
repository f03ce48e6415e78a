//! Integrity checks for `.mzpl` containers.
//!
//! 1. **Archive**: ZIP structure, `mimetype` first and stored
//! 2. **Root**: root attributes present and well-formed
//! 3. **Scans**: per-scan attributes resolve, time-index keys are contiguous integers
//! 4. **Tables**: sentinel columns, `Index` values, isotopologue back-references
//!
//! Failed checks make the report invalid; warnings flag files that read
//! fine but were not written the way this crate writes them.
//!
//! ```rust,no_run
//! use mzpeaklist::validator::validate_container;
//! use std::path::Path;
//!
//! let report = validate_container(Path::new("run.mzpl")).unwrap();
//! println!("{}", report);
//! ```

use std::path::Path;

use anyhow::Result;

use crate::container::ContainerReader;

pub use report::{CheckStatus, ValidationCheck, ValidationReport};

mod report;
mod structure;
mod tables;

#[cfg(test)]
mod tests;

/// Errors that stop validation early
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The file is not a container at all
    #[error("Structure error: {0}")]
    StructureError(String),
}

/// Validate a container file.
///
/// Returns `Err` only when the file cannot be inspected at all (missing,
/// not a ZIP archive). Everything else is reported as a check.
pub fn validate_container(path: &Path) -> Result<ValidationReport> {
    let mut report = ValidationReport::new(path.display().to_string());

    let bytes = structure::check_archive(path, &mut report)?;

    let mut reader = match ContainerReader::from_bytes(bytes) {
        Ok(reader) => reader,
        Err(e) => {
            report.add_check(ValidationCheck::failed("Container opens", e.to_string()));
            return Ok(report);
        }
    };

    structure::check_root(&reader, &mut report);
    structure::check_scans(&mut reader, &mut report);

    Ok(report)
}

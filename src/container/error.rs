use crate::attributes::AttributeError;
use crate::table::TableError;

/// Errors that can occur while writing or reading a container
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// Error from the Parquet library
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// Error from the Arrow library
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// JSON error in a group attribute entry
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Row codec error
    #[error(transparent)]
    TableError(#[from] TableError),

    /// Attribute codec or lookup error
    #[error(transparent)]
    AttributeError(#[from] AttributeError),

    /// The file is not a peak-list container
    #[error("Invalid container: {0}")]
    InvalidFormat(String),

    /// No scan group matches the requested scan
    #[error("Scan not found: {0}")]
    ScanNotFound(String),

    /// The requested time index does not exist in the scan group
    #[error("Time index {time_index} out of range for scan {scan} ({available} datasets)")]
    TimeIndexOutOfRange {
        /// Scan group label
        scan: String,
        /// Requested time index
        time_index: i64,
        /// Number of time-index datasets in the group
        available: usize,
    },

    /// The read options contradict each other
    #[error("Inconsistent request: {0}")]
    InconsistentRequest(String),

    /// Error reported by the background export worker
    #[error("Export worker error: {0}")]
    ExportWorkerError(String),

    /// The background export worker thread panicked
    #[error("Export worker thread panicked")]
    WorkerPanicked,
}

//! # mzPeakList - Annotated Peak Lists in Parquet
//!
//! `mzpeaklist` stores mass spectrometry peak lists together with their
//! molecular formula assignments in a single versioned container file.
//! Each export of a scan becomes a new snapshot, so the history of a
//! reprocessed spectrum is kept next to its latest result.
//!
//! ## Key Features
//!
//! - **Flat Tables**: every peak and formula candidate becomes one row with
//!   22 fixed columns followed by one atom-count column per element used.
//!
//! - **Snapshots**: scans hold any number of time-index datasets, addressed
//!   by `(scan, time_index)` with `-1` meaning the newest.
//!
//! - **Self-Describing**: spectrum attributes and processing settings are
//!   stored as canonical JSON next to the data they describe.
//!
//! - **Legacy Aware**: attribute lookups fall back through historical
//!   layouts and key spellings.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mzpeaklist::prelude::*;
//!
//! let candidate = FormulaCandidate::new(
//!     [("C", 16), ("H", 10), ("N", 1)],
//!     216.0819,
//!     IonType::DeOrProtonated,
//! )
//! .mz_error_ppm(0.12)
//! .confidence_score(0.92);
//!
//! let list = PeakListBuilder::new(0)
//!     .polarity(1)
//!     .add_peak(Peak::new(216.0820, 3.4e7, 1).with_candidate(candidate))
//!     .build();
//!
//! let writer = ContainerWriter::new("run.mzpl", WriterConfig::default());
//! let address = writer.write(&list, &SettingsSnapshot::default())?;
//!
//! let mut reader = ContainerReader::open("run.mzpl")?;
//! let snapshot = reader.read_snapshot(&address.scan, -1, &ReadOptions::default())?;
//! assert_eq!(snapshot.table.len(), 1);
//! # Ok::<(), mzpeaklist::container::ContainerError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`schema`]: column names, Arrow schemas, element ordering
//! - [`peak_list`]: peaks, formula candidates, peak lists
//! - [`table`]: the row codec (flatten and reconstruct)
//! - [`attributes`]: canonical JSON attribute groups
//! - [`compat`]: legacy attribute lookups
//! - [`container`]: the ZIP/Parquet container, reader, writer, export worker
//! - [`validator`]: container integrity checks
//!
//! Every dataset is a plain Parquet file stored uncompressed in the ZIP,
//! so it can be extracted and read with any Parquet tool.

pub mod attributes;
pub mod compat;
pub mod container;
pub mod peak_list;
pub mod schema;
pub mod table;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::attributes::{AcquisitionInfo, MassSpecAttrs, Settings, SettingsSnapshot};
    pub use crate::compat::CompatResolver;
    pub use crate::container::{
        CompressionType, ContainerAddress, ContainerError, ContainerReader, ContainerWriter,
        ExportTask, ExportWorker, ReadOptions, Snapshot, WriterConfig,
    };
    pub use crate::peak_list::{
        FormulaCandidate, IonType, Peak, PeakList, PeakListBuilder, RawProfile,
    };
    pub use crate::schema::{columns, ElementOrdering, MZPEAKLIST_FORMAT_VERSION};
    pub use crate::table::{
        CandidateSelection, FlatRecord, FlattenOptions, RecordTable, RowCodec, Value,
    };
    pub use crate::validator::{validate_container, ValidationReport};
}

//! The `.mzpl` container: a ZIP archive of Parquet datasets.
//!
//! # Layout
//!
//! ```text
//! run.mzpl
//! ├── mimetype              application/vnd.mzpeaklist (first, stored)
//! ├── attributes.json       root attributes
//! └── {scan}/               scan group, optionally under mass_spectra/
//!     ├── attributes.json   MassSpecAttrs, TransientSetting
//!     ├── raw_ms.parquet    raw profile (profile-mode scans only)
//!     ├── 0.parquet         time-index datasets, one per export
//!     └── 1.parquet
//! ```
//!
//! Every entry is stored uncompressed; Parquet compresses the columns.
//! Dataset attributes live in the Parquet footer key/value metadata.
//!
//! Writing appends: existing entries are never rewritten, so each export of
//! a scan adds a new time-index dataset next to the previous ones.
//!
//! # Example
//!
//! ```no_run
//! use mzpeaklist::prelude::*;
//!
//! let mut reader = ContainerReader::open("run.mzpl")?;
//! for scan in reader.scans() {
//!     let snapshot = reader.read_snapshot(&scan, -1, &ReadOptions::default())?;
//!     println!("{}: {} rows", snapshot.address, snapshot.table.len());
//! }
//! # Ok::<(), mzpeaklist::container::ContainerError>(())
//! ```

mod address;
mod config;
mod error;
mod export;
mod parquet_io;
mod reader;
mod writer;

#[cfg(test)]
mod tests;

pub use address::{
    dataset_entry, group_attributes_entry, parse_time_key, raw_entry, resolve_time_key,
    scan_label, ContainerAddress, ContainerIndex, GroupEntries,
};
pub use config::{CompressionType, ReadOptions, WriterConfig};
pub use error::ContainerError;
pub use export::{ExportTask, ExportWorker, DEFAULT_QUEUE_CAPACITY};
pub use reader::{ContainerReader, Snapshot};
pub use writer::ContainerWriter;

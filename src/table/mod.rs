//! # Row Codec
//!
//! Flattens a [`PeakList`](crate::peak_list::PeakList) into one record per
//! (peak, candidate) pair and reconstructs typed peaks from stored records.
//!
//! ## Row Selection
//!
//! Four independent flags shape the output (see [`FlattenOptions`]):
//!
//! - `include_no_match` / `no_match_inline`: whether unassigned peaks are
//!   emitted, and whether at their natural position or appended at the end
//! - `include_isotopologues` / `isotopologue_inline`: the same for
//!   isotopologue candidates, which when deferred are appended after the
//!   main pass and before deferred unassigned rows
//!
//! Identical records are removed, keeping the first occurrence.
//!
//! ## Column Set
//!
//! The 22 core columns, then any requested derived columns, then one
//! column per element used by any candidate, in element-priority order.
//!
//! ```
//! use mzpeaklist::peak_list::{FormulaCandidate, IonType, Peak, PeakListBuilder};
//! use mzpeaklist::table::{FlattenOptions, RowCodec};
//!
//! let list = PeakListBuilder::new(0)
//!     .add_peak(Peak::new(179.0562, 1.0e6, -1).with_candidate(
//!         FormulaCandidate::new([("C", 6), ("H", 12), ("O", 6)], 179.0561, IonType::DeOrProtonated),
//!     ))
//!     .add_peak(Peak::new(181.1, 2.0e3, -1))
//!     .build();
//!
//! let codec = RowCodec::default();
//! let table = codec.flatten(&list, &FlattenOptions::default())?;
//! assert_eq!(table.len(), 2);
//! assert_eq!(&table.labels[22..], ["C", "H", "O"]);
//!
//! let table = codec.reconstruct(table)?;
//! let peaks = codec.build_peaks(&table)?;
//! assert_eq!(peaks, list.peaks);
//! # Ok::<(), mzpeaklist::table::TableError>(())
//! ```

mod arrow_io;
mod codec;
mod error;
mod flatten;
mod options;
mod reconstruct;
mod record;


pub use arrow_io::{
    raw_profile_to_record_batch, record_batches_to_raw_profile, record_batches_to_table,
    table_to_record_batch,
};
pub use codec::RowCodec;
pub use error::TableError;
pub use flatten::RowVariant;
pub use options::{AdditionalColumn, CandidateSelection, FlattenOptions};
pub use record::{FlatRecord, RecordTable, Value};

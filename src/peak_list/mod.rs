//! # Peak List Model
//!
//! The in-memory object graph exchanged with the container: a [`PeakList`]
//! of [`Peak`]s, each owning zero or more [`FormulaCandidate`]s.
//! Isotopologue candidates point back at the peak holding their
//! monoisotopic parent by position.
//!
//! ```
//! use mzpeaklist::peak_list::{FormulaCandidate, IonType, Peak, PeakListBuilder};
//!
//! let mono = FormulaCandidate::new([("C", 6), ("H", 12), ("O", 6)], 179.0561, IonType::DeOrProtonated)
//!     .confidence_score(0.9);
//! let iso = FormulaCandidate::new([("C", 5), ("H", 12), ("O", 6), ("13C", 1)], 180.0595, IonType::DeOrProtonated)
//!     .isotopologue_of(0);
//!
//! let list = PeakListBuilder::new(1)
//!     .polarity(-1)
//!     .add_peak(Peak::new(179.0562, 1.0e6, -1).with_candidate(mono))
//!     .add_peak(Peak::new(180.0596, 6.5e4, -1).with_candidate(iso))
//!     .add_peak(Peak::new(181.1, 2.0e3, -1))
//!     .build();
//!
//! assert_eq!(list.assigned_count(), 2);
//! ```

mod formula;
mod types;

#[cfg(test)]
mod tests;

pub use formula::{parse_formula, CandidateKind, FormulaCandidate, IonType};
pub use types::{Peak, PeakList, PeakListBuilder, RawProfile};

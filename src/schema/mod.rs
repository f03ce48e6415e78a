//! # Peak Table Schema
//!
//! Column names, Arrow types and element ordering for the annotated peak
//! table stored in every time-index dataset of a container.
//!
//! ## Row Model
//!
//! One row per (peak, formula candidate) pair. A peak with three candidates
//! yields three rows sharing the same `Index`; a peak without any assignment
//! yields a single row with `Heteroatom Class = "unassigned"`.
//!
//! ## Schema Columns
//!
//! | Column | Type | Notes |
//! |--------|------|-------|
//! | Index | Int64 | Peak position, join key |
//! | m/z, Calibrated m/z, Calculated m/z | Float64 | |
//! | Peak Height, Peak Area, Resolving Power, S/N | Float64 | |
//! | Ion Charge | Int64 (nullable) | |
//! | m/z Error (ppm), m/z Error Score, Isotopologue Similarity, Confidence Score | Float64 | null when unassigned |
//! | DBE, O/C, H/C | Float64 | null when unassigned |
//! | Heteroatom Class, Ion Type, Adduct, Molecular Formula | Utf8 | |
//! | Is Isotopologue, Mono Isotopic Index | Int64 (nullable) | |
//! | one column per element | Int64 (nullable) | priority order, see [`ElementOrdering`] |
//!
//! Optional derived columns (`Aromaticity Index`, `NOSC`, ...) are Float64
//! and sit between the core columns and the atom columns.

mod builders;
/// Peak table column name constants.
pub mod columns;
mod constants;
/// Element priority ordering.
pub mod elements;
mod validation;


pub use builders::{
    column_data_type, create_peak_table_schema, create_peak_table_schema_arc,
    create_raw_profile_schema, create_raw_profile_schema_arc,
};
pub use columns::*;
pub use constants::*;
pub use elements::{base_element, is_isotope_label, ElementOrdering, DEFAULT_ELEMENT_ORDER};
pub use validation::{validate_labels, validate_schema, SchemaValidationError};

//! # Legacy Attribute Compatibility
//!
//! Per-scan metadata (`MassSpecAttrs`, `TransientSetting`) has lived in two
//! places over the format's history:
//!
//! 1. on the `raw_ms` profile dataset (oldest layout), and
//! 2. on the scan group itself (current layout, also used for centroid data).
//!
//! [`CompatResolver`] tries these in order, and inside the group that was
//! found retries a missing key once under its historical misspelling
//! (`baseline` stored as `baselise`).

mod resolver;

#[cfg(test)]
mod tests;

pub use resolver::{AttributeSource, CompatResolver, KeyRename, ScanAttributes};

//! Output writers.
//!
//! - [`json`]: writes result envelopes to per-profile directories.

pub mod json;

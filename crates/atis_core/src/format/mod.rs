//! Canonical aviation phraseology for validated values.
//!
//! Formatting is total over valid values: everything here assumes the
//! input already passed validation and never re-checks ranges.

mod formatter;
mod wind;

pub use formatter::FieldFormatter;
pub use wind::{wind_group, WindComponents};

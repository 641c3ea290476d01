//! Derived phrases and their dependency table.
//!
//! Each derived phrase reads a fixed set of raw fields (see
//! [`DerivedFieldId::dependencies`]). When a raw field changes only the
//! phrases that read it are recomputed, always from last-valid values.

mod graph;

pub use graph::DerivationGraph;

pub use crate::models::DerivedFieldId;

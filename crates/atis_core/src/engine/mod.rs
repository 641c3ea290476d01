//! The reactive controller.
//!
//! [`AtisEngine`] owns the field table and drives every input event through
//! validation, formatting, derivation and composition, then publishes the
//! result to subscribers. Exactly one [`Publication`] is sent per event,
//! whether the input was accepted or not.

mod controller;
mod field;
mod publication;

pub use controller::AtisEngine;
pub use field::RawField;
pub use publication::{EngineSnapshot, Publication, SubscriberId, TranscriptCallback};

//! Transcript composition and export.
//!
//! The composer is a pure function of a [`TranscriptSnapshot`]; the engine
//! builds a fresh snapshot after every event.

mod composer;
mod export;

pub use composer::{Transcript, TranscriptComposer, TranscriptSnapshot};
pub use export::TranscriptExport;

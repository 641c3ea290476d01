//! ATIS Core - Transcript composition engine for ATIS broadcasts
//!
//! This crate contains all field validation, phraseology and composition
//! logic with zero UI dependencies. It can be driven by a GUI form or by
//! the `atis` command-line tool.
//!
//! ```
//! use atis_core::config::Settings;
//! use atis_core::engine::AtisEngine;
//! use atis_core::models::RawFieldId;
//!
//! let mut engine = AtisEngine::new(&Settings::default());
//! engine.update(RawFieldId::Airport, "ksea").unwrap();
//! engine.update(RawFieldId::InformationLetter, "a").unwrap();
//! assert_eq!(
//!     engine.transcript().as_str(),
//!     "KSEA. INFORMATION ALPHA. ///. WIND ///. VISIBILITY ///. TEMPERATURE ///. \
//!      ALTIMETER ///. ADVISE ON INITIAL CONTACT YOU HAVE INFORMATION ALPHA."
//! );
//! ```

pub mod config;
pub mod derive;
pub mod engine;
pub mod format;
pub mod logging;
pub mod models;
pub mod transcript;
pub mod validation;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

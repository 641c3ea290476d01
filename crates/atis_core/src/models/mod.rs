//! Data models for the ATIS composer.
//!
//! This module contains the core data structures shared by every stage:
//! - Field identifiers for raw inputs and derived phrases
//! - Typed normalized values (visibility fractions, altimeter settings, ...)
//! - Enums for configurable rendering (wind style, altimeter unit)

mod enums;
mod fields;
mod values;

pub use enums::{AltimeterUnit, WindStyle};
pub use fields::{DerivedFieldId, RawFieldId, UnknownFieldError};
pub use values::{
    Altimeter, FieldValue, InformationLetter, ObservationTime, ValidValues, Visibility,
    HPA_PER_INHG, PHONETIC_ALPHABET,
};

//! Raw input validation.
//!
//! Each raw field has one validation rule. Cross-field rules (dewpoint vs.
//! temperature, gust vs. velocity) read the last-valid value of the other
//! field and never modify it.

mod errors;
mod validator;

pub use errors::{ErrorKind, FieldError, ValidationResult};
pub use validator::FieldValidator;

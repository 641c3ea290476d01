//! Field-level validation errors.
//!
//! Every error names the field it belongs to and the raw input that was
//! rejected. Errors never span more than one field.

use serde::Serialize;
use thiserror::Error;

use crate::models::{FieldValue, RawFieldId};

/// Category of a rejected input, as shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Malformed input shape.
    FormatError,
    /// Numeric or alphabet value out of bounds.
    RangeError,
    /// Cross-field violation (dewpoint above temperature, gust not above
    /// velocity).
    ConsistencyError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::FormatError => write!(f, "FormatError"),
            ErrorKind::RangeError => write!(f, "RangeError"),
            ErrorKind::ConsistencyError => write!(f, "ConsistencyError"),
        }
    }
}

/// A rejected raw input.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum FieldError {
    #[error("{field}: malformed input '{raw}': {message}")]
    #[serde(rename = "FormatError")]
    Format {
        field: RawFieldId,
        raw: String,
        message: String,
    },

    #[error("{field}: '{raw}' out of range: {message}")]
    #[serde(rename = "RangeError")]
    Range {
        field: RawFieldId,
        raw: String,
        message: String,
    },

    #[error("{field}: '{raw}' inconsistent: {message}")]
    #[serde(rename = "ConsistencyError")]
    Consistency {
        field: RawFieldId,
        raw: String,
        message: String,
    },
}

impl FieldError {
    /// Create a format error.
    pub fn format(field: RawFieldId, raw: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Format {
            field,
            raw: raw.into(),
            message: message.into(),
        }
    }

    /// Create a range error.
    pub fn range(field: RawFieldId, raw: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Range {
            field,
            raw: raw.into(),
            message: message.into(),
        }
    }

    /// Create a consistency error.
    pub fn consistency(
        field: RawFieldId,
        raw: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Consistency {
            field,
            raw: raw.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Format { .. } => ErrorKind::FormatError,
            Self::Range { .. } => ErrorKind::RangeError,
            Self::Consistency { .. } => ErrorKind::ConsistencyError,
        }
    }

    pub fn field(&self) -> RawFieldId {
        match self {
            Self::Format { field, .. }
            | Self::Range { field, .. }
            | Self::Consistency { field, .. } => *field,
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            Self::Format { raw, .. } | Self::Range { raw, .. } | Self::Consistency { raw, .. } => {
                raw
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Format { message, .. }
            | Self::Range { message, .. }
            | Self::Consistency { message, .. } => message,
        }
    }
}

/// Outcome of validating one raw input.
pub type ValidationResult = Result<FieldValue, FieldError>;

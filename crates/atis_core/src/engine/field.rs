use serde::Serialize;

use crate::models::{FieldValue, RawFieldId};

/// One operator input and its last-valid state.
///
/// The raw text and the valid value are tracked separately: a rejected
/// edit updates `raw` but leaves `value` and `text` as they were.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawField {
    pub id: RawFieldId,
    /// Last entered text, accepted or not.
    pub raw: Option<String>,
    /// Last valid normalized value.
    pub value: Option<FieldValue>,
    /// Canonical text of `value`.
    pub text: Option<String>,
}

impl RawField {
    pub fn new(id: RawFieldId) -> Self {
        Self {
            id,
            raw: None,
            value: None,
            text: None,
        }
    }

    /// A field that starts out valid without operator input.
    pub fn with_default(id: RawFieldId, value: FieldValue, text: String) -> Self {
        Self {
            id,
            raw: None,
            value: Some(value),
            text: Some(text),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }

    pub fn is_entered(&self) -> bool {
        self.raw.is_some()
    }
}

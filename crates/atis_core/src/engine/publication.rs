use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{DerivedFieldId, RawFieldId};
use crate::transcript::Transcript;
use crate::validation::FieldError;

use super::field::RawField;

/// Handle returned by [`AtisEngine::subscribe`](super::AtisEngine::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SubscriberId(pub(crate) u64);

/// Subscriber callback.
pub type TranscriptCallback = Box<dyn Fn(&Publication) + Send + Sync>;

/// What subscribers receive after every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Publication {
    /// Increases by one per event, starting at 1.
    pub sequence: u64,
    /// The field the event targeted.
    pub field: RawFieldId,
    pub accepted: bool,
    /// Current transcript. Unchanged from the previous publication when
    /// the input was rejected.
    pub transcript: Transcript,
    /// Outstanding error per field.
    pub errors: BTreeMap<RawFieldId, FieldError>,
    /// Derived phrases recomputed by this event.
    pub recomputed: Vec<DerivedFieldId>,
}

impl Publication {
    /// The error for the event's own field, if it was rejected.
    pub fn rejection(&self) -> Option<&FieldError> {
        if self.accepted {
            None
        } else {
            self.errors.get(&self.field)
        }
    }
}

/// Read-only view of the whole engine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineSnapshot {
    pub sequence: u64,
    pub fields: Vec<RawField>,
    pub derived: BTreeMap<DerivedFieldId, Option<String>>,
    pub errors: BTreeMap<RawFieldId, FieldError>,
    pub transcript: Transcript,
}

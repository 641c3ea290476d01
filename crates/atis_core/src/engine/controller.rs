use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::derive::DerivationGraph;
use crate::format::FieldFormatter;
use crate::logging::SessionLogger;
use crate::models::{DerivedFieldId, FieldValue, RawFieldId, ValidValues};
use crate::transcript::{Transcript, TranscriptComposer, TranscriptExport, TranscriptSnapshot};
use crate::validation::{FieldError, FieldValidator};

use super::field::RawField;
use super::publication::{EngineSnapshot, Publication, SubscriberId, TranscriptCallback};

/// One composing session.
///
/// Every event takes `&mut self`, so events are processed one at a time
/// and each runs to completion before the next is accepted.
pub struct AtisEngine {
    validator: FieldValidator,
    formatter: FieldFormatter,
    graph: DerivationGraph,
    composer: TranscriptComposer,
    fields: BTreeMap<RawFieldId, RawField>,
    values: ValidValues,
    errors: BTreeMap<RawFieldId, FieldError>,
    transcript: Transcript,
    started: bool,
    sequence: u64,
    subscribers: Vec<(SubscriberId, TranscriptCallback)>,
    next_subscriber: u64,
    logger: Option<Arc<SessionLogger>>,
}

impl AtisEngine {
    /// Create an engine with every field in its initial state.
    ///
    /// The variable-wind flag starts valid as `false` and the gust starts
    /// valid as "no gust"; all other fields start never entered.
    pub fn new(settings: &Settings) -> Self {
        let formatter = FieldFormatter::new(settings);
        let mut values = ValidValues::new();
        let mut fields = BTreeMap::new();

        for &id in RawFieldId::all() {
            let initial = match id {
                RawFieldId::WindVariableFlag => Some(FieldValue::Flag(false)),
                RawFieldId::WindGust => Some(FieldValue::Gust(None)),
                _ => None,
            };
            let field = match initial {
                Some(value) => {
                    let text = formatter.format(id, &value);
                    values.set(id, value.clone());
                    RawField::with_default(id, value, text)
                }
                None => RawField::new(id),
            };
            fields.insert(id, field);
        }

        let mut graph = DerivationGraph::new(settings);
        graph.recompute_all(&values);

        let mut engine = Self {
            validator: FieldValidator::new(settings),
            formatter,
            graph,
            composer: TranscriptComposer::new(settings),
            fields,
            values,
            errors: BTreeMap::new(),
            transcript: Transcript::default(),
            started: false,
            sequence: 0,
            subscribers: Vec::new(),
            next_subscriber: 0,
            logger: None,
        };
        engine.transcript = engine.recompose();
        engine
    }

    /// Attach a session logger that records accepted and rejected edits.
    pub fn with_logger(mut self, logger: Arc<SessionLogger>) -> Self {
        logger.section("Session");
        self.logger = Some(logger);
        self
    }

    pub fn logger(&self) -> Option<&Arc<SessionLogger>> {
        self.logger.as_ref()
    }

    /// Process one input change.
    ///
    /// On success the value is stored, dependent phrases are recomputed and
    /// the transcript is rebuilt. On failure the previous value and the
    /// transcript are kept and the error is recorded against the field.
    /// Subscribers are notified either way.
    pub fn update(&mut self, field: RawFieldId, raw: &str) -> Result<Transcript, FieldError> {
        debug!(field = %field, raw, "Processing input");
        self.started = true;
        if let Some(entry) = self.fields.get_mut(&field) {
            entry.raw = Some(raw.to_string());
        }

        match self.validator.validate(field, raw, &self.values) {
            Ok(value) => {
                let text = self.formatter.format(field, &value);
                if let Some(log) = &self.logger {
                    log.accepted(field.name(), if text.is_empty() { raw.trim() } else { &text });
                }

                self.values.set(field, value.clone());
                if let Some(entry) = self.fields.get_mut(&field) {
                    entry.value = Some(value);
                    entry.text = Some(text);
                }
                self.errors.remove(&field);

                let recomputed = self.graph.on_raw_field_changed(field, &self.values);
                if let Some(log) = &self.logger {
                    for id in &recomputed {
                        log.derived(id.name(), self.graph.get(*id).unwrap_or("-"));
                    }
                }

                self.transcript = self.recompose();
                self.publish(field, true, recomputed);
                Ok(self.transcript.clone())
            }
            Err(err) => {
                warn!(field = %field, kind = %err.kind(), "{}", err);
                if let Some(log) = &self.logger {
                    log.rejected(field.name(), &err.to_string());
                }
                self.errors.insert(field, err.clone());
                self.publish(field, false, Vec::new());
                Err(err)
            }
        }
    }

    /// Move the information letter to the next one in the rotation.
    pub fn advance_information(&mut self) -> Result<Transcript, FieldError> {
        let next = self.validator.next_letter(self.values.information());
        self.update(RawFieldId::InformationLetter, &next.letter().to_string())
    }

    /// Set the observation time from a clock reading.
    pub fn set_time_from(&mut self, now: DateTime<Utc>) -> Result<Transcript, FieldError> {
        self.update(RawFieldId::Time, &now.format("%H%M").to_string())
    }

    /// Set the variable-wind flag.
    pub fn set_flag(&mut self, variable: bool) -> Result<Transcript, FieldError> {
        self.update(RawFieldId::WindVariableFlag, if variable { "true" } else { "false" })
    }

    /// Register a callback that receives every publication.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriberId
    where
        F: Fn(&Publication) + Send + Sync + 'static,
    {
        self.next_subscriber += 1;
        let id = SubscriberId(self.next_subscriber);
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Last entered text for `field`, accepted or not.
    pub fn raw_input(&self, field: RawFieldId) -> Option<&str> {
        self.fields.get(&field).and_then(|f| f.raw.as_deref())
    }

    /// Canonical text of the last valid value.
    pub fn field_text(&self, field: RawFieldId) -> Option<&str> {
        self.fields.get(&field).and_then(|f| f.text.as_deref())
    }

    pub fn value(&self, field: RawFieldId) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn derived(&self, id: DerivedFieldId) -> Option<&str> {
        self.graph.get(id)
    }

    pub fn errors(&self) -> &BTreeMap<RawFieldId, FieldError> {
        &self.errors
    }

    pub fn error(&self, field: RawFieldId) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    /// Number of events processed so far.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            sequence: self.sequence,
            fields: self.fields.values().cloned().collect(),
            derived: self.graph.phrases().clone(),
            errors: self.errors.clone(),
            transcript: self.transcript.clone(),
        }
    }

    /// The current transcript as a named plain-text file.
    pub fn export_transcript(&self) -> TranscriptExport {
        let export = TranscriptExport::new(
            self.values.airport(),
            self.values.information(),
            self.values.time(),
            &self.transcript,
        );
        info!(filename = %export.filename, "Prepared transcript export");
        if let Some(log) = &self.logger {
            log.export(&export.filename);
        }
        export
    }

    fn recompose(&self) -> Transcript {
        let text = |id| self.field_text(id).map(str::to_string);
        let phrase = |id| self.graph.get(id).map(str::to_string);

        let snapshot = TranscriptSnapshot {
            started: self.started,
            airport: text(RawFieldId::Airport),
            information: text(RawFieldId::InformationLetter),
            information_word: self.values.information().map(|l| l.word()),
            time: text(RawFieldId::Time),
            wind: phrase(DerivedFieldId::WindPhrase).map(|w| format!("WIND {}", w)),
            visibility: phrase(DerivedFieldId::VisibilityPhrase),
            temperature: text(RawFieldId::Temperature),
            dewpoint: text(RawFieldId::Dewpoint),
            spread_warning: phrase(DerivedFieldId::SpreadWarning),
            altimeter: phrase(DerivedFieldId::AltimeterPhrase),
        };
        self.composer.compose(&snapshot)
    }

    fn publish(&mut self, field: RawFieldId, accepted: bool, recomputed: Vec<DerivedFieldId>) {
        self.sequence += 1;
        let publication = Publication {
            sequence: self.sequence,
            field,
            accepted,
            transcript: self.transcript.clone(),
            errors: self.errors.clone(),
            recomputed,
        };
        for (_, callback) in &self.subscribers {
            callback(&publication);
        }
    }
}

impl std::fmt::Debug for AtisEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtisEngine")
            .field("sequence", &self.sequence)
            .field("transcript", &self.transcript)
            .field("errors", &self.errors)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{init_test_tracing, LogConfig};
    use crate::validation::ErrorKind;
    use chrono::TimeZone;
    use std::sync::Mutex;

    fn engine() -> AtisEngine {
        init_test_tracing();
        AtisEngine::new(&Settings::default())
    }

    #[test]
    fn starts_empty_with_default_wind_fields() {
        let e = engine();
        assert!(e.transcript().is_empty());
        assert_eq!(e.value(RawFieldId::WindVariableFlag), Some(&FieldValue::Flag(false)));
        assert_eq!(e.value(RawFieldId::WindGust), Some(&FieldValue::Gust(None)));
        assert_eq!(e.raw_input(RawFieldId::WindGust), None);
        assert_eq!(e.sequence(), 0);
    }

    #[test]
    fn rejected_input_keeps_previous_value() {
        let mut e = engine();
        e.update(RawFieldId::Airport, "ksea").unwrap();
        let before = e.transcript().clone();

        let err = e.update(RawFieldId::Airport, "KS").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FormatError);
        assert_eq!(e.raw_input(RawFieldId::Airport), Some("KS"));
        assert_eq!(e.field_text(RawFieldId::Airport), Some("KSEA"));
        assert_eq!(e.transcript(), &before);
        assert!(e.error(RawFieldId::Airport).is_some());

        e.update(RawFieldId::Airport, "KPDX").unwrap();
        assert!(e.errors().is_empty());
    }

    #[test]
    fn one_publication_per_event() {
        let mut e = engine();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        e.subscribe(move |p: &Publication| {
            sink.lock().unwrap().push((p.sequence, p.accepted));
        });

        e.update(RawFieldId::WindVelocity, "12").unwrap();
        e.update(RawFieldId::WindGust, "10").unwrap_err();
        e.update(RawFieldId::WindGust, "22").unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![(1, true), (2, false), (3, true)]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut e = engine();
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        let id = e.subscribe(move |_| *sink.lock().unwrap() += 1);

        e.update(RawFieldId::Airport, "KSEA").unwrap();
        assert!(e.unsubscribe(id));
        assert!(!e.unsubscribe(id));
        e.update(RawFieldId::Airport, "KPDX").unwrap();

        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn advance_cycles_letters() {
        let mut e = engine();
        e.advance_information().unwrap();
        assert_eq!(e.field_text(RawFieldId::InformationLetter), Some("INFORMATION ALPHA"));

        e.update(RawFieldId::InformationLetter, "h").unwrap();
        e.advance_information().unwrap();
        assert_eq!(e.field_text(RawFieldId::InformationLetter), Some("INFORMATION JULIETT"));
    }

    #[test]
    fn time_from_clock() {
        let mut e = engine();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 7, 4, 59).unwrap();
        e.set_time_from(now).unwrap();
        assert_eq!(e.field_text(RawFieldId::Time), Some("0704Z"));
    }

    #[test]
    fn variable_flag_changes_wind_phrase() {
        let mut e = engine();
        e.update(RawFieldId::WindDirection, "310").unwrap();
        e.update(RawFieldId::WindVelocity, "5").unwrap();
        assert_eq!(e.derived(DerivedFieldId::WindPhrase), Some("31005KT"));
        e.set_flag(true).unwrap();
        assert_eq!(e.derived(DerivedFieldId::WindPhrase), Some("VRB05KT"));
    }

    #[test]
    fn gust_over_zero_velocity_keeps_gust() {
        let mut e = engine();
        e.update(RawFieldId::WindDirection, "310").unwrap();
        e.update(RawFieldId::WindVelocity, "0").unwrap();
        assert_eq!(e.derived(DerivedFieldId::WindPhrase), Some("00000KT"));

        e.update(RawFieldId::WindGust, "15").unwrap();
        assert_eq!(e.derived(DerivedFieldId::WindPhrase), Some("31000G15KT"));
        assert!(e.transcript().as_str().contains("WIND 31000G15KT."));
    }

    #[test]
    fn fully_excluded_alphabet_still_advances() {
        let mut settings = Settings::default();
        settings.alphabet.excluded = "ABCDEFGHIJKLMNOPQRSTUVWXYZ".to_string();
        let mut e = AtisEngine::new(&settings);

        e.advance_information().unwrap();
        assert_eq!(e.field_text(RawFieldId::InformationLetter), Some("INFORMATION ALPHA"));
        e.advance_information().unwrap();
        assert_eq!(e.field_text(RawFieldId::InformationLetter), Some("INFORMATION BRAVO"));
        e.update(RawFieldId::InformationLetter, "o").unwrap();
    }

    #[test]
    fn session_logger_records_edits() {
        let logger = Arc::new(SessionLogger::in_memory("test", LogConfig::default(), None));
        let mut e = engine().with_logger(Arc::clone(&logger));
        e.update(RawFieldId::Temperature, "18").unwrap();
        e.update(RawFieldId::Dewpoint, "20").unwrap_err();

        let tail = logger.get_tail();
        assert_eq!(tail.len(), 1);
        assert!(tail[0].contains("dewpoint"));
    }

    #[test]
    fn snapshot_serializes() {
        let mut e = engine();
        e.update(RawFieldId::Airport, "KSEA").unwrap();
        let json = serde_json::to_string(&e.snapshot()).unwrap();
        assert!(json.contains("\"transcript\""));
        assert!(json.contains("KSEA"));
    }
}

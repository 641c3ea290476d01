use std::fmt;

use serde::Serialize;

use crate::config::Settings;
use crate::models::AltimeterUnit;

/// The broadcast text, rebuilt in full on every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript(String);

impl Transcript {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Segments in broadcast order, without the trailing period.
    pub fn segments(&self) -> Vec<&str> {
        self.0
            .trim_end_matches('.')
            .split(". ")
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Segment texts the composer reads. `None` means never entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptSnapshot {
    /// Whether the session has processed at least one event.
    pub started: bool,
    pub airport: Option<String>,
    /// `INFORMATION ALPHA`.
    pub information: Option<String>,
    /// Phonetic word of the current letter, for the closing line.
    pub information_word: Option<&'static str>,
    pub time: Option<String>,
    pub wind: Option<String>,
    pub visibility: Option<String>,
    pub temperature: Option<String>,
    pub dewpoint: Option<String>,
    pub spread_warning: Option<String>,
    pub altimeter: Option<String>,
}

/// Joins field texts in fixed broadcast order.
#[derive(Debug, Clone)]
pub struct TranscriptComposer {
    placeholder: String,
    closing: bool,
    altimeter_label: &'static str,
}

impl TranscriptComposer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            placeholder: settings.transcript.placeholder.clone(),
            closing: settings.transcript.closing,
            altimeter_label: match settings.altimeter.unit {
                AltimeterUnit::InHg => "ALTIMETER ",
                AltimeterUnit::Hpa => "QNH ",
            },
        }
    }

    pub fn compose(&self, snapshot: &TranscriptSnapshot) -> Transcript {
        let mut segments: Vec<String> = Vec::with_capacity(8);

        self.push(&mut segments, snapshot.started, snapshot.airport.as_deref(), "");
        self.push(
            &mut segments,
            snapshot.started,
            snapshot.information.as_deref(),
            "INFORMATION ",
        );
        self.push(&mut segments, snapshot.started, snapshot.time.as_deref(), "");
        self.push(&mut segments, snapshot.started, snapshot.wind.as_deref(), "WIND ");
        self.push(
            &mut segments,
            snapshot.started,
            snapshot.visibility.as_deref(),
            "VISIBILITY ",
        );

        if let Some(temp) = self.temperature(snapshot) {
            segments.push(temp);
        }

        self.push(
            &mut segments,
            snapshot.started,
            snapshot.altimeter.as_deref(),
            self.altimeter_label,
        );

        if self.closing {
            if let Some(word) = snapshot.information_word {
                segments.push(format!(
                    "ADVISE ON INITIAL CONTACT YOU HAVE INFORMATION {}",
                    word
                ));
            }
        }

        if segments.is_empty() {
            return Transcript::default();
        }
        Transcript(format!("{}.", segments.join(". ")))
    }

    /// Push `text`, or the prefixed placeholder once the session has
    /// started.
    fn push(
        &self,
        segments: &mut Vec<String>,
        started: bool,
        text: Option<&str>,
        prefix: &str,
    ) {
        match text {
            Some(t) => segments.push(t.to_string()),
            None if started => segments.push(format!("{}{}", prefix, self.placeholder)),
            None => {}
        }
    }

    fn temperature(&self, snapshot: &TranscriptSnapshot) -> Option<String> {
        let (temp, dew) = (snapshot.temperature.as_deref(), snapshot.dewpoint.as_deref());
        if temp.is_none() && dew.is_none() {
            return snapshot
                .started
                .then(|| format!("TEMPERATURE {}", self.placeholder));
        }
        let mut out = format!(
            "TEMPERATURE {}/{}",
            temp.unwrap_or(&self.placeholder),
            dew.unwrap_or(&self.placeholder)
        );
        if let Some(warning) = &snapshot.spread_warning {
            out.push(' ');
            out.push_str(warning);
        }
        Some(out)
    }
}

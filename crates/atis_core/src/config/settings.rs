//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.
//! Every field has a documented default so an empty file is a valid config.

use serde::{Deserialize, Serialize};

use super::manager::{ConfigError, ConfigResult};
use crate::logging::LogLevel;
use crate::models::{AltimeterUnit, InformationLetter, WindStyle};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Information letter alphabet.
    #[serde(default)]
    pub alphabet: AlphabetSettings,

    /// Advisory thresholds.
    #[serde(default)]
    pub advisory: AdvisorySettings,

    /// Visibility parsing and phrasing.
    #[serde(default)]
    pub visibility: VisibilitySettings,

    /// Altimeter ranges and broadcast unit.
    #[serde(default)]
    pub altimeter: AltimeterSettings,

    /// Wind limits and phrasing.
    #[serde(default)]
    pub wind: WindSettings,

    /// Transcript composition.
    #[serde(default)]
    pub transcript: TranscriptSettings,

    /// Export destination.
    #[serde(default)]
    pub export: ExportSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Reject combinations no session could work with.
    pub fn check(&self) -> ConfigResult<()> {
        if self.visibility.denominators.contains(&0) {
            return Err(ConfigError::invalid(
                "visibility.denominators",
                "zero is not a denominator",
            ));
        }
        if self.altimeter.min_inhg > self.altimeter.max_inhg {
            return Err(ConfigError::invalid(
                "altimeter.min_inhg",
                format!(
                    "{} is above max_inhg {}",
                    self.altimeter.min_inhg, self.altimeter.max_inhg
                ),
            ));
        }
        if self.altimeter.min_hpa > self.altimeter.max_hpa {
            return Err(ConfigError::invalid(
                "altimeter.min_hpa",
                format!(
                    "{} is above max_hpa {}",
                    self.altimeter.min_hpa, self.altimeter.max_hpa
                ),
            ));
        }
        if self.transcript.placeholder.contains(". ") {
            return Err(ConfigError::invalid(
                "transcript.placeholder",
                "must not contain the segment separator",
            ));
        }
        Ok(())
    }
}

/// Which letters may be used as the information identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlphabetSettings {
    /// Letters left out of the rotation. Defaults to `I` and `O`, which
    /// are easily mistaken for the digits one and zero.
    #[serde(default = "default_excluded_letters")]
    pub excluded: String,
}

fn default_excluded_letters() -> String {
    "IO".to_string()
}

impl Default for AlphabetSettings {
    fn default() -> Self {
        Self {
            excluded: default_excluded_letters(),
        }
    }
}

impl AlphabetSettings {
    /// The rotation order: A..Z without the excluded letters.
    ///
    /// If every letter is excluded the full alphabet is used instead, so the
    /// rotation is never empty.
    pub fn letters(&self) -> Vec<InformationLetter> {
        let all = ('A'..='Z').filter_map(InformationLetter::new);
        let kept: Vec<InformationLetter> = all
            .clone()
            .filter(|l| !self.is_excluded(*l))
            .collect();
        if kept.is_empty() {
            all.collect()
        } else {
            kept
        }
    }

    /// Whether `letter` is left out of the rotation returned by
    /// [`letters`](Self::letters).
    pub fn is_excluded(&self, letter: InformationLetter) -> bool {
        !self.letters().contains(&letter)
    }
}

/// Advisory annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorySettings {
    /// Flag a temperature/dewpoint spread strictly below this many degrees C.
    #[serde(default = "default_spread_threshold")]
    pub spread_threshold: u8,
}

fn default_spread_threshold() -> u8 {
    3
}

impl Default for AdvisorySettings {
    fn default() -> Self {
        Self {
            spread_threshold: default_spread_threshold(),
        }
    }
}

/// Visibility configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilitySettings {
    /// At or above this many miles the phrase reads "OR GREATER".
    #[serde(default = "default_ceiling")]
    pub ceiling: u32,

    /// Fraction denominators accepted on input.
    #[serde(default = "default_denominators")]
    pub denominators: Vec<u32>,
}

fn default_ceiling() -> u32 {
    10
}

fn default_denominators() -> Vec<u32> {
    vec![2, 3, 4]
}

impl Default for VisibilitySettings {
    fn default() -> Self {
        Self {
            ceiling: default_ceiling(),
            denominators: default_denominators(),
        }
    }
}

/// Altimeter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AltimeterSettings {
    /// Broadcast unit.
    #[serde(default)]
    pub unit: AltimeterUnit,

    /// Lowest plausible setting, hundredths of inHg.
    #[serde(default = "default_min_inhg")]
    pub min_inhg: u16,

    /// Highest plausible setting, hundredths of inHg.
    #[serde(default = "default_max_inhg")]
    pub max_inhg: u16,

    /// Lowest plausible setting, hPa.
    #[serde(default = "default_min_hpa")]
    pub min_hpa: u16,

    /// Highest plausible setting, hPa.
    #[serde(default = "default_max_hpa")]
    pub max_hpa: u16,
}

fn default_min_inhg() -> u16 {
    2700
}

fn default_max_inhg() -> u16 {
    3200
}

fn default_min_hpa() -> u16 {
    914
}

fn default_max_hpa() -> u16 {
    1084
}

impl Default for AltimeterSettings {
    fn default() -> Self {
        Self {
            unit: AltimeterUnit::default(),
            min_inhg: default_min_inhg(),
            max_inhg: default_max_inhg(),
            min_hpa: default_min_hpa(),
            max_hpa: default_max_hpa(),
        }
    }
}

/// Wind configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindSettings {
    /// Coded group or spoken phrase.
    #[serde(default)]
    pub style: WindStyle,

    /// Highest accepted speed or gust, knots.
    #[serde(default = "default_max_speed")]
    pub max_speed: u16,
}

fn default_max_speed() -> u16 {
    199
}

impl Default for WindSettings {
    fn default() -> Self {
        Self {
            style: WindStyle::default(),
            max_speed: default_max_speed(),
        }
    }
}

/// Transcript composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSettings {
    /// Text shown in the position of a field that was never entered.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Append the "advise on initial contact" read-back line.
    #[serde(default = "default_true")]
    pub closing: bool,
}

fn default_placeholder() -> String {
    "///".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            closing: true,
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Folder exported transcripts are written to.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,
}

fn default_output_folder() -> String {
    "atis_output".to_string()
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is not set.
    #[serde(default)]
    pub level: LogLevel,

    /// Compact session logs (skip derived-field lines).
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Folder for session log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// Write a per-session log file.
    #[serde(default)]
    pub session_log: bool,

    /// Number of rejected edits kept for the tail.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

fn default_error_tail() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            compact: true,
            logs_folder: default_logs_folder(),
            session_log: false,
            error_tail: default_error_tail(),
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Alphabet,
    Advisory,
    Visibility,
    Altimeter,
    Wind,
    Transcript,
    Export,
    Logging,
}

impl ConfigSection {
    /// All sections in file order.
    pub fn all() -> &'static [ConfigSection] {
        &[
            ConfigSection::Alphabet,
            ConfigSection::Advisory,
            ConfigSection::Visibility,
            ConfigSection::Altimeter,
            ConfigSection::Wind,
            ConfigSection::Transcript,
            ConfigSection::Export,
            ConfigSection::Logging,
        ]
    }

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Alphabet => "alphabet",
            ConfigSection::Advisory => "advisory",
            ConfigSection::Visibility => "visibility",
            ConfigSection::Altimeter => "altimeter",
            ConfigSection::Wind => "wind",
            ConfigSection::Transcript => "transcript",
            ConfigSection::Export => "export",
            ConfigSection::Logging => "logging",
        }
    }

    /// One-line comment written above the section.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Alphabet => "Information letter rotation",
            ConfigSection::Advisory => "Advisory annotations",
            ConfigSection::Visibility => "Visibility input and phrasing",
            ConfigSection::Altimeter => "Altimeter plausibility range and broadcast unit",
            ConfigSection::Wind => "Wind limits and phrasing",
            ConfigSection::Transcript => "Transcript composition",
            ConfigSection::Export => "Transcript export",
            ConfigSection::Logging => "Logging configuration",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("[alphabet]"));
        assert!(toml.contains("[advisory]"));
        assert!(toml.contains("spread_threshold = 3"));
        assert!(toml.contains("unit = \"inhg\""));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[advisory]\nspread_threshold = 5";
        let parsed: Settings = toml::from_str(minimal).unwrap();
        assert_eq!(parsed.advisory.spread_threshold, 5);
        assert_eq!(parsed.visibility.ceiling, 10);
        assert_eq!(parsed.alphabet.excluded, "IO");
        assert_eq!(parsed.transcript.placeholder, "///");
    }

    #[test]
    fn alphabet_skips_excluded_letters() {
        let letters = AlphabetSettings::default().letters();
        assert_eq!(letters.len(), 24);
        assert!(!letters.iter().any(|l| l.letter() == 'I' || l.letter() == 'O'));
        assert_eq!(letters[0].letter(), 'A');
        assert_eq!(letters[8].letter(), 'J');
    }

    #[test]
    fn default_settings_pass_check() {
        assert!(Settings::default().check().is_ok());

        let mut settings = Settings::default();
        settings.visibility.denominators.push(0);
        assert!(settings.check().is_err());
    }

    #[test]
    fn alphabet_never_empty() {
        let alphabet = AlphabetSettings {
            excluded: "abcdefghijklmnopqrstuvwxyz".to_string(),
        };
        assert_eq!(alphabet.letters().len(), 26);
        assert!(('A'..='Z')
            .filter_map(InformationLetter::new)
            .all(|l| !alphabet.is_excluded(l)));
    }
}

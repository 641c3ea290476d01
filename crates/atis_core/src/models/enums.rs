//! Rendering enums selectable from configuration.

use serde::{Deserialize, Serialize};

/// How the wind group is written into the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindStyle {
    /// Coded group: `31012KT`, `31012G20KT`, `VRB05KT`, `00000KT`.
    #[default]
    Compact,
    /// Spoken phrase: `310 AT 12KT`, `VARIABLE AT 5KT`, `CALM`.
    Spoken,
}

impl std::fmt::Display for WindStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindStyle::Compact => write!(f, "compact"),
            WindStyle::Spoken => write!(f, "spoken"),
        }
    }
}

/// Unit the altimeter setting is broadcast in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AltimeterUnit {
    /// Inches of mercury, hundredths: `A3005`.
    #[default]
    InHg,
    /// Hectopascals: `Q1018`.
    Hpa,
}

impl AltimeterUnit {
    /// Get the group prefix letter for this unit.
    pub fn prefix(&self) -> char {
        match self {
            AltimeterUnit::InHg => 'A',
            AltimeterUnit::Hpa => 'Q',
        }
    }
}

impl std::fmt::Display for AltimeterUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AltimeterUnit::InHg => write!(f, "inHg"),
            AltimeterUnit::Hpa => write!(f, "hPa"),
        }
    }
}

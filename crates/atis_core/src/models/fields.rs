//! Field identifiers for raw inputs and derived phrases.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies one operator-entered input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawFieldId {
    Airport,
    InformationLetter,
    Time,
    WindVariableFlag,
    WindDirection,
    WindVelocity,
    WindGust,
    Visibility,
    Temperature,
    Dewpoint,
    Altimeter,
}

impl RawFieldId {
    /// All raw fields in canonical transcript order.
    pub fn all() -> &'static [RawFieldId] {
        &[
            Self::Airport,
            Self::InformationLetter,
            Self::Time,
            Self::WindVariableFlag,
            Self::WindDirection,
            Self::WindVelocity,
            Self::WindGust,
            Self::Visibility,
            Self::Temperature,
            Self::Dewpoint,
            Self::Altimeter,
        ]
    }

    /// Stable snake_case name (matches the serde representation).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Airport => "airport",
            Self::InformationLetter => "information_letter",
            Self::Time => "time",
            Self::WindVariableFlag => "wind_variable_flag",
            Self::WindDirection => "wind_direction",
            Self::WindVelocity => "wind_velocity",
            Self::WindGust => "wind_gust",
            Self::Visibility => "visibility",
            Self::Temperature => "temperature",
            Self::Dewpoint => "dewpoint",
            Self::Altimeter => "altimeter",
        }
    }

    /// Derived fields that read this raw field.
    pub fn dependents(&self) -> Vec<DerivedFieldId> {
        DerivedFieldId::all()
            .iter()
            .copied()
            .filter(|d| d.dependencies().contains(self))
            .collect()
    }
}

impl fmt::Display for RawFieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when a field name cannot be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown field name: '{0}'")]
pub struct UnknownFieldError(pub String);

impl FromStr for RawFieldId {
    type Err = UnknownFieldError;

    /// Accepts the canonical names plus the short names used on the form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        let id = match key.as_str() {
            "airport" | "icao" => Self::Airport,
            "information_letter" | "information" | "info" | "letter" => Self::InformationLetter,
            "time" | "observation_time" => Self::Time,
            "wind_variable_flag" | "wind_variable" | "variable" | "vrb" => Self::WindVariableFlag,
            "wind_direction" | "wind_dir" | "direction" | "dir" => Self::WindDirection,
            "wind_velocity" | "wind_vel" | "wind_speed" | "velocity" | "speed" => {
                Self::WindVelocity
            }
            "wind_gust" | "gust" => Self::WindGust,
            "visibility" | "vis" => Self::Visibility,
            "temperature" | "temp" => Self::Temperature,
            "dewpoint" | "dew" => Self::Dewpoint,
            "altimeter" | "alt" | "qnh" => Self::Altimeter,
            _ => return Err(UnknownFieldError(s.to_string())),
        };
        Ok(id)
    }
}

/// Identifies a phrase computed from one or more raw fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedFieldId {
    WindPhrase,
    SpreadWarning,
    VisibilityPhrase,
    AltimeterPhrase,
}

impl DerivedFieldId {
    /// All derived fields.
    pub fn all() -> &'static [DerivedFieldId] {
        &[
            Self::WindPhrase,
            Self::SpreadWarning,
            Self::VisibilityPhrase,
            Self::AltimeterPhrase,
        ]
    }

    /// The static dependency table.
    pub fn dependencies(&self) -> &'static [RawFieldId] {
        match self {
            Self::WindPhrase => &[
                RawFieldId::WindVariableFlag,
                RawFieldId::WindDirection,
                RawFieldId::WindVelocity,
                RawFieldId::WindGust,
            ],
            Self::SpreadWarning => &[RawFieldId::Temperature, RawFieldId::Dewpoint],
            Self::VisibilityPhrase => &[RawFieldId::Visibility],
            Self::AltimeterPhrase => &[RawFieldId::Altimeter],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::WindPhrase => "wind_phrase",
            Self::SpreadWarning => "spread_warning",
            Self::VisibilityPhrase => "visibility_phrase",
            Self::AltimeterPhrase => "altimeter_phrase",
        }
    }
}

impl fmt::Display for DerivedFieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("airport".parse::<RawFieldId>().unwrap(), RawFieldId::Airport);
        assert_eq!("wind-dir".parse::<RawFieldId>().unwrap(), RawFieldId::WindDirection);
        assert_eq!("DEW".parse::<RawFieldId>().unwrap(), RawFieldId::Dewpoint);
        assert!("runway".parse::<RawFieldId>().is_err());
    }

    #[test]
    fn every_name_round_trips() {
        for id in RawFieldId::all() {
            assert_eq!(id.name().parse::<RawFieldId>().unwrap(), *id);
        }
    }

    #[test]
    fn dependents_follow_table() {
        assert_eq!(
            RawFieldId::WindGust.dependents(),
            vec![DerivedFieldId::WindPhrase]
        );
        assert_eq!(
            RawFieldId::Dewpoint.dependents(),
            vec![DerivedFieldId::SpreadWarning]
        );
        assert!(RawFieldId::Airport.dependents().is_empty());
        assert!(RawFieldId::Time.dependents().is_empty());
    }
}

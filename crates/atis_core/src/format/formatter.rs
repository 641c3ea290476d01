//! Per-field canonical text.

use crate::config::Settings;
use crate::models::{Altimeter, AltimeterUnit, FieldValue, RawFieldId, WindStyle};

use super::wind::{wind_group, WindComponents};

/// Renders validated values as broadcast text.
#[derive(Debug, Clone)]
pub struct FieldFormatter {
    wind_style: WindStyle,
    altimeter_unit: AltimeterUnit,
}

impl FieldFormatter {
    pub fn new(settings: &Settings) -> Self {
        Self {
            wind_style: settings.wind.style,
            altimeter_unit: settings.altimeter.unit,
        }
    }

    pub fn wind_style(&self) -> WindStyle {
        self.wind_style
    }

    pub fn altimeter_unit(&self) -> AltimeterUnit {
        self.altimeter_unit
    }

    /// Canonical text for a single raw field.
    ///
    /// Flags and absent gusts render as an empty string.
    pub fn format(&self, field: RawFieldId, value: &FieldValue) -> String {
        debug_assert!(belongs_to(field, value), "{} cannot hold {:?}", field, value);
        match value {
            FieldValue::Airport(icao) => icao.clone(),
            FieldValue::Information(letter) => format!("INFORMATION {}", letter.word()),
            FieldValue::Time(time) => format!("{}Z", time.hhmm()),
            FieldValue::Flag(true) => "VRB".to_string(),
            FieldValue::Flag(false) => String::new(),
            FieldValue::Direction(d) => format!("{:03}", d),
            FieldValue::Speed(s) => format!("{:02}", s),
            FieldValue::Gust(Some(g)) => format!("G{:02}", g),
            FieldValue::Gust(None) => String::new(),
            FieldValue::Visibility(v) => v.to_string(),
            FieldValue::Celsius(c) => celsius(*c),
            FieldValue::Altimeter(a) => format!("{:04}", a.in_unit(self.altimeter_unit)),
        }
    }

    /// The wind group in the configured style.
    pub fn wind(&self, wind: &WindComponents) -> String {
        wind_group(wind, self.wind_style)
    }

    /// Altimeter with its unit prefix, such as `A3005` or `Q1018`.
    pub fn altimeter_group(&self, altimeter: Altimeter) -> String {
        format!(
            "{}{:04}",
            self.altimeter_unit.prefix(),
            altimeter.in_unit(self.altimeter_unit)
        )
    }
}

/// Whole degrees, two digits minimum, `M` for minus.
pub(crate) fn celsius(value: i16) -> String {
    if value < 0 {
        format!("M{:02}", value.unsigned_abs())
    } else {
        format!("{:02}", value)
    }
}

fn belongs_to(field: RawFieldId, value: &FieldValue) -> bool {
    matches!(
        (field, value),
        (RawFieldId::Airport, FieldValue::Airport(_))
            | (RawFieldId::InformationLetter, FieldValue::Information(_))
            | (RawFieldId::Time, FieldValue::Time(_))
            | (RawFieldId::WindVariableFlag, FieldValue::Flag(_))
            | (RawFieldId::WindDirection, FieldValue::Direction(_))
            | (RawFieldId::WindVelocity, FieldValue::Speed(_))
            | (RawFieldId::WindGust, FieldValue::Gust(_))
            | (RawFieldId::Visibility, FieldValue::Visibility(_))
            | (RawFieldId::Temperature, FieldValue::Celsius(_))
            | (RawFieldId::Dewpoint, FieldValue::Celsius(_))
            | (RawFieldId::Altimeter, FieldValue::Altimeter(_))
    )
}

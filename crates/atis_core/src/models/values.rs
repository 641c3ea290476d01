//! Normalized field values.
//!
//! These are the outputs of validation. Every value here is already known
//! to be in range, so formatting never has to check again.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::enums::AltimeterUnit;
use super::fields::RawFieldId;

/// Hectopascals per inch of mercury.
pub const HPA_PER_INHG: f64 = 33.8639;

/// ICAO phonetic words, indexed by letter.
pub const PHONETIC_ALPHABET: [&str; 26] = [
    "ALPHA", "BRAVO", "CHARLIE", "DELTA", "ECHO", "FOXTROT", "GOLF", "HOTEL", "INDIA", "JULIETT",
    "KILO", "LIMA", "MIKE", "NOVEMBER", "OSCAR", "PAPA", "QUEBEC", "ROMEO", "SIERRA", "TANGO",
    "UNIFORM", "VICTOR", "WHISKEY", "XRAY", "YANKEE", "ZULU",
];

/// A single broadcast identifier letter, always uppercase ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InformationLetter(char);

impl InformationLetter {
    /// Create from a letter (either case). Returns None for non-letters.
    pub fn new(c: char) -> Option<Self> {
        c.is_ascii_alphabetic()
            .then(|| Self(c.to_ascii_uppercase()))
    }

    /// Resolve a phonetic word ("alpha", "X-RAY", "Juliet").
    pub fn from_word(word: &str) -> Option<Self> {
        let key: String = word
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_uppercase();
        let key = match key.as_str() {
            "ALFA" => "ALPHA",
            "JULIET" => "JULIETT",
            other => other,
        };
        PHONETIC_ALPHABET
            .iter()
            .position(|w| *w == key)
            .map(|i| Self((b'A' + i as u8) as char))
    }

    /// The uppercase letter.
    pub fn letter(&self) -> char {
        self.0
    }

    /// The phonetic word for this letter.
    pub fn word(&self) -> &'static str {
        PHONETIC_ALPHABET[(self.0 as u8 - b'A') as usize]
    }
}

impl fmt::Display for InformationLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Observation time in UTC, minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObservationTime {
    pub hour: u8,
    pub minute: u8,
}

impl ObservationTime {
    /// `HHMM` with zero padding.
    pub fn hhmm(&self) -> String {
        format!("{:02}{:02}", self.hour, self.minute)
    }
}

/// Prevailing visibility in statute miles as a whole part plus a proper,
/// reduced fraction.
///
/// Whole numbers are stored with `numerator == 0` and `denominator == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Visibility {
    whole: u32,
    numerator: u32,
    denominator: u32,
}

impl Visibility {
    /// Whole statute miles.
    pub fn whole(whole: u32) -> Self {
        Self {
            whole,
            numerator: 0,
            denominator: 1,
        }
    }

    /// Build from a mixed number, reducing the fraction and carrying any
    /// improper part into the whole. `denominator` must be non-zero.
    pub fn mixed(whole: u32, numerator: u32, denominator: u32) -> Self {
        debug_assert!(denominator > 0);
        let whole = whole + numerator / denominator;
        let numerator = numerator % denominator;
        if numerator == 0 {
            return Self::whole(whole);
        }
        let g = gcd(numerator, denominator);
        Self {
            whole,
            numerator: numerator / g,
            denominator: denominator / g,
        }
    }

    pub fn whole_part(&self) -> u32 {
        self.whole
    }

    /// `(numerator, denominator)` of the fractional part, if any.
    pub fn fraction(&self) -> Option<(u32, u32)> {
        (self.numerator > 0).then_some((self.numerator, self.denominator))
    }

    /// Whether the value reaches `ceiling` miles.
    pub fn is_at_least(&self, ceiling: u32) -> bool {
        self.whole >= ceiling
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.whole, self.fraction()) {
            (w, None) => write!(f, "{}", w),
            (0, Some((n, d))) => write!(f, "{}/{}", n, d),
            (w, Some((n, d))) => write!(f, "{} {}/{}", w, n, d),
        }
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Altimeter setting in the unit it was entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum Altimeter {
    /// Hundredths of an inch of mercury (3005 = 30.05 inHg).
    InHg(u16),
    /// Whole hectopascals.
    Hpa(u16),
}

impl Altimeter {
    /// Setting in hundredths of inHg, converting if needed.
    pub fn inhg_hundredths(&self) -> u16 {
        match *self {
            Altimeter::InHg(v) => v,
            Altimeter::Hpa(v) => (f64::from(v) / HPA_PER_INHG * 100.0).round() as u16,
        }
    }

    /// Setting in hPa, converting if needed.
    pub fn hpa(&self) -> u16 {
        match *self {
            Altimeter::InHg(v) => (f64::from(v) / 100.0 * HPA_PER_INHG).round() as u16,
            Altimeter::Hpa(v) => v,
        }
    }

    /// Value expressed in `unit`.
    pub fn in_unit(&self, unit: AltimeterUnit) -> u16 {
        match unit {
            AltimeterUnit::InHg => self.inhg_hundredths(),
            AltimeterUnit::Hpa => self.hpa(),
        }
    }
}

/// A validated, normalized raw field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Uppercase 4-letter identifier.
    Airport(String),
    Information(InformationLetter),
    Time(ObservationTime),
    Flag(bool),
    /// Degrees true, 0..=360.
    Direction(u16),
    /// Knots.
    Speed(u16),
    /// Knots, None when no gust is reported.
    Gust(Option<u16>),
    Visibility(Visibility),
    /// Whole degrees Celsius (temperature or dewpoint).
    Celsius(i16),
    Altimeter(Altimeter),
}

impl FieldValue {
    pub fn as_flag(&self) -> Option<bool> {
        match *self {
            FieldValue::Flag(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_direction(&self) -> Option<u16> {
        match *self {
            FieldValue::Direction(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_speed(&self) -> Option<u16> {
        match *self {
            FieldValue::Speed(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_gust(&self) -> Option<Option<u16>> {
        match *self {
            FieldValue::Gust(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_celsius(&self) -> Option<i16> {
        match *self {
            FieldValue::Celsius(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_visibility(&self) -> Option<Visibility> {
        match *self {
            FieldValue::Visibility(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_altimeter(&self) -> Option<Altimeter> {
        match *self {
            FieldValue::Altimeter(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_information(&self) -> Option<InformationLetter> {
        match *self {
            FieldValue::Information(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<ObservationTime> {
        match *self {
            FieldValue::Time(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_airport(&self) -> Option<&str> {
        match self {
            FieldValue::Airport(a) => Some(a),
            _ => None,
        }
    }
}

/// Last-valid value of every raw field that has one.
///
/// Validation reads it for cross-field checks and derivation reads it to
/// compute phrases. Only the engine writes to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidValues(BTreeMap<RawFieldId, FieldValue>);

impl ValidValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: RawFieldId) -> Option<&FieldValue> {
        self.0.get(&field)
    }

    pub fn set(&mut self, field: RawFieldId, value: FieldValue) {
        self.0.insert(field, value);
    }

    pub fn contains(&self, field: RawFieldId) -> bool {
        self.0.contains_key(&field)
    }

    pub fn flag(&self, field: RawFieldId) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_flag)
    }

    pub fn direction(&self) -> Option<u16> {
        self.get(RawFieldId::WindDirection)
            .and_then(FieldValue::as_direction)
    }

    pub fn velocity(&self) -> Option<u16> {
        self.get(RawFieldId::WindVelocity).and_then(FieldValue::as_speed)
    }

    /// Gust in knots; None both when absent and when never entered.
    pub fn gust(&self) -> Option<u16> {
        self.get(RawFieldId::WindGust)
            .and_then(FieldValue::as_gust)
            .flatten()
    }

    pub fn celsius(&self, field: RawFieldId) -> Option<i16> {
        self.get(field).and_then(FieldValue::as_celsius)
    }

    pub fn visibility(&self) -> Option<Visibility> {
        self.get(RawFieldId::Visibility)
            .and_then(FieldValue::as_visibility)
    }

    pub fn altimeter(&self) -> Option<Altimeter> {
        self.get(RawFieldId::Altimeter)
            .and_then(FieldValue::as_altimeter)
    }

    pub fn information(&self) -> Option<InformationLetter> {
        self.get(RawFieldId::InformationLetter)
            .and_then(FieldValue::as_information)
    }

    pub fn time(&self) -> Option<ObservationTime> {
        self.get(RawFieldId::Time).and_then(FieldValue::as_time)
    }

    pub fn airport(&self) -> Option<&str> {
        self.get(RawFieldId::Airport).and_then(FieldValue::as_airport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_resolve_words() {
        let a = InformationLetter::new('a').unwrap();
        assert_eq!(a.letter(), 'A');
        assert_eq!(a.word(), "ALPHA");
        assert_eq!(InformationLetter::from_word("x-ray").unwrap().letter(), 'X');
        assert_eq!(InformationLetter::from_word("Juliet").unwrap().word(), "JULIETT");
        assert!(InformationLetter::from_word("apple").is_none());
        assert!(InformationLetter::new('7').is_none());
    }

    #[test]
    fn visibility_reduces_and_carries() {
        assert_eq!(Visibility::mixed(0, 2, 4).to_string(), "1/2");
        assert_eq!(Visibility::mixed(0, 3, 2).to_string(), "1 1/2");
        assert_eq!(Visibility::mixed(2, 4, 4).to_string(), "3");
        assert_eq!(Visibility::mixed(1, 1, 3).to_string(), "1 1/3");
        assert_eq!(Visibility::whole(10).to_string(), "10");
    }

    #[test]
    fn visibility_ceiling_compares_whole_part() {
        assert!(Visibility::whole(10).is_at_least(10));
        assert!(Visibility::mixed(12, 1, 2).is_at_least(10));
        assert!(!Visibility::mixed(9, 3, 4).is_at_least(10));
    }

    #[test]
    fn altimeter_converts_between_units() {
        assert_eq!(Altimeter::InHg(3005).hpa(), 1018);
        assert_eq!(Altimeter::InHg(2992).hpa(), 1013);
        assert_eq!(Altimeter::Hpa(1013).inhg_hundredths(), 2991);
        assert_eq!(Altimeter::Hpa(1013).in_unit(AltimeterUnit::Hpa), 1013);
    }

    #[test]
    fn valid_values_typed_access() {
        let mut values = ValidValues::new();
        values.set(RawFieldId::WindGust, FieldValue::Gust(None));
        values.set(RawFieldId::WindVelocity, FieldValue::Speed(12));
        assert!(values.contains(RawFieldId::WindGust));
        assert_eq!(values.gust(), None);
        assert_eq!(values.velocity(), Some(12));
        assert_eq!(values.celsius(RawFieldId::Temperature), None);
    }
}

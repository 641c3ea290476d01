//! Per-field syntax, range and consistency checks.

use crate::config::{AlphabetSettings, AltimeterSettings, Settings, VisibilitySettings};
use crate::models::{
    Altimeter, FieldValue, InformationLetter, ObservationTime, RawFieldId, ValidValues, Visibility,
};

use super::errors::{FieldError, ValidationResult};

/// Validates raw operator input and normalizes it into a [`FieldValue`].
///
/// Pure: the only state is the configuration captured at construction.
/// Cross-field rules read the caller's last-valid values.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    alphabet: AlphabetSettings,
    visibility: VisibilitySettings,
    altimeter: AltimeterSettings,
    max_speed: u16,
}

impl FieldValidator {
    pub fn new(settings: &Settings) -> Self {
        Self {
            alphabet: settings.alphabet.clone(),
            visibility: settings.visibility.clone(),
            altimeter: settings.altimeter.clone(),
            max_speed: settings.wind.max_speed,
        }
    }

    /// Validate `raw` for `field` against the current last-valid values.
    pub fn validate(&self, field: RawFieldId, raw: &str, current: &ValidValues) -> ValidationResult {
        let input = raw.trim();
        match field {
            RawFieldId::Airport => validate_airport(input),
            RawFieldId::InformationLetter => self.validate_information(input),
            RawFieldId::Time => validate_time(input),
            RawFieldId::WindVariableFlag => validate_flag(input),
            RawFieldId::WindDirection => validate_direction(input),
            RawFieldId::WindVelocity => self.validate_velocity(input, current),
            RawFieldId::WindGust => self.validate_gust(input, current),
            RawFieldId::Visibility => self.validate_visibility(input),
            RawFieldId::Temperature | RawFieldId::Dewpoint => {
                validate_celsius(field, input, current)
            }
            RawFieldId::Altimeter => self.validate_altimeter(input),
        }
    }

    /// The letter after `current` in the configured rotation, wrapping
    /// around. Starts the rotation when there is no current letter.
    pub fn next_letter(&self, current: Option<InformationLetter>) -> InformationLetter {
        let letters = self.alphabet.letters();
        let first = letters[0];
        match current {
            None => first,
            Some(cur) => letters
                .iter()
                .copied()
                .find(|l| l.letter() > cur.letter())
                .unwrap_or(first),
        }
    }

    fn validate_information(&self, input: &str) -> ValidationResult {
        let field = RawFieldId::InformationLetter;
        let mut chars = input.chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) => InformationLetter::new(c),
            _ => InformationLetter::from_word(input),
        }
        .ok_or_else(|| {
            FieldError::format(field, input, "expected a single letter or its phonetic word")
        })?;

        if self.alphabet.is_excluded(letter) {
            return Err(FieldError::range(
                field,
                input,
                format!("letter {} is not in the information alphabet", letter),
            ));
        }
        Ok(FieldValue::Information(letter))
    }

    fn validate_velocity(&self, input: &str, current: &ValidValues) -> ValidationResult {
        let field = RawFieldId::WindVelocity;
        let speed = self.parse_speed(field, input)?;
        if let Some(gust) = current.gust() {
            if speed >= gust {
                return Err(FieldError::consistency(
                    field,
                    input,
                    format!("velocity must stay below the reported gust of {}", gust),
                ));
            }
        }
        Ok(FieldValue::Speed(speed))
    }

    fn validate_gust(&self, input: &str, current: &ValidValues) -> ValidationResult {
        let field = RawFieldId::WindGust;
        if input.is_empty() || input.eq_ignore_ascii_case("none") {
            return Ok(FieldValue::Gust(None));
        }
        let gust = self.parse_speed(field, input)?;
        if gust == 0 {
            return Ok(FieldValue::Gust(None));
        }
        if let Some(velocity) = current.velocity() {
            if gust <= velocity {
                return Err(FieldError::consistency(
                    field,
                    input,
                    format!("gust must exceed the velocity of {}", velocity),
                ));
            }
        }
        Ok(FieldValue::Gust(Some(gust)))
    }

    fn parse_speed(&self, field: RawFieldId, input: &str) -> Result<u16, FieldError> {
        let value = parse_integer(field, input)?;
        if value < 0 || value > i64::from(self.max_speed) {
            return Err(FieldError::range(
                field,
                input,
                format!("speed must be 0-{} knots", self.max_speed),
            ));
        }
        Ok(value as u16)
    }

    fn validate_visibility(&self, input: &str) -> ValidationResult {
        let field = RawFieldId::Visibility;
        let body = strip_suffix_ignore_case(input, "SM").trim_end();
        if body.starts_with('-') {
            return Err(FieldError::range(field, input, "visibility cannot be negative"));
        }

        let parts: Vec<&str> = body
            .split(|c: char| c.is_whitespace() || c == '-')
            .filter(|p| !p.is_empty())
            .collect();

        let number = |s: &str| -> Result<u32, FieldError> {
            if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) || s.len() > 6 {
                return Err(FieldError::format(
                    field,
                    input,
                    "expected a whole number or a fraction such as 1 1/2",
                ));
            }
            s.parse::<u32>().map_err(|_| {
                FieldError::format(field, input, "expected a whole number or a fraction")
            })
        };
        let fraction = |s: &str| -> Result<(u32, u32), FieldError> {
            match s.split_once('/') {
                Some((n, d)) => Ok((number(n)?, number(d)?)),
                None => Err(FieldError::format(
                    field,
                    input,
                    "expected a fraction such as 3/4",
                )),
            }
        };

        let (whole, numerator, denominator) = match *parts.as_slice() {
            [single] if single.contains('/') => {
                let (n, d) = fraction(single)?;
                (0, n, d)
            }
            [single] => (number(single)?, 0, 1),
            [whole, frac] if !whole.contains('/') => {
                let (n, d) = fraction(frac)?;
                (number(whole)?, n, d)
            }
            _ => {
                return Err(FieldError::format(
                    field,
                    input,
                    "expected a whole number or a fraction such as 1 1/2",
                ))
            }
        };

        if denominator == 0 {
            return Err(FieldError::range(field, input, "denominator cannot be zero"));
        }

        let value = Visibility::mixed(whole, numerator, denominator);
        if let Some((_, d)) = value.fraction() {
            if !self.visibility.denominators.contains(&d) {
                return Err(FieldError::range(
                    field,
                    input,
                    format!(
                        "fractions must be in {:?} parts",
                        self.visibility.denominators
                    ),
                ));
            }
        }
        Ok(FieldValue::Visibility(value))
    }

    fn validate_altimeter(&self, input: &str) -> ValidationResult {
        let field = RawFieldId::Altimeter;
        let upper = input.to_ascii_uppercase();
        let shape_error =
            || FieldError::format(field, input, "expected a setting such as 3005, 30.05 or Q1013");

        let (unit_hint, body) = if let Some(rest) = upper.strip_prefix('A') {
            (Some(false), rest.trim())
        } else if let Some(rest) = upper.strip_prefix('Q') {
            (Some(true), rest.trim())
        } else if let Some(rest) = upper.strip_suffix("HPA") {
            (Some(true), rest.trim())
        } else if let Some(rest) = upper.strip_suffix("INHG") {
            (Some(false), rest.trim())
        } else {
            (None, upper.as_str())
        };

        let value = if body.contains('.') {
            let parsed: f64 = body.parse().map_err(|_| shape_error())?;
            if !parsed.is_finite() {
                return Err(shape_error());
            }
            if parsed <= 0.0 {
                return Err(FieldError::range(field, input, "setting must be positive"));
            }
            let is_hpa = unit_hint.unwrap_or(parsed >= 100.0);
            if is_hpa {
                Altimeter::Hpa(clamp_u16(parsed.round()))
            } else {
                Altimeter::InHg(clamp_u16((parsed * 100.0).round()))
            }
        } else {
            let parsed = parse_integer(field, body).map_err(|_| shape_error())?;
            if parsed <= 0 {
                return Err(FieldError::range(field, input, "setting must be positive"));
            }
            let parsed = clamp_u16(parsed as f64);
            let is_hpa = unit_hint.unwrap_or(parsed < 2000);
            if is_hpa {
                Altimeter::Hpa(parsed)
            } else {
                Altimeter::InHg(parsed)
            }
        };

        let limits = &self.altimeter;
        let in_range = match value {
            Altimeter::InHg(v) => (limits.min_inhg..=limits.max_inhg).contains(&v),
            Altimeter::Hpa(v) => (limits.min_hpa..=limits.max_hpa).contains(&v),
        };
        if !in_range {
            return Err(FieldError::range(
                field,
                input,
                format!(
                    "setting must be {}-{} (inHg x100) or {}-{} hPa",
                    limits.min_inhg, limits.max_inhg, limits.min_hpa, limits.max_hpa
                ),
            ));
        }
        Ok(FieldValue::Altimeter(value))
    }
}

fn validate_airport(input: &str) -> ValidationResult {
    if input.len() == 4 && input.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(FieldValue::Airport(input.to_ascii_uppercase()))
    } else {
        Err(FieldError::format(
            RawFieldId::Airport,
            input,
            "expected exactly 4 letters",
        ))
    }
}

fn validate_time(input: &str) -> ValidationResult {
    let field = RawFieldId::Time;
    let digits = input
        .strip_suffix('Z')
        .or_else(|| input.strip_suffix('z'))
        .unwrap_or(input);
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::format(field, input, "expected four digits HHMM"));
    }

    let hour: u8 = digits[..2].parse().map_err(|_| {
        FieldError::format(field, input, "expected four digits HHMM")
    })?;
    let minute: u8 = digits[2..].parse().map_err(|_| {
        FieldError::format(field, input, "expected four digits HHMM")
    })?;
    if hour > 23 {
        return Err(FieldError::range(field, input, "hours must be 00-23"));
    }
    if minute > 59 {
        return Err(FieldError::range(field, input, "minutes must be 00-59"));
    }
    Ok(FieldValue::Time(ObservationTime { hour, minute }))
}

fn validate_flag(input: &str) -> ValidationResult {
    match input.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "vrb" | "variable" => Ok(FieldValue::Flag(true)),
        "false" | "no" | "off" | "0" | "" => Ok(FieldValue::Flag(false)),
        _ => Err(FieldError::format(
            RawFieldId::WindVariableFlag,
            input,
            "expected true or false",
        )),
    }
}

fn validate_direction(input: &str) -> ValidationResult {
    let field = RawFieldId::WindDirection;
    let value = parse_integer(field, input)?;
    if !(0..=360).contains(&value) {
        return Err(FieldError::range(field, input, "direction must be 0-360 degrees"));
    }
    Ok(FieldValue::Direction(value as u16))
}

fn validate_celsius(field: RawFieldId, input: &str, current: &ValidValues) -> ValidationResult {
    let value = match input.strip_prefix(['M', 'm']) {
        Some(rest) if !rest.starts_with(['-', '+']) => -parse_integer(field, rest)?,
        Some(_) => {
            return Err(FieldError::format(field, input, "expected a whole number of degrees"))
        }
        None => parse_integer(field, input)?,
    };
    if !(-99..=99).contains(&value) {
        return Err(FieldError::range(field, input, "degrees must be -99 to 99"));
    }
    let value = value as i16;

    match field {
        RawFieldId::Temperature => {
            if let Some(dew) = current.celsius(RawFieldId::Dewpoint) {
                if value < dew {
                    return Err(FieldError::consistency(
                        field,
                        input,
                        format!("temperature cannot be below the dewpoint of {}", dew),
                    ));
                }
            }
        }
        _ => {
            if let Some(temp) = current.celsius(RawFieldId::Temperature) {
                if value > temp {
                    return Err(FieldError::consistency(
                        field,
                        input,
                        format!("dewpoint cannot exceed the temperature of {}", temp),
                    ));
                }
            }
        }
    }
    Ok(FieldValue::Celsius(value))
}

/// Parse an optionally signed decimal integer of at most six digits.
fn parse_integer(field: RawFieldId, input: &str) -> Result<i64, FieldError> {
    let digits = input.strip_prefix(['+', '-']).unwrap_or(input);
    if digits.is_empty() || digits.len() > 6 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::format(field, input, "expected a whole number"));
    }
    input
        .parse::<i64>()
        .map_err(|_| FieldError::format(field, input, "expected a whole number"))
}

fn strip_suffix_ignore_case<'a>(input: &'a str, suffix: &str) -> &'a str {
    let split = input.len().saturating_sub(suffix.len());
    match (input.get(..split), input.get(split..)) {
        (Some(head), Some(tail)) if tail.eq_ignore_ascii_case(suffix) => head,
        _ => input,
    }
}

fn clamp_u16(value: f64) -> u16 {
    value.clamp(0.0, f64::from(u16::MAX)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ErrorKind;

    fn validator() -> FieldValidator {
        FieldValidator::new(&Settings::default())
    }

    fn check(field: RawFieldId, raw: &str) -> ValidationResult {
        validator().validate(field, raw, &ValidValues::new())
    }

    fn kind(field: RawFieldId, raw: &str) -> ErrorKind {
        check(field, raw).unwrap_err().kind()
    }

    #[test]
    fn airport_is_four_letters_uppercased() {
        assert_eq!(
            check(RawFieldId::Airport, " ksea ").unwrap(),
            FieldValue::Airport("KSEA".to_string())
        );
        assert_eq!(kind(RawFieldId::Airport, "KSE"), ErrorKind::FormatError);
        assert_eq!(kind(RawFieldId::Airport, "KSEA1"), ErrorKind::FormatError);
        assert_eq!(kind(RawFieldId::Airport, "K5EA"), ErrorKind::FormatError);
    }

    #[test]
    fn information_accepts_letter_or_word() {
        let a = check(RawFieldId::InformationLetter, "a").unwrap();
        assert_eq!(a.as_information().unwrap().letter(), 'A');
        let d = check(RawFieldId::InformationLetter, "Delta").unwrap();
        assert_eq!(d.as_information().unwrap().letter(), 'D');
        assert_eq!(kind(RawFieldId::InformationLetter, "7"), ErrorKind::FormatError);
        assert_eq!(kind(RawFieldId::InformationLetter, "ab"), ErrorKind::FormatError);
    }

    #[test]
    fn excluded_letter_is_range_error() {
        assert_eq!(kind(RawFieldId::InformationLetter, "i"), ErrorKind::RangeError);
        assert_eq!(kind(RawFieldId::InformationLetter, "oscar"), ErrorKind::RangeError);
    }

    #[test]
    fn next_letter_cycles_and_skips_exclusions() {
        let v = validator();
        assert_eq!(v.next_letter(None).letter(), 'A');
        let h = InformationLetter::new('H');
        assert_eq!(v.next_letter(h).letter(), 'J');
        let z = InformationLetter::new('Z');
        assert_eq!(v.next_letter(z).letter(), 'A');
    }

    #[test]
    fn time_checks_shape_then_range() {
        assert_eq!(
            check(RawFieldId::Time, "1453").unwrap(),
            FieldValue::Time(ObservationTime {
                hour: 14,
                minute: 53
            })
        );
        assert!(check(RawFieldId::Time, "0000Z").is_ok());
        assert_eq!(kind(RawFieldId::Time, "145"), ErrorKind::FormatError);
        assert_eq!(kind(RawFieldId::Time, "14:53"), ErrorKind::FormatError);
        assert_eq!(kind(RawFieldId::Time, "2400"), ErrorKind::RangeError);
        assert_eq!(kind(RawFieldId::Time, "1260"), ErrorKind::RangeError);
    }

    #[test]
    fn flag_parses_common_spellings() {
        assert_eq!(check(RawFieldId::WindVariableFlag, "on").unwrap(), FieldValue::Flag(true));
        assert_eq!(check(RawFieldId::WindVariableFlag, "FALSE").unwrap(), FieldValue::Flag(false));
        assert_eq!(kind(RawFieldId::WindVariableFlag, "maybe"), ErrorKind::FormatError);
    }

    #[test]
    fn direction_range() {
        assert_eq!(check(RawFieldId::WindDirection, "360").unwrap(), FieldValue::Direction(360));
        assert_eq!(check(RawFieldId::WindDirection, "0").unwrap(), FieldValue::Direction(0));
        assert_eq!(kind(RawFieldId::WindDirection, "361"), ErrorKind::RangeError);
        assert_eq!(kind(RawFieldId::WindDirection, "-10"), ErrorKind::RangeError);
        assert_eq!(kind(RawFieldId::WindDirection, "west"), ErrorKind::FormatError);
    }

    #[test]
    fn gust_must_exceed_velocity() {
        let v = validator();
        let mut current = ValidValues::new();
        current.set(RawFieldId::WindVelocity, FieldValue::Speed(12));

        let err = v.validate(RawFieldId::WindGust, "10", &current).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConsistencyError);
        let err = v.validate(RawFieldId::WindGust, "12", &current).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConsistencyError);

        assert_eq!(
            v.validate(RawFieldId::WindGust, "20", &current).unwrap(),
            FieldValue::Gust(Some(20))
        );
        assert_eq!(
            v.validate(RawFieldId::WindGust, "0", &current).unwrap(),
            FieldValue::Gust(None)
        );
        assert_eq!(
            v.validate(RawFieldId::WindGust, "", &current).unwrap(),
            FieldValue::Gust(None)
        );
    }

    #[test]
    fn velocity_must_stay_below_gust() {
        let v = validator();
        let mut current = ValidValues::new();
        current.set(RawFieldId::WindGust, FieldValue::Gust(Some(20)));

        let err = v.validate(RawFieldId::WindVelocity, "20", &current).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConsistencyError);
        assert!(v.validate(RawFieldId::WindVelocity, "15", &current).is_ok());

        current.set(RawFieldId::WindGust, FieldValue::Gust(None));
        assert!(v.validate(RawFieldId::WindVelocity, "40", &current).is_ok());
        assert_eq!(kind(RawFieldId::WindVelocity, "200"), ErrorKind::RangeError);
    }

    #[test]
    fn visibility_forms() {
        let vis = |raw| check(RawFieldId::Visibility, raw).unwrap().as_visibility().unwrap();
        assert_eq!(vis("10").to_string(), "10");
        assert_eq!(vis("1/2").to_string(), "1/2");
        assert_eq!(vis("1 1/2").to_string(), "1 1/2");
        assert_eq!(vis("2-3/4SM").to_string(), "2 3/4");
        assert_eq!(vis("2/4").to_string(), "1/2");
        assert_eq!(vis("3/2").to_string(), "1 1/2");
        assert_eq!(vis("2/3 sm").to_string(), "2/3");
    }

    #[test]
    fn visibility_errors() {
        assert_eq!(kind(RawFieldId::Visibility, "-1"), ErrorKind::RangeError);
        assert_eq!(kind(RawFieldId::Visibility, "1/0"), ErrorKind::RangeError);
        assert_eq!(kind(RawFieldId::Visibility, "1/16"), ErrorKind::RangeError);
        assert_eq!(kind(RawFieldId::Visibility, "1.5"), ErrorKind::FormatError);
        assert_eq!(kind(RawFieldId::Visibility, "far"), ErrorKind::FormatError);
        assert_eq!(kind(RawFieldId::Visibility, "1/2 1"), ErrorKind::FormatError);
        assert_eq!(kind(RawFieldId::Visibility, ""), ErrorKind::FormatError);
    }

    #[test]
    fn dewpoint_cannot_exceed_temperature() {
        let v = validator();
        let mut current = ValidValues::new();
        current.set(RawFieldId::Temperature, FieldValue::Celsius(18));

        let err = v.validate(RawFieldId::Dewpoint, "19", &current).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConsistencyError);
        assert_eq!(
            v.validate(RawFieldId::Dewpoint, "18", &current).unwrap(),
            FieldValue::Celsius(18)
        );

        current.set(RawFieldId::Dewpoint, FieldValue::Celsius(12));
        let err = v.validate(RawFieldId::Temperature, "11", &current).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConsistencyError);
    }

    #[test]
    fn celsius_accepts_m_prefix() {
        assert_eq!(check(RawFieldId::Temperature, "M05").unwrap(), FieldValue::Celsius(-5));
        assert_eq!(check(RawFieldId::Dewpoint, "-12").unwrap(), FieldValue::Celsius(-12));
        assert_eq!(kind(RawFieldId::Temperature, "M-5"), ErrorKind::FormatError);
        assert_eq!(kind(RawFieldId::Temperature, "100"), ErrorKind::RangeError);
        assert_eq!(kind(RawFieldId::Temperature, "warm"), ErrorKind::FormatError);
    }

    #[test]
    fn altimeter_units() {
        let alt = |raw| check(RawFieldId::Altimeter, raw).unwrap().as_altimeter().unwrap();
        assert_eq!(alt("3005"), Altimeter::InHg(3005));
        assert_eq!(alt("30.05"), Altimeter::InHg(3005));
        assert_eq!(alt("A2992"), Altimeter::InHg(2992));
        assert_eq!(alt("1013"), Altimeter::Hpa(1013));
        assert_eq!(alt("Q0998"), Altimeter::Hpa(998));
        assert_eq!(alt("1013 hPa"), Altimeter::Hpa(1013));
    }

    #[test]
    fn altimeter_errors() {
        assert_eq!(kind(RawFieldId::Altimeter, "3300"), ErrorKind::RangeError);
        assert_eq!(kind(RawFieldId::Altimeter, "2600"), ErrorKind::RangeError);
        assert_eq!(kind(RawFieldId::Altimeter, "500"), ErrorKind::RangeError);
        assert_eq!(kind(RawFieldId::Altimeter, "0"), ErrorKind::RangeError);
        assert_eq!(kind(RawFieldId::Altimeter, "-3005"), ErrorKind::RangeError);
        assert_eq!(kind(RawFieldId::Altimeter, "high"), ErrorKind::FormatError);
    }
}

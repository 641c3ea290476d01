//! End-to-end behaviour of the composing engine.

use std::sync::{Arc, Mutex};

use atis_core::config::Settings;
use atis_core::engine::{AtisEngine, Publication};
use atis_core::models::{DerivedFieldId, RawFieldId};
use atis_core::validation::{ErrorKind, FieldValidator};

fn ksea_engine() -> AtisEngine {
    let mut engine = AtisEngine::new(&Settings::default());
    let edits = [
        (RawFieldId::Airport, "ksea"),
        (RawFieldId::InformationLetter, "a"),
        (RawFieldId::Time, "1453"),
        (RawFieldId::WindVariableFlag, "false"),
        (RawFieldId::WindDirection, "310"),
        (RawFieldId::WindVelocity, "12"),
        (RawFieldId::WindGust, "0"),
        (RawFieldId::Visibility, "10"),
        (RawFieldId::Temperature, "18"),
        (RawFieldId::Dewpoint, "12"),
        (RawFieldId::Altimeter, "3005"),
    ];
    for (field, raw) in edits {
        engine.update(field, raw).unwrap();
    }
    engine
}

fn positions(haystack: &str, needles: &[&str]) -> Vec<usize> {
    needles
        .iter()
        .map(|n| haystack.find(n).unwrap_or_else(|| panic!("missing {n} in {haystack}")))
        .collect()
}

#[test]
fn ksea_example_in_fixed_order() {
    let engine = ksea_engine();
    let text = engine.transcript().as_str();

    let found = positions(
        text,
        &["KSEA", "INFORMATION ALPHA", "1453Z", "31012KT", "10", "18/12", "A3005"],
    );
    assert!(found.windows(2).all(|w| w[0] < w[1]), "out of order: {text}");
    assert!(!text.contains("31012G"));
    assert_eq!(
        text,
        "KSEA. INFORMATION ALPHA. 1453Z. WIND 31012KT. VISIBILITY 10SM OR GREATER. \
         TEMPERATURE 18/12. ALTIMETER A3005. ADVISE ON INITIAL CONTACT YOU HAVE INFORMATION ALPHA."
    );
}

#[test]
fn low_gust_is_rejected_and_wind_kept() {
    let mut engine = ksea_engine();
    let wind_before = engine.derived(DerivedFieldId::WindPhrase).map(str::to_string);
    let transcript_before = engine.transcript().clone();

    let err = engine.update(RawFieldId::WindGust, "10").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConsistencyError);
    assert_eq!(engine.derived(DerivedFieldId::WindPhrase).map(str::to_string), wind_before);
    assert_eq!(engine.transcript(), &transcript_before);
    assert_eq!(engine.raw_input(RawFieldId::WindGust), Some("10"));
}

#[test]
fn dewpoint_above_temperature_is_rejected() {
    let mut engine = ksea_engine();
    for dew in ["19", "25", "99"] {
        let err = engine.update(RawFieldId::Dewpoint, dew).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConsistencyError);
    }
    assert_eq!(engine.field_text(RawFieldId::Dewpoint), Some("12"));
}

#[test]
fn visibility_change_is_isolated() {
    let mut engine = ksea_engine();
    let others = [
        DerivedFieldId::WindPhrase,
        DerivedFieldId::AltimeterPhrase,
        DerivedFieldId::SpreadWarning,
    ];
    let before: Vec<_> = others
        .iter()
        .map(|id| engine.derived(*id).map(str::to_string))
        .collect();

    let publications = Arc::new(Mutex::new(Vec::<Publication>::new()));
    let sink = Arc::clone(&publications);
    engine.subscribe(move |p| sink.lock().unwrap().push(p.clone()));

    engine.update(RawFieldId::Visibility, "1 1/2").unwrap();

    let after: Vec<_> = others
        .iter()
        .map(|id| engine.derived(*id).map(str::to_string))
        .collect();
    assert_eq!(before, after);

    let published = publications.lock().unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].recomputed, vec![DerivedFieldId::VisibilityPhrase]);
    assert!(published[0].transcript.as_str().contains("VISIBILITY 1 1/2SM."));
}

#[test]
fn unchanged_input_recomposes_identically() {
    let mut engine = ksea_engine();
    let first = engine.transcript().clone();
    let again = engine.update(RawFieldId::Altimeter, "3005").unwrap();
    assert_eq!(first, again);
}

#[test]
fn formatted_values_validate_to_themselves() {
    let settings = Settings::default();
    let engine = ksea_engine();
    let validator = FieldValidator::new(&settings);
    let values = engine.snapshot();

    for field in [
        RawFieldId::Airport,
        RawFieldId::Time,
        RawFieldId::WindDirection,
        RawFieldId::WindVelocity,
        RawFieldId::Visibility,
        RawFieldId::Temperature,
        RawFieldId::Altimeter,
    ] {
        let text = engine.field_text(field).unwrap();
        let revalidated = validator
            .validate(field, text, &atis_core::models::ValidValues::new())
            .unwrap();
        assert_eq!(Some(&revalidated), engine.value(field), "{field} via {text}");
    }
    assert_eq!(values.sequence, 11);
}

#[test]
fn negative_temperatures_and_low_spread() {
    let mut engine = AtisEngine::new(&Settings::default());
    engine.update(RawFieldId::Temperature, "-3").unwrap();
    engine.update(RawFieldId::Dewpoint, "M05").unwrap();
    assert_eq!(engine.derived(DerivedFieldId::SpreadWarning), Some("LOW SPREAD 2"));
    assert!(engine
        .transcript()
        .as_str()
        .contains("TEMPERATURE M03/M05 LOW SPREAD 2."));
}

#[test]
fn export_names_file_after_identity_fields() {
    let engine = ksea_engine();
    let export = engine.export_transcript();
    assert_eq!(export.filename, "KSEA_A_1453Z.txt");
    assert_eq!(export.content, format!("{}\n", engine.transcript()));

    let dir = tempfile::tempdir().unwrap();
    let path = export.write_to(dir.path()).unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), export.content);
}

#[test]
fn publication_serializes_for_front_ends() {
    let mut engine = AtisEngine::new(&Settings::default());
    let json = Arc::new(Mutex::new(String::new()));
    let sink = Arc::clone(&json);
    engine.subscribe(move |p| *sink.lock().unwrap() = serde_json::to_string(p).unwrap());

    engine.update(RawFieldId::Time, "2460").unwrap_err();
    let json = json.lock().unwrap();
    assert!(json.contains("\"accepted\":false"));
    assert!(json.contains("\"kind\":\"RangeError\""));
}

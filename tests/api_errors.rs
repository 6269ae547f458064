// API error path tests
// These test error handling, conversions, and edge cases in the API layer

use citation_patterns::{CitationError, Database, LookupError, Sources, Warning};

const VARIABLES: &str = r#"{ "page": "(?P<page>\\d+)", "group": { "inner": "x" } }"#;
const REPORTERS: &str = r#"{ "X.": [ { "name": "X Reports", "editions": { "X.": {} } } ] }"#;

fn sources<'a>(variables: &'a str, reporters: &'a str) -> Sources<'a> {
    Sources {
        variables,
        reporters,
        ..Sources::default()
    }
}

#[test]
fn test_api_invalid_variables_json() {
    let result = Database::build(sources("{ invalid", REPORTERS));
    if let Err(CitationError::Json(_)) = result {
        // Success
    } else {
        panic!("Expected JSON error");
    }
}

#[test]
fn test_api_variables_must_be_an_object() {
    let result = Database::build(sources("[1, 2]", REPORTERS));
    match result {
        Err(CitationError::NotAnObject { found }) => assert_eq!(found, "an array"),
        _ => panic!("Expected not-an-object error"),
    }
}

#[test]
fn test_api_bad_date_in_one_record_keeps_other_series() {
    let reporters = r#"{
        "A.": [ { "name": "A Reports", "editions": { "A.": { "start": "someday", "end": "1885" } } } ],
        "B.": [ { "name": "B Reports", "editions": { "B.": { "start": "1900-01-01" } } } ]
    }"#;
    let mut warnings: Vec<Warning> = Vec::new();
    let db = Database::build_with(sources(VARIABLES, reporters), &mut warnings).unwrap();

    assert_eq!(db.indices().series_for_edition("A."), Some("A."));
    assert_eq!(db.indices().series_for_edition("B."), Some("B."));
    let edition = &db.reporters().get("A.").unwrap()[0].editions.get("A.").unwrap();
    assert_eq!(edition.start, None);
    assert!(edition.end.is_some());
    assert_eq!(
        warnings,
        vec![Warning::InvalidDate {
            series: "A.".to_string(),
            field: "editions.A..start".to_string(),
            value: "someday".to_string(),
        }]
    );
}

#[test]
fn test_api_null_collections_keep_other_series() {
    let reporters = r#"{
        "A.": [ { "name": "A Reports", "editions": null, "variations": null } ],
        "B.": [ { "name": "B Reports", "editions": { "B.": {} }, "variations": { "B": "B." } } ]
    }"#;
    let mut warnings: Vec<Warning> = Vec::new();
    let db = Database::build_with(sources(VARIABLES, reporters), &mut warnings).unwrap();

    assert!(warnings.is_empty());
    assert_eq!(db.reporters().len(), 2);
    assert!(db.indices().editions_for_name("A Reports").unwrap().is_empty());
    assert_eq!(db.indices().series_for_edition("B."), Some("B."));
    assert_eq!(db.indices().variation_candidates("B"), Some(&["B.".to_string()][..]));
}

#[test]
fn test_api_malformed_record_is_a_warning() {
    let reporters = r#"{
        "A.": [ { "name": "A Reports", "editions": { "A.": "not an edition" } } ],
        "B.": [ { "name": "B Reports", "editions": { "B.": {} } } ]
    }"#;
    let mut warnings: Vec<Warning> = Vec::new();
    let db = Database::build_with(sources(VARIABLES, reporters), &mut warnings).unwrap();

    assert_eq!(db.reporters().get("A.").map(Vec::len), Some(0));
    assert_eq!(db.indices().series_for_edition("B."), Some("B."));
    assert!(matches!(
        &warnings[..],
        [Warning::MalformedRecord { series, position: 0, .. }] if series == "A."
    ));
}

#[test]
fn test_api_optional_documents_are_parsed_when_present() {
    let result = Database::build(Sources {
        laws: Some("not json"),
        ..sources(VARIABLES, REPORTERS)
    });
    assert!(matches!(result, Err(CitationError::Json(_))));
}

#[test]
fn test_api_empty_reporters() {
    let db = Database::build(sources(VARIABLES, "{}")).unwrap();
    assert!(db.patterns().is_empty());
    assert!(db.indices().editions().is_empty());
}

#[test]
fn test_api_cycles_are_warnings() {
    let mut warnings: Vec<Warning> = Vec::new();
    let db = Database::build_with(
        sources(r#"{ "a": "x$b", "b": "y$a" }"#, REPORTERS),
        &mut warnings,
    )
    .unwrap();
    assert_eq!(db.variables().get("a"), Some("x$b"));
    assert!(warnings
        .iter()
        .all(|w| matches!(w, Warning::CircularReference { .. })));
    assert_eq!(warnings.len(), 4);
}

#[test]
fn test_api_edition_collisions_are_warnings() {
    let reporters = r#"{
        "X.": [ { "name": "X Reports", "editions": { "X.": {} } } ],
        "Y.": [ { "name": "Y Reports", "editions": { "Y.": {}, "X.": {} } } ]
    }"#;
    let mut warnings: Vec<Warning> = Vec::new();
    let db = Database::build_with(sources(VARIABLES, reporters), &mut warnings).unwrap();
    assert_eq!(db.indices().series_for_edition("X."), Some("X."));
    assert_eq!(db.indices().collisions(), 1);
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_api_missing_pattern_path() {
    let db = Database::build(sources(VARIABLES, REPORTERS)).unwrap();
    let err = db.pattern_tree().lookup("group.outer").unwrap_err();
    assert!(matches!(err, LookupError::MissingSegment { .. }));
    assert_eq!(err.segment(), "outer");
}

#[test]
fn test_api_lookup_error_converts_to_citation_error() {
    let db = Database::build(sources(VARIABLES, REPORTERS)).unwrap();
    let err: CitationError = db.pattern_tree().lookup("nope").unwrap_err().into();
    assert!(matches!(err, CitationError::Lookup(_)));
}

#[test]
fn test_api_error_display() {
    let db = Database::build(sources(VARIABLES, REPORTERS)).unwrap();
    let err = db.pattern_tree().lookup("group.inner.deeper").unwrap_err();
    let error_string = format!("{}", err);
    assert_eq!(error_string, "`inner` is a pattern, not a group");

    let report = miette::Report::new(err);
    assert!(!format!("{report:?}").is_empty());
}

#[test]
fn test_api_invalid_pattern_error() {
    let reporters = r#"{ "X.": [ { "name": "X", "editions": { "X.": { "regexes": ["(?P<page>$edition"] } } } ] }"#;
    let db = Database::build(sources(VARIABLES, reporters)).unwrap();
    let err = db.patterns()[0].compile().unwrap_err();
    match err {
        CitationError::InvalidPattern { pattern, .. } => assert_eq!(pattern, r"(?<page>(?:X\.)"),
        other => panic!("Expected invalid pattern, got {other:?}"),
    }
}

use crate::diagnostics::{LogSink, Warning, WarningSink};
use crate::error::CitationError;
use crate::index::Indices;
use crate::patterns::{journal_patterns, law_patterns, reporter_patterns, ResolvedPattern};
use crate::records::{invalid_dates, Abbreviations, Journals, Laws, Reporters};
use crate::serialization::OrderedMap;
use crate::tree::PatternTree;
use crate::variables::VariableTable;
use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Raw JSON documents a [`Database`] is built from. Only the variables and
/// the reporters are required.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sources<'a> {
    pub variables: &'a str,
    pub reporters: &'a str,
    pub laws: Option<&'a str>,
    pub journals: Option<&'a str>,
    pub state_abbreviations: Option<&'a str>,
    pub case_name_abbreviations: Option<&'a str>,
}

/// Everything derived from the citation data, built once and read-only
/// afterwards.
///
/// Serializing a database emits the derived outputs (variables, indices,
/// patterns), not the source records.
#[derive(Debug, Clone)]
pub struct Database {
    variables: VariableTable,
    pattern_tree: PatternTree,
    reporters: Reporters,
    laws: Laws,
    journals: Journals,
    state_abbreviations: Abbreviations,
    case_name_abbreviations: Abbreviations,
    indices: Indices,
    patterns: Vec<ResolvedPattern>,
}

impl Serialize for Database {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Database", 3)?;
        state.serialize_field("variables", &self.variables)?;
        state.serialize_field("indices", &self.indices)?;
        state.serialize_field("patterns", &self.patterns)?;
        state.end()
    }
}

impl Database {
    /// Builds the database, reporting data-quality warnings to the `log` facade.
    ///
    /// # Errors
    /// Returns a `CitationError` if any document is not valid JSON or its root
    /// does not have the expected shape. Malformed records inside a valid
    /// document are skipped with a warning.
    pub fn build(sources: Sources<'_>) -> Result<Self, CitationError> {
        Self::build_with(sources, &mut LogSink)
    }

    /// Builds the database, reporting data-quality warnings to `sink`.
    ///
    /// # Errors
    /// Same as [`Database::build`].
    pub fn build_with(sources: Sources<'_>, sink: &mut dyn WarningSink) -> Result<Self, CitationError> {
        let variable_doc: Value = serde_json::from_str(sources.variables)?;
        let variables = VariableTable::from_document(&variable_doc, sink)?;
        let pattern_tree = PatternTree::convert(&variable_doc, &variables);

        let reporters: Reporters = parse_series(sources.reporters, sink)?;
        let laws: Laws = match sources.laws {
            Some(text) => parse_series(text, sink)?,
            None => Laws::default(),
        };
        let journals: Journals = match sources.journals {
            Some(text) => parse_series(text, sink)?,
            None => Journals::default(),
        };
        let state_abbreviations: Abbreviations = parse_optional(sources.state_abbreviations)?;
        let case_name_abbreviations: Abbreviations =
            parse_optional(sources.case_name_abbreviations)?;

        let indices = Indices::build(&reporters, sink);

        let mut patterns = Vec::new();
        for (key, records) in reporters.iter() {
            for reporter in records {
                patterns.extend(reporter_patterns(key, reporter, &variables));
            }
        }
        for (key, records) in laws.iter() {
            for law in records {
                patterns.extend(law_patterns(key, law, &variables));
            }
        }
        for (key, records) in journals.iter() {
            for journal in records {
                patterns.extend(journal_patterns(key, journal, &variables));
            }
        }

        log::debug!(
            "built citation database: {} variables, {} reporters, {} laws, {} journals, {} patterns",
            variables.len(),
            reporters.len(),
            laws.len(),
            journals.len(),
            patterns.len()
        );

        Ok(Database {
            variables,
            pattern_tree,
            reporters,
            laws,
            journals,
            state_abbreviations,
            case_name_abbreviations,
            indices,
            patterns,
        })
    }

    pub fn variables(&self) -> &VariableTable {
        &self.variables
    }

    /// The variable document with each pattern resolved, for dotted-path lookups.
    pub fn pattern_tree(&self) -> &PatternTree {
        &self.pattern_tree
    }

    pub fn indices(&self) -> &Indices {
        &self.indices
    }

    /// Every resolved pattern: reporters first, then laws, then journals,
    /// each in document order.
    pub fn patterns(&self) -> &[ResolvedPattern] {
        &self.patterns
    }

    /// Reporter patterns built for one edition key.
    pub fn patterns_for_edition<'a>(&'a self, edition: &'a str) -> impl Iterator<Item = &'a ResolvedPattern> {
        self.patterns
            .iter()
            .filter(move |p| p.edition.as_deref() == Some(edition))
    }

    /// All patterns of one series key, of any kind.
    pub fn patterns_for_series<'a>(&'a self, series: &'a str) -> impl Iterator<Item = &'a ResolvedPattern> {
        self.patterns.iter().filter(move |p| p.series == series)
    }

    pub fn reporters(&self) -> &Reporters {
        &self.reporters
    }

    pub fn laws(&self) -> &Laws {
        &self.laws
    }

    pub fn journals(&self) -> &Journals {
        &self.journals
    }

    pub fn state_abbreviation(&self, abbreviation: &str) -> Option<&str> {
        self.state_abbreviations.get(abbreviation).map(String::as_str)
    }

    pub fn case_name_abbreviation(&self, abbreviation: &str) -> Option<&str> {
        self.case_name_abbreviations
            .get(abbreviation)
            .map(String::as_str)
    }

    /// Serializes the derived outputs into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self)
    }

    /// Serializes the derived outputs into a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self)
    }
}

/// Loads a series document record by record. Only a document that is not a
/// JSON object is an error; a series value that is not an array, or a record
/// that does not deserialize, is reported to `sink` and left out.
fn parse_series<T>(source: &str, sink: &mut dyn WarningSink) -> Result<OrderedMap<Vec<T>>, CitationError>
where
    T: DeserializeOwned,
{
    let raw: OrderedMap<Value> = serde_json::from_str(source)?;
    let mut series = OrderedMap::new();
    for (key, value) in raw.iter() {
        let items: &[Value] = match value {
            Value::Array(items) => items.as_slice(),
            Value::Null => &[],
            other => {
                sink.warn(Warning::MalformedRecord {
                    series: key.to_string(),
                    position: 0,
                    reason: format!("expected an array of records, found {other}"),
                });
                continue;
            }
        };
        let mut records = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            for (field, value) in invalid_dates(item) {
                sink.warn(Warning::InvalidDate {
                    series: key.to_string(),
                    field,
                    value,
                });
            }
            match T::deserialize(item) {
                Ok(record) => records.push(record),
                Err(err) => sink.warn(Warning::MalformedRecord {
                    series: key.to_string(),
                    position,
                    reason: err.to_string(),
                }),
            }
        }
        series.insert(key.to_string(), records);
    }
    Ok(series)
}

fn parse_optional<T>(source: Option<&str>) -> Result<T, CitationError>
where
    T: serde::de::DeserializeOwned + Default,
{
    match source {
        Some(text) => Ok(serde_json::from_str(text)?),
        None => Ok(T::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARIABLES: &str = r#"{
        "volume": "(?P<volume>\\d+)",
        "page": "(?P<page>\\d+)",
        "full_cite": "$volume (?P<reporter>$edition) $page"
    }"#;

    const REPORTERS: &str = r#"{
        "U.S.": [{
            "name": "United States Supreme Court Reports",
            "cite_type": "federal",
            "editions": {
                "U.S.": { "start": "1875-01-01T00:00:00", "end": null, "regexes": ["$full_cite"] }
            },
            "variations": { "U. S.": "U.S." },
            "examples": ["410 U.S. 113", "5 U. S. 137"]
        }]
    }"#;

    #[test]
    fn test_build_minimal_database() {
        let mut warnings: Vec<Warning> = Vec::new();
        let db = Database::build_with(
            Sources {
                variables: VARIABLES,
                reporters: REPORTERS,
                ..Sources::default()
            },
            &mut warnings,
        )
        .unwrap();

        assert!(warnings.is_empty());
        assert_eq!(db.patterns().len(), 1);
        assert_eq!(
            db.patterns()[0].pattern,
            r"(?<volume>\d+) (?<reporter>(?:U\.S\.|U\. S\.)) (?<page>\d+)"
        );
        assert_eq!(db.patterns_for_edition("U.S.").count(), 1);
        assert_eq!(db.indices().series_for_edition("U.S."), Some("U.S."));
        assert!(db.laws().is_empty());
        assert!(db.state_abbreviation("Ala.").is_none());
    }

    #[test]
    fn test_to_json_contains_derived_outputs() {
        let db = Database::build(Sources {
            variables: VARIABLES,
            reporters: REPORTERS,
            ..Sources::default()
        })
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&db.to_json().unwrap()).unwrap();
        assert_eq!(json["indices"]["editions"]["U.S."], "U.S.");
        assert_eq!(json["indices"]["variations"]["U. S."][0], "U.S.");
        assert_eq!(json["patterns"][0]["kind"], "reporter");
        assert_eq!(json["variables"]["page"], "(?P<page>\\d+)");
    }

    #[test]
    fn test_to_yaml() {
        let db = Database::build(Sources {
            variables: VARIABLES,
            reporters: REPORTERS,
            ..Sources::default()
        })
        .unwrap();
        let yaml = db.to_yaml().unwrap();
        assert!(yaml.contains("United States Supreme Court Reports"));
    }

    #[test]
    fn test_bad_reporters_json() {
        let result = Database::build(Sources {
            variables: VARIABLES,
            reporters: "[\"U.S.\"]",
            ..Sources::default()
        });
        assert!(matches!(result, Err(CitationError::Json(_))));
    }

    #[test]
    fn test_series_that_is_not_a_list_is_skipped() {
        let mut warnings: Vec<Warning> = Vec::new();
        let reporters: Reporters = parse_series(r#"{ "X.": 3, "Y.": null }"#, &mut warnings).unwrap();
        assert!(!reporters.contains_key("X."));
        assert_eq!(reporters.get("Y.").map(Vec::len), Some(0));
        assert!(matches!(
            &warnings[..],
            [Warning::MalformedRecord { series, position: 0, .. }] if series == "X."
        ));
    }

    #[test]
    fn test_malformed_record_keeps_its_siblings() {
        let mut warnings: Vec<Warning> = Vec::new();
        let laws: Laws = parse_series(
            r#"{ "Stat.": [ { "name": ["not", "a", "name"] }, { "name": "Statutes at Large" } ] }"#,
            &mut warnings,
        )
        .unwrap();
        let records = laws.get("Stat.").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Statutes at Large");
        assert!(matches!(
            &warnings[..],
            [Warning::MalformedRecord { position: 0, .. }]
        ));
    }
}

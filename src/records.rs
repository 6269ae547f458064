//! Typed shapes of the reporter, law, and journal documents.
//!
//! Every collection field defaults to empty so that an incomplete record still
//! takes part in index construction. Checking that the data is complete is the
//! job of a schema validator, not of this crate.

use crate::serialization::{is_comment, is_invalid_date, lenient_date, null_as_default, OrderedMap};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One abbreviation era of a reporter, e.g. `A.2d` of the Atlantic Reporter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Edition {
    #[serde(default, deserialize_with = "lenient_date")]
    pub start: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub end: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub regexes: Vec<String>,
    #[serde(flatten)]
    pub metadata: OrderedMap<serde_json::Value>,
}

impl Edition {
    /// `start <= end` whenever both are known.
    pub fn has_valid_range(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }
}

/// A court reporter series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reporter {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub cite_type: Option<String>,
    /// Display template such as `{reporter} {volume}-{page}`. Not a regex.
    #[serde(default)]
    pub cite_format: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub editions: OrderedMap<Edition>,
    /// Alternate spelling -> edition key it normalizes to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub variations: OrderedMap<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub examples: Vec<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
}

/// A session-law series. Its variations are plain alternate spellings of the
/// series key rather than a mapping to editions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Law {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub cite_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub regexes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub examples: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variations: Vec<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub start: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub end: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Journal {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub cite_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub regexes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub examples: Vec<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub start: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub end: Option<NaiveDateTime>,
}

/// Series key -> every reporter published under that key.
pub type Reporters = OrderedMap<Vec<Reporter>>;
pub type Laws = OrderedMap<Vec<Law>>;
pub type Journals = OrderedMap<Vec<Journal>>;
/// Abbreviation -> expansion (state names, case-name words).
pub type Abbreviations = OrderedMap<String>;

/// `start`/`end` values of a raw record that will read as unknown, as
/// `(field path, raw value)` pairs. Edition dates are reported as
/// `editions.<key>.start`.
pub fn invalid_dates(record: &Value) -> Vec<(String, String)> {
    let mut found = Vec::new();
    collect_invalid_dates(record, "", &mut found);
    if let Some(Value::Object(editions)) = record.get("editions") {
        for (key, edition) in editions.iter().filter(|(k, _)| !is_comment(k)) {
            collect_invalid_dates(edition, &format!("editions.{key}."), &mut found);
        }
    }
    found
}

fn collect_invalid_dates(record: &Value, prefix: &str, found: &mut Vec<(String, String)>) {
    for field in ["start", "end"] {
        if let Some(raw) = record.get(field).filter(|raw| is_invalid_date(raw)) {
            let shown = match raw {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            found.push((format!("{prefix}{field}"), shown));
        }
    }
}

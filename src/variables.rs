use crate::diagnostics::{LogSink, Warning, WarningSink};
use crate::error::CitationError;
use crate::resolver::{substitute_with_depth, DEFAULT_MAX_DEPTH};
use crate::serialization::is_comment;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Suffix of the synthesized "may be absent" variant of every variable.
pub const OPTIONAL_SUFFIX: &str = "_optional";

/// A flat mapping from variable name to regex fragment.
///
/// Built once from the nested variable document and immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VariableTable {
    entries: BTreeMap<String, String>,
}

impl VariableTable {
    /// Parses and processes a variable document using [`LogSink`] for warnings.
    ///
    /// # Errors
    /// Returns an error if `source` is not JSON or its root is not an object.
    pub fn from_json(source: &str) -> Result<Self, CitationError> {
        let doc: Value = serde_json::from_str(source)?;
        Self::from_document(&doc, &mut LogSink)
    }

    /// Processes an already parsed variable document:
    ///
    /// - keys ending in `#` are comments and are dropped,
    /// - nested objects are flattened, so `{"page": {"": "A", "foo": "B"}}`
    ///   becomes `{"page": "A", "page_foo": "B"}`,
    /// - every key gets an `_optional` variant, `(?:<value> ?)?`,
    /// - references between entries are resolved.
    ///
    /// An entry that does not resolve to a fixed point keeps its unresolved
    /// value and is reported to `sink`.
    ///
    /// # Errors
    /// Returns [`CitationError::NotAnObject`] if the root of `doc` is not an object.
    pub fn from_document(doc: &Value, sink: &mut dyn WarningSink) -> Result<Self, CitationError> {
        let root = doc.as_object().ok_or_else(|| CitationError::NotAnObject {
            found: json_kind(doc).to_string(),
        })?;

        let mut raw = BTreeMap::new();
        flatten_into(root, "", &mut raw);

        let optional: Vec<(String, String)> = raw
            .iter()
            .map(|(k, v)| (format!("{k}{OPTIONAL_SUFFIX}"), optional_variant(v)))
            .collect();
        raw.extend(optional);

        let raw = VariableTable { entries: raw };
        Ok(raw.resolved(sink))
    }

    /// Resolves every entry against the whole (unresolved) table.
    fn resolved(&self, sink: &mut dyn WarningSink) -> VariableTable {
        let mut entries = BTreeMap::new();
        for (name, value) in &self.entries {
            let substitution = substitute_with_depth(value, self, DEFAULT_MAX_DEPTH);
            if substitution.converged {
                entries.insert(name.clone(), substitution.value);
            } else {
                sink.warn(Warning::CircularReference {
                    variable: name.clone(),
                    value: value.clone(),
                });
                entries.insert(name.clone(), value.clone());
            }
        }
        VariableTable { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableTable {
    /// Builds a table verbatim: no flattening, optional variants, or resolution.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        VariableTable {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

pub fn optional_variant(value: &str) -> String {
    format!("(?:{value} ?)?")
}

fn flatten_into(object: &Map<String, Value>, parent: &str, out: &mut BTreeMap<String, String>) {
    for (key, value) in object {
        if is_comment(key) {
            continue;
        }
        let name = join_key(parent, key);
        match value {
            Value::Object(child) => flatten_into(child, &name, out),
            leaf => {
                out.insert(name, stringify(leaf));
            }
        }
    }
}

fn join_key(parent: &str, key: &str) -> String {
    match (parent.is_empty(), key.is_empty()) {
        (true, _) => key.to_string(),
        (false, true) => parent.to_string(),
        (false, false) => format!("{parent}_{key}"),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

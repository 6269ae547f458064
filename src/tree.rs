use crate::error::LookupError;
use crate::groups::normalize_groups;
use crate::resolver::substitute;
use crate::serialization::is_comment;
use crate::variables::VariableTable;
use miette::NamedSource;
use serde::Serialize;
use serde_json::{Map, Value};

/// The variable document with every pattern resolved and converted to
/// `(?<name>...)` syntax, keeping its nested shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PatternTree {
    root: Value,
}

impl PatternTree {
    /// Resolves every string leaf of `doc` against `table`. Comment keys are
    /// dropped and other scalars are kept unchanged.
    pub fn convert(doc: &Value, table: &VariableTable) -> Self {
        PatternTree {
            root: convert_value(doc, table),
        }
    }

    /// Fetches the pattern at a dotted path such as `page.with_commas`.
    ///
    /// # Errors
    /// Fails if a segment is absent, if a segment before the last names a
    /// pattern instead of a group, or if the path ends at a non-string.
    pub fn lookup(&self, path: &str) -> Result<&str, LookupError> {
        let mut current = &self.root;
        let mut offset = 0;

        for segment in path.split('.') {
            let span = (offset, segment.len()).into();
            current = match current {
                Value::Object(map) => map.get(segment).ok_or_else(|| LookupError::MissingSegment {
                    segment: segment.to_string(),
                    src: NamedSource::new("pattern path", path.to_string()),
                    span,
                })?,
                _ => {
                    return Err(LookupError::NotAGroup {
                        segment: previous_segment(path, offset).to_string(),
                        src: NamedSource::new("pattern path", path.to_string()),
                        span: previous_span(path, offset),
                    })
                }
            };
            offset += segment.len() + 1;
        }

        current.as_str().ok_or_else(|| LookupError::NotAPattern {
            path: path.to_string(),
            src: NamedSource::new("pattern path", path.to_string()),
            span: (0, path.len()).into(),
        })
    }

    pub fn root(&self) -> &Value {
        &self.root
    }
}

fn convert_value(value: &Value, table: &VariableTable) -> Value {
    match value {
        Value::String(template) => Value::String(normalize_groups(&substitute(template, table))),
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !is_comment(key))
                .map(|(key, child)| (key.clone(), convert_value(child, table)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| convert_value(v, table)).collect()),
        other => other.clone(),
    }
}

// The segment ending just before `offset` (which points past its trailing dot).
fn previous_segment(path: &str, offset: usize) -> &str {
    let end = offset.saturating_sub(1);
    let start = path[..end].rfind('.').map_or(0, |i| i + 1);
    &path[start..end]
}

fn previous_span(path: &str, offset: usize) -> miette::SourceSpan {
    let end = offset.saturating_sub(1);
    let start = path[..end].rfind('.').map_or(0, |i| i + 1);
    (start, end - start).into()
}

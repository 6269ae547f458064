use crate::edition::{dedup, expand_edition, expand_placeholder};
use crate::error::CitationError;
use crate::groups::normalize_groups;
use crate::records::{Journal, Law, Reporter};
use crate::resolver::substitute;
use crate::variables::VariableTable;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Reporter,
    Law,
    Journal,
}

/// A fully resolved, edition-expanded pattern in `(?<name>...)` syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPattern {
    pub kind: SeriesKind,
    /// Series key the pattern belongs to.
    pub series: String,
    /// Edition key, for reporter patterns.
    pub edition: Option<String>,
    /// The template as written in the source document.
    pub template: String,
    pub pattern: String,
}

impl ResolvedPattern {
    /// The pattern with start and end anchors, see [`anchor`].
    pub fn anchored(&self) -> String {
        anchor(&self.pattern)
    }

    /// Compiles the pattern for whole-string matching.
    ///
    /// # Errors
    /// Returns [`CitationError::InvalidPattern`] if the regex engine rejects it.
    pub fn compile(&self) -> Result<FullMatcher, CitationError> {
        FullMatcher::new(&self.pattern)
    }
}

/// Adds `^` and `$` unless the pattern already starts or ends with them.
/// A trailing `\$` is a literal dollar sign, not an anchor.
pub fn anchor(pattern: &str) -> String {
    let mut anchored = String::with_capacity(pattern.len() + 2);
    if !pattern.starts_with('^') {
        anchored.push('^');
    }
    anchored.push_str(pattern);
    if !ends_with_anchor(pattern) {
        anchored.push('$');
    }
    anchored
}

fn ends_with_anchor(pattern: &str) -> bool {
    let Some(body) = pattern.strip_suffix('$') else {
        return false;
    };
    let backslashes = body.chars().rev().take_while(|c| *c == '\\').count();
    backslashes % 2 == 0
}

/// A compiled pattern that only accepts matches spanning the whole input.
#[derive(Debug, Clone)]
pub struct FullMatcher {
    regex: Regex,
}

impl FullMatcher {
    /// # Errors
    /// Returns [`CitationError::InvalidPattern`] if the regex engine rejects `pattern`.
    pub fn new(pattern: &str) -> Result<Self, CitationError> {
        // The outer group keeps a top-level alternation inside the anchors.
        let full = format!(r"\A(?:{})\z", anchor(pattern));
        let regex = Regex::new(&full).map_err(|source| CitationError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Named groups that took part in the match, by name.
    pub fn captures<'t>(&self, text: &'t str) -> Option<BTreeMap<String, &'t str>> {
        let caps = self.regex.captures(text)?;
        Some(
            self.regex
                .capture_names()
                .flatten()
                .filter_map(|name| caps.name(name).map(|m| (name.to_string(), m.as_str())))
                .collect(),
        )
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.regex.capture_names().flatten().any(|n| n == name)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Every pattern of one reporter record: for each edition and each of its
/// templates, substitute variables, expand `$edition` into the edition's
/// spellings, then normalize named groups.
pub fn reporter_patterns(series: &str, reporter: &Reporter, table: &VariableTable) -> Vec<ResolvedPattern> {
    let mut patterns = Vec::new();
    for (edition_key, edition) in reporter.editions.iter() {
        for template in &edition.regexes {
            let substituted = substitute(template, table);
            for expanded in expand_edition(&substituted, edition_key, &reporter.variations) {
                patterns.push(ResolvedPattern {
                    kind: SeriesKind::Reporter,
                    series: series.to_string(),
                    edition: Some(edition_key.to_string()),
                    template: template.clone(),
                    pattern: normalize_groups(&expanded),
                });
            }
        }
    }
    patterns
}

/// Patterns of a session-law record. The series placeholder expands to the
/// series key and the law's alternate spellings.
pub fn law_patterns(series: &str, law: &Law, table: &VariableTable) -> Vec<ResolvedPattern> {
    let spellings = dedup(std::iter::once(series).chain(law.variations.iter().map(String::as_str)));
    series_patterns(SeriesKind::Law, series, &law.regexes, &spellings, table)
}

/// Patterns of a journal record. The series placeholder expands to the key.
pub fn journal_patterns(series: &str, journal: &Journal, table: &VariableTable) -> Vec<ResolvedPattern> {
    series_patterns(SeriesKind::Journal, series, &journal.regexes, &[series], table)
}

fn series_patterns(
    kind: SeriesKind,
    series: &str,
    templates: &[String],
    spellings: &[&str],
    table: &VariableTable,
) -> Vec<ResolvedPattern> {
    templates
        .iter()
        .map(|template| {
            let substituted = substitute(template, table);
            let expanded = expand_placeholder(&substituted, spellings);
            ResolvedPattern {
                kind,
                series: series.to_string(),
                edition: None,
                template: template.clone(),
                pattern: normalize_groups(&expanded),
            }
        })
        .collect()
}

/// Which patterns and examples of a record failed to find a partner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleCoverage {
    /// Templates whose pattern matches none of the examples.
    pub unmatched_templates: Vec<String>,
    /// Examples that no pattern matches.
    pub unmatched_examples: Vec<String>,
}

impl ExampleCoverage {
    /// Every pattern matches an example and every example matches a pattern.
    pub fn is_exact(&self) -> bool {
        self.unmatched_templates.is_empty() && self.unmatched_examples.is_empty()
    }
}

/// Checks `patterns` against a record's `examples` with fullmatch semantics.
///
/// # Errors
/// Returns [`CitationError::InvalidPattern`] for the first pattern that does
/// not compile.
pub fn check_examples(patterns: &[ResolvedPattern], examples: &[String]) -> Result<ExampleCoverage, CitationError> {
    let mut coverage = ExampleCoverage::default();
    let mut matched: BTreeSet<&str> = BTreeSet::new();

    for pattern in patterns {
        let matcher = pattern.compile()?;
        let mut any = false;
        for example in examples {
            if matcher.is_match(example) {
                any = true;
                matched.insert(example);
            }
        }
        if !any {
            coverage.unmatched_templates.push(pattern.template.clone());
        }
    }

    coverage.unmatched_examples = examples
        .iter()
        .filter(|e| !matched.contains(e.as_str()))
        .cloned()
        .collect();
    Ok(coverage)
}

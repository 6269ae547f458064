use crate::serialization::OrderedMap;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

// `$edition`, `${edition}`, `$reporter`, `${reporter}`
static SERIES_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?:\{(?:edition|reporter)\}|(?:edition|reporter)\b)")
        .expect("series placeholder pattern is valid")
});

/// Escapes the characters `. * + ? ^ $ { } ( ) | [ ] \` for literal use in a regex.
pub fn escape_regex(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len() + 4);
    for c in literal.chars() {
        if matches!(
            c,
            '.' | '*' | '+' | '?' | '^' | '$' | '{' | '}' | '(' | ')' | '|' | '[' | ']' | '\\'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// True when `template` has an edition (or reporter) placeholder to expand.
pub fn has_series_placeholder(template: &str) -> bool {
    SERIES_PLACEHOLDER.is_match(template)
}

/// The spellings that should match `canonical`: the canonical abbreviation
/// first, then every variation pointing at it in map order, without repeats.
pub fn edition_strings<'a>(canonical: &'a str, variations: &'a OrderedMap<String>) -> Vec<&'a str> {
    let candidates = std::iter::once(canonical).chain(
        variations
            .iter()
            .filter(|(_, target)| target.as_str() == canonical)
            .map(|(variation, _)| variation),
    );
    dedup(candidates)
}

/// A non-capturing group matching any of `strings` literally.
pub fn alternation<S: AsRef<str>>(strings: &[S]) -> String {
    let escaped: Vec<String> = strings.iter().map(|s| escape_regex(s.as_ref())).collect();
    format!("(?:{})", escaped.join("|"))
}

/// Replaces every series placeholder in `template` with an alternation of `strings`.
pub fn expand_placeholder<S: AsRef<str>>(template: &str, strings: &[S]) -> String {
    let group = alternation(strings);
    SERIES_PLACEHOLDER
        .replace_all(template, NoExpand(&group))
        .into_owned()
}

/// Expands the `$edition` placeholder of `template` into an alternation of
/// the canonical edition name and its variations.
///
/// The result is always a single pattern; the list shape leaves room for a
/// one-pattern-per-spelling expansion.
pub fn expand_edition(template: &str, canonical: &str, variations: &OrderedMap<String>) -> Vec<String> {
    if !has_series_placeholder(template) {
        return vec![template.to_string()];
    }
    let strings = edition_strings(canonical, variations);
    vec![expand_placeholder(template, &strings)]
}

pub(crate) fn dedup<'a>(strings: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for s in strings {
        if !seen.contains(&s) {
            seen.push(s);
        }
    }
    seen
}

use crate::variables::VariableTable;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Substitution passes before a template is assumed to be cyclic.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Upper bound on the length of a partially expanded template. A cycle that
/// duplicates itself (`{a: "$a$a"}`) would otherwise grow exponentially long
/// before the depth bound is reached.
pub const MAX_EXPANSION_LEN: usize = 1 << 20;

// `$name` or `${name}`
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(?:\{(\w+)\}|(\w+))").expect("placeholder pattern is valid"));

/// The result of running a template to its fixed point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub value: String,
    /// `false` when the depth or length bound stopped the expansion, which
    /// means the template references a cycle.
    pub converged: bool,
}

/// Recursively substitutes `$name` / `${name}` placeholders in `template`
/// with values from `table`, e.g.
///
/// ```
/// use citation_patterns::resolver::substitute;
/// use citation_patterns::variables::VariableTable;
///
/// let table: VariableTable = [("a", "$b"), ("b", "$c"), ("c", "foo")].into_iter().collect();
/// assert_eq!(substitute("$a $b $c", &table), "foo foo foo");
/// ```
///
/// Placeholders whose name is not in the table are left untouched. A cyclic
/// reference returns the best-effort partial expansion after
/// [`DEFAULT_MAX_DEPTH`] passes instead of failing.
pub fn substitute(template: &str, table: &VariableTable) -> String {
    substitute_with_depth(template, table, DEFAULT_MAX_DEPTH).value
}

/// Like [`substitute`], with an explicit pass bound, reporting whether a fixed
/// point was reached.
pub fn substitute_with_depth(template: &str, table: &VariableTable, max_depth: usize) -> Substitution {
    let mut current = template.to_string();

    for _ in 0..max_depth {
        let next = substitute_once(&current, table);
        if next == current {
            return Substitution {
                value: current,
                converged: true,
            };
        }
        if next.len() > MAX_EXPANSION_LEN {
            return Substitution {
                value: current,
                converged: false,
            };
        }
        current = next;
    }

    // The bound was spent on changing passes; one more pass tells whether the
    // last of them happened to land on the fixed point.
    let converged = substitute_once(&current, table) == current;
    Substitution {
        value: current,
        converged,
    }
}

/// True when `template` still contains a placeholder for `name`.
pub fn references(template: &str, name: &str) -> bool {
    PLACEHOLDER
        .captures_iter(template)
        .any(|caps| placeholder_name(&caps) == name)
}

fn substitute_once(template: &str, table: &VariableTable) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match table.get(placeholder_name(caps)) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn placeholder_name<'t>(caps: &Captures<'t>) -> &'t str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map_or("", |m| m.as_str())
}

/// Rewrites Python-style named groups `(?P<name>` into the PCRE form `(?<name>`.
///
/// Nothing else in the pattern is touched, and the rewrite is idempotent.
/// Python's `(?P=name)` back-references and `(?P>name)` recursion are left as is.
pub fn normalize_groups(pattern: &str) -> String {
    pattern.replace("(?P<", "(?<")
}

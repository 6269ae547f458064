use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CitationError {
    #[error("Invalid JSON input: {0}")]
    #[diagnostic(
        code(citation::json),
        help("The input document could not be read into the expected record shape.")
    )]
    Json(#[from] serde_json::Error),

    #[error("Variable document must be a JSON object, found {found}")]
    #[diagnostic(
        code(citation::not_an_object),
        help("Variables are declared as a (possibly nested) object of named patterns.")
    )]
    NotAnObject { found: String },

    #[error("Pattern failed to compile: {pattern}")]
    #[diagnostic(
        code(citation::invalid_pattern),
        help("The resolved pattern is not valid for the regex engine. Check the template and the variables it references.")
    )]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lookup(#[from] LookupError),
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum LookupError {
    #[error("No pattern group named `{segment}`")]
    #[diagnostic(
        code(lookup::missing_segment),
        help("Every segment of the path must name an entry of the pattern tree.")
    )]
    MissingSegment {
        segment: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("`{segment}` does not exist here")]
        span: SourceSpan,
    },

    #[error("`{segment}` is a pattern, not a group")]
    #[diagnostic(
        code(lookup::not_a_group),
        help("Only groups of patterns can be indexed further.")
    )]
    NotAGroup {
        segment: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("this is a pattern string")]
        span: SourceSpan,
    },

    #[error("`{path}` does not name a pattern")]
    #[diagnostic(
        code(lookup::not_a_pattern),
        help("The path ends at a group or a non-string value. Add the remaining segments.")
    )]
    NotAPattern {
        path: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("resolves to a non-pattern value")]
        span: SourceSpan,
    },
}

impl LookupError {
    /// The path segment (or full path) the lookup failed on.
    pub fn segment(&self) -> &str {
        match self {
            LookupError::MissingSegment { segment, .. } => segment,
            LookupError::NotAGroup { segment, .. } => segment,
            LookupError::NotAPattern { path, .. } => path,
        }
    }
}

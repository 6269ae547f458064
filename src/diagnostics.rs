use std::fmt::{self, Display};

/// A recoverable data-quality problem found while building patterns or indices.
///
/// Warnings never abort a build. They are handed to a [`WarningSink`] so that
/// callers decide whether to log them, count them, or fail on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A variable did not reach a fixed point within the substitution bound.
    /// The variable keeps its unresolved value.
    CircularReference { variable: String, value: String },
    /// Two series claim the same edition key. The first claim is kept.
    EditionCollision {
        edition: String,
        kept: String,
        ignored: String,
    },
    /// A `start`/`end` value that is not an ISO 8601 date. It reads as unknown.
    InvalidDate {
        series: String,
        field: String,
        value: String,
    },
    /// A record that does not have the shape of its series kind. It is left
    /// out and the rest of the document still loads.
    MalformedRecord {
        series: String,
        position: usize,
        reason: String,
    },
}

impl Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::CircularReference { variable, value } => {
                write!(f, "Circular reference detected for variable '{variable}': {value}")
            }
            Warning::EditionCollision {
                edition,
                kept,
                ignored,
            } => write!(
                f,
                "Edition '{edition}' is claimed by '{kept}' and '{ignored}'; keeping '{kept}'"
            ),
            Warning::InvalidDate {
                series,
                field,
                value,
            } => write!(f, "Series '{series}' has an invalid date in '{field}': {value}"),
            Warning::MalformedRecord {
                series,
                position,
                reason,
            } => write!(f, "Skipping record {position} of series '{series}': {reason}"),
        }
    }
}

/// Receives warnings emitted during a build.
pub trait WarningSink {
    fn warn(&mut self, warning: Warning);
}

/// Forwards every warning to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl WarningSink for LogSink {
    fn warn(&mut self, warning: Warning) {
        log::warn!("{warning}");
    }
}

impl WarningSink for Vec<Warning> {
    fn warn(&mut self, warning: Warning) {
        self.push(warning);
    }
}

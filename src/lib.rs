pub mod api;
pub mod diagnostics;
pub mod edition;
pub mod error;
pub mod groups;
pub mod index;
pub mod patterns;
pub mod records;
pub mod resolver;
pub mod serialization;
pub mod tree;
pub mod variables;

pub use api::{Database, Sources};
pub use diagnostics::{LogSink, Warning, WarningSink};
pub use edition::{escape_regex, expand_edition};
pub use error::{CitationError, LookupError};
pub use groups::normalize_groups;
pub use index::Indices;
pub use patterns::{anchor, check_examples, FullMatcher, ResolvedPattern};
pub use resolver::{substitute, substitute_with_depth, DEFAULT_MAX_DEPTH};
pub use variables::VariableTable;

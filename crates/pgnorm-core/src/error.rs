//! Error types for normalization.

use crate::parser::ParseError;

/// Errors that can occur while normalizing a statement.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// The statement text is not valid SQL.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The syntax tree is nested deeper than the configured limit.
    #[error("Statement is nested too deeply (limit {limit})")]
    TooDeep {
        /// The depth limit that was exceeded.
        limit: usize,
    },
}

/// Result type for normalization operations.
pub type Result<T> = std::result::Result<T, NormalizeError>;

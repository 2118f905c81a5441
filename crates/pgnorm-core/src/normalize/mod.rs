//! Query normalization.
//!
//! Normalization runs three passes over one parsed statement:
//!
//! 1. [`ConstLocator`] walks the syntax tree and records where each literal
//!    constant starts, plus the highest `$n` parameter already present.
//! 2. [`fill_in_constant_lengths`] re-scans the original text to find how
//!    long each constant is. The tree only knows start offsets.
//! 3. [`build_normalized_query`] copies the text, writing a placeholder
//!    over each measured constant.
//!
//! ```rust
//! use pgnorm_core::normalize;
//!
//! let sql = normalize("SELECT * FROM users WHERE id = 42 AND name = 'bob'").unwrap();
//! assert_eq!(sql, "SELECT * FROM users WHERE id = $1 AND name = $2");
//! ```

mod builder;
mod locator;
mod resolver;
mod state;

pub use builder::build_normalized_query;
pub use locator::ConstLocator;
pub use resolver::fill_in_constant_lengths;
pub use state::{LocationRecord, NormalizationState};

use tracing::debug;

use crate::ast::{Node, RawStmt};
use crate::config::NormalizeConfig;
use crate::error::Result;
use crate::parser::Parser;

/// A normalized query and what was replaced in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    /// The text with constants replaced by placeholders.
    pub text: String,
    /// Number of placeholders written.
    pub constants: usize,
    /// Highest `$n` that was already present before normalization.
    pub highest_param_id: u32,
}

/// One statement of a multi-statement text, normalized on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedStatement {
    /// Byte offset of the statement within the full text.
    pub location: usize,
    /// The statement's original text.
    pub original: String,
    /// The statement normalized.
    pub query: NormalizedQuery,
}

/// Normalizes SQL text according to a [`NormalizeConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    config: NormalizeConfig,
}

impl Normalizer {
    /// Creates a normalizer with the given configuration.
    #[must_use]
    pub const fn new(config: NormalizeConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    /// Normalizes the whole text, numbering placeholders across all of its
    /// statements.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not parse or is nested too deeply.
    pub fn normalize_query(&self, sql: &str) -> Result<NormalizedQuery> {
        let statements = self.parse(sql)?;

        let mut state = NormalizationState::new();
        let mut locator = ConstLocator::new(&mut state, self.config.max_depth);
        for raw in &statements {
            locator.visit(Node::RawStmt(raw))?;
        }

        Ok(finish(sql, sql, 0, state))
    }

    /// Normalizes each `;`-separated statement separately.
    ///
    /// Placeholder numbering restarts with every statement.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not parse or a statement is nested
    /// too deeply.
    pub fn normalize_statements(&self, sql: &str) -> Result<Vec<NormalizedStatement>> {
        self.parse(sql)?
            .iter()
            .map(|raw| {
                let mut state = NormalizationState::new();
                ConstLocator::new(&mut state, self.config.max_depth).visit(Node::RawStmt(raw))?;

                let original = raw.text(sql).unwrap_or_default();
                Ok(NormalizedStatement {
                    location: raw.location,
                    original: original.to_string(),
                    query: finish(sql, original, raw.location, state),
                })
            })
            .collect()
    }

    fn parse(&self, sql: &str) -> Result<Vec<RawStmt>> {
        let statements = Parser::with_max_depth(sql, self.config.max_depth).parse_raw_statements()?;
        debug!(statements = statements.len(), "parsed");
        Ok(statements)
    }
}

/// Resolves constant lengths against the full `sql` and rebuilds `text`,
/// which starts at byte `offset` of `sql`.
fn finish(sql: &str, text: &str, offset: usize, mut state: NormalizationState) -> NormalizedQuery {
    fill_in_constant_lengths(&mut state, sql);
    NormalizedQuery {
        text: build_normalized_query(text, offset, &state),
        constants: state.resolved_count(),
        highest_param_id: state.highest_param_id(),
    }
}

/// Normalizes `sql` with the default configuration.
///
/// # Errors
///
/// Returns an error if the text does not parse or is nested too deeply.
pub fn normalize(sql: &str) -> Result<String> {
    Normalizer::default()
        .normalize_query(sql)
        .map(|query| query.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormalizeError;

    #[test]
    fn test_normalize_simple() {
        assert_eq!(
            normalize("SELECT a FROM t WHERE b = 1 AND c = 'x'").unwrap(),
            "SELECT a FROM t WHERE b = $1 AND c = $2"
        );
    }

    #[test]
    fn test_statement_without_constants_is_unchanged() {
        let sql = "SELECT a, b FROM t WHERE a = b";
        assert_eq!(normalize(sql).unwrap(), sql);
    }

    #[test]
    fn test_normalize_query_counts() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.config().max_depth, crate::config::DEFAULT_MAX_DEPTH);

        let query = normalizer.normalize_query("SELECT $2, 10, 'y'").unwrap();
        assert_eq!(query.text, "SELECT $2, $3, $4");
        assert_eq!(query.constants, 2);
        assert_eq!(query.highest_param_id, 2);
    }

    #[test]
    fn test_statements_are_numbered_separately() {
        let sql = "SELECT 1;\nUPDATE t SET a = 'b' WHERE c = 2";
        let statements = Normalizer::default().normalize_statements(sql).unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].query.text, "SELECT $1");
        assert_eq!(statements[1].location, 10);
        assert_eq!(statements[1].original, "UPDATE t SET a = 'b' WHERE c = 2");
        assert_eq!(statements[1].query.text, "UPDATE t SET a = $1 WHERE c = $2");
    }

    #[test]
    fn test_parse_error_is_propagated() {
        let err = normalize("SELECT FROM WHERE").unwrap_err();
        assert!(matches!(err, NormalizeError::Parse(_)));
    }
}

//! # pgnorm-core
//!
//! PostgreSQL query normalization: every literal constant in a statement is
//! replaced by a `$n` placeholder, so statements that differ only in their
//! values normalize to the same text.
//!
//! This crate provides:
//! - A hand-written recursive descent parser with Pratt expression parsing
//!   that records the byte offset of every constant
//! - A scanner that reproduces the parser's tokenization to measure constants
//! - The normalization passes built on both
//!
//! ## Normalizing
//!
//! ```rust
//! use pgnorm_core::normalize;
//!
//! assert_eq!(
//!     normalize("UPDATE users SET name = 'bob' WHERE id = -7").unwrap(),
//!     "UPDATE users SET name = $1 WHERE id = $2"
//! );
//! ```
//!
//! Placeholders already in the statement are left alone and new ones are
//! numbered after the highest of them:
//!
//! ```rust
//! use pgnorm_core::normalize;
//!
//! assert_eq!(
//!     normalize("SELECT * FROM t WHERE a = $2 AND b = 'x'").unwrap(),
//!     "SELECT * FROM t WHERE a = $2 AND b = $3"
//! );
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use pgnorm_core::{NormalizeConfig, Normalizer};
//!
//! let normalizer = Normalizer::new(NormalizeConfig::new().with_max_depth(64));
//! let query = normalizer.normalize_query("SELECT 1, 2").unwrap();
//! assert_eq!(query.text, "SELECT $1, $2");
//! assert_eq!(query.constants, 2);
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod lexer;
pub mod normalize;
pub mod parser;

pub use ast::{Expr, Node, RawStmt, Statement};
pub use config::NormalizeConfig;
pub use error::{NormalizeError, Result};
pub use lexer::{Lexer, Scanner, Token, TokenKind};
pub use normalize::{normalize, NormalizedQuery, NormalizedStatement, Normalizer};
pub use parser::{ParseError, Parser};

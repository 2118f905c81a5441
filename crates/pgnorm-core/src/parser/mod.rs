//! SQL Parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing.
//! Literal constants and `$n` parameters carry their byte offsets so the
//! normalizer can find them again in the statement text.

mod error;
mod parser;
mod pratt;

pub use error::ParseError;
pub use parser::Parser;

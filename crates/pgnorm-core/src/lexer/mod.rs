//! SQL lexer module.
//!
//! Tokenizes PostgreSQL statement text into a stream of tokens carrying
//! byte-offset spans into the original text.

mod scanner;
mod span;
mod token;
mod tokenizer;

pub use scanner::Scanner;
pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::{is_scanner_space, Lexer};

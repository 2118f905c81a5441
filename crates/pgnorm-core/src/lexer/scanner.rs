//! Token-at-a-time scanner used to measure constants in the original text.

use tracing::trace;

use super::{Lexer, Token};

/// A scanner over a statement's source text.
///
/// Unlike [`Lexer::tokenize`], the scanner yields one token per call and
/// remembers where the last token's text ends, so callers can measure a
/// token starting at a known offset without building the whole token list.
#[derive(Debug)]
pub struct Scanner<'a> {
    lexer: Lexer<'a>,
    token_end: usize,
    tokens_read: usize,
}

impl<'a> Scanner<'a> {
    /// Opens a scanner over `text`.
    #[must_use]
    pub const fn open(text: &'a str) -> Self {
        Self {
            lexer: Lexer::new(text),
            token_end: 0,
            tokens_read: 0,
        }
    }

    /// Scans the next token. End of input is signalled by an EOF token.
    pub fn next_token(&mut self) -> Token {
        let token = self.lexer.next_token();
        self.token_end = token.span.end;
        self.tokens_read += 1;
        token
    }

    /// Byte offset just past the text of the most recently scanned token.
    #[must_use]
    pub const fn token_end(&self) -> usize {
        self.token_end
    }

    /// The source text as bytes.
    #[must_use]
    pub const fn source(&self) -> &'a [u8] {
        self.lexer.input().as_bytes()
    }

    /// Releases the scanner.
    pub fn finish(self) {
        trace!(tokens = self.tokens_read, "scanner finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    #[test]
    fn test_token_end_follows_each_token() {
        let mut scanner = Scanner::open("SELECT  'abc' , 42");
        assert_eq!(scanner.next_token().span.start, 0);
        assert_eq!(scanner.token_end(), 6);

        let token = scanner.next_token();
        assert_eq!(token.kind, TokenKind::String(String::from("abc")));
        assert_eq!(token.span.start, 8);
        assert_eq!(scanner.token_end(), 13);

        scanner.next_token();
        scanner.next_token();
        assert_eq!(scanner.token_end(), 18);
        assert!(scanner.next_token().is_eof());
        scanner.finish();
    }

    #[test]
    fn test_source_bytes() {
        let scanner = Scanner::open("a = -1");
        assert_eq!(scanner.source()[4], b'-');
    }
}

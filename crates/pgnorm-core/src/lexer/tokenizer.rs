//! SQL tokenizer implementation.

use super::{Keyword, Span, Token, TokenKind};

/// Characters that may appear in an operator.
const OPERATOR_CHARS: &[char] = &[
    '~', '!', '@', '#', '^', '&', '|', '`', '?', '+', '-', '*', '/', '%', '<', '>', '=',
];

/// A multi-character operator may only end in `+` or `-` if it contains one of these.
const SIGN_KEEPING_CHARS: &[char] = &['~', '!', '@', '#', '^', '&', '|', '`', '?', '%'];

/// Returns true for the bytes the scanner treats as whitespace.
#[must_use]
pub const fn is_scanner_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn is_space(c: char) -> bool {
    u8::try_from(c).is_ok_and(is_scanner_space)
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_identifier_continue(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit() || c == '$'
}

/// A lexer that tokenizes SQL input.
///
/// Token spans are byte offsets into the input. The lexer never fails:
/// malformed input yields a [`TokenKind::Error`] token and scanning
/// continues after it.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /// The input source text.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the input this lexer scans.
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.peek_nth(0)
    }

    /// Returns the character after the current one without advancing.
    fn peek_next(&self) -> Option<char> {
        self.peek_nth(1)
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Skips whitespace and comments. Block comments nest.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(is_space) {
                self.advance();
            }

            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.advance();
                self.advance();
                let mut depth = 1usize;
                while depth > 0 {
                    match self.advance() {
                        Some('/') if self.peek() == Some('*') => {
                            self.advance();
                            depth += 1;
                        }
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            depth -= 1;
                        }
                        Some(_) => {}
                        None => break,
                    }
                }
                continue;
            }

            break;
        }
    }

    /// Creates a token spanning from the token start to the current position.
    const fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    fn error(&self, message: impl Into<String>) -> Token {
        self.make_token(TokenKind::Error(message.into()))
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> Token {
        while self.peek().is_some_and(is_identifier_continue) {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        match Keyword::from_str(text) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => self.make_token(TokenKind::Identifier(String::from(text))),
        }
    }

    /// Scans a double-quoted identifier. The opening quote is already consumed.
    fn scan_quoted_identifier(&mut self) -> Token {
        let mut name = String::new();
        loop {
            match self.advance() {
                Some('"') if self.peek() == Some('"') => {
                    self.advance();
                    name.push('"');
                }
                Some('"') => break,
                Some(c) => name.push(c),
                None => return self.error("Unterminated quoted identifier"),
            }
        }

        if name.is_empty() {
            return self.error("Zero-length delimited identifier");
        }
        self.make_token(TokenKind::Identifier(name))
    }

    /// Scans a number: integer, decimal, or with exponent.
    fn scan_number(&mut self) -> Token {
        self.pos = self.start;
        let mut integral = true;

        self.eat_digits();

        if self.peek() == Some('.') && self.peek_next() != Some('.') {
            integral = false;
            self.advance();
            self.eat_digits();
        }

        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            let digits_at = if matches!(self.peek_nth(1), Some('+' | '-')) {
                2
            } else {
                1
            };
            if self.peek_nth(digits_at).is_some_and(|c| c.is_ascii_digit()) {
                integral = false;
                for _ in 0..digits_at {
                    self.advance();
                }
                self.eat_digits();
            }
        }

        let text = &self.input[self.start..self.pos];
        if integral {
            if let Ok(value) = text.parse::<i64>() {
                return self.make_token(TokenKind::Integer(value));
            }
        }
        self.make_token(TokenKind::Numeric(String::from(text)))
    }

    /// Scans the body of a single-quoted string up to and including the
    /// closing quote. The opening quote is already consumed.
    ///
    /// Returns `None` if the input ends before the closing quote.
    fn scan_quoted_body(&mut self, backslash_escapes: bool) -> Option<String> {
        let mut value = String::new();
        loop {
            match self.advance()? {
                '\'' if self.peek() == Some('\'') => {
                    self.advance();
                    value.push('\'');
                }
                '\'' => return Some(value),
                '\\' if backslash_escapes => {
                    let escaped = self.advance()?;
                    value.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        'b' => '\u{8}',
                        'f' => '\u{c}',
                        other => other,
                    });
                }
                c => value.push(c),
            }
        }
    }

    /// Scans a standard (`'...'`, `N'...'`) or escape (`E'...'`) string.
    fn scan_string(&mut self, backslash_escapes: bool) -> Token {
        match self.scan_quoted_body(backslash_escapes) {
            Some(value) => self.make_token(TokenKind::String(value)),
            None => self.error("Unterminated string literal"),
        }
    }

    /// Scans a `U&'...'` string and its optional `UESCAPE 'c'` clause.
    ///
    /// Whitespace after the closing quote is consumed while looking for the
    /// clause. When no clause follows, that whitespace remains part of the
    /// token's span.
    fn scan_unicode_string(&mut self) -> Token {
        let Some(raw) = self.scan_quoted_body(false) else {
            return self.error("Unterminated string literal");
        };

        while self.peek().is_some_and(is_space) {
            self.advance();
        }
        let escape = self.scan_uescape().unwrap_or('\\');

        match decode_unicode_escapes(&raw, escape) {
            Ok(value) => self.make_token(TokenKind::String(value)),
            Err(message) => self.error(message),
        }
    }

    /// Consumes `UESCAPE 'c'` if it follows, returning the escape character.
    fn scan_uescape(&mut self) -> Option<char> {
        let input = self.input;
        let keyword = input[self.pos..].get(..7)?;
        if !keyword.eq_ignore_ascii_case("uescape") {
            return None;
        }

        let resume = self.pos;
        self.pos += keyword.len();
        if self.peek().is_some_and(is_identifier_continue) {
            self.pos = resume;
            return None;
        }
        while self.peek().is_some_and(is_space) {
            self.advance();
        }

        let mut chars = input[self.pos..].chars();
        if let (Some('\''), Some(escape), Some('\'')) = (chars.next(), chars.next(), chars.next()) {
            if !escape.is_ascii_hexdigit() && !matches!(escape, '+' | '\'' | '"') && !is_space(escape)
            {
                self.pos += 2 + escape.len_utf8();
                return Some(escape);
            }
        }

        self.pos = resume;
        None
    }

    /// Scans a bit string (`B'0101'` or `X'1F'`). The prefix is already consumed.
    fn scan_bit_string(&mut self, prefix: char) -> Token {
        self.advance();
        let hex = prefix.eq_ignore_ascii_case(&'x');
        let mut digits = String::new();

        loop {
            match self.advance() {
                Some('\'') => break,
                Some(c) if (hex && c.is_ascii_hexdigit()) || (!hex && matches!(c, '0' | '1')) => {
                    digits.push(c);
                }
                Some(c) => return self.error(format!("Invalid character in bit string: {c}")),
                None => return self.error("Unterminated bit string literal"),
            }
        }

        self.make_token(TokenKind::BitString(format!(
            "{}{digits}",
            prefix.to_ascii_uppercase()
        )))
    }

    /// Scans `$n` parameters and `$tag$...$tag$` strings. The `$` is already consumed.
    fn scan_dollar(&mut self) -> Token {
        let input = self.input;

        if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.eat_digits();
            let digits = &input[self.start + 1..self.pos];
            return match digits.parse::<u32>() {
                Ok(number) => self.make_token(TokenKind::Param(number)),
                Err(_) => self.error(format!("Parameter number too large: ${digits}")),
            };
        }

        let tag_start = self.pos;
        if self.peek().is_some_and(is_identifier_start) {
            while self
                .peek()
                .is_some_and(|c| is_identifier_start(c) || c.is_ascii_digit())
            {
                self.advance();
            }
        }
        if self.peek() != Some('$') {
            self.pos = tag_start;
            return self.error("Unexpected character: $");
        }
        self.advance();

        let delimiter = &input[self.start..self.pos];
        match input[self.pos..].find(delimiter) {
            Some(offset) => {
                let body = &input[self.pos..self.pos + offset];
                self.pos += offset + delimiter.len();
                self.make_token(TokenKind::String(String::from(body)))
            }
            None => {
                self.pos = input.len();
                self.error("Unterminated dollar-quoted string")
            }
        }
    }

    /// Scans an operator. The first character is already consumed.
    fn scan_operator(&mut self) -> Token {
        while let Some(c) = self.peek() {
            let comment_start = matches!((c, self.peek_next()), ('-', Some('-')) | ('/', Some('*')));
            if !OPERATOR_CHARS.contains(&c) || comment_start {
                break;
            }
            self.advance();
        }

        let input = self.input;
        let mut text = &input[self.start..self.pos];
        if text.len() > 1 && !text.contains(SIGN_KEEPING_CHARS) {
            while text.len() > 1 && text.ends_with(&['+', '-'][..]) {
                text = &text[..text.len() - 1];
            }
            self.pos = self.start + text.len();
        }

        let kind = match text {
            "+" => TokenKind::Plus,
            "-" => TokenKind::Minus,
            "*" => TokenKind::Star,
            "/" => TokenKind::Slash,
            "%" => TokenKind::Percent,
            "^" => TokenKind::Caret,
            "=" => TokenKind::Eq,
            "<>" | "!=" => TokenKind::NotEq,
            "<" => TokenKind::Lt,
            "<=" => TokenKind::LtEq,
            ">" => TokenKind::Gt,
            ">=" => TokenKind::GtEq,
            "||" => TokenKind::Concat,
            "&" => TokenKind::BitAnd,
            "|" => TokenKind::BitOr,
            "~" => TokenKind::BitNot,
            "<<" => TokenKind::LeftShift,
            ">>" => TokenKind::RightShift,
            other => TokenKind::Operator(String::from(other)),
        };
        self.make_token(kind)
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            '[' => self.make_token(TokenKind::LeftBracket),
            ']' => self.make_token(TokenKind::RightBracket),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),
            ':' => {
                if self.peek() == Some(':') {
                    self.advance();
                    self.make_token(TokenKind::DoubleColon)
                } else {
                    self.make_token(TokenKind::Colon)
                }
            }
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.scan_number(),
            '.' => self.make_token(TokenKind::Dot),

            // Strings and quoted identifiers
            '\'' => self.scan_string(false),
            '"' => self.scan_quoted_identifier(),
            '$' => self.scan_dollar(),
            'e' | 'E' if self.peek() == Some('\'') => {
                self.advance();
                self.scan_string(true)
            }
            'n' | 'N' if self.peek() == Some('\'') => {
                self.advance();
                self.scan_string(false)
            }
            'b' | 'B' | 'x' | 'X' if self.peek() == Some('\'') => self.scan_bit_string(c),
            'u' | 'U' if self.peek() == Some('&') && self.peek_next() == Some('\'') => {
                self.advance();
                self.advance();
                self.scan_unicode_string()
            }
            'u' | 'U' if self.peek() == Some('&') && self.peek_next() == Some('"') => {
                self.advance();
                self.advance();
                self.scan_quoted_identifier()
            }

            c if c.is_ascii_digit() => self.scan_number(),
            c if is_identifier_start(c) => self.scan_identifier(),
            c if OPERATOR_CHARS.contains(&c) => self.scan_operator(),

            c => self.error(format!("Unexpected character: {c}")),
        }
    }

    /// Tokenizes the entire input, including the trailing EOF token.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

/// Decodes `\XXXX` and `\+XXXXXX` escapes (with `escape` in place of `\`).
fn decode_unicode_escapes(raw: &str, escape: char) -> Result<String, String> {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != escape {
            value.push(c);
            continue;
        }
        if chars.peek() == Some(&escape) {
            chars.next();
            value.push(escape);
            continue;
        }

        let width = if chars.peek() == Some(&'+') {
            chars.next();
            6
        } else {
            4
        };
        let hex: String = chars.by_ref().take(width).collect();
        let decoded = if hex.len() == width && hex.chars().all(|h| h.is_ascii_hexdigit()) {
            u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
        } else {
            None
        };
        match decoded {
            Some(ch) => value.push(ch),
            None => return Err(format!("Invalid Unicode escape value: {escape}{hex}")),
        }
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize()
    }

    fn token_kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(String::from(name))
    }

    fn string(value: &str) -> TokenKind {
        TokenKind::String(String::from(value))
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(token_kinds(""), vec![TokenKind::Eof]);
        assert_eq!(token_kinds("  \n\t\r\u{c} "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            token_kinds("SELECT -- comment\nFROM /* outer /* inner */ still */ WHERE"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            token_kinds("select FROM wHeRe"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            token_kinds("foo bar_baz _qux a$1 \"Mixed \"\"Case\"\"\""),
            vec![
                ident("foo"),
                ident("bar_baz"),
                ident("_qux"),
                ident("a$1"),
                ident("Mixed \"Case\""),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            token_kinds("42 3.14 .5 7. 1e10 2.5e-3 99999999999999999999"),
            vec![
                TokenKind::Integer(42),
                TokenKind::Numeric(String::from("3.14")),
                TokenKind::Numeric(String::from(".5")),
                TokenKind::Numeric(String::from("7.")),
                TokenKind::Numeric(String::from("1e10")),
                TokenKind::Numeric(String::from("2.5e-3")),
                TokenKind::Numeric(String::from("99999999999999999999")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            token_kinds("'hello' 'it''s' E'a\\nb\\'c' N'nat'"),
            vec![
                string("hello"),
                string("it's"),
                string("a\nb'c"),
                string("nat"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_dollar_quoted_strings() {
        assert_eq!(
            token_kinds("$$it's$$ $fn$ body $$ inside $fn$"),
            vec![string("it's"), string(" body $$ inside "), TokenKind::Eof]
        );
    }

    #[test]
    fn test_bit_strings() {
        assert_eq!(
            token_kinds("B'0101' x'1F'"),
            vec![
                TokenKind::BitString(String::from("B0101")),
                TokenKind::BitString(String::from("X1F")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_parameters() {
        assert_eq!(
            token_kinds("$1 $23"),
            vec![TokenKind::Param(1), TokenKind::Param(23), TokenKind::Eof]
        );
        assert!(matches!(
            token_kinds("$99999999999")[0],
            TokenKind::Error(_)
        ));
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            token_kinds("+ - * / % ^ = != <> < <= > >= || & | ~ << >>"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Caret,
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Concat,
                TokenKind::BitAnd,
                TokenKind::BitOr,
                TokenKind::BitNot,
                TokenKind::LeftShift,
                TokenKind::RightShift,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operator_does_not_swallow_sign() {
        assert_eq!(
            token_kinds("a=-1"),
            vec![
                ident("a"),
                TokenKind::Eq,
                TokenKind::Minus,
                TokenKind::Integer(1),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_custom_operators() {
        assert_eq!(
            token_kinds("doc->>'k' @> '{}' ~~* '%x'"),
            vec![
                ident("doc"),
                TokenKind::Operator(String::from("->>")),
                string("k"),
                TokenKind::Operator(String::from("@>")),
                string("{}"),
                TokenKind::Operator(String::from("~~*")),
                string("%x"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            token_kinds("( ) [ ] , ; . : ::"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Dot,
                TokenKind::Colon,
                TokenKind::DoubleColon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_span_tracking() {
        let tokens = tokenize("SELECT id, 'x'");
        assert_eq!(tokens[0].span, Span::new(0, 6));
        assert_eq!(tokens[1].span, Span::new(7, 9));
        assert_eq!(tokens[2].span, Span::new(9, 10));
        assert_eq!(tokens[3].span, Span::new(11, 14));
    }

    #[test]
    fn test_unicode_string_keeps_probed_whitespace() {
        let tokens = tokenize("U&'d\\0061t'  FROM");
        assert_eq!(tokens[0].kind, string("dat"));
        assert_eq!(tokens[0].span, Span::new(0, 13));
        assert_eq!(tokens[1].kind, TokenKind::Keyword(Keyword::From));
        assert_eq!(tokens[1].span, Span::new(13, 17));
    }

    #[test]
    fn test_unicode_string_with_uescape() {
        let tokens = tokenize("U&'d!0061t' UESCAPE '!'");
        assert_eq!(tokens[0].kind, string("dat"));
        assert_eq!(tokens[0].span, Span::new(0, 23));
        assert!(tokens[1].is_eof());
    }

    #[test]
    fn test_unterminated_string() {
        let tokens = tokenize("SELECT 'abc");
        assert!(matches!(tokens[1].kind, TokenKind::Error(_)));
        assert_eq!(tokens[1].span, Span::new(7, 11));
    }
}

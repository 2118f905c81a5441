//! Token types for the SQL lexer.

use super::Span;

/// SQL keywords recognised by the lexer.
///
/// Reserved keywords can never be used as bare identifiers; the others
/// double as identifiers wherever the grammar expects a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Queries
    Select,
    From,
    Where,
    Group,
    By,
    Having,
    Order,
    Limit,
    Offset,
    Distinct,
    All,
    As,
    With,
    Recursive,
    Union,
    Intersect,
    Except,

    // Joins
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    On,
    Using,

    // Data manipulation
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,
    Default,
    Returning,
    Conflict,
    Do,
    Nothing,

    // Expressions
    And,
    Or,
    Not,
    In,
    Between,
    Like,
    Ilike,
    Is,
    Null,
    True,
    False,
    Exists,
    Case,
    When,
    Then,
    Else,
    End,
    Cast,
    Array,

    // Ordering
    Asc,
    Desc,
    Nulls,
    First,
    Last,

    // Typed literals
    Date,
    Time,
    Timestamp,
    Interval,
    Zone,
    Without,

    // Utility statements
    Session,
    Local,
    To,
    Copy,
    Stdin,
    Stdout,
    Program,
    Binary,
    Explain,
    Analyze,
    Verbose,
    Declare,
    Cursor,
    Insensitive,
    Scroll,
    No,
    Hold,
    For,
    Alter,
    Role,
    User,
    Password,
    Encrypted,
    Connection,
    Valid,
    Until,
}

impl Keyword {
    /// Attempts to parse a keyword from a string (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let keyword = match s.to_ascii_uppercase().as_str() {
            "SELECT" => Self::Select,
            "FROM" => Self::From,
            "WHERE" => Self::Where,
            "GROUP" => Self::Group,
            "BY" => Self::By,
            "HAVING" => Self::Having,
            "ORDER" => Self::Order,
            "LIMIT" => Self::Limit,
            "OFFSET" => Self::Offset,
            "DISTINCT" => Self::Distinct,
            "ALL" => Self::All,
            "AS" => Self::As,
            "WITH" => Self::With,
            "RECURSIVE" => Self::Recursive,
            "UNION" => Self::Union,
            "INTERSECT" => Self::Intersect,
            "EXCEPT" => Self::Except,
            "JOIN" => Self::Join,
            "INNER" => Self::Inner,
            "LEFT" => Self::Left,
            "RIGHT" => Self::Right,
            "FULL" => Self::Full,
            "OUTER" => Self::Outer,
            "CROSS" => Self::Cross,
            "ON" => Self::On,
            "USING" => Self::Using,
            "INSERT" => Self::Insert,
            "INTO" => Self::Into,
            "VALUES" => Self::Values,
            "UPDATE" => Self::Update,
            "SET" => Self::Set,
            "DELETE" => Self::Delete,
            "DEFAULT" => Self::Default,
            "RETURNING" => Self::Returning,
            "CONFLICT" => Self::Conflict,
            "DO" => Self::Do,
            "NOTHING" => Self::Nothing,
            "AND" => Self::And,
            "OR" => Self::Or,
            "NOT" => Self::Not,
            "IN" => Self::In,
            "BETWEEN" => Self::Between,
            "LIKE" => Self::Like,
            "ILIKE" => Self::Ilike,
            "IS" => Self::Is,
            "NULL" => Self::Null,
            "TRUE" => Self::True,
            "FALSE" => Self::False,
            "EXISTS" => Self::Exists,
            "CASE" => Self::Case,
            "WHEN" => Self::When,
            "THEN" => Self::Then,
            "ELSE" => Self::Else,
            "END" => Self::End,
            "CAST" => Self::Cast,
            "ARRAY" => Self::Array,
            "ASC" => Self::Asc,
            "DESC" => Self::Desc,
            "NULLS" => Self::Nulls,
            "FIRST" => Self::First,
            "LAST" => Self::Last,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "TIMESTAMP" => Self::Timestamp,
            "INTERVAL" => Self::Interval,
            "ZONE" => Self::Zone,
            "WITHOUT" => Self::Without,
            "SESSION" => Self::Session,
            "LOCAL" => Self::Local,
            "TO" => Self::To,
            "COPY" => Self::Copy,
            "STDIN" => Self::Stdin,
            "STDOUT" => Self::Stdout,
            "PROGRAM" => Self::Program,
            "BINARY" => Self::Binary,
            "EXPLAIN" => Self::Explain,
            "ANALYZE" | "ANALYSE" => Self::Analyze,
            "VERBOSE" => Self::Verbose,
            "DECLARE" => Self::Declare,
            "CURSOR" => Self::Cursor,
            "INSENSITIVE" => Self::Insensitive,
            "SCROLL" => Self::Scroll,
            "NO" => Self::No,
            "HOLD" => Self::Hold,
            "FOR" => Self::For,
            "ALTER" => Self::Alter,
            "ROLE" => Self::Role,
            "USER" => Self::User,
            "PASSWORD" => Self::Password,
            "ENCRYPTED" => Self::Encrypted,
            "CONNECTION" => Self::Connection,
            "VALID" => Self::Valid,
            "UNTIL" => Self::Until,
            _ => return None,
        };
        Some(keyword)
    }

    /// Returns the keyword as an upper-case string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Group => "GROUP",
            Self::By => "BY",
            Self::Having => "HAVING",
            Self::Order => "ORDER",
            Self::Limit => "LIMIT",
            Self::Offset => "OFFSET",
            Self::Distinct => "DISTINCT",
            Self::All => "ALL",
            Self::As => "AS",
            Self::With => "WITH",
            Self::Recursive => "RECURSIVE",
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
            Self::Join => "JOIN",
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Full => "FULL",
            Self::Outer => "OUTER",
            Self::Cross => "CROSS",
            Self::On => "ON",
            Self::Using => "USING",
            Self::Insert => "INSERT",
            Self::Into => "INTO",
            Self::Values => "VALUES",
            Self::Update => "UPDATE",
            Self::Set => "SET",
            Self::Delete => "DELETE",
            Self::Default => "DEFAULT",
            Self::Returning => "RETURNING",
            Self::Conflict => "CONFLICT",
            Self::Do => "DO",
            Self::Nothing => "NOTHING",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::In => "IN",
            Self::Between => "BETWEEN",
            Self::Like => "LIKE",
            Self::Ilike => "ILIKE",
            Self::Is => "IS",
            Self::Null => "NULL",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Exists => "EXISTS",
            Self::Case => "CASE",
            Self::When => "WHEN",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::End => "END",
            Self::Cast => "CAST",
            Self::Array => "ARRAY",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::Nulls => "NULLS",
            Self::First => "FIRST",
            Self::Last => "LAST",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Interval => "INTERVAL",
            Self::Zone => "ZONE",
            Self::Without => "WITHOUT",
            Self::Session => "SESSION",
            Self::Local => "LOCAL",
            Self::To => "TO",
            Self::Copy => "COPY",
            Self::Stdin => "STDIN",
            Self::Stdout => "STDOUT",
            Self::Program => "PROGRAM",
            Self::Binary => "BINARY",
            Self::Explain => "EXPLAIN",
            Self::Analyze => "ANALYZE",
            Self::Verbose => "VERBOSE",
            Self::Declare => "DECLARE",
            Self::Cursor => "CURSOR",
            Self::Insensitive => "INSENSITIVE",
            Self::Scroll => "SCROLL",
            Self::No => "NO",
            Self::Hold => "HOLD",
            Self::For => "FOR",
            Self::Alter => "ALTER",
            Self::Role => "ROLE",
            Self::User => "USER",
            Self::Password => "PASSWORD",
            Self::Encrypted => "ENCRYPTED",
            Self::Connection => "CONNECTION",
            Self::Valid => "VALID",
            Self::Until => "UNTIL",
        }
    }

    /// Returns true if the keyword can never stand in for an identifier.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        matches!(
            self,
            Self::Select
                | Self::From
                | Self::Where
                | Self::Group
                | Self::Having
                | Self::Order
                | Self::Limit
                | Self::Offset
                | Self::Distinct
                | Self::All
                | Self::As
                | Self::With
                | Self::Union
                | Self::Intersect
                | Self::Except
                | Self::Join
                | Self::Inner
                | Self::Left
                | Self::Right
                | Self::Full
                | Self::Outer
                | Self::Cross
                | Self::On
                | Self::Using
                | Self::Into
                | Self::Values
                | Self::Set
                | Self::Default
                | Self::Returning
                | Self::Do
                | Self::And
                | Self::Or
                | Self::Not
                | Self::In
                | Self::Between
                | Self::Like
                | Self::Ilike
                | Self::Is
                | Self::Null
                | Self::True
                | Self::False
                | Self::Exists
                | Self::Case
                | Self::When
                | Self::Then
                | Self::Else
                | Self::End
                | Self::Cast
                | Self::Array
                | Self::Asc
                | Self::Desc
                | Self::To
                | Self::Analyze
                | Self::For
        )
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    /// Integer literal that fits in an `i64` (e.g., 42).
    Integer(i64),
    /// Any other numeric literal, kept verbatim (e.g., 3.14, 1e10, 99999999999999999999).
    Numeric(String),
    /// Character string: standard, `E'...'`, `N'...'`, `U&'...'` or dollar-quoted.
    String(String),
    /// Bit string: `B'0101'` or `X'1F'`, kept with its prefix.
    BitString(String),
    /// Positional parameter (e.g., $1).
    Param(u32),

    // Identifiers and keywords
    /// Identifier, bare or quoted.
    Identifier(String),
    /// SQL keyword.
    Keyword(Keyword),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// ^
    Caret,
    /// =
    Eq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// ||
    Concat,
    /// &
    BitAnd,
    /// |
    BitOr,
    /// ~
    BitNot,
    /// <<
    LeftShift,
    /// >>
    RightShift,
    /// Any other operator (e.g., ->>, @>, ~~*).
    Operator(String),

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// :
    Colon,
    /// ::
    DoubleColon,

    // Special
    /// End of input.
    Eof,
    /// Invalid or unterminated input.
    Error(String),
}

/// A token with its span in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source text.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str() {
        assert_eq!(Keyword::from_str("SELECT"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("AnAlYsE"), Some(Keyword::Analyze));
        assert_eq!(Keyword::from_str("not_a_keyword"), None);
    }

    #[test]
    fn test_keyword_round_trips_through_as_str() {
        for kw in [Keyword::Copy, Keyword::Returning, Keyword::Until, Keyword::Ilike] {
            assert_eq!(Keyword::from_str(kw.as_str()), Some(kw));
        }
    }

    #[test]
    fn test_reserved_keywords() {
        assert!(Keyword::Select.is_reserved());
        assert!(Keyword::Null.is_reserved());
        assert!(!Keyword::Role.is_reserved());
        assert!(!Keyword::Date.is_reserved());
    }

    #[test]
    fn test_token_as_keyword() {
        let select = Token::new(TokenKind::Keyword(Keyword::Select), Span::new(0, 6));
        let plus = Token::new(TokenKind::Plus, Span::new(0, 1));
        assert_eq!(select.as_keyword(), Some(Keyword::Select));
        assert_eq!(plus.as_keyword(), None);
        assert!(Token::new(TokenKind::Eof, Span::new(6, 6)).is_eof());
    }
}

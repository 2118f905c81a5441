//! Expression AST types.

use crate::lexer::Span;

use super::{DataType, SelectStatement};

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Integer literal that fits in 64 bits.
    Integer(i64),
    /// Any other numeric literal, kept as written (`3.14`, `1e10`, `99999999999999999999`).
    Numeric(String),
    /// String literal, with escapes decoded.
    String(String),
    /// Bit string literal, prefixed with `B` or `X`.
    BitString(String),
    /// Boolean literal.
    Boolean(bool),
    /// NULL literal.
    Null,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // String
    Concat,
    Like,
    ILike,

    // Bitwise
    BitAnd,
    BitOr,
    LeftShift,
    RightShift,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "^",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Concat => "||",
            Self::Like => "LIKE",
            Self::ILike => "ILIKE",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
        }
    }
}

/// Boolean connectives. Chains of the same connective are flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Unary plus (+)
    Plus,
    /// Logical NOT
    Not,
    /// Bitwise NOT (~)
    BitNot,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Plus => "+",
            Self::Not => "NOT",
            Self::BitNot => "~",
        }
    }
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    /// The function name, schema-qualified if written so.
    pub name: String,
    /// The arguments.
    pub args: Vec<Expr>,
    /// Whether DISTINCT was specified.
    pub distinct: bool,
}

/// An SQL expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A literal constant.
    Literal {
        /// The value.
        value: Literal,
        /// Byte offset of the constant in the statement text, if known.
        location: Option<usize>,
    },

    /// A column reference (optionally qualified with table name).
    Column {
        /// Table name or alias (optional).
        table: Option<String>,
        /// Column name.
        name: String,
        /// Source span.
        span: Span,
    },

    /// A numbered parameter (`$1`).
    Parameter {
        /// The parameter number.
        number: u32,
        /// Byte offset of the placeholder.
        location: usize,
    },

    /// A binary expression.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },

    /// An AND or OR over two or more arguments.
    BoolOp {
        /// The connective.
        op: BoolOp,
        /// The arguments, in source order.
        args: Vec<Expr>,
    },

    /// An operator with no dedicated variant (`->>`, `@>`, `~~*`).
    Operator {
        /// Left operand; `None` for a prefix operator.
        left: Option<Box<Expr>>,
        /// Operator text.
        op: String,
        /// Right operand.
        right: Box<Expr>,
    },

    /// A unary expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },

    /// A function call.
    Function(FunctionCall),

    /// A scalar subquery.
    Subquery(Box<SelectStatement>),

    /// EXISTS (subquery).
    Exists(Box<SelectStatement>),

    /// IS NULL expression.
    IsNull {
        /// The expression to check.
        expr: Box<Expr>,
        /// Whether this is IS NOT NULL.
        negated: bool,
    },

    /// IS TRUE / IS FALSE expression.
    IsBool {
        /// The expression to check.
        expr: Box<Expr>,
        /// TRUE or FALSE.
        value: bool,
        /// Whether this is IS NOT.
        negated: bool,
    },

    /// IN (list) expression.
    In {
        /// The expression to check.
        expr: Box<Expr>,
        /// The list of values.
        list: Vec<Expr>,
        /// Whether this is NOT IN.
        negated: bool,
    },

    /// IN (subquery) expression.
    InSubquery {
        /// The expression to check.
        expr: Box<Expr>,
        /// The subquery.
        query: Box<SelectStatement>,
        /// Whether this is NOT IN.
        negated: bool,
    },

    /// BETWEEN expression.
    Between {
        /// The expression to check.
        expr: Box<Expr>,
        /// Lower bound.
        low: Box<Expr>,
        /// Upper bound.
        high: Box<Expr>,
        /// Whether this is NOT BETWEEN.
        negated: bool,
    },

    /// CASE expression.
    Case {
        /// The operand (if any).
        operand: Option<Box<Expr>>,
        /// WHEN/THEN clauses.
        when_clauses: Vec<(Expr, Expr)>,
        /// ELSE clause.
        else_clause: Option<Box<Expr>>,
    },

    /// CAST expression, `::` cast, or typed literal.
    Cast {
        /// Expression to cast.
        expr: Box<Expr>,
        /// Target type.
        data_type: DataType,
    },

    /// Parenthesized expression.
    Paren(Box<Expr>),

    /// Row constructor: `ROW(a, b)` or `(a, b)`.
    Row(Vec<Expr>),

    /// Array constructor: `ARRAY[a, b]`.
    Array(Vec<Expr>),

    /// Array subscript or slice: `a[1]`, `a[1:2]`.
    Subscript {
        /// The subscripted expression.
        expr: Box<Expr>,
        /// The index, or lower bound of a slice.
        index: Box<Expr>,
        /// Upper bound of a slice.
        upper: Option<Box<Expr>>,
    },

    /// One column of a multi-column assignment `SET (a, b) = (1, 2)`.
    ///
    /// Every column of the assignment carries its own copy of the source.
    MultiAssign {
        /// The row expression being assigned.
        source: Box<Expr>,
        /// 1-based position of this column within the assignment.
        column: usize,
        /// Number of columns assigned.
        columns: usize,
    },

    /// DEFAULT in VALUES lists and SET assignments.
    Default,

    /// Wildcard (*) in SELECT.
    Wildcard {
        /// Table qualifier (optional).
        table: Option<String>,
    },
}

impl Expr {
    /// Creates a literal with no source location.
    #[must_use]
    pub const fn literal(value: Literal) -> Self {
        Self::Literal {
            value,
            location: None,
        }
    }

    /// Creates a literal at the given byte offset.
    #[must_use]
    pub const fn literal_at(value: Literal, location: usize) -> Self {
        Self::Literal {
            value,
            location: Some(location),
        }
    }

    /// Creates a new column reference.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column {
            table: None,
            name: name.into(),
            span: Span::default(),
        }
    }

    /// Creates a new integer literal.
    #[must_use]
    pub const fn integer(value: i64) -> Self {
        Self::literal(Literal::Integer(value))
    }

    /// Creates a new string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::literal(Literal::String(value.into()))
    }

    /// Creates a NULL literal.
    #[must_use]
    pub const fn null() -> Self {
        Self::literal(Literal::Null)
    }

    /// Creates a binary expression.
    #[must_use]
    pub fn binary(self, op: BinaryOp, right: Self) -> Self {
        Self::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq(self, right: Self) -> Self {
        self.binary(BinaryOp::Eq, right)
    }

    /// Returns the byte offset of a literal constant, if this is one with a known location.
    #[must_use]
    pub const fn constant_location(&self) -> Option<usize> {
        match self {
            Self::Literal { location, .. } => *location,
            _ => None,
        }
    }
}

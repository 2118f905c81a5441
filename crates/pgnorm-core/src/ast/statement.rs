//! SQL statement AST types.

use crate::lexer::Span;

use super::expression::Expr;

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

/// Null ordering for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    /// NULLs come first.
    First,
    /// NULLs come last.
    Last,
}

/// An ORDER BY clause entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The expression to order by.
    pub expr: Expr,
    /// The direction (ASC or DESC).
    pub direction: OrderDirection,
    /// Null ordering (optional).
    pub nulls: Option<NullOrdering>,
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// INNER JOIN.
    Inner,
    /// LEFT OUTER JOIN.
    Left,
    /// RIGHT OUTER JOIN.
    Right,
    /// FULL OUTER JOIN.
    Full,
    /// CROSS JOIN, also used for comma-separated FROM items.
    Cross,
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    /// The type of join.
    pub join_type: JoinType,
    /// The table to join.
    pub table: TableRef,
    /// The join condition (for non-CROSS joins).
    pub on: Option<Expr>,
    /// USING columns (alternative to ON).
    pub using: Vec<String>,
}

/// A table reference in FROM clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRef {
    /// A simple table name.
    Table {
        /// Schema name (optional).
        schema: Option<String>,
        /// Table name.
        name: String,
        /// Alias.
        alias: Option<String>,
    },
    /// A subquery.
    Subquery {
        /// The subquery.
        query: Box<SelectStatement>,
        /// Alias.
        alias: Option<String>,
    },
    /// A set-returning function call (`generate_series(1, 10) AS g`).
    Function {
        /// The call.
        call: super::FunctionCall,
        /// Alias.
        alias: Option<String>,
    },
    /// A joined table.
    Join {
        /// Left side of the join.
        left: Box<TableRef>,
        /// The join clause.
        join: Box<JoinClause>,
    },
}

/// A common table expression in a WITH clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonTableExpr {
    /// The CTE name.
    pub name: String,
    /// Column aliases.
    pub columns: Vec<String>,
    /// The defining statement.
    pub query: Box<Statement>,
}

/// Set operator combining two queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    Intersect,
    Except,
}

/// The right-hand side of UNION / INTERSECT / EXCEPT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOperation {
    /// The operator.
    pub op: SetOperator,
    /// Whether ALL was specified.
    pub all: bool,
    /// The right-hand query.
    pub right: SelectStatement,
}

/// A SELECT statement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectStatement {
    /// Whether WITH RECURSIVE was specified.
    pub recursive: bool,
    /// Common table expressions.
    pub ctes: Vec<CommonTableExpr>,
    /// Whether to select DISTINCT values.
    pub distinct: bool,
    /// The columns to select.
    pub columns: Vec<SelectColumn>,
    /// The FROM clause.
    pub from: Option<TableRef>,
    /// The WHERE clause.
    pub where_clause: Option<Expr>,
    /// GROUP BY expressions.
    pub group_by: Vec<Expr>,
    /// HAVING clause.
    pub having: Option<Expr>,
    /// A following UNION / INTERSECT / EXCEPT.
    pub set_op: Option<Box<SetOperation>>,
    /// ORDER BY clauses, applying to the whole set operation if any.
    pub order_by: Vec<OrderBy>,
    /// LIMIT clause.
    pub limit: Option<Expr>,
    /// OFFSET clause.
    pub offset: Option<Expr>,
}

/// A column in SELECT clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectColumn {
    /// The expression.
    pub expr: Expr,
    /// Column alias.
    pub alias: Option<String>,
}

/// Source of data for INSERT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertSource {
    /// VALUES clause.
    Values(Vec<Vec<Expr>>),
    /// SELECT query.
    Query(Box<SelectStatement>),
    /// DEFAULT VALUES.
    DefaultValues,
}

/// Action taken by ON CONFLICT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictAction {
    /// DO NOTHING.
    Nothing,
    /// DO UPDATE SET ...
    Update {
        /// Assignments.
        assignments: Vec<UpdateAssignment>,
        /// Optional WHERE clause.
        where_clause: Option<Expr>,
    },
}

/// An ON CONFLICT clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnConflict {
    /// Conflict target columns.
    pub columns: Vec<String>,
    /// The action.
    pub action: ConflictAction,
}

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    /// Schema name (optional).
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
    /// Column names (optional, empty means all columns).
    pub columns: Vec<String>,
    /// Values to insert.
    pub values: InsertSource,
    /// ON CONFLICT clause.
    pub on_conflict: Option<OnConflict>,
    /// RETURNING list.
    pub returning: Vec<SelectColumn>,
}

/// An assignment in UPDATE SET clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateAssignment {
    /// Column name.
    pub column: String,
    /// Value expression.
    pub value: Expr,
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatement {
    /// Schema name (optional).
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
    /// Table alias.
    pub alias: Option<String>,
    /// SET assignments.
    pub assignments: Vec<UpdateAssignment>,
    /// FROM clause.
    pub from: Option<TableRef>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
    /// RETURNING list.
    pub returning: Vec<SelectColumn>,
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteStatement {
    /// Schema name (optional).
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
    /// Table alias.
    pub alias: Option<String>,
    /// USING clause.
    pub using: Option<TableRef>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
    /// RETURNING list.
    pub returning: Vec<SelectColumn>,
}

/// An option-list element: `name [value]` in COPY, EXPLAIN and ALTER ROLE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefElem {
    /// Lowercase option name.
    pub name: String,
    /// Option argument.
    pub arg: Option<Expr>,
    /// Byte offset of the option name.
    pub location: usize,
}

/// `SET [SESSION | LOCAL] name { TO | = } value, ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSetStatement {
    /// Whether LOCAL was specified.
    pub local: bool,
    /// Lowercase variable name.
    pub name: String,
    /// Values; bare words are kept as string constants.
    pub args: Vec<Expr>,
    /// Whether the value is DEFAULT.
    pub to_default: bool,
}

/// Direction of a COPY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyDirection {
    From,
    To,
}

/// Source or destination of a COPY.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyTarget {
    Stdin,
    Stdout,
    /// A server-side file name.
    File(String),
    /// A shell command.
    Program(String),
}

/// A COPY statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyStatement {
    /// The table, when copying a relation.
    pub table: Option<String>,
    /// Column list.
    pub columns: Vec<String>,
    /// The query, when copying `(query) TO ...`.
    pub query: Option<Box<Statement>>,
    /// FROM or TO.
    pub direction: CopyDirection,
    /// Where data comes from or goes to.
    pub target: CopyTarget,
    /// Options.
    pub options: Vec<DefElem>,
}

/// An EXPLAIN statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainStatement {
    /// Options (`ANALYZE`, `VERBOSE`, `(FORMAT json)`).
    pub options: Vec<DefElem>,
    /// The explained statement.
    pub query: Box<Statement>,
}

/// Options given to DECLARE ... CURSOR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorOptions {
    pub binary: bool,
    pub insensitive: bool,
    /// `Some(true)` for SCROLL, `Some(false)` for NO SCROLL.
    pub scroll: Option<bool>,
    pub hold: bool,
}

/// A DECLARE ... CURSOR statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclareCursorStatement {
    /// Cursor name.
    pub name: String,
    /// Cursor options.
    pub options: CursorOptions,
    /// The cursor's query.
    pub query: Box<SelectStatement>,
}

/// An ALTER ROLE / ALTER USER statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterRoleStatement {
    /// Role name.
    pub role: String,
    /// Role options.
    pub options: Vec<DefElem>,
}

/// A SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// SELECT statement.
    Select(SelectStatement),
    /// INSERT statement.
    Insert(InsertStatement),
    /// UPDATE statement.
    Update(UpdateStatement),
    /// DELETE statement.
    Delete(DeleteStatement),
    /// SET statement.
    VariableSet(VariableSetStatement),
    /// COPY statement.
    Copy(CopyStatement),
    /// EXPLAIN statement.
    Explain(ExplainStatement),
    /// DECLARE CURSOR statement.
    DeclareCursor(DeclareCursorStatement),
    /// ALTER ROLE statement.
    AlterRole(AlterRoleStatement),
}

/// A top-level statement together with its extent in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStmt {
    /// The statement.
    pub stmt: Statement,
    /// Byte offset of the statement's first token.
    pub location: usize,
    /// Byte length up to the end of the statement's last token.
    pub len: usize,
}

impl RawStmt {
    /// Returns the statement's text within `source`.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> Option<&'a str> {
        Span::new(self.location, self.location + self.len).slice(source)
    }
}

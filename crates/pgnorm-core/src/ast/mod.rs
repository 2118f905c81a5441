//! Abstract Syntax Tree (AST) types for SQL statements.

mod expression;
mod node;
mod statement;
mod types;

pub use expression::{BinaryOp, BoolOp, Expr, FunctionCall, Literal, UnaryOp};
pub use node::Node;
pub use statement::{
    AlterRoleStatement, CommonTableExpr, ConflictAction, CopyDirection, CopyStatement, CopyTarget,
    CursorOptions, DeclareCursorStatement, DefElem, DeleteStatement, ExplainStatement,
    InsertSource, InsertStatement, JoinClause, JoinType, NullOrdering, OnConflict, OrderBy,
    OrderDirection, RawStmt, SelectColumn, SelectStatement, SetOperation, SetOperator, Statement,
    TableRef, UpdateAssignment, UpdateStatement, VariableSetStatement,
};
pub use types::DataType;

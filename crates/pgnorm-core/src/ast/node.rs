//! Uniform view over syntax tree nodes.
//!
//! [`Node`] borrows one node of any kind so that tree walks can be written
//! once, with [`Node::try_for_each_child`] supplying structural recursion.

use core::convert::Infallible;

use super::{
    ConflictAction, DefElem, Expr, InsertSource, RawStmt, SelectStatement, Statement, TableRef,
};

/// A borrowed reference to a syntax tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node<'a> {
    RawStmt(&'a RawStmt),
    Statement(&'a Statement),
    Select(&'a SelectStatement),
    TableRef(&'a TableRef),
    DefElem(&'a DefElem),
    Expr(&'a Expr),
}

impl<'a> Node<'a> {
    /// Calls `f` on every direct child of this node, in source order,
    /// stopping at the first error.
    ///
    /// Every child field and child list is visited, including option lists
    /// and other fields that hold no expressions of the statement proper.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_for_each_child<E, F>(self, mut f: F) -> Result<(), E>
    where
        F: FnMut(Node<'a>) -> Result<(), E>,
    {
        match self {
            Self::RawStmt(raw) => f(Node::Statement(&raw.stmt)),
            Self::Statement(stmt) => statement_children(stmt, &mut f),
            Self::Select(select) => select_children(select, &mut f),
            Self::TableRef(table) => table_ref_children(table, &mut f),
            Self::DefElem(elem) => elem.arg.as_ref().map_or(Ok(()), |arg| f(Node::Expr(arg))),
            Self::Expr(expr) => expr_children(expr, &mut f),
        }
    }

    /// Collects the direct children of this node.
    #[must_use]
    pub fn children(self) -> Vec<Node<'a>> {
        let mut children = Vec::new();
        let visited: Result<(), Infallible> = self.try_for_each_child(|child| {
            children.push(child);
            Ok(())
        });
        match visited {
            Ok(()) => children,
            Err(never) => match never {},
        }
    }
}

fn exprs<'a, E, F>(items: impl IntoIterator<Item = &'a Expr>, f: &mut F) -> Result<(), E>
where
    F: FnMut(Node<'a>) -> Result<(), E>,
{
    items.into_iter().try_for_each(|expr| f(Node::Expr(expr)))
}

fn statement_children<'a, E, F>(stmt: &'a Statement, f: &mut F) -> Result<(), E>
where
    F: FnMut(Node<'a>) -> Result<(), E>,
{
    match stmt {
        Statement::Select(select) => select_children(select, f),
        Statement::Insert(insert) => {
            match &insert.values {
                InsertSource::Values(rows) => exprs(rows.iter().flatten(), f)?,
                InsertSource::Query(query) => f(Node::Select(query))?,
                InsertSource::DefaultValues => {}
            }
            if let Some(conflict) = &insert.on_conflict {
                if let ConflictAction::Update {
                    assignments,
                    where_clause,
                } = &conflict.action
                {
                    exprs(assignments.iter().map(|a| &a.value), f)?;
                    exprs(where_clause, f)?;
                }
            }
            exprs(insert.returning.iter().map(|c| &c.expr), f)
        }
        Statement::Update(update) => {
            exprs(update.assignments.iter().map(|a| &a.value), f)?;
            if let Some(from) = &update.from {
                f(Node::TableRef(from))?;
            }
            exprs(&update.where_clause, f)?;
            exprs(update.returning.iter().map(|c| &c.expr), f)
        }
        Statement::Delete(delete) => {
            if let Some(using) = &delete.using {
                f(Node::TableRef(using))?;
            }
            exprs(&delete.where_clause, f)?;
            exprs(delete.returning.iter().map(|c| &c.expr), f)
        }
        Statement::VariableSet(set) => exprs(&set.args, f),
        Statement::Copy(copy) => {
            if let Some(query) = &copy.query {
                f(Node::Statement(query))?;
            }
            copy.options.iter().try_for_each(|o| f(Node::DefElem(o)))
        }
        Statement::Explain(explain) => {
            explain.options.iter().try_for_each(|o| f(Node::DefElem(o)))?;
            f(Node::Statement(&explain.query))
        }
        Statement::DeclareCursor(declare) => f(Node::Select(&declare.query)),
        Statement::AlterRole(alter) => alter.options.iter().try_for_each(|o| f(Node::DefElem(o))),
    }
}

fn select_children<'a, E, F>(select: &'a SelectStatement, f: &mut F) -> Result<(), E>
where
    F: FnMut(Node<'a>) -> Result<(), E>,
{
    for cte in &select.ctes {
        f(Node::Statement(&cte.query))?;
    }
    exprs(select.columns.iter().map(|c| &c.expr), f)?;
    if let Some(from) = &select.from {
        f(Node::TableRef(from))?;
    }
    exprs(&select.where_clause, f)?;
    exprs(&select.group_by, f)?;
    exprs(&select.having, f)?;
    if let Some(set_op) = &select.set_op {
        f(Node::Select(&set_op.right))?;
    }
    exprs(select.order_by.iter().map(|o| &o.expr), f)?;
    exprs(&select.limit, f)?;
    exprs(&select.offset, f)
}

fn table_ref_children<'a, E, F>(table: &'a TableRef, f: &mut F) -> Result<(), E>
where
    F: FnMut(Node<'a>) -> Result<(), E>,
{
    match table {
        TableRef::Table { .. } => Ok(()),
        TableRef::Subquery { query, .. } => f(Node::Select(query)),
        TableRef::Function { call, .. } => exprs(&call.args, f),
        TableRef::Join { left, join } => {
            f(Node::TableRef(left))?;
            f(Node::TableRef(&join.table))?;
            exprs(&join.on, f)
        }
    }
}

fn expr_children<'a, E, F>(expr: &'a Expr, f: &mut F) -> Result<(), E>
where
    F: FnMut(Node<'a>) -> Result<(), E>,
{
    match expr {
        Expr::Literal { .. }
        | Expr::Column { .. }
        | Expr::Parameter { .. }
        | Expr::Default
        | Expr::Wildcard { .. } => Ok(()),
        Expr::Binary { left, right, .. } => {
            f(Node::Expr(left))?;
            f(Node::Expr(right))
        }
        Expr::BoolOp { args, .. } | Expr::Row(args) | Expr::Array(args) => exprs(args, f),
        Expr::Operator { left, right, .. } => {
            if let Some(left) = left {
                f(Node::Expr(left))?;
            }
            f(Node::Expr(right))
        }
        Expr::Unary { operand: inner, .. }
        | Expr::IsNull { expr: inner, .. }
        | Expr::IsBool { expr: inner, .. }
        | Expr::Cast { expr: inner, .. }
        | Expr::Paren(inner)
        | Expr::MultiAssign { source: inner, .. } => f(Node::Expr(inner)),
        Expr::Function(call) => exprs(&call.args, f),
        Expr::Subquery(query) | Expr::Exists(query) => f(Node::Select(query)),
        Expr::In { expr, list, .. } => {
            f(Node::Expr(expr))?;
            exprs(list, f)
        }
        Expr::InSubquery { expr, query, .. } => {
            f(Node::Expr(expr))?;
            f(Node::Select(query))
        }
        Expr::Between {
            expr, low, high, ..
        } => {
            f(Node::Expr(expr))?;
            f(Node::Expr(low))?;
            f(Node::Expr(high))
        }
        Expr::Case {
            operand,
            when_clauses,
            else_clause,
        } => {
            if let Some(operand) = operand {
                f(Node::Expr(operand))?;
            }
            for (when, then) in when_clauses {
                f(Node::Expr(when))?;
                f(Node::Expr(then))?;
            }
            match else_clause {
                Some(else_clause) => f(Node::Expr(else_clause)),
                None => Ok(()),
            }
        }
        Expr::Subscript { expr, index, upper } => {
            f(Node::Expr(expr))?;
            f(Node::Expr(index))?;
            match upper {
                Some(upper) => f(Node::Expr(upper)),
                None => Ok(()),
            }
        }
    }
}

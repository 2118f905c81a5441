//! Syntax tree walk that records where constants appear.

use crate::ast::{Expr, Node, Statement};
use crate::error::{NormalizeError, Result};

use super::state::NormalizationState;

/// Walks a syntax tree, recording every literal constant's location and the
/// highest `$n` parameter number into a [`NormalizationState`].
///
/// A handful of wrapper nodes are descended through one designated field
/// only. Their remaining fields (COPY and EXPLAIN options, for instance)
/// are not statement text and must not be rewritten.
pub struct ConstLocator<'s> {
    state: &'s mut NormalizationState,
    depth: usize,
    max_depth: usize,
}

impl<'s> ConstLocator<'s> {
    /// Creates a locator writing into `state`.
    pub fn new(state: &'s mut NormalizationState, max_depth: usize) -> Self {
        Self {
            state,
            depth: 0,
            max_depth,
        }
    }

    /// Visits `node` and everything below it.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::TooDeep`] if the tree is nested deeper
    /// than the configured limit.
    pub fn visit(&mut self, node: Node<'_>) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(NormalizeError::TooDeep {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = self.visit_node(node);
        self.depth -= 1;
        result
    }

    fn visit_node(&mut self, node: Node<'_>) -> Result<()> {
        match node {
            Node::Expr(Expr::Literal { location, .. }) => {
                self.state.record_location(*location);
                Ok(())
            }
            Node::Expr(Expr::Parameter { number, .. }) => {
                self.state.note_param(*number);
                Ok(())
            }

            // Wrappers: descend into the designated field only
            Node::RawStmt(raw) => self.visit(Node::Statement(&raw.stmt)),
            Node::Statement(Statement::VariableSet(set)) => set
                .args
                .iter()
                .try_for_each(|arg| self.visit(Node::Expr(arg))),
            Node::Statement(Statement::Copy(copy)) => match &copy.query {
                Some(query) => self.visit(Node::Statement(query)),
                None => Ok(()),
            },
            Node::Statement(Statement::Explain(explain)) => {
                self.visit(Node::Statement(&explain.query))
            }
            Node::Statement(Statement::DeclareCursor(declare)) => {
                self.visit(Node::Select(&declare.query))
            }
            Node::Statement(Statement::AlterRole(alter)) => alter
                .options
                .iter()
                .try_for_each(|option| self.visit(Node::DefElem(option))),
            Node::DefElem(elem) => match &elem.arg {
                Some(arg) => self.visit(Node::Expr(arg)),
                None => Ok(()),
            },

            other => other.try_for_each_child(|child| self.visit(child)),
        }
    }
}

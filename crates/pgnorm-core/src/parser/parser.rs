//! SQL Parser implementation.

use super::error::ParseError;
use super::pratt::{
    infix_binding_power, prefix_binding_power, token_to_binary_op, token_to_unary_op,
    POSTFIX_BINDING_POWER,
};
use crate::ast::{
    AlterRoleStatement, BoolOp, CommonTableExpr, ConflictAction, CopyDirection, CopyStatement,
    CopyTarget, CursorOptions, DataType, DeclareCursorStatement, DefElem, DeleteStatement,
    ExplainStatement, Expr, FunctionCall, InsertSource, InsertStatement, JoinClause, JoinType,
    Literal, NullOrdering, OnConflict, OrderBy, OrderDirection, RawStmt, SelectColumn,
    SelectStatement, SetOperation, SetOperator, Statement, TableRef, UnaryOp, UpdateAssignment,
    UpdateStatement, VariableSetStatement,
};
use crate::config::DEFAULT_MAX_DEPTH;
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};

/// SQL Parser.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    previous: Token,
    /// Current nesting depth.
    depth: usize,
    /// Nesting depth at which parsing fails.
    max_depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::with_max_depth(input, DEFAULT_MAX_DEPTH)
    }

    /// Creates a parser that rejects input nested deeper than `max_depth`.
    #[must_use]
    pub fn with_max_depth(input: &'a str, max_depth: usize) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            previous: Token::new(TokenKind::Eof, Span::new(0, 0)),
            depth: 0,
            max_depth,
        }
    }

    /// Parses a single SQL statement, optionally followed by `;`.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not exactly one valid statement.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let stmt = self.parse_statement_body()?;
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        if !self.current.is_eof() {
            return Err(self.error_expected("end of input"));
        }
        Ok(stmt)
    }

    /// Parses a `;`-separated list of statements.
    ///
    /// Each statement is wrapped in a [`RawStmt`] recording where it starts
    /// and how far it extends. Empty statements are skipped.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` at the first invalid statement.
    pub fn parse_raw_statements(&mut self) -> Result<Vec<RawStmt>, ParseError> {
        let mut statements = vec![];
        loop {
            while self.check(&TokenKind::Semicolon) {
                self.advance();
            }
            if self.current.is_eof() {
                break;
            }

            let location = self.current.span.start;
            let stmt = self.parse_statement_body()?;
            let len = self.previous.span.end - location;
            statements.push(RawStmt {
                stmt,
                location,
                len,
            });

            if !self.check(&TokenKind::Semicolon) && !self.current.is_eof() {
                return Err(self.error_expected("';' or end of input"));
            }
        }
        Ok(statements)
    }

    /// Parses one statement without its terminator.
    fn parse_statement_body(&mut self) -> Result<Statement, ParseError> {
        self.nested(|parser| match &parser.current.kind {
            TokenKind::Keyword(Keyword::Select | Keyword::With) => {
                Ok(Statement::Select(parser.parse_select_statement()?))
            }
            TokenKind::Keyword(Keyword::Insert) => {
                Ok(Statement::Insert(parser.parse_insert_statement()?))
            }
            TokenKind::Keyword(Keyword::Update) => {
                Ok(Statement::Update(parser.parse_update_statement()?))
            }
            TokenKind::Keyword(Keyword::Delete) => {
                Ok(Statement::Delete(parser.parse_delete_statement()?))
            }
            TokenKind::Keyword(Keyword::Set) => {
                Ok(Statement::VariableSet(parser.parse_variable_set_statement()?))
            }
            TokenKind::Keyword(Keyword::Copy) => {
                Ok(Statement::Copy(parser.parse_copy_statement()?))
            }
            TokenKind::Keyword(Keyword::Explain) => {
                Ok(Statement::Explain(parser.parse_explain_statement()?))
            }
            TokenKind::Keyword(Keyword::Declare) => Ok(Statement::DeclareCursor(
                parser.parse_declare_cursor_statement()?,
            )),
            TokenKind::Keyword(Keyword::Alter) => {
                Ok(Statement::AlterRole(parser.parse_alter_role_statement()?))
            }
            _ => Err(parser.error_expected(
                "SELECT, INSERT, UPDATE, DELETE, SET, COPY, EXPLAIN, DECLARE, or ALTER",
            )),
        })
    }

    // --- SELECT ---

    /// Parses a SELECT statement, including WITH, set operations and the
    /// trailing ORDER BY / LIMIT / OFFSET.
    fn parse_select_statement(&mut self) -> Result<SelectStatement, ParseError> {
        self.nested(|parser| {
            let (recursive, ctes) = parser.parse_with_clause()?;
            let mut select = parser.parse_select_core()?;
            select.recursive = recursive;
            select.ctes = ctes;
            parser.parse_set_operation(&mut select)?;

            // ORDER BY clause
            if parser.check_keyword(Keyword::Order) {
                parser.advance();
                parser.expect_keyword(Keyword::By)?;
                select.order_by = parser.parse_order_by_list()?;
            }

            // LIMIT and OFFSET, in either order
            loop {
                if parser.check_keyword(Keyword::Limit) && select.limit.is_none() {
                    parser.advance();
                    if parser.check_keyword(Keyword::All) {
                        parser.advance();
                    } else {
                        select.limit = Some(parser.parse_expression(0)?);
                    }
                } else if parser.check_keyword(Keyword::Offset) && select.offset.is_none() {
                    parser.advance();
                    select.offset = Some(parser.parse_expression(0)?);
                } else {
                    break;
                }
            }

            Ok(select)
        })
    }

    /// Parses an optional `WITH [RECURSIVE] name [(cols)] AS (stmt), ...`.
    fn parse_with_clause(&mut self) -> Result<(bool, Vec<CommonTableExpr>), ParseError> {
        if !self.check_keyword(Keyword::With) {
            return Ok((false, vec![]));
        }
        self.advance();

        let recursive = if self.check_keyword(Keyword::Recursive) {
            self.advance();
            true
        } else {
            false
        };

        let mut ctes = vec![];
        loop {
            let name = self.expect_identifier()?;
            let columns = if self.check(&TokenKind::LeftParen) {
                self.advance();
                let cols = self.parse_identifier_list()?;
                self.expect(&TokenKind::RightParen)?;
                cols
            } else {
                vec![]
            };
            self.expect_keyword(Keyword::As)?;
            self.expect(&TokenKind::LeftParen)?;
            let query = self.parse_statement_body()?;
            self.expect(&TokenKind::RightParen)?;

            ctes.push(CommonTableExpr {
                name,
                columns,
                query: Box::new(query),
            });

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        Ok((recursive, ctes))
    }

    /// Parses `SELECT ... [FROM] [WHERE] [GROUP BY] [HAVING]`.
    fn parse_select_core(&mut self) -> Result<SelectStatement, ParseError> {
        self.expect_keyword(Keyword::Select)?;

        // DISTINCT or ALL
        let distinct = if self.check_keyword(Keyword::Distinct) {
            self.advance();
            true
        } else {
            if self.check_keyword(Keyword::All) {
                self.advance();
            }
            false
        };

        let columns = self.parse_select_columns()?;

        // FROM clause (optional for expressions like SELECT 1+1)
        let from = if self.check_keyword(Keyword::From) {
            self.advance();
            Some(self.parse_from_list()?)
        } else {
            None
        };

        let where_clause = self.parse_optional_where()?;

        let group_by = if self.check_keyword(Keyword::Group) {
            self.advance();
            self.expect_keyword(Keyword::By)?;
            self.parse_expression_list()?
        } else {
            vec![]
        };

        let having = if self.check_keyword(Keyword::Having) {
            self.advance();
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        Ok(SelectStatement {
            distinct,
            columns,
            from,
            where_clause,
            group_by,
            having,
            ..SelectStatement::default()
        })
    }

    /// Parses a trailing UNION / INTERSECT / EXCEPT chain into `select`.
    fn parse_set_operation(&mut self, select: &mut SelectStatement) -> Result<(), ParseError> {
        let op = match &self.current.kind {
            TokenKind::Keyword(Keyword::Union) => SetOperator::Union,
            TokenKind::Keyword(Keyword::Intersect) => SetOperator::Intersect,
            TokenKind::Keyword(Keyword::Except) => SetOperator::Except,
            _ => return Ok(()),
        };
        self.advance();

        let all = if self.check_keyword(Keyword::All) {
            self.advance();
            true
        } else {
            if self.check_keyword(Keyword::Distinct) {
                self.advance();
            }
            false
        };

        let right = self.nested(|parser| {
            let mut right = parser.parse_select_core()?;
            parser.parse_set_operation(&mut right)?;
            Ok(right)
        })?;

        select.set_op = Some(Box::new(SetOperation { op, all, right }));
        Ok(())
    }

    /// Parses SELECT columns.
    fn parse_select_columns(&mut self) -> Result<Vec<SelectColumn>, ParseError> {
        let mut columns = vec![];

        loop {
            let expr = self.parse_expression(0)?;

            // Check for alias (AS name or just name)
            let alias = if self.check_keyword(Keyword::As) {
                self.advance();
                Some(self.expect_identifier()?)
            } else if matches!(&self.current.kind, TokenKind::Identifier(_)) {
                Some(self.expect_identifier()?)
            } else {
                None
            };

            columns.push(SelectColumn { expr, alias });

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        Ok(columns)
    }

    /// Parses an optional WHERE clause.
    fn parse_optional_where(&mut self) -> Result<Option<Expr>, ParseError> {
        if self.check_keyword(Keyword::Where) {
            self.advance();
            Ok(Some(self.parse_expression(0)?))
        } else {
            Ok(None)
        }
    }

    /// Parses a comma-separated FROM list. Commas become cross joins.
    fn parse_from_list(&mut self) -> Result<TableRef, ParseError> {
        let mut table_ref = self.parse_table_ref()?;
        while self.check(&TokenKind::Comma) {
            self.advance();
            let right = self.parse_table_ref()?;
            table_ref = TableRef::Join {
                left: Box::new(table_ref),
                join: Box::new(JoinClause {
                    join_type: JoinType::Cross,
                    table: right,
                    on: None,
                    using: vec![],
                }),
            };
        }
        Ok(table_ref)
    }

    /// Parses a table reference followed by any joins.
    fn parse_table_ref(&mut self) -> Result<TableRef, ParseError> {
        let mut table_ref = self.parse_table_primary()?;

        while self.is_join_keyword() {
            let join_type = self.parse_join_type()?;
            let right = self.parse_table_primary()?;

            let (on, using) = if join_type == JoinType::Cross {
                (None, vec![])
            } else if self.check_keyword(Keyword::On) {
                self.advance();
                (Some(self.parse_expression(0)?), vec![])
            } else if self.check_keyword(Keyword::Using) {
                self.advance();
                self.expect(&TokenKind::LeftParen)?;
                let cols = self.parse_identifier_list()?;
                self.expect(&TokenKind::RightParen)?;
                (None, cols)
            } else {
                return Err(ParseError::new(
                    "Expected ON or USING clause",
                    self.current.span,
                ));
            };

            table_ref = TableRef::Join {
                left: Box::new(table_ref),
                join: Box::new(JoinClause {
                    join_type,
                    table: right,
                    on,
                    using,
                }),
            };
        }

        Ok(table_ref)
    }

    /// Parses a table, subquery, function call, or parenthesized join.
    fn parse_table_primary(&mut self) -> Result<TableRef, ParseError> {
        if self.check(&TokenKind::LeftParen) {
            self.advance();
            if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
                let query = self.parse_select_statement()?;
                self.expect(&TokenKind::RightParen)?;
                let alias = self.parse_optional_alias()?;
                return Ok(TableRef::Subquery {
                    query: Box::new(query),
                    alias,
                });
            }
            let inner = self.nested(Self::parse_table_ref)?;
            self.expect(&TokenKind::RightParen)?;
            return Ok(inner);
        }

        let first = self.expect_identifier()?;
        let (schema, name) = if self.check(&TokenKind::Dot) {
            self.advance();
            (Some(first), self.expect_identifier()?)
        } else {
            (None, first)
        };

        if self.check(&TokenKind::LeftParen) {
            let name = match schema {
                Some(schema) => format!("{schema}.{name}"),
                None => name,
            };
            let Expr::Function(call) = self.parse_function_call(name)? else {
                return Err(ParseError::new("Expected function call", self.current.span));
            };
            let alias = self.parse_optional_alias()?;
            return Ok(TableRef::Function { call, alias });
        }

        let alias = self.parse_optional_alias()?;
        Ok(TableRef::Table {
            schema,
            name,
            alias,
        })
    }

    /// Checks if current token is a join keyword.
    fn is_join_keyword(&self) -> bool {
        matches!(
            &self.current.kind,
            TokenKind::Keyword(
                Keyword::Join
                    | Keyword::Inner
                    | Keyword::Left
                    | Keyword::Right
                    | Keyword::Full
                    | Keyword::Cross
            )
        )
    }

    /// Parses a join type.
    fn parse_join_type(&mut self) -> Result<JoinType, ParseError> {
        let join_type = match &self.current.kind {
            TokenKind::Keyword(Keyword::Join) => JoinType::Inner,
            TokenKind::Keyword(Keyword::Inner) => {
                self.advance();
                JoinType::Inner
            }
            TokenKind::Keyword(Keyword::Cross) => {
                self.advance();
                JoinType::Cross
            }
            TokenKind::Keyword(kw @ (Keyword::Left | Keyword::Right | Keyword::Full)) => {
                let join_type = match kw {
                    Keyword::Left => JoinType::Left,
                    Keyword::Right => JoinType::Right,
                    _ => JoinType::Full,
                };
                self.advance();
                if self.check_keyword(Keyword::Outer) {
                    self.advance();
                }
                join_type
            }
            _ => return Err(self.error_expected("JOIN keyword")),
        };
        self.expect_keyword(Keyword::Join)?;
        Ok(join_type)
    }

    /// Parses an optional table alias.
    fn parse_optional_alias(&mut self) -> Result<Option<String>, ParseError> {
        if self.check_keyword(Keyword::As) {
            self.advance();
            Ok(Some(self.expect_identifier()?))
        } else if matches!(&self.current.kind, TokenKind::Identifier(_)) {
            Ok(Some(self.expect_identifier()?))
        } else {
            Ok(None)
        }
    }

    /// Parses an ORDER BY list.
    fn parse_order_by_list(&mut self) -> Result<Vec<OrderBy>, ParseError> {
        let mut items = vec![];
        loop {
            let expr = self.parse_expression(0)?;
            let direction = if self.check_keyword(Keyword::Desc) {
                self.advance();
                OrderDirection::Desc
            } else {
                if self.check_keyword(Keyword::Asc) {
                    self.advance();
                }
                OrderDirection::Asc
            };

            let nulls = if self.check_keyword(Keyword::Nulls) {
                self.advance();
                if self.check_keyword(Keyword::First) {
                    self.advance();
                    Some(NullOrdering::First)
                } else {
                    self.expect_keyword(Keyword::Last)?;
                    Some(NullOrdering::Last)
                }
            } else {
                None
            };

            items.push(OrderBy {
                expr,
                direction,
                nulls,
            });

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(items)
    }

    // --- INSERT / UPDATE / DELETE ---

    /// Parses `[schema.]name`.
    fn parse_qualified_name(&mut self) -> Result<(Option<String>, String), ParseError> {
        let first = self.expect_identifier()?;
        if self.check(&TokenKind::Dot) {
            self.advance();
            Ok((Some(first), self.expect_identifier()?))
        } else {
            Ok((None, first))
        }
    }

    /// Parses an INSERT statement.
    fn parse_insert_statement(&mut self) -> Result<InsertStatement, ParseError> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;

        let (schema, table) = self.parse_qualified_name()?;

        // Column list (optional)
        let columns = if self.check(&TokenKind::LeftParen) {
            self.advance();
            let cols = self.parse_identifier_list()?;
            self.expect(&TokenKind::RightParen)?;
            cols
        } else {
            vec![]
        };

        // VALUES, SELECT, or DEFAULT VALUES
        let values = if self.check_keyword(Keyword::Values) {
            self.advance();
            let mut rows = vec![];
            loop {
                self.expect(&TokenKind::LeftParen)?;
                let row = self.parse_expression_list()?;
                self.expect(&TokenKind::RightParen)?;
                rows.push(row);
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
            InsertSource::Values(rows)
        } else if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
            InsertSource::Query(Box::new(self.parse_select_statement()?))
        } else if self.check_keyword(Keyword::Default) {
            self.advance();
            self.expect_keyword(Keyword::Values)?;
            InsertSource::DefaultValues
        } else {
            return Err(self.error_expected("VALUES, SELECT, or DEFAULT VALUES"));
        };

        let on_conflict = if self.check_keyword(Keyword::On) {
            self.advance();
            Some(self.parse_on_conflict()?)
        } else {
            None
        };

        let returning = self.parse_returning()?;

        Ok(InsertStatement {
            schema,
            table,
            columns,
            values,
            on_conflict,
            returning,
        })
    }

    /// Parses `CONFLICT [(cols)] DO NOTHING | DO UPDATE SET ... [WHERE ...]`.
    fn parse_on_conflict(&mut self) -> Result<OnConflict, ParseError> {
        self.expect_keyword(Keyword::Conflict)?;
        let columns = if self.check(&TokenKind::LeftParen) {
            self.advance();
            let cols = self.parse_identifier_list()?;
            self.expect(&TokenKind::RightParen)?;
            cols
        } else {
            vec![]
        };

        self.expect_keyword(Keyword::Do)?;
        let action = if self.check_keyword(Keyword::Nothing) {
            self.advance();
            ConflictAction::Nothing
        } else {
            self.expect_keyword(Keyword::Update)?;
            self.expect_keyword(Keyword::Set)?;
            let assignments = self.parse_assignments()?;
            let where_clause = self.parse_optional_where()?;
            ConflictAction::Update {
                assignments,
                where_clause,
            }
        };

        Ok(OnConflict { columns, action })
    }

    /// Parses an optional RETURNING list.
    fn parse_returning(&mut self) -> Result<Vec<SelectColumn>, ParseError> {
        if self.check_keyword(Keyword::Returning) {
            self.advance();
            self.parse_select_columns()
        } else {
            Ok(vec![])
        }
    }

    /// Parses an UPDATE statement.
    fn parse_update_statement(&mut self) -> Result<UpdateStatement, ParseError> {
        self.expect_keyword(Keyword::Update)?;

        let (schema, table) = self.parse_qualified_name()?;
        let alias = self.parse_optional_alias()?;

        self.expect_keyword(Keyword::Set)?;
        let assignments = self.parse_assignments()?;

        // FROM clause (optional, for joins)
        let from = if self.check_keyword(Keyword::From) {
            self.advance();
            Some(self.parse_from_list()?)
        } else {
            None
        };

        let where_clause = self.parse_optional_where()?;
        let returning = self.parse_returning()?;

        Ok(UpdateStatement {
            schema,
            table,
            alias,
            assignments,
            from,
            where_clause,
            returning,
        })
    }

    /// Parses SET assignments, including `(a, b) = (...)`.
    ///
    /// A multi-column assignment gives every target column its own copy of
    /// the source expression, so the constants in it appear once per column.
    fn parse_assignments(&mut self) -> Result<Vec<UpdateAssignment>, ParseError> {
        let mut assignments = vec![];
        loop {
            if self.check(&TokenKind::LeftParen) {
                self.advance();
                let targets = self.parse_identifier_list()?;
                self.expect(&TokenKind::RightParen)?;
                self.expect(&TokenKind::Eq)?;
                let source = self.parse_expression(0)?;
                let columns = targets.len();
                for (index, column) in targets.into_iter().enumerate() {
                    assignments.push(UpdateAssignment {
                        column,
                        value: Expr::MultiAssign {
                            source: Box::new(source.clone()),
                            column: index + 1,
                            columns,
                        },
                    });
                }
            } else {
                let column = self.expect_identifier()?;
                self.expect(&TokenKind::Eq)?;
                let value = self.parse_expression(0)?;
                assignments.push(UpdateAssignment { column, value });
            }

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(assignments)
    }

    /// Parses a DELETE statement.
    fn parse_delete_statement(&mut self) -> Result<DeleteStatement, ParseError> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;

        let (schema, table) = self.parse_qualified_name()?;
        let alias = self.parse_optional_alias()?;

        let using = if self.check_keyword(Keyword::Using) {
            self.advance();
            Some(self.parse_from_list()?)
        } else {
            None
        };

        let where_clause = self.parse_optional_where()?;
        let returning = self.parse_returning()?;

        Ok(DeleteStatement {
            schema,
            table,
            alias,
            using,
            where_clause,
            returning,
        })
    }

    // --- Utility statements ---

    /// Parses `SET [SESSION | LOCAL] name { TO | = } { value, ... | DEFAULT }`
    /// and `SET [SESSION | LOCAL] TIME ZONE { value | LOCAL | DEFAULT }`.
    fn parse_variable_set_statement(&mut self) -> Result<VariableSetStatement, ParseError> {
        self.expect_keyword(Keyword::Set)?;

        let local = if self.check_keyword(Keyword::Local) {
            self.advance();
            true
        } else {
            if self.check_keyword(Keyword::Session) {
                self.advance();
            }
            false
        };

        if self.check_keyword(Keyword::Time) {
            self.advance();
            self.expect_keyword(Keyword::Zone)?;
            let (args, to_default) = if self.check_keyword(Keyword::Local)
                || self.check_keyword(Keyword::Default)
            {
                self.advance();
                (vec![], true)
            } else {
                (vec![self.parse_option_value()?], false)
            };
            return Ok(VariableSetStatement {
                local,
                name: String::from("timezone"),
                args,
                to_default,
            });
        }

        let mut name = self.expect_identifier()?;
        while self.check(&TokenKind::Dot) {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_identifier()?);
        }

        if self.check_keyword(Keyword::To) || self.check(&TokenKind::Eq) {
            self.advance();
        } else {
            return Err(self.error_expected("TO or ="));
        }

        if self.check_keyword(Keyword::Default) {
            self.advance();
            return Ok(VariableSetStatement {
                local,
                name,
                args: vec![],
                to_default: true,
            });
        }

        let mut args = vec![self.parse_option_value()?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            args.push(self.parse_option_value()?);
        }

        Ok(VariableSetStatement {
            local,
            name,
            args,
            to_default: false,
        })
    }

    /// Parses a COPY statement.
    fn parse_copy_statement(&mut self) -> Result<CopyStatement, ParseError> {
        self.expect_keyword(Keyword::Copy)?;

        let (table, columns, query) = if self.check(&TokenKind::LeftParen) {
            self.advance();
            let query = self.parse_statement_body()?;
            self.expect(&TokenKind::RightParen)?;
            (None, vec![], Some(Box::new(query)))
        } else {
            let (schema, name) = self.parse_qualified_name()?;
            let table = match schema {
                Some(schema) => format!("{schema}.{name}"),
                None => name,
            };
            let columns = if self.check(&TokenKind::LeftParen) {
                self.advance();
                let cols = self.parse_identifier_list()?;
                self.expect(&TokenKind::RightParen)?;
                cols
            } else {
                vec![]
            };
            (Some(table), columns, None)
        };

        let direction = if self.check_keyword(Keyword::From) {
            self.advance();
            CopyDirection::From
        } else {
            self.expect_keyword(Keyword::To)?;
            CopyDirection::To
        };

        let target = match &self.current.kind {
            TokenKind::Keyword(Keyword::Stdin) => {
                self.advance();
                CopyTarget::Stdin
            }
            TokenKind::Keyword(Keyword::Stdout) => {
                self.advance();
                CopyTarget::Stdout
            }
            TokenKind::Keyword(Keyword::Program) => {
                self.advance();
                CopyTarget::Program(self.expect_string()?)
            }
            TokenKind::String(_) => CopyTarget::File(self.expect_string()?),
            _ => return Err(self.error_expected("STDIN, STDOUT, PROGRAM, or file name")),
        };

        let options = self.parse_copy_options()?;

        Ok(CopyStatement {
            table,
            columns,
            query,
            direction,
            target,
            options,
        })
    }

    /// Parses `[WITH] (option [value], ...)` or the legacy bare option list.
    fn parse_copy_options(&mut self) -> Result<Vec<DefElem>, ParseError> {
        if self.check_keyword(Keyword::With) {
            self.advance();
        }
        if self.check(&TokenKind::LeftParen) {
            return self.parse_def_list();
        }

        let mut options = vec![];
        while let Some(name) = self.any_word() {
            let location = self.current.span.start;
            self.advance();
            if self.check_keyword(Keyword::As) {
                self.advance();
            }
            let arg = if matches!(
                self.current.kind,
                TokenKind::String(_) | TokenKind::Integer(_) | TokenKind::Numeric(_)
            ) {
                Some(self.parse_option_value()?)
            } else {
                None
            };
            options.push(DefElem {
                name,
                arg,
                location,
            });
        }
        Ok(options)
    }

    /// Parses an EXPLAIN statement.
    fn parse_explain_statement(&mut self) -> Result<ExplainStatement, ParseError> {
        self.expect_keyword(Keyword::Explain)?;

        let options = if self.check(&TokenKind::LeftParen) {
            self.parse_def_list()?
        } else {
            let mut options = vec![];
            for keyword in [Keyword::Analyze, Keyword::Verbose] {
                if self.check_keyword(keyword) {
                    options.push(DefElem {
                        name: keyword.as_str().to_ascii_lowercase(),
                        arg: None,
                        location: self.current.span.start,
                    });
                    self.advance();
                }
            }
            options
        };

        let query = self.parse_statement_body()?;
        Ok(ExplainStatement {
            options,
            query: Box::new(query),
        })
    }

    /// Parses `DECLARE name [BINARY] [INSENSITIVE] [[NO] SCROLL] CURSOR
    /// [{WITH | WITHOUT} HOLD] FOR query`.
    fn parse_declare_cursor_statement(&mut self) -> Result<DeclareCursorStatement, ParseError> {
        self.expect_keyword(Keyword::Declare)?;
        let name = self.expect_identifier()?;

        let mut options = CursorOptions::default();
        loop {
            match &self.current.kind {
                TokenKind::Keyword(Keyword::Binary) => options.binary = true,
                TokenKind::Keyword(Keyword::Insensitive) => options.insensitive = true,
                TokenKind::Keyword(Keyword::Scroll) => options.scroll = Some(true),
                TokenKind::Keyword(Keyword::No) => {
                    self.advance();
                    self.expect_keyword(Keyword::Scroll)?;
                    options.scroll = Some(false);
                    continue;
                }
                _ => break,
            }
            self.advance();
        }
        self.expect_keyword(Keyword::Cursor)?;

        if self.check_keyword(Keyword::With) || self.check_keyword(Keyword::Without) {
            options.hold = self.check_keyword(Keyword::With);
            self.advance();
            self.expect_keyword(Keyword::Hold)?;
        }

        self.expect_keyword(Keyword::For)?;
        let query = self.parse_select_statement()?;

        Ok(DeclareCursorStatement {
            name,
            options,
            query: Box::new(query),
        })
    }

    /// Parses `ALTER {ROLE | USER} name [WITH] option ...`.
    fn parse_alter_role_statement(&mut self) -> Result<AlterRoleStatement, ParseError> {
        self.expect_keyword(Keyword::Alter)?;
        if self.check_keyword(Keyword::Role) || self.check_keyword(Keyword::User) {
            self.advance();
        } else {
            return Err(self.error_expected("ROLE or USER"));
        }

        let role = self.expect_identifier()?;
        if self.check_keyword(Keyword::With) {
            self.advance();
        }

        let mut options = vec![];
        loop {
            let location = self.current.span.start;
            let elem = match &self.current.kind {
                TokenKind::Keyword(Keyword::Password) => {
                    self.advance();
                    DefElem {
                        name: String::from("password"),
                        arg: Some(self.parse_password_value()?),
                        location,
                    }
                }
                TokenKind::Keyword(Keyword::Encrypted) => {
                    self.advance();
                    self.expect_keyword(Keyword::Password)?;
                    DefElem {
                        name: String::from("password"),
                        arg: Some(self.parse_password_value()?),
                        location,
                    }
                }
                TokenKind::Keyword(Keyword::Connection) => {
                    self.advance();
                    self.expect_keyword(Keyword::Limit)?;
                    DefElem {
                        name: String::from("connectionlimit"),
                        arg: Some(self.parse_signed_number()?),
                        location,
                    }
                }
                TokenKind::Keyword(Keyword::Valid) => {
                    self.advance();
                    self.expect_keyword(Keyword::Until)?;
                    DefElem {
                        name: String::from("validuntil"),
                        arg: Some(self.parse_string_constant()?),
                        location,
                    }
                }
                TokenKind::Identifier(word) => {
                    let name = word.to_ascii_lowercase();
                    self.advance();
                    DefElem {
                        name,
                        arg: None,
                        location,
                    }
                }
                _ => break,
            };
            options.push(elem);
        }

        if options.is_empty() {
            return Err(self.error_expected("role option"));
        }

        Ok(AlterRoleStatement { role, options })
    }

    /// Parses `'secret'` or NULL after PASSWORD.
    fn parse_password_value(&mut self) -> Result<Expr, ParseError> {
        if self.check_keyword(Keyword::Null) {
            let location = self.current.span.start;
            self.advance();
            return Ok(Expr::literal_at(Literal::Null, location));
        }
        self.parse_string_constant()
    }

    /// Parses `( name [value], ... )`.
    fn parse_def_list(&mut self) -> Result<Vec<DefElem>, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut elems = vec![];
        loop {
            let location = self.current.span.start;
            let Some(name) = self.any_word() else {
                return Err(self.error_expected("option name"));
            };
            self.advance();
            let arg = if self.check(&TokenKind::Comma) || self.check(&TokenKind::RightParen) {
                None
            } else {
                Some(self.parse_option_value()?)
            };
            elems.push(DefElem {
                name,
                arg,
                location,
            });

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(elems)
    }

    /// Parses an option or SET value.
    ///
    /// Strings, signed numbers and bare words all become constants located
    /// at their first character. A parenthesized list becomes a row.
    fn parse_option_value(&mut self) -> Result<Expr, ParseError> {
        let location = self.current.span.start;
        match &self.current.kind {
            TokenKind::String(_) => self.parse_string_constant(),
            TokenKind::Integer(_) | TokenKind::Numeric(_) | TokenKind::Minus | TokenKind::Plus => {
                self.parse_signed_number()
            }
            TokenKind::Star => {
                self.advance();
                Ok(Expr::Wildcard { table: None })
            }
            TokenKind::LeftParen => {
                self.advance();
                let mut items = vec![self.parse_option_value()?];
                while self.check(&TokenKind::Comma) {
                    self.advance();
                    items.push(self.parse_option_value()?);
                }
                self.expect(&TokenKind::RightParen)?;
                Ok(Expr::Row(items))
            }
            TokenKind::Keyword(Keyword::On) => {
                self.advance();
                Ok(Expr::literal_at(Literal::String(String::from("on")), location))
            }
            _ => match self.any_word() {
                Some(word) => {
                    self.advance();
                    Ok(Expr::literal_at(Literal::String(word), location))
                }
                None => Err(self.error_expected("value")),
            },
        }
    }

    /// Parses a string literal as a located constant.
    fn parse_string_constant(&mut self) -> Result<Expr, ParseError> {
        let location = self.current.span.start;
        let value = self.expect_string()?;
        Ok(Expr::literal_at(Literal::String(value), location))
    }

    /// Parses `[+|-] number` as a single located constant.
    fn parse_signed_number(&mut self) -> Result<Expr, ParseError> {
        if self.check(&TokenKind::Minus) {
            if let Some(literal) = self.try_negative_number() {
                return Ok(literal);
            }
        } else if self.check(&TokenKind::Plus) {
            self.advance();
        }

        let location = self.current.span.start;
        let value = match &self.current.kind {
            TokenKind::Integer(n) => Literal::Integer(*n),
            TokenKind::Numeric(text) => Literal::Numeric(text.clone()),
            _ => return Err(self.error_expected("number")),
        };
        self.advance();
        Ok(Expr::literal_at(value, location))
    }

    // --- Expressions ---

    /// Parses an expression using Pratt parsing.
    fn parse_expression(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        self.nested(|parser| parser.parse_expression_bp(min_bp))
    }

    fn parse_expression_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        // Parse prefix (primary expression or unary operator)
        let mut lhs = self.parse_prefix()?;

        loop {
            // Postfix cast and subscript
            if self.check(&TokenKind::DoubleColon) && POSTFIX_BINDING_POWER >= min_bp {
                self.advance();
                let data_type = self.parse_data_type()?;
                lhs = Expr::Cast {
                    expr: Box::new(lhs),
                    data_type,
                };
                continue;
            }
            if self.check(&TokenKind::LeftBracket) && POSTFIX_BINDING_POWER >= min_bp {
                self.advance();
                let index = self.parse_expression(0)?;
                let upper = if self.check(&TokenKind::Colon) {
                    self.advance();
                    Some(Box::new(self.parse_expression(0)?))
                } else {
                    None
                };
                self.expect(&TokenKind::RightBracket)?;
                lhs = Expr::Subscript {
                    expr: Box::new(lhs),
                    index: Box::new(index),
                    upper,
                };
                continue;
            }

            let Some((l_bp, r_bp)) = infix_binding_power(&self.current.kind) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }

            match &self.current.kind {
                TokenKind::Keyword(Keyword::Is) => {
                    self.advance();
                    let negated = if self.check_keyword(Keyword::Not) {
                        self.advance();
                        true
                    } else {
                        false
                    };
                    lhs = match &self.current.kind {
                        TokenKind::Keyword(Keyword::Null) => Expr::IsNull {
                            expr: Box::new(lhs),
                            negated,
                        },
                        TokenKind::Keyword(kw @ (Keyword::True | Keyword::False)) => {
                            Expr::IsBool {
                                expr: Box::new(lhs),
                                value: *kw == Keyword::True,
                                negated,
                            }
                        }
                        _ => return Err(self.error_expected("NULL, TRUE, or FALSE")),
                    };
                    self.advance();
                }
                TokenKind::Keyword(Keyword::Not) => {
                    let follows_predicate = matches!(
                        self.peek_kind(),
                        TokenKind::Keyword(
                            Keyword::In | Keyword::Between | Keyword::Like | Keyword::Ilike
                        )
                    );
                    if !follows_predicate {
                        break;
                    }
                    self.advance();
                    lhs = self.parse_predicate(lhs, true, r_bp)?;
                }
                TokenKind::Keyword(Keyword::In | Keyword::Between | Keyword::Like | Keyword::Ilike) => {
                    lhs = self.parse_predicate(lhs, false, r_bp)?;
                }
                TokenKind::Keyword(kw @ (Keyword::And | Keyword::Or)) => {
                    let op = if *kw == Keyword::And {
                        BoolOp::And
                    } else {
                        BoolOp::Or
                    };
                    self.advance();
                    let rhs = self.parse_expression(r_bp)?;
                    lhs = match lhs {
                        Expr::BoolOp { op: existing, mut args } if existing == op => {
                            args.push(rhs);
                            Expr::BoolOp { op, args }
                        }
                        other => Expr::BoolOp {
                            op,
                            args: vec![other, rhs],
                        },
                    };
                }
                TokenKind::Operator(_) | TokenKind::BitNot => {
                    let op = self.operator_text();
                    self.advance();
                    let rhs = self.parse_expression(r_bp)?;
                    lhs = Expr::Operator {
                        left: Some(Box::new(lhs)),
                        op,
                        right: Box::new(rhs),
                    };
                }
                _ => {
                    // Standard binary operator
                    let Some(op) = token_to_binary_op(&self.current.kind) else {
                        break;
                    };
                    self.advance();
                    let rhs = self.parse_expression(r_bp)?;
                    lhs = Expr::Binary {
                        left: Box::new(lhs),
                        op,
                        right: Box::new(rhs),
                    };
                }
            }
        }

        Ok(lhs)
    }

    /// Parses the right side of `[NOT] IN`, `BETWEEN`, `LIKE` or `ILIKE`.
    /// The optional NOT has already been consumed.
    fn parse_predicate(&mut self, lhs: Expr, negated: bool, r_bp: u8) -> Result<Expr, ParseError> {
        match &self.current.kind {
            TokenKind::Keyword(Keyword::In) => {
                self.advance();
                self.expect(&TokenKind::LeftParen)?;
                let expr = if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With)
                {
                    Expr::InSubquery {
                        expr: Box::new(lhs),
                        query: Box::new(self.parse_select_statement()?),
                        negated,
                    }
                } else {
                    Expr::In {
                        expr: Box::new(lhs),
                        list: self.parse_expression_list()?,
                        negated,
                    }
                };
                self.expect(&TokenKind::RightParen)?;
                Ok(expr)
            }
            TokenKind::Keyword(Keyword::Between) => {
                self.advance();
                let low = self.parse_expression(r_bp)?;
                self.expect_keyword(Keyword::And)?;
                let high = self.parse_expression(r_bp)?;
                Ok(Expr::Between {
                    expr: Box::new(lhs),
                    low: Box::new(low),
                    high: Box::new(high),
                    negated,
                })
            }
            kind => {
                let Some(op) = token_to_binary_op(kind) else {
                    return Err(self.error_expected("IN, BETWEEN, LIKE, or ILIKE"));
                };
                self.advance();
                let rhs = self.parse_expression(r_bp)?;
                let expr = lhs.binary(op, rhs);
                Ok(if negated {
                    Expr::Unary {
                        op: UnaryOp::Not,
                        operand: Box::new(expr),
                    }
                } else {
                    expr
                })
            }
        }
    }

    /// Parses a prefix expression.
    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        // A minus sign directly applied to a number is part of the constant
        if self.check(&TokenKind::Minus) {
            if let Some(literal) = self.try_negative_number() {
                return Ok(literal);
            }
        }

        if let Some(op) = token_to_unary_op(&self.current.kind) {
            let bp = prefix_binding_power(&self.current.kind).unwrap_or(21);
            self.advance();
            let operand = self.parse_expression(bp)?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }

        if let TokenKind::Operator(op) = &self.current.kind {
            let op = op.clone();
            let bp = prefix_binding_power(&self.current.kind).unwrap_or(21);
            self.advance();
            let operand = self.parse_expression(bp)?;
            return Ok(Expr::Operator {
                left: None,
                op,
                right: Box::new(operand),
            });
        }

        self.parse_primary()
    }

    /// Folds `-` followed by a numeric token into one negative constant
    /// located at the minus sign.
    ///
    /// Nothing is folded when the number is itself cast or subscripted,
    /// since those bind tighter than the sign.
    fn try_negative_number(&mut self) -> Option<Expr> {
        let mut lookahead = self.lexer.clone();
        let value = match lookahead.next_token().kind {
            TokenKind::Integer(n) => Literal::Integer(-n),
            TokenKind::Numeric(text) => Literal::Numeric(format!("-{text}")),
            _ => return None,
        };
        if matches!(
            lookahead.next_token().kind,
            TokenKind::DoubleColon | TokenKind::LeftBracket
        ) {
            return None;
        }

        let location = self.current.span.start;
        self.advance();
        self.advance();
        Some(Expr::literal_at(value, location))
    }

    /// Parses a primary expression.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.current.clone();
        let location = token.span.start;

        match token.kind {
            // Literals
            TokenKind::Integer(n) => {
                self.advance();
                Ok(Expr::literal_at(Literal::Integer(n), location))
            }
            TokenKind::Numeric(text) => {
                self.advance();
                Ok(Expr::literal_at(Literal::Numeric(text), location))
            }
            TokenKind::String(value) => {
                self.advance();
                Ok(Expr::literal_at(Literal::String(value), location))
            }
            TokenKind::BitString(bits) => {
                self.advance();
                Ok(Expr::literal_at(Literal::BitString(bits), location))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expr::literal_at(Literal::Boolean(true), location))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expr::literal_at(Literal::Boolean(false), location))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Ok(Expr::literal_at(Literal::Null, location))
            }

            // Numbered parameters
            TokenKind::Param(number) => {
                self.advance();
                Ok(Expr::Parameter { number, location })
            }

            TokenKind::Keyword(Keyword::Default) => {
                self.advance();
                Ok(Expr::Default)
            }

            // Wildcard
            TokenKind::Star => {
                self.advance();
                Ok(Expr::Wildcard { table: None })
            }

            // Parenthesized expression, row, or subquery
            TokenKind::LeftParen => {
                self.advance();
                if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
                    let subquery = self.parse_select_statement()?;
                    self.expect(&TokenKind::RightParen)?;
                    return Ok(Expr::Subquery(Box::new(subquery)));
                }
                let expr = self.parse_expression(0)?;
                if self.check(&TokenKind::Comma) {
                    self.advance();
                    let mut items = vec![expr];
                    items.extend(self.parse_expression_list()?);
                    self.expect(&TokenKind::RightParen)?;
                    return Ok(Expr::Row(items));
                }
                self.expect(&TokenKind::RightParen)?;
                Ok(Expr::Paren(Box::new(expr)))
            }

            TokenKind::Keyword(Keyword::Case) => self.parse_case_expression(),
            TokenKind::Keyword(Keyword::Cast) => self.parse_cast_expression(),

            TokenKind::Keyword(Keyword::Exists) => {
                self.advance();
                self.expect(&TokenKind::LeftParen)?;
                let subquery = self.parse_select_statement()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(Expr::Exists(Box::new(subquery)))
            }

            TokenKind::Keyword(Keyword::Array) => {
                self.advance();
                self.expect(&TokenKind::LeftBracket)?;
                let items = if self.check(&TokenKind::RightBracket) {
                    vec![]
                } else {
                    self.parse_expression_list()?
                };
                self.expect(&TokenKind::RightBracket)?;
                Ok(Expr::Array(items))
            }

            TokenKind::Error(message) => Err(ParseError::new(message, token.span)),

            _ => match self.current_word() {
                Some(name) => self.parse_name_expression(name, token.span),
                None => Err(self.error_expected("expression")),
            },
        }
    }

    /// Parses what follows a leading name: a column reference, function
    /// call, qualified wildcard, or typed literal (`DATE '2024-01-01'`).
    fn parse_name_expression(&mut self, name: String, span: Span) -> Result<Expr, ParseError> {
        self.advance();

        if self.check(&TokenKind::LeftParen) {
            if name.eq_ignore_ascii_case("row") {
                self.advance();
                let items = if self.check(&TokenKind::RightParen) {
                    vec![]
                } else {
                    self.parse_expression_list()?
                };
                self.expect(&TokenKind::RightParen)?;
                return Ok(Expr::Row(items));
            }
            return self.parse_function_call(name);
        }

        // Typed literal: the string is the constant, the type is a cast
        if let TokenKind::String(value) = &self.current.kind {
            let literal = Expr::literal_at(Literal::String(value.clone()), self.current.span.start);
            self.advance();
            return Ok(Expr::Cast {
                expr: Box::new(literal),
                data_type: DataType::from_name(&name.to_ascii_lowercase()),
            });
        }

        if !self.check(&TokenKind::Dot) {
            return Ok(Expr::Column {
                table: None,
                name,
                span,
            });
        }

        // Qualified name (table.column, schema.table.column, table.* or schema.func())
        let mut qualifier = name;
        loop {
            self.advance();
            if self.check(&TokenKind::Star) {
                self.advance();
                return Ok(Expr::Wildcard {
                    table: Some(qualifier),
                });
            }
            let part = self.expect_identifier()?;
            if self.check(&TokenKind::LeftParen) {
                return self.parse_function_call(format!("{qualifier}.{part}"));
            }
            if !self.check(&TokenKind::Dot) {
                return Ok(Expr::Column {
                    table: Some(qualifier),
                    name: part,
                    span: Span::new(span.start, self.previous.span.end),
                });
            }
            qualifier = format!("{qualifier}.{part}");
        }
    }

    /// Parses a function call.
    fn parse_function_call(&mut self, name: String) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;

        let distinct = if self.check_keyword(Keyword::Distinct) {
            self.advance();
            true
        } else {
            false
        };

        let args = if self.check(&TokenKind::RightParen) {
            vec![]
        } else if self.check(&TokenKind::Star) {
            self.advance();
            vec![Expr::Wildcard { table: None }]
        } else {
            self.parse_expression_list()?
        };

        self.expect(&TokenKind::RightParen)?;

        Ok(Expr::Function(FunctionCall {
            name,
            args,
            distinct,
        }))
    }

    /// Parses a CAST expression.
    fn parse_cast_expression(&mut self) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Cast)?;
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expression(0)?;
        self.expect_keyword(Keyword::As)?;
        let data_type = self.parse_data_type()?;
        self.expect(&TokenKind::RightParen)?;

        Ok(Expr::Cast {
            expr: Box::new(expr),
            data_type,
        })
    }

    /// Parses a CASE expression.
    fn parse_case_expression(&mut self) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Case)?;

        // Check for simple CASE (CASE expr WHEN ...)
        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expression(0)?))
        };

        // Parse WHEN/THEN clauses
        let mut when_clauses = vec![];
        while self.check_keyword(Keyword::When) {
            self.advance();
            let when_expr = self.parse_expression(0)?;
            self.expect_keyword(Keyword::Then)?;
            let then_expr = self.parse_expression(0)?;
            when_clauses.push((when_expr, then_expr));
        }
        if when_clauses.is_empty() {
            return Err(self.error_expected("WHEN"));
        }

        // Parse ELSE clause
        let else_clause = if self.check_keyword(Keyword::Else) {
            self.advance();
            Some(Box::new(self.parse_expression(0)?))
        } else {
            None
        };

        self.expect_keyword(Keyword::End)?;

        Ok(Expr::Case {
            operand,
            when_clauses,
            else_clause,
        })
    }

    /// Parses a data type. Type modifiers such as `varchar(10)` are plain
    /// integers, not constants.
    fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        let Some(first) = self.current_word() else {
            return Err(self.error_expected("data type"));
        };
        self.advance();

        let name = first.to_ascii_lowercase();
        let mut data_type = if name == "double" && self.check_word("precision") {
            self.advance();
            DataType::DoublePrecision
        } else if name == "character" && self.check_word("varying") {
            self.advance();
            DataType::Varchar(None)
        } else if self.check(&TokenKind::Dot) {
            self.advance();
            let second = self.expect_identifier()?;
            DataType::Custom(format!("{first}.{second}"))
        } else {
            DataType::from_name(&name)
        };

        let modifiers = self.parse_type_modifiers()?;
        data_type = match (data_type, modifiers.as_slice()) {
            (DataType::Numeric { .. }, [precision, rest @ ..]) => DataType::Numeric {
                precision: Some(*precision),
                scale: rest.first().copied(),
            },
            (DataType::Char(_), [len, ..]) => DataType::Char(Some(*len)),
            (DataType::Varchar(_), [len, ..]) => DataType::Varchar(Some(*len)),
            (other, _) => other,
        };

        if matches!(data_type, DataType::Time | DataType::Timestamp) {
            if self.check_keyword(Keyword::With)
                && matches!(self.peek_kind(), TokenKind::Keyword(Keyword::Time))
            {
                self.advance();
                self.advance();
                self.expect_keyword(Keyword::Zone)?;
                if data_type == DataType::Timestamp {
                    data_type = DataType::TimestampTz;
                }
            } else if self.check_keyword(Keyword::Without) {
                self.advance();
                self.expect_keyword(Keyword::Time)?;
                self.expect_keyword(Keyword::Zone)?;
            }
        }

        while self.check(&TokenKind::LeftBracket) {
            self.advance();
            if matches!(self.current.kind, TokenKind::Integer(_)) {
                self.advance();
            }
            self.expect(&TokenKind::RightBracket)?;
            data_type = DataType::Array(Box::new(data_type));
        }

        Ok(data_type)
    }

    /// Parses optional `(n [, m ...])` type modifiers.
    fn parse_type_modifiers(&mut self) -> Result<Vec<u32>, ParseError> {
        if !self.check(&TokenKind::LeftParen) {
            return Ok(vec![]);
        }
        self.advance();

        let mut modifiers = vec![];
        loop {
            let TokenKind::Integer(n) = self.current.kind else {
                return Err(self.error_expected("integer"));
            };
            let value = u32::try_from(n)
                .map_err(|_| ParseError::new("Type modifier out of range", self.current.span))?;
            self.advance();
            modifiers.push(value);

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        self.expect(&TokenKind::RightParen)?;
        Ok(modifiers)
    }

    /// Parses a comma-separated list of expressions.
    fn parse_expression_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![];
        loop {
            exprs.push(self.parse_expression(0)?);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(exprs)
    }

    /// Parses a comma-separated list of identifiers.
    fn parse_identifier_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut idents = vec![];
        loop {
            idents.push(self.expect_identifier()?);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(idents)
    }

    // --- Helper methods ---

    /// Runs `parse` one nesting level deeper, failing past the depth limit.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::nesting_too_deep(
                self.max_depth,
                self.current.span,
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        self.previous = core::mem::replace(&mut self.current, self.lexer.next_token());
    }

    /// Returns the kind of the token after the current one.
    fn peek_kind(&self) -> TokenKind {
        self.lexer.clone().next_token().kind
    }

    /// Checks if the current token matches the given kind.
    fn check(&self, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.current.kind) == core::mem::discriminant(kind)
    }

    /// Checks if the current token is the given keyword.
    fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(&self.current.kind, TokenKind::Keyword(kw) if *kw == keyword)
    }

    /// Checks if the current token is an identifier spelled `word`.
    fn check_word(&self, word: &str) -> bool {
        matches!(&self.current.kind, TokenKind::Identifier(name) if name.eq_ignore_ascii_case(word))
    }

    /// Returns the current token as a name: an identifier or a non-reserved keyword.
    fn current_word(&self) -> Option<String> {
        match &self.current.kind {
            TokenKind::Identifier(name) => Some(name.clone()),
            TokenKind::Keyword(kw) if !kw.is_reserved() => Some(kw.as_str().to_ascii_lowercase()),
            _ => None,
        }
    }

    /// Like [`Self::current_word`], but reserved keywords are accepted too.
    fn any_word(&self) -> Option<String> {
        match &self.current.kind {
            TokenKind::Identifier(name) => Some(name.to_ascii_lowercase()),
            TokenKind::Keyword(kw) => Some(kw.as_str().to_ascii_lowercase()),
            _ => None,
        }
    }

    /// Returns the text of the current operator token.
    fn operator_text(&self) -> String {
        match &self.current.kind {
            TokenKind::Operator(op) => op.clone(),
            TokenKind::BitNot => String::from("~"),
            other => format!("{other:?}"),
        }
    }

    /// Builds an error describing what was expected at the current token.
    fn error_expected(&self, expected: &str) -> ParseError {
        match &self.current.kind {
            TokenKind::Eof => ParseError::unexpected_eof(expected, self.current.span),
            TokenKind::Error(message) => ParseError::new(message.clone(), self.current.span),
            other => ParseError::unexpected(expected, other.clone(), self.current.span),
        }
    }

    /// Expects the current token to be the given kind.
    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_expected(&format!("{kind:?}")))
        }
    }

    /// Expects the current token to be the given keyword.
    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.check_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_expected(keyword.as_str()))
        }
    }

    /// Expects and returns an identifier.
    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match self.current_word() {
            Some(name) => {
                self.advance();
                Ok(name)
            }
            None => Err(self.error_expected("identifier")),
        }
    }

    /// Expects and returns a string literal.
    fn expect_string(&mut self) -> Result<String, ParseError> {
        match &self.current.kind {
            TokenKind::String(value) => {
                let value = value.clone();
                self.advance();
                Ok(value)
            }
            _ => Err(self.error_expected("string literal")),
        }
    }
}

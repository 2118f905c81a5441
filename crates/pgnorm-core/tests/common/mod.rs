#![allow(dead_code)]

use pgnorm_core::ast::{SelectStatement, Statement};
use pgnorm_core::{NormalizeConfig, NormalizeError, NormalizedQuery, Normalizer, ParseError, Parser};

pub fn parse(sql: &str) -> Statement {
    Parser::new(sql)
        .parse_statement()
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    Parser::new(sql)
        .parse_statement()
        .expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn parse_select(sql: &str) -> SelectStatement {
    match parse(sql) {
        Statement::Select(s) => s,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

/// Normalizes `sql`, panicking with the statement on failure.
pub fn norm(sql: &str) -> String {
    pgnorm_core::normalize(sql).unwrap_or_else(|e| panic!("Failed to normalize: {sql}\nError: {e}"))
}

pub fn norm_query(sql: &str) -> NormalizedQuery {
    Normalizer::default()
        .normalize_query(sql)
        .unwrap_or_else(|e| panic!("Failed to normalize: {sql}\nError: {e}"))
}

pub fn norm_err(sql: &str, max_depth: usize) -> NormalizeError {
    Normalizer::new(NormalizeConfig::new().with_max_depth(max_depth))
        .normalize_query(sql)
        .expect_err(&format!("Expected normalize error for: {sql}"))
}

/// Asserts that `sql` normalizes to `expected`.
pub fn assert_normalizes(sql: &str, expected: &str) {
    assert_eq!(norm(sql), expected, "normalizing: {sql}");
}

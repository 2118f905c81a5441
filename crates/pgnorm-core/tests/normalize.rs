//! End-to-end normalization of complete statements.

mod common;
use common::*;

use pgnorm_core::ast::Node;
use pgnorm_core::normalize::{
    build_normalized_query, fill_in_constant_lengths, ConstLocator, NormalizationState,
};
use pgnorm_core::{NormalizeError, NormalizeConfig, Normalizer, Parser};

// ===================================================================
// Basic substitution
// ===================================================================

#[test]
fn replaces_each_constant_in_order() {
    assert_normalizes(
        "SELECT a, 'x' FROM t WHERE b = 1 AND c > 2.5",
        "SELECT a, $1 FROM t WHERE b = $2 AND c > $3",
    );
}

#[test]
fn same_shape_normalizes_identically() {
    assert_eq!(
        norm("SELECT * FROM users WHERE id = 1 AND name = 'alice'"),
        norm("SELECT * FROM users WHERE id = 982 AND name = 'bob'"),
    );
}

#[test]
fn text_without_constants_is_untouched() {
    let sql = "SELECT u.id, count(*) FROM users u JOIN orders o ON o.user_id = u.id GROUP BY u.id";
    assert_normalizes(sql, sql);
}

#[test]
fn whitespace_and_comments_are_preserved() {
    assert_normalizes(
        "SELECT  'a;b' /* keep */ ,\n\t7 -- trailing 1\n",
        "SELECT  $1 /* keep */ ,\n\t$2 -- trailing 1\n",
    );
}

#[test]
fn null_and_booleans_are_constants() {
    assert_normalizes(
        "UPDATE t SET a = NULL, b = TRUE WHERE c IS NOT NULL AND d = false",
        "UPDATE t SET a = $1, b = $2 WHERE c IS NOT NULL AND d = $3",
    );
}

#[test]
fn in_list_limit_and_offset() {
    assert_normalizes(
        "SELECT * FROM t WHERE id IN (1, 2, 3) ORDER BY id LIMIT 10 OFFSET 20",
        "SELECT * FROM t WHERE id IN ($1, $2, $3) ORDER BY id LIMIT $4 OFFSET $5",
    );
}

#[test]
fn insert_with_default_and_returning() {
    assert_normalizes(
        "INSERT INTO t (a, b, c) VALUES (DEFAULT, 'x', 3), (4, DEFAULT, NULL) RETURNING id",
        "INSERT INTO t (a, b, c) VALUES (DEFAULT, $1, $2), ($3, DEFAULT, $4) RETURNING id",
    );
}

#[test]
fn subqueries_and_ctes() {
    assert_normalizes(
        "WITH r AS (SELECT id FROM t WHERE k = 'a') \
         SELECT * FROM r WHERE id > (SELECT min(id) + 1 FROM r) UNION SELECT 5",
        "WITH r AS (SELECT id FROM t WHERE k = $1) \
         SELECT * FROM r WHERE id > (SELECT min(id) + $2 FROM r) UNION SELECT $3",
    );
}

#[test]
fn multiple_statements_share_numbering() {
    assert_normalizes("SELECT 1; SELECT 2;", "SELECT $1; SELECT $2;");
}

// ===================================================================
// Literal forms
// ===================================================================

#[test]
fn string_literal_forms() {
    assert_normalizes(
        "SELECT E'it\\'s', N'x', $$a 'quoted' b$$, $fn$body$fn$, 'multi''quote'",
        "SELECT $1, $2, $3, $4, $5",
    );
}

#[test]
fn bit_strings_and_large_numbers() {
    assert_normalizes(
        "SELECT B'0101', X'1F', 99999999999999999999, 1.5e-3",
        "SELECT $1, $2, $3, $4",
    );
}

#[test]
fn typed_literal_keeps_its_type_name() {
    assert_normalizes(
        "SELECT DATE '2024-01-01', now() - INTERVAL '1 day'",
        "SELECT DATE $1, now() - INTERVAL $2",
    );
}

#[test]
fn type_modifiers_are_not_constants() {
    assert_normalizes(
        "SELECT CAST(a AS varchar(10)), b::numeric(10, 2), 'c'::text",
        "SELECT CAST(a AS varchar(10)), b::numeric(10, 2), $1::text",
    );
}

#[test]
fn multibyte_text_around_constants() {
    assert_normalizes(
        "SELECT 'héllo wörld', \"naïve\" FROM t WHERE x = 1",
        "SELECT $1, \"naïve\" FROM t WHERE x = $2",
    );
}

#[test]
fn unicode_escape_string_keeps_following_whitespace() {
    assert_normalizes(
        "SELECT U&'d\\0061t'   FROM t",
        "SELECT $1   FROM t",
    );
}

#[test]
fn unicode_escape_string_with_uescape() {
    assert_normalizes(
        "SELECT U&'d!0061t' UESCAPE '!' AS x",
        "SELECT $1 AS x",
    );
}

// ===================================================================
// Sign folding
// ===================================================================

#[test]
fn negative_numbers_fold_into_one_placeholder() {
    let expected = "SELECT * FROM t WHERE a = $1";
    assert_normalizes("SELECT * FROM t WHERE a = 1", expected);
    assert_normalizes("SELECT * FROM t WHERE a = -1", expected);
    assert_normalizes("SELECT * FROM t WHERE a = - 1", expected);
    assert_normalizes("SELECT * FROM t WHERE a = -1.25", expected);
}

#[test]
fn minus_directly_after_operator() {
    assert_normalizes("SELECT a=-1, b<-2", "SELECT a=$1, b<$2");
}

#[test]
fn subtraction_is_not_folded() {
    assert_normalizes("SELECT a - 1, 2-3", "SELECT a - $1, $2-$3");
}

#[test]
fn negated_cast_keeps_its_sign() {
    assert_normalizes("SELECT -1::int", "SELECT -$1::int");
}

// ===================================================================
// Parameters
// ===================================================================

#[test]
fn new_placeholders_follow_existing_parameters() {
    assert_normalizes(
        "SELECT * FROM t WHERE a = $3 AND b = 5",
        "SELECT * FROM t WHERE a = $3 AND b = $4",
    );
}

#[test]
fn highest_parameter_anywhere_sets_the_base() {
    let query = norm_query("SELECT 'a' FROM t WHERE x = $1 AND y IN (SELECT $7)");
    assert_eq!(query.text, "SELECT $8 FROM t WHERE x = $1 AND y IN (SELECT $7)");
    assert_eq!(query.highest_param_id, 7);
    assert_eq!(query.constants, 1);
}

#[test]
fn normalized_text_is_a_fixed_point() {
    let once = norm("SELECT * FROM t WHERE a = 1 AND b = 'x' LIMIT 3");
    assert_eq!(norm(&once), once);
}

// ===================================================================
// Duplicates
// ===================================================================

#[test]
fn multi_column_assignment_collapses_duplicates() {
    let query = norm_query("UPDATE t SET (a, b) = (1, 2), c = 3 WHERE d = 4");
    assert_eq!(query.text, "UPDATE t SET (a, b) = ($1, $2), c = $3 WHERE d = $4");
    assert_eq!(query.constants, 4);
}

// ===================================================================
// Utility statements
// ===================================================================

#[test]
fn set_values_are_constants() {
    assert_normalizes("SET search_path TO public, 'x'", "SET search_path TO $1, $2");
    assert_normalizes("SET LOCAL statement_timeout = 5000", "SET LOCAL statement_timeout = $1");
    assert_normalizes("SET extra_float_digits = -3", "SET extra_float_digits = $1");
    assert_normalizes("SET TIME ZONE 'UTC'", "SET TIME ZONE $1");
}

#[test]
fn set_to_default_has_nothing_to_replace() {
    assert_normalizes("SET work_mem TO DEFAULT", "SET work_mem TO DEFAULT");
}

#[test]
fn copy_options_are_left_alone() {
    assert_normalizes(
        "COPY (SELECT * FROM t WHERE a = 1) TO STDOUT WITH (FORMAT 'csv', DELIMITER ';')",
        "COPY (SELECT * FROM t WHERE a = $1) TO STDOUT WITH (FORMAT 'csv', DELIMITER ';')",
    );
    assert_normalizes(
        "COPY t (a, b) FROM '/tmp/data.csv' WITH CSV DELIMITER ','",
        "COPY t (a, b) FROM '/tmp/data.csv' WITH CSV DELIMITER ','",
    );
}

#[test]
fn explain_options_are_left_alone() {
    assert_normalizes(
        "EXPLAIN (ANALYZE true, FORMAT json) SELECT * FROM t WHERE a = 'x'",
        "EXPLAIN (ANALYZE true, FORMAT json) SELECT * FROM t WHERE a = $1",
    );
    assert_normalizes("EXPLAIN ANALYZE VERBOSE SELECT 1", "EXPLAIN ANALYZE VERBOSE SELECT $1");
}

#[test]
fn declare_cursor_query_is_normalized() {
    assert_normalizes(
        "DECLARE c NO SCROLL CURSOR WITH HOLD FOR SELECT * FROM t WHERE a = 1",
        "DECLARE c NO SCROLL CURSOR WITH HOLD FOR SELECT * FROM t WHERE a = $1",
    );
}

#[test]
fn role_passwords_are_hidden() {
    assert_normalizes(
        "ALTER ROLE bob WITH LOGIN PASSWORD 'secret' VALID UNTIL '2030-01-01'",
        "ALTER ROLE bob WITH LOGIN PASSWORD $1 VALID UNTIL $2",
    );
    assert_normalizes(
        "ALTER USER bob ENCRYPTED PASSWORD 'md5abc' CONNECTION LIMIT -1",
        "ALTER USER bob ENCRYPTED PASSWORD $1 CONNECTION LIMIT $2",
    );
}

// ===================================================================
// Per-statement normalization
// ===================================================================

#[test]
fn statements_normalize_separately() {
    let sql = "INSERT INTO t VALUES (1, 'a');\n  SELECT * FROM t WHERE id = $1 AND v = 9";
    let statements = Normalizer::default().normalize_statements(sql).unwrap();

    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0].location, 0);
    assert_eq!(statements[0].original, "INSERT INTO t VALUES (1, 'a')");
    assert_eq!(statements[0].query.text, "INSERT INTO t VALUES ($1, $2)");
    assert_eq!(statements[1].location, 33);
    assert_eq!(
        statements[1].query.text,
        "SELECT * FROM t WHERE id = $1 AND v = $2"
    );
    assert_eq!(statements[1].query.highest_param_id, 1);
}

#[test]
fn empty_input_normalizes_to_itself() {
    assert_normalizes("", "");
    assert_normalizes("  ;; ", "  ;; ");
    assert!(Normalizer::default()
        .normalize_statements("-- only a comment")
        .unwrap()
        .is_empty());
}

// ===================================================================
// Failure modes
// ===================================================================

#[test]
fn parse_errors_are_propagated() {
    let err = Normalizer::default()
        .normalize_query("SELECT * FROM WHERE")
        .unwrap_err();
    assert!(matches!(err, NormalizeError::Parse(_)));
    assert!(err.to_string().starts_with("Parse error: "));
}

#[test]
fn deep_expression_tree_is_rejected() {
    // The parser needs four levels here, the tree walk needs more
    let err = norm_err("SELECT 1 + 1 + 1 + 1 + 1", 5);
    assert!(matches!(err, NormalizeError::TooDeep { limit: 5 }));
}

#[test]
fn deep_nesting_is_a_parse_error() {
    let err = norm_err("SELECT ((((((((((1))))))))))", 8);
    assert!(matches!(err, NormalizeError::Parse(e) if e.message.contains("nesting")));
}

#[test]
fn default_depth_handles_realistic_nesting() {
    let sql = format!("SELECT {}1{}", "(".repeat(40), ")".repeat(40));
    let expected = format!("SELECT {}$1{}", "(".repeat(40), ")".repeat(40));
    assert_eq!(
        Normalizer::new(NormalizeConfig::new().with_max_depth(128))
            .normalize_query(&sql)
            .unwrap()
            .text,
        expected
    );
}

#[test]
fn exhausted_scanner_leaves_later_constants_in_place() {
    let sql = "SELECT 1, 'two', 3";
    let raw = Parser::new(sql).parse_raw_statements().unwrap();

    let mut state = NormalizationState::new();
    ConstLocator::new(&mut state, 64)
        .visit(Node::RawStmt(&raw[0]))
        .unwrap();
    assert_eq!(state.records().len(), 3);

    // Scan a truncated copy so the scanner runs dry after the first constant
    fill_in_constant_lengths(&mut state, &sql[..9]);
    assert_eq!(state.resolved_count(), 1);

    assert_eq!(build_normalized_query(sql, 0, &state), "SELECT $1, 'two', 3");
}

//! Property-based tests for normalization
//!
//! These tests check that normalization depends only on a statement's shape:
//! the constants filled into a fixed statement template never show up in
//! the output, and the output never outgrows its allocation bound.

mod common;
use common::*;

use proptest::prelude::*;

/// Generate unsigned numeric literals
fn number_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Integers, including ones too large for i64
        "[0-9]{1,25}",
        // Decimals
        "[0-9]{1,5}\\.[0-9]{1,5}",
        "\\.[0-9]{1,4}",
        // Exponents
        "[0-9]{1,3}[eE][+-]?[0-9]{1,2}",
    ]
}

/// Generate literal constants of any kind
fn constant_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        number_strategy(),
        number_strategy().prop_map(|n| format!("-{n}")),
        // Plain strings, with and without doubled quotes
        "'[a-zA-Z0-9 ;,()]{0,12}'",
        "'[a-z]{0,5}''[a-z]{0,5}'",
        // Escape strings
        "E'[a-z]{0,5}\\\\'[a-z]{0,5}'",
        // Dollar-quoted strings
        "\\$\\$[a-z' ]{0,10}\\$\\$",
        // Bit strings
        "B'[01]{1,8}'",
        "X'[0-9A-F]{1,8}'",
        Just(String::from("NULL")),
        Just(String::from("TRUE")),
        Just(String::from("false")),
    ]
}

/// Fill a fixed statement template with five constants
fn statement(c: &[String]) -> String {
    format!(
        "SELECT a, {} AS x FROM t WHERE b = {} AND c IN ({}, {}) LIMIT {}",
        c[0], c[1], c[2], c[3], c[4]
    )
}

const TEMPLATE_NORMALIZED: &str = "SELECT a, $1 AS x FROM t WHERE b = $2 AND c IN ($3, $4) LIMIT $5";

fn constants_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(constant_strategy(), 5)
}

proptest! {
    #[test]
    fn test_normalization_is_deterministic(constants in constants_strategy()) {
        let sql = statement(&constants);
        prop_assert_eq!(norm(&sql), norm(&sql));
    }

    #[test]
    fn test_constants_never_reach_the_output(constants in constants_strategy()) {
        let sql = statement(&constants);
        prop_assert_eq!(norm(&sql), TEMPLATE_NORMALIZED, "input: {}", sql);
    }

    #[test]
    fn test_sign_is_folded(n in number_strategy()) {
        let positive = norm(&format!("SELECT * FROM t WHERE a = {n}"));
        let negative = norm(&format!("SELECT * FROM t WHERE a = -{n}"));
        let spaced = norm(&format!("SELECT * FROM t WHERE a = - {n}"));
        prop_assert_eq!(&positive, &negative);
        prop_assert_eq!(&positive, &spaced);
    }

    #[test]
    fn test_output_within_bound(constants in prop::collection::vec(constant_strategy(), 1..20)) {
        let sql = format!("SELECT {}", constants.join(", "));
        let query = norm_query(&sql);
        prop_assert_eq!(query.constants, constants.len());
        prop_assert!(query.text.len() <= sql.len() + 10 * query.constants);
    }

    #[test]
    fn test_normalized_output_is_a_fixed_point(constants in constants_strategy()) {
        let once = norm(&statement(&constants));
        prop_assert_eq!(norm(&once), once.clone());
    }

    #[test]
    fn test_existing_parameters_offset_numbering(
        param in 1u32..1000,
        constant in constant_strategy(),
    ) {
        let sql = format!("SELECT * FROM t WHERE a = ${param} AND b = {constant}");
        let expected = format!("SELECT * FROM t WHERE a = ${param} AND b = ${}", param + 1);
        prop_assert_eq!(norm(&sql), expected);
    }
}

//! Measures each recorded constant by re-scanning the statement text.
//!
//! The syntax tree only knows where a constant starts. Its extent comes from
//! the scanner, which must see exactly the text the parser saw.

use tracing::{debug, trace, warn};

use crate::lexer::{is_scanner_space, Scanner};

use super::state::NormalizationState;

/// Fills in the byte length of every recorded constant.
///
/// Records are sorted first. A record repeating an earlier location keeps
/// `length == None`, as does every record past the point where the scanner
/// runs out of input. Running out of input is logged, not an error: the
/// affected constants are simply left in place.
pub fn fill_in_constant_lengths(state: &mut NormalizationState, text: &str) {
    state.sort();

    let mut scanner = Scanner::open(text);
    let mut last_location: Option<usize> = None;

    'records: for record in state.records_mut() {
        let location = record.location;
        if last_location.is_some_and(|last| location <= last) {
            trace!(location, "duplicate constant location");
            continue;
        }

        let token = loop {
            let token = scanner.next_token();
            if token.is_eof() {
                warn!(location, "scanner reached end of input before constant");
                break 'records;
            }
            if token.span.start >= location {
                break token;
            }
        };

        // A leading minus belongs to the number after it
        if scanner.source().get(location) == Some(&b'-') && scanner.next_token().is_eof() {
            warn!(location, "scanner reached end of input after minus sign");
            break;
        }

        let mut length = scanner.token_end().saturating_sub(location);
        if is_unicode_escape_string(&scanner.source()[token.span.start..]) && length > 4 {
            let source = scanner.source();
            while length > 0 && is_scanner_space(source[location + length - 1]) {
                length -= 1;
            }
        }

        trace!(location, length, "constant resolved");
        record.length = Some(length);
        last_location = Some(location);
    }

    scanner.finish();
    debug!(
        records = state.records().len(),
        resolved = state.resolved_count(),
        "constant lengths resolved"
    );
}

/// True for text starting with `U&'` in either case.
fn is_unicode_escape_string(text: &[u8]) -> bool {
    matches!(text, [b'u' | b'U', b'&', b'\'', ..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(text: &str, locations: &[usize]) -> Vec<Option<usize>> {
        let mut state = NormalizationState::new();
        for &location in locations {
            state.record_location(Some(location));
        }
        fill_in_constant_lengths(&mut state, text);
        state.records().iter().map(|r| r.length).collect()
    }

    #[test]
    fn test_plain_constants() {
        // SELECT 42, 'abc', 1.5e3
        assert_eq!(
            resolve("SELECT 42, 'abc', 1.5e3", &[18, 7, 11]),
            vec![Some(2), Some(5), Some(5)]
        );
    }

    #[test]
    fn test_duplicates_are_left_unresolved() {
        assert_eq!(
            resolve("SELECT 1, 2", &[7, 10, 7]),
            vec![Some(1), None, Some(1)]
        );
    }

    #[test]
    fn test_minus_sign_is_merged() {
        assert_eq!(resolve("SELECT a = - 15", &[11]), vec![Some(4)]);
        assert_eq!(resolve("SELECT a=-1.5", &[9]), vec![Some(4)]);
    }

    #[test]
    fn test_escape_and_dollar_strings() {
        let text = "SELECT E'it\\'s', $tag$x$tag$";
        assert_eq!(resolve(text, &[7, 17]), vec![Some(8), Some(11)]);
    }

    #[test]
    fn test_unicode_escape_trailing_space_is_trimmed() {
        let text = "SELECT U&'d\\0061t'   FROM t";
        assert_eq!(resolve(text, &[7]), vec![Some(11)]);
    }

    #[test]
    fn test_unicode_escape_with_uescape_clause() {
        let text = "SELECT U&'d!0061t' UESCAPE '!'";
        assert_eq!(resolve(text, &[7]), vec![Some(23)]);
    }

    #[test]
    fn test_exhausted_scanner_leaves_rest_unresolved() {
        assert_eq!(
            resolve("SELECT 1, 2", &[7, 10, 40, 50]),
            vec![Some(1), Some(1), None, None]
        );
    }

    #[test]
    fn test_trailing_minus_is_unresolved() {
        assert_eq!(resolve("SELECT 1 -", &[7, 9]), vec![Some(1), None]);
    }
}

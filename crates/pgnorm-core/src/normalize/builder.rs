//! Rebuilds statement text with placeholders in place of constants.

use tracing::{debug, warn};

use super::state::NormalizationState;

/// Upper bound on the extra bytes one placeholder can add. Every constant is
/// at least one byte, and `$` plus a `u32` is at most eleven.
const PLACEHOLDER_GROWTH: usize = 10;

/// Produces `text` with every resolved constant replaced by `$n`.
///
/// `text` may be a slice of a larger string starting at byte `offset`;
/// record locations are relative to the larger string. Placeholders are
/// numbered from `highest_param_id + 1` in location order, counting only
/// the constants actually replaced.
///
/// # Panics
///
/// Panics if the output would outgrow `text.len() + 10 * records`, which
/// can only happen if the recorded locations are inconsistent.
#[must_use]
pub fn build_normalized_query(text: &str, offset: usize, state: &NormalizationState) -> String {
    let bound = text.len() + PLACEHOLDER_GROWTH * state.records().len();
    let mut normalized = String::with_capacity(bound);

    let mut copied_to = 0;
    let mut next_param = u64::from(state.highest_param_id()) + 1;

    for record in state.records() {
        let Some(end) = record.end() else {
            continue;
        };
        let Some(start) = record.location.checked_sub(offset) else {
            warn!(location = record.location, offset, "constant precedes statement");
            continue;
        };
        if start < copied_to {
            warn!(location = record.location, "constant overlaps the previous one");
            continue;
        }
        let end = end - offset;
        let (Some(before), Some(_)) = (text.get(copied_to..start), text.get(start..end)) else {
            warn!(location = record.location, end, "constant lies outside statement");
            continue;
        };

        normalized.push_str(before);
        normalized.push('$');
        normalized.push_str(&next_param.to_string());
        next_param += 1;
        copied_to = end;
    }

    normalized.push_str(&text[copied_to..]);

    assert!(
        normalized.len() <= bound,
        "normalized query grew to {} bytes, over its bound of {bound}",
        normalized.len()
    );
    debug!(
        original = text.len(),
        normalized = normalized.len(),
        "query normalized"
    );
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(records: &[(usize, Option<usize>)], highest_param_id: u32) -> NormalizationState {
        let mut state = NormalizationState::new();
        for &(location, _) in records {
            state.record_location(Some(location));
        }
        for (record, &(_, length)) in state.records_mut().iter_mut().zip(records) {
            record.length = length;
        }
        state.note_param(highest_param_id);
        state
    }

    #[test]
    fn test_replaces_resolved_constants() {
        let state = state_with(&[(7, Some(1)), (13, Some(5))], 0);
        assert_eq!(
            build_normalized_query("SELECT 1 AND 'abc'", 0, &state),
            "SELECT $1 AND $2"
        );
    }

    #[test]
    fn test_unresolved_records_do_not_consume_numbers() {
        let state = state_with(&[(7, Some(1)), (7, None), (10, Some(1))], 0);
        assert_eq!(build_normalized_query("SELECT 1, 2", 0, &state), "SELECT $1, $2");
    }

    #[test]
    fn test_numbering_follows_existing_params() {
        let state = state_with(&[(12, Some(2))], 3);
        assert_eq!(
            build_normalized_query("SELECT $3 + 10", 0, &state),
            "SELECT $3 + $4"
        );
    }

    #[test]
    fn test_offset_into_larger_text() {
        let full = "SELECT 1; SELECT 'two'";
        let state = state_with(&[(17, Some(5))], 0);
        assert_eq!(
            build_normalized_query(&full[10..], 10, &state),
            "SELECT $1"
        );
    }

    #[test]
    fn test_overlapping_record_is_skipped() {
        let state = state_with(&[(7, Some(4)), (9, Some(1))], 0);
        assert_eq!(build_normalized_query("SELECT 1234", 0, &state), "SELECT $1");
    }

    #[test]
    fn test_record_before_offset_is_skipped() {
        let state = state_with(&[(2, Some(1))], 0);
        assert_eq!(build_normalized_query("SELECT 1", 5, &state), "SELECT 1");
    }

    #[test]
    fn test_output_stays_within_bound() {
        let state = state_with(&[(7, Some(1)), (10, Some(1)), (13, Some(1))], u32::MAX - 3);
        let out = build_normalized_query("SELECT 1, 2, 3", 0, &state);
        assert_eq!(out, "SELECT $4294967293, $4294967294, $4294967295");
        assert!(out.len() <= 14 + 10 * 3);
    }
}

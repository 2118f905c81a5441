//! Per-call bookkeeping shared by the normalization passes.

use tracing::trace;

/// Initial number of constant locations reserved per statement.
const INITIAL_CAPACITY: usize = 32;

/// The location of one literal constant in the statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationRecord {
    /// Byte offset of the constant's first character.
    pub location: usize,
    /// Byte length of the constant token, once resolved.
    ///
    /// `None` means the constant was not resolved, either because it repeats
    /// an earlier location or because the scanner ran out of input first.
    /// Such records produce no placeholder.
    pub length: Option<usize>,
}

impl LocationRecord {
    /// Creates an unresolved record.
    #[must_use]
    pub const fn new(location: usize) -> Self {
        Self {
            location,
            length: None,
        }
    }

    /// Byte offset just past the constant, if resolved.
    #[must_use]
    pub const fn end(&self) -> Option<usize> {
        match self.length {
            Some(length) => Some(self.location + length),
            None => None,
        }
    }
}

/// Constant locations and the highest parameter number found in one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationState {
    records: Vec<LocationRecord>,
    highest_param_id: u32,
}

impl NormalizationState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::with_capacity(INITIAL_CAPACITY),
            highest_param_id: 0,
        }
    }

    /// Records a constant location. Unknown locations are dropped.
    pub fn record_location(&mut self, location: Option<usize>) {
        let Some(location) = location else {
            return;
        };
        if self.records.len() == self.records.capacity() {
            self.records.reserve_exact(self.records.capacity().max(1));
        }
        trace!(location, "constant located");
        self.records.push(LocationRecord::new(location));
    }

    /// Notes a numbered parameter already present in the statement.
    pub fn note_param(&mut self, number: u32) {
        self.highest_param_id = self.highest_param_id.max(number);
    }

    /// Sorts the records by location. Repeated locations end up adjacent.
    pub fn sort(&mut self) {
        self.records.sort_unstable_by_key(|record| record.location);
    }

    /// The recorded constants, in insertion order until sorted.
    #[must_use]
    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    /// Mutable access for the length resolver.
    pub(crate) fn records_mut(&mut self) -> &mut [LocationRecord] {
        &mut self.records
    }

    /// The largest `$n` seen in the statement, or 0 if there were none.
    #[must_use]
    pub const fn highest_param_id(&self) -> u32 {
        self.highest_param_id
    }

    /// Number of records whose length was resolved.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.length.is_some())
            .count()
    }
}

impl Default for NormalizationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_locations_are_dropped() {
        let mut state = NormalizationState::new();
        state.record_location(Some(4));
        state.record_location(None);
        assert_eq!(state.records(), &[LocationRecord::new(4)]);
    }

    #[test]
    fn test_grows_past_initial_capacity() {
        let mut state = NormalizationState::new();
        for location in 0..INITIAL_CAPACITY * 3 {
            state.record_location(Some(location));
        }
        assert_eq!(state.records().len(), INITIAL_CAPACITY * 3);
        assert!(state.records.capacity() >= INITIAL_CAPACITY * 3);
    }

    #[test]
    fn test_highest_param_id_is_a_maximum() {
        let mut state = NormalizationState::new();
        assert_eq!(state.highest_param_id(), 0);
        state.note_param(3);
        state.note_param(1);
        assert_eq!(state.highest_param_id(), 3);
    }

    #[test]
    fn test_sort_keeps_duplicates_adjacent() {
        let mut state = NormalizationState::new();
        for location in [20, 5, 20, 11] {
            state.record_location(Some(location));
        }
        state.sort();
        let locations: Vec<_> = state.records().iter().map(|r| r.location).collect();
        assert_eq!(locations, vec![5, 11, 20, 20]);
    }

    #[test]
    fn test_record_end() {
        let mut record = LocationRecord::new(7);
        assert_eq!(record.end(), None);
        record.length = Some(3);
        assert_eq!(record.end(), Some(10));
    }
}

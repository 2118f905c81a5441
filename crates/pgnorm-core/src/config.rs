//! Normalization settings.

/// Default limit on syntax tree nesting, for both parsing and the constant walk.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Settings shared by the parser and the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeConfig {
    /// Maximum nesting depth before parsing or traversal gives up.
    pub max_depth: usize,
}

impl NormalizeConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_depth() {
        assert_eq!(NormalizeConfig::default().max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(NormalizeConfig::new().with_max_depth(8).max_depth, 8);
    }
}

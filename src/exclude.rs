//! Glob-based exclusion of report entries by display name.

use glob::{MatchOptions, Pattern};

use crate::error::{CoverError, Result};

/// `*` and `?` stay within one path component; `**` spans components.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled set of exclusion patterns.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    patterns: Vec<Pattern>,
}

impl ExclusionFilter {
    /// Compile `patterns`, rejecting any that is not a valid glob.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Pattern::new(p).map_err(|e| {
                    CoverError::InvalidConfiguration(format!("invalid exclusion pattern {p:?}: {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Whether any pattern matches the whole of `name`.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(name, MATCH_OPTIONS))
    }
}

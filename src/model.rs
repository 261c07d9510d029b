//! In-memory representation of a Go coverage profile and of the aggregated
//! report built from it. Parsers produce `Profile`s; the report builder folds
//! them into `Summary` rows.

use serde::Serialize;

/// Compute a coverage percentage, returning 0.0 when the total is zero.
#[must_use]
pub fn percent(covered: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64 * 100.0
    }
}

/// A contiguous code region with its statement count and hit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageBlock {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    pub num_stmt: u32,
    pub count: u64,
}

impl CoverageBlock {
    #[must_use]
    pub fn is_covered(&self) -> bool {
        self.count > 0
    }

    /// Whether both blocks span exactly the same source range.
    pub(crate) fn same_range(&self, other: &CoverageBlock) -> bool {
        self.start_line == other.start_line
            && self.start_col == other.start_col
            && self.end_line == other.end_line
            && self.end_col == other.end_col
    }
}

/// All blocks recorded for a single source file.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub file_name: String,
    pub mode: String,
    pub blocks: Vec<CoverageBlock>,
}

impl Profile {
    pub fn new(file_name: String, mode: String) -> Self {
        Self {
            file_name,
            mode,
            ..Default::default()
        }
    }
}

/// Finalized coverage figures for one file, one package or the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub name: String,
    pub blocks: u64,
    pub stmts: u64,
    pub missing_blocks: u64,
    pub missing_stmts: u64,
    /// Percentage of blocks hit, in `[0, 100]`.
    pub block_coverage: f64,
    /// Percentage of statements in hit blocks, in `[0, 100]`.
    pub stmt_coverage: f64,
}

/// The result of one report generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub total: Summary,
    /// Per-file or per-package rows, sorted per the configuration.
    pub entries: Vec<Summary>,
}

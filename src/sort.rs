//! Ordering of report entries.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::CoverError;
use crate::model::Summary;

/// Column a report is sorted by.
///
/// `Filename` and `Package` both order by name; `Block`/`BlockCoverage` and
/// `Stmt`/`StmtCoverage` are aliases for the coverage percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    Filename,
    #[default]
    Package,
    Block,
    Stmt,
    MissingBlocks,
    MissingStmts,
    BlockCoverage,
    StmtCoverage,
}

impl SortBy {
    pub const ALL: [SortBy; 8] = [
        SortBy::Filename,
        SortBy::Package,
        SortBy::Block,
        SortBy::Stmt,
        SortBy::MissingBlocks,
        SortBy::MissingStmts,
        SortBy::BlockCoverage,
        SortBy::StmtCoverage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Filename => "filename",
            SortBy::Package => "package",
            SortBy::Block => "block",
            SortBy::Stmt => "stmt",
            SortBy::MissingBlocks => "missing-blocks",
            SortBy::MissingStmts => "missing-stmts",
            SortBy::BlockCoverage => "block-coverage",
            SortBy::StmtCoverage => "stmt-coverage",
        }
    }

    /// Ascending comparison of two entries on this column.
    pub fn compare(&self, a: &Summary, b: &Summary) -> Ordering {
        match self {
            SortBy::Filename | SortBy::Package => a.name.cmp(&b.name),
            SortBy::Block | SortBy::BlockCoverage => a.block_coverage.total_cmp(&b.block_coverage),
            SortBy::Stmt | SortBy::StmtCoverage => a.stmt_coverage.total_cmp(&b.stmt_coverage),
            SortBy::MissingBlocks => a.missing_blocks.cmp(&b.missing_blocks),
            SortBy::MissingStmts => a.missing_stmts.cmp(&b.missing_stmts),
        }
    }
}

impl FromStr for SortBy {
    type Err = CoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortBy::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CoverError::InvalidConfiguration(format!("invalid sort column {s:?}")))
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

impl FromStr for Order {
    type Err = CoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Order::Asc),
            "desc" => Ok(Order::Desc),
            _ => Err(CoverError::InvalidConfiguration(format!(
                "order must be either asc or desc, got {s:?}"
            ))),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable sort of `entries` by `sort_by` in direction `order`.
///
/// `Desc` flips the comparator rather than the output, so entries that
/// compare equal keep their input order in both directions.
pub fn sort_summaries(entries: &mut [Summary], sort_by: SortBy, order: Order) {
    match order {
        Order::Asc => entries.sort_by(|a, b| sort_by.compare(a, b)),
        Order::Desc => entries.sort_by(|a, b| sort_by.compare(b, a)),
    }
}

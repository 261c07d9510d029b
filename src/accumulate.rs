use crate::model::{percent, CoverageBlock, Summary};

/// Running block/statement counters for one entity (or the total).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulator {
    name: String,
    blocks: u64,
    stmts: u64,
    covered_blocks: u64,
    covered_stmts: u64,
}

impl Accumulator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add(&mut self, block: &CoverageBlock) {
        let stmts = u64::from(block.num_stmt);
        self.blocks += 1;
        self.stmts += stmts;
        if block.is_covered() {
            self.covered_blocks += 1;
            self.covered_stmts += stmts;
        }
    }

    pub fn add_all<'a>(&mut self, blocks: impl IntoIterator<Item = &'a CoverageBlock>) {
        for block in blocks {
            self.add(block);
        }
    }

    /// Freeze the counters into a [`Summary`].
    ///
    /// An entity without blocks (or without statements) reports 0.0 for the
    /// corresponding coverage.
    #[must_use]
    pub fn finalize(&self) -> Summary {
        Summary {
            name: self.name.clone(),
            blocks: self.blocks,
            stmts: self.stmts,
            missing_blocks: self.blocks - self.covered_blocks,
            missing_stmts: self.stmts - self.covered_stmts,
            block_coverage: percent(self.covered_blocks, self.blocks),
            stmt_coverage: percent(self.covered_stmts, self.stmts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(num_stmt: u32, count: u64) -> CoverageBlock {
        CoverageBlock {
            start_line: 1,
            start_col: 1,
            end_line: 2,
            end_col: 1,
            num_stmt,
            count,
        }
    }

    #[test]
    fn test_finalize_mixed_blocks() {
        let mut acc = Accumulator::new("pkg/a.go");
        acc.add_all(&[block(10, 1), block(5, 0)]);
        let s = acc.finalize();

        assert_eq!(s.name, "pkg/a.go");
        assert_eq!(s.blocks, 2);
        assert_eq!(s.stmts, 15);
        assert_eq!(s.missing_blocks, 1);
        assert_eq!(s.missing_stmts, 5);
        assert!((s.block_coverage - 50.0).abs() < 1e-9);
        assert!((s.stmt_coverage - 66.67).abs() < 0.01);
    }

    #[test]
    fn test_hit_count_above_one_counts_once() {
        let mut acc = Accumulator::new("a");
        acc.add(&block(3, 42));
        let s = acc.finalize();
        assert_eq!(s.blocks, 1);
        assert_eq!(s.missing_blocks, 0);
        assert_eq!(s.stmt_coverage, 100.0);
    }

    #[test]
    fn test_empty_accumulator_reports_zero_coverage() {
        let s = Accumulator::new("Total").finalize();
        assert_eq!(s.blocks, 0);
        assert_eq!(s.stmts, 0);
        assert_eq!(s.block_coverage, 0.0);
        assert_eq!(s.stmt_coverage, 0.0);
    }

    #[test]
    fn test_zero_statement_block() {
        let mut acc = Accumulator::new("a");
        acc.add(&block(0, 1));
        let s = acc.finalize();
        assert_eq!(s.blocks, 1);
        assert_eq!(s.block_coverage, 100.0);
        assert_eq!(s.stmts, 0);
        assert_eq!(s.stmt_coverage, 0.0);
    }
}

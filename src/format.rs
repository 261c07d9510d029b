//! Output formatting for coverage reports.

use std::fmt::Write;

use crate::model::{Report, Summary};

/// Trait for formatting coverage reports.
pub trait ReportFormatter {
    /// Format the report to a string.
    fn format(&self, report: &Report) -> String;
}

/// Fixed-width table, one row per entry followed by the total.
pub struct TextFormatter {
    /// Label the name column `PACKAGE` instead of `FILE`.
    pub packages: bool,
}

impl TextFormatter {
    fn row(out: &mut String, width: usize, s: &Summary) {
        writeln!(
            out,
            "{:<width$}  {:>8} {:>8} {:>7.1}%  {:>8} {:>8} {:>7.1}%",
            s.name,
            s.blocks,
            s.missing_blocks,
            s.block_coverage,
            s.stmts,
            s.missing_stmts,
            s.stmt_coverage,
        )
        .unwrap();
    }
}

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &Report) -> String {
        let label = if self.packages { "PACKAGE" } else { "FILE" };
        let width = report
            .entries
            .iter()
            .chain(std::iter::once(&report.total))
            .map(|s| s.name.len())
            .chain(std::iter::once(label.len()))
            .max()
            .unwrap_or(label.len());
        let rule = "-".repeat(width + 56);

        let mut out = String::new();
        writeln!(
            out,
            "{label:<width$}  {:>8} {:>8} {:>8}  {:>8} {:>8} {:>8}",
            "BLOCKS", "MISSED", "BLOCK%", "STMTS", "MISSED", "STMT%"
        )
        .unwrap();
        writeln!(out, "{rule}").unwrap();
        for entry in &report.entries {
            Self::row(&mut out, width, entry);
        }
        writeln!(out, "{rule}").unwrap();
        Self::row(&mut out, width, &report.total);
        out
    }
}

/// Pretty-printed JSON of the whole report.
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &Report) -> String {
        let mut out = serde_json::to_string_pretty(report).unwrap_or_default();
        out.push('\n');
        out
    }
}

//! Command handler functions for the pipecover CLI.
//!
//! Each `cmd_*` function returns its output as a `String`, making them easy
//! to test without capturing stdout.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::baseline::BaselineSource;
use crate::config::CheckConfig;
use crate::format::{JsonFormatter, ReportFormatter, TextFormatter};
use crate::gate::{effective_threshold, GateResult};
use crate::gitlab;
use crate::model::Report;
use crate::report::{generate_report, Configuration};

/// Output style for the report.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Style {
    #[default]
    Text,
    Json,
}

impl Style {
    fn render(self, report: &Report, packages: bool) -> String {
        match self {
            Style::Text => TextFormatter { packages }.format(report),
            Style::Json => JsonFormatter.format(report),
        }
    }
}

/// Printed report plus the gate verdict it was checked against.
#[derive(Debug)]
pub struct CheckOutcome {
    pub output: String,
    pub gate: GateResult,
}

impl CheckOutcome {
    /// Error to surface when the gate failed.
    pub fn failure(&self) -> Option<String> {
        if self.gate.passed() {
            return None;
        }
        Some(if self.gate.leeway > 0.0 {
            format!(
                "Your coverage is below {:.2}% (leeway={:.2}%)!",
                self.gate.threshold, self.gate.leeway
            )
        } else {
            format!("Your coverage is below {:.2}%!", self.gate.threshold)
        })
    }
}

/// Settings shared by `check` and `compare`.
pub struct CheckArgs<'a> {
    pub coverprofile: &'a Path,
    pub default_threshold: f64,
    pub leeway: f64,
    pub style: Style,
}

/// Read the stored coverage for `git_ref`, if a ref was given.
pub fn read_baseline(
    source: &dyn BaselineSource,
    pipeline: &str,
    git_ref: Option<&str>,
) -> Result<Option<f64>> {
    let Some(git_ref) = git_ref.filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    let coverage = source
        .read(pipeline, git_ref)
        .context("unable to read coverage from project")?;
    match coverage {
        Some(c) => log::info!("Loaded coverage {c:.2} for {pipeline} on {git_ref}"),
        None => log::info!("No coverage recorded for {pipeline} on {git_ref}"),
    }
    Ok(coverage)
}

/// Build the report described by `.covercheck.yaml` and gate it against the
/// default threshold, raised to the baseline when that is higher.
pub fn cmd_check(config_path: &Path, args: &CheckArgs, baseline: Option<f64>) -> Result<CheckOutcome> {
    let cfg = CheckConfig::load(config_path).context("unable to read config")?;
    let conf = cfg.to_configuration().context("unable to read config")?;
    run_gate(&conf, args, baseline)
}

/// Like `check`, with the fixed package/desc layout and no leeway.
pub fn cmd_compare(args: &CheckArgs, baseline: Option<f64>) -> Result<CheckOutcome> {
    let args = CheckArgs { leeway: 0.0, ..*args };
    run_gate(&Configuration::default(), &args, baseline)
}

fn run_gate(conf: &Configuration, args: &CheckArgs, baseline: Option<f64>) -> Result<CheckOutcome> {
    let report = generate_report(args.coverprofile, conf).context("unable to read coverage")?;
    let output = args.style.render(&report, conf.group_by_package);

    let threshold = effective_threshold(args.default_threshold, baseline);
    log::info!(
        "Choose larger coverage between {:.2} (default) and {:.2}",
        args.default_threshold,
        baseline.unwrap_or(0.0)
    );
    let gate = GateResult::evaluate(report.total.stmt_coverage, threshold, args.leeway);
    Ok(CheckOutcome { output, gate })
}

pub fn cmd_read(source: &dyn BaselineSource, pipeline: &str, git_ref: &str) -> Result<String> {
    Ok(match read_baseline(source, pipeline, Some(git_ref))? {
        Some(coverage) => format!("{coverage:.2}\n"),
        None => "none\n".to_string(),
    })
}

/// Parse the `write` command's coverage argument.
pub fn parse_coverage_arg(arg: &str) -> Result<f64> {
    let coverage: f64 = arg
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("coverage must be a float, got {arg:?}"))?;
    if !coverage.is_finite() {
        anyhow::bail!("coverage must be a finite number, got {arg:?}");
    }
    Ok(coverage)
}

pub fn cmd_write(
    client: &gitlab::Client,
    pipeline: &str,
    git_ref: &str,
    sha: Option<&str>,
    coverage: &str,
) -> Result<String> {
    let coverage = parse_coverage_arg(coverage)?;
    client.write(pipeline, git_ref, sha, coverage)?;
    Ok(format!("Wrote coverage {coverage:.2} for '{pipeline}' on '{git_ref}'\n"))
}

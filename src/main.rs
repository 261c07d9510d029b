use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use pipecover::baseline::{BaselineSource, NoBaseline};
use pipecover::cli::{self, CheckArgs, CheckOutcome, Style};
use pipecover::config::DEFAULT_CONFIG_FILE;
use pipecover::gitlab::{self, DEFAULT_API_BASE};

/// pipecover: Go coverage reports and coverage gates for CI pipelines.
#[derive(Parser)]
#[command(name = "pipecover", version, about)]
struct Cli {
    /// Base API URL for GitLab.
    #[arg(long, global = true, env = "API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// GitLab API token.
    #[arg(long, global = true, env = "API_TOKEN", default_value = "", hide_env_values = true)]
    api_token: String,

    /// GitLab project ID (numeric or `group/project`).
    #[arg(long, global = true, env = "PROJECT_ID", default_value = "")]
    project_id: String,

    /// Pipeline name the coverage is recorded under.
    #[arg(long, global = true, env = "PIPELINE_NAME", default_value = "pipecover")]
    pipeline_name: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report coverage and fail if it dropped below the threshold.
    Check {
        /// The git ref name for the target branch.
        #[arg(long, env = "GIT_REF")]
        git_ref: Option<String>,

        /// Coverage profile written by `go test -coverprofile`.
        #[arg(long, env = "COVERPROFILE", default_value = "coverage.out")]
        coverprofile: PathBuf,

        /// The default coverage threshold.
        #[arg(long, env = "DEFAULT_THRESHOLD", default_value_t = 0.0)]
        default_threshold: f64,

        /// Allow coverage to drop by this many points.
        #[arg(long, env = "LEEWAY", default_value_t = 0.0)]
        leeway: f64,

        /// Report configuration file.
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Output style.
        #[arg(long, value_enum, default_value_t = Style::Text)]
        format: Style,
    },

    /// Compare package coverage against the recorded coverage of a ref.
    Compare {
        /// The git ref name for the target branch.
        #[arg(long, env = "GIT_REF")]
        git_ref: String,

        /// Coverage profile written by `go test -coverprofile`.
        #[arg(long, env = "COVERPROFILE", default_value = "coverage.out")]
        coverprofile: PathBuf,

        /// The default coverage threshold.
        #[arg(long, env = "DEFAULT_THRESHOLD", default_value_t = 0.0)]
        default_threshold: f64,
    },

    /// Print the coverage recorded for a ref.
    Read {
        /// The git ref name to read from.
        #[arg(long, env = "GIT_REF")]
        git_ref: String,
    },

    /// Record a coverage value for a ref.
    Write {
        /// Coverage percentage, e.g. 81.9.
        coverage: String,

        /// The git ref name for the target branch.
        #[arg(long, env = "GIT_REF")]
        git_ref: String,

        /// Optional git SHA for the target ref (default: the ref's latest commit).
        #[arg(long, env = "GIT_SHA")]
        git_sha: Option<String>,
    },
}

impl Cli {
    fn client(&self) -> Result<gitlab::Client> {
        gitlab::Client::new(&self.api_base, &self.api_token, &self.project_id)
            .context("failed to initialize GitLab client")
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Check {
            git_ref,
            coverprofile,
            default_threshold,
            leeway,
            config,
            format,
        } => {
            let git_ref = git_ref.as_deref().filter(|r| !r.is_empty());
            let source: Box<dyn BaselineSource> = if cli.api_token.is_empty() || git_ref.is_none() {
                log::warn!("flag api-token or git-ref is not set, skip reading coverage from api");
                Box::new(NoBaseline)
            } else {
                Box::new(cli.client()?)
            };
            let baseline = cli::read_baseline(source.as_ref(), &cli.pipeline_name, git_ref)?;
            let args = CheckArgs {
                coverprofile,
                default_threshold: *default_threshold,
                leeway: *leeway,
                style: *format,
            };
            finish(cli::cmd_check(config, &args, baseline)?)
        }
        Commands::Compare {
            git_ref,
            coverprofile,
            default_threshold,
        } => {
            let baseline = cli::read_baseline(&cli.client()?, &cli.pipeline_name, Some(git_ref.as_str()))?;
            let args = CheckArgs {
                coverprofile,
                default_threshold: *default_threshold,
                leeway: 0.0,
                style: Style::Text,
            };
            finish(cli::cmd_compare(&args, baseline)?)
        }
        Commands::Read { git_ref } => {
            if cli.api_token.is_empty() {
                log::warn!("flag api-token is not set, reading coverage anonymously");
            }
            print!("{}", cli::cmd_read(&cli.client()?, &cli.pipeline_name, git_ref)?);
            Ok(())
        }
        Commands::Write {
            coverage,
            git_ref,
            git_sha,
        } => {
            let out = cli::cmd_write(
                &cli.client()?,
                &cli.pipeline_name,
                git_ref,
                git_sha.as_deref(),
                coverage,
            )?;
            print!("{out}");
            Ok(())
        }
    }
}

/// Print the report, then fail the process if the gate did not pass.
fn finish(outcome: CheckOutcome) -> Result<()> {
    println!("{}", outcome.output);
    if let Some(message) = outcome.failure() {
        bail!(message);
    }
    Ok(())
}

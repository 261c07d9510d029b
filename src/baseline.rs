//! Sources of a previously recorded coverage score to compare against.

use anyhow::Result;

/// A store of coverage scores keyed by pipeline name and git ref.
pub trait BaselineSource {
    /// Read the recorded coverage for `pipeline` at `git_ref`, if any.
    fn read(&self, pipeline: &str, git_ref: &str) -> Result<Option<f64>>;
}

/// Used when no remote store is configured.
pub struct NoBaseline;

impl BaselineSource for NoBaseline {
    fn read(&self, _pipeline: &str, _git_ref: &str) -> Result<Option<f64>> {
        Ok(None)
    }
}

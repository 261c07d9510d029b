//! Pass/fail decision for a report's total statement coverage.

/// The threshold a report must reach: the default, raised to the remote
/// baseline when one is known and higher.
#[must_use]
pub fn effective_threshold(default_threshold: f64, baseline: Option<f64>) -> f64 {
    match baseline {
        Some(b) if b > default_threshold => b,
        _ => default_threshold,
    }
}

/// Outcome of comparing a total against a threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateResult {
    pub coverage: f64,
    pub threshold: f64,
    pub leeway: f64,
}

impl GateResult {
    #[must_use]
    pub fn evaluate(coverage: f64, threshold: f64, leeway: f64) -> Self {
        Self {
            coverage,
            threshold,
            leeway,
        }
    }

    /// Coverage may fall up to `leeway` points below the threshold.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.coverage >= self.threshold - self.leeway
    }
}

//! Significance gating: minimum-sample floors plus a Welch two-sample
//! t-test on the baseline vs. post-bad-call xwOBA means.
//!
//! # Gate policy
//!
//! When the sample floor fails, the gate SHORT-CIRCUITS: no test statistic
//! is computed and `p_value` is `None`. A p-value from an undersized sample
//! looks authoritative and is not; the record is still produced but is
//! reported under "insufficient sample" rather than in headline rankings.
//!
//! `significant` is never `true` without `passes_sample_floor`.

use crate::engine::config::AnalysisConfig;
use crate::models::PerformanceStats;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Output of the gate; consumed by the orchestrator when assembling the
/// season record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    /// `baseline.n >= min_clean_pa AND post.n >= min_post_pa`.
    pub passes_sample_floor: bool,
    /// Two-sided Welch p-value; `None` when the floor failed.
    pub p_value: Option<f64>,
    /// `passes_sample_floor AND p_value < alpha`.
    pub significant: bool,
}

impl GateResult {
    /// The insufficient-sample result. This is an expected, common outcome,
    /// not a defect.
    pub fn insufficient() -> Self {
        Self {
            passes_sample_floor: false,
            p_value: None,
            significant: false,
        }
    }
}

/// Apply the sample floor and, if it passes, the Welch test.
pub fn evaluate(
    baseline: &PerformanceStats,
    post: &PerformanceStats,
    config: &AnalysisConfig,
) -> GateResult {
    if baseline.n < config.min_clean_pa || post.n < config.min_post_pa {
        return GateResult::insufficient();
    }

    let p = welch_p_value(
        baseline.mean_xwoba,
        baseline.std_xwoba,
        baseline.n,
        post.mean_xwoba,
        post.std_xwoba,
        post.n,
    );

    GateResult {
        passes_sample_floor: true,
        significant: p < config.significance_alpha,
        p_value: Some(p),
    }
}

/// Two-sided Welch p-value for two independent samples with unequal
/// variances and sizes.
///
/// Degenerate case: both sample variances zero (constant samples) yields
/// 1.0 — with no spread there is nothing to test, so the difference is
/// never called significant. Requires `n1, n2 >= 2`, which the gate's
/// validated sample floors guarantee.
pub fn welch_p_value(m1: f64, s1: f64, n1: usize, m2: f64, s2: f64, n2: usize) -> f64 {
    debug_assert!(n1 >= 2 && n2 >= 2, "welch_p_value requires n >= 2 per sample");

    let v1 = (s1 * s1) / n1 as f64;
    let v2 = (s2 * s2) / n2 as f64;
    let se2 = v1 + v2;
    if se2 <= 0.0 {
        return 1.0;
    }

    let t = (m1 - m2) / se2.sqrt();

    // Welch-Satterthwaite degrees of freedom.
    let df = (se2 * se2) / (v1 * v1 / (n1 as f64 - 1.0) + v2 * v2 / (n2 as f64 - 1.0));

    let dist = match StudentsT::new(0.0, 1.0, df) {
        Ok(d) => d,
        // df > 0 is guaranteed by se2 > 0; treat a construction failure as
        // untestable rather than panic mid-season.
        Err(_) => return 1.0,
    };

    2.0 * (1.0 - dist.cdf(t.abs()))
}

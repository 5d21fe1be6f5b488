//! Season-level impact projection and scouting tier assignment.
//!
//! Two ranking metrics come out of this stage:
//!
//! - `projected_improvement`: the xwOBA gap (baseline minus post) floored
//!   at zero, scaled by the fraction of the season spent inside
//!   post-bad-call windows. Only the suppression direction is projected;
//!   a batter who performs *better* after bad calls projects to zero (the
//!   negative gap itself is preserved on the record, never clamped away).
//! - `benefit_score`: a count-based alternate that ignores outcomes
//!   entirely and weighs every incorrect call by the leverage of the count
//!   it was made at, netting calls against vs. calls for, per 100 PA.

use crate::engine::config::{LeverageTable, TierThresholds};
use crate::engine::timeline::SequencedPa;
use crate::engine::zone::CallDirection;
use crate::models::{PerformanceStats, Tier};
use serde::{Deserialize, Serialize};

/// Output of the projection stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedImpact {
    /// Estimated season xwOBA gain under perfect officiating. 0.0 when the
    /// gap is negative or either stats side is the insufficient sentinel.
    pub projected_improvement: f64,
    /// Leverage-weighted net incorrect calls against, per 100 PA.
    pub benefit_score: f64,
    pub tier: Tier,
}

/// Assign the scouting tier for a projected improvement.
///
/// Boundaries are closed on the lower edge, open on the upper: exactly
/// `thresholds.high` lands in High, not Medium.
#[inline]
pub fn assign_tier(projected_improvement: f64, thresholds: &TierThresholds) -> Tier {
    if projected_improvement >= thresholds.elite {
        Tier::Elite
    } else if projected_improvement >= thresholds.high {
        Tier::High
    } else if projected_improvement >= thresholds.medium {
        Tier::Medium
    } else {
        Tier::Low
    }
}

/// Project a batter's season-level impact.
///
/// `post_pa_count` is the size of the post-bad-call set (by PA identity,
/// windows already de-duplicated), not the post aggregate's `n`: a PA with
/// null outcomes still spent its slot inside a window.
pub fn project(
    timeline: &[SequencedPa],
    baseline: &PerformanceStats,
    post: &PerformanceStats,
    post_pa_count: usize,
    leverage: &LeverageTable,
    thresholds: &TierThresholds,
) -> ProjectedImpact {
    let total_pa = timeline.len();

    let fraction_affected = if total_pa > 0 {
        post_pa_count as f64 / total_pa as f64
    } else {
        0.0
    };

    // A gap against a sentinel mean of 0.0 would be meaningless.
    let projected_improvement = if baseline.is_empty() || post.is_empty() {
        0.0
    } else {
        (baseline.mean_xwoba - post.mean_xwoba).max(0.0) * fraction_affected
    };

    let benefit_score = benefit_score(timeline, leverage);

    ProjectedImpact {
        projected_improvement,
        benefit_score,
        tier: assign_tier(projected_improvement, thresholds),
    }
}

/// `(Σ leverage over incorrect-calls-against − Σ leverage over
/// incorrect-calls-for) / total_pa × 100`, using the count at call time.
pub fn benefit_score(timeline: &[SequencedPa], leverage: &LeverageTable) -> f64 {
    let total_pa = timeline.len();
    if total_pa == 0 {
        return 0.0;
    }

    let mut net = 0.0;
    for pa in timeline {
        for cp in &pa.pitches {
            let w = leverage.weight(cp.pitch.balls, cp.pitch.strikes);
            match cp.zone.direction {
                CallDirection::AgainstBatter => net += w,
                CallDirection::FavoredBatter => net -= w,
                CallDirection::Neutral | CallDirection::Unknown => {}
            }
        }
    }

    net / total_pa as f64 * 100.0
}

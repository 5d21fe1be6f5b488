//! Engine configuration and the count-leverage table.
//!
//! Both are plain immutable values constructed once by the caller and
//! injected into the pipeline; the engine holds no global mutable state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tier thresholds on projected xwOBA improvement.
///
/// Each boundary is closed on the lower edge, open on the upper:
/// a value exactly at `high` lands in the High tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    /// Lower bound of the Medium tier.
    pub medium: f64,
    /// Lower bound of the High tier.
    pub high: f64,
    /// Lower bound of the Elite tier.
    pub elite: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            medium: 0.010,
            high: 0.020,
            elite: 0.035,
        }
    }
}

/// Configuration consumed by the analysis engine.
///
/// Loading from files is the caller's concern; the engine only reads
/// these values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Season qualification floor: batters with fewer total PAs are not
    /// analyzed at all.
    pub min_pa: usize,

    /// Post-bad-call window length K: the next K PAs after an incorrect
    /// strike call against the batter belong to the post set.
    pub window_size: usize,

    /// Minimum clean (baseline) PAs with usable outcomes for the
    /// significance gate.
    pub min_clean_pa: usize,

    /// Minimum post-bad-call PAs with usable outcomes for the gate.
    pub min_post_pa: usize,

    /// Two-sided alpha for the Welch test.
    pub significance_alpha: f64,

    pub tier_thresholds: TierThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_pa: 300,
            window_size: 10,
            min_clean_pa: 50,
            min_post_pa: 20,
            significance_alpha: 0.05,
            tier_thresholds: TierThresholds::default(),
        }
    }
}

impl AnalysisConfig {
    /// Validate the configuration before a season run.
    ///
    /// The Welch test divides by `n - 1` on both sides, so the sample
    /// floors must be at least 2.
    pub fn validate(&self) -> Result<(), String> {
        if self.window_size == 0 {
            return Err("window_size must be >= 1".to_string());
        }
        if self.min_clean_pa < 2 || self.min_post_pa < 2 {
            return Err("sample floors must be >= 2 for the Welch test".to_string());
        }
        if !(0.0 < self.significance_alpha && self.significance_alpha < 1.0) {
            return Err(format!(
                "significance_alpha must be in (0, 1), got {}",
                self.significance_alpha
            ));
        }
        let t = &self.tier_thresholds;
        if !(0.0 < t.medium && t.medium < t.high && t.high < t.elite) {
            return Err(format!(
                "tier thresholds must be strictly increasing and positive: {} / {} / {}",
                t.medium, t.high, t.elite
            ));
        }
        Ok(())
    }
}

// =============================================================================
// COUNT LEVERAGE TABLE
// =============================================================================

/// Immutable mapping from `(balls, strikes)` at call time to a situational
/// weight. Built once at startup and injected into the impact projector.
///
/// Anchors: full count 3-2 is the heaviest call (1.6), an 0-2 call the
/// lightest (0.7), neutral early counts 1.0. Unlisted/malformed counts fall
/// back to the neutral weight.
#[derive(Debug, Clone)]
pub struct LeverageTable {
    weights: HashMap<(u8, u8), f64>,
    neutral: f64,
}

impl LeverageTable {
    /// The standard table used for scouting runs.
    pub fn standard() -> Self {
        let mut weights = HashMap::new();
        weights.insert((0, 0), 1.0);
        weights.insert((1, 0), 1.0);
        weights.insert((0, 1), 1.0);
        weights.insert((1, 1), 1.0);
        weights.insert((2, 0), 1.1);
        weights.insert((2, 1), 1.1);
        weights.insert((0, 2), 0.7);
        weights.insert((1, 2), 0.85);
        weights.insert((2, 2), 1.2);
        weights.insert((3, 0), 1.25);
        weights.insert((3, 1), 1.3);
        weights.insert((3, 2), 1.6);
        Self {
            weights,
            neutral: 1.0,
        }
    }

    /// Weight for a call made at the given count.
    #[inline]
    pub fn weight(&self, balls: u8, strikes: u8) -> f64 {
        self.weights
            .get(&(balls, strikes))
            .copied()
            .unwrap_or(self.neutral)
    }
}

impl Default for LeverageTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let cfg = AnalysisConfig {
            window_size: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_bad_alpha_rejected() {
        let cfg = AnalysisConfig {
            significance_alpha: 1.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_unordered_tiers_rejected() {
        let cfg = AnalysisConfig {
            tier_thresholds: TierThresholds {
                medium: 0.020,
                high: 0.010,
                elite: 0.035,
            },
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_leverage_anchors() {
        let table = LeverageTable::standard();
        assert_eq!(table.weight(3, 2), 1.6);
        assert_eq!(table.weight(0, 2), 0.7);
        assert_eq!(table.weight(0, 0), 1.0);
    }

    #[test]
    fn test_leverage_unknown_count_falls_back_to_neutral() {
        let table = LeverageTable::standard();
        // Malformed count (4 balls cannot precede a call)
        assert_eq!(table.weight(4, 1), 1.0);
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The call an umpire made on an adjudicated (non-swing) pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UmpireCall {
    CalledBall,
    CalledStrike,
}

impl UmpireCall {
    pub fn as_str(&self) -> &str {
        match self {
            UmpireCall::CalledBall => "called_ball",
            UmpireCall::CalledStrike => "called_strike",
        }
    }
}

/// One tracked pitch, as delivered by the external data processor.
///
/// Location and zone bounds are nullable: tracking occasionally drops them,
/// and such pitches are classified `Unknown` rather than failing the batter.
/// `balls`/`strikes` are the count *before* this pitch was thrown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitchEvent {
    /// MLBAM batter id.
    pub batter_id: u32,
    /// Statcast game primary key.
    pub game_pk: i64,
    pub game_date: NaiveDate,
    /// At-bat number within the game.
    pub at_bat_number: u16,
    /// Ordering key within the at-bat.
    pub pitch_number: u16,
    /// Horizontal crossing-plane coordinate, feet (catcher's view).
    pub plate_x: Option<f64>,
    /// Vertical crossing-plane coordinate, feet.
    pub plate_z: Option<f64>,
    /// Batter-specific top of the strike zone, feet.
    pub sz_top: Option<f64>,
    /// Batter-specific bottom of the strike zone, feet.
    pub sz_bot: Option<f64>,
    pub balls: u8,
    pub strikes: u8,
    /// `None` for swing/contact pitches: the umpire made no ball/strike
    /// call, so the pitch is excluded from correctness scoring but still
    /// belongs to its plate appearance.
    pub call: Option<UmpireCall>,
}

/// Plate-appearance outcome row, joinable to pitches on
/// `(batter_id, game_pk, at_bat_number)`.
///
/// Outcome metrics are nullable for incomplete data; such PAs still occupy
/// a timeline slot but are excluded from every performance aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaOutcome {
    pub batter_id: u32,
    pub game_pk: i64,
    pub game_date: NaiveDate,
    pub at_bat_number: u16,
    pub woba: Option<f64>,
    pub xwoba: Option<f64>,
}

/// Summary offense metrics over a plate-appearance subset.
///
/// `n = 0` is the "insufficient" sentinel: the subset had no PA with usable
/// outcome metrics. Callers MUST check `n` before reading the means; the
/// means are 0.0 in the sentinel case, never NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub mean_woba: f64,
    pub mean_xwoba: f64,
    /// Sample standard deviation of xwOBA (n-1 denominator); 0.0 when n < 2.
    /// Carried because the significance gate's Welch test needs it.
    pub std_xwoba: f64,
    /// PAs actually used after null-outcome filtering. May be smaller than
    /// the subset handed to the aggregator.
    pub n: usize,
}

impl PerformanceStats {
    /// The "insufficient" sentinel (no usable PAs).
    pub fn empty() -> Self {
        Self {
            mean_woba: 0.0,
            mean_xwoba: 0.0,
            std_xwoba: 0.0,
            n: 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
}

/// Scouting tier on projected xwOBA improvement.
///
/// Boundaries are closed on the lower edge, open on the upper:
/// exactly 0.020 is High, not Medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Low,
    Medium,
    High,
    Elite,
}

impl Tier {
    pub fn as_str(&self) -> &str {
        match self {
            Tier::Low => "low",
            Tier::Medium => "medium",
            Tier::High => "high",
            Tier::Elite => "elite",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Season-level result for one qualified batter.
///
/// Created once per batter after the full-season timeline is available;
/// fields are write-once outputs of the pipeline stages and are never
/// mutated outside the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatterSeasonRecord {
    pub batter_id: u32,
    pub total_pa: usize,
    pub clean_pa_count: usize,
    pub post_bad_call_pa_count: usize,
    pub baseline_stats: PerformanceStats,
    pub post_stats: PerformanceStats,
    /// Baseline minus post, per metric. `None` when either side is the
    /// insufficient sentinel (a gap computed against a 0.0 mean would be
    /// meaningless).
    pub woba_gap: Option<f64>,
    pub xwoba_gap: Option<f64>,
    /// post_bad_call_pa_count / total_pa.
    pub fraction_affected: f64,
    /// Estimated season xwOBA gain under perfect officiating:
    /// `max(xwoba_gap, 0) * fraction_affected`. 0.0 when the gap is
    /// unavailable or negative.
    pub projected_improvement: f64,
    /// Leverage-weighted net incorrect calls against, per 100 PA.
    pub benefit_score: f64,
    pub tier: Tier,
    /// Welch two-sample p-value on xwOBA means. `None` when the sample
    /// floor failed (the gate short-circuits rather than publish a
    /// potentially misleading value).
    pub p_value: Option<f64>,
    pub passes_sample_floor: bool,
    pub significant: bool,
}

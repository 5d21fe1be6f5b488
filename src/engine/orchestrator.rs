//! Season-wide analysis orchestration.
//!
//! Drives the five pipeline stages per batter, in order:
//! Sequenced → Partitioned → Aggregated → Gated → Projected. No stage runs
//! before its predecessor completes, and a failure at any stage halts only
//! that batter's record — one malformed batter never aborts the season run.
//!
//! Per-batter pipelines are embarrassingly parallel: each batter's timeline
//! and intermediate sets are exclusively owned by its own rayon task, and
//! nothing is shared until the final assembly step reads the completed,
//! immutable records. Output is sorted by batter id afterward, so results
//! are deterministic regardless of scheduling.

use crate::engine::aggregate;
use crate::engine::config::{AnalysisConfig, LeverageTable};
use crate::engine::projection;
use crate::engine::significance;
use crate::engine::timeline::{self, DataIntegrityError};
use crate::engine::windows;
use crate::models::{BatterSeasonRecord, PaOutcome, PitchEvent};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// A batter whose pipeline failed, with the reason. Surfaced to the caller
/// so a season run is never silently lossy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedBatter {
    pub batter_id: u32,
    pub reason: String,
}

/// Season-wide result set: one record per qualified batter plus the skip
/// summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonAnalysis {
    /// Sorted by `batter_id`.
    pub records: Vec<BatterSeasonRecord>,
    pub skipped: Vec<SkippedBatter>,
}

impl SeasonAnalysis {
    /// Headline ranking: significant records with a positive projected
    /// improvement, best first. Negative-gap batters and insufficient
    /// samples stay in `records` but are excluded here.
    pub fn undervalued_targets(&self) -> Vec<&BatterSeasonRecord> {
        let mut targets: Vec<&BatterSeasonRecord> = self
            .records
            .iter()
            .filter(|r| r.significant && r.projected_improvement > 0.0)
            .collect();
        targets.sort_by(|a, b| {
            b.projected_improvement
                .partial_cmp(&a.projected_improvement)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.batter_id.cmp(&b.batter_id))
        });
        targets
    }
}

/// Run the five-stage pipeline for one batter.
///
/// Returns `Ok(None)` when the batter falls below the qualification floor
/// (not a failure, just not analyzed).
pub fn analyze_batter(
    batter_id: u32,
    pitches: &[PitchEvent],
    outcomes: &[PaOutcome],
    config: &AnalysisConfig,
    leverage: &LeverageTable,
) -> Result<Option<BatterSeasonRecord>, DataIntegrityError> {
    // Stage 1: Sequenced.
    let timeline = timeline::build_timeline(batter_id, pitches, outcomes)?;

    let total_pa = timeline.len();
    if total_pa < config.min_pa {
        debug!(batter_id, total_pa, min_pa = config.min_pa, "below qualification floor");
        return Ok(None);
    }

    // Stage 2: Partitioned.
    let partition = windows::partition(&timeline, config.window_size);

    // Stage 3: Aggregated.
    let baseline_stats = aggregate::aggregate(&timeline, &partition.clean);
    let post_stats = aggregate::aggregate(&timeline, &partition.post_bad_call);

    // Stage 4: Gated.
    let gate = significance::evaluate(&baseline_stats, &post_stats, config);

    // Stage 5: Projected.
    let impact = projection::project(
        &timeline,
        &baseline_stats,
        &post_stats,
        partition.post_bad_call.len(),
        leverage,
        &config.tier_thresholds,
    );

    let both_sampled = !baseline_stats.is_empty() && !post_stats.is_empty();
    let record = BatterSeasonRecord {
        batter_id,
        total_pa,
        clean_pa_count: partition.clean.len(),
        post_bad_call_pa_count: partition.post_bad_call.len(),
        woba_gap: both_sampled.then(|| baseline_stats.mean_woba - post_stats.mean_woba),
        xwoba_gap: both_sampled.then(|| baseline_stats.mean_xwoba - post_stats.mean_xwoba),
        baseline_stats,
        post_stats,
        fraction_affected: if total_pa > 0 {
            partition.post_bad_call.len() as f64 / total_pa as f64
        } else {
            0.0
        },
        projected_improvement: impact.projected_improvement,
        benefit_score: impact.benefit_score,
        tier: impact.tier,
        p_value: gate.p_value,
        passes_sample_floor: gate.passes_sample_floor,
        significant: gate.significant,
    };

    Ok(Some(record))
}

/// Analyze a full season of materialized pitch and plate-appearance events.
///
/// The input table is read-only for the duration of the run; batters are
/// fanned out across the rayon pool.
pub fn analyze_season(
    pitches: Vec<PitchEvent>,
    outcomes: Vec<PaOutcome>,
    config: &AnalysisConfig,
    leverage: &LeverageTable,
) -> anyhow::Result<SeasonAnalysis> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid analysis config: {}", e))?;

    // Partition the event table per batter; each batter's slice is then
    // exclusively owned by its own task.
    let mut by_batter: HashMap<u32, (Vec<PitchEvent>, Vec<PaOutcome>)> = HashMap::new();
    for p in pitches {
        by_batter.entry(p.batter_id).or_default().0.push(p);
    }
    for o in outcomes {
        by_batter.entry(o.batter_id).or_default().1.push(o);
    }

    let mut batters: Vec<(u32, (Vec<PitchEvent>, Vec<PaOutcome>))> =
        by_batter.into_iter().collect();
    batters.sort_by_key(|(id, _)| *id);

    info!(batters = batters.len(), "starting season analysis");

    let results: Vec<(u32, Result<Option<BatterSeasonRecord>, DataIntegrityError>)> = batters
        .par_iter()
        .map(|(batter_id, (p, o))| {
            (*batter_id, analyze_batter(*batter_id, p, o, config, leverage))
        })
        .collect();

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    let mut unqualified = 0usize;
    for (batter_id, result) in results {
        match result {
            Ok(Some(record)) => records.push(record),
            Ok(None) => unqualified += 1,
            Err(e) => {
                warn!(batter_id, error = %e, "skipping batter: data integrity failure");
                skipped.push(SkippedBatter {
                    batter_id,
                    reason: e.to_string(),
                });
            }
        }
    }

    records.sort_by_key(|r| r.batter_id);

    info!(
        qualified = records.len(),
        unqualified,
        skipped = skipped.len(),
        "season analysis complete"
    );

    Ok(SeasonAnalysis { records, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PerformanceStats, Tier, UmpireCall};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap() + chrono::Days::new(d as u64)
    }

    /// One-pitch PA; the pitch is a correct called ball (off the plate).
    fn clean_pa(batter_id: u32, seq: u16, xwoba: f64) -> (PitchEvent, PaOutcome) {
        let p = PitchEvent {
            batter_id,
            game_pk: 100 + (seq / 4) as i64,
            game_date: date((seq / 4) as u32),
            at_bat_number: seq % 4 + 1,
            pitch_number: 1,
            plate_x: Some(1.4),
            plate_z: Some(2.5),
            sz_top: Some(3.4),
            sz_bot: Some(1.6),
            balls: 0,
            strikes: 0,
            call: Some(UmpireCall::CalledBall),
        };
        let o = PaOutcome {
            batter_id,
            game_pk: p.game_pk,
            game_date: p.game_date,
            at_bat_number: p.at_bat_number,
            woba: Some(xwoba),
            xwoba: Some(xwoba),
        };
        (p, o)
    }

    fn small_config() -> AnalysisConfig {
        AnalysisConfig {
            min_pa: 5,
            window_size: 3,
            min_clean_pa: 3,
            min_post_pa: 2,
            ..Default::default()
        }
    }

    fn season(batter_ids: &[u32], pas_each: u16) -> (Vec<PitchEvent>, Vec<PaOutcome>) {
        let mut pitches = Vec::new();
        let mut outcomes = Vec::new();
        for &id in batter_ids {
            for seq in 0..pas_each {
                let (p, o) = clean_pa(id, seq, 0.320);
                pitches.push(p);
                outcomes.push(o);
            }
        }
        (pitches, outcomes)
    }

    // -------------------------------------------------------------------------
    // Season run
    // -------------------------------------------------------------------------

    #[test]
    fn test_clean_season_produces_records() {
        let (pitches, outcomes) = season(&[1, 2], 12);
        let analysis =
            analyze_season(pitches, outcomes, &small_config(), &LeverageTable::standard())
                .unwrap();
        assert_eq!(analysis.records.len(), 2);
        assert!(analysis.skipped.is_empty());
        let r = &analysis.records[0];
        assert_eq!(r.total_pa, 12);
        assert_eq!(r.clean_pa_count, 12);
        assert_eq!(r.post_bad_call_pa_count, 0);
        assert_eq!(r.fraction_affected, 0.0);
        assert_eq!(r.projected_improvement, 0.0);
        assert_eq!(r.tier, Tier::Low);
        assert!(!r.significant);
    }

    #[test]
    fn test_records_sorted_by_batter_id() {
        let (pitches, outcomes) = season(&[9, 3, 7], 8);
        let analysis =
            analyze_season(pitches, outcomes, &small_config(), &LeverageTable::standard())
                .unwrap();
        let ids: Vec<u32> = analysis.records.iter().map(|r| r.batter_id).collect();
        assert_eq!(ids, vec![3, 7, 9]);
    }

    #[test]
    fn test_unqualified_batter_omitted_without_skip_entry() {
        let (mut pitches, mut outcomes) = season(&[1], 12);
        let (short_p, short_o) = season(&[2], 3); // below min_pa = 5
        pitches.extend(short_p);
        outcomes.extend(short_o);
        let analysis =
            analyze_season(pitches, outcomes, &small_config(), &LeverageTable::standard())
                .unwrap();
        assert_eq!(analysis.records.len(), 1);
        assert_eq!(analysis.records[0].batter_id, 1);
        // Unqualified is not a failure.
        assert!(analysis.skipped.is_empty());
    }

    #[test]
    fn test_one_bad_batter_isolated() {
        let (mut pitches, mut outcomes) = season(&[1, 2], 12);
        // Batter 2 gets a duplicate outcome row: DataIntegrityError.
        let dup = outcomes
            .iter()
            .find(|o| o.batter_id == 2)
            .cloned()
            .unwrap();
        outcomes.push(dup);
        let analysis =
            analyze_season(pitches, outcomes, &small_config(), &LeverageTable::standard())
                .unwrap();
        assert_eq!(analysis.records.len(), 1);
        assert_eq!(analysis.records[0].batter_id, 1);
        assert_eq!(analysis.skipped.len(), 1);
        assert_eq!(analysis.skipped[0].batter_id, 2);
        assert!(analysis.skipped[0].reason.contains("duplicate outcome"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = AnalysisConfig {
            window_size: 0,
            ..Default::default()
        };
        let err = analyze_season(Vec::new(), Vec::new(), &cfg, &LeverageTable::standard());
        assert!(err.is_err());
    }

    // -------------------------------------------------------------------------
    // Undervalued ranking
    // -------------------------------------------------------------------------

    fn record(batter_id: u32, projected: f64, significant: bool) -> BatterSeasonRecord {
        BatterSeasonRecord {
            batter_id,
            total_pa: 300,
            clean_pa_count: 200,
            post_bad_call_pa_count: 40,
            baseline_stats: PerformanceStats::empty(),
            post_stats: PerformanceStats::empty(),
            woba_gap: None,
            xwoba_gap: None,
            fraction_affected: 40.0 / 300.0,
            projected_improvement: projected,
            benefit_score: 0.0,
            tier: Tier::Low,
            p_value: significant.then_some(0.01),
            passes_sample_floor: significant,
            significant,
        }
    }

    #[test]
    fn test_undervalued_ranking_order_and_exclusions() {
        let analysis = SeasonAnalysis {
            records: vec![
                record(1, 0.004, true),
                record(2, 0.021, true),
                record(3, 0.0, true),    // negative-gap floor: excluded
                record(4, 0.030, false), // insufficient sample: excluded
            ],
            skipped: Vec::new(),
        };
        let targets = analysis.undervalued_targets();
        let ids: Vec<u32> = targets.iter().map(|r| r.batter_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_undervalued_ranking_ties_break_on_batter_id() {
        let analysis = SeasonAnalysis {
            records: vec![record(8, 0.010, true), record(2, 0.010, true)],
            skipped: Vec::new(),
        };
        let ids: Vec<u32> = analysis
            .undervalued_targets()
            .iter()
            .map(|r| r.batter_id)
            .collect();
        assert_eq!(ids, vec![2, 8]);
    }
}

//! Event sequencing: one chronological, season-long timeline per batter.
//!
//! The ordering key is `(game_date, game_pk, at_bat_number, pitch_number)`
//! with input row order breaking ties (stable sort). The resulting order is
//! total and deterministic: re-running on identical input yields an
//! identical timeline, which is what makes season reports reproducible.
//!
//! A built timeline is immutable. Downstream stages reference plate
//! appearances by their `season_index` and never restructure the sequence.

use crate::engine::zone::{self, CallDirection, ZoneCall};
use crate::models::{PaOutcome, PitchEvent};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A pitch together with its immutable zone classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedPitch {
    pub pitch: PitchEvent,
    pub zone: ZoneCall,
}

/// One plate appearance in a batter's season timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequencedPa {
    /// Batter-scoped, strictly increasing chronological index.
    pub season_index: usize,
    pub game_pk: i64,
    pub game_date: NaiveDate,
    pub at_bat_number: u16,
    /// Outcome metrics; `None` excludes the PA from aggregates but it still
    /// occupies this sequence slot (it can trigger or receive windowing).
    pub woba: Option<f64>,
    pub xwoba: Option<f64>,
    /// Adjudicated pitches in `pitch_number` order.
    pub pitches: Vec<ClassifiedPitch>,
    /// Any constituent pitch was an incorrect strike call on an
    /// out-of-zone pitch.
    pub contains_bad_call_against: bool,
}

impl SequencedPa {
    /// Whether the PA has usable outcome metrics for aggregation.
    #[inline]
    pub fn has_outcome(&self) -> bool {
        self.woba.is_some() && self.xwoba.is_some()
    }
}

/// Malformed or contradictory event ordering. Fatal for the single batter;
/// the orchestrator logs and skips, never aborting the season run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataIntegrityError {
    /// A pitch or outcome row belongs to a different batter than the
    /// timeline under construction.
    BatterMismatch { expected: u32, found: u32 },
    /// Pitches or outcome rows for one plate appearance disagree on the
    /// game date.
    MixedGameDate { game_pk: i64, at_bat_number: u16 },
    /// Two outcome rows reference the same plate appearance; assigning a
    /// season sequence index would collide.
    DuplicateOutcome { game_pk: i64, at_bat_number: u16 },
}

impl std::fmt::Display for DataIntegrityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BatterMismatch { expected, found } => {
                write!(f, "event for batter {} in timeline of batter {}", found, expected)
            }
            Self::MixedGameDate {
                game_pk,
                at_bat_number,
            } => write!(
                f,
                "plate appearance (game {}, at-bat {}) spans multiple game dates",
                game_pk, at_bat_number
            ),
            Self::DuplicateOutcome {
                game_pk,
                at_bat_number,
            } => write!(
                f,
                "duplicate outcome rows for plate appearance (game {}, at-bat {})",
                game_pk, at_bat_number
            ),
        }
    }
}

impl std::error::Error for DataIntegrityError {}

/// Build a batter's chronological season timeline.
///
/// Pitches are joined with outcome rows on `(game_pk, at_bat_number)`.
/// A pitch group with no matching outcome row still forms a PA (with null
/// outcome metrics), as does an outcome row with no adjudicated pitches
/// (an all-swing PA).
pub fn build_timeline(
    batter_id: u32,
    pitches: &[PitchEvent],
    outcomes: &[PaOutcome],
) -> Result<Vec<SequencedPa>, DataIntegrityError> {
    // Sort pitch references by the full ordering key. `sort_by` is stable,
    // so equal keys keep input row order.
    let mut ordered: Vec<&PitchEvent> = Vec::with_capacity(pitches.len());
    for p in pitches {
        if p.batter_id != batter_id {
            return Err(DataIntegrityError::BatterMismatch {
                expected: batter_id,
                found: p.batter_id,
            });
        }
        ordered.push(p);
    }
    ordered.sort_by(|a, b| {
        (a.game_date, a.game_pk, a.at_bat_number, a.pitch_number)
            .cmp(&(b.game_date, b.game_pk, b.at_bat_number, b.pitch_number))
    });

    struct PaBuild {
        game_pk: i64,
        game_date: NaiveDate,
        at_bat_number: u16,
        woba: Option<f64>,
        xwoba: Option<f64>,
        pitches: Vec<ClassifiedPitch>,
        has_outcome_row: bool,
    }

    let mut by_key: HashMap<(i64, u16), PaBuild> = HashMap::new();

    for p in ordered {
        let key = (p.game_pk, p.at_bat_number);
        match by_key.get_mut(&key) {
            Some(pa) => {
                if pa.game_date != p.game_date {
                    return Err(DataIntegrityError::MixedGameDate {
                        game_pk: p.game_pk,
                        at_bat_number: p.at_bat_number,
                    });
                }
                pa.pitches.push(ClassifiedPitch {
                    zone: zone::classify(p),
                    pitch: p.clone(),
                });
            }
            None => {
                by_key.insert(
                    key,
                    PaBuild {
                        game_pk: p.game_pk,
                        game_date: p.game_date,
                        at_bat_number: p.at_bat_number,
                        woba: None,
                        xwoba: None,
                        pitches: vec![ClassifiedPitch {
                            zone: zone::classify(p),
                            pitch: p.clone(),
                        }],
                        has_outcome_row: false,
                    },
                );
            }
        }
    }

    for o in outcomes {
        if o.batter_id != batter_id {
            return Err(DataIntegrityError::BatterMismatch {
                expected: batter_id,
                found: o.batter_id,
            });
        }
        let key = (o.game_pk, o.at_bat_number);
        match by_key.get_mut(&key) {
            Some(pa) => {
                if pa.has_outcome_row {
                    return Err(DataIntegrityError::DuplicateOutcome {
                        game_pk: o.game_pk,
                        at_bat_number: o.at_bat_number,
                    });
                }
                if pa.game_date != o.game_date {
                    return Err(DataIntegrityError::MixedGameDate {
                        game_pk: o.game_pk,
                        at_bat_number: o.at_bat_number,
                    });
                }
                pa.woba = o.woba;
                pa.xwoba = o.xwoba;
                pa.has_outcome_row = true;
            }
            None => {
                by_key.insert(
                    key,
                    PaBuild {
                        game_pk: o.game_pk,
                        game_date: o.game_date,
                        at_bat_number: o.at_bat_number,
                        woba: o.woba,
                        xwoba: o.xwoba,
                        pitches: Vec::new(),
                        has_outcome_row: true,
                    },
                );
            }
        }
    }

    // Total chronological order over distinct PAs. Keys are unique at this
    // point, so the sort is a total order and the index assignment below
    // cannot collide.
    let mut builds: Vec<PaBuild> = by_key.into_values().collect();
    builds.sort_by(|a, b| {
        (a.game_date, a.game_pk, a.at_bat_number).cmp(&(b.game_date, b.game_pk, b.at_bat_number))
    });

    let timeline = builds
        .into_iter()
        .enumerate()
        .map(|(season_index, pa)| {
            let contains_bad_call_against = pa
                .pitches
                .iter()
                .any(|cp| cp.zone.direction == CallDirection::AgainstBatter);
            SequencedPa {
                season_index,
                game_pk: pa.game_pk,
                game_date: pa.game_date,
                at_bat_number: pa.at_bat_number,
                woba: pa.woba,
                xwoba: pa.xwoba,
                pitches: pa.pitches,
                contains_bad_call_against,
            }
        })
        .collect();

    Ok(timeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UmpireCall;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn pitch(game_pk: i64, d: u32, abn: u16, pn: u16, call: Option<UmpireCall>) -> PitchEvent {
        PitchEvent {
            batter_id: 1,
            game_pk,
            game_date: date(d),
            at_bat_number: abn,
            pitch_number: pn,
            plate_x: Some(1.4), // well off the plate
            plate_z: Some(2.5),
            sz_top: Some(3.4),
            sz_bot: Some(1.6),
            balls: 0,
            strikes: 0,
            call,
        }
    }

    fn outcome(game_pk: i64, d: u32, abn: u16, woba: f64) -> PaOutcome {
        PaOutcome {
            batter_id: 1,
            game_pk,
            game_date: date(d),
            at_bat_number: abn,
            woba: Some(woba),
            xwoba: Some(woba),
        }
    }

    // -------------------------------------------------------------------------
    // Ordering
    // -------------------------------------------------------------------------

    #[test]
    fn test_ordering_across_games_and_dates() {
        // Deliberately shuffled input: later game first.
        let pitches = vec![
            pitch(200, 2, 5, 1, Some(UmpireCall::CalledBall)),
            pitch(100, 1, 9, 1, Some(UmpireCall::CalledBall)),
            pitch(100, 1, 3, 1, Some(UmpireCall::CalledBall)),
        ];
        let outcomes = vec![
            outcome(200, 2, 5, 0.9),
            outcome(100, 1, 9, 0.0),
            outcome(100, 1, 3, 0.7),
        ];
        let tl = build_timeline(1, &pitches, &outcomes).unwrap();
        assert_eq!(tl.len(), 3);
        assert_eq!(
            tl.iter().map(|pa| pa.at_bat_number).collect::<Vec<_>>(),
            vec![3, 9, 5]
        );
        assert_eq!(
            tl.iter().map(|pa| pa.season_index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_determinism_identical_reruns() {
        let pitches = vec![
            pitch(100, 1, 3, 2, Some(UmpireCall::CalledStrike)),
            pitch(100, 1, 3, 1, Some(UmpireCall::CalledBall)),
            pitch(200, 2, 1, 1, None),
        ];
        let outcomes = vec![outcome(100, 1, 3, 0.7), outcome(200, 2, 1, 0.0)];
        let a = build_timeline(1, &pitches, &outcomes).unwrap();
        let b = build_timeline(1, &pitches, &outcomes).unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn test_pitches_ordered_within_pa() {
        let pitches = vec![
            pitch(100, 1, 3, 3, Some(UmpireCall::CalledBall)),
            pitch(100, 1, 3, 1, Some(UmpireCall::CalledBall)),
            pitch(100, 1, 3, 2, Some(UmpireCall::CalledBall)),
        ];
        let tl = build_timeline(1, &pitches, &[]).unwrap();
        assert_eq!(tl.len(), 1);
        let nums: Vec<u16> = tl[0].pitches.iter().map(|cp| cp.pitch.pitch_number).collect();
        assert_eq!(nums, vec![1, 2, 3]);
    }

    // -------------------------------------------------------------------------
    // Joining
    // -------------------------------------------------------------------------

    #[test]
    fn test_pitch_group_without_outcome_row_keeps_slot() {
        let pitches = vec![pitch(100, 1, 3, 1, Some(UmpireCall::CalledStrike))];
        let tl = build_timeline(1, &pitches, &[]).unwrap();
        assert_eq!(tl.len(), 1);
        assert!(!tl[0].has_outcome());
        // Off-plate called strike: bad call against, even with no outcome.
        assert!(tl[0].contains_bad_call_against);
    }

    #[test]
    fn test_outcome_row_without_pitches_keeps_slot() {
        // An all-swing PA: no adjudicated pitches reach the engine.
        let tl = build_timeline(1, &[], &[outcome(100, 1, 3, 0.9)]).unwrap();
        assert_eq!(tl.len(), 1);
        assert!(tl[0].has_outcome());
        assert!(tl[0].pitches.is_empty());
        assert!(!tl[0].contains_bad_call_against);
    }

    // -------------------------------------------------------------------------
    // Integrity failures
    // -------------------------------------------------------------------------

    #[test]
    fn test_mixed_game_date_in_one_pa_fails() {
        let pitches = vec![
            pitch(100, 1, 3, 1, Some(UmpireCall::CalledBall)),
            pitch(100, 2, 3, 2, Some(UmpireCall::CalledBall)),
        ];
        let err = build_timeline(1, &pitches, &[]).unwrap_err();
        assert_eq!(
            err,
            DataIntegrityError::MixedGameDate {
                game_pk: 100,
                at_bat_number: 3
            }
        );
    }

    #[test]
    fn test_duplicate_outcome_rows_fail() {
        let outcomes = vec![outcome(100, 1, 3, 0.7), outcome(100, 1, 3, 0.9)];
        let err = build_timeline(1, &[], &outcomes).unwrap_err();
        assert_eq!(
            err,
            DataIntegrityError::DuplicateOutcome {
                game_pk: 100,
                at_bat_number: 3
            }
        );
    }

    #[test]
    fn test_foreign_batter_fails() {
        let mut p = pitch(100, 1, 3, 1, None);
        p.batter_id = 2;
        let err = build_timeline(1, &[p], &[]).unwrap_err();
        assert_eq!(
            err,
            DataIntegrityError::BatterMismatch {
                expected: 1,
                found: 2
            }
        );
    }
}

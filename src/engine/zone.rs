//! Zone classification: geometric truth vs. the umpire's call.
//!
//! This module is the single source of truth for strike-zone geometry.
//! All correctness labeling MUST go through [`classify`] so the boundary
//! policy is applied consistently:
//!
//! - The zone is a **closed** region: `|plate_x| <= 0.83` AND
//!   `sz_bot <= plate_z <= sz_top`. A pitch exactly on the edge is a strike
//!   (ties resolve toward the hitter's actual zone, standard practice).
//! - A call only counts *against* the batter when it is an incorrect
//!   **strike** call on an out-of-zone pitch: that is the call that can
//!   extend an at-bat unfavorably or end it via strikeout. The opposite
//!   mismatch (called ball on an in-zone pitch) favors the batter.
//! - Pitches missing location, zone bounds, or an adjudicated call are
//!   `Unknown` and excluded from all correctness aggregates.

use crate::models::{PitchEvent, UmpireCall};
use serde::{Deserialize, Serialize};

/// Half-width of the plate-crossing strike zone, in feet.
/// This is THE canonical constant; no other module may redefine it.
pub const PLATE_HALF_WIDTH_FT: f64 = 0.83;

/// Who an umpire's call favored, from the batter's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallDirection {
    /// Correct call; favors no one.
    Neutral,
    /// Incorrect strike call on an out-of-zone pitch.
    AgainstBatter,
    /// Incorrect ball call on an in-zone pitch.
    FavoredBatter,
    /// Missing geometry or no adjudicated call; excluded from correctness
    /// aggregates.
    Unknown,
}

/// Immutable classification of one pitch. Computed once at sequencing time
/// and never mutated afterward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneCall {
    /// Geometric truth; `None` when location or zone bounds are missing.
    pub in_zone: Option<bool>,
    /// Whether the umpire's call matched the geometry; `None` when the
    /// geometry is unknown or the pitch was not adjudicated.
    pub correct: Option<bool>,
    pub direction: CallDirection,
}

impl ZoneCall {
    /// An unclassifiable pitch (missing data or swing/contact).
    pub const UNKNOWN: ZoneCall = ZoneCall {
        in_zone: None,
        correct: None,
        direction: CallDirection::Unknown,
    };
}

/// Pure geometric test: was the pitch in the batter's strike zone?
///
/// Closed intervals on every edge: `plate_x == 0.83` with
/// `plate_z == sz_top` is in-zone.
#[inline]
pub fn in_zone(plate_x: f64, plate_z: f64, sz_top: f64, sz_bot: f64) -> bool {
    plate_x.abs() <= PLATE_HALF_WIDTH_FT && plate_z >= sz_bot && plate_z <= sz_top
}

/// Classify one pitch: geometric truth, call correctness, call direction.
///
/// Pure function of the pitch fields; no side effects.
#[inline]
pub fn classify(pitch: &PitchEvent) -> ZoneCall {
    let (Some(px), Some(pz), Some(top), Some(bot)) =
        (pitch.plate_x, pitch.plate_z, pitch.sz_top, pitch.sz_bot)
    else {
        return ZoneCall::UNKNOWN;
    };

    let zone = in_zone(px, pz, top, bot);

    let Some(call) = pitch.call else {
        // Swing/contact pitch: geometry is known but there was no call to
        // score.
        return ZoneCall {
            in_zone: Some(zone),
            correct: None,
            direction: CallDirection::Unknown,
        };
    };

    let correct = match call {
        UmpireCall::CalledStrike => zone,
        UmpireCall::CalledBall => !zone,
    };

    let direction = if correct {
        CallDirection::Neutral
    } else {
        match call {
            // Strike called on a ball: can end the at-bat via strikeout.
            UmpireCall::CalledStrike => CallDirection::AgainstBatter,
            // Ball called on a strike: a free take for the hitter.
            UmpireCall::CalledBall => CallDirection::FavoredBatter,
        }
    };

    ZoneCall {
        in_zone: Some(zone),
        correct: Some(correct),
        direction,
    }
}

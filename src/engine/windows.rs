//! Timeline partitioning into the clean baseline set and the
//! post-bad-call set.
//!
//! # Windowing policy
//!
//! For every PA `i` with a bad call against the batter, the next `K` PAs
//! strictly after `i` in season order form its post-bad-call window. The
//! policy decisions, in one place:
//!
//! - Overlapping windows merge **by union**: a PA inside two windows is
//!   counted exactly once (no double-counting in the post aggregate).
//! - A window at the tail of the season is truncated, not padded or
//!   dropped.
//! - A triggering PA is excluded from its own window (it is the event, not
//!   a response to itself) and from the clean set, but an earlier trigger's
//!   window can sweep it up like any other PA.
//!
//! The two returned sets are disjoint and together form a subset of the
//! timeline; PAs that are neither clean nor post (triggers outside every
//! other window) belong to neither set.

use crate::engine::timeline::SequencedPa;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Disjoint season-index sets produced by [`partition`]. Each vector is
/// sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// PAs with no bad call against the batter and outside every
    /// post-bad-call window.
    pub clean: Vec<usize>,
    /// Union of all post-bad-call windows, de-duplicated by PA identity.
    pub post_bad_call: Vec<usize>,
}

/// Split a timeline into clean and post-bad-call plate appearances.
///
/// `window_size` is K, the number of PAs after each trigger that belong to
/// the post set.
pub fn partition(timeline: &[SequencedPa], window_size: usize) -> Partition {
    let len = timeline.len();

    let triggers: Vec<usize> = timeline
        .iter()
        .filter(|pa| pa.contains_bad_call_against)
        .map(|pa| pa.season_index)
        .collect();

    // Union of windows; BTreeSet both de-duplicates and yields ascending
    // order.
    let mut post: BTreeSet<usize> = BTreeSet::new();
    for &i in &triggers {
        let end = (i + window_size).min(len.saturating_sub(1));
        for j in (i + 1)..=end {
            post.insert(j);
        }
    }
    // A trigger swept into an earlier window stays in the post set; every
    // trigger is excluded from the clean set regardless.
    let clean: Vec<usize> = timeline
        .iter()
        .filter(|pa| !pa.contains_bad_call_against && !post.contains(&pa.season_index))
        .map(|pa| pa.season_index)
        .collect();

    Partition {
        clean,
        post_bad_call: post.into_iter().collect(),
    }
}

//! Performance aggregation over an arbitrary plate-appearance subset.

use crate::engine::timeline::SequencedPa;
use crate::models::PerformanceStats;
use statrs::statistics::Statistics;

/// Compute mean wOBA / xwOBA over the PAs named by `indices`.
///
/// Only PAs with non-null outcome metrics contribute; `n` is the count
/// actually used, which may be smaller than `indices.len()`. An empty
/// usable set returns the `n = 0` sentinel, never an error — callers
/// check `n`.
pub fn aggregate(timeline: &[SequencedPa], indices: &[usize]) -> PerformanceStats {
    let mut woba: Vec<f64> = Vec::with_capacity(indices.len());
    let mut xwoba: Vec<f64> = Vec::with_capacity(indices.len());

    for &i in indices {
        let pa = &timeline[i];
        // Require both metrics: a PA with only one of the pair would skew
        // the paired means.
        if let (Some(w), Some(x)) = (pa.woba, pa.xwoba) {
            woba.push(w);
            xwoba.push(x);
        }
    }

    let n = woba.len();
    if n == 0 {
        return PerformanceStats::empty();
    }

    // Sample std needs n >= 2; a single PA has no spread to measure.
    let std_xwoba = if n >= 2 { xwoba.iter().std_dev() } else { 0.0 };

    PerformanceStats {
        mean_woba: woba.iter().mean(),
        mean_xwoba: xwoba.iter().mean(),
        std_xwoba,
        n,
    }
}

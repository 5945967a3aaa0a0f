// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/wmark-core

//! 1-D 2-means classification of per-bit vote averages.
//!
//! The embedded-bit populations land on two soft-vote levels whose absolute
//! positions depend on image content and strength, so a fixed threshold
//! would misread them. Clustering the averages into two groups recovers the
//! bit labels without any calibration: class 1 is the high cluster.

/// Tolerance on the midpoint movement between iterations.
const CONVERGENCE_TOL: f64 = 1e-6;
/// Iteration cap; convergence typically happens within a handful of rounds.
const MAX_ITERATIONS: usize = 300;

/// Partition `averages` into two clusters; `true` marks the high cluster.
///
/// Centers start at the minimum and maximum, points split at the midpoint,
/// and centers move to their cluster means until the midpoint settles. When
/// every input is identical the clusters collapse; the labeling is then
/// arbitrary but deterministic (all `false`).
pub fn two_means(averages: &[f64]) -> Vec<bool> {
    let mut labels = vec![false; averages.len()];
    if averages.is_empty() {
        return labels;
    }

    let mut lo = averages[0];
    let mut hi = averages[0];
    for &v in averages {
        if v < lo {
            lo = v;
        }
        if v > hi {
            hi = v;
        }
    }
    let mut centers = [lo, hi];

    for _ in 0..MAX_ITERATIONS {
        let threshold = (centers[0] + centers[1]) / 2.0;
        let mut high = (0.0f64, 0u64);
        let mut low = (0.0f64, 0u64);
        for (i, &avg) in averages.iter().enumerate() {
            if avg >= threshold {
                labels[i] = true;
                high.0 += avg;
                high.1 += 1;
            } else {
                labels[i] = false;
                low.0 += avg;
                low.1 += 1;
            }
        }
        // An empty cluster turns its center into NaN; comparisons against a
        // NaN threshold all fail, which keeps the labeling stable.
        centers = [high.0 / high.1 as f64, low.0 / low.1 as f64];
        if ((centers[0] + centers[1]) / 2.0 - threshold).abs() < CONVERGENCE_TOL {
            break;
        }
    }

    labels
}

// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/wmark-core

//! Per-bit vote accumulation during extraction.
//!
//! Every block votes a soft value for one logical bit position; block `k`
//! folds onto position `k mod mark_len`, which is how repeated embeddings
//! of a short mark stack up. The three channel workers write concurrently,
//! so each slot keeps its running (sum, count) behind its own mutex.

use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
struct Slot {
    sum: f64,
    count: u64,
}

/// Thread-safe (sum, count) pairs, one per logical mark bit.
#[derive(Debug)]
pub(crate) struct VoteAccumulator {
    slots: Vec<Mutex<Slot>>,
}

impl VoteAccumulator {
    pub fn new(mark_len: usize) -> Self {
        let mut slots = Vec::with_capacity(mark_len);
        slots.resize_with(mark_len, Mutex::default);
        Self { slots }
    }

    /// Fold a vote for block `at` into its logical bit position.
    pub fn add(&self, at: usize, value: f64) {
        let mut slot = self.slots[at % self.slots.len()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        slot.sum += value;
        slot.count += 1;
    }

    /// Per-position averages. A position that never voted yields NaN, which
    /// the 2-means stage tolerates; the capacity check makes this impossible
    /// in practice unless every block of a position failed to factor.
    pub fn averages(&self) -> Vec<f64> {
        self.slots
            .iter()
            .map(|slot| {
                let slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
                slot.sum / slot.count as f64
            })
            .collect()
    }
}

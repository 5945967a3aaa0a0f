// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/wmark-core

//! Cooperative cancellation.
//!
//! A [`CancelToken`] is a cheaply clonable flag the caller hands into embed
//! and extract. The pipeline polls it at natural loop boundaries — between
//! blocks and around the transforms — and returns
//! [`WatermarkError::Cancelled`] when set. The numerical kernels themselves
//! run to completion; they are short.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::error::WatermarkError;

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every operation holding a clone of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Return `Err(Cancelled)` if cancellation has been requested.
    /// Called at loop boundaries in the pipeline.
    pub fn check(&self) -> Result<(), WatermarkError> {
        if self.is_cancelled() {
            Err(WatermarkError::Cancelled)
        } else {
            Ok(())
        }
    }
}

// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/wmark-core

//! Error types for the watermarking engine.
//!
//! [`WatermarkError`] covers configuration, capacity, contract and
//! cancellation failures. Numerical failures of single blocks (an SVD that
//! will not factor) are absorbed inside the pipeline — a pathological block
//! is skipped, never surfaced.

use core::fmt;

/// Errors surfaced by engine construction, embedding or extraction.
#[derive(Debug)]
pub enum WatermarkError {
    /// Engine options are contradictory or out of range.
    InvalidOptions(String),
    /// The image holds fewer blocks than the mark has bits.
    ImageTooSmall {
        /// Blocks available at the configured block shape.
        total_blocks: usize,
        /// Bits the mark wants to embed or extract.
        mark_len: usize,
    },
    /// The mark reports a length of zero bits.
    EmptyMark,
    /// The mark spec rejected the extracted bit vector's length.
    MarkContract {
        /// Bits the spec expects.
        expected: usize,
        /// Bits it was handed.
        actual: usize,
    },
    /// The operation was cancelled through its [`crate::CancelToken`].
    Cancelled,
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOptions(why) => write!(f, "invalid options: {why}"),
            Self::ImageTooSmall { total_blocks, mark_len } => write!(
                f,
                "image too small: total blocks {total_blocks} < mark length {mark_len}"
            ),
            Self::EmptyMark => write!(f, "mark must contain at least one bit"),
            Self::MarkContract { expected, actual } => write!(
                f,
                "mark spec expects {expected} bits but was handed {actual}"
            ),
            Self::Cancelled => write!(f, "operation cancelled by caller"),
        }
    }
}

impl std::error::Error for WatermarkError {}

// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/wmark-core

//! Engine configuration: block shape and quantization strength.
//!
//! Block shapes are given in image coordinates and canonicalized to the
//! half-sized wavelet grid: odd dimensions round up, anything below 4 is
//! clamped to 4, then both halve. Strengths are the integer step sizes of
//! the singular-value quantizer; `d1` drives the dominant value and the
//! optional `d2` the second one. Larger steps mean more distortion and more
//! robustness.

use super::error::WatermarkError;

/// Default block shape in image coordinates (before canonicalization).
const DEFAULT_BLOCK_SHAPE: (usize, usize) = (8, 8);
/// Default quantizer steps.
const DEFAULT_D1: i64 = 36;
const DEFAULT_D2: i64 = 20;

// ──────────────────────────────────────────────────────────────────────────
// Block shape
// ──────────────────────────────────────────────────────────────────────────

/// Canonical block shape on the wavelet grid. Both dimensions are ≥ 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockShape {
    block_w: usize,
    block_h: usize,
}

impl BlockShape {
    /// Canonicalize an image-coordinate block shape: round odd dimensions
    /// up, clamp to a minimum of 4, halve for the wavelet grid.
    pub fn canonical(width: usize, height: usize) -> Self {
        let round = |mut d: usize| {
            if d % 2 != 0 {
                d += 1;
            }
            if d < 4 {
                d = 4;
            }
            d / 2
        };
        Self {
            block_w: round(width),
            block_h: round(height),
        }
    }

    /// Block width on the wavelet grid.
    pub fn block_w(&self) -> usize {
        self.block_w
    }

    /// Block height on the wavelet grid.
    pub fn block_h(&self) -> usize {
        self.block_h
    }

    /// Samples per block.
    pub fn area(&self) -> usize {
        self.block_w * self.block_h
    }

    /// Whole blocks fitting into a wavelet-extent plane.
    pub fn total_blocks(&self, wave_w: usize, wave_h: usize) -> usize {
        (wave_w / self.block_w) * (wave_h / self.block_h)
    }
}

impl Default for BlockShape {
    fn default() -> Self {
        Self::canonical(DEFAULT_BLOCK_SHAPE.0, DEFAULT_BLOCK_SHAPE.1)
    }
}

// ──────────────────────────────────────────────────────────────────────────
// Strength
// ──────────────────────────────────────────────────────────────────────────

/// Quantizer configuration for the top singular value(s).
///
/// The embed rule shifts a singular value into one of two cosets of the
/// `d·ℤ` lattice: `(trunc(s) ÷ d + 1/4 + bit/4) · d`. Extraction reads the
/// coset back via `trunc(s) mod d > d ÷ 2`, all in integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Strength {
    /// Quantize only the dominant singular value.
    Single { d1: i64 },
    /// Quantize the top two singular values. Extraction weights the
    /// dominant vote 3:1 against the second.
    Dual { d1: i64, d2: i64 },
}

/// Shift `s` into the coset of `d·ℤ` selected by `bit` (0 or 1).
#[inline]
fn quantize(s: f64, d: i64, bit: f64) -> f64 {
    ((s as i64 / d) as f64 + 0.25 + 0.25 * bit) * d as f64
}

/// Read the coset of `s` back as a hard vote.
#[inline]
fn coset_vote(s: f64, d: i64) -> bool {
    (s as i64) % d > d / 2
}

impl Strength {
    /// Apply the embedding rule for one bit to the top singular values.
    pub(crate) fn embed(self, s0: f64, s1: f64, bit: f64) -> (f64, f64) {
        match self {
            Self::Single { d1 } => (quantize(s0, d1, bit), s1),
            Self::Dual { d1, d2 } => (quantize(s0, d1, bit), quantize(s1, d2, bit)),
        }
    }

    /// Decode a soft vote from the top singular values:
    /// `{0, 1}` in single mode, `{0, 1/4, 3/4, 1}` in dual mode.
    pub(crate) fn extract(self, s0: f64, s1: f64) -> f64 {
        match self {
            Self::Single { d1 } => {
                if coset_vote(s0, d1) {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Dual { d1, d2 } => {
                let v = if coset_vote(s0, d1) { 1.0 } else { 0.0 };
                if coset_vote(s1, d2) {
                    (v * 3.0 + 1.0) / 4.0
                } else {
                    (v * 3.0) / 4.0
                }
            }
        }
    }

    fn d1(self) -> i64 {
        match self {
            Self::Single { d1 } | Self::Dual { d1, .. } => d1,
        }
    }
}

impl Default for Strength {
    fn default() -> Self {
        Self::Dual { d1: DEFAULT_D1, d2: DEFAULT_D2 }
    }
}

// ──────────────────────────────────────────────────────────────────────────
// Options
// ──────────────────────────────────────────────────────────────────────────

/// Engine options. Build with the chained setters; unspecified values fall
/// back to an 8×8 block shape and strength d1=36, d2=20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    shape: BlockShape,
    strength: Strength,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the block shape in image coordinates. Zero dimensions fall back
    /// to the default shape.
    pub fn block_shape(mut self, width: usize, height: usize) -> Self {
        self.shape = if width == 0 || height == 0 {
            BlockShape::default()
        } else {
            BlockShape::canonical(width, height)
        };
        self
    }

    /// Quantize only the dominant singular value with step `d1`.
    /// Zero falls back to the default strength. Overrides any earlier
    /// strength setting.
    pub fn strength_d1(mut self, d1: i64) -> Self {
        self.strength = if d1 == 0 {
            Strength::default()
        } else {
            Strength::Single { d1 }
        };
        self
    }

    /// Quantize the top two singular values with steps `d1` and `d2`.
    /// A zero `d1` falls back to the default strength; a `d2` below 1
    /// selects single-parameter mode. Overrides any earlier strength
    /// setting.
    pub fn strength_d1_d2(mut self, d1: i64, d2: i64) -> Self {
        self.strength = if d1 == 0 {
            Strength::default()
        } else if d2 < 1 {
            Strength::Single { d1 }
        } else {
            Strength::Dual { d1, d2 }
        };
        self
    }

    pub(crate) fn shape(&self) -> BlockShape {
        self.shape
    }

    pub(crate) fn strength(&self) -> Strength {
        self.strength
    }

    pub(crate) fn validate(&self) -> Result<(), WatermarkError> {
        if self.strength.d1() < 1 {
            return Err(WatermarkError::InvalidOptions(format!(
                "strength d1 must be positive, got {}",
                self.strength.d1()
            )));
        }
        Ok(())
    }
}

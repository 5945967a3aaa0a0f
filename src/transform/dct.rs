// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/wmark-core

//! 2-D DCT over one block, with a precomputed basis tensor.
//!
//! Blocks are tiny (4×4 to 16×16), so instead of a fast transform the
//! engine multiplies against a fully materialized orthonormal DCT-II basis:
//! `phi[i,j,x,y] = phi_h[i,x] · phi_w[j,y]`, built once per block shape.
//! Forward input is the `f32` subband slice; coefficients are kept in `f64`
//! because the SVD stage downstream is double precision.
//!
//! [`DctCache`] memoizes engines by block shape and is safe to share across
//! threads; an insertion race is resolved by keeping the first winner.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// DCT engine for one block shape. Immutable after construction.
#[derive(Debug)]
pub struct Dct {
    block_w: usize,
    block_h: usize,
    /// Basis tensor, indexed `[i][j][x][y]` with strides for a
    /// `block_h × block_w × block_h × block_w` layout.
    phi: Vec<f64>,
}

/// Orthonormal 1-D DCT-II basis for dimension `d`:
/// row 0 is `1/√d`, row `i>0` is `√(2/d)·cos(i·π·(2k+1) / 2d)`.
fn basis_1d(d: usize) -> Vec<f64> {
    let df = d as f64;
    let mut phi = vec![0.0f64; d * d];
    for k in 0..d {
        phi[k] = 1.0 / df.sqrt();
    }
    for i in 1..d {
        for k in 0..d {
            phi[i * d + k] = (2.0 / df).sqrt()
                * ((i as f64 * std::f64::consts::PI * (2 * k + 1) as f64) / (2.0 * df)).cos();
        }
    }
    phi
}

impl Dct {
    /// Build the basis tensor for a `block_w × block_h` block. Both
    /// dimensions must be at least 2.
    pub fn new(block_w: usize, block_h: usize) -> Self {
        debug_assert!(block_w >= 2 && block_h >= 2, "degenerate block {block_w}x{block_h}");
        let (w, h) = (block_w, block_h);
        let phi_w = basis_1d(w);
        let phi_h = basis_1d(h);

        let mut phi = vec![0.0f64; w * h * w * h];
        for i in 0..h {
            // coefficient row
            for j in 0..w {
                // coefficient column
                for x in 0..h {
                    // input row
                    for y in 0..w {
                        // input column
                        let idx = i * w * w * h + j * w * h + x * w + y;
                        phi[idx] = phi_h[i * h + x] * phi_w[j * w + y];
                    }
                }
            }
        }
        Self { block_w, block_h, phi }
    }

    pub fn block_w(&self) -> usize {
        self.block_w
    }

    pub fn block_h(&self) -> usize {
        self.block_h
    }

    /// Forward DCT of one row-major block (`block_w · block_h` samples).
    pub fn forward(&self, block: &[f32]) -> Vec<f64> {
        let (w, h) = (self.block_w, self.block_h);
        debug_assert_eq!(block.len(), w * h);
        let mut result = vec![0.0f64; w * h];
        for i in 0..h {
            for j in 0..w {
                let mut sum = 0.0;
                for x in 0..h {
                    for y in 0..w {
                        let idx = i * w * w * h + j * w * h + x * w + y;
                        sum += self.phi[idx] * block[x * w + y] as f64;
                    }
                }
                result[i * w + j] = sum;
            }
        }
        result
    }

    /// Inverse DCT of (possibly mutated) coefficients, written back through
    /// the caller's block slice — the write-back half of the forward call.
    pub fn inverse(&self, coeffs: &[f64], block: &mut [f32]) {
        let (w, h) = (self.block_w, self.block_h);
        debug_assert_eq!(coeffs.len(), w * h);
        debug_assert_eq!(block.len(), w * h);
        for i in 0..h {
            for j in 0..w {
                let mut sum = 0.0;
                for x in 0..h {
                    for y in 0..w {
                        // basis transposed: output position (i,j), coefficient (x,y)
                        let idx = x * w * w * h + y * w * h + i * w + j;
                        sum += self.phi[idx] * coeffs[x * w + y];
                    }
                }
                block[i * w + j] = sum as f32;
            }
        }
    }
}

/// Compute-if-absent cache of [`Dct`] engines keyed by block shape.
///
/// Lookups are read-mostly; a losing concurrent insert discards its engine
/// and returns the winner's, so every shape has exactly one live basis.
#[derive(Debug, Default)]
pub struct DctCache {
    engines: RwLock<HashMap<(usize, usize), Arc<Dct>>>,
}

impl DctCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, block_w: usize, block_h: usize) -> Arc<Dct> {
        let key = (block_w, block_h);
        if let Some(dct) = self
            .engines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(dct);
        }
        // Built outside the write lock; first insert wins the race.
        let fresh = Arc::new(Dct::new(block_w, block_h));
        let mut engines = self.engines.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(engines.entry(key).or_insert(fresh))
    }
}

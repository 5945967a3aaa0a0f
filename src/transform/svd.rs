// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/wmark-core

//! Thin SVD of one block's DCT coefficients.
//!
//! A block is a `block_h × block_w` row-major matrix of doubles. The engine
//! factors it into `U·Σ·Vᵀ`, hands the singular values to the caller for
//! quantization, and recomposes the matrix back through the caller's buffer.
//! Everything stays small (block area ≤ a few hundred), so nalgebra's
//! dynamic matrices are plenty.

use core::fmt;

use nalgebra::{DMatrix, DVector};

/// Iteration cap for the SVD solver; factorization failing to converge
/// within this many sweeps yields [`SvdError::NotFactorizable`].
const MAX_SVD_ITERATIONS: usize = 250;

/// Errors from the SVD stage. The pipeline absorbs these per block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvdError {
    /// The solver could not factor the block (degenerate or non-finite data).
    NotFactorizable,
}

impl fmt::Display for SvdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFactorizable => write!(f, "block matrix cannot be factorized"),
        }
    }
}

impl std::error::Error for SvdError {}

/// SVD engine for one block shape. Stateless apart from the dimensions.
#[derive(Debug, Clone, Copy)]
pub struct Svd {
    block_w: usize,
    block_h: usize,
}

impl Svd {
    pub fn new(block_w: usize, block_h: usize) -> Self {
        Self { block_w, block_h }
    }

    /// Factor `data` (row-major `block_h × block_w`) into a [`Decomposition`].
    pub fn exec(&self, data: &[f64]) -> Result<Decomposition, SvdError> {
        let (w, h) = (self.block_w, self.block_h);
        debug_assert_eq!(data.len(), w * h);
        let matrix = DMatrix::from_row_slice(h, w, data);
        let svd = matrix
            .try_svd(true, true, f64::EPSILON, MAX_SVD_ITERATIONS)
            .ok_or(SvdError::NotFactorizable)?;
        match (svd.u, svd.v_t) {
            (Some(u), Some(v_t)) => Ok(Decomposition {
                rows: h,
                cols: w,
                u,
                v_t,
                singular: svd.singular_values,
            }),
            _ => Err(SvdError::NotFactorizable),
        }
    }
}

/// One factored block: `U`, `Vᵀ` and the mutable singular values.
///
/// Singular values come back non-negative and in descending order. After
/// quantizing them, [`Decomposition::compose_into`] rebuilds `U·Σ'·Vᵀ` into
/// the buffer the block came from.
#[derive(Debug, Clone)]
pub struct Decomposition {
    rows: usize,
    cols: usize,
    u: DMatrix<f64>,
    v_t: DMatrix<f64>,
    singular: DVector<f64>,
}

impl Decomposition {
    pub fn singular_values(&self) -> &[f64] {
        self.singular.as_slice()
    }

    pub fn singular(&self, i: usize) -> f64 {
        self.singular[i]
    }

    pub fn set_singular(&mut self, i: usize, value: f64) {
        self.singular[i] = value;
    }

    /// Rebuild the block from `U`, the current singular values and `Vᵀ`,
    /// writing row-major into `data`.
    pub fn compose_into(self, data: &mut [f64]) {
        debug_assert_eq!(data.len(), self.rows * self.cols);
        let rebuilt = &self.u * DMatrix::from_diagonal(&self.singular) * &self.v_t;
        for i in 0..self.rows {
            for j in 0..self.cols {
                data[i * self.cols + j] = rebuilt[(i, j)];
            }
        }
    }
}

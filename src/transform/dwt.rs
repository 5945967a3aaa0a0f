// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/wmark-core

//! One-level 2-D Haar wavelet transform.
//!
//! Decomposes a `width × height` plane into four half-sized subbands:
//! approximation `ca` (the embedding target), horizontal `ch`, vertical `cv`
//! and diagonal `cd` detail. Odd extents are handled by edge replication on
//! the forward pass and suppressed writes on the inverse.
//!
//! Both directions take an optional block map (see
//! [`super::blockmap::BlockMap`]): the forward pass scatters each coefficient
//! to its block-major position, the inverse gathers from the same position.
//! With `None` the subbands stay in row-major layout.
//!
//! [`Wavelets`] is the stateful variant for batch use: it keeps the
//! identity-layout decomposition of a plane and re-scatters it on demand for
//! any block shape, so one forward transform serves many embed/extract calls.

use std::f32::consts::SQRT_2;

/// The four subbands of a one-level decomposition, each of length
/// `wave_w · wave_h` where `wave_w = (width+1)/2`, `wave_h = (height+1)/2`.
#[derive(Debug, Clone)]
pub struct Subbands {
    /// Approximation (low-pass); the only band mutated by embedding.
    pub ca: Vec<f32>,
    /// Horizontal detail.
    pub ch: Vec<f32>,
    /// Vertical detail.
    pub cv: Vec<f32>,
    /// Diagonal detail.
    pub cd: Vec<f32>,
}

/// Average/difference pair of the Haar kernel, scaled by √2.
#[inline]
fn cacd(v1: f32, v2: f32) -> (f32, f32) {
    let avr = (v1 + v2) / 2.0;
    (avr * SQRT_2, (v1 - avr) * SQRT_2)
}

/// Inverse of [`cacd`].
#[inline]
fn icacd(a: f32, d: f32) -> (f32, f32) {
    let avr = a / SQRT_2;
    (avr + d / SQRT_2, avr - d / SQRT_2)
}

/// Forward one-level Haar DWT of a row-major plane.
///
/// `data.len()` must be a multiple of `width`. Each 2×2 kernel writes its
/// four coefficients at index `map[(y/2)·wave_w + x/2]`, or at the identity
/// position when no map is given.
pub fn haar_forward(data: &[f32], width: usize, map: Option<&[usize]>) -> Subbands {
    let height = data.len() / width;
    let (wave_w, wave_h) = ((width + 1) / 2, (height + 1) / 2);
    let len = wave_w * wave_h;
    debug_assert!(
        map.map_or(true, |m| m.len() == len),
        "block map length {} != subband length {len}",
        map.map_or(0, <[usize]>::len),
    );

    let mut ca = vec![0.0f32; len];
    let mut ch = vec![0.0f32; len];
    let mut cv = vec![0.0f32; len];
    let mut cd = vec![0.0f32; len];

    let mut y0 = 0;
    while y0 < height {
        // edge replication for odd extents
        let y1 = if y0 + 1 < height { y0 + 1 } else { y0 };
        let mut x0 = 0;
        while x0 < width {
            let x1 = if x0 + 1 < width { x0 + 1 } else { x0 };
            let (a1, d1) = cacd(data[y0 * width + x0], data[y1 * width + x0]);
            let (a2, d2) = cacd(data[y0 * width + x1], data[y1 * width + x1]);

            let k = (y0 / 2) * wave_w + x0 / 2;
            let idx = match map {
                Some(m) => m[k],
                None => k,
            };
            let (a, v) = cacd(a1, a2);
            let (h, d) = cacd(d1, d2);
            ca[idx] = a;
            cv[idx] = v;
            ch[idx] = h;
            cd[idx] = d;
            x0 += 2;
        }
        y0 += 2;
    }

    Subbands { ca, ch, cv, cd }
}

/// Inverse one-level Haar DWT back into a row-major plane.
///
/// Writes that would fall outside an odd extent (replicated on the forward
/// pass) are suppressed.
pub fn haar_inverse(bands: &Subbands, width: usize, height: usize, map: Option<&[usize]>) -> Vec<f32> {
    let wave_w = (width + 1) / 2;
    let mut data = vec![0.0f32; width * height];

    let mut y0 = 0;
    while y0 < height {
        let mut x0 = 0;
        while x0 < width {
            let k = (y0 / 2) * wave_w + x0 / 2;
            let idx = match map {
                Some(m) => m[k],
                None => k,
            };

            let (a1, a2) = icacd(bands.ca[idx], bands.cv[idx]);
            let (d1, d2) = icacd(bands.ch[idx], bands.cd[idx]);
            let (v1, v2) = icacd(a1, d1);
            let (v3, v4) = icacd(a2, d2);

            data[y0 * width + x0] = v1;
            if y0 + 1 < height {
                data[(y0 + 1) * width + x0] = v2;
            }
            if x0 + 1 < width {
                data[y0 * width + (x0 + 1)] = v3;
            }
            if y0 + 1 < height && x0 + 1 < width {
                data[(y0 + 1) * width + (x0 + 1)] = v4;
            }
            x0 += 2;
        }
        y0 += 2;
    }

    data
}

/// Precomputed decomposition of one plane, re-permutable per block shape.
///
/// The forward transform runs once with the identity layout; `permuted`
/// scatters the cached coefficients through a block map, returning fresh
/// subbands the caller may mutate freely.
#[derive(Debug, Clone)]
pub struct Wavelets {
    bands: Subbands,
}

impl Wavelets {
    pub fn new(data: &[f32], width: usize) -> Self {
        Self {
            bands: haar_forward(data, width, None),
        }
    }

    /// Scatter the cached subbands into block-major order.
    pub fn permuted(&self, map: &[usize]) -> Subbands {
        Subbands {
            ca: scatter(&self.bands.ca, map),
            ch: scatter(&self.bands.ch, map),
            cv: scatter(&self.bands.cv, map),
            cd: scatter(&self.bands.cd, map),
        }
    }
}

fn scatter(src: &[f32], map: &[usize]) -> Vec<f32> {
    debug_assert_eq!(src.len(), map.len());
    let mut out = vec![0.0f32; src.len()];
    for (i, &v) in src.iter().enumerate() {
        out[map[i]] = v;
    }
    out
}

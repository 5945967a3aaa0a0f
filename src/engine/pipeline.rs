// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/wmark-core

//! Embed and extract pipelines.
//!
//! Per channel: forward Haar DWT scattered into block-major order, then for
//! every whole block of the low-pass subband a DCT → SVD → quantize →
//! recompose → inverse DCT round (embed) or a DCT → SVD → soft-vote read
//! (extract), then the inverse DWT (embed only). The three YUV channels run
//! concurrently on a nested `rayon::join`; nothing is shared between them
//! except the read-only transforms and, during extract, the vote
//! accumulator.
//!
//! A block whose SVD will not factor is left untouched (embed) or simply
//! does not vote (extract) — one pathological block never fails the call.

use super::accum::VoteAccumulator;
use super::cancel::CancelToken;
use super::error::WatermarkError;
use super::kmeans;
use super::mark::EmbedMark;
use super::options::{BlockShape, Strength};
use super::surface::{compose_rgba64, Geometry, Rgba64Image};
use crate::transform::blockmap::BlockMap;
use crate::transform::dct::{Dct, DctCache};
use crate::transform::dwt::{haar_forward, haar_inverse, Subbands, Wavelets};
use crate::transform::svd::Svd;

/// Where a call gets its per-channel subbands from.
pub(crate) enum PlaneSource<'a> {
    /// Fresh spatial planes; each worker transforms and then drops its own.
    Spatial([Vec<f32>; 3]),
    /// Precomputed decompositions owned by a batch; workers re-scatter.
    Cached(&'a [Wavelets; 3]),
}

/// Reject marks that do not fit the image at this block shape.
pub(crate) fn check_capacity(
    geom: Geometry,
    shape: BlockShape,
    mark_len: usize,
) -> Result<usize, WatermarkError> {
    if mark_len == 0 {
        return Err(WatermarkError::EmptyMark);
    }
    let total_blocks = shape.total_blocks(geom.wave_w, geom.wave_h);
    if total_blocks < mark_len {
        return Err(WatermarkError::ImageTooSmall { total_blocks, mark_len });
    }
    Ok(total_blocks)
}

/// Embed `mark` into the planes and recompose a fresh 16-bit RGBA image.
pub(crate) fn embed(
    cancel: &CancelToken,
    geom: Geometry,
    alpha: &[u16],
    source: PlaneSource<'_>,
    mark: &dyn EmbedMark,
    shape: BlockShape,
    strength: Strength,
    cache: &DctCache,
) -> Result<Rgba64Image, WatermarkError> {
    let total_blocks = check_capacity(geom, shape, mark.len())?;
    cancel.check()?;

    let map = BlockMap::new(geom.wave_w, geom.wave_h, shape.block_w(), shape.block_h()).build();
    let dct = cache.get(shape.block_w(), shape.block_h());
    let svd = Svd::new(shape.block_w(), shape.block_h());

    let channel = |mut bands: Subbands| -> Result<Vec<f32>, WatermarkError> {
        embed_channel(cancel, &mut bands, mark, shape, strength, &dct, &svd, total_blocks)?;
        Ok(haar_inverse(&bands, geom.width, geom.height, Some(&map)))
    };

    let (r0, (r1, r2)) = match source {
        PlaneSource::Spatial([p0, p1, p2]) => {
            let run = |plane: Vec<f32>| {
                let bands = haar_forward(&plane, geom.width, Some(&map));
                drop(plane); // cap peak memory before the block loop
                channel(bands)
            };
            rayon::join(|| run(p0), || rayon::join(|| run(p1), || run(p2)))
        }
        PlaneSource::Cached(wavelets) => {
            let run = |w: &Wavelets| channel(w.permuted(&map));
            rayon::join(
                || run(&wavelets[0]),
                || rayon::join(|| run(&wavelets[1]), || run(&wavelets[2])),
            )
        }
    };

    let planes = [r0?, r1?, r2?];
    Ok(compose_rgba64(geom, alpha, &planes))
}

/// Extract `mark_len` bits from the planes. Returns one byte per bit.
pub(crate) fn extract(
    cancel: &CancelToken,
    geom: Geometry,
    source: PlaneSource<'_>,
    mark_len: usize,
    shape: BlockShape,
    strength: Strength,
    cache: &DctCache,
) -> Result<Vec<u8>, WatermarkError> {
    let total_blocks = check_capacity(geom, shape, mark_len)?;
    cancel.check()?;

    let map = BlockMap::new(geom.wave_w, geom.wave_h, shape.block_w(), shape.block_h()).build();
    let dct = cache.get(shape.block_w(), shape.block_h());
    let svd = Svd::new(shape.block_w(), shape.block_h());
    let votes = VoteAccumulator::new(mark_len);

    let channel = |bands: Subbands| -> Result<(), WatermarkError> {
        extract_channel(cancel, &bands, shape, strength, &dct, &svd, total_blocks, &votes)
    };

    let (r0, (r1, r2)) = match source {
        PlaneSource::Spatial([p0, p1, p2]) => {
            let run = |plane: Vec<f32>| {
                let bands = haar_forward(&plane, geom.width, Some(&map));
                drop(plane);
                channel(bands)
            };
            rayon::join(|| run(p0), || rayon::join(|| run(p1), || run(p2)))
        }
        PlaneSource::Cached(wavelets) => {
            let run = |w: &Wavelets| channel(w.permuted(&map));
            rayon::join(
                || run(&wavelets[0]),
                || rayon::join(|| run(&wavelets[1]), || run(&wavelets[2])),
            )
        }
    };
    r0?;
    r1?;
    r2?;

    let bits = kmeans::two_means(&votes.averages())
        .into_iter()
        .map(u8::from)
        .collect();
    Ok(bits)
}

/// Quantize one channel's blocks in place through disjoint cA sub-slices.
#[allow(clippy::too_many_arguments)]
fn embed_channel(
    cancel: &CancelToken,
    bands: &mut Subbands,
    mark: &dyn EmbedMark,
    shape: BlockShape,
    strength: Strength,
    dct: &Dct,
    svd: &Svd,
    total_blocks: usize,
) -> Result<(), WatermarkError> {
    let area = shape.area();
    let mark_len = mark.len();
    for at in 0..total_blocks {
        cancel.check()?;
        let block = &mut bands.ca[at * area..(at + 1) * area];
        let bit = mark.bit(at % mark_len);

        let mut coeffs = dct.forward(block);
        let mut dec = match svd.exec(&coeffs) {
            Ok(dec) => dec,
            Err(_) => continue, // unusable block, leave it unchanged
        };
        let (r0, r1) = strength.embed(dec.singular(0), dec.singular(1), bit);
        dec.set_singular(0, r0);
        dec.set_singular(1, r1);
        dec.compose_into(&mut coeffs);
        dct.inverse(&coeffs, block);
    }
    Ok(())
}

/// Read one channel's blocks and fold their soft votes into the accumulator.
#[allow(clippy::too_many_arguments)]
fn extract_channel(
    cancel: &CancelToken,
    bands: &Subbands,
    shape: BlockShape,
    strength: Strength,
    dct: &Dct,
    svd: &Svd,
    total_blocks: usize,
    votes: &VoteAccumulator,
) -> Result<(), WatermarkError> {
    let area = shape.area();
    for at in 0..total_blocks {
        cancel.check()?;
        let block = &bands.ca[at * area..(at + 1) * area];
        let coeffs = dct.forward(block);
        let dec = match svd.exec(&coeffs) {
            Ok(dec) => dec,
            Err(_) => continue, // unusable block casts no vote
        };
        votes.add(at, strength.extract(dec.singular(0), dec.singular(1)));
    }
    Ok(())
}

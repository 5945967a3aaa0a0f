// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/wmark-core

//! Batch handle: many marks against one image.
//!
//! Embedding several marks into the same source (or probing one image with
//! several specs) repeats the most expensive stages — pixel decomposition
//! and the forward DWT of all three channels. A [`Batch`] runs them once
//! and keeps the results; each call then only re-scatters the cached
//! subbands for its block shape, so the source is never mutated and every
//! embed yields a fresh image. The DCT cache is shared with the engine the
//! batch came from.

use std::sync::Arc;

use image::DynamicImage;

use super::cancel::CancelToken;
use super::error::WatermarkError;
use super::mark::{EmbedMark, ExtractMark, MarkDecoder};
use super::options::Options;
use super::pipeline::{self, PlaneSource};
use super::surface::{Geometry, ImageSurface, Rgba64Image};
use crate::transform::dct::DctCache;
use crate::transform::dwt::Wavelets;

/// Cached per-image precomputations for repeated embed/extract calls.
pub struct Batch {
    geom: Geometry,
    alpha: Vec<u16>,
    wavelets: [Wavelets; 3],
    cache: Arc<DctCache>,
}

impl Batch {
    pub(crate) fn new(src: &DynamicImage, cache: Arc<DctCache>) -> Self {
        let ImageSurface { geom, alpha, planes } = ImageSurface::from_image(src);
        let [p0, p1, p2] = planes;
        let width = geom.width;
        let (w0, (w1, w2)) = rayon::join(
            || Wavelets::new(&p0, width),
            || rayon::join(|| Wavelets::new(&p1, width), || Wavelets::new(&p2, width)),
        );
        Self {
            geom,
            alpha,
            wavelets: [w0, w1, w2],
            cache,
        }
    }

    /// Embed a mark using the cached transforms. Semantics match
    /// [`crate::Watermark::embed`] with the given options.
    pub fn embed(
        &self,
        cancel: &CancelToken,
        mark: &dyn EmbedMark,
        options: &Options,
    ) -> Result<Rgba64Image, WatermarkError> {
        options.validate()?;
        pipeline::embed(
            cancel,
            self.geom,
            &self.alpha,
            PlaneSource::Cached(&self.wavelets),
            mark,
            options.shape(),
            options.strength(),
            &self.cache,
        )
    }

    /// Extract a mark using the cached transforms. Semantics match
    /// [`crate::Watermark::extract`] with the given options.
    pub fn extract(
        &self,
        cancel: &CancelToken,
        spec: &dyn ExtractMark,
        options: &Options,
    ) -> Result<Box<dyn MarkDecoder>, WatermarkError> {
        options.validate()?;
        let bits = pipeline::extract(
            cancel,
            self.geom,
            PlaneSource::Cached(&self.wavelets),
            spec.len(),
            options.shape(),
            options.strength(),
            &self.cache,
        )?;
        spec.new_decoder(bits)
    }
}

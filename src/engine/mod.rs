// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/wmark-core

//! The watermarking engine: options, marks, and the embed/extract surface.
//!
//! [`Watermark`] owns validated [`Options`] and a DCT cache shared across
//! calls, clones and batches. Capacity is checked against the image bounds
//! before any pixel is read.

mod accum;
pub mod batch;
pub mod cancel;
pub mod error;
mod kmeans;
pub mod mark;
pub mod options;
mod pipeline;
pub mod surface;

use std::sync::Arc;

use image::DynamicImage;

use self::batch::Batch;
use self::cancel::CancelToken;
use self::error::WatermarkError;
use self::mark::{EmbedMark, ExtractMark, MarkDecoder};
use self::options::Options;
use self::pipeline::PlaneSource;
use self::surface::{Geometry, ImageSurface, Rgba64Image};
use crate::transform::dct::DctCache;

/// Blind watermark embed/extract engine.
///
/// Cheap to clone; clones share the DCT basis cache.
#[derive(Clone)]
pub struct Watermark {
    options: Options,
    cache: Arc<DctCache>,
}

impl Watermark {
    /// Build an engine from validated options.
    ///
    /// # Errors
    /// [`WatermarkError::InvalidOptions`] for out-of-range strengths.
    pub fn new(options: Options) -> Result<Self, WatermarkError> {
        options.validate()?;
        Ok(Self {
            options,
            cache: Arc::new(DctCache::new()),
        })
    }

    /// Embed `mark` into `src`, returning a fresh 16-bit RGBA image of the
    /// same bounds. The source image is not modified.
    ///
    /// # Errors
    /// - [`WatermarkError::ImageTooSmall`] when the image holds fewer blocks
    ///   than the mark has bits (checked before any pixel is read).
    /// - [`WatermarkError::Cancelled`] when the token fires.
    pub fn embed(
        &self,
        cancel: &CancelToken,
        src: &DynamicImage,
        mark: &dyn EmbedMark,
    ) -> Result<Rgba64Image, WatermarkError> {
        let geom = Geometry::new(src.width() as usize, src.height() as usize);
        pipeline::check_capacity(geom, self.options.shape(), mark.len())?;
        cancel.check()?;

        let ImageSurface { geom, alpha, planes } = ImageSurface::from_image(src);
        pipeline::embed(
            cancel,
            geom,
            &alpha,
            PlaneSource::Spatial(planes),
            mark,
            self.options.shape(),
            self.options.strength(),
            &self.cache,
        )
    }

    /// Extract the bits described by `spec` from `src` and hand them to the
    /// spec's decoder factory.
    ///
    /// Extraction always produces a bit vector once the capacity check
    /// passes; robustness comes from repeated embedding plus vote averaging,
    /// so individual bit errors are the codec's problem to correct.
    ///
    /// # Errors
    /// - [`WatermarkError::ImageTooSmall`] when the image cannot hold
    ///   `spec.len()` bits at the configured block shape.
    /// - [`WatermarkError::MarkContract`] when the spec rejects the vector.
    /// - [`WatermarkError::Cancelled`] when the token fires.
    pub fn extract(
        &self,
        cancel: &CancelToken,
        src: &DynamicImage,
        spec: &dyn ExtractMark,
    ) -> Result<Box<dyn MarkDecoder>, WatermarkError> {
        let geom = Geometry::new(src.width() as usize, src.height() as usize);
        pipeline::check_capacity(geom, self.options.shape(), spec.len())?;
        cancel.check()?;

        let ImageSurface { geom, planes, .. } = ImageSurface::from_image(src);
        let bits = pipeline::extract(
            cancel,
            geom,
            PlaneSource::Spatial(planes),
            spec.len(),
            self.options.shape(),
            self.options.strength(),
            &self.cache,
        )?;
        spec.new_decoder(bits)
    }

    /// Capture `src` for repeated embed/extract calls. The batch shares
    /// this engine's DCT cache; per-call options are passed to the batch
    /// operations themselves.
    pub fn batch(&self, src: &DynamicImage) -> Batch {
        Batch::new(src, Arc::clone(&self.cache))
    }
}

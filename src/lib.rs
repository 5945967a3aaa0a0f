// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/wmark-core

//! # wmark-core
//!
//! Blind digital image watermarking engine. Embeds an arbitrary bit sequence
//! into an RGB image so that the bits survive lossy re-encoding, and extracts
//! them again without access to the original image.
//!
//! The pipeline per color channel: one-level Haar DWT → block-major split of
//! the low-pass subband → per-block DCT → SVD → quantization of the top
//! singular value(s) → inverse transforms. Short marks are repeated across
//! all blocks; extraction averages the per-block votes and classifies them
//! with a 1-D 2-means pass. The three YUV channels are processed in parallel.
//!
//! What a mark's bits *mean* is not this crate's business: the mark codec
//! (signatures, error correction, shuffling) lives behind the [`EmbedMark`] /
//! [`ExtractMark`] capability traits and is supplied by the caller.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use wmark_core::{Watermark, Options, CancelToken};
//!
//! let engine = Watermark::new(Options::new().block_shape(8, 8).strength_d1_d2(36, 20))?;
//! let cancel = CancelToken::new();
//! let marked = engine.embed(&cancel, &cover_image, &my_mark)?;
//! let decoder = engine.extract(&cancel, &marked_image, &my_mark_spec)?;
//! let recovered = decoder.decode_bytes();
//! ```

pub mod engine;
pub mod transform;

pub use engine::batch::Batch;
pub use engine::cancel::CancelToken;
pub use engine::error::WatermarkError;
pub use engine::mark::{EmbedMark, ExtractMark, MarkBits, MarkDecoder};
pub use engine::options::{BlockShape, Options};
pub use engine::surface::Rgba64Image;
pub use engine::Watermark;
pub use transform::dct::{Dct, DctCache};
pub use transform::svd::{Svd, SvdError};

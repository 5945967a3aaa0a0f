// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/wmark-core

//! Mark capability traits.
//!
//! The engine treats a mark as a circular bit source of known length —
//! nothing more. How those bits were produced (signatures, error-correcting
//! codes, shuffles) and how extracted bits are interpreted is entirely the
//! caller's codec, plugged in through these traits. The crate ships no
//! implementation of them.

use super::error::WatermarkError;

/// Common length contract of a mark.
pub trait MarkBits {
    /// Number of bits carried through the image, after whatever redundancy
    /// the codec applies. This drives the capacity check and the vote count.
    fn len(&self) -> usize;

    /// Logical bit length of the original payload, before redundancy.
    /// Informational for the codec; the engine does not interpret it.
    fn extract_size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A mark to embed. Shared across the three channel workers.
pub trait EmbedMark: MarkBits + Sync {
    /// Bit at position `at` as a float in `{0.0, 1.0}`. The engine always
    /// calls this with `at < len()`; implementations that wrap indices
    /// modulo `len()` are equivalent.
    fn bit(&self, at: usize) -> f64;
}

/// The expected shape of a mark to extract, plus its decoder factory.
pub trait ExtractMark: MarkBits {
    /// Wrap the extracted bit vector (one byte per bit, each 0 or 1,
    /// `bits.len() == self.len()`) in the codec's decoder.
    ///
    /// # Errors
    /// Implementations should return [`WatermarkError::MarkContract`] when
    /// the vector length does not match the expected bit count.
    fn new_decoder(&self, bits: Vec<u8>) -> Result<Box<dyn MarkDecoder>, WatermarkError>;
}

/// Decodes an extracted bit vector into caller-facing bytes.
pub trait MarkDecoder {
    fn decode_bytes(&self) -> Vec<u8>;
    fn decode_string(&self) -> String;
}

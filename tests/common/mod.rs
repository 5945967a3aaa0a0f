// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/wmark-core

//! Shared fixtures for the integration suite: a raw pass-through mark codec
//! and deterministic test images.

#![allow(dead_code)]

use image::{DynamicImage, ImageBuffer, Rgba};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use wmark_core::{EmbedMark, ExtractMark, MarkBits, MarkDecoder, WatermarkError};

/// Raw mark: one embedded bit per payload bit, MSB first, no redundancy.
/// The simplest possible codec behind the mark traits.
pub struct RawMark {
    bytes: Vec<u8>,
}

impl RawMark {
    pub fn new(bytes: &[u8]) -> Self {
        Self { bytes: bytes.to_vec() }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(text.as_bytes())
    }

    /// The bit vector this mark embeds, for comparisons.
    pub fn bits(&self) -> Vec<u8> {
        (0..self.len()).map(|at| self.bit(at) as u8).collect()
    }
}

impl MarkBits for RawMark {
    fn len(&self) -> usize {
        self.bytes.len() * 8
    }

    fn extract_size(&self) -> usize {
        self.len()
    }
}

impl EmbedMark for RawMark {
    fn bit(&self, at: usize) -> f64 {
        let at = at % self.len();
        ((self.bytes[at / 8] >> (7 - at % 8)) & 1) as f64
    }
}

impl ExtractMark for RawMark {
    fn new_decoder(&self, bits: Vec<u8>) -> Result<Box<dyn MarkDecoder>, WatermarkError> {
        if bits.len() != self.len() {
            return Err(WatermarkError::MarkContract {
                expected: self.len(),
                actual: bits.len(),
            });
        }
        Ok(Box::new(RawDecoder { bits }))
    }
}

pub struct RawDecoder {
    bits: Vec<u8>,
}

impl RawDecoder {
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }
}

impl MarkDecoder for RawDecoder {
    fn decode_bytes(&self) -> Vec<u8> {
        self.bits
            .chunks(8)
            .map(|byte| byte.iter().fold(0u8, |acc, &b| (acc << 1) | (b & 1)))
            .collect()
    }

    fn decode_string(&self) -> String {
        String::from_utf8_lossy(&self.decode_bytes()).into_owned()
    }
}

/// Uniform gray cover image.
pub fn solid_gray(width: u32, height: u32, level: u8) -> DynamicImage {
    let img = ImageBuffer::from_pixel(width, height, Rgba([level, level, level, 255u8]));
    DynamicImage::ImageRgba8(img)
}

/// Photo-like cover: a seeded coarse lattice of random levels, bilinearly
/// interpolated, with a small deterministic texture on top.
pub fn pseudo_photo(width: u32, height: u32, seed: u64) -> DynamicImage {
    const CELL: u32 = 16;
    let gw = (width / CELL + 2) as usize;
    let gh = (height / CELL + 2) as usize;
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let grid: Vec<[f32; 3]> = (0..gw * gh)
        .map(|_| {
            [
                rng.gen_range(30.0..225.0),
                rng.gen_range(30.0..225.0),
                rng.gen_range(30.0..225.0),
            ]
        })
        .collect();

    let img = ImageBuffer::from_fn(width, height, |x, y| {
        let fx = x as f32 / CELL as f32;
        let fy = y as f32 / CELL as f32;
        let (x0, y0) = (fx as usize, fy as usize);
        let (tx, ty) = (fx - x0 as f32, fy - y0 as f32);
        let texture = ((x * 7919 + y * 104_729) % 7) as f32 - 3.0;

        let mut px = [0u8; 4];
        px[3] = 255;
        for c in 0..3 {
            let top = grid[y0 * gw + x0][c] * (1.0 - tx) + grid[y0 * gw + x0 + 1][c] * tx;
            let bottom =
                grid[(y0 + 1) * gw + x0][c] * (1.0 - tx) + grid[(y0 + 1) * gw + x0 + 1][c] * tx;
            let v = top * (1.0 - ty) + bottom * ty + texture;
            px[c] = v.clamp(0.0, 255.0) as u8;
        }
        Rgba(px)
    });
    DynamicImage::ImageRgba8(img)
}

/// Fraction of positions where the two bit vectors agree.
pub fn bit_accuracy(a: &[u8], b: &[u8]) -> f64 {
    assert_eq!(a.len(), b.len(), "bit vectors differ in length");
    let matches = a.iter().zip(b).filter(|(x, y)| x == y).count();
    matches as f64 / a.len() as f64
}

/// Fraction of agreeing bits between two byte payloads of equal length.
pub fn byte_bit_accuracy(a: &[u8], b: &[u8]) -> f64 {
    assert_eq!(a.len(), b.len(), "payloads differ in length");
    let differing: u32 = a.iter().zip(b).map(|(x, y)| (x ^ y).count_ones()).sum();
    1.0 - differing as f64 / (a.len() * 8) as f64
}

// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/wmark-core

//! Pixel surface: the bridge between `image` types and the YUV planes.
//!
//! Decomposes a source image into three row-major `f32` planes (Y, U, V)
//! plus a 16-bit alpha plane carried through untouched, and recomposes a
//! 16-bit RGBA image of the same bounds after the pipeline ran. Incoming
//! 16-bit samples are reduced to their 8-bit high byte, matching the 0–255
//! domain of the color math.

use image::{DynamicImage, ImageBuffer, Rgba};

use crate::transform::yuv;

/// 16-bit-per-channel RGBA image, the embed output format.
pub type Rgba64Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// Pixel geometry shared by every stage of one call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Geometry {
    pub width: usize,
    pub height: usize,
    /// Wavelet extent: `(width + 1) / 2`.
    pub wave_w: usize,
    /// Wavelet extent: `(height + 1) / 2`.
    pub wave_h: usize,
}

impl Geometry {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            wave_w: (width + 1) / 2,
            wave_h: (height + 1) / 2,
        }
    }
}

/// One decomposed image: geometry, alpha, and the three YUV planes.
#[derive(Debug)]
pub(crate) struct ImageSurface {
    pub geom: Geometry,
    pub alpha: Vec<u16>,
    /// Y, U, V planes in row-major order.
    pub planes: [Vec<f32>; 3],
}

impl ImageSurface {
    pub fn from_image(src: &DynamicImage) -> Self {
        let rgba = src.to_rgba16();
        let geom = Geometry::new(rgba.width() as usize, rgba.height() as usize);
        let area = geom.width * geom.height;

        let mut y_plane = vec![0.0f32; area];
        let mut u_plane = vec![0.0f32; area];
        let mut v_plane = vec![0.0f32; area];
        let mut alpha = vec![0u16; area];

        for (i, px) in rgba.pixels().enumerate() {
            let [r, g, b, a] = px.0;
            let (y, u, v) = yuv::to_yuv((r >> 8) as f32, (g >> 8) as f32, (b >> 8) as f32);
            y_plane[i] = y;
            u_plane[i] = u;
            v_plane[i] = v;
            alpha[i] = a;
        }

        Self {
            geom,
            alpha,
            planes: [y_plane, u_plane, v_plane],
        }
    }
}

/// Recompose processed YUV planes and the preserved alpha into a fresh
/// 16-bit RGBA image.
pub(crate) fn compose_rgba64(geom: Geometry, alpha: &[u16], planes: &[Vec<f32>; 3]) -> Rgba64Image {
    let mut out: Rgba64Image = ImageBuffer::new(geom.width as u32, geom.height as u32);
    let [y_plane, u_plane, v_plane] = planes;
    for (i, px) in out.pixels_mut().enumerate() {
        let (r, g, b) = yuv::to_rgb16(y_plane[i], u_plane[i], v_plane[i]);
        *px = Rgba([r, g, b, alpha[i]]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient_image(width: u32, height: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            let b = ((x + y) * 255 / (width + height).max(1)) as u8;
            image::Rgba([r, g, b, 255])
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn geometry_wave_extent_rounds_up() {
        let g = Geometry::new(854, 480);
        assert_eq!((g.wave_w, g.wave_h), (427, 240));
        let g = Geometry::new(101, 53);
        assert_eq!((g.wave_w, g.wave_h), (51, 27));
    }

    #[test]
    fn surface_roundtrip_preserves_pixels_within_tolerance() {
        let src = gradient_image(32, 24);
        let surface = ImageSurface::from_image(&src);
        let out = compose_rgba64(surface.geom, &surface.alpha, &surface.planes);

        let rgba = src.to_rgba16();
        assert_eq!(out.dimensions(), rgba.dimensions());
        for (a, b) in rgba.pixels().zip(out.pixels()) {
            for c in 0..3 {
                let diff = (a.0[c] as i32 - b.0[c] as i32).abs();
                assert!(diff <= 512, "channel {c}: {} vs {}", a.0[c], b.0[c]);
            }
            assert_eq!(a.0[3], b.0[3], "alpha must be exact");
        }
    }

    #[test]
    fn alpha_is_carried_verbatim() {
        let img = ImageBuffer::from_fn(8, 8, |x, y| {
            Rgba([128u16 * 257, 64 * 257, 32 * 257, (x * 8 + y) as u16 * 1000])
        });
        let surface = ImageSurface::from_image(&DynamicImage::ImageRgba16(img.clone()));
        let out = compose_rgba64(surface.geom, &surface.alpha, &surface.planes);
        for (a, b) in img.pixels().zip(out.pixels()) {
            assert_eq!(a.0[3], b.0[3]);
        }
    }
}

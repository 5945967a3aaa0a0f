// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/wmark-core

//! End-to-end embed/extract round trips on uncompressed images.

mod common;

use common::{pseudo_photo, solid_gray, RawMark};
use image::DynamicImage;
use wmark_core::{CancelToken, MarkBits, Options, Watermark, WatermarkError};

#[test]
fn solid_gray_roundtrip_is_exact() {
    let mark = RawMark::from_text("Test-Mark"); // 72 bits
    let engine = Watermark::new(Options::new().block_shape(4, 4).strength_d1_d2(21, 11)).unwrap();
    let cancel = CancelToken::new();

    let cover = solid_gray(200, 200, 128);
    let marked = engine.embed(&cancel, &cover, &mark).unwrap();
    assert_eq!(marked.dimensions(), (200, 200));

    let decoder = engine
        .extract(&cancel, &DynamicImage::ImageRgba16(marked), &mark)
        .unwrap();
    assert_eq!(decoder.decode_bytes(), b"Test-Mark".to_vec());
    assert_eq!(decoder.decode_string(), "Test-Mark");
}

#[test]
fn repeat_embedding_recovers_short_mark() {
    // 8 bits over a 1920x1080 cover: every bit lands in ~4000 blocks per
    // channel, so the per-bit averages separate sharply.
    let mark = RawMark::new(&[0b1011_0010]);
    let engine = Watermark::new(Options::new().block_shape(8, 8)).unwrap();
    let cancel = CancelToken::new();

    let cover = pseudo_photo(1920, 1080, 11);
    let marked = engine.embed(&cancel, &cover, &mark).unwrap();
    let decoder = engine
        .extract(&cancel, &DynamicImage::ImageRgba16(marked), &mark)
        .unwrap();
    assert_eq!(decoder.decode_bytes(), vec![0b1011_0010]);
}

#[test]
fn extraction_is_idempotent() {
    let mark = RawMark::from_text("idem");
    let engine = Watermark::new(Options::new().block_shape(8, 8).strength_d1_d2(21, 9)).unwrap();
    let cancel = CancelToken::new();

    let marked = DynamicImage::ImageRgba16(
        engine
            .embed(&cancel, &pseudo_photo(420, 300, 5), &mark)
            .unwrap(),
    );
    let first = engine.extract(&cancel, &marked, &mark).unwrap().decode_bytes();
    let second = engine.extract(&cancel, &marked, &mark).unwrap().decode_bytes();
    assert_eq!(first, second, "extraction must be deterministic");
}

#[test]
fn capacity_rejection() {
    // 100x100 at block shape (8,8): wavelet extent 50x50, canonical blocks
    // 4x4 → 12·12 = 144 blocks, far below 728 mark bits.
    let mark = RawMark::new(&[0xA5; 91]); // 728 bits
    let engine = Watermark::new(Options::new().block_shape(8, 8)).unwrap();
    let cancel = CancelToken::new();
    let cover = solid_gray(100, 100, 90);

    match engine.embed(&cancel, &cover, &mark) {
        Err(WatermarkError::ImageTooSmall { total_blocks, mark_len }) => {
            assert_eq!(total_blocks, 144);
            assert_eq!(mark_len, 728);
        }
        other => panic!("expected ImageTooSmall, got {:?}", other.map(|_| ())),
    }
    assert!(matches!(
        engine.extract(&cancel, &cover, &mark),
        Err(WatermarkError::ImageTooSmall { .. })
    ));
}

#[test]
fn capacity_boundary_accepts_exact_fit() {
    // 64x64 → wavelet 32x32 → 8·8 = 64 blocks at (4,4) canonical (2,2)...
    let engine = Watermark::new(Options::new().block_shape(4, 4)).unwrap();
    let cancel = CancelToken::new();
    // (2,2) blocks on a 32x32 extent: 16·16 = 256 blocks; a 256-bit mark
    // fits exactly, one more bit does not.
    let fits = RawMark::new(&[0x3C; 32]);
    assert_eq!(fits.len(), 256);
    assert!(engine.embed(&cancel, &solid_gray(64, 64, 100), &fits).is_ok());

    let overflows = RawMark::new(&[0x3C; 33]);
    assert!(matches!(
        engine.embed(&cancel, &solid_gray(64, 64, 100), &overflows),
        Err(WatermarkError::ImageTooSmall { total_blocks: 256, mark_len: 264 })
    ));
}

#[test]
fn empty_mark_rejected() {
    let engine = Watermark::new(Options::new()).unwrap();
    let cancel = CancelToken::new();
    let mark = RawMark::new(&[]);
    assert!(matches!(
        engine.embed(&cancel, &solid_gray(64, 64, 100), &mark),
        Err(WatermarkError::EmptyMark)
    ));
}

#[test]
fn invalid_strength_rejected_at_construction() {
    assert!(matches!(
        Watermark::new(Options::new().strength_d1(-1)),
        Err(WatermarkError::InvalidOptions(_))
    ));
    assert!(matches!(
        Watermark::new(Options::new().strength_d1_d2(-5, 9)),
        Err(WatermarkError::InvalidOptions(_))
    ));
    // Zero is "unset": it falls back to the default strength.
    assert!(Watermark::new(Options::new().strength_d1(0)).is_ok());
}

#[test]
fn pre_cancelled_token_aborts_before_work() {
    let engine = Watermark::new(Options::new()).unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();
    let mark = RawMark::from_text("x");
    assert!(matches!(
        engine.embed(&cancel, &solid_gray(128, 128, 100), &mark),
        Err(WatermarkError::Cancelled)
    ));
    assert!(matches!(
        engine.extract(&cancel, &solid_gray(128, 128, 100), &mark),
        Err(WatermarkError::Cancelled)
    ));
}

#[test]
fn alpha_survives_embedding() {
    let mark = RawMark::from_text("a");
    let engine = Watermark::new(Options::new().block_shape(4, 4)).unwrap();
    let cancel = CancelToken::new();

    // Build a cover with a non-trivial alpha ramp.
    let cover = image::ImageBuffer::from_fn(96, 96, |x, y| {
        image::Rgba([120u8, 130, 140, (128 + (x + y) % 128) as u8])
    });
    let cover = DynamicImage::ImageRgba8(cover);
    let expected = cover.to_rgba16();

    let marked = engine.embed(&cancel, &cover, &mark).unwrap();
    for (a, b) in expected.pixels().zip(marked.pixels()) {
        assert_eq!(a.0[3], b.0[3], "alpha must pass through bit-exact");
    }
}

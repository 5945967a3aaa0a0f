// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/wmark-core

//! Numerical building blocks of the watermarking pipeline.
//!
//! Everything in this module is pure math over plain slices — no image
//! types, no threads, no shared state except the explicit [`dct::DctCache`].
//! The engine module wires these pieces together.

pub mod blockmap;
pub mod dct;
pub mod dwt;
pub mod svd;
pub mod yuv;

// SPDX-FileCopyrightText: 2025 barry contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tiled software triangle rasterizer.
//!
//! Renders textured, perspective-corrected, z-buffered, Gouraud-shaded
//! triangles into a 32-bit ARGB color surface with a 16-bit depth surface.
//! Work proceeds in 8x8 pixel tiles: per-triangle edge equations in
//! sub-pixel fixed point gate coverage, a conservative walk over the
//! bounding box rejects empty tiles, and a pixel kernel fills the rest.
//!
//! Two kernels share the same contract. The exact kernel evaluates eight
//! pixels at a time with true per-pixel perspective division and a gathered
//! texel fetch. The approximate kernel is a scalar loop that forward-
//! differences texture coordinates directly in swizzled (block-tiled) texel
//! space, so each per-pixel update is an add and a mask.
//!
//! The draw path is infallible: every caller contract (tile-aligned
//! viewport, power-of-two textures, positive `1/z`) is validated when the
//! collaborator objects are built, never per pixel.

pub mod context;
mod edge;
mod gradient;
pub mod kernel;
pub mod rasterizer;
pub mod simd;
pub mod swizzle;

pub use context::{ContextError, RasterContext};
pub use kernel::{BlendMode, KernelMode};
pub use rasterizer::{draw_face, DrawOptions, Face};
pub use swizzle::{swizzle_mip, swizzle_texel_index};

// SPDX-FileCopyrightText: 2025 barry contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Draw-call context: destination surfaces, viewport, and texture binding.
//!
//! The color and depth planes are two explicit, separately addressed
//! buffers with their own per-row strides. Construction validates the
//! caller contracts once — tile-aligned viewport, strides and buffer
//! lengths that cover it — so the draw path itself never fails.

use barry_common::{is_tile_aligned, Texture, VideoSettings};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("viewport {width}x{height} is not tile-aligned")]
    MisalignedViewport { width: usize, height: usize },
    #[error("{surface} stride {stride} is smaller than the viewport width {width}")]
    StrideTooSmall {
        surface: &'static str,
        stride: usize,
        width: usize,
    },
    #[error("{surface} buffer holds {len} texels, the viewport needs {required}")]
    BufferTooSmall {
        surface: &'static str,
        len: usize,
        required: usize,
    },
}

/// Destination state for draw calls over one frame.
///
/// Borrows the color surface (32-bit ARGB, little-endian) and the depth
/// surface (16 bits, larger = closer, empty = 0) mutably for its lifetime;
/// textures must not alias either surface.
pub struct RasterContext<'a> {
    pub(crate) color: &'a mut [u32],
    pub(crate) color_stride: usize,
    pub(crate) depth: &'a mut [u16],
    pub(crate) depth_stride: usize,
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) zscale: f32,
}

impl<'a> RasterContext<'a> {
    /// Wrap destination surfaces for the viewport in `settings`. Strides
    /// are in texels per row.
    pub fn new(
        color: &'a mut [u32],
        color_stride: usize,
        depth: &'a mut [u16],
        depth_stride: usize,
        settings: &VideoSettings,
    ) -> Result<Self, ContextError> {
        let (width, height) = (settings.xres, settings.yres);
        if width == 0 || height == 0 || !is_tile_aligned(width) || !is_tile_aligned(height) {
            return Err(ContextError::MisalignedViewport { width, height });
        }
        Self::check_surface("color", color.len(), color_stride, width, height)?;
        Self::check_surface("depth", depth.len(), depth_stride, width, height)?;
        Ok(Self {
            color,
            color_stride,
            depth,
            depth_stride,
            width,
            height,
            zscale: settings.zscale,
        })
    }

    fn check_surface(
        surface: &'static str,
        len: usize,
        stride: usize,
        width: usize,
        height: usize,
    ) -> Result<(), ContextError> {
        if stride < width {
            return Err(ContextError::StrideTooSmall {
                surface,
                stride,
                width,
            });
        }
        let required = (height - 1) * stride + width;
        if len < required {
            return Err(ContextError::BufferTooSmall {
                surface,
                len,
                required,
            });
        }
        Ok(())
    }

    /// Viewport width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Viewport height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }
}

/// Texture state bound for one face draw: one mip's texels plus the sizes,
/// masks, and coordinate scale factors derived from its dimensions.
pub(crate) struct MipBinding<'a> {
    pub texels: &'a [u32],
    pub log_width: u32,
    pub log_height: u32,
    pub umask: u32,
    pub vmask: u32,
    pub u_scale: f32,
    pub v_scale: f32,
}

impl<'a> MipBinding<'a> {
    pub fn new(texture: &'a Texture, level: u32) -> Option<Self> {
        let texels = texture.mip(level)?;
        let log_width = texture.log_width() - level;
        let log_height = texture.log_height() - level;
        Some(Self {
            texels,
            log_width,
            log_height,
            umask: (1u32 << log_width) - 1,
            vmask: (1u32 << log_height) - 1,
            u_scale: (1u32 << log_width) as f32,
            v_scale: (1u32 << log_height) as f32,
        })
    }
}

// SPDX-FileCopyrightText: 2025 barry contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Edge function setup.
//!
//! Converts a screen triangle into three edge equations in sub-pixel fixed
//! point, anchored at the tile-grid origin of the triangle's clamped
//! bounding box. A pixel is covered when all three edge values are >= 0;
//! the orientation makes that hold for clockwise triangles in y-down screen
//! space. Edges that are not top or left edges get a -1 bias folded into
//! their anchor value, so a pixel exactly on a shared edge is owned by
//! exactly one of the two triangles and the kernels keep the branch-free
//! `(a | b | c) >= 0` test.

use barry_common::{Vertex, TILE_SIZE};

use crate::simd::{orient2d, SUBPIXEL_BITS, SUBPIXEL_SCALE};

const TILE: i32 = TILE_SIZE as i32;

/// Edge equations and tile bounds for one triangle.
///
/// `a0`/`b0`/`c0` are the edge values at the pixel anchoring the tile walk,
/// already biased per the fill rule; the `d*dx`/`d*dy` values are per-pixel
/// steps.
pub(crate) struct EdgeSetup {
    pub tile_min_x: i32,
    pub tile_max_x: i32,
    pub tile_min_y: i32,
    pub tile_max_y: i32,
    pub a0: i32,
    pub dadx: i32,
    pub dady: i32,
    pub b0: i32,
    pub dbdx: i32,
    pub dbdy: i32,
    pub c0: i32,
    pub dcdx: i32,
    pub dcdy: i32,
}

/// Screen position to sub-pixel fixed point, round-to-nearest.
#[inline]
fn subpixel(p: f32) -> i32 {
    (p * SUBPIXEL_SCALE + 0.5) as i32
}

/// Fill-rule bias for an edge with per-pixel steps `(dkdx, dkdy)`.
///
/// With inside = "edge value >= 0", a left edge descends the screen
/// (`dkdx > 0` under this orientation) and a top edge is horizontal with
/// the interior below it (`dkdx == 0, dkdy > 0`). Those keep the inclusive
/// test; every other edge is nudged exclusive.
#[inline]
fn fill_bias(dkdx: i32, dkdy: i32) -> i32 {
    if dkdx > 0 || (dkdx == 0 && dkdy > 0) {
        0
    } else {
        -1
    }
}

impl EdgeSetup {
    pub fn new(v1: &Vertex, v2: &Vertex, v3: &Vertex, width: usize, height: usize) -> Self {
        let clamp_x = |p: f32| (p as i32).clamp(0, width as i32 - 1);
        let clamp_y = |p: f32| (p as i32).clamp(0, height as i32 - 1);

        let tile_min_x = clamp_x(v1.px.min(v2.px).min(v3.px)) / TILE;
        let tile_max_x = clamp_x(v1.px.max(v2.px).max(v3.px)) / TILE;
        let tile_min_y = clamp_y(v1.py.min(v2.py).min(v3.py)) / TILE;
        let tile_max_y = clamp_y(v1.py.max(v2.py).max(v3.py)) / TILE;

        let v1x = subpixel(v1.px);
        let v1y = subpixel(v1.py);
        let v2x = subpixel(v2.px);
        let v2y = subpixel(v2.py);
        let v3x = subpixel(v3.px);
        let v3y = subpixel(v3.py);

        let dadx = v2y - v1y;
        let dady = v1x - v2x;
        let dbdx = v3y - v2y;
        let dbdy = v2x - v3x;
        let dcdx = v1y - v3y;
        let dcdy = v3x - v1x;

        // Anchor at the origin of the first tile, in sub-pixel units.
        let x0 = (tile_min_x * TILE) << SUBPIXEL_BITS;
        let y0 = (tile_min_y * TILE) << SUBPIXEL_BITS;

        let a0 = orient2d(v2x, v2y, v1x, v1y, x0, y0) + fill_bias(dadx, dady);
        let b0 = orient2d(v3x, v3y, v2x, v2y, x0, y0) + fill_bias(dbdx, dbdy);
        let c0 = orient2d(v1x, v1y, v3x, v3y, x0, y0) + fill_bias(dcdx, dcdy);

        Self {
            tile_min_x,
            tile_max_x,
            tile_min_y,
            tile_max_y,
            a0,
            dadx,
            dady,
            b0,
            dbdx,
            dbdy,
            c0,
            dcdx,
            dcdy,
        }
    }

    /// Evaluate the (biased) edge values at an absolute pixel position.
    /// Reference path for the kernels' incremental evaluation.
    #[cfg(test)]
    pub fn at(&self, px: i32, py: i32) -> (i32, i32, i32) {
        let dx = px - self.tile_min_x * TILE;
        let dy = py - self.tile_min_y * TILE;
        (
            self.a0 + self.dadx * dx + self.dady * dy,
            self.b0 + self.dbdx * dx + self.dbdy * dy,
            self.c0 + self.dcdx * dx + self.dcdy * dy,
        )
    }
}

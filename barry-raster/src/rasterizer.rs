// SPDX-FileCopyrightText: 2025 barry contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Triangle and face rasterization.
//!
//! `draw_face` is the per-face entry point: it binds one texture mip, fans
//! the polygon from vertex 0, and feeds each non-degenerate triangle
//! through the tile walker. The walker visits every 8x8 tile of the
//! triangle's clamped bounding box, trivially rejects tiles whose
//! best-case edge values stay negative, and hands the survivors to the
//! selected pixel kernel with attribute values extrapolated to the tile
//! origin.

use barry_common::{Texture, Vertex, TILE_SIZE};
use log::{trace, warn};

use crate::context::{MipBinding, RasterContext};
use crate::edge::EdgeSetup;
use crate::gradient::AttributeGradients;
use crate::kernel::{fill_tile_approx, fill_tile_exact, BlendMode, KernelMode};

const TILE: i32 = TILE_SIZE as i32;

/// A textured polygon face, as handed over by the polygon feeder.
pub struct Face<'a> {
    pub texture: &'a Texture,
}

/// Per-draw-call options.
#[derive(Debug, Clone, Copy)]
pub struct DrawOptions {
    pub mip_level: u32,
    pub kernel: KernelMode,
    pub blend: BlendMode,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            mip_level: 0,
            kernel: KernelMode::Exact,
            blend: BlendMode::Overwrite,
        }
    }
}

/// Edge and attribute state at the origin of one accepted tile.
pub(crate) struct TileState {
    pub x: i32,
    pub y: i32,
    pub a0: i32,
    pub b0: i32,
    pub c0: i32,
    pub rz0: f32,
    pub uz0: f32,
    pub vz0: f32,
    pub lr0: f32,
    pub lg0: f32,
    pub lb0: f32,
}

/// Rasterize one face.
///
/// The face is triangulated as a fan from vertex 0; triangles whose edge
/// matrix is near-singular are skipped. Vertices must already be clipped
/// to the viewport's depth range (`rz > 0`).
pub fn draw_face(
    ctx: &mut RasterContext<'_>,
    face: &Face<'_>,
    vertices: &[Vertex],
    options: &DrawOptions,
) {
    if vertices.len() < 3 {
        return;
    }
    let Some(tex) = MipBinding::new(face.texture, options.mip_level) else {
        warn!(
            "draw_face: mip level {} out of range ({} available), face skipped",
            options.mip_level,
            face.texture.mip_count()
        );
        return;
    };
    trace!(
        "draw_face: {} vertices, mip {}, {:?}/{:?}",
        vertices.len(),
        options.mip_level,
        options.kernel,
        options.blend
    );

    for i in 2..vertices.len() {
        let v1 = &vertices[0];
        let v2 = &vertices[i - 1];
        let v3 = &vertices[i];
        let Some(grads) = AttributeGradients::solve(v1, v2, v3) else {
            continue;
        };
        rasterize_triangle(ctx, &tex, v1, v2, v3, &grads, options);
    }
}

fn rasterize_triangle(
    ctx: &mut RasterContext<'_>,
    tex: &MipBinding<'_>,
    v1: &Vertex,
    v2: &Vertex,
    v3: &Vertex,
    grads: &AttributeGradients,
    options: &DrawOptions,
) {
    let edges = EdgeSetup::new(v1, v2, v3, ctx.width, ctx.height);

    // Worst-case in-tile gain of each edge value, for the trivial reject.
    let gain_a = edges.dadx.max(0) * TILE + edges.dady.max(0) * TILE;
    let gain_b = edges.dbdx.max(0) * TILE + edges.dbdy.max(0) * TILE;
    let gain_c = edges.dcdx.max(0) * TILE + edges.dcdy.max(0) * TILE;

    let mut row_a = edges.a0;
    let mut row_b = edges.b0;
    let mut row_c = edges.c0;

    for ty in edges.tile_min_y..=edges.tile_max_y {
        let mut a0 = row_a;
        let mut b0 = row_b;
        let mut c0 = row_c;

        for tx in edges.tile_min_x..=edges.tile_max_x {
            if ((a0 + gain_a) | (b0 + gain_b) | (c0 + gain_c)) >= 0 {
                let px = (tx * TILE) as f32;
                let py = (ty * TILE) as f32;
                let tile = TileState {
                    x: tx,
                    y: ty,
                    a0,
                    b0,
                    c0,
                    rz0: grads.rz.at(v1.rz, v1, px, py),
                    uz0: grads.uz.at(v1.uz, v1, px, py),
                    vz0: grads.vz.at(v1.vz, v1, px, py),
                    lr0: grads.lr.at(v1.lr, v1, px, py),
                    lg0: grads.lg.at(v1.lg, v1, px, py),
                    lb0: grads.lb.at(v1.lb, v1, px, py),
                };
                match (options.kernel, options.blend) {
                    (KernelMode::Exact, BlendMode::Overwrite) => {
                        fill_tile_exact::<false>(ctx, tex, &edges, grads, &tile)
                    }
                    (KernelMode::Exact, BlendMode::Xor) => {
                        fill_tile_exact::<true>(ctx, tex, &edges, grads, &tile)
                    }
                    (KernelMode::Affine, BlendMode::Overwrite) => {
                        fill_tile_approx::<false, false>(ctx, tex, &edges, grads, &tile)
                    }
                    (KernelMode::Affine, BlendMode::Xor) => {
                        fill_tile_approx::<false, true>(ctx, tex, &edges, grads, &tile)
                    }
                    (KernelMode::Quadratic, BlendMode::Overwrite) => {
                        fill_tile_approx::<true, false>(ctx, tex, &edges, grads, &tile)
                    }
                    (KernelMode::Quadratic, BlendMode::Xor) => {
                        fill_tile_approx::<true, true>(ctx, tex, &edges, grads, &tile)
                    }
                }
            }
            a0 += edges.dadx * TILE;
            b0 += edges.dbdx * TILE;
            c0 += edges.dcdx * TILE;
        }

        row_a += edges.dady * TILE;
        row_b += edges.dbdy * TILE;
        row_c += edges.dcdy * TILE;
    }
}

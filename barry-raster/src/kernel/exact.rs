// SPDX-FileCopyrightText: 2025 barry contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Exact pixel kernel: 8-wide SIMD with true perspective per pixel.
//!
//! A tile is eight 1x8 rows. Per row: coverage mask from the edge lanes,
//! reciprocal of the interpolated `1/z`, depth candidate against the
//! 16-bit depth row, perspective-correct texel coordinates, packed-swizzle
//! gather, masked color and depth stores. Rows with no live lanes fall
//! through with just the row advance.

use barry_common::TILE_SIZE;
use wide::{f32x8, i32x8, CmpGt};

use super::Z_BIAS;
use crate::context::{MipBinding, RasterContext};
use crate::edge::EdgeSetup;
use crate::gradient::AttributeGradients;
use crate::rasterizer::TileState;
use crate::simd::{
    f32x8_seq, gather_u32, i32x8_seq, load_u16x8, load_u32x8, recip, roundi, store_masked_u16,
    store_masked_u32,
};
use crate::swizzle::{packed_tile_u_x8, packed_tile_v_x8, swizzle_umask};

pub(crate) fn fill_tile_exact<const XOR: bool>(
    ctx: &mut RasterContext<'_>,
    tex: &MipBinding<'_>,
    edges: &EdgeSetup,
    grads: &AttributeGradients,
    tile: &TileState,
) {
    let sm = swizzle_umask(tex.log_height, tex.umask);

    let mut p_a = i32x8_seq(tile.a0, edges.dadx);
    let mut p_b = i32x8_seq(tile.b0, edges.dbdx);
    let mut p_c = i32x8_seq(tile.c0, edges.dcdx);
    let mut p_rz = f32x8_seq(tile.rz0, grads.rz.dx);
    let mut p_uz = f32x8_seq(tile.uz0, grads.uz.dx);
    let mut p_vz = f32x8_seq(tile.vz0, grads.vz.dx);

    let zscale = f32x8::splat(ctx.zscale);
    let u_scale = f32x8::splat(tex.u_scale);
    let v_scale = f32x8::splat(tex.v_scale);

    let px = tile.x as usize * TILE_SIZE;
    let py = tile.y as usize * TILE_SIZE;

    for y in 0..TILE_SIZE {
        let cover = (p_a | p_b | p_c).cmp_gt(i32x8::splat(-1));
        if cover.any() {
            let p_z = recip(p_rz);
            let z_cand = (i32x8::splat(Z_BIAS) - roundi(zscale * p_z))
                .max(i32x8::splat(0))
                .min(i32x8::splat(0xFFFF));

            let zrow_at = (py + y) * ctx.depth_stride + px;
            let zrow = &mut ctx.depth[zrow_at..zrow_at + TILE_SIZE];
            let mask = cover & z_cand.cmp_gt(load_u16x8(zrow));
            if mask.any() {
                store_masked_u16(zrow, z_cand, mask);

                let u = roundi(p_uz * p_z * u_scale);
                let v = roundi(p_vz * p_z * v_scale);
                let offsets =
                    packed_tile_u_x8(u, tex.log_height, sm) + packed_tile_v_x8(v, tex.vmask);
                let mut samples = gather_u32(tex.texels, offsets, mask);

                let row_at = (py + y) * ctx.color_stride + px;
                let row = &mut ctx.color[row_at..row_at + TILE_SIZE];
                if XOR {
                    samples = samples ^ load_u32x8(row);
                }
                store_masked_u32(row, samples, mask);
            }
        }

        p_a += i32x8::splat(edges.dady);
        p_b += i32x8::splat(edges.dbdy);
        p_c += i32x8::splat(edges.dcdy);
        p_rz += f32x8::splat(grads.rz.dy);
        p_uz += f32x8::splat(grads.uz.dy);
        p_vz += f32x8::splat(grads.vz.dy);
    }
}

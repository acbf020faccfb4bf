// SPDX-FileCopyrightText: 2025 barry contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Approximate pixel kernel: scalar loop, forward differences in swizzled
//! texel space.
//!
//! True perspective-correct texture coordinates are evaluated only at the
//! four tile corners, in 11-bit-fraction fixed point. First-order forward
//! differences interpolate them across the tile; under the quadratic mode a
//! second-order term bends the per-row deltas so the interpolation is
//! bilinear in the corner values. All coordinate state lives in V1 swizzled
//! form, so each per-pixel update is an add and a mask (the carry trick) and
//! the fetch is a single shift. Depth still divides per pixel; Gouraud
//! lights ride the same forward-difference scheme in plain fixed point.

use barry_common::TILE_SIZE;

use super::{quantize_z, Z_FRAC_BITS};
use crate::context::{MipBinding, RasterContext};
use crate::edge::EdgeSetup;
use crate::gradient::{AttributeGradients, Slope};
use crate::rasterizer::TileState;
use crate::swizzle::{
    tile_du, tile_du_fill, tile_dv, tile_u, tile_umask, tile_v, tile_vmask, TILE_DV_FILL,
};

/// One texel in the 11-bit coordinate fraction.
const UV_ONE: f32 = 2048.0;

/// Light fixed point: the byte multiplier sits in bits 11..=18, so full
/// light decodes to 255.
const LIGHT_SCALE: f32 = (255 << 11) as f32;

/// Modulate the three low bytes of an ARGB texel by the light channels.
#[inline]
fn modulate(texel: u32, lr: i32, lg: i32, lb: i32) -> u32 {
    let scale = |c: u32, chan: i32| (c * (((chan >> 11) & 0xff) as u32)) >> 8;
    let b = scale(texel & 0xff, lb);
    let g = scale((texel >> 8) & 0xff, lg);
    let r = scale((texel >> 16) & 0xff, lr);
    (texel & 0xff00_0000) | (r << 16) | (g << 8) | b
}

/// Corner values and forward differences of one interpolant: value at the
/// tile origin, x-delta, y-delta, and the second-order term.
#[inline]
fn forward_diffs<const QUADRATIC: bool>(f00: f32, f10: f32, f01: f32, f11: f32) -> (i32, i32, i32, i32) {
    let a = f00 as i32;
    let b = f10 as i32;
    let c = f01 as i32;
    let d = f11 as i32;
    let second = if QUADRATIC { (d - b - c + a) / 64 } else { 0 };
    (a, (b - a) / 8, (c - a) / 8, second)
}

pub(crate) fn fill_tile_approx<const QUADRATIC: bool, const XOR: bool>(
    ctx: &mut RasterContext<'_>,
    tex: &MipBinding<'_>,
    edges: &EdgeSetup,
    grads: &AttributeGradients,
    tile: &TileState,
) {
    let vbits = tex.log_height;
    let umask_swz = tile_umask(vbits, tex.umask);
    let vmask_swz = tile_vmask(tex.vmask);
    let du_fill = tile_du_fill(vbits);

    let t = TILE_SIZE as f32;
    let u_scale = tex.u_scale * UV_ONE;
    let v_scale = tex.v_scale * UV_ONE;

    // Perspective-correct texel coordinates at the four tile corners.
    let uv_corner = |dx: f32, dy: f32| {
        let rz = tile.rz0 + grads.rz.dx * dx + grads.rz.dy * dy;
        let uz = tile.uz0 + grads.uz.dx * dx + grads.uz.dy * dy;
        let vz = tile.vz0 + grads.vz.dx * dx + grads.vz.dy * dy;
        (uz / rz * u_scale, vz / rz * v_scale)
    };
    let (u00, v00) = uv_corner(0.0, 0.0);
    let (u10, v10) = uv_corner(t, 0.0);
    let (u01, v01) = uv_corner(0.0, t);
    let (u11, v11) = uv_corner(t, t);

    let (au, au10, au01, au11) = forward_diffs::<QUADRATIC>(u00, u10, u01, u11);
    let (av, av10, av01, av11) = forward_diffs::<QUADRATIC>(v00, v10, v01, v11);

    // Gouraud lights are planar already; corner evaluation keeps them on
    // the same interpolation scheme as the texture coordinates.
    let light_diffs = |base: f32, s: &Slope| {
        forward_diffs::<QUADRATIC>(
            base * LIGHT_SCALE,
            (base + s.dx * t) * LIGHT_SCALE,
            (base + s.dy * t) * LIGHT_SCALE,
            (base + (s.dx + s.dy) * t) * LIGHT_SCALE,
        )
    };
    let (mut lr0, mut lr10, lr01, lr11) = light_diffs(tile.lr0, &grads.lr);
    let (mut lg0, mut lg10, lg01, lg11) = light_diffs(tile.lg0, &grads.lg);
    let (mut lb0, mut lb10, lb01, lb11) = light_diffs(tile.lb0, &grads.lb);

    // Swizzled coordinate state. The second-order terms carry no fill bits;
    // after adding one into an x-delta the fill is restored by OR, keeping
    // the delta in carry-trick form.
    let mut u0 = tile_u(au as u32, vbits, tex.umask);
    let mut v0 = tile_v(av as u32, tex.vmask);
    let mut dux = tile_du(au10 as u32, vbits, tex.umask);
    let mut dvx = tile_dv(av10 as u32, tex.vmask);
    let duy = tile_du(au01 as u32, vbits, tex.umask);
    let dvy = tile_dv(av01 as u32, tex.vmask);
    let u11_swz = tile_u(au11 as u32, vbits, tex.umask);
    let v11_swz = tile_v(av11 as u32, tex.vmask);

    let mut a0 = tile.a0;
    let mut b0 = tile.b0;
    let mut c0 = tile.c0;
    let mut rz0 = tile.rz0;

    let px = tile.x as usize * TILE_SIZE;
    let py = tile.y as usize * TILE_SIZE;
    let zscale = ctx.zscale;

    for y in 0..TILE_SIZE {
        let row_at = (py + y) * ctx.color_stride + px;
        let row = &mut ctx.color[row_at..row_at + TILE_SIZE];
        let zrow_at = (py + y) * ctx.depth_stride + px;
        let zrow = &mut ctx.depth[zrow_at..zrow_at + TILE_SIZE];

        let (mut a, mut b, mut c) = (a0, b0, c0);
        let (mut u, mut v) = (u0, v0);
        let mut rz = rz0;
        let (mut lr, mut lg, mut lb) = (lr0, lg0, lb0);

        for x in 0..TILE_SIZE {
            if (a | b | c) >= 0 {
                let z = quantize_z(1.0 / rz, zscale);
                let wz = ((z >> Z_FRAC_BITS) & 0xffff) as u16;
                if wz > zrow[x] {
                    zrow[x] = wz;
                    let offset = (u.wrapping_add(v) >> 12) as usize;
                    let texel = tex.texels.get(offset).copied().unwrap_or(0);
                    let lit = modulate(texel, lr, lg, lb);
                    if XOR {
                        row[x] ^= lit;
                    } else {
                        row[x] = lit;
                    }
                }
            }

            a += edges.dadx;
            b += edges.dbdx;
            c += edges.dcdx;
            u = u.wrapping_add(dux) & umask_swz;
            v = v.wrapping_add(dvx) & vmask_swz;
            rz += grads.rz.dx;
            lr += lr10;
            lg += lg10;
            lb += lb10;
        }

        a0 += edges.dady;
        b0 += edges.dbdy;
        c0 += edges.dcdy;
        u0 = u0.wrapping_add(duy) & umask_swz;
        v0 = v0.wrapping_add(dvy) & vmask_swz;
        rz0 += grads.rz.dy;
        lr0 += lr01;
        lg0 += lg01;
        lb0 += lb01;

        if QUADRATIC {
            dux = dux.wrapping_add(u11_swz) | du_fill;
            dvx = dvx.wrapping_add(v11_swz) | TILE_DV_FILL;
            lr10 += lr11;
            lg10 += lg11;
            lb10 += lb11;
        }
    }
}

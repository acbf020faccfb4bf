// SPDX-FileCopyrightText: 2025 barry contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Block-tiled texture addressing.
//!
//! Texels are stored in a block-interleaved order so that small steps in
//! either `u` or `v` stay within a cache line. Two encodings of the same
//! storage order coexist:
//!
//! * The scalar **V1** form carries an 11-bit coordinate fraction plus fill
//!   bits (the carry trick), so per-pixel stepping is an unconditional add
//!   followed by a mask. Field layout of the `u` form: fraction in bits
//!   0..=10, `u & 3` in bits 12..=13, `u >> 2` starting at bit `14+vbits`.
//!   The `v` form keeps its fraction in bits 0..=10 and the whole `v` value
//!   starting at bit 14. The byte to fetch is `(u_form + v_form) >> 12`.
//!
//! * The packed **V2** form is fraction-free and fits one 32-bit SIMD lane:
//!   `u & 3` in bits 0..=1, `v` starting at bit 2, `u >> 2` starting at bit
//!   `2+vbits`. The index to fetch is the sum of the two parts directly.
//!
//! The deltas produced by [`tile_du`]/[`tile_dv`] pre-set every bit of the
//! unused gaps above their fields. An add then carries *through* the gap
//! into the next field, and the mask discards the gap again: wrapping
//! addition of the logical field with no branch. The fill constants encode
//! those gap regions exactly; do not fold or "simplify" them.

use wide::i32x8;

/// Fill bits of a V1 `v` delta: bits 11..=13, the gap between the fraction
/// and the `v` field.
pub const TILE_DV_FILL: u32 = 0x3800;

/// Fill bits of a V1 `u` delta: bit 11 (gap to the `u & 3` field) plus the
/// `vbits`-wide gap between `u & 3` and the `u >> 2` field.
#[inline]
pub fn tile_du_fill(vbits: u32) -> u32 {
    0x800 | (((1 << vbits) - 1) << 14)
}

/// Swizzle a fixed-point `v` (11 fractional bits) into its V1 form.
#[inline]
pub fn tile_v(v: u32, vmask: u32) -> u32 {
    (v & 0x7ff) | ((v << 3) & (vmask << 14))
}

/// Swizzle a fixed-point `v` step into a V1 delta with fill bits set.
#[inline]
pub fn tile_dv(v: u32, vmask: u32) -> u32 {
    tile_v(v, vmask) | TILE_DV_FILL
}

/// Mask that keeps the valid fields of a V1 `v` value after an add.
#[inline]
pub fn tile_vmask(vmask: u32) -> u32 {
    0x7ff | (vmask << 14)
}

/// Swizzle a fixed-point `u` (11 fractional bits) into its V1 form.
#[inline]
pub fn tile_u(u: u32, vbits: u32, umask: u32) -> u32 {
    (u & 0x7ff) | ((u & 0x1800) << 1) | ((u << (1 + vbits)) & ((umask >> 2) << (14 + vbits)))
}

/// Swizzle a fixed-point `u` step into a V1 delta with fill bits set.
#[inline]
pub fn tile_du(u: u32, vbits: u32, umask: u32) -> u32 {
    tile_u(u, vbits, umask) | tile_du_fill(vbits)
}

/// Mask that keeps the valid fields of a V1 `u` value after an add.
#[inline]
pub fn tile_umask(vbits: u32, umask: u32) -> u32 {
    0x37ff | ((umask >> 2) << (14 + vbits))
}

/// Mask for the `u >> 2` field of the packed V2 form.
#[inline]
pub fn swizzle_umask(vbits: u32, umask: u32) -> u32 {
    (umask >> 2) << (2 + vbits)
}

/// Pack an integer texel `u` into its V2 form.
#[inline]
pub fn packed_tile_u(u: i32, vbits: u32, swizzled_umask: u32) -> i32 {
    (u & 3) | ((u << vbits) & swizzled_umask as i32)
}

/// Pack an integer texel `v` into its V2 form.
#[inline]
pub fn packed_tile_v(v: i32, vmask: u32) -> i32 {
    (v & vmask as i32) << 2
}

/// Eight-lane [`packed_tile_u`].
#[inline]
pub fn packed_tile_u_x8(u: i32x8, vbits: u32, swizzled_umask: u32) -> i32x8 {
    (u & i32x8::splat(3)) | ((u * i32x8::splat(1 << vbits)) & i32x8::splat(swizzled_umask as i32))
}

/// Eight-lane [`packed_tile_v`].
#[inline]
pub fn packed_tile_v_x8(v: i32x8, vmask: u32) -> i32x8 {
    (v & i32x8::splat(vmask as i32)) * i32x8::splat(4)
}

/// Storage index of texel `(u, v)` in a `2^log_width x 2^log_height` mip.
///
/// This is the order texture loaders must produce; both address forms
/// resolve to it.
#[inline]
pub fn swizzle_texel_index(u: u32, v: u32, log_width: u32, log_height: u32) -> usize {
    let umask = (1u32 << log_width) - 1;
    let vmask = (1u32 << log_height) - 1;
    let sm = swizzle_umask(log_height, umask);
    (packed_tile_u(u as i32, log_height, sm) + packed_tile_v(v as i32, vmask)) as usize
}

/// Reorder a row-major mip image into swizzled storage order.
pub fn swizzle_mip(linear: &[u32], log_width: u32, log_height: u32) -> Vec<u32> {
    let width = 1usize << log_width;
    let height = 1usize << log_height;
    debug_assert_eq!(linear.len(), width * height);
    let mut out = vec![0u32; width * height];
    for v in 0..height {
        for u in 0..width {
            let dst = swizzle_texel_index(u as u32, v as u32, log_width, log_height);
            out[dst] = linear[v * width + u];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// V1 address of the integer texel `(u, v)`: coordinates carry 11
    /// fractional bits and the byte index drops 12.
    fn v1_index(u: u32, v: u32, log_width: u32, log_height: u32) -> usize {
        let umask = (1u32 << log_width) - 1;
        let vmask = (1u32 << log_height) - 1;
        let tu = tile_u(u << 11, log_height, umask);
        let tv = tile_v(v << 11, vmask);
        ((tu + tv) >> 12) as usize
    }

    #[test]
    fn test_v1_v2_agree() {
        for &(lw, lh) in &[(2u32, 2u32), (4, 3), (3, 5), (6, 6), (8, 8)] {
            for v in 0..(1u32 << lh) {
                for u in 0..(1u32 << lw) {
                    assert_eq!(
                        v1_index(u, v, lw, lh),
                        swizzle_texel_index(u, v, lw, lh),
                        "({u}, {v}) in 2^{lw} x 2^{lh}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_swizzle_is_a_permutation() {
        for &(lw, lh) in &[(0u32, 0u32), (1, 0), (2, 2), (5, 3), (6, 6)] {
            let texels = 1usize << (lw + lh);
            let mut seen = vec![false; texels];
            for v in 0..(1u32 << lh) {
                for u in 0..(1u32 << lw) {
                    let idx = swizzle_texel_index(u, v, lw, lh);
                    assert!(idx < texels, "({u}, {v}) maps past the mip");
                    assert!(!seen[idx], "({u}, {v}) collides at {idx}");
                    seen[idx] = true;
                }
            }
        }
    }

    #[test]
    fn test_swizzle_mip_round_trip() {
        let (lw, lh) = (4u32, 3u32);
        let w = 1usize << lw;
        let h = 1usize << lh;
        let linear: Vec<u32> = (0..(w * h) as u32).collect();
        let swizzled = swizzle_mip(&linear, lw, lh);
        for v in 0..h {
            for u in 0..w {
                assert_eq!(
                    swizzled[swizzle_texel_index(u as u32, v as u32, lw, lh)],
                    (v * w + u) as u32
                );
            }
        }
    }

    /// Step a swizzled value N times and compare against swizzling the
    /// wrapped linear sum: the fill bits must carry past the field gaps.
    #[test]
    fn test_carry_trick_u() {
        let (lw, lh) = (4u32, 3u32);
        let umask = (1u32 << lw) - 1;
        // Fixed-point u wraps modulo width * 2048.
        let wrap = (umask << 11) | 0x7ff;
        let du_cases = [
            0x355u32,
            0x800,
            0x1801,
            (1u32 << (lw + 11)) - 0x355, // a negative step, wrapped
            0x7fff,
        ];
        for &du in &du_cases {
            for &u0 in &[0u32, 0x123, 0x4cafe & wrap] {
                let step = tile_du(du, lh, umask);
                let mask = tile_umask(lh, umask);
                let mut swizzled = tile_u(u0, lh, umask);
                let mut linear = u0;
                for n in 1..=40u32 {
                    swizzled = swizzled.wrapping_add(step) & mask;
                    linear = linear.wrapping_add(du) & wrap;
                    assert_eq!(
                        swizzled,
                        tile_u(linear, lh, umask),
                        "u0={u0:#x} du={du:#x} after {n} steps"
                    );
                }
            }
        }
    }

    #[test]
    fn test_carry_trick_v() {
        let lh = 5u32;
        let vmask = (1u32 << lh) - 1;
        let wrap = (vmask << 11) | 0x7ff;
        for &dv in &[0x200u32, 0x900, (1u32 << (lh + 11)) - 0x640] {
            let step = tile_dv(dv, vmask);
            let mask = tile_vmask(vmask);
            let mut swizzled = tile_v(0x42, vmask);
            let mut linear = 0x42u32;
            for _ in 0..64 {
                swizzled = swizzled.wrapping_add(step) & mask;
                linear = linear.wrapping_add(dv) & wrap;
                assert_eq!(swizzled, tile_v(linear, vmask));
            }
        }
    }

    #[test]
    fn test_packed_lanes_match_scalar() {
        let (lw, lh) = (5u32, 4u32);
        let umask = (1u32 << lw) - 1;
        let vmask = (1u32 << lh) - 1;
        let sm = swizzle_umask(lh, umask);
        let u = i32x8::from([0, 1, 2, 3, 17, 31, -2, 100]);
        let v = i32x8::from([0, 1, 7, 15, 3, 8, -1, 40]);
        let tu = packed_tile_u_x8(u, lh, sm).to_array();
        let tv = packed_tile_v_x8(v, vmask).to_array();
        for lane in 0..8 {
            assert_eq!(tu[lane], packed_tile_u(u.to_array()[lane], lh, sm));
            assert_eq!(tv[lane], packed_tile_v(v.to_array()[lane], vmask));
        }
    }
}

// SPDX-FileCopyrightText: 2025 barry contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Attribute plane setup.
//!
//! Every interpolated attribute (`1/z`, `u/z`, `v/z`, the three light
//! channels) is planar in screen space, so a single 2x2 solve over the two
//! edges out of `v1` yields its `d/dx` and `d/dy`. Note that `z` itself is
//! *not* planar; only the pre-divided terms are interpolated and the
//! kernels divide back per pixel or per tile corner.

use barry_common::Vertex;

/// Degenerate-triangle threshold on the edge-matrix determinant.
const MIN_DET: f32 = 0.01;

/// Screen-space slopes of one attribute.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Slope {
    pub dx: f32,
    pub dy: f32,
}

impl Slope {
    /// Extrapolate from the attribute's value at `v1` to pixel `(x, y)`.
    #[inline]
    pub fn at(&self, base: f32, v1: &Vertex, x: f32, y: f32) -> f32 {
        base + (x - v1.px) * self.dx + (y - v1.py) * self.dy
    }
}

/// Gradients of all interpolated attributes of one triangle.
pub(crate) struct AttributeGradients {
    pub rz: Slope,
    pub uz: Slope,
    pub vz: Slope,
    pub lr: Slope,
    pub lg: Slope,
    pub lb: Slope,
}

impl AttributeGradients {
    /// Solve the 2x2 system over the edges `v1->v2` and `v1->v3`. Returns
    /// `None` for triangles too thin to carry a stable plane; the feeder
    /// skips those.
    pub fn solve(v1: &Vertex, v2: &Vertex, v3: &Vertex) -> Option<Self> {
        let m00 = v2.px - v1.px;
        let m01 = v2.py - v1.py;
        let m10 = v3.px - v1.px;
        let m11 = v3.py - v1.py;
        let det = m00 * m11 - m01 * m10;
        if det.abs() <= MIN_DET {
            return None;
        }
        let i00 = m11 / det;
        let i01 = -m01 / det;
        let i10 = -m10 / det;
        let i11 = m00 / det;

        let slope = |e2: f32, e3: f32| Slope {
            dx: i00 * e2 + i01 * e3,
            dy: i10 * e2 + i11 * e3,
        };

        Some(Self {
            rz: slope(v2.rz - v1.rz, v3.rz - v1.rz),
            uz: slope(v2.uz - v1.uz, v3.uz - v1.uz),
            vz: slope(v2.vz - v1.vz, v3.vz - v1.vz),
            lr: slope(v2.lr - v1.lr, v3.lr - v1.lr),
            lg: slope(v2.lg - v1.lg, v3.lg - v1.lg),
            lb: slope(v2.lb - v1.lb, v3.lb - v1.lb),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Vertex with every attribute sampled from known planes over (px, py).
    fn planar_vertex(px: f32, py: f32) -> Vertex {
        Vertex {
            px,
            py,
            rz: 0.5 + 0.01 * px - 0.002 * py,
            uz: 2.0 - 0.03 * px + 0.05 * py,
            vz: 0.25 * px,
            lr: 0.5,
            lg: 0.125 * py,
            lb: 1.0 - 0.01 * px,
        }
    }

    #[test]
    fn test_recovers_plane_slopes() {
        let v1 = planar_vertex(10.0, 5.0);
        let v2 = planar_vertex(50.0, 12.0);
        let v3 = planar_vertex(22.0, 60.0);
        let g = AttributeGradients::solve(&v1, &v2, &v3).unwrap();

        assert!((g.rz.dx - 0.01).abs() < 1e-5);
        assert!((g.rz.dy - -0.002).abs() < 1e-5);
        assert!((g.uz.dx - -0.03).abs() < 1e-5);
        assert!((g.uz.dy - 0.05).abs() < 1e-5);
        assert!((g.lr.dx).abs() < 1e-5);
        assert!((g.lg.dy - 0.125).abs() < 1e-5);
    }

    #[test]
    fn test_extrapolation_matches_plane() {
        let v1 = planar_vertex(8.0, 8.0);
        let v2 = planar_vertex(40.0, 16.0);
        let v3 = planar_vertex(16.0, 48.0);
        let g = AttributeGradients::solve(&v1, &v2, &v3).unwrap();

        // Any point, inside or outside the triangle, lies on the plane.
        let probe = planar_vertex(100.0, -20.0);
        let got = g.uz.at(v1.uz, &v1, probe.px, probe.py);
        assert!((got - probe.uz).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_triangles_rejected() {
        let v1 = planar_vertex(0.0, 0.0);
        let v2 = planar_vertex(10.0, 10.0);
        let v3 = planar_vertex(20.0, 20.0);
        assert!(AttributeGradients::solve(&v1, &v2, &v3).is_none());

        // A sliver just under the determinant threshold.
        let v3 = planar_vertex(20.0, 20.0004);
        assert!(AttributeGradients::solve(&v1, &v2, &v3).is_none());
    }
}

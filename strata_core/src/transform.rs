// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column-major 4×4 transforms for entity placement and camera matrices.
//!
//! The core never renders, so it only needs enough linear algebra to hand a
//! backend ready-made model, view and projection matrices.

use core::ops::Mul;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A column-major 4×4 transform stored as `[[f64; 4]; 4]`.
///
/// Each inner array is one *column*, matching the layout GPU APIs expect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> [f64; 4] {
        self.cols[i]
    }

    /// Returns the translation part as `[x, y, z]`.
    #[inline]
    #[must_use]
    pub const fn translation(self) -> [f64; 3] {
        [self.cols[3][0], self.cols[3][1], self.cols[3][2]]
    }

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Creates a uniform scale transform.
    #[inline]
    #[must_use]
    pub const fn from_uniform_scale(s: f64) -> Self {
        Self {
            cols: [
                [s, 0.0, 0.0, 0.0],
                [0.0, s, 0.0, 0.0],
                [0.0, 0.0, s, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the X axis (degrees).
    #[inline]
    #[must_use]
    pub fn from_rotation_x_degrees(degrees: f64) -> Self {
        let (s, c) = sin_cos(degrees.to_radians());
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, c, s, 0.0],
                [0.0, -s, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a right-handed perspective projection with a vertical field of
    /// view in degrees, mapping depth to the `[-1, 1]` clip range.
    #[must_use]
    pub fn perspective(fov_y_degrees: f64, aspect: f64, near: f64, far: f64) -> Self {
        let (s, c) = sin_cos(fov_y_degrees.to_radians() * 0.5);
        let f = c / s;
        let depth = near - far;
        Self {
            cols: [
                [f / aspect, 0.0, 0.0, 0.0],
                [0.0, f, 0.0, 0.0],
                [0.0, 0.0, (far + near) / depth, -1.0],
                [0.0, 0.0, 2.0 * far * near / depth, 0.0],
            ],
        }
    }

    /// Creates a right-handed view matrix looking from `eye` towards `center`.
    #[must_use]
    pub fn look_at(eye: [f64; 3], center: [f64; 3], up: [f64; 3]) -> Self {
        let f = normalize(sub(center, eye));
        let s = normalize(cross(f, up));
        let u = cross(s, f);
        Self {
            cols: [
                [s[0], u[0], -f[0], 0.0],
                [s[1], u[1], -f[1], 0.0],
                [s[2], u[2], -f[2], 0.0],
                [-dot(s, eye), -dot(u, eye), dot(f, eye), 1.0],
            ],
        }
    }

    /// Is every element [finite]?
    ///
    /// [finite]: f64::is_finite
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        for (j, col) in out.iter_mut().enumerate() {
            for (i, v) in col.iter_mut().enumerate() {
                *v = a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
            }
        }
        Self { cols: out }
    }
}

fn sin_cos(radians: f64) -> (f64, f64) {
    #[cfg(feature = "std")]
    let sc = radians.sin_cos();
    #[cfg(not(feature = "std"))]
    let sc = (radians.sin(), radians.cos());
    sc
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f64; 3]) -> [f64; 3] {
    let len = dot(v, v).sqrt();
    if len == 0.0 {
        v
    } else {
        [v[0] / len, v[1] / len, v[2] / len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: [f64; 4], b: [f64; 4]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < EPS)
    }

    #[test]
    fn default_is_identity() {
        assert_eq!(Transform3d::default(), Transform3d::IDENTITY);
    }

    #[test]
    fn translation_composition() {
        let a = Transform3d::from_translation(1.0, 0.0, 0.0);
        let b = Transform3d::from_translation(0.0, 2.0, 0.0);
        assert_eq!((a * b).translation(), [1.0, 2.0, 0.0]);
    }

    #[test]
    fn scale_then_translate_keeps_translation() {
        let combined =
            Transform3d::from_translation(3.0, 4.0, 0.0) * Transform3d::from_uniform_scale(2.0);
        assert_eq!(combined.col(0), [2.0, 0.0, 0.0, 0.0]);
        assert_eq!(combined.col(3), [3.0, 4.0, 0.0, 1.0]);
    }

    #[test]
    fn rotation_x_ninety_degrees() {
        let r = Transform3d::from_rotation_x_degrees(90.0);
        assert!(close(r.col(1), [0.0, 0.0, 1.0, 0.0]), "y axis maps to z");
        assert!(close(r.col(2), [0.0, -1.0, 0.0, 0.0]), "z axis maps to -y");
    }

    #[test]
    fn look_at_from_positive_z_is_a_pure_translation() {
        let view = Transform3d::look_at([0.0, 0.0, 20.0], [0.0; 3], [0.0, 1.0, 0.0]);
        assert!(close(view.col(0), [1.0, 0.0, 0.0, 0.0]), "x axis unchanged");
        assert!(close(view.col(1), [0.0, 1.0, 0.0, 0.0]), "y axis unchanged");
        assert!(close(view.col(3), [0.0, 0.0, -20.0, 1.0]), "eye moved to origin");
    }

    #[test]
    fn perspective_is_finite_and_projects() {
        let p = Transform3d::perspective(45.0, 16.0 / 9.0, 0.1, 1000.0);
        assert!(p.is_finite());
        assert_eq!(p.col(2)[3], -1.0);
        assert!((p.col(1)[1] - 2.414_213_562_373_095).abs() < 1e-9);
    }

    #[test]
    fn nan_is_not_finite() {
        let mut t = Transform3d::IDENTITY;
        t.cols[2][1] = f64::NAN;
        assert!(!t.is_finite());
    }
}

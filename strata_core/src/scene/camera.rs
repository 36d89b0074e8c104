// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Camera parameters handed through to the backend.

use crate::transform::Transform3d;

/// Perspective projection parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerspectiveLens {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f64,
    /// Width over height.
    pub aspect: f64,
    /// Near clip distance.
    pub near: f64,
    /// Far clip distance.
    pub far: f64,
}

impl Default for PerspectiveLens {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// A look-at camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Projection parameters.
    pub lens: PerspectiveLens,
    /// Eye position in world space.
    pub position: [f64; 3],
    /// Point the camera looks at.
    pub view_center: [f64; 3],
    /// Up direction.
    pub up: [f64; 3],
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            lens: PerspectiveLens::default(),
            position: [0.0, 0.0, 20.0],
            view_center: [0.0; 3],
            up: [0.0, 1.0, 0.0],
        }
    }
}

impl Camera {
    /// Returns the world-to-view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Transform3d {
        Transform3d::look_at(self.position, self.view_center, self.up)
    }

    /// Returns the projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Transform3d {
        let l = &self.lens;
        Transform3d::perspective(l.fov_y_degrees, l.aspect, l.near, l.far)
    }

    /// Returns `projection * view`.
    #[must_use]
    pub fn view_projection(&self) -> Transform3d {
        self.projection_matrix() * self.view_matrix()
    }
}

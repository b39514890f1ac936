//! Look-at camera producing view and projection matrices
//!
//! Matrices are rebuilt on every call since the camera fields are plain
//! data the driver may change between frames.

use serde::{Serialize, Deserialize};

use crate::rasterizer::{Matrix, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
    #[serde(default = "default_up")]
    pub up: Vec3,
    pub near: f32,
    pub far: f32,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    #[serde(default)]
    pub projection: Projection,
}

fn default_up() -> Vec3 {
    Vec3::UP
}

impl Camera {
    pub fn new(position: Vec3, look_at: Vec3) -> Self {
        Self {
            position,
            look_at,
            up: Vec3::UP,
            near: 0.5,
            far: 10.0,
            fov_y: std::f32::consts::FRAC_PI_2,
            aspect: 4.0 / 3.0,
            projection: Projection::Perspective,
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Right-handed view matrix; the basis vectors sit in the columns so
    /// row vectors come out in camera space.
    pub fn view_matrix(&self) -> Matrix {
        let forward = (self.position - self.look_at).normalize();
        let right = self.up.normalize().cross(forward).normalize();
        let up = forward.cross(right);

        let mut l = Matrix::identity(4);
        for (col, axis) in [right, up, forward].into_iter().enumerate() {
            l[(0, col)] = axis.x;
            l[(1, col)] = axis.y;
            l[(2, col)] = axis.z;
            l[(3, col)] = -axis.dot(self.position);
        }
        l
    }

    /// Perspective projection; depth maps near..far onto 0..1 after the w divide
    pub fn perspective_matrix(&self) -> Matrix {
        let y_scale = 1.0 / (self.fov_y / 2.0).tan();
        let q = self.far / (self.far - self.near);

        let mut p = Matrix::identity(4);
        p[(0, 0)] = y_scale / self.aspect;
        p[(1, 1)] = y_scale;
        p[(2, 2)] = -q;
        p[(2, 3)] = -1.0;
        p[(3, 2)] = -q * self.near;
        p[(3, 3)] = 0.0;
        p
    }

    /// Orthographic projection sized so the look-at target frames like the perspective view
    pub fn orthographic_matrix(&self) -> Matrix {
        let distance = (self.position - self.look_at).len();
        let top = distance * (self.fov_y / 2.0).tan();
        let right = top * self.aspect;

        let mut p = Matrix::identity(4);
        p[(0, 0)] = 1.0 / right;
        p[(1, 1)] = 1.0 / top;
        p[(2, 2)] = -1.0 / (self.far - self.near);
        p[(3, 2)] = -self.near / (self.far - self.near);
        p
    }

    pub fn projection_matrix(&self) -> Matrix {
        match self.projection {
            Projection::Perspective => self.perspective_matrix(),
            Projection::Orthographic => self.orthographic_matrix(),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO)
    }
}

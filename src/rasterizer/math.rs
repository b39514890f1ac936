//! Vector math for 2D and 3D rendering
//!
//! Vectors are treated as row vectors: applying a matrix computes `v * M`,
//! so composed transforms read left to right.

use std::ops::{Add, Div, Mul, Neg, Sub};
use serde::{Serialize, Deserialize};

use super::matrix::Matrix;
use crate::error::RasterResult;

/// Relative tolerance used when deciding whether points share a line
const COLLINEAR_EPSILON: f32 = 1e-5;

macro_rules! impl_vec_ops {
    ($ty:ident { $($f:ident),+ }) => {
        impl Add for $ty {
            type Output = $ty;
            fn add(self, other: $ty) -> $ty {
                $ty { $($f: self.$f + other.$f),+ }
            }
        }

        impl Sub for $ty {
            type Output = $ty;
            fn sub(self, other: $ty) -> $ty {
                $ty { $($f: self.$f - other.$f),+ }
            }
        }

        impl Mul<f32> for $ty {
            type Output = $ty;
            fn mul(self, s: f32) -> $ty {
                $ty { $($f: self.$f * s),+ }
            }
        }

        impl Div<f32> for $ty {
            type Output = $ty;
            fn div(self, s: f32) -> $ty {
                $ty { $($f: self.$f / s),+ }
            }
        }

        impl Neg for $ty {
            type Output = $ty;
            fn neg(self) -> $ty {
                $ty { $($f: -self.$f),+ }
            }
        }

        impl $ty {
            pub fn dot(self, other: $ty) -> f32 {
                0.0 $(+ self.$f * other.$f)+
            }

            pub fn len(self) -> f32 {
                self.dot(self).sqrt()
            }

            /// Unit-length copy. A zero vector stays zero.
            pub fn normalize(self) -> $ty {
                let l = self.len();
                if l == 0.0 {
                    return self;
                }
                self / l
            }

            /// True when `w` lies on the line through `self` and `u`.
            pub fn is_collinear(self, u: $ty, w: $ty) -> bool {
                let a = u - self;
                let b = w - self;
                let la = a.len();
                let lb = b.len();
                if la == 0.0 || lb == 0.0 {
                    return true;
                }
                (a.dot(b).abs() - la * lb).abs() <= COLLINEAR_EPSILON * la * lb
            }
        }
    };
}

/// 2D Vector (screen points and texture coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 2D cross product (z of the 3D cross product)
    pub fn cross(self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Apply a 2x2 linear map
    pub fn transform(self, m: &Matrix) -> RasterResult<Vec2> {
        m.expect_shape("vec2 transform", 2, 2)?;
        Ok(Vec2 {
            x: self.x * m[(0, 0)] + self.y * m[(1, 0)],
            y: self.x * m[(0, 1)] + self.y * m[(1, 1)],
        })
    }
}

impl_vec_ops!(Vec2 { x, y });

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Apply a 3x3 linear map
    pub fn transform(self, m: &Matrix) -> RasterResult<Vec3> {
        m.expect_shape("vec3 transform", 3, 3)?;
        Ok(Vec3 {
            x: self.x * m[(0, 0)] + self.y * m[(1, 0)] + self.z * m[(2, 0)],
            y: self.x * m[(0, 1)] + self.y * m[(1, 1)] + self.z * m[(2, 1)],
            z: self.x * m[(0, 2)] + self.y * m[(1, 2)] + self.z * m[(2, 2)],
        })
    }

    /// Treat `self` as the point (x, y, z, 1), apply a 4x4 matrix and divide by w
    pub fn transform_coordinates(self, m: &Matrix) -> RasterResult<Vec3> {
        let h = Vec4::from(self).transform(m)?;
        Ok(h.xyz() / h.w)
    }
}

impl_vec_ops!(Vec3 { x, y, z });

/// Homogeneous 4D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Apply a 4x4 matrix without perspective divide
    pub fn transform(self, m: &Matrix) -> RasterResult<Vec4> {
        m.expect_shape("vec4 transform", 4, 4)?;
        let col = |j: usize| {
            self.x * m[(0, j)] + self.y * m[(1, j)] + self.z * m[(2, j)] + self.w * m[(3, j)]
        };
        Ok(Vec4::new(col(0), col(1), col(2), col(3)))
    }
}

impl_vec_ops!(Vec4 { x, y, z, w });

impl From<Vec3> for Vec4 {
    fn from(v: Vec3) -> Self {
        Vec4::new(v.x, v.y, v.z, 1.0)
    }
}

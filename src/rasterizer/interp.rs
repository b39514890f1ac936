//! Clamped linear interpolation and gradient helpers used by every scanline loop

use super::math::{Vec2, Vec3};
use crate::error::{RasterError, RasterResult};

/// Types that can be blended linearly
pub trait Lerp: Copy {
    fn lerp(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, other: f32, t: f32) -> f32 {
        self + (other - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        self + (other - self) * t
    }
}

impl Lerp for Vec3 {
    fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        self + (other - self) * t
    }
}

pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// `a + (b - a) * t` with `t` clamped to [0, 1]; never extrapolates.
pub fn interpolate<T: Lerp>(a: T, b: T, t: f32) -> T {
    a.lerp(b, clamp01(t))
}

/// Normalized position of `target` between `v1` and `v2`.
/// A degenerate segment (`v1 == v2`) yields 1.
pub fn gradient(v1: f32, v2: f32, target: f32) -> f32 {
    if v1 == v2 {
        return 1.0;
    }
    (target - v1) / (v2 - v1)
}

/// Ratio of |target - v1| to |v2 - v1|; the three points must be collinear.
pub fn gradient_vec2(v1: Vec2, v2: Vec2, target: Vec2) -> RasterResult<f32> {
    if !v1.is_collinear(v2, target) {
        return Err(RasterError::Collinearity);
    }
    if v1 == v2 {
        return Ok(1.0);
    }
    Ok((target - v1).len() / (v2 - v1).len())
}

/// Ratio of |target - v1| to |v2 - v1|; the three points must be collinear.
pub fn gradient_vec3(v1: Vec3, v2: Vec3, target: Vec3) -> RasterResult<f32> {
    if !v1.is_collinear(v2, target) {
        return Err(RasterError::Collinearity);
    }
    if v1 == v2 {
        return Ok(1.0);
    }
    Ok((target - v1).len() / (v2 - v1).len())
}

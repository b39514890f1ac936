//! Point light and per-vertex lighting terms

use serde::{Serialize, Deserialize};

use crate::rasterizer::{Color, Vec3};

/// Diffuse and specular intensities for one vertex, both in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LightTerms {
    pub diffuse: f32,
    pub specular: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec3,
    /// Carried for callers; shading does not read it yet
    pub color: Color,
}

impl Light {
    pub fn new(position: Vec3) -> Self {
        Self { position, color: Color::WHITE }
    }

    /// Lighting terms for a world-space point with normal `normal`, seen from `eye`
    pub fn terms(&self, eye: Vec3, position: Vec3, normal: Vec3) -> LightTerms {
        let n = normal.normalize();
        let l = (self.position - position).normalize();
        let e = (position - eye).normalize();
        let r = n * (2.0 * l.dot(n)) - l;

        LightTerms {
            diffuse: l.dot(n).clamp(0.0, 1.0),
            specular: r.dot(e).clamp(0.0, 1.0),
        }
    }
}

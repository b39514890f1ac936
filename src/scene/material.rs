//! Surface materials: ambient/diffuse/specular channels plus a specular exponent

use std::sync::Arc;

use crate::rasterizer::{Color, Texture, Vec2};
use super::light::LightTerms;

/// Where a material channel gets its color from
#[derive(Debug, Clone)]
pub enum Channel {
    Constant(Color),
    Textured(Arc<Texture>),
}

impl Channel {
    /// Color of this channel at texture coordinate `uv`
    pub fn resolve(&self, uv: Vec2) -> Color {
        match self {
            Channel::Constant(c) => *c,
            Channel::Textured(tex) => tex.sample(uv),
        }
    }
}

impl From<Color> for Channel {
    fn from(c: Color) -> Self {
        Channel::Constant(c)
    }
}

impl From<Texture> for Channel {
    fn from(t: Texture) -> Self {
        Channel::Textured(Arc::new(t))
    }
}

#[derive(Debug, Clone)]
pub struct Material {
    pub ambient: Channel,
    pub diffuse: Channel,
    pub specular: Channel,
    pub specular_exponent: f32,
}

impl Material {
    pub fn new(ambient: Color, diffuse: Color, specular: Color, specular_exponent: f32) -> Self {
        Self {
            ambient: ambient.into(),
            diffuse: diffuse.into(),
            specular: specular.into(),
            specular_exponent,
        }
    }

    pub fn with_ambient_texture(mut self, texture: Texture) -> Self {
        self.ambient = texture.into();
        self
    }

    pub fn with_diffuse_texture(mut self, texture: Texture) -> Self {
        self.diffuse = texture.into();
        self
    }

    pub fn with_specular_texture(mut self, texture: Texture) -> Self {
        self.specular = texture.into();
        self
    }

    /// `ambient + diffuse * kd + specular * ks^exponent`, saturated per channel
    pub fn shade(&self, uv: Vec2, terms: LightTerms) -> Color {
        let ambient = self.ambient.resolve(uv).to_f32();
        let diffuse = self.diffuse.resolve(uv).to_f32();
        let specular = self.specular.resolve(uv).to_f32();
        let ks = terms.specular.powf(self.specular_exponent);

        let mut out = [0.0; 4];
        for i in 0..4 {
            out[i] = ambient[i] + diffuse[i] * terms.diffuse + specular[i] * ks;
        }
        Color::from_f32(out)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Color::GRAY, Color::GRAY, Color::WHITE, 10.0)
    }
}

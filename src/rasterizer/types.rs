//! Core types for the rasterizer

use serde::{Serialize, Deserialize};

use super::math::Vec2;
use crate::error::{RasterError, RasterResult};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const GRAY: Color = Color { r: 128, g: 128, b: 128, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channels as floats in 0-255
    pub fn to_f32(self) -> [f32; 4] {
        [self.r as f32, self.g as f32, self.b as f32, self.a as f32]
    }

    /// Saturating conversion back from float channels
    pub fn from_f32(c: [f32; 4]) -> Self {
        let q = |v: f32| v.clamp(0.0, 255.0) as u8;
        Self { r: q(c[0]), g: q(c[1]), b: q(c[2]), a: q(c[3]) }
    }

    /// Convert to [u8; 4] in framebuffer order (B, G, R, A)
    pub fn to_bgra(self) -> [u8; 4] {
        [self.b, self.g, self.r, self.a]
    }
}

/// Read access to a decoded image: the only thing the devices need from a texture
pub trait TextureSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Color at integer pixel coordinates; callers stay within bounds
    fn sample_color(&self, x: usize, y: usize) -> Color;
}

/// Simple texture (array of colors)
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    pub fn solid(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
            name: String::new(),
        }
    }

    /// Load texture from an image file (png, jpeg or bmp)
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, image::ImageError> {
        let path = path.as_ref();
        let img = image::open(path)?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let texture = Self::from_image(img, name);
        log::debug!("Loaded texture {} ({}x{})", texture.name, texture.width, texture.height);
        Ok(texture)
    }

    /// Load texture from raw encoded bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self, image::ImageError> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_image(img, name))
    }

    fn from_image(img: image::DynamicImage, name: String) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        }
    }

    /// Create a checkerboard test texture
    pub fn checkerboard(width: usize, height: usize, color1: Color, color2: Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self { width, height, pixels, name: "checkerboard".to_string() }
    }

    /// Sample at texture coordinates, wrapping outside [0, 1) (nearest, no filtering)
    pub fn sample(&self, uv: Vec2) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::BLACK;
        }
        let tx = ((uv.x * self.width as f32).floor() as i64).rem_euclid(self.width as i64) as usize;
        let ty = ((uv.y * self.height as f32).floor() as i64).rem_euclid(self.height as i64) as usize;
        self.pixels[ty * self.width + tx]
    }

    /// Get pixel at x,y coordinates
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            Color::BLACK
        }
    }
}

impl TextureSource for Texture {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn sample_color(&self, x: usize, y: usize) -> Color {
        self.get_pixel(x, y)
    }
}

/// Integer-sized rectangle anchored at a (possibly fractional) corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: usize, height: usize) -> Self {
        Self { origin: Vec2::new(x, y), width, height }
    }

    /// Fails unless the rectangle lies inside a `width` x `height` image
    pub fn check_inside(&self, width: usize, height: usize) -> RasterResult<()> {
        let x = self.origin.x as i64;
        let y = self.origin.y as i64;
        if x < 0
            || y < 0
            || x + self.width as i64 > width as i64
            || y + self.height as i64 > height as i64
        {
            return Err(RasterError::InvalidArgument(format!(
                "source rectangle {:?} exceeds image bounds {}x{}",
                self, width, height
            )));
        }
        Ok(())
    }
}

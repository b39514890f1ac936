//! Color + depth storage shared by the 2D and 3D devices

use super::types::Color;

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,    // BGRA, 4 bytes per pixel
    pub zbuffer: Vec<f32>,  // Depth buffer, smaller is closer
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let mut fb = Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![f32::MAX; width * height],
            width,
            height,
        };
        fb.clear(Color::BLACK);
        fb
    }

    /// Flood the color buffer and reset every depth cell to the maximum value
    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bgra();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.zbuffer.fill(f32::MAX);
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Depth-tested write. Passes when `z` is less than or equal to the stored
    /// depth, so equal depths go to the latest write. Off-screen writes are dropped.
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, z: f32, color: Color) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        let idx = y as usize * self.width + x as usize;
        if self.zbuffer[idx] < z {
            return false;
        }
        self.zbuffer[idx] = z;
        let pixel_idx = idx * 4;
        self.pixels[pixel_idx..pixel_idx + 4].copy_from_slice(&color.to_bgra());
        true
    }

    /// Color stored at (x, y)
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        let p = &self.pixels[i..i + 4];
        Some(Color::with_alpha(p[2], p[1], p[0], p[3]))
    }

    pub fn get_depth(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.zbuffer[y * self.width + x])
    }

    /// Copy of the color buffer reordered to RGBA (for presenters such as macroquad)
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len());
        for px in self.pixels.chunks_exact(4) {
            out.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
        }
        out
    }
}

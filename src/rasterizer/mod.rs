//! Software rasterizer building blocks
//!
//! - Row-vector math (Vec2/Vec3/Vec4, dynamically shaped Matrix)
//! - Clamped interpolation and gradients for scanline walks
//! - Colors, textures and the shared BGRA + depth framebuffer
//! - Line clipping so off-canvas geometry never reaches the pixel loops

mod math;
mod matrix;
mod interp;
mod types;
mod framebuffer;
mod clip;

pub use math::*;
pub use matrix::*;
pub use interp::*;
pub use types::*;
pub use framebuffer::*;
pub use clip::*;

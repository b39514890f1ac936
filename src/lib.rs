//! softrender: a CPU rasterizer
//!
//! - Vector/matrix math with interpolation helpers
//! - A 2D canvas device (lines, polygons, ellipses, curves, image blits)
//! - A 3D device drawing lit, optionally textured meshes with a depth buffer
//! - Procedural icosphere, cube and plane meshes
//! - RON scene files
//!
//! Output is a BGRA byte buffer; presenting it is up to the caller.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod rasterizer;
pub mod scene;
pub mod device;

pub use error::{RasterError, RasterResult, SceneError};
pub use device::{Device2D, Device3D};

//! Scene data model - what gets rendered
//!
//! - Indexed meshes with procedural icosphere/cube/plane builders
//! - Materials with constant or textured channels
//! - Point light and look-at camera
//! - RON scene files tying it all together

mod mesh;
mod material;
mod light;
mod camera;
mod file;

pub use mesh::*;
pub use material::*;
pub use light::*;
pub use camera::*;
pub use file::*;

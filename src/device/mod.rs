//! Rendering devices
//!
//! Both devices own a private color + depth buffer and share the same
//! "new depth <= stored depth" write rule:
//! - `Device2D`: immediate-mode canvas with a transform stack and paths
//! - `Device3D`: projects, lights and fills meshes

mod transform_stack;
mod device2d;
mod device3d;

pub use transform_stack::*;
pub use device2d::*;
pub use device3d::*;

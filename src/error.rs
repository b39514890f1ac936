//! Error types for the rasterizer and the scene-file loader

use thiserror::Error;

/// Contract violations raised by math and draw calls.
///
/// None of these are transient: a failed call should abort the current
/// frame, there is nothing to retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RasterError {
    #[error("shape mismatch in {op}: {left:?} vs {right:?}")]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("points are not collinear")]
    Collinearity,
}

pub type RasterResult<T> = Result<T, RasterError>;

/// Error type for scene loading and saving
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Texture error: {0}")]
    Texture(#[from] image::ImageError),
    #[error("Raster error: {0}")]
    Raster(#[from] RasterError),
}

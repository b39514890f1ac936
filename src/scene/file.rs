//! Scene description loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::SceneError;
use crate::rasterizer::{Color, Texture, Vec3};
use super::{Camera, Light, Material, Mesh};

/// Procedural geometry a scene can request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Sphere(u32),
    Cube(u32),
    Plane(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDesc {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub exponent: f32,
    #[serde(default)]
    pub ambient_texture: Option<String>,
    #[serde(default)]
    pub diffuse_texture: Option<String>,
    #[serde(default)]
    pub specular_texture: Option<String>,
}

impl MaterialDesc {
    /// Build the material, decoding any referenced texture files
    pub fn build(&self) -> Result<Material, SceneError> {
        let mut material = Material::new(self.ambient, self.diffuse, self.specular, self.exponent);
        if let Some(path) = &self.ambient_texture {
            material = material.with_ambient_texture(Texture::from_file(path)?);
        }
        if let Some(path) = &self.diffuse_texture {
            material = material.with_diffuse_texture(Texture::from_file(path)?);
        }
        if let Some(path) = &self.specular_texture {
            material = material.with_specular_texture(Texture::from_file(path)?);
        }
        Ok(material)
    }
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            ambient: Color::RED,
            diffuse: Color::GRAY,
            specular: Color::WHITE,
            exponent: 10.0,
            ambient_texture: None,
            diffuse_texture: None,
            specular_texture: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshDesc {
    pub name: String,
    pub shape: Shape,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    /// Rotation added every frame by the demo driver
    #[serde(default)]
    pub spin: Vec3,
    #[serde(default)]
    pub material: MaterialDesc,
}

impl MeshDesc {
    pub fn build(&self) -> Result<Mesh, SceneError> {
        let mut mesh = match self.shape {
            Shape::Sphere(f) => Mesh::create_sphere(f)?,
            Shape::Cube(f) => Mesh::create_cube(f)?,
            Shape::Plane(f) => Mesh::create_plane(f)?,
        };
        mesh.name = self.name.clone();
        mesh.rotation = self.rotation;
        Ok(mesh
            .with_position(self.position)
            .with_material(self.material.build()?))
    }
}

/// Everything a driver needs to render a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    pub width: usize,
    pub height: usize,
    pub background: Color,
    pub camera: Camera,
    pub light: Light,
    pub meshes: Vec<MeshDesc>,
}

impl SceneFile {
    /// Generate every mesh and load its textures
    pub fn build_meshes(&self) -> Result<Vec<Mesh>, SceneError> {
        self.meshes.iter().map(MeshDesc::build).collect()
    }
}

impl Default for SceneFile {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
            background: Color::BLACK,
            camera: Camera::default(),
            light: Light::new(Vec3::new(5.0, 5.0, 5.0)),
            meshes: vec![MeshDesc {
                name: "Sphere".to_string(),
                shape: Shape::Sphere(4),
                position: Vec3::ZERO,
                rotation: Vec3::ZERO,
                spin: Vec3::new(0.01, 0.01, 0.0),
                material: MaterialDesc::default(),
            }],
        }
    }
}

/// Load a scene from a RON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<SceneFile, SceneError> {
    let contents = fs::read_to_string(path)?;
    load_scene_from_str(&contents)
}

/// Save a scene to a RON file
pub fn save_scene<P: AsRef<Path>>(scene: &SceneFile, path: P) -> Result<(), SceneError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(scene, config)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Load a scene from a RON string (for embedded scenes or testing)
pub fn load_scene_from_str(s: &str) -> Result<SceneFile, SceneError> {
    let scene: SceneFile = ron::from_str(s)?;
    log::debug!("Parsed scene with {} meshes ({}x{})", scene.meshes.len(), scene.width, scene.height);
    Ok(scene)
}

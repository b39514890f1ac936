//! Indexed triangle meshes and procedural builders
//!
//! Geometry lives in three pools (positions, normals, texture coordinates);
//! each face corner picks one entry from every pool independently, so a
//! shared position can carry a per-face normal.

use std::collections::HashMap;

use crate::error::{RasterError, RasterResult};
use crate::rasterizer::{Vec2, Vec3};
use super::material::Material;

/// A triangle: three corners, each indexing the vertex, normal and texcoord pools
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Face {
    pub vertices: [usize; 3],
    pub normals: [usize; 3],
    pub tex_coords: [usize; 3],
}

impl Face {
    pub fn new(vertices: [usize; 3], normals: [usize; 3], tex_coords: [usize; 3]) -> Self {
        Self { vertices, normals, tex_coords }
    }

    /// Face whose normals share the vertex indices and whose texcoords all point at slot 0
    pub fn smooth(a: usize, b: usize, c: usize) -> Self {
        Self::new([a, b, c], [a, b, c], [0; 3])
    }

    /// Face with a single normal for every corner
    pub fn flat(a: usize, b: usize, c: usize, normal: usize) -> Self {
        Self::new([a, b, c], [normal; 3], [0; 3])
    }

    /// Build from the parser layout: 3 vertex, 3 texture, then 3 normal indices (0-based)
    pub fn from_parsed(indices: [usize; 9]) -> Self {
        Self::new(
            [indices[0], indices[1], indices[2]],
            [indices[6], indices[7], indices[8]],
            [indices[3], indices[4], indices[5]],
        )
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    /// World placement
    pub position: Vec3,
    /// Euler angles in radians
    pub rotation: Vec3,
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub faces: Vec<Face>,
    pub material: Material,
}

impl Mesh {
    /// Empty mesh. The texcoord pool starts with a single (0, 0) entry so
    /// geometry-only faces can point at slot 0.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            vertices: Vec::new(),
            normals: Vec::new(),
            tex_coords: vec![Vec2::ZERO],
            faces: Vec::new(),
            material: Material::default(),
        }
    }

    /// Assemble a mesh from already-parsed arrays, rejecting out-of-range indices
    pub fn from_arrays(
        name: &str,
        vertices: Vec<Vec3>,
        normals: Vec<Vec3>,
        tex_coords: Vec<Vec2>,
        faces: Vec<Face>,
    ) -> RasterResult<Self> {
        let mut mesh = Self::new(name);
        mesh.vertices = vertices;
        mesh.normals = normals;
        if !tex_coords.is_empty() {
            mesh.tex_coords = tex_coords;
        }
        mesh.faces = faces;
        mesh.validate()?;
        Ok(mesh)
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Check that every face index is inside its pool
    pub fn validate(&self) -> RasterResult<()> {
        for (i, face) in self.faces.iter().enumerate() {
            let pools = [
                ("vertex", &face.vertices, self.vertices.len()),
                ("normal", &face.normals, self.normals.len()),
                ("texcoord", &face.tex_coords, self.tex_coords.len()),
            ];
            for (kind, indices, len) in pools {
                if let Some(bad) = indices.iter().find(|&&idx| idx >= len) {
                    return Err(RasterError::InvalidArgument(format!(
                        "mesh '{}' face {} has {} index {} but only {} entries",
                        self.name, i, kind, bad, len
                    )));
                }
            }
        }
        Ok(())
    }

    /// Unit icosphere. `frequency` 1 is the bare icosahedron; every extra
    /// level splits each face into four.
    pub fn create_sphere(frequency: u32) -> RasterResult<Mesh> {
        if frequency < 1 {
            return Err(RasterError::InvalidArgument(
                "sphere frequency cannot be less than 1".to_string(),
            ));
        }

        let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let len = (phi * phi + 1.0).sqrt();
        let t = phi / len;
        let one = 1.0 / len;

        let mut vertices = vec![
            Vec3::new(-one, 0.0, t),
            Vec3::new(one, 0.0, t),
            Vec3::new(-one, 0.0, -t),
            Vec3::new(one, 0.0, -t),
            Vec3::new(0.0, t, one),
            Vec3::new(0.0, t, -one),
            Vec3::new(0.0, -t, one),
            Vec3::new(0.0, -t, -one),
            Vec3::new(t, one, 0.0),
            Vec3::new(-t, one, 0.0),
            Vec3::new(t, -one, 0.0),
            Vec3::new(-t, -one, 0.0),
        ];

        let mut faces: Vec<[usize; 3]> = vec![
            [0, 4, 1], [4, 8, 1], [5, 2, 3], [2, 7, 3],
            [0, 9, 4], [9, 5, 4], [9, 2, 5], [0, 1, 6],
            [4, 5, 8], [5, 3, 8], [8, 1, 10], [8, 3, 10],
            [7, 3, 10], [7, 6, 10], [6, 1, 10], [7, 6, 11],
            [0, 6, 11], [9, 0, 11], [9, 2, 11], [7, 2, 11],
        ];

        // Midpoints are deduplicated by exact value of the normalized point
        let mut known: HashMap<[u32; 3], usize> = HashMap::new();
        let mut midpoint = |vertices: &mut Vec<Vec3>, a: usize, b: usize| -> usize {
            let m = (vertices[a] + vertices[b]).normalize();
            let key = [(m.x + 0.0).to_bits(), (m.y + 0.0).to_bits(), (m.z + 0.0).to_bits()];
            *known.entry(key).or_insert_with(|| {
                vertices.push(m);
                vertices.len() - 1
            })
        };

        for _ in 1..frequency {
            let mut next = Vec::with_capacity(faces.len() * 4);
            for &[a, b, c] in &faces {
                let ab = midpoint(&mut vertices, a, b);
                let ac = midpoint(&mut vertices, a, c);
                let bc = midpoint(&mut vertices, b, c);

                next.push([a, ab, ac]);
                next.push([ab, b, bc]);
                next.push([ac, bc, c]);
                next.push([ab, bc, ac]);
            }
            faces = next;
        }

        log::debug!(
            "Generated sphere (frequency {}): {} vertices, {} faces",
            frequency,
            vertices.len(),
            faces.len()
        );

        let mut sphere = Mesh::new("Sphere");
        sphere.normals = vertices.clone();
        sphere.vertices = vertices;
        sphere.faces = faces.into_iter().map(|[a, b, c]| Face::smooth(a, b, c)).collect();
        Ok(sphere)
    }

    /// Unit cube centered at the origin, each side a `frequency` x `frequency` grid
    pub fn create_cube(frequency: u32) -> RasterResult<Mesh> {
        let ups = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
        ];
        let mut cube = Mesh::new("Cube");
        for up in ups {
            add_grid_side(&mut cube, up, frequency)?;
        }
        Ok(cube)
    }

    /// Unit square in the z = 0.5 plane facing +z
    pub fn create_plane(frequency: u32) -> RasterResult<Mesh> {
        let mut plane = Mesh::new("Plane");
        add_grid_side(&mut plane, Vec3::new(0.0, 0.0, 1.0), frequency)?;
        Ok(plane)
    }
}

/// Sweep a (frequency + 1)^2 vertex grid over the side of the unit cube facing `up`
fn add_grid_side(mesh: &mut Mesh, up: Vec3, frequency: u32) -> RasterResult<()> {
    if frequency < 1 {
        return Err(RasterError::InvalidArgument(
            "grid frequency cannot be less than 1".to_string(),
        ));
    }
    let f = frequency as usize;

    let right = Vec3::new(up.z, up.x, up.y);
    let bottom = up.cross(right);

    let origin = right * -0.5 + bottom * -0.5 + up * 0.5;
    let d_right = right / frequency as f32;
    let d_bottom = bottom / frequency as f32;

    let normal = mesh.normals.len();
    mesh.normals.push(up);

    let mut idx = mesh.vertices.len();
    for i in 0..=f {
        for j in 0..=f {
            mesh.vertices.push(origin + d_right * i as f32 + d_bottom * j as f32);
            if i != f && j != f {
                mesh.faces.push(Face::flat(idx, idx + 1, idx + f + 1, normal));
                mesh.faces.push(Face::flat(idx + f + 1, idx + 1, idx + f + 2, normal));
            }
            idx += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icosahedron() {
        let s = Mesh::create_sphere(1).unwrap();
        assert_eq!(s.vertices.len(), 12);
        assert_eq!(s.faces.len(), 20);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_sphere_subdivision_counts() {
        let s1 = Mesh::create_sphere(1).unwrap();
        let s2 = Mesh::create_sphere(2).unwrap();
        let s3 = Mesh::create_sphere(3).unwrap();
        assert_eq!(s2.faces.len(), s1.faces.len() * 4);
        assert_eq!(s3.faces.len(), s2.faces.len() * 4);
        assert!(s2.vertices.len() > s1.vertices.len());
        assert!(s3.vertices.len() > s2.vertices.len());
        // Shared edges are merged: V - E + F = 2
        assert_eq!(s2.vertices.len(), 42);
        assert_eq!(s3.vertices.len(), 162);
    }

    #[test]
    fn test_sphere_vertices_on_unit_sphere() {
        for freq in 1..=3 {
            let s = Mesh::create_sphere(freq).unwrap();
            for v in &s.vertices {
                assert!((v.len() - 1.0).abs() < 1e-5);
            }
            assert_eq!(s.vertices, s.normals);
        }
    }

    #[test]
    fn test_sphere_rejects_zero_frequency() {
        assert!(matches!(Mesh::create_sphere(0), Err(RasterError::InvalidArgument(_))));
    }

    #[test]
    fn test_cube_counts() {
        let c = Mesh::create_cube(2).unwrap();
        assert_eq!(c.vertices.len(), 6 * 9);
        assert_eq!(c.faces.len(), 6 * 8);
        assert_eq!(c.normals.len(), 6);
        assert!(c.validate().is_ok());
        for v in &c.vertices {
            let m = v.x.abs().max(v.y.abs()).max(v.z.abs());
            assert!((m - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn test_plane_faces_up() {
        let p = Mesh::create_plane(1).unwrap();
        assert_eq!(p.vertices.len(), 4);
        assert_eq!(p.faces.len(), 2);
        assert!(p.vertices.iter().all(|v| (v.z - 0.5).abs() < 1e-6));
        assert!(Mesh::create_plane(0).is_err());
    }

    #[test]
    fn test_from_arrays_checks_indices() {
        let verts = vec![Vec3::ZERO, Vec3::UP, Vec3::new(1.0, 0.0, 0.0)];
        let normals = vec![Vec3::new(0.0, 0.0, -1.0)];
        let ok = Mesh::from_arrays(
            "tri",
            verts.clone(),
            normals.clone(),
            Vec::new(),
            vec![Face::from_parsed([0, 1, 2, 0, 0, 0, 0, 0, 0])],
        );
        assert!(ok.is_ok());

        let bad = Mesh::from_arrays(
            "tri",
            verts,
            normals,
            Vec::new(),
            vec![Face::from_parsed([0, 1, 2, 0, 0, 0, 0, 0, 1])],
        );
        assert!(matches!(bad, Err(RasterError::InvalidArgument(_))));
    }
}

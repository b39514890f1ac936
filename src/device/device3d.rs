//! Shaded triangle rasterizer for meshes
//!
//! Each face is projected through world·view·projection, lit per vertex
//! (diffuse and specular terms), and filled scanline by scanline with the
//! terms, depth and texture coordinates interpolated across every span.

use crate::error::RasterResult;
use crate::rasterizer::{
    clip_line, gradient, interpolate, Color, Framebuffer, Matrix, Vec2, Vec3,
};
use crate::scene::{Camera, Light, LightTerms, Material, Mesh};

/// One face corner after transformation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformedVertex {
    /// Pixel x/y plus depth
    pub screen: Vec3,
    pub world: Vec3,
    /// World-space normal (rotation only)
    pub normal: Vec3,
    pub uv: Vec2,
}

/// What the scanline loop interpolates
#[derive(Debug, Clone, Copy)]
struct ScanVertex {
    pos: Vec3,
    terms: LightTerms,
    uv: Vec2,
}

pub struct Device3D {
    fb: Framebuffer,
}

impl Device3D {
    pub fn new(width: usize, height: usize) -> Self {
        Self { fb: Framebuffer::new(width, height) }
    }

    pub fn width(&self) -> usize {
        self.fb.width
    }

    pub fn height(&self) -> usize {
        self.fb.height
    }

    /// BGRA color buffer, `width * height * 4` bytes
    pub fn buffer(&self) -> &[u8] {
        &self.fb.pixels
    }

    pub fn depth(&self) -> &[f32] {
        &self.fb.zbuffer
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    pub fn to_rgba(&self) -> Vec<u8> {
        self.fb.to_rgba()
    }

    pub fn clear(&mut self, color: Color) {
        self.fb.clear(color);
    }

    /// Transform with homogeneous divide, then map to pixels. z is kept for depth.
    pub fn project(&self, transform: &Matrix, v: Vec3) -> RasterResult<Vec3> {
        let p = v.transform_coordinates(transform)?;
        let (w, h) = (self.fb.width as f32, self.fb.height as f32);
        Ok(Vec3::new(p.x * w + w / 2.0, p.y * h + h / 2.0, p.z))
    }

    pub fn draw_point(&mut self, transform: &Matrix, v: Vec3, color: Color) -> RasterResult<()> {
        let p = self.project(transform, v)?;
        self.fb.set_pixel_with_depth(p.x as i32, p.y as i32, p.z, color);
        Ok(())
    }

    /// Bresenham line with depth interpolated along the major axis. The
    /// projected segment is clipped to the canvas first; an endpoint that
    /// projects to infinity (on the camera plane) draws nothing.
    pub fn draw_line(&mut self, transform: &Matrix, a: Vec3, b: Vec3, color: Color) -> RasterResult<()> {
        let a = self.project(transform, a)?;
        let b = self.project(transform, b)?;

        let max = Vec2::new(self.fb.width as f32 + 1.0, self.fb.height as f32 + 1.0);
        let Some(c) = clip_line(a.xy(), b.xy(), Vec2::new(-1.0, -1.0), max) else {
            log::trace!("line {:?} -> {:?} is off screen", a, b);
            return Ok(());
        };
        let (a, b) = (
            Vec3::new(c.start.x, c.start.y, interpolate(a.z, b.z, c.t0)),
            Vec3::new(c.end.x, c.end.y, interpolate(a.z, b.z, c.t1)),
        );

        let (mut x0, mut y0) = (a.x as i32, a.y as i32);
        let (x1, y1) = (b.x as i32, b.y as i32);

        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = (if dx > dy { dx } else { -dy }) / 2;
        let steps = dx.max(dy).max(1) as f32;

        let mut step = 0;
        loop {
            let z = interpolate(a.z, b.z, step as f32 / steps);
            self.fb.set_pixel_with_depth(x0, y0, z, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = err;
            if e2 > -dx {
                err -= dy;
                x0 += sx;
            }
            if e2 < dy {
                err += dx;
                y0 += sy;
            }
            step += 1;
        }
        Ok(())
    }

    /// Fill one lit triangle. `eye` is the camera position in world space.
    pub fn draw_face(
        &mut self,
        corners: [TransformedVertex; 3],
        material: &Material,
        light: &Light,
        eye: Vec3,
    ) {
        let [mut v1, mut v2, mut v3] = corners.map(|c| ScanVertex {
            pos: c.screen,
            terms: light.terms(eye, c.world, c.normal),
            uv: c.uv,
        });

        if v1.pos.y > v2.pos.y {
            std::mem::swap(&mut v1, &mut v2);
        }
        if v2.pos.y > v3.pos.y {
            std::mem::swap(&mut v2, &mut v3);
        }
        if v1.pos.y > v2.pos.y {
            std::mem::swap(&mut v1, &mut v2);
        }

        // Positive cross: v2 lies right of the long edge v1-v3
        let d12 = v2.pos.xy() - v1.pos.xy();
        let d13 = v3.pos.xy() - v1.pos.xy();
        let v2_right = d12.cross(d13) > 0.0;

        let first = (v1.pos.y as i32).max(0);
        let last = (v3.pos.y as i32).min(self.fb.height as i32 - 1);
        for y in first..=last {
            let upper = (y as f32) < v2.pos.y;
            let (left, right) = match (v2_right, upper) {
                (true, true) => ((v1, v3), (v1, v2)),
                (true, false) => ((v1, v3), (v2, v3)),
                (false, true) => ((v1, v2), (v1, v3)),
                (false, false) => ((v2, v3), (v1, v3)),
            };
            self.scan_line(y, left, right, material);
        }
    }

    fn scan_line(
        &mut self,
        y: i32,
        (va, vb): (ScanVertex, ScanVertex),
        (vc, vd): (ScanVertex, ScanVertex),
        material: &Material,
    ) {
        let yf = y as f32;
        let g1 = gradient(va.pos.y, vb.pos.y, yf);
        let g2 = gradient(vc.pos.y, vd.pos.y, yf);

        let sx = interpolate(va.pos.x, vb.pos.x, g1);
        let ex = interpolate(vc.pos.x, vd.pos.x, g2);

        let z1 = interpolate(va.pos.z, vb.pos.z, g1);
        let z2 = interpolate(vc.pos.z, vd.pos.z, g2);

        let diff1 = interpolate(va.terms.diffuse, vb.terms.diffuse, g1);
        let diff2 = interpolate(vc.terms.diffuse, vd.terms.diffuse, g2);
        let spec1 = interpolate(va.terms.specular, vb.terms.specular, g1);
        let spec2 = interpolate(vc.terms.specular, vd.terms.specular, g2);

        let uv1 = interpolate(va.uv, vb.uv, g1);
        let uv2 = interpolate(vc.uv, vd.uv, g2);

        let from = (sx as i32).max(0);
        let to = (ex as i32).min(self.fb.width as i32);
        for x in from..to {
            let g = gradient(sx, ex, x as f32);
            let terms = LightTerms {
                diffuse: interpolate(diff1, diff2, g),
                specular: interpolate(spec1, spec2, g),
            };
            let color = material.shade(interpolate(uv1, uv2, g), terms);
            self.fb.set_pixel_with_depth(x, y, interpolate(z1, z2, g), color);
        }
    }

    /// Draw every mesh as seen from `camera`. All meshes are validated before
    /// the first pixel is written.
    pub fn render(&mut self, camera: &Camera, light: &Light, meshes: &[Mesh]) -> RasterResult<()> {
        for mesh in meshes {
            mesh.validate()?;
        }

        let view_proj = camera.view_matrix().mul(&camera.projection_matrix())?;
        let eye = camera.position;
        let mut faces = 0usize;

        for mesh in meshes {
            let degenerate = mesh.normals.iter().filter(|n| n.len() == 0.0).count();
            if degenerate > 0 {
                log::warn!("mesh '{}' has {} zero-length normals", mesh.name, degenerate);
            }

            let rotation = Matrix::rotation(mesh.rotation);
            let world = rotation.mul(&Matrix::translation(mesh.position))?;
            let transform = world.mul(&view_proj)?;

            for face in &mesh.faces {
                let mut corners = [TransformedVertex {
                    screen: Vec3::ZERO,
                    world: Vec3::ZERO,
                    normal: Vec3::ZERO,
                    uv: Vec2::ZERO,
                }; 3];
                for (k, corner) in corners.iter_mut().enumerate() {
                    let vertex = mesh.vertices[face.vertices[k]];
                    *corner = TransformedVertex {
                        screen: self.project(&transform, vertex)?,
                        world: vertex.transform_coordinates(&world)?,
                        normal: mesh.normals[face.normals[k]].transform_coordinates(&rotation)?,
                        uv: mesh.tex_coords[face.tex_coords[k]],
                    };
                }
                self.draw_face(corners, &mesh.material, light, eye);
            }
            faces += mesh.faces.len();
        }

        log::debug!("rendered {} meshes, {} faces", meshes.len(), faces);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RasterError;
    use crate::rasterizer::Texture;
    use crate::scene::Face;

    fn triangle(z: f32, size: f32, material: Material) -> Mesh {
        Mesh::from_arrays(
            "tri",
            vec![
                Vec3::new(-size, -size, z),
                Vec3::new(size, -size, z),
                Vec3::new(0.0, size, z),
            ],
            vec![Vec3::new(0.0, 0.0, -1.0)],
            vec![],
            vec![Face::new([0, 1, 2], [0, 0, 0], [0, 0, 0])],
        )
        .unwrap()
        .with_material(material)
    }

    fn flat(color: Color) -> Material {
        Material::new(color, Color::BLACK, Color::BLACK, 10.0)
    }

    #[test]
    fn test_single_triangle_bounding_box() {
        let mut dev = Device3D::new(100, 100);
        let camera = Camera::default();
        let light = Light::new(Vec3::new(0.0, 0.0, -100.0));
        let mesh = triangle(2.0, 1.0, Material::default());
        dev.render(&camera, &light, &[mesh]).unwrap();

        let fb = dev.framebuffer();
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (usize::MAX, 0, usize::MAX, 0);
        let mut lit = 0;
        for y in 0..100 {
            for x in 0..100 {
                if fb.get_pixel(x, y) != Some(Color::BLACK) {
                    lit += 1;
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                    min_y = min_y.min(y);
                    max_y = max_y.max(y);
                }
            }
        }

        // Vertices land at x = 50 +- 75/7 and y = 50 +- 100/7
        assert!(lit > 100);
        assert!((min_x as f32 - 39.3).abs() <= 2.0, "min_x {}", min_x);
        assert!((max_x as f32 - 60.7).abs() <= 2.0, "max_x {}", max_x);
        assert!((min_y as f32 - 35.7).abs() <= 2.0, "min_y {}", min_y);
        assert!((max_y as f32 - 64.3).abs() <= 2.0, "max_y {}", max_y);
    }

    #[test]
    fn test_nearer_face_wins_regardless_of_order() {
        let camera = Camera::default();
        let light = Light::new(Vec3::new(0.0, 0.0, -100.0));
        let near = triangle(0.0, 1.0, flat(Color::RED));
        let far = triangle(2.0, 2.0, flat(Color::BLUE));

        for meshes in [[near.clone(), far.clone()], [far.clone(), near.clone()]] {
            let mut dev = Device3D::new(100, 100);
            dev.render(&camera, &light, &meshes).unwrap();
            assert_eq!(dev.framebuffer().get_pixel(50, 50), Some(Color::RED));
        }
    }

    #[test]
    fn test_invalid_mesh_writes_nothing() {
        let good = triangle(2.0, 1.0, Material::default());
        let mut bad = Mesh::new("bad");
        bad.vertices = vec![Vec3::ZERO; 3];
        bad.normals = vec![Vec3::UP];
        bad.faces = vec![Face::smooth(0, 1, 5)];

        let mut dev = Device3D::new(32, 32);
        let before = dev.buffer().to_vec();
        let result = dev.render(&Camera::default(), &Light::new(Vec3::ZERO), &[good, bad]);
        assert!(matches!(result, Err(RasterError::InvalidArgument(_))));
        assert_eq!(dev.buffer(), &before[..]);
    }

    #[test]
    fn test_line_interpolates_depth() {
        let mut dev = Device3D::new(8, 8);
        let identity = Matrix::identity(4);
        dev.draw_line(&identity, Vec3::new(-0.25, 0.0, 0.25), Vec3::new(0.25, 0.0, 0.75), Color::RED)
            .unwrap();

        let fb = dev.framebuffer();
        for x in 2..=6 {
            assert_eq!(fb.get_pixel(x, 4), Some(Color::RED));
        }
        let mid = fb.get_depth(4, 4).unwrap();
        assert!((mid - 0.5).abs() < 1e-5);

        // A point behind the line is rejected, one in front replaces it
        dev.draw_point(&identity, Vec3::new(0.0, 0.0, 0.9), Color::BLUE).unwrap();
        assert_eq!(dev.framebuffer().get_pixel(4, 4), Some(Color::RED));
        dev.draw_point(&identity, Vec3::new(0.0, 0.0, 0.1), Color::GREEN).unwrap();
        assert_eq!(dev.framebuffer().get_pixel(4, 4), Some(Color::GREEN));
    }

    #[test]
    fn test_render_reports_shape_errors_from_project() {
        let dev = Device3D::new(4, 4);
        let bad = Matrix::identity(3);
        assert!(matches!(
            dev.project(&bad, Vec3::ZERO),
            Err(RasterError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_line_touching_camera_plane() {
        let camera = Camera::default();
        let view_proj = camera.view_matrix().mul(&camera.projection_matrix()).unwrap();
        let mut dev = Device3D::new(100, 100);

        // Endpoint exactly on the camera plane projects to infinity
        dev.draw_line(&view_proj, Vec3::ZERO, Vec3::new(1.0, 1.0, -5.0), Color::RED)
            .unwrap();
        assert_eq!(dev.framebuffer().get_pixel(50, 50), Some(Color::BLACK));

        // Just in front of it the projection is huge but finite and gets clipped
        dev.draw_line(&view_proj, Vec3::ZERO, Vec3::new(1.0, 1.0, -4.999), Color::RED)
            .unwrap();
        assert_eq!(dev.framebuffer().get_pixel(50, 50), Some(Color::RED));
    }

    #[test]
    fn test_render_samples_diffuse_texture() {
        let checker = Texture::checkerboard(8, 8, Color::WHITE, Color::BLUE);
        let material = Material::new(Color::BLACK, Color::BLACK, Color::BLACK, 10.0)
            .with_diffuse_texture(checker);
        let mesh = Mesh::from_arrays(
            "textured",
            vec![
                Vec3::new(-1.0, -1.0, 2.0),
                Vec3::new(1.0, -1.0, 2.0),
                Vec3::new(0.0, 1.0, 2.0),
            ],
            vec![Vec3::new(0.0, 0.0, -1.0)],
            vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.5, 1.0)],
            vec![Face::new([0, 1, 2], [0, 0, 0], [0, 1, 2])],
        )
        .unwrap()
        .with_material(material);

        let mut dev = Device3D::new(100, 100);
        let light = Light::new(Vec3::new(0.0, 0.0, -100.0));
        dev.render(&Camera::default(), &light, &[mesh]).unwrap();

        // Near the (0, 0) corner: texel column 1, a white cell
        let near_origin = dev.framebuffer().get_pixel(57, 38).unwrap();
        assert!(near_origin.r > 200 && near_origin.g > 200 && near_origin.b > 200, "{:?}", near_origin);

        // Near the (1, 0) corner: texel column 6, a blue cell
        let near_u1 = dev.framebuffer().get_pixel(42, 38).unwrap();
        assert!(near_u1.r < 50 && near_u1.g < 50 && near_u1.b > 200, "{:?}", near_u1);
    }
}

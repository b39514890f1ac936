//! Immediate-mode 2D canvas
//!
//! Every primitive goes through the active transform, is scan-converted on the
//! CPU and written with a depth test against `z_layer`, so later layers can be
//! drawn underneath earlier ones.

use crate::error::RasterResult;
use crate::rasterizer::{
    clip_line, gradient, interpolate, Color, Framebuffer, Rect, TextureSource, Vec2,
};
use super::transform_stack::TransformStack;

/// Segments used to approximate a cubic Bezier curve
const BEZIER_SEGMENTS: usize = 100;

/// x where the edge p0-p1 crosses scanline `y` (clamped to the edge)
fn edge_x(p0: Vec2, p1: Vec2, y: f32) -> f32 {
    interpolate(p0.x, p1.x, gradient(p0.y, p1.y, y))
}

/// Sort three points by ascending y, carrying a payload along
fn sort_by_y<T: Copy>(mut v: [(Vec2, T); 3]) -> [(Vec2, T); 3] {
    if v[0].0.y > v[1].0.y {
        v.swap(0, 1);
    }
    if v[1].0.y > v[2].0.y {
        v.swap(1, 2);
    }
    if v[0].0.y > v[1].0.y {
        v.swap(0, 1);
    }
    v
}

pub struct Device2D {
    fb: Framebuffer,
    transforms: TransformStack,
    path: Option<Vec<Vec2>>,

    pub fill_color: Color,
    pub stroke_color: Color,
    pub fill: bool,
    pub stroke: bool,
    /// Side of the square stamped for every stroked pixel
    pub line_width: i32,
    /// Depth key for all writes; smaller draws on top
    pub z_layer: f32,
}

impl Device2D {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            fb: Framebuffer::new(width, height),
            transforms: TransformStack::new(),
            path: None,
            fill_color: Color::WHITE,
            stroke_color: Color::WHITE,
            fill: true,
            stroke: true,
            line_width: 1,
            z_layer: 0.0,
        }
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

    pub fn transforms(&self) -> &TransformStack {
        &self.transforms
    }

    pub fn clear(&mut self, color: Color) {
        self.fb.clear(color);
    }

    // ------------------------------------------------------------------
    // Transform stack
    // ------------------------------------------------------------------

    pub fn load_identity(&mut self) {
        self.transforms.load_identity();
    }

    pub fn rotate(&mut self, angle: f32) {
        self.transforms.rotate(angle);
    }

    pub fn translate(&mut self, t: Vec2) {
        self.transforms.translate(t);
    }

    pub fn scale(&mut self, s: Vec2) {
        self.transforms.scale(s);
    }

    pub fn push(&mut self) -> bool {
        self.transforms.push()
    }

    pub fn pop(&mut self) -> bool {
        self.transforms.pop()
    }

    // ------------------------------------------------------------------
    // Paths
    // ------------------------------------------------------------------

    /// Start recording the (untransformed) vertices of point and line calls
    pub fn begin_path(&mut self) {
        self.path = Some(Vec::new());
    }

    /// Close the recorded path into a polygon and draw it
    pub fn end_path(&mut self) {
        if let Some(points) = self.path.take() {
            self.draw_polygon(&points);
        }
    }

    fn record(&mut self, p: Vec2) {
        if let Some(path) = self.path.as_mut() {
            if path.last() != Some(&p) {
                path.push(p);
            }
        }
    }

    // ------------------------------------------------------------------
    // Pixel helpers
    // ------------------------------------------------------------------

    fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.fb.set_pixel_with_depth(x, y, self.z_layer, color);
    }

    /// Stamp a `line_width` square centered on (x, y)
    fn put_pixel_stroke(&mut self, x: i32, y: i32) {
        let lo = -(self.line_width - 1) / 2;
        let hi = self.line_width + lo;
        let color = self.stroke_color;
        for wy in lo..hi {
            for wx in lo..hi {
                self.put_pixel(x.saturating_add(wx), y.saturating_add(wy), color);
            }
        }
    }

    /// Rows from `y0` to `y1` that land on the canvas (empty when none do)
    fn row_range(&self, y0: f32, y1: f32) -> (i32, i32) {
        ((y0 as i32).max(0), (y1 as i32).min(self.fb.height as i32 - 1))
    }

    /// Clamp a span to the canvas columns plus a stroke-wide margin
    fn column_range(&self, (xl, xr): (i32, i32)) -> (i32, i32) {
        let margin = self.line_width.max(1);
        (xl.max(-margin), xr.min(self.fb.width as i32 + margin))
    }

    /// Fill one row between xl and xr (inclusive) and stroke its endpoints
    fn scan_line_y(&mut self, y: i32, xl: i32, xr: i32) {
        if y < 0 || y >= self.fb.height as i32 {
            return;
        }
        if self.fill {
            let from = xl.max(0);
            let to = xr.min(self.fb.width as i32 - 1);
            let color = self.fill_color;
            for x in from..=to {
                self.put_pixel(x, y, color);
            }
        }
        if self.stroke {
            self.put_pixel_stroke(xl, y);
            self.put_pixel_stroke(xr, y);
        }
    }

    /// Fill one row from a textured span, sampling the image at the nearest texel
    fn scan_line_texture<T: TextureSource>(
        &mut self,
        image: &T,
        y: i32,
        span: (i32, i32),
        tex: (Vec2, Vec2),
    ) {
        if y < 0 || y >= self.fb.height as i32 {
            return;
        }
        let (xl, xr) = span;
        let from = xl.max(0);
        let to = xr.min(self.fb.width as i32 - 1);
        for x in from..=to {
            let t = interpolate(tex.0, tex.1, gradient(xl as f32, xr as f32, x as f32));
            let color = image.sample_color(t.x as usize, t.y as usize);
            self.put_pixel(x, y, color);
        }
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    pub fn draw_point(&mut self, a: Vec2) {
        self.record(a);
        if !self.stroke {
            return;
        }
        let p = self.transforms.apply(a);
        self.put_pixel_stroke(p.x as i32, p.y as i32);
    }

    /// Bresenham line between the transformed endpoints
    pub fn draw_line(&mut self, a: Vec2, b: Vec2) {
        self.record(a);
        self.record(b);
        if !self.stroke {
            return;
        }
        let a = self.transforms.apply(a);
        let b = self.transforms.apply(b);

        // Clip to the canvas plus a stroke-wide guard band
        let guard = self.line_width.max(1) as f32;
        let min = Vec2::new(-guard, -guard);
        let max = Vec2::new(self.fb.width as f32 + guard, self.fb.height as f32 + guard);
        let Some(clipped) = clip_line(a, b, min, max) else {
            return;
        };
        let (a, b) = (clipped.start, clipped.end);

        let (mut x0, mut y0) = (a.x as i32, a.y as i32);
        let (x1, y1) = (b.x as i32, b.y as i32);

        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = (if dx > dy { dx } else { -dy }) / 2;

        loop {
            self.put_pixel_stroke(x0, y0);
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
        }
    }

    /// Filled and/or stroked triangle
    pub fn draw_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2) {
        let [(a, _), (b, _), (c, _)] = sort_by_y([
            (self.transforms.apply(a), ()),
            (self.transforms.apply(b), ()),
            (self.transforms.apply(c), ()),
        ]);

        // Positive cross: b lies right of the long edge a-c
        let b_right = (b - a).cross(c - a) > 0.0;
        let span = |y: f32, upper: bool| -> (i32, i32) {
            let long = edge_x(a, c, y);
            let short = if upper { edge_x(a, b, y) } else { edge_x(b, c, y) };
            if b_right {
                (long as i32, short as i32)
            } else {
                (short as i32, long as i32)
            }
        };

        // The middle vertex's row is covered by both halves
        let (top, bottom) = self.row_range(a.y, c.y);
        for y in top..=bottom {
            if y as f32 <= b.y {
                let (xl, xr) = span(y as f32, true);
                self.scan_line_y(y, xl, xr);
            }
            if y >= b.y as i32 {
                let (xl, xr) = span(y as f32, false);
                self.scan_line_y(y, xl, xr);
            }
        }

        if self.stroke {
            let (first, last) = (a.y as i32, c.y as i32);
            let (xl, xr) = self.column_range(span(first as f32, true));
            for x in xl..=xr {
                self.put_pixel_stroke(x, first);
            }
            let (xl, xr) = self.column_range(span(last as f32, false));
            for x in xl..=xr {
                self.put_pixel_stroke(x, last);
            }
        }
    }

    /// Axis-aligned rectangle with its top-left corner at `p`
    pub fn draw_rect(&mut self, p: Vec2, w: i32, h: i32) {
        let (w, h) = (w as f32, h as f32);
        self.draw_polygon(&[
            p,
            Vec2::new(p.x + w, p.y),
            Vec2::new(p.x + w, p.y + h),
            Vec2::new(p.x, p.y + h),
        ]);
    }

    /// Even-odd scanline fill of a closed polygon
    pub fn draw_polygon(&mut self, vertices: &[Vec2]) {
        if vertices.is_empty() {
            return;
        }
        let v: Vec<Vec2> = vertices.iter().map(|&p| self.transforms.apply(p)).collect();

        let (min_y, max_y) = v
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        let min_y = min_y.max(0.0) as i32;
        let max_y = max_y.min(self.fb.height as f32 - 1.0) as i32;

        let mut xs: Vec<f32> = Vec::new();
        for y in min_y..=max_y {
            let yf = y as f32;
            xs.clear();
            for i in 0..v.len() {
                let p0 = v[i];
                let p1 = v[(i + 1) % v.len()];
                if p0.y != p1.y {
                    // Half-open so a vertex shared by two edges counts once
                    let (lo, hi) = if p0.y < p1.y { (p0.y, p1.y) } else { (p1.y, p0.y) };
                    if yf >= lo && yf < hi {
                        xs.push(edge_x(p0, p1, yf));
                    }
                } else if y == p0.y as i32 {
                    // Horizontal edges are drawn directly
                    let xl = (p0.x.min(p1.x) as i32).max(0);
                    let xr = (p0.x.max(p1.x) as i32).min(self.fb.width as i32 - 1);
                    if self.stroke {
                        for x in xl..=xr {
                            self.put_pixel_stroke(x, y);
                        }
                    } else {
                        self.scan_line_y(y, xl, xr);
                    }
                }
            }

            xs.sort_by(|a, b| a.total_cmp(b));
            for pair in xs.chunks_exact(2) {
                if pair[1] < 0.0 || pair[0] >= self.fb.width as f32 {
                    continue;
                }
                self.scan_line_y(y, pair[0] as i32, pair[1] as i32);
            }
        }
    }

    pub fn draw_circle(&mut self, c: Vec2, r: i32) {
        self.draw_ellipse(c, r, r);
    }

    /// Midpoint ellipse, filled as mirrored horizontal spans
    pub fn draw_ellipse(&mut self, c: Vec2, rx: i32, ry: i32) {
        if rx < 0 || ry < 0 {
            return;
        }
        let c = self.transforms.apply(c);
        let (cx, cy) = (c.x as i64, c.y as i64);
        let (rx, ry) = (rx as i64, ry as i64);

        let mut a = 2 * rx;
        let b = 2 * ry;
        let mut b1 = b & 1;
        let mut dx = 4 * (1 - a) * b * b;
        let mut dy = 4 * (b1 + 1) * a * a;
        let mut err = dx + dy + b1 * a * a;

        let mut x0 = cx - rx;
        let mut x1 = cx + rx;
        let mut y0 = cy - ry + (b + 1) / 2;
        let mut y1 = y0 - b1;
        a *= 8 * a;
        b1 = 8 * b * b;

        loop {
            self.scan_line_y(y0 as i32, x0 as i32, x1 as i32);
            self.scan_line_y(y1 as i32, x0 as i32, x1 as i32);

            let e2 = 2 * err;
            if e2 <= dy {
                y0 += 1;
                y1 -= 1;
                dy += a;
                err += dy;
            }
            if e2 >= dx || 2 * err > dy {
                x0 += 1;
                x1 -= 1;
                dx += b1;
                err += dx;
            }
            if x0 > x1 {
                break;
            }
        }

        // Flat ellipses finish the tips row by row
        while y0 - y1 < b {
            self.scan_line_y(y0 as i32, (x0 - 1) as i32, (x1 + 1) as i32);
            self.scan_line_y(y1 as i32, (x0 - 1) as i32, (x1 + 1) as i32);
            y0 += 1;
            y1 -= 1;
        }
    }

    /// Cubic Bezier drawn as a polyline sampled from t = 1 down to t = 0
    pub fn draw_bezier(&mut self, a: Vec2, b: Vec2, c: Vec2, d: Vec2) {
        let mut prev = a;
        for i in 0..=BEZIER_SEGMENTS {
            let t = 1.0 - i as f32 / BEZIER_SEGMENTS as f32;
            let s = 1.0 - t;
            let p = a * (t * t * t) + b * (3.0 * t * t * s) + c * (3.0 * t * s * s) + d * (s * s * s);
            self.draw_line(p, prev);
            prev = p;
        }
    }

    /// Circular arc. Walks toward increasing angles when `begin > end`,
    /// decreasing otherwise; segment count grows with radius times sweep.
    pub fn draw_arc(&mut self, c: Vec2, r: f32, begin: f32, end: f32) {
        let sweep = (end - begin).abs().min(std::f32::consts::TAU);
        let steps = (r * sweep) as i32;
        if steps <= 0 {
            return;
        }
        let increment = if begin > end { sweep / steps as f32 } else { -sweep / steps as f32 };

        let point = |angle: f32| Vec2::new(c.x + angle.cos() * r, c.y + angle.sin() * r);
        let mut angle = begin;
        let mut prev = point(angle);
        for _ in 0..steps {
            angle += increment;
            let next = point(angle);
            self.draw_line(prev, next);
            prev = next;
        }
    }

    /// Blit `src` (a rectangle of `image`) into `dst` as two textured
    /// triangles with nearest-texel sampling. The source rectangle is checked
    /// before anything is written.
    pub fn draw_image<T: TextureSource>(&mut self, image: &T, src: Rect, dst: Rect) -> RasterResult<()> {
        src.check_inside(image.width(), image.height())?;
        if src.width == 0 || src.height == 0 || dst.width == 0 || dst.height == 0 {
            return Ok(());
        }

        let corners = |r: Rect| {
            let (x0, y0) = (r.origin.x, r.origin.y);
            let (x1, y1) = (x0 + r.width as f32 - 1.0, y0 + r.height as f32 - 1.0);
            [Vec2::new(x0, y0), Vec2::new(x1, y0), Vec2::new(x0, y1), Vec2::new(x1, y1)]
        };
        let v = corners(dst);
        let t = corners(src);

        self.draw_triangle_image(image, [(v[0], t[0]), (v[1], t[1]), (v[2], t[2])]);
        self.draw_triangle_image(image, [(v[1], t[1]), (v[2], t[2]), (v[3], t[3])]);
        Ok(())
    }

    fn draw_triangle_image<T: TextureSource>(&mut self, image: &T, corners: [(Vec2, Vec2); 3]) {
        let transformed = corners.map(|(p, t)| (self.transforms.apply(p), t));
        let [(va, ta), (vb, tb), (vc, tc)] = sort_by_y(transformed);

        let b_right = (vb - va).cross(vc - va) > 0.0;

        // Edge position and texel at scanline y
        let on_edge = |p0: Vec2, p1: Vec2, t0: Vec2, t1: Vec2, y: f32| {
            let g = gradient(p0.y, p1.y, y);
            (interpolate(p0.x, p1.x, g) as i32, interpolate(t0, t1, g))
        };

        let (top, bottom) = self.row_range(va.y, vc.y);
        for y in top..=bottom {
            let yf = y as f32;
            let long = on_edge(va, vc, ta, tc, yf);
            // Upper half stops short of the middle vertex
            let upper = (yf < vb.y).then(|| on_edge(va, vb, ta, tb, yf));
            let lower = (y >= vb.y as i32).then(|| on_edge(vb, vc, tb, tc, yf));
            for short in upper.into_iter().chain(lower) {
                let (l, r) = if b_right { (long, short) } else { (short, long) };
                self.scan_line_texture(image, y, (l.0, r.0), (l.1, r.1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RasterError;
    use crate::device::STACK_CAPACITY;
    use crate::rasterizer::Texture;

    fn count(dev: &Device2D, color: Color) -> usize {
        let fb = dev.framebuffer();
        (0..fb.height)
            .flat_map(|y| (0..fb.width).map(move |x| (x, y)))
            .filter(|&(x, y)| fb.get_pixel(x, y) == Some(color))
            .count()
    }

    #[test]
    fn test_diagonal_line() {
        let mut dev = Device2D::new(10, 10);
        dev.clear(Color::BLACK);
        dev.stroke_color = Color::WHITE;
        dev.draw_line(Vec2::new(0.0, 0.0), Vec2::new(9.0, 9.0));

        for y in 0..10 {
            for x in 0..10 {
                let expected = if x == y { Color::WHITE } else { Color::BLACK };
                assert_eq!(dev.framebuffer().get_pixel(x, y), Some(expected), "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_line_width_stamps_square() {
        let mut dev = Device2D::new(10, 10);
        dev.line_width = 3;
        dev.stroke_color = Color::RED;
        dev.draw_point(Vec2::new(5.0, 5.0));
        assert_eq!(count(&dev, Color::RED), 9);
        assert_eq!(dev.framebuffer().get_pixel(4, 4), Some(Color::RED));
        assert_eq!(dev.framebuffer().get_pixel(6, 6), Some(Color::RED));
    }

    #[test]
    fn test_z_layer_keeps_nearest() {
        let mut dev = Device2D::new(4, 4);
        dev.stroke_color = Color::RED;
        dev.z_layer = 1.0;
        dev.draw_point(Vec2::new(1.0, 1.0));

        dev.stroke_color = Color::BLUE;
        dev.z_layer = 2.0;
        dev.draw_point(Vec2::new(1.0, 1.0));
        assert_eq!(dev.framebuffer().get_pixel(1, 1), Some(Color::RED));

        dev.stroke_color = Color::GREEN;
        dev.z_layer = 1.0;
        dev.draw_point(Vec2::new(1.0, 1.0));
        assert_eq!(dev.framebuffer().get_pixel(1, 1), Some(Color::GREEN));
    }

    #[test]
    fn test_filled_rect() {
        let mut dev = Device2D::new(20, 20);
        dev.stroke = false;
        dev.fill_color = Color::GREEN;
        dev.draw_rect(Vec2::new(2.0, 3.0), 5, 4);

        let fb = dev.framebuffer();
        assert_eq!(fb.get_pixel(2, 3), Some(Color::GREEN));
        assert_eq!(fb.get_pixel(7, 7), Some(Color::GREEN));
        assert_eq!(fb.get_pixel(8, 5), Some(Color::BLACK));
        assert_eq!(fb.get_pixel(4, 2), Some(Color::BLACK));
        assert_eq!(count(&dev, Color::GREEN), 6 * 5);
    }

    #[test]
    fn test_transform_applies_to_primitives() {
        let mut dev = Device2D::new(20, 20);
        dev.stroke = false;
        dev.fill_color = Color::BLUE;
        dev.translate(Vec2::new(10.0, 10.0));
        dev.draw_rect(Vec2::new(0.0, 0.0), 2, 2);
        assert_eq!(dev.framebuffer().get_pixel(11, 11), Some(Color::BLUE));
        assert_eq!(dev.framebuffer().get_pixel(1, 1), Some(Color::BLACK));
    }

    #[test]
    fn test_filled_triangle_both_orientations() {
        for (b, expect) in [(Vec2::new(10.0, 10.0), (7, 10)), (Vec2::new(0.0, 10.0), (3, 10))] {
            let mut dev = Device2D::new(16, 24);
            dev.stroke = false;
            dev.fill_color = Color::RED;
            dev.draw_triangle(Vec2::new(5.0, 0.0), b, Vec2::new(5.0, 20.0));
            assert_eq!(dev.framebuffer().get_pixel(expect.0, expect.1), Some(Color::RED));
            assert_eq!(dev.framebuffer().get_pixel(14, 20), Some(Color::BLACK));
            assert!(count(&dev, Color::RED) > 40);
        }
    }

    #[test]
    fn test_circle_is_symmetric() {
        let mut dev = Device2D::new(21, 21);
        dev.stroke = false;
        dev.fill_color = Color::WHITE;
        dev.draw_circle(Vec2::new(10.0, 10.0), 5);

        let fb = dev.framebuffer();
        assert_eq!(fb.get_pixel(10, 10), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(10, 5), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(15, 10), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(10, 16), Some(Color::BLACK));
        assert_eq!(fb.get_pixel(15, 15), Some(Color::BLACK));
        for y in 0..21 {
            for x in 0..21 {
                assert_eq!(fb.get_pixel(x, y), fb.get_pixel(20 - x, y));
                assert_eq!(fb.get_pixel(x, y), fb.get_pixel(x, 20 - y));
            }
        }
    }

    #[test]
    fn test_path_fills_polygon() {
        let mut dev = Device2D::new(20, 20);
        dev.stroke = true;
        dev.fill_color = Color::GREEN;
        dev.stroke_color = Color::GREEN;
        dev.begin_path();
        dev.draw_line(Vec2::new(2.0, 2.0), Vec2::new(15.0, 2.0));
        dev.draw_line(Vec2::new(15.0, 2.0), Vec2::new(15.0, 15.0));
        dev.end_path();
        // Closing edge runs back to (2, 2); interior filled from the recorded points
        assert_eq!(dev.framebuffer().get_pixel(12, 5), Some(Color::GREEN));
        assert_eq!(dev.framebuffer().get_pixel(3, 12), Some(Color::BLACK));
    }

    #[test]
    fn test_bezier_and_arc_endpoints() {
        let mut dev = Device2D::new(40, 40);
        dev.stroke_color = Color::RED;
        dev.draw_bezier(
            Vec2::new(2.0, 2.0),
            Vec2::new(10.0, 30.0),
            Vec2::new(30.0, 30.0),
            Vec2::new(35.0, 5.0),
        );
        assert_eq!(dev.framebuffer().get_pixel(2, 2), Some(Color::RED));
        assert_eq!(dev.framebuffer().get_pixel(35, 5), Some(Color::RED));

        dev.clear(Color::BLACK);
        dev.draw_arc(Vec2::new(20.0, 20.0), 10.0, 0.0, std::f32::consts::PI);
        assert_eq!(dev.framebuffer().get_pixel(30, 20), Some(Color::RED));
        assert!(count(&dev, Color::RED) > 20);
    }

    #[test]
    fn test_draw_image_copies_texels() {
        let tex = Texture::checkerboard(8, 8, Color::WHITE, Color::BLUE);
        let mut dev = Device2D::new(16, 16);
        dev.draw_image(&tex, Rect::new(0.0, 0.0, 8, 8), Rect::new(4.0, 4.0, 8, 8))
            .unwrap();
        let fb = dev.framebuffer();
        assert_eq!(fb.get_pixel(4, 4), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(9, 5), Some(Color::BLUE));
        assert_eq!(fb.get_pixel(2, 2), Some(Color::BLACK));
    }

    #[test]
    fn test_draw_image_out_of_bounds_writes_nothing() {
        let tex = Texture::solid(8, 8, Color::RED);
        let mut dev = Device2D::new(16, 16);
        let before = dev.buffer().to_vec();

        let result = dev.draw_image(&tex, Rect::new(4.0, 0.0, 5, 4), Rect::new(0.0, 0.0, 8, 8));
        assert!(matches!(result, Err(RasterError::InvalidArgument(_))));
        assert_eq!(dev.buffer(), &before[..]);
    }

    fn count_where(dev: &Device2D, color: Color, keep: impl Fn(usize, usize) -> bool) -> usize {
        let fb = dev.framebuffer();
        (0..fb.height)
            .flat_map(|y| (0..fb.width).map(move |x| (x, y)))
            .filter(|&(x, y)| keep(x, y) && fb.get_pixel(x, y) == Some(color))
            .count()
    }

    #[test]
    fn test_far_off_canvas_geometry_is_clipped() {
        let mut dev = Device2D::new(10, 10);
        dev.draw_line(Vec2::new(-3e9, 5.0), Vec2::new(3e9, 5.0));
        for x in 0..10 {
            assert_eq!(dev.framebuffer().get_pixel(x, 5), Some(Color::WHITE));
        }
        assert_eq!(count(&dev, Color::WHITE), 10);

        dev.clear(Color::BLACK);
        dev.stroke = false;
        dev.fill_color = Color::GREEN;
        dev.draw_triangle(Vec2::new(5.0, -3e9), Vec2::new(9.0, 9.0), Vec2::new(0.0, 9.0));
        assert_eq!(dev.framebuffer().get_pixel(4, 8), Some(Color::GREEN));

        // Saturates instead of overflowing
        dev.stroke = true;
        dev.line_width = 3;
        dev.draw_point(Vec2::new(3e9, -3e9));
    }

    #[test]
    fn test_concave_polygon_leaves_notch() {
        let mut dev = Device2D::new(20, 20);
        dev.stroke = false;
        dev.fill_color = Color::RED;
        // U shape open at the top, notch between x = 7 and x = 11
        dev.draw_polygon(&[
            Vec2::new(2.0, 2.0),
            Vec2::new(7.0, 2.0),
            Vec2::new(7.0, 8.0),
            Vec2::new(11.0, 8.0),
            Vec2::new(11.0, 2.0),
            Vec2::new(16.0, 2.0),
            Vec2::new(16.0, 14.0),
            Vec2::new(2.0, 14.0),
        ]);

        let fb = dev.framebuffer();
        assert_eq!(fb.get_pixel(4, 5), Some(Color::RED));
        assert_eq!(fb.get_pixel(13, 5), Some(Color::RED));
        assert_eq!(fb.get_pixel(9, 5), Some(Color::BLACK));
        assert_eq!(fb.get_pixel(9, 11), Some(Color::RED));
        assert_eq!(fb.get_pixel(18, 11), Some(Color::BLACK));
    }

    #[test]
    fn test_arc_direction_follows_angle_order() {
        let c = Vec2::new(20.0, 20.0);

        // begin < end: angles decrease from 0, sweeping through the upper half
        let mut dev = Device2D::new(40, 40);
        dev.stroke_color = Color::RED;
        dev.draw_arc(c, 10.0, 0.0, std::f32::consts::PI);
        assert_eq!(dev.framebuffer().get_pixel(20, 10), Some(Color::RED));
        assert_eq!(dev.framebuffer().get_pixel(20, 30), Some(Color::BLACK));
        assert_eq!(count_where(&dev, Color::RED, |_, y| y > 21), 0);

        // begin > end: angles increase from PI/2, sweeping the lower-left quadrant
        let mut dev = Device2D::new(40, 40);
        dev.stroke_color = Color::RED;
        dev.draw_arc(c, 10.0, std::f32::consts::FRAC_PI_2, 0.0);
        assert!(count_where(&dev, Color::RED, |x, y| x < 15 && y > 21) > 0);
        assert_eq!(count_where(&dev, Color::RED, |x, _| x > 21), 0);
        assert_eq!(count_where(&dev, Color::RED, |_, y| y < 19), 0);
    }

    #[test]
    fn test_push_reports_overflow() {
        let mut dev = Device2D::new(4, 4);
        for _ in 1..STACK_CAPACITY {
            assert!(dev.push());
        }
        assert!(!dev.push());
        assert_eq!(dev.transforms().depth(), STACK_CAPACITY);

        while dev.pop() {}
        assert_eq!(dev.transforms().depth(), 1);
        assert!(!dev.pop());
    }
}

//! Line clipping against an axis-aligned box

use super::math::Vec2;

/// Visible part of a clipped segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClippedLine {
    pub start: Vec2,
    pub end: Vec2,
    /// Parameter range along the original segment, for carrying depth
    pub t0: f32,
    pub t1: f32,
}

/// Liang-Barsky clip of the segment `a`-`b` against `[min, max]`.
///
/// Works in f64 so endpoints billions of pixels away still land on the box
/// edge. Returns `None` when nothing is visible or an endpoint is not finite.
/// Endpoints inside the box come back unchanged.
pub fn clip_line(a: Vec2, b: Vec2, min: Vec2, max: Vec2) -> Option<ClippedLine> {
    if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
        return None;
    }

    let (ax, ay) = (a.x as f64, a.y as f64);
    let (dx, dy) = (b.x as f64 - ax, b.y as f64 - ay);
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;

    let edges = [
        (-dx, ax - min.x as f64),
        (dx, max.x as f64 - ax),
        (-dy, ay - min.y as f64),
        (dy, max.y as f64 - ay),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            // Parallel to this edge
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| Vec2::new((ax + dx * t) as f32, (ay + dy * t) as f32);
    Some(ClippedLine {
        start: if t0 > 0.0 { at(t0) } else { a },
        end: if t1 < 1.0 { at(t1) } else { b },
        t0: t0 as f32,
        t1: t1 as f32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    const MAX: Vec2 = Vec2 { x: 10.0, y: 10.0 };

    #[test]
    fn test_inside_segment_untouched() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(8.0, 9.0);
        let c = clip_line(a, b, MIN, MAX).unwrap();
        assert_eq!((c.start, c.end, c.t0, c.t1), (a, b, 0.0, 1.0));
    }

    #[test]
    fn test_crossing_segment_is_trimmed() {
        let c = clip_line(Vec2::new(-10.0, 5.0), Vec2::new(20.0, 5.0), MIN, MAX).unwrap();
        assert!(c.start.x.abs() < 1e-4);
        assert!((c.end.x - 10.0).abs() < 1e-4);
        assert!((c.t0 - 1.0 / 3.0).abs() < 1e-6);
        assert!((c.t1 - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_huge_endpoints_land_on_the_box() {
        let c = clip_line(Vec2::new(-3e9, 5.0), Vec2::new(3e9, 5.0), MIN, MAX).unwrap();
        assert!(c.start.x.abs() < 1e-3);
        assert!((c.end.x - 10.0).abs() < 1e-3);
        assert_eq!(c.start.y, 5.0);
    }

    #[test]
    fn test_rejects_outside_and_non_finite() {
        assert_eq!(clip_line(Vec2::new(-5.0, -1.0), Vec2::new(20.0, -1.0), MIN, MAX), None);
        assert_eq!(clip_line(Vec2::new(f32::INFINITY, 1.0), Vec2::new(1.0, 1.0), MIN, MAX), None);
        assert_eq!(clip_line(Vec2::new(f32::NAN, 1.0), Vec2::new(1.0, 1.0), MIN, MAX), None);
    }
}

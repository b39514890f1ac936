//! Fixed-depth stack of 2D affine transforms (3x3, row-vector convention)

use crate::rasterizer::{Matrix, Vec2};

/// Maximum number of entries, base included
pub const STACK_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub struct TransformStack {
    entries: Vec<Matrix>,
}

impl TransformStack {
    pub fn new() -> Self {
        let mut entries = Vec::with_capacity(STACK_CAPACITY);
        entries.push(Matrix::identity(3));
        Self { entries }
    }

    /// Number of entries, 1 at the base
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn top(&self) -> &Matrix {
        // entries is never empty: pop refuses to remove the base
        &self.entries[self.entries.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Matrix {
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    /// Duplicate the top entry. Returns false (and changes nothing) when full.
    pub fn push(&mut self) -> bool {
        if self.entries.len() >= STACK_CAPACITY {
            log::warn!("transform stack overflow (capacity {})", STACK_CAPACITY);
            return false;
        }
        let copy = self.top().clone();
        self.entries.push(copy);
        true
    }

    /// Drop the top entry. Returns false (and changes nothing) at the base.
    pub fn pop(&mut self) -> bool {
        if self.entries.len() <= 1 {
            log::warn!("transform stack underflow");
            return false;
        }
        self.entries.pop();
        true
    }

    pub fn load_identity(&mut self) {
        *self.top_mut() = Matrix::identity(3);
    }

    /// Prepend `op`, so it acts on points before the current transform
    fn compose(&mut self, op: Matrix) {
        match op.mul(self.top()) {
            Ok(m) => *self.top_mut() = m,
            Err(e) => log::error!("transform compose failed: {}", e),
        }
    }

    pub fn rotate(&mut self, angle: f32) {
        let (sin, cos) = angle.sin_cos();
        let mut r = Matrix::identity(3);
        r[(0, 0)] = cos;
        r[(1, 0)] = -sin;
        r[(0, 1)] = sin;
        r[(1, 1)] = cos;
        self.compose(r);
    }

    pub fn translate(&mut self, t: Vec2) {
        let mut m = Matrix::identity(3);
        m[(2, 0)] = t.x;
        m[(2, 1)] = t.y;
        self.compose(m);
    }

    pub fn scale(&mut self, s: Vec2) {
        let mut m = Matrix::identity(3);
        m[(0, 0)] = s.x;
        m[(1, 1)] = s.y;
        self.compose(m);
    }

    /// Map a point through the top transform
    pub fn apply(&self, v: Vec2) -> Vec2 {
        let m = self.top();
        Vec2::new(
            v.x * m[(0, 0)] + v.y * m[(1, 0)] + m[(2, 0)],
            v.x * m[(0, 1)] + v.y * m[(1, 1)] + m[(2, 1)],
        )
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

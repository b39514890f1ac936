//! Dense row-major matrix with a shape fixed at construction
//!
//! Transform builders follow the row-vector convention used by `math`:
//! translation lives in the last row and `a * b` applies `a` first.

use std::ops::{Index, IndexMut};

use super::math::Vec3;
use crate::error::{RasterError, RasterResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// Zero-filled matrix. Both dimensions must be non-zero.
    pub fn new(rows: usize, cols: usize) -> RasterResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(RasterError::InvalidArgument(format!(
                "matrix needs at least one row and column, got {}x{}",
                rows, cols
            )));
        }
        Ok(Self::zeroed(rows, cols))
    }

    fn zeroed(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build from row-major values
    pub fn from_rows(rows: usize, cols: usize, data: Vec<f32>) -> RasterResult<Self> {
        if rows == 0 || cols == 0 || data.len() != rows * cols {
            return Err(RasterError::InvalidArgument(format!(
                "{} values cannot fill a {}x{} matrix",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// `n x n` identity. A matrix always has at least one row and column,
    /// so `n == 0` gives the 1x1 identity rather than an error.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeroed(n.max(1), n.max(1));
        for i in 0..m.rows {
            m[(i, i)] = 1.0;
        }
        m
    }

    /// 4x4 Euler rotation from the angles (x, y, z) in radians
    pub fn rotation(angles: Vec3) -> Self {
        let (sin_a, cos_a) = angles.x.sin_cos();
        let (sin_b, cos_b) = angles.y.sin_cos();
        let (sin_g, cos_g) = angles.z.sin_cos();

        let mut r = Self::zeroed(4, 4);
        r[(0, 0)] = cos_a * cos_g - sin_a * cos_b * sin_g;
        r[(0, 1)] = sin_a * cos_g + cos_a * cos_b * sin_g;
        r[(0, 2)] = sin_b * sin_g;

        r[(1, 0)] = -cos_a * sin_g - sin_a * cos_b * cos_g;
        r[(1, 1)] = -sin_a * sin_g + cos_a * cos_b * cos_g;
        r[(1, 2)] = sin_b * cos_g;

        r[(2, 0)] = sin_a * sin_b;
        r[(2, 1)] = -cos_a * sin_b;
        r[(2, 2)] = cos_b;

        r[(3, 3)] = 1.0;
        r
    }

    /// 4x4 translation
    pub fn translation(t: Vec3) -> Self {
        let mut m = Self::identity(4);
        m[(3, 0)] = t.x;
        m[(3, 1)] = t.y;
        m[(3, 2)] = t.z;
        m
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Bounds-checked read
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i < self.rows && j < self.cols {
            Some(self.data[i * self.cols + j])
        } else {
            None
        }
    }

    pub(crate) fn expect_shape(&self, op: &'static str, rows: usize, cols: usize) -> RasterResult<()> {
        if self.shape() != (rows, cols) {
            return Err(RasterError::ShapeMismatch {
                op,
                left: (1, rows),
                right: self.shape(),
            });
        }
        Ok(())
    }

    fn same_shape(&self, other: &Matrix, op: &'static str) -> RasterResult<()> {
        if self.shape() != other.shape() {
            return Err(RasterError::ShapeMismatch {
                op,
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(())
    }

    pub fn add(&self, other: &Matrix) -> RasterResult<Matrix> {
        self.same_shape(other, "add")?;
        Ok(self.zip_with(other, |a, b| a + b))
    }

    pub fn sub(&self, other: &Matrix) -> RasterResult<Matrix> {
        self.same_shape(other, "sub")?;
        Ok(self.zip_with(other, |a, b| a - b))
    }

    fn zip_with(&self, other: &Matrix, f: impl Fn(f32, f32) -> f32) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(&other.data).map(|(&a, &b)| f(a, b)).collect(),
        }
    }

    /// Matrix product `self * other`
    pub fn mul(&self, other: &Matrix) -> RasterResult<Matrix> {
        if self.cols != other.rows {
            return Err(RasterError::ShapeMismatch {
                op: "mul",
                left: self.shape(),
                right: other.shape(),
            });
        }

        let mut c = Self::zeroed(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self[(i, k)];
                if a == 0.0 {
                    continue;
                }
                for j in 0..other.cols {
                    c[(i, j)] += a * other[(k, j)];
                }
            }
        }
        Ok(c)
    }

    pub fn scale(&self, s: f32) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|v| v * s).collect(),
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f32;

    fn index(&self, (i, j): (usize, usize)) -> &f32 {
        assert!(i < self.rows && j < self.cols, "matrix index ({}, {}) out of bounds", i, j);
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f32 {
        assert!(i < self.rows && j < self.cols, "matrix index ({}, {}) out of bounds", i, j);
        &mut self.data[i * self.cols + j]
    }
}

//! Fixed-size square matrices.
//!
//! Entries are stored row-major and addressed as `(row, col)`, matching the
//! `m{row}{col}` naming used by the transform formulas (`m14` is row 0,
//! column 3 in zero-based terms). Values are immutable once built; every
//! operation returns a fresh matrix.

use std::ops::Mul;

use crate::errors::{KineError, Result};
use crate::math::vector::{Vector3, Vector4};

/// Validates that `rows` is an `n x n` grid.
fn check_shape<R: AsRef<[f64]>>(rows: &[R], n: usize) -> Result<()> {
    if rows.len() != n {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        return Err(KineError::Shape {
            expected: n,
            rows: rows.len(),
            cols,
        });
    }
    if let Some(bad) = rows.iter().find(|r| r.as_ref().len() != n) {
        return Err(KineError::Shape {
            expected: n,
            rows: rows.len(),
            cols: bad.as_ref().len(),
        });
    }
    Ok(())
}

#[inline]
fn sign(row: usize, col: usize) -> f64 {
    if (row + col) % 2 == 0 { 1.0 } else { -1.0 }
}

// ============================================================================
// Matrix2
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix2 {
    m: [[f64; 2]; 2],
}

impl Matrix2 {
    pub const IDENTITY: Self = Self::from_array([[1.0, 0.0], [0.0, 1.0]]);

    #[must_use]
    pub const fn from_array(m: [[f64; 2]; 2]) -> Self {
        Self { m }
    }

    /// Builds a matrix from a row list, failing on any shape other than 2x2.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        check_shape(rows, 2)?;
        let r = |i: usize, j: usize| rows[i].as_ref()[j];
        Ok(Self::from_array([[r(0, 0), r(0, 1)], [r(1, 0), r(1, 1)]]))
    }

    /// Element at `row`, `col`.
    ///
    /// # Panics
    ///
    /// Panics when either index is out of range; see [`Self::try_get`].
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[row][col]
    }

    /// Element at `row`, `col`, or `None` when out of range.
    #[inline]
    #[must_use]
    pub fn try_get(&self, row: usize, col: usize) -> Option<f64> {
        self.m.get(row)?.get(col).copied()
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        let m = &self.m;
        Self::from_array([[m[0][0], m[1][0]], [m[0][1], m[1][1]]])
    }

    #[must_use]
    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0][0] * m[1][1] - m[0][1] * m[1][0]
    }

    pub fn inverse(&self) -> Result<Self> {
        let det = self.determinant();
        if det == 0.0 {
            return Err(KineError::SingularMatrix);
        }
        let m = &self.m;
        Ok(Self::from_array([
            [m[1][1] / det, -m[0][1] / det],
            [-m[1][0] / det, m[0][0] / det],
        ]))
    }

    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        let mut out = [[0.0; 2]; 2];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..2).map(|k| self.m[i][k] * other.m[k][j]).sum();
            }
        }
        Self::from_array(out)
    }
}

// ============================================================================
// Matrix3
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3 {
    m: [[f64; 3]; 3],
}

impl Matrix3 {
    pub const IDENTITY: Self =
        Self::from_array([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    #[must_use]
    pub const fn from_array(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    /// Builds a matrix from a row list, failing on any shape other than 3x3.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        check_shape(rows, 3)?;
        let mut m = [[0.0; 3]; 3];
        for (dst, src) in m.iter_mut().zip(rows) {
            dst.copy_from_slice(src.as_ref());
        }
        Ok(Self::from_array(m))
    }

    /// Element at `row`, `col`.
    ///
    /// # Panics
    ///
    /// Panics when either index is out of range; see [`Self::try_get`].
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[row][col]
    }

    /// Element at `row`, `col`, or `None` when out of range.
    #[inline]
    #[must_use]
    pub fn try_get(&self, row: usize, col: usize) -> Option<f64> {
        self.m.get(row)?.get(col).copied()
    }

    /// The 2x2 matrix left after deleting `row` and `col`.
    #[must_use]
    pub fn minor(&self, row: usize, col: usize) -> Matrix2 {
        let mut out = [[0.0; 2]; 2];
        let mut oi = 0;
        for i in (0..3).filter(|&i| i != row) {
            let mut oj = 0;
            for j in (0..3).filter(|&j| j != col) {
                out[oi][oj] = self.m[i][j];
                oj += 1;
            }
            oi += 1;
        }
        Matrix2::from_array(out)
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut out = [[0.0; 3]; 3];
        for (i, row) in self.m.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                out[j][i] = v;
            }
        }
        Self::from_array(out)
    }

    /// Cofactor expansion along the first row.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        (0..3)
            .map(|j| sign(0, j) * self.m[0][j] * self.minor(0, j).determinant())
            .sum()
    }

    /// Adjugate divided by the determinant.
    pub fn inverse(&self) -> Result<Self> {
        let det = self.determinant();
        if det == 0.0 {
            return Err(KineError::SingularMatrix);
        }
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                // adjugate: cofactor of (j, i)
                *cell = sign(j, i) * self.minor(j, i).determinant() / det;
            }
        }
        Ok(Self::from_array(out))
    }

    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[i][k] * other.m[k][j]).sum();
            }
        }
        Self::from_array(out)
    }
}

// ============================================================================
// Matrix4
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4 {
    m: [[f64; 4]; 4],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    pub const IDENTITY: Self = Self::from_array([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    #[must_use]
    pub const fn from_array(m: [[f64; 4]; 4]) -> Self {
        Self { m }
    }

    /// Builds a matrix from a row list, failing on any shape other than 4x4.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        check_shape(rows, 4)?;
        let mut m = [[0.0; 4]; 4];
        for (dst, src) in m.iter_mut().zip(rows) {
            dst.copy_from_slice(src.as_ref());
        }
        Ok(Self::from_array(m))
    }

    /// Builds a matrix whose columns are the given vectors.
    #[must_use]
    pub fn from_cols(c0: Vector4, c1: Vector4, c2: Vector4, c3: Vector4) -> Self {
        Self::from_array([
            [c0.x, c1.x, c2.x, c3.x],
            [c0.y, c1.y, c2.y, c3.y],
            [c0.z, c1.z, c2.z, c3.z],
            [c0.w, c1.w, c2.w, c3.w],
        ])
    }

    /// Element at `row`, `col`.
    ///
    /// # Panics
    ///
    /// Panics when either index is out of range; see [`Self::try_get`].
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[row][col]
    }

    /// Element at `row`, `col`, or `None` when out of range.
    #[inline]
    #[must_use]
    pub fn try_get(&self, row: usize, col: usize) -> Option<f64> {
        self.m.get(row)?.get(col).copied()
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[[f64; 4]; 4] {
        &self.m
    }

    #[must_use]
    pub fn row(&self, row: usize) -> Vector4 {
        let r = self.m[row];
        Vector4::new(r[0], r[1], r[2], r[3])
    }

    #[must_use]
    pub fn col(&self, col: usize) -> Vector4 {
        Vector4::new(self.m[0][col], self.m[1][col], self.m[2][col], self.m[3][col])
    }

    /// Translation column `(m14, m24, m34)`.
    #[must_use]
    pub fn translation(&self) -> Vector3 {
        Vector3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    /// Row-major entries, for buffer upload.
    #[must_use]
    pub fn flatten(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        for (i, row) in self.m.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(row);
        }
        out
    }

    /// The 3x3 matrix left after deleting `row` and `col`.
    #[must_use]
    pub fn minor(&self, row: usize, col: usize) -> Matrix3 {
        let mut out = [[0.0; 3]; 3];
        let mut oi = 0;
        for i in (0..4).filter(|&i| i != row) {
            let mut oj = 0;
            for j in (0..4).filter(|&j| j != col) {
                out[oi][oj] = self.m[i][j];
                oj += 1;
            }
            oi += 1;
        }
        Matrix3::from_array(out)
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut out = [[0.0; 4]; 4];
        for (i, row) in self.m.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                out[j][i] = v;
            }
        }
        Self::from_array(out)
    }

    /// Cofactor expansion along the first row.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        (0..4)
            .map(|j| sign(0, j) * self.m[0][j] * self.minor(0, j).determinant())
            .sum()
    }

    /// Adjugate divided by the determinant.
    ///
    /// Fails with [`KineError::SingularMatrix`] only when the determinant is
    /// exactly zero; nearly singular input is inverted as-is.
    pub fn inverse(&self) -> Result<Self> {
        let det = self.determinant();
        if det == 0.0 {
            return Err(KineError::SingularMatrix);
        }
        let mut out = [[0.0; 4]; 4];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = sign(j, i) * self.minor(j, i).determinant() / det;
            }
        }
        Ok(Self::from_array(out))
    }

    /// `self · other`. The right operand is applied first to a column vector.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        let mut out = [[0.0; 4]; 4];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[i][k] * other.m[k][j]).sum();
            }
        }
        Self::from_array(out)
    }

    #[must_use]
    pub fn transform(&self, v: Vector4) -> Vector4 {
        Vector4::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
            self.row(3).dot(v),
        )
    }

    /// Inverse-transpose, used to carry normals into world space.
    pub fn normal_matrix(&self) -> Result<Self> {
        Ok(self.inverse()?.transpose())
    }

    /// Largest absolute entry-wise difference to `other`.
    #[must_use]
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.flatten()
            .iter()
            .zip(other.flatten().iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl Mul for Matrix4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl Mul<Vector4> for Matrix4 {
    type Output = Vector4;

    fn mul(self, rhs: Vector4) -> Vector4 {
        self.transform(rhs)
    }
}

impl From<Matrix4> for glam::DMat4 {
    /// glam is column-major; the row-major entries are transposed on the way in.
    fn from(m: Matrix4) -> Self {
        glam::DMat4::from_cols_array_2d(&m.m).transpose()
    }
}

impl From<glam::DMat4> for Matrix4 {
    fn from(m: glam::DMat4) -> Self {
        Self::from_array(m.transpose().to_cols_array_2d())
    }
}

use serde::{Deserialize, Serialize};

use crate::math::{Matrix4, Vector3};

/// Pivot-based rigid transformation record.
///
/// Rotation angles are in degrees. The composite matrix moves the pivot to
/// the origin, rotates and scales there, restores the pivot and finally
/// applies the translation:
///
/// ```text
/// T(t) · T(p) · R(r) · S(s) · T(-p)
/// ```
///
/// A zero scale is legal and yields a singular matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    pub sx: f64,
    pub sy: f64,
    pub sz: f64,
}

impl Default for Transformation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transformation {
    /// No translation, no rotation, unit scale, pivot at the origin.
    pub const IDENTITY: Self = Self::new(
        0.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, //
        1.0, 1.0, 1.0,
    );

    #[must_use]
    pub const fn new(
        px: f64,
        py: f64,
        pz: f64,
        tx: f64,
        ty: f64,
        tz: f64,
        rx: f64,
        ry: f64,
        rz: f64,
        sx: f64,
        sy: f64,
        sz: f64,
    ) -> Self {
        Self {
            px,
            py,
            pz,
            tx,
            ty,
            tz,
            rx,
            ry,
            rz,
            sx,
            sy,
            sz,
        }
    }

    /// Identity transformation about the given pivot.
    #[must_use]
    pub const fn from_pivot(pivot: Vector3) -> Self {
        let mut t = Self::IDENTITY;
        t.px = pivot.x;
        t.py = pivot.y;
        t.pz = pivot.z;
        t
    }

    #[must_use]
    pub fn with_pivot(mut self, pivot: Vector3) -> Self {
        self.px = pivot.x;
        self.py = pivot.y;
        self.pz = pivot.z;
        self
    }

    #[inline]
    #[must_use]
    pub fn pivot(&self) -> Vector3 {
        Vector3::new(self.px, self.py, self.pz)
    }

    #[inline]
    #[must_use]
    pub fn translate(&self) -> Vector3 {
        Vector3::new(self.tx, self.ty, self.tz)
    }

    #[inline]
    #[must_use]
    pub fn rotate(&self) -> Vector3 {
        Vector3::new(self.rx, self.ry, self.rz)
    }

    #[inline]
    #[must_use]
    pub fn scale(&self) -> Vector3 {
        Vector3::new(self.sx, self.sy, self.sz)
    }

    /// Layers `offset` on top of `self`: translation and rotation add, scale
    /// multiplies. The pivot of `self` is kept.
    #[must_use]
    pub fn offset_by(&self, offset: &Self) -> Self {
        Self {
            px: self.px,
            py: self.py,
            pz: self.pz,
            tx: self.tx + offset.tx,
            ty: self.ty + offset.ty,
            tz: self.tz + offset.tz,
            rx: self.rx + offset.rx,
            ry: self.ry + offset.ry,
            rz: self.rz + offset.rz,
            sx: self.sx * offset.sx,
            sy: self.sy * offset.sy,
            sz: self.sz * offset.sz,
        }
    }

    // ========================================================================
    // Matrix builders
    // ========================================================================

    #[must_use]
    pub fn translation(tx: f64, ty: f64, tz: f64) -> Matrix4 {
        Matrix4::from_array([
            [1.0, 0.0, 0.0, tx],
            [0.0, 1.0, 0.0, ty],
            [0.0, 0.0, 1.0, tz],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    #[must_use]
    pub fn scaling(sx: f64, sy: f64, sz: f64) -> Matrix4 {
        Matrix4::from_array([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Combined XYZ Euler rotation, angles in degrees.
    ///
    /// Built directly from the closed-form 3x3 block rather than by
    /// multiplying three single-axis rotations.
    #[must_use]
    pub fn rotation(rx: f64, ry: f64, rz: f64) -> Matrix4 {
        let (sin_x, cos_x) = rx.to_radians().sin_cos();
        let (sin_y, cos_y) = ry.to_radians().sin_cos();
        let (sin_z, cos_z) = rz.to_radians().sin_cos();

        Matrix4::from_array([
            [cos_y * cos_z, -cos_y * sin_z, sin_y, 0.0],
            [
                cos_z * sin_x * sin_y + cos_x * sin_z,
                -sin_x * sin_y * sin_z + cos_x * cos_z,
                -cos_y * sin_x,
                0.0,
            ],
            [
                -cos_x * cos_z * sin_y + sin_x * sin_z,
                cos_x * sin_y * sin_z + cos_z * sin_x,
                cos_x * cos_y,
                0.0,
            ],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Composite 4x4 matrix `T(t) · T(p) · R(r) · S(s) · T(-p)`.
    #[must_use]
    pub fn matrix(&self) -> Matrix4 {
        Self::translation(self.tx, self.ty, self.tz)
            * Self::translation(self.px, self.py, self.pz)
            * Self::rotation(self.rx, self.ry, self.rz)
            * Self::scaling(self.sx, self.sy, self.sz)
            * Self::translation(-self.px, -self.py, -self.pz)
    }
}

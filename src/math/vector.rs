use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::errors::{KineError, Result};

/// Lengths below this are treated as zero when normalizing.
pub const NORMALIZE_EPSILON: f64 = 1e-6;

#[inline]
fn check_len(values: &[f64], expected: usize) -> Result<()> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(KineError::Shape {
            expected,
            rows: 1,
            cols: values.len(),
        })
    }
}

/// Texture coordinate / 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn from_slice(values: &[f64]) -> Result<Self> {
        check_len(values, 2)?;
        Ok(Self::new(values[0], values[1]))
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub fn normalize(self) -> Self {
        let length = self.length();
        if length < NORMALIZE_EPSILON {
            Self::ZERO
        } else {
            Self::new(self.x / length, self.y / length)
        }
    }

    #[must_use]
    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Three-component vector, used for colors and directions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_slice(values: &[f64]) -> Result<Self> {
        check_len(values, 3)?;
        Ok(Self::new(values[0], values[1], values[2]))
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit-length copy of this vector.
    ///
    /// A vector shorter than [`NORMALIZE_EPSILON`] normalizes to the zero
    /// vector instead of producing NaN.
    #[must_use]
    pub fn normalize(self) -> Self {
        let length = self.length();
        if length < NORMALIZE_EPSILON {
            Self::ZERO
        } else {
            Self::new(self.x / length, self.y / length, self.z / length)
        }
    }

    /// Extends to a homogeneous vector with the given `w`.
    #[must_use]
    pub fn extend(self, w: f64) -> Vector4 {
        Vector4::new(self.x, self.y, self.z, w)
    }

    #[must_use]
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Homogeneous vector. `w = 1` marks a point, `w = 0` a direction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vector4 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    #[must_use]
    pub const fn point(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, 1.0)
    }

    pub fn from_slice(values: &[f64]) -> Result<Self> {
        check_len(values, 4)?;
        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Cross product of the `xyz` parts. The result is a direction (`w = 0`).
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        self.truncate().cross(other.truncate()).extend(0.0)
    }

    /// Normalizes the `xyz` part and returns a direction (`w = 0`).
    #[must_use]
    pub fn normalize(self) -> Self {
        self.truncate().normalize().extend(0.0)
    }

    #[must_use]
    pub fn truncate(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    #[must_use]
    pub fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl Add for Vector4 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl Sub for Vector4 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ============================================================================
// glam interop
// ============================================================================

impl From<Vector3> for glam::DVec3 {
    fn from(v: Vector3) -> Self {
        glam::DVec3::new(v.x, v.y, v.z)
    }
}

impl From<glam::DVec3> for Vector3 {
    fn from(v: glam::DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector4> for glam::DVec4 {
    fn from(v: Vector4) -> Self {
        glam::DVec4::new(v.x, v.y, v.z, v.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_of_axes() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(y.cross(x), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn cross4_drops_w() {
        let a = Vector4::new(1.0, 0.0, 0.0, 1.0);
        let b = Vector4::new(0.0, 1.0, 0.0, 1.0);
        assert_eq!(a.cross(b), Vector4::new(0.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(Vector3::ZERO.normalize(), Vector3::ZERO);
        assert_eq!(Vector4::point(0.0, 0.0, 0.0).normalize(), Vector4::ZERO);
    }

    #[test]
    fn from_slice_rejects_wrong_length() {
        assert!(matches!(
            Vector3::from_slice(&[1.0, 2.0]),
            Err(KineError::Shape { expected: 3, cols: 2, .. })
        ));
        assert!(Vector4::from_slice(&[1.0, 2.0, 3.0, 4.0]).is_ok());
    }
}

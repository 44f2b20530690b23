//! Mesh geometry referenced by scene nodes.
//!
//! The core never draws; it only queries a mesh for its centroid (the
//! default pivot) and extents. Buffers are consumed by the rendering
//! collaborator as-is.

use serde::{Deserialize, Serialize};

use crate::errors::{KineError, Result};
use crate::math::{Vector2, Vector3, Vector4};

/// Planar polygon of a mesh.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Face {
    pub points: Vec<Vector4>,
    pub color: Vector3,
    #[serde(default)]
    pub textures: Vec<Vector2>,
}

#[inline]
fn axis_value(p: &Vector4, axis: usize) -> Result<f64> {
    match axis {
        0 => Ok(p.x),
        1 => Ok(p.y),
        2 => Ok(p.z),
        other => Err(KineError::InvalidAxis(other)),
    }
}

impl Face {
    #[must_use]
    pub fn new(points: Vec<Vector4>, color: Vector3, textures: Vec<Vector2>) -> Self {
        Self {
            points,
            color,
            textures,
        }
    }

    /// Mean of the face points as a homogeneous point (`w = 1`).
    #[must_use]
    pub fn center(&self) -> Vector4 {
        if self.points.is_empty() {
            return Vector4::point(0.0, 0.0, 0.0);
        }
        let n = self.points.len() as f64;
        let sum = self
            .points
            .iter()
            .fold(Vector3::ZERO, |acc, p| acc + p.truncate());
        Vector4::point(sum.x / n, sum.y / n, sum.z / n)
    }

    /// Unit normal `(p2 - p0) × (p1 - p0)` from the first three points, so a
    /// counter-clockwise face points away from the viewer. Zero for faces
    /// with fewer than three points or collinear points.
    #[must_use]
    pub fn normal(&self) -> Vector4 {
        let [p0, p1, p2, ..] = self.points.as_slice() else {
            return Vector4::ZERO;
        };
        let pq = *p1 - *p0;
        let pr = *p2 - *p0;
        pr.cross(pq).normalize()
    }

    /// Maximum coordinate along `axis` (0 = x, 1 = y, 2 = z).
    pub fn max(&self, axis: usize) -> Result<f64> {
        if axis > 2 {
            return Err(KineError::InvalidAxis(axis));
        }
        self.points
            .iter()
            .map(|p| axis_value(p, axis))
            .try_fold(f64::NEG_INFINITY, |acc, v| Ok(acc.max(v?)))
    }

    /// Minimum coordinate along `axis` (0 = x, 1 = y, 2 = z).
    pub fn min(&self, axis: usize) -> Result<f64> {
        if axis > 2 {
            return Err(KineError::InvalidAxis(axis));
        }
        self.points
            .iter()
            .map(|p| axis_value(p, axis))
            .try_fold(f64::INFINITY, |acc, v| Ok(acc.min(v?)))
    }

    /// Flattened `xyz` triplets, for vertex buffer upload.
    #[must_use]
    pub fn flatten_points(&self) -> Vec<f64> {
        self.points
            .iter()
            .flat_map(|p| p.truncate().to_array())
            .collect()
    }
}

/// Ordered face list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub faces: Vec<Face>,
}

impl Mesh {
    #[must_use]
    pub fn new(faces: Vec<Face>) -> Self {
        Self { faces }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Sum of face centers, used when averaging across several meshes.
    #[must_use]
    pub fn face_center_sum(&self) -> Vector3 {
        self.faces
            .iter()
            .fold(Vector3::ZERO, |acc, f| acc + f.center().truncate())
    }

    /// Centroid: mean of the face centers, as a point. An empty mesh is
    /// centered on the origin.
    #[must_use]
    pub fn center(&self) -> Vector4 {
        if self.faces.is_empty() {
            return Vector4::point(0.0, 0.0, 0.0);
        }
        let n = self.faces.len() as f64;
        let sum = self.face_center_sum();
        Vector4::point(sum.x / n, sum.y / n, sum.z / n)
    }

    /// Largest single-face extent along `axis`.
    pub fn extent(&self, axis: usize) -> Result<f64> {
        if axis > 2 {
            return Err(KineError::InvalidAxis(axis));
        }
        self.faces.iter().try_fold(0.0_f64, |acc, f| {
            if f.points.is_empty() {
                return Ok(acc);
            }
            Ok(acc.max(f.max(axis)? - f.min(axis)?))
        })
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.extent(0).unwrap_or_default()
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.extent(1).unwrap_or_default()
    }

    #[must_use]
    pub fn depth(&self) -> f64 {
        self.extent(2).unwrap_or_default()
    }

    /// Axis-aligned unit-ish cube with six quads, centered on `center`.
    /// Used as the template for freshly added nodes.
    #[must_use]
    pub fn cube(center: Vector3, half: f64, color: Vector3) -> Self {
        let c = center;
        let corner = |sx: f64, sy: f64, sz: f64| {
            Vector4::point(c.x + sx * half, c.y + sy * half, c.z + sz * half)
        };
        let quad = |a: Vector4, b: Vector4, cc: Vector4, d: Vector4| Face::new(vec![a, b, cc, d], color, Vec::new());

        Self::new(vec![
            quad(corner(-1.0, -1.0, 1.0), corner(1.0, -1.0, 1.0), corner(1.0, 1.0, 1.0), corner(-1.0, 1.0, 1.0)),
            quad(corner(1.0, -1.0, -1.0), corner(-1.0, -1.0, -1.0), corner(-1.0, 1.0, -1.0), corner(1.0, 1.0, -1.0)),
            quad(corner(-1.0, 1.0, 1.0), corner(1.0, 1.0, 1.0), corner(1.0, 1.0, -1.0), corner(-1.0, 1.0, -1.0)),
            quad(corner(-1.0, -1.0, -1.0), corner(1.0, -1.0, -1.0), corner(1.0, -1.0, 1.0), corner(-1.0, -1.0, 1.0)),
            quad(corner(1.0, -1.0, 1.0), corner(1.0, -1.0, -1.0), corner(1.0, 1.0, -1.0), corner(1.0, 1.0, 1.0)),
            quad(corner(-1.0, -1.0, -1.0), corner(-1.0, -1.0, 1.0), corner(-1.0, 1.0, 1.0), corner(-1.0, 1.0, -1.0)),
        ])
    }
}

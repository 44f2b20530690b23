//! Linear Algebra Module
//!
//! Fixed-size value types used by the transform pipeline:
//! - [`Vector2`], [`Vector3`], [`Vector4`]: immutable numeric tuples
//! - [`Matrix2`], [`Matrix3`], [`Matrix4`]: immutable square matrices with
//!   cofactor determinants and adjugate inverses
//!
//! All storage is `f64`. Conversions to `glam::DMat4` / `glam::DVec3` are
//! provided for rendering collaborators built on glam.

pub mod matrix;
pub mod vector;

pub use matrix::{Matrix2, Matrix3, Matrix4};
pub use vector::{Vector2, Vector3, Vector4};

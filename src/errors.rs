//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`KineError`] covers every failure the core can raise:
//! - Malformed matrix/vector input (wrong dimensions)
//! - Singular matrices during inversion
//! - Invalid axis or projection discriminators
//! - Structural edits that would break the keyframe or hierarchy invariants
//! - Scene record parsing
//!
//! All failures are synchronous and local. Every mutator validates its input
//! before touching state, so an `Err` always leaves the target unchanged.
//!
//! ```rust,ignore
//! use kinetree::errors::{KineError, Result};
//!
//! fn invert(m: &Matrix4) -> Result<Matrix4> {
//!     m.inverse()
//! }
//! ```

use thiserror::Error;

/// The main error type for the Kinetree engine.
#[derive(Error, Debug)]
pub enum KineError {
    // ========================================================================
    // Linear Algebra Errors
    // ========================================================================
    /// A matrix or vector was built from input of the wrong shape.
    #[error("Shape error: expected {expected}x{expected}, got {rows}x{cols}")]
    Shape {
        /// Required dimension N
        expected: usize,
        /// Number of rows supplied
        rows: usize,
        /// Column count of the first offending row
        cols: usize,
    },

    /// Inversion of a matrix whose determinant is exactly zero.
    #[error("Matrix is singular and cannot be inverted")]
    SingularMatrix,

    /// Axis argument outside `{0, 1, 2}`.
    #[error("Invalid axis {0}: expected 0 (x), 1 (y) or 2 (z)")]
    InvalidAxis(usize),

    /// Unrecognized projection discriminator.
    #[error("Invalid projection type: {0}")]
    InvalidProjectionType(String),

    // ========================================================================
    // Keyframe Errors
    // ========================================================================
    /// A keyframe list is empty or an edit would leave it empty.
    #[error("Keyframe list must contain at least one keyframe")]
    EmptyKeyframes,

    /// Keyframe edit index outside the list.
    #[error("Keyframe index out of bounds (index: {index}, len: {len})")]
    KeyframeIndexOutOfBounds {
        /// The invalid index
        index: usize,
        /// Current keyframe count
        len: usize,
    },

    /// Unknown easing function name.
    #[error("Unknown easing function: {0}")]
    UnknownEasing(String),

    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// The node key does not refer to a live node.
    #[error("Node not found")]
    NodeNotFound,

    /// The requested edit would corrupt the tree.
    #[error("Invalid hierarchy edit: {0}")]
    InvalidHierarchy(&'static str),

    // ========================================================================
    // Record Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, KineError>`.
pub type Result<T> = std::result::Result<T, KineError>;

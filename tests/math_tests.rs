//! Linear Algebra Tests
//!
//! Tests for:
//! - Shape validation when building matrices and vectors from slices
//! - Determinant and adjugate inverse for 2x2, 3x3 and 4x4
//! - Singular matrix rejection
//! - Vector cross product, guarded normalize
//! - glam interop

use kinetree::errors::KineError;
use kinetree::math::{Matrix2, Matrix3, Matrix4, Vector3, Vector4};
use kinetree::scene::Transformation;

const EPSILON: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn sample_matrices() -> Vec<Matrix4> {
    vec![
        Transformation::new(1.0, 2.0, 3.0, 4.0, -5.0, 6.0, 30.0, -45.0, 60.0, 2.0, 0.5, 3.0).matrix(),
        Matrix4::from_array([
            [2.0, 0.0, 1.0, 3.0],
            [1.0, 3.0, 0.0, -1.0],
            [0.0, 1.0, 4.0, 2.0],
            [1.0, 0.0, 0.0, 1.0],
        ]),
        Transformation::rotation(10.0, 20.0, 30.0) * Transformation::translation(7.0, 8.0, 9.0),
    ]
}

// ============================================================================
// Shape validation
// ============================================================================

#[test]
fn from_rows_rejects_wrong_shape() {
    let short: Vec<Vec<f64>> = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]];
    assert!(matches!(
        Matrix3::from_rows(&short),
        Err(KineError::Shape { expected: 3, rows: 2, .. })
    ));

    let ragged: Vec<Vec<f64>> = vec![vec![1.0, 0.0], vec![0.0]];
    assert!(matches!(
        Matrix2::from_rows(&ragged),
        Err(KineError::Shape { expected: 2, cols: 1, .. })
    ));

    assert!(Vector4::from_slice(&[1.0, 2.0]).is_err());
    assert!(Vector3::from_slice(&[1.0, 2.0, 3.0]).is_ok());
}

// ============================================================================
// Determinant & inverse
// ============================================================================

#[test]
fn identity_properties() {
    assert_eq!(Matrix4::IDENTITY.determinant(), 1.0);
    assert_eq!(Matrix4::IDENTITY.inverse().unwrap(), Matrix4::IDENTITY);
    assert_eq!(Matrix3::IDENTITY.determinant(), 1.0);
    assert_eq!(Matrix2::IDENTITY.inverse().unwrap(), Matrix2::IDENTITY);
}

#[test]
fn inverse_times_matrix_is_identity() {
    for m in sample_matrices() {
        let inv = m.inverse().unwrap();
        assert!((m * inv).max_abs_diff(&Matrix4::IDENTITY) < EPSILON);
        assert!((inv * m).max_abs_diff(&Matrix4::IDENTITY) < EPSILON);
    }
}

#[test]
fn three_by_three_inverse() {
    let m = Matrix3::from_rows(&[[2.0, 0.0, 1.0], [1.0, 3.0, 2.0], [1.0, 1.0, 1.0]]).unwrap();
    let p = m.multiply(&m.inverse().unwrap());
    for r in 0..3 {
        for c in 0..3 {
            let expected = if r == c { 1.0 } else { 0.0 };
            assert!(approx(p.get(r, c), expected), "({r},{c}) = {}", p.get(r, c));
        }
    }
}

#[test]
fn singular_matrix_is_rejected() {
    let zero_scale = Transformation::scaling(1.0, 0.0, 1.0);
    assert!(matches!(zero_scale.inverse(), Err(KineError::SingularMatrix)));

    let m = Matrix2::from_array([[1.0, 2.0], [2.0, 4.0]]);
    assert!(matches!(m.inverse(), Err(KineError::SingularMatrix)));
}

#[test]
fn determinant_of_scaling_is_product() {
    let m = Transformation::scaling(2.0, 3.0, 4.0);
    assert!(approx(m.determinant(), 24.0));
}

#[test]
fn normal_matrix_of_pure_rotation_is_rotation() {
    let r = Transformation::rotation(15.0, 25.0, 35.0);
    assert!(r.normal_matrix().unwrap().max_abs_diff(&r) < EPSILON);
}

// ============================================================================
// Vectors
// ============================================================================

#[test]
fn cross_follows_right_hand_rule() {
    let x = Vector3::new(1.0, 0.0, 0.0);
    let y = Vector3::new(0.0, 1.0, 0.0);
    assert_eq!(x.cross(y), Vector3::new(0.0, 0.0, 1.0));

    let c = Vector4::new(1.0, 0.0, 0.0, 1.0).cross(Vector4::new(0.0, 1.0, 0.0, 1.0));
    assert_eq!(c, Vector4::new(0.0, 0.0, 1.0, 0.0));
}

#[test]
fn normalize_is_guarded() {
    assert_eq!(Vector3::ZERO.normalize(), Vector3::ZERO);
    assert_eq!(Vector3::new(1e-9, 0.0, 0.0).normalize(), Vector3::ZERO);
    let n = Vector3::new(3.0, 4.0, 0.0).normalize();
    assert!(approx(n.length(), 1.0));
}

// ============================================================================
// Interop & buffers
// ============================================================================

#[test]
fn glam_round_trip_preserves_point_mapping() {
    let m = sample_matrices()[0];
    let g: glam::DMat4 = m.into();
    let p = glam::DVec3::new(1.0, -2.0, 0.5);
    let ours = m * Vector4::point(p.x, p.y, p.z);
    let theirs = g.transform_point3(p);
    assert!(approx(ours.x, theirs.x));
    assert!(approx(ours.y, theirs.y));
    assert!(approx(ours.z, theirs.z));
    assert_eq!(Matrix4::from(g), m);
}

#[test]
fn flatten_is_row_major() {
    let m = Transformation::translation(1.0, 2.0, 3.0);
    let flat = m.flatten();
    assert_eq!(flat[3], 1.0);
    assert_eq!(flat[7], 2.0);
    assert_eq!(flat[11], 3.0);
    assert_eq!(flat[15], 1.0);
}

#[test]
fn checked_element_access() {
    let m2 = Matrix2::from_array([[1.0, 2.0], [3.0, 4.0]]);
    assert_eq!(m2.try_get(1, 0), Some(3.0));
    assert_eq!(m2.try_get(2, 0), None);
    assert_eq!(m2.try_get(0, 2), None);

    let m3 = Matrix3::IDENTITY;
    assert_eq!(m3.try_get(2, 2), Some(1.0));
    assert_eq!(m3.try_get(3, 0), None);

    let m4 = Transformation::translation(1.0, 2.0, 3.0);
    assert_eq!(m4.try_get(1, 3), Some(2.0));
    assert_eq!(m4.try_get(0, 4), None);
    assert_eq!(m4.try_get(4, 4), None);
}

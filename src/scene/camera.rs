use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::math::{Matrix4, Vector3};
use crate::scene::transformation::Transformation;

/// Orbit camera circling a focal point around the world Y axis.
///
/// `angle` is in radians. `look_at` is unguarded when the orbit direction
/// is parallel to world up: the basis collapses to zero vectors and the
/// resulting camera matrix is singular.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub radius: f64,
    pub angle: f64,
    pub center: Vector3,
}

impl Camera {
    pub const UP: Vector3 = Vector3::Y;

    #[must_use]
    pub fn new(radius: f64, angle: f64, center: Vector3) -> Self {
        Self {
            radius,
            angle,
            center,
        }
    }

    /// Sets the orbit angle directly, no smoothing or clamping.
    pub fn rotate(&mut self, angle: f64) {
        self.angle = angle;
    }

    /// Sets the orbit radius directly.
    pub fn move_radius(&mut self, distance: f64) {
        self.radius = distance;
    }

    /// World-space eye position: the translation column of
    /// `T(c) · Ry(angle) · T(0, 0, r) · T(-c)`. The eye lies at distance `r`
    /// from the center only when the center is the origin.
    #[must_use]
    pub fn position(&self) -> Vector3 {
        let c = self.center;
        let orbit = Transformation::translation(c.x, c.y, c.z)
            * Transformation::rotation(0.0, self.angle.to_degrees(), 0.0)
            * Transformation::translation(0.0, 0.0, self.radius)
            * Transformation::translation(-c.x, -c.y, -c.z);
        orbit.translation()
    }

    /// Camera-to-world matrix: basis vectors as columns, eye as translation.
    #[must_use]
    pub fn camera_matrix(&self) -> Matrix4 {
        let eye = self.position();

        let z_axis = (eye - self.center).normalize();
        let x_axis = Self::UP.cross(z_axis).normalize();
        let y_axis = z_axis.cross(x_axis).normalize();

        Matrix4::from_cols(
            x_axis.extend(0.0),
            y_axis.extend(0.0),
            z_axis.extend(0.0),
            eye.extend(1.0),
        )
    }

    /// World-to-view matrix.
    ///
    /// Fails with `SingularMatrix` in the degenerate configurations above
    /// (including `radius == 0`).
    pub fn look_at(&self) -> Result<Matrix4> {
        self.camera_matrix().inverse()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(500.0, 0.0, Vector3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector4;

    #[test]
    fn eye_sits_on_positive_z_at_zero_angle() {
        let cam = Camera::new(10.0, 0.0, Vector3::ZERO);
        let eye = cam.position();
        assert!(eye.x.abs() < 1e-12);
        assert!(eye.y.abs() < 1e-12);
        assert!((eye.z - 10.0).abs() < 1e-12);

        // The center offsets cancel when the angle is zero.
        let shifted = Camera::new(10.0, 0.0, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(shifted.position(), eye);
    }

    #[test]
    fn view_maps_center_onto_negative_z() {
        let mut cam = Camera::new(5.0, 0.0, Vector3::ZERO);
        cam.rotate(std::f64::consts::FRAC_PI_2);
        let view = cam.look_at().unwrap();
        let c = view * Vector4::point(0.0, 0.0, 0.0);
        assert!(c.x.abs() < 1e-9);
        assert!(c.y.abs() < 1e-9);
        assert!((c.z + 5.0).abs() < 1e-9);
    }
}

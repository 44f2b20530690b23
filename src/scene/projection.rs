//! Projection Builders
//!
//! Pure functions from named parameters to a 4x4 matrix, one per
//! [`ProjectionType`]. Matrices follow the same row-major convention as the
//! rest of the crate; the perspective builder keeps the divide term in the
//! last *row*, so callers transpose consistently before upload.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{KineError, Result};
use crate::math::Matrix4;
use crate::settings::ViewportSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectionType {
    Orthographic,
    Perspective,
    Oblique,
}

impl ProjectionType {
    pub const ALL: [Self; 3] = [Self::Orthographic, Self::Perspective, Self::Oblique];

    /// Identifier used by the editor UI.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Orthographic => "orthographicProjection",
            Self::Perspective => "perspectiveProjection",
            Self::Oblique => "obliqueProjection",
        }
    }
}

impl fmt::Display for ProjectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectionType {
    type Err = KineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "orthographicProjection" | "orthographic" => Ok(Self::Orthographic),
            "perspectiveProjection" | "perspective" => Ok(Self::Perspective),
            "obliqueProjection" | "oblique" => Ok(Self::Oblique),
            other => Err(KineError::InvalidProjectionType(other.to_string())),
        }
    }
}

impl TryFrom<u8> for ProjectionType {
    type Error = KineError;

    fn try_from(value: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| KineError::InvalidProjectionType(value.to_string()))
    }
}

// ============================================================================
// Parameters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrthographicParams {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    pub near: f64,
    pub far: f64,
}

/// `fov` is in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveParams {
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

/// `angle` is in radians; `ortho` is the box the shear is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObliqueParams {
    pub factor: f64,
    pub angle: f64,
    pub ortho: OrthographicParams,
}

// ============================================================================
// Builders
// ============================================================================

/// Box-to-NDC scale and bias.
#[must_use]
pub fn orthographic(p: &OrthographicParams) -> Matrix4 {
    let OrthographicParams {
        left,
        right,
        bottom,
        top,
        near,
        far,
    } = *p;

    Matrix4::from_array([
        [2.0 / (right - left), 0.0, 0.0, -(right + left) / (right - left)],
        [0.0, 2.0 / (top - bottom), 0.0, -(top + bottom) / (top - bottom)],
        [0.0, 0.0, -2.0 / (far - near), -(far + near) / (far - near)],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

#[must_use]
pub fn perspective(p: &PerspectiveParams) -> Matrix4 {
    let PerspectiveParams {
        fov,
        aspect,
        near,
        far,
    } = *p;
    let factor = (0.5 * (PI - fov)).tan();

    Matrix4::from_array([
        [factor / aspect, 0.0, 0.0, 0.0],
        [0.0, factor, 0.0, 0.0],
        [0.0, 0.0, -(far + near) / (far - near), -1.0],
        [0.0, 0.0, -2.0 * far * near / (far - near), 0.0],
    ])
}

/// Orthographic box followed by a z-dependent shear: `Ortho · Shear`.
#[must_use]
pub fn oblique(p: &ObliqueParams) -> Matrix4 {
    let cot_angle = 1.0 / p.angle.tan();
    let shear_x = p.factor * cot_angle;
    let shear_y = -p.factor * cot_angle;

    let shear = Matrix4::from_array([
        [1.0, 0.0, shear_x, 0.0],
        [0.0, 1.0, shear_y, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    orthographic(&p.ortho) * shear
}

// ============================================================================
// ProjectionManager
// ============================================================================

/// Holds one parameter set per projection kind and builds on demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionManager {
    pub orthographic: OrthographicParams,
    pub perspective: PerspectiveParams,
    pub oblique: ObliqueParams,
}

impl ProjectionManager {
    #[must_use]
    pub fn new(
        orthographic: OrthographicParams,
        perspective: PerspectiveParams,
        oblique: ObliqueParams,
    ) -> Self {
        Self {
            orthographic,
            perspective,
            oblique,
        }
    }

    /// Editor defaults for a canvas of the given size.
    #[must_use]
    pub fn for_viewport(viewport: &ViewportSettings) -> Self {
        let w = viewport.width;
        let h = viewport.height;

        Self {
            orthographic: OrthographicParams {
                left: 0.0,
                right: w,
                bottom: -100.0,
                top: h,
                near: -2000.0,
                far: 2000.0,
            },
            perspective: PerspectiveParams {
                fov: 60.0_f64.to_radians(),
                aspect: w / h,
                near: 1.0,
                far: 2000.0,
            },
            oblique: ObliqueParams {
                factor: 0.1,
                angle: 15.0_f64.to_radians(),
                ortho: OrthographicParams {
                    left: w,
                    right: 0.0,
                    bottom: 0.0,
                    top: h,
                    near: -2000.0,
                    far: 2000.0,
                },
            },
        }
    }

    #[must_use]
    pub fn project(&self, kind: ProjectionType) -> Matrix4 {
        match kind {
            ProjectionType::Orthographic => orthographic(&self.orthographic),
            ProjectionType::Perspective => perspective(&self.perspective),
            ProjectionType::Oblique => oblique(&self.oblique),
        }
    }

    /// Resolves a UI discriminator string before projecting.
    pub fn project_named(&self, kind: &str) -> Result<Matrix4> {
        Ok(self.project(kind.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oblique_with_zero_factor_is_orthographic() {
        let ortho = OrthographicParams {
            left: -1.0,
            right: 1.0,
            bottom: -1.0,
            top: 1.0,
            near: 1.0,
            far: 10.0,
        };
        let m = oblique(&ObliqueParams {
            factor: 0.0,
            angle: 0.3,
            ortho,
        });
        assert_eq!(m, orthographic(&ortho));
    }

    #[test]
    fn discriminator_parsing() {
        assert_eq!("perspectiveProjection".parse::<ProjectionType>().unwrap(), ProjectionType::Perspective);
        assert_eq!(ProjectionType::try_from(2).unwrap(), ProjectionType::Oblique);
        assert!(matches!(
            "isometric".parse::<ProjectionType>(),
            Err(KineError::InvalidProjectionType(_))
        ));
        assert!(ProjectionType::try_from(3).is_err());
    }
}

//! Editor Configuration
//!
//! Plain serde structs with defaults for every field, so a partial JSON
//! document only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::animation::keyframes::KeyframeList;
use crate::assets::record::{ArticulatedRecord, load_articulated_str};
use crate::errors::Result;
use crate::math::Vector3;
use crate::scene::articulated::Articulated;
use crate::scene::camera::Camera;
use crate::scene::playback::DEFAULT_FRAME_RATE;
use crate::scene::projection::ProjectionManager;

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Startup configuration for an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Keyframes per second for models built or loaded through these
    /// settings.
    pub default_frame_rate: f64,
    pub camera_radius: f64,
    /// Orbit angle in radians.
    pub camera_angle: f64,
    pub viewport: ViewportSettings,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            default_frame_rate: DEFAULT_FRAME_RATE,
            camera_radius: 500.0,
            camera_angle: 0.0,
            viewport: ViewportSettings::default(),
        }
    }
}

impl EditorSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Orbit camera focused on `center`.
    #[must_use]
    pub fn camera(&self, center: Vector3) -> Camera {
        Camera::new(self.camera_radius, self.camera_angle, center)
    }

    #[must_use]
    pub fn projections(&self) -> ProjectionManager {
        ProjectionManager::for_viewport(&self.viewport)
    }

    /// New model playing at `default_frame_rate`.
    #[must_use]
    pub fn articulated(&self, keyframes: KeyframeList) -> Articulated {
        Articulated::with_frame_rate(keyframes, self.default_frame_rate)
    }

    /// Builds `record` with every part set to `default_frame_rate`.
    pub fn articulated_from_record(&self, record: &ArticulatedRecord) -> Result<Articulated> {
        let mut articulated = Articulated::from_record(record)?;
        articulated.set_frame_rate(self.default_frame_rate);
        Ok(articulated)
    }

    /// JSON counterpart of [`articulated_from_record`](Self::articulated_from_record).
    pub fn load_articulated(&self, json: &str) -> Result<Articulated> {
        let mut articulated = load_articulated_str(json)?;
        articulated.set_frame_rate(self.default_frame_rate);
        Ok(articulated)
    }
}

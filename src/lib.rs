#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Kinetree
//!
//! Hierarchical articulated-model core for a keyframe animation editor:
//! pivot-based transformations, an arena-backed node hierarchy with
//! broadcast playback state, keyframe interpolation with easing, and
//! top-down world-matrix composition handed to a render visitor.

pub mod animation;
pub mod assets;
pub mod errors;
pub mod math;
pub mod scene;
pub mod settings;
pub mod utils;

pub use animation::{AnimationEditor, Easing, KeyframeList};
pub use assets::{ArticulatedRecord, load_articulated_str, save_articulated_string};
pub use errors::{KineError, Result};
pub use math::{Matrix2, Matrix3, Matrix4, Vector2, Vector3, Vector4};
pub use scene::{
    Articulated, Camera, Face, Mesh, Node, NodeKey, Playback, PlaybackCommand, PlaybackFlags,
    ProjectionManager, ProjectionType, RenderItem, RenderVisitor, Selection, Transformation,
};
pub use settings::{EditorSettings, ViewportSettings};
pub use utils::FrameClock;

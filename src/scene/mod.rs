//! Scene Graph Module
//!
//! Hierarchy and per-frame evaluation of an articulated model:
//! - Transformation: pivot-based TRS record and its composite matrix
//! - Node: a rigid part with mesh, keyframes and playback state
//! - Articulated: arena-backed forest of nodes plus its own keyframes
//! - Playback: per-node playback state and the subtree broadcast commands
//! - TransformSystem: animation step and top-down world-matrix composition
//! - Camera / Projection: orbit view matrix and projection builders

pub mod articulated;
pub mod camera;
pub mod mesh;
pub mod node;
pub mod playback;
pub mod projection;
pub mod transform_system;
pub mod transformation;

pub use articulated::{Articulated, Selection};
pub use camera::Camera;
pub use mesh::{Face, Mesh};
pub use node::Node;
pub use playback::{Playback, PlaybackCommand, PlaybackFlags};
pub use projection::{ProjectionManager, ProjectionType};
pub use transform_system::{RenderItem, RenderVisitor};
pub use transformation::Transformation;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeKey;
}

//! Keyframe animation: easing curves, keyframe storage with the
//! interpolation step, and the selection-based keyframe editor.

pub mod easing;
pub mod editor;
pub mod keyframes;

pub use easing::Easing;
pub use editor::AnimationEditor;
pub use keyframes::KeyframeList;

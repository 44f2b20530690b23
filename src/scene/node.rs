use crate::animation::keyframes::KeyframeList;
use crate::math::Matrix4;
use crate::scene::NodeKey;
use crate::scene::mesh::Mesh;
use crate::scene::playback::Playback;
use crate::scene::transformation::Transformation;

/// A rigid part of an articulated model.
///
/// # Hierarchy
///
/// Nodes live in the [`Articulated`](crate::scene::Articulated) arena and
/// link to each other by key:
/// - `parent`: `None` for root-level nodes
/// - `children`: ordered child keys, rendered in this order
///
/// # Animation
///
/// Each node owns its keyframes and its own [`Playback`] state. Playback is
/// normally driven by commands broadcast from the articulated root, so all
/// nodes share flags and rate but reduce indices modulo their own keyframe
/// count.
///
/// # Cached pose
///
/// `local` and `world` are written by the transform system each frame and
/// read afterwards by render visitors.
#[derive(Debug, Clone)]
pub struct Node {
    /// Component identifier, used for lookup and display
    pub component: String,

    // === Hierarchy ===
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,

    // === Geometry & animation ===
    pub mesh: Mesh,
    pub(crate) keyframes: KeyframeList,
    pub(crate) playback: Playback,
    /// User offset layered on top of the per-frame applied transformation
    pub offset: Transformation,

    // === Per-frame cache ===
    pub(crate) local: Transformation,
    pub(crate) world: Matrix4,
}

impl Node {
    /// Creates a detached node with a single identity keyframe.
    #[must_use]
    pub fn new(component: impl Into<String>, mesh: Mesh) -> Self {
        Self::with_keyframes(component, mesh, KeyframeList::default())
    }

    #[must_use]
    pub fn with_keyframes(component: impl Into<String>, mesh: Mesh, keyframes: KeyframeList) -> Self {
        Self {
            component: component.into(),
            parent: None,
            children: Vec::new(),
            mesh,
            keyframes,
            playback: Playback::default(),
            offset: Transformation::IDENTITY,
            local: Transformation::IDENTITY,
            world: Matrix4::IDENTITY,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn keyframes(&self) -> &KeyframeList {
        &self.keyframes
    }

    /// Mutable keyframe access; the list itself keeps the non-empty invariant.
    #[inline]
    pub fn keyframes_mut(&mut self) -> &mut KeyframeList {
        &mut self.keyframes
    }

    #[inline]
    #[must_use]
    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    #[inline]
    #[must_use]
    pub fn transformation_index(&self) -> usize {
        self.playback.transformation_index
    }

    /// Keyframe selected by the current transformation index.
    #[must_use]
    pub fn current_keyframe(&self) -> &Transformation {
        let index = self.playback.transformation_index.min(self.keyframes.len() - 1);
        &self.keyframes[index]
    }

    /// Local pose resolved during the last frame.
    #[inline]
    #[must_use]
    pub fn local(&self) -> &Transformation {
        &self.local
    }

    /// World matrix resolved during the last frame.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Matrix4 {
        &self.world
    }

    /// Identity pose about the mesh centroid, layered with `applied` and the
    /// node offset.
    #[must_use]
    pub(crate) fn base_pose(&self, applied: &Transformation) -> Transformation {
        Transformation::from_pivot(self.mesh.center().truncate())
            .offset_by(applied)
            .offset_by(&self.offset)
    }
}

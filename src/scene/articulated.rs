//! Articulated Model
//!
//! The top-level object of a scene: an arena-backed forest of [`Node`]s plus
//! the root's own keyframes and playback state.
//!
//! Playback mutators on the root are broadcast to every node as a
//! [`PlaybackCommand`]. Each receiver applies the command against its own
//! keyframe count, so index and accumulator wrap per node.

use slotmap::{SecondaryMap, SlotMap};

use crate::animation::keyframes::KeyframeList;
use crate::errors::{KineError, Result};
use crate::math::{Matrix4, Vector3, Vector4};
use crate::scene::NodeKey;
use crate::scene::node::Node;
use crate::scene::playback::{Playback, PlaybackCommand};
use crate::scene::transformation::Transformation;
use crate::utils::time::FrameClock;

/// Current animation-edit target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Selection {
    /// The articulated root itself.
    #[default]
    Root,
    Node(NodeKey),
}

#[derive(Debug, Clone)]
pub struct Articulated {
    pub(crate) nodes: SlotMap<NodeKey, Node>,
    pub(crate) roots: Vec<NodeKey>,

    pub(crate) keyframes: KeyframeList,
    pub(crate) playback: Playback,
    pub(crate) clock: FrameClock,
    pub(crate) selection: Selection,

    // Resolved by the transform system each frame
    pub(crate) local: Transformation,
    pub(crate) world: Matrix4,
}

impl Default for Articulated {
    fn default() -> Self {
        Self::new(KeyframeList::default())
    }
}

impl Articulated {
    #[must_use]
    pub fn new(keyframes: KeyframeList) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            keyframes,
            playback: Playback::default(),
            clock: FrameClock::new(),
            selection: Selection::Root,
            local: Transformation::IDENTITY,
            world: Matrix4::IDENTITY,
        }
    }

    /// Same as [`new`](Self::new) with a custom starting frame rate.
    #[must_use]
    pub fn with_frame_rate(keyframes: KeyframeList, frame_rate: f64) -> Self {
        let mut articulated = Self::new(keyframes);
        articulated.playback = Playback::with_frame_rate(frame_rate);
        articulated
    }

    // ========================================================================
    // Hierarchy queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn get_node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    #[inline]
    #[must_use]
    pub fn get_node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    fn node(&self, key: NodeKey) -> Result<&Node> {
        self.nodes.get(key).ok_or(KineError::NodeNotFound)
    }

    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    #[must_use]
    pub fn parent_of(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(|n| n.parent)
    }

    #[must_use]
    pub fn children_of(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes
            .get(key)
            .map_or(&[] as &[NodeKey], |n| n.children.as_slice())
    }

    /// All nodes in pre-order, roots in stored order.
    #[must_use]
    pub fn descendants(&self) -> Vec<NodeKey> {
        self.preorder(&self.roots)
    }

    /// `key` followed by its whole subtree, in pre-order.
    #[must_use]
    pub fn subtree(&self, key: NodeKey) -> Vec<NodeKey> {
        if self.nodes.contains_key(key) {
            self.preorder(&[key])
        } else {
            Vec::new()
        }
    }

    fn preorder(&self, start: &[NodeKey]) -> Vec<NodeKey> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeKey> = start.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            out.push(key);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// First node in pre-order whose component id matches.
    #[must_use]
    pub fn find_by_component(&self, component: &str) -> Option<NodeKey> {
        self.descendants()
            .into_iter()
            .find(|&k| self.nodes[k].component == component)
    }

    /// True if `ancestor` lies on the parent chain of `key` (or is `key`).
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeKey, key: NodeKey) -> bool {
        let mut cursor = Some(key);
        while let Some(k) = cursor {
            if k == ancestor {
                return true;
            }
            cursor = self.parent_of(k);
        }
        false
    }

    /// Pivot of the root: mean of face centers over the meshes of the
    /// root-level nodes. Origin when they hold no faces.
    #[must_use]
    pub fn center(&self) -> Vector4 {
        let (sum, count) = self
            .roots
            .iter()
            .filter_map(|&k| self.nodes.get(k))
            .fold((Vector3::ZERO, 0usize), |(sum, count), node| {
                (sum + node.mesh.face_center_sum(), count + node.mesh.faces.len())
            });
        if count == 0 {
            return Vector4::point(0.0, 0.0, 0.0);
        }
        let n = count as f64;
        Vector4::point(sum.x / n, sum.y / n, sum.z / n)
    }

    // ========================================================================
    // Hierarchy edits
    // ========================================================================

    /// Adds a root-level node. Its playback adopts the root's state.
    pub fn add_root(&mut self, node: Node) -> NodeKey {
        let key = self.insert_detached(node, None);
        self.roots.push(key);
        self.adopt_playback(key);
        log::debug!("Added root node {key:?}");
        key
    }

    /// Appends `node` to `parent`'s children.
    pub fn add_child(&mut self, parent: NodeKey, node: Node) -> Result<NodeKey> {
        self.node(parent)?;
        let key = self.insert_detached(node, Some(parent));
        self.nodes[parent].children.push(key);
        self.adopt_playback(key);
        log::debug!("Added node {key:?} under {parent:?}");
        Ok(key)
    }

    /// Adds `node` under the selected target: root level for
    /// [`Selection::Root`], as a child otherwise.
    pub fn add_under(&mut self, target: Selection, node: Node) -> Result<NodeKey> {
        match target {
            Selection::Root => Ok(self.add_root(node)),
            Selection::Node(parent) => self.add_child(parent, node),
        }
    }

    fn insert_detached(&mut self, mut node: Node, parent: Option<NodeKey>) -> NodeKey {
        node.parent = parent;
        node.children.clear();
        self.nodes.insert(node)
    }

    /// Removes `key` and its whole subtree, returning the number of nodes
    /// removed. A selection inside the subtree falls back to the root.
    pub fn remove_node(&mut self, key: NodeKey) -> Result<usize> {
        self.node(key)?;
        self.detach(key);

        let doomed = self.subtree(key);
        if let Selection::Node(sel) = self.selection
            && doomed.contains(&sel)
        {
            self.selection = Selection::Root;
        }
        for k in &doomed {
            self.nodes.remove(*k);
        }
        log::debug!("Removed node {key:?} ({} total)", doomed.len());
        Ok(doomed.len())
    }

    /// Unlinks `key` from its parent (or the root list). The node stays in
    /// the arena.
    fn detach(&mut self, key: NodeKey) {
        match self.parent_of(key) {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(parent)
                    && let Some(pos) = p.children.iter().position(|&c| c == key)
                {
                    p.children.remove(pos);
                }
            }
            None => {
                if let Some(pos) = self.roots.iter().position(|&r| r == key) {
                    self.roots.remove(pos);
                }
            }
        }
        if let Some(node) = self.nodes.get_mut(key) {
            node.parent = None;
        }
    }

    /// Moves `child` (with its subtree) under `target`.
    ///
    /// Rejects attaching a node to itself or to one of its descendants.
    pub fn attach(&mut self, child: NodeKey, target: Selection) -> Result<()> {
        self.node(child)?;
        if let Selection::Node(parent) = target {
            self.node(parent)?;
            if parent == child {
                log::warn!("Cannot attach node to itself!");
                return Err(KineError::InvalidHierarchy("cannot attach a node to itself"));
            }
            if self.is_ancestor(child, parent) {
                log::warn!("Cannot attach node {child:?} below its own descendant {parent:?}");
                return Err(KineError::InvalidHierarchy(
                    "cannot attach a node below its own descendant",
                ));
            }
        }

        self.detach(child);
        match target {
            Selection::Root => self.roots.push(child),
            Selection::Node(parent) => {
                self.nodes[parent].children.push(child);
                self.nodes[child].parent = Some(parent);
            }
        }
        log::debug!("Attached {child:?} to {target:?}");
        Ok(())
    }

    /// Deep-copies the subtree at `source` and attaches the copy under
    /// `target`. Component ids get `suffix` appended when given.
    pub fn duplicate_node(
        &mut self,
        source: NodeKey,
        target: Selection,
        suffix: Option<&str>,
    ) -> Result<NodeKey> {
        self.node(source)?;
        if let Selection::Node(parent) = target {
            self.node(parent)?;
        }
        let snapshot: Vec<(NodeKey, Node)> = self
            .subtree(source)
            .into_iter()
            .map(|k| (k, self.nodes[k].clone()))
            .collect();
        let copy = self
            .insert_snapshot(snapshot, target, suffix)
            .ok_or(KineError::NodeNotFound)?;
        log::debug!("Duplicated {source:?} as {copy:?}");
        Ok(copy)
    }

    /// Detached copy of the subtree at `key` as the single root of a new
    /// model sharing this model's root keyframes and playback. Later edits
    /// to either side do not affect the other; pair with
    /// [`graft`](Self::graft) to paste it back.
    pub fn snapshot(&self, key: NodeKey) -> Result<Self> {
        self.node(key)?;
        let mut copy = Self::new(self.keyframes.clone());
        copy.playback = self.playback;
        let nodes: Vec<(NodeKey, Node)> = self
            .subtree(key)
            .into_iter()
            .map(|k| (k, self.nodes[k].clone()))
            .collect();
        copy.insert_snapshot(nodes, Selection::Root, None)
            .ok_or(KineError::NodeNotFound)?;
        Ok(copy)
    }

    /// Copies every root subtree of `template` under `target`, returning the
    /// new top-level keys in template order.
    pub fn graft(&mut self, template: &Self, target: Selection) -> Result<Vec<NodeKey>> {
        if let Selection::Node(parent) = target {
            self.node(parent)?;
        }
        let mut added = Vec::with_capacity(template.roots.len());
        for &root in &template.roots {
            let snapshot: Vec<(NodeKey, Node)> = template
                .subtree(root)
                .into_iter()
                .map(|k| (k, template.nodes[k].clone()))
                .collect();
            added.extend(self.insert_snapshot(snapshot, target, None));
        }
        Ok(added)
    }

    /// Inserts a pre-order subtree snapshot, remapping keys. The first entry
    /// is the subtree root; an empty snapshot inserts nothing.
    fn insert_snapshot(
        &mut self,
        snapshot: Vec<(NodeKey, Node)>,
        target: Selection,
        suffix: Option<&str>,
    ) -> Option<NodeKey> {
        let mut remap: SecondaryMap<NodeKey, NodeKey> = SecondaryMap::new();
        let mut top = None;

        for (old_key, mut node) in snapshot {
            if let Some(suffix) = suffix {
                node.component.push_str(suffix);
            }
            let new_parent = if top.is_some() {
                node.parent.and_then(|p| remap.get(p).copied())
            } else {
                None
            };
            let key = self.insert_detached(node, new_parent);
            if let Some(p) = new_parent {
                self.nodes[p].children.push(key);
            }
            remap.insert(old_key, key);
            top.get_or_insert(key);
        }

        let top = top?;
        match target {
            Selection::Root => self.roots.push(top),
            Selection::Node(parent) => {
                self.nodes[parent].children.push(top);
                self.nodes[top].parent = Some(parent);
            }
        }
        self.adopt_playback(top);
        Some(top)
    }

    /// Aligns every node of the subtree with the root's playback state.
    fn adopt_playback(&mut self, key: NodeKey) {
        let source = self.playback;
        for k in self.subtree(key) {
            let node = &mut self.nodes[k];
            let len = node.keyframes.len();
            node.playback.sync_from(&source, len);
        }
    }

    // ========================================================================
    // Keyframes & selection
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn keyframes(&self) -> &KeyframeList {
        &self.keyframes
    }

    #[inline]
    pub fn keyframes_mut(&mut self) -> &mut KeyframeList {
        &mut self.keyframes
    }

    #[inline]
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Changes the edit target. Fails for a stale node key.
    pub fn select(&mut self, selection: Selection) -> Result<()> {
        if let Selection::Node(key) = selection {
            self.node(key)?;
        }
        self.selection = selection;
        Ok(())
    }

    pub fn keyframes_of(&self, selection: Selection) -> Result<&KeyframeList> {
        match selection {
            Selection::Root => Ok(&self.keyframes),
            Selection::Node(key) => Ok(&self.node(key)?.keyframes),
        }
    }

    pub fn keyframes_of_mut(&mut self, selection: Selection) -> Result<&mut KeyframeList> {
        match selection {
            Selection::Root => Ok(&mut self.keyframes),
            Selection::Node(key) => self
                .nodes
                .get_mut(key)
                .map(|n| &mut n.keyframes)
                .ok_or(KineError::NodeNotFound),
        }
    }

    pub fn playback_of(&self, selection: Selection) -> Result<&Playback> {
        match selection {
            Selection::Root => Ok(&self.playback),
            Selection::Node(key) => Ok(&self.node(key)?.playback),
        }
    }

    /// Keeps the target's playback inside its (possibly shrunk) keyframes.
    pub(crate) fn clamp_playback(&mut self, selection: Selection) {
        match selection {
            Selection::Root => self.playback.clamp_to(self.keyframes.len()),
            Selection::Node(key) => {
                if let Some(node) = self.nodes.get_mut(key) {
                    let len = node.keyframes.len();
                    node.playback.clamp_to(len);
                }
            }
        }
    }

    // ========================================================================
    // Playback
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Applies `cmd` to the root and to every node.
    pub fn broadcast(&mut self, cmd: PlaybackCommand) {
        let len = self.keyframes.len();
        self.playback.apply(cmd, len);
        for node in self.nodes.values_mut() {
            let len = node.keyframes.len();
            node.playback.apply(cmd, len);
        }
    }

    /// Applies `cmd` to `key` and its subtree only.
    pub fn broadcast_from(&mut self, key: NodeKey, cmd: PlaybackCommand) -> Result<()> {
        self.node(key)?;
        for k in self.subtree(key) {
            let node = &mut self.nodes[k];
            let len = node.keyframes.len();
            node.playback.apply(cmd, len);
        }
        Ok(())
    }

    pub fn set_frame_rate(&mut self, fps: f64) {
        log::debug!("Frame rate set to {fps}");
        self.broadcast(PlaybackCommand::SetFrameRate(fps));
    }

    pub fn set_animating(&mut self, on: bool) {
        log::debug!("Animating: {on}");
        self.broadcast(PlaybackCommand::SetAnimating(on));
    }

    pub fn set_reverse(&mut self, on: bool) {
        log::debug!("Reverse: {on}");
        self.broadcast(PlaybackCommand::SetReverse(on));
    }

    pub fn set_auto_replay(&mut self, on: bool) {
        log::debug!("Auto replay: {on}");
        self.broadcast(PlaybackCommand::SetAutoReplay(on));
    }

    pub fn set_accum_time(&mut self, t: f64) {
        self.broadcast(PlaybackCommand::SetAccumTime(t));
    }

    pub fn set_accum_time_by_delta(&mut self, delta: f64) {
        self.broadcast(PlaybackCommand::AccumTimeByDelta(delta));
    }

    pub fn reset_accum_time(&mut self) {
        self.broadcast(PlaybackCommand::ResetAccumTime);
    }

    pub fn set_transformation_index(&mut self, index: usize) {
        self.broadcast(PlaybackCommand::SetTransformationIndex(index));
    }

    pub fn set_transformation_index_by_delta(&mut self, delta: isize) {
        self.broadcast(PlaybackCommand::TransformationIndexByDelta(delta));
    }

    #[inline]
    #[must_use]
    pub fn frame_rate(&self) -> f64 {
        self.playback.frame_rate
    }

    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.playback.is_animating()
    }

    #[inline]
    #[must_use]
    pub fn is_reverse(&self) -> bool {
        self.playback.is_reverse()
    }

    #[inline]
    #[must_use]
    pub fn is_auto_replay(&self) -> bool {
        self.playback.is_auto_replay()
    }

    #[inline]
    #[must_use]
    pub fn transformation_index(&self) -> usize {
        self.playback.transformation_index
    }

    #[inline]
    #[must_use]
    pub fn accum_time(&self) -> f64 {
        self.playback.accum_time
    }

    /// Root pose resolved during the last frame.
    #[inline]
    #[must_use]
    pub fn local(&self) -> &Transformation {
        &self.local
    }

    /// `articulatedWorld`: parent world matrix of every root-level node.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Matrix4 {
        &self.world
    }

    /// Frame clock state; the transform system ticks it once per frame.
    #[inline]
    #[must_use]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }
}

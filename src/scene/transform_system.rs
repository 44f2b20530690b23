//! Transform System
//!
//! Per-frame evaluation of an [`Articulated`] model, split in two phases
//! that never overlap:
//!
//! 1. **Update** (mutating): tick the frame clock, advance every playback
//!    state, resolve each local pose and compose world matrices top-down.
//! 2. **Visit** (read-only): walk the resolved tree in pre-order and hand
//!    each part to a [`RenderVisitor`].
//!
//! Both walks use an explicit stack with children pushed in reverse, so
//! deep hierarchies cannot overflow the call stack and siblings are
//! processed in stored order.

use slotmap::SlotMap;

use crate::animation::keyframes::KeyframeList;
use crate::math::Matrix4;
use crate::scene::NodeKey;
use crate::scene::articulated::Articulated;
use crate::scene::mesh::Mesh;
use crate::scene::node::Node;
use crate::scene::playback::Playback;
use crate::scene::transformation::Transformation;

/// Read-only view of one resolved part.
#[derive(Debug, Clone, Copy)]
pub struct RenderItem<'a> {
    pub key: NodeKey,
    pub component: &'a str,
    /// Local pose the world matrix was composed from
    pub local: &'a Transformation,
    pub world: &'a Matrix4,
    pub mesh: &'a Mesh,
    /// 0 for root-level nodes
    pub depth: usize,
}

/// Consumer of resolved parts, typically a renderer.
pub trait RenderVisitor {
    fn visit(&mut self, item: &RenderItem<'_>);
}

impl<F> RenderVisitor for F
where
    F: FnMut(&RenderItem<'_>),
{
    fn visit(&mut self, item: &RenderItem<'_>) {
        self(item);
    }
}

/// Local pose for one animated owner: the interpolated pose while
/// animating, otherwise `base` layered with the current keyframe.
pub fn resolve_local<E>(
    keyframes: &KeyframeList,
    playback: &mut Playback,
    base: &Transformation,
    dt: f64,
    ease: E,
) -> Transformation
where
    E: Fn(f64) -> f64,
{
    if playback.is_animating() {
        playback.animate(keyframes.as_slice(), base, dt, ease)
    } else {
        let index = playback.transformation_index.min(keyframes.len() - 1);
        Transformation::compose_static(base, &keyframes[index])
    }
}

/// Resolves every node below `roots`, with `parent_world` as the world
/// matrix of the level above the roots.
pub fn update_hierarchy<E>(
    nodes: &mut SlotMap<NodeKey, Node>,
    roots: &[NodeKey],
    parent_world: &Matrix4,
    applied: &Transformation,
    dt: f64,
    ease: &E,
) where
    E: Fn(f64) -> f64,
{
    let mut stack: Vec<(NodeKey, Matrix4)> = Vec::with_capacity(64);
    for &root in roots.iter().rev() {
        stack.push((root, *parent_world));
    }

    while let Some((key, parent_world)) = stack.pop() {
        let Some(node) = nodes.get_mut(key) else {
            continue;
        };

        let base = node.base_pose(applied);
        let local = resolve_local(&node.keyframes, &mut node.playback, &base, dt, ease);
        let world = parent_world * local.matrix();
        node.local = local;
        node.world = world;

        for &child in node.children.iter().rev() {
            stack.push((child, world));
        }
    }
}

/// Walks the resolved nodes in pre-order.
pub fn visit_hierarchy<V>(nodes: &SlotMap<NodeKey, Node>, roots: &[NodeKey], visitor: &mut V)
where
    V: RenderVisitor + ?Sized,
{
    let mut stack: Vec<(NodeKey, usize)> = roots.iter().rev().map(|&k| (k, 0)).collect();

    while let Some((key, depth)) = stack.pop() {
        let Some(node) = nodes.get(key) else {
            continue;
        };
        visitor.visit(&RenderItem {
            key,
            component: &node.component,
            local: &node.local,
            world: &node.world,
            mesh: &node.mesh,
            depth,
        });
        for &child in node.children.iter().rev() {
            stack.push((child, depth + 1));
        }
    }
}

impl Articulated {
    /// Mutating phase of a frame.
    ///
    /// `now_ms` is the host's monotonic timestamp in milliseconds and
    /// `applied` the global user offset layered onto every part. Returns the
    /// elapsed seconds used for this step.
    pub fn update<E>(&mut self, now_ms: f64, applied: &Transformation, ease: E) -> f64
    where
        E: Fn(f64) -> f64,
    {
        let dt = self.clock.tick(now_ms);

        let base = Transformation::from_pivot(self.center().truncate()).offset_by(applied);
        self.local = resolve_local(&self.keyframes, &mut self.playback, &base, dt, &ease);
        self.world = self.local.matrix();

        update_hierarchy(&mut self.nodes, &self.roots, &self.world, applied, dt, &ease);
        dt
    }

    /// Read-only phase: hands every resolved part to `visitor`.
    pub fn visit<V>(&self, visitor: &mut V)
    where
        V: RenderVisitor + ?Sized,
    {
        visit_hierarchy(&self.nodes, &self.roots, visitor);
    }

    /// One full frame: [`update`](Self::update) then [`visit`](Self::visit).
    pub fn frame<E, V>(&mut self, now_ms: f64, applied: &Transformation, ease: E, visitor: &mut V)
    where
        E: Fn(f64) -> f64,
        V: RenderVisitor + ?Sized,
    {
        self.update(now_ms, applied, ease);
        self.visit(visitor);
    }
}

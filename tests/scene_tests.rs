//! Scene Graph Tests
//!
//! Tests for:
//! - Playback broadcast from the articulated root to every node
//! - Pausing and resuming against a running frame clock
//! - Frame navigation through the editor
//! - Per-frame evaluation: static poses, applied offsets, animation
//! - Structural edits: graft, snapshot, duplicate, attach

use kinetree::animation::KeyframeList;
use kinetree::math::Vector3;
use kinetree::scene::{
    Articulated, Mesh, Node, NodeKey, Playback, PlaybackCommand, RenderItem, Selection,
    Transformation,
};

const EPSILON: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn tx(value: f64) -> Transformation {
    let mut t = Transformation::IDENTITY;
    t.tx = value;
    t
}

fn frames(count: usize) -> KeyframeList {
    KeyframeList::new((0..count).map(|i| tx(i as f64)).collect()).unwrap()
}

fn cube_at(x: f64) -> Mesh {
    Mesh::cube(Vector3::new(x, 0.0, 0.0), 1.0, Vector3::new(0.5, 0.5, 0.5))
}

/// Root with 3 keyframes; body(2) -> arm(5), and a second root tail(1).
fn rig() -> (Articulated, NodeKey, NodeKey, NodeKey) {
    let mut a = Articulated::new(frames(3));
    let body = a.add_root(Node::with_keyframes("body", cube_at(0.0), frames(2)));
    let arm = a
        .add_child(body, Node::with_keyframes("arm", cube_at(2.0), frames(5)))
        .unwrap();
    let tail = a.add_root(Node::with_keyframes("tail", cube_at(-2.0), frames(1)));
    (a, body, arm, tail)
}

fn playbacks(a: &Articulated) -> Vec<(NodeKey, Playback, usize)> {
    a.descendants()
        .into_iter()
        .map(|k| {
            let node = a.get_node(k).unwrap();
            (k, *node.playback(), node.keyframes().len())
        })
        .collect()
}

// ============================================================================
// Broadcast
// ============================================================================

#[test]
fn broadcast_matches_direct_application_per_node() {
    let (mut a, ..) = rig();
    a.set_accum_time(0.75);

    for cmd in [
        PlaybackCommand::AccumTimeByDelta(1.5),
        PlaybackCommand::AccumTimeByDelta(-0.5),
        PlaybackCommand::TransformationIndexByDelta(-1),
        PlaybackCommand::SetTransformationIndex(4),
        PlaybackCommand::SetFrameRate(12.0),
    ] {
        let expected: Vec<_> = playbacks(&a)
            .into_iter()
            .map(|(k, mut p, len)| {
                p.apply(cmd, len);
                (k, p)
            })
            .collect();
        a.broadcast(cmd);
        for (k, p) in expected {
            assert_eq!(a.get_node(k).unwrap().playback(), &p, "{cmd:?} on {k:?}");
        }
    }
}

#[test]
fn flag_setters_reach_every_node() {
    let (mut a, body, arm, tail) = rig();
    a.set_animating(true);
    a.set_reverse(true);
    a.set_auto_replay(true);
    a.set_frame_rate(9.0);
    for k in [body, arm, tail] {
        let p = a.get_node(k).unwrap().playback();
        assert!(p.is_animating() && p.is_reverse() && p.is_auto_replay());
        assert_eq!(p.frame_rate, 9.0);
    }
    assert_eq!(a.frame_rate(), 9.0);
}

#[test]
fn reset_accum_time_reaches_every_node() {
    let (mut a, ..) = rig();
    a.set_transformation_index(1);
    a.set_accum_time(0.75);
    assert!(playbacks(&a).iter().all(|(_, p, _)| approx(p.accum_time, 0.75)));

    a.reset_accum_time();
    assert_eq!(a.accum_time(), 0.0);
    assert_eq!(a.transformation_index(), 1);
    for (_, p, len) in playbacks(&a) {
        assert_eq!(p.accum_time, 0.0);
        assert_eq!(p.transformation_index, 1 % len);
    }
}

#[test]
fn subtree_broadcast_leaves_siblings_alone() {
    let (mut a, body, arm, tail) = rig();
    a.broadcast_from(body, PlaybackCommand::SetAnimating(true)).unwrap();
    assert!(a.get_node(body).unwrap().playback().is_animating());
    assert!(a.get_node(arm).unwrap().playback().is_animating());
    assert!(!a.get_node(tail).unwrap().playback().is_animating());
    assert!(!a.is_animating());
}

#[test]
fn added_nodes_adopt_root_playback() {
    let (mut a, body, ..) = rig();
    a.set_animating(true);
    a.set_frame_rate(2.0);
    a.set_transformation_index(2);
    let leg = a
        .add_child(body, Node::with_keyframes("leg", Mesh::default(), frames(2)))
        .unwrap();
    let p = a.get_node(leg).unwrap().playback();
    assert!(p.is_animating());
    assert_eq!(p.frame_rate, 2.0);
    assert_eq!(p.transformation_index, 0);
}

// ============================================================================
// Editor navigation
// ============================================================================

#[test]
fn navigation_wraps_each_node_by_its_own_length() {
    let (mut a, body, arm, tail) = rig();
    let mut editor = a.editor();

    assert_eq!(editor.to_last_frame(), 3);
    assert_eq!(editor.to_next_frame(), 1);
    assert_eq!(editor.to_previous_frame(), 3);

    assert_eq!(a.transformation_index(), 2);
    assert_eq!(a.get_node(body).unwrap().transformation_index(), 0);
    assert_eq!(a.get_node(arm).unwrap().transformation_index(), 2);
    assert_eq!(a.get_node(tail).unwrap().transformation_index(), 0);

    let mut editor = a.editor();
    editor.select(Selection::Node(arm)).unwrap();
    assert_eq!(editor.total_frames(), 5);
    assert_eq!(editor.to_last_frame(), 5);
    assert_eq!(editor.to_first_frame(), 1);
}

#[test]
fn deleting_current_keyframe_clamps_index() {
    let (mut a, _, arm, _) = rig();
    let mut editor = a.editor();
    editor.select(Selection::Node(arm)).unwrap();
    editor.to_last_frame();
    assert_eq!(editor.delete_frame(4).unwrap(), 4);
    assert_eq!(editor.current_frame(), 4);
}

#[test]
fn insert_then_delete_round_trips_at_every_index() {
    let (mut a, body, ..) = rig();
    let mut editor = a.editor();
    editor.select(Selection::Node(body)).unwrap();
    let original = editor.articulated().get_node(body).unwrap().keyframes().clone();
    for i in 0..=original.len() {
        editor.insert_frame(i).unwrap();
        assert_eq!(editor.keyframe(i).unwrap(), Transformation::IDENTITY);
        editor.delete_frame(i).unwrap();
        assert_eq!(editor.articulated().get_node(body).unwrap().keyframes(), &original);
    }
    assert!(editor.insert_frame(original.len() + 1).is_err());
}

#[test]
fn swap_and_edit_touch_only_selection() {
    let (mut a, body, ..) = rig();
    let root_before = a.keyframes().clone();
    let mut editor = a.editor();
    editor.select(Selection::Node(body)).unwrap();
    editor.swap(0, 1).unwrap();
    editor.edit_frame(0, tx(42.0)).unwrap();
    assert!(editor.edit_frame(2, tx(1.0)).is_err());

    let k = a.get_node(body).unwrap().keyframes();
    assert_eq!(k.as_slice(), &[tx(42.0), tx(0.0)]);
    assert_eq!(a.keyframes(), &root_before);
}

// ============================================================================
// Frame evaluation
// ============================================================================

#[test]
fn static_keyframe_translates_world() {
    let mut a = Articulated::default();
    let part = a.add_root(Node::with_keyframes(
        "part",
        cube_at(0.0),
        KeyframeList::single(tx(5.0)),
    ));

    let mut seen = Vec::new();
    a.frame(0.0, &Transformation::IDENTITY, |x| x, &mut |item: &RenderItem<'_>| {
        seen.push((item.key, item.local.tx, item.world.translation().x));
    });
    assert_eq!(seen, vec![(part, 5.0, 5.0)]);
}

#[test]
fn applied_and_node_offsets_stack() {
    let mut a = Articulated::default();
    let mut node = Node::new("part", cube_at(0.0));
    node.offset = tx(1.0);
    let part = a.add_root(node);

    a.update(0.0, &tx(2.0), |x| x);

    // root local: applied (2); node local: applied + offset (3)
    assert!(approx(a.local().tx, 2.0));
    let node = a.get_node(part).unwrap();
    assert!(approx(node.local().tx, 3.0));
    assert!(approx(node.world_matrix().translation().x, 5.0));
}

#[test]
fn node_pivot_is_mesh_centroid() {
    let mut a = Articulated::default();
    let mut spin = Transformation::IDENTITY;
    spin.rz = 90.0;
    let part = a.add_root(Node::with_keyframes("part", cube_at(3.0), KeyframeList::single(spin)));
    a.update(0.0, &Transformation::IDENTITY, |x| x);

    let node = a.get_node(part).unwrap();
    assert_eq!(node.local().pivot(), Vector3::new(3.0, 0.0, 0.0));
    // The centroid is a fixed point of the node's own rotation.
    let p = *node.world_matrix() * kinetree::math::Vector4::point(3.0, 0.0, 0.0);
    assert!(approx(p.x, 3.0) && approx(p.y, 0.0));
}

#[test]
fn playback_advances_with_clock() {
    let mut a = Articulated::default();
    let part = a.add_root(Node::with_keyframes(
        "part",
        cube_at(0.0),
        KeyframeList::new(vec![Transformation::IDENTITY, tx(10.0)]).unwrap(),
    ));
    a.set_frame_rate(1.0);
    a.set_auto_replay(true);
    a.set_animating(true);

    assert_eq!(a.update(1_000.0, &Transformation::IDENTITY, |x| x), 0.0);
    assert!(approx(a.get_node(part).unwrap().local().tx, 0.0));

    let dt = a.update(1_500.0, &Transformation::IDENTITY, |x| x);
    assert!(approx(dt, 0.5));
    let node = a.get_node(part).unwrap();
    assert!(approx(node.playback().accum_time, 0.5));
    assert!(approx(node.local().tx, 5.0));
    // The root holds a single keyframe and never advances.
    assert_eq!(a.accum_time(), 0.0);
}

#[test]
fn pause_keeps_progress_and_resume_continues() {
    let mut a = Articulated::default();
    let part = a.add_root(Node::with_keyframes("part", cube_at(0.0), frames(3)));
    a.set_frame_rate(1.0);
    a.set_animating(true);

    a.update(0.0, &Transformation::IDENTITY, |x| x);
    a.update(300.0, &Transformation::IDENTITY, |x| x);
    assert!(approx(a.get_node(part).unwrap().playback().accum_time, 0.3));

    a.set_animating(false);
    // The clock keeps ticking while paused; progress must not move.
    a.update(5_000.0, &Transformation::IDENTITY, |x| x);
    a.update(10_000.0, &Transformation::IDENTITY, |x| x);
    let paused = *a.get_node(part).unwrap().playback();
    assert!(approx(paused.accum_time, 0.3));
    assert_eq!(paused.transformation_index, 0);
    assert!(approx(a.get_node(part).unwrap().local().tx, 0.0));

    a.set_animating(true);
    let dt = a.update(10_100.0, &Transformation::IDENTITY, |x| x);
    assert!(approx(dt, 0.1));
    let node = a.get_node(part).unwrap();
    assert!(approx(node.playback().accum_time, 0.4));
    assert!(approx(node.local().tx, 0.4));
    assert!(node.playback().is_animating());
}

#[test]
fn children_inherit_parent_world() {
    let (mut a, body, arm, _) = rig();
    a.set_transformation_index(1);
    a.update(0.0, &Transformation::IDENTITY, |x| x);

    let root_x = a.world_matrix().translation().x;
    let body_node = a.get_node(body).unwrap();
    let arm_node = a.get_node(arm).unwrap();
    assert!(approx(root_x, 1.0));
    assert!(approx(body_node.world_matrix().translation().x, root_x + 1.0));
    assert!(approx(arm_node.world_matrix().translation().x, root_x + 1.0 + 1.0));
}

// ============================================================================
// Structural edits
// ============================================================================

#[test]
fn graft_copies_template_roots() {
    let (mut a, body, ..) = rig();
    let mut template = Articulated::default();
    let cube = template.add_root(Node::new("cube", cube_at(0.0)));
    template.add_child(cube, Node::new("lid", cube_at(0.0))).unwrap();

    let added = a.graft(&template, Selection::Node(body)).unwrap();
    assert_eq!(added.len(), 1);
    assert_eq!(a.parent_of(added[0]), Some(body));
    assert_eq!(a.children_of(added[0]).len(), 1);
    assert_eq!(a.node_count(), 5);
    assert_eq!(template.node_count(), 2);
}

#[test]
fn snapshot_is_independent_of_later_edits() {
    let (mut a, body, arm, _) = rig();
    let hand = a
        .add_child(arm, Node::with_keyframes("hand", cube_at(3.0), frames(2)))
        .unwrap();

    let saved = a.snapshot(arm).unwrap();
    assert_eq!(saved.node_count(), 2);
    assert_eq!(saved.roots().len(), 1);

    a.get_node_mut(hand)
        .unwrap()
        .keyframes_mut()
        .set(1, tx(99.0))
        .unwrap();
    a.remove_node(body).unwrap();
    assert!(a.find_by_component("arm").is_none());

    let pasted = a.graft(&saved, Selection::Root).unwrap();
    assert_eq!(pasted.len(), 1);
    let arm_copy = pasted[0];
    assert_eq!(a.get_node(arm_copy).unwrap().component, "arm");
    assert_eq!(a.get_node(arm_copy).unwrap().keyframes().len(), 5);

    let hand_copy = a.children_of(arm_copy)[0];
    let hand_node = a.get_node(hand_copy).unwrap();
    assert_eq!(hand_node.component, "hand");
    assert!(approx(hand_node.keyframes()[1].tx, 1.0));
    assert!(a.snapshot(hand).is_err());
}

#[test]
fn attach_moves_subtree_to_root_level() {
    let (mut a, body, arm, tail) = rig();
    a.attach(arm, Selection::Root).unwrap();
    assert_eq!(a.roots(), &[body, tail, arm]);
    assert_eq!(a.parent_of(arm), None);
    assert!(a.children_of(body).is_empty());

    a.attach(body, Selection::Node(tail)).unwrap();
    assert_eq!(a.roots(), &[tail, arm]);
    assert_eq!(a.find_by_component("body"), Some(body));
}

#[test]
fn center_averages_root_level_faces() {
    let mut a = Articulated::default();
    assert_eq!(a.center().truncate(), Vector3::ZERO);
    let left = a.add_root(Node::new("left", cube_at(-2.0)));
    a.add_root(Node::new("right", cube_at(4.0)));
    a.add_child(left, Node::new("far", cube_at(100.0))).unwrap();
    let c = a.center();
    assert!(approx(c.x, 1.0));
    assert_eq!(c.w, 1.0);
}

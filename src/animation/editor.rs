//! Keyframe editing against the current selection.
//!
//! Frame navigation and playback toggles always go through the articulated
//! root so every node receives the same command. Keyframe list edits touch
//! only the selected target.

use log::{debug, warn};

use crate::animation::keyframes::KeyframeList;
use crate::errors::{KineError, Result};
use crate::scene::articulated::{Articulated, Selection};
use crate::scene::transformation::Transformation;

/// Mutable editing view over an [`Articulated`].
#[derive(Debug)]
pub struct AnimationEditor<'a> {
    articulated: &'a mut Articulated,
}

impl Articulated {
    #[must_use]
    pub fn editor(&mut self) -> AnimationEditor<'_> {
        AnimationEditor::new(self)
    }
}

impl<'a> AnimationEditor<'a> {
    #[must_use]
    pub fn new(articulated: &'a mut Articulated) -> Self {
        Self { articulated }
    }

    #[must_use]
    pub fn articulated(&self) -> &Articulated {
        self.articulated
    }

    // ========================================================================
    // Selection
    // ========================================================================

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.articulated.selection()
    }

    pub fn select(&mut self, selection: Selection) -> Result<()> {
        self.articulated.select(selection)?;
        debug!("Selected {selection:?}");
        Ok(())
    }

    /// Keyframe count of the selected target.
    #[must_use]
    pub fn total_frames(&self) -> usize {
        self.articulated
            .keyframes_of(self.selection())
            .map_or(0, KeyframeList::len)
    }

    /// 1-based index of the selected target's current keyframe.
    #[must_use]
    pub fn current_frame(&self) -> usize {
        self.articulated
            .playback_of(self.selection())
            .map_or(0, |p| p.transformation_index + 1)
    }

    pub fn keyframe(&self, index: usize) -> Result<Transformation> {
        let frames = self.articulated.keyframes_of(self.selection())?;
        frames
            .get(index)
            .copied()
            .ok_or(KineError::KeyframeIndexOutOfBounds {
                index,
                len: frames.len(),
            })
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn to_first_frame(&mut self) -> usize {
        self.articulated.set_transformation_index(0);
        self.current_frame()
    }

    /// Jumps to the selected target's last keyframe. Nodes with fewer
    /// keyframes land on `(len - 1) % own_len`.
    pub fn to_last_frame(&mut self) -> usize {
        let last = self.total_frames().saturating_sub(1);
        self.articulated.set_transformation_index(last);
        self.current_frame()
    }

    pub fn to_next_frame(&mut self) -> usize {
        self.articulated.set_transformation_index_by_delta(1);
        self.current_frame()
    }

    pub fn to_previous_frame(&mut self) -> usize {
        self.articulated.set_transformation_index_by_delta(-1);
        self.current_frame()
    }

    // ========================================================================
    // Keyframe edits
    // ========================================================================

    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        let selection = self.selection();
        self.articulated.keyframes_of_mut(selection)?.swap(a, b)?;
        debug!("Swapped keyframes {a} and {b} of {selection:?}");
        Ok(())
    }

    /// Inserts an identity keyframe before `index` (`index == len` appends).
    pub fn insert_frame(&mut self, index: usize) -> Result<usize> {
        let selection = self.selection();
        let frames = self.articulated.keyframes_of_mut(selection)?;
        frames.insert(index, Transformation::IDENTITY)?;
        let total = frames.len();
        debug!("Inserted keyframe at {index} of {selection:?} ({total} total)");
        Ok(total)
    }

    /// Removes the keyframe at `index`. The last remaining keyframe cannot
    /// be deleted.
    pub fn delete_frame(&mut self, index: usize) -> Result<usize> {
        let selection = self.selection();
        let frames = self.articulated.keyframes_of_mut(selection)?;
        if let Err(err) = frames.remove(index) {
            warn!("Rejected keyframe deletion at {index} of {selection:?}: {err}");
            return Err(err);
        }
        let total = frames.len();
        self.articulated.clamp_playback(selection);
        debug!("Deleted keyframe at {index} of {selection:?} ({total} left)");
        Ok(total)
    }

    /// Replaces the keyframe at `index` with the edited record.
    pub fn edit_frame(&mut self, index: usize, frame: Transformation) -> Result<()> {
        let selection = self.selection();
        self.articulated.keyframes_of_mut(selection)?.set(index, frame)?;
        debug!("Edited keyframe {index} of {selection:?}");
        Ok(())
    }

    // ========================================================================
    // Playback toggles
    // ========================================================================

    /// Returns the new animating state.
    pub fn toggle_playing(&mut self) -> bool {
        let on = !self.articulated.is_animating();
        self.articulated.set_animating(on);
        on
    }

    pub fn toggle_reverse(&mut self) -> bool {
        let on = !self.articulated.is_reverse();
        self.articulated.set_reverse(on);
        on
    }

    pub fn toggle_auto_replay(&mut self) -> bool {
        let on = !self.articulated.is_auto_replay();
        self.articulated.set_auto_replay(on);
        on
    }

    pub fn set_frame_rate(&mut self, fps: f64) {
        self.articulated.set_frame_rate(fps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Mesh, Node};

    #[test]
    fn insert_then_delete_restores_list() {
        let mut a = Articulated::default();
        let mut editor = a.editor();
        let before = editor.articulated().keyframes().clone();
        assert_eq!(editor.insert_frame(1).unwrap(), 2);
        assert_eq!(editor.keyframe(1).unwrap(), Transformation::IDENTITY);
        assert_eq!(editor.delete_frame(1).unwrap(), 1);
        assert_eq!(editor.articulated().keyframes(), &before);
    }

    #[test]
    fn last_keyframe_cannot_be_deleted() {
        let mut a = Articulated::default();
        let mut editor = a.editor();
        assert!(matches!(editor.delete_frame(0), Err(KineError::EmptyKeyframes)));
        assert_eq!(editor.total_frames(), 1);
    }

    #[test]
    fn edits_follow_selection() {
        let mut a = Articulated::default();
        let body = a.add_root(Node::new("body", Mesh::default()));
        let mut editor = a.editor();
        editor.select(Selection::Node(body)).unwrap();
        editor.insert_frame(0).unwrap();
        assert_eq!(editor.total_frames(), 2);
        editor.select(Selection::Root).unwrap();
        assert_eq!(editor.total_frames(), 1);
    }

    #[test]
    fn toggles_flip_root_and_nodes() {
        let mut a = Articulated::default();
        let body = a.add_root(Node::new("body", Mesh::default()));
        let mut editor = a.editor();
        assert!(editor.toggle_playing());
        assert!(editor.toggle_reverse());
        assert!(!editor.toggle_playing());
        assert!(a.is_reverse());
        assert!(a.get_node(body).unwrap().playback().is_reverse());
    }
}

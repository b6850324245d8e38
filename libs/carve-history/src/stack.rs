//! # Command Stack
//!
//! Undo/redo history for scene edits, with resource release on branch
//! discard: pushing a new edit flushes the redo stack, releasing every
//! entry exactly once, oldest first.
//!
//! The stack and the scene it mutates are touched only from the single
//! interactive thread; no locking is involved.

use tracing::debug;

use crate::command::SceneEdit;
use crate::scene::SceneHost;

/// Ordered undo/redo stacks of boxed edits.
#[derive(Default)]
pub struct CommandStack {
    /// Applied edits, oldest first.
    undo_stack: Vec<Box<dyn SceneEdit>>,
    /// Reverted edits, oldest first.
    redo_stack: Vec<Box<dyn SceneEdit>>,
}

impl CommandStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of edits available to undo.
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of edits available to redo.
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Records an edit the caller has already applied.
    ///
    /// Applies no scene mutation itself. Every edit on the redo stack is
    /// released (oldest to newest) and discarded: those branches can
    /// never be re-applied once history diverges.
    pub fn push(&mut self, scene: &mut dyn SceneHost, edit: Box<dyn SceneEdit>) {
        let discarded = self.redo_stack.len();
        for mut stale in self.redo_stack.drain(..) {
            stale.release(scene);
        }
        self.undo_stack.push(edit);
        debug!(
            undo_depth = self.undo_stack.len(),
            discarded, "edit recorded"
        );
    }

    /// Reverts the most recent edit. No-op on an empty undo stack.
    ///
    /// Returns true if an edit was reverted.
    pub fn undo(&mut self, scene: &mut dyn SceneHost) -> bool {
        let Some(mut edit) = self.undo_stack.pop() else {
            return false;
        };
        edit.revert(scene);
        self.redo_stack.push(edit);
        debug!(undo_depth = self.undo_stack.len(), "undo");
        true
    }

    /// Re-applies the most recently reverted edit. No-op on an empty
    /// redo stack.
    ///
    /// Returns true if an edit was re-applied.
    pub fn redo(&mut self, scene: &mut dyn SceneHost) -> bool {
        let Some(mut edit) = self.redo_stack.pop() else {
            return false;
        };
        edit.apply(scene);
        self.undo_stack.push(edit);
        debug!(undo_depth = self.undo_stack.len(), "redo");
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Edit double that records every lifecycle call into a shared log.
    struct ProbeEdit {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl ProbeEdit {
        fn new(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Box<Self> {
            Box::new(Self {
                name,
                log: Rc::clone(log),
            })
        }

        fn record(&self, event: &str) {
            self.log.borrow_mut().push(format!("{}.{event}", self.name));
        }
    }

    impl SceneEdit for ProbeEdit {
        fn apply(&mut self, _scene: &mut dyn SceneHost) {
            self.record("apply");
        }
        fn revert(&mut self, _scene: &mut dyn SceneHost) {
            self.record("revert");
        }
        fn release(&mut self, _scene: &mut dyn SceneHost) {
            self.record("release");
        }
    }

    fn harness() -> (crate::scene::MemoryScene, Rc<RefCell<Vec<String>>>) {
        (crate::scene::MemoryScene::new(), Rc::new(RefCell::new(Vec::new())))
    }

    #[test]
    fn test_undo_redo_empty_stacks_are_noops() {
        let (mut scene, _log) = harness();
        let mut stack = CommandStack::new();
        assert!(!stack.undo(&mut scene));
        assert!(!stack.redo(&mut scene));
    }

    #[test]
    fn test_push_does_not_apply() {
        let (mut scene, log) = harness();
        let mut stack = CommandStack::new();
        stack.push(&mut scene, ProbeEdit::new("cmd1", &log));
        assert!(log.borrow().is_empty());
        assert_eq!(stack.undo_len(), 1);
    }

    #[test]
    fn test_undo_moves_edit_to_redo_stack() {
        let (mut scene, log) = harness();
        let mut stack = CommandStack::new();
        stack.push(&mut scene, ProbeEdit::new("cmd1", &log));

        assert!(stack.undo(&mut scene));
        assert_eq!(stack.undo_len(), 0);
        assert_eq!(stack.redo_len(), 1);
        assert_eq!(*log.borrow(), vec!["cmd1.revert"]);

        assert!(stack.redo(&mut scene));
        assert_eq!(stack.undo_len(), 1);
        assert_eq!(stack.redo_len(), 0);
        assert_eq!(*log.borrow(), vec!["cmd1.revert", "cmd1.apply"]);
    }

    #[test]
    fn test_push_flushes_redo_stack_with_release() {
        // The concrete scenario: push cmd1, cmd2; undo; push cmd3.
        let (mut scene, log) = harness();
        let mut stack = CommandStack::new();
        stack.push(&mut scene, ProbeEdit::new("cmd1", &log));
        stack.push(&mut scene, ProbeEdit::new("cmd2", &log));
        assert_eq!((stack.undo_len(), stack.redo_len()), (2, 0));

        stack.undo(&mut scene);
        assert_eq!((stack.undo_len(), stack.redo_len()), (1, 1));
        assert_eq!(*log.borrow(), vec!["cmd2.revert"]);

        stack.push(&mut scene, ProbeEdit::new("cmd3", &log));
        assert_eq!((stack.undo_len(), stack.redo_len()), (2, 0));
        assert_eq!(*log.borrow(), vec!["cmd2.revert", "cmd2.release"]);
    }

    #[test]
    fn test_release_runs_oldest_first() {
        let (mut scene, log) = harness();
        let mut stack = CommandStack::new();
        stack.push(&mut scene, ProbeEdit::new("cmd1", &log));
        stack.push(&mut scene, ProbeEdit::new("cmd2", &log));
        stack.push(&mut scene, ProbeEdit::new("cmd3", &log));

        stack.undo(&mut scene);
        stack.undo(&mut scene);
        stack.undo(&mut scene);
        log.borrow_mut().clear();

        stack.push(&mut scene, ProbeEdit::new("cmd4", &log));
        // Redo stack held cmd3, cmd2, cmd1 (newest last popped); released
        // oldest to newest.
        assert_eq!(
            *log.borrow(),
            vec!["cmd1.release", "cmd2.release", "cmd3.release"]
        );
    }

    #[test]
    fn test_stack_length_invariant() {
        // undo_len + redo_len == pushes - releases, at every step.
        let (mut scene, log) = harness();
        let mut stack = CommandStack::new();
        let released = |log: &Rc<RefCell<Vec<String>>>| {
            log.borrow().iter().filter(|e| e.ends_with("release")).count()
        };

        stack.push(&mut scene, ProbeEdit::new("cmd1", &log));
        stack.push(&mut scene, ProbeEdit::new("cmd2", &log));
        stack.undo(&mut scene);
        assert_eq!(stack.undo_len() + stack.redo_len(), 2 - released(&log));

        stack.push(&mut scene, ProbeEdit::new("cmd3", &log));
        assert_eq!(stack.undo_len() + stack.redo_len(), 3 - released(&log));

        stack.undo(&mut scene);
        stack.undo(&mut scene);
        stack.push(&mut scene, ProbeEdit::new("cmd4", &log));
        assert_eq!(stack.undo_len() + stack.redo_len(), 4 - released(&log));
    }

    #[test]
    fn test_undo_then_redo_restores_scene_nodes() {
        use crate::command::ReplaceNodes;
        use carve_mesh::MeshBuffer;
        use glam::DVec3;

        let mut scene = crate::scene::MemoryScene::new();
        let mut island = MeshBuffer::new();
        island.push_vertex(DVec3::ZERO, DVec3::Z);
        island.push_vertex(DVec3::X, DVec3::Z);
        island.push_vertex(DVec3::Y, DVec3::Z);

        let target_mesh = {
            let mut m = island.clone();
            m.positions[0] = 9.0;
            m
        };
        let target = scene.add_node(target_mesh.clone());
        let island_handle = scene.add_node(island.clone());
        scene.remove_node(target);
        let edit = ReplaceNodes::new(target, target_mesh, vec![island_handle], vec![island]);

        let mut stack = CommandStack::new();
        stack.push(&mut scene, Box::new(edit));
        let before: Vec<MeshBuffer> =
            scene.attached_meshes().into_iter().cloned().collect();

        stack.undo(&mut scene);
        stack.redo(&mut scene);

        let after: Vec<MeshBuffer> =
            scene.attached_meshes().into_iter().cloned().collect();
        assert_eq!(before, after);
    }
}

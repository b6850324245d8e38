//! # Scene Edits
//!
//! The reversible-edit interface and the one concrete edit this pipeline
//! produces: replacing a cut target with its islands.

use carve_mesh::MeshBuffer;
use tracing::debug;

use crate::scene::{NodeHandle, SceneHost};

/// A reversible scene edit.
///
/// An edit is created *after* the orchestrator has already applied it;
/// `apply` is only ever called to redo. Lifecycle per command:
/// Applied ⇄ Reverted, until a fresh push evicts it from the redo stack,
/// at which point `release` runs exactly once and the command is
/// discarded.
///
/// `apply` and `revert` must not fail: anything fallible happens before
/// the command is constructed, so the history never holds an edit that
/// attempted and failed.
pub trait SceneEdit {
    /// Re-applies the edit (redo).
    fn apply(&mut self, scene: &mut dyn SceneHost);
    /// Rolls the edit back (undo).
    fn revert(&mut self, scene: &mut dyn SceneHost);
    /// Frees resources held for a redo that will never come.
    fn release(&mut self, scene: &mut dyn SceneHost);
}

/// Lifecycle state, checked at every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditState {
    Applied,
    Reverted,
    Released,
}

/// Replaces one target node with the islands a cut produced.
///
/// The edit owns its geometry: re-applying a side uploads a fresh copy
/// and yields new handles, while the stale detached handle from the
/// previous transition is disposed at that point. What remains detached
/// when the edit is evicted is reclaimed by `release` — without it, the
/// island geometry of an undone, superseded cut would stay resident in
/// the host forever.
#[derive(Debug)]
pub struct ReplaceNodes {
    /// The target's geometry, for re-adding on undo.
    target: MeshBuffer,
    /// One buffer per island, for re-adding on redo.
    islands: Vec<MeshBuffer>,
    /// Target node while attached (Reverted state).
    target_live: Option<NodeHandle>,
    /// Target node while detached but resident (Applied state).
    target_detached: Option<NodeHandle>,
    /// Island nodes while attached (Applied state).
    island_live: Vec<NodeHandle>,
    /// Island nodes while detached but resident (Reverted state).
    island_detached: Vec<NodeHandle>,
    state: EditState,
}

impl ReplaceNodes {
    /// Wraps an already-performed swap.
    ///
    /// The orchestrator has removed `target_handle` (without disposing
    /// it) and attached `island_handles`; the edit takes over both sides'
    /// lifecycles from here.
    pub fn new(
        target_handle: NodeHandle,
        target: MeshBuffer,
        island_handles: Vec<NodeHandle>,
        islands: Vec<MeshBuffer>,
    ) -> Self {
        debug_assert_eq!(island_handles.len(), islands.len());
        Self {
            target,
            islands,
            target_live: None,
            target_detached: Some(target_handle),
            island_live: island_handles,
            island_detached: Vec::new(),
            state: EditState::Applied,
        }
    }

    /// Handles of the currently attached island nodes.
    pub fn island_handles(&self) -> &[NodeHandle] {
        &self.island_live
    }
}

impl SceneEdit for ReplaceNodes {
    fn apply(&mut self, scene: &mut dyn SceneHost) {
        debug_assert_eq!(self.state, EditState::Reverted);

        if let Some(live) = self.target_live.take() {
            scene.remove_node(live);
            self.target_detached = Some(live);
        }
        for stale in self.island_detached.drain(..) {
            scene.dispose_geometry(stale);
        }
        self.island_live = self
            .islands
            .iter()
            .map(|mesh| scene.add_node(mesh.clone()))
            .collect();

        self.state = EditState::Applied;
        debug!(islands = self.island_live.len(), "cut re-applied");
    }

    fn revert(&mut self, scene: &mut dyn SceneHost) {
        debug_assert_eq!(self.state, EditState::Applied);

        for live in self.island_live.drain(..) {
            scene.remove_node(live);
            self.island_detached.push(live);
        }
        let restored = scene.add_node(self.target.clone());
        if let Some(stale) = self.target_detached.take() {
            scene.dispose_geometry(stale);
        }
        self.target_live = Some(restored);

        self.state = EditState::Reverted;
        debug!("cut reverted");
    }

    fn release(&mut self, scene: &mut dyn SceneHost) {
        debug_assert_eq!(self.state, EditState::Reverted);

        for handle in self.island_detached.drain(..) {
            scene.dispose_geometry(handle);
        }

        self.state = EditState::Released;
        debug!("cut released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MemoryScene;
    use glam::DVec3;

    fn triangle(offset: f64) -> MeshBuffer {
        let mut mesh = MeshBuffer::new();
        mesh.push_vertex(DVec3::new(offset, 0.0, 0.0), DVec3::Z);
        mesh.push_vertex(DVec3::new(offset + 1.0, 0.0, 0.0), DVec3::Z);
        mesh.push_vertex(DVec3::new(offset, 1.0, 0.0), DVec3::Z);
        mesh
    }

    /// Performs the forward swap the orchestrator would, returning the
    /// edit that wraps it.
    fn perform_cut(scene: &mut MemoryScene, islands: Vec<MeshBuffer>) -> ReplaceNodes {
        let target_mesh = triangle(0.0);
        let target = scene.add_node(target_mesh.clone());
        let island_handles: Vec<NodeHandle> = islands
            .iter()
            .map(|mesh| scene.add_node(mesh.clone()))
            .collect();
        scene.remove_node(target);
        ReplaceNodes::new(target, target_mesh, island_handles, islands)
    }

    #[test]
    fn test_revert_restores_target_geometry() {
        let mut scene = MemoryScene::new();
        let mut edit = perform_cut(&mut scene, vec![triangle(10.0), triangle(20.0)]);
        assert_eq!(scene.attached_count(), 2);

        edit.revert(&mut scene);
        assert_eq!(scene.attached_count(), 1);
        assert_eq!(scene.attached_meshes()[0], &triangle(0.0));
        // Islands stay resident for a possible redo.
        assert_eq!(scene.resident_count(), 3);
    }

    #[test]
    fn test_apply_after_revert_restores_island_set() {
        let mut scene = MemoryScene::new();
        let mut edit = perform_cut(&mut scene, vec![triangle(10.0), triangle(20.0)]);
        let before: Vec<MeshBuffer> =
            scene.attached_meshes().into_iter().cloned().collect();

        edit.revert(&mut scene);
        edit.apply(&mut scene);

        let after: Vec<MeshBuffer> =
            scene.attached_meshes().into_iter().cloned().collect();
        assert_eq!(before, after);
        // No stale geometry accumulates across the round trip.
        assert_eq!(scene.resident_count(), 3);
    }

    #[test]
    fn test_release_reclaims_detached_islands() {
        let mut scene = MemoryScene::new();
        let mut edit = perform_cut(&mut scene, vec![triangle(10.0)]);

        edit.revert(&mut scene);
        assert_eq!(scene.resident_count(), 2);

        edit.release(&mut scene);
        // Only the restored target remains.
        assert_eq!(scene.resident_count(), 1);
        assert_eq!(scene.attached_count(), 1);
    }

    #[test]
    fn test_empty_island_cut_round_trip() {
        // A cut that fully consumed the target: zero replacement nodes.
        let mut scene = MemoryScene::new();
        let mut edit = perform_cut(&mut scene, Vec::new());
        assert_eq!(scene.attached_count(), 0);

        edit.revert(&mut scene);
        assert_eq!(scene.attached_count(), 1);

        edit.apply(&mut scene);
        assert_eq!(scene.attached_count(), 0);
        assert_eq!(scene.resident_count(), 1);
    }
}

//! # Scene Host Interface
//!
//! The three primitives the rendering host exposes to the command stack.
//! Commands receive opaque node handles at construction time instead of
//! capturing live scene references, so what a command touches is an
//! explicit, inspectable value.

use std::collections::HashMap;

use carve_mesh::MeshBuffer;

/// Opaque id into the host's node table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub u64);

/// The scene-mutation interface consumed from the external host.
///
/// Semantics the command stack relies on:
/// - `add_node` uploads geometry, attaches a node, returns its handle;
/// - `remove_node` detaches the node from the visual tree but keeps its
///   geometry resident — the handle stays valid for `dispose_geometry`;
/// - `dispose_geometry` permanently frees a node's geometry; the handle
///   is dead afterwards.
///
/// Every `remove_node` must eventually be paired with exactly one
/// `dispose_geometry`, or the host leaks the resident geometry.
pub trait SceneHost {
    /// Uploads a buffer and attaches a new node for it.
    fn add_node(&mut self, mesh: MeshBuffer) -> NodeHandle;
    /// Detaches a node, keeping its geometry resident.
    fn remove_node(&mut self, handle: NodeHandle);
    /// Frees a node's geometry for good.
    fn dispose_geometry(&mut self, handle: NodeHandle);
}

// =============================================================================
// IN-MEMORY HOST
// =============================================================================

/// Reference host: a plain node table.
///
/// Stands in for the rendering host in tests and demos, and doubles as a
/// leak detector — `resident_count` counts geometry the host still holds,
/// attached or not.
#[derive(Debug, Default)]
pub struct MemoryScene {
    nodes: HashMap<NodeHandle, SceneNode>,
    next_id: u64,
}

#[derive(Debug)]
struct SceneNode {
    mesh: MeshBuffer,
    attached: bool,
}

impl MemoryScene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles of currently attached nodes, sorted.
    pub fn attached_handles(&self) -> Vec<NodeHandle> {
        let mut handles: Vec<NodeHandle> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.attached)
            .map(|(&handle, _)| handle)
            .collect();
        handles.sort_unstable();
        handles
    }

    /// Geometry of currently attached nodes, in handle order.
    pub fn attached_meshes(&self) -> Vec<&MeshBuffer> {
        self.attached_handles()
            .into_iter()
            .filter_map(|handle| self.nodes.get(&handle).map(|node| &node.mesh))
            .collect()
    }

    /// Number of attached nodes.
    pub fn attached_count(&self) -> usize {
        self.nodes.values().filter(|node| node.attached).count()
    }

    /// Number of resident geometries, attached or detached.
    pub fn resident_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the buffer behind a handle while it is resident.
    pub fn geometry(&self, handle: NodeHandle) -> Option<&MeshBuffer> {
        self.nodes.get(&handle).map(|node| &node.mesh)
    }
}

impl SceneHost for MemoryScene {
    fn add_node(&mut self, mesh: MeshBuffer) -> NodeHandle {
        let handle = NodeHandle(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            handle,
            SceneNode {
                mesh,
                attached: true,
            },
        );
        handle
    }

    fn remove_node(&mut self, handle: NodeHandle) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            debug_assert!(node.attached, "removing a node that is not attached");
            node.attached = false;
        }
    }

    fn dispose_geometry(&mut self, handle: NodeHandle) {
        let removed = self.nodes.remove(&handle);
        debug_assert!(removed.is_some(), "disposing an unknown handle");
    }
}

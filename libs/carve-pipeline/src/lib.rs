//! # Carve Pipeline
//!
//! The cut cycle, end to end: bake and weld the cutter brush, subtract it
//! from the target on the CSG lane, split the result into islands on the
//! segment lane, swap the scene nodes, and record the whole thing as one
//! reversible edit.
//!
//! ```text
//! stroke → cutter Brush → SUBTRACT → islands → node swap → CommandStack
//! ```
//!
//! [`apply_cut`] drives the worker lanes to completion with `wait()`; a
//! host that must keep pumping frames holds the dispatcher itself and
//! polls the task handles instead — the orchestration below is the same
//! either way.
//!
//! Failure never leaves half a cut behind: every fallible step runs
//! before the scene is touched, so on error the scene and history are
//! exactly as they were, and the history never records an edit that
//! failed.

use carve_csg::BooleanOp;
use carve_history::ReplaceNodes;
use carve_mesh::weld_vertices;
use config::constants::VERTEX_WELD_EPSILON;
use tracing::{debug, info};

pub use carve_dispatch::TaskDispatcher;
pub use carve_history::{CommandStack, NodeHandle, SceneHost};
pub use carve_mesh::{Brush, GeometryError, MeshBuffer};

/// Handles produced by a successful cut.
#[derive(Debug)]
pub struct CutOutcome {
    /// The island nodes now attached in place of the target. Empty when
    /// the cutter consumed the target entirely — that is a success, not
    /// an error.
    pub islands: Vec<NodeHandle>,
}

/// Cuts `cutter` out of the target node and records the edit.
///
/// `target_mesh` is the host's copy of the target geometry; it is what
/// the recorded edit re-attaches on undo.
///
/// # Errors
///
/// - [`GeometryError::InvalidInput`]: a buffer violates the data-model
///   invariants; caller bug, scene untouched.
/// - [`GeometryError::EvaluationFailed`]: the boolean kernel gave up; the
///   edit is abandoned, scene untouched, nothing pushed. Do not retry
///   automatically.
/// - [`GeometryError::WorkerUnavailable`]: a lane died; respawn it and
///   the same stroke may be retried.
pub fn apply_cut<S: SceneHost>(
    scene: &mut S,
    history: &mut CommandStack,
    dispatcher: &TaskDispatcher,
    target_handle: NodeHandle,
    target_mesh: MeshBuffer,
    cutter: Brush,
) -> Result<CutOutcome, GeometryError> {
    target_mesh.validate()?;

    // The evaluator assumes welded, world-space operands.
    let welded_target = weld_vertices(target_mesh.clone(), VERTEX_WELD_EPSILON);
    let welded_cutter = weld_vertices(cutter.bake(), VERTEX_WELD_EPSILON);

    let carved = dispatcher
        .dispatch_csg(welded_target, welded_cutter, BooleanOp::Subtract)?
        .wait()?;
    debug!(triangles = carved.triangle_count(), "boolean settled");

    // An empty result means the stroke consumed the whole target; zero
    // islands is a valid outcome and skips the segment lane.
    let islands: Vec<MeshBuffer> = if carved.is_empty() {
        Vec::new()
    } else {
        dispatcher.dispatch_segment(carved)?.wait()?
    };

    // Everything fallible is behind us: swap the nodes and record it.
    let island_handles: Vec<NodeHandle> = islands
        .iter()
        .map(|island| scene.add_node(island.clone()))
        .collect();
    scene.remove_node(target_handle);

    let edit = ReplaceNodes::new(target_handle, target_mesh, island_handles.clone(), islands);
    history.push(scene, Box::new(edit));

    info!(islands = island_handles.len(), "cut applied");
    Ok(CutOutcome {
        islands: island_handles,
    })
}

// =============================================================================
// TESTS
// =============================================================================

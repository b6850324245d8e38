//! # Carve Dispatch
//!
//! Runs the boolean evaluator and the island segmenter off the
//! interactive thread: one dedicated, reused worker lane per operation
//! kind, one in-flight request per lane.
//!
//! The interactive thread never blocks unless it chooses to `wait()`; it
//! can `poll()` a handle each frame and carry on. Requests within a lane
//! are processed strictly in submission order because each lane is a
//! single thread; requests to different lanes are unordered relative to
//! each other.
//!
//! Payloads are moved into requests and never readable by the sender
//! afterwards — the one-shot ownership transfer the whole pipeline is
//! built on.

mod lane;
pub mod protocol;

use carve_csg::{evaluate, BooleanOp};
use carve_islands::segment;
use carve_mesh::{GeometryError, MeshBuffer};
use tracing::debug;

use lane::{TaskHandle, WorkerLane};
use protocol::{CsgRequest, CsgResponse, SegmentRequest, SegmentResponse};

// =============================================================================
// TASKS
// =============================================================================

/// Pending boolean evaluation.
#[derive(Debug)]
pub struct CsgTask(TaskHandle<CsgResponse>);

impl CsgTask {
    /// Non-blocking check; `None` while the worker is computing.
    pub fn poll(&mut self) -> Option<Result<MeshBuffer, GeometryError>> {
        self.0.poll().map(|r| r.and_then(convert_csg))
    }

    /// Blocks until the boolean settles.
    pub fn wait(self) -> Result<MeshBuffer, GeometryError> {
        self.0.wait().and_then(convert_csg)
    }
}

/// Pending segmentation.
pub struct SegmentTask(TaskHandle<SegmentResponse>);

impl SegmentTask {
    /// Non-blocking check; `None` while the worker is computing.
    pub fn poll(&mut self) -> Option<Result<Vec<MeshBuffer>, GeometryError>> {
        self.0.poll().map(|r| r.and_then(convert_segment))
    }

    /// Blocks until the segmentation settles.
    pub fn wait(self) -> Result<Vec<MeshBuffer>, GeometryError> {
        self.0.wait().and_then(convert_segment)
    }
}

fn convert_csg(response: CsgResponse) -> Result<MeshBuffer, GeometryError> {
    match response {
        CsgResponse::Success(mesh) => Ok(mesh),
        CsgResponse::Failure(message) => Err(GeometryError::evaluation_failed(message)),
    }
}

fn convert_segment(response: SegmentResponse) -> Result<Vec<MeshBuffer>, GeometryError> {
    match response {
        SegmentResponse::Success(islands) => Ok(islands),
        SegmentResponse::Failure(message) => Err(GeometryError::evaluation_failed(message)),
    }
}

// =============================================================================
// DISPATCHER
// =============================================================================

/// Owns the two worker lanes and correlates requests with responses.
///
/// Dropping the dispatcher terminates both workers; a worker finishes the
/// request it is on, and handles outliving the dispatcher settle rather
/// than hang.
pub struct TaskDispatcher {
    csg: WorkerLane<CsgRequest, CsgResponse>,
    segment: WorkerLane<SegmentRequest, SegmentResponse>,
}

impl TaskDispatcher {
    /// Spawns both worker lanes.
    pub fn new() -> Result<Self, GeometryError> {
        Ok(Self {
            csg: csg_lane()?,
            segment: segment_lane()?,
        })
    }

    /// Dispatches a boolean evaluation to the CSG lane.
    ///
    /// Buffers are validated eagerly so an invalid input fails the call
    /// without occupying the lane, then moved into the request.
    pub fn dispatch_csg(
        &self,
        a: MeshBuffer,
        b: MeshBuffer,
        op: BooleanOp,
    ) -> Result<CsgTask, GeometryError> {
        a.validate()?;
        b.validate()?;
        debug!(?op, a_triangles = a.triangle_count(), b_triangles = b.triangle_count(),
            "dispatching boolean");
        let handle = self.csg.submit(CsgRequest { op, a, b })?;
        Ok(CsgTask(handle))
    }

    /// Dispatches a segmentation to the segment lane.
    ///
    /// The buffer is expanded to non-indexed soup before it crosses the
    /// boundary, matching the wire contract.
    pub fn dispatch_segment(&self, mesh: MeshBuffer) -> Result<SegmentTask, GeometryError> {
        mesh.validate()?;
        let soup = mesh.deindexed();
        debug!(triangles = soup.triangle_count(), "dispatching segmentation");
        let handle = self.segment.submit(SegmentRequest {
            positions: soup.positions,
            normals: soup.normals,
        })?;
        Ok(SegmentTask(handle))
    }

    /// Replaces a dead CSG lane with a fresh worker.
    ///
    /// Recovery path for [`GeometryError::WorkerUnavailable`]; the caller
    /// may then retry the same request.
    pub fn respawn_csg_lane(&mut self) -> Result<(), GeometryError> {
        self.csg = csg_lane()?;
        Ok(())
    }

    /// Replaces a dead segment lane with a fresh worker.
    pub fn respawn_segment_lane(&mut self) -> Result<(), GeometryError> {
        self.segment = segment_lane()?;
        Ok(())
    }
}

fn csg_lane() -> Result<WorkerLane<CsgRequest, CsgResponse>, GeometryError> {
    WorkerLane::spawn("csg", |request: CsgRequest| {
        match evaluate(&request.a, &request.b, request.op) {
            Ok(result) => CsgResponse::Success(result),
            Err(err) => CsgResponse::Failure(err.to_string()),
        }
    })
}

fn segment_lane() -> Result<WorkerLane<SegmentRequest, SegmentResponse>, GeometryError> {
    WorkerLane::spawn("segment", |request: SegmentRequest| {
        let mesh = MeshBuffer {
            positions: request.positions,
            normals: request.normals,
            indices: None,
        };
        SegmentResponse::Success(segment(mesh))
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use carve_mesh::primitives::cuboid;
    use glam::{DMat4, DVec3};

    fn cube_at(pos: DVec3, size: f64) -> MeshBuffer {
        let mut mesh = cuboid(DVec3::splat(size), true).unwrap();
        mesh.transform(&DMat4::from_translation(pos));
        mesh
    }

    #[test]
    fn test_dispatch_csg_round_trip() {
        let dispatcher = TaskDispatcher::new().unwrap();
        let target = cube_at(DVec3::ZERO, 1.0);
        let cutter = cube_at(DVec3::ZERO, 4.0);

        let task = dispatcher
            .dispatch_csg(target, cutter, BooleanOp::Subtract)
            .unwrap();
        let result = task.wait().unwrap();
        // Fully consumed target: empty result is a success.
        assert_eq!(result.triangle_count(), 0);
    }

    #[test]
    fn test_dispatch_segment_round_trip() {
        let dispatcher = TaskDispatcher::new().unwrap();
        let mut soup = cube_at(DVec3::ZERO, 1.0);
        soup.merge(cube_at(DVec3::new(10.0, 0.0, 0.0), 1.0));

        let islands = dispatcher.dispatch_segment(soup).unwrap().wait().unwrap();
        assert_eq!(islands.len(), 2);
    }

    #[test]
    fn test_dispatch_full_cut_cycle() {
        let dispatcher = TaskDispatcher::new().unwrap();
        // A slab through the middle splits the cube into two islands.
        let target = cube_at(DVec3::ZERO, 2.0);
        let cutter = cuboid(DVec3::new(0.5, 4.0, 4.0), true).unwrap();

        let carved = dispatcher
            .dispatch_csg(target, cutter, BooleanOp::Subtract)
            .unwrap()
            .wait()
            .unwrap();
        assert!(!carved.is_empty());

        let islands = dispatcher.dispatch_segment(carved).unwrap().wait().unwrap();
        assert_eq!(islands.len(), 2);
    }

    #[test]
    fn test_dispatch_rejects_invalid_buffer_eagerly() {
        let dispatcher = TaskDispatcher::new().unwrap();
        let mut bad = cube_at(DVec3::ZERO, 1.0);
        bad.indices = Some(vec![0, 1, 9999]);

        let err = dispatcher
            .dispatch_csg(bad, MeshBuffer::new(), BooleanOp::Union)
            .unwrap_err();
        assert!(matches!(err, GeometryError::InvalidInput { .. }));

        // The rejection did not occupy the lane.
        let ok = dispatcher
            .dispatch_csg(
                cube_at(DVec3::ZERO, 1.0),
                MeshBuffer::new(),
                BooleanOp::Union,
            )
            .unwrap();
        assert!(ok.wait().is_ok());
    }

    #[test]
    fn test_respawn_lanes() {
        let mut dispatcher = TaskDispatcher::new().unwrap();
        dispatcher.respawn_csg_lane().unwrap();
        dispatcher.respawn_segment_lane().unwrap();

        let result = dispatcher
            .dispatch_csg(
                cube_at(DVec3::ZERO, 1.0),
                cube_at(DVec3::new(5.0, 0.0, 0.0), 1.0),
                BooleanOp::Union,
            )
            .unwrap()
            .wait()
            .unwrap();
        assert_eq!(result.triangle_count(), 24);
    }

    #[test]
    fn test_handle_outlives_dispatcher() {
        let dispatcher = TaskDispatcher::new().unwrap();
        let task = dispatcher
            .dispatch_csg(
                cube_at(DVec3::ZERO, 1.0),
                MeshBuffer::new(),
                BooleanOp::Union,
            )
            .unwrap();
        drop(dispatcher);

        // Teardown drains the queued request before joining, so the
        // handle settles with its result instead of hanging.
        assert!(task.wait().is_ok());
    }
}

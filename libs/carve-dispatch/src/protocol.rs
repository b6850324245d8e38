//! # Wire Protocol
//!
//! Request/response payloads for the worker lanes. These are the only
//! types that cross the thread boundary; they are serde-derived so the
//! payload shape is pinned down even though the in-process transport
//! moves them without encoding.
//!
//! Buffers inside a request are owned by the request: once a payload is
//! handed to a lane the sender has nothing left to read, which is the
//! transfer discipline the pipeline relies on.

use carve_csg::BooleanOp;
use carve_mesh::MeshBuffer;
use serde::{Deserialize, Serialize};

/// A boolean evaluation request.
#[derive(Debug, Serialize, Deserialize)]
pub struct CsgRequest {
    /// Which boolean operator to apply.
    pub op: BooleanOp,
    /// First operand, world-space and welded.
    pub a: MeshBuffer,
    /// Second operand, world-space and welded.
    pub b: MeshBuffer,
}

/// Response for a boolean evaluation request.
#[derive(Debug, Serialize, Deserialize)]
pub enum CsgResponse {
    /// The boolean succeeded; an empty buffer is a valid success.
    Success(MeshBuffer),
    /// The boolean kernel could not produce a result.
    Failure(String),
}

/// A segmentation request. Always non-indexed on entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct SegmentRequest {
    /// Vertex positions as [x, y, z, ...]
    pub positions: Vec<f32>,
    /// Vertex normals, same length as positions
    pub normals: Vec<f32>,
}

/// Response for a segmentation request.
#[derive(Debug, Serialize, Deserialize)]
pub enum SegmentResponse {
    /// One buffer per connected component, in seed-face order.
    Success(Vec<MeshBuffer>),
    /// The segmenter could not process the input.
    Failure(String),
}

//! # Brush
//!
//! A mesh buffer paired with a world pose. Brushes are baked (pose
//! pre-multiplied into the vertex data) before they reach the boolean
//! evaluator, which is transform-agnostic and only sees world-space
//! geometry.

use glam::DMat4;

use crate::buffer::MeshBuffer;

/// A boolean operand: geometry plus its world transform.
#[derive(Debug, Clone)]
pub struct Brush {
    /// The brush geometry in local space.
    pub mesh: MeshBuffer,
    /// Local-to-world transform.
    pub pose: DMat4,
}

impl Brush {
    /// Creates a brush with an identity pose.
    pub fn new(mesh: MeshBuffer) -> Self {
        Self {
            mesh,
            pose: DMat4::IDENTITY,
        }
    }

    /// Creates a brush with the given pose.
    pub fn with_pose(mesh: MeshBuffer, pose: DMat4) -> Self {
        Self { mesh, pose }
    }

    /// Consumes the brush, returning its geometry in world space.
    pub fn bake(self) -> MeshBuffer {
        let mut mesh = self.mesh;
        if self.pose != DMat4::IDENTITY {
            mesh.transform(&self.pose);
        }
        mesh
    }
}

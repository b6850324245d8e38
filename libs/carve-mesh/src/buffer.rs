//! # Mesh Buffer
//!
//! Plain data model for a triangulated surface: flat position and normal
//! arrays plus optional triangle indices.

use config::constants::{MAX_TRIANGLES, MAX_VERTICES};
use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// A triangle mesh as flat GPU-style buffers.
///
/// Positions and normals are `[x, y, z, x, y, z, ...]` with one normal per
/// position. When `indices` is absent the buffer is a non-indexed triangle
/// soup: every 3 consecutive vertices form one face.
///
/// Geometry calculations upcast to f64; f32 is the storage and transfer
/// format.
///
/// Buffers are exclusively owned by whichever stage currently holds them
/// and are moved, never shared, across stage boundaries.
///
/// # Example
///
/// ```rust
/// use carve_mesh::MeshBuffer;
/// use glam::DVec3;
///
/// let mut mesh = MeshBuffer::new();
/// mesh.push_vertex(DVec3::new(0.0, 0.0, 0.0), DVec3::Z);
/// mesh.push_vertex(DVec3::new(1.0, 0.0, 0.0), DVec3::Z);
/// mesh.push_vertex(DVec3::new(0.0, 1.0, 0.0), DVec3::Z);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshBuffer {
    /// Vertex positions as [x, y, z, x, y, z, ...]
    pub positions: Vec<f32>,
    /// Vertex normals, same length as positions
    pub normals: Vec<f32>,
    /// Triangle indices; absent means non-indexed soup
    pub indices: Option<Vec<u32>>,
}

impl MeshBuffer {
    /// Creates an empty, non-indexed buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: None,
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.vertex_count() / 3,
        }
    }

    /// Returns true if the buffer has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// Returns the position of vertex `i`.
    #[inline]
    pub fn position(&self, i: usize) -> DVec3 {
        DVec3::new(
            self.positions[i * 3] as f64,
            self.positions[i * 3 + 1] as f64,
            self.positions[i * 3 + 2] as f64,
        )
    }

    /// Returns the normal of vertex `i`.
    #[inline]
    pub fn normal(&self, i: usize) -> DVec3 {
        DVec3::new(
            self.normals[i * 3] as f64,
            self.normals[i * 3 + 1] as f64,
            self.normals[i * 3 + 2] as f64,
        )
    }

    /// Appends a vertex with its normal.
    pub fn push_vertex(&mut self, position: DVec3, normal: DVec3) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);
        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);
    }

    /// Returns the three vertex ids of face `face`, resolving indices.
    #[inline]
    pub fn face_vertices(&self, face: usize) -> [usize; 3] {
        match &self.indices {
            Some(indices) => [
                indices[face * 3] as usize,
                indices[face * 3 + 1] as usize,
                indices[face * 3 + 2] as usize,
            ],
            None => [face * 3, face * 3 + 1, face * 3 + 2],
        }
    }

    /// Validates the buffer against the data-model invariants.
    ///
    /// Checks:
    /// - position array is vertex-aligned and matches the normal array
    /// - indices (if present) are triangle-aligned and in range
    /// - non-indexed buffers contain whole triangles
    /// - safety limits on vertex/triangle counts
    ///
    /// A violation is a programming error in the caller and is returned as
    /// [`GeometryError::InvalidInput`].
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.positions.len() % 3 != 0 {
            return Err(GeometryError::invalid_input(format!(
                "position array length {} is not a multiple of 3",
                self.positions.len()
            )));
        }
        if self.normals.len() != self.positions.len() {
            return Err(GeometryError::invalid_input(format!(
                "normal array length {} does not match position array length {}",
                self.normals.len(),
                self.positions.len()
            )));
        }

        let vertex_count = self.vertex_count();
        if vertex_count > MAX_VERTICES {
            return Err(GeometryError::invalid_input(format!(
                "vertex count {} exceeds limit {}",
                vertex_count, MAX_VERTICES
            )));
        }

        match &self.indices {
            Some(indices) => {
                if indices.len() % 3 != 0 {
                    return Err(GeometryError::invalid_input(format!(
                        "index array length {} is not a multiple of 3",
                        indices.len()
                    )));
                }
                if indices.len() / 3 > MAX_TRIANGLES {
                    return Err(GeometryError::invalid_input(format!(
                        "triangle count {} exceeds limit {}",
                        indices.len() / 3,
                        MAX_TRIANGLES
                    )));
                }
                if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                    return Err(GeometryError::invalid_input(format!(
                        "index {} out of range for {} vertices",
                        bad, vertex_count
                    )));
                }
            }
            None => {
                if vertex_count % 3 != 0 {
                    return Err(GeometryError::invalid_input(format!(
                        "non-indexed buffer with {} vertices is not whole triangles",
                        vertex_count
                    )));
                }
                if vertex_count / 3 > MAX_TRIANGLES {
                    return Err(GeometryError::invalid_input(format!(
                        "triangle count {} exceeds limit {}",
                        vertex_count / 3,
                        MAX_TRIANGLES
                    )));
                }
            }
        }

        Ok(())
    }

    /// Expands the buffer into non-indexed triangle soup.
    ///
    /// Per-face attribute values are preserved; a non-indexed buffer is
    /// returned unchanged.
    pub fn deindexed(self) -> MeshBuffer {
        let indices = match self.indices {
            Some(ref indices) => indices,
            None => return self,
        };

        let mut out = MeshBuffer::with_capacity(indices.len());
        for &i in indices {
            out.push_vertex(self.position(i as usize), self.normal(i as usize));
        }
        out
    }

    /// Merges another buffer into this one.
    ///
    /// If the indexing modes differ, both are expanded to soup first.
    pub fn merge(&mut self, other: MeshBuffer) {
        match (&mut self.indices, &other.indices) {
            (None, None) => {
                self.positions.extend_from_slice(&other.positions);
                self.normals.extend_from_slice(&other.normals);
            }
            (Some(indices), Some(other_indices)) => {
                let offset = (self.positions.len() / 3) as u32;
                indices.extend(other_indices.iter().map(|&i| i + offset));
                self.positions.extend_from_slice(&other.positions);
                self.normals.extend_from_slice(&other.normals);
            }
            _ => {
                let mut soup = std::mem::take(self).deindexed();
                soup.merge(other.deindexed());
                *self = soup;
            }
        }
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners; zero for an empty buffer.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        if self.positions.is_empty() {
            return (DVec3::ZERO, DVec3::ZERO);
        }

        let mut min = self.position(0);
        let mut max = min;
        for i in 1..self.vertex_count() {
            let p = self.position(i);
            min = min.min(p);
            max = max.max(p);
        }
        (min, max)
    }

    /// Recomputes normals from the current topology.
    ///
    /// Non-indexed buffers get flat per-face normals; indexed buffers get
    /// area-weighted per-vertex normals accumulated across incident faces.
    pub fn compute_normals(&mut self) {
        match &self.indices {
            None => {
                for face in 0..self.triangle_count() {
                    let v0 = self.position(face * 3);
                    let v1 = self.position(face * 3 + 1);
                    let v2 = self.position(face * 3 + 2);
                    let n = (v1 - v0).cross(v2 - v0).normalize_or_zero();
                    for corner in 0..3 {
                        let base = (face * 3 + corner) * 3;
                        self.normals[base] = n.x as f32;
                        self.normals[base + 1] = n.y as f32;
                        self.normals[base + 2] = n.z as f32;
                    }
                }
            }
            Some(_) => {
                let mut accum = vec![DVec3::ZERO; self.vertex_count()];
                for face in 0..self.triangle_count() {
                    let [i0, i1, i2] = self.face_vertices(face);
                    let v0 = self.position(i0);
                    let v1 = self.position(i1);
                    let v2 = self.position(i2);
                    let n = (v1 - v0).cross(v2 - v0);
                    accum[i0] += n;
                    accum[i1] += n;
                    accum[i2] += n;
                }
                for (i, n) in accum.iter().enumerate() {
                    let n = n.normalize_or_zero();
                    self.normals[i * 3] = n.x as f32;
                    self.normals[i * 3 + 1] = n.y as f32;
                    self.normals[i * 3 + 2] = n.z as f32;
                }
            }
        }
    }

    /// Transforms all vertices by a 4x4 matrix.
    ///
    /// Normals use the inverse transpose so non-uniform scale keeps them
    /// perpendicular.
    pub fn transform(&mut self, matrix: &DMat4) {
        let normal_matrix = matrix.inverse().transpose();
        for i in 0..self.vertex_count() {
            let p = matrix.transform_point3(self.position(i));
            self.positions[i * 3] = p.x as f32;
            self.positions[i * 3 + 1] = p.y as f32;
            self.positions[i * 3 + 2] = p.z as f32;

            let n = normal_matrix
                .transform_vector3(self.normal(i))
                .normalize_or_zero();
            self.normals[i * 3] = n.x as f32;
            self.normals[i * 3 + 1] = n.y as f32;
            self.normals[i * 3 + 2] = n.z as f32;
        }
    }

    /// Signed volume of the enclosed solid via the divergence theorem.
    ///
    /// Positive for outward-wound closed surfaces. Meaningful only for
    /// closed meshes; used by the boolean sanity tests.
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0;
        for face in 0..self.triangle_count() {
            let [i0, i1, i2] = self.face_vertices(face);
            let v0 = self.position(i0);
            let v1 = self.position(i1);
            let v2 = self.position(i2);
            volume += v0.dot(v1.cross(v2)) / 6.0;
        }
        volume
    }
}

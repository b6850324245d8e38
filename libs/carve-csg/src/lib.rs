//! # Carve CSG
//!
//! Boolean operations (CSG) between two triangulated solids using BSP
//! trees, based on the csg.js algorithm by Evan Wallace:
//! - Union: A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A); B.invert(); merge
//! - Subtract: A.invert(); A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A); B.invert(); merge; invert
//! - Intersect: A.invert(); B.clipTo(A); B.invert(); A.clipTo(B); B.clipTo(A); merge; invert
//!
//! The evaluator is a pure function over its inputs. It assumes welded,
//! world-space geometry (welding is the caller's responsibility) and
//! recomputes output normals from the final polygon set — topology changes
//! invalidate whatever normals the inputs carried.
//!
//! An empty result is a valid success: it means "no overlap" or "fully
//! consumed", never an error.

mod bsp;
mod plane;
mod polygon;

use carve_mesh::{GeometryError, MeshBuffer};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use bsp::BspNode;
use polygon::Polygon;

// =============================================================================
// PUBLIC API
// =============================================================================

/// The three boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanOp {
    /// Everything in A or B.
    Union,
    /// Everything in A that is not in B.
    Subtract,
    /// Everything in both A and B.
    Intersect,
}

/// Evaluates a boolean operation between two solids.
///
/// Inputs must be closed (or close-enough) 2-manifold triangle meshes in
/// world space, welded beforehand. Indexed and non-indexed buffers are both
/// accepted; the result is always a non-indexed soup with flat normals.
///
/// # Errors
///
/// - [`GeometryError::InvalidInput`] if either buffer violates the data
///   model invariants (caller bug).
/// - [`GeometryError::EvaluationFailed`] if a non-empty operand yields no
///   usable geometry (all triangles degenerate).
pub fn evaluate(
    a: &MeshBuffer,
    b: &MeshBuffer,
    op: BooleanOp,
) -> Result<MeshBuffer, GeometryError> {
    a.validate()?;
    b.validate()?;

    let polys_a = mesh_to_polygons(a);
    if polys_a.is_empty() && !a.is_empty() {
        return Err(GeometryError::evaluation_failed(
            "operand A has no non-degenerate triangles",
        ));
    }
    let polys_b = mesh_to_polygons(b);
    if polys_b.is_empty() && !b.is_empty() {
        return Err(GeometryError::evaluation_failed(
            "operand B has no non-degenerate triangles",
        ));
    }

    // Empty operands short-circuit without building trees.
    if polys_a.is_empty() || polys_b.is_empty() {
        return Ok(match op {
            BooleanOp::Union => {
                let mut all = polys_a;
                all.extend(polys_b);
                polygons_to_mesh(&all)
            }
            BooleanOp::Subtract => polygons_to_mesh(&polys_a),
            BooleanOp::Intersect => MeshBuffer::new(),
        });
    }

    // Disjoint bounding boxes settle two of the three operators outright.
    if !bounding_boxes_overlap(a, b) {
        match op {
            BooleanOp::Union => {
                let mut all = polys_a;
                all.extend(polys_b);
                return Ok(polygons_to_mesh(&all));
            }
            BooleanOp::Subtract => return Ok(polygons_to_mesh(&polys_a)),
            BooleanOp::Intersect => return Ok(MeshBuffer::new()),
        }
    }

    let mut tree_a = BspNode::new(polys_a);
    let mut tree_b = BspNode::new(polys_b);

    match op {
        BooleanOp::Union => {
            tree_a.clip_to(&tree_b);
            tree_b.clip_to(&tree_a);
            tree_b.invert();
            tree_b.clip_to(&tree_a);
            tree_b.invert();
            tree_a.build(tree_b.all_polygons());
        }
        BooleanOp::Subtract => {
            tree_a.invert();
            tree_a.clip_to(&tree_b);
            tree_b.clip_to(&tree_a);
            tree_b.invert();
            tree_b.clip_to(&tree_a);
            tree_b.invert();
            tree_a.build(tree_b.all_polygons());
            tree_a.invert();
        }
        BooleanOp::Intersect => {
            tree_a.invert();
            tree_b.clip_to(&tree_a);
            tree_b.invert();
            tree_a.clip_to(&tree_b);
            tree_b.clip_to(&tree_a);
            tree_a.build(tree_b.all_polygons());
            tree_a.invert();
        }
    }

    Ok(polygons_to_mesh(&tree_a.all_polygons()))
}

/// Returns true if the axis-aligned bounding boxes of two buffers overlap
/// (touching counts as overlapping).
pub fn bounding_boxes_overlap(a: &MeshBuffer, b: &MeshBuffer) -> bool {
    let (a_min, a_max) = a.bounding_box();
    let (b_min, b_max) = b.bounding_box();
    a_min.x <= b_max.x
        && b_min.x <= a_max.x
        && a_min.y <= b_max.y
        && b_min.y <= a_max.y
        && a_min.z <= b_max.z
        && b_min.z <= a_max.z
}

// =============================================================================
// CONVERSION
// =============================================================================

/// Converts a buffer into kernel polygons, dropping degenerate triangles.
fn mesh_to_polygons(mesh: &MeshBuffer) -> Vec<Polygon> {
    (0..mesh.triangle_count())
        .into_par_iter()
        .filter_map(|face| {
            let [i0, i1, i2] = mesh.face_vertices(face);
            Polygon::from_vertices(vec![
                mesh.position(i0),
                mesh.position(i1),
                mesh.position(i2),
            ])
        })
        .collect()
}

/// Converts polygons back to a non-indexed buffer.
///
/// Each polygon is fan-triangulated; normals come from the polygon
/// planes, never from the input buffers.
fn polygons_to_mesh(polygons: &[Polygon]) -> MeshBuffer {
    let mut mesh = MeshBuffer::new();

    for poly in polygons {
        let vertices = &poly.vertices;
        if vertices.len() < 3 {
            continue;
        }
        let normal = poly.plane.normal;
        for i in 1..vertices.len() - 1 {
            mesh.push_vertex(vertices[0], normal);
            mesh.push_vertex(vertices[i], normal);
            mesh.push_vertex(vertices[i + 1], normal);
        }
    }

    mesh
}

// =============================================================================
// TESTS
// =============================================================================

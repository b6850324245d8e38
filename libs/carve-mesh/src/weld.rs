//! # Vertex Welding
//!
//! Merges vertex positions closer than a tolerance into a single shared
//! vertex. Welding runs on baked brush geometry before it enters the
//! boolean evaluator; the evaluator assumes welded input and never
//! deduplicates on its own.

use std::collections::HashMap;

use glam::DVec3;

use crate::buffer::MeshBuffer;

/// Maps a position to its quantized spatial-hash cell.
#[inline]
fn pos_to_cell(p: DVec3, cell_size: f64) -> (i64, i64, i64) {
    (
        (p.x / cell_size).floor() as i64,
        (p.y / cell_size).floor() as i64,
        (p.z / cell_size).floor() as i64,
    )
}

/// Welds coincident vertices within `epsilon` of each other.
///
/// Returns an indexed buffer in which every cluster of positions closer
/// than `epsilon` shares one canonical vertex (the first occurrence wins,
/// keeping its position and normal). Faces are preserved in order.
///
/// Uses a spatial hash with cells of `2 * epsilon` and a 3x3x3
/// neighborhood scan, so candidates are found regardless of which side of
/// a cell boundary they fall on.
pub fn weld_vertices(mesh: MeshBuffer, epsilon: f64) -> MeshBuffer {
    if mesh.positions.is_empty() {
        return mesh;
    }

    let cell_size = epsilon * 2.0;
    let mut cells: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();

    let mut out = MeshBuffer::with_capacity(mesh.vertex_count());
    let mut indices: Vec<u32> = Vec::with_capacity(mesh.triangle_count() * 3);

    for face in 0..mesh.triangle_count() {
        for &vi in &mesh.face_vertices(face) {
            let p = mesh.position(vi);
            let cell = pos_to_cell(p, cell_size);

            let mut found = None;
            'scan: for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let neighbor = (cell.0 + dx, cell.1 + dy, cell.2 + dz);
                        if let Some(candidates) = cells.get(&neighbor) {
                            for &candidate in candidates {
                                if (out.position(candidate as usize) - p).length() < epsilon {
                                    found = Some(candidate);
                                    break 'scan;
                                }
                            }
                        }
                    }
                }
            }

            let index = match found {
                Some(index) => index,
                None => {
                    let index = out.vertex_count() as u32;
                    out.push_vertex(p, mesh.normal(vi));
                    cells.entry(cell).or_default().push(index);
                    index
                }
            };
            indices.push(index);
        }
    }

    out.indices = Some(indices);
    out
}

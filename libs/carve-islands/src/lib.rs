//! # Carve Islands
//!
//! Splits a triangle soup into maximal connected components ("islands")
//! by shared-vertex adjacency.
//!
//! Two vertices count as shared when they quantize to the same integer
//! cell of size [`ISLAND_QUANT_CELL`], so positions equal up to
//! floating-point noise bridge a connection. The cell size must stay at or
//! above the upstream weld tolerance; a finer cell can split a welded seam
//! into spurious islands (see the constant's documentation).

use std::collections::{HashMap, VecDeque};

use carve_mesh::MeshBuffer;
use config::constants::ISLAND_QUANT_CELL;
use rayon::prelude::*;

/// Quantizes a vertex position into its integer adjacency key.
#[inline]
fn quantize(mesh: &MeshBuffer, vertex: usize) -> (i64, i64, i64) {
    let p = mesh.position(vertex);
    (
        (p.x / ISLAND_QUANT_CELL).round() as i64,
        (p.y / ISLAND_QUANT_CELL).round() as i64,
        (p.z / ISLAND_QUANT_CELL).round() as i64,
    )
}

/// Partitions a mesh into connected components.
///
/// The input is treated as a non-indexed triangle soup (indexed buffers
/// are expanded first). Each returned buffer is one island: a non-indexed
/// soup containing that component's faces with their original positions
/// and normals, faces in ascending original order.
///
/// Islands are ordered by their seed face: the first unvisited face
/// scanning 0..N starts each traversal, which makes the result
/// deterministic for a given buffer layout.
///
/// A mesh with zero faces yields zero islands, not an error; a connected
/// mesh yields a single island equal to the input soup.
pub fn segment(mesh: MeshBuffer) -> Vec<MeshBuffer> {
    let soup = mesh.deindexed();
    let face_count = soup.triangle_count();
    if face_count == 0 {
        return Vec::new();
    }

    // Quantized vertex key -> faces touching that key.
    let mut adjacency: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    for face in 0..face_count {
        for corner in 0..3 {
            let key = quantize(&soup, face * 3 + corner);
            adjacency.entry(key).or_default().push(face as u32);
        }
    }

    let mut visited = vec![false; face_count];
    let mut islands: Vec<Vec<u32>> = Vec::new();

    for seed in 0..face_count {
        if visited[seed] {
            continue;
        }

        let mut faces = Vec::new();
        let mut queue = VecDeque::new();
        visited[seed] = true;
        queue.push_back(seed as u32);

        while let Some(face) = queue.pop_front() {
            faces.push(face);
            for corner in 0..3 {
                let key = quantize(&soup, face as usize * 3 + corner);
                if let Some(neighbors) = adjacency.get(&key) {
                    for &neighbor in neighbors {
                        if !visited[neighbor as usize] {
                            visited[neighbor as usize] = true;
                            queue.push_back(neighbor);
                        }
                    }
                }
            }
        }

        // Ascending face order keeps a single-island mesh byte-identical
        // through segmentation.
        faces.sort_unstable();
        islands.push(faces);
    }

    islands
        .par_iter()
        .map(|faces| {
            let mut island = MeshBuffer::with_capacity(faces.len() * 3);
            for &face in faces {
                for corner in 0..3 {
                    let v = face as usize * 3 + corner;
                    island.push_vertex(soup.position(v), soup.normal(v));
                }
            }
            island
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

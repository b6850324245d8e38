//! # Primitives
//!
//! Mesh generation for the base shapes a cut targets and the prism a
//! sketched outline becomes before it is posed as a cutter brush.

use glam::{DVec2, DVec3};

use crate::buffer::MeshBuffer;
use crate::error::GeometryError;

/// Creates a cuboid as a non-indexed triangle soup with flat normals.
///
/// # Arguments
///
/// * `size` - Dimensions [x, y, z]
/// * `center` - If true, center at origin; if false, corner at origin
///
/// # Returns
///
/// A buffer with 36 vertices (6 faces, 2 triangles each), CCW winding for
/// outward normals.
///
/// # Example
///
/// ```rust
/// use carve_mesh::primitives::cuboid;
/// use glam::DVec3;
///
/// let mesh = cuboid(DVec3::splat(10.0), false).unwrap();
/// assert_eq!(mesh.triangle_count(), 12);
/// ```
pub fn cuboid(size: DVec3, center: bool) -> Result<MeshBuffer, GeometryError> {
    if size.x <= 0.0 || size.y <= 0.0 || size.z <= 0.0 {
        return Err(GeometryError::invalid_input(format!(
            "cuboid size must be positive: {:?}",
            size
        )));
    }

    let (min, max) = if center {
        let half = size / 2.0;
        (-half, half)
    } else {
        (DVec3::ZERO, size)
    };

    let corners = [
        DVec3::new(min.x, min.y, min.z), // 0: left-front-bottom
        DVec3::new(max.x, min.y, min.z), // 1: right-front-bottom
        DVec3::new(max.x, max.y, min.z), // 2: right-back-bottom
        DVec3::new(min.x, max.y, min.z), // 3: left-back-bottom
        DVec3::new(min.x, min.y, max.z), // 4: left-front-top
        DVec3::new(max.x, min.y, max.z), // 5: right-front-top
        DVec3::new(max.x, max.y, max.z), // 6: right-back-top
        DVec3::new(min.x, max.y, max.z), // 7: left-back-top
    ];

    // 6 faces, 2 triangles each, CCW winding when viewed from outside.
    let faces: [([usize; 3], [usize; 3], DVec3); 6] = [
        ([0, 2, 1], [0, 3, 2], DVec3::NEG_Z), // bottom
        ([4, 5, 6], [4, 6, 7], DVec3::Z),     // top
        ([0, 1, 5], [0, 5, 4], DVec3::NEG_Y), // front
        ([2, 3, 7], [2, 7, 6], DVec3::Y),     // back
        ([3, 0, 4], [3, 4, 7], DVec3::NEG_X), // left
        ([1, 2, 6], [1, 6, 5], DVec3::X),     // right
    ];

    let mut mesh = MeshBuffer::with_capacity(36);
    for (tri1, tri2, normal) in &faces {
        for &i in tri1 {
            mesh.push_vertex(corners[i], *normal);
        }
        for &i in tri2 {
            mesh.push_vertex(corners[i], *normal);
        }
    }

    Ok(mesh)
}

/// Extrudes a closed 2D outline along +Z into a prism.
///
/// The outline is normalized to counter-clockwise order; caps use fan
/// triangulation from the first vertex, so the outline should be simple
/// and convex (the cutter outlines this system produces are).
///
/// # Arguments
///
/// * `outline` - Closed outline in the XY plane (last point connects to
///   the first; do not repeat it)
/// * `depth` - Extrusion distance along Z
///
/// # Returns
///
/// A non-indexed soup with flat normals: bottom cap at z=0, top cap at
/// z=depth, outward-facing sides.
pub fn extrude_polyline(outline: &[DVec2], depth: f64) -> Result<MeshBuffer, GeometryError> {
    if outline.len() < 3 {
        return Err(GeometryError::invalid_input(format!(
            "extrusion outline needs at least 3 points, got {}",
            outline.len()
        )));
    }
    if depth <= 0.0 {
        return Err(GeometryError::invalid_input(format!(
            "extrusion depth must be positive: {}",
            depth
        )));
    }

    // Shoelace area; negative means clockwise input.
    let mut area = 0.0;
    for i in 0..outline.len() {
        let a = outline[i];
        let b = outline[(i + 1) % outline.len()];
        area += a.x * b.y - b.x * a.y;
    }
    let ccw: Vec<DVec2> = if area < 0.0 {
        outline.iter().rev().copied().collect()
    } else {
        outline.to_vec()
    };

    let n = ccw.len();
    let bottom = |p: DVec2| DVec3::new(p.x, p.y, 0.0);
    let top = |p: DVec2| DVec3::new(p.x, p.y, depth);

    let mut mesh = MeshBuffer::with_capacity((n - 2) * 6 + n * 6);

    // Caps: fan from the first vertex.
    for i in 1..n - 1 {
        mesh.push_vertex(bottom(ccw[0]), DVec3::NEG_Z);
        mesh.push_vertex(bottom(ccw[i + 1]), DVec3::NEG_Z);
        mesh.push_vertex(bottom(ccw[i]), DVec3::NEG_Z);
    }
    for i in 1..n - 1 {
        mesh.push_vertex(top(ccw[0]), DVec3::Z);
        mesh.push_vertex(top(ccw[i]), DVec3::Z);
        mesh.push_vertex(top(ccw[i + 1]), DVec3::Z);
    }

    // Sides: one outward-facing quad per edge.
    for i in 0..n {
        let a = ccw[i];
        let b = ccw[(i + 1) % n];
        let d = b - a;
        let normal = DVec3::new(d.y, -d.x, 0.0).normalize_or_zero();
        if normal == DVec3::ZERO {
            continue; // zero-length edge
        }

        mesh.push_vertex(bottom(a), normal);
        mesh.push_vertex(bottom(b), normal);
        mesh.push_vertex(top(b), normal);

        mesh.push_vertex(bottom(a), normal);
        mesh.push_vertex(top(b), normal);
        mesh.push_vertex(top(a), normal);
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_triangle_count() {
        let mesh = cuboid(DVec3::splat(10.0), false).unwrap();
        assert_eq!(mesh.vertex_count(), 36);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_cuboid_centered_bounds() {
        let mesh = cuboid(DVec3::new(2.0, 4.0, 6.0), true).unwrap();
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, DVec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_cuboid_winding_is_outward() {
        let mesh = cuboid(DVec3::splat(2.0), true).unwrap();
        assert!((mesh.signed_volume() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_cuboid_rejects_zero_size() {
        let err = cuboid(DVec3::new(1.0, 0.0, 1.0), false).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidInput { .. }));
    }

    #[test]
    fn test_extrude_square_volume() {
        let square = [
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 2.0),
        ];
        let prism = extrude_polyline(&square, 3.0).unwrap();
        assert!(prism.validate().is_ok());
        assert!((prism.signed_volume() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_extrude_clockwise_outline_is_normalized() {
        let square_cw = [
            DVec2::new(0.0, 2.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(0.0, 0.0),
        ];
        let prism = extrude_polyline(&square_cw, 1.0).unwrap();
        assert!(prism.signed_volume() > 0.0);
    }

    #[test]
    fn test_extrude_rejects_degenerate_outline() {
        let err = extrude_polyline(&[DVec2::ZERO, DVec2::X], 1.0).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidInput { .. }));
    }

    #[test]
    fn test_extrude_rejects_zero_depth() {
        let tri = [DVec2::ZERO, DVec2::X, DVec2::Y];
        assert!(extrude_polyline(&tri, 0.0).is_err());
    }
}

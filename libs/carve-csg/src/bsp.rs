//! # BSP Tree
//!
//! Binary Space Partitioning tree for CSG boolean operations, following
//! the csg.js algorithm by Evan Wallace.
//!
//! Each node holds a dividing plane, the polygons coplanar with it, and
//! front/back subtrees. The plane is kept on the node itself so clipping
//! still partitions space correctly after a node's own polygons have been
//! clipped away.
//!
//! ## Operations
//!
//! - `build`: insert polygons incrementally
//! - `invert`: flip solid/empty (flip polygons and planes, swap subtrees)
//! - `clip_to`: remove this tree's polygons that are inside another tree
//! - `all_polygons`: collect every polygon in the tree

use crate::plane::Plane;
use crate::polygon::Polygon;

/// A node in the BSP tree.
#[derive(Debug, Clone, Default)]
pub struct BspNode {
    /// Dividing plane; None until the first polygon is inserted.
    plane: Option<Plane>,
    /// Polygons coplanar with this node's plane.
    polygons: Vec<Polygon>,
    /// Subtree in front of the plane.
    front: Option<Box<BspNode>>,
    /// Subtree behind the plane.
    back: Option<Box<BspNode>>,
}

impl BspNode {
    /// Creates a BSP tree from a polygon set.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let mut node = Self::default();
        node.build(polygons);
        node
    }

    /// Inserts polygons into the tree.
    ///
    /// The first polygon of the first insertion donates the node's
    /// dividing plane.
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        if polygons.is_empty() {
            return;
        }

        let plane = *self.plane.get_or_insert(polygons[0].plane);

        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front_polys = Vec::new();
        let mut back_polys = Vec::new();
        for poly in &polygons {
            poly.split(
                &plane,
                &mut coplanar_front,
                &mut coplanar_back,
                &mut front_polys,
                &mut back_polys,
            );
        }

        // Coplanar polygons stay on this node regardless of facing.
        self.polygons.append(&mut coplanar_front);
        self.polygons.append(&mut coplanar_back);

        if !front_polys.is_empty() {
            self.front
                .get_or_insert_with(Default::default)
                .build(front_polys);
        }
        if !back_polys.is_empty() {
            self.back
                .get_or_insert_with(Default::default)
                .build(back_polys);
        }
    }

    /// Inverts the tree: solid becomes empty and vice versa.
    pub fn invert(&mut self) {
        for poly in &mut self.polygons {
            poly.flip();
        }
        if let Some(plane) = &mut self.plane {
            plane.flip();
        }
        if let Some(front) = &mut self.front {
            front.invert();
        }
        if let Some(back) = &mut self.back {
            back.invert();
        }
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Removes from `polygons` everything inside the solid this tree
    /// represents.
    ///
    /// Coplanar polygons follow the side their facing selects: same-facing
    /// survive with the front set, opposite-facing sink with the back set.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let plane = match &self.plane {
            Some(plane) => *plane,
            None => return polygons,
        };

        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front_polys = Vec::new();
        let mut back_polys = Vec::new();
        for poly in &polygons {
            poly.split(
                &plane,
                &mut coplanar_front,
                &mut coplanar_back,
                &mut front_polys,
                &mut back_polys,
            );
        }

        // Coplanar polygons follow the side their facing selects.
        front_polys.append(&mut coplanar_front);
        back_polys.append(&mut coplanar_back);

        let mut result = match &self.front {
            Some(front) => front.clip_polygons(front_polys),
            None => front_polys,
        };
        if let Some(back) = &self.back {
            result.extend(back.clip_polygons(back_polys));
        }
        // No back subtree: back polygons are inside the solid, discarded.

        result
    }

    /// Clips this tree's polygons to another tree.
    pub fn clip_to(&mut self, other: &BspNode) {
        self.polygons = other.clip_polygons(std::mem::take(&mut self.polygons));
        if let Some(front) = &mut self.front {
            front.clip_to(other);
        }
        if let Some(back) = &mut self.back {
            back.clip_to(other);
        }
    }

    /// Collects all polygons from the tree.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = self.polygons.clone();
        if let Some(front) = &self.front {
            result.extend(front.all_polygons());
        }
        if let Some(back) = &self.back {
            result.extend(back.all_polygons());
        }
        result
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn triangle_at(z: f64) -> Polygon {
        Polygon::from_vertices(vec![
            DVec3::new(0.0, 0.0, z),
            DVec3::new(1.0, 0.0, z),
            DVec3::new(0.0, 1.0, z),
        ])
        .unwrap()
    }

    #[test]
    fn test_bsp_new_empty() {
        let tree = BspNode::new(vec![]);
        assert!(tree.all_polygons().is_empty());
    }

    #[test]
    fn test_bsp_collects_all_polygons() {
        let tree = BspNode::new(vec![
            triangle_at(0.0),
            triangle_at(1.0),
            triangle_at(-1.0),
        ]);
        assert_eq!(tree.all_polygons().len(), 3);
    }

    #[test]
    fn test_bsp_invert_flips_normals() {
        let poly = triangle_at(0.0);
        let original = poly.plane.normal;

        let mut tree = BspNode::new(vec![poly]);
        tree.invert();

        let inverted = tree.all_polygons()[0].plane.normal;
        assert!((original + inverted).length() < 1e-12);
    }

    #[test]
    fn test_bsp_clip_keeps_front() {
        let tree = BspNode::new(vec![triangle_at(0.0)]);
        let result = tree.clip_polygons(vec![triangle_at(1.0)]);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_bsp_clip_discards_back() {
        let tree = BspNode::new(vec![triangle_at(0.0)]);
        let result = tree.clip_polygons(vec![triangle_at(-1.0)]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_bsp_clip_splits_spanning() {
        let tree = BspNode::new(vec![triangle_at(0.0)]);
        let spanning = Polygon::from_vertices(vec![
            DVec3::new(0.0, 0.0, -1.0),
            DVec3::new(1.0, 0.0, -1.0),
            DVec3::new(0.5, 0.0, 1.0),
        ])
        .unwrap();
        let result = tree.clip_polygons(vec![spanning]);
        // Only the fragment above the plane survives.
        assert_eq!(result.len(), 1);
        for v in &result[0].vertices {
            assert!(v.z >= -1e-9);
        }
    }

    #[test]
    fn test_bsp_incremental_build() {
        let mut tree = BspNode::new(vec![triangle_at(0.0)]);
        tree.build(vec![triangle_at(2.0)]);
        assert_eq!(tree.all_polygons().len(), 2);
    }
}

//! Octree over static level triangles
//!
//! Divides the level's bounding volume into hierarchical regions so world
//! queries only test triangles near the queried shape. A node subdivides into
//! 8 octants when it holds more triangles than the configured threshold; a
//! triangle is stored in every leaf its bounds overlap.

use serde::{Deserialize, Serialize};

use super::AABB;
use crate::foundation::math::Vec3;
use crate::physics::collision::{BoundingSphere, Capsule, Contact, Triangle};
use crate::physics::world::WorldCollider;

/// Configuration for octree behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Maximum triangles per node before subdivision
    pub max_triangles_per_node: usize,

    /// Maximum subdivision depth
    pub max_depth: u32,

    /// Minimum node size (prevents excessive subdivision)
    pub min_node_size: f32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_triangles_per_node: 8,
            max_depth: 6,
            min_node_size: 1.0,
        }
    }
}

impl OctreeConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_triangles_per_node == 0 {
            return Err("octree.max_triangles_per_node must be at least 1".to_string());
        }
        if !(self.min_node_size.is_finite() && self.min_node_size > 0.0) {
            return Err(format!(
                "octree.min_node_size must be positive, got {}",
                self.min_node_size
            ));
        }
        Ok(())
    }
}

/// Single node in the octree hierarchy
#[derive(Debug, Clone)]
pub struct OctreeNode {
    /// World-space bounds of this node
    pub bounds: AABB,

    /// Indices of triangles overlapping this node (if leaf)
    pub triangles: Vec<usize>,

    /// Child nodes (8 octants), None if this is a leaf
    pub children: Option<Box<[OctreeNode; 8]>>,

    /// Depth in the tree (0 = root)
    pub depth: u32,
}

impl OctreeNode {
    /// Create a new leaf node
    pub fn new(bounds: AABB, depth: u32) -> Self {
        Self {
            bounds,
            triangles: Vec::new(),
            children: None,
            depth,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    fn should_subdivide(&self, config: &OctreeConfig) -> bool {
        self.triangles.len() > config.max_triangles_per_node
            && self.depth < config.max_depth
            && self.bounds.extents().min() * 2.0 > config.min_node_size
    }

    /// Subdivide this node into 8 children and push its triangles down,
    /// splitting further wherever a child is still over the limit
    fn subdivide(&mut self, all: &[Triangle], config: &OctreeConfig) {
        if self.children.is_some() {
            return;
        }

        let center = self.bounds.center();
        let quarter_extents = self.bounds.extents() * 0.5;
        let depth = self.depth + 1;

        // Octant layout: bit 0 = +X, bit 1 = +Y, bit 2 = +Z
        let mut children: [OctreeNode; 8] = std::array::from_fn(|octant| {
            let sign = |bit: usize| if octant & bit != 0 { 1.0 } else { -1.0 };
            let child_center = Vec3::new(
                center.x + quarter_extents.x * sign(1),
                center.y + quarter_extents.y * sign(2),
                center.z + quarter_extents.z * sign(4),
            );
            OctreeNode::new(AABB::from_center_extents(child_center, quarter_extents), depth)
        });

        for index in std::mem::take(&mut self.triangles) {
            let tri_bounds = all[index].bounds();
            for child in children.iter_mut() {
                if child.bounds.intersects(&tri_bounds) {
                    child.triangles.push(index);
                }
            }
        }

        for child in children.iter_mut() {
            if child.should_subdivide(config) {
                child.subdivide(all, config);
            }
        }

        self.children = Some(Box::new(children));
    }

    /// Insert a triangle into this node
    fn insert(&mut self, index: usize, tri_bounds: &AABB, all: &[Triangle], config: &OctreeConfig) {
        if !self.bounds.intersects(tri_bounds) {
            return;
        }

        if let Some(ref mut children) = self.children {
            for child in children.iter_mut() {
                child.insert(index, tri_bounds, all, config);
            }
            return;
        }

        self.triangles.push(index);

        if self.should_subdivide(config) {
            self.subdivide(all, config);
        }
    }

    /// Collect indices of triangles in leaves overlapping `bounds` (may contain duplicates)
    fn collect(&self, bounds: &AABB, results: &mut Vec<usize>) {
        if !self.bounds.intersects(bounds) {
            return;
        }

        results.extend_from_slice(&self.triangles);

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.collect(bounds, results);
            }
        }
    }

    /// Count nodes in this subtree
    fn count_nodes(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map_or(0, |children| children.iter().map(OctreeNode::count_nodes).sum())
    }

    /// Deepest level in this subtree
    fn max_depth(&self) -> u32 {
        self.children.as_ref().map_or(self.depth, |children| {
            children.iter().map(OctreeNode::max_depth).max().unwrap_or(self.depth)
        })
    }

    /// Collect every leaf below this node, depth first
    pub fn get_all_leaves<'a>(&'a self, leaves: &mut Vec<&'a OctreeNode>) {
        match self.children {
            None => leaves.push(self),
            Some(ref children) => {
                for child in children.iter() {
                    child.get_all_leaves(leaves);
                }
            }
        }
    }
}

/// Octree of static level triangles, usable as the world collider
#[derive(Debug, Clone)]
pub struct TriangleOctree {
    /// Root node containing the entire level
    pub root: OctreeNode,

    /// Level triangles, referenced by index from the nodes
    triangles: Vec<Triangle>,

    /// Configuration
    config: OctreeConfig,
}

impl TriangleOctree {
    /// Build an octree from world-space triangles
    pub fn from_triangles(triangles: Vec<Triangle>, config: OctreeConfig) -> Self {
        let bounds = triangles
            .iter()
            .map(Triangle::bounds)
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or_else(|| AABB::new(Vec3::zeros(), Vec3::zeros()));

        // Cube root bounds keep octants from degenerating into slivers
        let half = bounds.extents().max().max(config.min_node_size * 0.5) + 0.01;
        let root_bounds = AABB::from_center_extents(bounds.center(), Vec3::repeat(half));

        let mut root = OctreeNode::new(root_bounds, 0);
        for (index, triangle) in triangles.iter().enumerate() {
            root.insert(index, &triangle.bounds(), &triangles, &config);
        }

        let octree = Self { root, triangles, config };
        log::info!(
            "Built level octree: {} triangles, {} nodes, depth {}",
            octree.triangle_count(),
            octree.node_count(),
            octree.depth()
        );
        octree
    }

    /// Build an octree from an indexed triangle mesh
    pub fn from_mesh(vertices: &[Vec3], indices: &[u32], config: OctreeConfig) -> Self {
        Self::from_triangles(crate::level::triangles_from_indexed(vertices, indices), config)
    }

    /// Candidate triangles whose leaves overlap `bounds`, each listed once, in index order
    pub fn query_bounds(&self, bounds: &AABB) -> Vec<usize> {
        let mut results = Vec::new();
        self.root.collect(bounds, &mut results);
        results.sort_unstable();
        results.dedup();
        results
    }

    /// Triangle by index
    pub fn triangle(&self, index: usize) -> Option<&Triangle> {
        self.triangles.get(index)
    }

    /// Every leaf node, depth first
    pub fn get_all_leaves(&self) -> Vec<&OctreeNode> {
        let mut leaves = Vec::new();
        self.root.get_all_leaves(&mut leaves);
        leaves
    }

    /// Number of level triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Total node count
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }

    /// Deepest subdivision level reached
    pub fn depth(&self) -> u32 {
        self.root.max_depth()
    }

    /// The configuration this octree was built with
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }
}

/// Contacts from every overlapping triangle are applied to a working copy of
/// the shape in index order; the reported contact is their summed correction.
/// A sum too small to normalize keeps the last triangle's normal.
fn accumulate(total: Vec3, last_normal: Vec3) -> Contact {
    let depth = total.magnitude();
    if depth > f32::MIN_POSITIVE {
        Contact::new(total / depth, depth)
    } else {
        Contact::new(last_normal, 0.0)
    }
}

impl WorldCollider for TriangleOctree {
    fn query_capsule(&self, capsule: &Capsule) -> Option<Contact> {
        let mut working = *capsule;
        let mut total = Vec3::zeros();
        let mut last = None;

        for index in self.query_bounds(&capsule.bounds()) {
            if let Some(contact) = self.triangles[index].intersect_capsule(&working) {
                working.translate(contact.correction());
                total += contact.correction();
                last = Some(contact);
            }
        }

        last.map(|contact| accumulate(total, contact.normal))
    }

    fn query_sphere(&self, sphere: &BoundingSphere) -> Option<Contact> {
        let mut working = *sphere;
        let mut total = Vec3::zeros();
        let mut last = None;

        for index in self.query_bounds(&sphere.bounds()) {
            if let Some(contact) = self.triangles[index].intersect_sphere(&working) {
                working.center += contact.correction();
                total += contact.correction();
                last = Some(contact);
            }
        }

        last.map(|contact| accumulate(total, contact.normal))
    }
}

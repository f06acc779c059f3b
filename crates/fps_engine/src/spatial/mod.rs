//! Spatial partitioning data structures
//!
//! Provides spatial indexing of static level triangles so world queries only
//! test geometry near the queried shape.

mod bounds;
mod octree;

pub use bounds::AABB;
pub use octree::{OctreeConfig, OctreeNode, TriangleOctree};

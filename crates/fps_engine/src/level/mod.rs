//! Level geometry
//!
//! Triangle soup generation for the static level. A loaded level mesh goes
//! through [`triangles_from_indexed`]; without one, [`fallback_world`] builds
//! a ground slab with scattered boxes so the game stays playable.

mod fallback;
mod mesh;

pub use fallback::{build_fallback_octree, fallback_world};
pub use mesh::{box_triangles, triangles_from_indexed};

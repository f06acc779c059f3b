//! Triangle generation from meshes and box primitives

use crate::foundation::math::{Rot3, Vec3};
use crate::physics::collision::Triangle;

/// Corner sign table for a box: bit 0 is X, bit 1 is Y, bit 2 is Z
const CORNER_SIGNS: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
];

/// Box faces as corner quads wound counter-clockwise seen from outside,
/// in the order +X, -X, +Y, -Y, +Z, -Z
const FACE_QUADS: [[usize; 4]; 6] = [
    [1, 3, 7, 5],
    [0, 4, 6, 2],
    [2, 6, 7, 3],
    [0, 1, 5, 4],
    [4, 5, 7, 6],
    [0, 2, 3, 1],
];

/// Collect triangles from an indexed mesh
///
/// Index triples referring past the end of `vertices` are skipped with a
/// warning, as is a trailing partial triple.
pub fn triangles_from_indexed(vertices: &[Vec3], indices: &[u32]) -> Vec<Triangle> {
    if indices.len() % 3 != 0 {
        log::warn!(
            "Mesh index count {} is not a multiple of 3; ignoring trailing indices",
            indices.len()
        );
    }

    let mut skipped = 0usize;
    let triangles: Vec<Triangle> = indices
        .chunks_exact(3)
        .filter_map(|tri| {
            let corner = |i: u32| vertices.get(i as usize).copied();
            match (corner(tri[0]), corner(tri[1]), corner(tri[2])) {
                (Some(a), Some(b), Some(c)) => Some(Triangle::new(a, b, c)),
                _ => {
                    skipped += 1;
                    None
                }
            }
        })
        .collect();

    if skipped > 0 {
        log::warn!("Skipped {} triangles with out-of-range indices", skipped);
    }
    triangles
}

/// The 12 outward-facing triangles of an oriented box
pub fn box_triangles(center: Vec3, half_extents: Vec3, rotation: &Rot3) -> Vec<Triangle> {
    let corners = CORNER_SIGNS.map(|[sx, sy, sz]| {
        let local = Vec3::new(sx * half_extents.x, sy * half_extents.y, sz * half_extents.z);
        center + rotation * local
    });

    FACE_QUADS
        .iter()
        .flat_map(|&[a, b, c, d]| {
            [
                Triangle::new(corners[a], corners[b], corners[c]),
                Triangle::new(corners[a], corners[c], corners[d]),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_normals_face_outward() {
        let center = Vec3::new(1.0, 2.0, 3.0);
        let triangles = box_triangles(center, Vec3::new(1.0, 2.0, 3.0), &Rot3::identity());
        assert_eq!(triangles.len(), 12);

        let expected = [
            Vec3::x(),
            -Vec3::x(),
            Vec3::y(),
            -Vec3::y(),
            Vec3::z(),
            -Vec3::z(),
        ];
        for (i, triangle) in triangles.iter().enumerate() {
            let normal = triangle.normal().expect("box faces are not degenerate");
            assert_relative_eq!(normal, expected[i / 2], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_rotated_box_keeps_outward_normals() {
        let center = Vec3::new(0.0, 5.0, 0.0);
        let rotation = Rot3::from_euler_angles(0.3, 1.1, -0.7);
        for triangle in box_triangles(center, Vec3::repeat(2.0), &rotation) {
            let normal = triangle.normal().expect("box faces are not degenerate");
            let face_center = (triangle.v0 + triangle.v1 + triangle.v2) / 3.0;
            assert!(normal.dot(&(face_center - center)) > 0.0);
        }
    }

    #[test]
    fn test_triangles_from_indexed_skips_bad_indices() {
        let vertices = [Vec3::zeros(), Vec3::x(), Vec3::y()];
        let triangles = triangles_from_indexed(&vertices, &[0, 1, 2, 0, 1, 7, 2, 1]);
        assert_eq!(triangles.len(), 1);
        assert_eq!(triangles[0], Triangle::new(Vec3::zeros(), Vec3::x(), Vec3::y()));
    }
}

//! Polygon soups shared by the navigation mesh tests
//!
//! Every helper lays its geometry on the y = 0 plane with counter-clockwise
//! contours: each unit square is listed as `(x, z), (x, z + 1), (x + 1, z + 1), (x + 1, z)`.

use crate::{NavMesh, NavMeshConfig};
use glam::Vec3;
use nav_common::Result;

pub fn xz(x: f32, z: f32) -> Vec3 {
    Vec3::new(x, 0.0, z)
}

/// Unit square with its minimum corner at `(x, z)`
pub fn unit_square(x: f32, z: f32) -> [Vec3; 4] {
    [xz(x, z), xz(x, z + 1.0), xz(x + 1.0, z + 1.0), xz(x + 1.0, z)]
}

/// `n * n` unit squares, each split along its diagonal into two triangles
pub fn grid_triangles(n: usize) -> Vec<[Vec3; 3]> {
    let mut triangles = Vec::with_capacity(n * n * 2);
    for x in 0..n {
        for z in 0..n {
            let [a, b, c, d] = unit_square(x as f32, z as f32);
            triangles.push([a, b, c]);
            triangles.push([a, c, d]);
        }
    }
    triangles
}

/// `n * n` unit squares
pub fn grid_squares(n: usize) -> Vec<[Vec3; 4]> {
    (0..n)
        .flat_map(|x| (0..n).map(move |z| unit_square(x as f32, z as f32)))
        .collect()
}

pub fn grid_nav_mesh(n: usize) -> Result<NavMesh> {
    NavMesh::from_polygons(grid_triangles(n), NavMeshConfig::default())
}

/// Two squares side by side along +X, sharing the edge x = 1
pub fn two_squares() -> Vec<[Vec3; 4]> {
    vec![unit_square(0.0, 0.0), unit_square(1.0, 0.0)]
}

/// Three squares forming an L: along +X, then up +Z in the second column
pub fn l_shape() -> Vec<[Vec3; 4]> {
    vec![
        unit_square(0.0, 0.0),
        unit_square(1.0, 0.0),
        unit_square(1.0, 1.0),
    ]
}

pub fn unmerged() -> NavMeshConfig {
    NavMeshConfig {
        merge_convex_regions: false,
        ..NavMeshConfig::default()
    }
}

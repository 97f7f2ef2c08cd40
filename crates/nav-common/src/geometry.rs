//! 2D geometry operations on the XZ plane (Y-up coordinate system)
//!
//! Region convexity, point containment and the funnel algorithm all decide
//! turns with the same signed-area test, so they live here in one place.

use glam::Vec3;

/// Calculate twice the signed area of the triangle `a, b, c` projected onto the XZ plane.
///
/// The sign gives the turn direction when walking `a -> b -> c`:
/// - Positive or zero: `c` is on the inner side of a counter-clockwise boundary
///   (or colinear with `a` and `b`)
/// - Negative: `c` is on the outer side
#[inline]
pub fn tri_area_2d(a: &Vec3, b: &Vec3, c: &Vec3) -> f32 {
    let abx = b.x - a.x;
    let abz = b.z - a.z;
    let acx = c.x - a.x;
    let acz = c.z - a.z;
    acx * abz - abx * acz
}

/// Check if `c` is on the inner side of, or on, the directed line `a -> b`.
#[inline]
pub fn left_on(a: &Vec3, b: &Vec3, c: &Vec3) -> bool {
    tri_area_2d(a, b, c) >= 0.0
}

/// Signed area of a closed contour on the XZ plane (shoelace formula).
///
/// Positive for contours that wind the same way as navigation regions.
pub fn contour_area_2d(points: &[Vec3]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        area += b.x * a.z - a.x * b.z;
    }
    area * 0.5
}

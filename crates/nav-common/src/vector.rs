//! Vector utilities

use crate::shapes::LineSegment;
use glam::Vec3;

/// Calculates the distance between two points
#[inline]
pub fn distance(a: &Vec3, b: &Vec3) -> f32 {
    (*b - *a).length()
}

/// Calculates the squared distance between two points
#[inline]
pub fn distance_squared(a: &Vec3, b: &Vec3) -> f32 {
    (*b - *a).length_squared()
}

/// Calculates the Manhattan (taxicab) distance between two points
#[inline]
pub fn manhattan_distance(a: &Vec3, b: &Vec3) -> f32 {
    let d = (*b - *a).abs();
    d.x + d.y + d.z
}

/// Normalizes a vector, treating a near-zero length as 1 so no NaN escapes
#[inline]
pub fn normalize_or_unit_length(v: &Vec3) -> Vec3 {
    let len = v.length();
    if len < f32::EPSILON {
        *v
    } else {
        *v / len
    }
}

/// Finds the closest point on a line segment to a given point
#[inline]
pub fn closest_point_on_segment(p: &Vec3, a: &Vec3, b: &Vec3) -> Vec3 {
    LineSegment::new(*a, *b).closest_point_to_point(p)
}

/// Calculates the squared distance between a point and a line segment
#[inline]
pub fn distance_point_segment_squared(p: &Vec3, a: &Vec3, b: &Vec3) -> f32 {
    (*p - closest_point_on_segment(p, a, b)).length_squared()
}

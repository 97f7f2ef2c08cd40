//! Geometric value types shared by the navigation mesh and the spatial index

mod aabb;
mod bounding_sphere;
mod line_segment;
mod plane;
mod ray;

pub use aabb::Aabb;
pub use bounding_sphere::BoundingSphere;
pub use line_segment::LineSegment;
pub use plane::Plane;
pub use ray::Ray;

use super::Aabb;
use glam::Vec3;

/// Sphere used for coarse range queries
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a sphere
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Box enclosing the sphere, the over-approximation used by grid queries
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_and_radius(&self.center, self.radius)
    }
}

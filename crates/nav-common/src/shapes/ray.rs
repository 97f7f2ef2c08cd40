use super::{Aabb, Plane};
use glam::Vec3;

/// A half-line used for picking points on the navigation surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray; the direction is normalized (a zero direction stays zero)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to the plane, if the ray hits it in front of the origin
    pub fn intersect_plane(&self, plane: &Plane) -> Option<f32> {
        let denom = plane.normal.dot(self.direction);
        if denom.abs() < f32::EPSILON {
            // Parallel; only a hit if the origin is on the plane
            return (plane.distance_to_point(&self.origin).abs() < f32::EPSILON).then_some(0.0);
        }

        let t = -(self.origin.dot(plane.normal) + plane.constant) / denom;
        (t >= 0.0).then_some(t)
    }

    /// Distance along the ray to the box, if it is hit (slab test)
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        let mut tmin = 0.0f32;
        let mut tmax = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let dir = self.direction[axis];
            let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

            if dir.abs() < f32::EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            tmin = tmin.max(t0);
            tmax = tmax.min(t1);
            if tmin > tmax {
                return None;
            }
        }

        Some(tmin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_plane() {
        let ray = Ray::new(Vec3::new(1.0, 10.0, 1.0), Vec3::new(0.0, -2.0, 0.0));
        let ground = Plane::new(Vec3::Y, 0.0);

        let t = ray.intersect_plane(&ground).unwrap();
        assert!((t - 10.0).abs() < 1e-6);
        assert_eq!(ray.at(t), Vec3::new(1.0, 0.0, 1.0));

        // Pointing away
        let up = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert!(up.intersect_plane(&ground).is_none());
    }

    #[test]
    fn test_intersect_aabb() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);

        let hit = Ray::new(Vec3::new(0.5, 5.0, 0.5), Vec3::NEG_Y);
        assert!((hit.intersect_aabb(&aabb).unwrap() - 4.0).abs() < 1e-6);

        let miss = Ray::new(Vec3::new(2.0, 5.0, 0.5), Vec3::NEG_Y);
        assert!(miss.intersect_aabb(&aabb).is_none());

        // Origin inside the box
        let inside = Ray::new(Vec3::splat(0.5), Vec3::X);
        assert_eq!(inside.intersect_aabb(&aabb), Some(0.0));
    }
}

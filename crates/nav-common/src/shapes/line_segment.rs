use glam::Vec3;

/// A finite line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub from: Vec3,
    pub to: Vec3,
}

impl LineSegment {
    /// Creates a segment
    pub fn new(from: Vec3, to: Vec3) -> Self {
        Self { from, to }
    }

    /// Vector from start to end
    pub fn delta(&self) -> Vec3 {
        self.to - self.from
    }

    /// Point at parameter `t` (0 = start, 1 = end)
    pub fn at(&self, t: f32) -> Vec3 {
        self.from + self.delta() * t
    }

    /// Parameter of the point on the segment's line closest to `point`
    ///
    /// When `clamp` is set the parameter is restricted to the segment itself.
    /// Zero-length segments return 0.
    pub fn closest_point_to_point_parameter(&self, point: &Vec3, clamp: bool) -> f32 {
        let delta = self.delta();
        let len_sq = delta.length_squared();
        if len_sq < f32::EPSILON {
            return 0.0;
        }

        let t = (*point - self.from).dot(delta) / len_sq;
        if clamp {
            t.clamp(0.0, 1.0)
        } else {
            t
        }
    }

    /// Point on the segment closest to `point`
    pub fn closest_point_to_point(&self, point: &Vec3) -> Vec3 {
        self.at(self.closest_point_to_point_parameter(point, true))
    }
}

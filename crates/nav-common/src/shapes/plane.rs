use glam::Vec3;

/// A plane in Hessian normal form: every point `p` on it satisfies `normal.dot(p) + constant == 0`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Plane {
    /// Unit normal
    pub normal: Vec3,
    /// Signed distance of the origin from the plane, negated
    pub constant: f32,
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            normal: Vec3::Y,
            constant: 0.0,
        }
    }
}

impl Plane {
    /// Creates a plane from a normal and a constant
    pub fn new(normal: Vec3, constant: f32) -> Self {
        Self { normal, constant }
    }

    /// Creates a plane through `point` with the given normal
    pub fn from_normal_and_point(normal: Vec3, point: &Vec3) -> Self {
        Self {
            normal,
            constant: -point.dot(normal),
        }
    }

    /// Creates the plane through three points
    ///
    /// The normal faces up (+Y) for points wound like a navigation region. Colinear
    /// points give a zero normal, which callers detect with [`Plane::is_degenerate`].
    pub fn from_coplanar_points(a: &Vec3, b: &Vec3, c: &Vec3) -> Self {
        let normal = (*c - *b).cross(*a - *b).normalize_or_zero();
        Self::from_normal_and_point(normal, a)
    }

    /// Returns true if the plane has no usable normal
    pub fn is_degenerate(&self) -> bool {
        self.normal.length_squared() < f32::EPSILON
    }

    /// Signed distance from the plane to `point`
    #[inline]
    pub fn distance_to_point(&self, point: &Vec3) -> f32 {
        self.normal.dot(*point) + self.constant
    }

    /// Moves `point` along the Y axis until it lies on the plane
    ///
    /// Vertical planes have no such point; the input is returned unchanged.
    pub fn snap_height(&self, point: &Vec3) -> Vec3 {
        if self.normal.y.abs() < 1.0e-6 {
            return *point;
        }
        let y = -(self.normal.x * point.x + self.normal.z * point.z + self.constant) / self.normal.y;
        Vec3::new(point.x, y, point.z)
    }
}

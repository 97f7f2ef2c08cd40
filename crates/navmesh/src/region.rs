//! Read-only view of a convex navigation region

use crate::half_edge::{EdgeCycle, HalfEdgeId, HalfEdgeMesh, PolygonId};
use glam::Vec3;
use nav_common::{contour_area_2d, left_on, Aabb, Plane};

/// Read-only view of one convex region of a [`HalfEdgeMesh`]
#[derive(Debug, Clone, Copy)]
pub struct Region<'a> {
    mesh: &'a HalfEdgeMesh,
    id: PolygonId,
}

impl<'a> Region<'a> {
    pub fn new(mesh: &'a HalfEdgeMesh, id: PolygonId) -> Self {
        Self { mesh, id }
    }

    pub fn id(&self) -> PolygonId {
        self.id
    }

    pub fn centroid(&self) -> Vec3 {
        self.mesh.polygon(self.id).centroid
    }

    pub fn plane(&self) -> &'a Plane {
        &self.mesh.polygon(self.id).plane
    }

    /// Boundary half-edges in order
    pub fn edges(&self) -> EdgeCycle<'a> {
        self.mesh.polygon_edges(self.id)
    }

    /// Boundary points in order
    pub fn contour(&self) -> Vec<Vec3> {
        self.edges()
            .map(|e| self.mesh.position(self.mesh.origin(e)))
            .collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.edges().count()
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(&self.contour())
    }

    /// Area of the region projected onto the XZ plane
    pub fn area(&self) -> f32 {
        contour_area_2d(&self.contour())
    }

    pub fn is_convex(&self) -> bool {
        self.mesh.is_convex(self.id)
    }

    pub fn is_coplanar(&self, epsilon: f32) -> bool {
        self.mesh.is_coplanar(self.id, epsilon)
    }

    /// Whether `point` lies over the region and within `epsilon` of its plane
    ///
    /// Points on the boundary count as inside.
    pub fn contains(&self, point: &Vec3, epsilon: f32) -> bool {
        let inside = self.edges().all(|e| {
            let (from, to) = self.mesh.endpoints(e);
            left_on(&from, &to, point)
        });

        inside && self.plane().distance_to_point(point).abs() <= epsilon
    }

    /// Boundary half-edge whose twin belongs to `other`
    pub fn portal_half_edge_to(&self, other: PolygonId) -> Option<HalfEdgeId> {
        self.edges().find(|&e| {
            self.mesh
                .twin(e)
                .is_some_and(|t| self.mesh.polygon_of(t) == other)
        })
    }

    /// Shared boundary with `other` as `(left, right)` seen when crossing into it
    ///
    /// Two convex regions can share a run of colinear half-edges; the portal
    /// spans the whole run.
    pub fn portal_edge_to(&self, other: PolygonId) -> Option<(Vec3, Vec3)> {
        let mesh = self.mesh;
        let shared = |e: HalfEdgeId| mesh.twin(e).is_some_and(|t| mesh.polygon_of(t) == other);

        let found = self.portal_half_edge_to(other)?;
        let count = self.vertex_count();

        let mut first = found;
        for _ in 1..count {
            let prev = mesh.prev(first);
            if !shared(prev) {
                break;
            }
            first = prev;
        }

        let mut last = found;
        for _ in 1..count {
            let next = mesh.next(last);
            if next == first || !shared(next) {
                break;
            }
            last = next;
        }

        let left = mesh.position(mesh.origin(first));
        let right = mesh.position(mesh.destination(last));
        Some((left, right))
    }

    /// Edges on the mesh border, those without a twin
    pub fn border_edges(&self) -> impl Iterator<Item = HalfEdgeId> + 'a {
        let mesh = self.mesh;
        self.edges().filter(move |&e| mesh.twin(e).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nav_common::{Error, Result};

    fn xz(x: f32, z: f32) -> Vec3 {
        Vec3::new(x, 0.0, z)
    }

    fn two_squares() -> Result<(HalfEdgeMesh, PolygonId, PolygonId)> {
        let mut mesh = HalfEdgeMesh::new(1e-4);
        let a = mesh.add_contour(&[xz(0.0, 0.0), xz(0.0, 1.0), xz(1.0, 1.0), xz(1.0, 0.0)])?;
        let b = mesh.add_contour(&[xz(1.0, 0.0), xz(1.0, 1.0), xz(2.0, 1.0), xz(2.0, 0.0)])?;
        mesh.link_twins();
        Ok((mesh, a, b))
    }

    #[test]
    fn test_contains() -> Result<()> {
        let (mesh, a, b) = two_squares()?;
        let region = Region::new(&mesh, a);

        assert!(region.contains(&xz(0.5, 0.5), 1.0));
        assert!(region.contains(&Vec3::new(0.5, 0.9, 0.5), 1.0));
        assert!(!region.contains(&Vec3::new(0.5, 1.5, 0.5), 1.0));
        assert!(!region.contains(&xz(1.5, 0.5), 1.0));

        // The shared edge belongs to both
        assert!(region.contains(&xz(1.0, 0.5), 1.0));
        assert!(Region::new(&mesh, b).contains(&xz(1.0, 0.5), 1.0));

        Ok(())
    }

    #[test]
    fn test_portal_edge() -> Result<()> {
        let (mesh, a, b) = two_squares()?;

        assert_eq!(
            Region::new(&mesh, a).portal_edge_to(b),
            Some((xz(1.0, 1.0), xz(1.0, 0.0)))
        );
        assert_eq!(
            Region::new(&mesh, b).portal_edge_to(a),
            Some((xz(1.0, 0.0), xz(1.0, 1.0)))
        );

        assert!(Region::new(&mesh, a).portal_edge_to(a).is_none());

        Ok(())
    }

    #[test]
    fn test_portal_spans_colinear_shared_edges() -> Result<()> {
        let mut mesh = HalfEdgeMesh::new(1e-4);
        // A 1x2 column next to two unit squares along x = 1
        let column = mesh
            .add_contour(&[
                xz(0.0, 0.0),
                xz(0.0, 2.0),
                xz(1.0, 2.0),
                xz(1.0, 1.0),
                xz(1.0, 0.0),
            ])?;
        let lower = mesh.add_contour(&[xz(1.0, 0.0), xz(1.0, 1.0), xz(2.0, 1.0), xz(2.0, 0.0)])?;
        let upper = mesh.add_contour(&[xz(1.0, 1.0), xz(1.0, 2.0), xz(2.0, 2.0), xz(2.0, 1.0)])?;
        mesh.link_twins();

        // Only the first square is shared with the column's lower half
        assert_eq!(
            Region::new(&mesh, column).portal_edge_to(lower),
            Some((xz(1.0, 1.0), xz(1.0, 0.0)))
        );

        // Merge the squares, then the column sees one long portal
        let edge = Region::new(&mesh, lower)
            .portal_half_edge_to(upper)
            .ok_or_else(|| Error::InvalidMesh("squares are not linked".to_string()))?;
        assert!(mesh.try_merge(edge, 1e-3));
        assert_eq!(
            Region::new(&mesh, column).portal_edge_to(lower),
            Some((xz(1.0, 2.0), xz(1.0, 0.0)))
        );
        assert_eq!(
            Region::new(&mesh, lower).portal_edge_to(column),
            Some((xz(1.0, 0.0), xz(1.0, 2.0)))
        );

        Ok(())
    }

    #[test]
    fn test_shape_accessors() -> Result<()> {
        let (mesh, a, _) = two_squares()?;
        let region = Region::new(&mesh, a);

        assert_eq!(region.vertex_count(), 4);
        assert_eq!(region.contour()[2], xz(1.0, 1.0));
        assert_eq!(region.area(), 1.0);
        assert_eq!(region.aabb().max, xz(1.0, 1.0));
        assert_eq!(region.border_edges().count(), 3);
        assert!(region.is_convex());
        assert!(region.is_coplanar(1e-3));

        Ok(())
    }
}

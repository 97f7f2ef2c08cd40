//! Arena-backed half-edge structure holding the boundaries of convex regions
//!
//! Vertices, half-edges and polygons live in flat vectors and refer to each other
//! through typed indices, so twin and owner links are plain handles rather than
//! owning pointers. Vertex positions are welded on insertion: points that
//! quantize to the same key share one [`VertexId`], which lets twin discovery
//! compare ids instead of coordinates.

use glam::Vec3;
use nav_common::{contour_area_2d, quantize, tri_area_2d, Error, Plane, QuantizedKey, Result};
use std::collections::{HashMap, VecDeque};

/// Handle of a welded vertex position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct VertexId(pub u32);

/// Handle of a half-edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct HalfEdgeId(pub u32);

/// Handle of a polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct PolygonId(pub u32);

impl VertexId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl HalfEdgeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl PolygonId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Directed boundary edge of a polygon
#[derive(Debug, Clone, PartialEq)]
pub struct HalfEdge {
    /// Vertex the edge starts at
    pub origin: VertexId,
    /// Next edge along the polygon boundary
    pub next: HalfEdgeId,
    /// Previous edge along the polygon boundary
    pub prev: HalfEdgeId,
    /// The same edge traversed by the neighboring polygon, `None` on the mesh border
    pub twin: Option<HalfEdgeId>,
    /// Polygon whose boundary this edge belongs to
    pub polygon: PolygonId,
    /// Navigation node shared by everything meeting at `origin`, set for portal edges
    pub node_index: Option<usize>,
}

/// Boundary cycle entry point and derived data of one region
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Any half-edge of the boundary cycle
    pub edge: HalfEdgeId,
    /// Average of the boundary vertices
    pub centroid: Vec3,
    /// Supporting plane from the first three boundary points of the input contour
    pub plane: Plane,
    /// False once the polygon has been merged into a neighbor
    pub active: bool,
}

/// Arena of vertices, half-edges and polygons
#[derive(Debug, Clone, PartialEq)]
pub struct HalfEdgeMesh {
    vertices: Vec<Vec3>,
    weld: HashMap<QuantizedKey, VertexId>,
    weld_tolerance: f32,
    edges: Vec<HalfEdge>,
    polygons: Vec<Polygon>,
}

impl Default for HalfEdgeMesh {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl HalfEdgeMesh {
    /// Creates an empty arena; positions closer than `weld_tolerance` share a vertex
    pub fn new(weld_tolerance: f32) -> Self {
        Self {
            vertices: Vec::new(),
            weld: HashMap::new(),
            weld_tolerance,
            edges: Vec::new(),
            polygons: Vec::new(),
        }
    }

    /// Returns the vertex for `position`, inserting it if no welded match exists
    pub fn add_vertex(&mut self, position: Vec3) -> VertexId {
        let key = quantize(&position, self.weld_tolerance);
        if let Some(&id) = self.weld.get(&key) {
            return id;
        }

        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(position);
        self.weld.insert(key, id);
        id
    }

    /// Builds a closed boundary cycle from a convex, counter-clockwise contour
    ///
    /// Edge `i` of the new polygon runs from `points[i]` to `points[i + 1]`. The
    /// arena is left untouched when the contour is rejected.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidPolygon`] for fewer than 3 points, clockwise winding or a
    ///   non-convex outline
    /// * [`Error::DegeneratePolygon`] for repeated points, zero area or colinear
    ///   leading points
    pub fn add_contour(&mut self, points: &[Vec3]) -> Result<PolygonId> {
        let n = points.len();
        if n < 3 {
            return Err(Error::InvalidPolygon(format!(
                "contour has {} points, at least 3 are required",
                n
            )));
        }

        let keys: Vec<QuantizedKey> = points
            .iter()
            .map(|p| quantize(p, self.weld_tolerance))
            .collect();
        for (i, key) in keys.iter().enumerate() {
            if keys[i + 1..].contains(key) {
                return Err(Error::DegeneratePolygon(format!(
                    "point {} is repeated in the contour",
                    i
                )));
            }
        }

        let area = contour_area_2d(points);
        if area.abs() <= f32::EPSILON {
            return Err(Error::DegeneratePolygon(
                "contour has zero area".to_string(),
            ));
        }
        if area < 0.0 {
            return Err(Error::InvalidPolygon(
                "contour is wound clockwise".to_string(),
            ));
        }

        for i in 0..n {
            let a = &points[(i + n - 1) % n];
            let b = &points[i];
            let c = &points[(i + 1) % n];
            if tri_area_2d(a, b, c) < 0.0 {
                return Err(Error::InvalidPolygon(format!(
                    "contour is not convex at point {}",
                    i
                )));
            }
        }

        let plane = Plane::from_coplanar_points(&points[0], &points[1], &points[2]);
        if plane.is_degenerate() {
            return Err(Error::DegeneratePolygon(
                "first three points are colinear".to_string(),
            ));
        }

        let polygon = PolygonId(self.polygons.len() as u32);
        let base = self.edges.len() as u32;
        let count = n as u32;

        for (i, point) in points.iter().enumerate() {
            let origin = self.add_vertex(*point);
            let i = i as u32;
            self.edges.push(HalfEdge {
                origin,
                next: HalfEdgeId(base + (i + 1) % count),
                prev: HalfEdgeId(base + (i + count - 1) % count),
                twin: None,
                polygon,
                node_index: None,
            });
        }

        self.polygons.push(Polygon {
            edge: HalfEdgeId(base),
            centroid: points.iter().copied().sum::<Vec3>() / n as f32,
            plane,
            active: true,
        });

        Ok(polygon)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn position(&self, vertex: VertexId) -> Vec3 {
        self.vertices[vertex.index()]
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn half_edge(&self, edge: HalfEdgeId) -> &HalfEdge {
        &self.edges[edge.index()]
    }

    /// Total number of polygons, including merged-away ones
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn polygon(&self, polygon: PolygonId) -> &Polygon {
        &self.polygons[polygon.index()]
    }

    /// Polygons that have not been merged into a neighbor, in insertion order
    pub fn active_polygons(&self) -> impl Iterator<Item = PolygonId> + '_ {
        self.polygons
            .iter()
            .enumerate()
            .filter(|(_, p)| p.active)
            .map(|(i, _)| PolygonId(i as u32))
    }

    #[inline]
    pub fn origin(&self, edge: HalfEdgeId) -> VertexId {
        self.edges[edge.index()].origin
    }

    #[inline]
    pub fn destination(&self, edge: HalfEdgeId) -> VertexId {
        self.origin(self.next(edge))
    }

    #[inline]
    pub fn next(&self, edge: HalfEdgeId) -> HalfEdgeId {
        self.edges[edge.index()].next
    }

    #[inline]
    pub fn prev(&self, edge: HalfEdgeId) -> HalfEdgeId {
        self.edges[edge.index()].prev
    }

    #[inline]
    pub fn twin(&self, edge: HalfEdgeId) -> Option<HalfEdgeId> {
        self.edges[edge.index()].twin
    }

    #[inline]
    pub fn polygon_of(&self, edge: HalfEdgeId) -> PolygonId {
        self.edges[edge.index()].polygon
    }

    /// Start and end positions of an edge
    pub fn endpoints(&self, edge: HalfEdgeId) -> (Vec3, Vec3) {
        (
            self.position(self.origin(edge)),
            self.position(self.destination(edge)),
        )
    }

    pub fn squared_length(&self, edge: HalfEdgeId) -> f32 {
        let (from, to) = self.endpoints(edge);
        from.distance_squared(to)
    }

    pub fn length(&self, edge: HalfEdgeId) -> f32 {
        self.squared_length(edge).sqrt()
    }

    /// Walks `next` links from `start` until the cycle closes
    pub fn edge_cycle(&self, start: HalfEdgeId) -> EdgeCycle<'_> {
        EdgeCycle {
            mesh: self,
            start,
            current: Some(start),
            remaining: self.edges.len(),
        }
    }

    /// Boundary edges of a polygon, starting at its entry edge
    pub fn polygon_edges(&self, polygon: PolygonId) -> EdgeCycle<'_> {
        self.edge_cycle(self.polygon(polygon).edge)
    }

    pub(crate) fn set_node_index(&mut self, edge: HalfEdgeId, node_index: usize) {
        self.edges[edge.index()].node_index = Some(node_index);
    }

    /// Recomputes a polygon's centroid from its current boundary
    pub fn update_centroid(&mut self, polygon: PolygonId) {
        let (sum, count) = self
            .polygon_edges(polygon)
            .fold((Vec3::ZERO, 0usize), |(sum, count), e| {
                (sum + self.position(self.origin(e)), count + 1)
            });
        if count > 0 {
            self.polygons[polygon.index()].centroid = sum / count as f32;
        }
    }

    /// Every boundary turn of the polygon is a left turn or straight
    pub fn is_convex(&self, polygon: PolygonId) -> bool {
        self.cycle_is_convex(self.polygon(polygon).edge)
    }

    /// Every boundary vertex lies within `epsilon` of the polygon's plane
    pub fn is_coplanar(&self, polygon: PolygonId, epsilon: f32) -> bool {
        let p = self.polygon(polygon);
        self.cycle_is_coplanar(p.edge, &p.plane, epsilon)
    }

    fn cycle_is_convex(&self, start: HalfEdgeId) -> bool {
        self.edge_cycle(start).all(|e| {
            let a = self.position(self.origin(self.prev(e)));
            let b = self.position(self.origin(e));
            let c = self.position(self.destination(e));
            tri_area_2d(&a, &b, &c) >= 0.0
        })
    }

    fn cycle_is_coplanar(&self, start: HalfEdgeId, plane: &Plane, epsilon: f32) -> bool {
        self.edge_cycle(start)
            .all(|e| plane.distance_to_point(&self.position(self.origin(e))).abs() <= epsilon)
    }

    /// Links every pair of opposite half-edges of active polygons
    ///
    /// Half-edges are visited in insertion order; each unlinked one is paired
    /// with the first later unlinked half-edge running between the same two
    /// vertices in the opposite direction. Returns the earlier half-edge of each
    /// new pair, in discovery order.
    pub fn link_twins(&mut self) -> Vec<HalfEdgeId> {
        let mut open: HashMap<(VertexId, VertexId), VecDeque<HalfEdgeId>> = HashMap::new();
        for i in 0..self.edges.len() {
            let edge = HalfEdgeId(i as u32);
            if self.is_linkable(edge) {
                open.entry((self.origin(edge), self.destination(edge)))
                    .or_default()
                    .push_back(edge);
            }
        }

        let mut pairs = Vec::new();
        for i in 0..self.edges.len() {
            let edge = HalfEdgeId(i as u32);
            if !self.is_linkable(edge) {
                continue;
            }

            let key = (self.destination(edge), self.origin(edge));
            let Some(candidates) = open.get_mut(&key) else {
                continue;
            };

            // Earlier entries have all been linked by the time `edge` is visited
            while let Some(&front) = candidates.front() {
                if self.edges[front.index()].twin.is_some() {
                    candidates.pop_front();
                } else {
                    break;
                }
            }

            if let Some(twin) = candidates.pop_front() {
                self.edges[edge.index()].twin = Some(twin);
                self.edges[twin.index()].twin = Some(edge);
                pairs.push(edge);
            }
        }

        pairs
    }

    fn is_linkable(&self, edge: HalfEdgeId) -> bool {
        let half_edge = &self.edges[edge.index()];
        half_edge.twin.is_none() && self.polygons[half_edge.polygon.index()].active
    }

    /// Number of edges of `a` whose twin belongs to `b`
    pub fn shared_edge_count(&self, a: PolygonId, b: PolygonId) -> usize {
        self.polygon_edges(a)
            .filter(|&e| self.twin(e).map(|t| self.polygon_of(t)) == Some(b))
            .count()
    }

    /// Merges the two polygons on either side of `edge` into one
    ///
    /// The boundary cycles are spliced across the shared edge, dropping both of
    /// its halves. The merge is kept only when the joined boundary is convex and
    /// every vertex lies within `epsilon_coplanar` of the plane of `edge`'s
    /// polygon; the surviving polygon is `edge`'s and the twin's polygon is
    /// retired. Otherwise every link is restored exactly and false is returned.
    pub fn try_merge(&mut self, edge: HalfEdgeId, epsilon_coplanar: f32) -> bool {
        let Some(twin) = self.twin(edge) else {
            return false;
        };
        let keep = self.polygon_of(edge);
        let retire = self.polygon_of(twin);
        if keep == retire {
            return false;
        }

        let (c_prev, c_next) = (self.prev(edge), self.next(edge));
        let (t_prev, t_next) = (self.prev(twin), self.next(twin));
        let entry = self.polygons[keep.index()].edge;

        self.edges[c_prev.index()].next = t_next;
        self.edges[t_next.index()].prev = c_prev;
        self.edges[t_prev.index()].next = c_next;
        self.edges[c_next.index()].prev = t_prev;
        self.polygons[keep.index()].edge = c_prev;

        let plane = self.polygons[keep.index()].plane;
        if self.cycle_is_convex(c_prev) && self.cycle_is_coplanar(c_prev, &plane, epsilon_coplanar)
        {
            let cycle: Vec<HalfEdgeId> = self.edge_cycle(c_prev).collect();
            for e in cycle {
                self.edges[e.index()].polygon = keep;
            }
            self.edges[edge.index()].twin = None;
            self.edges[twin.index()].twin = None;
            self.polygons[retire.index()].active = false;
            return true;
        }

        self.edges[c_prev.index()].next = edge;
        self.edges[t_next.index()].prev = twin;
        self.edges[t_prev.index()].next = twin;
        self.edges[c_next.index()].prev = edge;
        self.polygons[keep.index()].edge = entry;
        false
    }

    /// Removes everything from the arena
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.weld.clear();
        self.edges.clear();
        self.polygons.clear();
    }
}

/// Iterator over one boundary cycle, see [`HalfEdgeMesh::edge_cycle`]
#[derive(Debug, Clone)]
pub struct EdgeCycle<'a> {
    mesh: &'a HalfEdgeMesh,
    start: HalfEdgeId,
    current: Option<HalfEdgeId>,
    remaining: usize,
}

impl Iterator for EdgeCycle<'_> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<HalfEdgeId> {
        let current = self.current?;
        if self.remaining == 0 {
            self.current = None;
            return None;
        }
        self.remaining -= 1;

        let next = self.mesh.next(current);
        self.current = (next != self.start).then_some(next);
        Some(current)
    }
}

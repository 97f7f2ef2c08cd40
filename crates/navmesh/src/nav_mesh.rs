//! Navigation mesh built from a polygon soup
//!
//! Construction links the shared edges of the input polygons, greedily merges
//! neighbors into larger convex regions (longest shared edge first) and builds a
//! directed adjacency graph with one node per region. Path queries run A* over
//! that graph and smooth the resulting region chain with a [`Corridor`].

use crate::config::NavMeshConfig;
use crate::corridor::Corridor;
use crate::half_edge::{HalfEdgeId, HalfEdgeMesh, PolygonId, VertexId};
use crate::region::Region;
use glam::Vec3;
use nav_common::{
    distance_point_segment_squared, normalize_or_unit_length, Aabb, Error, LineSegment, Plane,
    Ray, Result, TriMesh,
};
use nav_graph::{AStar, Graph, GraphSearch, NavEdge, NavNode};
use nav_spatial::{CellSpacePartitioning, SpatialIndexConfig};
use std::collections::HashMap;

/// Counters collected while building a [`NavMesh`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BuildStats {
    /// Polygons offered to the builder
    pub input_polygons: usize,
    /// Polygons rejected as malformed
    pub skipped_polygons: usize,
    /// Shared edges found between input polygons
    pub twin_pairs: usize,
    /// Merges that produced a convex, coplanar region
    pub merges_accepted: usize,
    /// Merges undone because the result was not convex or not coplanar
    pub merges_rejected: usize,
    /// Regions in the finished mesh
    pub regions: usize,
    /// Distinct vertices on portal edges
    pub portal_nodes: usize,
}

/// Result of [`NavMesh::clamp_movement`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamped {
    /// Position that stays on the mesh
    pub position: Vec3,
    /// Region containing `position`
    pub region: usize,
}

/// Convex regions, their adjacency graph and an optional spatial index
#[derive(Debug, Clone)]
pub struct NavMesh {
    config: NavMeshConfig,
    mesh: HalfEdgeMesh,
    /// Surviving polygons; the position in this list is the region index
    regions: Vec<PolygonId>,
    region_indices: HashMap<PolygonId, usize>,
    graph: Graph<NavNode, NavEdge>,
    spatial_index: Option<CellSpacePartitioning<usize>>,
    stats: BuildStats,
}

impl NavMesh {
    /// Builds a mesh from convex, coplanar, counter-clockwise contours
    ///
    /// Malformed contours are logged and skipped.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] for a bad configuration and [`Error::InvalidMesh`]
    /// if no contour survives validation.
    pub fn from_polygons<I, P>(polygons: I, config: NavMeshConfig) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[Vec3]>,
    {
        config.validate()?;

        let mut mesh = HalfEdgeMesh::new(config.weld_tolerance);
        let mut stats = BuildStats::default();

        for (i, contour) in polygons.into_iter().enumerate() {
            stats.input_polygons += 1;
            let points = contour.as_ref();
            let added = check_contour_plane(points, config.epsilon_coplanar)
                .and_then(|_| mesh.add_contour(points));
            if let Err(err) = added {
                log::warn!("Skipping polygon {}: {}", i, err);
                stats.skipped_polygons += 1;
            }
        }

        if mesh.polygon_count() == 0 {
            return Err(Error::InvalidMesh(format!(
                "none of the {} input polygons is usable",
                stats.input_polygons
            )));
        }

        let mut pairs = mesh.link_twins();
        stats.twin_pairs = pairs.len();

        if config.merge_convex_regions {
            // Longest shared edges first; the sort is stable so ties keep discovery order
            pairs.sort_by(|a, b| mesh.squared_length(*b).total_cmp(&mesh.squared_length(*a)));

            for edge in pairs {
                let Some(twin) = mesh.twin(edge) else {
                    continue;
                };
                let (keep, other) = (mesh.polygon_of(edge), mesh.polygon_of(twin));
                if keep == other || mesh.shared_edge_count(keep, other) > 1 {
                    continue;
                }

                if mesh.try_merge(edge, config.epsilon_coplanar) {
                    stats.merges_accepted += 1;
                } else {
                    stats.merges_rejected += 1;
                }
            }
        }

        let mut nav_mesh = Self {
            config,
            mesh,
            regions: Vec::new(),
            region_indices: HashMap::new(),
            graph: Graph::new_directed(),
            spatial_index: None,
            stats,
        };
        nav_mesh.collect_regions();
        nav_mesh.assign_node_indices();
        nav_mesh.build_graph();

        let stats = &nav_mesh.stats;
        log::debug!(
            "Built navigation mesh: {} input polygons, {} skipped, {} shared edges, {} merges ({} rejected), {} regions, {} portal nodes",
            stats.input_polygons,
            stats.skipped_polygons,
            stats.twin_pairs,
            stats.merges_accepted,
            stats.merges_rejected,
            stats.regions,
            stats.portal_nodes
        );

        Ok(nav_mesh)
    }

    /// Builds a mesh from flat triangle buffers
    ///
    /// `vertices` holds `[x, y, z]` triples. Without `indices` every three
    /// consecutive vertices form a triangle.
    pub fn from_triangles(
        vertices: &[f32],
        indices: Option<&[i32]>,
        config: NavMeshConfig,
    ) -> Result<Self> {
        let tri_mesh = TriMesh::from_buffers(vertices.to_vec(), indices.map(<[i32]>::to_vec))?;
        Self::from_tri_mesh(&tri_mesh, config)
    }

    /// Builds a mesh with one input polygon per triangle of `tri_mesh`
    pub fn from_tri_mesh(tri_mesh: &TriMesh, config: NavMeshConfig) -> Result<Self> {
        Self::from_polygons(tri_mesh.triangles(), config)
    }

    fn collect_regions(&mut self) {
        self.regions = self.mesh.active_polygons().collect();
        self.region_indices = self
            .regions
            .iter()
            .enumerate()
            .map(|(i, &p)| (p, i))
            .collect();

        for &polygon in &self.regions {
            self.mesh.update_centroid(polygon);
        }
        self.stats.regions = self.regions.len();
    }

    /// Gives every distinct vertex on a portal edge one shared node index
    fn assign_node_indices(&mut self) {
        let mut nodes: HashMap<VertexId, usize> = HashMap::new();

        for &polygon in &self.regions {
            let portals: Vec<HalfEdgeId> = self
                .mesh
                .polygon_edges(polygon)
                .filter(|&e| self.mesh.twin(e).is_some())
                .collect();

            for edge in portals {
                for vertex in [self.mesh.origin(edge), self.mesh.destination(edge)] {
                    let next = nodes.len();
                    nodes.entry(vertex).or_insert(next);
                }
                let node = nodes[&self.mesh.origin(edge)];
                self.mesh.set_node_index(edge, node);
            }
        }

        self.stats.portal_nodes = nodes.len();
    }

    fn build_graph(&mut self) {
        let mut graph: Graph<NavNode, NavEdge> = Graph::new_directed();

        for (i, &polygon) in self.regions.iter().enumerate() {
            graph.add_node(NavNode::new(i, self.mesh.polygon(polygon).centroid));
        }

        for (i, &polygon) in self.regions.iter().enumerate() {
            for edge in self.mesh.polygon_edges(polygon) {
                let Some(twin) = self.mesh.twin(edge) else {
                    continue;
                };
                let Some(&j) = self.region_indices.get(&self.mesh.polygon_of(twin)) else {
                    continue;
                };
                if graph.has_edge(i, j) {
                    continue;
                }

                let cost = self
                    .mesh
                    .polygon(polygon)
                    .centroid
                    .distance(self.mesh.polygon(self.regions[j]).centroid);
                graph.add_edge(NavEdge::new(i, j, cost));
            }
        }

        self.graph = graph;
    }

    pub fn config(&self) -> &NavMeshConfig {
        &self.config
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Region adjacency graph; node `i` is region `i`
    pub fn graph(&self) -> &Graph<NavNode, NavEdge> {
        &self.graph
    }

    /// Underlying half-edge arena
    pub fn half_edges(&self) -> &HalfEdgeMesh {
        &self.mesh
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn region(&self, index: usize) -> Option<Region<'_>> {
        self.regions
            .get(index)
            .map(|&polygon| Region::new(&self.mesh, polygon))
    }

    /// Regions in index order
    pub fn regions(&self) -> impl Iterator<Item = Region<'_>> + '_ {
        self.regions
            .iter()
            .map(move |&polygon| Region::new(&self.mesh, polygon))
    }

    /// Region index (and graph node) of a surviving polygon
    pub fn node_index(&self, polygon: PolygonId) -> Option<usize> {
        self.region_indices.get(&polygon).copied()
    }

    /// Number of distinct vertices shared across portal edges
    pub fn portal_node_count(&self) -> usize {
        self.stats.portal_nodes
    }

    /// Bounds of every region vertex
    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for region in self.regions() {
            for point in region.contour() {
                bounds.expand_by_point(&point);
            }
        }
        bounds
    }

    fn region_contains(&self, index: usize, point: &Vec3, epsilon: f32) -> bool {
        self.region(index)
            .is_some_and(|region| region.contains(point, epsilon))
    }

    /// Index of the first region containing `point`
    ///
    /// With a spatial index attached only the regions bucketed into the point's
    /// cell are tested. Points outside the indexed volume, and epsilons wider
    /// than the one the index was filled with, fall back to testing every region.
    pub fn region_for_point(&self, point: &Vec3, epsilon: f32) -> Option<usize> {
        if let Some(index) = &self.spatial_index {
            if epsilon <= self.config.epsilon_contains && index.bounds().contains_point(point) {
                let cell = index.cell(index.index_for_position(point))?;
                return cell
                    .entries()
                    .iter()
                    .copied()
                    .filter(|&i| self.region_contains(i, point, epsilon))
                    .min();
            }
        }

        (0..self.regions.len()).find(|&i| self.region_contains(i, point, epsilon))
    }

    /// Region whose centroid is nearest to `point`
    pub fn closest_region(&self, point: &Vec3) -> Option<usize> {
        self.regions()
            .enumerate()
            .map(|(i, region)| (i, region.centroid().distance_squared(*point)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Nearest region hit by `ray`, with the hit point
    pub fn region_for_ray(&self, ray: &Ray) -> Option<(usize, Vec3)> {
        let epsilon = self.config.epsilon_contains;

        self.regions()
            .enumerate()
            .filter_map(|(i, region)| {
                ray.intersect_aabb(&region.aabb())?;
                let t = ray.intersect_plane(region.plane())?;
                let hit = ray.at(t);
                region.contains(&hit, epsilon).then_some((i, t, hit))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _, hit)| (i, hit))
    }

    /// Picks a region uniformly using `rand`, which yields values in `[0, 1)`
    pub fn random_region_with<F: FnMut() -> f32>(&self, mut rand: F) -> Option<usize> {
        if self.regions.is_empty() {
            return None;
        }

        let count = self.regions.len();
        let index = (rand().clamp(0.0, 1.0) * count as f32) as usize;
        Some(index.min(count - 1))
    }

    fn resolve_region(&self, point: &Vec3, role: &str) -> Option<usize> {
        self.region_for_point(point, self.config.epsilon_contains)
            .or_else(|| {
                let closest = self.closest_region(point);
                if let Some(region) = closest {
                    log::warn!(
                        "Path {} {:?} is off the mesh, using closest region {}",
                        role,
                        point,
                        region
                    );
                }
                closest
            })
    }

    /// Smoothed waypoints from `from` to `to`
    ///
    /// Points off the mesh are attributed to the region with the nearest
    /// centroid. Two points in one region give `[from, to]`. The result is
    /// empty only if the regions are not connected.
    pub fn find_path(&self, from: Vec3, to: Vec3) -> Vec<Vec3> {
        let (Some(from_region), Some(to_region)) = (
            self.resolve_region(&from, "start"),
            self.resolve_region(&to, "end"),
        ) else {
            return Vec::new();
        };

        if from_region == to_region {
            return vec![from, to];
        }

        let mut astar = AStar::new(&self.graph, from_region, to_region);
        if !astar.search() {
            log::debug!(
                "No route between regions {} and {}",
                from_region,
                to_region
            );
            return Vec::new();
        }

        let mut corridor = Corridor::new();
        corridor.push(from, from);
        for pair in astar.path().windows(2) {
            let portal = self
                .region(pair[0])
                .and_then(|region| region.portal_edge_to(self.regions[pair[1]]));
            if let Some((left, right)) = portal {
                corridor.push(left, right);
            }
        }
        corridor.push(to, to);

        corridor.generate()
    }

    /// Keeps a movement from `start` to `end` on the mesh
    ///
    /// If `end` is on the mesh it is returned as is. Otherwise the movement is
    /// projected onto the direction of the border edge of `current_region`
    /// closest to `end`; the projection is used while it stays within the
    /// edge's extent and on the mesh, and the agent stays at `start` otherwise.
    /// A projected position is snapped onto its region's plane.
    ///
    /// # Errors
    ///
    /// [`Error::NoCurrentRegion`] if `end` is off the mesh and `current_region`
    /// is `None` or not a region of this mesh.
    pub fn clamp_movement(
        &self,
        current_region: Option<usize>,
        start: Vec3,
        end: Vec3,
    ) -> Result<Clamped> {
        let epsilon = self.config.epsilon_contains;

        if let Some(region) = self.region_for_point(&end, epsilon) {
            return Ok(Clamped {
                position: end,
                region,
            });
        }

        let (current, region) = current_region
            .and_then(|i| self.region(i).map(|region| (i, region)))
            .ok_or(Error::NoCurrentRegion)?;

        let stay = Clamped {
            position: start,
            region: current,
        };

        let closest = region
            .border_edges()
            .map(|e| self.mesh.endpoints(e))
            .min_by(|a, b| {
                distance_point_segment_squared(&end, &a.0, &a.1)
                    .total_cmp(&distance_point_segment_squared(&end, &b.0, &b.1))
            });
        let Some((from, to)) = closest else {
            return Ok(stay);
        };

        let direction = normalize_or_unit_length(&(to - from));
        let projected = start + direction * (end - start).dot(direction);

        let t = LineSegment::new(from, to).closest_point_to_point_parameter(&projected, false);
        if !(0.0..=1.0).contains(&t) {
            return Ok(stay);
        }

        match self.region_for_point(&projected, epsilon) {
            Some(index) => {
                let plane = self.region(index).map_or(region.plane(), |r| r.plane());
                Ok(Clamped {
                    position: plane.snap_height(&projected),
                    region: index,
                })
            }
            None => Ok(stay),
        }
    }

    /// Attaches a spatial index over the regions, replacing any previous one
    pub fn build_spatial_index(&mut self, config: SpatialIndexConfig) -> Result<()> {
        self.spatial_index = Some(CellSpacePartitioning::new(config)?);
        self.update_spatial_index();
        Ok(())
    }

    /// Re-buckets every region into the attached spatial index
    ///
    /// Each region's box is grown along Y by the height a point may sit above or
    /// below the region's plane and still be contained.
    pub fn update_spatial_index(&mut self) {
        let Some(mut index) = self.spatial_index.take() else {
            return;
        };

        index.make_empty();
        for (i, region) in self.regions().enumerate() {
            let mut aabb = region.aabb();
            let margin = containment_height(region.plane(), self.config.epsilon_contains);
            aabb.min.y -= margin;
            aabb.max.y += margin;
            index.add_aabb(i, &aabb);
        }
        self.spatial_index = Some(index);
    }

    pub fn spatial_index(&self) -> Option<&CellSpacePartitioning<usize>> {
        self.spatial_index.as_ref()
    }

    /// Detaches and returns the spatial index
    pub fn take_spatial_index(&mut self) -> Option<CellSpacePartitioning<usize>> {
        self.spatial_index.take()
    }

    /// Removes all regions, the graph and the spatial index
    pub fn clear(&mut self) {
        self.mesh.clear();
        self.regions.clear();
        self.region_indices.clear();
        self.graph.clear();
        self.spatial_index = None;
        self.stats = BuildStats::default();
    }
}

/// Vertical offset from `plane` at which a point is `epsilon` away from it
fn containment_height(plane: &Plane, epsilon: f32) -> f32 {
    let slope = plane.normal.y.abs();
    if slope < 1.0e-6 {
        return f32::INFINITY;
    }
    epsilon / slope
}

/// Rejects contours whose points stray from the plane of their first three points
fn check_contour_plane(points: &[Vec3], epsilon: f32) -> Result<()> {
    if points.len() < 3 {
        return Ok(());
    }

    let plane = Plane::from_coplanar_points(&points[0], &points[1], &points[2]);
    if plane.is_degenerate() {
        return Ok(());
    }

    match points
        .iter()
        .position(|p| plane.distance_to_point(p).abs() > epsilon)
    {
        Some(i) => Err(Error::InvalidPolygon(format!(
            "point {} is off the contour's plane",
            i
        ))),
        None => Ok(()),
    }
}

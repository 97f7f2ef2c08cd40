//! Convex-region navigation meshes
//!
//! A [`NavMesh`] is built from a soup of convex polygons (or triangles). Shared
//! edges are linked through a half-edge structure, neighbors are greedily merged
//! into larger convex regions, and the region adjacency becomes a directed
//! [`nav_graph::Graph`]. Paths are routed with A* and smoothed by pulling a
//! string through the portals between consecutive regions.
//!
//! ```
//! use glam::Vec3;
//! use navmesh::{NavMesh, NavMeshConfig};
//!
//! # fn main() -> nav_common::Result<()> {
//! let squares = [
//!     [Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0)],
//!     [Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 1.0), Vec3::new(2.0, 0.0, 1.0), Vec3::new(2.0, 0.0, 0.0)],
//! ];
//! let nav_mesh = NavMesh::from_polygons(squares, NavMeshConfig::default())?;
//! assert_eq!(nav_mesh.region_count(), 1);
//!
//! let path = nav_mesh.find_path(Vec3::new(0.5, 0.0, 0.5), Vec3::new(1.5, 0.0, 0.5));
//! assert_eq!(path.len(), 2);
//! # Ok(())
//! # }
//! ```

mod config;
mod corridor;
mod half_edge;
mod nav_mesh;
mod region;

#[cfg(test)]
mod test_mesh_helpers;

pub use config::NavMeshConfig;
pub use corridor::{Corridor, PortalEdge};
pub use half_edge::{EdgeCycle, HalfEdge, HalfEdgeId, HalfEdgeMesh, Polygon, PolygonId, VertexId};
pub use nav_mesh::{BuildStats, Clamped, NavMesh};
pub use region::Region;

pub use nav_common::{Error, Result};

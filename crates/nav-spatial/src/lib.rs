//! Uniform grid spatial index
//!
//! [`CellSpacePartitioning`] speeds up "what is near this point" queries for
//! navigation regions and for moving entities. It is independent of the mesh; a
//! navigation mesh attaches one to narrow its point-in-region tests.

mod cell;
mod config;
mod partitioning;

pub use cell::Cell;
pub use config::SpatialIndexConfig;
pub use partitioning::CellSpacePartitioning;

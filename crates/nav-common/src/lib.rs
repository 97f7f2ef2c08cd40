//! Common utilities and data structures shared by the navigation crates
//!
//! Geometry helpers work on the XZ plane with Y up, matching the convention used
//! by the navigation mesh: a polygon is counter-clockwise when every consecutive
//! triple of its boundary has a non-negative [`tri_area_2d`].

mod geometry;
mod math;
mod mesh;
mod shapes;
mod vector;

pub use geometry::*;
pub use math::*;
pub use mesh::*;
pub use shapes::*;
pub use vector::*;

/// Represents a 3D position
pub type Vec3 = glam::Vec3;

/// Error types for the navigation crates
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid input mesh: {0}")]
    InvalidMesh(String),

    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("degenerate polygon: {0}")]
    DegeneratePolygon(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no current region to clamp an off-mesh movement against")]
    NoCurrentRegion,

    #[cfg(feature = "std")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, Error>;

//! Configuration for navigation mesh construction and queries

use nav_common::{Error, Result};

/// Tolerances and switches used when building and querying a [`NavMesh`](crate::NavMesh)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct NavMeshConfig {
    /// Maximum distance of a vertex from its region's plane when merging regions
    pub epsilon_coplanar: f32,
    /// Maximum distance of a point from a region's plane to count as inside it
    pub epsilon_contains: f32,
    /// Whether adjacent regions are merged into larger convex regions
    pub merge_convex_regions: bool,
    /// Positions closer than this share one mesh vertex
    pub weld_tolerance: f32,
}

impl Default for NavMeshConfig {
    fn default() -> Self {
        Self {
            epsilon_coplanar: 1.0e-3,
            epsilon_contains: 1.0,
            merge_convex_regions: true,
            weld_tolerance: 1.0e-4,
        }
    }
}

impl NavMeshConfig {
    /// Creates a new NavMeshConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.epsilon_coplanar.is_finite() || self.epsilon_coplanar < 0.0 {
            return Err(Error::InvalidConfig(
                "epsilon_coplanar must be a non-negative number".to_string(),
            ));
        }

        if !self.epsilon_contains.is_finite() || self.epsilon_contains < 0.0 {
            return Err(Error::InvalidConfig(
                "epsilon_contains must be a non-negative number".to_string(),
            ));
        }

        if !self.weld_tolerance.is_finite() || self.weld_tolerance < 0.0 {
            return Err(Error::InvalidConfig(
                "weld_tolerance must be a non-negative number".to_string(),
            ));
        }

        Ok(())
    }
}

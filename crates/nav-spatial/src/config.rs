//! Configuration for the uniform grid spatial index

use glam::Vec3;
use nav_common::{Aabb, Error, Result};

/// Dimensions and resolution of a [`CellSpacePartitioning`](crate::CellSpacePartitioning)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SpatialIndexConfig {
    /// Extent of the indexed volume along the x-axis
    pub width: f32,
    /// Extent of the indexed volume along the y-axis
    pub height: f32,
    /// Extent of the indexed volume along the z-axis
    pub depth: f32,

    /// Number of cells along the x-axis
    pub cells_x: usize,
    /// Number of cells along the y-axis
    pub cells_y: usize,
    /// Number of cells along the z-axis
    pub cells_z: usize,

    /// Center of the indexed volume
    pub center: Vec3,
}

impl Default for SpatialIndexConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            depth: 100.0,
            cells_x: 10,
            cells_y: 1,
            cells_z: 10,
            center: Vec3::ZERO,
        }
    }
}

impl SpatialIndexConfig {
    /// Creates a config for a volume centered on the origin
    pub fn new(width: f32, height: f32, depth: f32, cells_x: usize, cells_y: usize, cells_z: usize) -> Self {
        Self {
            width,
            height,
            depth,
            cells_x,
            cells_y,
            cells_z,
            center: Vec3::ZERO,
        }
    }

    /// Sets the center of the indexed volume
    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    /// Fits the volume to `bounds`, keeping the cell counts
    ///
    /// Flat axes get a unit extent so every point of `bounds` stays indexable.
    pub fn fit_to_bounds(mut self, bounds: &Aabb) -> Self {
        let size = bounds.size().max(Vec3::ONE);
        self.width = size.x;
        self.height = size.y;
        self.depth = size.z;
        self.center = bounds.center();
        self
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.cells_x * self.cells_y * self.cells_z
    }

    /// Size of a single cell
    pub fn cell_size(&self) -> Vec3 {
        Vec3::new(
            self.width / self.cells_x as f32,
            self.height / self.cells_y as f32,
            self.depth / self.cells_z as f32,
        )
    }

    /// Validates the configuration parameters
    pub fn validate(&self) -> Result<()> {
        let extents = [self.width, self.height, self.depth];
        if extents.iter().any(|e| !e.is_finite() || *e <= 0.0) {
            return Err(Error::InvalidConfig(
                "Spatial index extents must be positive".to_string(),
            ));
        }

        if self.cells_x == 0 || self.cells_y == 0 || self.cells_z == 0 {
            return Err(Error::InvalidConfig(
                "Spatial index needs at least one cell per axis".to_string(),
            ));
        }

        if !self.center.is_finite() {
            return Err(Error::InvalidConfig(
                "Spatial index center must be finite".to_string(),
            ));
        }

        Ok(())
    }
}

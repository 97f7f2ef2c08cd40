//! Uniform grid spatial index
//!
//! The indexed volume is split into `cells_x * cells_y * cells_z` boxes. Moving
//! entities live in exactly one cell (the one containing their position), while
//! polygons are bucketed into every cell their bounding box touches. Queries are
//! conservative: they return every entry of every cell a query box touches, so
//! callers re-test exact distances or containment.

use crate::cell::Cell;
use crate::config::SpatialIndexConfig;
use glam::Vec3;
use nav_common::{Aabb, BoundingSphere, Result};
use std::collections::HashSet;
use std::hash::Hash;

/// Fixed grid of [`Cell`]s over a box of world space
#[derive(Debug, Clone)]
pub struct CellSpacePartitioning<T> {
    config: SpatialIndexConfig,
    bounds: Aabb,
    cells: Vec<Cell<T>>,
}

impl<T: Copy + Eq + Hash> CellSpacePartitioning<T> {
    /// Creates the grid; cell geometry is fixed for the lifetime of the index
    pub fn new(config: SpatialIndexConfig) -> Result<Self> {
        config.validate()?;

        let size = Vec3::new(config.width, config.height, config.depth);
        let bounds = Aabb::new(config.center - size * 0.5, config.center + size * 0.5);
        let cell_size = config.cell_size();

        // x-major, then y, then z; matches index_for_position
        let mut cells = Vec::with_capacity(config.cell_count());
        for x in 0..config.cells_x {
            for y in 0..config.cells_y {
                for z in 0..config.cells_z {
                    let min = bounds.min + cell_size * Vec3::new(x as f32, y as f32, z as f32);
                    cells.push(Cell::new(Aabb::new(min, min + cell_size)));
                }
            }
        }

        log::debug!(
            "Created spatial index: {}x{}x{} cells over {:?}",
            config.cells_x,
            config.cells_y,
            config.cells_z,
            bounds
        );

        Ok(Self {
            config,
            bounds,
            cells,
        })
    }

    pub fn config(&self) -> &SpatialIndexConfig {
        &self.config
    }

    /// Bounds of the whole indexed volume
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn cells(&self) -> &[Cell<T>] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell<T>> {
        self.cells.get(index)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Index of the cell containing `position`
    ///
    /// Positions outside the volume are clamped onto it first, so every position
    /// maps to some cell.
    pub fn index_for_position(&self, position: &Vec3) -> usize {
        let p = self.bounds.clamp_point(position);
        let c = &self.config;

        let axis = |value: f32, min: f32, extent: f32, count: usize| -> usize {
            let i = (count as f32 * (value - min) / extent).floor() as usize;
            i.min(count - 1)
        };

        let x = axis(p.x, self.bounds.min.x, c.width, c.cells_x);
        let y = axis(p.y, self.bounds.min.y, c.height, c.cells_y);
        let z = axis(p.z, self.bounds.min.z, c.depth, c.cells_z);

        x * c.cells_y * c.cells_z + y * c.cells_z + z
    }

    /// Adds an entity to the cell containing `position` and returns that cell's index
    pub fn add_entity(&mut self, entry: T, position: &Vec3) -> usize {
        let index = self.index_for_position(position);
        self.cells[index].add(entry);
        index
    }

    /// Removes an entity from the cell containing `position`
    pub fn remove_entity(&mut self, entry: T, position: &Vec3) -> bool {
        let index = self.index_for_position(position);
        self.cells[index].remove(entry)
    }

    /// Moves an entity to the cell containing its new `position`
    ///
    /// `previous` is the index returned by the last add or update, or `None` if
    /// the entity is not in the grid yet. The membership only changes when the
    /// cell index does. Returns the entity's current cell index.
    pub fn update_entity(&mut self, entry: T, position: &Vec3, previous: Option<usize>) -> usize {
        let index = self.index_for_position(position);
        if previous != Some(index) {
            self.cells[index].add(entry);
            if let Some(cell) = previous.and_then(|i| self.cells.get_mut(i)) {
                cell.remove(entry);
            }
        }
        index
    }

    /// Collects the entries near a sphere into `result` and returns how many were found
    ///
    /// The sphere is approximated by its bounding box; every entry of each
    /// non-empty cell intersecting that box is reported once.
    pub fn query(&self, position: &Vec3, radius: f32, result: &mut Vec<T>) -> usize {
        result.clear();

        let query_box = BoundingSphere::new(*position, radius).aabb();
        let mut seen = HashSet::new();

        for cell in &self.cells {
            if cell.is_empty() || !cell.aabb.intersects_aabb(&query_box) {
                continue;
            }
            for &entry in cell.entries() {
                if seen.insert(entry) {
                    result.push(entry);
                }
            }
        }

        result.len()
    }

    /// Buckets a polygon into every cell its bounding box intersects
    pub fn add_polygon(&mut self, entry: T, contour: &[Vec3]) {
        self.add_aabb(entry, &Aabb::from_points(contour));
    }

    /// Buckets an entry into every cell `aabb` intersects; empty boxes are ignored
    pub fn add_aabb(&mut self, entry: T, aabb: &Aabb) {
        if aabb.is_empty() {
            return;
        }

        for cell in &mut self.cells {
            if cell.aabb.intersects_aabb(aabb) {
                cell.add(entry);
            }
        }
    }

    /// Removes every entry from every cell
    pub fn make_empty(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> CellSpacePartitioning<usize> {
        CellSpacePartitioning::new(SpatialIndexConfig::new(100.0, 20.0, 100.0, 10, 2, 10)).unwrap()
    }

    #[test]
    fn test_cell_layout() {
        let partition = grid();

        assert_eq!(partition.cell_count(), 200);
        let first = partition.cell(0).unwrap();
        assert_eq!(first.aabb.min, Vec3::new(-50.0, -10.0, -50.0));
        assert_eq!(first.aabb.max, Vec3::new(-40.0, 0.0, -40.0));

        // z varies fastest, then y, then x
        let next_z = partition.cell(1).unwrap();
        assert_eq!(next_z.aabb.min, Vec3::new(-50.0, -10.0, -40.0));
        let next_y = partition.cell(10).unwrap();
        assert_eq!(next_y.aabb.min, Vec3::new(-50.0, 0.0, -50.0));
        let next_x = partition.cell(20).unwrap();
        assert_eq!(next_x.aabb.min, Vec3::new(-40.0, -10.0, -50.0));
    }

    #[test]
    fn test_index_for_position() {
        let partition = grid();

        assert_eq!(partition.index_for_position(&Vec3::new(-50.0, -10.0, -50.0)), 0);
        assert_eq!(partition.index_for_position(&Vec3::new(-45.0, 5.0, -35.0)), 11);
        // Max corner and anything beyond clamp into the last cell
        assert_eq!(partition.index_for_position(&Vec3::new(50.0, 10.0, 50.0)), 199);
        assert_eq!(partition.index_for_position(&Vec3::splat(1000.0)), 199);
        assert_eq!(partition.index_for_position(&Vec3::splat(-1000.0)), 0);
    }

    #[test]
    fn test_offset_center() {
        let config = SpatialIndexConfig::new(10.0, 10.0, 10.0, 2, 1, 2).with_center(Vec3::splat(5.0));
        let partition: CellSpacePartitioning<usize> = CellSpacePartitioning::new(config).unwrap();

        assert_eq!(partition.bounds().min, Vec3::ZERO);
        assert_eq!(partition.index_for_position(&Vec3::new(1.0, 1.0, 1.0)), 0);
        assert_eq!(partition.index_for_position(&Vec3::new(9.0, 1.0, 9.0)), 3);
    }

    #[test]
    fn test_invalid_config() {
        let config = SpatialIndexConfig::new(10.0, 10.0, 10.0, 0, 1, 1);
        assert!(CellSpacePartitioning::<usize>::new(config).is_err());
    }

    #[test]
    fn test_update_entity_moves_between_cells() {
        let mut partition = grid();
        let start = Vec3::new(-45.0, 0.0, -45.0);

        let index = partition.add_entity(1, &start);
        assert!(partition.cell(index).unwrap().contains(1));

        // Same cell: nothing changes
        let same = partition.update_entity(1, &Vec3::new(-44.0, 0.0, -44.0), Some(index));
        assert_eq!(same, index);
        assert_eq!(partition.cell(index).unwrap().entries(), &[1]);

        let moved = partition.update_entity(1, &Vec3::new(25.0, 0.0, 25.0), Some(index));
        assert_ne!(moved, index);
        assert!(partition.cell(index).unwrap().is_empty());
        assert!(partition.cell(moved).unwrap().contains(1));

        assert!(partition.remove_entity(1, &Vec3::new(25.0, 0.0, 25.0)));
        assert!(partition.cell(moved).unwrap().is_empty());
    }

    #[test]
    fn test_update_entity_without_previous_cell() {
        let mut partition = grid();
        let index = partition.update_entity(4, &Vec3::ZERO, None);
        assert!(partition.cell(index).unwrap().contains(4));
    }

    #[test]
    fn test_query_with_zero_radius_covers_every_position() {
        let mut partition = grid();
        let mut result = Vec::new();

        let positions: Vec<Vec3> = (0..=20)
            .flat_map(|i| (0..=4).map(move |j| (i, j)))
            .map(|(i, j)| Vec3::new(i as f32 * 5.0 - 50.0, j as f32 * 5.0 - 10.0, 50.0 - i as f32 * 5.0))
            .collect();

        for (id, position) in positions.iter().enumerate() {
            partition.add_entity(id, position);
        }
        for (id, position) in positions.iter().enumerate() {
            partition.query(position, 0.0, &mut result);
            assert!(result.contains(&id), "entity {} missing at {:?}", id, position);
        }
    }

    #[test]
    fn test_query_radius() {
        let mut partition = grid();
        partition.add_entity(1, &Vec3::new(-45.0, 0.0, -45.0));
        partition.add_entity(2, &Vec3::new(45.0, 0.0, 45.0));

        let mut result = Vec::new();
        assert_eq!(partition.query(&Vec3::new(-42.0, 0.0, -42.0), 2.0, &mut result), 1);
        assert_eq!(result, vec![1]);

        assert_eq!(partition.query(&Vec3::ZERO, 100.0, &mut result), 2);
    }

    #[test]
    fn test_add_polygon_spans_cells_without_duplicates() {
        let mut partition = grid();
        let contour = [
            Vec3::new(-15.0, 0.0, -15.0),
            Vec3::new(-15.0, 0.0, 15.0),
            Vec3::new(15.0, 0.0, 15.0),
        ];
        partition.add_polygon(9, &contour);

        let occupied = partition.cells().iter().filter(|c| c.contains(9)).count();
        assert!(occupied >= 16);

        let mut result = Vec::new();
        assert_eq!(partition.query(&Vec3::ZERO, 30.0, &mut result), 1);

        partition.make_empty();
        assert_eq!(partition.query(&Vec3::ZERO, 30.0, &mut result), 0);
    }

    #[test]
    fn test_add_aabb_spans_vertical_cells() {
        let mut partition = grid();
        // A flat box at y = 3 only reaches the upper layer
        let flat = Aabb::new(Vec3::new(-45.0, 3.0, -45.0), Vec3::new(-44.0, 3.0, -44.0));
        partition.add_aabb(1, &flat);
        assert!(!partition.cell(partition.index_for_position(&Vec3::new(-45.0, -5.0, -45.0))).unwrap().contains(1));

        let grown = Aabb::new(Vec3::new(-45.0, -7.0, -45.0), Vec3::new(-44.0, 3.0, -44.0));
        partition.add_aabb(2, &grown);
        assert!(partition.cell(partition.index_for_position(&Vec3::new(-45.0, -5.0, -45.0))).unwrap().contains(2));
        assert!(partition.cell(partition.index_for_position(&Vec3::new(-45.0, 3.0, -45.0))).unwrap().contains(2));

        partition.add_aabb(3, &Aabb::empty());
        assert!(partition.cells().iter().all(|c| !c.contains(3)));
    }
}

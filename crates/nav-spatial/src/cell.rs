use nav_common::Aabb;

/// One box of the grid and the entries bucketed into it
#[derive(Debug, Clone)]
pub struct Cell<T> {
    pub aabb: Aabb,
    entries: Vec<T>,
}

impl<T: Copy + PartialEq> Cell<T> {
    pub fn new(aabb: Aabb) -> Self {
        Self {
            aabb,
            entries: Vec::new(),
        }
    }

    /// Adds an entry; returns false if it was already present
    pub fn add(&mut self, entry: T) -> bool {
        if self.contains(entry) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Removes an entry; returns false if it was not present
    pub fn remove(&mut self, entry: T) -> bool {
        if let Some(pos) = self.entries.iter().position(|e| *e == entry) {
            self.entries.swap_remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, entry: T) -> bool {
        self.entries.contains(&entry)
    }

    /// Entries in no particular order
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_membership() {
        let mut cell = Cell::new(Aabb::new(Vec3::ZERO, Vec3::ONE));

        assert!(cell.add(3usize));
        assert!(!cell.add(3));
        assert!(cell.add(7));
        assert_eq!(cell.entries().len(), 2);

        assert!(cell.remove(3));
        assert!(!cell.remove(3));
        assert_eq!(cell.entries(), &[7]);

        cell.clear();
        assert!(cell.is_empty());
    }
}

//! Binary min-heap ordered by a caller-supplied comparator

use std::cmp::Ordering;
use std::fmt;

/// Binary heap whose top is the smallest element according to `compare`
///
/// `push` and `pop` are O(log n), `peek` is O(1).
pub struct PriorityQueue<T, F = fn(&T, &T) -> Ordering>
where
    F: Fn(&T, &T) -> Ordering,
{
    heap: Vec<T>,
    compare: F,
}

impl<T: Ord> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new(T::cmp)
    }
}

impl<T, F> PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// Creates an empty queue
    pub fn new(compare: F) -> Self {
        Self {
            heap: Vec::new(),
            compare,
        }
    }

    /// Adds an item
    pub fn push(&mut self, item: T) {
        self.heap.push(item);
        self.bubble_up(self.heap.len() - 1);
    }

    /// Removes and returns the smallest item
    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }

        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let top = self.heap.pop();

        if !self.heap.is_empty() {
            self.trickle_down(0);
        }

        top
    }

    /// Smallest item without removing it
    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    fn bubble_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if (self.compare)(&self.heap[i], &self.heap[parent]) != Ordering::Less {
                break;
            }

            self.heap.swap(i, parent);
            i = parent;
        }
    }

    fn trickle_down(&mut self, mut i: usize) {
        let size = self.heap.len();

        loop {
            let child1 = 2 * i + 1;
            if child1 >= size {
                break;
            }

            let child2 = child1 + 1;
            let mut min_child = child1;
            if child2 < size
                && (self.compare)(&self.heap[child2], &self.heap[child1]) == Ordering::Less
            {
                min_child = child2;
            }

            if (self.compare)(&self.heap[min_child], &self.heap[i]) != Ordering::Less {
                break;
            }

            self.heap.swap(i, min_child);
            i = min_child;
        }
    }
}

impl<T: fmt::Debug, F> fmt::Debug for PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("heap", &self.heap)
            .finish()
    }
}

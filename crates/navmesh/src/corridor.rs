//! Portal corridor and funnel path smoothing
//!
//! A corridor is the chain of edges an agent crosses when walking a region path.
//! [`Corridor::generate`] pulls a string through those portals: it keeps a funnel
//! made of an apex and the tightest left and right portal points seen so far,
//! narrows it while new portals stay inside, and emits a corner whenever one
//! side would cross the other.

use glam::Vec3;
use nav_common::tri_area_2d;

/// Gate between two consecutive regions, as seen walking through it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortalEdge {
    pub left: Vec3,
    pub right: Vec3,
}

/// Ordered sequence of portals from start to end
#[derive(Debug, Clone, Default)]
pub struct Corridor {
    portal_edges: Vec<PortalEdge>,
}

impl Corridor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a portal; start and end points are pushed as `(point, point)`
    pub fn push(&mut self, left: Vec3, right: Vec3) {
        self.portal_edges.push(PortalEdge { left, right });
    }

    pub fn portal_edges(&self) -> &[PortalEdge] {
        &self.portal_edges
    }

    pub fn len(&self) -> usize {
        self.portal_edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portal_edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.portal_edges.clear();
    }

    /// Computes the taut path through every portal
    ///
    /// The path starts at the first portal's left point and always ends at the
    /// last portal's left point. An empty corridor gives an empty path.
    pub fn generate(&self) -> Vec<Vec3> {
        let portals = &self.portal_edges;
        let mut path = Vec::new();
        let Some(first) = portals.first() else {
            return path;
        };

        let mut apex = first.left;
        let mut portal_left = first.left;
        let mut portal_right = first.right;
        let mut left_index = 0;
        let mut right_index = 0;

        path.push(apex);

        let mut i = 1;
        while i < portals.len() {
            let PortalEdge { left, right } = portals[i];

            // Right side
            if tri_area_2d(&apex, &portal_right, &right) <= 0.0 {
                if apex == portal_right || tri_area_2d(&apex, &portal_left, &right) > 0.0 {
                    portal_right = right;
                    right_index = i;
                } else {
                    // Right crossed over left: the left point becomes a corner
                    push_corner(&mut path, portal_left);
                    let apex_index = left_index;
                    apex = portal_left;
                    portal_left = apex;
                    portal_right = apex;
                    right_index = apex_index;
                    i = apex_index + 1;
                    continue;
                }
            }

            // Left side
            if tri_area_2d(&apex, &portal_left, &left) >= 0.0 {
                if apex == portal_left || tri_area_2d(&apex, &portal_right, &left) < 0.0 {
                    portal_left = left;
                    left_index = i;
                } else {
                    push_corner(&mut path, portal_right);
                    let apex_index = right_index;
                    apex = portal_right;
                    portal_left = apex;
                    portal_right = apex;
                    left_index = apex_index;
                    i = apex_index + 1;
                    continue;
                }
            }

            i += 1;
        }

        if let Some(last) = portals.last() {
            if path.last() != Some(&last.left) {
                path.push(last.left);
            }
        }

        path
    }
}

fn push_corner(path: &mut Vec<Vec3>, corner: Vec3) {
    if path.last() != Some(&corner) {
        path.push(corner);
    }
}

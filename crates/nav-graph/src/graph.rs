//! Sparse weighted graph keyed by integer node indices

use glam::Vec3;
use std::collections::BTreeMap;

/// A vertex of a [`Graph`]
pub trait Node: Clone {
    /// Index of the node, unique within its graph
    fn index(&self) -> usize;
}

/// Nodes that have a location in space, required by heuristic searches
pub trait Positioned {
    fn position(&self) -> Vec3;
}

/// A directed, weighted connection between two nodes
pub trait Edge: Clone {
    fn from(&self) -> usize;
    fn to(&self) -> usize;
    fn cost(&self) -> f32;

    /// The same connection traversed in the opposite direction
    fn reversed(&self) -> Self;
}

/// Node of a navigation graph
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct NavNode {
    pub index: usize,
    pub position: Vec3,
}

impl NavNode {
    pub fn new(index: usize, position: Vec3) -> Self {
        Self { index, position }
    }
}

impl Node for NavNode {
    fn index(&self) -> usize {
        self.index
    }
}

impl Positioned for NavNode {
    fn position(&self) -> Vec3 {
        self.position
    }
}

/// Edge of a navigation graph
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct NavEdge {
    pub from: usize,
    pub to: usize,
    pub cost: f32,
}

impl NavEdge {
    pub fn new(from: usize, to: usize, cost: f32) -> Self {
        Self { from, to, cost }
    }
}

impl Edge for NavEdge {
    fn from(&self) -> usize {
        self.from
    }

    fn to(&self) -> usize {
        self.to
    }

    fn cost(&self) -> f32 {
        self.cost
    }

    fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            cost: self.cost,
        }
    }
}

/// Adjacency-list graph
///
/// Nodes and their outgoing edges are stored in ordered maps so iteration order,
/// and therefore the order in which searches expand neighbors, is deterministic.
/// An undirected graph (`digraph == false`) stores every edge twice, once per
/// direction, with equal cost.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Graph<N = NavNode, E = NavEdge> {
    nodes: BTreeMap<usize, N>,
    edges: BTreeMap<usize, Vec<E>>,
    /// Whether edges are one-way
    pub digraph: bool,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            digraph: false,
        }
    }
}

impl<N: Node, E: Edge> Graph<N, E> {
    /// Creates an empty undirected graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty directed graph
    pub fn new_directed() -> Self {
        Self {
            digraph: true,
            ..Self::default()
        }
    }

    /// Adds a node, replacing any node with the same index
    pub fn add_node(&mut self, node: N) {
        let index = node.index();
        self.nodes.insert(index, node);
        self.edges.entry(index).or_default();
    }

    pub fn node(&self, index: usize) -> Option<&N> {
        self.nodes.get(&index)
    }

    /// Adds an edge, plus its reciprocal when the graph is undirected
    ///
    /// Returns false, leaving the graph untouched, if either endpoint is missing.
    pub fn add_edge(&mut self, edge: E) -> bool {
        let (from, to) = (edge.from(), edge.to());
        if !self.has_node(from) || !self.has_node(to) {
            log::warn!("Ignoring edge {} -> {}: endpoint not in graph", from, to);
            return false;
        }

        if !self.digraph {
            self.edges.entry(to).or_default().push(edge.reversed());
        }
        self.edges.entry(from).or_default().push(edge);
        true
    }

    /// First edge running from `from` to `to`
    pub fn edge(&self, from: usize, to: usize) -> Option<&E> {
        self.edges_of(from).iter().find(|e| e.to() == to)
    }

    /// Outgoing edges of a node, empty for unknown nodes
    pub fn edges_of(&self, index: usize) -> &[E] {
        self.edges.get(&index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Nodes in ascending index order
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.values()
    }

    /// All edges, grouped by source node in ascending index order
    pub fn edges(&self) -> impl Iterator<Item = &E> {
        self.edges.values().flatten()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored edges; an undirected connection counts twice
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Removes a node together with every edge touching it
    pub fn remove_node(&mut self, index: usize) -> Option<N> {
        let node = self.nodes.remove(&index)?;
        self.edges.remove(&index);
        for list in self.edges.values_mut() {
            list.retain(|e| e.to() != index);
        }
        Some(node)
    }

    /// Removes every edge from `from` to `to`, and the reverse ones in an undirected graph
    pub fn remove_edge(&mut self, from: usize, to: usize) {
        if let Some(list) = self.edges.get_mut(&from) {
            list.retain(|e| e.to() != to);
        }
        if !self.digraph {
            if let Some(list) = self.edges.get_mut(&to) {
                list.retain(|e| e.to() != from);
            }
        }
    }

    pub fn has_node(&self, index: usize) -> bool {
        self.nodes.contains_key(&index)
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.edge(from, to).is_some()
    }

    /// Removes all nodes and edges
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}

/// Builds an undirected square grid graph on the XZ plane
///
/// The grid spans `size` world units centered on the origin with `segments`
/// cells per side, so it holds `(segments + 1)^2` nodes. Neighbors along X and Z
/// are connected with a cost equal to their distance.
pub fn grid_layout(size: f32, segments: usize) -> Graph<NavNode, NavEdge> {
    let mut graph: Graph = Graph::new();
    let half = size * 0.5;
    let step = if segments == 0 {
        0.0
    } else {
        size / segments as f32
    };
    let side = segments + 1;

    for row in 0..side {
        for col in 0..side {
            let position = Vec3::new(col as f32 * step - half, 0.0, row as f32 * step - half);
            graph.add_node(NavNode::new(row * side + col, position));
        }
    }

    for row in 0..side {
        for col in 0..side {
            let index = row * side + col;
            if col + 1 < side {
                graph.add_edge(NavEdge::new(index, index + 1, step));
            }
            if row + 1 < side {
                graph.add_edge(NavEdge::new(index, index + side, step));
            }
        }
    }

    graph
}

/// Total cost of walking `path`, or `None` if two consecutive nodes are not connected
pub fn path_cost<N: Node, E: Edge>(graph: &Graph<N, E>, path: &[usize]) -> Option<f32> {
    path.windows(2)
        .map(|pair| graph.edge(pair[0], pair[1]).map(Edge::cost))
        .sum()
}

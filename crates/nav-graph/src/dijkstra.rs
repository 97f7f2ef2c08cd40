use crate::graph::{Edge, Graph, Node};
use crate::search::{best_first, walk_back, GraphSearch};
use std::collections::BTreeMap;

/// Dijkstra's shortest path search
///
/// Equivalent to [`AStar`](crate::AStar) with [`Heuristic::Zero`](crate::Heuristic::Zero)
/// but does not require node positions.
#[derive(Debug)]
pub struct Dijkstra<'a, N, E> {
    graph: &'a Graph<N, E>,
    pub source: usize,
    pub target: Option<usize>,
    found: bool,
    shortest_path_tree: BTreeMap<usize, E>,
}

impl<'a, N: Node, E: Edge> Dijkstra<'a, N, E> {
    pub fn new(graph: &'a Graph<N, E>, source: usize, target: impl Into<Option<usize>>) -> Self {
        Self {
            graph,
            source,
            target: target.into(),
            found: false,
            shortest_path_tree: BTreeMap::new(),
        }
    }
}

impl<N: Node, E: Edge> GraphSearch<E> for Dijkstra<'_, N, E> {
    fn search(&mut self) -> bool {
        self.shortest_path_tree.clear();
        self.found = best_first(
            self.graph,
            self.source,
            self.target,
            |_| 0.0,
            &mut self.shortest_path_tree,
        );
        self.found
    }

    fn found(&self) -> bool {
        self.found
    }

    fn path(&self) -> Vec<usize> {
        match self.target {
            Some(target) if self.found => walk_back(self.source, target, |index| {
                self.shortest_path_tree.get(&index).map(Edge::from)
            }),
            _ => Vec::new(),
        }
    }

    fn search_tree(&self) -> Vec<E> {
        self.shortest_path_tree.values().cloned().collect()
    }

    fn clear(&mut self) {
        self.found = false;
        self.shortest_path_tree.clear();
    }
}

use crate::graph::{Edge, Graph, Node};
use crate::search::{walk_back, GraphSearch};
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Breadth-first search
///
/// Nodes are marked visited when queued, so the queue never holds more entries
/// than there are nodes. The path found has the fewest edges, regardless of cost.
#[derive(Debug)]
pub struct Bfs<'a, N, E> {
    graph: &'a Graph<N, E>,
    pub source: usize,
    pub target: Option<usize>,
    found: bool,
    route: BTreeMap<usize, usize>,
    spanning_tree: Vec<E>,
}

impl<'a, N: Node, E: Edge> Bfs<'a, N, E> {
    pub fn new(graph: &'a Graph<N, E>, source: usize, target: impl Into<Option<usize>>) -> Self {
        Self {
            graph,
            source,
            target: target.into(),
            found: false,
            route: BTreeMap::new(),
            spanning_tree: Vec::new(),
        }
    }
}

impl<N: Node, E: Edge> GraphSearch<E> for Bfs<'_, N, E> {
    fn search(&mut self) -> bool {
        self.clear();

        let graph = self.graph;
        if !graph.has_node(self.source) {
            return false;
        }

        let mut visited = HashSet::new();
        let mut queue: VecDeque<(usize, Option<&E>)> = VecDeque::new();
        visited.insert(self.source);
        queue.push_back((self.source, None));

        while let Some((index, via)) = queue.pop_front() {
            if let Some(edge) = via {
                self.route.insert(index, edge.from());
                self.spanning_tree.push(edge.clone());
            }

            if Some(index) == self.target {
                self.found = true;
                break;
            }

            for edge in graph.edges_of(index) {
                if visited.insert(edge.to()) {
                    queue.push_back((edge.to(), Some(edge)));
                }
            }
        }

        self.found
    }

    fn found(&self) -> bool {
        self.found
    }

    fn path(&self) -> Vec<usize> {
        match self.target {
            Some(target) if self.found => {
                walk_back(self.source, target, |index| self.route.get(&index).copied())
            }
            _ => Vec::new(),
        }
    }

    fn search_tree(&self) -> Vec<E> {
        self.spanning_tree.clone()
    }

    fn clear(&mut self) {
        self.found = false;
        self.route.clear();
        self.spanning_tree.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dijkstra::Dijkstra;
    use crate::graph::{grid_layout, path_cost};
    use crate::test_graph_helpers::{seeded_graph, weighted_line};

    #[test]
    fn test_fewest_edges_beats_cheapest() {
        let graph = weighted_line();
        let mut bfs = Bfs::new(&graph, 0, 4);

        assert!(bfs.search());
        assert_eq!(bfs.path(), vec![0, 4]);
    }

    #[test]
    fn test_edge_count_on_grid() {
        let graph = grid_layout(4.0, 4);
        let mut bfs = Bfs::new(&graph, 0, 24);

        assert!(bfs.search());
        // Manhattan distance of 8 steps between opposite corners
        assert_eq!(bfs.path().len(), 9);
        assert_eq!(bfs.search_tree().len(), bfs.route.len());
    }

    #[test]
    fn test_unreachable() {
        let graph = weighted_line();
        let mut bfs = Bfs::new(&graph, 0, 5);

        assert!(!bfs.search());
        assert!(bfs.path().is_empty());
        // Everything reachable was explored
        assert_eq!(bfs.search_tree().len(), 4);
    }

    #[test]
    fn test_hop_count_matches_dijkstra_with_unit_costs() {
        for seed in 0..4 {
            let graph = seeded_graph(seed, 30, 40, true);

            for target in 0..30 {
                let mut dijkstra = Dijkstra::new(&graph, 0, target);
                assert!(dijkstra.search());
                let hops = path_cost(&graph, &dijkstra.path()).map(|c| c.round() as usize);

                let mut bfs = Bfs::new(&graph, 0, target);
                assert!(bfs.search());
                assert_eq!(bfs.path().first(), Some(&0));
                assert_eq!(bfs.path().last(), Some(&target));
                assert_eq!(
                    Some(bfs.path().len() - 1),
                    hops,
                    "seed {} target {}",
                    seed,
                    target
                );
            }
        }
    }
}

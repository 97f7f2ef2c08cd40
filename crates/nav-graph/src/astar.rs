use crate::graph::{Edge, Graph, Node, Positioned};
use crate::heuristic::Heuristic;
use crate::search::{best_first, walk_back, GraphSearch};
use std::collections::BTreeMap;

/// A* search over a graph whose nodes have positions
///
/// The path is optimal when the heuristic never overestimates the remaining cost,
/// which holds for [`Heuristic::Euclidean`] whenever edge costs are at least the
/// distance between their endpoints.
#[derive(Debug)]
pub struct AStar<'a, N, E> {
    graph: &'a Graph<N, E>,
    pub source: usize,
    pub target: Option<usize>,
    pub heuristic: Heuristic,
    found: bool,
    shortest_path_tree: BTreeMap<usize, E>,
}

impl<'a, N, E> AStar<'a, N, E>
where
    N: Node + Positioned,
    E: Edge,
{
    /// Creates a search using the Euclidean heuristic
    pub fn new(graph: &'a Graph<N, E>, source: usize, target: impl Into<Option<usize>>) -> Self {
        Self {
            graph,
            source,
            target: target.into(),
            heuristic: Heuristic::default(),
            found: false,
            shortest_path_tree: BTreeMap::new(),
        }
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }
}

impl<N, E> GraphSearch<E> for AStar<'_, N, E>
where
    N: Node + Positioned,
    E: Edge,
{
    fn search(&mut self) -> bool {
        self.shortest_path_tree.clear();

        let graph = self.graph;
        let heuristic = self.heuristic;
        let goal = self
            .target
            .and_then(|target| graph.node(target))
            .map(Positioned::position);

        let estimate = |index: usize| match (goal, graph.node(index)) {
            (Some(goal), Some(node)) => heuristic.estimate(&node.position(), &goal),
            _ => 0.0,
        };

        self.found = best_first(
            graph,
            self.source,
            self.target,
            estimate,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dijkstra::Dijkstra;
    use crate::graph::{grid_layout, path_cost};
    use crate::test_graph_helpers::{seeded_graph, weighted_line};

    #[test]
    fn test_finds_cheapest_path() {
        let graph = weighted_line();
        let mut astar = AStar::new(&graph, 0, 4);

        assert!(astar.search());
        assert_eq!(astar.path(), vec![0, 1, 2, 3, 4]);
        assert_eq!(path_cost(&graph, &astar.path()), Some(4.0));
        assert!(!astar.search_tree().is_empty());
    }

    #[test]
    fn test_disconnected_target() {
        let graph = weighted_line();
        let mut astar = AStar::new(&graph, 0, 5);

        assert!(!astar.search());
        assert!(astar.path().is_empty());
    }

    #[test]
    fn test_unset_target_yields_empty_path() {
        let graph = weighted_line();
        let mut astar = AStar::new(&graph, 0, 4);
        astar.target = None;

        assert!(!astar.search());
        assert!(astar.path().is_empty());
    }

    #[test]
    fn test_source_equals_target() {
        let graph = weighted_line();
        let mut astar = AStar::new(&graph, 2, 2);

        assert!(astar.search());
        assert_eq!(astar.path(), vec![2]);
    }

    #[test]
    fn test_grid_corner_to_corner() {
        let graph = grid_layout(10.0, 5);
        for heuristic in [Heuristic::Euclidean, Heuristic::Manhattan, Heuristic::Zero] {
            let mut astar = AStar::new(&graph, 0, 35).with_heuristic(heuristic);
            assert!(astar.search());

            let path = astar.path();
            assert_eq!(path.first(), Some(&0));
            assert_eq!(path.last(), Some(&35));
            // 10 steps of length 2 on a 5x5 grid
            assert_eq!(path_cost(&graph, &path), Some(20.0));
        }
    }

    #[test]
    fn test_clear_resets_state() {
        let graph = weighted_line();
        let mut astar = AStar::new(&graph, 0, 4);
        astar.search();
        astar.clear();

        assert!(!astar.found());
        assert!(astar.path().is_empty());
        assert!(astar.search_tree().is_empty());
    }

    #[test]
    fn test_admissible_heuristics_match_dijkstra_cost() {
        for seed in 0..6 {
            let graph = seeded_graph(seed, 40, 60, false);

            for target in [39, 20, 7] {
                let mut dijkstra = Dijkstra::new(&graph, 0, target);
                assert!(dijkstra.search());
                let expected = path_cost(&graph, &dijkstra.path());
                assert!(expected.is_some());

                for heuristic in [Heuristic::Euclidean, Heuristic::Zero] {
                    let mut astar = AStar::new(&graph, 0, target).with_heuristic(heuristic);
                    assert!(astar.search());

                    let path = astar.path();
                    assert_eq!(path.first(), Some(&0));
                    assert_eq!(path.last(), Some(&target));

                    let cost = path_cost(&graph, &path);
                    assert!(
                        matches!((cost, expected), (Some(c), Some(e)) if (c - e).abs() < 1e-4),
                        "seed {} target {} {:?}: {:?} vs {:?}",
                        seed,
                        target,
                        heuristic,
                        cost,
                        expected
                    );
                }
            }
        }
    }
}

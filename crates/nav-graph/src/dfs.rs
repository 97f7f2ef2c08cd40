use crate::graph::{Edge, Graph, Node};
use crate::search::{walk_back, GraphSearch};
use std::collections::{BTreeMap, HashSet};

/// Depth-first search
///
/// Nodes are marked visited when popped; entries for nodes that were reached
/// another way in the meantime are skipped. The path found connects source and
/// target but is not shortest by any measure.
#[derive(Debug)]
pub struct Dfs<'a, N, E> {
    graph: &'a Graph<N, E>,
    pub source: usize,
    pub target: Option<usize>,
    found: bool,
    route: BTreeMap<usize, usize>,
    spanning_tree: Vec<E>,
}

impl<'a, N: Node, E: Edge> Dfs<'a, N, E> {
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

impl<N: Node, E: Edge> GraphSearch<E> for Dfs<'_, N, E> {
    fn search(&mut self) -> bool {
        self.clear();

        let graph = self.graph;
        if !graph.has_node(self.source) {
            return false;
        }

        let mut visited = HashSet::new();
        let mut stack: Vec<(usize, Option<&E>)> = vec![(self.source, None)];

        while let Some((index, via)) = stack.pop() {
            if !visited.insert(index) {
                continue;
            }

            if let Some(edge) = via {
                self.route.insert(index, edge.from());
                self.spanning_tree.push(edge.clone());
            }

            if Some(index) == self.target {
                self.found = true;
                break;
            }

            for edge in graph.edges_of(index) {
                if !visited.contains(&edge.to()) {
                    stack.push((edge.to(), Some(edge)));
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
    use crate::graph::{grid_layout, path_cost};
    use crate::test_graph_helpers::weighted_line;

    #[test]
    fn test_finds_a_valid_path() {
        let graph = weighted_line();
        let mut dfs = Dfs::new(&graph, 0, 3);

        assert!(dfs.search());
        let path = dfs.path();
        assert_eq!(path.first(), Some(&0));
        assert_eq!(path.last(), Some(&3));
        assert!(path_cost(&graph, &path).is_some());
    }

    #[test]
    fn test_path_has_no_repeated_nodes() {
        let graph = grid_layout(6.0, 3);
        let mut dfs = Dfs::new(&graph, 0, 15);

        assert!(dfs.search());
        let path = dfs.path();
        let mut unique = path.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), path.len());
        assert!(path_cost(&graph, &path).is_some());
    }

    #[test]
    fn test_unreachable() {
        let graph = weighted_line();
        let mut dfs = Dfs::new(&graph, 3, 5);

        assert!(!dfs.search());
        assert!(dfs.path().is_empty());
    }
}

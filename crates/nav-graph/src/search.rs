//! State shared by the graph searches

use crate::graph::{Edge, Graph, Node};
use crate::priority_queue::PriorityQueue;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Common interface of [`AStar`](crate::AStar), [`Dijkstra`](crate::Dijkstra),
/// [`Bfs`](crate::Bfs) and [`Dfs`](crate::Dfs)
pub trait GraphSearch<E> {
    /// Runs the search to completion and returns whether the target was reached
    fn search(&mut self) -> bool;

    /// Whether the last search reached the target
    fn found(&self) -> bool;

    /// Node sequence from source to target inclusive, empty when nothing was found
    fn path(&self) -> Vec<usize>;

    /// Edges explored by the last search, for diagnostics
    fn search_tree(&self) -> Vec<E>;

    /// Resets all search state so the instance can be reused
    fn clear(&mut self);
}

/// Best-first expansion shared by A* and Dijkstra
///
/// Nodes are popped by `g + heuristic(node)`. A node's frontier edge is replaced
/// when the node is first discovered or reached with a strictly lower `g`; once a
/// node is popped it is settled and never relaxed again. Settled nodes record the
/// edge that reached them in `tree`.
pub(crate) fn best_first<N, E, H>(
    graph: &Graph<N, E>,
    source: usize,
    target: Option<usize>,
    heuristic: H,
    tree: &mut BTreeMap<usize, E>,
) -> bool
where
    N: Node,
    E: Edge,
    H: Fn(usize) -> f32,
{
    if !graph.has_node(source) {
        return false;
    }

    let mut cost: HashMap<usize, f32> = HashMap::new();
    let mut frontier: HashMap<usize, E> = HashMap::new();
    let mut settled: HashSet<usize> = HashSet::new();
    let mut queue =
        PriorityQueue::new(|a: &(usize, f32), b: &(usize, f32)| a.1.total_cmp(&b.1));

    cost.insert(source, 0.0);
    queue.push((source, heuristic(source)));

    while let Some((index, _)) = queue.pop() {
        // Stale entry left behind by a later, cheaper relaxation
        if !settled.insert(index) {
            continue;
        }

        if let Some(edge) = frontier.remove(&index) {
            tree.insert(index, edge);
        }

        if Some(index) == target {
            return true;
        }

        let g = cost.get(&index).copied().unwrap_or(0.0);
        for edge in graph.edges_of(index) {
            let to = edge.to();
            if settled.contains(&to) {
                continue;
            }

            let g_cost = g + edge.cost();
            if cost.get(&to).map_or(true, |&known| g_cost < known) {
                cost.insert(to, g_cost);
                frontier.insert(to, edge.clone());
                queue.push((to, g_cost + heuristic(to)));
            }
        }
    }

    false
}

/// Walks parent links back from `target` and returns the route source..=target
pub(crate) fn walk_back<F>(source: usize, target: usize, parent: F) -> Vec<usize>
where
    F: Fn(usize) -> Option<usize>,
{
    let mut path = vec![target];
    let mut current = target;

    while current != source {
        match parent(current) {
            Some(previous) => {
                current = previous;
                path.push(current);
            }
            None => return Vec::new(),
        }
    }

    path.reverse();
    path
}

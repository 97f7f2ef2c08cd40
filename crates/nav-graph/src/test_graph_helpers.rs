//! Graphs shared by the search tests

use crate::graph::{Graph, NavEdge, NavNode};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Undirected graph where the fewest-edge route and the cheapest route differ
///
/// Nodes 0..=4 lie on the X axis one unit apart and are chained with unit costs.
/// Shortcuts 0-2 (cost 5) and 0-4 (cost 10) are never cheaper than the chain.
/// Node 5 is isolated.
pub fn weighted_line() -> Graph {
    let mut graph: Graph = Graph::new();
    for i in 0..5 {
        graph.add_node(NavNode::new(i, Vec3::new(i as f32, 0.0, 0.0)));
    }
    graph.add_node(NavNode::new(5, Vec3::new(10.0, 0.0, 10.0)));

    for i in 0..4 {
        graph.add_edge(NavEdge::new(i, i + 1, 1.0));
    }
    graph.add_edge(NavEdge::new(0, 2, 5.0));
    graph.add_edge(NavEdge::new(0, 4, 10.0));
    graph
}

/// Connected undirected graph with `node_count` nodes scattered over a 10x10 area
///
/// A random spanning tree keeps every node reachable from every other, then
/// `extra_edges` more distinct edges are attempted. Costs are 1 with
/// `unit_costs`, otherwise the straight-line distance scaled by a factor in
/// `[1, 2)`, so Euclidean estimates never overshoot.
pub fn seeded_graph(seed: u64, node_count: usize, extra_edges: usize, unit_costs: bool) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph: Graph = Graph::new();

    let positions: Vec<Vec3> = (0..node_count)
        .map(|_| Vec3::new(rng.gen_range(0.0..10.0), 0.0, rng.gen_range(0.0..10.0)))
        .collect();
    for (i, &position) in positions.iter().enumerate() {
        graph.add_node(NavNode::new(i, position));
    }

    let mut linked = HashSet::new();
    let mut link = |graph: &mut Graph, rng: &mut StdRng, a: usize, b: usize| {
        if a == b || !linked.insert((a.min(b), a.max(b))) {
            return;
        }
        let cost = if unit_costs {
            1.0
        } else {
            positions[a].distance(positions[b]) * rng.gen_range(1.0_f32..2.0)
        };
        graph.add_edge(NavEdge::new(a, b, cost));
    };

    for i in 1..node_count {
        let parent = rng.gen_range(0..i);
        link(&mut graph, &mut rng, i, parent);
    }
    for _ in 0..extra_edges {
        let a = rng.gen_range(0..node_count);
        let b = rng.gen_range(0..node_count);
        link(&mut graph, &mut rng, a, b);
    }

    graph
}

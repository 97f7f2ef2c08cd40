//! Weighted graphs and the searches used to route over them
//!
//! A navigation mesh exposes its region adjacency as a [`Graph`] of [`NavNode`]s
//! and [`NavEdge`]s. All searches implement [`GraphSearch`]: build one with a
//! graph, a source and a target, call [`GraphSearch::search`], then read the
//! node sequence with [`GraphSearch::path`].
//!
//! ```
//! use nav_graph::{grid_layout, AStar, GraphSearch};
//!
//! let graph = grid_layout(10.0, 10);
//! let mut astar = AStar::new(&graph, 0, 120);
//! assert!(astar.search());
//! assert_eq!(astar.path().len(), 21);
//! ```

mod astar;
mod bfs;
mod dfs;
mod dijkstra;
mod graph;
mod heuristic;
mod priority_queue;
mod search;

#[cfg(test)]
mod test_graph_helpers;

pub use astar::AStar;
pub use bfs::Bfs;
pub use dfs::Dfs;
pub use dijkstra::Dijkstra;
pub use graph::{grid_layout, path_cost, Edge, Graph, NavEdge, NavNode, Node, Positioned};
pub use heuristic::Heuristic;
pub use priority_queue::PriorityQueue;
pub use search::GraphSearch;

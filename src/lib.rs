//! Shortest path routing over geographic road graphs.
//!
//! Two engines share the same search state and result type:
//! [`shortest_path`] runs Dijkstra's algorithm, [`heuristic_shortest_path`]
//! runs A* guided by the great-circle distance to the goal. The caller owns
//! the [`Graph`] and the node [`Coordinates`]; a search only borrows them, so
//! any number of searches can run over the same data at once.
//!
//! ```
//! use geonav::{Graph, shortest_path};
//!
//! let mut graph = Graph::new();
//! graph.add_undirected_edge("A", "B", 1.0).unwrap();
//! graph.add_undirected_edge("B", "C", 1.0).unwrap();
//! graph.add_undirected_edge("A", "C", 5.0).unwrap();
//!
//! let route = shortest_path(&graph, &"A", &"C").unwrap();
//! assert_eq!(route.path, vec!["A", "B", "C"]);
//! assert_eq!(route.distance, 2.0);
//! ```

mod collections;
pub mod errors;
pub mod geometry;
pub mod graph;
pub mod graph_algos;
pub mod network;

pub use errors::{AbortReason, RouteError};
pub use geometry::{Coordinate, Coordinates, NodeLocator};
pub use graph::{Edge, Graph};
pub use graph_algos::{
    Algorithm, DEFAULT_SPEED_KMH, Route, SearchConfig, SearchStats,
    a_star::AStar,
    dijkstra::{ShortestPathTree, dijkstra, dijkstra_tree},
    heuristic::{GreatCircle, Heuristic, Inflated, ZeroHeuristic},
    heuristic_shortest_path, shortest_path,
};
pub use network::{DEFAULT_TIMING_RUNS, RoadNetwork};

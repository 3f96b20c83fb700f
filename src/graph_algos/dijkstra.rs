use crate::errors::RouteError;
use crate::graph::Graph;
use super::path::reconstruct_path;
use super::{GraphNodeMap, Route, SearchConfig, SearchState};

use std::{fmt::Debug, hash::Hash};
use log::debug;




/// Identify the shortest path using Dijkstra's Algorithm
/// https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm
/// From start Node, traverse through graph until the goal is settled
/// An unreachable goal is not an error: the route comes back empty with infinite distance
pub fn dijkstra<N>(graph: &Graph<N>, start: &N, goal: &N, config: &SearchConfig) -> Result<Route<N>, RouteError>
where
    N: Eq + Hash + Clone + Debug,
    {

    let start = graph.resolve(start)?;
    let goal = graph.resolve(goal)?;

    // Build the graph - terminates when the goal is met
    let (state, goal_index) = build_dijkstra_graph(graph, start, Some(goal), config)?;

    let route = match goal_index {
        Some(goal_index) => state.into_route(goal_index)?,
        None => Route::unreachable(state.stats()),
    };

    debug!(
        "dijkstra {start:?} -> {goal:?}: distance {} over {} nodes, {} expanded, {} stale entries skipped",
        route.distance, route.path.len(), route.stats.expanded, route.stats.stale_skipped
    );
    Ok(route)
}


/// Distances and predecessors from one start node to every reachable node
pub struct ShortestPathTree<'g, N> {
    node_map: GraphNodeMap<'g, N>,
}

impl<'g, N> ShortestPathTree<'g, N>
where
    N: Eq + Hash + Clone + Debug,
{

    /// Shortest distance from the start, infinite if unreachable
    pub fn distance_to(&self, node: &N) -> f64 {
        self.node_map.get(node).map_or(f64::INFINITY, |label| label.distance)
    }

    /// Shortest path from the start, empty if unreachable
    pub fn path_to(&self, node: &N) -> Result<Vec<N>, RouteError> {
        match self.node_map.get_index_of(node) {
            Some(index) => reconstruct_path(&self.node_map, 0, index),
            None => Ok(Vec::new()),
        }
    }

    /// Every reachable node with its distance, start included
    pub fn reachable(&self) -> impl Iterator<Item = (&'g N, f64)> + '_ {
        self.node_map.iter().map(|(node, label)| (*node, label.distance))
    }

    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }
}

/// Returns a full map of the graph, includes all (reachable) nodes and costs
pub fn dijkstra_tree<'g, N>(graph: &'g Graph<N>, start: &N, config: &SearchConfig) -> Result<ShortestPathTree<'g, N>, RouteError>
where
    N: Eq + Hash + Clone + Debug,
    {

    let start = graph.resolve(start)?;

    // No goal - runs until every reachable node is settled
    let (state, _) = build_dijkstra_graph(graph, start, None, config)?;
    debug!("dijkstra tree from {start:?}: {} nodes reached, {} expanded", state.labels.len(), state.stats.expanded);

    Ok(ShortestPathTree { node_map: state.labels })
}


/// Traverses the graph using Dijkstra's algorithm
/// Returns the search state with the smallest costs along with the index of the goal node
fn build_dijkstra_graph<'g, N>(graph: &'g Graph<N>, start: &'g N, goal: Option<&N>, config: &SearchConfig) -> Result<(SearchState<'g, N>, Option<usize>), RouteError>
where
    N: Eq + Hash + Clone + Debug,
    {

    // Only the start node is queued up front, other nodes join the queue when first reached
    // Priority is the cost from the start node
    let mut state = SearchState::new(start, 0.0, config);

    // Loop over each node to visit, removing the smallest node
    while !state.queue.is_empty() {
        let (index, _) = state.queue.dequeue()?;

        // An entry queued before a shorter path was found, the node is already final
        if !state.settle(index) {
            continue;
        }

        let (node, label) = state.get(index)?;

        // Check if we've reached the goal
        if goal.is_some_and(|goal| node == goal) {
            return Ok((state, Some(index)));
        }

        state.expand()?;

        // loop over neighbors
        for edge in graph.neighbors(node) {

            // new cost to reach this node = edge cost + node cost
            let new_cost = label.distance + edge.weight;

            // Only add to the queue if we've found a better path
            if let Some(neighbor_index) = state.relax(index, &edge.target, new_cost) {
                state.push(neighbor_index, new_cost);
            }
        }
    }

    Ok((state, None))
}

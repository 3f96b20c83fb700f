use crate::errors::RouteError;
use crate::graph::Graph;
use super::heuristic::Heuristic;
use super::{Route, SearchConfig, SearchState, SearchStats};

use std::{
    hash::Hash,
    fmt::Debug,
};
use log::{debug, trace, warn};



/// A* Algorithm
/// https://en.wikipedia.org/wiki/A*_search_algorithm
pub struct AStar<H> {
    heuristic: H,
    config: SearchConfig,
}

impl<H> AStar<H> {

    pub fn new(heuristic: H) -> Self {
        Self { heuristic, config: SearchConfig::default() }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// From start Node, traverse through graph until the goal is settled
    /// The result is optimal when the heuristic is admissible (never overestimates
    /// the true cost to reach the goal).
    /// An unreachable goal is not an error: the route comes back empty with infinite distance
    pub fn plan<N>(&self, graph: &Graph<N>, start: &N, goal: &N) -> Result<Route<N>, RouteError>
    where
        N: Eq + Hash + Clone + Debug,
        H: Heuristic<N>,
        {

        let start = graph.resolve(start)?;
        let goal = graph.resolve(goal)?;

        // build_a_star_graph
        let (state, goal_index) = self.build_graph(graph, start, goal)?;

        if state.stats.degraded_estimates > 0 {
            warn!(
                "a* {start:?} -> {goal:?}: {} heuristic estimates unavailable, used zero instead",
                state.stats.degraded_estimates
            );
        }

        let route = match goal_index {
            Some(goal_index) => state.into_route(goal_index)?,
            None => Route::unreachable(state.stats()),
        };

        debug!(
            "a* {start:?} -> {goal:?}: distance {} over {} nodes, {} expanded, {} stale entries skipped",
            route.distance, route.path.len(), route.stats.expanded, route.stats.stale_skipped
        );
        Ok(route)
    }


    /// Heuristic value the queue can rely on
    /// Missing, negative, NaN or infinite estimates fall back to zero: zero never
    /// overestimates, while an infinite priority would hide a reachable node
    fn estimate<N>(&self, node: &N, goal: &N, stats: &mut SearchStats) -> f64
    where
        N: Debug,
        H: Heuristic<N>,
    {
        match self.heuristic.estimate(node, goal) {
            Some(h) if h.is_finite() && h >= 0.0 => h,
            other => {
                trace!("no usable estimate for {node:?} ({other:?}), using zero");
                stats.degraded_estimates += 1;
                0.0
            }
        }
    }


    /// Traverses the graph using A* algorithm
    /// Returns the search state with the smallest costs along with the index of the goal node
    fn build_graph<'g, N>(&self, graph: &'g Graph<N>, start: &'g N, goal: &N) -> Result<(SearchState<'g, N>, Option<usize>), RouteError>
    where
        N: Eq + Hash + Clone + Debug,
        H: Heuristic<N>,
    {
        // Open list sorted by f_cost (cost + heuristic)
        // Nodes are pushed again whenever their cost improves, stale copies are skipped on pop
        let mut stats = SearchStats::default();
        let start_priority = self.estimate(start, goal, &mut stats);
        let mut state = SearchState::new(start, start_priority, &self.config);
        state.stats.degraded_estimates = stats.degraded_estimates;

        while !state.queue.is_empty() {
            let (index, _) = state.queue.dequeue()?;

            // Closed list check: skip nodes already expanded with their current cost
            if !state.settle(index) {
                continue;
            }

            let (node, label) = state.get(index)?;

            // Check if we've reached the goal
            if node == goal {
                return Ok((state, Some(index)));
            }

            state.expand()?;

            // loop over neighbors
            for edge in graph.neighbors(node) {

                // new cost to reach this node = edge cost + node cost
                // This is confirmed cost, not heuristic
                let new_cost = label.distance + edge.weight;

                // Only add to the queue if we've found a better path
                if let Some(neighbor_index) = state.relax(index, &edge.target, new_cost) {
                    let h_cost = self.estimate(&edge.target, goal, &mut state.stats);
                    state.push(neighbor_index, new_cost + h_cost);
                }
            }
        }
        Ok((state, None))
    }
}

use std::fmt::Debug;

use crate::errors::RouteError;
use super::{GraphNodeMap, NO_PARENT};

/// Construct the shortest path from the goal node to the start node
/// Returns the ordered path as a vector of nodes from start to goal
/// node_map: GraphNodeMap<N> - map of nodes with their parent index and cost
/// start_index: usize - index of the start node in the node_map
/// goal_index: usize - index of the goal node in the node_map
///
/// A chain that stops anywhere but the start, or never stops, means the
/// search state is corrupt and is reported as an error rather than an empty path
pub(crate) fn reconstruct_path<N>(node_map: &GraphNodeMap<'_, N>, start_index: usize, goal_index: usize) -> Result<Vec<N>, RouteError>
where
    N: Clone + Debug,
{

    let mut path = Vec::new();
    let mut current_index = goal_index;

    // Trace back from goal to start
    // a valid chain visits every node at most once
    for _ in 0..node_map.len() {
        let Some((node, label)) = node_map.get_index(current_index) else {
            return Err(RouteError::BrokenPath(format!("index {current_index} is not in the node map")));
        };
        path.push((*node).clone());

        if current_index == start_index {
            // The path is in reverse order, so reverse it
            path.reverse();
            return Ok(path);
        }

        if label.parent == NO_PARENT {
            return Err(RouteError::BrokenPath(format!("predecessor chain ends at {node:?} before reaching the start")));
        }
        current_index = label.parent;
    }

    Err(RouteError::BrokenPath("predecessor chain contains a cycle".to_string()))
}

pub mod dijkstra;
pub mod a_star;
pub mod heuristic;
pub mod queue;
mod path;

use std::{
    fmt::Debug,
    hash::Hash,
    time::{Duration, Instant},
};

use indexmap::map::Entry::{Occupied, Vacant};
use log::{trace, warn};
use serde::{Deserialize, Serialize};

use crate::collections::FxIndexMap;
use crate::errors::{AbortReason, RouteError};
use crate::geometry::{Coordinate, Coordinates};
use crate::graph::Graph;
use a_star::AStar;
use heuristic::GreatCircle;
use queue::MinQueue;
use path::reconstruct_path;


/// Parent index of the start node, it has no predecessor
pub(crate) const NO_PARENT: usize = usize::MAX;

/// Average road speed used for travel time estimates, km/h
pub const DEFAULT_SPEED_KMH: f64 = 80.0;


/// Best known way to reach a node during a search
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Label {
    pub parent: usize, // index of the predecessor in the node map, NO_PARENT for the start
    pub distance: f64, // cost from the start node (gScore)
    pub settled: bool, // expanded with its final distance
}

/// Type alias for the node map used in the search engines
/// Keys borrow the graph's own node identifiers; a node's position in the map
/// is the index stored in queue entries and parent links
pub type GraphNodeMap<'g, N> = FxIndexMap<&'g N, Label>;


/// Limits that bound the work of a single search
/// Default is unbounded
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_expansions: Option<usize>,
    pub time_limit_ms: Option<u64>,
}

impl SearchConfig {

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_ms = Some(limit.as_millis().try_into().unwrap_or(u64::MAX));
        self
    }
}


/// Which engine computes a route
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Dijkstra,
    AStar,
}


/// Counters collected while searching
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub expanded: usize, // nodes taken off the queue and expanded
    pub enqueued: usize, // queue insertions, re-insertions included
    pub stale_skipped: usize, // dequeued entries for nodes already settled
    pub degraded_estimates: usize, // heuristic calls that fell back to zero
    pub elapsed: Duration, // wall time from start to finish of the search
}


/// Result of a search: node sequence from start to goal and its total weight
/// An unreachable goal gives an empty path and an infinite distance
#[derive(Clone, Debug, PartialEq)]
pub struct Route<N> {
    pub path: Vec<N>,
    pub distance: f64,
    pub stats: SearchStats,
}

impl<N> Route<N>
where
    N: Eq + Hash + Clone + Debug,
{

    pub fn unreachable(stats: SearchStats) -> Self {
        Self { path: Vec::new(), distance: f64::INFINITY, stats }
    }

    pub fn is_reachable(&self) -> bool {
        !self.path.is_empty()
    }

    /// Check the path against the graph: consecutive nodes must be adjacent and
    /// the edge weights must add up to the reported distance
    pub fn verify(&self, graph: &Graph<N>) -> Result<(), RouteError> {
        if !self.is_reachable() {
            return if self.distance == f64::INFINITY {
                Ok(())
            } else {
                Err(RouteError::BrokenPath(format!("empty path with finite distance {}", self.distance)))
            };
        }

        let total = graph.path_distance(&self.path)?;
        let tolerance = 1e-9 * self.distance.abs().max(1.0);
        if (total - self.distance).abs() > tolerance {
            return Err(RouteError::BrokenPath(format!(
                "reported distance {} but edges add up to {total}",
                self.distance
            )));
        }
        Ok(())
    }

    /// Map the path onto coordinates for drawing
    pub fn coordinates(&self, coordinates: &Coordinates<N>) -> Result<Vec<Coordinate>, RouteError> {
        self.path
            .iter()
            .map(|node| {
                coordinates
                    .get(node)
                    .copied()
                    .ok_or_else(|| RouteError::MissingCoordinate(format!("{node:?}")))
            })
            .collect()
    }

    /// Time to drive the route at `speed_kmh`, assuming weights are kilometres
    /// None for unreachable routes or a non-positive speed
    pub fn travel_time(&self, speed_kmh: f64) -> Option<Duration> {
        if !self.is_reachable() || speed_kmh.is_nan() || speed_kmh <= 0.0 {
            return None;
        }
        Duration::try_from_secs_f64(self.distance / speed_kmh * 3600.0).ok()
    }
}


/// Per-call state shared by the engines: node map, frontier and counters
/// Allocated fresh for every search and dropped with it
pub(crate) struct SearchState<'g, N> {
    pub labels: GraphNodeMap<'g, N>,
    pub queue: MinQueue<usize>,
    pub stats: SearchStats,
    max_expansions: Option<usize>,
    started: Instant,
    deadline: Option<Instant>,
}

impl<'g, N> SearchState<'g, N>
where
    N: Eq + Hash + Clone + Debug,
{

    /// Start node goes in at index 0 with distance 0
    pub fn new(start: &'g N, start_priority: f64, config: &SearchConfig) -> Self {
        let mut labels = GraphNodeMap::default();
        labels.insert(start, Label { parent: NO_PARENT, distance: 0.0, settled: false });

        let started = Instant::now();
        let mut state = Self {
            labels,
            queue: MinQueue::new(),
            stats: SearchStats::default(),
            max_expansions: config.max_expansions,
            started,
            // a limit past the end of the clock is no limit
            deadline: config
                .time_limit_ms
                .and_then(|ms| started.checked_add(Duration::from_millis(ms))),
        };
        state.push(0, start_priority);
        state
    }

    pub fn push(&mut self, index: usize, priority: f64) {
        self.queue.enqueue(index, priority);
        self.stats.enqueued += 1;
    }

    /// Node and label behind a queued index
    pub fn get(&self, index: usize) -> Result<(&'g N, Label), RouteError> {
        self.labels
            .get_index(index)
            .map(|(node, label)| (*node, *label))
            .ok_or_else(|| RouteError::BrokenPath(format!("queued index {index} has no label")))
    }

    /// Mark the node at `index` settled
    /// Returns false if it already was, i.e. the dequeued entry is stale
    pub fn settle(&mut self, index: usize) -> bool {
        match self.labels.get_index_mut(index) {
            Some((_, label)) if !label.settled => {
                label.settled = true;
                true
            }
            _ => {
                self.stats.stale_skipped += 1;
                trace!("skipping stale queue entry for index {index}");
                false
            }
        }
    }

    /// Count one expansion, failing if a configured limit is exhausted
    pub fn expand(&mut self) -> Result<(), RouteError> {
        let reason = if self.max_expansions.is_some_and(|max| self.stats.expanded >= max) {
            Some(AbortReason::ExpansionLimit)
        } else if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            Some(AbortReason::TimeLimit)
        } else {
            None
        };

        if let Some(reason) = reason {
            warn!("search aborted after {} expansions: {reason}", self.stats.expanded);
            return Err(RouteError::SearchAborted { expanded: self.stats.expanded, reason });
        }

        self.stats.expanded += 1;
        Ok(())
    }

    /// Offer `distance` as a way to reach `node` through `parent`
    /// Returns the node's index if this is strictly better than what is known.
    /// An improved node is reopened, which only happens to settled nodes when
    /// the heuristic is inconsistent.
    pub fn relax(&mut self, parent: usize, node: &'g N, distance: f64) -> Option<usize> {
        match self.labels.entry(node) {
            Vacant(e) => {
                let index = e.index();
                e.insert(Label { parent, distance, settled: false });
                Some(index)
            }
            Occupied(mut e) => {
                if distance < e.get().distance {
                    *e.get_mut() = Label { parent, distance, settled: false };
                    Some(e.index())
                } else {
                    None
                }
            }
        }
    }

    /// Counters with the time spent so far
    pub fn stats(&self) -> SearchStats {
        SearchStats { elapsed: self.started.elapsed(), ..self.stats }
    }

    /// Build the route to the settled goal at `goal_index`
    pub fn into_route(self, goal_index: usize) -> Result<Route<N>, RouteError> {
        let path = reconstruct_path(&self.labels, 0, goal_index)?;
        let (_, label) = self.get(goal_index)?;
        Ok(Route { path, distance: label.distance, stats: self.stats() })
    }
}


/// Exact shortest path between `start` and `end` (Dijkstra), unbounded search
pub fn shortest_path<N>(graph: &Graph<N>, start: &N, end: &N) -> Result<Route<N>, RouteError>
where
    N: Eq + Hash + Clone + Debug,
{
    dijkstra::dijkstra(graph, start, end, &SearchConfig::default())
}

/// Shortest path guided by great-circle distance to the goal (A*)
/// Weights are expected in kilometres so the estimate never overshoots
pub fn heuristic_shortest_path<N>(
    graph: &Graph<N>,
    coordinates: &Coordinates<N>,
    start: &N,
    end: &N,
) -> Result<Route<N>, RouteError>
where
    N: Eq + Hash + Clone + Debug,
{
    AStar::new(GreatCircle::new(coordinates)).plan(graph, start, end)
}

use std::{fmt::Debug, hash::Hash};

use crate::collections::FxIndexMap;
use crate::errors::RouteError;


/// Outgoing edge: target node and a non-negative, finite weight
#[derive(Clone, Debug, PartialEq)]
pub struct Edge<N> {
    pub target: N,
    pub weight: f64,
}


/// Weighted adjacency list
/// Every node that appears as an edge endpoint is a node of the graph,
/// including nodes that only ever appear as targets.
/// Built once by the caller and only borrowed by the search engines.
#[derive(Clone, Debug)]
pub struct Graph<N> {
    adjacency: FxIndexMap<N, Vec<Edge<N>>>,
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self { adjacency: FxIndexMap::default() }
    }
}

impl<N> Graph<N>
where
    N: Eq + Hash + Clone + Debug,
{

    pub fn new() -> Self {
        Self::default()
    }

    /// Add an isolated node, no-op if it already exists
    pub fn add_node(&mut self, node: N) {
        self.adjacency.entry(node).or_default();
    }

    /// Add a directed edge `from -> to`
    /// Rejects negative, NaN and infinite weights
    pub fn add_edge(&mut self, from: N, to: N, weight: f64) -> Result<(), RouteError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(RouteError::InvalidWeight {
                from: format!("{from:?}"),
                to: format!("{to:?}"),
                weight,
            });
        }

        self.add_node(to.clone());
        self.adjacency.entry(from).or_default().push(Edge { target: to, weight });
        Ok(())
    }

    /// Add the edge in both directions
    pub fn add_undirected_edge(&mut self, a: N, b: N, weight: f64) -> Result<(), RouteError> {
        self.add_edge(a.clone(), b.clone(), weight)?;
        self.add_edge(b, a, weight)
    }

    /// The graph's own copy of `node`, so search state can borrow keys for
    /// as long as the graph lives
    pub(crate) fn resolve(&self, node: &N) -> Result<&N, RouteError> {
        self.adjacency
            .get_key_value(node)
            .map(|(key, _)| key)
            .ok_or_else(|| RouteError::UnknownNode(format!("{node:?}")))
    }

    pub fn contains_node(&self, node: &N) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Outgoing edges of `node`, empty for unknown nodes
    pub fn neighbors(&self, node: &N) -> &[Edge<N>] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Weight of the cheapest edge `from -> to`, if any
    pub fn edge_weight(&self, from: &N, to: &N) -> Option<f64> {
        self.neighbors(from)
            .iter()
            .filter(|edge| edge.target == *to)
            .map(|edge| edge.weight)
            .min_by(f64::total_cmp)
    }

    /// Sum of edge weights along `path`
    /// Fails if a node is unknown or two consecutive nodes are not connected
    pub fn path_distance(&self, path: &[N]) -> Result<f64, RouteError> {
        if let Some(node) = path.iter().find(|node| !self.contains_node(node)) {
            return Err(RouteError::UnknownNode(format!("{node:?}")));
        }

        path.windows(2).try_fold(0.0, |total, pair| {
            self.edge_weight(&pair[0], &pair[1])
                .map(|weight| total + weight)
                .ok_or_else(|| RouteError::MissingEdge {
                    from: format!("{:?}", pair[0]),
                    to: format!("{:?}", pair[1]),
                })
        })
    }

    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.adjacency.keys()
    }

    /// Iterate over all directed edges as (source, edge)
    pub fn edges(&self) -> impl Iterator<Item = (&N, &Edge<N>)> {
        self.adjacency
            .iter()
            .flat_map(|(source, edges)| edges.iter().map(move |edge| (source, edge)))
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of directed edges, an undirected edge counts twice
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }
}

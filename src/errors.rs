use std::{error::Error, fmt};


/// Why a search gave up before reaching the goal or exhausting the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    ExpansionLimit, // More nodes expanded than the configured cap
    TimeLimit, // Deadline passed while the search was still running
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AbortReason::ExpansionLimit => write!(f, "expansion limit reached"),
            AbortReason::TimeLimit => write!(f, "time limit reached"),
        }
    }
}


/// Errors raised while building graphs, searching them or loading map data.
/// Node identifiers are carried in their `Debug` rendering so the error
/// stays independent of the node type.
#[derive(Debug)]
pub enum RouteError {
    UnknownNode(String), // Node is not part of the graph
    InvalidWeight { from: String, to: String, weight: f64 }, // Negative or non-finite edge weight
    InvalidCoordinate { node: String, lat: f64, lon: f64 }, // Out of range or non-finite
    MissingCoordinate(String), // Node has no coordinate where one is required
    MissingEdge { from: String, to: String }, // Consecutive path nodes are not adjacent
    BrokenPath(String), // Predecessor chain does not lead back to the start
    EmptyQueue, // Dequeue on an empty priority queue
    SearchAborted { expanded: usize, reason: AbortReason },
    KdTreeError(String),
    GraphData(String), // Malformed map data
    Io(std::io::Error),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RouteError::UnknownNode(node) => write!(f, "unknown node {node}"),
            RouteError::InvalidWeight { from, to, weight } => {
                write!(f, "invalid weight {weight} on edge {from} -> {to}")
            }
            RouteError::InvalidCoordinate { node, lat, lon } => {
                write!(f, "invalid coordinate ({lat}, {lon}) for node {node}")
            }
            RouteError::MissingCoordinate(node) => write!(f, "no coordinate for node {node}"),
            RouteError::MissingEdge { from, to } => write!(f, "no edge between {from} and {to}"),
            RouteError::BrokenPath(msg) => write!(f, "broken path: {msg}"),
            RouteError::EmptyQueue => write!(f, "dequeue called on an empty queue"),
            RouteError::SearchAborted { expanded, reason } => {
                write!(f, "search aborted after {expanded} expansions: {reason}")
            }
            RouteError::KdTreeError(msg) => write!(f, "kd-tree error: {msg}"),
            RouteError::GraphData(msg) => write!(f, "invalid graph data: {msg}"),
            RouteError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for RouteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RouteError::Io(e) => Some(e),
            _ => None,
        }
    }
}


impl From<kdtree::ErrorKind> for RouteError {
    fn from(error: kdtree::ErrorKind) -> Self {
        RouteError::KdTreeError(error.to_string())
    }
}

impl From<serde_json::Error> for RouteError {
    fn from(error: serde_json::Error) -> Self {
        RouteError::GraphData(error.to_string())
    }
}

impl From<std::io::Error> for RouteError {
    fn from(error: std::io::Error) -> Self {
        RouteError::Io(error)
    }
}

use std::{
    fmt::Debug,
    fs::File,
    hash::Hash,
    io::{BufReader, Read},
    path::Path,
    time::{Duration, Instant},
};

use log::{info, warn};
use serde::{Deserialize, de::DeserializeOwned};

use crate::collections::FxHashMap;
use crate::errors::RouteError;
use crate::geometry::{Coordinate, Coordinates, NodeLocator};
use crate::graph::Graph;
use crate::graph_algos::{
    Algorithm, Route, SearchConfig,
    a_star::AStar,
    dijkstra::dijkstra,
    heuristic::GreatCircle,
};


/// Repetitions behind one averaged search time
pub const DEFAULT_TIMING_RUNS: u32 = 1000;


/// One adjacency entry of the map data
#[derive(Debug, Deserialize)]
struct EdgeRecord<N> {
    node: N,
    weight: f64,
}

/// Map data as exported by the map layer
/// {"edges": {"id": [{"node": "id", "weight": km}]}, "coordinates": {"id": [lat, lon]}}
/// Edges are taken as listed, so an undirected road appears under both of its ends
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "N: Deserialize<'de> + Eq + Hash"))]
struct GraphData<N> {
    edges: FxHashMap<N, Vec<EdgeRecord<N>>>,
    #[serde(default)]
    coordinates: FxHashMap<N, Coordinate>,
}


/// Road graph together with node coordinates and a spatial index over them
/// Owns the data; searches borrow it, so one network can serve many
/// concurrent route requests
pub struct RoadNetwork<N = String> {
    graph: Graph<N>,
    coordinates: Coordinates<N>,
    locator: NodeLocator<N>,
}

impl<N> RoadNetwork<N>
where
    N: Eq + Hash + Clone + Debug,
{

    /// Fails if any coordinate is out of range
    pub fn new(graph: Graph<N>, coordinates: Coordinates<N>) -> Result<Self, RouteError> {
        // only routable nodes can be snapped to
        let locator = NodeLocator::new(
            coordinates.iter().filter(|(node, _)| graph.contains_node(node)),
        )?;

        let missing = graph.node_count() - locator.len();
        if missing > 0 {
            warn!("{missing} graph nodes have no coordinate, a* falls back to zero estimates for them");
        }

        Ok(Self { graph, coordinates, locator })
    }

    pub fn from_json_str(data: &str) -> Result<Self, RouteError>
    where
        N: DeserializeOwned,
    {
        Self::from_data(serde_json::from_str(data)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RouteError>
    where
        N: DeserializeOwned,
    {
        Self::from_data(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RouteError>
    where
        N: DeserializeOwned,
    {
        let file = File::open(path.as_ref())?;
        info!("loading road network from {}", path.as_ref().display());
        Self::from_reader(BufReader::new(file))
    }

    fn from_data(data: GraphData<N>) -> Result<Self, RouteError> {
        let mut graph = Graph::new();
        for (from, edges) in data.edges {
            graph.add_node(from.clone());
            for EdgeRecord { node, weight } in edges {
                graph.add_edge(from.clone(), node, weight)?;
            }
        }

        info!(
            "road network with {} nodes, {} edges, {} coordinates",
            graph.node_count(),
            graph.edge_count(),
            data.coordinates.len()
        );
        Self::new(graph, data.coordinates)
    }

    pub fn graph(&self) -> &Graph<N> {
        &self.graph
    }

    pub fn coordinates(&self) -> &Coordinates<N> {
        &self.coordinates
    }

    /// Graph node closest to `point`, None for a network without coordinates
    pub fn nearest_node(&self, point: &Coordinate) -> Result<Option<&N>, RouteError> {
        Ok(self.locator.nearest(point)?.map(|(node, _)| node))
    }

    /// Route between two nodes with the chosen engine
    pub fn route(&self, start: &N, end: &N, algorithm: Algorithm, config: &SearchConfig) -> Result<Route<N>, RouteError> {
        match algorithm {
            Algorithm::Dijkstra => dijkstra(&self.graph, start, end, config),
            Algorithm::AStar => AStar::new(GreatCircle::new(&self.coordinates))
                .with_config(config.clone())
                .plan(&self.graph, start, end),
        }
    }

    /// Run the same search `runs` times (at least once) and return the route
    /// together with the mean time of a single search
    pub fn timed_route(
        &self,
        start: &N,
        end: &N,
        algorithm: Algorithm,
        config: &SearchConfig,
        runs: u32,
    ) -> Result<(Route<N>, Duration), RouteError> {
        let runs = runs.max(1);
        let timer = Instant::now();

        let mut route = self.route(start, end, algorithm, config)?;
        for _ in 1..runs {
            route = self.route(start, end, algorithm, config)?;
        }

        let mean = timer.elapsed() / runs;
        info!("{algorithm:?} {start:?} -> {end:?}: distance {}, {mean:?} per search over {runs} runs", route.distance);
        Ok((route, mean))
    }

    /// Route between the nodes nearest to two arbitrary positions
    pub fn route_between(
        &self,
        from: &Coordinate,
        to: &Coordinate,
        algorithm: Algorithm,
        config: &SearchConfig,
    ) -> Result<Route<N>, RouteError> {
        let start = self
            .nearest_node(from)?
            .ok_or_else(|| RouteError::MissingCoordinate(format!("no node near {from:?}")))?;
        let end = self
            .nearest_node(to)?
            .ok_or_else(|| RouteError::MissingCoordinate(format!("no node near {to:?}")))?;
        self.route(start, end, algorithm, config)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const DATA: &str = r#"{
        "edges": {
            "1": [{"node": "2", "weight": 12.0}, {"node": "3", "weight": 30.0}],
            "2": [{"node": "1", "weight": 12.0}, {"node": "3", "weight": 12.0}],
            "3": [{"node": "1", "weight": 30.0}, {"node": "2", "weight": 12.0}],
            "4": []
        },
        "coordinates": {
            "1": [39.90, 32.80],
            "2": [39.95, 32.90],
            "3": [40.00, 33.00],
            "4": [41.00, 29.00]
        }
    }"#;

    #[test_log::test]
    fn test_load_network() {
        let network: RoadNetwork = RoadNetwork::from_json_str(DATA).unwrap();
        assert_eq!(network.graph().node_count(), 4);
        assert_eq!(network.graph().edge_count(), 6);
        assert_eq!(network.coordinates().len(), 4);
    }

    #[test_log::test]
    fn test_load_from_reader() {
        let network: RoadNetwork = RoadNetwork::from_reader(DATA.as_bytes()).unwrap();
        assert_eq!(network.graph().edge_weight(&"2".to_string(), &"3".to_string()), Some(12.0));
    }

    #[test_log::test]
    fn test_numeric_node_ids() {
        let data = r#"{"edges": {"1": [{"node": 2, "weight": 1.0}], "2": []}, "coordinates": {"2": [1.0, 2.0]}}"#;
        let network: RoadNetwork<u64> = RoadNetwork::from_json_str(data).unwrap();
        assert_eq!(network.graph().edge_weight(&1, &2), Some(1.0));
        assert_eq!(network.nearest_node(&Coordinate::new(0.0, 0.0)).unwrap(), Some(&2));
    }

    #[test_log::test]
    fn test_route_with_both_engines() {
        let network: RoadNetwork = RoadNetwork::from_json_str(DATA).unwrap();
        let (start, end) = ("1".to_string(), "3".to_string());
        let config = SearchConfig::default();

        let exact = network.route(&start, &end, Algorithm::Dijkstra, &config).unwrap();
        let guided = network.route(&start, &end, Algorithm::AStar, &config).unwrap();

        assert_eq!(exact.path, vec!["1", "2", "3"]);
        assert_abs_diff_eq!(exact.distance, 24.0);
        assert_eq!(guided.path, exact.path);
        assert_abs_diff_eq!(guided.distance, exact.distance);

        let unreachable = network.route(&start, &"4".to_string(), Algorithm::AStar, &config).unwrap();
        assert!(!unreachable.is_reachable());
    }

    #[test_log::test]
    fn test_route_between_positions() {
        let network: RoadNetwork = RoadNetwork::from_json_str(DATA).unwrap();
        assert_eq!(network.nearest_node(&Coordinate::new(39.91, 32.79)).unwrap(), Some(&"1".to_string()));

        let route = network
            .route_between(
                &Coordinate::new(39.91, 32.79),
                &Coordinate::new(40.01, 33.01),
                Algorithm::Dijkstra,
                &SearchConfig::default(),
            )
            .unwrap();
        assert_eq!(route.path, vec!["1", "2", "3"]);
        assert_eq!(
            route.coordinates(network.coordinates()).unwrap(),
            vec![Coordinate::new(39.90, 32.80), Coordinate::new(39.95, 32.90), Coordinate::new(40.00, 33.00)]
        );
    }

    #[test_log::test]
    fn test_timed_route_matches_single_search() {
        let network: RoadNetwork = RoadNetwork::from_json_str(DATA).unwrap();
        let (start, end) = ("1".to_string(), "3".to_string());
        let config = SearchConfig::default();

        for algorithm in [Algorithm::Dijkstra, Algorithm::AStar] {
            let single = network.route(&start, &end, algorithm, &config).unwrap();
            let (timed, mean) = network.timed_route(&start, &end, algorithm, &config, 50).unwrap();
            assert_eq!(timed.path, single.path);
            assert_abs_diff_eq!(timed.distance, single.distance);
            assert!(mean < Duration::from_secs(1));
        }

        // zero runs still searches once
        let (route, _) = network.timed_route(&start, &end, Algorithm::AStar, &config, 0).unwrap();
        assert_eq!(route.path, vec!["1", "2", "3"]);

        assert!(matches!(
            network.timed_route(&start, &"9".to_string(), Algorithm::Dijkstra, &config, 10),
            Err(RouteError::UnknownNode(_))
        ));
    }

    #[test_log::test]
    fn test_coordinates_are_optional() {
        let data = r#"{"edges": {"a": [{"node": "b", "weight": 1.5}]}}"#;
        let network: RoadNetwork = RoadNetwork::from_json_str(data).unwrap();

        // goal has no coordinate, a* still succeeds
        let route = network
            .route(&"a".to_string(), &"b".to_string(), Algorithm::AStar, &SearchConfig::default())
            .unwrap();
        assert_eq!(route.distance, 1.5);
        assert!(route.stats.degraded_estimates > 0);
        assert_eq!(network.nearest_node(&Coordinate::new(0.0, 0.0)).unwrap(), None);
    }

    #[test_log::test]
    fn test_bad_data_rejected() {
        let negative = r#"{"edges": {"a": [{"node": "b", "weight": -2.0}]}}"#;
        assert!(matches!(
            RoadNetwork::<String>::from_json_str(negative),
            Err(RouteError::InvalidWeight { .. })
        ));

        let bad_coordinate = r#"{"edges": {"a": []}, "coordinates": {"a": [95.0, 10.0]}}"#;
        assert!(matches!(
            RoadNetwork::<String>::from_json_str(bad_coordinate),
            Err(RouteError::InvalidCoordinate { .. })
        ));

        assert!(matches!(
            RoadNetwork::<String>::from_json_str("{\"edges\": 3}"),
            Err(RouteError::GraphData(_))
        ));
    }

    #[test_log::test]
    fn test_missing_file() {
        let result = RoadNetwork::<String>::from_path("/nonexistent/graph-data.json");
        assert!(matches!(result, Err(RouteError::Io(_))));
    }
}

use std::fmt::Debug;

use kdtree::KdTree;
use kdtree::distance::squared_euclidean;

use super::Coordinate;
use crate::errors::RouteError;


/// Snaps arbitrary positions to the closest graph node
/// Nodes are stored as unit-sphere vectors so the kd-tree's euclidean
/// nearest neighbour is also the great-circle nearest neighbour
pub struct NodeLocator<N> {
    nodes: Vec<(N, Coordinate)>,
    tree: KdTree<f64, usize, [f64; 3]>, // stores unit vector -> index in nodes
}

impl<N> NodeLocator<N>
where
    N: Clone + Debug,
{

    /// Build a locator over every (node, coordinate) pair
    /// Fails on the first invalid coordinate
    pub fn new<'a, I>(coordinates: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = (&'a N, &'a Coordinate)>,
        N: 'a,
    {
        let mut nodes = Vec::new();
        let mut tree = KdTree::new(3);

        for (node, coordinate) in coordinates {
            if !coordinate.is_valid() {
                return Err(RouteError::InvalidCoordinate {
                    node: format!("{node:?}"),
                    lat: coordinate.lat,
                    lon: coordinate.lon,
                });
            }
            tree.add(coordinate.unit_vector(), nodes.len())?;
            nodes.push((node.clone(), *coordinate));
        }

        Ok(Self { nodes, tree })
    }

    /// Closest node to `point` and its great-circle distance in km
    /// Returns None when the locator holds no nodes
    pub fn nearest(&self, point: &Coordinate) -> Result<Option<(&N, f64)>, RouteError> {
        if self.nodes.is_empty() {
            return Ok(None);
        }

        let found = self.tree.nearest(&point.unit_vector(), 1, &squared_euclidean)?;

        Ok(found.first().map(|&(_, &idx)| {
            let (node, coordinate) = &self.nodes[idx];
            (node, coordinate.distance_km(point))
        }))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coordinates;

    fn sample() -> Coordinates<String> {
        let mut coords = Coordinates::default();
        coords.insert("ankara".to_string(), Coordinate::new(39.9334, 32.8597));
        coords.insert("istanbul".to_string(), Coordinate::new(41.0082, 28.9784));
        coords.insert("izmir".to_string(), Coordinate::new(38.4237, 27.1428));
        coords
    }

    #[test]
    fn test_nearest_node() {
        let coords = sample();
        let locator = NodeLocator::new(coords.iter()).unwrap();
        assert_eq!(locator.len(), 3);

        // Bursa sits closest to Istanbul
        let (node, km) = locator.nearest(&Coordinate::new(40.1826, 29.0665)).unwrap().unwrap();
        assert_eq!(node, "istanbul");
        assert!(km > 80.0 && km < 100.0, "unexpected distance {km}");
    }

    #[test]
    fn test_nearest_exact_hit() {
        let coords = sample();
        let locator = NodeLocator::new(coords.iter()).unwrap();
        let (node, km) = locator.nearest(&Coordinate::new(38.4237, 27.1428)).unwrap().unwrap();
        assert_eq!(node, "izmir");
        assert!(km < 1e-6);
    }

    #[test]
    fn test_nearest_across_antimeridian() {
        // Naive lat/lon distance would pick the node at lon -170
        let mut coords = Coordinates::default();
        coords.insert(1u32, Coordinate::new(0.0, 179.5));
        coords.insert(2u32, Coordinate::new(0.0, -170.0));
        let locator = NodeLocator::new(coords.iter()).unwrap();

        let (node, _) = locator.nearest(&Coordinate::new(0.0, -179.9)).unwrap().unwrap();
        assert_eq!(*node, 1);
    }

    #[test]
    fn test_empty_locator() {
        let coords: Coordinates<u32> = Coordinates::default();
        let locator = NodeLocator::new(coords.iter()).unwrap();
        assert!(locator.is_empty());
        assert!(locator.nearest(&Coordinate::new(0.0, 0.0)).unwrap().is_none());
    }

    #[test]
    fn test_invalid_coordinate_rejected() {
        let mut coords = Coordinates::default();
        coords.insert(7u32, Coordinate::new(120.0, 0.0));
        let result = NodeLocator::new(coords.iter());
        assert!(matches!(result, Err(RouteError::InvalidCoordinate { .. })));
    }
}

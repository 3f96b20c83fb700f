mod locator;

pub use locator::NodeLocator;

use num_traits::Float;
use serde::{Deserialize, Serialize};

use crate::collections::FxHashMap;


/// Mean earth radius in kilometres, same value web map libraries use for
/// their great-circle distances
pub const EARTH_RADIUS_KM: f64 = 6371.0;


/// Great-circle distance between two lat/lon pairs (degrees) on a sphere of `radius`
/// Uses the haversine formula
/// https://en.wikipedia.org/wiki/Haversine_formula
pub fn haversine<T>(lat1: T, lon1: T, lat2: T, lon2: T, radius: T) -> T
where
    T: Float,
    {
    let two = T::one() + T::one();
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / two).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / two).sin().powi(2);

    // rounding can push `a` just above 1 for antipodal points
    two * radius * a.sqrt().min(T::one()).asin()
}


/// Geographic position of a node, in degrees
/// Serialized as a `[lat, lon]` pair
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {

    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite, latitude within [-90, 90] and longitude within [-180, 180]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Great-circle distance to `other` in kilometres
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine(self.lat, self.lon, other.lat, other.lon, EARTH_RADIUS_KM)
    }

    /// Position on the unit sphere
    /// Chord length between unit vectors grows monotonically with great-circle distance,
    /// so nearest neighbour queries can run in plain euclidean space
    pub(crate) fn unit_vector(&self) -> [f64; 3] {
        let (lat, lon) = (self.lat.to_radians(), self.lon.to_radians());
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lat, c.lon]
    }
}


/// Coordinates of graph nodes, kept apart from the graph topology
pub type Coordinates<N> = FxHashMap<N, Coordinate>;

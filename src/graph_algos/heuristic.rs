use std::hash::Hash;

use crate::geometry::Coordinates;


/// Estimate of the remaining cost from `node` to `goal`
///
/// For A* to return optimal routes the estimate must never exceed the true
/// remaining cost (admissible), and should satisfy the triangle inequality
/// over edges (consistent). `None` means no estimate is available; the
/// engine then uses zero for that node.
pub trait Heuristic<N> {
    fn estimate(&self, node: &N, goal: &N) -> Option<f64>;
}

impl<N, H> Heuristic<N> for &H
where
    H: Heuristic<N> + ?Sized,
{
    fn estimate(&self, node: &N, goal: &N) -> Option<f64> {
        (**self).estimate(node, goal)
    }
}


/// Always zero, A* then expands nodes in the same order as Dijkstra
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroHeuristic;

impl<N> Heuristic<N> for ZeroHeuristic {
    fn estimate(&self, _node: &N, _goal: &N) -> Option<f64> {
        Some(0.0)
    }
}


/// Straight-line (great-circle) distance in km between node coordinates
/// Admissible and consistent when edge weights are road distances in km
#[derive(Debug)]
pub struct GreatCircle<'c, N> {
    coordinates: &'c Coordinates<N>,
}

impl<N> Clone for GreatCircle<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<N> Copy for GreatCircle<'_, N> {}

impl<'c, N> GreatCircle<'c, N> {
    pub fn new(coordinates: &'c Coordinates<N>) -> Self {
        Self { coordinates }
    }
}

impl<N> Heuristic<N> for GreatCircle<'_, N>
where
    N: Eq + Hash,
{
    fn estimate(&self, node: &N, goal: &N) -> Option<f64> {
        let a = self.coordinates.get(node)?;
        let b = self.coordinates.get(goal)?;
        Some(a.distance_km(b))
    }
}


/// Inner estimate multiplied by a constant factor (weighted A*)
/// A factor above 1 trades optimality for fewer expansions: the route found
/// costs at most `factor` times the optimum when the inner heuristic is admissible
#[derive(Clone, Copy, Debug)]
pub struct Inflated<H> {
    inner: H,
    factor: f64,
}

impl<H> Inflated<H> {
    pub fn new(inner: H, factor: f64) -> Self {
        Self { inner, factor }
    }
}

impl<N, H> Heuristic<N> for Inflated<H>
where
    H: Heuristic<N>,
{
    fn estimate(&self, node: &N, goal: &N) -> Option<f64> {
        self.inner.estimate(node, goal).map(|h| h * self.factor)
    }
}

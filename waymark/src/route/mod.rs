//! Ordered, immutable waypoint sequences.
//!
//! A [`Route`] is the only input the animation engine and the waypoint
//! simulator accept. Insertion order is traversal order; nothing here
//! reorders, deduplicates or smooths points.

mod demo;

pub use demo::{demo_route, DEMO_POINTS};

use std::sync::Arc;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::coord::{CoordError, Coordinate};

/// Errors raised while building a route from raw values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("Invalid waypoint at index {index}: {source}")]
    InvalidWaypoint {
        index: usize,
        #[source]
        source: CoordError,
    },
}

/// An ordered sequence of waypoints.
///
/// Cloning is cheap: the points live behind an `Arc<[Coordinate]>`, so the
/// same route can be handed to several runs and observers.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    points: Arc<[Coordinate]>,
}

impl Route {
    /// Create a route from already-validated coordinates.
    pub fn new(points: impl Into<Arc<[Coordinate]>>) -> Self {
        Self {
            points: points.into(),
        }
    }

    /// Build a route from `(latitude, longitude)` pairs, validating each one.
    pub fn from_lat_lon<I>(pairs: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        pairs
            .into_iter()
            .enumerate()
            .map(|(index, (lat, lon))| {
                Coordinate::new(lat, lon)
                    .map_err(|source| RouteError::InvalidWaypoint { index, source })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Route::from)
    }

    /// Build a route from GeoJSON-ordered `[lon, lat]` pairs.
    pub fn from_lon_lat<I>(pairs: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = [f64; 2]>,
    {
        Self::from_lat_lon(pairs.into_iter().map(|[lon, lat]| (lat, lon)))
    }

    /// Number of waypoints.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the route holds no waypoints.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when the route has at least one segment to animate.
    pub fn is_animatable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Waypoint at `index`.
    pub fn get(&self, index: usize) -> Option<&Coordinate> {
        self.points.get(index)
    }

    /// First waypoint.
    pub fn first(&self) -> Option<&Coordinate> {
        self.points.first()
    }

    /// Last waypoint.
    pub fn last(&self) -> Option<&Coordinate> {
        self.points.last()
    }

    /// All waypoints in traversal order.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// The suffix of the route starting at `index` (empty if out of range).
    pub fn remaining_from(&self, index: usize) -> &[Coordinate] {
        self.points.get(index..).unwrap_or(&[])
    }

    /// Consecutive waypoint pairs as `(index_of_destination, from, to)`.
    pub fn segments(&self) -> impl Iterator<Item = (usize, &Coordinate, &Coordinate)> {
        self.points
            .windows(2)
            .enumerate()
            .map(|(i, pair)| (i + 1, &pair[0], &pair[1]))
    }

    /// Sum of all segment lengths in meters.
    pub fn total_distance_meters(&self) -> f64 {
        self.segments()
            .map(|(_, a, b)| crate::coord::distance_meters(a, b))
            .sum()
    }
}

impl From<Vec<Coordinate>> for Route {
    fn from(points: Vec<Coordinate>) -> Self {
        Self::new(points)
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.points().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lat_lon_preserves_order() {
        let route = Route::from_lat_lon([(1.0, 2.0), (3.0, 4.0), (5.0, 6.0)]).unwrap();
        assert_eq!(route.len(), 3);
        assert_eq!(route.first().unwrap().latitude, 1.0);
        assert_eq!(route.last().unwrap().longitude, 6.0);
    }

    #[test]
    fn test_from_lat_lon_reports_bad_index() {
        let err = Route::from_lat_lon([(1.0, 2.0), (95.0, 4.0)]).unwrap_err();
        assert!(matches!(err, RouteError::InvalidWaypoint { index: 1, .. }));
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_from_lon_lat() {
        let route = Route::from_lon_lat([[76.7062, 30.6882]]).unwrap();
        assert_eq!(route.points()[0].latitude, 30.6882);
    }

    #[test]
    fn test_is_animatable() {
        assert!(!Route::new(Vec::<Coordinate>::new()).is_animatable());
        assert!(!Route::from_lat_lon([(0.0, 0.0)]).unwrap().is_animatable());
        assert!(Route::from_lat_lon([(0.0, 0.0), (0.0, 1.0)])
            .unwrap()
            .is_animatable());
    }

    #[test]
    fn test_segments_yield_destination_index() {
        let route = Route::from_lat_lon([(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]).unwrap();
        let indices: Vec<usize> = route.segments().map(|(i, _, _)| i).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn test_remaining_from() {
        let route = Route::from_lat_lon([(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]).unwrap();
        assert_eq!(route.remaining_from(1).len(), 2);
        assert_eq!(route.remaining_from(2)[0].longitude, 2.0);
        assert!(route.remaining_from(5).is_empty());
    }

    #[test]
    fn test_clone_shares_points() {
        let route = demo_route();
        let copy = route.clone();
        assert!(Arc::ptr_eq(&route.points, &copy.points));
    }

    #[test]
    fn test_serialize_as_point_list() {
        let route = Route::from_lat_lon([(1.0, 2.0)]).unwrap();
        let json = serde_json::to_string(&route).unwrap();
        assert_eq!(json, r#"[{"latitude":1.0,"longitude":2.0}]"#);
    }
}

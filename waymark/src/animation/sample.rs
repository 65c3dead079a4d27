//! Values emitted by an animation run.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::coord::Coordinate;
use crate::route::Route;

/// One animation frame: where the marker is, which way it faces, and the
/// part of the route still ahead of it.
///
/// The trail is stored as a shared [`Route`] plus an offset, so emitting a
/// sample never copies waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Interpolated marker position.
    pub position: Coordinate,
    /// Heading in degrees, `[0, 360)`, 0 = North.
    pub heading_degrees: f64,
    route: Route,
    remaining_from: usize,
}

impl Sample {
    pub(crate) fn new(
        position: Coordinate,
        heading_degrees: f64,
        route: Route,
        remaining_from: usize,
    ) -> Self {
        Self {
            position,
            heading_degrees,
            route,
            remaining_from,
        }
    }

    /// Untraversed route suffix, starting at the current segment's destination.
    pub fn remaining_path(&self) -> &[Coordinate] {
        self.route.remaining_from(self.remaining_from)
    }

    /// Route index of the current segment's destination.
    pub fn segment_destination(&self) -> usize {
        self.remaining_from
    }
}

impl Serialize for Sample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Sample", 3)?;
        state.serialize_field("position", &self.position)?;
        state.serialize_field("heading_degrees", &self.heading_degrees)?;
        state.serialize_field("remaining_path", self.remaining_path())?;
        state.end()
    }
}

/// Everything a presentation sink receives from a run, in order.
///
/// A run emits `Placed` once, then zero or more `Sample`s, then `Finished`
/// if it ran to completion. A cancelled run simply stops emitting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnimationEvent {
    /// Marker placed at the route start with heading 0; the view should
    /// recenter on it and draw the full trail.
    Placed {
        position: Coordinate,
        heading_degrees: f64,
        trail: Route,
    },
    /// A motion frame. Position, heading and trail belong to the same frame
    /// and must be applied together.
    Sample(Sample),
    /// The run reached the last waypoint.
    Finished,
}

impl AnimationEvent {
    /// The sample carried by this event, if any.
    pub fn as_sample(&self) -> Option<&Sample> {
        match self {
            AnimationEvent::Sample(sample) => Some(sample),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> Route {
        Route::from_lat_lon([(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]).unwrap()
    }

    #[test]
    fn test_remaining_path_is_route_suffix() {
        let sample = Sample::new(Coordinate::new_unchecked(0.0, 0.5), 90.0, route(), 1);
        let remaining = sample.remaining_path();
        assert_eq!(remaining.len(), 2);
        assert_eq!(remaining[0].longitude, 1.0);
        assert_eq!(sample.segment_destination(), 1);
    }

    #[test]
    fn test_sample_serializes_trail() {
        let sample = Sample::new(Coordinate::new_unchecked(0.0, 1.5), 90.0, route(), 2);
        let json = serde_json::to_value(AnimationEvent::Sample(sample)).unwrap();
        assert_eq!(json["event"], "sample");
        assert_eq!(json["heading_degrees"], 90.0);
        assert_eq!(json["remaining_path"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_finished_serializes_tag_only() {
        let json = serde_json::to_string(&AnimationEvent::Finished).unwrap();
        assert_eq!(json, r#"{"event":"finished"}"#);
    }

    #[test]
    fn test_as_sample() {
        assert!(AnimationEvent::Finished.as_sample().is_none());
        let sample = Sample::new(Coordinate::new_unchecked(0.0, 1.5), 90.0, route(), 2);
        assert!(AnimationEvent::Sample(sample).as_sample().is_some());
    }
}

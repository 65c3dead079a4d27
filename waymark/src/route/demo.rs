//! Scripted demo route through Mohali, Punjab.
//!
//! Used by the waypoint simulator and as the seed for live route requests
//! (its first and last points are the request endpoints).

use super::Route;
use crate::coord::Coordinate;

/// Demo waypoints in traversal order.
pub const DEMO_POINTS: [Coordinate; 7] = [
    Coordinate::new_unchecked(30.6882, 76.7062), // Sohana Gurudwara
    Coordinate::new_unchecked(30.6885, 76.7070),
    Coordinate::new_unchecked(30.6890, 76.7085),
    Coordinate::new_unchecked(30.6905, 76.7100),
    Coordinate::new_unchecked(30.6920, 76.7115),
    Coordinate::new_unchecked(30.6935, 76.7130),
    Coordinate::new_unchecked(30.7133, 76.6956), // Phase 8B
];

/// The demo route as a [`Route`].
pub fn demo_route() -> Route {
    Route::new(DEMO_POINTS.to_vec())
}

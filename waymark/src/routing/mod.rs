//! Route acquisition.
//!
//! The animation engine never fetches data. A [`RouteSource`] resolves a
//! seed route (typically just the endpoints that matter) into the ordered
//! waypoint list to animate. Failures are returned, not retried; the caller
//! decides whether to log and stay idle.

mod http;
mod osrm;

pub use http::{HttpClient, ReqwestClient};
pub use osrm::{parse_route_response, OsrmRouteSource};

use thiserror::Error;

use crate::route::{Route, RouteError};

/// Errors raised while acquiring a route.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Malformed routing response: {0}")]
    Malformed(String),

    #[error("Routing service returned no route")]
    NoRoute,

    #[error("Need at least 2 waypoints to request a route, got {0}")]
    InsufficientWaypoints(usize),

    #[error("Routing service returned an invalid route: {0}")]
    InvalidRoute(#[from] RouteError),
}

/// Resolves a seed route into the waypoints to animate.
///
/// Implementations may block; async callers should use `spawn_blocking`.
pub trait RouteSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    fn resolve(&self, seed: &Route) -> Result<Route, RoutingError>;
}

/// A fixed in-process route. Ignores the seed.
#[derive(Debug, Clone)]
pub struct StaticRouteSource {
    route: Route,
}

impl StaticRouteSource {
    pub fn new(route: Route) -> Self {
        Self { route }
    }
}

impl RouteSource for StaticRouteSource {
    fn name(&self) -> &str {
        "static"
    }

    fn resolve(&self, _seed: &Route) -> Result<Route, RoutingError> {
        Ok(self.route.clone())
    }
}

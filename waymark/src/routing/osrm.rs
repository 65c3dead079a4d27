//! OSRM-compatible route service client.
//!
//! Only the first route's GeoJSON geometry is used; every other field of the
//! response is ignored.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use super::http::{HttpClient, ReqwestClient};
use super::{RouteSource, RoutingError};
use crate::config::RoutingSettings;
use crate::coord::Coordinate;
use crate::route::Route;

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    routes: Vec<RouteEntry>,
}

#[derive(Debug, Deserialize)]
struct RouteEntry {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<Vec<f64>>,
}

/// Parse a routing response body into a [`Route`].
///
/// Expects `{ "routes": [ { "geometry": { "coordinates": [[lon, lat], ...] } } ] }`.
/// Positions may carry extra components (e.g. elevation); only the first
/// two are read.
///
/// # Errors
///
/// - [`RoutingError::Malformed`] if the body is not of that shape
/// - [`RoutingError::NoRoute`] if `routes` is missing or empty
/// - [`RoutingError::InvalidRoute`] if a coordinate is out of range
pub fn parse_route_response(body: &[u8]) -> Result<Route, RoutingError> {
    let response: RouteResponse =
        serde_json::from_slice(body).map_err(|e| RoutingError::Malformed(e.to_string()))?;

    let first = response
        .routes
        .into_iter()
        .next()
        .ok_or(RoutingError::NoRoute)?;

    let pairs = first
        .geometry
        .coordinates
        .into_iter()
        .enumerate()
        .map(|(i, position)| match position.as_slice() {
            [lon, lat, ..] => Ok([*lon, *lat]),
            _ => Err(RoutingError::Malformed(format!(
                "coordinate {} has {} components",
                i,
                position.len()
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Route::from_lon_lat(pairs)?)
}

/// Route source backed by an OSRM `route` endpoint.
pub struct OsrmRouteSource<C: HttpClient = ReqwestClient> {
    client: C,
    base_url: String,
    profile: String,
}

impl OsrmRouteSource<ReqwestClient> {
    /// Build a source with a real HTTP client from config settings.
    pub fn from_settings(settings: &RoutingSettings) -> Result<Self, RoutingError> {
        let client = ReqwestClient::with_timeout(Duration::from_secs(settings.timeout_secs))?;
        Ok(Self::with_client(
            client,
            settings.base_url.clone(),
            settings.profile.clone(),
        ))
    }
}

impl<C: HttpClient> OsrmRouteSource<C> {
    pub fn with_client(client: C, base_url: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            profile: profile.into(),
        }
    }

    /// Request URL for a route from `start` to `end` with full GeoJSON geometry.
    pub fn request_url(&self, start: &Coordinate, end: &Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url,
            self.profile,
            start.longitude,
            start.latitude,
            end.longitude,
            end.latitude
        )
    }
}

impl<C: HttpClient> RouteSource for OsrmRouteSource<C> {
    fn name(&self) -> &str {
        "osrm"
    }

    fn resolve(&self, seed: &Route) -> Result<Route, RoutingError> {
        let (start, end) = match (seed.first(), seed.last()) {
            (Some(start), Some(end)) if seed.len() >= 2 => (start, end),
            _ => return Err(RoutingError::InsufficientWaypoints(seed.len())),
        };

        let url = self.request_url(start, end);
        debug!(url = %url, "Requesting road route");

        let body = self.client.get(&url)?;
        let route = parse_route_response(&body)?;

        info!(
            points = route.len(),
            distance_m = route.total_distance_meters() as u64,
            "Road route resolved"
        );
        Ok(route)
    }
}

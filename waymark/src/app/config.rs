//! Application configuration for `WaymarkApp`.
//!
//! `AppConfig` is the subset of [`ConfigFile`] the bootstrap needs, plus the
//! seed route the road route is requested for.

use crate::config::{ConfigFile, RoutingSettings, SimulatorSettings, DEFAULT_SPEED_MPS};
use crate::route::{demo_route, Route};

/// Top-level configuration passed to [`WaymarkApp::start`](super::WaymarkApp::start).
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Marker speed in meters per second.
    pub speed_mps: f64,

    /// Simulator tick interval bounds.
    pub simulator: SimulatorSettings,

    /// Routing service settings.
    pub routing: RoutingSettings,

    /// Waypoints the simulator cycles through; its endpoints seed the road route.
    pub seed_route: Route,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            speed_mps: DEFAULT_SPEED_MPS,
            simulator: SimulatorSettings::default(),
            routing: RoutingSettings::default(),
            seed_route: demo_route(),
        }
    }
}

impl AppConfig {
    /// Create application config from a loaded configuration file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            speed_mps: config.animation.speed_mps,
            simulator: config.simulator.clone(),
            routing: config.routing.clone(),
            seed_route: demo_route(),
        }
    }

    pub fn with_speed(mut self, speed_mps: f64) -> Self {
        self.speed_mps = speed_mps;
        self
    }

    pub fn with_simulator_interval(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.simulator = SimulatorSettings {
            min_interval_ms: min_ms,
            max_interval_ms: max_ms,
        };
        self
    }

    pub fn with_seed_route(mut self, route: Route) -> Self {
        self.seed_route = route;
        self
    }
}

//! Application error types.

use std::fmt;

use crate::animation::AnimationError;
use crate::config::ConfigError;
use crate::routing::RoutingError;
use crate::simulator::SimulatorError;

/// Errors that can occur during application lifecycle.
#[derive(Debug)]
pub enum AppError {
    /// Configuration was rejected.
    Config(ConfigError),

    /// Failed to set up the waypoint simulator.
    Simulator(SimulatorError),

    /// The route source could not produce a route.
    RouteAcquisition(RoutingError),

    /// The animator refused to start a run.
    Animation(AnimationError),

    /// A background task panicked or was aborted.
    TaskJoin(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::Simulator(e) => write!(f, "Failed to start simulator: {}", e),
            AppError::RouteAcquisition(e) => write!(f, "Failed to acquire route: {}", e),
            AppError::Animation(e) => write!(f, "Failed to start animation: {}", e),
            AppError::TaskJoin(msg) => write!(f, "Background task failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::Simulator(e) => Some(e),
            AppError::RouteAcquisition(e) => Some(e),
            AppError::Animation(e) => Some(e),
            AppError::TaskJoin(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl From<SimulatorError> for AppError {
    fn from(e: SimulatorError) -> Self {
        AppError::Simulator(e)
    }
}

impl From<RoutingError> for AppError {
    fn from(e: RoutingError) -> Self {
        AppError::RouteAcquisition(e)
    }
}

impl From<AnimationError> for AppError {
    fn from(e: AnimationError) -> Self {
        AppError::Animation(e)
    }
}

//! Waymark - route animation for map views
//!
//! Turns an ordered list of geographic waypoints into a smooth, time-based
//! animation of a marker travelling along the path at a constant speed. Each
//! frame carries the marker position, a heading and the untraversed
//! remainder of the route, ready for a renderer to draw.
//!
//! # Modules
//!
//! - [`coord`]: coordinates and great-circle math
//! - [`route`]: immutable waypoint sequences and the built-in demo route
//! - [`animation`]: segment planning and the cancellable animator
//! - [`simulator`]: a looping "current position" stand-in for live data
//! - [`routing`]: route acquisition from a routing service
//! - [`app`]: start-up wiring of the pieces above
//! - [`config`], [`logging`]: INI configuration and tracing setup

pub mod animation;
pub mod app;
pub mod config;
pub mod coord;
pub mod logging;
pub mod route;
pub mod routing;
pub mod simulator;

/// Crate version, as reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use animation::{AnimationEvent, AnimationRun, AnimationSink, Animator, RunState, Sample};
pub use coord::Coordinate;
pub use route::Route;

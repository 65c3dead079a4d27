//! Application bootstrap and lifecycle management.
//!
//! This module provides the `WaymarkApp` type which reproduces the demo
//! start-up sequence and owns its long-running tasks.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       WaymarkApp                          │
//! │                                                           │
//! │  1. WaypointSimulator ──► watch<SimulatedPosition>        │
//! │     └── tick loop (random 2–3 s)                          │
//! │                                                           │
//! │  2. RouteSource (spawn_blocking) ──► Route                │
//! │                                                           │
//! │  3. Animator ──► AnimationSink                            │
//! │     └── one drive task per run                            │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use waymark::app::{AppConfig, WaymarkApp};
//!
//! let app = WaymarkApp::start(AppConfig::default(), sink)?;
//! let run = app.animate_with(source).await;
//!
//! // Graceful shutdown
//! app.shutdown().await;
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::WaymarkApp;
pub use config::AppConfig;
pub use error::AppError;

//! Waypoint simulator.
//!
//! Stands in for live position data: publishes a "current position" that
//! steps through a fixed route on randomized intervals, wrapping back to the
//! first waypoint after the last.
//!
//! # State Machine
//!
//! ```text
//! Stopped --start()--> Running --stop()--> Stopped
//! ```
//!
//! The loop holds only the current index, advanced modulo the route length,
//! so it can run indefinitely.
//!
//! # Example
//!
//! ```ignore
//! use waymark::route::demo_route;
//! use waymark::simulator::WaypointSimulator;
//!
//! let mut simulator = WaypointSimulator::new(demo_route())?;
//! let mut position = simulator.subscribe();
//! simulator.start();
//!
//! while position.changed().await.is_ok() {
//!     println!("now at {:?}", *position.borrow());
//! }
//! ```

mod schedule;

pub use schedule::{
    RandomSchedule, SequenceSchedule, TickSchedule, DEFAULT_MAX_INTERVAL, DEFAULT_MIN_INTERVAL,
};

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::coord::Coordinate;
use crate::route::Route;

/// Errors raised when configuring the simulator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulatorError {
    #[error("Simulator route must contain at least one waypoint")]
    EmptyRoute,

    #[error("Invalid tick interval: min {min:?} must be less than max {max:?}")]
    InvalidInterval { min: Duration, max: Duration },

    #[error("Tick schedule must contain at least one delay")]
    EmptySchedule,
}

/// Whether the tick loop is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorState {
    Stopped,
    Running,
}

/// Published position, with the waypoint index it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedPosition {
    pub index: usize,
    pub position: Coordinate,
}

struct TickLoop {
    cancellation: CancellationToken,
    task: JoinHandle<()>,
}

/// Steps a current-position pointer through a fixed route.
pub struct WaypointSimulator {
    route: Route,
    schedule: Arc<dyn TickSchedule>,
    position: watch::Sender<Option<SimulatedPosition>>,
    running: Option<TickLoop>,
}

impl WaypointSimulator {
    /// Create a simulator with the default random 2–3 s schedule.
    pub fn new(route: Route) -> Result<Self, SimulatorError> {
        Self::with_schedule(route, Arc::new(RandomSchedule::default()))
    }

    /// Create a simulator with an explicit tick schedule.
    ///
    /// # Errors
    ///
    /// [`SimulatorError::EmptyRoute`] if `route` has no waypoints.
    pub fn with_schedule(
        route: Route,
        schedule: Arc<dyn TickSchedule>,
    ) -> Result<Self, SimulatorError> {
        if route.is_empty() {
            return Err(SimulatorError::EmptyRoute);
        }
        let (position, _) = watch::channel(None);
        Ok(Self {
            route,
            schedule,
            position,
            running: None,
        })
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn state(&self) -> SimulatorState {
        match &self.running {
            Some(tick_loop) if !tick_loop.task.is_finished() => SimulatorState::Running,
            _ => SimulatorState::Stopped,
        }
    }

    /// Observe the current position. `None` until the first start.
    ///
    /// Receivers stay valid across stop/start cycles.
    pub fn subscribe(&self) -> watch::Receiver<Option<SimulatedPosition>> {
        self.position.subscribe()
    }

    /// Latest published position (snapshot).
    pub fn current(&self) -> Option<SimulatedPosition> {
        *self.position.borrow()
    }

    /// Start ticking from the first waypoint. No-op if already running.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(&mut self) {
        if self.state() == SimulatorState::Running {
            debug!("Waypoint simulator already running");
            return;
        }

        let first = self.route.points()[0];
        self.position.send_replace(Some(SimulatedPosition {
            index: 0,
            position: first,
        }));

        let cancellation = CancellationToken::new();
        let task = tokio::spawn(tick_loop(
            self.route.clone(),
            Arc::clone(&self.schedule),
            self.position.clone(),
            cancellation.clone(),
        ));
        self.running = Some(TickLoop { cancellation, task });

        info!(waypoints = self.route.len(), "Waypoint simulator started");
    }

    /// Stop ticking and wait for the loop to exit. The last position stays
    /// published. Safe to call when stopped.
    pub async fn stop(&mut self) {
        if let Some(tick_loop) = self.running.take() {
            tick_loop.cancellation.cancel();
            if let Err(e) = tick_loop.task.await {
                debug!(error = %e, "Simulator task ended abnormally");
            }
            info!("Waypoint simulator stopped");
        }
    }

    /// Stop, then start again from the first waypoint.
    pub async fn restart(&mut self) {
        self.stop().await;
        self.start();
    }
}

impl Drop for WaypointSimulator {
    fn drop(&mut self) {
        if let Some(tick_loop) = self.running.take() {
            tick_loop.cancellation.cancel();
        }
    }
}

async fn tick_loop(
    route: Route,
    schedule: Arc<dyn TickSchedule>,
    position: watch::Sender<Option<SimulatedPosition>>,
    cancellation: CancellationToken,
) {
    let mut index = 0usize;

    loop {
        let delay = schedule.next_delay();
        tokio::select! {
            biased;
            _ = cancellation.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }

        index = (index + 1) % route.len();
        let next = route.points()[index];
        position.send_replace(Some(SimulatedPosition {
            index,
            position: next,
        }));
        debug!(index, delay_ms = delay.as_millis() as u64, position = %next, "Simulator tick");
    }
}

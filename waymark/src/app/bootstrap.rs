//! Application bootstrap implementation.
//!
//! `WaymarkApp` wires the waypoint simulator, a route source and the
//! animator together in the order the demo application expects.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use super::config::AppConfig;
use super::error::AppError;
use crate::animation::{AnimationRun, AnimationSink, Animator};
use crate::routing::RouteSource;
use crate::simulator::{RandomSchedule, SimulatedPosition, SimulatorState, WaypointSimulator};

/// Waymark application with service lifecycle management.
///
/// Start-up order:
/// 1. the waypoint simulator begins cycling the seed route
/// 2. a road route between the seed's endpoints is requested
/// 3. the road route is animated; on failure the app stays idle
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use waymark::app::{AppConfig, WaymarkApp};
/// use waymark::animation::CollectingSink;
/// use waymark::routing::OsrmRouteSource;
///
/// let config = AppConfig::default();
/// let source = Arc::new(OsrmRouteSource::from_settings(&config.routing)?);
/// let app = WaymarkApp::start(config, CollectingSink::new())?;
///
/// if let Ok(mut run) = app.animate_with(source).await {
///     run.finished().await;
/// }
/// app.shutdown().await;
/// ```
pub struct WaymarkApp<S: AnimationSink> {
    config: AppConfig,
    simulator: WaypointSimulator,
    animator: Animator<S>,
}

impl<S: AnimationSink> WaymarkApp<S> {
    /// Start the simulator and build an idle animator over `sink`.
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the simulator interval or seed route is invalid.
    pub fn start(config: AppConfig, sink: S) -> Result<Self, AppError> {
        Self::start_with_shared_sink(config, Arc::new(sink))
    }

    /// Same as [`start`](Self::start) over a sink the caller keeps a handle to.
    pub fn start_with_shared_sink(config: AppConfig, sink: Arc<S>) -> Result<Self, AppError> {
        info!(
            waypoints = config.seed_route.len(),
            speed_mps = config.speed_mps,
            "Starting WaymarkApp"
        );

        let schedule = RandomSchedule::new(
            config.simulator.min_interval(),
            config.simulator.max_interval(),
        )?;
        let mut simulator =
            WaypointSimulator::with_schedule(config.seed_route.clone(), Arc::new(schedule))?;
        simulator.start();

        Ok(Self {
            config,
            simulator,
            animator: Animator::with_shared_sink(sink),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Observe the simulated position.
    pub fn position(&self) -> watch::Receiver<Option<SimulatedPosition>> {
        self.simulator.subscribe()
    }

    pub fn simulator_state(&self) -> SimulatorState {
        self.simulator.state()
    }

    pub fn animator(&self) -> &Animator<S> {
        &self.animator
    }

    /// Resolve a route from `source` and animate it at the configured speed.
    ///
    /// The source runs on the blocking pool. A failure is logged and
    /// returned; the simulator keeps running and no run is started.
    pub async fn animate_with(
        &self,
        source: Arc<dyn RouteSource>,
    ) -> Result<AnimationRun, AppError> {
        let seed = self.config.seed_route.clone();
        let source_name = source.name().to_string();

        let resolved = tokio::task::spawn_blocking(move || source.resolve(&seed))
            .await
            .map_err(|e| AppError::TaskJoin(e.to_string()))?;

        let route = match resolved {
            Ok(route) => route,
            Err(e) => {
                warn!(source = %source_name, error = %e, "Route acquisition failed, staying idle");
                return Err(AppError::RouteAcquisition(e));
            }
        };

        info!(
            source = %source_name,
            points = route.len(),
            "Route acquired, starting animation"
        );
        Ok(self.animator.play(route, self.config.speed_mps).await?)
    }

    /// Cancel any animation and stop the simulator.
    pub async fn shutdown(mut self) {
        info!("Shutting down WaymarkApp");

        self.animator.cancel().await;
        self.simulator.stop().await;

        info!("WaymarkApp shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationEvent, CollectingSink, RunState};
    use crate::route::{demo_route, Route};
    use crate::routing::{RoutingError, StaticRouteSource};

    struct FailingSource;

    impl RouteSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        fn resolve(&self, _seed: &Route) -> Result<Route, RoutingError> {
            Err(RoutingError::Http("connection refused".to_string()))
        }
    }

    fn test_config() -> AppConfig {
        AppConfig::default()
            .with_speed(500.0)
            .with_simulator_interval(100, 200)
    }

    #[tokio::test(start_paused = true)]
    async fn test_app_start_and_shutdown() {
        let app = WaymarkApp::start(test_config(), CollectingSink::new()).unwrap();

        assert_eq!(app.simulator_state(), SimulatorState::Running);
        assert_eq!(app.position().borrow().unwrap().index, 0);
        assert!(!app.animator().is_active().await);

        app.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_animate_with_static_source_completes() {
        let sink = Arc::new(CollectingSink::new());
        let app = WaymarkApp::start_with_shared_sink(test_config(), Arc::clone(&sink)).unwrap();

        let mut run = app
            .animate_with(Arc::new(StaticRouteSource::new(demo_route())))
            .await
            .unwrap();
        assert_eq!(run.finished().await, RunState::Completed);

        let events = sink.events();
        assert!(matches!(events.first(), Some(AnimationEvent::Placed { .. })));
        assert!(matches!(events.last(), Some(AnimationEvent::Finished)));

        app.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_acquisition_stays_idle() {
        let sink = Arc::new(CollectingSink::new());
        let app = WaymarkApp::start_with_shared_sink(test_config(), Arc::clone(&sink)).unwrap();

        let err = app.animate_with(Arc::new(FailingSource)).await.unwrap_err();
        assert!(matches!(err, AppError::RouteAcquisition(RoutingError::Http(_))));

        assert!(sink.events().is_empty());
        assert!(!app.animator().is_active().await);
        assert_eq!(app.simulator_state(), SimulatorState::Running);

        app.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_speed_is_reported() {
        let app = WaymarkApp::start(test_config().with_speed(0.0), CollectingSink::new()).unwrap();

        let err = app
            .animate_with(Arc::new(StaticRouteSource::new(demo_route())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Animation(_)));

        app.shutdown().await;
    }

    #[tokio::test]
    async fn test_invalid_interval_rejected() {
        let config = test_config().with_simulator_interval(300, 300);
        let result = WaymarkApp::start(config, CollectingSink::new());
        assert!(matches!(result, Err(AppError::Simulator(_))));
    }

    #[tokio::test]
    async fn test_empty_seed_route_rejected() {
        let config = test_config().with_seed_route(Route::new(Vec::<crate::coord::Coordinate>::new()));
        let result = WaymarkApp::start(config, CollectingSink::new());
        assert!(matches!(result, Err(AppError::Simulator(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_running_animation() {
        let sink = Arc::new(CollectingSink::new());
        let app = WaymarkApp::start_with_shared_sink(
            test_config().with_speed(1.0),
            Arc::clone(&sink),
        )
        .unwrap();

        let mut run = app
            .animate_with(Arc::new(StaticRouteSource::new(demo_route())))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        app.shutdown().await;

        assert_eq!(run.finished().await, RunState::Cancelled);
        assert!(!sink
            .events()
            .iter()
            .any(|e| matches!(e, AnimationEvent::Finished)));
    }
}

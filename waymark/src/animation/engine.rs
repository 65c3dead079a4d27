//! Cancellable animation runner.
//!
//! The [`Animator`] owns at most one in-flight run per sink. Starting a new
//! run cancels the previous one and waits for its task to exit before the
//! new run emits anything, so the sink never sees interleaved frames.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::plan::plan_segments;
use super::sample::AnimationEvent;
use super::sink::AnimationSink;
use crate::route::Route;

/// Errors raised when starting a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
    #[error("Invalid speed: {0} m/s (must be finite and greater than zero)")]
    InvalidSpeed(f64),
}

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// Emitted the last frame of the last segment.
    Completed,
    /// Stopped early by `cancel` or by a newer run.
    Cancelled,
}

/// Handle to a run started by [`Animator::play`].
///
/// Cheap to clone. Dropping the handle does not stop the run.
#[derive(Debug, Clone)]
pub struct AnimationRun {
    id: u64,
    cancellation: CancellationToken,
    state: watch::Receiver<RunState>,
}

impl AnimationRun {
    /// Monotonic run number, unique per animator.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current state (snapshot).
    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    /// Request cancellation. Idempotent.
    ///
    /// The run stops before its next emission; use [`Animator::cancel`] to
    /// also wait for the task to exit.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Wait until the run leaves [`RunState::Running`] and return its final state.
    pub async fn finished(&mut self) -> RunState {
        match self.state.wait_for(|s| *s != RunState::Running).await {
            Ok(state) => *state,
            // Sender gone without a terminal state: the task was torn down
            Err(_) => RunState::Cancelled,
        }
    }
}

/// The run currently owned by an animator.
struct ActiveRun {
    id: u64,
    cancellation: CancellationToken,
    task: JoinHandle<()>,
}

/// Drives animation runs into a presentation sink.
///
/// # Example
///
/// ```ignore
/// use waymark::animation::{Animator, CollectingSink};
/// use waymark::route::demo_route;
///
/// let animator = Animator::new(CollectingSink::new());
/// let mut run = animator.play(demo_route(), 60.0).await?;
/// run.finished().await;
/// ```
pub struct Animator<S: AnimationSink> {
    sink: Arc<S>,
    current: Mutex<Option<ActiveRun>>,
    next_id: AtomicU64,
}

impl<S: AnimationSink> Animator<S> {
    pub fn new(sink: S) -> Self {
        Self::with_shared_sink(Arc::new(sink))
    }

    /// Create an animator over a sink the caller keeps a handle to.
    pub fn with_shared_sink(sink: Arc<S>) -> Self {
        Self {
            sink,
            current: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    /// Start animating `route` at `speed_mps`, superseding any active run.
    ///
    /// The previous run is cancelled and awaited first. The marker is then
    /// placed on the first waypoint (without suspending) and the segment
    /// loop is spawned. A route with fewer than two points yields a run that
    /// is already [`RunState::Completed`] and emits nothing.
    ///
    /// # Errors
    ///
    /// [`AnimationError::InvalidSpeed`] if `speed_mps` is not a positive
    /// finite number. Nothing is cancelled in that case.
    pub async fn play(&self, route: Route, speed_mps: f64) -> Result<AnimationRun, AnimationError> {
        if !speed_mps.is_finite() || speed_mps <= 0.0 {
            return Err(AnimationError::InvalidSpeed(speed_mps));
        }

        let mut current = self.current.lock().await;
        if let Some(previous) = current.take() {
            stop_run(previous).await;
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancellation = CancellationToken::new();
        let (state_tx, state_rx) = watch::channel(RunState::Running);
        let run = AnimationRun {
            id,
            cancellation: cancellation.clone(),
            state: state_rx,
        };

        let start = match route.first() {
            Some(start) if route.is_animatable() => *start,
            _ => {
                debug!(run = id, points = route.len(), "Route too short to animate");
                state_tx.send_replace(RunState::Completed);
                return Ok(run);
            }
        };

        self.sink.emit(AnimationEvent::Placed {
            position: start,
            heading_degrees: 0.0,
            trail: route.clone(),
        });

        info!(
            run = id,
            points = route.len(),
            speed_mps,
            "Animation run started"
        );

        let task = tokio::spawn(drive(
            id,
            route,
            speed_mps,
            Arc::clone(&self.sink),
            cancellation.clone(),
            state_tx,
        ));

        *current = Some(ActiveRun {
            id,
            cancellation,
            task,
        });

        Ok(run)
    }

    /// Cancel the active run, if any, and wait for it to exit.
    ///
    /// Safe to call repeatedly or when nothing is running.
    pub async fn cancel(&self) {
        if let Some(previous) = self.current.lock().await.take() {
            stop_run(previous).await;
        }
    }

    /// True while a run task is still executing.
    pub async fn is_active(&self) -> bool {
        self.current
            .lock()
            .await
            .as_ref()
            .is_some_and(|run| !run.task.is_finished())
    }
}

impl<S: AnimationSink> Drop for Animator<S> {
    fn drop(&mut self) {
        if let Some(run) = self.current.get_mut().take() {
            run.cancellation.cancel();
        }
    }
}

async fn stop_run(run: ActiveRun) {
    run.cancellation.cancel();
    if let Err(e) = run.task.await {
        debug!(run = run.id, error = %e, "Animation task ended abnormally");
    }
    debug!(run = run.id, "Previous animation run stopped");
}

/// The segment loop of one run.
///
/// Cancellation is checked before every emission and raced against every
/// sleep, so a cancelled run never emits again.
async fn drive<S: AnimationSink>(
    id: u64,
    route: Route,
    speed_mps: f64,
    sink: Arc<S>,
    cancellation: CancellationToken,
    state: watch::Sender<RunState>,
) {
    let started = Instant::now();
    let mut frames = 0u64;

    for plan in plan_segments(&route, speed_mps) {
        debug!(
            run = id,
            to_index = plan.to_index,
            distance_m = plan.distance_meters,
            duration_ms = plan.duration_ms,
            steps = plan.steps,
            bearing = plan.bearing_degrees,
            "Animating segment"
        );

        let delay = plan.step_delay();
        for step in 1..=plan.steps {
            if cancellation.is_cancelled() {
                finish_cancelled(id, frames, &state);
                return;
            }

            sink.emit(AnimationEvent::Sample(plan.sample_at(step, &route)));
            frames += 1;

            tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    finish_cancelled(id, frames, &state);
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    sink.emit(AnimationEvent::Finished);
    state.send_replace(RunState::Completed);
    info!(
        run = id,
        frames,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Animation run completed"
    );
}

fn finish_cancelled(id: u64, frames: u64, state: &watch::Sender<RunState>) {
    state.send_replace(RunState::Cancelled);
    info!(run = id, frames, "Animation run cancelled");
}

//! Route animation engine.
//!
//! Converts a [`Route`](crate::route::Route) and a target speed into a
//! time-ordered stream of [`AnimationEvent`]s delivered to an
//! [`AnimationSink`].
//!
//! # Architecture
//!
//! ```text
//! Route + speed ──► plan_segments ──► SegmentPlan per segment
//!                                          │
//!                  Animator::play ──► drive loop (one tokio task per run)
//!                                          │  emit, then sleep(duration / steps)
//!                                          ▼
//!                                   AnimationSink (renderer adapter)
//! ```
//!
//! Per segment `a -> b`:
//!
//! - segments shorter than 0.5 m are skipped,
//! - duration is `max(50, round(distance / speed * 1000))` ms,
//! - frame count is `max(1, round(duration * 30 / 1000))`,
//! - heading is the initial great-circle bearing, held for the whole segment,
//! - positions are linear interpolations at `t = step / steps`.
//!
//! # Example
//!
//! ```ignore
//! use waymark::animation::{event_channel, Animator};
//! use waymark::route::demo_route;
//!
//! let (tx, mut events) = event_channel();
//! let animator = Animator::new(tx);
//! let run = animator.play(demo_route(), 60.0).await?;
//!
//! while let Some(event) = events.recv().await {
//!     // render marker, camera and trail
//! }
//! ```

mod engine;
mod plan;
mod sample;
mod sink;

pub use engine::{AnimationError, AnimationRun, Animator, RunState};
pub use plan::{
    frames, plan_segments, segment_duration_ms, step_count, SegmentPlan, FRAMES_PER_SECOND,
    MIN_SEGMENT_DISTANCE_METERS, MIN_SEGMENT_DURATION_MS,
};
pub use sample::{AnimationEvent, Sample};
pub use sink::{event_channel, AnimationEvents, AnimationSink, CollectingSink};

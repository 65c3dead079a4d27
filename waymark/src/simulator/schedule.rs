//! Tick delay sources for the waypoint simulator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::SimulatorError;

/// Default lower bound of the tick interval (inclusive).
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(2000);

/// Default upper bound of the tick interval (exclusive).
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_millis(3000);

/// Supplies the delay before each simulator tick.
pub trait TickSchedule: Send + Sync + 'static {
    fn next_delay(&self) -> Duration;
}

/// Uniformly random delays in `[min, max)` at millisecond resolution.
#[derive(Debug)]
pub struct RandomSchedule {
    min_ms: u64,
    max_ms: u64,
    rng: Mutex<StdRng>,
}

impl RandomSchedule {
    /// Create a schedule drawing from `[min, max)`, seeded from the OS.
    ///
    /// # Errors
    ///
    /// [`SimulatorError::InvalidInterval`] unless `min < max`.
    pub fn new(min: Duration, max: Duration) -> Result<Self, SimulatorError> {
        Self::with_rng(min, max, StdRng::from_os_rng())
    }

    /// Same as [`new`](Self::new) with a fixed seed, for reproducible runs.
    pub fn seeded(min: Duration, max: Duration, seed: u64) -> Result<Self, SimulatorError> {
        Self::with_rng(min, max, StdRng::seed_from_u64(seed))
    }

    fn with_rng(min: Duration, max: Duration, rng: StdRng) -> Result<Self, SimulatorError> {
        let min_ms = min.as_millis() as u64;
        let max_ms = max.as_millis() as u64;
        if min_ms >= max_ms {
            return Err(SimulatorError::InvalidInterval { min, max });
        }
        Ok(Self {
            min_ms,
            max_ms,
            rng: Mutex::new(rng),
        })
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.min_ms),
            Duration::from_millis(self.max_ms),
        )
    }
}

impl Default for RandomSchedule {
    fn default() -> Self {
        Self {
            min_ms: DEFAULT_MIN_INTERVAL.as_millis() as u64,
            max_ms: DEFAULT_MAX_INTERVAL.as_millis() as u64,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }
}

impl TickSchedule for RandomSchedule {
    fn next_delay(&self) -> Duration {
        let ms = self.rng.lock().random_range(self.min_ms..self.max_ms);
        Duration::from_millis(ms)
    }
}

/// Replays a fixed list of delays, cycling when exhausted.
#[derive(Debug)]
pub struct SequenceSchedule {
    delays: Vec<Duration>,
    cursor: AtomicUsize,
}

impl SequenceSchedule {
    /// # Errors
    ///
    /// [`SimulatorError::EmptySchedule`] if `delays` is empty.
    pub fn new(delays: Vec<Duration>) -> Result<Self, SimulatorError> {
        if delays.is_empty() {
            return Err(SimulatorError::EmptySchedule);
        }
        Ok(Self {
            delays,
            cursor: AtomicUsize::new(0),
        })
    }

    /// A schedule that always waits `delay`.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            delays: vec![delay],
            cursor: AtomicUsize::new(0),
        }
    }
}

impl TickSchedule for SequenceSchedule {
    fn next_delay(&self) -> Duration {
        let i = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.delays[i % self.delays.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_schedule_stays_in_bounds() {
        let schedule = RandomSchedule::default();
        for _ in 0..1000 {
            let d = schedule.next_delay();
            assert!(d >= DEFAULT_MIN_INTERVAL && d < DEFAULT_MAX_INTERVAL, "{:?}", d);
        }
    }

    #[test]
    fn test_random_schedule_rejects_empty_range() {
        let d = Duration::from_millis(100);
        assert!(matches!(
            RandomSchedule::new(d, d),
            Err(SimulatorError::InvalidInterval { .. })
        ));
        assert!(RandomSchedule::new(d * 2, d).is_err());
    }

    #[test]
    fn test_seeded_schedule_is_reproducible() {
        let min = Duration::from_millis(10);
        let max = Duration::from_millis(1000);
        let a = RandomSchedule::seeded(min, max, 7).unwrap();
        let b = RandomSchedule::seeded(min, max, 7).unwrap();
        let xs: Vec<_> = (0..20).map(|_| a.next_delay()).collect();
        let ys: Vec<_> = (0..20).map(|_| b.next_delay()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_random_schedule_varies() {
        let schedule = RandomSchedule::seeded(DEFAULT_MIN_INTERVAL, DEFAULT_MAX_INTERVAL, 1).unwrap();
        let first = schedule.next_delay();
        assert!((0..50).any(|_| schedule.next_delay() != first));
    }

    #[test]
    fn test_sequence_schedule_cycles() {
        let schedule = SequenceSchedule::new(vec![
            Duration::from_millis(1),
            Duration::from_millis(2),
        ])
        .unwrap();
        let got: Vec<u64> = (0..5)
            .map(|_| schedule.next_delay().as_millis() as u64)
            .collect();
        assert_eq!(got, vec![1, 2, 1, 2, 1]);
    }

    #[test]
    fn test_sequence_schedule_rejects_empty() {
        assert!(matches!(
            SequenceSchedule::new(Vec::new()),
            Err(SimulatorError::EmptySchedule)
        ));
    }
}

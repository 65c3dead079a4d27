//! Segment planning: the timing arithmetic of a run, without a clock.
//!
//! [`plan_segments`] turns a route and a speed into one [`SegmentPlan`] per
//! animatable segment. The runner walks these plans and sleeps between
//! steps; [`frames`] walks them without sleeping, which is what tests and
//! the `route` CLI command use.

use std::time::Duration;

use crate::coord::{bearing_degrees, distance_meters, lerp, Coordinate};
use crate::route::Route;

use super::sample::Sample;

/// Fixed interpolation frame rate.
pub const FRAMES_PER_SECOND: u32 = 30;

/// Segments shorter than this are duplicate points and are skipped.
pub const MIN_SEGMENT_DISTANCE_METERS: f64 = 0.5;

/// Floor on a segment's duration, so short hops are still visible.
pub const MIN_SEGMENT_DURATION_MS: u64 = 50;

/// Timing of one segment between consecutive waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPlan {
    /// Route index of the destination waypoint.
    pub to_index: usize,
    pub from: Coordinate,
    pub to: Coordinate,
    pub distance_meters: f64,
    pub duration_ms: u64,
    /// Number of frames; always at least 1.
    pub steps: u32,
    /// Heading held for every frame of the segment.
    pub bearing_degrees: f64,
}

impl SegmentPlan {
    /// Plan the segment `from -> to`, or `None` if it is too short to animate.
    pub fn new(to_index: usize, from: Coordinate, to: Coordinate, speed_mps: f64) -> Option<Self> {
        let distance = distance_meters(&from, &to);
        if distance < MIN_SEGMENT_DISTANCE_METERS {
            return None;
        }

        let duration_ms = segment_duration_ms(distance, speed_mps);
        Some(Self {
            to_index,
            from,
            to,
            distance_meters: distance,
            duration_ms,
            steps: step_count(duration_ms),
            bearing_degrees: bearing_degrees(&from, &to),
        })
    }

    /// Pause after each frame; `steps` pauses add up to `duration_ms`.
    pub fn step_delay(&self) -> Duration {
        Duration::from_secs_f64(self.duration_ms as f64 / f64::from(self.steps) / 1000.0)
    }

    /// Marker position at frame `step` (1-based). `step == steps` is `to`.
    pub fn position_at(&self, step: u32) -> Coordinate {
        lerp(&self.from, &self.to, f64::from(step) / f64::from(self.steps))
    }

    pub(crate) fn sample_at(&self, step: u32, route: &Route) -> Sample {
        Sample::new(
            self.position_at(step),
            self.bearing_degrees,
            route.clone(),
            self.to_index,
        )
    }
}

/// `max(50, round(distance / speed * 1000))` milliseconds.
pub fn segment_duration_ms(distance_meters: f64, speed_mps: f64) -> u64 {
    ((distance_meters / speed_mps * 1000.0).round() as u64).max(MIN_SEGMENT_DURATION_MS)
}

/// `max(1, round(duration_ms * fps / 1000))` frames.
pub fn step_count(duration_ms: u64) -> u32 {
    ((duration_ms as f64 * f64::from(FRAMES_PER_SECOND) / 1000.0).round() as u32).max(1)
}

/// Lazily plan every animatable segment of `route`, in order.
pub fn plan_segments(route: &Route, speed_mps: f64) -> impl Iterator<Item = SegmentPlan> + '_ {
    route
        .segments()
        .filter_map(move |(to_index, a, b)| SegmentPlan::new(to_index, *a, *b, speed_mps))
}

/// Every sample a run would emit, paired with the pause that follows it.
pub fn frames(route: &Route, speed_mps: f64) -> impl Iterator<Item = (Sample, Duration)> + '_ {
    plan_segments(route, speed_mps).flat_map(move |plan| {
        let delay = plan.step_delay();
        (1..=plan.steps).map(move |step| (plan.sample_at(step, route), delay))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::EARTH_RADIUS_METERS;

    /// Degrees of latitude spanning `meters` along a meridian.
    fn lat_offset(meters: f64) -> f64 {
        (meters / EARTH_RADIUS_METERS).to_degrees()
    }

    #[test]
    fn test_segment_duration_rounds() {
        // 111.19m at 60 m/s = 1853.2ms
        assert_eq!(segment_duration_ms(111.19, 60.0), 1853);
        assert_eq!(segment_duration_ms(60.0, 60.0), 1000);
    }

    #[test]
    fn test_segment_duration_floor() {
        assert_eq!(segment_duration_ms(0.6, 60.0), 50);
        assert_eq!(segment_duration_ms(3.0, 60.0), 50);
    }

    #[test]
    fn test_step_count() {
        assert_eq!(step_count(1000), 30);
        assert_eq!(step_count(1853), 56);
        // 50ms * 30 / 1000 = 1.5, rounds half away from zero
        assert_eq!(step_count(50), 2);
        assert_eq!(step_count(10), 1);
    }

    #[test]
    fn test_plan_skips_short_segment() {
        let a = Coordinate::new_unchecked(30.0, 76.0);
        let b = Coordinate::new_unchecked(30.0 + lat_offset(0.3), 76.0);
        assert!(SegmentPlan::new(1, a, b, 60.0).is_none());
    }

    #[test]
    fn test_plan_keeps_segment_at_threshold() {
        let a = Coordinate::new_unchecked(30.0, 76.0);
        let b = Coordinate::new_unchecked(30.0 + lat_offset(0.6), 76.0);
        let plan = SegmentPlan::new(1, a, b, 60.0).unwrap();
        assert_eq!(plan.duration_ms, 50);
        assert_eq!(plan.steps, 2);
    }

    #[test]
    fn test_plan_one_second_segment() {
        let a = Coordinate::new_unchecked(0.0, 0.0);
        let b = Coordinate::new_unchecked(lat_offset(60.0), 0.0);
        let plan = SegmentPlan::new(1, a, b, 60.0).unwrap();

        assert_eq!(plan.duration_ms, 1000);
        assert_eq!(plan.steps, 30);
        assert!(plan.bearing_degrees.abs() < 1e-9);
        let total: Duration = (0..plan.steps).map(|_| plan.step_delay()).sum();
        assert!((total.as_secs_f64() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_position_at_last_step_is_destination() {
        let a = Coordinate::new_unchecked(30.6882, 76.7062);
        let b = Coordinate::new_unchecked(30.6885, 76.7070);
        let plan = SegmentPlan::new(1, a, b, 60.0).unwrap();
        assert_eq!(plan.position_at(plan.steps), b);
    }

    #[test]
    fn test_plan_segments_skip_duplicates() {
        let route = Route::from_lat_lon([
            (0.0, 0.0),
            (0.0, 0.0),
            (0.0, 0.001),
            (0.0, 0.001),
            (0.0, 0.002),
        ])
        .unwrap();
        let plans: Vec<_> = plan_segments(&route, 60.0).collect();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].to_index, 2);
        assert_eq!(plans[1].to_index, 4);
    }

    #[test]
    fn test_frames_count_matches_plans() {
        let route = crate::route::demo_route();
        let expected: u32 = plan_segments(&route, 60.0).map(|p| p.steps).sum();
        assert_eq!(frames(&route, 60.0).count(), expected as usize);
    }

    #[test]
    fn test_frames_trail_shrinks() {
        let route = crate::route::demo_route();
        let mut last_len = route.len();
        for (sample, _) in frames(&route, 60.0) {
            let len = sample.remaining_path().len();
            assert!(len <= last_len);
            last_len = len;
        }
        assert_eq!(last_len, 1);
    }

    #[test]
    fn test_frames_empty_for_degenerate_route() {
        let single = Route::from_lat_lon([(0.0, 0.0)]).unwrap();
        assert_eq!(frames(&single, 60.0).count(), 0);
    }
}

//! Terminal presentation of animation events.

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::warn;
use waymark::animation::{plan_segments, AnimationEvent, AnimationSink, RunState, Sample};
use waymark::Route;

use crate::commands::common::OutputMode;

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames {msg}";

/// Prints animation events as text lines, JSON lines or a progress bar.
pub struct TerminalSink {
    mode: OutputMode,
    speed_mps: f64,
    progress: Option<ProgressBar>,
}

impl TerminalSink {
    /// Text mode draws a progress bar instead of per-frame lines when
    /// stdout is a terminal.
    pub fn new(mode: OutputMode, speed_mps: f64) -> Self {
        let progress = (mode == OutputMode::Text && console::user_attended()).then(|| {
            let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stdout());
            bar.set_style(
                ProgressStyle::with_template(PROGRESS_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );
            bar
        });

        Self {
            mode,
            speed_mps,
            progress,
        }
    }

    /// Print the outcome of a run once it has stopped.
    pub fn report(&self, state: RunState) {
        if let Some(bar) = &self.progress {
            match state {
                RunState::Completed => bar.finish_with_message("arrived"),
                _ => bar.abandon_with_message("cancelled"),
            }
        }
        if self.mode == OutputMode::Text && state == RunState::Cancelled {
            println!("{}", style("Animation cancelled").yellow());
        }
    }

    fn line(&self, text: String) {
        match &self.progress {
            Some(bar) => bar.println(text),
            None => println!("{}", text),
        }
    }

    fn emit_text(&self, event: &AnimationEvent) {
        match event {
            AnimationEvent::Placed {
                position, trail, ..
            } => {
                if let Some(bar) = &self.progress {
                    bar.set_length(total_frames(trail, self.speed_mps));
                    bar.set_position(0);
                }
                self.line(format!(
                    "{} at {} ({} waypoints, {:.0} m)",
                    style("Placed").bold(),
                    position,
                    trail.len(),
                    trail.total_distance_meters()
                ));
            }
            AnimationEvent::Sample(sample) => match &self.progress {
                Some(bar) => {
                    bar.inc(1);
                    bar.set_message(format!(
                        "{} {:>3.0}°",
                        sample.position, sample.heading_degrees
                    ));
                }
                None => println!("{}", format_sample(sample)),
            },
            AnimationEvent::Finished => {
                self.line(format!("{}", style("Finished").green().bold()));
            }
        }
    }
}

impl AnimationSink for TerminalSink {
    fn emit(&self, event: AnimationEvent) {
        match self.mode {
            OutputMode::Json => match serde_json::to_string(&event) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!(error = %e, "Failed to encode animation event"),
            },
            OutputMode::Text => self.emit_text(&event),
        }
    }
}

/// Frames a run over `route` will emit at `speed_mps`.
pub fn total_frames(route: &Route, speed_mps: f64) -> u64 {
    plan_segments(route, speed_mps)
        .map(|plan| u64::from(plan.steps))
        .sum()
}

/// One-line text form of a sample.
pub fn format_sample(sample: &Sample) -> String {
    format!(
        "{}  heading {:>6.2}°  {} points ahead",
        sample.position,
        sample.heading_degrees,
        sample.remaining_path().len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark::animation::frames;
    use waymark::route::demo_route;

    #[test]
    fn test_total_frames_matches_offline_frames() {
        let route = demo_route();
        assert_eq!(
            total_frames(&route, 60.0),
            frames(&route, 60.0).count() as u64
        );
    }

    #[test]
    fn test_total_frames_of_single_point_route() {
        let route = Route::from_lat_lon([(30.0, 76.0)]).unwrap();
        assert_eq!(total_frames(&route, 60.0), 0);
    }

    #[test]
    fn test_format_sample() {
        let route = Route::from_lat_lon([(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]).unwrap();
        let (sample, _) = frames(&route, 1000.0).next().unwrap();
        let text = format_sample(&sample);
        assert!(text.contains("heading  90.00°"), "{}", text);
        assert!(text.contains("2 points ahead"), "{}", text);
    }

    #[test]
    fn test_json_mode_has_no_progress_bar() {
        let sink = TerminalSink::new(OutputMode::Json, 60.0);
        assert!(sink.progress.is_none());
    }
}

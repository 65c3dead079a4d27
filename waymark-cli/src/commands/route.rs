//! Route command - print the demo route and its animation plan.

use serde_json::json;
use waymark::animation::{frames, plan_segments, SegmentPlan};
use waymark::route::demo_route;

use super::common::{format_duration_ms, resolve_speed, OutputMode};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the route command.
pub struct RouteArgs {
    pub speed: Option<f64>,
    pub json: bool,
}

/// Run the route command.
pub fn run(runner: &CliRunner, args: RouteArgs) -> Result<(), CliError> {
    runner.log_startup("route");
    let speed = resolve_speed(args.speed, runner.config())?;

    let route = demo_route();
    let plans: Vec<SegmentPlan> = plan_segments(&route, speed).collect();
    let total_ms: u64 = plans.iter().map(|p| p.duration_ms).sum();
    let total_frames = frames(&route, speed).count();

    match OutputMode::from_json_flag(args.json) {
        OutputMode::Json => {
            let segments: Vec<_> = plans
                .iter()
                .map(|p| {
                    json!({
                        "to_index": p.to_index,
                        "distance_m": p.distance_meters,
                        "bearing_deg": p.bearing_degrees,
                        "duration_ms": p.duration_ms,
                        "steps": p.steps,
                    })
                })
                .collect();
            let doc = json!({
                "speed_mps": speed,
                "waypoints": route,
                "segments": segments,
                "total_distance_m": route.total_distance_meters(),
                "total_duration_ms": total_ms,
                "total_frames": total_frames,
            });
            let text =
                serde_json::to_string_pretty(&doc).map_err(|e| CliError::Output(e.to_string()))?;
            println!("{}", text);
        }
        OutputMode::Text => {
            println!("Demo route: {} waypoints at {} m/s", route.len(), speed);
            println!();
            for (i, point) in route.points().iter().enumerate() {
                println!("  [{}] {}", i, point);
            }
            println!();
            println!(
                "  {:>7}  {:>10}  {:>8}  {:>9}  {:>6}",
                "segment", "distance", "bearing", "duration", "frames"
            );
            println!("  {}", "─".repeat(48));
            for plan in &plans {
                println!(
                    "  {:>7}  {:>8.1} m  {:>7.1}°  {:>9}  {:>6}",
                    format!("{}→{}", plan.to_index - 1, plan.to_index),
                    plan.distance_meters,
                    plan.bearing_degrees,
                    format_duration_ms(plan.duration_ms),
                    plan.steps
                );
            }
            println!();
            println!(
                "Total: {:.0} m, {}, {} frames",
                route.total_distance_meters(),
                format_duration_ms(total_ms),
                total_frames
            );
        }
    }
    Ok(())
}

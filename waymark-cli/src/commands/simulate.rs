//! Simulate command - print the looping waypoint simulator's positions.

use std::sync::Arc;

use console::style;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use waymark::app::AppError;
use waymark::config::SimulatorSettings;
use waymark::route::demo_route;
use waymark::simulator::{RandomSchedule, SimulatedPosition, WaypointSimulator};

use super::common::OutputMode;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the simulate command.
pub struct SimulateArgs {
    /// Stop after this many position changes.
    pub ticks: Option<usize>,
    pub json: bool,
}

/// Run the simulate command.
pub fn run(runner: &CliRunner, args: SimulateArgs) -> Result<(), CliError> {
    runner.log_startup("simulate");
    let settings = runner.config().simulator.clone();
    let mode = OutputMode::from_json_flag(args.json);

    if mode == OutputMode::Text {
        println!(
            "Simulating {} waypoints, one every {}-{} ms",
            demo_route().len(),
            settings.min_interval_ms,
            settings.max_interval_ms
        );
        println!("Press Ctrl+C to stop");
        println!();
    }

    let shutdown = runner.shutdown_signal()?;
    runner.block_on(simulate(settings, args.ticks, mode, shutdown))
}

async fn simulate(
    settings: SimulatorSettings,
    ticks: Option<usize>,
    mode: OutputMode,
    shutdown: CancellationToken,
) -> Result<(), CliError> {
    let schedule = RandomSchedule::new(settings.min_interval(), settings.max_interval())
        .map_err(AppError::Simulator)?;
    let mut simulator = WaypointSimulator::with_schedule(demo_route(), Arc::new(schedule))
        .map_err(AppError::Simulator)?;
    let mut position = simulator.subscribe();
    simulator.start();

    if let Some(initial) = *position.borrow_and_update() {
        print_position(0, &initial, mode);
    }

    let mut changes = 0usize;
    while ticks.map_or(true, |limit| changes < limit) {
        let changed = tokio::select! {
            biased;
            _ = shutdown.cancelled() => false,
            result = position.changed() => result.is_ok(),
        };
        if !changed {
            break;
        }

        changes += 1;
        if let Some(current) = *position.borrow_and_update() {
            print_position(changes, &current, mode);
        }
    }

    simulator.stop().await;
    if mode == OutputMode::Text {
        println!();
        println!("{} after {} changes", style("Stopped").bold(), changes);
    }
    Ok(())
}

fn print_position(tick: usize, current: &SimulatedPosition, mode: OutputMode) {
    match mode {
        OutputMode::Json => println!(
            "{}",
            json!({
                "tick": tick,
                "index": current.index,
                "position": current.position,
            })
        ),
        OutputMode::Text => println!(
            "[{:>4}] waypoint {} at {}",
            tick, current.index, current.position
        ),
    }
}

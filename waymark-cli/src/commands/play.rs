//! Play command - acquire a route and animate a marker along it.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use waymark::animation::RunState;
use waymark::app::{AppConfig, AppError, WaymarkApp};
use waymark::route::demo_route;
use waymark::routing::{OsrmRouteSource, RouteSource, StaticRouteSource};

use super::common::{resolve_speed, OutputMode};
use crate::error::CliError;
use crate::runner::CliRunner;
use crate::sink::TerminalSink;

/// Arguments for the play command.
pub struct PlayArgs {
    pub demo: bool,
    pub speed: Option<f64>,
    pub json: bool,
}

/// Run the play command.
pub fn run(runner: &CliRunner, args: PlayArgs) -> Result<(), CliError> {
    runner.log_startup("play");
    let config = runner.config();

    let speed = resolve_speed(args.speed, config)?;
    let mode = OutputMode::from_json_flag(args.json);

    let source: Arc<dyn RouteSource> = if args.demo {
        Arc::new(StaticRouteSource::new(demo_route()))
    } else {
        Arc::new(
            OsrmRouteSource::from_settings(&config.routing)
                .map_err(AppError::RouteAcquisition)?,
        )
    };

    if mode == OutputMode::Text {
        println!("Waymark v{}", waymark::VERSION);
        println!("============");
        println!();
        println!("Route source: {}", source.name());
        println!("Speed:        {} m/s", speed);
        println!();
        println!("Press Ctrl+C to stop");
        println!();
    }

    let app_config = AppConfig::from_config_file(config).with_speed(speed);
    let sink = Arc::new(TerminalSink::new(mode, speed));
    let shutdown = runner.shutdown_signal()?;

    runner.block_on(play(app_config, source, sink, shutdown))
}

async fn play(
    config: AppConfig,
    source: Arc<dyn RouteSource>,
    sink: Arc<TerminalSink>,
    shutdown: CancellationToken,
) -> Result<(), CliError> {
    let app = WaymarkApp::start_with_shared_sink(config, Arc::clone(&sink))?;

    let mut run = match app.animate_with(source).await {
        Ok(run) => run,
        Err(e) => {
            app.shutdown().await;
            return Err(e.into());
        }
    };

    let handle = run.clone();
    tokio::select! {
        _ = shutdown.cancelled() => handle.cancel(),
        _ = run.finished() => {}
    }
    let state = run.finished().await;

    app.shutdown().await;
    sink.report(state);

    if state == RunState::Completed {
        tracing::info!(run = run.id(), "Playback complete");
    }
    Ok(())
}

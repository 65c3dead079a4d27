//! Waymark CLI - Command-line interface
//!
//! Animates a marker along a road route in the terminal, runs the waypoint
//! simulator, and inspects the demo route's animation plan.

mod commands;
mod error;
mod runner;
mod sink;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::play::PlayArgs;
use commands::route::RouteArgs;
use commands::simulate::SimulateArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "waymark")]
#[command(version, about = "Animate a marker along a road route", long_about = None)]
struct Cli {
    /// Config file (default: ~/.waymark/config.ini)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Acquire a road route and animate a marker along it
    Play {
        /// Animate the built-in demo route instead of querying the routing service
        #[arg(long)]
        demo: bool,

        /// Marker speed in meters per second (default from config)
        #[arg(long, value_name = "MPS")]
        speed: Option<f64>,

        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Run the looping waypoint simulator and print each position
    Simulate {
        /// Stop after this many position changes
        #[arg(long, value_name = "N")]
        ticks: Option<usize>,

        /// Print positions as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Print the demo route with per-segment distance, bearing and timing
    Route {
        /// Marker speed in meters per second (default from config)
        #[arg(long, value_name = "MPS")]
        speed: Option<f64>,

        /// Print as a JSON document
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let runner = CliRunner::new(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Play { demo, speed, json } => {
            commands::play::run(&runner, PlayArgs { demo, speed, json })
        }
        Commands::Simulate { ticks, json } => {
            commands::simulate::run(&runner, SimulateArgs { ticks, json })
        }
        Commands::Route { speed, json } => {
            commands::route::run(&runner, RouteArgs { speed, json })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_play_with_globals() {
        let cli = Cli::try_parse_from([
            "waymark",
            "play",
            "--demo",
            "--speed",
            "30",
            "--config",
            "/tmp/w.ini",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/w.ini")));
        match cli.command {
            Commands::Play { demo, speed, json } => {
                assert!(demo);
                assert_eq!(speed, Some(30.0));
                assert!(!json);
            }
            _ => panic!("expected play"),
        }
    }

    #[test]
    fn test_parse_simulate_ticks() {
        let cli = Cli::try_parse_from(["waymark", "simulate", "--ticks", "5", "--json"]).unwrap();
        match cli.command {
            Commands::Simulate { ticks, json } => {
                assert_eq!(ticks, Some(5));
                assert!(json);
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_speed() {
        assert!(Cli::try_parse_from(["waymark", "route", "--speed", "fast"]).is_err());
    }
}

//! Common types and utilities shared across CLI commands.

use waymark::config::ConfigFile;

use crate::error::CliError;

/// How a command writes its results to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable lines (and a progress bar on a terminal).
    Text,
    /// One JSON document per line.
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Text
        }
    }
}

/// Resolve marker speed from CLI args and config.
pub fn resolve_speed(cli_speed: Option<f64>, config: &ConfigFile) -> Result<f64, CliError> {
    // CLI takes precedence, then config
    let speed = cli_speed.unwrap_or(config.animation.speed_mps);
    if !speed.is_finite() || speed <= 0.0 {
        return Err(CliError::Config(format!(
            "Speed must be a positive number of meters per second, got {}",
            speed
        )));
    }
    Ok(speed)
}

/// Human-readable duration, e.g. `1m 05.3s`.
pub fn format_duration_ms(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) as f64 / 1000.0;
    if minutes > 0 {
        format!("{}m {:04.1}s", minutes, seconds)
    } else {
        format!("{:.1}s", seconds)
    }
}

//! Configuration file support.
//!
//! Settings live in an INI file, by default `~/.waymark/config.ini`. Every
//! key is optional; a missing file or key falls back to the defaults below.
//!
//! ```ini
//! [animation]
//! speed_mps = 60
//!
//! [simulator]
//! min_interval_ms = 2000
//! max_interval_ms = 3000
//!
//! [routing]
//! base_url = https://router.project-osrm.org
//! profile = driving
//! timeout_secs = 30
//!
//! [logging]
//! level = info
//! file = /tmp/waymark.log
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::{Ini, Properties};
use thiserror::Error;

// ==================== Defaults ====================

/// Default marker speed in meters per second.
pub const DEFAULT_SPEED_MPS: f64 = 60.0;

/// Default lower bound of the simulator tick interval in milliseconds.
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 2000;

/// Default upper bound (exclusive) of the simulator tick interval in milliseconds.
pub const DEFAULT_MAX_INTERVAL_MS: u64 = 3000;

/// Default routing service base URL (public OSRM demo server).
pub const DEFAULT_ROUTING_BASE_URL: &str = "https://router.project-osrm.org";

/// Default routing profile.
pub const DEFAULT_ROUTING_PROFILE: &str = "driving";

/// Default routing request timeout in seconds.
pub const DEFAULT_ROUTING_TIMEOUT_SECS: u64 = 30;

/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid value '{value}' for [{section}] {key}: {reason}")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// `[animation]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSettings {
    pub speed_mps: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            speed_mps: DEFAULT_SPEED_MPS,
        }
    }
}

/// `[simulator]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorSettings {
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
}

impl SimulatorSettings {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
            max_interval_ms: DEFAULT_MAX_INTERVAL_MS,
        }
    }
}

/// `[routing]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingSettings {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ROUTING_BASE_URL.to_string(),
            profile: DEFAULT_ROUTING_PROFILE.to_string(),
            timeout_secs: DEFAULT_ROUTING_TIMEOUT_SECS,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `info` or `waymark=debug`.
    pub level: String,
    /// Optional log file; stderr logging is always on.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub animation: AnimationSettings,
    pub simulator: SimulatorSettings,
    pub routing: RoutingSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Default config location: `~/.waymark/config.ini`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".waymark").join("config.ini"))
    }

    /// Load from `path`, or from [`default_path`](Self::default_path) when
    /// `None`. A file that does not exist yields the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Load and validate the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Parse and validate INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("animation")) {
            if let Some(speed) = parse_key::<f64>(section, "animation", "speed_mps")? {
                config.animation.speed_mps = speed;
            }
        }

        if let Some(section) = ini.section(Some("simulator")) {
            if let Some(min) = parse_key(section, "simulator", "min_interval_ms")? {
                config.simulator.min_interval_ms = min;
            }
            if let Some(max) = parse_key(section, "simulator", "max_interval_ms")? {
                config.simulator.max_interval_ms = max;
            }
        }

        if let Some(section) = ini.section(Some("routing")) {
            if let Some(url) = non_empty(section, "base_url") {
                config.routing.base_url = url.trim_end_matches('/').to_string();
            }
            if let Some(profile) = non_empty(section, "profile") {
                config.routing.profile = profile.to_string();
            }
            if let Some(timeout) = parse_key(section, "routing", "timeout_secs")? {
                config.routing.timeout_secs = timeout;
            }
        }

        if let Some(section) = ini.section(Some("logging")) {
            if let Some(level) = non_empty(section, "level") {
                config.logging.level = level.to_string();
            }
            config.logging.file = non_empty(section, "file").map(PathBuf::from);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field and range constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let speed = self.animation.speed_mps;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ConfigError::InvalidValue {
                section: "animation",
                key: "speed_mps",
                value: speed.to_string(),
                reason: "must be a positive number",
            });
        }

        if self.simulator.min_interval_ms >= self.simulator.max_interval_ms {
            return Err(ConfigError::InvalidValue {
                section: "simulator",
                key: "min_interval_ms",
                value: self.simulator.min_interval_ms.to_string(),
                reason: "must be less than max_interval_ms",
            });
        }

        if self.routing.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                section: "routing",
                key: "timeout_secs",
                value: "0".to_string(),
                reason: "must be greater than zero",
            });
        }

        Ok(())
    }

    /// Builder-style speed override.
    pub fn with_speed(mut self, speed_mps: f64) -> Self {
        self.animation.speed_mps = speed_mps;
        self
    }

    /// Builder-style simulator interval override.
    pub fn with_simulator_interval(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.simulator.min_interval_ms = min_ms;
        self.simulator.max_interval_ms = max_ms;
        self
    }
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_key<T: FromStr>(
    section: &Properties,
    section_name: &'static str,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match non_empty(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                section: section_name,
                key,
                value: raw.to_string(),
                reason: "not a valid number",
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.animation.speed_mps, 60.0);
        assert_eq!(config.simulator.min_interval(), Duration::from_millis(2000));
        assert_eq!(config.simulator.max_interval(), Duration::from_millis(3000));
        assert_eq!(config.routing.base_url, "https://router.project-osrm.org");
        assert_eq!(config.routing.profile, "driving");
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_all_sections() {
        let config = ConfigFile::from_ini_str(
            "[animation]\n\
             speed_mps = 25.5\n\
             [simulator]\n\
             min_interval_ms = 500\n\
             max_interval_ms = 900\n\
             [routing]\n\
             base_url = http://localhost:5000/\n\
             profile = cycling\n\
             timeout_secs = 5\n\
             [logging]\n\
             level = waymark=debug\n\
             file = /tmp/waymark.log\n",
        )
        .unwrap();

        assert_eq!(config.animation.speed_mps, 25.5);
        assert_eq!(config.simulator.min_interval_ms, 500);
        assert_eq!(config.simulator.max_interval_ms, 900);
        assert_eq!(config.routing.base_url, "http://localhost:5000");
        assert_eq!(config.routing.profile, "cycling");
        assert_eq!(config.routing.timeout_secs, 5);
        assert_eq!(config.logging.level, "waymark=debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/waymark.log")));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ConfigFile::from_ini_str("[animation]\nspeed_mps = 30\n").unwrap();
        assert_eq!(config.animation.speed_mps, 30.0);
        assert_eq!(config.simulator, SimulatorSettings::default());
        assert_eq!(config.routing, RoutingSettings::default());
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let config = ConfigFile::from_ini_str("[logging]\nlevel =\nfile =\n").unwrap();
        assert_eq!(config.logging, LoggingSettings::default());
    }

    #[test]
    fn test_invalid_number() {
        let err = ConfigFile::from_ini_str("[animation]\nspeed_mps = fast\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "speed_mps",
                ..
            }
        ));
        assert!(err.to_string().contains("fast"));
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let err = ConfigFile::from_ini_str("[animation]\nspeed_mps = 0\n").unwrap_err();
        assert!(err.to_string().contains("[animation] speed_mps"));
    }

    #[test]
    fn test_rejects_inverted_interval() {
        let err = ConfigFile::from_ini_str(
            "[simulator]\nmin_interval_ms = 3000\nmax_interval_ms = 2000\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                section: "simulator",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        assert!(ConfigFile::from_ini_str("[routing]\ntimeout_secs = 0\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[animation]\nspeed_mps = 12").unwrap();

        let config = ConfigFile::load(file.path()).unwrap();
        assert_eq!(config.animation.speed_mps, 12.0);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.ini");
        let config = ConfigFile::load_or_default(Some(&missing)).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_builders() {
        let config = ConfigFile::default()
            .with_speed(15.0)
            .with_simulator_interval(100, 200);
        assert_eq!(config.animation.speed_mps, 15.0);
        assert_eq!(config.simulator.min_interval_ms, 100);
        assert_eq!(config.simulator.max_interval_ms, 200);
    }
}

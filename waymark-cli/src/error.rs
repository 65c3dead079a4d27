//! CLI error type and exit codes.

use std::fmt;

use waymark::app::AppError;
use waymark::config::ConfigError;
use waymark::logging::LoggingError;

/// Errors surfaced to the user by the `waymark` binary.
#[derive(Debug)]
pub enum CliError {
    /// Bad configuration file or command-line value.
    Config(String),

    /// Logging could not be initialized.
    Logging(LoggingError),

    /// The application failed to start or to acquire/animate a route.
    App(AppError),

    /// Failed to create the Tokio runtime.
    Runtime(String),

    /// Failed to write command output.
    Output(String),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 2,
            CliError::App(AppError::RouteAcquisition(_)) => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Logging(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::App(e) => write!(f, "{}", e),
            CliError::Runtime(msg) => write!(f, "Failed to create Tokio runtime: {}", msg),
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Logging(e) => Some(e),
            CliError::App(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark::routing::RoutingError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Config("bad".to_string()).exit_code(), 2);
        assert_eq!(
            CliError::App(AppError::RouteAcquisition(RoutingError::NoRoute)).exit_code(),
            3
        );
        assert_eq!(CliError::Runtime("no threads".to_string()).exit_code(), 1);
    }

    #[test]
    fn test_config_error_conversion() {
        let err: CliError = ConfigError::Parse("line 3".to_string()).into();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_app_error_display_passes_through() {
        let err = CliError::App(AppError::RouteAcquisition(RoutingError::NoRoute));
        assert_eq!(
            err.to_string(),
            AppError::RouteAcquisition(RoutingError::NoRoute).to_string()
        );
    }
}

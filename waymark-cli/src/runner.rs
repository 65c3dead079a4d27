//! Shared start-up for every command: config, logging, runtime, Ctrl+C.

use std::future::Future;
use std::path::Path;

use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::info;
use waymark::config::ConfigFile;
use waymark::logging::{init_logging, LoggingGuard};

use crate::error::CliError;

/// Everything a command needs before it runs.
pub struct CliRunner {
    config: ConfigFile,
    runtime: Runtime,
    _logging: LoggingGuard,
}

impl CliRunner {
    /// Load config, install logging and build the runtime.
    pub fn new(config_path: Option<&Path>, verbose: bool) -> Result<Self, CliError> {
        let config = load_config(config_path)?;
        let logging = init_logging(&config.logging, verbose)?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::Runtime(e.to_string()))?;

        Ok(Self {
            config,
            runtime,
            _logging: logging,
        })
    }

    pub fn log_startup(&self, command: &str) {
        info!(
            version = waymark::VERSION,
            command,
            routing = %self.config.routing.base_url,
            "waymark starting"
        );
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Token cancelled on the first Ctrl+C.
    pub fn shutdown_signal(&self) -> Result<CancellationToken, CliError> {
        let token = CancellationToken::new();
        let handler_token = token.clone();
        ctrlc::set_handler(move || {
            handler_token.cancel();
        })
        .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;
        Ok(token)
    }
}

/// Load the config file at `path`, or the default location.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    if let Some(p) = path {
        if !p.exists() {
            return Err(CliError::Config(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    }
    Ok(ConfigFile::load_or_default(path)?)
}

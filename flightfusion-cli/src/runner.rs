//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, and JSON output
//! to reduce duplication across command handlers.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::CliError;
use flightfusion::config::{ConfigFile, DEFAULT_LOG_FILE_NAME};
use flightfusion::logging::{init_logging_full, LoggingGuard};

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner with optional debug logging.
    ///
    /// Logs always go to the configured file. With `debug_mode` they are
    /// also echoed to stderr at debug level, so stdout stays pure JSON.
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let log_path = &config.logging.file;
        let log_dir = log_path.parent().unwrap_or_else(|| Path::new("."));
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string());

        let logging_guard = init_logging_full(log_dir, &log_file, debug_mode, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("FlightFusion v{}", flightfusion::VERSION);
        info!("FlightFusion CLI: {} command", command);
    }
}

/// Print `value` as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(CliError::Output)?;

    println!("{}", json);
    Ok(())
}

//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use flightfusion::config::ConfigFileError;
use flightfusion::orchestrator::FetchError;
use flightfusion::provider::ProviderError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Invalid command-line arguments
    InvalidArgs(String),
    /// Failed to build the HTTP client
    HttpClient(ProviderError),
    /// Fetch cycle failed; the error envelope was already printed
    Fetch(FetchError),
    /// Failed to read an input file
    FileRead { path: PathBuf, error: std::io::Error },
    /// Input file is not a valid provider payload
    Payload { path: PathBuf, error: serde_json::Error },
    /// Failed to write JSON to stdout
    Output(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Fetch(FetchError::Disabled(_)) => {
                eprintln!();
                eprintln!("Provider switches are read from the [controls] section.");
                eprintln!("Run 'flightfusion config list' to check them.");
            }
            CliError::Fetch(_) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. No network connectivity");
                eprintln!("  2. ADS-B Exchange key missing: set api_key in [primary] or RAPIDAPI_KEY");
                eprintln!("  3. OpenSky rate limit reached: wait and retry");
            }
            _ => {}
        }

        process::exit(self.exit_code())
    }

    /// Process exit code: 2 for usage errors, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgs(msg) => write!(f, "Invalid arguments: {}", msg),
            CliError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Fetch(e) => write!(f, "Failed to fetch flights: {}", e),
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read '{}': {}", path.display(), error)
            }
            CliError::Payload { path, error } => {
                write!(f, "'{}' is not a valid payload: {}", path.display(), error)
            }
            CliError::Output(e) => write!(f, "Failed to write output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::HttpClient(e) => Some(e),
            CliError::Fetch(e) => Some(e),
            CliError::FileRead { error, .. } => Some(error),
            CliError::Payload { error, .. } => Some(error),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Fetch(e)
    }
}

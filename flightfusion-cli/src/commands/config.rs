//! Configuration management CLI commands.
//!
//! Provides `config list`, `config path`, and `config init` for inspecting
//! and creating the configuration file from the command line.

use clap::Subcommand;
use flightfusion::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// List all configuration settings (API key masked)
    List,

    /// Show the configuration file path
    Path,

    /// Create the configuration file with default values
    ///
    /// Leaves an existing file untouched.
    Init,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Init => run_init(),
    }
}

/// List all configuration settings.
fn run_list() -> Result<(), CliError> {
    let config = ConfigFile::load()?;

    println!("Configuration Settings");
    println!("======================");
    println!();

    let mut current_section = "";

    for (name, value) in config.entries() {
        let (section, key) = name.split_once('.').unwrap_or(("", name));

        // Print section header when section changes
        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }

        if value.is_empty() {
            println!("  {} = (not set)", key);
        } else {
            println!("  {} = {}", key, value);
        }
    }

    Ok(())
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

/// Write a default configuration file if none exists.
fn run_init() -> Result<(), CliError> {
    let path = config_file_path();

    if ConfigFile::ensure_exists_at(&path)? {
        println!("Created {}", path.display());
        println!("Set api_key in [primary] to use ADS-B Exchange.");
    } else {
        println!("Configuration already exists at {}", path.display());
    }

    Ok(())
}

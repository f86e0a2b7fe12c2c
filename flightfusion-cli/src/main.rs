//! FlightFusion CLI - Command-line interface
//!
//! This binary provides a command-line interface to the FlightFusion library.
//! Flight data is written to stdout as JSON; logs go to the configured log
//! file (and stderr with `--debug`).

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::common::ProviderType;
use commands::config::ConfigCommands;
use commands::fetch::FetchArgs;
use commands::fuse::FuseArgs;

#[derive(Parser)]
#[command(name = "flightfusion")]
#[command(version = flightfusion::VERSION)]
#[command(about = "Live flight positions fused from ADS-B Exchange and OpenSky", long_about = None)]
struct Cli {
    /// Enable debug logging (also echoed to stderr)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch live flights, worldwide or for one area
    Fetch {
        /// Provider to try first (default: fetch.provider from config)
        #[arg(long, value_enum)]
        provider: Option<ProviderType>,

        /// Center latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Center longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Radius in nautical miles (default: primary.radius_nm from config)
        #[arg(long)]
        dist: Option<f64>,

        /// Bounding box as lamin,lomin,lamax,lomax
        #[arg(long, allow_hyphen_values = true)]
        bbox: Option<String>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Fuse saved provider payloads without network access
    Fuse {
        /// ADS-B Exchange JSON payload file (repeatable)
        #[arg(long)]
        primary: Vec<PathBuf>,

        /// OpenSky JSON payload file (repeatable)
        #[arg(long)]
        secondary: Vec<PathBuf>,

        /// Fetch time in epoch seconds used for ADS-B Exchange `seen` (default: now)
        #[arg(long)]
        fetch_time: Option<f64>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();
    let debug = cli.debug;

    let result = match cli.command {
        Commands::Fetch {
            provider,
            lat,
            lon,
            dist,
            bbox,
            pretty,
        } => commands::fetch::run(FetchArgs {
            provider,
            lat,
            lon,
            dist,
            bbox,
            pretty,
            debug,
        }),
        Commands::Fuse {
            primary,
            secondary,
            fetch_time,
            pretty,
        } => commands::fuse::run(FuseArgs {
            primary,
            secondary,
            fetch_time,
            pretty,
            debug,
        }),
        Commands::Config(command) => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}

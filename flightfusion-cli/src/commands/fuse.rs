//! Fuse command - normalize and deduplicate saved provider payloads.
//!
//! Useful for replaying captured responses without touching the network.
//! Primary payloads are scanned before secondary payloads, each group in
//! argument order.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::info;

use flightfusion::adapter::{normalize, PrimaryPayload, RawBatch, SecondaryPayload};
use flightfusion::fusion::fuse;
use flightfusion::response::{ApiResponse, FlightsData};
use flightfusion::time::epoch_seconds_now;

use crate::error::CliError;
use crate::runner::{print_json, CliRunner};

/// Arguments for the fuse command.
pub struct FuseArgs {
    pub primary: Vec<PathBuf>,
    pub secondary: Vec<PathBuf>,
    pub fetch_time: Option<f64>,
    pub pretty: bool,
    pub debug: bool,
}

/// Run the fuse command.
pub fn run(args: FuseArgs) -> Result<(), CliError> {
    if args.primary.is_empty() && args.secondary.is_empty() {
        return Err(CliError::InvalidArgs(
            "give at least one --primary or --secondary payload file".to_string(),
        ));
    }

    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("fuse");

    let fetch_time = args.fetch_time.unwrap_or_else(epoch_seconds_now);

    let mut batches = Vec::with_capacity(args.primary.len() + args.secondary.len());
    for path in &args.primary {
        batches.push(RawBatch::Primary(read_payload::<PrimaryPayload>(path)?));
    }
    for path in &args.secondary {
        batches.push(RawBatch::Secondary(read_payload::<SecondaryPayload>(path)?));
    }

    let files = batches.len();
    let outcome = fuse(
        batches
            .into_iter()
            .flat_map(|batch| normalize(batch, fetch_time)),
    );

    info!(
        files,
        total_in = outcome.total_in,
        flights = outcome.flights.len(),
        duplicates_removed = outcome.duplicates_removed,
        "Offline fusion complete"
    );

    let mut meta = Map::new();
    meta.insert("count".into(), Value::from(outcome.flights.len()));
    meta.insert("filesRead".into(), Value::from(files));
    meta.insert("totalIn".into(), Value::from(outcome.total_in));
    meta.insert(
        "duplicatesRemoved".into(),
        Value::from(outcome.duplicates_removed),
    );

    let response = ApiResponse::success(
        FlightsData {
            flights: outcome.flights.into_reports(),
        },
        meta,
    );
    print_json(&response, args.pretty)
}

fn read_payload<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let content = std::fs::read_to_string(path).map_err(|error| CliError::FileRead {
        path: path.to_path_buf(),
        error,
    })?;
    serde_json::from_str(&content).map_err(|error| CliError::Payload {
        path: path.to_path_buf(),
        error,
    })
}

//! Fetch command - one live fetch cycle printed as a JSON envelope.

use tracing::{debug, info};

use flightfusion::config::{config_file_path, FileControls};
use flightfusion::controls::{CachedControls, TtlCache};
use flightfusion::orchestrator::FlightOrchestrator;
use flightfusion::provider::{AdsbExchangeClient, AsyncReqwestClient, OpenSkyClient};
use flightfusion::response::{ApiResponse, FlightsData};

use super::common::{resolve_provider, resolve_query, ProviderType};
use crate::error::CliError;
use crate::runner::{print_json, CliRunner};

/// Arguments for the fetch command.
pub struct FetchArgs {
    pub provider: Option<ProviderType>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub dist: Option<f64>,
    pub bbox: Option<String>,
    pub pretty: bool,
    pub debug: bool,
}

/// Run the fetch command.
///
/// Both success and failure are printed to stdout as an envelope; a failed
/// fetch additionally exits non-zero.
pub fn run(args: FetchArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("fetch");
    let config = runner.config();

    let requested = resolve_provider(args.provider, config);
    let query = resolve_query(
        args.lat,
        args.lon,
        args.dist,
        args.bbox.as_deref(),
        config,
    )?;

    let http = AsyncReqwestClient::with_timeout(config.fetch_timeout())
        .map_err(CliError::HttpClient)?;
    let controls = CachedControls::new(
        FileControls::new(config_file_path()),
        TtlCache::new(config.controls_ttl()),
    );
    let orchestrator = FlightOrchestrator::new(
        AdsbExchangeClient::new(http.clone(), config.primary_config()),
        OpenSkyClient::with_base_url(http, config.secondary.base_url.clone()),
        controls,
    )
    .with_timeout(config.fetch_timeout());

    info!(provider = %requested, ?query, "Starting fetch");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Config(format!("failed to start async runtime: {}", e)))?;
    let result = runtime.block_on(orchestrator.fetch(&query, requested));

    for entry in orchestrator.usage().snapshot() {
        debug!(
            api = entry.api_name,
            date = %entry.date,
            total = entry.record.total_calls,
            ok = entry.record.successful_calls,
            errors = entry.record.error_calls,
            "API usage"
        );
    }

    match result {
        Ok(snapshot) => {
            let response: ApiResponse<FlightsData> = snapshot.into();
            print_json(&response, args.pretty)
        }
        Err(e) => {
            let response: ApiResponse<FlightsData> = (&e).into();
            print_json(&response, args.pretty)?;
            Err(e.into())
        }
    }
}

//! Common types and utilities shared across CLI commands.

use clap::ValueEnum;
use flightfusion::config::ConfigFile;
use flightfusion::orchestrator::FlightQuery;
use flightfusion::provider::{BoundingBox, RadiusArea};
use flightfusion::report::ProviderId;

use crate::error::CliError;

/// Flight data provider selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum ProviderType {
    /// ADS-B Exchange via RapidAPI (requires API key, falls back to OpenSky)
    Primary,
    /// OpenSky Network (no API key required, never falls back)
    Secondary,
}

impl From<ProviderType> for ProviderId {
    fn from(provider: ProviderType) -> Self {
        match provider {
            ProviderType::Primary => ProviderId::Primary,
            ProviderType::Secondary => ProviderId::Secondary,
        }
    }
}

/// Resolve the requested provider from CLI args and config.
pub fn resolve_provider(cli_provider: Option<ProviderType>, config: &ConfigFile) -> ProviderId {
    cli_provider
        .map(ProviderId::from)
        .unwrap_or(config.fetch.provider)
}

/// Build the query from the area arguments.
///
/// No area means a global query. `--lat`/`--lon` select a radius query
/// (radius from `--dist`, else the configured hub radius); `--bbox` selects
/// a bounding box.
pub fn resolve_query(
    lat: Option<f64>,
    lon: Option<f64>,
    dist: Option<f64>,
    bbox: Option<&str>,
    config: &ConfigFile,
) -> Result<FlightQuery, CliError> {
    match (lat, lon, bbox) {
        (None, None, None) => {
            if dist.is_some() {
                return Err(CliError::InvalidArgs(
                    "--dist requires --lat and --lon".to_string(),
                ));
            }
            Ok(FlightQuery::Global)
        }
        (Some(lat), Some(lon), None) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(CliError::InvalidArgs(format!(
                    "coordinates out of range: {}, {}",
                    lat, lon
                )));
            }
            let radius = dist.unwrap_or(config.primary.radius_nm);
            if !radius.is_finite() || radius <= 0.0 {
                return Err(CliError::InvalidArgs(
                    "--dist must be a positive number".to_string(),
                ));
            }
            Ok(FlightQuery::Radius(RadiusArea::new(lat, lon, radius)))
        }
        (None, None, Some(bbox)) => {
            let bbox: BoundingBox = bbox.parse().map_err(CliError::InvalidArgs)?;
            Ok(FlightQuery::BoundingBox(bbox))
        }
        (Some(_), None, _) | (None, Some(_), _) => Err(CliError::InvalidArgs(
            "--lat and --lon must be given together".to_string(),
        )),
        (_, _, Some(_)) => Err(CliError::InvalidArgs(
            "--bbox cannot be combined with --lat/--lon".to_string(),
        )),
    }
}

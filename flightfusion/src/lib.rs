//! FlightFusion - worldwide live flight positions from two providers
//!
//! This library fetches aircraft positions from a primary ADS-B aggregator
//! (ADS-B Exchange) and a secondary community network (OpenSky), normalizes
//! both into one canonical record, and merges duplicate sightings of the same
//! aircraft into a single authoritative position.
//!
//! # Layers
//!
//! - [`report`] - canonical [`report::AircraftReport`]
//! - [`adapter`] - raw provider payloads → reports
//! - [`fusion`] - one report per ICAO address
//! - [`provider`] - HTTP clients and query regions
//! - [`orchestrator`] - region fan-out, fallback, fusion
//! - [`controls`] - provider on/off switches behind a TTL cache
//! - [`response`] - client response envelope
//!
//! # High-Level API
//!
//! ```ignore
//! use flightfusion::config::ConfigFile;
//! use flightfusion::controls::StaticControls;
//! use flightfusion::orchestrator::{FlightOrchestrator, FlightQuery};
//! use flightfusion::provider::{AdsbExchangeClient, AsyncReqwestClient, OpenSkyClient};
//!
//! let config = ConfigFile::load()?;
//! let http = AsyncReqwestClient::with_timeout(config.fetch_timeout())?;
//! let orchestrator = FlightOrchestrator::new(
//!     AdsbExchangeClient::new(http.clone(), config.primary_config()),
//!     OpenSkyClient::with_base_url(http, &config.secondary.base_url),
//!     StaticControls(config.api_controls()),
//! );
//!
//! let snapshot = orchestrator.fetch(&FlightQuery::Global, config.fetch.provider).await?;
//! println!("{} flights", snapshot.meta.count);
//! ```

pub mod adapter;
pub mod config;
pub mod controls;
pub mod fusion;
pub mod logging;
pub mod orchestrator;
pub mod provider;
pub mod report;
pub mod response;
pub mod time;
pub mod usage;

/// Version of the FlightFusion library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

//! ADS-B Exchange client (primary provider).
//!
//! Accessed through RapidAPI with an API key. Queries are circles around a
//! center point.
//!
//! # API Endpoint
//!
//! - `https://{host}/v2/lat/{lat}/lon/{lon}/dist/{dist}/`
//!
//! with headers `x-rapidapi-host: {host}` and `x-rapidapi-key: {key}`.

use tracing::debug;

use super::region::{primary_regions, Area, RadiusArea, Region, DEFAULT_RADIUS_NM};
use super::{AsyncHttpClient, FlightProvider, ProviderError};
use crate::adapter::{PrimaryPayload, RawBatch};
use crate::report::ProviderId;

/// Default RapidAPI host for ADS-B Exchange.
pub const DEFAULT_PRIMARY_HOST: &str = "adsbexchange-com1.p.rapidapi.com";

/// Connection settings for the primary provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryConfig {
    pub host: String,
    pub api_key: Option<String>,
    /// Radius of each global region.
    pub radius_nm: f64,
}

impl Default for PrimaryConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_PRIMARY_HOST.to_string(),
            api_key: None,
            radius_nm: DEFAULT_RADIUS_NM,
        }
    }
}

/// ADS-B Exchange flight provider.
///
/// # Example
///
/// ```no_run
/// use flightfusion::provider::{AdsbExchangeClient, AsyncReqwestClient, PrimaryConfig};
///
/// let http = AsyncReqwestClient::new().unwrap();
/// let config = PrimaryConfig {
///     api_key: Some("YOUR_RAPIDAPI_KEY".to_string()),
///     ..PrimaryConfig::default()
/// };
/// let provider = AdsbExchangeClient::new(http, config);
/// ```
pub struct AdsbExchangeClient<C: AsyncHttpClient> {
    http_client: C,
    config: PrimaryConfig,
    regions: Vec<Region>,
}

impl<C: AsyncHttpClient> AdsbExchangeClient<C> {
    pub fn new(http_client: C, config: PrimaryConfig) -> Self {
        let regions = primary_regions(config.radius_nm);
        Self {
            http_client,
            config,
            regions,
        }
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingCredentials("ADS-B Exchange API key".into()))
    }

    /// Builds the query URL; the radius is sent in whole nautical miles.
    fn build_url(&self, area: &RadiusArea) -> String {
        format!(
            "https://{}/v2/lat/{}/lon/{}/dist/{}/",
            self.config.host,
            area.latitude,
            area.longitude,
            area.radius_nm.round().max(1.0) as u32
        )
    }
}

impl<C: AsyncHttpClient> FlightProvider for AdsbExchangeClient<C> {
    fn id(&self) -> ProviderId {
        ProviderId::Primary
    }

    fn global_regions(&self) -> &[Region] {
        &self.regions
    }

    fn ensure_ready(&self) -> Result<(), ProviderError> {
        self.api_key().map(|_| ())
    }

    async fn fetch(&self, area: &Area) -> Result<RawBatch, ProviderError> {
        let api_key = self.api_key()?;
        let url = self.build_url(&area.to_radius());
        let headers = [
            ("x-rapidapi-host", self.config.host.as_str()),
            ("x-rapidapi-key", api_key),
        ];

        let body = self.http_client.get_with_headers(&url, &headers).await?;
        let payload: PrimaryPayload = serde_json::from_slice(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("ADS-B Exchange: {}", e)))?;

        debug!(url = %url, aircraft = payload.raw_len(), "Primary provider response");
        Ok(RawBatch::Primary(payload))
    }
}

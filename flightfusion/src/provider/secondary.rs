//! OpenSky Network client (secondary provider).
//!
//! Anonymous access to the public state vector endpoint, queried by
//! bounding box:
//!
//! - `{base_url}/states/all?lamin={}&lomin={}&lamax={}&lomax={}`

use tracing::debug;

use super::region::{secondary_regions, Area, BoundingBox, Region};
use super::{AsyncHttpClient, FlightProvider, ProviderError};
use crate::adapter::{RawBatch, SecondaryPayload};
use crate::report::ProviderId;

/// Default OpenSky REST base URL.
pub const DEFAULT_SECONDARY_BASE_URL: &str = "https://opensky-network.org/api";

/// OpenSky Network flight provider.
pub struct OpenSkyClient<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
    regions: Vec<Region>,
}

impl<C: AsyncHttpClient> OpenSkyClient<C> {
    pub fn new(http_client: C) -> Self {
        Self::with_base_url(http_client, DEFAULT_SECONDARY_BASE_URL)
    }

    pub fn with_base_url(http_client: C, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            regions: secondary_regions(),
        }
    }

    fn build_url(&self, bbox: &BoundingBox) -> String {
        format!(
            "{}/states/all?lamin={}&lomin={}&lamax={}&lomax={}",
            self.base_url, bbox.lamin, bbox.lomin, bbox.lamax, bbox.lomax
        )
    }
}

impl<C: AsyncHttpClient> FlightProvider for OpenSkyClient<C> {
    fn id(&self) -> ProviderId {
        ProviderId::Secondary
    }

    fn global_regions(&self) -> &[Region] {
        &self.regions
    }

    async fn fetch(&self, area: &Area) -> Result<RawBatch, ProviderError> {
        let url = self.build_url(&area.to_bounding_box());

        let body = self
            .http_client
            .get_with_headers(&url, &[("Accept", "application/json")])
            .await?;
        let payload: SecondaryPayload = serde_json::from_slice(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("OpenSky: {}", e)))?;

        debug!(url = %url, states = payload.raw_len(), "Secondary provider response");
        Ok(RawBatch::Secondary(payload))
    }
}

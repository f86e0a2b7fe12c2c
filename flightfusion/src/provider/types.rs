//! Provider types and traits

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use super::region::{Area, Region};
use crate::adapter::RawBatch;
use crate::report::ProviderId;

/// Errors that can occur during provider operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Non-2xx response.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Body could not be parsed as the provider's payload.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The request exceeded its time budget.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Required credentials are missing; nothing was sent.
    #[error("{0} not configured")]
    MissingCredentials(String),

    /// Every region of a fan-out failed.
    #[error("All {regions} region requests failed")]
    AllRegionsFailed { regions: usize },
}

/// Async trait for live flight data providers.
///
/// Implementors fetch one area and return the parsed, not yet normalized,
/// response body.
pub trait FlightProvider: Send + Sync {
    /// Which provider this is.
    fn id(&self) -> ProviderId;

    /// Fixed regions covering populated airspace, in fan-out order.
    fn global_regions(&self) -> &[Region];

    /// Check that the provider can be queried at all (e.g. credentials).
    ///
    /// A failure here is a whole-provider failure, not a per-region one.
    fn ensure_ready(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    /// Fetch all aircraft within an area.
    ///
    /// Providers convert `area` to the query shape their API understands.
    fn fetch(&self, area: &Area) -> impl Future<Output = Result<RawBatch, ProviderError>> + Send;
}

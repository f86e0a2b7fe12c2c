//! Live flight data providers.
//!
//! Two sources are supported, in order of trust:
//!
//! - [`AdsbExchangeClient`] (primary): unfiltered ADS-B feed, queried by
//!   center point and radius.
//! - [`OpenSkyClient`] (secondary): crowd-sourced state vectors, queried by
//!   bounding box.
//!
//! Both implement [`FlightProvider`] over an injected [`AsyncHttpClient`], so
//! tests can substitute a mock transport.
//!
//! ```ignore
//! use flightfusion::provider::{AsyncReqwestClient, OpenSkyClient, FlightProvider};
//!
//! let http = AsyncReqwestClient::new()?;
//! let provider = OpenSkyClient::new(http);
//! let batch = provider.fetch(&provider.global_regions()[0].area).await?;
//! ```

mod http;
mod primary;
pub mod region;
mod secondary;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_HTTP_TIMEOUT};
pub use primary::{AdsbExchangeClient, PrimaryConfig, DEFAULT_PRIMARY_HOST};
pub use region::{Area, BoundingBox, RadiusArea, Region, DEFAULT_RADIUS_NM};
pub use secondary::{OpenSkyClient, DEFAULT_SECONDARY_BASE_URL};
pub use types::{FlightProvider, ProviderError};

#[cfg(test)]
pub use http::tests::{MockAsyncHttpClient, RecordedRequest};

//! Provider adapters - normalize raw provider payloads.
//!
//! Each provider returns a different JSON shape. The adapters convert those
//! shapes into canonical [`AircraftReport`]s, converting units and dropping
//! entries that cannot be used (missing coordinates, empty address, wrong
//! JSON types). Dropping is silent: a malformed entry never fails the batch.
//!
//! The payload kind is carried explicitly by [`RawBatch`] and dispatched by
//! [`normalize`]; adapters never guess the provider from field names.
//!
//! # Example
//!
//! ```
//! use flightfusion::adapter::{normalize, PrimaryPayload, RawBatch};
//!
//! let payload: PrimaryPayload = serde_json::from_str(
//!     r#"{"ac": [{"hex": "4ca1fa", "lat": 53.4, "lon": -6.2, "seen": 1.5}]}"#,
//! ).unwrap();
//!
//! let reports = normalize(RawBatch::Primary(payload), 1_700_000_000.0);
//! assert_eq!(reports.len(), 1);
//! assert_eq!(reports[0].observed_at, 1_699_999_998.5);
//! ```

pub mod primary;
pub mod secondary;

pub use primary::PrimaryPayload;
pub use secondary::SecondaryPayload;

use crate::report::{AircraftReport, ProviderId};

/// One raw response body, tagged with the provider that produced it.
#[derive(Debug, Clone)]
pub enum RawBatch {
    Primary(PrimaryPayload),
    Secondary(SecondaryPayload),
}

impl RawBatch {
    /// Provider this batch came from.
    pub fn provider(&self) -> ProviderId {
        match self {
            Self::Primary(_) => ProviderId::Primary,
            Self::Secondary(_) => ProviderId::Secondary,
        }
    }

    /// Number of raw entries before normalization.
    pub fn raw_len(&self) -> usize {
        match self {
            Self::Primary(payload) => payload.raw_len(),
            Self::Secondary(payload) => payload.raw_len(),
        }
    }
}

/// Normalize a raw batch into canonical reports.
///
/// `fetch_time` is the Unix time (seconds) at which the batch was received;
/// the primary adapter derives observation times from it.
pub fn normalize(batch: RawBatch, fetch_time: f64) -> Vec<AircraftReport> {
    let raw_len = batch.raw_len();
    let provider = batch.provider();

    let reports = match batch {
        RawBatch::Primary(payload) => primary::normalize(&payload, fetch_time),
        RawBatch::Secondary(payload) => secondary::normalize(&payload),
    };

    if reports.len() < raw_len {
        tracing::trace!(
            provider = %provider,
            raw = raw_len,
            kept = reports.len(),
            "Dropped unusable entries during normalization"
        );
    }

    reports
}

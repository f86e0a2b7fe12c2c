//! Orchestrator query, output and error types.

use serde::Serialize;
use thiserror::Error;

use crate::provider::{Area, BoundingBox, ProviderError, RadiusArea};
use crate::report::{AircraftReport, ProviderId};

/// What area to fetch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightQuery {
    /// Fan out over the provider's fixed global regions.
    Global,
    /// One circle query.
    Radius(RadiusArea),
    /// One bounding box query.
    BoundingBox(BoundingBox),
}

impl FlightQuery {
    /// The single area for non-global queries.
    pub fn area(&self) -> Option<Area> {
        match self {
            Self::Global => None,
            Self::Radius(r) => Some(Area::Radius(*r)),
            Self::BoundingBox(b) => Some(Area::BoundingBox(*b)),
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }
}

/// Metadata returned alongside the fused flights.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    /// Number of fused flights.
    pub count: usize,

    /// Provider that actually served the data (after any fallback).
    pub provider: ProviderId,

    /// Number of region requests issued.
    pub regions_queried: usize,

    /// Only present when at least one duplicate was removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicates_removed: Option<usize>,
}

/// Result of one fetch cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSnapshot {
    pub flights: Vec<AircraftReport>,
    pub meta: SnapshotMeta,
}

/// Errors that reach the caller of [`FlightOrchestrator::fetch`].
///
/// Per-region failures never appear here; they are logged and skipped.
///
/// [`FlightOrchestrator::fetch`]: super::FlightOrchestrator::fetch
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Every provider usable for this request is switched off.
    #[error("Flight data disabled: {0}")]
    Disabled(String),

    /// The serving provider failed and no fallback was available.
    #[error("{provider} provider failed: {source}")]
    Provider {
        provider: ProviderId,
        source: ProviderError,
    },

    /// The primary provider failed and so did the fallback.
    #[error("Primary provider failed ({primary}); fallback failed ({secondary})")]
    FallbackFailed {
        primary: ProviderError,
        secondary: ProviderError,
    },
}

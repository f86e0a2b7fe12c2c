//! Flight fetch orchestration
//!
//! Fans out region queries to a provider, tolerates individual region
//! failures, falls back from the primary to the secondary provider, and fuses
//! the combined reports into one snapshot.

mod fetch;
mod types;

pub use fetch::{select_provider, FlightOrchestrator};
pub use types::{FetchError, FlightQuery, FlightSnapshot, SnapshotMeta};

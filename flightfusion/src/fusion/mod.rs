//! Fusion engine - deduplicate reports across providers and regions.
//!
//! Overlapping region queries and multiple providers produce several reports
//! for the same aircraft. [`fuse`] keeps exactly one report per ICAO address
//! using a single left-to-right scan.
//!
//! # Selection Logic
//!
//! For an incoming report `r` and the current winner `w` for the same address:
//!
//! 1. `|r.t - w.t| <= 1s` (simultaneous): the primary provider beats the
//!    secondary provider; within the same provider `r` wins only when strictly
//!    newer, so equal timestamps keep scan order.
//! 2. `|r.t - w.t| > 1s`: the strictly newer report wins regardless of
//!    provider. A stale trusted reading loses to a fresh untrusted one.
//!
//! Reports are joined purely on address. Two aircraft at the same position are
//! never merged.
//!
//! # Example
//!
//! ```
//! use flightfusion::fusion::fuse;
//! use flightfusion::report::{AircraftReport, IcaoAddress, Position, ProviderId};
//!
//! let report = |t: f64, provider| {
//!     AircraftReport::new(
//!         IcaoAddress::parse("abc123").unwrap(),
//!         Position::new(40.6, -73.8),
//!         t,
//!         provider,
//!     )
//! };
//!
//! let outcome = fuse(vec![
//!     report(100.4, ProviderId::Secondary),
//!     report(100.0, ProviderId::Primary),
//! ]);
//!
//! assert_eq!(outcome.duplicates_removed, 1);
//! assert_eq!(outcome.flights.get("abc123").unwrap().provider, ProviderId::Primary);
//! ```

mod set;

pub use set::{FusedFlightSet, Offer};

use crate::report::AircraftReport;

/// Reports closer together than this (inclusive) are treated as simultaneous.
pub const SIMULTANEITY_WINDOW_SECS: f64 = 1.0;

/// Result of one fusion pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FusionOutcome {
    /// One report per aircraft.
    pub flights: FusedFlightSet,

    /// Number of reports offered.
    pub total_in: usize,

    /// `total_in - flights.len()`.
    pub duplicates_removed: usize,
}

/// Decide whether `incoming` should replace the current winner `existing`.
///
/// Both reports must share an ICAO address.
pub fn should_replace(incoming: &AircraftReport, existing: &AircraftReport) -> bool {
    if incoming.time_delta(existing) <= SIMULTANEITY_WINDOW_SECS {
        if incoming.provider == existing.provider {
            incoming.observed_at > existing.observed_at
        } else {
            incoming.provider.is_preferred_over(existing.provider)
        }
    } else {
        incoming.observed_at > existing.observed_at
    }
}

/// Fuse a sequence of reports into one report per aircraft.
///
/// Never fails; an empty input yields an empty set. Input order only matters
/// for exact ties, which keep the earlier report.
pub fn fuse<I>(reports: I) -> FusionOutcome
where
    I: IntoIterator<Item = AircraftReport>,
{
    let mut flights = FusedFlightSet::new();
    let mut total_in = 0usize;
    let mut replaced = 0usize;

    for report in reports {
        total_in += 1;
        if flights.offer(report, should_replace) == Offer::Replaced {
            replaced += 1;
        }
    }

    let duplicates_removed = total_in - flights.len();

    tracing::debug!(
        total_in,
        fused = flights.len(),
        duplicates_removed,
        replaced,
        "Fusion pass complete"
    );

    FusionOutcome {
        flights,
        total_in,
        duplicates_removed,
    }
}

impl FromIterator<AircraftReport> for FusedFlightSet {
    fn from_iter<I: IntoIterator<Item = AircraftReport>>(iter: I) -> Self {
        fuse(iter).flights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{IcaoAddress, Position, ProviderId};
    use proptest::prelude::*;

    fn report(icao: &str, t: f64, provider: ProviderId) -> AircraftReport {
        AircraftReport::new(
            IcaoAddress::parse(icao).unwrap(),
            Position::new(40.0, -74.0),
            t,
            provider,
        )
    }

    fn primary(icao: &str, t: f64) -> AircraftReport {
        report(icao, t, ProviderId::Primary)
    }

    fn secondary(icao: &str, t: f64) -> AircraftReport {
        report(icao, t, ProviderId::Secondary)
    }

    #[test]
    fn test_empty_input() {
        let outcome = fuse(Vec::new());
        assert!(outcome.flights.is_empty());
        assert_eq!(outcome.total_in, 0);
        assert_eq!(outcome.duplicates_removed, 0);
    }

    #[test]
    fn test_primary_preferred_when_simultaneous_either_order() {
        let forward = fuse(vec![primary("abc123", 100.0), secondary("abc123", 100.4)]);
        let reverse = fuse(vec![secondary("abc123", 100.4), primary("abc123", 100.0)]);

        for outcome in [forward, reverse] {
            let winner = outcome.flights.get("abc123").unwrap();
            assert_eq!(winner.provider, ProviderId::Primary);
            assert_eq!(winner.observed_at, 100.0);
            assert_eq!(outcome.duplicates_removed, 1);
        }
    }

    #[test]
    fn test_freshness_overrides_provider_trust() {
        let forward = fuse(vec![primary("abc123", 100.0), secondary("abc123", 105.0)]);
        let reverse = fuse(vec![secondary("abc123", 105.0), primary("abc123", 100.0)]);

        for outcome in [forward, reverse] {
            let winner = outcome.flights.get("abc123").unwrap();
            assert_eq!(winner.provider, ProviderId::Secondary);
            assert_eq!(winner.observed_at, 105.0);
        }
    }

    #[test]
    fn test_exact_one_second_is_simultaneous() {
        let outcome = fuse(vec![secondary("abc123", 101.0), primary("abc123", 100.0)]);
        assert_eq!(
            outcome.flights.get("abc123").unwrap().provider,
            ProviderId::Primary
        );

        let outcome = fuse(vec![primary("abc123", 100.0), secondary("abc123", 101.0)]);
        assert_eq!(
            outcome.flights.get("abc123").unwrap().provider,
            ProviderId::Primary
        );
    }

    #[test]
    fn test_just_over_one_second_uses_freshness() {
        let outcome = fuse(vec![primary("abc123", 100.0), secondary("abc123", 101.001)]);
        assert_eq!(
            outcome.flights.get("abc123").unwrap().provider,
            ProviderId::Secondary
        );
    }

    #[test]
    fn test_same_provider_simultaneous_prefers_strictly_newer() {
        let outcome = fuse(vec![primary("abc123", 100.0), primary("abc123", 100.5)]);
        assert_eq!(outcome.flights.get("abc123").unwrap().observed_at, 100.5);

        let outcome = fuse(vec![primary("abc123", 100.5), primary("abc123", 100.0)]);
        assert_eq!(outcome.flights.get("abc123").unwrap().observed_at, 100.5);
    }

    #[test]
    fn test_equal_timestamps_keep_existing() {
        let mut first = secondary("abc123", 100.0);
        first.callsign = Some("FIRST".to_string());
        let mut second = secondary("abc123", 100.0);
        second.callsign = Some("SECOND".to_string());

        let outcome = fuse(vec![first, second]);
        assert_eq!(
            outcome.flights.get("abc123").unwrap().callsign.as_deref(),
            Some("FIRST")
        );
    }

    #[test]
    fn test_secondary_never_displaces_simultaneous_primary() {
        let outcome = fuse(vec![primary("abc123", 100.0), secondary("abc123", 100.9)]);
        assert_eq!(
            outcome.flights.get("abc123").unwrap().provider,
            ProviderId::Primary
        );
    }

    #[test]
    fn test_colocated_aircraft_are_not_merged() {
        let outcome = fuse(vec![primary("aaa111", 100.0), primary("bbb222", 100.0)]);
        assert_eq!(outcome.flights.len(), 2);
        assert_eq!(outcome.duplicates_removed, 0);
    }

    #[test]
    fn test_two_region_overlap() {
        let region_a = vec![primary("a1", 10.0)];
        let region_b = vec![secondary("a1", 10.2), primary("b2", 5.0)];

        let outcome = fuse(region_a.into_iter().chain(region_b));

        assert_eq!(outcome.flights.len(), 2);
        assert_eq!(outcome.duplicates_removed, 1);
        let a1 = outcome.flights.get("a1").unwrap();
        assert_eq!(a1.provider, ProviderId::Primary);
        assert_eq!(a1.observed_at, 10.0);
        let b2 = outcome.flights.get("b2").unwrap();
        assert_eq!(b2.provider, ProviderId::Primary);
        assert_eq!(b2.observed_at, 5.0);
    }

    #[test]
    fn test_collect_into_fused_set() {
        let set: FusedFlightSet = vec![primary("a1", 1.0), primary("a1", 3.0)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("a1").unwrap().observed_at, 3.0);
    }

    fn arb_report() -> impl Strategy<Value = AircraftReport> {
        (
            prop::sample::select(vec!["a1", "b2", "c3", "d4", "e5"]),
            0.0f64..20.0,
            any::<bool>(),
        )
            .prop_map(|(icao, t, is_primary)| {
                let provider = if is_primary {
                    ProviderId::Primary
                } else {
                    ProviderId::Secondary
                };
                report(icao, t, provider)
            })
    }

    proptest! {
        /// Property: fusing an already fused set changes nothing.
        #[test]
        fn prop_refusion_is_idempotent(reports in prop::collection::vec(arb_report(), 0..40)) {
            let once = fuse(reports).flights;
            let twice = fuse(once.clone().into_reports());

            prop_assert_eq!(twice.duplicates_removed, 0);
            prop_assert_eq!(twice.flights, once);
        }

        /// Property: output size is within [1, n] and matches the duplicate count.
        #[test]
        fn prop_cardinality(reports in prop::collection::vec(arb_report(), 1..40)) {
            let n = reports.len();
            let outcome = fuse(reports);

            prop_assert!(outcome.flights.len() >= 1);
            prop_assert!(outcome.flights.len() <= n);
            prop_assert_eq!(outcome.total_in, n);
            prop_assert_eq!(outcome.flights.len(), n - outcome.duplicates_removed);
        }

        /// Property: every winner came from the input for its address.
        #[test]
        fn prop_winner_is_an_input(reports in prop::collection::vec(arb_report(), 1..40)) {
            let outcome = fuse(reports.clone());

            for winner in outcome.flights.iter() {
                prop_assert!(reports.contains(winner));
            }
            for report in &reports {
                prop_assert!(outcome.flights.contains(report.icao_address.as_str()));
            }
        }
    }
}

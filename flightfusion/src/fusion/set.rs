//! Fused flight set - one winning report per ICAO address.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::report::{AircraftReport, IcaoAddress};

/// Outcome of offering a report to the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// First report for this address.
    Inserted,
    /// Replaced the previous winner.
    Replaced,
    /// The existing winner was kept.
    Rejected,
}

/// Mapping from ICAO address to exactly one [`AircraftReport`].
///
/// Iteration follows the order in which each address was first seen, so the
/// same input sequence always produces the same output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FusedFlightSet {
    index: HashMap<IcaoAddress, usize>,
    reports: Vec<AircraftReport>,
}

impl FusedFlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct aircraft.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Winning report for an address.
    pub fn get(&self, icao_address: &str) -> Option<&AircraftReport> {
        let key = IcaoAddress::parse(icao_address)?;
        self.index.get(&key).map(|&slot| &self.reports[slot])
    }

    pub fn contains(&self, icao_address: &str) -> bool {
        self.get(icao_address).is_some()
    }

    /// Iterate over winning reports in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &AircraftReport> {
        self.reports.iter()
    }

    /// Consume the set, returning winning reports in first-seen order.
    pub fn into_reports(self) -> Vec<AircraftReport> {
        self.reports
    }

    /// Offer a report, replacing the current winner when `replace` says so.
    ///
    /// `replace` receives `(incoming, existing)` and is only consulted when
    /// the address is already present.
    pub(crate) fn offer<F>(&mut self, report: AircraftReport, replace: F) -> Offer
    where
        F: FnOnce(&AircraftReport, &AircraftReport) -> bool,
    {
        match self.index.get(&report.icao_address).copied() {
            None => {
                self.index
                    .insert(report.icao_address.clone(), self.reports.len());
                self.reports.push(report);
                Offer::Inserted
            }
            Some(slot) => {
                if replace(&report, &self.reports[slot]) {
                    self.reports[slot] = report;
                    Offer::Replaced
                } else {
                    Offer::Rejected
                }
            }
        }
    }
}

impl Serialize for FusedFlightSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.reports.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a FusedFlightSet {
    type Item = &'a AircraftReport;
    type IntoIter = std::slice::Iter<'a, AircraftReport>;

    fn into_iter(self) -> Self::IntoIter {
        self.reports.iter()
    }
}

impl IntoIterator for FusedFlightSet {
    type Item = AircraftReport;
    type IntoIter = std::vec::IntoIter<AircraftReport>;

    fn into_iter(self) -> Self::IntoIter {
        self.reports.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Position, ProviderId};

    fn report(icao: &str, t: f64) -> AircraftReport {
        AircraftReport::new(
            IcaoAddress::parse(icao).unwrap(),
            Position::new(0.0, 0.0),
            t,
            ProviderId::Primary,
        )
    }

    #[test]
    fn test_offer_inserts_then_consults_predicate() {
        let mut set = FusedFlightSet::new();

        assert_eq!(set.offer(report("a1", 1.0), |_, _| false), Offer::Inserted);
        assert_eq!(set.offer(report("a1", 2.0), |_, _| false), Offer::Rejected);
        assert_eq!(set.get("a1").unwrap().observed_at, 1.0);

        assert_eq!(set.offer(report("a1", 3.0), |_, _| true), Offer::Replaced);
        assert_eq!(set.get("a1").unwrap().observed_at, 3.0);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut set = FusedFlightSet::new();
        set.offer(report("abc123", 1.0), |_, _| false);

        assert!(set.contains("ABC123"));
        assert!(!set.contains(""));
    }

    #[test]
    fn test_first_seen_order_is_kept_on_replace() {
        let mut set = FusedFlightSet::new();
        set.offer(report("b2", 1.0), |_, _| true);
        set.offer(report("a1", 1.0), |_, _| true);
        set.offer(report("b2", 5.0), |_, _| true);

        let order: Vec<_> = set.iter().map(|r| r.icao_address.as_str()).collect();
        assert_eq!(order, vec!["b2", "a1"]);
    }
}

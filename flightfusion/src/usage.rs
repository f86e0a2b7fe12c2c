//! Per-provider API call accounting.
//!
//! Upstream providers bill or rate-limit per call, so every region request is
//! tallied under the provider's service name and the UTC date of the call.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::Serialize;

use crate::report::ProviderId;

/// Call counts for one provider on one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsageRecord {
    pub total_calls: u64,
    pub successful_calls: u64,
    pub error_calls: u64,
}

impl UsageRecord {
    fn add(&mut self, successes: u64, errors: u64) {
        self.total_calls += successes + errors;
        self.successful_calls += successes;
        self.error_calls += errors;
    }
}

/// One row of a tally snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageEntry {
    pub api_name: &'static str,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub record: UsageRecord,
}

/// Thread-safe usage accumulator.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use flightfusion::report::ProviderId;
/// use flightfusion::usage::UsageTally;
///
/// let tally = UsageTally::new();
/// let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
///
/// tally.record(ProviderId::Primary, day, 7, 1);
///
/// let record = tally.get(ProviderId::Primary, day);
/// assert_eq!(record.total_calls, 8);
/// assert_eq!(record.error_calls, 1);
/// ```
#[derive(Debug, Default)]
pub struct UsageTally {
    records: Mutex<HashMap<(ProviderId, NaiveDate), UsageRecord>>,
}

impl UsageTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add calls for `provider` on `date`.
    pub fn record(&self, provider: ProviderId, date: NaiveDate, successes: u64, errors: u64) {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records
            .entry((provider, date))
            .or_default()
            .add(successes, errors);
    }

    /// Counts for `provider` on `date` (zero if never recorded).
    pub fn get(&self, provider: ProviderId, date: NaiveDate) -> UsageRecord {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.get(&(provider, date)).copied().unwrap_or_default()
    }

    /// All rows, ordered by date then service name.
    pub fn snapshot(&self) -> Vec<UsageEntry> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries: Vec<UsageEntry> = records
            .iter()
            .map(|(&(provider, date), &record)| UsageEntry {
                api_name: provider.service_name(),
                date,
                record,
            })
            .collect();
        entries.sort_by(|a, b| a.date.cmp(&b.date).then(a.api_name.cmp(b.api_name)));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_records_accumulate_per_provider_and_day() {
        let tally = UsageTally::new();
        tally.record(ProviderId::Primary, day(1), 8, 0);
        tally.record(ProviderId::Primary, day(1), 6, 2);
        tally.record(ProviderId::Secondary, day(1), 1, 0);
        tally.record(ProviderId::Primary, day(2), 1, 0);

        assert_eq!(
            tally.get(ProviderId::Primary, day(1)),
            UsageRecord {
                total_calls: 16,
                successful_calls: 14,
                error_calls: 2,
            }
        );
        assert_eq!(tally.get(ProviderId::Secondary, day(1)).total_calls, 1);
        assert_eq!(tally.get(ProviderId::Secondary, day(2)), UsageRecord::default());
    }

    #[test]
    fn test_snapshot_is_ordered() {
        let tally = UsageTally::new();
        tally.record(ProviderId::Secondary, day(2), 1, 0);
        tally.record(ProviderId::Secondary, day(1), 1, 0);
        tally.record(ProviderId::Primary, day(1), 1, 0);

        let rows: Vec<_> = tally
            .snapshot()
            .into_iter()
            .map(|e| (e.date, e.api_name))
            .collect();
        assert_eq!(
            rows,
            vec![
                (day(1), "adsb-exchange"),
                (day(1), "opensky"),
                (day(2), "opensky"),
            ]
        );
    }

    #[test]
    fn test_entry_serializes_flat() {
        let entry = UsageEntry {
            api_name: "opensky",
            date: day(5),
            record: UsageRecord {
                total_calls: 6,
                successful_calls: 5,
                error_calls: 1,
            },
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["api_name"], "opensky");
        assert_eq!(json["date"], "2024-03-05");
        assert_eq!(json["total_calls"], 6);
    }
}

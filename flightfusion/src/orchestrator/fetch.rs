//! Region fan-out, fallback and fusion.

use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::types::{FetchError, FlightQuery, FlightSnapshot, SnapshotMeta};
use crate::adapter::{normalize, RawBatch};
use crate::controls::{ApiControls, ProviderControls};
use crate::fusion::fuse;
use crate::provider::{Area, FlightProvider, ProviderError, DEFAULT_HTTP_TIMEOUT};
use crate::report::{AircraftReport, ProviderId};
use crate::time::{epoch_seconds_now, utc_date, Clock};
use crate::usage::UsageTally;

/// Normalized reports gathered from one provider.
#[derive(Debug)]
struct Collected {
    provider: ProviderId,
    reports: Vec<AircraftReport>,
    regions_queried: usize,
}

/// Fetches flights from the primary and secondary providers and fuses them.
///
/// A fetch cycle:
///
/// 1. Consult provider controls and pick the serving provider.
/// 2. Query every global region concurrently (or the single requested area),
///    each request bounded by the per-request timeout. A failed region is
///    logged and contributes nothing.
/// 3. If the primary provider fails as a whole (missing credentials, or every
///    region failed), repeat step 2 against the secondary provider.
/// 4. Normalize each batch, concatenate in region order, fuse.
///
/// # Example
///
/// ```ignore
/// use flightfusion::controls::StaticControls;
/// use flightfusion::orchestrator::{FlightOrchestrator, FlightQuery};
/// use flightfusion::provider::{AdsbExchangeClient, AsyncReqwestClient, OpenSkyClient};
/// use flightfusion::report::ProviderId;
///
/// let http = AsyncReqwestClient::new()?;
/// let orchestrator = FlightOrchestrator::new(
///     AdsbExchangeClient::new(http.clone(), primary_config),
///     OpenSkyClient::new(http),
///     StaticControls::default(),
/// );
/// let snapshot = orchestrator.fetch(&FlightQuery::Global, ProviderId::Primary).await?;
/// ```
pub struct FlightOrchestrator<P, S, C>
where
    P: FlightProvider,
    S: FlightProvider,
    C: ProviderControls,
{
    primary: P,
    secondary: S,
    controls: C,
    timeout: Duration,
    usage: UsageTally,
    clock: Clock,
}

impl<P, S, C> FlightOrchestrator<P, S, C>
where
    P: FlightProvider,
    S: FlightProvider,
    C: ProviderControls,
{
    pub fn new(primary: P, secondary: S, controls: C) -> Self {
        Self {
            primary,
            secondary,
            controls,
            timeout: DEFAULT_HTTP_TIMEOUT,
            usage: UsageTally::new(),
            clock: epoch_seconds_now,
        }
    }

    /// Per-request time budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the wall clock used for fetch times and usage dates.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Calls made so far, per provider per day.
    pub fn usage(&self) -> &UsageTally {
        &self.usage
    }

    /// Run one fetch cycle.
    ///
    /// `requested` is the preferred provider. Only a primary request falls
    /// back to the secondary provider.
    pub async fn fetch(
        &self,
        query: &FlightQuery,
        requested: ProviderId,
    ) -> Result<FlightSnapshot, FetchError> {
        let controls = self.controls.snapshot().await;
        let serving = select_provider(requested, &controls)?;

        let collected = match serving {
            ProviderId::Primary => match self.collect(&self.primary, query).await {
                Ok(collected) => collected,
                Err(primary) if controls.is_provider_enabled(ProviderId::Secondary) => {
                    warn!(
                        error = %primary,
                        "Primary provider failed, falling back to secondary"
                    );
                    self.collect(&self.secondary, query)
                        .await
                        .map_err(|secondary| FetchError::FallbackFailed { primary, secondary })?
                }
                Err(source) => {
                    return Err(FetchError::Provider {
                        provider: ProviderId::Primary,
                        source,
                    })
                }
            },
            ProviderId::Secondary => self
                .collect(&self.secondary, query)
                .await
                .map_err(|source| FetchError::Provider {
                    provider: ProviderId::Secondary,
                    source,
                })?,
        };

        Ok(self.finish(collected))
    }

    /// Query one provider for the whole request.
    async fn collect<F: FlightProvider>(
        &self,
        provider: &F,
        query: &FlightQuery,
    ) -> Result<Collected, ProviderError> {
        provider.ensure_ready()?;

        match query.area() {
            None => self.collect_global(provider).await,
            Some(area) => {
                let result = self.fetch_area(provider, &area).await;
                self.record_usage(provider.id(), result.is_ok() as u64, result.is_err() as u64);
                let (batch, fetched_at) = result?;
                Ok(Collected {
                    provider: provider.id(),
                    reports: normalize(batch, fetched_at),
                    regions_queried: 1,
                })
            }
        }
    }

    /// Fan out over the provider's global regions.
    async fn collect_global<F: FlightProvider>(
        &self,
        provider: &F,
    ) -> Result<Collected, ProviderError> {
        let regions = provider.global_regions();
        debug!(
            provider = %provider.id(),
            regions = regions.len(),
            "Fetching global regions"
        );

        let results = join_all(
            regions
                .iter()
                .map(|region| self.fetch_area(provider, &region.area)),
        )
        .await;

        let mut reports = Vec::new();
        let mut failed = 0usize;
        for (region, result) in regions.iter().zip(results) {
            match result {
                Ok((batch, fetched_at)) => reports.extend(normalize(batch, fetched_at)),
                Err(e) => {
                    failed += 1;
                    warn!(
                        provider = %provider.id(),
                        region = %region.name,
                        error = %e,
                        "Region fetch failed, continuing without it"
                    );
                }
            }
        }

        let succeeded = regions.len() - failed;
        self.record_usage(provider.id(), succeeded as u64, failed as u64);

        if succeeded == 0 && !regions.is_empty() {
            return Err(ProviderError::AllRegionsFailed {
                regions: regions.len(),
            });
        }

        Ok(Collected {
            provider: provider.id(),
            reports,
            regions_queried: regions.len(),
        })
    }

    /// One bounded request. Returns the batch and the time it arrived.
    async fn fetch_area<F: FlightProvider>(
        &self,
        provider: &F,
        area: &Area,
    ) -> Result<(RawBatch, f64), ProviderError> {
        let batch = tokio::time::timeout(self.timeout, provider.fetch(area))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))??;
        Ok((batch, (self.clock)()))
    }

    fn record_usage(&self, provider: ProviderId, succeeded: u64, failed: u64) {
        let date = utc_date((self.clock)());
        self.usage.record(provider, date, succeeded, failed);
    }

    fn finish(&self, collected: Collected) -> FlightSnapshot {
        let outcome = fuse(collected.reports);

        info!(
            provider = %collected.provider,
            regions = collected.regions_queried,
            total_in = outcome.total_in,
            flights = outcome.flights.len(),
            duplicates_removed = outcome.duplicates_removed,
            "Fetch cycle complete"
        );

        let flights = outcome.flights.into_reports();
        FlightSnapshot {
            meta: SnapshotMeta {
                count: flights.len(),
                provider: collected.provider,
                regions_queried: collected.regions_queried,
                duplicates_removed: (outcome.duplicates_removed > 0)
                    .then_some(outcome.duplicates_removed),
            },
            flights,
        }
    }
}

/// Pick the provider to serve a request given the current switches.
///
/// A disabled requested provider gives way to the other one.
pub fn select_provider(
    requested: ProviderId,
    controls: &ApiControls,
) -> Result<ProviderId, FetchError> {
    if !controls.master_enabled {
        return Err(FetchError::Disabled("master switch is off".to_string()));
    }
    if controls.is_provider_enabled(requested) {
        return Ok(requested);
    }

    let other = requested.alternate();
    if controls.is_provider_enabled(other) {
        info!(
            requested = %requested,
            serving = %other,
            "Requested provider disabled, using alternate"
        );
        return Ok(other);
    }

    Err(FetchError::Disabled("all providers are off".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::StaticControls;
    use crate::provider::{
        AdsbExchangeClient, BoundingBox, MockAsyncHttpClient, OpenSkyClient, PrimaryConfig,
        RadiusArea,
    };
    use chrono::NaiveDate;

    const NOW: f64 = 1_700_000_000.0;

    fn fixed_clock() -> f64 {
        NOW
    }

    fn ok(body: &str) -> Result<Vec<u8>, ProviderError> {
        Ok(body.as_bytes().to_vec())
    }

    fn down() -> Result<Vec<u8>, ProviderError> {
        Err(ProviderError::HttpError("connection refused".into()))
    }

    fn primary_config(key: Option<&str>) -> PrimaryConfig {
        PrimaryConfig {
            api_key: key.map(String::from),
            ..PrimaryConfig::default()
        }
    }

    type TestOrchestrator = FlightOrchestrator<
        AdsbExchangeClient<MockAsyncHttpClient>,
        OpenSkyClient<MockAsyncHttpClient>,
        StaticControls,
    >;

    fn orchestrator(
        primary_http: MockAsyncHttpClient,
        secondary_http: MockAsyncHttpClient,
        key: Option<&str>,
        controls: ApiControls,
    ) -> TestOrchestrator {
        FlightOrchestrator::new(
            AdsbExchangeClient::new(primary_http, primary_config(key)),
            OpenSkyClient::new(secondary_http),
            StaticControls(controls),
        )
        .with_clock(fixed_clock)
    }

    fn today() -> NaiveDate {
        utc_date(NOW)
    }

    #[tokio::test]
    async fn test_global_primary_overlap_is_fused() {
        // New York and San Francisco both see abc123.
        let primary = MockAsyncHttpClient::always(ok(r#"{"ac":[]}"#))
            .route(
                "/lat/40/lon/-74/",
                ok(r#"{"ac":[{"hex":"abc123","lat":40.6,"lon":-73.8,"seen":2}]}"#),
            )
            .route(
                "/lat/37/lon/-122/",
                ok(r#"{"ac":[
                    {"hex":"ABC123","lat":40.7,"lon":-73.9,"seen":0.5},
                    {"hex":"def456","lat":37.6,"lon":-122.4}
                ]}"#),
            );
        let secondary = MockAsyncHttpClient::always(down());
        let orch = orchestrator(
            primary.clone(),
            secondary.clone(),
            Some("k"),
            ApiControls::ALL_ENABLED,
        );

        let snapshot = orch
            .fetch(&FlightQuery::Global, ProviderId::Primary)
            .await
            .unwrap();

        assert_eq!(snapshot.meta.provider, ProviderId::Primary);
        assert_eq!(snapshot.meta.regions_queried, 8);
        assert_eq!(snapshot.meta.count, 2);
        assert_eq!(snapshot.meta.duplicates_removed, Some(1));
        assert_eq!(snapshot.flights[0].icao_address.as_str(), "abc123");
        assert_eq!(snapshot.flights[0].observed_at, NOW - 0.5);
        assert_eq!(snapshot.flights[1].icao_address.as_str(), "def456");

        assert_eq!(primary.recorded().len(), 8);
        assert!(secondary.recorded().is_empty());
        assert_eq!(orch.usage().get(ProviderId::Primary, today()).total_calls, 8);
    }

    #[tokio::test]
    async fn test_failed_regions_are_skipped() {
        let primary = MockAsyncHttpClient::always(down()).route(
            "/lat/51/lon/0/",
            ok(r#"{"ac":[{"hex":"400abc","lat":51.4,"lon":-0.4}]}"#),
        );
        let orch = orchestrator(
            primary,
            MockAsyncHttpClient::always(down()),
            Some("k"),
            ApiControls::ALL_ENABLED,
        );

        let snapshot = orch
            .fetch(&FlightQuery::Global, ProviderId::Primary)
            .await
            .unwrap();

        assert_eq!(snapshot.meta.provider, ProviderId::Primary);
        assert_eq!(snapshot.meta.count, 1);
        assert_eq!(snapshot.meta.duplicates_removed, None);

        let usage = orch.usage().get(ProviderId::Primary, today());
        assert_eq!(usage.successful_calls, 1);
        assert_eq!(usage.error_calls, 7);
    }

    #[tokio::test]
    async fn test_missing_key_falls_back_to_secondary() {
        let primary = MockAsyncHttpClient::always(ok(r#"{"ac":[]}"#));
        let secondary = MockAsyncHttpClient::always(ok(r#"{"time":1,"states":[]}"#)).route(
            "lamin=35&",
            ok(r#"{"time":1700000000,"states":[
                ["3c6444","DLH9LF","Germany",1699999999,1699999999,8.5,50.0,10000.0,false,230.0,270.0,0.0]
            ]}"#),
        );
        let orch = orchestrator(
            primary.clone(),
            secondary.clone(),
            None,
            ApiControls::ALL_ENABLED,
        );

        let snapshot = orch
            .fetch(&FlightQuery::Global, ProviderId::Primary)
            .await
            .unwrap();

        assert_eq!(snapshot.meta.provider, ProviderId::Secondary);
        assert_eq!(snapshot.meta.regions_queried, 6);
        assert_eq!(snapshot.meta.count, 1);
        assert_eq!(snapshot.flights[0].altitude_ft, Some(32808.0));
        assert!(primary.recorded().is_empty());
        assert_eq!(secondary.recorded().len(), 6);
    }

    #[tokio::test]
    async fn test_all_primary_regions_failing_falls_back() {
        let orch = orchestrator(
            MockAsyncHttpClient::always(down()),
            MockAsyncHttpClient::always(ok(r#"{"time":1,"states":null}"#)),
            Some("k"),
            ApiControls::ALL_ENABLED,
        );

        let snapshot = orch
            .fetch(&FlightQuery::Global, ProviderId::Primary)
            .await
            .unwrap();

        assert_eq!(snapshot.meta.provider, ProviderId::Secondary);
        assert!(snapshot.flights.is_empty());
        assert_eq!(orch.usage().get(ProviderId::Primary, today()).error_calls, 8);
        assert_eq!(orch.usage().get(ProviderId::Secondary, today()).total_calls, 6);
    }

    #[tokio::test]
    async fn test_fallback_failure_propagates() {
        let orch = orchestrator(
            MockAsyncHttpClient::always(down()),
            MockAsyncHttpClient::always(down()),
            None,
            ApiControls::ALL_ENABLED,
        );

        let err = orch
            .fetch(&FlightQuery::Global, ProviderId::Primary)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetchError::FallbackFailed {
                primary: ProviderError::MissingCredentials(_),
                secondary: ProviderError::AllRegionsFailed { regions: 6 },
            }
        ));
    }

    #[tokio::test]
    async fn test_secondary_request_does_not_fall_back() {
        let primary = MockAsyncHttpClient::always(ok(r#"{"ac":[]}"#));
        let orch = orchestrator(
            primary.clone(),
            MockAsyncHttpClient::always(down()),
            Some("k"),
            ApiControls::ALL_ENABLED,
        );

        let err = orch
            .fetch(&FlightQuery::Global, ProviderId::Secondary)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetchError::Provider {
                provider: ProviderId::Secondary,
                ..
            }
        ));
        assert!(primary.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_single_area_query_is_one_request() {
        let primary = MockAsyncHttpClient::always(ok(
            r#"{"ac":[{"hex":"a1","lat":40.6,"lon":-73.8},{"hex":"a1","lat":40.6,"lon":-73.8}]}"#,
        ));
        let orch = orchestrator(
            primary.clone(),
            MockAsyncHttpClient::always(down()),
            Some("k"),
            ApiControls::ALL_ENABLED,
        );

        let query = FlightQuery::Radius(RadiusArea::new(40.64, -73.78, 50.0));
        let snapshot = orch.fetch(&query, ProviderId::Primary).await.unwrap();

        assert_eq!(snapshot.meta.regions_queried, 1);
        assert_eq!(snapshot.meta.count, 1);
        assert_eq!(snapshot.meta.duplicates_removed, Some(1));
        let requests = primary.recorded();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.ends_with("/v2/lat/40.64/lon/-73.78/dist/50/"));
    }

    #[tokio::test]
    async fn test_single_area_primary_failure_falls_back_to_same_area() {
        let secondary = MockAsyncHttpClient::always(ok(r#"{"time":1,"states":[]}"#));
        let orch = orchestrator(
            MockAsyncHttpClient::always(down()),
            secondary.clone(),
            Some("k"),
            ApiControls::ALL_ENABLED,
        );

        let query = FlightQuery::BoundingBox(BoundingBox::new(45.0, 5.0, 48.0, 11.0));
        let snapshot = orch.fetch(&query, ProviderId::Primary).await.unwrap();

        assert_eq!(snapshot.meta.provider, ProviderId::Secondary);
        assert_eq!(snapshot.meta.regions_queried, 1);
        assert!(secondary.recorded()[0]
            .url
            .ends_with("states/all?lamin=45&lomin=5&lamax=48&lomax=11"));
    }

    #[tokio::test]
    async fn test_disabled_primary_uses_secondary() {
        let primary = MockAsyncHttpClient::always(ok(r#"{"ac":[]}"#));
        let orch = orchestrator(
            primary.clone(),
            MockAsyncHttpClient::always(ok(r#"{"time":1,"states":[]}"#)),
            Some("k"),
            ApiControls {
                primary_enabled: false,
                ..ApiControls::ALL_ENABLED
            },
        );

        let snapshot = orch
            .fetch(&FlightQuery::Global, ProviderId::Primary)
            .await
            .unwrap();

        assert_eq!(snapshot.meta.provider, ProviderId::Secondary);
        assert!(primary.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_primary_failure_without_enabled_fallback() {
        let orch = orchestrator(
            MockAsyncHttpClient::always(down()),
            MockAsyncHttpClient::always(ok(r#"{"time":1,"states":[]}"#)),
            Some("k"),
            ApiControls {
                secondary_enabled: false,
                ..ApiControls::ALL_ENABLED
            },
        );

        let err = orch
            .fetch(&FlightQuery::Global, ProviderId::Primary)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::Provider {
                provider: ProviderId::Primary,
                source: ProviderError::AllRegionsFailed { regions: 8 },
            }
        ));
    }

    #[tokio::test]
    async fn test_master_switch_off() {
        let primary = MockAsyncHttpClient::always(ok(r#"{"ac":[]}"#));
        let orch = orchestrator(
            primary.clone(),
            MockAsyncHttpClient::always(ok(r#"{"time":1,"states":[]}"#)),
            Some("k"),
            ApiControls {
                master_enabled: false,
                ..ApiControls::ALL_ENABLED
            },
        );

        let err = orch
            .fetch(&FlightQuery::Global, ProviderId::Primary)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Disabled(_)));
        assert!(primary.recorded().is_empty());
    }

    #[test]
    fn test_select_provider() {
        let all = ApiControls::ALL_ENABLED;
        assert_eq!(
            select_provider(ProviderId::Secondary, &all),
            Ok(ProviderId::Secondary)
        );

        let none = ApiControls {
            primary_enabled: false,
            secondary_enabled: false,
            ..all
        };
        assert!(matches!(
            select_provider(ProviderId::Primary, &none),
            Err(FetchError::Disabled(_))
        ));
    }
}

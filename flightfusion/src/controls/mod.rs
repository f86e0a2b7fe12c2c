//! Provider on/off switches.
//!
//! Operators can disable providers (or everything, via the master switch)
//! without redeploying. The switches live in an external admin store that is
//! read through [`ControlsSource`]; [`CachedControls`] polls it at most once
//! per TTL using an injected [`TtlCache`].
//!
//! A missing or unreadable admin store never blocks fetching: the last known
//! switches are used, or everything is enabled if nothing was ever loaded.

mod cache;

pub use cache::{TtlCache, DEFAULT_CACHE_TTL};

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::report::ProviderId;

/// Errors from loading the admin switches.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlsError {
    #[error("Controls store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid controls record: {0}")]
    Invalid(String),
}

/// Snapshot of the admin switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiControls {
    pub master_enabled: bool,
    pub primary_enabled: bool,
    pub secondary_enabled: bool,
}

impl ApiControls {
    /// Everything on.
    pub const ALL_ENABLED: ApiControls = ApiControls {
        master_enabled: true,
        primary_enabled: true,
        secondary_enabled: true,
    };

    /// Whether `provider` may be queried. The master switch overrides all.
    pub fn is_provider_enabled(&self, provider: ProviderId) -> bool {
        self.master_enabled
            && match provider {
                ProviderId::Primary => self.primary_enabled,
                ProviderId::Secondary => self.secondary_enabled,
            }
    }

    /// Whether any provider may be queried.
    pub fn any_enabled(&self) -> bool {
        self.is_provider_enabled(ProviderId::Primary)
            || self.is_provider_enabled(ProviderId::Secondary)
    }
}

impl Default for ApiControls {
    fn default() -> Self {
        Self::ALL_ENABLED
    }
}

/// Where the switches are stored.
pub trait ControlsSource: Send + Sync {
    fn load(&self) -> impl Future<Output = Result<ApiControls, ControlsError>> + Send;
}

/// What the orchestrator consults before fetching.
pub trait ProviderControls: Send + Sync {
    /// Current switches. Never fails.
    fn snapshot(&self) -> impl Future<Output = ApiControls> + Send;
}

/// Fixed switches, e.g. from the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticControls(pub ApiControls);

impl ControlsSource for StaticControls {
    async fn load(&self) -> Result<ApiControls, ControlsError> {
        Ok(self.0)
    }
}

impl ProviderControls for StaticControls {
    async fn snapshot(&self) -> ApiControls {
        self.0
    }
}

/// Reads switches from a [`ControlsSource`] at most once per cache TTL.
pub struct CachedControls<S: ControlsSource> {
    source: S,
    cache: TtlCache<ApiControls>,
}

impl<S: ControlsSource> CachedControls<S> {
    pub fn new(source: S, cache: TtlCache<ApiControls>) -> Self {
        Self { source, cache }
    }

    /// Force the next snapshot to reload from the source.
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}

impl<S: ControlsSource> ProviderControls for CachedControls<S> {
    async fn snapshot(&self) -> ApiControls {
        if let Some(controls) = self.cache.get() {
            return controls;
        }

        match self.source.load().await {
            Ok(controls) => {
                debug!(?controls, "Loaded provider controls");
                self.cache.set(controls);
                controls
            }
            Err(e) => {
                let fallback = self.cache.stale();
                warn!(
                    error = %e,
                    using_last_known = fallback.is_some(),
                    "Failed to load provider controls"
                );
                fallback.unwrap_or_default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Source that returns scripted results and counts loads.
    #[derive(Clone)]
    struct ScriptedSource {
        result: Arc<Mutex<Result<ApiControls, ControlsError>>>,
        loads: Arc<AtomicUsize>,
    }

    impl ScriptedSource {
        fn new(result: Result<ApiControls, ControlsError>) -> Self {
            Self {
                result: Arc::new(Mutex::new(result)),
                loads: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn set(&self, result: Result<ApiControls, ControlsError>) {
            *self.result.lock().unwrap() = result;
        }

        fn loads(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    impl ControlsSource for ScriptedSource {
        async fn load(&self) -> Result<ApiControls, ControlsError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.result.lock().unwrap().clone()
        }
    }

    const PRIMARY_OFF: ApiControls = ApiControls {
        master_enabled: true,
        primary_enabled: false,
        secondary_enabled: true,
    };

    #[test]
    fn test_master_switch_overrides() {
        let controls = ApiControls {
            master_enabled: false,
            ..ApiControls::ALL_ENABLED
        };
        assert!(!controls.is_provider_enabled(ProviderId::Primary));
        assert!(!controls.is_provider_enabled(ProviderId::Secondary));
        assert!(!controls.any_enabled());
    }

    #[test]
    fn test_individual_switches() {
        assert!(!PRIMARY_OFF.is_provider_enabled(ProviderId::Primary));
        assert!(PRIMARY_OFF.is_provider_enabled(ProviderId::Secondary));
        assert!(PRIMARY_OFF.any_enabled());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(PRIMARY_OFF).unwrap();
        assert_eq!(json["primaryEnabled"], false);
        assert_eq!(json["masterEnabled"], true);
    }

    #[tokio::test]
    async fn test_cached_controls_poll_once_within_ttl() {
        let source = ScriptedSource::new(Ok(PRIMARY_OFF));
        let cache = TtlCache::new(Duration::from_secs(60));
        let controls = CachedControls::new(source.clone(), cache);

        assert_eq!(controls.snapshot().await, PRIMARY_OFF);
        source.set(Ok(ApiControls::ALL_ENABLED));
        assert_eq!(controls.snapshot().await, PRIMARY_OFF);
        assert_eq!(source.loads(), 1);

        controls.invalidate();
        assert_eq!(controls.snapshot().await, ApiControls::ALL_ENABLED);
        assert_eq!(source.loads(), 2);
    }

    #[tokio::test]
    async fn test_cached_controls_reload_after_expiry() {
        let source = ScriptedSource::new(Ok(PRIMARY_OFF));
        let controls = CachedControls::new(source.clone(), TtlCache::new(Duration::ZERO));

        controls.snapshot().await;
        controls.snapshot().await;
        assert_eq!(source.loads(), 2);
    }

    #[tokio::test]
    async fn test_load_failure_uses_last_known() {
        let source = ScriptedSource::new(Ok(PRIMARY_OFF));
        let controls = CachedControls::new(source.clone(), TtlCache::new(Duration::ZERO));

        assert_eq!(controls.snapshot().await, PRIMARY_OFF);
        source.set(Err(ControlsError::Unavailable("down".into())));
        assert_eq!(controls.snapshot().await, PRIMARY_OFF);
    }

    #[tokio::test]
    async fn test_load_failure_without_history_enables_all() {
        let source = ScriptedSource::new(Err(ControlsError::Unavailable("down".into())));
        let controls = CachedControls::new(source, TtlCache::default());

        assert_eq!(controls.snapshot().await, ApiControls::ALL_ENABLED);
    }

    #[tokio::test]
    async fn test_static_controls() {
        let controls = StaticControls(PRIMARY_OFF);
        assert_eq!(controls.snapshot().await, PRIMARY_OFF);
        assert_eq!(controls.load().await, Ok(PRIMARY_OFF));
    }
}

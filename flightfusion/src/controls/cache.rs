//! Single-value cache with time-based expiry.

use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Default lifetime of a cached value.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    /// `None` when the TTL is too large to represent; the value never expires.
    expires_at: Option<Instant>,
}

/// Holds one value for a fixed time-to-live.
///
/// Owned by whoever needs it and passed in explicitly; there is no global
/// instance. An expired value is still kept so callers can fall back to the
/// last known state via [`TtlCache::stale`].
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    entry: RwLock<Option<CacheEntry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached value, if present and not yet expired.
    pub fn get(&self) -> Option<T> {
        self.get_at(Instant::now())
    }

    fn get_at(&self, now: Instant) -> Option<T> {
        let entry = self.entry.read().unwrap_or_else(|e| e.into_inner());
        entry
            .as_ref()
            .filter(|e| e.expires_at.map_or(true, |at| now < at))
            .map(|e| e.value.clone())
    }

    /// Last stored value regardless of expiry.
    pub fn stale(&self) -> Option<T> {
        let entry = self.entry.read().unwrap_or_else(|e| e.into_inner());
        entry.as_ref().map(|e| e.value.clone())
    }

    /// Store a value, restarting the TTL.
    pub fn set(&self, value: T) {
        let mut entry = self.entry.write().unwrap_or_else(|e| e.into_inner());
        *entry = Some(CacheEntry {
            value,
            expires_at: Instant::now().checked_add(self.ttl),
        });
    }

    /// When the current value expires.
    ///
    /// `None` if nothing is stored or the stored value never expires.
    pub fn expires_at(&self) -> Option<Instant> {
        let entry = self.entry.read().unwrap_or_else(|e| e.into_inner());
        entry.as_ref().and_then(|e| e.expires_at)
    }

    /// Drop the stored value.
    pub fn invalidate(&self) {
        let mut entry = self.entry.write().unwrap_or_else(|e| e.into_inner());
        *entry = None;
    }
}

impl<T: Clone> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

//! TTL-bounded store for normalized records.
//!
//! The store has two expiry mechanisms:
//!
//! - **Passive**: any [`VideoCache::get`] after `stored_at + ttl` returns
//!   absent and lazily removes the entry.
//! - **Active**: a background sweep task runs on a fixed interval,
//!   independent of request traffic, and removes every expired entry. This
//!   bounds memory growth from keys that are never requested again.
//!
//! There is deliberately no capacity bound and no LRU: the identifier space
//! is externally bounded by per-deployment traffic, and staleness is
//! time-bounded, not space-bounded.
//!
//! Entries are replaced atomically (last write wins); readers never observe
//! a partially written entry. Time comes from [`tokio::time::Instant`] so
//! expiry is testable under a paused clock.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use crate::telemetry;
use crate::types::NormalizedRecord;

/// Default time-to-live for cached records.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Default interval between active sweep passes.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(120);

/// Cache key for a video identifier. Deterministic, one entry per id.
pub fn cache_key(video_id: &str) -> String {
    format!("video:{video_id}")
}

/// Configuration for the video cache.
///
/// ```rust
/// # use vidgate::cache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .ttl(Duration::from_secs(600))
///     .sweep_interval(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Time-to-live for entries inserted without an explicit TTL.
    /// Default: 1 hour.
    pub ttl: Duration,
    /// Interval between active sweep passes. Default: 2 minutes.
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl CacheConfig {
    /// Create a new config with the default TTL and sweep interval.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default time-to-live.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the sweep interval.
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

struct CacheEntry {
    value: Arc<NormalizedRecord>,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) >= self.ttl
    }
}

/// Thread-safe TTL store for normalized records.
///
/// Owned explicitly and injected into the gateway — there is no ambient
/// process-global map. Created with [`VideoCache::new`], which also spawns
/// the sweep task; the task holds only a [`Weak`] reference, so it ends on
/// its own when the cache is dropped. [`VideoCache::shutdown`] stops it
/// eagerly.
pub struct VideoCache {
    entries: DashMap<String, CacheEntry>,
    default_ttl: Duration,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl VideoCache {
    /// Create the store and spawn its background sweep task.
    ///
    /// # Panics
    ///
    /// Requires a tokio runtime context (the sweeper is a spawned task).
    pub fn new(config: &CacheConfig) -> Arc<Self> {
        let cache = Arc::new(Self {
            entries: DashMap::new(),
            default_ttl: config.ttl,
            sweeper: Mutex::new(None),
        });

        let handle = spawn_sweeper(Arc::downgrade(&cache), config.sweep_interval);
        *cache.sweeper.lock().expect("sweeper lock poisoned") = Some(handle);
        cache
    }

    /// Look up a record.
    ///
    /// Returns `None` if the key was never set or its TTL has elapsed; an
    /// expired entry encountered here is removed lazily. A hit does not
    /// refresh the TTL (no sliding expiration).
    pub fn get(&self, key: &str) -> Option<Arc<NormalizedRecord>> {
        let now = Instant::now();
        {
            let entry = self.entries.get(key)?;
            if !entry.is_expired(now) {
                return Some(Arc::clone(&entry.value));
            }
        }
        // Lazy expiry. The predicate re-checks under the shard lock so a
        // concurrent overwrite is not lost.
        self.entries
            .remove_if(key, |_, entry| entry.is_expired(Instant::now()));
        None
    }

    /// Insert (or overwrite) a record with the default TTL.
    ///
    /// Overwriting restarts the TTL clock.
    pub fn insert(&self, key: impl Into<String>, value: Arc<NormalizedRecord>) {
        self.insert_with_ttl(key, value, self.default_ttl);
    }

    /// Insert (or overwrite) a record with an explicit TTL.
    pub fn insert_with_ttl(
        &self,
        key: impl Into<String>,
        value: Arc<NormalizedRecord>,
        ttl: Duration,
    ) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Remove every expired entry. Returns the number removed.
    ///
    /// Called by the background sweep task; public so deployments can also
    /// sweep on their own schedule. The retain predicate runs under the
    /// shard lock, so an entry written after the sweep decision is never
    /// erased by that sweep.
    pub fn sweep(&self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.is_expired(Instant::now()));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            metrics::counter!(telemetry::CACHE_SWEEP_REMOVED_TOTAL).increment(removed as u64);
            debug!(removed, "cache sweep removed expired entries");
        }
        removed
    }

    /// Number of entries currently stored (expired-but-unswept included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stop the background sweep task. Idempotent.
    pub fn shutdown(&self) {
        if let Some(handle) = self.sweeper.lock().expect("sweeper lock poisoned").take() {
            handle.abort();
        }
    }
}

fn spawn_sweeper(cache: Weak<VideoCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; consume it so the cadence
        // starts one full interval after startup.
        tick.tick().await;
        loop {
            tick.tick().await;
            let Some(cache) = cache.upgrade() else { break };
            cache.sweep();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_is_deterministic() {
        assert_eq!(cache_key("abc"), "video:abc");
        assert_eq!(cache_key("abc"), cache_key("abc"));
    }

    #[test]
    fn entry_expiry_boundary() {
        let now = Instant::now();
        let entry = CacheEntry {
            value: Arc::new(crate::normalize::Normalizer::default().fallback_record()),
            stored_at: now,
            ttl: Duration::from_secs(60),
        };
        assert!(!entry.is_expired(now + Duration::from_secs(59)));
        assert!(entry.is_expired(now + Duration::from_secs(60)));
    }

    #[test]
    fn config_builder() {
        let config = CacheConfig::new()
            .ttl(Duration::from_secs(5))
            .sweep_interval(Duration::from_secs(1));
        assert_eq!(config.ttl, Duration::from_secs(5));
        assert_eq!(config.sweep_interval, Duration::from_secs(1));
    }
}

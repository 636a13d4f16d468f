//! Request orchestration.
//!
//! [`VideoGateway`] coordinates one lookup per request:
//!
//! ```text
//! CACHE_LOOKUP ─ hit ──────────────────────────────▶ respond cached
//!      └─ miss ─▶ FETCH ─ ok ─▶ NORMALIZE ─▶ STORE ─▶ respond fresh
//!                    └─ fail ─────────────────────▶ respond failure
//! ```
//!
//! A hit responds immediately without re-fetching or refreshing the TTL.
//! On a miss the provider is invoked once — no retry, no timeout at this
//! layer. The store happens only after a successful fetch and successful
//! normalization; a degenerate-but-normalized record is still stored, while
//! failures (upstream or malformed) are never cached, so a prior entry
//! survives a later failure.
//!
//! Concurrent misses for the same identifier are coalesced through a
//! per-key in-flight registry ([`flight`]): one fetch, one normalization,
//! one store. The fetch itself runs in a spawned task awaited by the
//! caller, so a request abandoned by its HTTP client still runs to
//! completion and still populates the cache.

mod builder;
mod flight;

pub use builder::{Vidgate, VidgateBuilder};

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::cache::{VideoCache, cache_key};
use crate::error::{Result, VidgateError};
use crate::normalize::Normalizer;
use crate::provider::VideoProvider;
use crate::telemetry;
use crate::types::NormalizedRecord;
use flight::FlightRegistry;

/// Where a lookup result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    Cache,
    Upstream,
}

impl LookupSource {
    fn label(self) -> &'static str {
        match self {
            LookupSource::Cache => "cache",
            LookupSource::Upstream => "upstream",
        }
    }
}

/// A completed lookup.
#[derive(Debug, Clone)]
pub struct Lookup {
    pub record: Arc<NormalizedRecord>,
    pub source: LookupSource,
}

/// The orchestrator: owns the cache, the provider, and the normalizer.
///
/// All collaborators are injected (see [`VidgateBuilder`]); there is no
/// ambient process-global state.
pub struct VideoGateway {
    cache: Arc<VideoCache>,
    provider: Arc<dyn VideoProvider>,
    normalizer: Arc<Normalizer>,
    flights: FlightRegistry,
}

impl VideoGateway {
    pub(crate) fn new(
        cache: Arc<VideoCache>,
        provider: Arc<dyn VideoProvider>,
        normalizer: Arc<Normalizer>,
    ) -> Self {
        Self {
            cache,
            provider,
            normalizer,
            flights: FlightRegistry::new(),
        }
    }

    /// The cache store this gateway serves from.
    pub fn cache(&self) -> &Arc<VideoCache> {
        &self.cache
    }

    /// The constant "no data" record for this gateway's locale.
    pub fn fallback_record(&self) -> NormalizedRecord {
        self.normalizer.fallback_record()
    }

    /// Resolve a video identifier to a normalized record.
    ///
    /// # Errors
    ///
    /// [`VidgateError::Upstream`] when the provider failed, or
    /// [`VidgateError::MalformedRaw`] when its payload was not an object.
    /// Neither outcome touches the cache.
    pub async fn get_video(&self, video_id: &str) -> Result<Lookup> {
        let start = Instant::now();
        let key = cache_key(video_id);

        if let Some(record) = self.cache.get(&key) {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
            record_request(LookupSource::Cache, start, true);
            debug!(video_id, "cache hit");
            return Ok(Lookup {
                record,
                source: LookupSource::Cache,
            });
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);

        // Single-flight: misses for the same id queue here and share the
        // leader's result through the cache.
        let permit = self.flights.acquire(&key).await;
        if let Some(record) = self.cache.get(&key) {
            record_request(LookupSource::Cache, start, true);
            debug!(video_id, "cache hit after coalesced fetch");
            return Ok(Lookup {
                record,
                source: LookupSource::Cache,
            });
        }

        // The fetch runs in its own task: a caller that goes away
        // mid-flight must not cancel it or lose the cache write.
        let provider = Arc::clone(&self.provider);
        let normalizer = Arc::clone(&self.normalizer);
        let cache = Arc::clone(&self.cache);
        let id = video_id.to_string();
        let task = tokio::spawn(async move {
            let _permit = permit;
            let raw = provider.fetch_raw_info(&id).await?;
            let record = Arc::new(normalizer.normalize(&raw)?);
            cache.insert(cache_key(&id), Arc::clone(&record));
            Ok::<_, VidgateError>(record)
        });

        match task.await {
            Ok(Ok(record)) => {
                record_request(LookupSource::Upstream, start, true);
                debug!(video_id, "fetched and cached");
                Ok(Lookup {
                    record,
                    source: LookupSource::Upstream,
                })
            }
            Ok(Err(err)) => {
                metrics::counter!(telemetry::UPSTREAM_FAILURES_TOTAL).increment(1);
                record_request(LookupSource::Upstream, start, false);
                warn!(video_id, error = %err, "upstream lookup failed");
                Err(err)
            }
            Err(join_err) => {
                record_request(LookupSource::Upstream, start, false);
                Err(VidgateError::Task(join_err.to_string()))
            }
        }
    }

    /// Stop background work (the cache sweep task). Idempotent.
    pub fn shutdown(&self) {
        self.cache.shutdown();
    }
}

/// Record lookup outcome metrics (counter + histogram).
fn record_request(source: LookupSource, start: Instant, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    metrics::counter!(telemetry::REQUESTS_TOTAL,
        "source" => source.label(),
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
        "source" => source.label(),
    )
    .record(start.elapsed().as_secs_f64());
}

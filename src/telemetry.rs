//! Telemetry metric name constants.
//!
//! Centralised metric names for vidgate operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `vidgate_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `source` — where the record came from: "cache" or "upstream"
//! - `status` — outcome: "ok" or "error"

/// Total lookups served by the gateway.
///
/// Labels: `source` ("cache" | "upstream"), `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "vidgate_requests_total";

/// Lookup duration in seconds.
///
/// Labels: `source`.
pub const REQUEST_DURATION_SECONDS: &str = "vidgate_request_duration_seconds";

/// Total cache hits.
pub const CACHE_HITS_TOTAL: &str = "vidgate_cache_hits_total";

/// Total cache misses.
pub const CACHE_MISSES_TOTAL: &str = "vidgate_cache_misses_total";

/// Total failed upstream lookups (including malformed payloads).
pub const UPSTREAM_FAILURES_TOTAL: &str = "vidgate_upstream_failures_total";

/// Total entries removed by the periodic cache sweep.
pub const CACHE_SWEEP_REMOVED_TOTAL: &str = "vidgate_cache_sweep_removed_total";

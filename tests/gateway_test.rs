//! Orchestration tests — hit/miss flow, TTL-driven re-fetch, failure
//! isolation from the cache, and single-flight coalescing.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use vidgate::cache::{CacheConfig, cache_key};
use vidgate::provider::VideoProvider;
use vidgate::types::RawVideoInfo;
use vidgate::{LookupSource, Vidgate, VideoGateway, VidgateError};

/// Provider that serves a fixed payload (or a fixed failure) and counts
/// invocations.
struct MockProvider {
    calls: AtomicUsize,
    payload: Value,
    fail: bool,
    delay: Option<Duration>,
}

impl MockProvider {
    fn ok(payload: Value) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            payload,
            fail: false,
            delay: None,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            payload: Value::Null,
            fail: true,
            delay: None,
        })
    }

    fn slow(payload: Value, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            payload,
            fail: false,
            delay: Some(delay),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoProvider for MockProvider {
    async fn fetch_raw_info(&self, _video_id: &str) -> vidgate::Result<RawVideoInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(VidgateError::Upstream {
                status: Some(404),
                message: "not found".into(),
            });
        }
        Ok(RawVideoInfo::from(self.payload.clone()))
    }
}

fn gateway_with(provider: Arc<MockProvider>, config: CacheConfig) -> VideoGateway {
    Vidgate::builder()
        .provider(provider)
        .cache_config(config)
        .build()
}

fn sample_payload() -> Value {
    json!({
        "basic_info": {
            "id": "abc",
            "title": "Sample",
            "view_count": 12_000,
            "like_count": 500,
        },
    })
}

// =========================================================================
// Hit/miss flow
// =========================================================================

#[tokio::test]
async fn second_call_within_ttl_is_a_pure_cache_hit() {
    let provider = MockProvider::ok(sample_payload());
    let gateway = gateway_with(Arc::clone(&provider), CacheConfig::default());

    let first = gateway.get_video("abc").await.expect("first lookup");
    assert_eq!(first.source, LookupSource::Upstream);
    assert_eq!(first.record.views, "1万 回視聴");

    let second = gateway.get_video("abc").await.expect("second lookup");
    assert_eq!(second.source, LookupSource::Cache);
    assert_eq!(second.record, first.record);

    assert_eq!(provider.calls(), 1, "second call must not re-fetch");
}

#[tokio::test]
async fn distinct_ids_fetch_independently() {
    let provider = MockProvider::ok(sample_payload());
    let gateway = gateway_with(Arc::clone(&provider), CacheConfig::default());

    gateway.get_video("one").await.expect("lookup one");
    gateway.get_video("two").await.expect("lookup two");

    assert_eq!(provider.calls(), 2);
    assert_eq!(gateway.cache().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn expired_entry_triggers_exactly_one_refetch() {
    let provider = MockProvider::ok(sample_payload());
    let config = CacheConfig::new()
        .ttl(Duration::from_secs(60))
        .sweep_interval(Duration::from_secs(100_000));
    let gateway = gateway_with(Arc::clone(&provider), config);

    gateway.get_video("abc").await.expect("initial lookup");
    assert_eq!(provider.calls(), 1);

    tokio::time::advance(Duration::from_secs(61)).await;

    let again = gateway.get_video("abc").await.expect("post-expiry lookup");
    assert_eq!(again.source, LookupSource::Upstream);
    assert_eq!(provider.calls(), 2);

    // And the refreshed entry serves hits again.
    let hit = gateway.get_video("abc").await.expect("refreshed hit");
    assert_eq!(hit.source, LookupSource::Cache);
    assert_eq!(provider.calls(), 2);
}

// =========================================================================
// Failure paths
// =========================================================================

#[tokio::test]
async fn failed_fetch_is_an_error_and_never_cached() {
    let provider = MockProvider::failing();
    let gateway = gateway_with(Arc::clone(&provider), CacheConfig::default());

    let err = gateway
        .get_video("abc")
        .await
        .expect_err("failing provider must surface");
    assert!(matches!(err, VidgateError::Upstream { status: Some(404), .. }));
    assert!(gateway.cache().is_empty(), "failures must not be cached");

    // A later request for the same id fetches again — errors are not
    // remembered either.
    gateway.get_video("abc").await.expect_err("still failing");
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn failed_fetch_leaves_other_entries_retrievable() {
    let provider = MockProvider::failing();
    let gateway = gateway_with(provider, CacheConfig::default());

    // A previously cached record for another id.
    let prior = Arc::new(vidgate::Normalizer::default().fallback_record());
    gateway.cache().insert(cache_key("kept"), Arc::clone(&prior));

    gateway.get_video("abc").await.expect_err("upstream fails");

    let kept = gateway
        .get_video("kept")
        .await
        .expect("prior entry must remain retrievable");
    assert_eq!(kept.source, LookupSource::Cache);
    assert_eq!(kept.record, prior);
}

#[tokio::test]
async fn malformed_payload_is_an_error_and_never_cached() {
    let provider = MockProvider::ok(json!("not an object"));
    let gateway = gateway_with(Arc::clone(&provider), CacheConfig::default());

    let err = gateway
        .get_video("abc")
        .await
        .expect_err("non-object payload must surface");
    assert!(matches!(err, VidgateError::MalformedRaw(_)));
    assert!(gateway.cache().is_empty());
}

#[tokio::test]
async fn degenerate_but_normalized_record_is_still_stored() {
    // An empty object is a successful fetch; normalization degrades every
    // field but the result is cached like any other.
    let provider = MockProvider::ok(json!({}));
    let gateway = gateway_with(Arc::clone(&provider), CacheConfig::default());

    let lookup = gateway.get_video("abc").await.expect("empty payload is ok");
    assert_eq!(lookup.record.views, "N/A");
    assert_eq!(gateway.cache().len(), 1);

    gateway.get_video("abc").await.expect("served from cache");
    assert_eq!(provider.calls(), 1);
}

// =========================================================================
// Single-flight
// =========================================================================

#[tokio::test]
async fn concurrent_misses_share_one_upstream_call() {
    let provider = MockProvider::slow(sample_payload(), Duration::from_millis(50));
    let gateway = Arc::new(gateway_with(Arc::clone(&provider), CacheConfig::default()));

    let mut handles = Vec::new();
    for _ in 0..5 {
        let gateway = Arc::clone(&gateway);
        handles.push(tokio::spawn(
            async move { gateway.get_video("abc").await },
        ));
    }

    for handle in handles {
        let lookup = handle
            .await
            .expect("task completes")
            .expect("lookup succeeds");
        assert_eq!(lookup.record.id.as_deref(), Some("abc"));
    }

    assert_eq!(provider.calls(), 1, "misses must coalesce into one fetch");
    assert_eq!(gateway.cache().len(), 1);
}

#[tokio::test]
async fn coalescing_is_per_key() {
    let provider = MockProvider::slow(sample_payload(), Duration::from_millis(20));
    let gateway = Arc::new(gateway_with(Arc::clone(&provider), CacheConfig::default()));

    let a = {
        let gateway = Arc::clone(&gateway);
        tokio::spawn(async move { gateway.get_video("a").await })
    };
    let b = {
        let gateway = Arc::clone(&gateway);
        tokio::spawn(async move { gateway.get_video("b").await })
    };

    a.await.expect("task a").expect("lookup a");
    b.await.expect("task b").expect("lookup b");
    assert_eq!(provider.calls(), 2);
}

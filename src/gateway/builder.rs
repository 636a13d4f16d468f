//! Builder for configuring gateway instances

use std::sync::Arc;

use super::VideoGateway;
use crate::cache::{CacheConfig, VideoCache};
use crate::normalize::{CountFormatter, Locale, Normalizer};
use crate::provider::{InnertubeClient, VideoProvider};

/// Main entry point for creating gateway instances.
pub struct Vidgate;

impl Vidgate {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> VidgateBuilder {
        VidgateBuilder::new()
    }
}

/// Builder for configuring gateway instances.
pub struct VidgateBuilder {
    cache_config: CacheConfig,
    provider: Option<Arc<dyn VideoProvider>>,
    locale: Locale,
}

impl VidgateBuilder {
    pub fn new() -> Self {
        Self {
            cache_config: CacheConfig::default(),
            provider: None,
            locale: Locale::default(),
        }
    }

    /// Set the cache TTL and sweep interval.
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Inject the upstream provider (a mock in tests, Innertube in
    /// production). Defaults to [`InnertubeClient`] against the production
    /// endpoint.
    pub fn provider(mut self, provider: Arc<dyn VideoProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the locale used for count formatting.
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Build the gateway.
    ///
    /// # Panics
    ///
    /// Requires a tokio runtime context (the cache spawns its sweep task).
    pub fn build(self) -> VideoGateway {
        let provider = self
            .provider
            .unwrap_or_else(|| Arc::new(InnertubeClient::new()));
        let cache = VideoCache::new(&self.cache_config);
        let normalizer = Arc::new(Normalizer::new(CountFormatter::new(self.locale)));
        VideoGateway::new(cache, provider, normalizer)
    }
}

impl Default for VidgateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

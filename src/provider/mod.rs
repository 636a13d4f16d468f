//! Upstream video-metadata providers.
//!
//! The gateway consumes the upstream as one opaque asynchronous operation:
//! [`VideoProvider::fetch_raw_info`]. Authentication, request construction,
//! and the upstream protocol live behind this trait — the orchestrator
//! neither retries nor enforces timeouts on it.

mod innertube;

pub use innertube::InnertubeClient;

use async_trait::async_trait;

use crate::Result;
use crate::types::RawVideoInfo;

/// One async lookup against the external metadata source.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Fetch the raw, unnormalized payload for a video identifier.
    ///
    /// # Errors
    ///
    /// [`VidgateError::Upstream`](crate::VidgateError::Upstream) when the
    /// provider rejected or could not resolve the identifier (carrying the
    /// upstream status code when one was reported), or
    /// [`VidgateError::Http`](crate::VidgateError::Http) on transport
    /// failure.
    async fn fetch_raw_info(&self, video_id: &str) -> Result<RawVideoInfo>;
}

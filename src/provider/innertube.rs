//! Innertube-backed provider.
//!
//! Speaks to the same endpoint the web player uses. No API key is
//! required; the request carries a web-client context.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::VideoProvider;
use crate::error::{Result, VidgateError};
use crate::types::RawVideoInfo;

/// Default base URL for the Innertube API
const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

const PLAYER_ENDPOINT: &str = "/youtubei/v1/player";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CLIENT_NAME: &str = "WEB";
const CLIENT_VERSION: &str = "2.20240725.01.00";

/// Client for the Innertube player endpoint.
pub struct InnertubeClient {
    http: Client,
    base_url: String,
}

impl InnertubeClient {
    /// Create a client against the production endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom base URL and request timeout.
    pub fn with_options(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

impl Default for InnertubeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayerRequest<'a> {
    video_id: &'a str,
    context: RequestContext,
}

#[derive(Serialize)]
struct RequestContext {
    client: ClientContext,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientContext {
    client_name: &'static str,
    client_version: &'static str,
}

impl<'a> PlayerRequest<'a> {
    fn new(video_id: &'a str) -> Self {
        Self {
            video_id,
            context: RequestContext {
                client: ClientContext {
                    client_name: CLIENT_NAME,
                    client_version: CLIENT_VERSION,
                },
            },
        }
    }
}

#[async_trait]
impl VideoProvider for InnertubeClient {
    async fn fetch_raw_info(&self, video_id: &str) -> Result<RawVideoInfo> {
        let url = format!("{}{}", self.base_url, PLAYER_ENDPOINT);

        let response = self
            .http
            .post(&url)
            .json(&PlayerRequest::new(video_id))
            .send()
            .await
            .map_err(|e| VidgateError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.to_string()
            } else {
                body
            };
            return Err(VidgateError::Upstream {
                status: Some(status.as_u16()),
                message,
            });
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| VidgateError::Http(e.to_string()))?;

        // Innertube reports unresolvable ids inside a 200 body.
        if let Some("ERROR") = value
            .pointer("/playabilityStatus/status")
            .and_then(Value::as_str)
        {
            let reason = value
                .pointer("/playabilityStatus/reason")
                .and_then(Value::as_str)
                .unwrap_or("video unavailable");
            return Err(VidgateError::Upstream {
                status: Some(404),
                message: reason.to_string(),
            });
        }

        Ok(RawVideoInfo::new(value))
    }
}

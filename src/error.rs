//! Vidgate error types

/// Vidgate error types
#[derive(Debug, thiserror::Error)]
pub enum VidgateError {
    // Transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// The upstream provider rejected or could not resolve the identifier.
    /// Never retried automatically and never cached.
    #[error("upstream error: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    // Data errors
    /// The provider returned data the normalizer cannot interpret as an
    /// object at all. Missing fields are handled, not an error; this is
    /// treated identically to [`VidgateError::Upstream`] by callers.
    #[error("malformed upstream payload: {0}")]
    MalformedRaw(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The lookup task was cancelled or panicked.
    #[error("lookup task failed: {0}")]
    Task(String),
}

impl VidgateError {
    /// HTTP status to surface under the error-status failure policy.
    ///
    /// Upstream failures carry their own status when the provider reported
    /// one; everything else maps to 500.
    pub fn http_status(&self) -> u16 {
        match self {
            VidgateError::Upstream {
                status: Some(status),
                ..
            } => *status,
            _ => 500,
        }
    }
}

/// Result type alias for Vidgate operations
pub type Result<T> = std::result::Result<T, VidgateError>;

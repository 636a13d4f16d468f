//! The opaque upstream payload.

use serde::Deserialize;
use serde_json::Value;

/// Unprocessed metadata as returned by the external provider.
///
/// Treated as untyped and partial: any nested field may be absent, null, or
/// of unexpected shape. Nothing is assumed beyond "parses as JSON"; every
/// access goes through the null-safe extraction in
/// [`normalize`](crate::normalize). Transient — created per request and
/// discarded after normalization.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct RawVideoInfo(Value);

impl RawVideoInfo {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for RawVideoInfo {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

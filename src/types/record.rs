//! The stable output contract.

use serde::{Deserialize, Serialize};

/// The gateway's stable, always-schema-complete output shape.
///
/// Every field is present with a type-correct value; absence of upstream
/// data degrades to a documented default (`null`, `"N/A"`, `""`, or an
/// empty sequence), never to a missing key. Downstream consumers — and the
/// cache — can therefore treat every record as schema-complete.
///
/// Once inserted into the cache a record is shared and immutable
/// (`Arc<NormalizedRecord>`); it is never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    /// Formatted view count, always present ("N/A" when unknown).
    pub views: String,
    pub relative_date: Option<String>,
    /// Formatted like count, always present ("N/A" when unknown).
    pub likes: String,
    pub author: AuthorInfo,
    pub description: Description,
    /// At most one related item (the first upstream candidate).
    pub related: Vec<RelatedItem>,
}

/// Channel information for the video's author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorInfo {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Formatted subscriber phrase. Absent upstream data formats as zero,
    /// never "N/A" — consumers always expect a subscriber-count string.
    pub subscribers: String,
    pub thumbnail: String,
}

/// Video description, plain and with newlines replaced by a line break
/// marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
    pub text: String,
    pub formatted: String,
}

/// A single related-video candidate.
///
/// All fields are strings; text fields default to `"N/A"` and the
/// thumbnail to `""` when source data is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedItem {
    pub badge: String,
    pub title: String,
    pub channel: String,
    pub views: String,
    pub uploaded: String,
    pub video_id: String,
    pub playlist_id: String,
    pub thumbnail: String,
}

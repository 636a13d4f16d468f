//! Defensive normalization of heterogeneous upstream payloads.
//!
//! [`Normalizer::normalize`] is a pure transformation from the opaque,
//! loosely-structured [`RawVideoInfo`] into the fixed-shape
//! [`NormalizedRecord`]. It must not fail for any well-formed-but-incomplete
//! payload; only a catastrophically malformed one (not a JSON object at
//! all) is an error, bubbled to the caller as
//! [`VidgateError::MalformedRaw`].
//!
//! Each field is extracted independently through first-match-wins path
//! lists (see [`extract`]). The lists cover both the post-processed
//! upstream shape (`basic_info` / `primary_info` / `secondary_info` /
//! `contents`) and the raw Innertube shape (`videoDetails`), so the
//! normalizer is agnostic to which one the provider hands it.

mod extract;
mod format;

pub use format::{CountFormatter, Locale, TEN_THOUSAND};

use serde_json::Value;

use crate::error::{Result, VidgateError};
use crate::types::{AuthorInfo, Description, NormalizedRecord, RawVideoInfo, RelatedItem};
use extract::{count_at, first_of, leading_count, loose_text, text_at};

/// Line-break marker substituted for newlines in formatted descriptions.
const LINE_BREAK: &str = "<br>";

/// Default for missing text fields in related items.
const NOT_AVAILABLE: &str = "N/A";

// Alternate source paths per field, first match wins.
const ID_PATHS: &[&str] = &["basic_info.id", "videoDetails.videoId"];
const TITLE_PATHS: &[&str] = &["basic_info.title", "videoDetails.title"];
const SHORT_DESCRIPTION_PATHS: &[&str] = &[
    "basic_info.short_description",
    "videoDetails.shortDescription",
];
const FULL_DESCRIPTION_PATHS: &[&str] = &["secondary_info.description"];
const VIEW_PATHS: &[&str] = &["basic_info.view_count", "videoDetails.viewCount"];
const LIKE_PATHS: &[&str] = &["basic_info.like_count"];
const RELATIVE_DATE_PATHS: &[&str] = &["primary_info.relative_date", "primary_info.published"];
const AUTHOR_ID_PATHS: &[&str] = &[
    "basic_info.channel_id",
    "basic_info.channel.id",
    "videoDetails.channelId",
];
const AUTHOR_NAME_PATHS: &[&str] = &[
    "basic_info.author",
    "basic_info.channel.name",
    "videoDetails.author",
];
const SUBSCRIBER_PATHS: &[&str] = &["secondary_info.owner.subscriber_count"];
const AUTHOR_THUMBNAIL_PATHS: &[&str] = &[
    "secondary_info.owner.author.thumbnails.0.url",
    "videoDetails.thumbnail.thumbnails.0.url",
];
const RELATED_PATHS: &[&str] = &["contents.related_videos", "watch_next_feed"];

// Paths within a single related candidate.
const RELATED_BADGE_PATHS: &[&str] = &["badge.label", "badge"];
const RELATED_TITLE_PATHS: &[&str] = &["title"];
const RELATED_CHANNEL_PATHS: &[&str] = &["author.name", "author", "channel.name", "channel"];
const RELATED_VIEW_PATHS: &[&str] = &["view_count", "short_view_count", "views"];
const RELATED_UPLOADED_PATHS: &[&str] = &["published", "uploaded"];
const RELATED_VIDEO_ID_PATHS: &[&str] = &["id", "video_id", "videoId"];
const RELATED_PLAYLIST_ID_PATHS: &[&str] = &["playlist_id", "playlistId"];
const RELATED_THUMBNAIL_PATHS: &[&str] = &["thumbnails.0.url", "thumbnail.0.url", "thumbnail"];

/// Pure raw-to-normalized transformation.
///
/// Holds the [`CountFormatter`] so locale substitution never touches
/// extraction logic.
#[derive(Debug, Clone)]
pub struct Normalizer {
    formatter: CountFormatter,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(CountFormatter::default())
    }
}

impl Normalizer {
    pub fn new(formatter: CountFormatter) -> Self {
        Self { formatter }
    }

    /// Normalize a raw payload into the stable output shape.
    ///
    /// # Errors
    ///
    /// [`VidgateError::MalformedRaw`] when the payload is not a JSON
    /// object. Missing or misshapen fields inside an object are not
    /// errors; they degrade to the documented defaults.
    pub fn normalize(&self, raw: &RawVideoInfo) -> Result<NormalizedRecord> {
        let root = raw.as_value();
        if !root.is_object() {
            return Err(VidgateError::MalformedRaw(format!(
                "expected a JSON object, got {}",
                json_kind(root)
            )));
        }

        let text = text_at(root, SHORT_DESCRIPTION_PATHS)
            .or_else(|| text_at(root, FULL_DESCRIPTION_PATHS))
            .unwrap_or_default();
        let description = Description {
            formatted: text.replace('\n', LINE_BREAK),
            text,
        };

        Ok(NormalizedRecord {
            id: text_at(root, ID_PATHS),
            title: text_at(root, TITLE_PATHS),
            views: self.formatter.views(count_at(root, VIEW_PATHS)),
            relative_date: text_at(root, RELATIVE_DATE_PATHS),
            likes: self.formatter.likes(count_at(root, LIKE_PATHS)),
            author: self.author(root),
            description,
            related: self.related(root),
        })
    }

    /// The constant "no data" record: what an empty payload normalizes to.
    ///
    /// Served on failure under the fallback-record policy and never written
    /// to the cache.
    pub fn fallback_record(&self) -> NormalizedRecord {
        NormalizedRecord {
            id: None,
            title: None,
            views: self.formatter.views(None),
            relative_date: None,
            likes: self.formatter.likes(None),
            author: AuthorInfo {
                id: None,
                name: None,
                subscribers: self.formatter.subscribers(None),
                thumbnail: String::new(),
            },
            description: Description {
                text: String::new(),
                formatted: String::new(),
            },
            related: Vec::new(),
        }
    }

    fn author(&self, root: &Value) -> AuthorInfo {
        let subscribers = first_of(root, SUBSCRIBER_PATHS).and_then(loose_text);
        AuthorInfo {
            id: text_at(root, AUTHOR_ID_PATHS),
            name: text_at(root, AUTHOR_NAME_PATHS),
            subscribers: self.formatter.subscribers(subscribers.as_deref()),
            thumbnail: text_at(root, AUTHOR_THUMBNAIL_PATHS).unwrap_or_default(),
        }
    }

    /// At most the first upstream candidate is exposed.
    fn related(&self, root: &Value) -> Vec<RelatedItem> {
        let Some(items) = first_of(root, RELATED_PATHS).and_then(Value::as_array) else {
            return Vec::new();
        };
        items
            .first()
            .map(|item| self.related_item(item))
            .into_iter()
            .collect()
    }

    fn related_item(&self, item: &Value) -> RelatedItem {
        // View-count text is scraped for its leading numeric run before
        // formatting.
        let views = first_of(item, RELATED_VIEW_PATHS)
            .and_then(loose_text)
            .as_deref()
            .and_then(leading_count);

        RelatedItem {
            badge: text_or_na(item, RELATED_BADGE_PATHS),
            title: text_or_na(item, RELATED_TITLE_PATHS),
            channel: text_or_na(item, RELATED_CHANNEL_PATHS),
            views: self.formatter.views(views),
            uploaded: text_or_na(item, RELATED_UPLOADED_PATHS),
            video_id: text_or_na(item, RELATED_VIDEO_ID_PATHS),
            playlist_id: text_or_na(item, RELATED_PLAYLIST_ID_PATHS),
            thumbnail: text_at(item, RELATED_THUMBNAIL_PATHS).unwrap_or_default(),
        }
    }
}

fn text_or_na(root: &Value, paths: &[&str]) -> String {
    text_at(root, paths).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

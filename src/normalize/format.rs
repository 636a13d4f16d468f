//! Locale-aware count formatting.
//!
//! Formatting is a pluggable strategy keyed by field kind (views, likes,
//! subscribers), isolated from extraction so alternate locales or units can
//! be substituted without touching the normalizer.

use super::extract::digits;

/// Counts at or above this threshold display as a ten-thousand-scaled
/// quotient plus the locale's unit marker.
pub const TEN_THOUSAND: u64 = 10_000;

/// Display strings for one locale.
#[derive(Debug, Clone)]
pub struct Locale {
    /// Unit marker for ten-thousand-scaled counts.
    pub ten_thousand: String,
    /// Suffix appended to view counts.
    pub view_suffix: String,
    /// Prefix of the subscriber phrase.
    pub subscriber_prefix: String,
    /// Suffix of the subscriber phrase.
    pub subscriber_suffix: String,
}

impl Locale {
    /// The locale the upstream UI strings use.
    pub fn japanese() -> Self {
        Self {
            ten_thousand: "万".into(),
            view_suffix: "回視聴".into(),
            subscriber_prefix: "チャンネル登録者数 ".into(),
            subscriber_suffix: "人".into(),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::japanese()
    }
}

/// Formats raw counts into display strings for a [`Locale`].
#[derive(Debug, Clone, Default)]
pub struct CountFormatter {
    locale: Locale,
}

impl CountFormatter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// View count: "N/A" when unknown, otherwise the (possibly scaled)
    /// magnitude with the view suffix.
    ///
    /// `views(Some(9999))` → `"9999 回視聴"`, `views(Some(12000))` →
    /// `"1万 回視聴"`, `views(None)` → `"N/A"`.
    pub fn views(&self, count: Option<u64>) -> String {
        match count {
            Some(n) => format!("{} {}", self.scaled(n), self.locale.view_suffix),
            None => "N/A".to_string(),
        }
    }

    /// Like count: same scaling as views, no trailing suffix.
    pub fn likes(&self, count: Option<u64>) -> String {
        match count {
            Some(n) => self.scaled(n),
            None => "N/A".to_string(),
        }
    }

    /// Subscriber phrase embedding the scaled magnitude.
    ///
    /// String input has all non-digit characters stripped first
    /// (`"1,234,000 subscribers"` → 1234000). Absent input formats as
    /// zero, never "N/A": the consumer always expects a subscriber-count
    /// string.
    pub fn subscribers(&self, raw: Option<&str>) -> String {
        let count = raw
            .map(|s| digits(s).parse().unwrap_or(0))
            .unwrap_or(0);
        format!(
            "{}{}{}",
            self.locale.subscriber_prefix,
            self.scaled(count),
            self.locale.subscriber_suffix
        )
    }

    fn scaled(&self, n: u64) -> String {
        if n >= TEN_THOUSAND {
            format!("{}{}", n / TEN_THOUSAND, self.locale.ten_thousand)
        } else {
            n.to_string()
        }
    }
}

//! Null-safe extraction combinators over the raw payload tree.
//!
//! Every normalized field is extracted as "try path A, else path B, else
//! default". Keeping that as explicit combinators over dotted paths makes
//! the fallback order auditable and testable per field, instead of ad hoc
//! chained optional access.

use serde_json::Value;

/// Walk a dotted path from `root`. Numeric segments index into arrays
/// (`"thumbnails.0.url"`). A `null` at the end counts as absent.
pub(crate) fn pluck<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    if current.is_null() { None } else { Some(current) }
}

/// First path that resolves to a non-null value wins.
pub(crate) fn first_of<'a>(root: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths.iter().find_map(|path| pluck(root, path))
}

/// Text at the first path that yields usable text.
///
/// Accepts plain JSON strings and `{ "text": ... }` wrappers — the
/// upstream emits both shapes for the same logical field.
pub(crate) fn text_at(root: &Value, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .find_map(|path| pluck(root, path).and_then(as_text).map(str::to_owned))
}

/// Numeric count at the first path that yields one.
///
/// Accepts JSON numbers, digit strings (separators tolerated), and text
/// wrappers around either.
pub(crate) fn count_at(root: &Value, paths: &[&str]) -> Option<u64> {
    paths.iter().find_map(|path| pluck(root, path).and_then(as_count))
}

/// Text, but tolerant of numeric values — `1234` and `"1234"` are
/// equivalent upstream.
pub(crate) fn loose_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(_) => as_text(value).map(str::to_owned),
        _ => None,
    }
}

/// All ASCII digits of `s`, in order, separators and units dropped.
pub(crate) fn digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Leading numeric run of a human count string (`"12,345 views"` → 12345).
///
/// Comma separators inside the run are tolerated; anything else ends it.
pub(crate) fn leading_count(s: &str) -> Option<u64> {
    let mut run = String::new();
    for c in s.trim_start().chars() {
        if c.is_ascii_digit() {
            run.push(c);
        } else if c == ',' && !run.is_empty() {
            continue;
        } else {
            break;
        }
    }
    run.parse().ok()
}

fn as_text(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s),
        Value::Object(map) => map.get("text").and_then(Value::as_str),
        _ => None,
    }
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => digits(s).parse().ok(),
        Value::Object(_) => as_text(value).and_then(|s| digits(s).parse().ok()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pluck_walks_objects_and_arrays() {
        let root = json!({"a": {"b": [{"c": "x"}]}});
        assert_eq!(pluck(&root, "a.b.0.c"), Some(&json!("x")));
        assert_eq!(pluck(&root, "a.b.1.c"), None);
        assert_eq!(pluck(&root, "a.missing"), None);
    }

    #[test]
    fn pluck_treats_null_as_absent() {
        let root = json!({"a": null});
        assert_eq!(pluck(&root, "a"), None);
    }

    #[test]
    fn first_of_respects_order() {
        let root = json!({"b": "second", "a": "first"});
        assert_eq!(first_of(&root, &["a", "b"]), Some(&json!("first")));
        assert_eq!(first_of(&root, &["missing", "b"]), Some(&json!("second")));
    }

    #[test]
    fn text_at_unwraps_text_objects() {
        let root = json!({"plain": "x", "wrapped": {"text": "y"}});
        assert_eq!(text_at(&root, &["plain"]), Some("x".into()));
        assert_eq!(text_at(&root, &["wrapped"]), Some("y".into()));
    }

    #[test]
    fn text_at_skips_non_text_matches() {
        // The first path resolves but is not text; the second should win.
        let root = json!({"a": 42, "b": "usable"});
        assert_eq!(text_at(&root, &["a", "b"]), Some("usable".into()));
    }

    #[test]
    fn count_at_accepts_numbers_and_digit_strings() {
        let root = json!({"n": 12000, "s": "9,999", "w": {"text": "1,234"}});
        assert_eq!(count_at(&root, &["n"]), Some(12000));
        assert_eq!(count_at(&root, &["s"]), Some(9999));
        assert_eq!(count_at(&root, &["w"]), Some(1234));
    }

    #[test]
    fn leading_count_scrapes_the_numeric_run() {
        assert_eq!(leading_count("3,456,789 views"), Some(3_456_789));
        assert_eq!(leading_count("  42 回視聴"), Some(42));
        assert_eq!(leading_count("no digits here"), None);
        assert_eq!(leading_count(""), None);
    }

    #[test]
    fn digits_strips_everything_else() {
        assert_eq!(digits("1,234,000 subscribers"), "1234000");
        assert_eq!(digits("none"), "");
    }
}

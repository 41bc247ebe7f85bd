//! Payload field adapter
//!
//! Knowledge-base records are not uniform about where their main text lives.
//! Lookups go through the priority lists below instead of ad hoc key probing
//! at each call site.

use serde_json::{Map, Value};

/// Keys holding a record's main text, highest priority first
pub const TEXT_FIELD_KEYS: &[&str] = &["chunk_text", "text", "content"];

/// Keys holding a record's title, highest priority first
pub const TITLE_FIELD_KEYS: &[&str] = &["title", "name"];

/// Main text of a hit payload, or an empty string when no key is usable
pub fn main_text(fields: &Map<String, Value>) -> String {
    first_scalar(fields, TEXT_FIELD_KEYS).unwrap_or_default()
}

/// Title of a hit payload, if any
pub fn title(fields: &Map<String, Value>) -> Option<String> {
    first_scalar(fields, TITLE_FIELD_KEYS)
}

/// First key in `keys` whose value renders as text.
///
/// Strings are taken as-is, numbers and booleans are rendered. Null, arrays
/// and objects are skipped so a lower-priority key can still match.
fn first_scalar(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match fields.get(*key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_chunk_text_wins() {
        let f = fields(json!({"text": "second", "chunk_text": "first"}));
        assert_eq!(main_text(&f), "first");
    }

    #[test]
    fn test_falls_through_null_and_arrays() {
        let f = fields(json!({"chunk_text": null, "text": ["a"], "content": "third"}));
        assert_eq!(main_text(&f), "third");
    }

    #[test]
    fn test_missing_text_is_empty() {
        let f = fields(json!({"title": "Card"}));
        assert_eq!(main_text(&f), "");
        assert_eq!(title(&f).as_deref(), Some("Card"));
    }

    #[test]
    fn test_number_rendered() {
        let f = fields(json!({"chunk_text": 42}));
        assert_eq!(main_text(&f), "42");
    }
}

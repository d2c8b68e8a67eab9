//! Resilient decoding of model output into a raw extraction mapping.
//!
//! The extraction oracle is schema-free: it may wrap its JSON in markdown
//! fences, prepend chatter, or emit broken syntax. Decoding never fails past
//! this boundary; malformed output degrades to an inspectable
//! `{"raw_text": ...}` fallback payload instead of aborting the request.

use serde_json::{Map, Value};

/// Untyped mapping produced by decoding model output. May be empty, and may
/// hold only the `raw_text` fallback key when structured parsing failed.
pub type RawExtraction = Map<String, Value>;

/// Key carrying the verbatim model output when decoding degrades.
pub const RAW_TEXT_KEY: &str = "raw_text";

/// Decode model output into a mapping. Fence markers and a leading language
/// tag are stripped before parsing; any non-object result falls back to the
/// single-key payload. Idempotent: decoding a fallback's `raw_text` value
/// again just produces the same fallback.
pub fn decode(raw_text: &str) -> RawExtraction {
    let candidate = strip_fences(raw_text);

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => map,
        _ => fallback(raw_text),
    }
}

fn fallback(raw_text: &str) -> RawExtraction {
    let mut map = Map::new();
    map.insert(RAW_TEXT_KEY.into(), Value::String(raw_text.to_string()));
    map
}

/// Strip surrounding ``` fences and an optional language tag on the opening
/// fence. Returns the input unchanged when it is not fenced.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the language tag line ("json", "JSON", ...), if any.
    match body.split_once('\n') {
        Some((first, remainder)) if first.trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            remainder.trim()
        }
        _ => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_object_decodes() {
        let map = decode(r#"{"invoice_number": "INV-1"}"#);
        assert_eq!(map["invoice_number"], "INV-1");
    }

    #[test]
    fn fenced_json_matches_unfenced() {
        let body = r#"{"client": "Acme", "lines": []}"#;
        let fenced = format!("```json\n{body}\n```");
        assert_eq!(decode(&fenced), decode(body));
    }

    #[test]
    fn fence_without_language_tag() {
        let fenced = "```\n{\"total\": \"12,50\"}\n```";
        assert_eq!(decode(fenced)["total"], "12,50");
    }

    #[test]
    fn invalid_content_falls_back_verbatim() {
        let garbage = "Sure! Here is the data you asked for: {oops";
        let map = decode(garbage);
        assert_eq!(map.len(), 1);
        assert_eq!(map[RAW_TEXT_KEY], garbage);
    }

    #[test]
    fn non_object_json_falls_back() {
        let map = decode("[1, 2, 3]");
        assert_eq!(map[RAW_TEXT_KEY], "[1, 2, 3]");
    }

    #[test]
    fn decoding_the_fallback_is_stable() {
        let first = decode("not json at all");
        let again = decode(first[RAW_TEXT_KEY].as_str().unwrap());
        assert_eq!(first, again);
    }

    #[test]
    fn empty_object_is_accepted() {
        assert!(decode("{}").is_empty());
    }
}

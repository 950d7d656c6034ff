//! Response-text extraction
//!
//! Provider families return text at slightly different JSON paths depending on
//! API version and model. Extraction walks a list of JSON pointers and takes
//! the first one that holds a non-empty string.

use serde_json::Value;

/// Return the first non-empty string found at any of `paths`, trimmed
///
/// Candidates are never concatenated; the first hit is authoritative.
pub fn first_text(value: &Value, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .filter_map(|path| value.pointer(path))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PATHS: &[&str] = &["/a/0/text", "/b", "/c/0"];

    #[test]
    fn test_first_path_wins() {
        let value = json!({"a": [{"text": "first"}], "b": "second"});
        assert_eq!(first_text(&value, PATHS).as_deref(), Some("first"));
    }

    #[test]
    fn test_skips_empty_and_non_string_candidates() {
        let value = json!({"a": [{"text": "   "}], "b": {"not": "a string"}, "c": ["third "]});
        assert_eq!(first_text(&value, PATHS).as_deref(), Some("third"));
    }

    #[test]
    fn test_none_when_nothing_matches() {
        assert_eq!(first_text(&json!({"unrelated": 1}), PATHS), None);
        assert_eq!(first_text(&json!(null), PATHS), None);
    }
}

//! Field access on stored content documents.

use serde_json::Value;

/// Returns a string field when it is present and not blank.
pub fn text<'a>(doc: &'a Value, key: &str) -> Option<&'a str> {
    doc.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

pub fn text_or<'a>(doc: &'a Value, key: &str, default: &'a str) -> &'a str {
    text(doc, key).unwrap_or(default)
}

/// Returns the string items of an array field, skipping anything else.
pub fn text_list<'a>(doc: &'a Value, key: &str) -> Vec<&'a str> {
    doc.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn blank_fields_are_absent() {
        let doc = json!({"title": "  ", "name": "Quill", "count": 3, "tags": ["a", 1, "b"]});

        assert_eq!(text(&doc, "title"), None);
        assert_eq!(text(&doc, "count"), None);
        assert_eq!(text_or(&doc, "missing", "fallback"), "fallback");
        assert_eq!(text(&doc, "name"), Some("Quill"));
        assert_eq!(text_list(&doc, "tags"), vec!["a", "b"]);
    }
}

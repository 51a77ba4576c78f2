// src/llm/extract.rs
// Provider replies are untrusted text. Callers get a two-stage decode: strict
// parse first, then the first balanced {...} span, then give up and let the
// caller apply its documented fallback. Format drift must never fail a
// request.

use serde_json::Value;

/// Best-effort extraction of a JSON object from free-form provider text.
/// Returns the parsed object plus the byte range it occupied, so callers can
/// treat the remainder as spoken text.
pub fn extract_json_span(raw: &str) -> Option<(Value, std::ops::Range<usize>)> {
    // Stage 1: the whole reply is the object.
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(raw.trim()) {
        return Some((value, 0..raw.len()));
    }

    // Stage 2: first balanced brace span, string-literal aware.
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in raw[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    let candidate = &raw[start..end];
                    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(candidate) {
                        return Some((value, start..end));
                    }
                    return None;
                }
            }
            _ => {}
        }
    }

    None
}

/// Extraction without the span, for callers that only want the object.
pub fn extract_json(raw: &str) -> Option<Value> {
    extract_json_span(raw).map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_decode() {
        let (value, span) = extract_json_span(r#"{"intent": "help", "target": ""}"#).unwrap();
        assert_eq!(value["intent"], "help");
        assert_eq!(span.start, 0);
    }

    #[test]
    fn test_embedded_object_with_surrounding_prose() {
        let raw = r#"Sure! {"is_correct": true, "score_delta": 18} Great job, next question..."#;
        let (value, span) = extract_json_span(raw).unwrap();
        assert_eq!(value["score_delta"], 18);
        assert_eq!(raw[span.end..].trim(), "Great job, next question...");
    }

    #[test]
    fn test_nested_braces() {
        let raw = r#"prefix {"target": {"page": "/quests"}, "intent": "navigate"} suffix"#;
        let value = extract_json(raw).unwrap();
        assert_eq!(value["target"]["page"], "/quests");
    }

    #[test]
    fn test_braces_inside_strings() {
        let raw = r#"{"message": "use {curly} braces", "intent": "chat"}"#;
        let value = extract_json(raw).unwrap();
        assert_eq!(value["message"], "use {curly} braces");
    }

    #[test]
    fn test_garbage_returns_none() {
        assert!(extract_json("no json here at all").is_none());
        assert!(extract_json("{broken: json").is_none());
        assert!(extract_json("").is_none());
    }

    #[test]
    fn test_array_reply_is_not_an_object() {
        assert!(extract_json(r#"[1, 2, 3]"#).is_none());
    }
}

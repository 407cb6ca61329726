//! Recovery of one JSON object from free-form generated text.
//!
//! Every generation result passes through [`extract_json`] before any stage
//! reads a field from it.

use crate::errors::MalformedResponseError;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

lazy_static! {
    static ref CODE_FENCE: Regex = Regex::new(r"(?i)```[ \t]*(?:json)?").unwrap();
}

/// Removes triple-backtick fences, with or without a `json` tag.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").into_owned()
}

/// End offset (exclusive) of the balanced `{...}` span opening at `start`.
///
/// Braces inside string literals are ignored.
fn balanced_span_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset + ch.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses the first balanced top-level object found in `text`.
///
/// Candidate spans are tried left to right; a span that does not parse is
/// skipped and scanning resumes at the next `{`.
pub fn extract_json(text: &str) -> Result<Map<String, Value>, MalformedResponseError> {
    let cleaned = strip_code_fences(text);
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(MalformedResponseError::Empty);
    }

    let mut last_error: Option<String> = None;
    for (start, _) in cleaned.match_indices('{') {
        let Some(end) = balanced_span_end(cleaned, start) else {
            continue;
        };
        match serde_json::from_str::<Value>(&cleaned[start..end]) {
            Ok(Value::Object(map)) => return Ok(map),
            Ok(_) => {}
            Err(e) => last_error = Some(e.to_string()),
        }
    }

    match last_error {
        Some(e) => Err(MalformedResponseError::InvalidJson(e)),
        None => Err(MalformedResponseError::NoObject),
    }
}

/// String items of an array field; non-string scalars are stringified and
/// blanks dropped. `None` when the field is absent or not an array.
pub fn string_list(obj: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let items = obj.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Null => None,
                Value::Number(_) | Value::Bool(_) => Some(v.to_string()),
                other => other
                    .get("text")
                    .or_else(|| other.get("point"))
                    .and_then(Value::as_str)
                    .map(|s| s.trim().to_string()),
            })
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

/// Finite number from a numeric field, also accepting `"7.5"` or `"25%"`.
pub fn number(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    let v = obj.get(key)?;
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fenced_json_is_recovered() {
        let map = extract_json("```json\n{\"contradictions\": []}\n```").unwrap();
        assert_eq!(Value::Object(map), json!({"contradictions": []}));
    }

    #[test]
    fn untagged_fence_and_chatter() {
        let text = "Sure! Here is the analysis:\n```\n{\"a\": {\"b\": [1, 2]}, \"c\": \"x\"}\n```\nHope it helps.";
        let map = extract_json(text).unwrap();
        assert_eq!(Value::Object(map), json!({"a": {"b": [1, 2]}, "c": "x"}));
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_matching() {
        let text = r#"noise {"note": "use } and { freely", "n": 1} trailing }"#;
        let map = extract_json(text).unwrap();
        assert_eq!(map["note"], json!("use } and { freely"));
    }

    #[test]
    fn escaped_quotes_are_handled() {
        let text = r#"{"q": "say \"hi\" {now}"}"#;
        let map = extract_json(text).unwrap();
        assert_eq!(map["q"], json!("say \"hi\" {now}"));
    }

    #[test]
    fn invalid_first_span_falls_through_to_next() {
        let text = r#"{not json} then {"ok": true}"#;
        let map = extract_json(text).unwrap();
        assert_eq!(map["ok"], json!(true));
    }

    #[test]
    fn no_object_is_malformed() {
        assert_eq!(
            extract_json("I cannot help with that."),
            Err(MalformedResponseError::NoObject)
        );
        assert_eq!(extract_json("  ``` ```  "), Err(MalformedResponseError::Empty));
        assert!(matches!(
            extract_json("{broken: json}"),
            Err(MalformedResponseError::InvalidJson(_))
        ));
        assert_eq!(
            extract_json("{\"unterminated\": 1"),
            Err(MalformedResponseError::NoObject)
        );
    }

    #[test]
    fn list_and_number_helpers_are_lenient() {
        let map = extract_json(
            r#"{"xs": ["a", " ", 3, null, {"text": "b"}], "pct": "25%", "s": 7.5, "bad": "n/a"}"#,
        )
        .unwrap();
        assert_eq!(
            string_list(&map, "xs").unwrap(),
            vec!["a".to_string(), "3".to_string(), "b".to_string()]
        );
        assert_eq!(number(&map, "pct"), Some(25.0));
        assert_eq!(number(&map, "s"), Some(7.5));
        assert_eq!(number(&map, "bad"), None);
        assert_eq!(number(&map, "missing"), None);
        assert!(string_list(&map, "pct").is_none());
    }
}

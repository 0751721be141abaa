//! Best-effort cleanup of JSON returned by a model.
//!
//! Models wrap JSON in fences, add prose around it, leave trailing commas and
//! sometimes stop mid-object when they hit the token limit. `repair_json` turns
//! all of those into something `serde_json` can parse.

use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*([}\]])").unwrap());

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Returns the fenced block if the text contains one anywhere, otherwise the text itself.
fn fenced_block(text: &str) -> &str {
    for marker in ["```json", "```"] {
        if let Some(idx) = text.find(marker) {
            let rest = &text[idx + marker.len()..];
            return match rest.find("```") {
                Some(end) => &rest[..end],
                None => rest,
            };
        }
    }
    text
}

/// Turns raw model output into parseable JSON text. Returns `"{}"` when the
/// output contains no JSON at all.
pub fn repair_json(raw: &str) -> String {
    let text = fenced_block(strip_json_fences(raw)).trim();

    let Some(start) = text.find(['{', '[']) else {
        return "{}".to_string();
    };
    let body = &text[start..];

    let extracted = match scan(body) {
        Scan::Complete(end) => body[..end].to_string(),
        Scan::Truncated { last_comma } => close_truncated(body, last_comma),
    };

    let no_controls: String = extracted
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    TRAILING_COMMA.replace_all(&no_controls, "$1").into_owned()
}

enum Scan {
    /// Byte offset just past the bracket that closes the first value.
    Complete(usize),
    /// The value never closes. Holds the last top-level-safe comma and the open stack there.
    Truncated { last_comma: Option<(usize, Vec<char>)> },
}

/// Walks the text tracking strings and bracket depth.
fn scan(body: &str) -> Scan {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut last_comma = None;

    for (i, c) in body.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                stack.pop();
                if stack.is_empty() {
                    return Scan::Complete(i + c.len_utf8());
                }
            }
            ',' => last_comma = Some((i, stack.clone())),
            _ => {}
        }
    }
    Scan::Truncated { last_comma }
}

/// Cuts a truncated value back to its last complete element and closes every open bracket.
fn close_truncated(body: &str, last_comma: Option<(usize, Vec<char>)>) -> String {
    let (mut out, open) = match last_comma {
        Some((idx, open)) => (body[..idx].trim_end().to_string(), open),
        None => {
            let first = body.chars().next().unwrap_or('{');
            let closer = if first == '[' { ']' } else { '}' };
            (first.to_string(), vec![closer])
        }
    };
    for closer in open.iter().rev() {
        out.push(*closer);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parses(text: &str) -> Value {
        serde_json::from_str(text).unwrap_or_else(|e| panic!("{e}: {text}"))
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_repair_drops_surrounding_prose() {
        let raw = "Sure! Here is the JSON:\n```json\n{\"a\": 1}\n```\nLet me know.";
        assert_eq!(parses(&repair_json(raw)), serde_json::json!({"a": 1}));
    }

    #[test]
    fn test_repair_ignores_braces_inside_strings() {
        let raw = r#"{"text": "use {curly} and ] here", "n": 2} trailing"#;
        let value = parses(&repair_json(raw));
        assert_eq!(value["text"], "use {curly} and ] here");
        assert_eq!(value["n"], 2);
    }

    #[test]
    fn test_repair_removes_trailing_commas() {
        let raw = r#"{"items": [1, 2, 3,], "ok": true,}"#;
        let value = parses(&repair_json(raw));
        assert_eq!(value["items"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn test_repair_truncated_array_element() {
        let raw = r#"{"comments": [{"text": "one", "variation": 1}, {"text": "tw"#;
        let value = parses(&repair_json(raw));
        assert_eq!(value["comments"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["comments"][0]["text"], "one");
    }

    #[test]
    fn test_repair_truncated_inside_object() {
        let raw = r#"{"comments": [{"text": "one"}, {"text": "two", "varia"#;
        let value = parses(&repair_json(raw));
        assert_eq!(value["comments"][1]["text"], "two");
    }

    #[test]
    fn test_repair_truncated_without_commas() {
        assert_eq!(parses(&repair_json(r#"{"text": "never fin"#)), serde_json::json!({}));
    }

    #[test]
    fn test_repair_replaces_control_characters() {
        let raw = "{\"text\": \"line one\nline two\"}";
        let value = parses(&repair_json(raw));
        assert_eq!(value["text"], "line one line two");
    }

    #[test]
    fn test_repair_without_json_returns_empty_object() {
        assert_eq!(repair_json("I cannot help with that."), "{}");
        assert_eq!(repair_json(""), "{}");
    }

    #[test]
    fn test_repair_top_level_array() {
        let value = parses(&repair_json("Result: [\"a\", \"b\"]"));
        assert_eq!(value, serde_json::json!(["a", "b"]));
    }
}

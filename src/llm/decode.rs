// Permissive decoding of model output.
//
// Models often wrap JSON in markdown fences, a sentence of prose or an
// array. Decoding tries, in order: the text as-is, the text with code fences
// stripped, and the outermost `{ ... }` span. Only an object ends the search.

use serde_json::Value;
use thiserror::Error;

use crate::tree::{Node, SchemaError, parse_node};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("model output contains no JSON object")]
    NotJson,
    #[error("model output does not match the roadmap schema: {0}")]
    Schema(#[from] SchemaError),
}

fn parse_object(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(Value::is_object)
}

/// Find a JSON object in `text`.
pub fn extract_json(text: &str) -> Option<Value> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(v) = parse_object(text) {
        return Some(v);
    }
    if let Some(v) = parse_object(strip_fences(text)) {
        return Some(v);
    }

    let first = text.find('{')?;
    let last = text.rfind('}')?;
    if last <= first {
        return None;
    }
    parse_object(&text[first..=last])
}

fn strip_fences(text: &str) -> &str {
    let body = if let Some(rest) = text.strip_prefix("```json") {
        rest
    } else if let Some(rest) = text.strip_prefix("```") {
        rest
    } else {
        text
    };
    body.trim().strip_suffix("```").unwrap_or(body).trim()
}

/// Extract and validate a roadmap from raw model output.
pub fn decode_roadmap(text: &str) -> Result<Node, DecodeError> {
    let value = extract_json(text).ok_or(DecodeError::NotJson)?;
    Ok(parse_node(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TREE: &str = r#"{"id":"root","label":"Rust","children":[{"id":"a","label":"Ownership"}]}"#;

    #[test]
    fn test_plain_json() {
        assert_eq!(decode_roadmap(TREE).unwrap().children[0].label, "Ownership");
    }

    #[test]
    fn test_fenced_json() {
        let text = format!("```json\n{}\n```", TREE);
        assert_eq!(decode_roadmap(&text).unwrap().label, "Rust");

        let bare = format!("```\n{}\n```", TREE);
        assert_eq!(decode_roadmap(&bare).unwrap().label, "Rust");
    }

    #[test]
    fn test_json_wrapped_in_prose() {
        let text = format!("Sure! Here is your roadmap:\n{}\nHope this helps {{:}}", TREE);
        // Outermost span includes the trailing braces and fails; no JSON found.
        assert!(extract_json(&text).is_none());

        let text = format!("Sure! Here is your roadmap:\n{}\nHope this helps.", TREE);
        assert_eq!(decode_roadmap(&text).unwrap().label, "Rust");
    }

    #[test]
    fn test_node_wrapped_in_array() {
        let root = decode_roadmap(r#"[{"id":"r","label":"Rust"}]"#).unwrap();
        assert_eq!(root.id, "r");
        assert_eq!(root.label, "Rust");

        let fenced = "```json\n[{\"id\":\"r\",\"label\":\"Rust\"}]\n```";
        assert_eq!(decode_roadmap(fenced).unwrap().label, "Rust");
    }

    #[test]
    fn test_scalar_json_is_not_a_roadmap() {
        assert!(matches!(decode_roadmap("42"), Err(DecodeError::NotJson)));
        assert!(matches!(decode_roadmap(r#""text""#), Err(DecodeError::NotJson)));
    }

    #[test]
    fn test_no_json() {
        assert!(matches!(decode_roadmap("I cannot help with that."), Err(DecodeError::NotJson)));
        assert!(matches!(decode_roadmap(""), Err(DecodeError::NotJson)));
        assert!(matches!(decode_roadmap("} backwards {"), Err(DecodeError::NotJson)));
    }

    #[test]
    fn test_schema_violation() {
        let err = decode_roadmap(r#"{"id":"root"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Schema(ref e) if e.path == "$.label"));
    }
}

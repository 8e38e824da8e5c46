//! Shape validation for roadmap JSON.
//!
//! Works on untyped `serde_json::Value` so that output from an untrusted
//! producer (a language model, a remote endpoint) can be rejected with a
//! precise path before it is decoded into a [`Node`].

use serde_json::Value;
use thiserror::Error;

use super::Node;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {reason}")]
pub struct SchemaError {
    /// JSON path of the offending value, e.g. `$.children[1].label`.
    pub path: String,
    pub reason: String,
}

impl SchemaError {
    fn new(path: &str, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Recursively check that `value` has the shape of a roadmap node.
pub fn validate_node(value: &Value) -> Result<(), SchemaError> {
    validate_at(value, "$")
}

/// Validate and decode in one step.
pub fn parse_node(value: Value) -> Result<Node, SchemaError> {
    validate_node(&value)?;
    serde_json::from_value(value).map_err(|e| SchemaError::new("$", e.to_string()))
}

fn validate_at(value: &Value, path: &str) -> Result<(), SchemaError> {
    let obj = value
        .as_object()
        .ok_or_else(|| SchemaError::new(path, "node must be an object"))?;

    require_string(obj.get("id"), &format!("{}.id", path))?;
    require_string(obj.get("label"), &format!("{}.label", path))?;

    match obj.get("description") {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(_) => {
            return Err(SchemaError::new(
                &format!("{}.description", path),
                "must be a string",
            ));
        }
    }

    if let Some(resources) = present(obj.get("resources")) {
        let list = resources.as_array().ok_or_else(|| {
            SchemaError::new(&format!("{}.resources", path), "must be an array")
        })?;
        for (i, r) in list.iter().enumerate() {
            let rpath = format!("{}.resources[{}]", path, i);
            let robj = r
                .as_object()
                .ok_or_else(|| SchemaError::new(&rpath, "resource must be an object"))?;
            require_string(robj.get("title"), &format!("{}.title", rpath))?;
            require_string(robj.get("url"), &format!("{}.url", rpath))?;
        }
    }

    if let Some(children) = present(obj.get("children")) {
        let list = children.as_array().ok_or_else(|| {
            SchemaError::new(&format!("{}.children", path), "must be an array")
        })?;
        for (i, c) in list.iter().enumerate() {
            validate_at(c, &format!("{}.children[{}]", path, i))?;
        }
    }

    Ok(())
}

/// `null` counts as absent for optional fields.
fn present(v: Option<&Value>) -> Option<&Value> {
    v.filter(|v| !v.is_null())
}

fn require_string(v: Option<&Value>, path: &str) -> Result<(), SchemaError> {
    match v {
        Some(Value::String(_)) => Ok(()),
        Some(_) => Err(SchemaError::new(path, "must be a string")),
        None => Err(SchemaError::new(path, "is required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn three_level() -> Value {
        json!({
            "id": "root",
            "label": "Rust",
            "description": "Systems programming",
            "resources": [{ "title": "Book", "url": "https://doc.rust-lang.org/book/" }],
            "children": [{
                "id": "own",
                "label": "Ownership",
                "children": [{
                    "id": "borrow",
                    "label": "Borrowing",
                    "resources": [{ "title": "Ch 4", "url": "https://example.com/ch4" }],
                    "children": []
                }]
            }]
        })
    }

    #[test]
    fn test_accepts_nested_tree() {
        assert!(validate_node(&three_level()).is_ok());
        let node = parse_node(three_level()).unwrap();
        assert_eq!(node.children[0].children[0].label, "Borrowing");
    }

    #[test]
    fn test_rejects_missing_label_on_descendant() {
        let mut value = three_level();
        value["children"][0]["children"][0]
            .as_object_mut()
            .unwrap()
            .remove("label");

        let err = validate_node(&value).unwrap_err();
        assert_eq!(err.path, "$.children[0].children[0].label");
    }

    #[test]
    fn test_rejects_non_string_id() {
        let err = validate_node(&json!({ "id": 3, "label": "x" })).unwrap_err();
        assert_eq!(err.path, "$.id");
    }

    #[test]
    fn test_rejects_bad_resource() {
        let value = json!({
            "id": "a", "label": "A",
            "resources": [{ "title": "ok", "url": "u" }, { "title": "missing url" }]
        });
        let err = validate_node(&value).unwrap_err();
        assert_eq!(err.path, "$.resources[1].url");
    }

    #[test]
    fn test_rejects_children_not_array() {
        let value = json!({ "id": "a", "label": "A", "children": { "id": "b" } });
        let err = validate_node(&value).unwrap_err();
        assert_eq!(err.path, "$.children");
    }

    #[test]
    fn test_null_optionals_are_accepted() {
        let value = json!({
            "id": "a", "label": "A",
            "description": null, "resources": null, "children": null
        });
        assert!(validate_node(&value).is_ok());
        assert!(parse_node(value).unwrap().children.is_empty());
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(validate_node(&json!("just text")).is_err());
        assert!(validate_node(&json!(null)).is_err());
    }
}

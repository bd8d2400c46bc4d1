//! Structural validation for IR trees coming from untyped sources.
//!
//! A typed [`IrDocument`] is well formed by construction (except for the heading level
//! range), but JSON handed to the CLI or produced by another tool is not. The validator
//! walks a `serde_json::Value` and reports every node whose shape does not match its tag,
//! it does not stop at the first problem.
//!
//! Validation is advisory: nothing in the conversion pipeline calls it implicitly.

use super::nodes::{IrDocument, TableAlignment};
use crate::error::FormatError;
use serde_json::{Map, Value};
use std::fmt;

/// One structural problem, located by a JSON-pointer-like path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{}: {}", path, self.message)
    }
}

/// Walk `value` as an IR document and collect every violation.
pub fn validate_document(value: &Value) -> Vec<Violation> {
    let mut validator = Validator::default();
    validator.document(value);
    validator.violations
}

impl IrDocument {
    /// Validate and deserialize an untyped tree.
    pub fn from_json(value: &Value) -> Result<IrDocument, FormatError> {
        let violations = validate_document(value);
        if !violations.is_empty() {
            return Err(FormatError::InvalidDocument(violations));
        }
        serde_json::from_value(value.clone())
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }
}

#[derive(Default)]
struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    fn report(&mut self, path: &str, message: impl Into<String>) {
        self.violations.push(Violation {
            path: path.to_string(),
            message: message.into(),
        });
    }

    /// Object with a string `type` tag, or a reported violation.
    fn tagged<'v>(
        &mut self,
        value: &'v Value,
        path: &str,
    ) -> Option<(&'v str, &'v Map<String, Value>)> {
        let Some(object) = value.as_object() else {
            self.report(path, format!("expected an object, found {}", kind(value)));
            return None;
        };
        match object.get("type") {
            Some(Value::String(tag)) => Some((tag.as_str(), object)),
            Some(other) => {
                let message = format!("'type' must be a string, found {}", kind(other));
                self.report(path, message);
                None
            }
            None => {
                self.report(path, "missing 'type' tag");
                None
            }
        }
    }

    fn array<'v>(
        &mut self,
        object: &'v Map<String, Value>,
        key: &str,
        path: &str,
    ) -> &'v [Value] {
        match object.get(key) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                let message = format!("'{}' must be an array, found {}", key, kind(other));
                self.report(path, message);
                &[]
            }
            None => {
                self.report(path, format!("missing '{}'", key));
                &[]
            }
        }
    }

    fn string(&mut self, object: &Map<String, Value>, key: &str, path: &str) {
        match object.get(key) {
            Some(Value::String(_)) => {}
            Some(other) => {
                self.report(path, format!("'{}' must be a string, found {}", key, kind(other)))
            }
            None => self.report(path, format!("missing '{}'", key)),
        }
    }

    fn optional_string(&mut self, object: &Map<String, Value>, key: &str, path: &str) {
        match object.get(key) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(other) => {
                self.report(path, format!("'{}' must be a string, found {}", key, kind(other)))
            }
        }
    }

    fn document(&mut self, value: &Value) {
        let Some((tag, object)) = self.tagged(value, "") else {
            return;
        };
        if tag != "Document" {
            self.report("", format!("expected 'Document', found '{}'", tag));
        }
        self.blocks(object, "");
    }

    fn blocks(&mut self, object: &Map<String, Value>, path: &str) {
        for (index, block) in self.array(object, "blocks", path).iter().enumerate() {
            self.block(block, &format!("{}/blocks/{}", path, index));
        }
    }

    fn inlines(&mut self, object: &Map<String, Value>, path: &str) {
        for (index, inline) in self.array(object, "inlines", path).iter().enumerate() {
            self.inline(inline, &format!("{}/inlines/{}", path, index));
        }
    }

    fn block(&mut self, value: &Value, path: &str) {
        let Some((tag, object)) = self.tagged(value, path) else {
            return;
        };
        match tag {
            "Paragraph" => self.inlines(object, path),
            "Heading" => {
                match object.get("level").and_then(Value::as_u64) {
                    Some(1..=6) => {}
                    Some(level) => {
                        self.report(path, format!("heading level {} is outside 1..=6", level))
                    }
                    None => self.report(path, "'level' must be an integer in 1..=6"),
                }
                self.inlines(object, path);
            }
            "List" => {
                if !matches!(object.get("ordered"), Some(Value::Bool(_))) {
                    self.report(path, "'ordered' must be a boolean");
                }
                for (index, item) in self.array(object, "items", path).iter().enumerate() {
                    let item_path = format!("{}/items/{}", path, index);
                    self.container(item, "ListItem", &item_path);
                }
            }
            "Blockquote" => self.blocks(object, path),
            "CodeBlock" => {
                self.string(object, "text", path);
                self.optional_string(object, "language", path);
            }
            "HorizontalRule" => {}
            "Table" => self.table(object, path),
            "ListItem" | "TableRow" | "TableCell" | "Document" => {
                self.report(path, format!("'{}' is not allowed in a block sequence", tag))
            }
            other => self.report(path, format!("unknown block type '{}'", other)),
        }
    }

    /// `ListItem` or `TableCell`: a tagged object holding blocks.
    fn container(&mut self, value: &Value, expected: &str, path: &str) {
        let Some((tag, object)) = self.tagged(value, path) else {
            return;
        };
        if tag != expected {
            self.report(path, format!("expected '{}', found '{}'", expected, tag));
            return;
        }
        self.blocks(object, path);
    }

    fn table(&mut self, object: &Map<String, Value>, path: &str) {
        match object.get("headerRow") {
            None | Some(Value::Null) => {}
            Some(row) => self.row(row, &format!("{}/headerRow", path)),
        }
        for (index, row) in self.array(object, "rows", path).iter().enumerate() {
            self.row(row, &format!("{}/rows/{}", path, index));
        }
        match object.get("alignments") {
            None | Some(Value::Null) => {}
            Some(Value::Array(alignments)) => {
                for (index, alignment) in alignments.iter().enumerate() {
                    let recognized = alignment
                        .as_str()
                        .map(|name| {
                            TableAlignment::parse(name).map(|a| a.as_str()) == Some(name)
                        })
                        .unwrap_or(false);
                    if !recognized {
                        self.report(
                            &format!("{}/alignments/{}", path, index),
                            format!("unrecognized alignment {}", alignment),
                        );
                    }
                }
            }
            Some(other) => {
                self.report(path, format!("'alignments' must be an array, found {}", kind(other)))
            }
        }
    }

    fn row(&mut self, value: &Value, path: &str) {
        let Some((tag, object)) = self.tagged(value, path) else {
            return;
        };
        if tag != "TableRow" {
            self.report(path, format!("expected 'TableRow', found '{}'", tag));
            return;
        }
        for (index, cell) in self.array(object, "cells", path).iter().enumerate() {
            self.container(cell, "TableCell", &format!("{}/cells/{}", path, index));
        }
    }

    fn inline(&mut self, value: &Value, path: &str) {
        let Some((tag, object)) = self.tagged(value, path) else {
            return;
        };
        match tag {
            "Text" | "CodeSpan" => self.string(object, "text", path),
            "Strong" | "Emphasis" | "Underline" => self.inlines(object, path),
            "Link" => {
                self.string(object, "href", path);
                self.inlines(object, path);
            }
            "Image" => {
                self.string(object, "src", path);
                self.optional_string(object, "alt", path);
            }
            "LineBreak" => {}
            other => self.report(path, format!("unknown inline type '{}'", other)),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::nodes::{Block, Inline};
    use serde_json::json;

    #[test]
    fn test_valid_document_has_no_violations() {
        let doc = IrDocument::new(vec![Block::paragraph(vec![Inline::text("hi")])]);
        let value = serde_json::to_value(&doc).unwrap();
        assert!(validate_document(&value).is_empty());
    }

    #[test]
    fn test_reports_every_violation() {
        let value = json!({
            "type": "Document",
            "blocks": [
                {"type": "Heading", "level": 9, "inlines": []},
                {"type": "Paragraph", "inlines": [{"type": "Text"}, {"type": "Blink"}]},
                {"type": "ListItem", "blocks": []}
            ]
        });

        let violations = validate_document(&value);
        let paths: Vec<_> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/blocks/0",
                "/blocks/1/inlines/0",
                "/blocks/1/inlines/1",
                "/blocks/2"
            ]
        );
    }

    #[test]
    fn test_checks_nested_table_cells() {
        let value = json!({
            "type": "Document",
            "blocks": [{
                "type": "Table",
                "rows": [{"type": "TableRow", "cells": [{"type": "ListItem", "blocks": []}]}],
                "alignments": ["left", "middle"]
            }]
        });

        let violations = validate_document(&value);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].path, "/blocks/0/rows/0/cells/0");
        assert_eq!(violations[1].path, "/blocks/0/alignments/1");
    }

    #[test]
    fn test_rejects_non_object_root() {
        let violations = validate_document(&json!([1, 2]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].to_string(), "/: expected an object, found an array");
    }

    #[test]
    fn test_from_json_round_trips_valid_tree() {
        let doc = IrDocument::new(vec![Block::List {
            ordered: true,
            items: vec![crate::ir::ListItem::new(vec![Block::HorizontalRule])],
        }]);
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(IrDocument::from_json(&value).unwrap(), doc);
    }

    #[test]
    fn test_from_json_surfaces_violations() {
        let err = IrDocument::from_json(&json!({"type": "Document"})).unwrap_err();
        assert!(matches!(err, FormatError::InvalidDocument(ref v) if v.len() == 1));
    }
}

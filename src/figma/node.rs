// figma-report-service/src/figma/node.rs

use crate::error::{ReportError, Result};
use serde::Serialize;
use serde_json::Value;

const EMPTY_CHILDREN: &[Value] = &[];

/// One decoded level of the Figma node tree.
///
/// The raw tree stays as `serde_json::Value`; each node is decoded exactly
/// once as the traversal reaches it, so downstream code matches on
/// [`NodeKind`] instead of probing string keys. Children are left raw for
/// the walker.
#[derive(Debug)]
pub struct Node<'a> {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub bounds: BoundingBox,
    pub visible: bool,
    pub children: &'a [Value],
}

/// The fixed node-type vocabulary. Everything outside it is `Other`: not
/// collected, but still traversed so nested content stays reachable.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Canvas,
    Frame,
    Component,
    Instance,
    Group,
    Rectangle,
    Vector,
    Text { characters: String, style: TextStyle },
    Other(String),
}

impl NodeKind {
    /// Structurally significant node types that become layer descriptors.
    pub fn is_layer(&self) -> bool {
        matches!(
            self,
            NodeKind::Frame
                | NodeKind::Component
                | NodeKind::Instance
                | NodeKind::Group
                | NodeKind::Rectangle
                | NodeKind::Vector
        )
    }

    pub fn type_name(&self) -> &str {
        match self {
            NodeKind::Canvas => "CANVAS",
            NodeKind::Frame => "FRAME",
            NodeKind::Component => "COMPONENT",
            NodeKind::Instance => "INSTANCE",
            NodeKind::Group => "GROUP",
            NodeKind::Rectangle => "RECTANGLE",
            NodeKind::Vector => "VECTOR",
            NodeKind::Text { .. } => "TEXT",
            NodeKind::Other(name) => name,
        }
    }
}

/// Geometry from `absoluteBoundingBox`. Missing fields are zeroed, applied
/// uniformly across all node types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Font metadata carried on TEXT nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<f64>,
}

impl<'a> Node<'a> {
    /// Decode a single tree level. Fails when the value is not a JSON
    /// object; field defaults follow the documented policy (visible ->
    /// true, geometry -> 0, characters -> "").
    pub fn from_value(value: &'a Value) -> Result<Node<'a>> {
        let obj = value.as_object().ok_or_else(|| {
            ReportError::MalformedInput(format!(
                "expected a node object, found {}",
                json_type_name(value)
            ))
        })?;

        let id = str_field(obj, "id");
        let name = str_field(obj, "name");
        let type_name = str_field(obj, "type");

        let kind = match type_name.as_str() {
            "CANVAS" | "PAGE" => NodeKind::Canvas,
            "FRAME" => NodeKind::Frame,
            "COMPONENT" => NodeKind::Component,
            "INSTANCE" => NodeKind::Instance,
            "GROUP" => NodeKind::Group,
            "RECTANGLE" => NodeKind::Rectangle,
            "VECTOR" => NodeKind::Vector,
            "TEXT" => NodeKind::Text {
                characters: str_field(obj, "characters"),
                style: decode_text_style(obj.get("style")),
            },
            other => NodeKind::Other(other.to_string()),
        };

        let bounds = decode_bounds(obj.get("absoluteBoundingBox"));
        let visible = obj.get("visible").and_then(Value::as_bool).unwrap_or(true);
        let children = obj
            .get("children")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN);

        Ok(Node {
            id,
            name,
            kind,
            bounds,
            visible,
            children,
        })
    }
}

fn str_field(obj: &serde_json::Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn decode_bounds(value: Option<&Value>) -> BoundingBox {
    let Some(obj) = value.and_then(Value::as_object) else {
        return BoundingBox::default();
    };

    let num = |key: &str| obj.get(key).and_then(Value::as_f64).unwrap_or(0.0);

    BoundingBox {
        x: num("x"),
        y: num("y"),
        width: num("width"),
        height: num("height"),
    }
}

fn decode_text_style(value: Option<&Value>) -> TextStyle {
    let Some(obj) = value.and_then(Value::as_object) else {
        return TextStyle::default();
    };

    TextStyle {
        font_family: obj
            .get("fontFamily")
            .and_then(Value::as_str)
            .map(str::to_string),
        font_size: obj.get("fontSize").and_then(Value::as_f64),
        font_weight: obj.get("fontWeight").and_then(Value::as_f64),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
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
    use serde_json::json;

    #[test]
    fn decodes_frame_with_geometry() {
        let raw = json!({
            "id": "1:2",
            "name": "Login",
            "type": "FRAME",
            "absoluteBoundingBox": {"x": 10.0, "y": 20.0, "width": 375.0, "height": 812.0},
            "children": [{"id": "1:3"}, {"id": "1:4"}]
        });

        let node = Node::from_value(&raw).unwrap();
        assert_eq!(node.id, "1:2");
        assert_eq!(node.kind, NodeKind::Frame);
        assert!(node.kind.is_layer());
        assert_eq!(node.bounds.width, 375.0);
        assert_eq!(node.children.len(), 2);
        assert!(node.visible);
    }

    #[test]
    fn missing_geometry_defaults_to_zero() {
        let raw = json!({"id": "1:5", "name": "Blob", "type": "VECTOR"});
        let node = Node::from_value(&raw).unwrap();
        assert_eq!(node.bounds, BoundingBox::default());
        assert!(node.children.is_empty());
    }

    #[test]
    fn decodes_text_node_with_style() {
        let raw = json!({
            "id": "2:1",
            "name": "Welcome",
            "type": "TEXT",
            "characters": "Sign in",
            "style": {"fontFamily": "Inter", "fontSize": 16.0, "fontWeight": 600.0}
        });

        let node = Node::from_value(&raw).unwrap();
        match node.kind {
            NodeKind::Text { characters, style } => {
                assert_eq!(characters, "Sign in");
                assert_eq!(style.font_family.as_deref(), Some("Inter"));
                assert_eq!(style.font_size, Some(16.0));
                assert_eq!(style.font_weight, Some(600.0));
            }
            other => panic!("expected TEXT, decoded {:?}", other),
        }
    }

    #[test]
    fn text_without_characters_decodes_empty() {
        let raw = json!({"id": "2:2", "name": "Placeholder", "type": "TEXT"});
        let node = Node::from_value(&raw).unwrap();
        assert_eq!(
            node.kind,
            NodeKind::Text {
                characters: String::new(),
                style: TextStyle::default()
            }
        );
    }

    #[test]
    fn unknown_type_is_opaque_but_keeps_children() {
        let raw = json!({
            "id": "3:1",
            "type": "BOOLEAN_OPERATION",
            "children": [{"id": "3:2", "type": "TEXT", "characters": "hi"}]
        });

        let node = Node::from_value(&raw).unwrap();
        assert_eq!(node.kind, NodeKind::Other("BOOLEAN_OPERATION".to_string()));
        assert!(!node.kind.is_layer());
        assert_eq!(node.children.len(), 1);
    }

    #[test]
    fn invisible_flag_is_recorded_not_filtered() {
        let raw = json!({"id": "4:1", "type": "GROUP", "visible": false});
        let node = Node::from_value(&raw).unwrap();
        assert!(!node.visible);
        assert!(node.kind.is_layer());
    }

    #[test]
    fn non_object_node_is_malformed() {
        let raw = json!("just a string");
        let result = Node::from_value(&raw);
        assert!(matches!(result, Err(ReportError::MalformedInput(_))));
    }
}

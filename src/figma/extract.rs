// figma-report-service/src/figma/extract.rs

use crate::error::{ReportError, Result};
use crate::figma::node::{json_type_name, Node, NodeKind, TextStyle};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::debug;

/// Characters of the fingerprint hex digest kept for filenames.
const FINGERPRINT_LEN: usize = 10;

/// A Figma `GET /v1/files/{key}` payload, or the LLM-synthesized
/// equivalent. `document` stays raw until [`extract`] walks it; the
/// component and style maps are ordered so extraction is deterministic
/// regardless of upstream key order.
#[derive(Debug, Clone, Deserialize)]
pub struct FigmaFile {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "lastModified", default)]
    pub last_modified: String,
    #[serde(default)]
    pub document: Value,
    #[serde(default)]
    pub components: BTreeMap<String, ComponentMeta>,
    #[serde(default)]
    pub styles: BTreeMap<String, StyleMeta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub remote: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StyleMeta {
    #[serde(rename = "styleType", default)]
    pub style_type: Option<String>,
}

/// A top-level canvas of the document. Pages do not nest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub id: String,
    pub name: String,
}

/// Normalized record for a structurally significant node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub name: String,
    pub page: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Direct children at extraction time; a snapshot, not a live count.
    pub children_count: usize,
    pub visible: bool,
}

/// Normalized record for a TEXT node. Blank text is recorded, not dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextDescriptor {
    pub id: String,
    pub page: String,
    pub name: String,
    pub characters: String,
    pub style: TextStyle,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Component metadata from the document-level `components` map. The map
/// carries no placement, so `page` stays unset; placed COMPONENT/INSTANCE
/// nodes appear among the layers instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentDescriptor {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub page: Option<String>,
    pub remote: bool,
}

/// Aggregate output of one extraction. Immutable after construction and
/// never persisted; every request re-fetches and re-parses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedStructure {
    pub file_name: String,
    pub last_modified: String,
    pub fingerprint: String,
    pub pages: Vec<Page>,
    pub layers: Vec<LayerDescriptor>,
    pub text_nodes: Vec<TextDescriptor>,
    pub components: Vec<ComponentDescriptor>,
    pub style_ids: Vec<String>,
}

/// Walk a Figma file payload into a [`ParsedStructure`].
///
/// Pure and deterministic: no I/O, the input is not mutated, and the same
/// payload always yields the same structure (fingerprint included). Pages
/// are the direct CANVAS children of `document`; each page is traversed
/// depth-first pre-order with an explicit stack, left to right, so frame
/// ordering downstream matches document order. Components come from the
/// document-scoped `components` map only; tree COMPONENT/INSTANCE nodes
/// stay layers and are never counted as components.
///
/// `max_depth` bounds nesting; deeper documents fail as malformed rather
/// than overflowing the stack.
pub fn extract(file: &FigmaFile, max_depth: usize) -> Result<ParsedStructure> {
    let document = file.document.as_object().ok_or_else(|| {
        ReportError::MalformedInput(format!(
            "document is missing or not an object (found {})",
            json_type_name(&file.document)
        ))
    })?;

    let top_level = document
        .get("children")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut pages = Vec::new();
    let mut layers = Vec::new();
    let mut text_nodes = Vec::new();

    for raw_page in top_level {
        let node = Node::from_value(raw_page)?;
        if node.kind != NodeKind::Canvas {
            debug!(
                node_id = %node.id,
                node_type = node.kind.type_name(),
                "Skipping non-canvas child of document root"
            );
            continue;
        }

        let page_name = if node.name.is_empty() {
            "Page".to_string()
        } else {
            node.name.clone()
        };

        pages.push(Page {
            id: node.id.clone(),
            name: page_name.clone(),
        });

        walk_page(
            node.children,
            &page_name,
            max_depth,
            &mut layers,
            &mut text_nodes,
        )?;
    }

    let components = file
        .components
        .iter()
        .map(|(id, meta)| ComponentDescriptor {
            id: id.clone(),
            name: meta.name.clone(),
            description: meta.description.clone(),
            page: None,
            remote: meta.remote,
        })
        .collect::<Vec<_>>();

    let style_ids = file.styles.keys().cloned().collect::<Vec<_>>();

    let fingerprint = fingerprint(
        &file.name,
        &file.last_modified,
        layers.len(),
        components.len(),
    );

    Ok(ParsedStructure {
        file_name: file.name.clone(),
        last_modified: file.last_modified.clone(),
        fingerprint,
        pages,
        layers,
        text_nodes,
        components,
        style_ids,
    })
}

/// Pre-order traversal of one page's subtree. Children are pushed in
/// reverse so siblings pop left to right.
fn walk_page(
    roots: &[Value],
    page_name: &str,
    max_depth: usize,
    layers: &mut Vec<LayerDescriptor>,
    text_nodes: &mut Vec<TextDescriptor>,
) -> Result<()> {
    let mut stack: Vec<(&Value, usize)> = roots.iter().rev().map(|value| (value, 1)).collect();

    while let Some((raw, depth)) = stack.pop() {
        let node = Node::from_value(raw).map_err(|e| {
            ReportError::MalformedInput(format!("on page '{}': {}", page_name, e))
        })?;

        if depth > max_depth {
            return Err(ReportError::MalformedInput(format!(
                "node '{}' on page '{}' exceeds the maximum nesting depth of {}",
                node.id, page_name, max_depth
            )));
        }

        match &node.kind {
            kind if kind.is_layer() => {
                if node.id.is_empty() {
                    return Err(ReportError::MalformedInput(format!(
                        "{} node '{}' on page '{}' has no id",
                        kind.type_name(),
                        node.name,
                        page_name
                    )));
                }
                layers.push(LayerDescriptor {
                    id: node.id.clone(),
                    node_type: kind.type_name().to_string(),
                    name: node.name.clone(),
                    page: page_name.to_string(),
                    x: node.bounds.x,
                    y: node.bounds.y,
                    width: node.bounds.width,
                    height: node.bounds.height,
                    children_count: node.children.len(),
                    visible: node.visible,
                });
            }
            NodeKind::Text { characters, style } => {
                if node.id.is_empty() {
                    return Err(ReportError::MalformedInput(format!(
                        "TEXT node '{}' on page '{}' has no id",
                        node.name, page_name
                    )));
                }
                // Recorded even when blank; filtering is a renderer concern.
                text_nodes.push(TextDescriptor {
                    id: node.id.clone(),
                    page: page_name.to_string(),
                    name: node.name.clone(),
                    characters: characters.clone(),
                    style: style.clone(),
                    x: node.bounds.x,
                    y: node.bounds.y,
                    width: node.bounds.width,
                    height: node.bounds.height,
                });
            }
            _ => {}
        }

        for child in node.children.iter().rev() {
            stack.push((child, depth + 1));
        }
    }

    Ok(())
}

/// Deterministic short hash over the file identity and volume counts.
/// Used for filename uniqueness and change detection, nothing more.
pub fn fingerprint(
    file_name: &str,
    last_modified: &str,
    layer_count: usize,
    component_count: usize,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file_name.as_bytes());
    hasher.update(last_modified.as_bytes());
    hasher.update(layer_count.to_string().as_bytes());
    hasher.update(component_count.to_string().as_bytes());
    hex::encode(hasher.finalize())[..FINGERPRINT_LEN].to_string()
}

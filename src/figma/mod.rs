// figma-report-service/src/figma/mod.rs

mod client;
mod extract;
mod node;
mod url;

pub use client::FigmaClient;
pub use extract::{
    extract, ComponentDescriptor, ComponentMeta, FigmaFile, LayerDescriptor, Page,
    ParsedStructure, StyleMeta, TextDescriptor,
};
pub use node::{BoundingBox, Node, NodeKind, TextStyle};
pub use url::extract_file_key;

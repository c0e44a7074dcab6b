// figma-report-service/src/diagram.rs

use crate::error::{ReportError, Result};
use crate::figma::ParsedStructure;
use std::fmt::Write as _;
use tracing::debug;

const CANVAS_WIDTH: u32 = 1400;
const CANVAS_HEIGHT: u32 = 1000;
const MARGIN: f64 = 60.0;
const EDGE_COLOR: &str = "#2d3748";

/// Renders the architecture diagram embedded in every report: pages,
/// frames and components from the parsed structure laid out above the
/// suggested service tiers, with accent colors seeded from the structure
/// fingerprint so distinct file states get visibly distinct diagrams.
pub struct DiagramRenderer {
    fontdb: usvg::fontdb::Database,
}

impl Default for DiagramRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramRenderer {
    pub fn new() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();

        if fontdb.is_empty() {
            tracing::warn!("No system fonts found, diagram labels may not render");
        }

        Self { fontdb }
    }

    pub fn render_png(&self, structure: &ParsedStructure) -> Result<Vec<u8>> {
        let svg = build_svg(structure);
        debug!(
            file_name = %structure.file_name,
            svg_bytes = svg.len(),
            "Rasterizing architecture diagram"
        );
        self.svg_to_png(&svg)
    }

    fn svg_to_png(&self, svg: &str) -> Result<Vec<u8>> {
        let tree = {
            let mut opts = usvg::Options::default();
            opts.fontdb = std::sync::Arc::new(self.fontdb.clone());
            usvg::Tree::from_str(svg, &opts)
                .map_err(|e| ReportError::DiagramError(format!("SVG parsing failed: {}", e)))?
        };

        let size = tree.size();
        let width = size.width().ceil() as u32;
        let height = size.height().ceil() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            ReportError::DiagramError(format!("failed to create pixmap ({}x{})", width, height))
        })?;
        pixmap.fill(tiny_skia::Color::WHITE);

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| ReportError::DiagramError(format!("PNG encoding failed: {}", e)))
    }
}

fn build_svg(structure: &ParsedStructure) -> String {
    let fp = &structure.fingerprint;
    let page_fill = accent_color(fp, 0, "#E3F2FD");
    let frame_fill = accent_color(fp, 2, "#FFF3E0");
    let component_fill = accent_color(fp, 4, "#E8F5E8");

    let mut svg = String::with_capacity(8 * 1024);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = CANVAS_WIDTH,
        h = CANVAS_HEIGHT
    );
    svg.push_str(concat!(
        r#"<defs><marker id="arrow" markerWidth="10" markerHeight="8" refX="9" refY="4" orient="auto">"#,
        r##"<path d="M0,0 L10,4 L0,8 z" fill="#2d3748"/></marker></defs>"##,
    ));

    text_centered(
        &mut svg,
        CANVAS_WIDTH as f64 / 2.0,
        36.0,
        20,
        "bold",
        &format!("{} - System Architecture", structure.file_name),
    );

    // Page row
    let inner_width = CANVAS_WIDTH as f64 - 2.0 * MARGIN;
    let page_count = structure.pages.len().max(1);
    let page_width = inner_width / page_count as f64;
    for (i, page) in structure.pages.iter().enumerate() {
        let x = MARGIN + i as f64 * page_width;
        rounded_box(&mut svg, x, 70.0, page_width - 16.0, 56.0, &page_fill, 2.0);
        text_centered(
            &mut svg,
            x + (page_width - 16.0) / 2.0,
            102.0,
            13,
            "bold",
            &format!("Page: {}", page.name),
        );
    }

    // Frame grid, first six frames in document order
    let frames: Vec<_> = structure
        .layers
        .iter()
        .filter(|l| l.node_type == "FRAME")
        .take(6)
        .collect();
    if !frames.is_empty() {
        let per_row = frames.len().min(6);
        let frame_width = inner_width / per_row as f64;
        for (i, frame) in frames.iter().enumerate() {
            let x = MARGIN + (i % per_row) as f64 * frame_width;
            let y = 170.0 + (i / per_row) as f64 * 72.0;
            rounded_box(&mut svg, x, y, frame_width - 12.0, 48.0, &frame_fill, 1.0);
            text_centered(
                &mut svg,
                x + (frame_width - 12.0) / 2.0,
                y + 29.0,
                12,
                "normal",
                &truncate_label(&frame.name, 18),
            );
        }
    }

    // Component row
    let components: Vec<_> = structure.components.iter().take(6).collect();
    for (i, component) in components.iter().enumerate() {
        let slot = inner_width / components.len().max(1) as f64;
        let x = MARGIN + i as f64 * slot;
        rounded_box(&mut svg, x, 280.0, slot - 12.0, 44.0, &component_fill, 1.0);
        text_centered(
            &mut svg,
            x + (slot - 12.0) / 2.0,
            307.0,
            11,
            "normal",
            &truncate_label(&component.name, 20),
        );
    }

    // Suggested backend tiers, sized by what the structure needs
    let gateway_x = CANVAS_WIDTH as f64 / 2.0 - 140.0;
    rounded_box(&mut svg, gateway_x, 420.0, 280.0, 60.0, "#FCE4EC", 2.0);
    text_centered(
        &mut svg,
        CANVAS_WIDTH as f64 / 2.0,
        456.0,
        14,
        "bold",
        "API Gateway",
    );

    let services = suggest_services(structure);
    let service_slot = inner_width / services.len() as f64;
    for (i, service) in services.iter().enumerate() {
        let x = MARGIN + i as f64 * service_slot;
        rounded_box(&mut svg, x, 560.0, service_slot - 20.0, 52.0, "#F3E5F5", 1.0);
        text_centered(
            &mut svg,
            x + (service_slot - 20.0) / 2.0,
            591.0,
            12,
            "bold",
            service,
        );
        // Gateway fans out to every service
        arrow(
            &mut svg,
            CANVAS_WIDTH as f64 / 2.0,
            480.0,
            x + (service_slot - 20.0) / 2.0,
            560.0,
        );
    }

    rounded_box(&mut svg, MARGIN + 120.0, 700.0, 360.0, 60.0, "#E1F5FE", 2.0);
    text_centered(&mut svg, MARGIN + 300.0, 736.0, 13, "bold", "Primary Database");
    rounded_box(&mut svg, CANVAS_WIDTH as f64 - MARGIN - 480.0, 700.0, 360.0, 60.0, "#FFF8E1", 2.0);
    text_centered(
        &mut svg,
        CANVAS_WIDTH as f64 - MARGIN - 300.0,
        736.0,
        13,
        "bold",
        "Object Storage / Assets",
    );

    for (i, _) in services.iter().enumerate() {
        let x = MARGIN + i as f64 * service_slot + (service_slot - 20.0) / 2.0;
        let target_x = if i < services.len() / 2 {
            MARGIN + 300.0
        } else {
            CANVAS_WIDTH as f64 - MARGIN - 300.0
        };
        arrow(&mut svg, x, 612.0, target_x, 700.0);
    }

    // UI tiers feed the gateway
    arrow(&mut svg, CANVAS_WIDTH as f64 / 2.0, 126.0, CANVAS_WIDTH as f64 / 2.0, 170.0);
    arrow(&mut svg, CANVAS_WIDTH as f64 / 2.0, 324.0, CANVAS_WIDTH as f64 / 2.0, 420.0);

    text_centered(
        &mut svg,
        CANVAS_WIDTH as f64 / 2.0,
        840.0,
        12,
        "italic",
        &format!(
            "{} pages, {} layers, {} components - fingerprint {}",
            structure.pages.len(),
            structure.layers.len(),
            structure.components.len(),
            structure.fingerprint
        ),
    );

    svg.push_str("</svg>");
    svg
}

/// Backend services suggested from the design surface, mirroring the
/// narrative section of the report.
fn suggest_services(structure: &ParsedStructure) -> Vec<&'static str> {
    let mut services = vec!["Auth Service", "Content Service"];
    if !structure.components.is_empty() {
        services.push("Component Data Service");
    }
    if structure.layers.len() > 10 || structure.components.len() > 5 {
        services.push("Search Service");
    }
    services.push("File Export Service");
    services
}

/// Six hex digits lifted from the fingerprint, or the default when the
/// slice runs past the end.
fn accent_color(fingerprint: &str, start: usize, default: &str) -> String {
    match fingerprint.get(start..start + 6) {
        Some(slice) if slice.chars().all(|c| c.is_ascii_hexdigit()) => format!("#{}", slice),
        _ => default.to_string(),
    }
}

fn rounded_box(svg: &mut String, x: f64, y: f64, width: f64, height: f64, fill: &str, stroke: f64) {
    let _ = write!(
        svg,
        r#"<rect x="{x:.1}" y="{y:.1}" width="{width:.1}" height="{height:.1}" rx="8" fill="{fill}" fill-opacity="0.55" stroke="{edge}" stroke-width="{stroke}"/>"#,
        edge = EDGE_COLOR,
    );
}

fn text_centered(svg: &mut String, x: f64, y: f64, size: u32, weight: &str, content: &str) {
    let style = if weight == "italic" {
        r#" font-style="italic""#
    } else {
        ""
    };
    let weight = if weight == "bold" { "bold" } else { "normal" };
    let _ = write!(
        svg,
        r#"<text x="{x:.1}" y="{y:.1}" font-family="sans-serif" font-size="{size}" font-weight="{weight}"{style} fill="{edge}" text-anchor="middle">{text}</text>"#,
        edge = EDGE_COLOR,
        text = xml_escape(content),
    );
}

fn arrow(svg: &mut String, x1: f64, y1: f64, x2: f64, y2: f64) {
    let _ = write!(
        svg,
        r#"<line x1="{x1:.1}" y1="{y1:.1}" x2="{x2:.1}" y2="{y2:.1}" stroke="{edge}" stroke-width="1.5" marker-end="url(#arrow)"/>"#,
        edge = EDGE_COLOR,
    );
}

fn truncate_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        name.to_string()
    } else {
        let head: String = name.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

fn xml_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figma::{extract, FigmaFile};
    use serde_json::json;

    fn sample_structure() -> crate::figma::ParsedStructure {
        let file: FigmaFile = serde_json::from_value(json!({
            "name": "Shop <Beta> & Co",
            "lastModified": "2025-11-02T10:00:00Z",
            "document": {"children": [{
                "id": "0:1", "name": "Home", "type": "CANVAS",
                "children": [
                    {"id": "1:1", "name": "Landing", "type": "FRAME",
                     "absoluteBoundingBox": {"x": 0, "y": 0, "width": 375, "height": 812}},
                    {"id": "1:2", "name": "Checkout", "type": "FRAME"}
                ]
            }]},
            "components": {"c1": {"name": "Button", "remote": false}},
            "styles": {}
        }))
        .unwrap();
        extract(&file, 512).unwrap()
    }

    #[test]
    fn svg_escapes_file_names() {
        let svg = build_svg(&sample_structure());
        assert!(svg.contains("Shop &lt;Beta&gt; &amp; Co"));
        assert!(!svg.contains("<Beta>"));
    }

    #[test]
    fn svg_lays_out_pages_frames_and_components() {
        let svg = build_svg(&sample_structure());
        assert!(svg.contains("Page: Home"));
        assert!(svg.contains("Landing"));
        assert!(svg.contains("Checkout"));
        assert!(svg.contains("Button"));
        assert!(svg.contains("API Gateway"));
    }

    #[test]
    fn svg_is_deterministic_for_the_same_structure() {
        let structure = sample_structure();
        assert_eq!(build_svg(&structure), build_svg(&structure));
    }

    #[test]
    fn renders_png_with_magic_bytes() {
        let renderer = DiagramRenderer::new();
        let png = renderer.render_png(&sample_structure()).unwrap();
        assert!(png.len() > 8);
        assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn accent_color_falls_back_past_fingerprint_end() {
        assert_eq!(accent_color("a1b2c3d4e5", 0, "#ffffff"), "#a1b2c3");
        assert_eq!(accent_color("a1b2c3d4e5", 4, "#ffffff"), "#c3d4e5");
        assert_eq!(accent_color("a1b2c3d4e5", 6, "#ffffff"), "#ffffff");
        assert_eq!(accent_color("", 0, "#eeeeee"), "#eeeeee");
    }

    #[test]
    fn label_truncation_keeps_short_names() {
        assert_eq!(truncate_label("Login", 18), "Login");
        assert_eq!(
            truncate_label("A very long frame name indeed", 10),
            "A very lon..."
        );
    }
}

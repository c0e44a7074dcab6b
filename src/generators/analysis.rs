// figma-report-service/src/generators/analysis.rs

use crate::figma::ParsedStructure;
use serde_json::{json, Value};

const TEXT_DISPLAY_LIMIT: usize = 800;

/// Derived fields shared by both report templates: per-page rollups,
/// complexity heuristics, the user-flow line and display-trimmed copy.
/// Everything here is computed from the structure so templates stay free
/// of logic.
pub(crate) fn build_analysis(structure: &ParsedStructure) -> Value {
    let frames: Vec<&crate::figma::LayerDescriptor> = structure
        .layers
        .iter()
        .filter(|l| l.node_type == "FRAME")
        .collect();

    let pages: Vec<Value> = structure
        .pages
        .iter()
        .map(|page| {
            let frame_count = frames.iter().filter(|f| f.page == page.name).count();
            json!({
                "id": page.id,
                "name": page.name,
                "frame_count": frame_count,
                "frames": frames
                    .iter()
                    .filter(|f| f.page == page.name)
                    .map(|f| json!({
                        "name": f.name,
                        "width": f.width,
                        "height": f.height,
                        "children_count": f.children_count,
                    }))
                    .collect::<Vec<_>>(),
            })
        })
        .collect();

    let texts: Vec<Value> = structure
        .text_nodes
        .iter()
        .map(|t| {
            json!({
                "name": if t.name.is_empty() { t.id.clone() } else { t.name.clone() },
                "page": t.page,
                "display": display_text(&t.characters),
                "font_family": t.style.font_family,
                "font_size": t.style.font_size,
                "font_weight": t.style.font_weight,
            })
        })
        .collect();

    let complexity = complexity_score(frames.len(), structure.components.len());
    let (tech_stack, deployment) = recommend_stack(complexity);

    json!({
        "page_count": structure.pages.len(),
        "layer_count": structure.layers.len(),
        "frame_count": frames.len(),
        "component_count": structure.components.len(),
        "text_count": structure.text_nodes.len(),
        "style_count": structure.style_ids.len(),
        "has_frames": !frames.is_empty(),
        "has_components": !structure.components.is_empty(),
        "has_texts": !structure.text_nodes.is_empty(),
        "pages": pages,
        "frames": frames
            .iter()
            .map(|f| json!({
                "name": f.name,
                "page": f.page,
                "width": f.width,
                "height": f.height,
                "children_count": f.children_count,
                "visible": f.visible,
            }))
            .collect::<Vec<_>>(),
        "texts": texts,
        "complexity_score": complexity,
        "tech_stack": tech_stack,
        "deployment": deployment,
        "architecture_recommendation": architecture_recommendation(
            structure.components.len(),
            structure.pages.len(),
        ),
        "flow_line": flow_line(&frames),
    })
}

/// Frames weigh one, components two: reusable elements imply more backing
/// state than one-off screens.
fn complexity_score(frame_count: usize, component_count: usize) -> usize {
    frame_count + component_count * 2
}

fn recommend_stack(complexity: usize) -> (&'static str, &'static str) {
    if complexity > 20 {
        (
            "Enterprise-scale: React/Vue.js + Node.js/Rust + PostgreSQL + Redis + Kubernetes",
            "Microservices with container orchestration, API gateway and distributed caching",
        )
    } else if complexity > 10 {
        (
            "Medium-scale: React + Axum/Express + PostgreSQL + Docker",
            "Modular monolith with service separation and horizontal scaling capability",
        )
    } else {
        (
            "Simple-scale: React + Axum/FastAPI + SQLite/PostgreSQL + single-node deploy",
            "Single service deployment with CDN and basic scaling",
        )
    }
}

fn architecture_recommendation(component_count: usize, page_count: usize) -> &'static str {
    if component_count > 20 || page_count > 8 {
        "Use microservices for scalability due to the large UI surface."
    } else {
        "A monolithic backend with modular services is sufficient for this surface."
    }
}

/// Screen-order journey built from the first five frames.
fn flow_line(frames: &[&crate::figma::LayerDescriptor]) -> String {
    if frames.is_empty() {
        return "No frames detected in this file.".to_string();
    }
    let mut line = frames
        .iter()
        .take(5)
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(" → ");
    if frames.len() > 5 {
        line.push_str(&format!(" → ... and {} more screens", frames.len() - 5));
    }
    line
}

fn display_text(characters: &str) -> String {
    let trimmed = characters.trim();
    if trimmed.chars().count() > TEXT_DISPLAY_LIMIT {
        let head: String = trimmed.chars().take(TEXT_DISPLAY_LIMIT).collect();
        format!("{} ... (truncated)", head)
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figma::{extract, FigmaFile};
    use serde_json::json as j;

    fn structure_with(frames: usize, components: usize) -> ParsedStructure {
        let children: Vec<Value> = (0..frames)
            .map(|i| {
                j!({
                    "id": format!("f{}", i),
                    "name": format!("Screen {}", i),
                    "type": "FRAME",
                    "absoluteBoundingBox": {"x": 0, "y": 0, "width": 375, "height": 812}
                })
            })
            .collect();
        let component_map: serde_json::Map<String, Value> = (0..components)
            .map(|i| (format!("c{}", i), j!({"name": format!("Comp {}", i)})))
            .collect();

        let file: FigmaFile = serde_json::from_value(j!({
            "name": "App",
            "lastModified": "now",
            "document": {"children": [{"id": "0:1", "name": "Main", "type": "CANVAS", "children": children}]},
            "components": component_map,
            "styles": {}
        }))
        .unwrap();
        extract(&file, 512).unwrap()
    }

    #[test]
    fn complexity_thresholds_pick_the_stack() {
        let small = build_analysis(&structure_with(2, 1));
        assert!(small["tech_stack"].as_str().unwrap().starts_with("Simple-scale"));

        let medium = build_analysis(&structure_with(9, 1));
        assert!(medium["tech_stack"].as_str().unwrap().starts_with("Medium-scale"));

        let large = build_analysis(&structure_with(15, 4));
        assert!(large["tech_stack"].as_str().unwrap().starts_with("Enterprise-scale"));
    }

    #[test]
    fn flow_line_truncates_after_five_screens() {
        let analysis = build_analysis(&structure_with(7, 0));
        let flow = analysis["flow_line"].as_str().unwrap();
        assert!(flow.starts_with("Screen 0 → Screen 1"));
        assert!(flow.ends_with("... and 2 more screens"));
    }

    #[test]
    fn per_page_rollup_counts_frames() {
        let analysis = build_analysis(&structure_with(3, 0));
        assert_eq!(analysis["pages"][0]["frame_count"], 3);
        assert_eq!(analysis["page_count"], 1);
        assert_eq!(analysis["frame_count"], 3);
        assert_eq!(analysis["has_components"], false);
    }

    #[test]
    fn long_copy_is_truncated_for_display() {
        let long = "x".repeat(900);
        let display = display_text(&long);
        assert!(display.ends_with("... (truncated)"));
        assert!(display.chars().count() < 900);
        assert_eq!(display_text("  short  "), "short");
    }
}

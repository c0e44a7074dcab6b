// figma-report-service/src/generators/developer_handoff.rs

use crate::error::Result;
use crate::figma::ParsedStructure;
use crate::generators::{build_analysis, Generator};
use crate::models::ReportMetadata;
use async_trait::async_trait;
use handlebars::Handlebars;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

const TEMPLATE: &str = "developer_handoff";

/// Developer-facing report: copy inventory with font metadata, suggested
/// system architecture and the handoff checklist.
pub struct DeveloperHandoffGenerator {
    handlebars: Arc<RwLock<Handlebars<'static>>>,
    template_dir: String,
}

impl DeveloperHandoffGenerator {
    pub fn new(template_dir: &str) -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);

        Self {
            handlebars: Arc::new(RwLock::new(handlebars)),
            template_dir: template_dir.to_string(),
        }
    }

    async fn load_template(&self) -> Result<()> {
        let template_path = format!("{}/{}.md.hbs", self.template_dir, TEMPLATE);
        let mut hb = self.handlebars.write().await;

        match hb.register_template_file(TEMPLATE, &template_path) {
            Ok(_) => Ok(()),
            Err(e) => Err(crate::error::ReportError::TemplateError(e)),
        }
    }
}

#[async_trait]
impl Generator for DeveloperHandoffGenerator {
    async fn generate(
        &self,
        structure: &ParsedStructure,
        metadata: &ReportMetadata,
        diagram_file: Option<&str>,
    ) -> Result<String> {
        info!(
            file_name = %structure.file_name,
            "Generating developer handoff report"
        );

        self.load_template().await?;

        let context = serde_json::json!({
            "metadata": metadata,
            "structure": structure,
            "analysis": build_analysis(structure),
            "diagram_file": diagram_file,
        });

        let hb = self.handlebars.read().await;
        let rendered = hb.render(TEMPLATE, &context)?;

        info!(
            file_name = %structure.file_name,
            size_bytes = rendered.len(),
            "Developer handoff report generated"
        );

        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figma::{extract, FigmaFile};
    use crate::generators::create_generator;
    use crate::models::ReportKind;
    use chrono::Utc;
    use serde_json::json;

    fn sample_structure() -> ParsedStructure {
        let file: FigmaFile = serde_json::from_value(json!({
            "name": "Demo App",
            "lastModified": "2025-11-02T10:00:00Z",
            "document": {"children": [{
                "id": "0:1", "name": "Home", "type": "CANVAS",
                "children": [
                    {"id": "1:1", "name": "Login", "type": "FRAME",
                     "absoluteBoundingBox": {"x": 0, "y": 0, "width": 375, "height": 812},
                     "children": [
                        {"id": "1:2", "name": "Welcome", "type": "TEXT", "characters": "Sign in",
                         "style": {"fontFamily": "Inter", "fontSize": 24.0}}
                     ]}
                ]
            }]},
            "components": {"c1": {"name": "Button/Primary", "description": "CTA"}},
            "styles": {}
        }))
        .unwrap();
        extract(&file, 512).unwrap()
    }

    fn metadata_for(structure: &ParsedStructure) -> ReportMetadata {
        ReportMetadata {
            title: format!("Design Analysis: {}", structure.file_name),
            file_name: structure.file_name.clone(),
            last_modified: structure.last_modified.clone(),
            fingerprint: structure.fingerprint.clone(),
            generated_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn handoff_report_renders_structure_fields() {
        let structure = sample_structure();
        let metadata = metadata_for(&structure);

        let generator = create_generator(ReportKind::DeveloperHandoff, "./templates");
        let markdown = generator
            .generate(&structure, &metadata, None)
            .await
            .unwrap();

        assert!(markdown.contains("Demo App"));
        assert!(markdown.contains("Login"));
        assert!(markdown.contains("Sign in"));
        assert!(markdown.contains("Button/Primary"));
    }

    #[tokio::test]
    async fn design_report_embeds_diagram_when_present() {
        let structure = sample_structure();
        let metadata = metadata_for(&structure);

        let generator = create_generator(ReportKind::DesignAnalysis, "./templates");
        let markdown = generator
            .generate(&structure, &metadata, Some("diagram_abc.png"))
            .await
            .unwrap();

        assert!(markdown.contains("diagram_abc.png"));
        assert!(markdown.contains(&structure.fingerprint));
    }
}

// figma-report-service/src/generators/design_analysis.rs

use crate::error::Result;
use crate::figma::ParsedStructure;
use crate::generators::{build_analysis, Generator};
use crate::models::ReportMetadata;
use async_trait::async_trait;
use handlebars::Handlebars;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

const TEMPLATE: &str = "design_analysis";

/// Design-facing report: screen and component inventory, complexity
/// heuristics and the embedded architecture diagram.
pub struct DesignAnalysisGenerator {
    handlebars: Arc<RwLock<Handlebars<'static>>>,
    template_dir: String,
}

impl DesignAnalysisGenerator {
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
impl Generator for DesignAnalysisGenerator {
    async fn generate(
        &self,
        structure: &ParsedStructure,
        metadata: &ReportMetadata,
        diagram_file: Option<&str>,
    ) -> Result<String> {
        info!(
            file_name = %structure.file_name,
            "Generating design analysis report"
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
            "Design analysis report generated"
        );

        Ok(rendered)
    }
}

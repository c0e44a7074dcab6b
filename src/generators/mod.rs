// figma-report-service/src/generators/mod.rs

mod analysis;
mod design_analysis;
mod developer_handoff;

use crate::error::Result;
use crate::figma::ParsedStructure;
use crate::models::{ReportKind, ReportMetadata};
use async_trait::async_trait;

pub use design_analysis::DesignAnalysisGenerator;
pub use developer_handoff::DeveloperHandoffGenerator;

pub(crate) use analysis::build_analysis;

#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce the markdown report body for one parsed structure.
    /// `diagram_file` is the stored diagram image filename, when one was
    /// rendered, for embedding relative to the artifact directory.
    async fn generate(
        &self,
        structure: &ParsedStructure,
        metadata: &ReportMetadata,
        diagram_file: Option<&str>,
    ) -> Result<String>;
}

pub fn create_generator(kind: ReportKind, template_dir: &str) -> Box<dyn Generator> {
    match kind {
        ReportKind::DesignAnalysis => Box::new(DesignAnalysisGenerator::new(template_dir)),
        ReportKind::DeveloperHandoff => Box::new(DeveloperHandoffGenerator::new(template_dir)),
    }
}

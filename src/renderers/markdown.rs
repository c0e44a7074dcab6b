// figma-report-service/src/renderers/markdown.rs

use crate::error::Result;
use crate::models::ReportMetadata;
use tracing::info;

pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    pub async fn render(
        &self,
        markdown_content: &str,
        metadata: &ReportMetadata,
    ) -> Result<Vec<u8>> {
        info!(title = %metadata.title, "Rendering Markdown report");

        // Add front matter to markdown
        let front_matter = format!(
            "---\ntitle: {}\nsource_file: {}\nlast_modified: {}\nfingerprint: {}\ndate: {}\n---\n\n",
            metadata.title,
            metadata.file_name,
            metadata.last_modified,
            metadata.fingerprint,
            metadata.generated_date.format("%Y-%m-%d")
        );

        let full_content = format!("{}{}", front_matter, markdown_content);

        info!(
            title = %metadata.title,
            size_kb = full_content.len() / 1024,
            "Markdown generated successfully"
        );

        Ok(full_content.into_bytes())
    }
}

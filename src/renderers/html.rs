// figma-report-service/src/renderers/html.rs

use crate::error::Result;
use crate::models::ReportMetadata;
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::{debug, info};

/// Markdown to standalone HTML via Pandoc. `--embed-resources` inlines the
/// diagram image so the file downloads as a single document.
pub struct HtmlRenderer {
    resource_dir: PathBuf,
}

impl HtmlRenderer {
    pub fn new(resource_dir: impl Into<PathBuf>) -> Self {
        Self {
            resource_dir: resource_dir.into(),
        }
    }

    pub async fn render(
        &self,
        markdown_content: &str,
        metadata: &ReportMetadata,
    ) -> Result<Vec<u8>> {
        info!(title = %metadata.title, "Rendering HTML report");

        // Create temporary files
        let mut md_file = NamedTempFile::new()?;
        let html_file = NamedTempFile::new()?;

        // Write markdown to temp file
        use std::io::Write;
        md_file.write_all(markdown_content.as_bytes())?;
        md_file.flush()?;

        debug!("Markdown written to: {:?}", md_file.path());

        // Build Pandoc command for HTML
        let mut cmd = Command::new("pandoc");
        cmd.arg(md_file.path())
            .arg("-o")
            .arg(html_file.path())
            .arg("--from=markdown+yaml_metadata_block")
            .arg("--to=html5")
            .arg("--standalone")
            .arg("--toc")
            .arg("--toc-depth=2")
            .arg("--embed-resources")
            .arg(format!("--resource-path={}", self.resource_dir.display()))
            .arg("-V")
            .arg(format!("title={}", metadata.title))
            .arg("-V")
            .arg(format!("date={}", metadata.generated_date.format("%B %d, %Y")));

        debug!("Running Pandoc: {:?}", cmd);

        let output = cmd.output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(crate::error::ReportError::PandocError(stderr.to_string()));
        }

        // Read HTML bytes
        let html_bytes = fs::read(html_file.path()).await?;

        info!(
            title = %metadata.title,
            size_kb = html_bytes.len() / 1024,
            "HTML generated successfully"
        );

        Ok(html_bytes)
    }
}

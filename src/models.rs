// figma-report-service/src/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Markdown,
    Html,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Markdown => "md",
            ReportFormat::Html => "html",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Markdown => "text/markdown; charset=utf-8",
            ReportFormat::Html => "text/html; charset=utf-8",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Design-facing analysis: screens, components, complexity heuristics.
    DesignAnalysis,
    /// Developer-facing handoff: copy inventory, architecture, checklist.
    DeveloperHandoff,
}

impl Default for ReportKind {
    fn default() -> Self {
        ReportKind::DesignAnalysis
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    pub figma_url: String,
    #[serde(default)]
    pub kind: ReportKind,
    #[serde(default = "default_formats")]
    pub formats: Vec<ReportFormat>,
}

fn default_formats() -> Vec<ReportFormat> {
    vec![ReportFormat::Pdf]
}

/// Document-level fields handed to generators and renderers.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub title: String,
    pub file_name: String,
    pub last_modified: String,
    pub fingerprint: String,
    pub generated_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredArtifact {
    pub format: ReportFormat,
    pub filename: String,
    pub download_url: String,
    pub mime_type: String,
    pub size_bytes: usize,
    pub sha256_checksum: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructureSummary {
    pub pages: usize,
    pub layers: usize,
    pub text_nodes: usize,
    pub components: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub request_id: String,
    pub status: String,
    pub file_name: String,
    pub fingerprint: String,
    pub summary: StructureSummary,
    pub artifacts: Vec<StoredArtifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl ReportResponse {
    pub fn success(
        request_id: String,
        file_name: String,
        fingerprint: String,
        summary: StructureSummary,
        artifacts: Vec<StoredArtifact>,
    ) -> Self {
        Self {
            request_id,
            status: "success".to_string(),
            file_name,
            fingerprint,
            summary,
            artifacts,
            error: None,
            generated_at: Utc::now(),
        }
    }

    pub fn error(request_id: String, error: String) -> Self {
        Self {
            request_id,
            status: "error".to_string(),
            file_name: String::new(),
            fingerprint: String::new(),
            summary: StructureSummary {
                pages: 0,
                layers: 0,
                text_nodes: 0,
                components: 0,
            },
            artifacts: vec![],
            error: Some(error),
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_to_pdf_design_analysis() {
        let req: ReportRequest =
            serde_json::from_str(r#"{"figma_url": "https://www.figma.com/file/abc/My-App"}"#)
                .unwrap();
        assert_eq!(req.kind, ReportKind::DesignAnalysis);
        assert_eq!(req.formats, vec![ReportFormat::Pdf]);
    }

    #[test]
    fn format_names_round_trip() {
        let formats: Vec<ReportFormat> =
            serde_json::from_str(r#"["pdf", "markdown", "html"]"#).unwrap();
        assert_eq!(
            formats,
            vec![ReportFormat::Pdf, ReportFormat::Markdown, ReportFormat::Html]
        );
        assert_eq!(ReportFormat::Pdf.extension(), "pdf");
        assert_eq!(ReportFormat::Html.mime_type(), "text/html; charset=utf-8");
    }
}

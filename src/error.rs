// figma-report-service/src/error.rs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid Figma reference: {0}")]
    InvalidReference(String),

    #[error("Malformed Figma document: {0}")]
    MalformedInput(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Template error: {0}")]
    TemplateError(#[from] handlebars::TemplateError),

    #[error("Rendering error: {0}")]
    RenderError(#[from] handlebars::RenderError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Pandoc error: {0}")]
    PandocError(String),

    #[error("Diagram error: {0}")]
    DiagramError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

impl ReportError {
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            error_type: match self {
                ReportError::InvalidReference(_) => "invalid_reference",
                ReportError::MalformedInput(_) => "malformed_input",
                ReportError::UpstreamUnavailable(_) => "upstream_unavailable",
                ReportError::TemplateError(_) => "template_error",
                ReportError::RenderError(_) => "render_error",
                ReportError::IoError(_) => "io_error",
                ReportError::HttpError(_) => "http_error",
                ReportError::PandocError(_) => "pandoc_error",
                ReportError::DiagramError(_) => "diagram_error",
                ReportError::SerializationError(_) => "serialization_error",
                ReportError::UnsupportedFormat(_) => "unsupported_format",
                ReportError::ArtifactNotFound(_) => "artifact_not_found",
                ReportError::GenerationFailed(_) => "generation_failed",
            }
            .to_string(),
        }
    }

    /// HTTP status for the server layer. Caller errors map to 4xx so the
    /// frontend can distinguish a bad link from a generation failure.
    pub fn status_code(&self) -> u16 {
        match self {
            ReportError::InvalidReference(_) => 400,
            ReportError::MalformedInput(_) => 422,
            ReportError::ArtifactNotFound(_) => 404,
            ReportError::UpstreamUnavailable(_) | ReportError::HttpError(_) => 502,
            _ => 500,
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_types_are_snake_case() {
        let err = ReportError::InvalidReference("nope".to_string());
        assert_eq!(err.to_error_response().error_type, "invalid_reference");

        let err = ReportError::MalformedInput("document is null".to_string());
        assert_eq!(err.to_error_response().error_type, "malformed_input");
    }

    #[test]
    fn caller_errors_map_to_4xx() {
        assert_eq!(ReportError::InvalidReference(String::new()).status_code(), 400);
        assert_eq!(ReportError::MalformedInput(String::new()).status_code(), 422);
        assert_eq!(ReportError::ArtifactNotFound(String::new()).status_code(), 404);
        assert_eq!(ReportError::UpstreamUnavailable(String::new()).status_code(), 502);
        assert_eq!(ReportError::PandocError(String::new()).status_code(), 500);
    }
}

// figma-report-service/src/pipeline.rs

use crate::config::Config;
use crate::diagram::DiagramRenderer;
use crate::error::{ReportError, Result};
use crate::figma::{extract, extract_file_key, FigmaClient, FigmaFile, ParsedStructure};
use crate::generators::create_generator;
use crate::llm::LlmSynthesizer;
use crate::models::{
    ReportFormat, ReportMetadata, ReportRequest, ReportResponse, StructureSummary,
};
use crate::renderers::{HtmlRenderer, MarkdownRenderer, PdfRenderer};
use crate::storage::ArtifactStore;
use chrono::Utc;
use futures::future::join_all;
use tracing::{info, instrument, warn};

/// Orchestrates: resolve key → fetch (or synthesize) → extract → diagram →
/// generate → render → store. Holds every network client the service
/// needs; nothing here is global, everything is built once at startup
/// from the config.
pub struct ReportPipeline {
    figma: Option<FigmaClient>,
    llm: LlmSynthesizer,
    diagram: DiagramRenderer,
    store: ArtifactStore,
    pdf_renderer: PdfRenderer,
    markdown_renderer: MarkdownRenderer,
    html_renderer: HtmlRenderer,
    template_dir: String,
    max_depth: usize,
}

impl ReportPipeline {
    pub fn new(config: &Config, store: ArtifactStore) -> Result<Self> {
        let figma = match config.figma.token.as_deref() {
            Some(token) if !token.is_empty() => {
                Some(FigmaClient::new(&config.figma, token.to_string())?)
            }
            _ => None,
        };

        let llm = LlmSynthesizer::new(&config.llm)?;
        if figma.is_none() && !llm.is_configured() {
            warn!("Neither a Figma token nor an LLM key is configured; generation will fail");
        }

        Ok(Self {
            figma,
            llm,
            diagram: DiagramRenderer::new(),
            pdf_renderer: PdfRenderer::new(store.dir()),
            html_renderer: HtmlRenderer::new(store.dir()),
            markdown_renderer: MarkdownRenderer::new(),
            store,
            template_dir: config.templates.path.clone(),
            max_depth: config.extractor.max_depth,
        })
    }

    /// Main entry point called from the HTTP handlers.
    #[instrument(skip(self, request), fields(
        request_id = %request_id,
        figma_url = %request.figma_url,
        kind = ?request.kind
    ))]
    pub async fn process(&self, request_id: &str, request: &ReportRequest) -> Result<ReportResponse> {
        let file_key = extract_file_key(&request.figma_url)?;
        let file = self.fetch_payload(&request.figma_url, &file_key).await?;
        let structure = extract(&file, self.max_depth)?;

        info!(
            file_name = %structure.file_name,
            pages = structure.pages.len(),
            layers = structure.layers.len(),
            text_nodes = structure.text_nodes.len(),
            components = structure.components.len(),
            fingerprint = %structure.fingerprint,
            "Extracted design structure"
        );

        let metadata = report_metadata(request, &structure);

        // The report still renders without its diagram; a rasterizer
        // failure is not worth failing the whole request.
        let diagram_file = match self.diagram.render_png(&structure) {
            Ok(png) => {
                match self
                    .store
                    .store_diagram(&structure.file_name, &structure.fingerprint, &png)
                    .await
                {
                    Ok(filename) => Some(filename),
                    Err(e) => {
                        warn!(error = %e, "Failed to store diagram image, continuing without it");
                        None
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Diagram rendering failed, continuing without it");
                None
            }
        };

        let generator = create_generator(request.kind, &self.template_dir);
        let markdown = generator
            .generate(&structure, &metadata, diagram_file.as_deref())
            .await?;

        // Render all requested formats concurrently; a single failing
        // format does not sink the others.
        let rendered = join_all(request.formats.iter().map(|format| {
            let markdown = markdown.as_str();
            let metadata = &metadata;
            async move { (*format, self.render_format(*format, markdown, metadata).await) }
        }))
        .await;

        let mut artifacts = Vec::new();
        for (format, result) in rendered {
            match result {
                Ok(bytes) => {
                    let artifact = self
                        .store
                        .store_report(&structure.file_name, &structure.fingerprint, format, &bytes)
                        .await?;
                    artifacts.push(artifact);
                }
                Err(e) => {
                    warn!(format = ?format, error = %e, "Failed to render format, continuing");
                }
            }
        }

        if artifacts.is_empty() {
            return Err(ReportError::GenerationFailed(
                "no requested format could be rendered".to_string(),
            ));
        }

        info!(
            request_id = %request_id,
            artifact_count = artifacts.len(),
            "Report generation completed"
        );

        Ok(ReportResponse::success(
            request_id.to_string(),
            structure.file_name.clone(),
            structure.fingerprint.clone(),
            StructureSummary {
                pages: structure.pages.len(),
                layers: structure.layers.len(),
                text_nodes: structure.text_nodes.len(),
                components: structure.components.len(),
            },
            artifacts,
        ))
    }

    /// Standalone diagram generation for the `/api/diagram` endpoint.
    pub async fn diagram_png(&self, figma_url: &str) -> Result<Vec<u8>> {
        let file_key = extract_file_key(figma_url)?;
        let file = self.fetch_payload(figma_url, &file_key).await?;
        let structure = extract(&file, self.max_depth)?;
        self.diagram.render_png(&structure)
    }

    /// Every call fetches fresh: documents change between requests, so no
    /// memoization keyed on the file identifier. The LLM path is taken
    /// only when no token is configured; API failures propagate instead
    /// of being masked by synthesis.
    async fn fetch_payload(&self, figma_url: &str, file_key: &str) -> Result<FigmaFile> {
        match &self.figma {
            Some(client) => client.fetch_file(file_key).await,
            None => {
                info!(
                    file_key = %file_key,
                    "No Figma token configured, synthesizing structure via LLM"
                );
                self.llm.synthesize(figma_url).await
            }
        }
    }

    async fn render_format(
        &self,
        format: ReportFormat,
        markdown: &str,
        metadata: &ReportMetadata,
    ) -> Result<Vec<u8>> {
        match format {
            ReportFormat::Pdf => self.pdf_renderer.render(markdown, metadata).await,
            ReportFormat::Html => self.html_renderer.render(markdown, metadata).await,
            ReportFormat::Markdown => self.markdown_renderer.render(markdown, metadata).await,
        }
    }
}

fn report_metadata(request: &ReportRequest, structure: &ParsedStructure) -> ReportMetadata {
    let title = match request.kind {
        crate::models::ReportKind::DesignAnalysis => {
            format!("Design Analysis: {}", structure.file_name)
        }
        crate::models::ReportKind::DeveloperHandoff => {
            format!("Developer Handoff: {}", structure.file_name)
        }
    };

    ReportMetadata {
        title,
        file_name: structure.file_name.clone(),
        last_modified: structure.last_modified.clone(),
        fingerprint: structure.fingerprint.clone(),
        generated_date: Utc::now(),
    }
}

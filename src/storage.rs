// figma-report-service/src/storage.rs

use crate::error::{ReportError, Result};
use crate::models::{ReportFormat, StoredArtifact};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Local artifact store. Rendered reports and diagram images land in one
/// output directory and are served back by the download endpoint; nothing
/// is tracked beyond the files themselves.
#[derive(Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Build the artifact filename: `{name}_{fingerprint}_{timestamp}.{ext}`.
    /// The fingerprint keys the file state, the timestamp keeps repeated
    /// runs of an unchanged file from clobbering each other.
    pub fn artifact_filename(file_name: &str, fingerprint: &str, extension: &str) -> String {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        format!(
            "{}_{}_{}.{}",
            sanitize(file_name),
            fingerprint,
            timestamp,
            extension
        )
    }

    /// Write a rendered report and return its download metadata, checksum
    /// included.
    #[instrument(skip(self, data), fields(dir = %self.dir.display(), format = ?format))]
    pub async fn store_report(
        &self,
        file_name: &str,
        fingerprint: &str,
        format: ReportFormat,
        data: &[u8],
    ) -> Result<StoredArtifact> {
        let filename = Self::artifact_filename(file_name, fingerprint, format.extension());
        let sha256_checksum = checksum(data);

        fs::write(self.dir.join(&filename), data).await?;

        info!(
            filename = %filename,
            size_bytes = data.len(),
            sha256 = %sha256_checksum,
            "Stored report artifact"
        );

        Ok(StoredArtifact {
            format,
            download_url: format!("/api/download/{}", filename),
            filename,
            mime_type: format.mime_type().to_string(),
            size_bytes: data.len(),
            sha256_checksum,
        })
    }

    /// Write the diagram image referenced from the report body. Returns
    /// the bare filename for embedding, relative to the store directory.
    pub async fn store_diagram(
        &self,
        file_name: &str,
        fingerprint: &str,
        png: &[u8],
    ) -> Result<String> {
        let filename = Self::artifact_filename(file_name, fingerprint, "png");
        fs::write(self.dir.join(&filename), png).await?;
        info!(filename = %filename, size_bytes = png.len(), "Stored diagram image");
        Ok(filename)
    }

    /// Resolve a download request to a path inside the store. Rejects
    /// anything that is not a plain filename.
    pub async fn resolve(&self, filename: &str) -> Result<PathBuf> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return Err(ReportError::ArtifactNotFound(filename.to_string()));
        }

        let path = self.dir.join(filename);
        if fs::try_exists(&path).await? {
            Ok(path)
        } else {
            Err(ReportError::ArtifactNotFound(filename.to_string()))
        }
    }
}

fn checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Keep alphanumerics, dashes, underscores and dots; everything else
/// becomes an underscore so filenames stay shell- and URL-safe.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "figma".to_string()
    } else {
        cleaned
    }
}

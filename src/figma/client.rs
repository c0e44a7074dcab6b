// figma-report-service/src/figma/client.rs

use crate::config::FigmaConfig;
use crate::error::{ReportError, Result};
use crate::figma::extract::FigmaFile;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{info, warn};

/// Figma REST API client. Fetches the full file payload for a file key,
/// fresh on every call; there is deliberately no cache in front of this.
pub struct FigmaClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
    max_retries: u32,
}

impl FigmaClient {
    pub fn new(config: &FigmaConfig, token: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token,
            max_retries: config.max_retries,
        })
    }

    /// GET `/files/{key}`, retrying rate-limited responses with exponential
    /// backoff seeded from the `Retry-After` header.
    pub async fn fetch_file(&self, file_key: &str) -> Result<FigmaFile> {
        let url = format!("{}/files/{}", self.api_base, file_key);

        for attempt in 0..=self.max_retries {
            let response = self
                .http
                .get(&url)
                .header("X-Figma-Token", &self.token)
                .send()
                .await?;

            match response.status() {
                StatusCode::OK => {
                    let payload: serde_json::Value = response.json().await?;
                    let file: FigmaFile = serde_json::from_value(payload).map_err(|e| {
                        ReportError::MalformedInput(format!(
                            "Figma payload for '{}' does not match the file schema: {}",
                            file_key, e
                        ))
                    })?;
                    info!(file_key = %file_key, file_name = %file.name, "Fetched Figma file");
                    return Ok(file);
                }
                StatusCode::TOO_MANY_REQUESTS if attempt < self.max_retries => {
                    let retry_after = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(1);
                    let wait = Duration::from_secs(retry_after * 2u64.pow(attempt));
                    warn!(
                        file_key = %file_key,
                        attempt = attempt + 1,
                        wait_secs = wait.as_secs(),
                        "Figma API rate limited, backing off"
                    );
                    tokio::time::sleep(wait).await;
                }
                StatusCode::FORBIDDEN => {
                    return Err(ReportError::UpstreamUnavailable(format!(
                        "Figma returned 403 for '{}' - private file, check the configured token",
                        file_key
                    )));
                }
                status => {
                    return Err(ReportError::UpstreamUnavailable(format!(
                        "Figma API returned {} for '{}'",
                        status, file_key
                    )));
                }
            }
        }

        Err(ReportError::UpstreamUnavailable(format!(
            "Figma API rate limited '{}' after {} retries",
            file_key, self.max_retries
        )))
    }
}

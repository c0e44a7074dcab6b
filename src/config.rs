// figma-report-service/src/config.rs

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub server: ServerConfig,
    pub figma: FigmaConfig,
    pub llm: LlmConfig,
    pub extractor: ExtractorConfig,
    pub output: OutputConfig,
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FigmaConfig {
    pub api_base: String,
    /// Personal access token. When absent the pipeline falls back to the
    /// LLM synthesizer instead of calling the REST API.
    pub token: Option<String>,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    /// Traversal depth bound; documents nested deeper fail as malformed
    /// instead of exhausting the stack.
    pub max_depth: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    pub path: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            // Start with default values
            .set_default("service.name", "figma-report-service")?
            .set_default("service.log_level", "info")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", "8002")?
            .set_default("figma.api_base", "https://api.figma.com/v1")?
            .set_default("figma.request_timeout_secs", "30")?
            .set_default("figma.max_retries", "3")?
            .set_default("llm.api_base", "https://openrouter.ai/api/v1")?
            .set_default("llm.model", "mistralai/mistral-7b-instruct:free")?
            .set_default("llm.max_tokens", "8000")?
            .set_default("llm.temperature", "0.1")?
            .set_default("llm.request_timeout_secs", "60")?
            .set_default("extractor.max_depth", "512")?
            .set_default("output.dir", "./generated_reports")?
            .set_default("templates.path", "./templates")?
            // Load from config file if it exists
            .add_source(File::with_name("config").required(false))
            // Override with environment variables (e.g., SERVICE__FIGMA__TOKEN)
            .add_source(Environment::with_prefix("SERVICE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_file_or_env() {
        let config = Config::load().expect("defaults should deserialize");
        assert_eq!(config.service.name, "figma-report-service");
        assert_eq!(config.server.port, 8002);
        assert_eq!(config.extractor.max_depth, 512);
        assert!(config.figma.token.is_none());
    }
}

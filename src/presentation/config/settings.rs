use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;
use crate::application::services::SummarizationOptions;

/// Environment variable holding the LLM service credential.
pub const API_KEY_VAR: &str = "GROQ_API_KEY";
const ENV_PREFIX: &str = "APP";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub chunking: ChunkingSettings,
    pub summarization: SummarizationSettings,
    pub extraction: ExtractionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub provider: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: String,
    pub chat_model: String,
    #[serde(default)]
    pub max_tokens: Option<usize>,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkingSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizationSettings {
    pub stuff_threshold_chars: usize,
    pub combine_budget_chars: usize,
    pub max_collapse_rounds: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    pub max_file_size_mb: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{API_KEY_VAR} must be set to a non-empty value")]
    MissingApiKey,
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl Settings {
    /// Layers built-in defaults, `appsettings.<env>.toml`, `APP__`-prefixed
    /// environment variables and finally `GROQ_API_KEY`.
    pub fn load(environment: Environment) -> Result<Self, SettingsError> {
        let file_name = format!("appsettings.{}", environment.as_str());
        let api_key = std::env::var(API_KEY_VAR).ok();
        Self::build(
            Config::builder()
                .add_source(File::with_name(&file_name).required(false))
                .add_source(
                    config::Environment::with_prefix(ENV_PREFIX)
                        .prefix_separator(ENV_SEPARATOR)
                        .separator(ENV_SEPARATOR),
                ),
            api_key,
        )
    }

    /// Loads from an inline TOML document instead of the filesystem and process
    /// environment.
    pub fn from_toml(toml: &str, api_key: Option<String>) -> Result<Self, SettingsError> {
        Self::build(
            Config::builder().add_source(File::from_str(toml, config::FileFormat::Toml)),
            api_key,
        )
    }

    fn build(
        sources: config::ConfigBuilder<config::builder::DefaultState>,
        api_key: Option<String>,
    ) -> Result<Self, SettingsError> {
        let settings: Settings = with_defaults(sources)?
            .set_override_option("llm.api_key", api_key)?
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.llm.api_key.trim().is_empty() {
            return Err(SettingsError::MissingApiKey);
        }
        if self.chunking.chunk_size == 0 {
            return Err(SettingsError::Invalid {
                field: "chunking.chunk_size",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(SettingsError::Invalid {
                field: "chunking.chunk_overlap",
                reason: "must be smaller than chunking.chunk_size".to_string(),
            });
        }
        if self.summarization.combine_budget_chars == 0 {
            return Err(SettingsError::Invalid {
                field: "summarization.combine_budget_chars",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.extraction.max_file_size_mb * 1024 * 1024
    }

    pub fn summarization_options(&self) -> SummarizationOptions {
        SummarizationOptions {
            stuff_threshold_chars: self.summarization.stuff_threshold_chars,
            combine_budget_chars: self.summarization.combine_budget_chars,
            max_collapse_rounds: self.summarization.max_collapse_rounds,
        }
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 7860)?
        .set_default("llm.provider", "groq")?
        .set_default("llm.chat_model", "llama-3.1-8b-instant")?
        .set_default("llm.temperature", 0.0)?
        .set_default("chunking.chunk_size", 4000)?
        .set_default("chunking.chunk_overlap", 400)?
        .set_default("summarization.stuff_threshold_chars", 10_000)?
        .set_default("summarization.combine_budget_chars", 12_000)?
        .set_default("summarization.max_collapse_rounds", 5)?
        .set_default("extraction.max_file_size_mb", 20)?
        .set_default("extraction.timeout_secs", 30)?
        .set_default("logging.level", "info,synopsis=debug,tower_http=debug")?
        .set_default("logging.json", false)
}

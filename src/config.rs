use std::env;
use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";
const DEFAULT_SERVER_PORT: u16 = 8000;
const DEFAULT_CORS_ALLOWED_ORIGINS: &str = "http://localhost:3000,*";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the simplifier service.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key forwarded to the inference provider. Required.
    pub openai_api_key: String,
    /// Base URL of the OpenAI-compatible API (without the `/responses` suffix).
    pub openai_base_url: String,
    /// Model identifier used for both text and image summaries.
    pub openai_model: String,
    /// Port the HTTP server binds on all interfaces.
    pub server_port: u16,
    /// Origins allowed by the CORS layer; `*` mirrors any request origin.
    pub cors_allowed_origins: Vec<String>,
    /// Maximum accepted request body size for uploads.
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            openai_api_key: optional("OPENAI_API_KEY")
                .map(|value| value.trim().to_string())
                .ok_or_else(|| ConfigError::MissingVariable("OPENAI_API_KEY".into()))?,
            openai_base_url: optional("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: optional("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            server_port: optional("SERVER_PORT")
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_SERVER_PORT),
            cors_allowed_origins: parse_origins(
                &optional("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|| DEFAULT_CORS_ALLOWED_ORIGINS.to_string()),
            ),
            max_upload_bytes: optional("MAX_UPLOAD_BYTES")
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .ok()
                        .filter(|bytes: &usize| *bytes > 0)
                        .ok_or_else(|| ConfigError::InvalidValue("MAX_UPLOAD_BYTES".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from `.env` and the environment and install it in the global cache.
///
/// A missing `OPENAI_API_KEY` is fatal: the caller should abort startup on error.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    Ok(CONFIG.get_or_init(|| config))
}

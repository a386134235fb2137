use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::fmt;

const TAPAS_URL: &str =
    "https://api-inference.huggingface.co/models/google/tapas-base-finetuned-wtq";
const PHI_CHAT_URL: &str =
    "https://api-inference.huggingface.co/models/microsoft/Phi-3.5-mini-instruct/v1/chat/completions";

/// Process configuration, read once at startup and shared read-only by
/// every request after that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Bearer credential for all outbound provider calls.
    pub huggingface_token: String,
    pub allowed_origin: String,
    pub request_timeout_secs: u64,
    pub table_qa_url: String,
    pub chat_url: String,
    pub chat_completions_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            huggingface_token: String::new(),
            allowed_origin: "http://localhost:3000".to_string(),
            request_timeout_secs: 60,
            table_qa_url: TAPAS_URL.to_string(),
            chat_url: PHI_CHAT_URL.to_string(),
            // Both chat contracts currently point at the same provider.
            chat_completions_url: PHI_CHAT_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Layer environment variables over the defaults (`PORT`,
    /// `HUGGINGFACE_TOKEN`, etc). Fails when no token is set.
    pub fn load() -> Result<Self, ConfigError> {
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Env::raw().only(&[
                "host",
                "port",
                "huggingface_token",
                "allowed_origin",
                "request_timeout_secs",
                "table_qa_url",
                "chat_url",
                "chat_completions_url",
            ]))
            .extract()
            .map_err(ConfigError::Extract)?;

        if config.huggingface_token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }

        Ok(config)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Extract(figment::Error),
    MissingToken,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Extract(err) => write!(f, "failed to read configuration: {}", err),
            ConfigError::MissingToken => {
                write!(f, "HUGGINGFACE_TOKEN is not set in the environment")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

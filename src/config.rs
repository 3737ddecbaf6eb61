use serde::Deserialize;
use std::{fmt, path::PathBuf, time::Duration};

use crate::services::providers::ModelSettings;

/// Application configuration loaded from environment variables
#[derive(Deserialize, Clone)]
pub struct Config {
    /// Groq API key used for chat completions
    pub groq_api_key: String,

    /// Model requested from the completions endpoint
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Upper bound on generated tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Path to the product catalog JSON file
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// OpenAI-compatible API base URL
    #[serde(default = "default_llm_api_url")]
    pub llm_api_url: String,

    /// Seconds to wait for a completion before giving up
    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_model_name() -> String {
    "gemma2-9b-it".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/products.json")
}

fn default_llm_api_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values envy cannot express as types
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.groq_api_key.trim().is_empty() {
            anyhow::bail!("GROQ_API_KEY must be set");
        }

        if !self.data_path.is_file() {
            anyhow::bail!(
                "Product data file not found at {}",
                self.data_path.display()
            );
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            anyhow::bail!("TEMPERATURE must be between 0 and 2, got {}", self.temperature);
        }

        Ok(())
    }

    /// Settings handed to the model client
    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings {
            api_key: self.groq_api_key.clone(),
            api_url: self.llm_api_url.trim_end_matches('/').to_string(),
            model_name: self.model_name.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: Duration::from_secs(self.llm_timeout_secs),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("groq_api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("data_path", &self.data_path)
            .field("llm_api_url", &self.llm_api_url)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

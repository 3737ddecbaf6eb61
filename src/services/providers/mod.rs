/// Language model provider abstraction
///
/// The recommendation pipeline only needs "system + prompt in, text out", so
/// providers hide transport, auth and response envelopes behind one trait.
/// Handlers hold an `Arc<dyn ModelClient>`, which lets tests inject fakes.
use std::time::Duration;

use crate::error::AppResult;

pub mod groq;

pub use groq::GroqClient;

/// Connection and sampling settings for a chat-completions provider
#[derive(Clone)]
pub struct ModelSettings {
    pub api_key: String,
    /// Base URL without a trailing slash, e.g. `https://api.groq.com/openai/v1`
    pub api_url: String,
    pub model_name: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Bound on a single completion round trip
    pub timeout: Duration,
}

impl std::fmt::Debug for ModelSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSettings")
            .field("api_url", &self.api_url)
            .field("model_name", &self.model_name)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Trait for language model providers
///
/// Implementations make exactly one attempt per call. Transport and API
/// failures are returned as errors, never retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ModelClient: Send + Sync {
    /// Sends a system instruction and a prompt, returning the raw completion text
    async fn complete(&self, system: &str, prompt: &str) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

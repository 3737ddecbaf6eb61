/// Groq chat-completions provider
///
/// Speaks the OpenAI-compatible `/chat/completions` API, so any endpoint with
/// the same contract works by pointing `LLM_API_URL` at it.
use crate::{
    error::{AppError, AppResult},
    services::providers::{ModelClient, ModelSettings},
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct GroqClient {
    http_client: HttpClient,
    settings: ModelSettings,
}

impl GroqClient {
    /// Builds a client whose requests are bounded by `settings.timeout`
    pub fn new(settings: ModelSettings) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            http_client,
            settings,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.settings.api_url)
    }

    fn request_body<'a>(&'a self, system: &'a str, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.settings.model_name,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }

    /// Pulls the first completion's text out of a response body
    fn extract_content(body: ChatResponse) -> AppResult<String> {
        let choice = body.choices.into_iter().next().ok_or_else(|| {
            AppError::ExternalApi("Model API returned no completion choices".to_string())
        })?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl ModelClient for GroqClient {
    async fn complete(&self, system: &str, prompt: &str) -> AppResult<String> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(self.completions_url())
            .bearer_auth(&self.settings.api_key)
            .json(&self.request_body(system, prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Model API returned status {}: {}",
                status, body
            )));
        }

        let body: ChatResponse = response.json().await?;
        let content = Self::extract_content(body)?;

        tracing::info!(
            provider = self.name(),
            model = %self.settings.model_name,
            response_chars = content.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Completion received"
        );

        Ok(content)
    }

    fn name(&self) -> &'static str {
        "groq"
    }
}

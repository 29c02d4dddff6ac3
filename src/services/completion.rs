/// Text-completion client used to classify admin reviews.
///
/// Talks to any OpenAI-compatible `/chat/completions` endpoint (OpenRouter by
/// default). Requests are deterministic: temperature 0, a single user message,
/// and a fixed token budget.
use std::time::{Duration, Instant};

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::{AppError, AppResult},
};

const MAX_TOKENS: u32 = 800;
const TEMPERATURE: f32 = 0.0;

/// Seam for the external completion service
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends `prompt` and returns the first choice's trimmed text, verbatim
    async fn classify(&self, prompt: &str) -> AppResult<String>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
    /// Legacy completions shape
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Pulls the label out of a raw response body
fn extract_label(body: &str) -> AppResult<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| AppError::CompletionMalformed(format!("invalid JSON: {}", e)))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AppError::CompletionMalformed("no choices returned".to_string()))?;

    // Blank content is a label like any other; it resolves to rank 0
    let content = choice
        .message
        .and_then(|m| m.content)
        .filter(|c| !c.trim().is_empty())
        .or(choice.text)
        .unwrap_or_default();

    Ok(content.trim().to_string())
}

/// OpenAI-compatible chat completions client
#[derive(Clone)]
pub struct OpenRouterClient {
    http_client: HttpClient,
    api_key: Option<String>,
    base_url: Option<String>,
    model: String,
    timeout: Duration,
}

impl OpenRouterClient {
    pub fn new(
        api_key: Option<String>,
        base_url: Option<String>,
        model: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key: api_key.filter(|k| !k.is_empty()),
            base_url: base_url.filter(|u| !u.is_empty()),
            model,
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.openrouter_api_key.clone(),
            config.openrouter_base_url.clone(),
            config.ai_model.clone(),
            config.completion_timeout(),
        )
    }

    fn credentials(&self) -> AppResult<(&str, String)> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::ConfigurationMissing("OPENROUTER_API_KEY is not set".to_string())
        })?;
        let base_url = self.base_url.as_deref().ok_or_else(|| {
            AppError::ConfigurationMissing("OPENROUTER_BASE_URL is not set".to_string())
        })?;

        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        Ok((api_key, endpoint))
    }

    fn transport_error(&self, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::CompletionTimeout(self.timeout)
        } else {
            AppError::CompletionTransport(err.to_string())
        }
    }
}

#[async_trait::async_trait]
impl CompletionClient for OpenRouterClient {
    async fn classify(&self, prompt: &str) -> AppResult<String> {
        let (api_key, endpoint) = self.credentials()?;

        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let started = Instant::now();
        let response = self
            .http_client
            .post(&endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                provider = self.name(),
                "Completion API returned an error status"
            );
            return Err(AppError::CompletionHttp {
                status: status.as_u16(),
                body: text,
            });
        }

        let label = extract_label(&text).map_err(|e| {
            tracing::error!(error = %e, response = %text, "Failed to parse completion response");
            e
        })?;

        tracing::info!(
            model = %self.model,
            provider = self.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            label = %label,
            "Completion received"
        );

        Ok(label)
    }

    fn name(&self) -> &'static str {
        "openrouter"
    }
}

//! Client for OpenAI-compatible chat completion APIs.

use async_trait::async_trait;
use fabula_core::{GenerateRequest, GenerateResponse};
use fabula_error::{FabulaResult, ProviderError, ProviderErrorKind};
use fabula_interface::TextGenerator;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Client for any provider speaking the OpenAI chat completions protocol.
///
/// The same wire format is served by OpenAI, DeepSeek, Groq, and most local
/// gateways, so one client covers them all. The provider only differs in the
/// endpoint URL, the API key, and the name used in logs.
#[derive(Debug, Clone)]
pub struct OpenAiCompatClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    provider: &'static str,
}

impl OpenAiCompatClient {
    /// Creates a new client for an OpenAI-compatible endpoint.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Bearer token for the provider
    /// * `model` - Default model identifier (e.g., "gpt-4o-mini")
    /// * `base_url` - Full chat completions URL
    /// * `provider` - Short provider name used in logs
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        provider: &'static str,
    ) -> Self {
        debug!(provider, "Creating new OpenAI-compatible client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
            provider,
        }
    }

    /// Creates a client for the OpenAI API itself.
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(api_key, model, OPENAI_CHAT_URL, "openai")
    }

    /// Creates a client reading the API key from `{PROVIDER}_API_KEY`.
    ///
    /// The variable name is the uppercased provider name, so `"deepseek"`
    /// reads `DEEPSEEK_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env(
        model: impl Into<String>,
        base_url: impl Into<String>,
        provider: &'static str,
    ) -> FabulaResult<Self> {
        let var = format!("{}_API_KEY", provider.to_uppercase());
        let api_key = std::env::var(&var)
            .map_err(|_| ProviderError::new(ProviderErrorKind::MissingApiKey(var)))?;
        Ok(Self::new(api_key, model, base_url, provider))
    }

    /// Creates an OpenAI client reading the key from `OPENAI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is not set.
    pub fn openai_from_env(model: impl Into<String>) -> FabulaResult<Self> {
        Self::from_env(model, OPENAI_CHAT_URL, "openai")
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl TextGenerator for OpenAiCompatClient {
    #[instrument(skip(self, req), fields(provider = self.provider, model = %self.model))]
    async fn generate(&self, req: &GenerateRequest) -> FabulaResult<GenerateResponse> {
        let model = req.model.as_deref().unwrap_or(&self.model);
        let body = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: &req.prompt,
            }],
            temperature: req.temperature,
            max_tokens: req.max_tokens,
        };

        debug!("Sending chat completion request");
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to provider");
                ProviderError::new(ProviderErrorKind::Http(format!("Request failed: {}", e)))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, body = %message, "Provider returned error");
            let kind = match status.as_u16() {
                429 => ProviderErrorKind::RateLimit,
                404 => ProviderErrorKind::ModelNotFound(model.to_string()),
                code => ProviderErrorKind::Api {
                    status: code,
                    message,
                },
            };
            return Err(ProviderError::new(kind).into());
        }

        let decoded: ChatResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to decode provider response");
            ProviderError::new(ProviderErrorKind::ResponseDecode(e.to_string()))
        })?;

        let choice = decoded.choices.into_iter().next().ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::ResponseDecode(
                "response contained no choices".to_string(),
            ))
        })?;

        debug!("Received chat completion response");
        Ok(GenerateResponse {
            text: choice.message.content,
            model: model.to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        self.provider
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

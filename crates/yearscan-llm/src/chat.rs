//! OpenAI-compatible chat-completions provider
//!
//! Talks to any server exposing `POST /v1/chat/completions`, which covers the
//! usual local inference servers (LM Studio, llama.cpp, vLLM). No
//! authentication is sent.
//!
//! # Examples
//!
//! ```no_run
//! use yearscan_llm::{ChatCompletionsProvider, LlmSettings};
//!
//! let provider = ChatCompletionsProvider::new(LlmSettings::default()).unwrap();
//! ```

use crate::client::REQUEST_TIMEOUT;
use crate::LlmError;
use serde::{Deserialize, Serialize};
use yearscan_domain::traits::LlmProvider as LlmProviderTrait;

/// Default chat-completions endpoint (local LM Studio)
pub const DEFAULT_ENDPOINT: &str = "http://localhost:1234/v1/chat/completions";

/// Default model identifier sent with each request
pub const DEFAULT_MODEL: &str = "local-model";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Default completion budget
pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// Settings for the chat-completions endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Full URL of the chat-completions endpoint
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens in the completion
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl LlmSettings {
    /// Validate the settings
    pub fn validate(&self) -> Result<(), LlmError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(LlmError::Config(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.model.trim().is_empty() {
            return Err(LlmError::Config("model must not be empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(LlmError::Config(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(LlmError::Config("max_tokens must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Request body for the chat-completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the chat-completions API (only the fields we read)
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Chat-completions provider
///
/// One request per call, no retries: a failed call is reported to the caller,
/// which degrades that record instead of trying again.
pub struct ChatCompletionsProvider {
    settings: LlmSettings,
    client: reqwest::Client,
}

impl ChatCompletionsProvider {
    /// Create a new provider
    ///
    /// # Errors
    ///
    /// Returns error if the settings are invalid or the HTTP client cannot be built.
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        settings.validate()?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { settings, client })
    }

    /// The settings this provider was created with
    pub fn settings(&self) -> &LlmSettings {
        &self.settings
    }

    /// Send one prompt and return the first choice's message content
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The server is not reachable
    /// - The server answers with a non-success status
    /// - The body is not valid chat-completions JSON
    /// - The response contains no choice or no content
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.settings.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        let response = self
            .client
            .post(&self.settings.endpoint)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(REQUEST_TIMEOUT)
                } else {
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!("HTTP {}: {}", status, error_text)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)))?;

        parse_chat_response(&body)
    }
}

/// Pull `choices[0].message.content` out of a response body
fn parse_chat_response(body: &str) -> Result<String, LlmError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("response has no choices".to_string()))?
        .message
        .content
        .ok_or_else(|| LlmError::InvalidResponse("first choice has no content".to_string()))
}

impl LlmProviderTrait for ChatCompletionsProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.complete(prompt).await
    }
}

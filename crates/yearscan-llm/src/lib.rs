//! Yearscan LLM Provider Layer
//!
//! Remote text completion for the year-extraction fallback.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from
//! `yearscan-domain`, plus the [`InferenceClient`] that every pipeline call
//! goes through. The client is where the concurrency limit, the request
//! timeout and the "never fail, return an error marker" policy live.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `ChatCompletionsProvider`: OpenAI-compatible chat-completions endpoint
//!   (LM Studio, llama.cpp server, vLLM, ...)
//!
//! # Examples
//!
//! ```
//! use yearscan_llm::{InferenceClient, MockProvider};
//!
//! # tokio_test::block_on(async {
//! let client = InferenceClient::new(MockProvider::new("Year: 2024"));
//! assert_eq!(client.infer("any prompt").await, "Year: 2024");
//! # });
//! ```

#![warn(missing_docs)]

pub mod chat;
pub mod client;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use yearscan_domain::traits::LlmProvider as LlmProviderTrait;

pub use chat::{ChatCompletionsProvider, LlmSettings};
pub use client::{is_error_marker, InferenceClient, ERROR_MARKER_PREFIX, MAX_CONCURRENT_REQUESTS, REQUEST_TIMEOUT};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The request did not finish within the allowed time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Invalid provider settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail,
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Replies are looked up by exact prompt first, then by the first registered
/// fragment the prompt contains, then the default response is used.
///
/// # Examples
///
/// ```
/// use yearscan_llm::MockProvider;
/// use yearscan_domain::traits::LlmProvider;
///
/// # tokio_test::block_on(async {
/// let mut provider = MockProvider::new("Year: 0");
/// provider.add_response("exact prompt", "Year: 2019");
/// provider.add_response_containing("rec-7", "Year: 2021");
///
/// assert_eq!(provider.generate("exact prompt").await.unwrap(), "Year: 2019");
/// assert_eq!(provider.generate("text of rec-7 ...").await.unwrap(), "Year: 2021");
/// assert_eq!(provider.generate("anything else").await.unwrap(), "Year: 0");
/// assert_eq!(provider.call_count(), 3);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    fragments: Arc<Mutex<Vec<(String, MockReply)>>>,
    latency: Option<Duration>,
    call_count: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            fragments: Arc::new(Mutex::new(Vec::new())),
            latency: None,
            call_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Delay every reply, so concurrent calls overlap
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), MockReply::Text(response.into()));
    }

    /// Add a response for any prompt containing `fragment`
    pub fn add_response_containing(&mut self, fragment: impl Into<String>, response: impl Into<String>) {
        self.fragments
            .lock()
            .unwrap()
            .push((fragment.into(), MockReply::Text(response.into())));
    }

    /// Configure to return an error for any prompt containing `fragment`
    pub fn add_error(&mut self, fragment: impl Into<String>) {
        self.fragments
            .lock()
            .unwrap()
            .push((fragment.into(), MockReply::Fail));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were running at the same time
    pub fn peak_concurrency(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }

    fn reply_for(&self, prompt: &str) -> MockReply {
        if let Some(reply) = self.responses.lock().unwrap().get(prompt) {
            return reply.clone();
        }
        self.fragments
            .lock()
            .unwrap()
            .iter()
            .find(|(fragment, _)| prompt.contains(fragment.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| MockReply::Text(self.default_response.clone()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

/// Decrements the in-flight counter when a mock call ends, however it ends
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let reply = self.reply_for(prompt);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Fail => Err(LlmError::Other("Mock error".to_string())),
        }
    }
}

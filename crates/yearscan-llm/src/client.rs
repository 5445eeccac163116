//! Concurrency-limited inference client
//!
//! Every remote call in the system goes through [`InferenceClient`]. It owns
//! the counting semaphore that caps in-flight requests, applies the request
//! timeout, and turns any failure into an error-marker string so a single bad
//! call can never abort a batch.

use crate::LlmError;
use std::fmt::Display;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use yearscan_domain::traits::LlmProvider;

/// Maximum number of simultaneous in-flight requests
pub const MAX_CONCURRENT_REQUESTS: usize = 3;

/// Time allowed for a single request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Prefix of the string returned in place of a failed completion
pub const ERROR_MARKER_PREFIX: &str = "Error: ";

/// True if `text` is an error marker produced by [`InferenceClient::infer`]
pub fn is_error_marker(text: &str) -> bool {
    text.starts_with(ERROR_MARKER_PREFIX)
}

fn error_marker(error: impl Display) -> String {
    format!("{}{}", ERROR_MARKER_PREFIX, error)
}

/// Wraps an [`LlmProvider`] behind a shared concurrency limiter
///
/// Callers beyond the limit suspend until a permit frees up. The permit is
/// held for the whole request and released when it is dropped, on success,
/// failure and timeout alike. No retries are attempted.
pub struct InferenceClient<P> {
    provider: P,
    limiter: Arc<Semaphore>,
    request_timeout: Duration,
    requests_issued: AtomicUsize,
}

impl<P: LlmProvider> InferenceClient<P> {
    /// Create a client with its own limiter of [`MAX_CONCURRENT_REQUESTS`] permits
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            limiter: Arc::new(Semaphore::new(MAX_CONCURRENT_REQUESTS)),
            request_timeout: REQUEST_TIMEOUT,
            requests_issued: AtomicUsize::new(0),
        }
    }

    /// Share an existing limiter, so several clients obey one global cap
    pub fn with_limiter(mut self, limiter: Arc<Semaphore>) -> Self {
        self.limiter = limiter;
        self
    }

    /// Override the request timeout
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// The limiter guarding this client's requests
    pub fn limiter(&self) -> Arc<Semaphore> {
        Arc::clone(&self.limiter)
    }

    /// Permits currently free
    pub fn available_permits(&self) -> usize {
        self.limiter.available_permits()
    }

    /// Number of requests that were actually sent to the provider
    pub fn requests_issued(&self) -> usize {
        self.requests_issued.load(Ordering::SeqCst)
    }

    /// The wrapped provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run one completion, returning the raw text or an error marker
    ///
    /// # Examples
    ///
    /// ```
    /// use yearscan_llm::{is_error_marker, InferenceClient, MockProvider};
    ///
    /// # tokio_test::block_on(async {
    /// let mut provider = MockProvider::new("Year: 2020");
    /// provider.add_error("broken");
    /// let client = InferenceClient::new(provider);
    ///
    /// assert_eq!(client.infer("fine").await, "Year: 2020");
    /// assert!(is_error_marker(&client.infer("broken").await));
    /// # });
    /// ```
    pub async fn infer(&self, prompt: &str) -> String {
        let _permit = match self.limiter.acquire().await {
            Ok(permit) => permit,
            Err(e) => return error_marker(e),
        };
        self.request(prompt).await
    }

    /// Like [`infer`](Self::infer), but gives up while still waiting for a permit
    ///
    /// Returns `None` when `cancel` fires before the request is issued. A
    /// request that already holds a permit runs to completion or timeout.
    pub async fn infer_unless_cancelled(&self, prompt: &str, cancel: &CancellationToken) -> Option<String> {
        if cancel.is_cancelled() {
            return None;
        }

        let acquired = tokio::select! {
            biased;
            _ = cancel.cancelled() => return None,
            acquired = self.limiter.acquire() => acquired,
        };
        let _permit = match acquired {
            Ok(permit) => permit,
            Err(e) => return Some(error_marker(e)),
        };

        Some(self.request(prompt).await)
    }

    async fn request(&self, prompt: &str) -> String {
        self.requests_issued.fetch_add(1, Ordering::SeqCst);
        debug!("Sending prompt ({} chars)", prompt.len());

        match timeout(self.request_timeout, self.provider.generate(prompt)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("Inference request failed: {}", e);
                error_marker(e)
            }
            Err(_) => {
                let e = LlmError::Timeout(self.request_timeout);
                warn!("Inference request failed: {}", e);
                error_marker(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockProvider;
    use futures::future::join_all;

    #[tokio::test]
    async fn test_infer_returns_completion() {
        let client = InferenceClient::new(MockProvider::new("Year: 2024"));
        assert_eq!(client.infer("prompt").await, "Year: 2024");
        assert_eq!(client.requests_issued(), 1);
    }

    #[tokio::test]
    async fn test_failure_becomes_error_marker() {
        let mut provider = MockProvider::new("ok");
        provider.add_error("fail");
        let client = InferenceClient::new(provider);

        let text = client.infer("please fail").await;
        assert!(is_error_marker(&text));
        assert!(text.contains("Mock error"));
        assert_eq!(client.available_permits(), MAX_CONCURRENT_REQUESTS);
    }

    #[tokio::test]
    async fn test_timeout_becomes_error_marker() {
        let provider = MockProvider::new("late").with_latency(Duration::from_millis(200));
        let client = InferenceClient::new(provider).with_request_timeout(Duration::from_millis(10));

        let text = client.infer("prompt").await;
        assert!(is_error_marker(&text));
        assert!(text.contains("timed out"));
        assert_eq!(client.available_permits(), MAX_CONCURRENT_REQUESTS);
    }

    #[tokio::test]
    async fn test_concurrency_is_capped() {
        let provider = MockProvider::new("x").with_latency(Duration::from_millis(20));
        let client = InferenceClient::new(provider);

        let prompts: Vec<String> = (0..10).map(|i| format!("prompt {}", i)).collect();
        let results = join_all(prompts.iter().map(|p| client.infer(p))).await;

        assert_eq!(results.len(), 10);
        assert_eq!(client.provider().call_count(), 10);
        assert!(client.provider().peak_concurrency() <= MAX_CONCURRENT_REQUESTS);
        assert_eq!(client.provider().peak_concurrency(), MAX_CONCURRENT_REQUESTS);
        assert_eq!(client.available_permits(), MAX_CONCURRENT_REQUESTS);
    }

    #[tokio::test]
    async fn test_shared_limiter_spans_clients() {
        let limiter = Arc::new(Semaphore::new(1));
        let a = InferenceClient::new(MockProvider::new("a").with_latency(Duration::from_millis(10)))
            .with_limiter(Arc::clone(&limiter));
        let b = InferenceClient::new(MockProvider::new("b").with_latency(Duration::from_millis(10)))
            .with_limiter(Arc::clone(&limiter));

        let held = limiter.clone().try_acquire_owned().unwrap();
        assert_eq!(a.available_permits(), 0);
        assert_eq!(b.available_permits(), 0);
        drop(held);

        let (x, y) = tokio::join!(a.infer("p"), b.infer("p"));
        assert_eq!((x.as_str(), y.as_str()), ("a", "b"));
    }

    #[tokio::test]
    async fn test_cancelled_before_issue_sends_nothing() {
        let client = InferenceClient::new(MockProvider::new("x"));
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert_eq!(client.infer_unless_cancelled("p", &cancel).await, None);
        assert_eq!(client.requests_issued(), 0);
        assert_eq!(client.provider().call_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_while_waiting_for_permit() {
        let client = InferenceClient::new(MockProvider::new("x"))
            .with_limiter(Arc::new(Semaphore::new(1)));
        let cancel = CancellationToken::new();

        let held = client.limiter().try_acquire_owned().unwrap();
        let waiting = client.infer_unless_cancelled("p", &cancel);
        cancel.cancel();

        assert_eq!(waiting.await, None);
        drop(held);
        assert_eq!(client.provider().call_count(), 0);
    }

    #[tokio::test]
    async fn test_uncancelled_call_completes() {
        let client = InferenceClient::new(MockProvider::new("Year: 1999"));
        let cancel = CancellationToken::new();

        assert_eq!(
            client.infer_unless_cancelled("p", &cancel).await.as_deref(),
            Some("Year: 1999")
        );
    }
}

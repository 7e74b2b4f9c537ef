//! LLM provider abstraction for code reviews.
//!
//! The production provider talks to any OpenAI-compatible chat-completion
//! endpoint configured through the environment; responses in the Anthropic
//! Messages shape are accepted as well (see [`super::response`]).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{RequestSettings, ReviewConfig};
use crate::error::ReviewError;
use crate::review::response::extract_review_text;

/// Trait for LLM API providers.
///
/// The `complete` method is synchronous (using `reqwest::blocking`); a
/// review is a single request and nothing else runs alongside it.
pub trait LlmProvider: Send + Sync {
    /// Send a prompt and return the trimmed completion text.
    fn complete(&self, prompt: &str) -> Result<String, ReviewError>;

    /// Provider name, for diagnostics.
    fn name(&self) -> &str;

    /// Model identifier being used.
    fn model(&self) -> &str;
}

impl<T: LlmProvider + ?Sized> LlmProvider for &T {
    fn complete(&self, prompt: &str) -> Result<String, ReviewError> {
        (**self).complete(prompt)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

// ---------------------------------------------------------------------------
// Chat completion over HTTP
// ---------------------------------------------------------------------------

/// Provider for a configurable chat-completion endpoint.
pub struct ChatCompletionProvider {
    config: ReviewConfig,
    settings: RequestSettings,
    client: reqwest::blocking::Client,
}

impl ChatCompletionProvider {
    /// Create a provider whose requests are abandoned after
    /// `settings.timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Transport`] if the HTTP client cannot be
    /// initialised (e.g. the TLS backend fails to load).
    pub fn new(config: ReviewConfig, settings: RequestSettings) -> Result<Self, ReviewError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ReviewError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            settings,
            client,
        })
    }

    fn request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }
}

impl LlmProvider for ChatCompletionProvider {
    fn complete(&self, prompt: &str) -> Result<String, ReviewError> {
        debug!(
            endpoint = %self.config.endpoint,
            model = %self.config.model,
            prompt_chars = prompt.len(),
            max_tokens = self.settings.max_tokens,
            timeout_secs = self.settings.timeout.as_secs_f64(),
            "Sending review request"
        );
        let started = Instant::now();

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&self.request(prompt))
            .send()
            .map_err(|e| ReviewError::from_reqwest(e, self.settings.timeout))?;

        let status = response.status();
        debug!(%status, elapsed_ms = started.elapsed().as_millis() as u64, "Received response");

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(%status, "LLM API returned an error status");
            return Err(ReviewError::Http { status, body });
        }

        let body = response
            .text()
            .map_err(|e| ReviewError::from_reqwest(e, self.settings.timeout))?;

        extract_review_text(&body)
    }

    fn name(&self) -> &str {
        "chat-completion"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

// ---------------------------------------------------------------------------
// Mock (for testing)
// ---------------------------------------------------------------------------

/// A mock LLM provider that returns a fixed response and counts calls.
pub struct MockProvider {
    response: String,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Create a mock provider that always returns the given response.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times [`LlmProvider::complete`] has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LlmProvider for MockProvider {
    fn complete(&self, _prompt: &str) -> Result<String, ReviewError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.trim().to_string())
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> ReviewConfig {
        ReviewConfig {
            api_key: "sk-test".into(),
            endpoint: format!("{}/v1/chat/completions", server.uri()),
            model: "test-model".into(),
        }
    }

    /// Drive the blocking provider off the async test runtime.
    async fn complete_blocking(
        config: ReviewConfig,
        settings: RequestSettings,
        prompt: &str,
    ) -> Result<String, ReviewError> {
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || {
            ChatCompletionProvider::new(config, settings)?.complete(&prompt)
        })
        .await
        .unwrap()
    }

    #[test]
    fn mock_provider_returns_expected_response() {
        let provider = MockProvider::new("This is a review.");
        assert_eq!(provider.complete("Review this").unwrap(), "This is a review.");
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn provider_trait_is_object_safe() {
        let provider: Box<dyn LlmProvider> = Box::new(MockProvider::new("test"));
        assert_eq!(provider.name(), "mock");
        assert_eq!(provider.model(), "mock-model");
    }

    #[test]
    fn request_body_has_expected_shape() {
        let provider = ChatCompletionProvider::new(
            ReviewConfig {
                api_key: "k".into(),
                endpoint: "http://localhost".into(),
                model: "m".into(),
            },
            RequestSettings::default(),
        )
        .unwrap();

        insta::assert_snapshot!(
            serde_json::to_string(&provider.request("hi")).unwrap(),
            @r#"{"model":"m","messages":[{"role":"user","content":"hi"}],"max_tokens":3000,"temperature":0.2}"#
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn posts_bearer_json_and_reads_chat_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "model": "test-model",
                "messages": [{"role": "user", "content": "review me"}],
                "max_tokens": 3000,
                "temperature": 0.2
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "  Looks fine.\n"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = complete_blocking(config_for(&server), RequestSettings::default(), "review me")
            .await
            .unwrap();
        assert_eq!(text, "Looks fine.");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reads_alternate_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [{"type": "text", "text": "Use parameterized queries."}]
            })))
            .mount(&server)
            .await;

        let text = complete_blocking(config_for(&server), RequestSettings::default(), "p")
            .await
            .unwrap();
        assert_eq!(text, "Use parameterized queries.");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn error_status_is_http_error_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        match complete_blocking(config_for(&server), RequestSettings::default(), "p").await {
            Err(ReviewError::Http { status, body }) => {
                assert_eq!(status.as_u16(), 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("Expected Http, got: {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn slow_response_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"choices": []}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let settings = RequestSettings {
            timeout: Duration::from_millis(200),
            ..RequestSettings::default()
        };
        match complete_blocking(config_for(&server), settings, "p").await {
            Err(err @ ReviewError::Timeout { .. }) => {
                assert!(err.to_string().contains("timed out"), "got: {err}");
            }
            other => panic!("Expected Timeout, got: {other:?}"),
        }
    }

    #[test]
    fn unreachable_endpoint_is_transport_error() {
        // Bind and release a port so nothing is listening on it.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let config = ReviewConfig {
            api_key: "k".into(),
            endpoint: format!("http://127.0.0.1:{port}/v1/chat/completions"),
            model: "m".into(),
        };

        let provider = ChatCompletionProvider::new(config, RequestSettings::default()).unwrap();
        assert!(matches!(
            provider.complete("p"),
            Err(ReviewError::Transport(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unrecognized_shape_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"output":"x"}"#))
            .mount(&server)
            .await;

        match complete_blocking(config_for(&server), RequestSettings::default(), "p").await {
            Err(ReviewError::Parse { body, .. }) => assert_eq!(body, r#"{"output":"x"}"#),
            other => panic!("Expected Parse, got: {other:?}"),
        }
    }
}

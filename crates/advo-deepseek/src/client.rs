// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the DeepSeek chat-completions API.
//!
//! Provides [`DeepSeekClient`] which handles request construction, bearer
//! authentication, and response parsing. The contract is a single bounded
//! attempt: one request with a fixed deadline and no retry — the
//! conversation engine's fallback generator is the recovery path.

use std::time::{Duration, Instant};

use advo_config::model::DeepSeekConfig;
use advo_core::types::{Completion, CompletionRequest};
use advo_core::{CompletionClient, ProviderError};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};

/// HTTP client for DeepSeek API communication.
#[derive(Debug, Clone)]
pub struct DeepSeekClient {
    client: reqwest::Client,
    api_key: Option<String>,
    api_url: String,
    timeout: Duration,
}

impl DeepSeekClient {
    /// Creates a new DeepSeek API client from configuration.
    ///
    /// A missing API key is not an error here: the client constructs fine
    /// and every `complete` call reports [`ProviderError::CredentialMissing`],
    /// which the engine converts into a fallback reply.
    pub fn new(config: &DeepSeekConfig) -> Result<Self, ProviderError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            timeout,
        })
    }
}

#[async_trait]
impl CompletionClient for DeepSeekClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("completion requested without a configured API key");
            return Err(ProviderError::CredentialMissing);
        };

        let body = ChatCompletionRequest {
            model: request.model.clone(),
            messages: request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        };

        let started = Instant::now();
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        duration: self.timeout,
                    }
                } else {
                    ProviderError::Transport {
                        message: format!("HTTP request failed: {e}"),
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let status = response.status();
        debug!(status = %status, "completion response received");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&text) {
                Ok(api_err) => format!(
                    "API returned {status}: {} ({})",
                    api_err.error.message,
                    api_err.error.type_.as_deref().unwrap_or("unknown")
                ),
                Err(_) => format!("API returned {status}: {text}"),
            };
            return Err(ProviderError::Transport {
                message,
                source: None,
            });
        }

        let text = response.text().await.map_err(|e| ProviderError::Transport {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::MalformedResponse(format!("bad completion body: {e}")))?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            ProviderError::MalformedResponse("response contained no choices".to_string())
        })?;

        let latency_ms = started.elapsed().as_millis() as i64;
        Ok(Completion {
            content: choice.message.content,
            model: parsed.model.unwrap_or(request.model),
            latency_ms,
            total_tokens: parsed.usage.map(|u| u.total_tokens),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advo_core::types::CompletionMessage;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> DeepSeekConfig {
        DeepSeekConfig {
            api_key: Some("sk-test-key".to_string()),
            api_url: format!("{base_url}/chat/completions"),
            default_model: "deepseek-chat".to_string(),
            timeout_secs: 1,
        }
    }

    fn test_request() -> CompletionRequest {
        CompletionRequest {
            model: "deepseek-chat".to_string(),
            messages: vec![
                CompletionMessage::system("You are a legal assistant."),
                CompletionMessage::user("Здравствуйте"),
            ],
            max_tokens: 300,
            temperature: 0.7,
        }
    }

    fn success_body() -> serde_json::Value {
        serde_json::json!({
            "id": "cmpl-test",
            "object": "chat.completion",
            "model": "deepseek-chat",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Здравствуйте! Чем могу помочь?"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 50, "completion_tokens": 12, "total_tokens": 62}
        })
    }

    #[tokio::test]
    async fn complete_success_returns_content_and_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .mount(&server)
            .await;

        let client = DeepSeekClient::new(&test_config(&server.uri())).unwrap();
        let completion = client.complete(test_request()).await.unwrap();

        assert_eq!(completion.content, "Здравствуйте! Чем могу помочь?");
        assert_eq!(completion.model, "deepseek-chat");
        assert_eq!(completion.total_tokens, Some(62));
        assert!(completion.latency_ms >= 0);
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_sending() {
        let server = MockServer::start().await;
        // No mock mounted: any request would 404 and fail differently.
        let mut config = test_config(&server.uri());
        config.api_key = None;

        let client = DeepSeekClient::new(&config).unwrap();
        let err = client.complete(test_request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::CredentialMissing));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn server_error_maps_to_transport_without_retry() {
        let server = MockServer::start().await;
        let error_body = serde_json::json!({
            "error": {"type": "server_error", "message": "Internal error"}
        });
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_json(&error_body))
            .expect(1) // one attempt only, never retried
            .mount(&server)
            .await;

        let client = DeepSeekClient::new(&test_config(&server.uri())).unwrap();
        let err = client.complete(test_request()).await.unwrap_err();
        match err {
            ProviderError::Transport { message, .. } => {
                assert!(message.contains("Internal error"), "got: {message}");
            }
            other => panic!("expected Transport, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_json_maps_to_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let client = DeepSeekClient::new(&test_config(&server.uri())).unwrap();
        let err = client.complete(test_request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn empty_choices_maps_to_malformed_response() {
        let server = MockServer::start().await;
        let body = serde_json::json!({"choices": [], "usage": {"total_tokens": 0}});
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let client = DeepSeekClient::new(&test_config(&server.uri())).unwrap();
        let err = client.complete(test_request()).await.unwrap_err();
        match err {
            ProviderError::MalformedResponse(msg) => {
                assert!(msg.contains("no choices"), "got: {msg}");
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_response_maps_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(success_body())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        // test_config uses a 1-second deadline.
        let client = DeepSeekClient::new(&test_config(&server.uri())).unwrap();
        let err = client.complete(test_request()).await.unwrap_err();
        match err {
            ProviderError::Timeout { duration } => {
                assert_eq!(duration, Duration::from_secs(1));
            }
            other => panic!("expected Timeout, got {other:?}"),
        }
    }
}

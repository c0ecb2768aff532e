// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion client for deterministic testing.
//!
//! `MockCompletionClient` implements `CompletionClient` with pre-configured
//! outcomes, enabling fast, CI-runnable tests of both the success path and
//! every fallback path without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use advo_core::types::{Completion, CompletionRequest};
use advo_core::{CompletionClient, ProviderError};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// One scripted outcome for the mock client.
#[derive(Debug, Clone)]
enum MockOutcome {
    Reply(String),
    Failure,
}

/// A mock completion client that returns pre-configured outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty, the
/// client returns a default "mock reply" — or, when built with
/// [`MockCompletionClient::failing`], a transport error on every call.
/// All requests are recorded for assertions on context assembly.
pub struct MockCompletionClient {
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    fail_by_default: AtomicBool,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockCompletionClient {
    /// A client that answers "mock reply" forever.
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            fail_by_default: AtomicBool::new(false),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A client pre-loaded with the given replies, then the default.
    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(
                replies.into_iter().map(MockOutcome::Reply).collect(),
            )),
            fail_by_default: AtomicBool::new(false),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A client whose every unscripted call fails with a transport error —
    /// the engine must serve its fallback reply.
    pub fn failing() -> Self {
        let client = Self::new();
        client.fail_by_default.store(true, Ordering::SeqCst);
        client
    }

    /// Queue one successful reply.
    pub async fn push_reply(&self, text: impl Into<String>) {
        self.outcomes
            .lock()
            .await
            .push_back(MockOutcome::Reply(text.into()));
    }

    /// Queue one failure.
    pub async fn push_failure(&self) {
        self.outcomes.lock().await.push_back(MockOutcome::Failure);
    }

    /// All requests received so far, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
        self.requests.lock().await.push(request.clone());

        let outcome = self.outcomes.lock().await.pop_front();
        let outcome = match outcome {
            Some(o) => o,
            None if self.fail_by_default.load(Ordering::SeqCst) => MockOutcome::Failure,
            None => MockOutcome::Reply("mock reply".to_string()),
        };

        match outcome {
            MockOutcome::Reply(content) => Ok(Completion {
                content,
                model: request.model,
                latency_ms: 5,
                total_tokens: Some(42),
            }),
            MockOutcome::Failure => Err(ProviderError::Transport {
                message: "mock provider failure".to_string(),
                source: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advo_core::types::CompletionMessage;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "deepseek-chat".into(),
            messages: vec![CompletionMessage::user("hi")],
            max_tokens: 100,
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn default_reply_when_queue_empty() {
        let client = MockCompletionClient::new();
        let completion = client.complete(request()).await.unwrap();
        assert_eq!(completion.content, "mock reply");
        assert_eq!(completion.model, "deepseek-chat");
    }

    #[tokio::test]
    async fn queued_replies_returned_in_order() {
        let client = MockCompletionClient::new();
        client.push_reply("first").await;
        client.push_reply("second").await;

        assert_eq!(client.complete(request()).await.unwrap().content, "first");
        assert_eq!(client.complete(request()).await.unwrap().content, "second");
        assert_eq!(
            client.complete(request()).await.unwrap().content,
            "mock reply"
        );
    }

    #[tokio::test]
    async fn failing_client_always_errors() {
        let client = MockCompletionClient::failing();
        assert!(client.complete(request()).await.is_err());
        assert!(client.complete(request()).await.is_err());
    }

    #[tokio::test]
    async fn scripted_failure_then_success() {
        let client = MockCompletionClient::new();
        client.push_failure().await;
        client.push_reply("recovered").await;

        assert!(client.complete(request()).await.is_err());
        assert_eq!(
            client.complete(request()).await.unwrap().content,
            "recovered"
        );
    }

    #[tokio::test]
    async fn requests_are_recorded() {
        let client = MockCompletionClient::new();
        client.complete(request()).await.unwrap();
        client.complete(request()).await.unwrap();
        let recorded = client.requests().await;
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].messages[0].content, "hi");
    }
}

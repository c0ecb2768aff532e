// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! DeepSeek chat-completions request/response types.
//!
//! The wire format is the OpenAI-compatible chat-completions JSON: a model,
//! a role/content message array, sampling parameters, and a response with
//! `choices[0].message.content` plus token usage.

use advo_core::types::CompletionMessage;
use serde::{Deserialize, Serialize};

/// A request to the chat-completions endpoint. Streaming is never used.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<CompletionMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub stream: bool,
}

/// A full response from the chat-completions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Model that generated the response; some gateways omit it.
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

/// One completion choice. Only the first is ever used.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

/// The assistant message within a choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: String,
    pub content: String,
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: i64,
    #[serde(default)]
    pub completion_tokens: i64,
    pub total_tokens: i64,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail within an API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    pub message: String,
}

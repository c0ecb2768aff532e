// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion client trait for external chat-completion providers.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{Completion, CompletionRequest};

/// Client for an external chat-completion API.
///
/// The contract is a single bounded attempt: implementations enforce their
/// own deadline and never retry. Callers (the conversation engine) must hold
/// a fallback path for every [`ProviderError`] variant — a provider failure
/// is never allowed to reach the end user.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends one completion request and returns the full response.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError>;
}

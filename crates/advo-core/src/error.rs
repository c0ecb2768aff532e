// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Advo conversation platform.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across all Advo crates and engine operations.
#[derive(Debug, Error)]
pub enum AdvoError {
    /// Bad or missing caller input (empty message, missing contact fields).
    /// User-correctable; maps to a 400 at the HTTP boundary.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced entity (session, lawyer, lead) does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// The operation requires prior state that is not present, e.g.
    /// scheduling a consultation before contact capture.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// External completion provider failure. The conversation engine always
    /// converts this into a fallback reply; it must never reach an API caller.
    #[error("completion provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Failure taxonomy of the external chat-completion call.
///
/// Every variant is recoverable by design: the engine's fallback generator
/// produces a reply whenever the client returns any of these.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No API key was configured; the request was never sent.
    #[error("completion API credential is not configured")]
    CredentialMissing,

    /// The single attempt exceeded the configured deadline.
    #[error("completion request timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Connection failure or a non-success HTTP status from the provider.
    #[error("completion transport failure: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The provider answered 200 but the body was not a usable completion.
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

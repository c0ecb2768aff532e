// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Advo conversation platform.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Advo workspace. The storage backend and
//! the completion provider implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{AdvoError, ProviderError};
pub use traits::{CompletionClient, ConversationStore};

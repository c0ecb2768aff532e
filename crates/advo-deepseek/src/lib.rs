// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! DeepSeek chat-completion provider for the Advo platform.
//!
//! Implements the [`advo_core::CompletionClient`] trait over the
//! OpenAI-compatible chat-completions HTTP API.

pub mod client;
pub mod types;

pub use client::DeepSeekClient;

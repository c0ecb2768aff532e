// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `advo-core::types` for use across
//! crate boundaries. This module re-exports them for convenience within
//! the storage crate.

pub use advo_core::types::{
    ChatConfig, Consultation, Lawyer, Lead, Message, MessageRole, Session, SessionStatus,
};

// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation session engine for the Advo platform.
//!
//! One inbound visitor message in, one assistant reply out: intent
//! classification, contact extraction, office-hours gating, bounded context
//! assembly, a single completion attempt with deterministic fallback, and
//! lead/consultation capture.

pub mod engine;
pub mod extract;
pub mod hours;
pub mod intent;
pub mod prompt;

pub use engine::{
    ContactCapture, ConversationEngine, ScheduledAppointment, StartedSession, TurnOutcome,
    VisitorInfo,
};
pub use prompt::ContactForm;

// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Advo chat widget.
//!
//! Thin REST endpoints over the conversation engine: start-session,
//! send-message, submit-contact, schedule-appointment, end, get-history.
//! All responses use the uniform `{success, ...}` envelope.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, ServerConfig, router, start_server};

// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, CORS, and shared state. The widget is served from the
//! lawyers' marketing sites, so CORS stays permissive.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

use advo_core::AdvoError;
use advo_engine::ConversationEngine;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The conversation engine behind every chat endpoint.
    pub engine: Arc<ConversationEngine>,
}

/// Gateway server configuration (mirrors ServerConfig from advo-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router.
///
/// Routes:
/// - POST /api/chat/start
/// - POST /api/chat/message
/// - POST /api/chat/contact
/// - POST /api/chat/schedule
/// - POST /api/chat/end
/// - GET  /api/chat/history
/// - GET  /health
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/chat/start", post(handlers::post_start))
        .route("/api/chat/message", post(handlers::post_message))
        .route("/api/chat/contact", post(handlers::post_contact))
        .route("/api/chat/schedule", post(handlers::post_schedule))
        .route("/api/chat/end", post(handlers::post_end))
        .route("/api/chat/history", get(handlers::get_history))
        .route("/health", get(handlers::get_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server and serve until the process exits.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), AdvoError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AdvoError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| AdvoError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

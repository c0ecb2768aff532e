// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `advo serve` command implementation.
//!
//! Wires SQLite storage, the DeepSeek completion client and the conversation
//! engine together, then serves the chat widget API.

use std::sync::Arc;

use advo_config::AdvoConfig;
use advo_core::{AdvoError, CompletionClient, ConversationStore};
use advo_deepseek::DeepSeekClient;
use advo_engine::ConversationEngine;
use advo_gateway::{GatewayState, ServerConfig};
use advo_storage::SqliteStore;
use tracing::{info, warn};

/// Runs the `advo serve` command.
pub async fn run_serve(config: AdvoConfig) -> Result<(), AdvoError> {
    init_tracing(&config.app.log_level);
    info!("starting advo serve");

    let store: Arc<dyn ConversationStore> = Arc::new(SqliteStore::open(&config.storage).await?);
    info!(path = %config.storage.database_path, "storage ready");

    if config.deepseek.api_key.is_none() {
        warn!("no DeepSeek API key configured; every reply will use the local fallback");
    }
    let client: Arc<dyn CompletionClient> = Arc::new(DeepSeekClient::new(&config.deepseek)?);

    let engine = Arc::new(ConversationEngine::new(store, client));

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    advo_gateway::start_server(&server_config, GatewayState { engine }).await
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("advo={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

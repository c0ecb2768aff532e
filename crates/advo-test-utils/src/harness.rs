// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end conversation testing.
//!
//! `TestHarness` assembles a complete engine stack: temp SQLite store, mock
//! completion client, and one provisioned lawyer with default chat
//! configuration.

use std::sync::Arc;

use advo_config::model::StorageConfig;
use advo_core::types::{ChatConfig, Language, Lawyer};
use advo_core::{AdvoError, ConversationStore};
use advo_engine::ConversationEngine;
use advo_storage::SqliteStore;

use crate::mock_client::MockCompletionClient;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    replies: Vec<String>,
    failing: bool,
    lawyer_language: Language,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            replies: Vec::new(),
            failing: false,
            lawyer_language: Language::Ru,
        }
    }

    /// Queue mock completion replies.
    pub fn with_replies(mut self, replies: Vec<String>) -> Self {
        self.replies = replies;
        self
    }

    /// Make every completion call fail, forcing the fallback path.
    pub fn with_failing_completions(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Primary language of the provisioned lawyer.
    pub fn with_lawyer_language(mut self, language: Language) -> Self {
        self.lawyer_language = language;
        self
    }

    /// Build the harness: temp SQLite, mock client, one lawyer.
    pub async fn build(self) -> Result<TestHarness, AdvoError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| AdvoError::Storage {
            source: Box::new(e),
        })?;
        let db_path = temp_dir.path().join("test.db");
        let storage_config = StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        };
        let store: Arc<dyn ConversationStore> =
            Arc::new(SqliteStore::open(&storage_config).await?);

        let client = Arc::new(if self.failing {
            MockCompletionClient::failing()
        } else {
            MockCompletionClient::with_replies(self.replies)
        });

        let lawyer = Lawyer {
            id: uuid::Uuid::new_v4().to_string(),
            full_name: "Аида Касымова".to_string(),
            years_experience: 8,
            specialties: vec!["Семейное право".to_string(), "Трудовое право".to_string()],
            consultation_fee: 500,
            phone: "+996700111222".to_string(),
            email: "aida@example.kg".to_string(),
            primary_language: self.lawyer_language,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        store.create_lawyer(&lawyer).await?;

        let engine = Arc::new(ConversationEngine::new(store.clone(), client.clone()));

        Ok(TestHarness {
            engine,
            store,
            client,
            lawyer,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment around the conversation engine.
pub struct TestHarness {
    /// The engine under test.
    pub engine: Arc<ConversationEngine>,
    /// SQLite store (temp DB, cleaned up on drop).
    pub store: Arc<dyn ConversationStore>,
    /// The mock completion client, for scripting outcomes and inspecting
    /// recorded requests.
    pub client: Arc<MockCompletionClient>,
    /// The provisioned lawyer tenant.
    pub lawyer: Lawyer,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Mutate the lawyer's chat configuration (created with defaults if
    /// missing) and persist it.
    pub async fn update_chat_config(
        &self,
        mutate: impl FnOnce(&mut ChatConfig),
    ) -> Result<ChatConfig, AdvoError> {
        let mut config = self.engine.ensure_chat_config(&self.lawyer).await?;
        mutate(&mut config);
        config.updated_at = chrono::Utc::now().to_rfc3339();
        self.store.upsert_chat_config(&config).await?;
        Ok(config)
    }
}

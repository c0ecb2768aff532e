// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the ConversationStore trait.

use async_trait::async_trait;
use tracing::debug;

use advo_config::model::StorageConfig;
use advo_core::types::{
    ChatConfig, Consultation, Lawyer, Lead, Message, MessageRole, Session, SessionStatus,
};
use advo_core::{AdvoError, ConversationStore};

use crate::database::Database;
use crate::queries;

/// SQLite-backed conversation store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Opens the database at the configured path, running migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, AdvoError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite store opened");
        Ok(Self { db })
    }

    /// Returns the underlying database handle (for tests and tooling).
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl ConversationStore for SqliteStore {
    async fn close(&self) -> Result<(), AdvoError> {
        self.db.close().await
    }

    // --- Lawyers ---

    async fn create_lawyer(&self, lawyer: &Lawyer) -> Result<(), AdvoError> {
        queries::lawyers::create_lawyer(&self.db, lawyer).await
    }

    async fn get_lawyer(&self, id: &str) -> Result<Option<Lawyer>, AdvoError> {
        queries::lawyers::get_lawyer(&self.db, id).await
    }

    // --- Sessions ---

    async fn create_session(&self, session: &Session) -> Result<(), AdvoError> {
        queries::sessions::create_session(&self.db, session).await
    }

    async fn get_session(&self, id: &str) -> Result<Option<Session>, AdvoError> {
        queries::sessions::get_session(&self.db, id).await
    }

    async fn update_session(&self, session: &Session) -> Result<(), AdvoError> {
        queries::sessions::update_session(&self.db, session).await
    }

    async fn list_sessions(
        &self,
        lawyer_id: &str,
        status: Option<SessionStatus>,
    ) -> Result<Vec<Session>, AdvoError> {
        queries::sessions::list_sessions(&self.db, lawyer_id, status).await
    }

    // --- Messages ---

    async fn insert_message(&self, message: &Message) -> Result<(), AdvoError> {
        queries::messages::insert_message(&self.db, message).await
    }

    async fn get_messages(
        &self,
        session_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, AdvoError> {
        queries::messages::get_messages_for_session(&self.db, session_id, limit).await
    }

    async fn count_messages(
        &self,
        session_id: &str,
        role: MessageRole,
    ) -> Result<i64, AdvoError> {
        queries::messages::count_messages(&self.db, session_id, role).await
    }

    async fn update_message_flags(
        &self,
        id: &str,
        is_helpful: bool,
        needs_review: bool,
    ) -> Result<(), AdvoError> {
        queries::messages::update_message_flags(&self.db, id, is_helpful, needs_review).await
    }

    // --- Chat configuration ---

    async fn get_chat_config(&self, lawyer_id: &str) -> Result<Option<ChatConfig>, AdvoError> {
        queries::configs::get_chat_config(&self.db, lawyer_id).await
    }

    async fn upsert_chat_config(&self, config: &ChatConfig) -> Result<(), AdvoError> {
        queries::configs::upsert_chat_config(&self.db, config).await
    }

    // --- Leads & consultations ---

    async fn insert_lead(&self, lead: &Lead) -> Result<(), AdvoError> {
        queries::leads::insert_lead(&self.db, lead).await
    }

    async fn get_lead(&self, id: &str) -> Result<Option<Lead>, AdvoError> {
        queries::leads::get_lead(&self.db, id).await
    }

    async fn find_lead_by_phone(
        &self,
        lawyer_id: &str,
        phone: &str,
    ) -> Result<Option<Lead>, AdvoError> {
        queries::leads::find_lead_by_phone(&self.db, lawyer_id, phone).await
    }

    async fn lead_exists_for_session(&self, session_id: &str) -> Result<bool, AdvoError> {
        queries::leads::lead_exists_for_session(&self.db, session_id).await
    }

    async fn insert_consultation(&self, consultation: &Consultation) -> Result<(), AdvoError> {
        queries::consultations::insert_consultation(&self.db, consultation).await
    }

    async fn get_consultation(&self, id: &str) -> Result<Option<Consultation>, AdvoError> {
        queries::consultations::get_consultation(&self.db, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advo_core::types::Language;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn full_session_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let store = SqliteStore::open(&make_config(db_path.to_str().unwrap()))
            .await
            .unwrap();

        let lawyer = Lawyer {
            id: "law-1".to_string(),
            full_name: "Aida".to_string(),
            years_experience: 8,
            specialties: vec!["Семейное право".to_string()],
            consultation_fee: 500,
            phone: "+996700111222".to_string(),
            email: "aida@example.kg".to_string(),
            primary_language: Language::Ru,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        store.create_lawyer(&lawyer).await.unwrap();

        let session = Session {
            id: "sess-1".to_string(),
            lawyer_id: "law-1".to_string(),
            status: SessionStatus::Active,
            visitor_name: None,
            visitor_phone: None,
            visitor_email: None,
            visitor_ip: None,
            user_agent: None,
            referrer: None,
            language: Language::Ru,
            legal_category: None,
            consultation_requested: false,
            started_at: "2026-01-01T00:00:01.000Z".to_string(),
            ended_at: None,
            last_activity: "2026-01-01T00:00:01.000Z".to_string(),
        };
        store.create_session(&session).await.unwrap();

        let m1 = Message {
            id: "m1".to_string(),
            session_id: "sess-1".to_string(),
            role: MessageRole::User,
            content: "hello".to_string(),
            model: None,
            latency_ms: None,
            tokens_used: None,
            is_helpful: false,
            needs_review: false,
            created_at: "2026-01-01T00:00:02.000Z".to_string(),
        };
        let m2 = Message {
            id: "m2".to_string(),
            role: MessageRole::Assistant,
            content: "hi there".to_string(),
            model: Some("deepseek-chat".to_string()),
            latency_ms: Some(412),
            tokens_used: Some(57),
            ..m1.clone()
        };
        store.insert_message(&m1).await.unwrap();
        store.insert_message(&m2).await.unwrap();

        let messages = store.get_messages("sess-1", None).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].latency_ms, Some(412));

        let mut updated = store.get_session("sess-1").await.unwrap().unwrap();
        updated.status = SessionStatus::Ended;
        store.update_session(&updated).await.unwrap();
        let ended = store
            .list_sessions("law-1", Some(SessionStatus::Ended))
            .await
            .unwrap();
        assert_eq!(ended.len(), 1);

        store.close().await.unwrap();
    }
}

// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage trait for the conversation persistence backend.

use async_trait::async_trait;

use crate::error::AdvoError;
use crate::types::{
    ChatConfig, Consultation, Lawyer, Lead, Message, MessageRole, Session, SessionStatus,
};

/// Persistence operations required by the conversation engine.
///
/// Implementations own the full entity graph: lawyers, sessions with their
/// messages (cascade-deleted), per-lawyer chat configuration, leads, and
/// consultations. All session state lives here — engine instances hold no
/// mutable in-process state and concurrent sessions are independent.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Flushes pending writes and releases the backend.
    async fn close(&self) -> Result<(), AdvoError>;

    // --- Lawyers ---

    async fn create_lawyer(&self, lawyer: &Lawyer) -> Result<(), AdvoError>;

    async fn get_lawyer(&self, id: &str) -> Result<Option<Lawyer>, AdvoError>;

    // --- Sessions ---

    async fn create_session(&self, session: &Session) -> Result<(), AdvoError>;

    async fn get_session(&self, id: &str) -> Result<Option<Session>, AdvoError>;

    /// Writes back every mutable session column (contact fields, category,
    /// status, timestamps). The append-only message log is untouched.
    async fn update_session(&self, session: &Session) -> Result<(), AdvoError>;

    async fn list_sessions(
        &self,
        lawyer_id: &str,
        status: Option<SessionStatus>,
    ) -> Result<Vec<Session>, AdvoError>;

    // --- Messages ---

    async fn insert_message(&self, message: &Message) -> Result<(), AdvoError>;

    /// Messages of a session in chronological order, optionally capped.
    async fn get_messages(
        &self,
        session_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, AdvoError>;

    async fn count_messages(
        &self,
        session_id: &str,
        role: MessageRole,
    ) -> Result<i64, AdvoError>;

    /// Updates the quality flags — the only mutation the message log allows.
    async fn update_message_flags(
        &self,
        id: &str,
        is_helpful: bool,
        needs_review: bool,
    ) -> Result<(), AdvoError>;

    // --- Chat configuration ---

    async fn get_chat_config(&self, lawyer_id: &str) -> Result<Option<ChatConfig>, AdvoError>;

    /// Inserts or replaces the single configuration row of a lawyer.
    async fn upsert_chat_config(&self, config: &ChatConfig) -> Result<(), AdvoError>;

    // --- Leads & consultations ---

    async fn insert_lead(&self, lead: &Lead) -> Result<(), AdvoError>;

    async fn get_lead(&self, id: &str) -> Result<Option<Lead>, AdvoError>;

    /// Most recent lead of a lawyer with the given phone number, the
    /// dedup key used by appointment scheduling.
    async fn find_lead_by_phone(
        &self,
        lawyer_id: &str,
        phone: &str,
    ) -> Result<Option<Lead>, AdvoError>;

    /// True if any lead references the session.
    async fn lead_exists_for_session(&self, session_id: &str) -> Result<bool, AdvoError>;

    async fn insert_consultation(&self, consultation: &Consultation) -> Result<(), AdvoError>;

    async fn get_consultation(&self, id: &str) -> Result<Option<Consultation>, AdvoError>;
}

// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message log operations. The log is append-only: rows are inserted and
//! read in chronological order; only the quality flags are ever updated.

use advo_core::AdvoError;
use advo_core::types::MessageRole;
use rusqlite::params;

use crate::database::Database;
use crate::models::Message;

const MESSAGE_COLUMNS: &str = "id, session_id, role, content, model, latency_ms, tokens_used,
                               is_helpful, needs_review, created_at";

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let role: String = row.get(2)?;
    Ok(Message {
        id: row.get(0)?,
        session_id: row.get(1)?,
        role: super::parse_enum(&role, "message role")?,
        content: row.get(3)?,
        model: row.get(4)?,
        latency_ms: row.get(5)?,
        tokens_used: row.get(6)?,
        is_helpful: row.get(7)?,
        needs_review: row.get(8)?,
        created_at: row.get(9)?,
    })
}

/// Insert a new message.
pub async fn insert_message(db: &Database, msg: &Message) -> Result<(), AdvoError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (id, session_id, role, content, model, latency_ms,
                                       tokens_used, is_helpful, needs_review, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    msg.id,
                    msg.session_id,
                    msg.role.to_string(),
                    msg.content,
                    msg.model,
                    msg.latency_ms,
                    msg.tokens_used,
                    msg.is_helpful,
                    msg.needs_review,
                    msg.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get messages for a session in chronological order.
///
/// A negative or absent limit returns the full log; insertion order breaks
/// ties between equal timestamps.
pub async fn get_messages_for_session(
    db: &Database,
    session_id: &str,
    limit: Option<i64>,
) -> Result<Vec<Message>, AdvoError> {
    let session_id = session_id.to_string();
    let limit = limit.unwrap_or(-1);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages WHERE session_id = ?1
                 ORDER BY created_at ASC, rowid ASC LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![session_id, limit], row_to_message)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count a session's messages with the given role.
pub async fn count_messages(
    db: &Database,
    session_id: &str,
    role: MessageRole,
) -> Result<i64, AdvoError> {
    let session_id = session_id.to_string();
    let role = role.to_string();
    db.connection()
        .call(move |conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM messages WHERE session_id = ?1 AND role = ?2",
                params![session_id, role],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update the quality flags of a message.
pub async fn update_message_flags(
    db: &Database,
    id: &str,
    is_helpful: bool,
    needs_review: bool,
) -> Result<(), AdvoError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE messages SET is_helpful = ?1, needs_review = ?2 WHERE id = ?3",
                params![is_helpful, needs_review, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session CRUD operations.

use advo_core::AdvoError;
use advo_core::types::SessionStatus;
use rusqlite::params;

use crate::database::Database;
use crate::models::Session;

const SESSION_COLUMNS: &str = "id, lawyer_id, status, visitor_name, visitor_phone, visitor_email,
                               visitor_ip, user_agent, referrer, language, legal_category,
                               consultation_requested, started_at, ended_at, last_activity";

fn row_to_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<Session> {
    let status: String = row.get(2)?;
    let language: String = row.get(9)?;
    let legal_category: Option<String> = row.get(10)?;
    Ok(Session {
        id: row.get(0)?,
        lawyer_id: row.get(1)?,
        status: super::parse_enum(&status, "session status")?,
        visitor_name: row.get(3)?,
        visitor_phone: row.get(4)?,
        visitor_email: row.get(5)?,
        visitor_ip: row.get(6)?,
        user_agent: row.get(7)?,
        referrer: row.get(8)?,
        language: super::parse_enum(&language, "session language")?,
        legal_category: legal_category
            .map(|c| super::parse_enum(&c, "legal category"))
            .transpose()?,
        consultation_requested: row.get(11)?,
        started_at: row.get(12)?,
        ended_at: row.get(13)?,
        last_activity: row.get(14)?,
    })
}

/// Create a new session.
pub async fn create_session(db: &Database, session: &Session) -> Result<(), AdvoError> {
    let session = session.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sessions (id, lawyer_id, status, visitor_name, visitor_phone,
                                       visitor_email, visitor_ip, user_agent, referrer, language,
                                       legal_category, consultation_requested, started_at,
                                       ended_at, last_activity)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    session.id,
                    session.lawyer_id,
                    session.status.to_string(),
                    session.visitor_name,
                    session.visitor_phone,
                    session.visitor_email,
                    session.visitor_ip,
                    session.user_agent,
                    session.referrer,
                    session.language.to_string(),
                    session.legal_category.map(|c| c.to_string()),
                    session.consultation_requested,
                    session.started_at,
                    session.ended_at,
                    session.last_activity,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a session by ID.
pub async fn get_session(db: &Database, id: &str) -> Result<Option<Session>, AdvoError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_session);
            match result {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Write back every mutable session column.
pub async fn update_session(db: &Database, session: &Session) -> Result<(), AdvoError> {
    let session = session.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE sessions
                 SET status = ?1, visitor_name = ?2, visitor_phone = ?3, visitor_email = ?4,
                     legal_category = ?5, consultation_requested = ?6, ended_at = ?7,
                     last_activity = ?8
                 WHERE id = ?9",
                params![
                    session.status.to_string(),
                    session.visitor_name,
                    session.visitor_phone,
                    session.visitor_email,
                    session.legal_category.map(|c| c.to_string()),
                    session.consultation_requested,
                    session.ended_at,
                    session.last_activity,
                    session.id,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List a lawyer's sessions, newest first, optionally filtered by status.
pub async fn list_sessions(
    db: &Database,
    lawyer_id: &str,
    status: Option<SessionStatus>,
) -> Result<Vec<Session>, AdvoError> {
    let lawyer_id = lawyer_id.to_string();
    let status = status.map(|s| s.to_string());
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM sessions
                 WHERE lawyer_id = ?1 AND (?2 IS NULL OR status = ?2)
                 ORDER BY started_at DESC"
            ))?;
            let rows = stmt.query_map(params![lawyer_id, status], row_to_session)?;
            let mut sessions = Vec::new();
            for row in rows {
                sessions.push(row?);
            }
            Ok(sessions)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

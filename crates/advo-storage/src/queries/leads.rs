// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lead persistence. Leads are independent of their originating session
//! after creation; `session_id` is a plain reference, not a cascade.

use advo_core::AdvoError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Lead;

const LEAD_COLUMNS: &str = "id, lawyer_id, session_id, name, phone, email, legal_category,
                            case_description, source, status, priority, created_at";

fn row_to_lead(row: &rusqlite::Row<'_>) -> rusqlite::Result<Lead> {
    let source: String = row.get(8)?;
    let status: String = row.get(9)?;
    let priority: String = row.get(10)?;
    Ok(Lead {
        id: row.get(0)?,
        lawyer_id: row.get(1)?,
        session_id: row.get(2)?,
        name: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
        legal_category: row.get(6)?,
        case_description: row.get(7)?,
        source: super::parse_enum(&source, "lead source")?,
        status: super::parse_enum(&status, "lead status")?,
        priority: super::parse_enum(&priority, "lead priority")?,
        created_at: row.get(11)?,
    })
}

/// Insert a new lead.
pub async fn insert_lead(db: &Database, lead: &Lead) -> Result<(), AdvoError> {
    let lead = lead.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO leads (id, lawyer_id, session_id, name, phone, email,
                                    legal_category, case_description, source, status,
                                    priority, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    lead.id,
                    lead.lawyer_id,
                    lead.session_id,
                    lead.name,
                    lead.phone,
                    lead.email,
                    lead.legal_category,
                    lead.case_description,
                    lead.source.to_string(),
                    lead.status.to_string(),
                    lead.priority.to_string(),
                    lead.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a lead by ID.
pub async fn get_lead(db: &Database, id: &str) -> Result<Option<Lead>, AdvoError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], row_to_lead);
            match result {
                Ok(lead) => Ok(Some(lead)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Most recent lead of a lawyer with the given phone number.
pub async fn find_lead_by_phone(
    db: &Database,
    lawyer_id: &str,
    phone: &str,
) -> Result<Option<Lead>, AdvoError> {
    let lawyer_id = lawyer_id.to_string();
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LEAD_COLUMNS} FROM leads
                 WHERE lawyer_id = ?1 AND phone = ?2
                 ORDER BY created_at DESC, rowid DESC LIMIT 1"
            ))?;
            let result = stmt.query_row(params![lawyer_id, phone], row_to_lead);
            match result {
                Ok(lead) => Ok(Some(lead)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// True if any lead references the session.
pub async fn lead_exists_for_session(db: &Database, session_id: &str) -> Result<bool, AdvoError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM leads WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

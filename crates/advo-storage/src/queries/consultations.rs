// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consultation persistence.

use advo_core::AdvoError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Consultation;

const CONSULTATION_COLUMNS: &str = "id, lead_id, lawyer_id, scheduled_time, duration_minutes,
                                    consultation_type, status, meeting_method, created_at";

fn row_to_consultation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Consultation> {
    let consultation_type: String = row.get(5)?;
    let status: String = row.get(6)?;
    let meeting_method: String = row.get(7)?;
    Ok(Consultation {
        id: row.get(0)?,
        lead_id: row.get(1)?,
        lawyer_id: row.get(2)?,
        scheduled_time: row.get(3)?,
        duration_minutes: row.get(4)?,
        consultation_type: super::parse_enum(&consultation_type, "consultation type")?,
        status: super::parse_enum(&status, "consultation status")?,
        meeting_method: super::parse_enum(&meeting_method, "meeting method")?,
        created_at: row.get(8)?,
    })
}

/// Insert a new consultation.
pub async fn insert_consultation(
    db: &Database,
    consultation: &Consultation,
) -> Result<(), AdvoError> {
    let consultation = consultation.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO consultations (id, lead_id, lawyer_id, scheduled_time,
                                            duration_minutes, consultation_type, status,
                                            meeting_method, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    consultation.id,
                    consultation.lead_id,
                    consultation.lawyer_id,
                    consultation.scheduled_time,
                    consultation.duration_minutes,
                    consultation.consultation_type.to_string(),
                    consultation.status.to_string(),
                    consultation.meeting_method.to_string(),
                    consultation.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a consultation by ID.
pub async fn get_consultation(
    db: &Database,
    id: &str,
) -> Result<Option<Consultation>, AdvoError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONSULTATION_COLUMNS} FROM consultations WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_consultation);
            match result {
                Ok(consultation) => Ok(Some(consultation)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

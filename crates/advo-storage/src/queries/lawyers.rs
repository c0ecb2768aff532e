// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lawyer tenant CRUD operations.

use advo_core::AdvoError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Lawyer;

fn row_to_lawyer(row: &rusqlite::Row<'_>) -> rusqlite::Result<Lawyer> {
    let specialties: String = row.get(3)?;
    let language: String = row.get(7)?;
    Ok(Lawyer {
        id: row.get(0)?,
        full_name: row.get(1)?,
        years_experience: row.get(2)?,
        specialties: super::parse_json(&specialties, "lawyer specialties")?,
        consultation_fee: row.get(4)?,
        phone: row.get(5)?,
        email: row.get(6)?,
        primary_language: super::parse_enum(&language, "lawyer language")?,
        created_at: row.get(8)?,
    })
}

const LAWYER_COLUMNS: &str = "id, full_name, years_experience, specialties, consultation_fee,
                              phone, email, primary_language, created_at";

/// Create a new lawyer tenant.
pub async fn create_lawyer(db: &Database, lawyer: &Lawyer) -> Result<(), AdvoError> {
    let lawyer = lawyer.clone();
    let specialties = serde_json::to_string(&lawyer.specialties)
        .map_err(|e| AdvoError::Internal(format!("serialize specialties: {e}")))?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO lawyers (id, full_name, years_experience, specialties,
                                      consultation_fee, phone, email, primary_language, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    lawyer.id,
                    lawyer.full_name,
                    lawyer.years_experience,
                    specialties,
                    lawyer.consultation_fee,
                    lawyer.phone,
                    lawyer.email,
                    lawyer.primary_language.to_string(),
                    lawyer.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a lawyer by ID.
pub async fn get_lawyer(db: &Database, id: &str) -> Result<Option<Lawyer>, AdvoError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LAWYER_COLUMNS} FROM lawyers WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_lawyer);
            match result {
                Ok(lawyer) => Ok(Some(lawyer)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-lawyer chat configuration. At most one row per lawyer; the engine
//! creates it lazily with defaults on first use.

use advo_core::AdvoError;
use rusqlite::params;

use crate::database::Database;
use crate::models::ChatConfig;

const CONFIG_COLUMNS: &str = "lawyer_id, model, system_prompt, max_tokens, temperature,
                              collect_contact_info, auto_suggest_consultation,
                              welcome_message_ru, welcome_message_ky, welcome_message_en,
                              office_hours_enabled, office_hours, offline_message,
                              created_at, updated_at";

fn row_to_config(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatConfig> {
    let office_hours: String = row.get(11)?;
    Ok(ChatConfig {
        lawyer_id: row.get(0)?,
        model: row.get(1)?,
        system_prompt: row.get(2)?,
        max_tokens: row.get(3)?,
        temperature: row.get(4)?,
        collect_contact_info: row.get(5)?,
        auto_suggest_consultation: row.get(6)?,
        welcome_message_ru: row.get(7)?,
        welcome_message_ky: row.get(8)?,
        welcome_message_en: row.get(9)?,
        office_hours_enabled: row.get(10)?,
        office_hours: super::parse_json(&office_hours, "office hours")?,
        offline_message: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

/// Get the chat configuration of a lawyer.
pub async fn get_chat_config(
    db: &Database,
    lawyer_id: &str,
) -> Result<Option<ChatConfig>, AdvoError> {
    let lawyer_id = lawyer_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONFIG_COLUMNS} FROM chat_configs WHERE lawyer_id = ?1"
            ))?;
            let result = stmt.query_row(params![lawyer_id], row_to_config);
            match result {
                Ok(config) => Ok(Some(config)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert or replace the single configuration row of a lawyer.
pub async fn upsert_chat_config(db: &Database, config: &ChatConfig) -> Result<(), AdvoError> {
    let config = config.clone();
    let office_hours = serde_json::to_string(&config.office_hours)
        .map_err(|e| AdvoError::Internal(format!("serialize office hours: {e}")))?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO chat_configs
                     (lawyer_id, model, system_prompt, max_tokens, temperature,
                      collect_contact_info, auto_suggest_consultation,
                      welcome_message_ru, welcome_message_ky, welcome_message_en,
                      office_hours_enabled, office_hours, offline_message,
                      created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    config.lawyer_id,
                    config.model,
                    config.system_prompt,
                    config.max_tokens,
                    config.temperature,
                    config.collect_contact_info,
                    config.auto_suggest_consultation,
                    config.welcome_message_ru,
                    config.welcome_message_ky,
                    config.welcome_message_en,
                    config.office_hours_enabled,
                    office_hours,
                    config.offline_message,
                    config.created_at,
                    config.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

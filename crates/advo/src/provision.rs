// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `advo provision` command implementation.
//!
//! The explicit account-provisioning factory: creates a lawyer tenant and
//! its default chat configuration in one step. Nothing else in the system
//! creates lawyers.

use advo_config::AdvoConfig;
use advo_core::types::{ChatConfig, Language, Lawyer};
use advo_core::{AdvoError, ConversationStore};
use advo_storage::SqliteStore;
use clap::Args;

/// Arguments for `advo provision`.
#[derive(Debug, Args)]
pub struct ProvisionArgs {
    /// Full name of the lawyer.
    #[arg(long)]
    pub name: String,

    /// Years of professional experience.
    #[arg(long, default_value_t = 0)]
    pub years_experience: u32,

    /// Practice areas; repeat for multiple.
    #[arg(long = "specialty")]
    pub specialties: Vec<String>,

    /// Consultation fee in som (0 = first consultation free).
    #[arg(long, default_value_t = 0)]
    pub fee: i64,

    /// Contact phone shown to visitors.
    #[arg(long, default_value = "")]
    pub phone: String,

    /// Contact email shown to visitors.
    #[arg(long, default_value = "")]
    pub email: String,

    /// Primary widget language: ru, ky or en.
    #[arg(long, default_value = "ru")]
    pub language: String,
}

/// Runs the `advo provision` command.
pub async fn run_provision(config: AdvoConfig, args: ProvisionArgs) -> Result<(), AdvoError> {
    let language: Language = args.language.parse().map_err(|_| {
        AdvoError::Validation(format!(
            "unknown language `{}` (expected ru, ky or en)",
            args.language
        ))
    })?;

    let store = SqliteStore::open(&config.storage).await?;

    let now = chrono::Utc::now().to_rfc3339();
    let lawyer = Lawyer {
        id: uuid::Uuid::new_v4().to_string(),
        full_name: args.name,
        years_experience: args.years_experience,
        specialties: args.specialties,
        consultation_fee: args.fee,
        phone: args.phone,
        email: args.email,
        primary_language: language,
        created_at: now.clone(),
    };
    store.create_lawyer(&lawyer).await?;
    store
        .upsert_chat_config(&ChatConfig::defaults(&lawyer.id, &now))
        .await?;
    store.close().await?;

    println!("lawyer provisioned: {}", lawyer.id);
    Ok(())
}

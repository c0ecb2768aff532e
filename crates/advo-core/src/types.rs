// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Advo workspace.
//!
//! All string-backed enums are closed `strum` enums; the database stores
//! their `Display` form and parses it back via `FromStr`. Timestamps are
//! RFC 3339 strings, matching the TEXT columns in storage.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Supported widget languages. Defaults to Russian, the primary market
/// language; unknown codes fall back to it at parse sites.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    Ky,
    En,
}

/// Lifecycle states of a chat session. `Ended` and `Transferred` are
/// terminal: no operation transitions out of them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Ended,
    Transferred,
}

/// Author of a chat message. One closed enum: engine-generated texts are
/// `Assistant` rows distinguished by their model marker, never a separate
/// role string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    System,
    Lawyer,
}

/// Legal practice areas a conversation can be classified into.
///
/// The serialized form is the Russian display name, which is what the
/// product stores and shows to lawyers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum LegalCategory {
    #[strum(serialize = "Семейное право")]
    #[serde(rename = "Семейное право")]
    Family,
    #[strum(serialize = "Трудовое право")]
    #[serde(rename = "Трудовое право")]
    Labor,
    #[strum(serialize = "Гражданское право")]
    #[serde(rename = "Гражданское право")]
    Civil,
    #[strum(serialize = "Административное право")]
    #[serde(rename = "Административное право")]
    Administrative,
    #[strum(serialize = "Наследственное право")]
    #[serde(rename = "Наследственное право")]
    Inheritance,
    #[strum(serialize = "Общая практика")]
    #[serde(rename = "Общая практика")]
    General,
}

/// Sales pipeline state of a lead.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Converted,
    Lost,
    Spam,
}

/// Follow-up priority of a lead.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeadPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Where a lead came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    Chatbot,
    WebsiteChat,
    WebsiteForm,
    Phone,
    Email,
    Referral,
    Other,
}

/// Lifecycle states of a scheduled consultation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConsultationStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
    Rescheduled,
}

/// Billing category of a consultation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConsultationType {
    #[default]
    Free,
    Paid,
    FollowUp,
    Emergency,
}

/// How a consultation is held.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MeetingMethod {
    #[default]
    InPerson,
    Phone,
    Video,
}

// --- Tenant ---

/// A lawyer tenant. Read-only input to the conversation engine; created
/// only through the explicit provisioning factory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lawyer {
    pub id: String,
    pub full_name: String,
    pub years_experience: u32,
    /// Practice areas shown in the system prompt, e.g. "Семейное право".
    pub specialties: Vec<String>,
    /// Consultation fee in som. Zero means the first consultation is free.
    pub consultation_fee: i64,
    pub phone: String,
    pub email: String,
    pub primary_language: Language,
    pub created_at: String,
}

// --- Session & messages ---

/// One visitor's ongoing chat conversation with a lawyer's assistant.
///
/// Contact fields fill in over time: heuristic extraction is
/// first-write-wins per field, an explicit contact submission overwrites.
/// `legal_category` is set at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub lawyer_id: String,
    pub status: SessionStatus,
    pub visitor_name: Option<String>,
    pub visitor_phone: Option<String>,
    pub visitor_email: Option<String>,
    pub visitor_ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub language: Language,
    pub legal_category: Option<LegalCategory>,
    pub consultation_requested: bool,
    pub started_at: String,
    pub ended_at: Option<String>,
    pub last_activity: String,
}

/// Model marker for engine-generated assistant rows (welcome, offline and
/// confirmation texts). Rows with this marker never enter the AI context.
pub const MODEL_MARKER_SYSTEM: &str = "system";

/// Model marker for deterministic fallback replies produced when the
/// completion call fails.
pub const MODEL_MARKER_FALLBACK: &str = "fallback";

/// A single message within a session. Append-only; only the quality flags
/// are ever mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
    /// Model that produced an assistant row: the configured model name for
    /// real completions, [`MODEL_MARKER_SYSTEM`] or [`MODEL_MARKER_FALLBACK`]
    /// for canned texts. `None` for user/lawyer rows.
    pub model: Option<String>,
    pub latency_ms: Option<i64>,
    pub tokens_used: Option<i64>,
    pub is_helpful: bool,
    pub needs_review: bool,
    pub created_at: String,
}

impl Message {
    /// True for assistant rows generated locally (welcome, offline,
    /// confirmation, fallback) rather than by the completion provider.
    pub fn is_canned(&self) -> bool {
        matches!(
            self.model.as_deref(),
            Some(MODEL_MARKER_SYSTEM) | Some(MODEL_MARKER_FALLBACK)
        )
    }
}

// --- Per-lawyer chat configuration ---

/// Opening and closing time of one weekday, "HH:MM" 24-hour strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub enabled: bool,
    pub start: String,
    pub end: String,
}

/// Weekly office-hours table. A missing or disabled day is closed.
/// Stored as JSON in the chat configuration row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<DaySchedule>,
}

/// Per-lawyer chat behavior settings. At most one row per lawyer, created
/// lazily with defaults on first use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub lawyer_id: String,
    pub model: String,
    /// Overrides the built-in system prompt template when set.
    pub system_prompt: Option<String>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub collect_contact_info: bool,
    pub auto_suggest_consultation: bool,
    pub welcome_message_ru: Option<String>,
    pub welcome_message_ky: Option<String>,
    pub welcome_message_en: Option<String>,
    pub office_hours_enabled: bool,
    pub office_hours: WeeklySchedule,
    pub offline_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ChatConfig {
    /// Default settings for a freshly provisioned lawyer.
    pub fn defaults(lawyer_id: &str, now: &str) -> Self {
        Self {
            lawyer_id: lawyer_id.to_string(),
            model: "deepseek-chat".to_string(),
            system_prompt: None,
            max_tokens: 300,
            temperature: 0.7,
            collect_contact_info: true,
            auto_suggest_consultation: true,
            welcome_message_ru: None,
            welcome_message_ky: None,
            welcome_message_en: None,
            office_hours_enabled: false,
            office_hours: WeeklySchedule::default(),
            offline_message: None,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    /// Configured welcome message for a language, if any.
    pub fn welcome_message(&self, language: Language) -> Option<&str> {
        match language {
            Language::Ru => self.welcome_message_ru.as_deref(),
            Language::Ky => self.welcome_message_ky.as_deref(),
            Language::En => self.welcome_message_en.as_deref(),
        }
    }
}

// --- Leads & consultations ---

/// A contact record representing sales interest, derived from a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub lawyer_id: String,
    /// Set when the lead was derived from a chat session.
    pub session_id: Option<String>,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub legal_category: Option<String>,
    pub case_description: String,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub priority: LeadPriority,
    pub created_at: String,
}

/// A scheduled meeting between a lawyer and a lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consultation {
    pub id: String,
    pub lead_id: String,
    pub lawyer_id: String,
    /// Local wall-clock instant, "YYYY-MM-DDTHH:MM:00".
    pub scheduled_time: String,
    pub duration_minutes: u32,
    pub consultation_type: ConsultationType,
    pub status: ConsultationStatus,
    pub meeting_method: MeetingMethod,
    pub created_at: String,
}

// --- Completion provider boundary ---

/// One role/content pair in the completion request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionMessage {
    /// Wire role: "system", "user" or "assistant".
    pub role: String,
    pub content: String,
}

impl CompletionMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// A request to the external chat-completion provider.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<CompletionMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// A successful completion, with the metadata persisted on assistant rows.
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub model: String,
    pub latency_ms: i64,
    pub total_tokens: Option<i64>,
}

// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversation session engine.
//!
//! Turns one inbound visitor message into one outbound assistant message,
//! updating session state and triggering lead capture as a side effect.
//! Every completion failure is absorbed into a deterministic fallback reply;
//! the only errors surfaced to callers are validation, not-found and
//! precondition failures.

use std::sync::Arc;

use advo_core::types::{
    ChatConfig, CompletionMessage, CompletionRequest, Consultation, ConsultationStatus,
    ConsultationType, Lawyer, Lead, LeadPriority, LeadSource, LeadStatus, MeetingMethod, Message,
    MessageRole, Session, SessionStatus, MODEL_MARKER_FALLBACK, MODEL_MARKER_SYSTEM,
};
use advo_core::{AdvoError, CompletionClient, ConversationStore};
use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::intent::{self, IntentTag};
use crate::prompt::{self, ContactForm};
use crate::{extract, hours};

/// Number of prior messages included in the completion context.
const CONTEXT_MESSAGES: usize = 6;
/// Character cap on derived case descriptions.
const CASE_DESCRIPTION_MAX: usize = 1000;
/// Default duration of a scheduled consultation.
const DEFAULT_CONSULTATION_MINUTES: u32 = 60;
/// Lead category used when a session never got classified.
const DEFAULT_LEAD_CATEGORY: &str = "Общая консультация";

/// Request metadata captured from the visitor's browser at session start.
#[derive(Debug, Clone, Default)]
pub struct VisitorInfo {
    pub name: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

/// Result of starting a session: the session row plus the welcome text.
#[derive(Debug, Clone)]
pub struct StartedSession {
    pub session: Session,
    pub welcome: String,
}

/// Result of one conversation turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    /// True when office hours suppressed the completion call.
    pub offline: bool,
    pub should_collect_contact: bool,
    pub contact_form: Option<ContactForm>,
}

/// Result of an explicit contact submission.
#[derive(Debug, Clone)]
pub struct ContactCapture {
    pub lead: Lead,
    pub confirmation: String,
}

/// Result of scheduling an appointment.
#[derive(Debug, Clone)]
pub struct ScheduledAppointment {
    pub consultation: Consultation,
    pub confirmation: String,
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn user_message(session_id: &str, content: &str) -> Message {
    Message {
        id: new_id(),
        session_id: session_id.to_string(),
        role: MessageRole::User,
        content: content.to_string(),
        model: None,
        latency_ms: None,
        tokens_used: None,
        is_helpful: false,
        needs_review: false,
        created_at: now_rfc3339(),
    }
}

fn canned_assistant(session_id: &str, content: &str, marker: &str) -> Message {
    Message {
        id: new_id(),
        session_id: session_id.to_string(),
        role: MessageRole::Assistant,
        content: content.to_string(),
        model: Some(marker.to_string()),
        latency_ms: None,
        tokens_used: None,
        is_helpful: false,
        needs_review: false,
        created_at: now_rfc3339(),
    }
}

/// Orchestrates sessions, completion calls, extraction and lead capture.
///
/// Holds no mutable state of its own: concurrent sessions are independent
/// and everything durable lives in the store.
pub struct ConversationEngine {
    store: Arc<dyn ConversationStore>,
    client: Arc<dyn CompletionClient>,
}

impl ConversationEngine {
    pub fn new(store: Arc<dyn ConversationStore>, client: Arc<dyn CompletionClient>) -> Self {
        Self { store, client }
    }

    /// Access to the underlying store (for the gateway and tooling).
    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        &self.store
    }

    async fn require_lawyer(&self, id: &str) -> Result<Lawyer, AdvoError> {
        self.store
            .get_lawyer(id)
            .await?
            .ok_or_else(|| AdvoError::NotFound {
                resource: "lawyer",
                id: id.to_string(),
            })
    }

    async fn require_session(&self, id: &str) -> Result<Session, AdvoError> {
        self.store
            .get_session(id)
            .await?
            .ok_or_else(|| AdvoError::NotFound {
                resource: "session",
                id: id.to_string(),
            })
    }

    /// Get the lawyer's chat configuration, creating it with defaults on
    /// first use.
    pub async fn ensure_chat_config(&self, lawyer: &Lawyer) -> Result<ChatConfig, AdvoError> {
        if let Some(config) = self.store.get_chat_config(&lawyer.id).await? {
            return Ok(config);
        }
        let config = ChatConfig::defaults(&lawyer.id, &now_rfc3339());
        self.store.upsert_chat_config(&config).await?;
        debug!(lawyer_id = %lawyer.id, "chat config created with defaults");
        Ok(config)
    }

    /// Start a new session for a lawyer and append the welcome message.
    ///
    /// Not idempotent: two calls create two independent sessions.
    pub async fn start(
        &self,
        lawyer_id: &str,
        visitor: VisitorInfo,
    ) -> Result<StartedSession, AdvoError> {
        let lawyer = self.require_lawyer(lawyer_id).await?;
        let config = self.ensure_chat_config(&lawyer).await?;

        let now = now_rfc3339();
        let session = Session {
            id: new_id(),
            lawyer_id: lawyer.id.clone(),
            status: SessionStatus::Active,
            visitor_name: visitor.name,
            visitor_phone: None,
            visitor_email: None,
            visitor_ip: visitor.ip,
            user_agent: visitor.user_agent,
            referrer: visitor.referrer,
            language: lawyer.primary_language,
            legal_category: None,
            consultation_requested: false,
            started_at: now.clone(),
            ended_at: None,
            last_activity: now,
        };
        self.store.create_session(&session).await?;

        let welcome = config
            .welcome_message(session.language)
            .map(str::to_string)
            .unwrap_or_else(|| prompt::default_welcome(&lawyer.full_name, session.language));
        self.store
            .insert_message(&canned_assistant(&session.id, &welcome, MODEL_MARKER_SYSTEM))
            .await?;

        info!(session_id = %session.id, lawyer_id = %lawyer.id, "chat session started");
        Ok(StartedSession { session, welcome })
    }

    /// Process one inbound visitor message.
    ///
    /// Appends exactly one user message and exactly one assistant message
    /// (completion, fallback, or offline text) per call.
    pub async fn handle_message(
        &self,
        session_id: &str,
        text: &str,
    ) -> Result<TurnOutcome, AdvoError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AdvoError::Validation(
                "message text must not be empty".to_string(),
            ));
        }

        let mut session = self.require_session(session_id).await?;
        if session.status != SessionStatus::Active {
            return Err(AdvoError::Precondition(format!(
                "session {session_id} is {}, not active",
                session.status
            )));
        }
        let lawyer = self.require_lawyer(&session.lawyer_id).await?;
        let config = self.ensure_chat_config(&lawyer).await?;

        // The visitor's message is persisted first; it survives whatever
        // happens downstream.
        let user_msg = user_message(&session.id, text);
        self.store.insert_message(&user_msg).await?;

        let tags = intent::classify(text, session.language);
        let wants_appointment = tags.contains(&IntentTag::AppointmentRequest);
        if wants_appointment {
            session.consultation_requested = true;
        }
        if tags.contains(&IntentTag::LegalTopic) && session.legal_category.is_none() {
            let category = intent::classify_legal_category(text, session.language);
            debug!(session_id, category = %category, "legal category detected");
            session.legal_category = Some(category);
        }
        if tags.contains(&IntentTag::ContactProvided) {
            let found = extract::contact_details(text);
            // First-write-wins: extraction never overwrites existing fields.
            if session.visitor_phone.is_none() {
                session.visitor_phone = found.phone;
            }
            if session.visitor_email.is_none() {
                session.visitor_email = found.email;
            }
            if session.visitor_name.is_none() {
                session.visitor_name = found.name;
            }
        }

        if config.office_hours_enabled
            && !hours::is_open(&config.office_hours, chrono::Local::now().naive_local())
        {
            let reply = config
                .offline_message
                .clone()
                .unwrap_or_else(|| prompt::offline_default(session.language));
            self.store
                .insert_message(&canned_assistant(&session.id, &reply, MODEL_MARKER_SYSTEM))
                .await?;
            session.last_activity = now_rfc3339();
            self.store.update_session(&session).await?;
            return Ok(TurnOutcome {
                reply,
                offline: true,
                should_collect_contact: false,
                contact_form: None,
            });
        }

        let request = self
            .build_request(&session, &lawyer, &config, &user_msg, text)
            .await?;
        let reply = match self.client.complete(request).await {
            Ok(completion) => {
                let msg = Message {
                    id: new_id(),
                    session_id: session.id.clone(),
                    role: MessageRole::Assistant,
                    content: completion.content.clone(),
                    model: Some(completion.model),
                    latency_ms: Some(completion.latency_ms),
                    tokens_used: completion.total_tokens,
                    is_helpful: false,
                    needs_review: false,
                    created_at: now_rfc3339(),
                };
                self.store.insert_message(&msg).await?;
                completion.content
            }
            Err(err) => {
                // Never surfaced: the fallback reply takes its place.
                warn!(session_id, error = %err, "completion failed, serving fallback reply");
                let fallback = prompt::fallback_reply(text, &lawyer, session.language);
                self.store
                    .insert_message(&canned_assistant(
                        &session.id,
                        &fallback,
                        MODEL_MARKER_FALLBACK,
                    ))
                    .await?;
                fallback
            }
        };

        let should_collect = self
            .should_collect_contact(&session, &config, wants_appointment, &reply)
            .await?;
        let contact_form =
            should_collect.then(|| prompt::contact_form(&lawyer.full_name, session.language));

        session.last_activity = now_rfc3339();
        self.store.update_session(&session).await?;

        Ok(TurnOutcome {
            reply,
            offline: false,
            should_collect_contact: should_collect,
            contact_form,
        })
    }

    /// Assemble the completion request: system prompt, the last prior turns
    /// (excluding canned texts such as the welcome), then the current
    /// message.
    async fn build_request(
        &self,
        session: &Session,
        lawyer: &Lawyer,
        config: &ChatConfig,
        current: &Message,
        text: &str,
    ) -> Result<CompletionRequest, AdvoError> {
        let system = config
            .system_prompt
            .clone()
            .unwrap_or_else(|| prompt::system_prompt(lawyer, session.language));
        let mut messages = vec![CompletionMessage::system(system)];

        let history = self.store.get_messages(&session.id, None).await?;
        let eligible: Vec<&Message> = history
            .iter()
            .filter(|m| m.id != current.id)
            .filter(|m| match m.role {
                MessageRole::User => true,
                MessageRole::Assistant => !m.is_canned(),
                _ => false,
            })
            .collect();
        let start = eligible.len().saturating_sub(CONTEXT_MESSAGES);
        for msg in &eligible[start..] {
            let turn = match msg.role {
                MessageRole::User => CompletionMessage::user(msg.content.clone()),
                _ => CompletionMessage::assistant(msg.content.clone()),
            };
            messages.push(turn);
        }
        messages.push(CompletionMessage::user(text));

        Ok(CompletionRequest {
            model: config.model.clone(),
            messages,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    async fn should_collect_contact(
        &self,
        session: &Session,
        config: &ChatConfig,
        wants_appointment: bool,
        reply: &str,
    ) -> Result<bool, AdvoError> {
        // A phone on file always wins, regardless of keywords.
        if !config.collect_contact_info || session.visitor_phone.is_some() {
            return Ok(false);
        }
        if wants_appointment {
            return Ok(true);
        }
        if !config.auto_suggest_consultation {
            return Ok(false);
        }
        let user_count = self
            .store
            .count_messages(&session.id, MessageRole::User)
            .await?;
        Ok(user_count >= 3 && prompt::has_scheduling_marker(reply, session.language))
    }

    /// Explicit contact submission from the widget form.
    ///
    /// Always creates a fresh lead — duplicates across repeated submissions
    /// are accepted. Scheduling is the deduplicated path, not this one.
    pub async fn submit_contact(
        &self,
        session_id: &str,
        name: &str,
        phone: &str,
        email: Option<&str>,
    ) -> Result<ContactCapture, AdvoError> {
        let name = name.trim();
        let phone = phone.trim();
        if name.is_empty() || phone.is_empty() {
            return Err(AdvoError::Validation(
                "name and phone are required".to_string(),
            ));
        }
        let mut session = self.require_session(session_id).await?;
        let lawyer = self.require_lawyer(&session.lawyer_id).await?;
        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        // An explicit submission overwrites whatever extraction found.
        session.visitor_name = Some(name.to_string());
        session.visitor_phone = Some(phone.to_string());
        session.visitor_email = email.clone();
        session.consultation_requested = true;

        let lead = Lead {
            id: new_id(),
            lawyer_id: lawyer.id.clone(),
            session_id: Some(session.id.clone()),
            name: name.to_string(),
            phone: Some(phone.to_string()),
            email,
            legal_category: Some(DEFAULT_LEAD_CATEGORY.to_string()),
            case_description: format!(
                "Запрос на консультацию через чат-бот. Сессия: {}",
                session.id
            ),
            source: LeadSource::WebsiteChat,
            status: LeadStatus::New,
            priority: LeadPriority::Medium,
            created_at: now_rfc3339(),
        };
        self.store.insert_lead(&lead).await?;

        let confirmation = prompt::contact_confirmation(
            name,
            phone,
            session.visitor_email.as_deref().unwrap_or(""),
            &lawyer.full_name,
            session.language,
        );
        self.store
            .insert_message(&canned_assistant(
                &session.id,
                &confirmation,
                MODEL_MARKER_SYSTEM,
            ))
            .await?;

        session.last_activity = now_rfc3339();
        self.store.update_session(&session).await?;

        info!(session_id = %session.id, lead_id = %lead.id, "lead captured from contact form");
        Ok(ContactCapture { lead, confirmation })
    }

    /// Schedule a consultation for a session that already has contact info.
    ///
    /// The lead is get-or-created by (lawyer, phone) — unlike
    /// [`submit_contact`], repeated scheduling reuses one lead.
    pub async fn schedule_appointment(
        &self,
        session_id: &str,
        date: &str,
        time: &str,
        consultation_type: ConsultationType,
    ) -> Result<ScheduledAppointment, AdvoError> {
        let mut session = self.require_session(session_id).await?;
        let lawyer = self.require_lawyer(&session.lawyer_id).await?;

        let (Some(client_name), Some(phone)) =
            (session.visitor_name.clone(), session.visitor_phone.clone())
        else {
            return Err(AdvoError::Precondition(
                "contact details (name and phone) must be captured before scheduling".to_string(),
            ));
        };

        let scheduled = NaiveDateTime::parse_from_str(
            &format!("{date} {time}"),
            "%Y-%m-%d %H:%M",
        )
        .map_err(|_| {
            AdvoError::Validation(format!(
                "invalid date/time: expected YYYY-MM-DD HH:MM, got `{date} {time}`"
            ))
        })?;

        let category = session
            .legal_category
            .map(|c| c.to_string())
            .unwrap_or_else(|| DEFAULT_LEAD_CATEGORY.to_string());

        let lead = match self.store.find_lead_by_phone(&lawyer.id, &phone).await? {
            Some(existing) => existing,
            None => {
                let lead = Lead {
                    id: new_id(),
                    lawyer_id: lawyer.id.clone(),
                    session_id: Some(session.id.clone()),
                    name: client_name.clone(),
                    phone: Some(phone.clone()),
                    email: session.visitor_email.clone(),
                    legal_category: Some(category.clone()),
                    case_description: format!(
                        "Запись на консультацию через чат-бот. Сессия: {}",
                        session.id
                    ),
                    source: LeadSource::Chatbot,
                    status: LeadStatus::New,
                    priority: LeadPriority::Medium,
                    created_at: now_rfc3339(),
                };
                self.store.insert_lead(&lead).await?;
                lead
            }
        };

        let consultation = Consultation {
            id: new_id(),
            lead_id: lead.id.clone(),
            lawyer_id: lawyer.id.clone(),
            scheduled_time: scheduled.format("%Y-%m-%dT%H:%M:00").to_string(),
            duration_minutes: DEFAULT_CONSULTATION_MINUTES,
            consultation_type,
            status: ConsultationStatus::Scheduled,
            meeting_method: MeetingMethod::InPerson,
            created_at: now_rfc3339(),
        };
        self.store.insert_consultation(&consultation).await?;

        let confirmation = prompt::schedule_confirmation(
            &scheduled,
            &client_name,
            &category,
            &lawyer.full_name,
            session.language,
        );
        self.store
            .insert_message(&canned_assistant(
                &session.id,
                &confirmation,
                MODEL_MARKER_SYSTEM,
            ))
            .await?;

        session.consultation_requested = true;
        session.last_activity = now_rfc3339();
        self.store.update_session(&session).await?;

        info!(
            session_id = %session.id,
            lead_id = %lead.id,
            consultation_id = %consultation.id,
            "consultation scheduled"
        );
        Ok(ScheduledAppointment {
            consultation,
            confirmation,
        })
    }

    /// Close a session. If it qualifies as a lead and none references it
    /// yet, derive one from the visitor's own messages.
    pub async fn end(&self, session_id: &str) -> Result<Option<Lead>, AdvoError> {
        let mut session = self.require_session(session_id).await?;
        if session.status != SessionStatus::Active {
            return Err(AdvoError::Precondition(format!(
                "session {session_id} is {}, not active",
                session.status
            )));
        }

        let now = now_rfc3339();
        session.status = SessionStatus::Ended;
        session.ended_at = Some(now.clone());
        session.last_activity = now;
        self.store.update_session(&session).await?;
        info!(session_id = %session.id, "chat session ended");

        let qualifies = session.visitor_phone.is_some()
            || session.visitor_email.is_some()
            || session.consultation_requested;
        if !qualifies || self.store.lead_exists_for_session(&session.id).await? {
            return Ok(None);
        }

        let messages = self.store.get_messages(&session.id, None).await?;
        let joined = messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let case_description: String = joined.chars().take(CASE_DESCRIPTION_MAX).collect();

        let name = session.visitor_name.clone().unwrap_or_else(|| {
            match &session.visitor_ip {
                Some(ip) => format!("Chat Visitor ({ip})"),
                None => "Chat Visitor".to_string(),
            }
        });
        let lead = Lead {
            id: new_id(),
            lawyer_id: session.lawyer_id.clone(),
            session_id: Some(session.id.clone()),
            name,
            phone: session.visitor_phone.clone(),
            email: session.visitor_email.clone(),
            legal_category: session.legal_category.map(|c| c.to_string()),
            case_description,
            source: LeadSource::Chatbot,
            status: LeadStatus::New,
            priority: LeadPriority::Medium,
            created_at: now_rfc3339(),
        };
        self.store.insert_lead(&lead).await?;
        info!(session_id = %session.id, lead_id = %lead.id, "lead derived from ended session");
        Ok(Some(lead))
    }

    /// Hand the session over to a human. Terminal, like `end`, but without
    /// lead derivation: the human picks the conversation up live.
    pub async fn transfer(&self, session_id: &str) -> Result<(), AdvoError> {
        let mut session = self.require_session(session_id).await?;
        if session.status != SessionStatus::Active {
            return Err(AdvoError::Precondition(format!(
                "session {session_id} is {}, not active",
                session.status
            )));
        }
        session.status = SessionStatus::Transferred;
        session.last_activity = now_rfc3339();
        self.store.update_session(&session).await?;
        info!(session_id = %session.id, "chat session transferred to lawyer");
        Ok(())
    }

    /// Full message history plus session info, for the widget.
    pub async fn history(
        &self,
        session_id: &str,
    ) -> Result<(Session, Vec<Message>), AdvoError> {
        let session = self.require_session(session_id).await?;
        let messages = self.store.get_messages(session_id, None).await?;
        Ok((session, messages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advo_core::types::{DaySchedule, Language, LegalCategory, WeeklySchedule};
    use advo_test_utils::{TestHarness, VisitorInfo};

    async fn started(harness: &TestHarness) -> Session {
        harness
            .engine
            .start(&harness.lawyer.id, VisitorInfo::default())
            .await
            .unwrap()
            .session
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let harness = TestHarness::builder().build().await.unwrap();
        let session = started(&harness).await;
        let err = harness
            .engine
            .handle_message(&session.id, "   \n  ")
            .await
            .unwrap_err();
        assert!(matches!(err, AdvoError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found_and_writes_nothing() {
        let harness = TestHarness::builder().build().await.unwrap();
        let err = harness
            .engine
            .handle_message("no-such-session", "привет")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AdvoError::NotFound {
                resource: "session",
                ..
            }
        ));
        let messages = harness
            .store
            .get_messages("no-such-session", None)
            .await
            .unwrap();
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn turn_appends_exactly_one_user_and_one_assistant() {
        let harness = TestHarness::builder()
            .with_replies(vec!["ответ".to_string()])
            .build()
            .await
            .unwrap();
        let session = started(&harness).await;

        harness
            .engine
            .handle_message(&session.id, "Здравствуйте")
            .await
            .unwrap();

        let messages = harness.store.get_messages(&session.id, None).await.unwrap();
        // Welcome + exactly one user + one assistant.
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[1].content, "Здравствуйте");
        assert_eq!(messages[2].role, MessageRole::Assistant);
        assert_eq!(messages[2].content, "ответ");
        assert_eq!(messages[2].model.as_deref(), Some("deepseek-chat"));
    }

    #[tokio::test]
    async fn failed_completion_serves_deterministic_fallback() {
        let harness = TestHarness::builder()
            .with_failing_completions()
            .build()
            .await
            .unwrap();
        let session = started(&harness).await;

        let outcome = harness
            .engine
            .handle_message(&session.id, "вопрос по договору аренды")
            .await
            .unwrap();

        // The fallback is the pure function of (text, lawyer, language).
        let expected = prompt::fallback_reply(
            "вопрос по договору аренды",
            &harness.lawyer,
            Language::Ru,
        );
        assert_eq!(outcome.reply, expected);
        assert!(!outcome.reply.is_empty());

        let messages = harness.store.get_messages(&session.id, None).await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].model.as_deref(), Some(MODEL_MARKER_FALLBACK));
    }

    #[tokio::test]
    async fn legal_category_is_set_once() {
        let harness = TestHarness::builder().build().await.unwrap();
        let session = started(&harness).await;

        harness
            .engine
            .handle_message(&session.id, "У меня развод, что делать?")
            .await
            .unwrap();
        let mid = harness.store.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(mid.legal_category, Some(LegalCategory::Family));

        // A later labor-law message must not reclassify.
        harness
            .engine
            .handle_message(&session.id, "и еще меня уволили с работы")
            .await
            .unwrap();
        let after = harness.store.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(after.legal_category, Some(LegalCategory::Family));
    }

    #[tokio::test]
    async fn appointment_request_triggers_contact_form() {
        let harness = TestHarness::builder().build().await.unwrap();
        let session = started(&harness).await;

        let outcome = harness
            .engine
            .handle_message(&session.id, "Хочу записаться на встречу")
            .await
            .unwrap();

        assert!(outcome.should_collect_contact);
        let form = outcome.contact_form.expect("form expected");
        assert_eq!(form.fields, vec!["name", "phone", "email"]);

        let after = harness.store.get_session(&session.id).await.unwrap().unwrap();
        assert!(after.consultation_requested);
    }

    #[tokio::test]
    async fn phone_on_file_suppresses_contact_form() {
        let harness = TestHarness::builder().build().await.unwrap();
        let session = started(&harness).await;

        // The visitor drops their phone; extraction stores it.
        harness
            .engine
            .handle_message(&session.id, "мой телефон +996700123456")
            .await
            .unwrap();
        let mid = harness.store.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(mid.visitor_phone.as_deref(), Some("+996700123456"));

        // Appointment keywords no longer surface the form.
        let outcome = harness
            .engine
            .handle_message(&session.id, "Хочу записаться на встречу")
            .await
            .unwrap();
        assert!(!outcome.should_collect_contact);
        assert!(outcome.contact_form.is_none());
    }

    #[tokio::test]
    async fn third_message_with_scheduling_reply_triggers_contact_form() {
        // Fallback replies always close with a scheduling offer, so the
        // marker branch fires once three visitor messages are in.
        let harness = TestHarness::builder()
            .with_failing_completions()
            .build()
            .await
            .unwrap();
        let session = started(&harness).await;

        for text in ["добрый день", "у меня вопрос"] {
            let outcome = harness.engine.handle_message(&session.id, text).await.unwrap();
            assert!(!outcome.should_collect_contact);
        }
        let outcome = harness
            .engine
            .handle_message(&session.id, "и что мне делать дальше?")
            .await
            .unwrap();
        assert!(outcome.should_collect_contact);
        assert!(outcome.contact_form.is_some());
    }

    #[tokio::test]
    async fn collect_contact_info_off_disables_the_form_entirely() {
        let harness = TestHarness::builder().build().await.unwrap();
        harness
            .update_chat_config(|c| c.collect_contact_info = false)
            .await
            .unwrap();
        let session = started(&harness).await;

        let outcome = harness
            .engine
            .handle_message(&session.id, "Хочу записаться на встречу")
            .await
            .unwrap();
        assert!(!outcome.should_collect_contact);
        assert!(outcome.contact_form.is_none());
    }

    #[tokio::test]
    async fn auto_suggest_off_still_honors_explicit_requests() {
        let harness = TestHarness::builder()
            .with_failing_completions()
            .build()
            .await
            .unwrap();
        harness
            .update_chat_config(|c| c.auto_suggest_consultation = false)
            .await
            .unwrap();
        let session = started(&harness).await;

        // Three plain messages: the marker branch is switched off.
        for text in ["добрый день", "у меня вопрос", "что делать?"] {
            let outcome = harness.engine.handle_message(&session.id, text).await.unwrap();
            assert!(!outcome.should_collect_contact);
        }

        // An explicit appointment request still surfaces the form.
        let outcome = harness
            .engine
            .handle_message(&session.id, "Хочу записаться на встречу")
            .await
            .unwrap();
        assert!(outcome.should_collect_contact);
    }

    #[tokio::test]
    async fn extraction_is_first_write_wins() {
        let harness = TestHarness::builder().build().await.unwrap();
        let session = started(&harness).await;

        harness
            .engine
            .handle_message(&session.id, "мой номер +996700123456")
            .await
            .unwrap();
        harness
            .engine
            .handle_message(&session.id, "лучше звоните на +996555000111")
            .await
            .unwrap();

        let after = harness.store.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(after.visitor_phone.as_deref(), Some("+996700123456"));
    }

    #[tokio::test]
    async fn welcome_is_excluded_from_completion_context() {
        let harness = TestHarness::builder().build().await.unwrap();
        let session = started(&harness).await;

        harness
            .engine
            .handle_message(&session.id, "У меня развод, что делать?")
            .await
            .unwrap();

        let requests = harness.client.requests().await;
        assert_eq!(requests.len(), 1);
        let messages = &requests[0].messages;
        // System prompt + the current message only: no welcome.
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains(&harness.lawyer.full_name));
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "У меня развод, что делать?");
    }

    #[tokio::test]
    async fn context_window_holds_six_prior_messages() {
        let harness = TestHarness::builder().build().await.unwrap();
        let session = started(&harness).await;

        for i in 1..=5 {
            harness
                .engine
                .handle_message(&session.id, &format!("сообщение номер {i}"))
                .await
                .unwrap();
        }

        let requests = harness.client.requests().await;
        let last = &requests[4].messages;
        // system + 6 prior turns + current.
        assert_eq!(last.len(), 8);
        // The oldest retained turn is the visitor's second message.
        assert_eq!(last[1].content, "сообщение номер 2");
        assert_eq!(last[7].content, "сообщение номер 5");
    }

    #[tokio::test]
    async fn closed_office_hours_skip_the_completion_call() {
        let harness = TestHarness::builder().build().await.unwrap();
        let closed_day = DaySchedule {
            enabled: false,
            start: "09:00".to_string(),
            end: "18:00".to_string(),
        };
        harness
            .update_chat_config(|c| {
                c.office_hours_enabled = true;
                c.office_hours = WeeklySchedule {
                    monday: Some(closed_day.clone()),
                    tuesday: Some(closed_day.clone()),
                    wednesday: Some(closed_day.clone()),
                    thursday: Some(closed_day.clone()),
                    friday: Some(closed_day.clone()),
                    saturday: Some(closed_day.clone()),
                    sunday: Some(closed_day.clone()),
                };
            })
            .await
            .unwrap();
        let session = started(&harness).await;

        let outcome = harness
            .engine
            .handle_message(&session.id, "Здравствуйте")
            .await
            .unwrap();

        assert!(outcome.offline);
        assert_eq!(outcome.reply, prompt::offline_default(Language::Ru));
        assert!(harness.client.requests().await.is_empty());

        // Still exactly one user + one assistant row.
        let messages = harness.store.get_messages(&session.id, None).await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].model.as_deref(), Some(MODEL_MARKER_SYSTEM));
    }

    #[tokio::test]
    async fn submit_contact_creates_lead_with_exact_fields() {
        let harness = TestHarness::builder().build().await.unwrap();
        let session = started(&harness).await;

        let capture = harness
            .engine
            .submit_contact(&session.id, "Ana", "+996700123456", None)
            .await
            .unwrap();

        assert_eq!(capture.lead.name, "Ana");
        assert_eq!(capture.lead.phone.as_deref(), Some("+996700123456"));
        assert_eq!(capture.lead.source, LeadSource::WebsiteChat);
        assert!(capture.confirmation.contains("Ana"));

        let after = harness.store.get_session(&session.id).await.unwrap().unwrap();
        assert!(after.consultation_requested);
        assert_eq!(after.visitor_name.as_deref(), Some("Ana"));
        assert_eq!(after.visitor_phone.as_deref(), Some("+996700123456"));
    }

    #[tokio::test]
    async fn submit_contact_requires_name_and_phone() {
        let harness = TestHarness::builder().build().await.unwrap();
        let session = started(&harness).await;

        let err = harness
            .engine
            .submit_contact(&session.id, "  ", "+996700123456", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AdvoError::Validation(_)));

        let err = harness
            .engine
            .submit_contact(&session.id, "Ana", "", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AdvoError::Validation(_)));
    }

    #[tokio::test]
    async fn repeated_contact_submission_duplicates_leads() {
        // Accepted behavior: submit_contact never deduplicates.
        let harness = TestHarness::builder().build().await.unwrap();
        let session = started(&harness).await;

        let first = harness
            .engine
            .submit_contact(&session.id, "Ana", "+996700123456", None)
            .await
            .unwrap();
        let second = harness
            .engine
            .submit_contact(&session.id, "Ana", "+996700123456", None)
            .await
            .unwrap();
        assert_ne!(first.lead.id, second.lead.id);
    }

    #[tokio::test]
    async fn scheduling_requires_captured_contact() {
        let harness = TestHarness::builder().build().await.unwrap();
        let session = started(&harness).await;

        let err = harness
            .engine
            .schedule_appointment(&session.id, "2026-09-01", "14:00", ConsultationType::Free)
            .await
            .unwrap_err();
        assert!(matches!(err, AdvoError::Precondition(_)));
    }

    #[tokio::test]
    async fn scheduling_rejects_malformed_datetime() {
        let harness = TestHarness::builder().build().await.unwrap();
        let session = started(&harness).await;
        harness
            .engine
            .submit_contact(&session.id, "Ana", "+996700123456", None)
            .await
            .unwrap();

        let err = harness
            .engine
            .schedule_appointment(&session.id, "01.09.2026", "14:00", ConsultationType::Free)
            .await
            .unwrap_err();
        assert!(matches!(err, AdvoError::Validation(_)));
    }

    #[tokio::test]
    async fn scheduling_twice_reuses_the_lead() {
        let harness = TestHarness::builder().build().await.unwrap();
        let session = started(&harness).await;
        harness
            .engine
            .submit_contact(&session.id, "Ana", "+996700123456", None)
            .await
            .unwrap();

        let first = harness
            .engine
            .schedule_appointment(&session.id, "2026-09-01", "14:00", ConsultationType::Free)
            .await
            .unwrap();
        let second = harness
            .engine
            .schedule_appointment(&session.id, "2026-09-08", "10:30", ConsultationType::Paid)
            .await
            .unwrap();

        assert_eq!(first.consultation.lead_id, second.consultation.lead_id);
        assert_ne!(first.consultation.id, second.consultation.id);
        assert_eq!(first.consultation.duration_minutes, 60);
        assert_eq!(first.consultation.meeting_method, MeetingMethod::InPerson);
        assert_eq!(first.consultation.status, ConsultationStatus::Scheduled);
        assert!(second.confirmation.contains("08.09.2026 10:30"));
    }

    #[tokio::test]
    async fn end_derives_lead_from_visitor_messages() {
        let harness = TestHarness::builder().build().await.unwrap();
        let session = started(&harness).await;

        harness
            .engine
            .handle_message(&session.id, "мой телефон +996700123456")
            .await
            .unwrap();
        harness
            .engine
            .handle_message(&session.id, "у меня спор по наследству")
            .await
            .unwrap();

        let lead = harness.engine.end(&session.id).await.unwrap().expect("lead");
        assert_eq!(lead.phone.as_deref(), Some("+996700123456"));
        assert_eq!(lead.source, LeadSource::Chatbot);
        assert!(lead.case_description.contains("мой телефон"));
        assert!(lead.case_description.contains("спор по наследству"));

        // Terminal: a second end fails.
        let err = harness.engine.end(&session.id).await.unwrap_err();
        assert!(matches!(err, AdvoError::Precondition(_)));
    }

    #[tokio::test]
    async fn end_without_contact_or_request_creates_no_lead() {
        let harness = TestHarness::builder().build().await.unwrap();
        let session = started(&harness).await;
        harness
            .engine
            .handle_message(&session.id, "просто вопрос про закон")
            .await
            .unwrap();

        let lead = harness.engine.end(&session.id).await.unwrap();
        assert!(lead.is_none());
    }

    #[tokio::test]
    async fn end_after_contact_submission_does_not_duplicate_the_lead() {
        let harness = TestHarness::builder().build().await.unwrap();
        let session = started(&harness).await;
        harness
            .engine
            .submit_contact(&session.id, "Ana", "+996700123456", None)
            .await
            .unwrap();

        let derived = harness.engine.end(&session.id).await.unwrap();
        assert!(derived.is_none(), "a lead already references this session");
    }

    #[tokio::test]
    async fn transferred_session_accepts_no_more_messages() {
        let harness = TestHarness::builder().build().await.unwrap();
        let session = started(&harness).await;

        harness.engine.transfer(&session.id).await.unwrap();
        let after = harness.store.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(after.status, SessionStatus::Transferred);

        let err = harness
            .engine
            .handle_message(&session.id, "еще вопрос")
            .await
            .unwrap_err();
        assert!(matches!(err, AdvoError::Precondition(_)));
    }

    #[tokio::test]
    async fn configured_welcome_message_wins_over_default() {
        let harness = TestHarness::builder().build().await.unwrap();
        harness
            .update_chat_config(|c| {
                c.welcome_message_ru = Some("Добро пожаловать в нашу фирму!".to_string());
            })
            .await
            .unwrap();

        let started = harness
            .engine
            .start(&harness.lawyer.id, VisitorInfo::default())
            .await
            .unwrap();
        assert_eq!(started.welcome, "Добро пожаловать в нашу фирму!");
    }
}

// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the chat widget API.
//!
//! Every response carries `success`; failures are the uniform
//! `{success: false, error}` envelope with a mapped status code. Completion
//! failures never appear here — the engine absorbs them into fallback
//! replies before the response is built.

use std::str::FromStr;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use advo_core::types::ConsultationType;
use advo_core::{AdvoError, ConversationStore};
use advo_engine::{ContactForm, VisitorInfo};

use crate::server::GatewayState;

/// Request body for POST /api/chat/start.
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub lawyer_id: String,
    #[serde(default)]
    pub visitor_name: Option<String>,
}

/// Response body for POST /api/chat/start.
#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub success: bool,
    pub session_id: String,
    pub message: String,
    pub lawyer_name: String,
}

/// Request body for POST /api/chat/message.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub session_id: String,
    pub message: String,
}

/// Response body for POST /api/chat/message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
    pub offline: bool,
    pub should_collect_contact: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_form: Option<ContactForm>,
}

/// Request body for POST /api/chat/contact.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub session_id: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Response body for POST /api/chat/contact.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    pub lead_created: bool,
}

/// Request body for POST /api/chat/schedule.
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub session_id: String,
    /// Strict `YYYY-MM-DD`.
    pub date: String,
    /// Strict `HH:MM`.
    pub time: String,
    #[serde(default)]
    pub consultation_type: Option<String>,
}

/// Response body for POST /api/chat/schedule.
#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub success: bool,
    pub message: String,
    pub consultation_id: String,
    pub scheduled_time: String,
}

/// Request body for POST /api/chat/end.
#[derive(Debug, Deserialize)]
pub struct EndRequest {
    pub session_id: String,
}

/// Response body for POST /api/chat/end.
#[derive(Debug, Serialize)]
pub struct EndResponse {
    pub success: bool,
    pub lead_created: bool,
}

/// Query parameters for GET /api/chat/history.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub session_id: String,
}

/// One message in the history payload.
#[derive(Debug, Serialize)]
pub struct HistoryMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub content: String,
    pub timestamp: String,
}

/// Session summary in the history payload.
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub lawyer_name: String,
    pub status: String,
}

/// Response body for GET /api/chat/history.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub messages: Vec<HistoryMessage>,
    pub session_info: SessionInfo,
}

/// Uniform failure envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Maps an engine error to the uniform failure envelope.
///
/// Validation, not-found and precondition failures carry their message;
/// anything else is logged and degraded to a generic envelope rather than
/// crashing the request cycle.
fn error_response(err: AdvoError) -> Response {
    let (status, message) = match &err {
        AdvoError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        AdvoError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        AdvoError::Precondition(_) => (StatusCode::CONFLICT, err.to_string()),
        _ => {
            error!(error = %err, "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            )
        }
    };
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message,
        }),
    )
        .into_response()
}

fn visitor_info(headers: &HeaderMap, name: Option<String>) -> VisitorInfo {
    let header = |key: &str| {
        headers
            .get(key)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    VisitorInfo {
        name,
        ip: header("x-forwarded-for"),
        user_agent: header("user-agent"),
        referrer: header("referer"),
    }
}

/// POST /api/chat/start
pub async fn post_start(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(body): Json<StartRequest>,
) -> Response {
    let visitor = visitor_info(&headers, body.visitor_name);
    match state.engine.start(&body.lawyer_id, visitor).await {
        Ok(started) => {
            let lawyer_name = match state.engine.store().get_lawyer(&body.lawyer_id).await {
                Ok(Some(lawyer)) => lawyer.full_name,
                _ => String::new(),
            };
            Json(StartResponse {
                success: true,
                session_id: started.session.id,
                message: started.welcome,
                lawyer_name,
            })
            .into_response()
        }
        Err(err) => error_response(err),
    }
}

/// POST /api/chat/message
pub async fn post_message(
    State(state): State<GatewayState>,
    Json(body): Json<MessageRequest>,
) -> Response {
    match state.engine.handle_message(&body.session_id, &body.message).await {
        Ok(outcome) => Json(MessageResponse {
            success: true,
            message: outcome.reply,
            offline: outcome.offline,
            should_collect_contact: outcome.should_collect_contact,
            contact_form: outcome.contact_form,
        })
        .into_response(),
        Err(err) => error_response(err),
    }
}

/// POST /api/chat/contact
pub async fn post_contact(
    State(state): State<GatewayState>,
    Json(body): Json<ContactRequest>,
) -> Response {
    match state
        .engine
        .submit_contact(
            &body.session_id,
            &body.name,
            &body.phone,
            body.email.as_deref(),
        )
        .await
    {
        Ok(capture) => Json(ContactResponse {
            success: true,
            message: capture.confirmation,
            lead_created: true,
        })
        .into_response(),
        Err(err) => error_response(err),
    }
}

/// POST /api/chat/schedule
pub async fn post_schedule(
    State(state): State<GatewayState>,
    Json(body): Json<ScheduleRequest>,
) -> Response {
    let consultation_type = match body.consultation_type.as_deref() {
        None => ConsultationType::Free,
        Some(raw) => match ConsultationType::from_str(raw) {
            Ok(t) => t,
            Err(_) => {
                return error_response(AdvoError::Validation(format!(
                    "unknown consultation type `{raw}`"
                )));
            }
        },
    };

    match state
        .engine
        .schedule_appointment(&body.session_id, &body.date, &body.time, consultation_type)
        .await
    {
        Ok(scheduled) => Json(ScheduleResponse {
            success: true,
            message: scheduled.confirmation,
            consultation_id: scheduled.consultation.id,
            scheduled_time: scheduled.consultation.scheduled_time,
        })
        .into_response(),
        Err(err) => error_response(err),
    }
}

/// POST /api/chat/end
pub async fn post_end(
    State(state): State<GatewayState>,
    Json(body): Json<EndRequest>,
) -> Response {
    match state.engine.end(&body.session_id).await {
        Ok(lead) => Json(EndResponse {
            success: true,
            lead_created: lead.is_some(),
        })
        .into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /api/chat/history
pub async fn get_history(
    State(state): State<GatewayState>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    match state.engine.history(&query.session_id).await {
        Ok((session, messages)) => {
            let lawyer_name = match state.engine.store().get_lawyer(&session.lawyer_id).await {
                Ok(Some(lawyer)) => lawyer.full_name,
                _ => String::new(),
            };
            Json(HistoryResponse {
                success: true,
                messages: messages
                    .into_iter()
                    .map(|m| HistoryMessage {
                        message_type: m.role.to_string(),
                        content: m.content,
                        timestamp: m.created_at,
                    })
                    .collect(),
                session_info: SessionInfo {
                    lawyer_name,
                    status: session.status.to_string(),
                },
            })
            .into_response()
        }
        Err(err) => error_response(err),
    }
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

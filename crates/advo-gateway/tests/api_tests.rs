// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the chat widget API, driven through the axum
//! router with a mock completion client behind the engine.

use advo_gateway::{GatewayState, router};
use advo_test_utils::TestHarness;
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use tower::ServiceExt;

async fn app(harness: &TestHarness) -> Router {
    router(GatewayState {
        engine: harness.engine.clone(),
    })
}

async fn request(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    let request = match body {
        Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_reports_ok() {
    let harness = TestHarness::builder().build().await.unwrap();
    let (status, body) = request(app(&harness).await, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn start_creates_session_and_returns_welcome() {
    let harness = TestHarness::builder().build().await.unwrap();
    let (status, body) = request(
        app(&harness).await,
        "POST",
        "/api/chat/start",
        Some(serde_json::json!({"lawyer_id": harness.lawyer.id})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["lawyer_name"], "Аида Касымова");
    assert!(body["message"].as_str().unwrap().contains("Здравствуйте"));
    assert!(!body["session_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn start_with_unknown_lawyer_is_404_envelope() {
    let harness = TestHarness::builder().build().await.unwrap();
    let (status, body) = request(
        app(&harness).await,
        "POST",
        "/api/chat/start",
        Some(serde_json::json!({"lawyer_id": "nope"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("lawyer not found"));
}

#[tokio::test]
async fn message_round_trip_returns_reply() {
    let harness = TestHarness::builder()
        .with_replies(vec!["Развод оформляется через суд.".to_string()])
        .build()
        .await
        .unwrap();
    let session = harness
        .engine
        .start(&harness.lawyer.id, Default::default())
        .await
        .unwrap()
        .session;

    let (status, body) = request(
        app(&harness).await,
        "POST",
        "/api/chat/message",
        Some(serde_json::json!({
            "session_id": session.id,
            "message": "У меня развод, что делать?"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Развод оформляется через суд.");
    assert_eq!(body["offline"], false);
    assert_eq!(body["should_collect_contact"], false);
    assert!(body.get("contact_form").is_none());
}

#[tokio::test]
async fn empty_message_is_400_envelope() {
    let harness = TestHarness::builder().build().await.unwrap();
    let session = harness
        .engine
        .start(&harness.lawyer.id, Default::default())
        .await
        .unwrap()
        .session;

    let (status, body) = request(
        app(&harness).await,
        "POST",
        "/api/chat/message",
        Some(serde_json::json!({"session_id": session.id, "message": "  "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn appointment_request_returns_contact_form() {
    let harness = TestHarness::builder().build().await.unwrap();
    let session = harness
        .engine
        .start(&harness.lawyer.id, Default::default())
        .await
        .unwrap()
        .session;

    let (status, body) = request(
        app(&harness).await,
        "POST",
        "/api/chat/message",
        Some(serde_json::json!({
            "session_id": session.id,
            "message": "Хочу записаться на встречу"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["should_collect_contact"], true);
    assert_eq!(body["contact_form"]["fields"][0], "name");
    assert_eq!(body["contact_form"]["fields"][1], "phone");
    assert_eq!(body["contact_form"]["fields"][2], "email");
    assert_eq!(body["contact_form"]["title"], "Записаться на консультацию");
}

#[tokio::test]
async fn contact_then_schedule_flow() {
    let harness = TestHarness::builder().build().await.unwrap();
    let session = harness
        .engine
        .start(&harness.lawyer.id, Default::default())
        .await
        .unwrap()
        .session;

    let (status, body) = request(
        app(&harness).await,
        "POST",
        "/api/chat/contact",
        Some(serde_json::json!({
            "session_id": session.id,
            "name": "Ana",
            "phone": "+996700123456",
            "email": "ana@example.com"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["lead_created"], true);

    let (status, body) = request(
        app(&harness).await,
        "POST",
        "/api/chat/schedule",
        Some(serde_json::json!({
            "session_id": session.id,
            "date": "2026-09-01",
            "time": "14:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["scheduled_time"], "2026-09-01T14:00:00");
    assert!(!body["consultation_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn schedule_without_contact_is_409_envelope() {
    let harness = TestHarness::builder().build().await.unwrap();
    let session = harness
        .engine
        .start(&harness.lawyer.id, Default::default())
        .await
        .unwrap()
        .session;

    let (status, body) = request(
        app(&harness).await,
        "POST",
        "/api/chat/schedule",
        Some(serde_json::json!({
            "session_id": session.id,
            "date": "2026-09-01",
            "time": "14:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn bad_consultation_type_is_400_envelope() {
    let harness = TestHarness::builder().build().await.unwrap();
    let session = harness
        .engine
        .start(&harness.lawyer.id, Default::default())
        .await
        .unwrap()
        .session;
    harness
        .engine
        .submit_contact(&session.id, "Ana", "+996700123456", None)
        .await
        .unwrap();

    let (status, body) = request(
        app(&harness).await,
        "POST",
        "/api/chat/schedule",
        Some(serde_json::json!({
            "session_id": session.id,
            "date": "2026-09-01",
            "time": "14:00",
            "consultation_type": "luxurious"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn history_lists_messages_with_types() {
    let harness = TestHarness::builder().build().await.unwrap();
    let session = harness
        .engine
        .start(&harness.lawyer.id, Default::default())
        .await
        .unwrap()
        .session;
    harness
        .engine
        .handle_message(&session.id, "Здравствуйте")
        .await
        .unwrap();

    let (status, body) = request(
        app(&harness).await,
        "GET",
        &format!("/api/chat/history?session_id={}", session.id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["session_info"]["status"], "active");
    assert_eq!(body["session_info"]["lawyer_name"], "Аида Касымова");
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["type"], "assistant"); // welcome
    assert_eq!(messages[1]["type"], "user");
    assert_eq!(messages[2]["type"], "assistant");
}

#[tokio::test]
async fn end_closes_session() {
    let harness = TestHarness::builder().build().await.unwrap();
    let session = harness
        .engine
        .start(&harness.lawyer.id, Default::default())
        .await
        .unwrap()
        .session;

    let (status, body) = request(
        app(&harness).await,
        "POST",
        "/api/chat/end",
        Some(serde_json::json!({"session_id": session.id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["lead_created"], false);

    // Terminal: a second end is a 409.
    let (status, _) = request(
        app(&harness).await,
        "POST",
        "/api/chat/end",
        Some(serde_json::json!({"session_id": session.id})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

//! Integration tests for the HTTP API surface.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{faculty, sample_poll, TestApp};

async fn send(
    router: &axum::Router,
    method: &str,
    path: &str,
    body: Option<Value>,
    identity: Option<(&str, &str)>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header("Content-Type", "application/json");

    if let Some((user_id, role)) = identity {
        builder = builder
            .header("X-User-Id", user_id)
            .header("X-User-Role", role)
            .header("X-Department-Id", "5");
    }

    let body_str = body
        .map(|b| serde_json::to_string(&b).expect("serializable body"))
        .unwrap_or_default();
    let request = builder.body(Body::from(body_str)).expect("valid request");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("request succeeds");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("readable body");
    let value: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn create_poll_body() -> Value {
    json!({
        "title": "Quick check",
        "question": "How does momentum relate to kinetic energy?",
        "options": ["Momentum only", "Momentum and kinetic energy"],
        "subject": "Physics",
        "department_id": 5,
        "timer_duration_seconds": 60,
    })
}

#[tokio::test]
async fn test_health_reports_hub_stats() {
    let app = TestApp::new();
    let router = app.router();

    let (status, body) = send(&router, "GET", "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["realtime"]["connections"], 0);
}

#[tokio::test]
async fn test_poll_create_vote_results_flow() {
    let app = TestApp::new();
    let router = app.router();

    let (status, poll) = send(
        &router,
        "POST",
        "/api/polls",
        Some(create_poll_body()),
        Some(("1", "faculty")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let poll_id = poll["id"].as_i64().expect("poll id");

    let (status, results) = send(
        &router,
        "POST",
        &format!("/api/polls/{poll_id}/votes"),
        Some(json!({"option_index": 1})),
        Some(("2", "student")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results["total"], 1);

    let (status, results) = send(
        &router,
        "GET",
        &format!("/api/polls/{poll_id}/results"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results["votes"]["Momentum and kinetic energy"], 1);
    assert_eq!(results["percentages"]["Momentum and kinetic energy"], 100);
}

#[tokio::test]
async fn test_poll_create_requires_identity_headers() {
    let app = TestApp::new();
    let router = app.router();

    let (status, body) = send(&router, "POST", "/api/polls", Some(create_poll_body()), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION");
}

#[tokio::test]
async fn test_poll_create_rejects_students() {
    let app = TestApp::new();
    let router = app.router();

    let (status, body) = send(
        &router,
        "POST",
        "/api/polls",
        Some(create_poll_body()),
        Some(("2", "student")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "PERMISSION");
}

#[tokio::test]
async fn test_poll_create_rejects_single_option() {
    let app = TestApp::new();
    let router = app.router();

    let mut body = create_poll_body();
    body["options"] = json!(["Only one"]);
    let (status, _) = send(&router, "POST", "/api/polls", Some(body), Some(("1", "faculty"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_vote_on_closed_poll_conflicts() {
    let app = TestApp::new();
    let router = app.router();

    let poll = app
        .poll_service
        .create_poll(&faculty(1), sample_poll())
        .await
        .unwrap();
    app.poll_service.close_poll(&faculty(1), poll.id).await.unwrap();

    let (status, body) = send(
        &router,
        "POST",
        &format!("/api/polls/{}/votes", poll.id),
        Some(json!({"option_index": 0})),
        Some(("2", "student")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "POLL_CLOSED");
}

#[tokio::test]
async fn test_note_session_flow() {
    let app = TestApp::new();
    let router = app.router();

    let (status, session) = send(
        &router,
        "POST",
        "/api/notes",
        Some(json!({
            "title": "Review",
            "content": "Shared notes",
            "subject": "Physics",
            "department_id": 5,
        })),
        Some(("1", "faculty")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let note_id = session["id"].as_i64().expect("session id");

    let (status, contribution) = send(
        &router,
        "POST",
        &format!("/api/notes/{note_id}/contributions"),
        Some(json!({
            "content": "Energy is conserved",
            "content_type": "text",
        })),
        Some(("2", "student")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(contribution["note_id"], note_id);

    let (status, listing) = send(
        &router,
        "GET",
        &format!("/api/notes/{note_id}/contributions"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["total_items"], 1);

    // A non-creator cannot delete.
    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/api/notes/{note_id}"),
        None,
        Some(("2", "student")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/api/notes/{note_id}"),
        None,
        Some(("1", "faculty")),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_unknown_poll_is_not_found() {
    let app = TestApp::new();
    let router = app.router();

    let (status, body) = send(&router, "GET", "/api/polls/999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

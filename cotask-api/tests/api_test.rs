/// Integration tests for the CoTask HTTP API
///
/// These tests exercise the real router against a PostgreSQL database:
/// - Duplicate email registration conflict
/// - Task permission rules (creator-only delete)
/// - Task visibility scope (creator or assignee)
/// - Status filter and due-date sort ordering
/// - Notification persistence and idempotent mark-read
///
/// They require a running PostgreSQL database and are skipped when
/// DATABASE_URL is not set.
/// Run with: DATABASE_URL=... cargo test --test api_test -- --test-threads=1

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use common::TestContext;
use serde_json::{json, Value};
use tower::Service as _;
use uuid::Uuid;

/// Sends one request through the router and returns status + parsed body
async fn send(
    ctx: &TestContext,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = ctx.app.clone().call(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

#[tokio::test]
async fn test_duplicate_email_registration_conflict() {
    let Some(ctx) = TestContext::new().await.unwrap() else {
        eprintln!("DATABASE_URL not set, skipping");
        return;
    };

    let email = format!("dup-{}@example.com", Uuid::new_v4());
    let payload = json!({
        "name": "First Registrant",
        "email": email,
        "password": "secret123"
    });

    let (status, body) = send(&ctx, "POST", "/api/auth/register", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "first registration: {}", body);
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].is_string());
    let user_id: Uuid = body["data"]["user"]["id"].as_str().unwrap().parse().unwrap();

    let (status, body) = send(&ctx, "POST", "/api/auth/register", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Email already exists");

    ctx.delete_user(user_id).await.unwrap();
}

#[tokio::test]
async fn test_only_creator_can_delete_task() {
    let Some(ctx) = TestContext::new().await.unwrap() else {
        eprintln!("DATABASE_URL not set, skipping");
        return;
    };

    let (creator, creator_token) = ctx.create_user("Creator").await.unwrap();
    let (assignee, assignee_token) = ctx.create_user("Assignee").await.unwrap();

    let (status, body) = send(
        &ctx,
        "POST",
        "/api/tasks",
        Some(&creator_token),
        Some(json!({
            "title": "Ship the release",
            "dueDate": Utc::now().to_rfc3339(),
            "priority": "high",
            "assignedToId": assignee.id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "task creation: {}", body);
    let task_id = body["data"]["id"].as_str().unwrap().to_string();

    // The assignee may update but not delete
    let uri = format!("/api/tasks/{}", task_id);
    let (status, body) = send(&ctx, "DELETE", &uri, Some(&assignee_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, _) = send(&ctx, "DELETE", &uri, Some(&creator_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    ctx.delete_user(creator.id).await.unwrap();
    ctx.delete_user(assignee.id).await.unwrap();
}

#[tokio::test]
async fn test_task_visibility_scoped_to_creator_or_assignee() {
    let Some(ctx) = TestContext::new().await.unwrap() else {
        eprintln!("DATABASE_URL not set, skipping");
        return;
    };

    let (creator, creator_token) = ctx.create_user("Creator").await.unwrap();
    let (assignee, assignee_token) = ctx.create_user("Assignee").await.unwrap();
    let (bystander, bystander_token) = ctx.create_user("Bystander").await.unwrap();

    let (status, body) = send(
        &ctx,
        "POST",
        "/api/tasks",
        Some(&creator_token),
        Some(json!({
            "title": "Shared task",
            "dueDate": Utc::now().to_rfc3339(),
            "priority": "medium",
            "assignedToId": assignee.id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "task creation: {}", body);
    let task_id = body["data"]["id"].as_str().unwrap().to_string();

    let contains_task = |body: &Value| {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .any(|t| t["id"] == task_id.as_str())
    };

    let (_, body) = send(&ctx, "GET", "/api/tasks", Some(&creator_token), None).await;
    assert!(contains_task(&body), "creator should see the task");

    let (_, body) = send(&ctx, "GET", "/api/tasks", Some(&assignee_token), None).await;
    assert!(contains_task(&body), "assignee should see the task");

    let (_, body) = send(&ctx, "GET", "/api/tasks", Some(&bystander_token), None).await;
    assert!(!contains_task(&body), "bystander should not see the task");

    ctx.delete_user(creator.id).await.unwrap();
    ctx.delete_user(assignee.id).await.unwrap();
    ctx.delete_user(bystander.id).await.unwrap();
}

#[tokio::test]
async fn test_completed_filter_with_descending_due_date_sort() {
    let Some(ctx) = TestContext::new().await.unwrap() else {
        eprintln!("DATABASE_URL not set, skipping");
        return;
    };

    let (user, token) = ctx.create_user("Sorter").await.unwrap();

    // Two completed tasks with distinct due dates and one still open
    let mut ids = Vec::new();
    for (title, days, status) in [
        ("Due soon", 1, "Completed"),
        ("Due later", 3, "completed"),
        ("Still open", 2, "todo"),
    ] {
        let (status_code, body) = send(
            &ctx,
            "POST",
            "/api/tasks",
            Some(&token),
            Some(json!({
                "title": title,
                "dueDate": (Utc::now() + Duration::days(days)).to_rfc3339(),
                "priority": "low",
                "status": status,
                "assignedToId": user.id
            })),
        )
        .await;
        assert_eq!(status_code, StatusCode::CREATED, "task creation: {}", body);
        ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    let (status, body) = send(
        &ctx,
        "GET",
        "/api/tasks?status=completed&sortByDueDate=desc",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let tasks: Vec<&Value> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|t| ids.contains(&t["id"].as_str().unwrap().to_string()))
        .collect();

    // Only the two completed tasks, later due date first
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["title"], "Due later");
    assert_eq!(tasks[1]["title"], "Due soon");
    for task in &tasks {
        assert_eq!(task["status"], "completed");
    }

    ctx.delete_user(user.id).await.unwrap();
}

#[tokio::test]
async fn test_assignment_notification_persists_and_mark_read_is_idempotent() {
    let Some(ctx) = TestContext::new().await.unwrap() else {
        eprintln!("DATABASE_URL not set, skipping");
        return;
    };

    let (creator, creator_token) = ctx.create_user("Creator").await.unwrap();
    // Assignee has no live socket; the notification must still persist
    let (assignee, assignee_token) = ctx.create_user("Assignee").await.unwrap();

    let (status, body) = send(
        &ctx,
        "POST",
        "/api/tasks",
        Some(&creator_token),
        Some(json!({
            "title": "Review the proposal",
            "dueDate": Utc::now().to_rfc3339(),
            "priority": "urgent",
            "assignedToId": assignee.id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "task creation: {}", body);

    let (status, body) = send(&ctx, "GET", "/api/notifications", Some(&assignee_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let notifications = body["data"].as_array().unwrap();
    let notification = notifications
        .iter()
        .find(|n| {
            n["message"]
                .as_str()
                .is_some_and(|m| m.contains("Review the proposal"))
        })
        .expect("assignment notification should be persisted");
    assert_eq!(notification["read"], false);
    let notification_id = notification["id"].as_str().unwrap().to_string();

    // Mark read twice; both succeed
    let uri = format!("/api/notifications/{}/read", notification_id);
    let (status, _) = send(&ctx, "PATCH", &uri, Some(&assignee_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&ctx, "PATCH", &uri, Some(&assignee_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Someone else's notification looks like it does not exist
    let (status, _) = send(&ctx, "PATCH", &uri, Some(&creator_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.delete_user(creator.id).await.unwrap();
    ctx.delete_user(assignee.id).await.unwrap();
}

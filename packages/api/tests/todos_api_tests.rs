// ABOUTME: HTTP-level tests for the todo API
// ABOUTME: Drives the router with oneshot requests against an in-memory database

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use todo_api::{create_router, AppState};
use todo_storage::{connect, ensure_schema, DatabaseConfig, TodoStorage};

async fn test_app() -> (Router, AppState) {
    let pool = connect(&DatabaseConfig::in_memory()).await.unwrap();
    ensure_schema(&pool).await.unwrap();
    let state = AppState::new(TodoStorage::new(pool));
    (create_router(state.clone()), state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create(app: &Router, body: Value) -> i64 {
    let (status, json) = send(app, Method::POST, "/api/todos", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    json["data"]["id"].as_i64().unwrap()
}

// --- root & health ---

#[tokio::test]
async fn test_root_and_health() {
    let (app, _) = test_app().await;

    let (status, json) = send(&app, Method::GET, "/api", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"message": "Hello from API!"}));

    let (status, json) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

// --- create ---

#[tokio::test]
async fn test_create_then_get_returns_defaults() {
    let (app, _) = test_app().await;

    let (status, json) = send(&app, Method::POST, "/api/todos", Some(json!({"name": "Buy milk"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["code"], 200);
    assert_eq!(json["message"], "Todo created successfully");
    let id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"], json!({"id": id}));

    let (status, json) = send(&app, Method::GET, &format!("/api/todos/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["code"], 200);
    assert_eq!(json["data"]["name"], "Buy milk");
    assert_eq!(json["data"]["status"], false);
    assert!(json["data"]["address"].is_null());

    let created_at = json["data"]["created_at"].as_str().unwrap();
    assert_eq!(created_at.len(), "YYYY-MM-DD HH:MM:SS".len());
    assert_eq!(&created_at[10..11], " ");
}

#[tokio::test]
async fn test_create_accepts_integer_status_and_extra_fields() {
    let (app, _) = test_app().await;

    let id = create(
        &app,
        json!({"name": "Visit", "status": 1, "age": 28, "address": "Harbour Rd"}),
    )
    .await;

    let (_, json) = send(&app, Method::GET, &format!("/api/todos/{}", id), None).await;
    assert_eq!(json["data"]["status"], true);
    assert_eq!(json["data"]["age"], 28);
    assert_eq!(json["data"]["address"], "Harbour Rd");
}

#[tokio::test]
async fn test_create_without_name_is_rejected() {
    let (app, _) = test_app().await;

    for body in [json!({}), json!({"name": ""}), json!({"name": "   "})] {
        let (status, json) = send(&app, Method::POST, "/api/todos", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], 400);
        assert!(json["data"].is_null());
    }

    let (_, json) = send(&app, Method::GET, "/api/todos", None).await;
    assert_eq!(json["total"], 0);
}

#[tokio::test]
async fn test_malformed_body_uses_envelope() {
    let (app, _) = test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/todos")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({"code": 400, "data": null, "message": "Invalid request body"})
    );
}

#[tokio::test]
async fn test_bodyless_requests_reach_field_validation() {
    let (app, _) = test_app().await;

    let (status, json) = send(&app, Method::POST, "/api/todos", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        json!({"code": 400, "data": null, "message": "Name is required"})
    );

    let id = create(&app, json!({"name": "Keep"})).await;
    let (status, json) = send(&app, Method::PUT, &format!("/api/todos/{}", id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        json!({"code": 400, "data": null, "message": "name or status is required"})
    );
}

#[tokio::test]
async fn test_non_json_content_type_is_rejected() {
    let (app, _) = test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/todos")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("name=x"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid request body");
}

// --- get ---

#[tokio::test]
async fn test_get_missing_and_non_numeric_ids() {
    let (app, _) = test_app().await;

    for uri in ["/api/todos/999", "/api/todos/abc"] {
        let (status, json) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json,
            json!({"code": 400, "data": null, "message": "Todo not found"})
        );
    }
}

// --- list ---

#[tokio::test]
async fn test_list_paginates_newest_first() {
    let (app, _) = test_app().await;

    for i in 0..12 {
        create(&app, json!({"name": format!("Task {}", i)})).await;
    }

    let (status, json) = send(&app, Method::GET, "/api/todos?page=2&pageSize=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 12);
    assert_eq!(json["page"], 2);
    assert_eq!(json["pageSize"], 5);
    assert_eq!(json["totalPages"], 3);

    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Task 6", "Task 5", "Task 4", "Task 3", "Task 2"]);
}

#[tokio::test]
async fn test_list_defaults_for_invalid_params() {
    let (app, _) = test_app().await;

    create(&app, json!({"name": "Only one"})).await;

    let (status, json) = send(&app, Method::GET, "/api/todos?page=abc&pageSize=0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["page"], 1);
    assert_eq!(json["pageSize"], 10);
    assert_eq!(json["totalPages"], 1);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_search_filters_total() {
    let (app, _) = test_app().await;

    create(&app, json!({"name": "Ask Alice"})).await;
    create(&app, json!({"name": "Pay Khalil"})).await;
    create(&app, json!({"name": "Water plants"})).await;

    let (_, json) = send(&app, Method::GET, "/api/todos?search=ALI", None).await;
    assert_eq!(json["total"], 2);
    assert_eq!(json["totalPages"], 1);
    for todo in json["data"].as_array().unwrap() {
        assert!(todo["name"].as_str().unwrap().to_lowercase().contains("ali"));
    }

    let (_, json) = send(&app, Method::GET, "/api/todos?search=", None).await;
    assert_eq!(json["total"], 3);
}

// --- update ---

#[tokio::test]
async fn test_update_requires_name_or_status() {
    let (app, _) = test_app().await;
    let id = create(&app, json!({"name": "Keep"})).await;

    let (status, json) = send(
        &app,
        Method::PUT,
        &format!("/api/todos/{}", id),
        Some(json!({"age": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "name or status is required");
    assert!(json["data"].is_null());
}

#[tokio::test]
async fn test_partial_update_preserves_name() {
    let (app, _) = test_app().await;
    let id = create(&app, json!({"name": "Walk dog", "address": "Park"})).await;

    let (status, json) = send(
        &app,
        Method::PUT,
        &format!("/api/todos/{}", id),
        Some(json!({"status": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"code": 200, "data": {"id": id}, "message": "Todo updated successfully"})
    );

    let (_, json) = send(&app, Method::GET, &format!("/api/todos/{}", id), None).await;
    assert_eq!(json["data"]["name"], "Walk dog");
    assert_eq!(json["data"]["status"], true);
    assert_eq!(json["data"]["address"], "Park");

    send(
        &app,
        Method::PUT,
        &format!("/api/todos/{}", id),
        Some(json!({"name": "Walk cat"})),
    )
    .await;
    let (_, json) = send(&app, Method::GET, &format!("/api/todos/{}", id), None).await;
    assert_eq!(json["data"]["name"], "Walk cat");
    assert_eq!(json["data"]["status"], true);
}

#[tokio::test]
async fn test_update_missing_is_400_not_500() {
    let (app, _) = test_app().await;

    for uri in ["/api/todos/4242", "/api/todos/nope"] {
        let (status, json) = send(&app, Method::PUT, uri, Some(json!({"name": "Ghost"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], 400);
        assert!(json["data"].is_null());
    }
}

#[tokio::test]
async fn test_update_rejects_blank_name() {
    let (app, _) = test_app().await;
    let id = create(&app, json!({"name": "Stay"})).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/todos/{}", id),
        Some(json!({"name": " "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = send(&app, Method::GET, &format!("/api/todos/{}", id), None).await;
    assert_eq!(json["data"]["name"], "Stay");
}

// --- toggle ---

#[tokio::test]
async fn test_toggle_round_trip() {
    let (app, _) = test_app().await;
    let id = create(&app, json!({"name": "Flip"})).await;
    let uri = format!("/api/todos/{}/toggle", id);

    let (status, json) = send(&app, Method::PATCH, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Todo toggled successfully");

    let (_, json) = send(&app, Method::GET, &format!("/api/todos/{}", id), None).await;
    assert_eq!(json["data"]["status"], true);

    send(&app, Method::PATCH, &uri, None).await;
    let (_, json) = send(&app, Method::GET, &format!("/api/todos/{}", id), None).await;
    assert_eq!(json["data"]["status"], false);

    let (status, _) = send(&app, Method::PATCH, "/api/todos/777/toggle", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// --- delete ---

#[tokio::test]
async fn test_delete_twice() {
    let (app, _) = test_app().await;
    let id = create(&app, json!({"name": "Short lived"})).await;
    let uri = format!("/api/todos/{}", id);

    let (status, json) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"code": 200, "data": null, "message": "Todo deleted successfully"})
    );

    let (status, json) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Todo not found");
}

// --- storage failure ---

#[tokio::test]
async fn test_storage_failure_is_generic_500() {
    let (app, state) = test_app().await;
    state.storage.pool().close().await;

    let (status, json) = send(&app, Method::GET, "/api/todos", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json,
        json!({"code": 500, "data": null, "message": "Database error"})
    );

    let (status, json) = send(&app, Method::GET, "/api/todos/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Database error");
}

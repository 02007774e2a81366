use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use formwright::http::router;

use crate::common::service;

async fn post(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn register_and_login() {
    let app = router(Arc::new(service().await));

    let (status, body) = post(
        &app,
        "/api/register",
        json!({"username": "ann", "email": "ann@example.com", "password": "pw", "user_type": "admin"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");

    let (status, body) = post(
        &app,
        "/api/login",
        json!({"email": "ann@example.com", "password": "pw"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["type"], "admin");
    assert_eq!(body["redirect"], "/dynamic-form");
}

#[tokio::test]
async fn login_failures_are_identical() {
    let app = router(Arc::new(service().await));
    post(
        &app,
        "/api/register",
        json!({"username": "ben", "email": "ben@example.com", "password": "pw", "user_type": "user"}),
    )
    .await;

    let wrong = post(&app, "/api/login", json!({"email": "ben@example.com", "password": "x"})).await;
    let unknown = post(&app, "/api/login", json!({"email": "who@example.com", "password": "pw"})).await;
    assert_eq!(wrong.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong, unknown);
    assert_eq!(wrong.1["message"], "Invalid email or password");
}

#[tokio::test]
async fn duplicate_registration_is_bad_request() {
    let app = router(Arc::new(service().await));
    let body = json!({"username": "c", "email": "c@example.com", "password": "pw", "user_type": "user"});
    assert_eq!(post(&app, "/api/register", body.clone()).await.0, StatusCode::CREATED);
    let (status, body) = post(&app, "/api/register", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "constraint_violation");
}

#[tokio::test]
async fn create_form_endpoint() {
    let app = router(Arc::new(service().await));
    let form = json!({
        "formName": "signup",
        "formElements": [
            {"id": "text-1", "type": "text", "label": "Full Name", "name": "full_name", "placeholder": "Enter full name"},
            {"id": "select-2", "type": "select", "label": "Plan", "name": "plan", "placeholder": "",
             "options": [{"label": "Option 1", "value": "option1"}]},
            {"type": "rating", "name": "stars"}
        ]
    });
    let (status, body) = post(&app, "/api/create-form", form.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["table"], "signup");

    // the client posts to this path; it is the same operation
    let (status, body) = post(&app, "/api/submit-form", form).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn create_form_requires_name_and_elements() {
    let app = router(Arc::new(service().await));
    let (status, body) = post(&app, "/api/create-form", json!({"formName": "empty", "formElements": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_document");
    let (status, _) = post(&app, "/api/create-form", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn field_types_listing() {
    let app = router(Arc::new(service().await));
    let request = Request::builder()
        .uri("/api/field-types")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let types = body.as_array().unwrap();
    assert_eq!(types.len(), 10);
    assert_eq!(types[0], json!({"type": "text", "defaultLabel": "Text Input"}));
    assert_eq!(types[9]["type"], "file");
}

async fn send_raw(app: &axum::Router, uri: &str, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn unreadable_bodies_get_json_errors() {
    let app = router(Arc::new(service().await));
    for uri in ["/api/register", "/api/login", "/api/create-form"] {
        let (status, body) = send_raw(&app, uri, Some("application/json"), "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], "bad_request");
        assert!(body["message"].is_string());

        let (status, body) = send_raw(&app, uri, None, "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], "bad_request");
    }

    let (status, body) = send_raw(
        &app,
        "/api/create-form",
        Some("application/json"),
        r#"{"formName": 7, "formElements": []}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn create_form_refuses_statement_separator() {
    let app = router(Arc::new(service().await));
    let (status, body) = post(
        &app,
        "/api/create-form",
        json!({"formName": "x; DROP TABLE users", "formElements": [{"type": "text", "name": "a"}]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_identifier");
}

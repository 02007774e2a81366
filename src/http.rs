//! JSON HTTP endpoints.

use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::catalog::list_field_types;
use crate::document::FormSubmission;
use crate::error::FormError;
use crate::service::FormService;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub user_type: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub fn router(service: Arc<FormService>) -> Router {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/create-form", post(create_form))
        .route("/api/submit-form", post(create_form))
        .route("/api/field-types", get(field_types))
        .layer(Extension(service))
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

fn rejected_body(rejection: &JsonRejection) -> axum::response::Response {
    tracing::debug!(error = %rejection, "unreadable request body");
    json_error(StatusCode::BAD_REQUEST, "bad_request", rejection.body_text())
}

fn error_response(err: &FormError) -> axum::response::Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json_error(status, err.code(), err.client_message())
}

pub async fn register(
    Extension(service): Extension<Arc<FormService>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected_body(&rejection),
    };
    match service
        .register(&body.username, &body.email, &body.password, &body.user_type)
        .await
    {
        Ok(id) => (
            StatusCode::CREATED,
            Json(json!({ "message": "User registered successfully", "id": id.0 })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn login(
    Extension(service): Extension<Arc<FormService>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected_body(&rejection),
    };
    match service.login(&body.email, &body.password).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "message": "Login successful",
                "user": { "type": outcome.role },
                "redirect": outcome.destination.path(),
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn create_form(
    Extension(service): Extension<Arc<FormService>>,
    body: Result<Json<FormSubmission>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected_body(&rejection),
    };
    match service.create_form(&body).await {
        Ok(table) => (
            StatusCode::CREATED,
            Json(json!({ "message": "Table created successfully", "table": table.name })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn field_types() -> axum::response::Response {
    (StatusCode::OK, Json(list_field_types())).into_response()
}

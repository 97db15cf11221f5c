use axum::extract::{Path, State};
use axum::Json;
use contracts::domain::a002_webhook::{WebhookDto, WebhookListener, WebhookUpdateDto};
use serde_json::json;

use crate::domain::a002_webhook;
use crate::domain::a002_webhook::dispatcher::TestDeliveryResult;
use crate::shared::state::AppState;

/// GET /api/webhooks
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<WebhookListener>>, axum::http::StatusCode> {
    match a002_webhook::service::list_all(&state.db).await {
        Ok(items) => Ok(Json(items)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/webhooks
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<WebhookDto>,
) -> Result<Json<WebhookListener>, axum::http::StatusCode> {
    match a002_webhook::service::create(&state.db, dto).await {
        Ok(listener) => Ok(Json(listener)),
        Err(e) => {
            tracing::error!("Failed to create webhook: {}", e);
            Err(axum::http::StatusCode::BAD_REQUEST)
        }
    }
}

/// PUT /api/webhooks/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(dto): Json<WebhookUpdateDto>,
) -> Result<Json<WebhookListener>, axum::http::StatusCode> {
    match a002_webhook::service::update(&state.db, id, dto).await {
        Ok(Some(listener)) => Ok(Json(listener)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// DELETE /api/webhooks/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(), axum::http::StatusCode> {
    match a002_webhook::service::delete(&state.db, id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/webhooks/test/:id
pub async fn test(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    match state.dispatcher.test_listener(&state.db, id).await {
        Ok(TestDeliveryResult::Status(code)) => Ok(Json(json!({ "code": code }))),
        Ok(TestDeliveryResult::NotFound) => Ok(Json(json!({ "code": "NOT_FOUND" }))),
        Ok(TestDeliveryResult::Failed) => Ok(Json(json!({ "code": "FAILED" }))),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

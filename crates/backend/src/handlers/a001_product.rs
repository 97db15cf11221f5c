use axum::extract::{Path, Query, State};
use axum::Json;
use contracts::domain::a001_product::{Product, ProductDto};
use serde::Deserialize;
use serde_json::json;

use crate::domain::a001_product;
use crate::shared::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductListParams {
    pub q: Option<String>,
    pub active: Option<bool>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

/// GET /api/products
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<Vec<Product>>, axum::http::StatusCode> {
    let size = params.size.unwrap_or(20).clamp(1, 1000);
    let page = params.page.unwrap_or(1).max(1);
    let offset = (page - 1) * size;
    let q = params.q.as_deref().filter(|s| !s.is_empty());

    match a001_product::service::list(&state.db, q, params.active, size, offset).await {
        Ok(items) => Ok(Json(items)),
        Err(e) => {
            tracing::error!("Failed to list products: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/products/:sku
pub async fn get_by_sku(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> Result<Json<Product>, axum::http::StatusCode> {
    match a001_product::service::get_by_sku(&state.db, &sku).await {
        Ok(Some(product)) => Ok(Json(product)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/products
pub async fn upsert(
    State(state): State<AppState>,
    Json(dto): Json<ProductDto>,
) -> Result<Json<Product>, axum::http::StatusCode> {
    match a001_product::service::upsert(&state.db, &state.dispatcher, dto).await {
        Ok(product) => Ok(Json(product)),
        Err(e) => {
            tracing::error!("Failed to upsert product: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// DELETE /api/products/:sku
pub async fn delete(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> Result<(), axum::http::StatusCode> {
    match a001_product::service::delete(&state.db, &state.dispatcher, &sku).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/products/delete-all
pub async fn delete_all(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    match a001_product::service::delete_all(&state.db, &state.dispatcher).await {
        Ok(removed) => Ok(Json(json!({ "removed": removed }))),
        Err(e) => {
            tracing::error!("Failed to clear catalog: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

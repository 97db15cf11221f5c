use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, shared::state::AppState};

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // PRODUCTS (Catalog Store)
        // ========================================
        .route(
            "/api/products",
            get(handlers::a001_product::list).post(handlers::a001_product::upsert),
        )
        .route(
            "/api/products/delete-all",
            post(handlers::a001_product::delete_all),
        )
        .route(
            "/api/products/:sku",
            get(handlers::a001_product::get_by_sku).delete(handlers::a001_product::delete),
        )
        // ========================================
        // WEBHOOK LISTENERS
        // ========================================
        .route(
            "/api/webhooks",
            get(handlers::a002_webhook::list).post(handlers::a002_webhook::create),
        )
        .route(
            "/api/webhooks/:id",
            put(handlers::a002_webhook::update).delete(handlers::a002_webhook::delete),
        )
        .route("/api/webhooks/test/:id", post(handlers::a002_webhook::test))
        // ========================================
        // U101 CSV IMPORT
        // ========================================
        .route("/api/import", post(handlers::u101_import::submit))
        .route(
            "/api/import/:job_id/progress",
            get(handlers::u101_import::get_progress),
        )
        .with_state(state)
}

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::a002_webhook::dispatcher::WebhookDispatcher;
use crate::usecases::u101_import_products::ImportExecutor;

/// Явно сконструированные зависимости приложения. Передаются в хендлеры
/// через `axum::extract::State` — никаких глобальных синглтонов.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub dispatcher: WebhookDispatcher,
    pub import: Arc<ImportExecutor>,
}

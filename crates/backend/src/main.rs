pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod usecases;

use domain::a002_webhook::dispatcher::WebhookDispatcher;
use shared::state::AppState;
use usecases::u101_import_products::ImportExecutor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Создаем директорию для логов
    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("backend.log"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                // Отключаем логи SQL запросов, но оставляем логи приложения
                "info,sqlx=warn,sea_orm=warn".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    let config = shared::config::load_config()?;
    let db_path = shared::config::get_database_path(&config)?;
    let db = shared::data::db::initialize_database(db_path.to_str()).await?;

    let dispatcher = WebhookDispatcher::new(Duration::from_secs(config.webhooks.timeout_secs))?;
    let import = Arc::new(ImportExecutor::new(db.clone(), config.import.clone()));
    let state = AppState {
        db,
        dispatcher,
        import,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = routes::configure_routes(state).layer(cors);

    let addr: SocketAddr = config.server.bind_addr.parse()?;
    tracing::info!("Catalog backend listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

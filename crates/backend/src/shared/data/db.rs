use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};

/// Minimal schema bootstrap: таблицы создаются при старте, если их нет.
/// `sku` — натуральный ключ каталога, `job_id` — ключ строки прогресса
/// (PRIMARY KEY обеспечивает upsert-at-resubmit семантику).
const SCHEMA_BOOTSTRAP: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS a001_product (
        sku TEXT NOT NULL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        active INTEGER NOT NULL DEFAULT 1,
        updated_at TEXT
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS a002_webhook (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        url TEXT NOT NULL,
        event TEXT NOT NULL,
        enabled INTEGER NOT NULL DEFAULT 1
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS u101_import_job (
        job_id TEXT NOT NULL PRIMARY KEY,
        "current" INTEGER NOT NULL DEFAULT 0,
        total INTEGER NOT NULL DEFAULT 0,
        state TEXT NOT NULL,
        updated_at TEXT
    );
    "#,
];

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<DatabaseConnection> {
    let db_file = db_path.unwrap_or("target/db/catalog.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    let conn = Database::connect(&db_url).await?;
    bootstrap_schema(&conn).await?;

    tracing::info!("Database initialized at: {}", absolute_path.display());
    Ok(conn)
}

/// In-memory база для тестов. Один коннект в пуле, иначе каждый
/// коннект sqlite получает собственную пустую `:memory:` базу.
pub async fn initialize_in_memory() -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1).sqlx_logging(false);
    let conn = Database::connect(options).await?;
    bootstrap_schema(&conn).await?;
    Ok(conn)
}

async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    for ddl in SCHEMA_BOOTSTRAP {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            ddl.to_string(),
        ))
        .await?;
    }
    Ok(())
}

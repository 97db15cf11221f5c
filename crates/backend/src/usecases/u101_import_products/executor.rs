use contracts::usecases::u101_import_products::{ImportJobProgress, ImportSubmitResponse};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use super::{csv_rows, engine::BatchUpsertEngine, error::ImportError};
use crate::domain::a003_import_job::repository;
use crate::shared::config::ImportConfig;

/// Executor задачи импорта: принимает сырые байты CSV, уводит обработку
/// в фоновую tokio-задачу и сразу возвращает job_id для опроса.
pub struct ImportExecutor {
    db: DatabaseConnection,
    config: ImportConfig,
}

impl ImportExecutor {
    pub fn new(db: DatabaseConnection, config: ImportConfig) -> Self {
        Self { db, config }
    }

    /// Принять файл в работу. Обработка идет вне цикла запрос/ответ;
    /// уникальный job_id на каждую отправку.
    pub fn submit(&self, csv_bytes: Vec<u8>) -> ImportSubmitResponse {
        let job_id = Uuid::new_v4().to_string();
        tracing::info!("Import job {} accepted ({} bytes)", job_id, csv_bytes.len());

        let db = self.db.clone();
        let config = self.config.clone();
        let id = job_id.clone();
        tokio::spawn(async move {
            if let Err(e) = run_import(&db, &config, &id, &csv_bytes).await {
                // Строка прогресса уже переведена в FAILED; здесь ошибка
                // уходит в отчетность воркера
                tracing::error!("Import job {} failed: {}", id, e);
            }
        });

        ImportSubmitResponse { job_id }
    }

    /// Снимок прогресса; None для неизвестного job_id
    pub async fn get_progress(&self, job_id: &str) -> anyhow::Result<Option<ImportJobProgress>> {
        Ok(repository::get(&self.db, job_id).await?.map(Into::into))
    }
}

/// Один прогон импорта: pre-scan -> STARTED -> пакетная обработка с
/// отметками прогресса -> SUCCESS, либо FAILED с последующим пробросом
/// ошибки. Любой путь провала сперва фиксирует FAILED, чтобы опрос видел
/// терминальное состояние раньше, чем ошибка уйдет наверх.
pub(crate) async fn run_import(
    db: &DatabaseConnection,
    config: &ImportConfig,
    job_id: &str,
    csv_bytes: &[u8],
) -> Result<(), ImportError> {
    let rows = match csv_rows::parse_rows(csv_bytes) {
        Ok(rows) => rows,
        Err(e) => {
            record_failure(db, job_id).await;
            return Err(e);
        }
    };
    let total = rows.len() as i64;

    if let Err(e) = repository::upsert_started(db, job_id, total).await {
        record_failure(db, job_id).await;
        return Err(e.into());
    }

    match process_rows(db, config, job_id, rows, total).await {
        Ok(()) => {
            repository::mark_success(db, job_id, total).await?;
            tracing::info!("Import job {} succeeded: {} rows", job_id, total);
            Ok(())
        }
        Err(e) => {
            record_failure(db, job_id).await;
            Err(e)
        }
    }
}

async fn process_rows(
    db: &DatabaseConnection,
    config: &ImportConfig,
    job_id: &str,
    rows: Vec<contracts::domain::a001_product::Product>,
    total: i64,
) -> Result<(), ImportError> {
    let mut engine = BatchUpsertEngine::new(config.batch_size);
    let interval = config.progress_interval.max(1) as i64;

    for (i, row) in rows.into_iter().enumerate() {
        let processed = (i + 1) as i64;
        let is_last = processed == total;

        engine.push(db, row).await?;
        if is_last {
            // Хвост уходит в каталог до финальной отметки прогресса
            engine.finish(db).await?;
        }

        // Отметка каждые N строк и на последней строке; независимый
        // короткий statement, не внутри пакетной записи каталога
        if processed % interval == 0 || is_last {
            repository::update_progress(db, job_id, processed).await?;
        }
    }

    Ok(())
}

/// FAILED должен попасть в строку прогресса даже если сама запись падает —
/// тогда остается хотя бы лог
async fn record_failure(db: &DatabaseConnection, job_id: &str) {
    if let Err(e) = repository::mark_failed(db, job_id).await {
        tracing::error!("Could not record FAILED state for job {}: {}", job_id, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_product;
    use crate::shared::data::db::initialize_in_memory;
    use contracts::usecases::u101_import_products::ImportJobState;
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    fn config(batch_size: usize, progress_interval: usize) -> ImportConfig {
        ImportConfig {
            batch_size,
            progress_interval,
        }
    }

    async fn job_row(db: &DatabaseConnection, job_id: &str) -> (ImportJobState, i64, i64) {
        let m = repository::get(db, job_id).await.unwrap().unwrap();
        (m.state.parse().unwrap(), m.current, m.total)
    }

    async fn drop_catalog_table(db: &DatabaseConnection) {
        db.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "DROP TABLE a001_product".to_string(),
        ))
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_import_three_rows() {
        let db = initialize_in_memory().await.unwrap();
        let csv = "sku,name\na,Widget\nB,Gadget\na,Widget2\n";

        run_import(&db, &config(2, 500), "j1", csv.as_bytes())
            .await
            .unwrap();

        assert_eq!(job_row(&db, "j1").await, (ImportJobState::Success, 3, 3));
        assert_eq!(a001_product::repository::count(&db).await.unwrap(), 2);
        let a = a001_product::repository::get_by_sku(&db, "a")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(a.name, "Widget2");
        let b = a001_product::repository::get_by_sku(&db, "b")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(b.name, "Gadget");
    }

    #[tokio::test]
    async fn test_import_empty_file_succeeds() {
        let db = initialize_in_memory().await.unwrap();
        run_import(&db, &config(2000, 500), "j1", b"sku,name\n")
            .await
            .unwrap();
        assert_eq!(job_row(&db, "j1").await, (ImportJobState::Success, 0, 0));
    }

    #[tokio::test]
    async fn test_storage_failure_before_first_checkpoint() {
        let db = initialize_in_memory().await.unwrap();
        let mut csv = String::from("sku,name\n");
        for i in 0..600 {
            csv.push_str(&format!("sku-{},Item\n", i));
        }
        drop_catalog_table(&db).await;

        // Первый flush на строке 100 падает раньше отметки на 500
        let err = run_import(&db, &config(100, 500), "j1", csv.as_bytes())
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Storage(_)));
        assert_eq!(job_row(&db, "j1").await, (ImportJobState::Failed, 0, 600));
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_last_checkpoint() {
        let db = initialize_in_memory().await.unwrap();
        let mut csv = String::from("sku,name\n");
        for i in 0..600 {
            csv.push_str(&format!("sku-{},Item\n", i));
        }
        drop_catalog_table(&db).await;

        // Батч больше файла: единственный flush в finish, после отметки 500
        let err = run_import(&db, &config(2000, 500), "j1", csv.as_bytes())
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Storage(_)));
        assert_eq!(job_row(&db, "j1").await, (ImportJobState::Failed, 500, 600));
    }

    #[tokio::test]
    async fn test_malformed_row_fails_job() {
        let db = initialize_in_memory().await.unwrap();
        let csv = "sku,name\na,Widget\n,NoSku\n";

        let err = run_import(&db, &config(2000, 500), "j1", csv.as_bytes())
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::InvalidRow { row: 2, field: "sku" }));
        // Провал разбора виден опросу как FAILED
        assert_eq!(job_row(&db, "j1").await, (ImportJobState::Failed, 0, 0));
    }

    #[tokio::test]
    async fn test_resubmitted_job_id_overwrites() {
        let db = initialize_in_memory().await.unwrap();
        run_import(&db, &config(2000, 500), "j1", b"sku,name\na,Widget\n")
            .await
            .unwrap();
        assert_eq!(job_row(&db, "j1").await, (ImportJobState::Success, 1, 1));

        run_import(
            &db,
            &config(2000, 500),
            "j1",
            b"sku,name\na,Widget\nb,Gadget\n",
        )
        .await
        .unwrap();
        assert_eq!(job_row(&db, "j1").await, (ImportJobState::Success, 2, 2));
    }

    #[tokio::test]
    async fn test_submit_runs_in_background() {
        let db = initialize_in_memory().await.unwrap();
        let executor = ImportExecutor::new(db.clone(), config(2000, 500));

        let response = executor.submit(b"sku,name\na,Widget\n".to_vec());
        assert!(!response.job_id.is_empty());

        // Задача уходит в фон; дожидаемся терминального состояния
        let mut progress = None;
        for _ in 0..100 {
            if let Some(p) = executor.get_progress(&response.job_id).await.unwrap() {
                if p.state.is_terminal() {
                    progress = Some(p);
                    break;
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        let progress = progress.expect("job never reached a terminal state");
        assert_eq!(progress.state, ImportJobState::Success);
        assert_eq!(progress.current, 1);
    }

    #[tokio::test]
    async fn test_unknown_job_progress_is_none() {
        let db = initialize_in_memory().await.unwrap();
        let executor = ImportExecutor::new(db, config(2000, 500));
        assert!(executor.get_progress("ghost").await.unwrap().is_none());
    }
}

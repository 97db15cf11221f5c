use chrono::Utc;
use contracts::usecases::u101_import_products::{ImportJobProgress, ImportJobState};
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

/// Строка прогресса: одна на задачу импорта, ключ — job_id.
/// Переходы состояний только вперед, терминальная строка не перезаписывается
/// (кроме полного overwrite при повторной отправке того же job_id).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "u101_import_job")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub job_id: String,
    pub current: i64,
    pub total: i64,
    pub state: String,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ImportJobProgress {
    fn from(m: Model) -> Self {
        let state = m.state.parse().unwrap_or(ImportJobState::Failed);
        ImportJobProgress {
            job_id: m.job_id,
            state,
            current: m.current,
            total: m.total,
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Фиксация старта задачи: current=0, state=STARTED. Повторная отправка
/// того же job_id перезаписывает строку целиком, а не ругается.
pub async fn upsert_started(
    db: &DatabaseConnection,
    job_id: &str,
    total: i64,
) -> anyhow::Result<()> {
    let active = ActiveModel {
        job_id: Set(job_id.to_string()),
        current: Set(0),
        total: Set(total),
        state: Set(ImportJobState::Started.as_str().to_string()),
        updated_at: Set(Some(Utc::now())),
    };
    Entity::insert(active)
        .on_conflict(
            OnConflict::column(Column::JobId)
                .update_columns([
                    Column::Current,
                    Column::Total,
                    Column::State,
                    Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec(db)
        .await?;
    Ok(())
}

/// Периодическая отметка прогресса. Терминальные строки не трогаются —
/// фильтр по state гарантирует, что SUCCESS/FAILED не откатываются в PROGRESS.
pub async fn update_progress(
    db: &DatabaseConnection,
    job_id: &str,
    current: i64,
) -> anyhow::Result<()> {
    Entity::update_many()
        .col_expr(Column::Current, Expr::value(current))
        .col_expr(
            Column::State,
            Expr::value(ImportJobState::Progress.as_str()),
        )
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::JobId.eq(job_id))
        .filter(Column::State.is_in([
            ImportJobState::Started.as_str(),
            ImportJobState::Progress.as_str(),
        ]))
        .exec(db)
        .await?;
    Ok(())
}

/// Финализация успеха: current добивается до total
pub async fn mark_success(db: &DatabaseConnection, job_id: &str, total: i64) -> anyhow::Result<()> {
    Entity::update_many()
        .col_expr(Column::Current, Expr::value(total))
        .col_expr(Column::State, Expr::value(ImportJobState::Success.as_str()))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::JobId.eq(job_id))
        .filter(Column::State.is_in([
            ImportJobState::Started.as_str(),
            ImportJobState::Progress.as_str(),
        ]))
        .exec(db)
        .await?;
    Ok(())
}

/// Финализация неудачи: current остается на последней отметке.
/// Если строки еще нет (провал до записи STARTED), она создается сразу
/// терминальной, чтобы опрос видел FAILED.
pub async fn mark_failed(db: &DatabaseConnection, job_id: &str) -> anyhow::Result<()> {
    let result = Entity::update_many()
        .col_expr(Column::State, Expr::value(ImportJobState::Failed.as_str()))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::JobId.eq(job_id))
        .filter(Column::State.is_in([
            ImportJobState::Started.as_str(),
            ImportJobState::Progress.as_str(),
        ]))
        .exec(db)
        .await?;

    if result.rows_affected == 0 && get(db, job_id).await?.is_none() {
        let active = ActiveModel {
            job_id: Set(job_id.to_string()),
            current: Set(0),
            total: Set(0),
            state: Set(ImportJobState::Failed.as_str().to_string()),
            updated_at: Set(Some(Utc::now())),
        };
        active.insert(db).await?;
    }
    Ok(())
}

pub async fn get(db: &DatabaseConnection, job_id: &str) -> anyhow::Result<Option<Model>> {
    let result = Entity::find_by_id(job_id.to_string()).one(db).await?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::initialize_in_memory;

    async fn state_of(db: &DatabaseConnection, job_id: &str) -> (String, i64, i64) {
        let m = get(db, job_id).await.unwrap().unwrap();
        (m.state, m.current, m.total)
    }

    #[tokio::test]
    async fn test_started_then_progress() {
        let db = initialize_in_memory().await.unwrap();
        upsert_started(&db, "j1", 1000).await.unwrap();
        assert_eq!(state_of(&db, "j1").await, ("STARTED".into(), 0, 1000));

        update_progress(&db, "j1", 500).await.unwrap();
        assert_eq!(state_of(&db, "j1").await, ("PROGRESS".into(), 500, 1000));
    }

    #[tokio::test]
    async fn test_resubmit_overwrites_row() {
        let db = initialize_in_memory().await.unwrap();
        upsert_started(&db, "j1", 10).await.unwrap();
        update_progress(&db, "j1", 5).await.unwrap();
        mark_success(&db, "j1", 10).await.unwrap();

        // Та же задача отправлена заново — строка перезаписывается
        upsert_started(&db, "j1", 20).await.unwrap();
        assert_eq!(state_of(&db, "j1").await, ("STARTED".into(), 0, 20));
    }

    #[tokio::test]
    async fn test_terminal_state_never_regresses() {
        let db = initialize_in_memory().await.unwrap();
        upsert_started(&db, "j1", 10).await.unwrap();
        mark_success(&db, "j1", 10).await.unwrap();

        // Запоздавшие отметки прогресса и повторные финализации игнорируются
        update_progress(&db, "j1", 7).await.unwrap();
        assert_eq!(state_of(&db, "j1").await, ("SUCCESS".into(), 10, 10));

        mark_failed(&db, "j1").await.unwrap();
        assert_eq!(state_of(&db, "j1").await, ("SUCCESS".into(), 10, 10));
    }

    #[tokio::test]
    async fn test_failed_keeps_last_checkpoint() {
        let db = initialize_in_memory().await.unwrap();
        upsert_started(&db, "j1", 2000).await.unwrap();
        update_progress(&db, "j1", 500).await.unwrap();
        mark_failed(&db, "j1").await.unwrap();
        assert_eq!(state_of(&db, "j1").await, ("FAILED".into(), 500, 2000));
    }

    #[tokio::test]
    async fn test_failed_without_started_row() {
        let db = initialize_in_memory().await.unwrap();
        mark_failed(&db, "never-started").await.unwrap();
        assert_eq!(
            state_of(&db, "never-started").await,
            ("FAILED".into(), 0, 0)
        );
    }

    #[tokio::test]
    async fn test_get_unknown_job() {
        let db = initialize_in_memory().await.unwrap();
        assert!(get(&db, "ghost").await.unwrap().is_none());
    }
}

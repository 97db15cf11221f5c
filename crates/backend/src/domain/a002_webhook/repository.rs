use contracts::domain::a002_webhook::{WebhookDto, WebhookListener, WebhookUpdateDto};
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_webhook")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub url: String,
    pub event: String,
    pub enabled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for WebhookListener {
    fn from(m: Model) -> Self {
        WebhookListener {
            id: m.id,
            url: m.url,
            event: m.event,
            enabled: m.enabled,
        }
    }
}

pub async fn insert(db: &DatabaseConnection, dto: WebhookDto) -> anyhow::Result<WebhookListener> {
    let active = ActiveModel {
        url: Set(dto.url),
        event: Set(dto.event),
        enabled: Set(dto.enabled.unwrap_or(true)),
        ..Default::default()
    };
    let model = active.insert(db).await?;
    Ok(model.into())
}

pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> anyhow::Result<Option<WebhookListener>> {
    let result = Entity::find_by_id(id).one(db).await?;
    Ok(result.map(Into::into))
}

pub async fn list_all(db: &DatabaseConnection) -> anyhow::Result<Vec<WebhookListener>> {
    let items = Entity::find()
        .order_by_asc(Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Кандидаты на доставку: только включенные и подписанные на это событие
pub async fn list_enabled_for_event(
    db: &DatabaseConnection,
    event: &str,
) -> anyhow::Result<Vec<WebhookListener>> {
    let items = Entity::find()
        .filter(Column::Event.eq(event))
        .filter(Column::Enabled.eq(true))
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Частичное обновление; None-поля не трогаются
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    dto: WebhookUpdateDto,
) -> anyhow::Result<Option<WebhookListener>> {
    let Some(model) = Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut active: ActiveModel = model.into();
    if let Some(url) = dto.url {
        active.url = Set(url);
    }
    if let Some(event) = dto.event {
        active.event = Set(event);
    }
    if let Some(enabled) = dto.enabled {
        active.enabled = Set(enabled);
    }
    let updated = active.update(db).await?;
    Ok(Some(updated.into()))
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::initialize_in_memory;

    fn dto(url: &str, event: &str, enabled: Option<bool>) -> WebhookDto {
        WebhookDto {
            url: url.into(),
            event: event.into(),
            enabled,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = initialize_in_memory().await.unwrap();
        let created = insert(&db, dto("http://one/", "product.created", None))
            .await
            .unwrap();
        assert!(created.enabled);
        assert!(created.id > 0);

        let all = list_all(&db).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_enabled_for_event_filter() {
        let db = initialize_in_memory().await.unwrap();
        insert(&db, dto("http://one/", "product.created", Some(true)))
            .await
            .unwrap();
        insert(&db, dto("http://two/", "product.created", Some(false)))
            .await
            .unwrap();
        insert(&db, dto("http://three/", "product.deleted", Some(true)))
            .await
            .unwrap();

        let candidates = list_enabled_for_event(&db, "product.created").await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url, "http://one/");
    }

    #[tokio::test]
    async fn test_partial_update() {
        let db = initialize_in_memory().await.unwrap();
        let created = insert(&db, dto("http://one/", "product.created", None))
            .await
            .unwrap();

        let updated = update(
            &db,
            created.id,
            WebhookUpdateDto {
                enabled: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert!(!updated.enabled);
        assert_eq!(updated.url, "http://one/");

        assert!(update(&db, 9999, WebhookUpdateDto::default())
            .await
            .unwrap()
            .is_none());
    }
}

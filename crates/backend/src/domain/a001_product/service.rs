use contracts::domain::a001_product::{Product, ProductDto};
use sea_orm::DatabaseConnection;
use serde_json::json;

use super::repository;
use crate::domain::a002_webhook::dispatcher::WebhookDispatcher;

/// Создание или обновление товара по натуральному ключу.
/// После фиксации записи уходит событие product.created / product.updated;
/// результат доставки не влияет на исход мутации.
pub async fn upsert(
    db: &DatabaseConnection,
    dispatcher: &WebhookDispatcher,
    dto: ProductDto,
) -> anyhow::Result<Product> {
    let product: Product = dto.into();
    if product.sku.is_empty() {
        anyhow::bail!("Validation failed: sku must not be empty");
    }
    if product.name.is_empty() {
        anyhow::bail!("Validation failed: name must not be empty");
    }

    let existed = repository::get_by_sku(db, &product.sku).await?.is_some();
    repository::upsert_batch(db, vec![product.clone()]).await?;

    let event = if existed {
        "product.updated"
    } else {
        "product.created"
    };
    dispatcher.dispatch(db, event, json!({ "sku": product.sku.clone() }));

    Ok(product)
}

/// Удаление товара. Событие product.deleted уходит только если строка была.
pub async fn delete(
    db: &DatabaseConnection,
    dispatcher: &WebhookDispatcher,
    sku: &str,
) -> anyhow::Result<bool> {
    let sku = Product::normalize_sku(sku);
    let deleted = repository::delete_by_sku(db, &sku).await?;
    if deleted {
        dispatcher.dispatch(db, "product.deleted", json!({ "sku": sku }));
    }
    Ok(deleted)
}

/// Полная очистка каталога
pub async fn delete_all(
    db: &DatabaseConnection,
    dispatcher: &WebhookDispatcher,
) -> anyhow::Result<u64> {
    let removed = repository::delete_all(db).await?;
    dispatcher.dispatch(db, "product.bulk_deleted", json!({ "all": true, "removed": removed }));
    Ok(removed)
}

pub async fn get_by_sku(db: &DatabaseConnection, sku: &str) -> anyhow::Result<Option<Product>> {
    repository::get_by_sku(db, &Product::normalize_sku(sku)).await
}

pub async fn list(
    db: &DatabaseConnection,
    q: Option<&str>,
    active: Option<bool>,
    limit: u64,
    offset: u64,
) -> anyhow::Result<Vec<Product>> {
    repository::list_filtered(db, q, active, limit, offset).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::initialize_in_memory;
    use std::time::Duration;

    fn dispatcher() -> WebhookDispatcher {
        WebhookDispatcher::new(Duration::from_secs(1)).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_normalizes_sku() {
        let db = initialize_in_memory().await.unwrap();
        let dto = ProductDto {
            sku: " ABC-1 ".into(),
            name: "Widget".into(),
            description: None,
            active: None,
        };

        let product = upsert(&db, &dispatcher(), dto).await.unwrap();
        assert_eq!(product.sku, "abc-1");
        assert!(get_by_sku(&db, "ABC-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_upsert_rejects_blank_fields() {
        let db = initialize_in_memory().await.unwrap();
        let dto = ProductDto {
            sku: "   ".into(),
            name: "Widget".into(),
            description: None,
            active: None,
        };
        assert!(upsert(&db, &dispatcher(), dto).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_reports_missing_row() {
        let db = initialize_in_memory().await.unwrap();
        assert!(!delete(&db, &dispatcher(), "ghost").await.unwrap());
    }
}

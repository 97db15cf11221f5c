use contracts::domain::a002_webhook::{WebhookDto, WebhookListener, WebhookUpdateDto};
use sea_orm::DatabaseConnection;

use super::repository;

/// Регистрация слушателя. URL должен быть корректным http(s)-адресом.
pub async fn create(db: &DatabaseConnection, dto: WebhookDto) -> anyhow::Result<WebhookListener> {
    validate_url(&dto.url)?;
    if dto.event.trim().is_empty() {
        anyhow::bail!("Validation failed: event must not be empty");
    }
    repository::insert(db, dto).await
}

pub async fn list_all(db: &DatabaseConnection) -> anyhow::Result<Vec<WebhookListener>> {
    repository::list_all(db).await
}

pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    dto: WebhookUpdateDto,
) -> anyhow::Result<Option<WebhookListener>> {
    if let Some(url) = &dto.url {
        validate_url(url)?;
    }
    repository::update(db, id, dto).await
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> anyhow::Result<bool> {
    repository::delete(db, id).await
}

fn validate_url(url: &str) -> anyhow::Result<()> {
    let parsed: reqwest::Url = url
        .parse()
        .map_err(|e| anyhow::anyhow!("Validation failed: invalid url: {}", e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("Validation failed: url must be http or https");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::initialize_in_memory;

    #[tokio::test]
    async fn test_create_rejects_bad_url() {
        let db = initialize_in_memory().await.unwrap();
        let dto = WebhookDto {
            url: "ftp://example.com/hook".into(),
            event: "product.created".into(),
            enabled: None,
        };
        assert!(create(&db, dto).await.is_err());

        let dto = WebhookDto {
            url: "not a url".into(),
            event: "product.created".into(),
            enabled: None,
        };
        assert!(create(&db, dto).await.is_err());
    }

    #[tokio::test]
    async fn test_create_and_delete() {
        let db = initialize_in_memory().await.unwrap();
        let created = create(
            &db,
            WebhookDto {
                url: "https://example.com/hook".into(),
                event: "product.created".into(),
                enabled: None,
            },
        )
        .await
        .unwrap();

        assert!(delete(&db, created.id).await.unwrap());
        assert!(!delete(&db, created.id).await.unwrap());
    }
}

use std::time::Duration;

use contracts::domain::a002_webhook::{WebhookEventPayload, WebhookListener};
use sea_orm::DatabaseConnection;
use tokio::task::JoinSet;

use super::repository;

/// Результат одной попытки доставки. Ошибки доставки никогда не
/// поднимаются к вызвавшей мутации — только фиксируются в исходе.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// 2xx от слушателя
    Delivered { listener_id: i32, status: u16 },
    /// Ответ получен, но не 2xx
    Rejected { listener_id: i32, status: u16 },
    /// Таймаут или ошибка соединения
    Unreachable { listener_id: i32 },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// Результат ручной проверки слушателя (POST /api/webhooks/test/:id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestDeliveryResult {
    NotFound,
    Status(u16),
    Failed,
}

/// Best-effort fan-out уведомлений по зарегистрированным слушателям.
/// Доставка at-most-once: без ретраев, без персистентности неудач.
#[derive(Clone)]
pub struct WebhookDispatcher {
    client: reqwest::Client,
}

impl WebhookDispatcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Fire-and-forget: уводит доставку в фоновую задачу, чтобы медленный
    /// или мертвый слушатель не задерживал ответ мутации.
    pub fn dispatch(&self, db: &DatabaseConnection, event: &str, data: serde_json::Value) {
        let dispatcher = self.clone();
        let db = db.clone();
        let event = event.to_string();
        tokio::spawn(async move {
            let outcomes = dispatcher.dispatch_all(&db, &event, data).await;
            let failed = outcomes.iter().filter(|o| !o.is_delivered()).count();
            if failed > 0 {
                tracing::warn!(
                    "Webhook event {}: {}/{} deliveries failed",
                    event,
                    failed,
                    outcomes.len()
                );
            }
        });
    }

    /// Доставить событие всем включенным слушателям. Слушатели опрашиваются
    /// независимо и конкурентно; порядок исходов не специфицирован.
    pub async fn dispatch_all(
        &self,
        db: &DatabaseConnection,
        event: &str,
        data: serde_json::Value,
    ) -> Vec<DeliveryOutcome> {
        let listeners = match repository::list_enabled_for_event(db, event).await {
            Ok(listeners) => listeners,
            Err(e) => {
                // Сбой чтения реестра не должен валить мутацию
                tracing::warn!("Webhook registry read failed for {}: {}", event, e);
                return Vec::new();
            }
        };
        if listeners.is_empty() {
            return Vec::new();
        }

        let payload = WebhookEventPayload::new(event, data);

        let mut tasks = JoinSet::new();
        for listener in listeners {
            let client = self.client.clone();
            let payload = payload.clone();
            tasks.spawn(async move { deliver(client, listener, payload).await });
        }

        let mut outcomes = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            if let Ok(outcome) = joined {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Пробный POST `{"test": true}` на слушателя по id
    pub async fn test_listener(
        &self,
        db: &DatabaseConnection,
        id: i32,
    ) -> anyhow::Result<TestDeliveryResult> {
        let Some(listener) = repository::get_by_id(db, id).await? else {
            return Ok(TestDeliveryResult::NotFound);
        };

        let result = self
            .client
            .post(&listener.url)
            .json(&serde_json::json!({ "test": true }))
            .send()
            .await;

        match result {
            Ok(response) => Ok(TestDeliveryResult::Status(response.status().as_u16())),
            Err(e) => {
                tracing::debug!("Webhook test delivery to {} failed: {}", listener.url, e);
                Ok(TestDeliveryResult::Failed)
            }
        }
    }
}

async fn deliver(
    client: reqwest::Client,
    listener: WebhookListener,
    payload: WebhookEventPayload,
) -> DeliveryOutcome {
    match client.post(&listener.url).json(&payload).send().await {
        Ok(response) if response.status().is_success() => DeliveryOutcome::Delivered {
            listener_id: listener.id,
            status: response.status().as_u16(),
        },
        Ok(response) => {
            tracing::debug!(
                "Listener {} rejected event {}: HTTP {}",
                listener.id,
                payload.event,
                response.status()
            );
            DeliveryOutcome::Rejected {
                listener_id: listener.id,
                status: response.status().as_u16(),
            }
        }
        Err(e) => {
            tracing::debug!(
                "Listener {} unreachable for event {}: {}",
                listener.id,
                payload.event,
                e
            );
            DeliveryOutcome::Unreachable {
                listener_id: listener.id,
            }
        }
    }
}

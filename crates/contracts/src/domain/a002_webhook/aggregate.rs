use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Aggregate
// ============================================================================

/// Зарегистрированный webhook-слушатель. Доставку получают только записи
/// с `enabled = true` и совпадающим именем события.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookListener {
    pub id: i32,
    pub url: String,
    pub event: String,
    pub enabled: bool,
}

// ============================================================================
// DTO
// ============================================================================

/// Payload регистрации слушателя
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookDto {
    pub url: String,
    pub event: String,
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Частичное обновление слушателя (PUT /api/webhooks/:id)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookUpdateDto {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

// ============================================================================
// Wire payload
// ============================================================================

/// Тело исходящего POST при доставке события
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEventPayload {
    pub event: String,
    pub timestamp: DateTime<Utc>,
    pub data: serde_json::Value,
}

impl WebhookEventPayload {
    pub fn new(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            timestamp: Utc::now(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_payload_shape() {
        let payload = WebhookEventPayload::new("product.created", serde_json::json!({"sku": "a"}));
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["event"], "product.created");
        assert_eq!(value["data"]["sku"], "a");
        assert!(value["timestamp"].is_string());
    }
}

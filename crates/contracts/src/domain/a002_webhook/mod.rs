pub mod aggregate;

pub use aggregate::{WebhookDto, WebhookEventPayload, WebhookListener, WebhookUpdateDto};

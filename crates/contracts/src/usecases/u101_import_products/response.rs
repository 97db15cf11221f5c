use serde::{Deserialize, Serialize};

/// Ответ на загрузку CSV: идентификатор задачи для опроса прогресса
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSubmitResponse {
    pub job_id: String,
}

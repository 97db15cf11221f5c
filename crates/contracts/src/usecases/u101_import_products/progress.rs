use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Job lifecycle
// ============================================================================

/// Состояние задачи импорта.
/// Переходы только вперед: STARTED -> PROGRESS* -> (SUCCESS | FAILED).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportJobState {
    Started,
    Progress,
    Success,
    Failed,
}

impl ImportJobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportJobState::Started => "STARTED",
            ImportJobState::Progress => "PROGRESS",
            ImportJobState::Success => "SUCCESS",
            ImportJobState::Failed => "FAILED",
        }
    }

    /// Терминальное состояние больше не меняется
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportJobState::Success | ImportJobState::Failed)
    }
}

impl std::str::FromStr for ImportJobState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STARTED" => Ok(ImportJobState::Started),
            "PROGRESS" => Ok(ImportJobState::Progress),
            "SUCCESS" => Ok(ImportJobState::Success),
            "FAILED" => Ok(ImportJobState::Failed),
            other => Err(format!("Unknown import job state: {}", other)),
        }
    }
}

impl std::fmt::Display for ImportJobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Progress snapshot
// ============================================================================

/// Снимок прогресса одной задачи импорта
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportJobProgress {
    pub job_id: String,
    pub state: ImportJobState,
    pub current: i64,
    pub total: i64,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Poll contract
// ============================================================================

/// Состояние в ответе на опрос: PENDING для неизвестного job_id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PollState {
    Pending,
    Started,
    Progress,
    Success,
    Failed,
}

impl From<ImportJobState> for PollState {
    fn from(state: ImportJobState) -> Self {
        match state {
            ImportJobState::Started => PollState::Started,
            ImportJobState::Progress => PollState::Progress,
            ImportJobState::Success => PollState::Success,
            ImportJobState::Failed => PollState::Failed,
        }
    }
}

/// Ответ GET /api/import/:job_id/progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressQueryResponse {
    pub state: PollState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ProgressMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressMeta {
    pub current: i64,
    pub total: i64,
}

impl ProgressQueryResponse {
    /// Неизвестный job_id — не ошибка, а отдельный статус
    pub fn pending() -> Self {
        Self {
            state: PollState::Pending,
            meta: None,
        }
    }
}

impl From<ImportJobProgress> for ProgressQueryResponse {
    fn from(p: ImportJobProgress) -> Self {
        Self {
            state: p.state.into(),
            meta: Some(ProgressMeta {
                current: p.current,
                total: p.total,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trip() {
        for state in [
            ImportJobState::Started,
            ImportJobState::Progress,
            ImportJobState::Success,
            ImportJobState::Failed,
        ] {
            let parsed: ImportJobState = state.as_str().parse().unwrap();
            assert_eq!(parsed, state);
        }
        assert!("DONE".parse::<ImportJobState>().is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ImportJobState::Started.is_terminal());
        assert!(!ImportJobState::Progress.is_terminal());
        assert!(ImportJobState::Success.is_terminal());
        assert!(ImportJobState::Failed.is_terminal());
    }

    #[test]
    fn test_pending_serialization() {
        let value = serde_json::to_value(ProgressQueryResponse::pending()).unwrap();
        assert_eq!(value["state"], "PENDING");
        assert!(value.get("meta").is_none());
    }

    #[test]
    fn test_known_job_serialization() {
        let response: ProgressQueryResponse = ImportJobProgress {
            job_id: "j1".into(),
            state: ImportJobState::Progress,
            current: 500,
            total: 1000,
            updated_at: Utc::now(),
        }
        .into();
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["state"], "PROGRESS");
        assert_eq!(value["meta"]["current"], 500);
        assert_eq!(value["meta"]["total"], 1000);
    }
}

use axum::extract::{Multipart, Path, State};
use axum::Json;
use contracts::usecases::u101_import_products::{ImportSubmitResponse, ProgressQueryResponse};

use crate::shared::state::AppState;

/// POST /api/import — multipart CSV upload. Файл ставится в работу,
/// ответ с job_id уходит сразу, не дожидаясь обработки.
pub async fn submit(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportSubmitResponse>, axum::http::StatusCode> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| axum::http::StatusCode::BAD_REQUEST)?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|_| axum::http::StatusCode::BAD_REQUEST)?;
            return Ok(Json(state.import.submit(bytes.to_vec())));
        }
    }

    tracing::warn!("Import upload without `file` field");
    Err(axum::http::StatusCode::BAD_REQUEST)
}

/// GET /api/import/:job_id/progress — неизвестный job_id это PENDING,
/// а не ошибка
pub async fn get_progress(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<ProgressQueryResponse>, axum::http::StatusCode> {
    match state.import.get_progress(&job_id).await {
        Ok(Some(progress)) => Ok(Json(progress.into())),
        Ok(None) => Ok(Json(ProgressQueryResponse::pending())),
        Err(e) => {
            tracing::error!("Failed to read progress for job {}: {}", job_id, e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

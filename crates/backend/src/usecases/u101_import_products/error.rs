use thiserror::Error;

/// Ошибки пайплайна импорта. Входные и storage-ошибки фатальны для задачи:
/// Runner сначала фиксирует FAILED в строке прогресса, потом отдает ошибку
/// наверх.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Битый CSV (нечитаемая запись, отсутствующая колонка)
    #[error("CSV parse failed: {0}")]
    Csv(#[from] csv::Error),

    /// Строка без обязательного поля; валит задачу целиком
    #[error("row {row}: required field `{field}` is empty")]
    InvalidRow { row: usize, field: &'static str },

    /// Ошибка записи в каталог или в строку прогресса
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

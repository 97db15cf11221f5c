use contracts::domain::a001_product::Product;
use sea_orm::DatabaseConnection;

use super::error::ImportError;
use crate::domain::a001_product::repository;

/// Буферизует нормализованные строки и пишет их в каталог пакетами
/// фиксированного размера. Каждый flush — один идемпотентный upsert-statement;
/// атомарности между flush-ами нет, повтор всего импорта сходится к тому же
/// состоянию каталога.
pub struct BatchUpsertEngine {
    batch_size: usize,
    buffer: Vec<Product>,
    flushes: usize,
}

impl BatchUpsertEngine {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            buffer: Vec::new(),
            flushes: 0,
        }
    }

    /// Добавить строку; заполнившийся буфер уходит в каталог сразу
    pub async fn push(&mut self, db: &DatabaseConnection, row: Product) -> Result<(), ImportError> {
        self.buffer.push(row);
        if self.buffer.len() >= self.batch_size {
            self.flush(db).await?;
        }
        Ok(())
    }

    /// Сброс неполного хвоста после последней строки входа
    pub async fn finish(&mut self, db: &DatabaseConnection) -> Result<(), ImportError> {
        if !self.buffer.is_empty() {
            self.flush(db).await?;
        }
        Ok(())
    }

    /// Сколько flush-ей ушло в каталог
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    async fn flush(&mut self, db: &DatabaseConnection) -> Result<(), ImportError> {
        let batch = std::mem::take(&mut self.buffer);
        let size = batch.len();
        repository::upsert_batch(db, batch).await?;
        self.flushes += 1;
        tracing::debug!("Flushed batch #{} ({} rows)", self.flushes, size);
        Ok(())
    }
}

use contracts::domain::a001_product::Product;
use serde::Deserialize;

use super::error::ImportError;

/// Сырая строка CSV до нормализации. Строгая типизация вместо
/// динамической map: отсутствие обязательной колонки — ошибка парсинга,
/// а не runtime-падение на поиске ключа.
#[derive(Debug, Deserialize)]
struct RawRow {
    sku: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    active: Option<bool>,
}

/// Полный pre-scan входа: материализует все строки, чтобы total был
/// известен до начала обработки. Нормализация: trim всех полей, sku в
/// нижний регистр, description по умолчанию пустой, active по умолчанию true.
/// Строка с пустым sku или name валит разбор целиком.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<Product>, ImportError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(bytes);
    let mut rows = Vec::new();

    for (idx, record) in reader.deserialize::<RawRow>().enumerate() {
        // Номер строки данных, заголовок не считается
        let row = idx + 1;
        let raw = record?;

        let sku = raw.sku.trim().to_lowercase();
        if sku.is_empty() {
            return Err(ImportError::InvalidRow { row, field: "sku" });
        }
        let name = raw.name.trim().to_string();
        if name.is_empty() {
            return Err(ImportError::InvalidRow { row, field: "name" });
        }

        rows.push(Product {
            sku,
            name,
            description: raw.description.unwrap_or_default().trim().to_string(),
            active: raw.active.unwrap_or(true),
        });
    }

    Ok(rows)
}

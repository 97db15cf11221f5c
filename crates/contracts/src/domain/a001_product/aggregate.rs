use serde::{Deserialize, Serialize};

// ============================================================================
// Aggregate
// ============================================================================

/// Товар каталога. Натуральный ключ — `sku` (хранится в нижнем регистре).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Product {
    /// Нормализованный ключ каталога для произвольного ввода
    pub fn normalize_sku(raw: &str) -> String {
        raw.trim().to_lowercase()
    }
}

// ============================================================================
// DTO
// ============================================================================

/// Payload создания/обновления товара
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDto {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl From<ProductDto> for Product {
    fn from(dto: ProductDto) -> Self {
        Product {
            sku: Product::normalize_sku(&dto.sku),
            name: dto.name.trim().to_string(),
            description: dto.description.unwrap_or_default().trim().to_string(),
            active: dto.active.unwrap_or(true),
        }
    }
}

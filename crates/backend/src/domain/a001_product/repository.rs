use std::collections::HashMap;

use chrono::Utc;
use contracts::domain::a001_product::Product;
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub sku: String,
    pub name: String,
    pub description: String,
    pub active: bool,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(m: Model) -> Self {
        Product {
            sku: m.sku,
            name: m.name,
            description: m.description,
            active: m.active,
        }
    }
}

fn to_active(p: Product, now: chrono::DateTime<Utc>) -> ActiveModel {
    ActiveModel {
        sku: Set(p.sku),
        name: Set(p.name),
        description: Set(p.description),
        active: Set(p.active),
        updated_at: Set(Some(now)),
    }
}

/// Идемпотентный пакетный merge: вставка по `sku`, при конфликте —
/// перезапись name/description/active входящими значениями. Дубликаты
/// `sku` внутри пакета схлопываются до последнего встреченного (LWW)
/// еще до выполнения statement. Один пакет — один statement, атомарно.
pub async fn upsert_batch(db: &DatabaseConnection, rows: Vec<Product>) -> anyhow::Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    let mut merged: HashMap<String, Product> = HashMap::with_capacity(rows.len());
    for row in rows {
        merged.insert(row.sku.clone(), row);
    }

    let now = Utc::now();
    let models: Vec<ActiveModel> = merged.into_values().map(|p| to_active(p, now)).collect();

    Entity::insert_many(models)
        .on_conflict(
            OnConflict::column(Column::Sku)
                .update_columns([
                    Column::Name,
                    Column::Description,
                    Column::Active,
                    Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec(db)
        .await?;
    Ok(())
}

pub async fn get_by_sku(db: &DatabaseConnection, sku: &str) -> anyhow::Result<Option<Product>> {
    let result = Entity::find_by_id(sku.to_string()).one(db).await?;
    Ok(result.map(Into::into))
}

pub async fn list_all(db: &DatabaseConnection) -> anyhow::Result<Vec<Product>> {
    let items = Entity::find()
        .order_by_asc(Column::Sku)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Листинг с фильтрами: `q` ищет по name/sku, `active` фильтрует по флагу
pub async fn list_filtered(
    db: &DatabaseConnection,
    q: Option<&str>,
    active: Option<bool>,
    limit: u64,
    offset: u64,
) -> anyhow::Result<Vec<Product>> {
    let mut query = Entity::find();

    if let Some(q) = q {
        let pattern = format!("%{}%", q);
        query = query.filter(
            Condition::any()
                .add(Column::Name.like(&pattern))
                .add(Column::Sku.like(&pattern)),
        );
    }
    if let Some(active) = active {
        query = query.filter(Column::Active.eq(active));
    }

    let items = query
        .order_by_asc(Column::Sku)
        .limit(limit)
        .offset(offset)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn count(db: &DatabaseConnection) -> anyhow::Result<u64> {
    Ok(Entity::find().count(db).await?)
}

pub async fn delete_by_sku(db: &DatabaseConnection, sku: &str) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(sku.to_string()).exec(db).await?;
    Ok(result.rows_affected > 0)
}

pub async fn delete_all(db: &DatabaseConnection) -> anyhow::Result<u64> {
    let result = Entity::delete_many().exec(db).await?;
    Ok(result.rows_affected)
}

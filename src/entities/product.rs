//! Product entity - An item a store sells, with its price and stock on hand.
//!
//! Stock is only ever decremented by invoice creation (see `core::invoice`) or
//! overwritten by an explicit product update. It never goes below zero.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the store that owns this product
    pub store_id: i64,
    /// Name shown on invoices (e.g., "Green Tea 250g")
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// URL of the product image
    pub image: Option<String>,
    /// Unit price
    pub price: f64,
    /// Units on hand
    pub stock: i64,
    /// Stock keeping unit code
    pub sku: Option<String>,
    /// Stock level at or below which the product is reported as running low
    pub low_stock_threshold: i64,
    /// When the product was created
    pub created_at: DateTimeUtc,
    /// When the product was last modified (including stock decrements)
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to one store
    #[sea_orm(
        belongs_to = "super::store::Entity",
        from = "Column::StoreId",
        to = "super::store::Column::Id"
    )]
    Store,
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Invoice item entity - One line of an invoice.
//!
//! Name and price are copied from the product at sale time, so later product
//! edits or deletions do not change historical invoices. Carries no relation
//! to `products`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invoice line item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_items")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Invoice this line belongs to
    pub invoice_id: i64,
    /// Zero-based position in the order the cashier entered the lines
    pub position: i32,
    /// Product that was sold
    pub product_id: i64,
    /// Product name at sale time
    pub product_name: String,
    /// Units sold, at least 1
    pub quantity: i64,
    /// Unit price at sale time
    pub price: f64,
    /// `quantity * price`
    pub subtotal: f64,
}

/// Defines relationships between `InvoiceItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one invoice
    #[sea_orm(
        belongs_to = "super::invoice::Entity",
        from = "Column::InvoiceId",
        to = "super::invoice::Column::Id"
    )]
    Invoice,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

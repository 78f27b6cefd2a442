//! Invoice entity - An immutable record of one sale.
//!
//! Line items live in `invoice_items`; `total_amount` always equals the sum of
//! their subtotals. The `(store_id, sequence)` pair and `invoice_number` are both
//! unique, so a colliding number fails the insert instead of overwriting.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How the customer paid
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash at the till
    #[default]
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Debit or credit card
    #[sea_orm(string_value = "card")]
    Card,
    /// Unified Payments Interface transfer
    #[sea_orm(string_value = "upi")]
    Upi,
}

/// Invoice database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the invoice
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-facing invoice number, e.g. `INV-3-000042`
    #[sea_orm(unique)]
    pub invoice_number: String,
    /// Per-store running number the invoice number is derived from
    pub sequence: i64,
    /// Store the sale happened in
    pub store_id: i64,
    /// Identity of the cashier who rang up the sale
    pub cashier_id: String,
    /// Customer name, empty when not captured
    pub customer_name: String,
    /// Customer phone, empty when not captured
    pub customer_phone: String,
    /// Sum of all line item subtotals
    pub total_amount: f64,
    /// Payment method
    pub payment_method: PaymentMethod,
    /// When the invoice was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Invoice and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each invoice belongs to one store
    #[sea_orm(
        belongs_to = "super::store::Entity",
        from = "Column::StoreId",
        to = "super::store::Column::Id"
    )]
    Store,
    /// One invoice has many line items
    #[sea_orm(has_many = "super::invoice_item::Entity")]
    Items,
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl Related<super::invoice_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

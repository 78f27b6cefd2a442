//! Route handlers, one module per resource.

pub mod invoices;
pub mod products;
pub mod stores;
pub mod system;

use serde::Deserialize;

/// `?storeId=` query parameter shared by list-style endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreQuery {
    /// Explicit store to operate on
    pub store_id: Option<i64>,
}

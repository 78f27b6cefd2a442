//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        identity::Identity,
        invoice::{CreateInvoiceRequest, LineRequest},
        product::{self, NewProduct},
        store::{self, NewStore},
    },
    entities,
    errors::Result,
};
use sea_orm::{ConnectOptions, DatabaseConnection};
use std::path::PathBuf;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
///
/// The pool is pinned to a single connection so every query sees the same
/// in-memory database and concurrent transactions queue for it.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    let db = sea_orm::Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a file-backed `SQLite` database served by a pool of several
/// connections, so concurrent transactions really contend for the database lock.
///
/// Returns the connection and the database file; remove it with [`remove_file_db`].
pub async fn setup_file_db(label: &str) -> Result<(DatabaseConnection, PathBuf)> {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let path = std::env::temp_dir().join(format!(
        "pos-invoicing-{label}-{}-{nanos}.sqlite",
        std::process::id()
    ));
    let mut options = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
    options.max_connections(8).min_connections(2);
    let db = sea_orm::Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok((db, path))
}

/// Deletes a database file created by [`setup_file_db`] along with its journal files.
pub fn remove_file_db(path: &std::path::Path) {
    for suffix in ["", "-wal", "-shm", "-journal"] {
        let mut file = path.as_os_str().to_owned();
        file.push(suffix);
        std::fs::remove_file(file).ok();
    }
}

/// Creates a test store with the given name and no contact details.
pub async fn create_test_store(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::store::Model> {
    store::create_store(
        db,
        Some("test_owner".to_string()),
        NewStore {
            name: name.to_string(),
            address: None,
            phone: None,
        },
    )
    .await
}

/// Builds a [`NewProduct`] with only the fields tests usually care about.
#[must_use]
pub fn new_product(name: &str, price: f64, stock: i64) -> NewProduct {
    NewProduct {
        store_id: None,
        name: name.to_string(),
        description: None,
        image: None,
        price,
        stock,
        sku: None,
        low_stock_threshold: None,
    }
}

/// Creates a test product in `store_id`.
pub async fn create_test_product(
    db: &DatabaseConnection,
    store_id: i64,
    name: &str,
    price: f64,
    stock: i64,
) -> Result<entities::product::Model> {
    product::create_product(db, store_id, new_product(name, price, stock)).await
}

/// Sets up a complete test environment with a store.
/// Returns (db, store) for common test scenarios.
pub async fn setup_with_store() -> Result<(DatabaseConnection, entities::store::Model)> {
    let db = setup_test_db().await?;
    let store = create_test_store(&db, "Test Store").await?;
    Ok((db, store))
}

/// Identity of the default test cashier, optionally assigned to a store.
#[must_use]
pub fn cashier(store_id: Option<i64>) -> Identity {
    Identity::new("cashier-1", store_id)
}

/// Builds a cash invoice request from `(product_id, quantity)` pairs.
#[must_use]
pub fn invoice_request(store_id: Option<i64>, lines: &[(i64, i64)]) -> CreateInvoiceRequest {
    CreateInvoiceRequest {
        store_id,
        customer_name: None,
        customer_phone: None,
        payment_method: entities::PaymentMethod::default(),
        items: lines
            .iter()
            .map(|&(product_id, quantity)| LineRequest {
                product_id,
                product_name: None,
                quantity,
            })
            .collect(),
    }
}

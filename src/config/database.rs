//! Database configuration module.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL. Creation is idempotent.

use crate::entities::{Invoice, InvoiceItem, Product, Store, invoice};
use crate::errors::Result;
use sea_orm::sea_query::{Index, TableCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info};

/// Name of the unique index guarding per-store invoice sequences
pub const INVOICE_SEQUENCE_INDEX: &str = "idx_invoices_store_sequence";

/// Establishes a connection to the database at `database_url`.
///
/// For file-backed `SQLite` URLs the parent directory is created first, so a
/// fresh checkout can start without any manual setup.
///
/// # Errors
/// Returns [`crate::errors::Error::DatabaseUnavailable`] if the database cannot be reached.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    ensure_sqlite_directory(database_url)?;
    debug!("Connecting to database at {}", database_url);
    Database::connect(database_url).await.map_err(Into::into)
}

fn ensure_sqlite_directory(database_url: &str) -> Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let file = rest.split('?').next().unwrap_or(rest);
    if let Some(parent) = Path::new(file).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Creates all tables (and the invoice sequence index) if they do not exist yet.
///
/// Tables are created parents-first: stores, products, invoices, invoice items.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let tables: [TableCreateStatement; 4] = [
        schema.create_table_from_entity(Store),
        schema.create_table_from_entity(Product),
        schema.create_table_from_entity(Invoice),
        schema.create_table_from_entity(InvoiceItem),
    ];
    for mut table in tables {
        table.if_not_exists();
        db.execute(builder.build(&table)).await?;
    }

    let sequence_index = Index::create()
        .name(INVOICE_SEQUENCE_INDEX)
        .table(Invoice)
        .col(invoice::Column::StoreId)
        .col(invoice::Column::Sequence)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&sequence_index)).await?;

    info!("Database tables ensured");
    Ok(())
}

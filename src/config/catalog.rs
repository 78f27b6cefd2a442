//! Catalogue seeding from config.toml
//!
//! Stores listed under `[[stores]]` (with nested `[[stores.products]]`) are
//! created on startup when missing. Seeding is idempotent: stores are matched by
//! name and products by SKU, or by name when no SKU is given.

use crate::core::{
    product::{self, NewProduct},
    store::{self, NewStore},
};
use crate::entities::product::Model as ProductModel;
use crate::errors::Result;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

/// Configuration for a single store and its starting catalogue
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSeed {
    /// Store name, also the idempotency key
    pub name: String,
    /// Street address
    pub address: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
    /// Products to create in this store
    #[serde(default)]
    pub products: Vec<NewProduct>,
}

fn already_stocked(existing: &[ProductModel], candidate: &NewProduct) -> bool {
    existing.iter().any(|p| match (&candidate.sku, &p.sku) {
        (Some(sku), Some(existing_sku)) => sku == existing_sku,
        (Some(_), None) => false,
        (None, _) => p.name == candidate.name.trim(),
    })
}

/// Creates any configured stores and products that do not exist yet.
///
/// # Errors
/// Returns an error if a seed entry fails validation or a database operation fails.
#[instrument(skip(db, seeds))]
pub async fn seed_catalog(db: &DatabaseConnection, seeds: &[StoreSeed]) -> Result<()> {
    info!(
        "Starting to seed catalogue. Found {} store configurations.",
        seeds.len()
    );

    for seed in seeds {
        let store = if let Some(existing) = store::get_store_by_name(db, &seed.name).await? {
            debug!("Store '{}' already exists.", seed.name);
            existing
        } else {
            info!("Creating store '{}'", seed.name);
            store::create_store(
                db,
                None,
                NewStore {
                    name: seed.name.clone(),
                    address: seed.address.clone(),
                    phone: seed.phone.clone(),
                },
            )
            .await?
        };

        let existing = product::get_products(db, Some(store.id)).await?;
        for candidate in &seed.products {
            if already_stocked(&existing, candidate) {
                warn!(
                    "Product '{}' already exists in store '{}'. Skipping.",
                    candidate.name, store.name
                );
                continue;
            }
            product::create_product(db, store.id, candidate.clone()).await?;
        }
    }

    Ok(())
}

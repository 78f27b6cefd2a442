//! Store business logic - Creating, listing and editing stores.

use crate::{
    entities::{Store, store},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Fields accepted when creating a store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewStore {
    /// Display name, must not be blank
    pub name: String,
    /// Street address
    pub address: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
}

/// Fields accepted when updating a store. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StoreUpdate {
    /// New display name
    pub name: Option<String>,
    /// New street address
    pub address: Option<String>,
    /// New phone number
    pub phone: Option<String>,
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_request("Store name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Creates a new store owned by `owner_id`.
///
/// # Errors
/// Returns an error if the name is blank or the insert fails.
#[instrument(skip(db, new_store), fields(name = %new_store.name))]
pub async fn create_store(
    db: &DatabaseConnection,
    owner_id: Option<String>,
    new_store: NewStore,
) -> Result<store::Model> {
    let name = validate_name(&new_store.name)?;

    let store = store::ActiveModel {
        name: Set(name),
        address: Set(new_store.address),
        phone: Set(new_store.phone),
        owner_id: Set(owner_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let created = store.insert(db).await?;
    info!(store_id = created.id, "Store created");
    Ok(created)
}

/// Retrieves all stores ordered by name.
pub async fn get_all_stores(db: &DatabaseConnection) -> Result<Vec<store::Model>> {
    Store::find()
        .order_by_asc(store::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a store by its ID.
pub async fn get_store_by_id<C>(db: &C, store_id: i64) -> Result<Option<store::Model>>
where
    C: ConnectionTrait,
{
    Store::find_by_id(store_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a store by exact name. Used by catalogue seeding to stay idempotent.
pub async fn get_store_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<store::Model>> {
    Store::find()
        .filter(store::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the store or [`Error::StoreNotFound`].
pub async fn require_store<C>(db: &C, store_id: i64) -> Result<store::Model>
where
    C: ConnectionTrait,
{
    get_store_by_id(db, store_id)
        .await?
        .ok_or(Error::StoreNotFound { id: store_id })
}

/// Updates a store's name, address and phone.
///
/// # Errors
/// Returns an error if the store does not exist, the new name is blank, or the
/// update fails.
pub async fn update_store(
    db: &DatabaseConnection,
    store_id: i64,
    update: StoreUpdate,
) -> Result<store::Model> {
    let mut store: store::ActiveModel = require_store(db, store_id).await?.into();

    if let Some(name) = update.name {
        store.name = Set(validate_name(&name)?);
    }
    if let Some(address) = update.address {
        store.address = Set(Some(address));
    }
    if let Some(phone) = update.phone {
        store.phone = Set(Some(phone));
    }

    store.update(db).await.map_err(Into::into)
}

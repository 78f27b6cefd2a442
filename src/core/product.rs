//! Product business logic - The store's catalogue and its stock on hand.
//!
//! Besides the usual create/read/update/delete operations this module holds the
//! two primitives the invoice workflow runs inside its transaction:
//! [`find_in_store`] and [`decrement_stock`]. Both are generic over
//! [`ConnectionTrait`] so they work on a plain connection as well as on a
//! `DatabaseTransaction`.

use crate::{
    core::store::require_store,
    entities::{Product, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

/// Threshold applied when a product is created without one
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Fields accepted when creating a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewProduct {
    /// Owning store. Callers resolve the effective store and pass it separately,
    /// so this is only a hint from the request body.
    pub store_id: Option<i64>,
    /// Product name, must not be blank
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Image URL
    pub image: Option<String>,
    /// Unit price, non-negative
    pub price: f64,
    /// Initial stock, non-negative
    #[serde(default)]
    pub stock: i64,
    /// Stock keeping unit code
    pub sku: Option<String>,
    /// Low-stock threshold, defaults to [`DEFAULT_LOW_STOCK_THRESHOLD`]
    #[serde(alias = "low_stock_threshold")]
    pub low_stock_threshold: Option<i64>,
}

/// Fields accepted when updating a product. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductUpdate {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New image URL
    pub image: Option<String>,
    /// New unit price
    pub price: Option<f64>,
    /// New stock level (restock or correction)
    pub stock: Option<i64>,
    /// New SKU
    pub sku: Option<String>,
    /// New low-stock threshold
    pub low_stock_threshold: Option<i64>,
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_request("Product name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn validate_price(price: f64) -> Result<f64> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::InvalidAmount { amount: price });
    }
    Ok(price)
}

fn validate_count(count: i64) -> Result<i64> {
    if count < 0 {
        return Err(Error::InvalidQuantity { quantity: count });
    }
    Ok(count)
}

fn new_active_model(store_id: i64, new_product: NewProduct) -> Result<product::ActiveModel> {
    let now = chrono::Utc::now();
    Ok(product::ActiveModel {
        store_id: Set(store_id),
        name: Set(validate_name(&new_product.name)?),
        description: Set(new_product.description),
        image: Set(new_product.image),
        price: Set(validate_price(new_product.price)?),
        stock: Set(validate_count(new_product.stock)?),
        sku: Set(new_product.sku),
        low_stock_threshold: Set(validate_count(
            new_product
                .low_stock_threshold
                .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
        )?),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    })
}

/// Creates a product in `store_id`.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - The price is negative or not finite (NaN, infinity)
/// - Stock or threshold is negative
/// - The store does not exist
/// - The database insert operation fails
#[instrument(skip(db, new_product), fields(name = %new_product.name))]
pub async fn create_product(
    db: &DatabaseConnection,
    store_id: i64,
    new_product: NewProduct,
) -> Result<product::Model> {
    let product = new_active_model(store_id, new_product)?;
    require_store(db, store_id).await?;

    let created = product.insert(db).await?;
    info!(product_id = created.id, "Product created");
    Ok(created)
}

/// Creates many products in one transaction: either all of them exist afterwards
/// or none do.
///
/// # Errors
/// Returns an error if the list is empty, any product fails validation, the
/// store does not exist, or any insert fails.
#[instrument(skip(db, products), fields(count = products.len()))]
pub async fn bulk_create_products(
    db: &DatabaseConnection,
    store_id: i64,
    products: Vec<NewProduct>,
) -> Result<Vec<product::Model>> {
    if products.is_empty() {
        return Err(Error::invalid_request(
            "Input must be a non-empty array of products",
        ));
    }

    let models = products
        .into_iter()
        .map(|p| new_active_model(store_id, p))
        .collect::<Result<Vec<_>>>()?;

    let txn = db.begin().await?;
    require_store(&txn, store_id).await?;

    let mut created = Vec::with_capacity(models.len());
    for model in models {
        created.push(model.insert(&txn).await?);
    }

    txn.commit().await?;
    info!("Bulk created {} products", created.len());
    Ok(created)
}

/// Retrieves products ordered by name, optionally restricted to one store.
pub async fn get_products(
    db: &DatabaseConnection,
    store_id: Option<i64>,
) -> Result<Vec<product::Model>> {
    let mut query = Product::find();
    if let Some(store_id) = store_id {
        query = query.filter(product::Column::StoreId.eq(store_id));
    }
    query
        .order_by_asc(product::Column::Name)
        .order_by_asc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Looks up a product by id, but only if it belongs to `store_id`.
///
/// Inside a transaction this reads the current committed row, not a snapshot
/// taken before the transaction began.
pub async fn find_in_store<C>(
    db: &C,
    product_id: i64,
    store_id: i64,
) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .filter(product::Column::StoreId.eq(store_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Atomically removes `quantity` units from a product's stock.
///
/// This is a single guarded statement:
/// `UPDATE products SET stock = stock - q WHERE id = ? AND store_id = ? AND stock >= q`.
/// It returns `false` when no row matched, meaning the product vanished, moved
/// store, or no longer has enough stock. Stock can never go negative through
/// this path regardless of what the caller read earlier.
pub async fn decrement_stock<C>(
    db: &C,
    product_id: i64,
    store_id: i64,
    quantity: i64,
) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = Product::update_many()
        .col_expr(
            product::Column::Stock,
            Expr::col(product::Column::Stock).sub(quantity),
        )
        .col_expr(
            product::Column::UpdatedAt,
            Expr::value(chrono::Utc::now()),
        )
        .filter(product::Column::Id.eq(product_id))
        .filter(product::Column::StoreId.eq(store_id))
        .filter(product::Column::Stock.gte(quantity))
        .exec(db)
        .await?;

    debug!(
        product_id,
        quantity,
        rows = result.rows_affected,
        "Stock decrement"
    );
    Ok(result.rows_affected > 0)
}

/// Applies a partial update to a product and refreshes `updated_at`.
///
/// # Errors
/// Returns an error if the product does not exist, any new value fails
/// validation, or the update fails.
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    update: ProductUpdate,
) -> Result<product::Model> {
    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    if let Some(name) = update.name {
        product.name = Set(validate_name(&name)?);
    }
    if let Some(description) = update.description {
        product.description = Set(Some(description));
    }
    if let Some(image) = update.image {
        product.image = Set(Some(image));
    }
    if let Some(price) = update.price {
        product.price = Set(validate_price(price)?);
    }
    if let Some(stock) = update.stock {
        product.stock = Set(validate_count(stock)?);
    }
    if let Some(sku) = update.sku {
        product.sku = Set(Some(sku));
    }
    if let Some(threshold) = update.low_stock_threshold {
        product.low_stock_threshold = Set(validate_count(threshold)?);
    }
    product.updated_at = Set(chrono::Utc::now());

    product.update(db).await.map_err(Into::into)
}

/// Permanently deletes a product. Invoices that sold it keep their snapshot.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if nothing was deleted.
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    let result = Product::delete_by_id(product_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::ProductNotFound { id: product_id });
    }
    info!(product_id, "Product deleted");
    Ok(())
}

/// Deletes every product of one store, returning how many were removed.
#[instrument(skip(db))]
pub async fn reset_store_products(db: &DatabaseConnection, store_id: i64) -> Result<u64> {
    let result = Product::delete_many()
        .filter(product::Column::StoreId.eq(store_id))
        .exec(db)
        .await?;
    warn!(
        "Removed {} products from store {}",
        result.rows_affected, store_id
    );
    Ok(result.rows_affected)
}

/// Lists a store's products whose stock is at or below their threshold, lowest stock first.
pub async fn get_low_stock_products(
    db: &DatabaseConnection,
    store_id: i64,
) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::StoreId.eq(store_id))
        .filter(Expr::col(product::Column::Stock).lte(Expr::col(product::Column::LowStockThreshold)))
        .order_by_asc(product::Column::Stock)
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

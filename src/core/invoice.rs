//! Invoice business logic - Stock-safe sale recording.
//!
//! [`create_invoice`] is the one operation in this crate that touches several
//! rows that must change together: every sold product's stock, the invoice
//! header and its line items. It runs in a single database transaction. The
//! transaction handle is passed to every read and write, and if the function
//! returns early (any `?`) the handle is dropped uncommitted and SeaORM rolls
//! it back, so a failed sale leaves no decremented stock and no orphan invoice.
//!
//! Oversell is prevented by re-reading each product inside the transaction and
//! then decrementing with a guarded `UPDATE ... WHERE stock >= q`. A competing
//! sale either waits for this one and then sees the reduced stock, or fails
//! with a conflict. Nothing here retries; retrying is the caller's decision.

use crate::{
    core::{identity::Identity, product},
    entities::{Invoice, InvoiceItem, PaymentMethod, invoice, invoice_item},
    errors::{Error, Result, is_unique_violation},
};
use sea_orm::{LoaderTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Body of an invoice creation request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateInvoiceRequest {
    /// Target store; falls back to the cashier's assigned store
    pub store_id: Option<i64>,
    /// Customer name to print on the invoice
    pub customer_name: Option<String>,
    /// Customer phone number
    pub customer_phone: Option<String>,
    /// Payment method, cash when omitted
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Lines to sell, in display order
    pub items: Vec<LineRequest>,
}

/// One requested invoice line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LineRequest {
    /// Product to sell
    pub product_id: i64,
    /// Name the client displayed for the product; only used in error messages
    pub product_name: Option<String>,
    /// Units to sell, at least 1
    pub quantity: i64,
}

impl LineRequest {
    fn label(&self) -> String {
        self.product_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.product_id.to_string())
    }
}

/// A persisted invoice together with its line items in sale order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    /// Invoice header
    #[serde(flatten)]
    pub invoice: invoice::Model,
    /// Line items ordered by position
    pub items: Vec<invoice_item::Model>,
}

struct SoldLine {
    product_id: i64,
    product_name: String,
    quantity: i64,
    price: f64,
    subtotal: f64,
}

/// Formats the human-facing invoice number for a store's running sequence.
#[must_use]
pub fn format_invoice_number(store_id: i64, sequence: i64) -> String {
    format!("INV-{store_id}-{sequence:06}")
}

fn validate(identity: &Identity, request: &CreateInvoiceRequest) -> Result<i64> {
    let store_id = identity.resolve_store(request.store_id)?;

    if identity.cashier_id.trim().is_empty() {
        return Err(Error::invalid_request("Cashier ID is required"));
    }
    if request.items.is_empty() {
        return Err(Error::invalid_request(
            "Invoice must contain at least one item",
        ));
    }
    if let Some(line) = request.items.iter().find(|line| line.quantity < 1) {
        return Err(Error::InvalidQuantity {
            quantity: line.quantity,
        });
    }

    Ok(store_id)
}

/// Checks and takes stock for one line inside the open transaction.
async fn take_stock<C>(txn: &C, store_id: i64, line: &LineRequest) -> Result<SoldLine>
where
    C: ConnectionTrait,
{
    let product = product::find_in_store(txn, line.product_id, store_id)
        .await?
        .ok_or_else(|| Error::ProductNotInStore {
            product: line.label(),
        })?;

    if product.stock < line.quantity {
        return Err(Error::InsufficientStock {
            product: product.name,
            available: product.stock,
            requested: line.quantity,
        });
    }

    if !product::decrement_stock(txn, product.id, store_id, line.quantity).await? {
        return Err(Error::Conflict {
            message: format!("Stock for {} changed during checkout", product.name),
        });
    }

    #[allow(clippy::cast_precision_loss)]
    let subtotal = product.price * line.quantity as f64;
    Ok(SoldLine {
        product_id: product.id,
        product_name: product.name,
        quantity: line.quantity,
        price: product.price,
        subtotal,
    })
}

async fn next_sequence<C>(txn: &C, store_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    let last = Invoice::find()
        .filter(invoice::Column::StoreId.eq(store_id))
        .order_by_desc(invoice::Column::Sequence)
        .one(txn)
        .await?;
    Ok(last.map_or(1, |invoice| invoice.sequence + 1))
}

/// Records a sale: validates stock, decrements it, and stores an immutable invoice.
///
/// Lines are processed in request order and stored in that order. A product id
/// that appears twice is checked against the stock left by the earlier line.
///
/// # Errors
/// Returns (and rolls back everything) on:
/// - [`Error::InvalidRequest`] / [`Error::InvalidQuantity`] for a missing store
///   id, blank cashier, empty item list or a quantity below 1
/// - [`Error::ProductNotInStore`] when a product does not exist in the target store
/// - [`Error::InsufficientStock`] when a line asks for more than is on hand
/// - [`Error::Conflict`] / [`Error::DuplicateInvoiceNumber`] on concurrent contention
/// - [`Error::DatabaseUnavailable`] / [`Error::Database`] on driver failures
#[instrument(skip(db, identity, request), fields(cashier = %identity.cashier_id, lines = request.items.len()))]
pub async fn create_invoice(
    db: &DatabaseConnection,
    identity: &Identity,
    request: CreateInvoiceRequest,
) -> Result<InvoiceRecord> {
    let store_id = validate(identity, &request)?;

    let txn = db.begin().await?;

    let mut total_amount = 0.0;
    let mut sold = Vec::with_capacity(request.items.len());
    for line in &request.items {
        let line = take_stock(&txn, store_id, line)
            .await
            .inspect_err(|e| warn!(store_id, "Invoice rejected: {}", e))?;
        total_amount += line.subtotal;
        sold.push(line);
    }

    let sequence = next_sequence(&txn, store_id).await?;
    let invoice_number = format_invoice_number(store_id, sequence);

    let header = invoice::ActiveModel {
        invoice_number: Set(invoice_number.clone()),
        sequence: Set(sequence),
        store_id: Set(store_id),
        cashier_id: Set(identity.cashier_id.clone()),
        customer_name: Set(request.customer_name.unwrap_or_default()),
        customer_phone: Set(request.customer_phone.unwrap_or_default()),
        total_amount: Set(total_amount),
        payment_method: Set(request.payment_method),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            Error::DuplicateInvoiceNumber {
                number: invoice_number.clone(),
            }
        } else {
            e.into()
        }
    })?;

    let mut items = Vec::with_capacity(sold.len());
    for (position, line) in (0_i32..).zip(sold) {
        let item = invoice_item::ActiveModel {
            invoice_id: Set(header.id),
            position: Set(position),
            product_id: Set(line.product_id),
            product_name: Set(line.product_name),
            quantity: Set(line.quantity),
            price: Set(line.price),
            subtotal: Set(line.subtotal),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        items.push(item);
    }

    txn.commit().await?;

    info!(
        invoice_number = %header.invoice_number,
        store_id,
        total = header.total_amount,
        "Invoice created"
    );
    Ok(InvoiceRecord {
        invoice: header,
        items,
    })
}

async fn load_items(db: &DatabaseConnection, invoice_id: i64) -> Result<Vec<invoice_item::Model>> {
    InvoiceItem::find()
        .filter(invoice_item::Column::InvoiceId.eq(invoice_id))
        .order_by_asc(invoice_item::Column::Position)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves one invoice with its items.
pub async fn get_invoice(db: &DatabaseConnection, invoice_id: i64) -> Result<Option<InvoiceRecord>> {
    let Some(invoice) = Invoice::find_by_id(invoice_id).one(db).await? else {
        return Ok(None);
    };
    let items = load_items(db, invoice.id).await?;
    Ok(Some(InvoiceRecord { invoice, items }))
}

/// Retrieves invoices newest first, optionally restricted to one store.
pub async fn list_invoices(
    db: &DatabaseConnection,
    store_id: Option<i64>,
) -> Result<Vec<InvoiceRecord>> {
    let mut query = Invoice::find();
    if let Some(store_id) = store_id {
        query = query.filter(invoice::Column::StoreId.eq(store_id));
    }
    let invoices = query
        .order_by_desc(invoice::Column::CreatedAt)
        .order_by_desc(invoice::Column::Id)
        .all(db)
        .await?;
    let item_groups = invoices.load_many(InvoiceItem, db).await?;

    Ok(invoices
        .into_iter()
        .zip(item_groups)
        .map(|(invoice, mut items)| {
            items.sort_by_key(|item| item.position);
            InvoiceRecord { invoice, items }
        })
        .collect())
}

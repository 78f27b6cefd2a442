//! `/api/invoices` routes.

use crate::api::ApiState;
use crate::api::errors::{ApiResult, json_body, path_param, query_params};
use crate::api::routes::StoreQuery;
use crate::core::identity::Identity;
use crate::core::invoice::{self, CreateInvoiceRequest, InvoiceRecord};
use crate::errors::Error;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};

/// Routes mounted under this resource's prefix.
pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route("/:id", get(get_invoice))
}

async fn create_invoice(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<CreateInvoiceRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<InvoiceRecord>)> {
    let request = json_body(payload)?;
    let record = invoice::create_invoice(&state.database, &identity, request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_invoices(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    params: Result<Query<StoreQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<InvoiceRecord>>> {
    let store_id = query_params(params)?.store_id.or(identity.store_id);
    Ok(Json(invoice::list_invoices(&state.database, store_id).await?))
}

async fn get_invoice(
    State(state): State<ApiState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<InvoiceRecord>> {
    let id = path_param(id)?;
    invoice::get_invoice(&state.database, id)
        .await?
        .map(Json)
        .ok_or(Error::InvoiceNotFound { id })
}

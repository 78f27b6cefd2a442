//! `/api/products` routes.

use crate::api::ApiState;
use crate::api::errors::{ApiResult, json_body, path_param, query_params};
use crate::api::routes::StoreQuery;
use crate::core::identity::Identity;
use crate::core::product::{self, NewProduct, ProductUpdate};
use crate::entities::ProductModel;
use crate::errors::Error;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Extension, Json, Router};
use serde_json::{Value, json};

/// Routes mounted under this resource's prefix.
pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/bulk", post(bulk_create_products))
        .route("/low-stock", get(low_stock_products))
        .route("/reset", delete(reset_products))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

async fn list_products(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    params: Result<Query<StoreQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ProductModel>>> {
    let store_id = query_params(params)?.store_id.or(identity.store_id);
    Ok(Json(product::get_products(&state.database, store_id).await?))
}

async fn create_product(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ProductModel>)> {
    let new_product = json_body(payload)?;
    let store_id = identity.resolve_store(new_product.store_id)?;
    let created = product::create_product(&state.database, store_id, new_product).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn bulk_create_products(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    params: Result<Query<StoreQuery>, QueryRejection>,
    payload: Result<Json<Vec<NewProduct>>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Vec<ProductModel>>)> {
    let store_id = identity.resolve_store(query_params(params)?.store_id)?;
    let products = json_body(payload)?;
    let created = product::bulk_create_products(&state.database, store_id, products).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn low_stock_products(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    params: Result<Query<StoreQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ProductModel>>> {
    let store_id = identity.resolve_store(query_params(params)?.store_id)?;
    Ok(Json(
        product::get_low_stock_products(&state.database, store_id).await?,
    ))
}

async fn reset_products(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    params: Result<Query<StoreQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let store_id = identity.resolve_store(query_params(params)?.store_id)?;
    let deleted = product::reset_store_products(&state.database, store_id).await?;
    Ok(Json(json!({
        "message": format!("Deleted {deleted} products from store {store_id}"),
        "deleted": deleted,
    })))
}

async fn get_product(
    State(state): State<ApiState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<ProductModel>> {
    let id = path_param(id)?;
    product::get_product_by_id(&state.database, id)
        .await?
        .map(Json)
        .ok_or(Error::ProductNotFound { id })
}

async fn update_product(
    State(state): State<ApiState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProductUpdate>, JsonRejection>,
) -> ApiResult<Json<ProductModel>> {
    let id = path_param(id)?;
    let update = json_body(payload)?;
    Ok(Json(
        product::update_product(&state.database, id, update).await?,
    ))
}

async fn delete_product(
    State(state): State<ApiState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let id = path_param(id)?;
    product::delete_product(&state.database, id).await?;
    Ok(Json(json!({ "message": "Product deleted" })))
}

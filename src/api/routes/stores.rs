//! `/api/stores` routes.

use crate::api::ApiState;
use crate::api::errors::{ApiResult, json_body, path_param};
use crate::core::identity::Identity;
use crate::core::store::{self, NewStore, StoreUpdate};
use crate::entities::StoreModel;
use crate::errors::Error;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};

/// Routes mounted under this resource's prefix.
pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/", get(list_stores).post(create_store))
        .route("/:id", get(get_store).put(update_store))
}

async fn create_store(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<NewStore>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<StoreModel>)> {
    let new_store = json_body(payload)?;
    let created = store::create_store(&state.database, Some(identity.cashier_id), new_store).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_stores(State(state): State<ApiState>) -> ApiResult<Json<Vec<StoreModel>>> {
    Ok(Json(store::get_all_stores(&state.database).await?))
}

async fn get_store(
    State(state): State<ApiState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<StoreModel>> {
    let id = path_param(id)?;
    store::get_store_by_id(&*state.database, id)
        .await?
        .map(Json)
        .ok_or(Error::StoreNotFound { id })
}

async fn update_store(
    State(state): State<ApiState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<StoreUpdate>, JsonRejection>,
) -> ApiResult<Json<StoreModel>> {
    let id = path_param(id)?;
    let update = json_body(payload)?;
    Ok(Json(store::update_store(&state.database, id, update).await?))
}

//! Service health.

use crate::api::ApiState;
use crate::api::errors::ApiResult;
use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

/// Liveness check that also pings the database.
pub async fn health(State(state): State<ApiState>) -> ApiResult<Json<Value>> {
    state.database.ping().await?;
    Ok(Json(json!({ "status": "ok" })))
}

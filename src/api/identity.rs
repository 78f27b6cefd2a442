//! Identity middleware.
//!
//! Authentication happens in front of this service. The gateway forwards the
//! authenticated user as `x-cashier-id` and, for users assigned to a store,
//! `x-store-id`. Requests without a cashier are rejected with 401.

use crate::api::errors::json_error;
use crate::core::identity::Identity;
use axum::extract::Request;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

/// Header carrying the authenticated user's id
pub const CASHIER_HEADER: &str = "x-cashier-id";
/// Header carrying the user's assigned store id
pub const STORE_HEADER: &str = "x-store-id";

/// Resolves the [`Identity`] from request headers and stores it as a request extension.
pub async fn require_identity(mut req: Request, next: Next) -> Result<Response, Response> {
    let identity = identity_from_headers(req.headers())?;
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

fn identity_from_headers(headers: &HeaderMap) -> Result<Identity, Response> {
    let cashier_id = headers
        .get(CASHIER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| json_error(StatusCode::UNAUTHORIZED, "unauthorized", "Access Denied"))?;

    let store_id = match headers.get(STORE_HEADER) {
        None => None,
        Some(value) => Some(
            value
                .to_str()
                .ok()
                .and_then(|raw| raw.trim().parse::<i64>().ok())
                .ok_or_else(|| {
                    json_error(
                        StatusCode::BAD_REQUEST,
                        "invalid_request",
                        format!("{STORE_HEADER} must be an integer"),
                    )
                })?,
        ),
    };

    Ok(Identity::new(cashier_id, store_id))
}

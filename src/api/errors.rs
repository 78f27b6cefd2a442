//! Consistent JSON error responses.

use crate::errors::{Error, ErrorKind};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// Result type returned by route handlers.
pub type ApiResult<T> = std::result::Result<T, Error>;

/// HTTP status for each error kind.
#[must_use]
pub const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Request => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InsufficientStock => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Builds `{"error": code, "message": message}` with the given status.
pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let kind = self.kind();
        if kind == ErrorKind::Internal {
            error!("Request failed: {}", self);
        }
        json_error(status_for(kind), kind.code(), self.to_string())
    }
}

/// Unwraps a JSON body, turning a malformed or mistyped body into [`Error::InvalidRequest`].
///
/// # Errors
/// Returns the rejection text as an invalid-request error.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| Error::invalid_request(rejection.body_text()))
}

/// Unwraps query parameters, turning a malformed query string into [`Error::InvalidRequest`].
///
/// # Errors
/// Returns the rejection text as an invalid-request error.
pub fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| Error::invalid_request(rejection.body_text()))
}

/// Unwraps a path parameter, turning an unparsable segment into [`Error::InvalidRequest`].
///
/// # Errors
/// Returns the rejection text as an invalid-request error.
pub fn path_param<T>(param: Result<Path<T>, PathRejection>) -> ApiResult<T> {
    param
        .map(|Path(value)| value)
        .map_err(|rejection| Error::invalid_request(rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_map_to_statuses() {
        let cases = [
            (Error::invalid_request("Store ID is required"), StatusCode::BAD_REQUEST),
            (Error::InvoiceNotFound { id: 7 }, StatusCode::NOT_FOUND),
            (
                Error::InsufficientStock {
                    product: "Pen".to_string(),
                    available: 1,
                    requested: 2,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                Error::Conflict {
                    message: "busy".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                Error::DatabaseUnavailable {
                    message: "refused".to_string(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                Error::Config {
                    message: "bad".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}

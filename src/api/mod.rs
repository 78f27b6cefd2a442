//! HTTP API - axum router, identity middleware and JSON error mapping.
//!
//! Layout:
//! - `routes/`: one file per resource (stores, products, invoices) plus health
//! - `identity.rs`: resolves the caller from gateway headers
//! - `errors.rs`: [`crate::errors::Error`] to HTTP response mapping

/// Error to response mapping
pub mod errors;
/// Identity middleware
pub mod identity;
/// Route handlers
pub mod routes;

use axum::Router;
use axum::routing::get;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared state available to all handlers.
#[derive(Clone)]
pub struct ApiState {
    /// Database connection pool for all database operations
    pub database: Arc<DatabaseConnection>,
}

impl ApiState {
    /// Creates a new `ApiState` around a database connection.
    #[must_use]
    pub fn new(database: DatabaseConnection) -> Self {
        Self {
            database: Arc::new(database),
        }
    }
}

/// Builds the full HTTP router.
///
/// `/health` is public; everything under `/api` requires an identity.
pub fn build_router(database: DatabaseConnection) -> Router {
    let api = Router::new()
        .nest("/api/stores", routes::stores::router())
        .nest("/api/products", routes::products::router())
        .nest("/api/invoices", routes::invoices::router())
        .layer(axum::middleware::from_fn(identity::require_identity));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ApiState::new(database))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_state_clones_share_one_pool() {
        let db = setup_test_db().await.unwrap();
        let state = ApiState::new(db);
        let copy = state.clone();

        assert!(Arc::ptr_eq(&state.database, &copy.database));
        copy.database.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_router_builds_over_test_database() {
        let db = setup_test_db().await.unwrap();
        let _router = build_router(db);
    }
}

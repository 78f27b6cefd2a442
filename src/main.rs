#![allow(clippy::result_large_err)]

use dotenvy::dotenv;
use pos_invoicing::{
    api,
    config::{self, catalog, database},
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env file first so RUST_LOG and DATABASE_URL can come from it
    dotenv().ok();

    // 2. Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = config::load_app_configuration()?;

    // 4. Connect and make sure the schema exists
    let db = database::create_connection(&app_config.database_url())
        .await
        .inspect(|_| info!("Database connected."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed the configured stores and products
    catalog::seed_catalog(&db, &app_config.stores)
        .await
        .inspect(|()| info!("Catalogue seeded successfully."))
        .inspect_err(|e| error!("Failed to seed catalogue: {}", e))?;

    // 6. Serve HTTP until ctrl-c
    let listener = tokio::net::TcpListener::bind(app_config.bind_address())
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", app_config.bind_address(), e))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, api::build_router(db))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

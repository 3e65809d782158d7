//! Server setup and initialization
//!
//! Wires the PostgreSQL-backed service context into the Axum application
//! and runs the HTTP listener.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;
use unstory_common::{AppConfig, AppError, JwtService};
use unstory_core::SnowflakeGenerator;
use unstory_db::{create_pool, run_migrations, PgPool, PoolConfig};
use unstory_service::ServiceContext;

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the application: rate-limited API routes plus unthrottled health probes
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );
    let health = apply_middleware(health_routes());

    api.merge(health).with_state(state)
}

/// Connect to PostgreSQL and apply migrations when configured to
pub async fn connect_database(config: &AppConfig) -> Result<PgPool, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    Ok(pool)
}

/// Service context over PostgreSQL repositories
pub fn create_service_context(pool: PgPool, config: &AppConfig) -> ServiceContext {
    let jwt_service = Arc::new(JwtService::new(
        &config.identity.jwt_secret,
        config.identity.issuer.clone(),
    ));
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    ServiceContext::postgres(pool, jwt_service, snowflake_generator)
}

pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let pool = connect_database(&config).await?;
    let service_context = create_service_context(pool, &config);
    Ok(AppState::new(service_context, config))
}

/// Serve `app` on `address` until the process is stopped
pub async fn run_server(app: Router, address: &str) -> Result<(), AppError> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {address}: {e}")))?;

    info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let address = config.api.address();
    let state = create_app_state(config).await?;
    run_server(create_app(state), &address).await
}

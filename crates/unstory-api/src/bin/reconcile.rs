//! Counter reconciliation job
//!
//! Recomputes `likes_count` and `views` on every post from the like and view
//! rows, repairing any drift. Safe to run while the API is serving.
//!
//! ```bash
//! cargo run -p unstory-api --bin unstory-reconcile
//! ```

use tracing::{error, info};
use unstory_api::create_service_context;
use unstory_api::server::connect_database;
use unstory_common::{try_init_tracing_with_config, AppConfig, AppError, TracingConfig};
use unstory_service::MaintenanceService;

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = reconcile(&config).await {
        error!(error = %e, "Reconciliation failed");
        std::process::exit(1);
    }
}

async fn reconcile(config: &AppConfig) -> Result<(), AppError> {
    let pool = connect_database(config).await?;
    let ctx = create_service_context(pool, config);

    let report = MaintenanceService::new(&ctx).reconcile_counters().await?;
    info!(repaired_posts = report.repaired_posts, "Reconciliation finished");
    Ok(())
}

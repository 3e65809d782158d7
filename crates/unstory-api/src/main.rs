//! Unstory API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p unstory-api
//! ```
//!
//! Configuration is read from the environment (and a `.env` file if present).

use tracing::{error, info};
use unstory_common::{try_init_tracing_with_config, AppConfig, TracingConfig};

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

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        address = %config.api.address(),
        "Starting Unstory API server"
    );

    if let Err(e) = unstory_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

//! WeView API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p weview-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use tracing::{error, info};
use weview_common::{try_init_tracing_with_config, AppConfig, TracingConfig};

#[tokio::main]
async fn main() {
    // Load configuration before tracing so the preset matches the environment
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
        env = ?config.app.env,
        port = config.api.port,
        storage = ?config.storage,
        presence = ?config.presence,
        "Starting WeView API Server..."
    );

    if let Err(e) = weview_api::run(config).await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

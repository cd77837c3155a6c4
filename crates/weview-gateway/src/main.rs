//! WeView Gateway Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p weview-gateway
//! ```
//!
//! Configuration is loaded from environment variables. A standalone gateway
//! only sees events from other instances when `PRESENCE_BACKEND=redis`.

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
        port = config.gateway.port,
        presence = ?config.presence,
        "Starting WeView Gateway Server..."
    );

    if let Err(e) = weview_gateway::run(config).await {
        error!(error = %e, "Gateway failed to start");
        std::process::exit(1);
    }
}

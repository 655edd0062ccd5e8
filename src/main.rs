//! Text Vault - Entry Point
//!
//! A web text vault: single-note editor with share links, backed by a GitHub
//! repository file store.

use log::{error, info};

use textvault::Server;
use textvault::config::StartupConfig;

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching vault server...");

    let config = match StartupConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::new(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start().await {
        error!("Server exited: {}", e);
        std::process::exit(1);
    }
}

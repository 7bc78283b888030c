//! Lobby Relay Server - Entry Point
//!
//! A real-time relay server: clients form named channels, one member is
//! elected host, and chat, game-state, and score updates are broadcast to
//! channel members.

use log::{error, info};

use lobby_relay_server::{Server, ServerConfig};

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching lobby relay server...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(&config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed on {}: {}", config.listen_socket(), e);
            std::process::exit(1);
        }
    };

    server.run().await;
}

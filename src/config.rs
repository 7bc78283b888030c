//! Configuration management for the lobby relay server.
//!
//! Settings load from an optional `config.toml` with `LOBBY_RELAY_*`
//! environment overrides; anything unset falls back to the defaults below.

use ::config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address to bind the listener
    pub bind_address: String,

    /// TCP port for the relay protocol
    pub port: u16,

    /// Maximum concurrent client connections
    pub max_clients: usize,

    /// Leaderboard SQLite database path (`:memory:` for a throwaway store)
    pub db_path: String,
}

impl ServerConfig {
    /// Load configuration from config.toml (if present) with environment
    /// overrides, e.g. `LOBBY_RELAY_PORT=9071`.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("bind_address", "127.0.0.1")?
            .set_default("port", 9070)?
            .set_default("max_clients", 64)?
            .set_default("db_path", "relay_scores.db")?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("LOBBY_RELAY"))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Bind address and port as one socket address string.
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_clients == 0 {
            return Err(ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }
        if self.db_path.is_empty() {
            return Err(ConfigError::Message(
                "db_path cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

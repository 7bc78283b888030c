pub mod broadcast;
pub mod config;
pub mod connection;
pub mod error;
pub mod lobby;
pub mod protocol;
pub mod scores;
pub mod server;

pub use crate::config::ServerConfig;
pub use crate::server::Server;

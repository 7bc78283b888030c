//! Error types
//!
//! Defines domain-specific error types for each module of the relay server.

use std::fmt;
use std::io;

/// Channel store errors
#[derive(Debug, PartialEq)]
pub enum ChannelError {
    AlreadyExists(String),
    NoSuchChannel(String),
    AlreadyMember(String),
    NotInChannel,
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelError::AlreadyExists(name) => write!(f, "Channel already exists: {}", name),
            ChannelError::NoSuchChannel(name) => write!(f, "No such channel: {}", name),
            ChannelError::AlreadyMember(name) => write!(f, "Already a member of channel: {}", name),
            ChannelError::NotInChannel => write!(f, "Connection is not in a channel"),
        }
    }
}

impl std::error::Error for ChannelError {}

/// Score store errors
#[derive(Debug)]
pub enum ScoreStoreError {
    Database(rusqlite::Error),
}

impl fmt::Display for ScoreStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreStoreError::Database(e) => write!(f, "Leaderboard database error: {}", e),
        }
    }
}

impl std::error::Error for ScoreStoreError {}

impl From<rusqlite::Error> for ScoreStoreError {
    fn from(error: rusqlite::Error) -> Self {
        ScoreStoreError::Database(error)
    }
}

/// Top-level server error covering startup failures
#[derive(Debug)]
pub enum ServerError {
    Io(io::Error),
    Config(config::ConfigError),
    ScoreStore(ScoreStoreError),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Io(e) => write!(f, "I/O error: {}", e),
            ServerError::Config(e) => write!(f, "Configuration error: {}", e),
            ServerError::ScoreStore(e) => write!(f, "Score store error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<io::Error> for ServerError {
    fn from(error: io::Error) -> Self {
        ServerError::Io(error)
    }
}

impl From<config::ConfigError> for ServerError {
    fn from(error: config::ConfigError) -> Self {
        ServerError::Config(error)
    }
}

impl From<ScoreStoreError> for ServerError {
    fn from(error: ScoreStoreError) -> Self {
        ServerError::ScoreStore(error)
    }
}

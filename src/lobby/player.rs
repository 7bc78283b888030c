//! Module `player`
//!
//! Defines the `Player` entity owned by a channel: display name, host flag,
//! live score and lives, and the join sequence number used for deterministic
//! host election.

use crate::connection::{ConnId, Connection};

/// A member of one channel. Created on join, destroyed on leave or
/// disconnect; never shared between channels.
#[derive(Debug, Clone)]
pub struct Player {
    connection: Connection,
    username: String,
    host: bool,
    score: i64,
    lives: i64,
    join_seq: u64,
}

impl Player {
    pub fn new(connection: Connection, username: String, host: bool, join_seq: u64) -> Self {
        Self {
            connection,
            username,
            host,
            score: 0,
            lives: 0,
            join_seq,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn id(&self) -> ConnId {
        self.connection.id()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_host(&self) -> bool {
        self.host
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn lives(&self) -> i64 {
        self.lives
    }

    pub fn join_seq(&self) -> u64 {
        self.join_seq
    }

    pub fn set_username(&mut self, username: String) {
        self.username = username;
    }

    pub fn set_host(&mut self, host: bool) {
        self.host = host;
    }

    // Overwrites are unconditional; the protocol allows scores and lives to
    // decrease.
    pub fn set_score(&mut self, score: i64) {
        self.score = score;
    }

    pub fn set_lives(&mut self, lives: i64) {
        self.lives = lives;
    }
}

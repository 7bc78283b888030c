//! Module `store`
//!
//! The in-memory registry of channels and players. Owns both the channel
//! name → members mapping and the reverse connection → channel index, and
//! keeps them bidirectionally consistent: a connection appears in the
//! reverse index iff a player for it exists in exactly that channel.
//!
//! The store is shared behind one coarse mutex; every public operation is
//! one critical section, so callers never observe a half-applied mutation.

use log::info;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::connection::{ConnId, Connection};
use crate::error::ChannelError;
use crate::lobby::election;
use crate::lobby::player::Player;

/// Shared handle to the channel store, one per server.
pub type SharedChannelStore = Arc<Mutex<ChannelStore>>;

struct Channel {
    members: HashMap<ConnId, Player>,
}

/// Outcome of a successful leave: what the dispatcher needs to notify the
/// promoted host and refresh the surviving channel.
#[derive(Debug)]
pub struct Departure {
    pub channel: String,
    pub username: String,
    pub was_host: bool,
    pub promoted: Option<Connection>,
    pub channel_deleted: bool,
}

#[derive(Default)]
pub struct ChannelStore {
    channels: HashMap<String, Channel>,
    registry: HashMap<ConnId, String>,
    join_counter: u64,
}

impl ChannelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedChannelStore {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Inserts an empty channel under `name`.
    pub fn create_channel(&mut self, name: &str) -> Result<(), ChannelError> {
        if self.channels.contains_key(name) {
            return Err(ChannelError::AlreadyExists(name.to_string()));
        }
        self.channels.insert(
            name.to_string(),
            Channel {
                members: HashMap::new(),
            },
        );
        info!("Channel {} created", name);
        Ok(())
    }

    /// Adds `conn` to the named channel with a default username. The first
    /// member of a channel becomes its host. Returns a snapshot of the new
    /// player.
    pub fn join_channel(&mut self, name: &str, conn: &Connection) -> Result<Player, ChannelError> {
        if self.registry.get(&conn.id()).map(String::as_str) == Some(name) {
            return Err(ChannelError::AlreadyMember(name.to_string()));
        }
        let channel = self
            .channels
            .get_mut(name)
            .ok_or_else(|| ChannelError::NoSuchChannel(name.to_string()))?;

        let username = format!("Player{}", channel.members.len() + 1);
        let host = channel.members.is_empty();
        self.join_counter += 1;
        let player = Player::new(conn.clone(), username, host, self.join_counter);

        channel.members.insert(conn.id(), player.clone());
        self.registry.insert(conn.id(), name.to_string());

        info!(
            "{} joined channel {} as {}{}",
            conn.addr(),
            name,
            player.username(),
            if host { " (host)" } else { "" }
        );
        Ok(player)
    }

    /// Removes the player for `conn_id` from its channel and the registry.
    /// Deletes the channel if it became empty; otherwise promotes a new host
    /// if the departing player held the flag. Removing an absent connection
    /// is `NotInChannel`, which callers treat as a no-op — that makes
    /// PART/DIE and disconnect cleanup idempotent against each other.
    pub fn leave_channel(&mut self, conn_id: ConnId) -> Result<Departure, ChannelError> {
        let name = self
            .registry
            .remove(&conn_id)
            .ok_or(ChannelError::NotInChannel)?;
        let channel = self
            .channels
            .get_mut(&name)
            .ok_or(ChannelError::NotInChannel)?;

        let removed = channel
            .members
            .remove(&conn_id)
            .ok_or(ChannelError::NotInChannel)?;

        let mut promoted = None;
        let channel_deleted = if channel.members.is_empty() {
            self.channels.remove(&name);
            info!("Channel {} is empty, removing", name);
            true
        } else {
            if removed.is_host() {
                promoted = self.promote_host(&name);
            }
            false
        };

        Ok(Departure {
            channel: name,
            username: removed.username().to_string(),
            was_host: removed.is_host(),
            promoted,
            channel_deleted,
        })
    }

    /// Elects the member with the lowest join sequence number as host and
    /// clears the flag on everyone else. Returns the promoted connection.
    fn promote_host(&mut self, name: &str) -> Option<Connection> {
        let channel = self.channels.get_mut(name)?;
        let new_host = election::next_host(channel.members.values())?;
        for player in channel.members.values_mut() {
            player.set_host(player.id() == new_host);
        }
        let promoted = channel.members.get(&new_host)?;
        info!(
            "Promoted {} to host of channel {}",
            promoted.username(),
            name
        );
        Some(promoted.connection().clone())
    }

    pub fn channel_exists(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// Sorted snapshot of all channel names.
    pub fn list_channels(&self) -> Vec<String> {
        let mut names: Vec<String> = self.channels.keys().cloned().collect();
        names.sort();
        names
    }

    /// Snapshot of a channel's members in join order, or `None` if the
    /// channel does not exist.
    pub fn players_of(&self, name: &str) -> Option<Vec<Player>> {
        let channel = self.channels.get(name)?;
        let mut players: Vec<Player> = channel.members.values().cloned().collect();
        players.sort_by_key(|p| p.join_seq());
        Some(players)
    }

    /// Looks up the player for a connection, if it is in a channel.
    pub fn player_for(&self, conn_id: ConnId) -> Option<&Player> {
        let name = self.registry.get(&conn_id)?;
        self.channels.get(name)?.members.get(&conn_id)
    }

    /// The channel a connection is currently in, if any.
    pub fn channel_of(&self, conn_id: ConnId) -> Option<&str> {
        self.registry.get(&conn_id).map(String::as_str)
    }

    /// Renames a player. Duplicate usernames within a channel are allowed.
    pub fn rename_player(&mut self, conn_id: ConnId, username: &str) -> Result<(), ChannelError> {
        self.player_mut(conn_id)
            .map(|p| p.set_username(username.to_string()))
            .ok_or(ChannelError::NotInChannel)
    }

    pub fn set_score(&mut self, conn_id: ConnId, score: i64) -> Result<(), ChannelError> {
        self.player_mut(conn_id)
            .map(|p| p.set_score(score))
            .ok_or(ChannelError::NotInChannel)
    }

    pub fn set_lives(&mut self, conn_id: ConnId, lives: i64) -> Result<(), ChannelError> {
        self.player_mut(conn_id)
            .map(|p| p.set_lives(lives))
            .ok_or(ChannelError::NotInChannel)
    }

    fn player_mut(&mut self, conn_id: ConnId) -> Option<&mut Player> {
        let name = self.registry.get(&conn_id)?;
        self.channels.get_mut(name)?.members.get_mut(&conn_id)
    }
}

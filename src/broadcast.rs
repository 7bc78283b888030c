//! Module `broadcast`
//!
//! Fan-out of server messages to channel members. Membership is read once
//! from the store and the snapshot is iterated; sends are non-blocking
//! channel pushes, so a slow or dead recipient cannot stall the others.

use crate::connection::ConnId;
use crate::lobby::{ChannelStore, Player};

/// Formats the member list, one line per player in join order, the host
/// marked with a `(Host)` suffix.
pub fn user_list(players: &[Player]) -> String {
    let lines: Vec<String> = players
        .iter()
        .map(|p| {
            if p.is_host() {
                format!("{} (Host)", p.username())
            } else {
                p.username().to_string()
            }
        })
        .collect();
    format!("USERS {}", lines.join("\n"))
}

/// Sends a refreshed `USERS` list to every member of the channel. A full
/// re-broadcast, not a diff.
pub fn send_user_list(store: &ChannelStore, name: &str) {
    let Some(players) = store.players_of(name) else {
        return;
    };
    let message = user_list(&players);
    for player in &players {
        player.connection().send(&message);
    }
}

/// Sends `payload` to every member of the channel except `sender`.
pub fn send_to_others(store: &ChannelStore, name: &str, sender: ConnId, payload: &str) {
    let Some(players) = store.players_of(name) else {
        return;
    };
    for player in players.iter().filter(|p| p.id() != sender) {
        player.connection().send(payload);
    }
}

/// Sends `payload` to every member of the channel, originator included.
pub fn send_to_all(store: &ChannelStore, name: &str, payload: &str) {
    let Some(players) = store.players_of(name) else {
        return;
    };
    for player in &players {
        player.connection().send(payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Connection;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn store_with_two() -> (ChannelStore, Connection, UnboundedReceiver<String>, Connection, UnboundedReceiver<String>) {
        let mut store = ChannelStore::new();
        store.create_channel("lobby1").unwrap();
        let (tx_a, rx_a) = mpsc::unbounded_channel();
        let (tx_b, rx_b) = mpsc::unbounded_channel();
        let a = Connection::new(1, "127.0.0.1:40001".parse().unwrap(), tx_a);
        let b = Connection::new(2, "127.0.0.1:40002".parse().unwrap(), tx_b);
        store.join_channel("lobby1", &a).unwrap();
        store.join_channel("lobby1", &b).unwrap();
        (store, a, rx_a, b, rx_b)
    }

    fn drain(rx: &mut UnboundedReceiver<String>) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    #[test]
    fn user_list_marks_exactly_the_host() {
        let (store, _a, _rx_a, _b, _rx_b) = store_with_two();
        let players = store.players_of("lobby1").unwrap();
        let list = user_list(&players);
        assert_eq!(list, "USERS Player1 (Host)\nPlayer2");
    }

    #[test]
    fn send_user_list_reaches_every_member_identically() {
        let (store, _a, mut rx_a, _b, mut rx_b) = store_with_two();
        send_user_list(&store, "lobby1");
        let to_a = drain(&mut rx_a);
        let to_b = drain(&mut rx_b);
        assert_eq!(to_a, to_b);
        assert_eq!(to_a, vec!["USERS Player1 (Host)\nPlayer2".to_string()]);
    }

    #[test]
    fn send_to_others_skips_the_sender() {
        let (store, a, mut rx_a, _b, mut rx_b) = store_with_two();
        send_to_others(&store, "lobby1", a.id(), "SCORES Player1:10:3");
        assert!(drain(&mut rx_a).is_empty());
        assert_eq!(drain(&mut rx_b), vec!["SCORES Player1:10:3".to_string()]);
    }

    #[test]
    fn send_to_all_includes_the_sender() {
        let (store, _a, mut rx_a, _b, mut rx_b) = store_with_two();
        send_to_all(&store, "lobby1", "START");
        assert_eq!(drain(&mut rx_a), vec!["START".to_string()]);
        assert_eq!(drain(&mut rx_b), vec!["START".to_string()]);
    }

    #[test]
    fn broadcasts_to_a_missing_channel_are_noops() {
        let (store, a, mut rx_a, _b, _rx_b) = store_with_two();
        send_user_list(&store, "ghost");
        send_to_all(&store, "ghost", "START");
        send_to_others(&store, "ghost", a.id(), "x");
        assert!(drain(&mut rx_a).is_empty());
    }
}

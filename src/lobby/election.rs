//! Host election policy.
//!
//! When a non-empty channel loses its host, the surviving member with the
//! lowest join sequence number is promoted. The pick is deterministic so
//! hand-offs are reproducible regardless of map iteration order.

use crate::connection::ConnId;
use crate::lobby::player::Player;

/// Picks the next host among the given members. Returns `None` only for an
/// empty iterator; a channel calling this is never empty.
pub fn next_host<'a>(members: impl Iterator<Item = &'a Player>) -> Option<ConnId> {
    members.min_by_key(|p| p.join_seq()).map(|p| p.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Connection;
    use tokio::sync::mpsc;

    fn player(id: ConnId, join_seq: u64) -> Player {
        let (tx, _rx) = mpsc::unbounded_channel();
        let conn = Connection::new(id, "127.0.0.1:9070".parse().unwrap(), tx);
        Player::new(conn, format!("Player{}", id), false, join_seq)
    }

    #[test]
    fn picks_lowest_join_seq() {
        let members = vec![player(10, 5), player(11, 2), player(12, 9)];
        assert_eq!(next_host(members.iter()), Some(11));
    }

    #[test]
    fn empty_channel_elects_nobody() {
        let members: Vec<Player> = Vec::new();
        assert_eq!(next_host(members.iter()), None);
    }

    #[test]
    fn single_member_is_promoted() {
        let members = vec![player(3, 40)];
        assert_eq!(next_host(members.iter()), Some(3));
    }
}

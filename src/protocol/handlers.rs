//! Command handlers for the lobby relay server.
//!
//! `handle_command` routes one parsed command to its handler. The dispatcher
//! keeps no state of its own; everything is looked up per call from the
//! channel store. Handlers that mutate lobby state take the store mutex for
//! exactly one operation-plus-broadcast critical section. Leaderboard
//! handlers never touch that mutex, so slow disk I/O cannot stall channels.

use log::{debug, error, warn};
use rand::Rng;

use crate::broadcast;
use crate::connection::Connection;
use crate::error::ChannelError;
use crate::lobby::{ChannelStore, SharedChannelStore};
use crate::protocol::Command;
use crate::scores::ScoreStore;

/// Dispatches a received command to its corresponding handler.
pub fn handle_command(
    conn: &Connection,
    command: &Command,
    channels: &SharedChannelStore,
    scores: &ScoreStore,
) {
    match command {
        Command::Marco => handle_cmd_marco(conn),
        Command::Create(name) => handle_cmd_create(conn, name, channels),
        Command::List => handle_cmd_list(conn, channels),
        Command::Join(name) => handle_cmd_join(conn, name, channels),
        Command::Part => handle_cmd_part(conn, channels),
        Command::Users => handle_cmd_users(conn, channels),
        Command::Msg(text) => handle_cmd_msg(conn, text, channels),
        Command::Nick(name) => handle_cmd_nick(conn, name, channels),
        Command::Start => handle_cmd_start(conn, channels),
        Command::Piece => handle_cmd_piece(conn, channels),
        Command::Score(value) => handle_cmd_score(conn, *value, channels),
        Command::Scores => handle_cmd_scores(conn, channels),
        Command::Lives(value) => handle_cmd_lives(conn, *value, channels),
        Command::HiScore { name, score } => handle_cmd_hiscore(conn, name, *score, scores),
        Command::HiScores => handle_cmd_hiscores(conn, scores),
        Command::Die => handle_cmd_die(conn, channels),
        Command::Invalid(verb) => {
            warn!("Malformed {} command from {}, ignoring", verb, conn.addr());
        }
        Command::Unknown => {
            // Unknown verbs are silently ignored, no error reply.
            debug!("Unknown command from {}, ignoring", conn.addr());
        }
    }
}

/// Runs the disconnect cleanup for a closed connection: same as PART, but
/// with no client-visible reply to the closing side. Safe to call even if
/// the connection already left via PART or DIE.
pub fn handle_disconnect(conn: &Connection, channels: &SharedChannelStore) {
    let mut store = channels.lock().unwrap();
    if depart_and_notify(&mut store, conn) {
        debug!("Cleaned up channel membership for {}", conn.addr());
    }
}

/// Removes the sender from its channel, notifies a promoted host, and
/// refreshes the surviving channel's user list. Returns false when the
/// sender was not in a channel (idempotent no-op).
fn depart_and_notify(store: &mut ChannelStore, conn: &Connection) -> bool {
    match store.leave_channel(conn.id()) {
        Ok(departure) => {
            debug!(
                "{} left channel {}",
                departure.username, departure.channel
            );
            if let Some(promoted) = &departure.promoted {
                promoted.send("HOST");
            }
            if !departure.channel_deleted {
                broadcast::send_user_list(store, &departure.channel);
            }
            true
        }
        Err(ChannelError::NotInChannel) => false,
        Err(e) => {
            error!("Leave failed for {}: {}", conn.addr(), e);
            false
        }
    }
}

fn handle_cmd_marco(conn: &Connection) {
    conn.send("Polo");
}

/// CREATE makes the channel and auto-joins the creator, so a successful
/// CREATE is observable exactly like a JOIN of a fresh channel.
fn handle_cmd_create(conn: &Connection, name: &str, channels: &SharedChannelStore) {
    let mut store = channels.lock().unwrap();
    match store.create_channel(name) {
        Ok(()) => {
            depart_and_notify(&mut store, conn);
            match store.join_channel(name, conn) {
                Ok(_) => {
                    conn.send("JOIN");
                    broadcast::send_user_list(&store, name);
                }
                Err(e) => error!("Auto-join of fresh channel {} failed: {}", name, e),
            }
        }
        Err(ChannelError::AlreadyExists(_)) => {
            conn.send(&format!("ERROR {} already exists", name));
        }
        Err(e) => error!("CREATE {} from {} failed: {}", name, conn.addr(), e),
    }
}

fn handle_cmd_list(conn: &Connection, channels: &SharedChannelStore) {
    let names = channels.lock().unwrap().list_channels();
    if names.is_empty() {
        conn.send("CHANNELS No channels available.");
    } else {
        conn.send(&format!("CHANNELS {}", names.join("\n")));
    }
}

fn handle_cmd_join(conn: &Connection, name: &str, channels: &SharedChannelStore) {
    let mut store = channels.lock().unwrap();
    if store.channel_of(conn.id()) == Some(name) {
        conn.send(&format!("ERROR already in channel {}", name));
        return;
    }
    if !store.channel_exists(name) {
        conn.send(&format!("ERROR Channel {} does not exist.", name));
        return;
    }
    // Switching channels: drop the old membership first, with its own
    // host hand-off and broadcast.
    depart_and_notify(&mut store, conn);
    match store.join_channel(name, conn) {
        Ok(_) => {
            conn.send("JOIN");
            broadcast::send_user_list(&store, name);
        }
        Err(e) => error!("JOIN {} from {} failed: {}", name, conn.addr(), e),
    }
}

fn handle_cmd_part(conn: &Connection, channels: &SharedChannelStore) {
    let mut store = channels.lock().unwrap();
    if !depart_and_notify(&mut store, conn) {
        debug!("PART from {} ignored, not in a channel", conn.addr());
    }
}

fn handle_cmd_die(conn: &Connection, channels: &SharedChannelStore) {
    let mut store = channels.lock().unwrap();
    if !depart_and_notify(&mut store, conn) {
        debug!("DIE from {} ignored, not in a channel", conn.addr());
    }
}

fn handle_cmd_users(conn: &Connection, channels: &SharedChannelStore) {
    let store = channels.lock().unwrap();
    let players = store
        .channel_of(conn.id())
        .and_then(|name| store.players_of(name));
    match players {
        Some(players) => conn.send(&broadcast::user_list(&players)),
        None => debug!("USERS from {} ignored, not in a channel", conn.addr()),
    }
}

fn handle_cmd_msg(conn: &Connection, text: &str, channels: &SharedChannelStore) {
    let store = channels.lock().unwrap();
    let snapshot = store
        .player_for(conn.id())
        .map(|p| p.username().to_string())
        .zip(store.channel_of(conn.id()).map(str::to_string));
    match snapshot {
        Some((username, name)) => {
            broadcast::send_to_all(&store, &name, &format!("MSG {}: {}", username, text));
        }
        None => debug!("MSG from {} ignored, not in a channel", conn.addr()),
    }
}

fn handle_cmd_nick(conn: &Connection, name: &str, channels: &SharedChannelStore) {
    let mut store = channels.lock().unwrap();
    match store.rename_player(conn.id(), name) {
        Ok(()) => {
            conn.send(&format!("NICK {}", name));
            if let Some(channel) = store.channel_of(conn.id()).map(str::to_string) {
                broadcast::send_user_list(&store, &channel);
            }
        }
        Err(_) => debug!("NICK from {} ignored, not in a channel", conn.addr()),
    }
}

fn handle_cmd_start(conn: &Connection, channels: &SharedChannelStore) {
    let store = channels.lock().unwrap();
    match store.channel_of(conn.id()) {
        Some(name) => broadcast::send_to_all(&store, name, "START"),
        None => debug!("START from {} ignored, not in a channel", conn.addr()),
    }
}

fn handle_cmd_piece(conn: &Connection, channels: &SharedChannelStore) {
    let store = channels.lock().unwrap();
    match store.channel_of(conn.id()) {
        Some(name) => {
            let piece: u32 = rand::thread_rng().gen_range(0..15);
            broadcast::send_to_all(&store, name, &format!("PIECE {}", piece));
        }
        None => debug!("PIECE from {} ignored, not in a channel", conn.addr()),
    }
}

fn handle_cmd_score(conn: &Connection, value: i64, channels: &SharedChannelStore) {
    let mut store = channels.lock().unwrap();
    if store.set_score(conn.id(), value).is_err() {
        debug!("SCORE from {} ignored, not in a channel", conn.addr());
    }
}

fn handle_cmd_lives(conn: &Connection, value: i64, channels: &SharedChannelStore) {
    let mut store = channels.lock().unwrap();
    if store.set_lives(conn.id(), value).is_err() {
        debug!("LIVES from {} ignored, not in a channel", conn.addr());
    }
}

fn handle_cmd_scores(conn: &Connection, channels: &SharedChannelStore) {
    let store = channels.lock().unwrap();
    let snapshot = store
        .player_for(conn.id())
        .map(|p| format!("SCORES {}:{}:{}", p.username(), p.score(), p.lives()))
        .zip(store.channel_of(conn.id()).map(str::to_string));
    match snapshot {
        Some((payload, name)) => broadcast::send_to_others(&store, &name, conn.id(), &payload),
        None => debug!("SCORES from {} ignored, not in a channel", conn.addr()),
    }
}

/// Leaderboard upsert. Runs without the channel-store lock; a persistence
/// failure degrades to a logged no-op, never a client-visible error.
fn handle_cmd_hiscore(conn: &Connection, name: &str, score: i64, scores: &ScoreStore) {
    match scores.upsert_score(name, score) {
        Ok(true) => conn.send("NEWSCORE"),
        Ok(false) => {}
        Err(e) => error!("Failed to persist score for {}: {}", name, e),
    }
}

fn handle_cmd_hiscores(conn: &Connection, scores: &ScoreStore) {
    match scores.get_scores() {
        Ok(entries) if entries.is_empty() => conn.send("HISCORES"),
        Ok(entries) => {
            let lines: Vec<String> = entries
                .iter()
                .map(|(name, score)| format!("{}:{}", name, score))
                .collect();
            conn.send(&format!("HISCORES {}", lines.join("\n")));
        }
        Err(e) => {
            error!("Failed to read leaderboard: {}", e);
            conn.send("HISCORES");
        }
    }
}

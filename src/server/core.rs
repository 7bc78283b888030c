//! Server core
//!
//! Owns the TCP listener and the shared lobby state, accepts connections,
//! and spawns one task per client so the accept loop never blocks. Each
//! client gets a reader loop feeding the command dispatcher and a writer
//! task draining its outbound queue, so a stalled socket only ever backs up
//! its own queue.

use log::{error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use crate::config::ServerConfig;
use crate::connection::{ConnId, Connection};
use crate::error::ServerError;
use crate::lobby::{ChannelStore, SharedChannelStore};
use crate::protocol::{handle_command, handle_disconnect, parse_command};
use crate::scores::ScoreStore;

pub struct Server {
    listener: TcpListener,
    channels: SharedChannelStore,
    scores: Arc<ScoreStore>,
    max_clients: usize,
    active_clients: Arc<AtomicUsize>,
    next_conn_id: AtomicU64,
}

impl Server {
    /// Binds the listener and opens the leaderboard store.
    pub async fn bind(config: &ServerConfig) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(config.listen_socket()).await?;
        info!("Server bound to {}", listener.local_addr()?);

        let scores = Arc::new(ScoreStore::open(&config.db_path)?);

        Ok(Self {
            listener,
            channels: ChannelStore::shared(),
            scores,
            max_clients: config.max_clients,
            active_clients: Arc::new(AtomicUsize::new(0)),
            next_conn_id: AtomicU64::new(1),
        })
    }

    /// The actual bound address, useful when the configured port is 0.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop. Runs until the process exits.
    pub async fn run(self) {
        info!("Relay server accepting clients (max {})", self.max_clients);

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    if self.active_clients.load(Ordering::SeqCst) >= self.max_clients {
                        warn!("Connection limit reached, dropping {}", addr);
                        continue;
                    }

                    let conn_id = self.next_conn_id.fetch_add(1, Ordering::SeqCst);
                    let channels = Arc::clone(&self.channels);
                    let scores = Arc::clone(&self.scores);
                    let active = Arc::clone(&self.active_clients);

                    active.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(async move {
                        handle_connection(stream, addr, conn_id, channels, scores).await;
                        active.fetch_sub(1, Ordering::SeqCst);
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Runs one client session: reads newline-delimited commands until EOF or a
/// read error, then performs the same channel cleanup as PART.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    conn_id: ConnId,
    channels: SharedChannelStore,
    scores: Arc<ScoreStore>,
) {
    info!("New connection: {}", addr);

    let (read_half, mut write_half) = stream.into_split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    // Writer task: drains the outbound queue onto the socket, one line per
    // message. Ends when every sender clone is gone or the peer is dead.
    let writer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if write_half.write_all(message.as_bytes()).await.is_err()
                || write_half.write_all(b"\n").await.is_err()
            {
                break;
            }
        }
        let _ = write_half.shutdown().await;
    });

    let conn = Connection::new(conn_id, addr, tx);
    let mut lines = BufReader::new(read_half).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let command = parse_command(&line);
                handle_command(&conn, &command, &channels, &scores);
            }
            Ok(None) => {
                info!("Connection closed: {}", addr);
                break;
            }
            Err(e) => {
                error!("Failed to read from {}: {}", addr, e);
                break;
            }
        }
    }

    // Same cleanup as PART, with no reply to the closing client. Idempotent
    // if the client already left via PART or DIE.
    handle_disconnect(&conn, &channels);

    // Releasing the last sender lets the writer flush and exit.
    drop(conn);
    let _ = writer.await;
}

//! Module `connection`
//!
//! Defines the `Connection` handle the lobby core holds for each connected
//! client. The core never owns the socket; it only keeps the connection id,
//! the remote address for logging, and a non-blocking sender feeding the
//! per-connection writer task.

use std::net::SocketAddr;
use tokio::sync::mpsc;

/// Stable identifier for a connection, allocated once at accept time.
pub type ConnId = u64;

/// Cloneable handle to a connected client.
///
/// Equality is by connection id; two handles for the same socket compare
/// equal regardless of which clone they came from.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnId,
    addr: SocketAddr,
    outbound: mpsc::UnboundedSender<String>,
}

impl Connection {
    pub fn new(id: ConnId, addr: SocketAddr, outbound: mpsc::UnboundedSender<String>) -> Self {
        Self { id, addr, outbound }
    }

    pub fn id(&self) -> ConnId {
        self.id
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Queues one message for delivery. Never blocks; if the writer task is
    /// gone the message is dropped (best effort, fire-and-forget).
    pub fn send(&self, message: &str) {
        let _ = self.outbound.send(message.to_string());
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Connection {}

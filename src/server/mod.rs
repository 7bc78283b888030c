//! Server module
//!
//! Listener setup and per-connection session handling.

pub mod core;

pub use core::Server;

//! Lobby protocol implementation
//!
//! Handles command parsing, dispatch, and response generation.

pub mod commands;
pub mod handlers;

pub use commands::{Command, parse_command};
pub use handlers::{handle_command, handle_disconnect};

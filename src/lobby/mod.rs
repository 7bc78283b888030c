//! Lobby state management
//!
//! Channels, players, and the host-election policy. All shared state lives
//! in [`store::ChannelStore`] behind a single mutex.

pub mod election;
pub mod player;
pub mod store;

pub use player::Player;
pub use store::{ChannelStore, Departure, SharedChannelStore};

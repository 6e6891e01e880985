//! Room/relay coordinator.
//!
//! Clients never talk to each other directly. They post [`game_core::Action`]s
//! to the relay, which keeps room bookkeeping in a [`RoomStore`] and queues
//! [`game_core::Push`] messages for the other participant until its next poll.

pub mod codes;
pub mod config;
pub mod error;
pub mod http;
pub mod room;
pub mod store;
pub mod sweeper;

pub use config::{ConfigError, RelayConfig};
pub use error::RelayError;
pub use http::router;
pub use room::{Room, Seat, Snapshot};
pub use store::RoomStore;

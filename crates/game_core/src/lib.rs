//! Rules and state for turn-based two-player board games.
//!
//! - [`board`]: the fixed-size grid and its wire snapshot
//! - [`rules`]: the [`Rules`] strategy and the shared legality checks
//! - [`chess`], [`janggi`], [`omok`]: per-game movement and terminal rules
//! - [`executor`]: applying a validated move
//! - [`game`]: the active game record (turn, captures, result)
//! - [`protocol`]: JSON messages between clients and the relay

pub mod board;
pub mod chess;
pub mod executor;
pub mod game;
pub mod janggi;
pub mod ledger;
pub mod omok;
pub mod protocol;
pub mod rules;
pub mod types;

pub use board::*;
pub use executor::*;
pub use game::*;
pub use ledger::*;
pub use protocol::*;
pub use rules::*;
pub use types::*;

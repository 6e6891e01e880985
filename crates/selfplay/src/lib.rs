//! Self-play runner
//!
//! Plays both seats of a room with [`session::Session`]s that never choose a
//! move themselves: the turn timer runs out and the forced random move is
//! played, relayed through an in-process relay, and mirrored by the peer.
//! Useful as a soak test of rules, relay and session together.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p selfplay -- --variant omok --games 20 --save omok.json
//! ```

mod link;
mod match_runner;
mod results;

pub use link::*;
pub use match_runner::*;
pub use results::*;

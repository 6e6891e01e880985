//! Client side of a networked board game: the per-player session state
//! machine, its turn timer, the view projection and an async driver that
//! talks to the relay through a [`RelayLink`].

pub mod client;
pub mod config;
pub mod error;
pub mod link;
pub mod session;
pub mod turn_timer;
pub mod view;

pub use client::{Client, Command};
pub use config::{ConfigError, SessionConfig};
pub use error::SessionError;
pub use link::{LinkError, RelayLink};
pub use session::{Mode, Session, SessionState};
pub use turn_timer::{TimerEvent, TurnTimer, DEFAULT_TURN_TICKS};
pub use view::{color_label, render, CellView, ViewModel};

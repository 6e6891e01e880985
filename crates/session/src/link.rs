//! The transport seam between a client session and the relay.

use async_trait::async_trait;
use std::sync::Arc;
use game_core::{Action, ErrorCode, PlayerId, Push, Reply};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The request never got an answer (connection drop, timeout, ...).
    #[error("relay unreachable: {0}")]
    Unreachable(String),
    /// The relay answered with an error.
    #[error("{message}")]
    Rejected { code: ErrorCode, message: String },
}

impl LinkError {
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            LinkError::Unreachable(_) => None,
            LinkError::Rejected { code, .. } => Some(*code),
        }
    }
}

/// Anything that can carry actions to the relay and drain this player's
/// queue: an HTTP client, a websocket, or an in-process store.
#[async_trait]
pub trait RelayLink: Send + Sync {
    /// Post an action and wait for the synchronous reply. Relay-side
    /// rejections may come back either as `Reply::Error` or as
    /// `LinkError::Rejected`; the session treats both alike.
    async fn request(&self, action: Action) -> Result<Reply, LinkError>;

    /// Drain queued messages. Each message is delivered at most once.
    async fn poll(&self, player: &PlayerId) -> Result<Vec<Push>, LinkError>;
}

#[async_trait]
impl<T: RelayLink + ?Sized> RelayLink for Arc<T> {
    async fn request(&self, action: Action) -> Result<Reply, LinkError> {
        (**self).request(action).await
    }

    async fn poll(&self, player: &PlayerId) -> Result<Vec<Push>, LinkError> {
        (**self).poll(player).await
    }
}

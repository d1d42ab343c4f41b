//! The chat service boundary the orchestrator pulls turns from.

use async_trait::async_trait;

use crate::conversation::Turn;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The service produced something that is not a usable turn. The
    /// conversation carries on.
    #[error("malformed turn: {0}")]
    Malformed(String),
    /// The service can no longer produce turns at all.
    #[error("chat service unavailable: {0}")]
    Unavailable(String),
}

/// A multi-party chat that yields one turn at a time.
#[async_trait]
pub trait ChatService: Send {
    /// Post the opening user request.
    async fn seed(&mut self, text: &str) -> Result<(), ChatError>;

    /// Next turn, or `None` once the participants have nothing more to say.
    async fn next_turn(&mut self) -> Result<Option<Turn>, ChatError>;
}

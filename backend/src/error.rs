//! Error types for the simulator
//!
//! Only configuration problems are errors. Message loss is a normal outcome
//! of a lossy channel and never shows up here.

use crate::models::actor::ActorId;
use thiserror::Error;

/// Errors raised while configuring or running a simulation
#[derive(Debug, Error)]
pub enum SimError {
    /// A message was sent over a directed pair with no registered channel.
    /// Fatal: the run loop stops and returns this error.
    #[error("no channel registered for {sender} -> {receiver}")]
    NoSuchChannel { sender: ActorId, receiver: ActorId },

    #[error("channel {sender} -> {receiver} is already registered")]
    DuplicateChannel { sender: ActorId, receiver: ActorId },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

impl SimError {
    /// True for the unregistered-channel error
    pub fn is_missing_channel(&self) -> bool {
        matches!(self, SimError::NoSuchChannel { .. })
    }
}

/// Convenience alias for `Result<T, SimError>`
pub type SimResult<T> = Result<T, SimError>;

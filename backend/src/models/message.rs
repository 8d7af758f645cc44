//! Messages exchanged between actors

use crate::models::actor::{ActorId, ActorRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier carried by a message and echoed by its acknowledgment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub fn new(raw: u64) -> Self {
        MessageId(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for MessageId {
    fn from(raw: u64) -> Self {
        MessageId(raw)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which handler of the receiver a message is addressed to
///
/// Closed set: every actor handles every variant (see
/// [`Actor::receive`](crate::Actor::receive)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Plain payload message
    Message,
    /// Acknowledgment of a previously received message
    Acknowledge,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Message => "message",
            Action::Acknowledge => "acknowledge",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable envelope travelling through a channel
///
/// Holds shared handles to both endpoints so a delivery job can invoke the
/// receiver and the receiver can reply to the sender.
#[derive(Clone)]
pub struct Message {
    sender: ActorRef,
    receiver: ActorRef,
    id: MessageId,
    action: Action,
}

impl Message {
    pub fn new(sender: ActorRef, receiver: ActorRef, id: MessageId, action: Action) -> Self {
        Self {
            sender,
            receiver,
            id,
            action,
        }
    }

    /// Message addressed to the receiver's plain message handler
    pub fn request(sender: ActorRef, receiver: ActorRef, id: MessageId) -> Self {
        Self::new(sender, receiver, id, Action::Message)
    }

    pub fn sender(&self) -> &ActorRef {
        &self.sender
    }

    pub fn receiver(&self) -> &ActorRef {
        &self.receiver
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Directed `(sender, receiver)` pair used to look up the channel
    pub fn route(&self) -> (ActorId, ActorId) {
        (self.sender.id(), self.receiver.id())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Message {}: {}->{}.{}",
            self.id,
            self.sender.id(),
            self.receiver.id(),
            self.action
        )
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("sender", &self.sender.id())
            .field("receiver", &self.receiver.id())
            .field("id", &self.id)
            .field("action", &self.action)
            .finish()
    }
}

//! Channel lookup by directed actor pair

use super::channel::Channel;
use crate::error::{SimError, SimResult};
use crate::models::actor::ActorId;
use std::collections::HashMap;
use std::rc::Rc;

/// Map from `(sender, receiver)` to the channel serving that direction
///
/// `(a, b)` and `(b, a)` are independent entries.
#[derive(Default)]
pub struct ChannelRegistry {
    channels: HashMap<(ActorId, ActorId), Rc<dyn Channel>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a channel; fails if the pair already has one
    pub fn register(
        &mut self,
        sender: ActorId,
        receiver: ActorId,
        channel: Rc<dyn Channel>,
    ) -> SimResult<()> {
        if self.channels.contains_key(&(sender, receiver)) {
            return Err(SimError::DuplicateChannel { sender, receiver });
        }
        self.channels.insert((sender, receiver), channel);
        Ok(())
    }

    /// Install `channel` for the pair, returning the one it replaced
    pub fn replace(
        &mut self,
        sender: ActorId,
        receiver: ActorId,
        channel: Rc<dyn Channel>,
    ) -> Option<Rc<dyn Channel>> {
        self.channels.insert((sender, receiver), channel)
    }

    pub fn get(&self, sender: ActorId, receiver: ActorId) -> Option<Rc<dyn Channel>> {
        self.channels.get(&(sender, receiver)).cloned()
    }

    pub fn contains(&self, sender: ActorId, receiver: ActorId) -> bool {
        self.channels.contains_key(&(sender, receiver))
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Registered pairs in ascending order
    pub fn routes(&self) -> Vec<(ActorId, ActorId)> {
        let mut routes: Vec<_> = self.channels.keys().copied().collect();
        routes.sort();
        routes
    }
}

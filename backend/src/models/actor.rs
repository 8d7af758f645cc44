//! Actors: the endpoints that exchange messages
//!
//! An actor is any type implementing [`Actor`]. Handlers return boxed local
//! futures so they may call [`System::suspend_for`] and resume exactly where
//! they left off. Shared per-actor plumbing (identity, scheduler handle,
//! event histogram) lives in [`ActorCore`], which implementors embed.

use crate::error::SimResult;
use crate::models::message::{Action, Message};
use crate::models::statistics::Statistics;
use crate::network::Delivery;
use crate::orchestrator::System;
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// Unique actor identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(u32);

impl ActorId {
    pub fn new(raw: u32) -> Self {
        ActorId(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{}", self.0)
    }
}

/// Shared handle to a type-erased actor
pub type ActorRef = Rc<dyn Actor>;

/// Future returned by actor handlers
pub type HandlerFuture = LocalBoxFuture<'static, SimResult<()>>;

/// Behaviour of a simulated endpoint
///
/// Implementors provide [`on_message`](Actor::on_message) and optionally
/// [`on_acknowledge`](Actor::on_acknowledge); delivery jobs call
/// [`receive`](Actor::receive), which routes on the message's [`Action`].
pub trait Actor: 'static {
    fn core(&self) -> &ActorCore;

    fn id(&self) -> ActorId {
        self.core().id()
    }

    /// Handler for [`Action::Message`]
    fn on_message(self: Rc<Self>, message: Message) -> HandlerFuture;

    /// Handler for [`Action::Acknowledge`]; ignores the message by default
    fn on_acknowledge(self: Rc<Self>, message: Message) -> HandlerFuture {
        let _ = (self, message);
        future::ready(Ok(())).boxed_local()
    }

    /// Entry point used by delivery jobs
    fn receive(self: Rc<Self>, message: Message) -> HandlerFuture {
        match message.action() {
            Action::Message => self.on_message(message),
            Action::Acknowledge => self.on_acknowledge(message),
        }
    }
}

/// Identity, scheduler handle and statistics shared by every actor
pub struct ActorCore {
    id: ActorId,
    system: System,
    stats: RefCell<Statistics>,
}

impl ActorCore {
    pub fn new(id: ActorId, system: &System) -> Self {
        Self {
            id,
            system: system.clone(),
            stats: RefCell::new(Statistics::new()),
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    /// Count one occurrence of `label` in this actor's histogram
    pub fn tick(&self, label: &str) {
        self.stats.borrow_mut().tick(label);
    }

    /// Count `label` and emit `message` on the trace hook
    pub fn trace(&self, label: &str, message: impl AsRef<str>) {
        self.tick(label);
        self.system.trace(message);
    }

    /// Read-only view of the event histogram
    pub fn stats(&self) -> Ref<'_, Statistics> {
        self.stats.borrow()
    }

    /// Hand `message` to the scheduler for routing
    pub fn send(&self, message: Message) -> SimResult<Delivery> {
        self.system.send(message)
    }
}

impl fmt::Debug for ActorCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorCore")
            .field("id", &self.id)
            .field("stats", &*self.stats.borrow())
            .finish_non_exhaustive()
    }
}

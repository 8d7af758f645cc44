//! Stop-and-wait retransmission actors
//!
//! [`RetrySender`] sends a message, waits `timeout` ticks and retransmits
//! until it sees an acknowledgment or runs out of retries. [`Acknowledger`]
//! answers every message it receives with an acknowledgment carrying the
//! same id. Pending timers are never cancelled: after each wait the sender
//! checks its own record of acknowledged ids.

use crate::core::time::SimTime;
use crate::error::SimResult;
use crate::models::actor::{Actor, ActorCore, ActorId, ActorRef, HandlerFuture};
use crate::models::message::{Action, Message, MessageId};
use crate::models::statistics::Statistics;
use crate::orchestrator::System;
use futures::FutureExt;
use std::cell::{Ref, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Result of one [`RetrySender::send_message`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOutcome {
    /// Transmissions made, initial send included
    pub attempts: u32,
    /// Whether an acknowledgment arrived before the loop gave up
    pub acknowledged: bool,
}

/// Sender with timeout-driven retransmission
pub struct RetrySender {
    core: ActorCore,
    timeout: SimTime,
    retries: u32,
    acknowledged: RefCell<HashSet<MessageId>>,
    outcomes: RefCell<HashMap<MessageId, SendOutcome>>,
}

impl RetrySender {
    /// `timeout` should exceed the round-trip delay, otherwise every
    /// acknowledgment arrives after a retransmission has already gone out.
    pub fn new(id: ActorId, timeout: SimTime, retries: u32, system: &System) -> Rc<Self> {
        Rc::new(Self {
            core: ActorCore::new(id, system),
            timeout,
            retries,
            acknowledged: RefCell::new(HashSet::new()),
            outcomes: RefCell::new(HashMap::new()),
        })
    }

    pub fn timeout(&self) -> SimTime {
        self.timeout
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn is_acknowledged(&self, id: MessageId) -> bool {
        self.acknowledged.borrow().contains(&id)
    }

    /// Outcome of a finished `send_message` for `id`
    pub fn outcome(&self, id: MessageId) -> Option<SendOutcome> {
        self.outcomes.borrow().get(&id).copied()
    }

    /// Send `id` to `receiver`, retransmitting every `timeout` ticks
    ///
    /// Makes at most `retries + 1` transmissions and returns early once the
    /// acknowledgment for `id` has been seen.
    pub async fn send_message(
        self: Rc<Self>,
        id: MessageId,
        receiver: ActorRef,
    ) -> SimResult<SendOutcome> {
        let system = self.core.system().clone();
        self.core
            .trace("request", format!("Send Request Message {}", id));

        let mut outcome = SendOutcome {
            attempts: 0,
            acknowledged: false,
        };
        for attempt in 0..=self.retries {
            let request = Message::request(self.clone(), receiver.clone(), id);
            self.core.send(request)?;
            outcome.attempts += 1;
            self.core
                .trace("send", format!("Send Message {}, retry {}", id, attempt));

            system.suspend_for(self.timeout).await;
            if self.is_acknowledged(id) {
                outcome.acknowledged = true;
                break;
            }
        }

        self.outcomes.borrow_mut().insert(id, outcome);
        Ok(outcome)
    }

    /// Schedule [`send_message`](Self::send_message) to start at `time`
    pub fn start(self: &Rc<Self>, time: SimTime, id: MessageId, receiver: ActorRef) {
        let sender = Rc::clone(self);
        self.core.system().schedule_at(time, async move {
            sender.send_message(id, receiver).await.map(|_| ())
        });
    }

    /// Read-only event histogram
    pub fn stats(&self) -> Ref<'_, Statistics> {
        self.core.stats()
    }
}

impl Actor for RetrySender {
    fn core(&self) -> &ActorCore {
        &self.core
    }

    fn on_message(self: Rc<Self>, message: Message) -> HandlerFuture {
        async move {
            self.core
                .trace("ignored", format!("Ignored Message: {}", message));
            Ok(())
        }
        .boxed_local()
    }

    fn on_acknowledge(self: Rc<Self>, message: Message) -> HandlerFuture {
        async move {
            self.core
                .trace("acknowledged", format!("Acknowledge Message: {}", message));
            self.acknowledged.borrow_mut().insert(message.id());
            Ok(())
        }
        .boxed_local()
    }
}

/// Replies to every message with an acknowledgment
pub struct Acknowledger {
    core: ActorCore,
}

impl Acknowledger {
    pub fn new(id: ActorId, system: &System) -> Rc<Self> {
        Rc::new(Self {
            core: ActorCore::new(id, system),
        })
    }

    /// Read-only event histogram
    pub fn stats(&self) -> Ref<'_, Statistics> {
        self.core.stats()
    }
}

impl Actor for Acknowledger {
    fn core(&self) -> &ActorCore {
        &self.core
    }

    fn on_message(self: Rc<Self>, message: Message) -> HandlerFuture {
        async move {
            self.core
                .trace("received", format!("Received Message: {}", message));
            let reply = Message::new(
                self.clone(),
                message.sender().clone(),
                message.id(),
                Action::Acknowledge,
            );
            self.core.send(reply).map(|_| ())
        }
        .boxed_local()
    }
}

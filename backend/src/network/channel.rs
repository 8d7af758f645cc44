//! Delivery policies between one ordered pair of actors

use crate::core::time::SimTime;
use crate::error::{SimError, SimResult};
use crate::models::message::Message;
use crate::orchestrator::System;
use serde::Serialize;
use std::cell::Cell;

/// Outcome of handing a message to a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// A delivery job was scheduled for time `at`
    Scheduled { at: SimTime },
    /// The message was lost; nothing was scheduled
    Dropped,
}

impl Delivery {
    pub fn is_dropped(self) -> bool {
        matches!(self, Delivery::Dropped)
    }
}

/// Decides whether and when a message reaches its receiver
///
/// Implementations schedule delivery through
/// [`System::schedule_delivery`]. Dropping a message is a normal outcome,
/// not an error.
pub trait Channel {
    fn deliver(&self, message: Message, system: &System) -> Delivery;
}

/// Running counters kept by a [`LossyChannel`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChannelStats {
    pub sent: u64,
    pub delivered: u64,
    pub dropped: u64,
}

impl ChannelStats {
    /// Fraction of sent messages that were dropped (0.0 before any send)
    pub fn drop_rate(&self) -> f64 {
        if self.sent == 0 {
            return 0.0;
        }
        self.dropped as f64 / self.sent as f64
    }
}

/// Fixed-latency channel that loses each message independently
///
/// Every send consumes one uniform draw from the system RNG. With
/// probability `loss_probability` the message vanishes; otherwise it is
/// delivered exactly `fixed_delay` ticks after the send.
#[derive(Debug)]
pub struct LossyChannel {
    fixed_delay: SimTime,
    loss_probability: f64,
    stats: Cell<ChannelStats>,
}

impl LossyChannel {
    /// # Errors
    /// `InvalidConfig` if `loss_probability` is not a number in `[0, 1]`.
    pub fn new(fixed_delay: SimTime, loss_probability: f64) -> SimResult<Self> {
        if !(0.0..=1.0).contains(&loss_probability) {
            return Err(SimError::InvalidConfig(format!(
                "loss_probability {} outside [0, 1]",
                loss_probability
            )));
        }
        Ok(Self {
            fixed_delay,
            loss_probability,
            stats: Cell::new(ChannelStats::default()),
        })
    }

    /// Channel that never drops
    pub fn reliable(fixed_delay: SimTime) -> Self {
        Self {
            fixed_delay,
            loss_probability: 0.0,
            stats: Cell::new(ChannelStats::default()),
        }
    }

    pub fn fixed_delay(&self) -> SimTime {
        self.fixed_delay
    }

    pub fn loss_probability(&self) -> f64 {
        self.loss_probability
    }

    pub fn stats(&self) -> ChannelStats {
        self.stats.get()
    }
}

impl Channel for LossyChannel {
    fn deliver(&self, message: Message, system: &System) -> Delivery {
        let mut stats = self.stats.get();
        stats.sent += 1;

        let outcome = if system.draw_chance(self.loss_probability) {
            stats.dropped += 1;
            Delivery::Dropped
        } else {
            stats.delivered += 1;
            let at = system.now().saturating_add(self.fixed_delay);
            system.schedule_delivery(at, message.clone());
            Delivery::Scheduled { at }
        };
        self.stats.set(stats);

        tracing::debug!(
            time = system.now(),
            msg = %message,
            outcome = ?outcome,
            "lossy channel decision"
        );
        outcome
    }
}

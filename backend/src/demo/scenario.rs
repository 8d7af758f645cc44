//! Prebuilt retransmission scenarios
//!
//! Both scenarios connect one [`RetrySender`] to one [`Acknowledger`] with a
//! lossy channel in each direction (5 ticks of delay) and a sender timeout
//! of 11 ticks, just over one round trip.

use super::actors::{Acknowledger, RetrySender};
use crate::core::time::SimTime;
use crate::error::SimResult;
use crate::models::actor::ActorId;
use crate::models::message::MessageId;
use crate::orchestrator::{ChannelConfig, RunSummary, SimulationConfig, System, TraceSink};
use std::rc::Rc;

pub const SENDER_ID: u32 = 1;
pub const RECEIVER_ID: u32 = 2;

/// One-way channel delay in both directions
pub const CHANNEL_DELAY: SimTime = 5;

/// Sender wait before retransmitting
pub const SENDER_TIMEOUT: SimTime = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoScenario {
    /// Loss 0.5 each way, 10 retries
    Basic,
    /// Loss 1/√2 each way, 1000 retries
    HeavyLoss,
}

impl DemoScenario {
    /// `0` is [`Basic`](Self::Basic), `1` is [`HeavyLoss`](Self::HeavyLoss)
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(DemoScenario::Basic),
            1 => Some(DemoScenario::HeavyLoss),
            _ => None,
        }
    }

    pub fn loss_probability(self) -> f64 {
        match self {
            DemoScenario::Basic => 0.5,
            DemoScenario::HeavyLoss => std::f64::consts::FRAC_1_SQRT_2,
        }
    }

    pub fn retries(self) -> u32 {
        match self {
            DemoScenario::Basic => 10,
            DemoScenario::HeavyLoss => 1000,
        }
    }

    /// Configuration with both directed channels registered
    pub fn config(self, rng_seed: u64, trace: bool) -> SimulationConfig {
        let p = self.loss_probability();
        SimulationConfig {
            rng_seed,
            trace,
            channels: Vec::new(),
        }
        .with_channel(ChannelConfig::lossy(SENDER_ID, RECEIVER_ID, CHANNEL_DELAY, p))
        .with_channel(ChannelConfig::lossy(RECEIVER_ID, SENDER_ID, CHANNEL_DELAY, p))
    }
}

/// A wired-up scenario ready to run
pub struct DemoSetup {
    pub system: System,
    pub sender: Rc<RetrySender>,
    pub receiver: Rc<Acknowledger>,
}

impl DemoSetup {
    pub fn build(
        scenario: DemoScenario,
        rng_seed: u64,
        trace: bool,
        sink: Rc<dyn TraceSink>,
    ) -> SimResult<Self> {
        let system = System::with_trace_sink(scenario.config(rng_seed, trace), sink)?;
        let sender = RetrySender::new(
            ActorId::new(SENDER_ID),
            SENDER_TIMEOUT,
            scenario.retries(),
            &system,
        );
        let receiver = Acknowledger::new(ActorId::new(RECEIVER_ID), &system);
        Ok(Self {
            system,
            sender,
            receiver,
        })
    }

    /// Reset the clock and send message `run_index` from time zero
    ///
    /// The run banner counts from 1. Actor statistics and the RNG stream
    /// carry over between runs.
    pub fn run_once(&self, run_index: u64) -> SimResult<RunSummary> {
        self.system.reset();
        self.system.trace(format!("=== Run {} ===", run_index + 1));
        self.sender
            .start(0, MessageId::new(run_index), self.receiver.clone());
        self.system.run()
    }
}

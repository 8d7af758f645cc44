//! Netsim Core - discrete-event network simulator
//!
//! Single-threaded simulation of actors exchanging messages over lossy
//! channels, with deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Simulated time
//! - **queue**: Binary-heap priority queue with a pluggable comparator
//! - **models**: Domain types (Actor, Message, Statistics, TraceLog)
//! - **network**: Channels and the per-pair channel registry
//! - **orchestrator**: Scheduler, run loop, suspension and configuration
//! - **rng**: Deterministic random number generation
//! - **demo**: Retransmission protocol built on the above
//!
//! # Critical Invariants
//!
//! 1. Time never decreases while the simulation runs
//! 2. Jobs due at the same time run in the order they were scheduled
//! 3. All randomness is deterministic (seeded RNG)

// Module declarations
pub mod core;
pub mod demo;
pub mod error;
pub mod models;
pub mod network;
pub mod orchestrator;
pub mod queue;
pub mod rng;

// Re-exports for convenience
pub use core::time::{SimClock, SimTime};
pub use error::{SimError, SimResult};
pub use models::{
    actor::{Actor, ActorCore, ActorId, ActorRef, HandlerFuture},
    message::{Action, Message, MessageId},
    statistics::Statistics,
    trace::{TraceEntry, TraceLog},
};
pub use network::{Channel, ChannelRegistry, ChannelStats, Delivery, LossyChannel};
pub use orchestrator::{
    ChannelConfig, ChannelPolicy, NullSink, RecordingSink, RunSummary, SimulationConfig, Suspend,
    System, TaskId, TraceSink, TracingSink, TRACE_TARGET,
};
pub use queue::PriorityQueue;
pub use rng::SimRng;

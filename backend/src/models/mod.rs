//! Domain models for the simulator

pub mod actor;
pub mod message;
pub mod statistics;
pub mod trace;

// Re-exports
pub use actor::{Actor, ActorCore, ActorId, ActorRef, HandlerFuture};
pub use message::{Action, Message, MessageId};
pub use statistics::Statistics;
pub use trace::{TraceEntry, TraceLog};

//! Orchestrator - scheduler, run loop and configuration
//!
//! See `engine.rs` for the run loop and `task.rs` for how suspension works.

pub mod config;
pub mod engine;
pub mod sink;
pub mod task;

// Re-export main types for convenience
pub use config::{ChannelConfig, ChannelPolicy, SimulationConfig};
pub use engine::{RunSummary, System};
pub use sink::{NullSink, RecordingSink, TraceSink, TracingSink, TRACE_TARGET};
pub use task::{Suspend, TaskId};

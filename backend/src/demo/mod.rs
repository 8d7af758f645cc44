//! Retransmission demo built on the scheduler
//!
//! A sender retransmits over a lossy channel until the receiver's
//! acknowledgment gets back to it.

pub mod actors;
pub mod scenario;

pub use actors::{Acknowledger, RetrySender, SendOutcome};
pub use scenario::{DemoScenario, DemoSetup};

//! Trace sinks
//!
//! The scheduler hands every trace line to a [`TraceSink`] together with the
//! simulated time. What happens to it (logging, recording, nothing) is up to
//! the sink.

use crate::core::time::SimTime;
use crate::models::trace::TraceLog;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// `tracing` target used by [`TracingSink`]
pub const TRACE_TARGET: &str = "netsim::trace";

/// Receiver of timestamped trace lines
pub trait TraceSink {
    fn record(&self, time: SimTime, message: &str);
}

/// Forwards trace lines to `tracing` at INFO level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&self, time: SimTime, message: &str) {
        tracing::info!(target: TRACE_TARGET, time, "{}", message);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn record(&self, _time: SimTime, _message: &str) {}
}

/// Keeps trace lines in memory
///
/// Clones share the same log, so a test can keep one clone and hand the
/// other to the system.
///
/// # Example
/// ```
/// use netsim_core::{RecordingSink, SimulationConfig, System};
/// use std::rc::Rc;
///
/// let sink = RecordingSink::new();
/// let config = SimulationConfig { trace: true, ..Default::default() };
/// let system = System::with_trace_sink(config, Rc::new(sink.clone())).unwrap();
///
/// system.trace("hello");
/// assert_eq!(sink.log().entries()[0].message, "hello");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    log: Rc<RefCell<TraceLog>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Ref<'_, TraceLog> {
        self.log.borrow()
    }

    /// Owned copy of the log so far
    pub fn snapshot(&self) -> TraceLog {
        self.log.borrow().clone()
    }

    pub fn digest(&self) -> String {
        self.log.borrow().digest()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl TraceSink for RecordingSink {
    fn record(&self, time: SimTime, message: &str) {
        self.log.borrow_mut().log(time, message);
    }
}

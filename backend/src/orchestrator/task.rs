//! Jobs, tasks and the suspension future
//!
//! Every scheduled action runs as a *task*: a boxed local future owned by
//! the [`System`]. The run loop is the only thing that ever polls a task.
//! [`Suspend`] is the one place a task can yield: on its first poll it
//! enqueues a `Resume` job for the wake-up time and returns `Pending`; when
//! that job comes up the run loop polls the task again and execution
//! continues right after the `.await`, locals and call stack intact.

use super::engine::System;
use crate::core::time::SimTime;
use crate::error::SimResult;
use futures::future::LocalBoxFuture;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A scheduled action, possibly suspended mid-way
pub(crate) type TaskFuture = LocalBoxFuture<'static, SimResult<()>>;

/// Identifies a live task inside a [`System`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn new(raw: u64) -> Self {
        TaskId(raw)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

pub(crate) enum JobAction {
    /// Start a fresh task
    Start(TaskFuture),
    /// Continue a task parked in a [`Suspend`]
    Resume(TaskId),
}

/// Queue entry: what to run and when
pub(crate) struct Job {
    pub(crate) time: SimTime,
    /// Scheduling order, breaks ties between equal times
    pub(crate) seq: u64,
    pub(crate) action: JobAction,
}

/// Queue ordering: earlier time first, then earlier scheduling (FIFO)
pub(crate) fn job_before(a: &Job, b: &Job) -> bool {
    (a.time, a.seq) < (b.time, b.seq)
}

/// Future returned by [`System::suspend_for`]
///
/// # Panics
/// Polling it anywhere but inside a task driven by [`System::run`] or
/// [`System::step`] panics: there is no task to resume.
#[must_use = "suspension only happens when the future is awaited"]
pub struct Suspend {
    system: System,
    duration: SimTime,
    wake_at: Option<SimTime>,
}

impl Suspend {
    pub(crate) fn new(system: System, duration: SimTime) -> Self {
        Self {
            system,
            duration,
            wake_at: None,
        }
    }
}

impl Future for Suspend {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        match self.wake_at {
            Some(at) if self.system.now() >= at => Poll::Ready(()),
            Some(_) => Poll::Pending,
            None => {
                let task = self
                    .system
                    .current_task()
                    .expect("suspend_for awaited outside a running simulation task");
                let at = self.system.now().saturating_add(self.duration);
                self.system.push_job(at, JobAction::Resume(task));
                self.wake_at = Some(at);
                Poll::Pending
            }
        }
    }
}

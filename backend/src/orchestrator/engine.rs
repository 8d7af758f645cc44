//! Scheduler engine
//!
//! [`System`] owns simulated time, the job queue, the channel registry, the
//! RNG and the trace hook. It is a cheap, cloneable handle (`Rc` inside):
//! actors, channels and running tasks all hold a clone and share one
//! simulation. Handles are `!Send`, so the whole simulation is confined to
//! one thread by construction.
//!
//! # Run loop
//!
//! ```text
//! while a job is queued:
//! 1. Pop the earliest job (time, then scheduling order)
//! 2. Advance the clock to the job's time
//! 3. Start or resume the job's task and poll it once
//! 4. The task runs until it finishes or awaits `suspend_for`
//! ```
//!
//! Jobs scheduled while a task runs (including at the current time) are
//! never executed inline; they wait for a later iteration.
//!
//! # Example
//!
//! ```rust
//! use netsim_core::{SimulationConfig, System};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let system = System::new(SimulationConfig::default()).unwrap();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let (sys, log) = (system.clone(), seen.clone());
//! system.schedule_at(0, async move {
//!     let counter = 41;
//!     sys.suspend_for(7).await;
//!     log.borrow_mut().push((sys.now(), counter + 1));
//!     Ok(())
//! });
//!
//! let summary = system.run().unwrap();
//! assert_eq!(*seen.borrow(), vec![(7, 42)]);
//! assert_eq!(summary.final_time, 7);
//! ```

use super::config::SimulationConfig;
use super::sink::{TraceSink, TracingSink};
use super::task::{job_before, Job, JobAction, Suspend, TaskFuture, TaskId};
use crate::core::time::{SimClock, SimTime};
use crate::error::{SimError, SimResult};
use crate::models::actor::ActorId;
use crate::models::message::Message;
use crate::network::{Channel, ChannelRegistry, Delivery};
use crate::queue::PriorityQueue;
use crate::rng::SimRng;
use futures::FutureExt;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::task::{Context, Poll};

/// Totals reported by [`System::run`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Jobs popped and executed (starts and resumptions)
    pub jobs_executed: u64,
    /// Tasks that ran to completion
    pub tasks_completed: u64,
    /// Clock value when the queue ran dry
    pub final_time: SimTime,
}

struct Shared {
    clock: RefCell<SimClock>,
    queue: RefCell<PriorityQueue<Job>>,
    next_seq: Cell<u64>,

    /// Tasks parked in a `Suspend`, keyed by id
    tasks: RefCell<HashMap<TaskId, TaskFuture>>,
    next_task: Cell<u64>,
    /// Task being polled right now, if any
    current_task: Cell<Option<TaskId>>,

    channels: RefCell<ChannelRegistry>,
    rng: RefCell<SimRng>,

    trace_enabled: Cell<bool>,
    sink: RefCell<Rc<dyn TraceSink>>,
}

/// Handle to a discrete-event simulation
#[derive(Clone)]
pub struct System {
    shared: Rc<Shared>,
}

impl System {
    /// Build a system from `config`, tracing through [`TracingSink`]
    ///
    /// # Errors
    /// Invalid channel parameters or duplicate channel pairs.
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        Self::with_trace_sink(config, Rc::new(TracingSink))
    }

    /// Build a system from `config` with a caller-supplied trace sink
    pub fn with_trace_sink(config: SimulationConfig, sink: Rc<dyn TraceSink>) -> SimResult<Self> {
        config.validate()?;

        let system = Self::bare(config.rng_seed, config.trace, sink);
        for channel in &config.channels {
            system.register_channel(channel.sender, channel.receiver, channel.policy.build()?)?;
        }

        tracing::debug!(
            seed = config.rng_seed,
            channels = config.channels.len(),
            "simulation configured"
        );
        Ok(system)
    }

    fn bare(seed: u64, trace_enabled: bool, sink: Rc<dyn TraceSink>) -> Self {
        Self {
            shared: Rc::new(Shared {
                clock: RefCell::new(SimClock::new()),
                queue: RefCell::new(PriorityQueue::with_comparator(
                    job_before as fn(&Job, &Job) -> bool,
                )),
                next_seq: Cell::new(0),
                tasks: RefCell::new(HashMap::new()),
                next_task: Cell::new(0),
                current_task: Cell::new(None),
                channels: RefCell::new(ChannelRegistry::new()),
                rng: RefCell::new(SimRng::new(seed)),
                trace_enabled: Cell::new(trace_enabled),
                sink: RefCell::new(sink),
            }),
        }
    }

    // ========================================================================
    // Time and queue
    // ========================================================================

    /// Current simulated time
    pub fn now(&self) -> SimTime {
        self.shared.clock.borrow().now()
    }

    /// Number of jobs waiting in the queue
    pub fn pending_jobs(&self) -> usize {
        self.shared.queue.borrow().len()
    }

    /// Number of tasks parked in a suspension
    pub fn suspended_tasks(&self) -> usize {
        self.shared.tasks.borrow().len()
    }

    /// True when nothing is left to run
    pub fn is_idle(&self) -> bool {
        self.shared.queue.borrow().is_empty()
    }

    /// Time of the earliest queued job
    pub fn next_job_time(&self) -> Option<SimTime> {
        self.shared.queue.borrow().top().map(|job| job.time)
    }

    /// Run `action` as a new task at `time`
    ///
    /// `time` should not lie before [`now`](Self::now). If it does, the job
    /// still runs (it is simply the earliest in the queue) but the clock is
    /// not moved backwards, so the task observes the current time instead.
    pub fn schedule_at<F>(&self, time: SimTime, action: F)
    where
        F: Future<Output = SimResult<()>> + 'static,
    {
        self.push_job(time, JobAction::Start(action.boxed_local()));
    }

    /// Run `action` as a new task `delay` ticks from now
    pub fn schedule_after<F>(&self, delay: SimTime, action: F)
    where
        F: Future<Output = SimResult<()>> + 'static,
    {
        self.schedule_at(self.now().saturating_add(delay), action);
    }

    /// Run a plain closure at `time`
    pub fn schedule_call<F>(&self, time: SimTime, call: F)
    where
        F: FnOnce() -> SimResult<()> + 'static,
    {
        self.schedule_at(time, async move { call() });
    }

    /// Schedule the receiver's `receive` handler for `message` at `time`
    pub fn schedule_delivery(&self, time: SimTime, message: Message) {
        self.schedule_at(time, async move {
            let receiver = message.receiver().clone();
            receiver.receive(message).await
        });
    }

    /// Pause the calling task for `duration` ticks
    ///
    /// Await the returned future from inside a scheduled action. The action
    /// resumes at `now() + duration`, right after the `.await`. A zero
    /// duration still yields: other jobs already due at the current time run
    /// first.
    pub fn suspend_for(&self, duration: SimTime) -> Suspend {
        Suspend::new(self.clone(), duration)
    }

    pub(crate) fn push_job(&self, time: SimTime, action: JobAction) {
        if time < self.now() {
            tracing::warn!(
                time,
                now = self.now(),
                "job scheduled in the past; it will run at the current time"
            );
        }
        let seq = self.shared.next_seq.get();
        self.shared.next_seq.set(seq + 1);
        self.shared
            .queue
            .borrow_mut()
            .push(Job { time, seq, action });
    }

    pub(crate) fn current_task(&self) -> Option<TaskId> {
        self.shared.current_task.get()
    }

    // ========================================================================
    // Channels and messaging
    // ========================================================================

    /// Install a channel for the directed pair `sender -> receiver`
    ///
    /// # Errors
    /// `DuplicateChannel` if the pair already has a channel.
    pub fn register_channel(
        &self,
        sender: ActorId,
        receiver: ActorId,
        channel: Rc<dyn Channel>,
    ) -> SimResult<()> {
        self.shared
            .channels
            .borrow_mut()
            .register(sender, receiver, channel)
    }

    /// Install or overwrite the channel for `sender -> receiver`
    pub fn replace_channel(&self, sender: ActorId, receiver: ActorId, channel: Rc<dyn Channel>) {
        self.shared
            .channels
            .borrow_mut()
            .replace(sender, receiver, channel);
    }

    pub fn channel(&self, sender: ActorId, receiver: ActorId) -> Option<Rc<dyn Channel>> {
        self.shared.channels.borrow().get(sender, receiver)
    }

    /// Registered `(sender, receiver)` pairs
    pub fn routes(&self) -> Vec<(ActorId, ActorId)> {
        self.shared.channels.borrow().routes()
    }

    /// Route `message` through the channel registered for its pair
    ///
    /// # Errors
    /// `NoSuchChannel` if the pair has no channel. Nothing is scheduled in
    /// that case. A dropped message is `Ok(Delivery::Dropped)`, not an error.
    pub fn send(&self, message: Message) -> SimResult<Delivery> {
        let (sender, receiver) = message.route();
        // Clone the handle out so the channel can schedule freely
        let channel = self
            .channel(sender, receiver)
            .ok_or(SimError::NoSuchChannel { sender, receiver })?;
        Ok(channel.deliver(message, self))
    }

    // ========================================================================
    // Randomness and tracing
    // ========================================================================

    /// One uniform draw in `[0, 1)` from the simulation RNG
    pub fn draw_uniform(&self) -> f64 {
        self.shared.rng.borrow_mut().uniform()
    }

    /// One Bernoulli draw from the simulation RNG
    pub fn draw_chance(&self, p: f64) -> bool {
        self.shared.rng.borrow_mut().chance(p)
    }

    /// Emit `message` on the trace sink, stamped with the current time
    pub fn trace(&self, message: impl AsRef<str>) {
        if !self.shared.trace_enabled.get() {
            return;
        }
        let sink = self.shared.sink.borrow().clone();
        sink.record(self.now(), message.as_ref());
    }

    pub fn trace_enabled(&self) -> bool {
        self.shared.trace_enabled.get()
    }

    pub fn set_trace_enabled(&self, enabled: bool) {
        self.shared.trace_enabled.set(enabled);
    }

    pub fn set_trace_sink(&self, sink: Rc<dyn TraceSink>) {
        *self.shared.sink.borrow_mut() = sink;
    }

    // ========================================================================
    // Run loop
    // ========================================================================

    /// Execute jobs until the queue is empty
    ///
    /// # Errors
    /// The first error returned by a task (for example sending over an
    /// unregistered channel) stops the loop and is returned. Remaining jobs
    /// stay queued until [`reset`](Self::reset).
    pub fn run(&self) -> SimResult<RunSummary> {
        let mut summary = RunSummary::default();
        loop {
            match self.execute_next() {
                Ok(Some(finished)) => {
                    summary.jobs_executed += 1;
                    if finished {
                        summary.tasks_completed += 1;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(time = self.now(), error = %e, "simulation aborted");
                    return Err(e);
                }
            }
        }
        summary.final_time = self.now();
        tracing::debug!(
            jobs = summary.jobs_executed,
            tasks = summary.tasks_completed,
            time = summary.final_time,
            "run finished"
        );
        Ok(summary)
    }

    /// Execute exactly one job; `Ok(false)` when the queue was empty
    pub fn step(&self) -> SimResult<bool> {
        Ok(self.execute_next()?.is_some())
    }

    /// Back to time zero with an empty queue
    ///
    /// Suspended tasks are dropped. Channels, the RNG stream, the trace
    /// settings and any actor holding this handle are kept.
    pub fn reset(&self) {
        self.shared.queue.borrow_mut().clear();
        self.shared.tasks.borrow_mut().clear();
        self.shared.clock.borrow_mut().reset();
        self.shared.next_seq.set(0);
    }

    /// Pop and execute the next job
    ///
    /// Returns `None` on an empty queue, otherwise whether the job's task
    /// ran to completion.
    fn execute_next(&self) -> SimResult<Option<bool>> {
        let next = self.shared.queue.borrow_mut().pop();
        let Some(job) = next else {
            return Ok(None);
        };

        self.shared.clock.borrow_mut().advance_to(job.time);
        tracing::trace!(time = self.now(), seq = job.seq, "executing job");

        let finished = match job.action {
            JobAction::Start(future) => {
                let id = self.spawn_task(future);
                self.poll_task(id)?
            }
            JobAction::Resume(id) => self.poll_task(id)?,
        };
        Ok(Some(finished))
    }

    fn spawn_task(&self, future: TaskFuture) -> TaskId {
        let id = TaskId::new(self.shared.next_task.get());
        self.shared.next_task.set(self.shared.next_task.get() + 1);
        self.shared.tasks.borrow_mut().insert(id, future);
        id
    }

    /// Poll task `id` once; `Ok(true)` if it completed
    fn poll_task(&self, id: TaskId) -> SimResult<bool> {
        // Take the task out so it can freely use this handle while polled
        let task = self.shared.tasks.borrow_mut().remove(&id);
        let Some(mut task) = task else {
            tracing::trace!(task = %id, "resume for a task that no longer exists");
            return Ok(false);
        };

        let previous = self.shared.current_task.replace(Some(id));
        let mut cx = Context::from_waker(futures::task::noop_waker_ref());
        let poll = task.as_mut().poll(&mut cx);
        self.shared.current_task.set(previous);

        match poll {
            Poll::Ready(result) => {
                result?;
                Ok(true)
            }
            Poll::Pending => {
                self.shared.tasks.borrow_mut().insert(id, task);
                Ok(false)
            }
        }
    }
}

impl Default for System {
    fn default() -> Self {
        let config = SimulationConfig::default();
        Self::bare(config.rng_seed, config.trace, Rc::new(TracingSink))
    }
}

impl fmt::Debug for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("System")
            .field("now", &self.now())
            .field("pending_jobs", &self.pending_jobs())
            .field("suspended_tasks", &self.suspended_tasks())
            .field("routes", &self.routes())
            .finish_non_exhaustive()
    }
}

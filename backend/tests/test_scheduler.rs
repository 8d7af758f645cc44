//! Tests for the scheduler run loop
//!
//! Ordering, time advancement, reset and error propagation.

use futures::FutureExt;
use netsim_core::{
    Actor, ActorCore, ActorId, HandlerFuture, LossyChannel, Message, MessageId, SimError,
    SimTime, SimulationConfig, System,
};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use tracing_test::traced_test;

type Log = Rc<RefCell<Vec<(SimTime, &'static str)>>>;

fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Schedule a call at `time` that records `(now, label)`
fn record_at(system: &System, time: SimTime, label: &'static str, log: &Log) {
    let (sys, log) = (system.clone(), log.clone());
    system.schedule_call(time, move || {
        log.borrow_mut().push((sys.now(), label));
        Ok(())
    });
}

/// Actor that records what it receives
struct Probe {
    core: ActorCore,
    received: RefCell<Vec<(SimTime, MessageId)>>,
}

impl Probe {
    fn new(id: u32, system: &System) -> Rc<Self> {
        Rc::new(Self {
            core: ActorCore::new(ActorId::new(id), system),
            received: RefCell::new(Vec::new()),
        })
    }
}

impl Actor for Probe {
    fn core(&self) -> &ActorCore {
        &self.core
    }

    fn on_message(self: Rc<Self>, message: Message) -> HandlerFuture {
        async move {
            let now = self.core.system().now();
            self.received.borrow_mut().push((now, message.id()));
            Ok(())
        }
        .boxed_local()
    }
}

#[test]
fn test_jobs_run_in_time_order() {
    let system = System::default();
    let log = new_log();

    record_at(&system, 30, "c", &log);
    record_at(&system, 10, "a", &log);
    record_at(&system, 20, "b", &log);

    let summary = system.run().unwrap();
    assert_eq!(*log.borrow(), vec![(10, "a"), (20, "b"), (30, "c")]);
    assert_eq!(summary.jobs_executed, 3);
    assert_eq!(summary.tasks_completed, 3);
    assert_eq!(summary.final_time, 30);
}

#[test]
fn test_same_time_jobs_run_in_scheduling_order() {
    let system = System::default();
    let log = new_log();

    record_at(&system, 5, "first", &log);
    record_at(&system, 5, "second", &log);
    record_at(&system, 2, "early", &log);
    record_at(&system, 5, "third", &log);

    system.run().unwrap();
    let labels: Vec<_> = log.borrow().iter().map(|(_, l)| *l).collect();
    assert_eq!(labels, vec!["early", "first", "second", "third"]);
}

#[test]
fn test_job_at_current_time_is_not_run_inline() {
    let system = System::default();
    let log = new_log();

    let (sys, outer_log) = (system.clone(), log.clone());
    system.schedule_call(4, move || {
        record_at(&sys, sys.now(), "inner", &outer_log);
        outer_log.borrow_mut().push((sys.now(), "outer done"));
        Ok(())
    });

    system.run().unwrap();
    assert_eq!(*log.borrow(), vec![(4, "outer done"), (4, "inner")]);
}

#[test]
fn test_schedule_after_is_relative_to_now() {
    let system = System::default();
    let log = new_log();

    let (sys, log_in) = (system.clone(), log.clone());
    system.schedule_call(10, move || {
        let (inner_sys, inner_log) = (sys.clone(), log_in.clone());
        sys.schedule_after(5, async move {
            inner_log.borrow_mut().push((inner_sys.now(), "later"));
            Ok(())
        });
        Ok(())
    });

    system.run().unwrap();
    assert_eq!(*log.borrow(), vec![(15, "later")]);
}

#[test]
#[traced_test]
fn test_past_job_runs_at_current_time() {
    let system = System::default();
    let log = new_log();

    let (sys, log_in) = (system.clone(), log.clone());
    system.schedule_call(10, move || {
        record_at(&sys, 3, "past", &log_in);
        Ok(())
    });

    system.run().unwrap();
    assert_eq!(*log.borrow(), vec![(10, "past")]);
    assert_eq!(system.now(), 10);
    assert!(logs_contain("job scheduled in the past"));
}

#[test]
fn test_step_executes_one_job() {
    let system = System::default();
    let log = new_log();
    record_at(&system, 1, "a", &log);
    record_at(&system, 2, "b", &log);

    assert!(system.step().unwrap());
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(system.now(), 1);
    assert_eq!(system.pending_jobs(), 1);

    assert!(system.step().unwrap());
    assert!(!system.step().unwrap());
    assert!(system.is_idle());
}

#[test]
fn test_reset_clears_queue_and_time() {
    let system = System::default();
    let log = new_log();
    record_at(&system, 8, "a", &log);
    system.run().unwrap();
    record_at(&system, 12, "b", &log);

    system.reset();
    assert_eq!(system.now(), 0);
    assert_eq!(system.pending_jobs(), 0);
    assert_eq!(system.suspended_tasks(), 0);

    system.reset();
    assert_eq!(system.now(), 0);

    // A fresh run after reset starts from zero
    record_at(&system, 2, "c", &log);
    system.run().unwrap();
    assert_eq!(*log.borrow(), vec![(8, "a"), (2, "c")]);
}

#[test]
fn test_reset_then_empty_run_stays_at_zero() {
    let system = System::default();
    system.reset();
    system.reset();

    let summary = system.run().unwrap();
    assert_eq!(summary.jobs_executed, 0);
    assert_eq!(summary.final_time, 0);
    assert_eq!(system.now(), 0);
}

#[test]
fn test_reset_keeps_channels() {
    let system = System::default();
    system
        .register_channel(ActorId::new(1), ActorId::new(2), Rc::new(LossyChannel::reliable(1)))
        .unwrap();
    system.reset();
    assert_eq!(system.routes(), vec![(ActorId::new(1), ActorId::new(2))]);
}

#[test]
fn test_send_delivers_through_registered_channel() {
    let system = System::default();
    let a = Probe::new(1, &system);
    let b = Probe::new(2, &system);
    system
        .register_channel(a.id(), b.id(), Rc::new(LossyChannel::reliable(3)))
        .unwrap();

    let (sys, a2, b2) = (system.clone(), a.clone(), b.clone());
    system.schedule_call(7, move || {
        sys.send(Message::request(a2, b2, MessageId::new(1)))
            .map(|_| ())
    });

    system.run().unwrap();
    assert_eq!(*b.received.borrow(), vec![(10, MessageId::new(1))]);
    assert!(a.received.borrow().is_empty());
}

#[test]
fn test_send_without_channel_schedules_nothing() {
    let system = System::default();
    let a = Probe::new(1, &system);
    let b = Probe::new(2, &system);

    let err = system
        .send(Message::request(a.clone(), b.clone(), MessageId::new(9)))
        .unwrap_err();
    assert!(err.is_missing_channel());
    assert_eq!(err.to_string(), "no channel registered for A1 -> A2");
    assert_eq!(system.pending_jobs(), 0);
}

#[test]
#[traced_test]
fn test_missing_channel_aborts_run() {
    let system = System::default();
    let a = Probe::new(1, &system);
    let b = Probe::new(2, &system);
    let log = new_log();

    let sys = system.clone();
    system.schedule_call(1, move || {
        sys.send(Message::request(a, b, MessageId::new(1)))
            .map(|_| ())
    });
    record_at(&system, 2, "after", &log);

    let err = system.run().unwrap_err();
    assert!(matches!(err, SimError::NoSuchChannel { .. }));
    assert!(log.borrow().is_empty());
    assert_eq!(system.pending_jobs(), 1);
    assert_eq!(system.now(), 1);
    assert!(logs_contain("simulation aborted"));
    assert!(logs_contain("no channel registered for A1 -> A2"));

    system.reset();
    assert!(system.is_idle());
}

#[test]
fn test_trace_stamped_with_current_time() {
    let sink = netsim_core::RecordingSink::new();
    let config = SimulationConfig {
        trace: true,
        ..Default::default()
    };
    let system = System::with_trace_sink(config, Rc::new(sink.clone())).unwrap();

    let sys = system.clone();
    system.schedule_call(6, move || {
        sys.trace("hello at six");
        Ok(())
    });
    system.run().unwrap();

    system.set_trace_enabled(false);
    system.trace("not recorded");

    let log = sink.log();
    assert_eq!(log.len(), 1);
    assert_eq!(log.entries()[0].time, 6);
    assert_eq!(log.entries()[0].message, "hello at six");
}

proptest! {
    #[test]
    fn prop_observed_time_never_decreases(times in prop::collection::vec(0u64..500, 1..100)) {
        let system = System::default();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for (i, t) in times.iter().copied().enumerate() {
            let (sys, seen) = (system.clone(), seen.clone());
            system.schedule_call(t, move || {
                seen.borrow_mut().push((sys.now(), t, i));
                Ok(())
            });
        }
        system.run().unwrap();

        let seen = seen.borrow();
        prop_assert_eq!(seen.len(), times.len());
        for pair in seen.windows(2) {
            let ((now_a, _, i_a), (now_b, _, i_b)) = (pair[0], pair[1]);
            prop_assert!(now_a <= now_b);
            if now_a == now_b {
                prop_assert!(i_a < i_b, "ties must keep scheduling order");
            }
        }
        for (now, t, _) in seen.iter() {
            prop_assert_eq!(now, t);
        }
    }
}

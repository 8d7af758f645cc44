//! Tests for suspend_for
//!
//! A suspended action must resume at exactly `t + d` with its locals and
//! call stack intact, and other jobs must run in between.

use netsim_core::{RecordingSink, SimError, SimTime, SimulationConfig, System};
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<(SimTime, String)>>>;

fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

#[test]
fn test_resumes_at_start_plus_duration() {
    let system = System::default();
    let log = new_log();

    let (sys, log_in) = (system.clone(), log.clone());
    system.schedule_at(4, async move {
        let before = sys.now();
        let mut local = vec![1, 2, 3];
        sys.suspend_for(10).await;
        local.push(4);
        log_in
            .borrow_mut()
            .push((sys.now(), format!("{} {:?}", before, local)));
        Ok(())
    });

    let summary = system.run().unwrap();
    assert_eq!(*log.borrow(), vec![(14, "4 [1, 2, 3, 4]".to_string())]);
    // Start plus one resumption
    assert_eq!(summary.jobs_executed, 2);
    assert_eq!(summary.tasks_completed, 1);
}

#[test]
fn test_other_jobs_run_while_suspended() {
    let system = System::default();
    let log = new_log();

    let (sys, log_in) = (system.clone(), log.clone());
    system.schedule_at(0, async move {
        log_in.borrow_mut().push((sys.now(), "sleep".into()));
        sys.suspend_for(10).await;
        log_in.borrow_mut().push((sys.now(), "wake".into()));
        Ok(())
    });
    for t in [3, 10, 12] {
        let (sys, log_in) = (system.clone(), log.clone());
        system.schedule_call(t, move || {
            log_in.borrow_mut().push((sys.now(), "tick".into()));
            Ok(())
        });
    }

    system.run().unwrap();
    let log_ref = log.borrow();
    let got: Vec<(SimTime, &str)> = log_ref.iter().map(|(t, s)| (*t, s.as_str())).collect();
    // The tick at 10 was queued before the wake-up, so it runs first
    assert_eq!(
        got,
        vec![(0, "sleep"), (3, "tick"), (10, "tick"), (10, "wake"), (12, "tick")]
    );
}

#[test]
fn test_suspension_inside_nested_calls() {
    async fn wait_twice(system: &System, log: &Log, depth: u32) -> u32 {
        system.suspend_for(2).await;
        log.borrow_mut().push((system.now(), format!("depth {}", depth)));
        system.suspend_for(3).await;
        depth * 10
    }

    let system = System::default();
    let log = new_log();

    let (sys, log_in) = (system.clone(), log.clone());
    system.schedule_at(1, async move {
        let a = wait_twice(&sys, &log_in, 1).await;
        let b = wait_twice(&sys, &log_in, 2).await;
        log_in.borrow_mut().push((sys.now(), format!("sum {}", a + b)));
        Ok(())
    });

    system.run().unwrap();
    assert_eq!(
        *log.borrow(),
        vec![
            (3, "depth 1".to_string()),
            (8, "depth 2".to_string()),
            (11, "sum 30".to_string()),
        ]
    );
}

#[test]
fn test_independent_suspensions_interleave() {
    let system = System::default();
    let log = new_log();

    for (name, period) in [("fast", 2), ("slow", 5)] {
        let (sys, log_in) = (system.clone(), log.clone());
        system.schedule_at(0, async move {
            for _ in 0..3 {
                sys.suspend_for(period).await;
                log_in.borrow_mut().push((sys.now(), name.to_string()));
            }
            Ok(())
        });
    }

    assert_eq!(system.pending_jobs(), 2);
    system.run().unwrap();

    let log_ref = log.borrow();
    let got: Vec<(SimTime, &str)> = log_ref.iter().map(|(t, s)| (*t, s.as_str())).collect();
    assert_eq!(
        got,
        vec![
            (2, "fast"),
            (4, "fast"),
            (5, "slow"),
            (6, "fast"),
            (10, "slow"),
            (15, "slow"),
        ]
    );
    assert_eq!(system.suspended_tasks(), 0);
}

#[test]
fn test_zero_duration_yields_to_due_jobs() {
    let system = System::default();
    let log = new_log();

    let (sys, log_in) = (system.clone(), log.clone());
    system.schedule_at(5, async move {
        sys.suspend_for(0).await;
        log_in.borrow_mut().push((sys.now(), "resumed".into()));
        Ok(())
    });
    let (sys, log_in) = (system.clone(), log.clone());
    system.schedule_call(5, move || {
        log_in.borrow_mut().push((sys.now(), "other".into()));
        Ok(())
    });

    system.run().unwrap();
    assert_eq!(
        *log.borrow(),
        vec![(5, "other".to_string()), (5, "resumed".to_string())]
    );
}

#[test]
fn test_suspended_task_counts() {
    let system = System::default();
    let sys = system.clone();
    system.schedule_at(0, async move {
        sys.suspend_for(100).await;
        Ok(())
    });

    assert!(system.step().unwrap());
    assert_eq!(system.suspended_tasks(), 1);
    assert_eq!(system.next_job_time(), Some(100));

    assert!(system.step().unwrap());
    assert_eq!(system.suspended_tasks(), 0);
    assert_eq!(system.now(), 100);
}

#[test]
fn test_reset_drops_suspended_tasks() {
    let sink = RecordingSink::new();
    let config = SimulationConfig {
        trace: true,
        ..Default::default()
    };
    let system = System::with_trace_sink(config, Rc::new(sink.clone())).unwrap();

    let sys = system.clone();
    system.schedule_at(0, async move {
        sys.suspend_for(50).await;
        sys.trace("should never run");
        Ok(())
    });
    system.step().unwrap();
    assert_eq!(system.suspended_tasks(), 1);

    system.reset();
    assert_eq!(system.suspended_tasks(), 0);
    system.run().unwrap();
    assert!(sink.log().is_empty());
}

#[test]
fn test_error_after_resume_aborts_run() {
    let system = System::default();
    let sys = system.clone();
    system.schedule_at(0, async move {
        sys.suspend_for(3).await;
        Err::<(), _>(SimError::InvalidConfig("boom".into()))
    });

    let err = system.run().unwrap_err();
    assert_eq!(err.to_string(), "invalid config: boom");
    assert_eq!(system.now(), 3);
}

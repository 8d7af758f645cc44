//! Tests for deterministic random number generation
//!
//! Same seed must give the same stream; this is what makes a whole
//! simulation replayable.

use netsim_core::SimRng;

#[test]
fn test_same_seed_same_sequence() {
    let mut a = SimRng::new(12345);
    let mut b = SimRng::new(12345);

    for _ in 0..1000 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn test_different_seeds_diverge() {
    let mut a = SimRng::new(1);
    let mut b = SimRng::new(2);

    let a_values: Vec<u64> = (0..10).map(|_| a.next_u64()).collect();
    let b_values: Vec<u64> = (0..10).map(|_| b.next_u64()).collect();
    assert_ne!(a_values, b_values);
}

#[test]
fn test_zero_seed_behaves_like_seed_one() {
    let mut zero = SimRng::new(0);
    let mut one = SimRng::new(1);
    assert_eq!(zero.next_u64(), one.next_u64());
}

#[test]
fn test_uniform_stays_in_unit_interval() {
    let mut rng = SimRng::new(987654321);
    for _ in 0..10_000 {
        let x = rng.uniform();
        assert!((0.0..1.0).contains(&x), "draw {} out of range", x);
    }
}

#[test]
fn test_uniform_mean_near_half() {
    let mut rng = SimRng::new(42);
    let n = 100_000;
    let mean: f64 = (0..n).map(|_| rng.uniform()).sum::<f64>() / n as f64;
    assert!((mean - 0.5).abs() < 0.01, "mean {} too far from 0.5", mean);
}

#[test]
fn test_chance_extremes() {
    let mut rng = SimRng::new(3);
    for _ in 0..1000 {
        assert!(!rng.chance(0.0));
        assert!(rng.chance(1.0));
    }
}

#[test]
fn test_chance_consumes_one_draw() {
    let mut a = SimRng::new(77);
    let mut b = SimRng::new(77);

    a.chance(0.3);
    b.uniform();
    assert_eq!(a.state(), b.state());
}

#[test]
fn test_state_resumes_stream() {
    let mut rng = SimRng::new(555);
    for _ in 0..17 {
        rng.next_u64();
    }

    let mut resumed = SimRng::new(rng.state());
    assert_eq!(rng.next_u64(), resumed.next_u64());
}

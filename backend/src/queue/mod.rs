//! Priority queue backing the scheduler

mod heap;

pub use heap::{Drain, PriorityQueue};

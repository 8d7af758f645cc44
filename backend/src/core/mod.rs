//! Simulated time primitives

pub mod time;

//! Per-actor event histogram used for reporting

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Occurrence count per event label
///
/// # Example
/// ```
/// use netsim_core::Statistics;
///
/// let mut stats = Statistics::new();
/// stats.tick("send");
/// stats.tick("send");
/// assert_eq!(stats.count("send"), 2);
/// assert_eq!(stats.count("acknowledged"), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    histogram: BTreeMap<String, u64>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, label: &str) {
        *self.histogram.entry(label.to_string()).or_insert(0) += 1;
    }

    /// Occurrences of `label`, zero if never ticked
    pub fn count(&self, label: &str) -> u64 {
        self.histogram.get(label).copied().unwrap_or(0)
    }

    /// Sum over all labels
    pub fn total(&self) -> u64 {
        self.histogram.values().sum()
    }

    pub fn histogram(&self) -> &BTreeMap<String, u64> {
        &self.histogram
    }
}

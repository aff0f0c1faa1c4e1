//! Exploration configuration and progress reporting.

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

/// Live counters written by the explorer while it runs.
///
/// Another thread may poll these on its own timer; updates are relaxed
/// stores and never block exploration.
pub struct ProgressCounters {
    pub states: AtomicUsize,
    pub transitions: AtomicUsize,
    pub queue_len: AtomicUsize,
    /// States dequeued and fully expanded.
    pub explored: AtomicUsize,
}

impl Default for ProgressCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressCounters {
    pub fn new() -> Self {
        Self {
            states: AtomicUsize::new(0),
            transitions: AtomicUsize::new(0),
            queue_len: AtomicUsize::new(0),
            explored: AtomicUsize::new(0),
        }
    }
}

/// Configuration shared by the program-graph and channel-system explorers.
///
/// Communication syntax is not configured here; it comes from the
/// [`fvm_eval::Semantics`] bundle so that classification and evaluation
/// always agree.
pub struct ExploreConfig {
    /// Emit a progress event every this many explored states (0 = never).
    pub progress_interval: usize,
    /// Shared progress counters, if a caller wants to watch.
    pub progress: Option<Arc<ProgressCounters>>,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            progress_interval: 100_000,
            progress: None,
        }
    }
}

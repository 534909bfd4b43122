//! Passive instrumentation hooks for a mining run.

use crate::candidate::RuleCandidate;

/// Receives progress notifications from the miner.
///
/// Every method has a no-op default. Observers see the run but cannot
/// influence it.
pub trait MiningObserver {
    /// Called after the frontier grows.
    fn on_frontier_size(&mut self, _size: usize) {}

    /// Called after the frontier grows, with the approximate tid-set bytes
    /// it now holds.
    fn on_frontier_memory(&mut self, _bytes: usize) {}

    /// Called after a rule enters the retained set.
    fn on_retained_size(&mut self, _size: usize) {}

    /// Called when the minimum support threshold rises from `old` to `new`.
    fn on_threshold_raised(&mut self, _old: u32, _new: u32) {}

    /// Called for every frontier candidate that is expanded.
    fn on_candidate_expanded(&mut self, _candidate: &RuleCandidate) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl MiningObserver for NoopObserver {}

/// Records peak working-set sizes and the threshold history.
///
/// # Example
///
/// ```rust
/// use arules_miner::{PeakUsage, RuleMiner, VerticalDatabase};
///
/// let mut db = VerticalDatabase::from_transactions(vec![
///     vec![1, 2, 3],
///     vec![1, 2],
///     vec![1, 3],
/// ]).unwrap();
///
/// let mut usage = PeakUsage::default();
/// let result = RuleMiner::new()
///     .run_with_observer(2, 0.5, &mut db, 0, &mut usage)
///     .unwrap();
///
/// assert!(usage.peak_retained >= result.len());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeakUsage {
    /// Largest frontier size seen.
    pub peak_frontier: usize,
    /// Largest retained-set size seen.
    pub peak_retained: usize,
    /// Largest frontier tid-set footprint seen, in bytes.
    pub peak_frontier_bytes: usize,
    /// Every `(old, new)` threshold change in order.
    pub threshold_history: Vec<(u32, u32)>,
    /// Number of candidates expanded.
    pub expanded: usize,
}

impl PeakUsage {
    /// Number of times the threshold was raised.
    pub fn threshold_raises(&self) -> usize {
        self.threshold_history.len()
    }

    /// Returns true if the threshold never decreased.
    pub fn threshold_is_monotone(&self) -> bool {
        self.threshold_history.iter().all(|&(old, new)| new >= old)
            && self
                .threshold_history
                .windows(2)
                .all(|w| w[1].0 >= w[0].1)
    }
}

impl MiningObserver for PeakUsage {
    fn on_frontier_size(&mut self, size: usize) {
        self.peak_frontier = self.peak_frontier.max(size);
    }

    fn on_frontier_memory(&mut self, bytes: usize) {
        self.peak_frontier_bytes = self.peak_frontier_bytes.max(bytes);
    }

    fn on_retained_size(&mut self, size: usize) {
        self.peak_retained = self.peak_retained.max(size);
    }

    fn on_threshold_raised(&mut self, old: u32, new: u32) {
        self.threshold_history.push((old, new));
    }

    fn on_candidate_expanded(&mut self, _candidate: &RuleCandidate) {
        self.expanded += 1;
    }
}

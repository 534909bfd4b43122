//! Statistics collected during a mining run.

use std::fmt;
use std::time::Duration;

/// Counters from one run of the miner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MiningStats {
    /// Single-item to single-item item pairs examined.
    pub pair_rules_considered: u64,
    /// Frontier candidates popped and expanded.
    pub candidates_expanded: u64,
    /// Candidates discarded because a retained rule subsumed them.
    pub rules_suppressed: u64,
    /// Retained rules removed because a new candidate subsumed them.
    pub rules_superseded: u64,
    /// Largest frontier size reached.
    pub peak_frontier: usize,
    /// Largest approximate tid-set footprint of the frontier, in bytes.
    pub peak_frontier_bytes: usize,
    /// Minimum support of the returned rules (1 when nothing was returned).
    pub final_min_support: u32,
    /// Wall-clock duration of the run.
    pub duration: Duration,
}

impl fmt::Display for MiningStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mining Statistics:")?;
        writeln!(f, "  Final minsup: {}", self.final_min_support)?;
        writeln!(f, "  Pair rules considered: {}", self.pair_rules_considered)?;
        writeln!(f, "  Candidates expanded: {}", self.candidates_expanded)?;
        writeln!(f, "  Suppressed (strategy 1): {}", self.rules_suppressed)?;
        writeln!(f, "  Superseded (strategy 2): {}", self.rules_superseded)?;
        writeln!(f, "  Peak frontier: {}", self.peak_frontier)?;
        writeln!(f, "  Peak frontier bytes: {}", self.peak_frontier_bytes)?;
        write!(f, "  Duration: {:?}", self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_display() {
        let stats = MiningStats {
            pair_rules_considered: 6,
            candidates_expanded: 4,
            rules_suppressed: 1,
            rules_superseded: 2,
            peak_frontier: 9,
            peak_frontier_bytes: 2048,
            final_min_support: 3,
            duration: Duration::from_millis(12),
        };

        let display = stats.to_string();
        assert!(display.contains("Final minsup: 3"));
        assert!(display.contains("Pair rules considered: 6"));
        assert!(display.contains("Suppressed (strategy 1): 1"));
        assert!(display.contains("Superseded (strategy 2): 2"));
        assert!(display.contains("Peak frontier: 9"));
        assert!(display.contains("Peak frontier bytes: 2048"));
        assert!(display.contains("12ms"));
    }

    #[test]
    fn test_stats_default() {
        let stats = MiningStats::default();
        assert_eq!(stats.candidates_expanded, 0);
        assert_eq!(stats.duration, Duration::ZERO);
    }
}

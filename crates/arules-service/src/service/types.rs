//! Types for the mining service.

use arules_miner::{MinerConfig, MinerResult};

/// One set of mining parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiningParams {
    /// Number of rules to return.
    pub k: usize,
    /// Confidence threshold.
    pub min_confidence: f64,
    /// Search slack.
    pub delta: usize,
    /// Whether level-1 rules are grown.
    pub seed_frontier_with_pairs: bool,
}

impl MiningParams {
    /// Creates parameters with frontier seeding enabled.
    pub fn new(k: usize, min_confidence: f64, delta: usize) -> Self {
        Self {
            k,
            min_confidence,
            delta,
            seed_frontier_with_pairs: true,
        }
    }

    /// Sets frontier seeding.
    pub fn with_seeding(mut self, seed: bool) -> Self {
        self.seed_frontier_with_pairs = seed;
        self
    }

    /// Validated miner configuration for these parameters.
    pub fn to_config(&self) -> MinerResult<MinerConfig> {
        MinerConfig::builder()
            .k(self.k)
            .min_confidence(self.min_confidence)
            .delta(self.delta)
            .seed_frontier_with_pairs(self.seed_frontier_with_pairs)
            .build()
    }

    /// Key identifying these parameters in the result cache.
    pub(crate) fn cache_key(&self) -> CacheKey {
        CacheKey {
            k: self.k,
            min_confidence_bits: self.min_confidence.to_bits(),
            delta: self.delta,
            seed_frontier_with_pairs: self.seed_frontier_with_pairs,
        }
    }
}

impl From<&MinerConfig> for MiningParams {
    fn from(config: &MinerConfig) -> Self {
        Self {
            k: config.k,
            min_confidence: config.min_confidence,
            delta: config.delta,
            seed_frontier_with_pairs: config.seed_frontier_with_pairs,
        }
    }
}

/// Hashable form of [`MiningParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    k: usize,
    min_confidence_bits: u64,
    delta: usize,
    seed_frontier_with_pairs: bool,
}

/// Statistics about mining service usage.
#[derive(Debug, Clone, Default)]
pub struct ServiceStats {
    /// Number of mining requests served.
    pub requests: usize,
    /// Number of requests that ran the miner.
    pub runs_executed: usize,
    /// Number of cache hits.
    pub cache_hits: usize,
    /// Number of cache misses.
    pub cache_misses: usize,
    /// Total time spent mining in milliseconds.
    pub total_mining_time_ms: f64,
    /// Total number of rules returned by executed runs.
    pub total_rules_mined: usize,
}

impl ServiceStats {
    /// Returns the cache hit rate as a percentage.
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            (self.cache_hits as f64 / total as f64) * 100.0
        }
    }

    /// Returns the average mining time in milliseconds.
    pub fn avg_mining_time_ms(&self) -> f64 {
        if self.runs_executed == 0 {
            0.0
        } else {
            self.total_mining_time_ms / self.runs_executed as f64
        }
    }
}

impl std::fmt::Display for ServiceStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mining Service Statistics:")?;
        writeln!(f, "  Requests:        {}", self.requests)?;
        writeln!(f, "  Runs:            {}", self.runs_executed)?;
        writeln!(f, "  Cache hits:      {}", self.cache_hits)?;
        writeln!(f, "  Cache misses:    {}", self.cache_misses)?;
        writeln!(f, "  Hit rate:        {:.1}%", self.cache_hit_rate())?;
        writeln!(f, "  Total time:      {:.1}ms", self.total_mining_time_ms)?;
        writeln!(f, "  Avg time:        {:.2}ms", self.avg_mining_time_ms())?;
        writeln!(f, "  Rules mined:     {}", self.total_rules_mined)?;
        Ok(())
    }
}

//! Configuration for a mining run.

use crate::error::{MinerError, MinerResult};

/// Parameters of one top-k mining run.
///
/// # Example
///
/// ```rust
/// use arules_miner::MinerConfig;
///
/// let config = MinerConfig::builder()
///     .k(50)
///     .min_confidence(0.8)
///     .delta(5)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.k_total(), 55);
/// assert!(config.seed_frontier_with_pairs);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MinerConfig {
    /// Number of rules to return.
    pub k: usize,
    /// Minimum confidence a rule needs to be retained, in `[0, 1]`.
    pub min_confidence: f64,
    /// Extra rules kept while mining, discarded at finalization.
    pub delta: usize,
    /// Register level-1 rules in the expansion frontier.
    ///
    /// When false no rule is ever grown and only single-item to
    /// single-item rules are produced.
    pub seed_frontier_with_pairs: bool,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            k: 100,
            min_confidence: 0.5,
            delta: 0,
            seed_frontier_with_pairs: true,
        }
    }
}

impl MinerConfig {
    /// Creates a new builder for MinerConfig.
    pub fn builder() -> MinerConfigBuilder {
        MinerConfigBuilder::default()
    }

    /// Creates a validated config with default frontier seeding.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn new(k: usize, min_confidence: f64, delta: usize) -> MinerResult<Self> {
        Self::builder()
            .k(k)
            .min_confidence(min_confidence)
            .delta(delta)
            .build()
    }

    /// Capacity of the retained set during the search (`k + delta`).
    #[inline]
    pub fn k_total(&self) -> usize {
        self.k.saturating_add(self.delta)
    }

    /// Checks the parameter domains.
    ///
    /// # Errors
    ///
    /// Returns [`MinerError::InvalidParameter`] if `k` is zero or
    /// `min_confidence` is NaN or outside `[0, 1]`.
    pub fn validate(&self) -> MinerResult<()> {
        if self.k == 0 {
            return Err(MinerError::invalid_parameter("k", "must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(MinerError::invalid_parameter(
                "min_confidence",
                format!("{} is outside [0, 1]", self.min_confidence),
            ));
        }
        Ok(())
    }
}

/// Builder for MinerConfig.
#[derive(Debug, Clone, Default)]
pub struct MinerConfigBuilder {
    config: MinerConfig,
}

impl MinerConfigBuilder {
    /// Sets the number of rules to return.
    pub fn k(mut self, k: usize) -> Self {
        self.config.k = k;
        self
    }

    /// Sets the minimum confidence.
    pub fn min_confidence(mut self, min_confidence: f64) -> Self {
        self.config.min_confidence = min_confidence;
        self
    }

    /// Sets the search slack.
    pub fn delta(mut self, delta: usize) -> Self {
        self.config.delta = delta;
        self
    }

    /// Enables or disables growing level-1 rules.
    pub fn seed_frontier_with_pairs(mut self, seed: bool) -> Self {
        self.config.seed_frontier_with_pairs = seed;
        self
    }

    /// Builds and validates the MinerConfig.
    ///
    /// # Errors
    ///
    /// Returns [`MinerError::InvalidParameter`] for out-of-domain values.
    pub fn build(self) -> MinerResult<MinerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = MinerConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.seed_frontier_with_pairs);
        assert_eq!(config.k_total(), 100);
    }

    #[test]
    fn test_builder() {
        let config = MinerConfig::builder()
            .k(10)
            .min_confidence(0.9)
            .delta(3)
            .seed_frontier_with_pairs(false)
            .build()
            .unwrap();

        assert_eq!(config.k, 10);
        assert_eq!(config.min_confidence, 0.9);
        assert_eq!(config.delta, 3);
        assert_eq!(config.k_total(), 13);
        assert!(!config.seed_frontier_with_pairs);
    }

    #[test]
    fn test_rejects_zero_k() {
        let err = MinerConfig::new(0, 0.5, 0).unwrap_err();
        assert!(matches!(err, MinerError::InvalidParameter { name: "k", .. }));
    }

    #[test]
    fn test_rejects_confidence_out_of_range() {
        for bad in [-0.1, 1.01, f64::NAN, f64::INFINITY] {
            let err = MinerConfig::new(5, bad, 0).unwrap_err();
            assert!(matches!(
                err,
                MinerError::InvalidParameter {
                    name: "min_confidence",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_confidence_bounds_inclusive() {
        assert!(MinerConfig::new(1, 0.0, 0).is_ok());
        assert!(MinerConfig::new(1, 1.0, 0).is_ok());
    }

    #[test]
    fn test_k_total_saturates() {
        let config = MinerConfig {
            k: usize::MAX,
            delta: 10,
            ..MinerConfig::default()
        };
        assert_eq!(config.k_total(), usize::MAX);
    }
}

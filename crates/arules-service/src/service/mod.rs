//! Cached mining service over one pristine database.
//!
//! A mining run prunes the database it is given, so the service keeps an
//! unpruned copy and mines a fresh clone per request. Results are cached
//! by parameter set, which makes repeated requests from a dashboard or a
//! parameter sweep free after the first run.
//!
//! # Example
//!
//! ```ignore
//! use arules_service::service::{MiningParams, RuleMiningService};
//!
//! let service = RuleMiningService::new(db);
//!
//! let result = service.mine(&MiningParams::new(100, 0.6, 2))?;
//! println!("{} rules, minsup {}", result.len(), result.stats.final_min_support);
//!
//! // Sweep several thresholds
//! let results = service.run_batch(&[
//!     MiningParams::new(100, 0.5, 0),
//!     MiningParams::new(100, 0.8, 0),
//! ])?;
//! ```

mod types;

pub use types::{MiningParams, ServiceStats};

use lru::LruCache;
use parking_lot::RwLock;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use arules_miner::{MiningResult, RuleMiner, VerticalDatabase};

use crate::error::ServiceResult;
use types::CacheKey;

/// Configuration for the mining service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Maximum number of cached results.
    pub cache_size: usize,
    /// Whether to cache results at all.
    pub enable_cache: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_size: 64,
            enable_cache: true,
        }
    }
}

impl ServiceConfig {
    /// Creates a config with no caching.
    pub fn no_cache() -> Self {
        Self {
            cache_size: 0,
            enable_cache: false,
        }
    }

    /// Creates a config with custom cache size.
    pub fn with_cache_size(size: usize) -> Self {
        Self {
            cache_size: size,
            enable_cache: size > 0,
        }
    }
}

/// Mines rules on demand from a shared database.
///
/// The service is `Sync`, so one instance can serve requests from several
/// threads.
pub struct RuleMiningService {
    database: VerticalDatabase,
    config: ServiceConfig,
    cache: Option<RwLock<LruCache<CacheKey, Arc<MiningResult>>>>,
    stats: RwLock<ServiceStats>,
}

impl RuleMiningService {
    /// Creates a service with default configuration.
    pub fn new(database: VerticalDatabase) -> Self {
        Self::with_config(database, ServiceConfig::default())
    }

    /// Creates a service with custom configuration.
    pub fn with_config(database: VerticalDatabase, config: ServiceConfig) -> Self {
        let cache = if config.enable_cache {
            NonZeroUsize::new(config.cache_size).map(|size| RwLock::new(LruCache::new(size)))
        } else {
            None
        };

        Self {
            database,
            config,
            cache,
            stats: RwLock::new(ServiceStats::default()),
        }
    }

    /// Mines with `params`, returning a cached result when one exists.
    pub fn mine(&self, params: &MiningParams) -> ServiceResult<Arc<MiningResult>> {
        let config = params.to_config()?;
        let key = params.cache_key();

        if let Some(ref cache) = self.cache {
            // `peek` leaves recency untouched so a read lock suffices
            if let Some(cached) = cache.read().peek(&key) {
                let mut stats = self.stats.write();
                stats.requests += 1;
                stats.cache_hits += 1;
                return Ok(Arc::clone(cached));
            }
        }

        let start = Instant::now();
        let mut db = self.database.clone();
        let result = Arc::new(RuleMiner::with_config(config).mine(&mut db)?);
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        debug!(
            k = params.k,
            min_confidence = params.min_confidence,
            delta = params.delta,
            rules = result.len(),
            elapsed_ms,
            "mining request served"
        );

        if let Some(ref cache) = self.cache {
            cache.write().put(key, Arc::clone(&result));
        }

        {
            let mut stats = self.stats.write();
            stats.requests += 1;
            stats.runs_executed += 1;
            if self.cache.is_some() {
                stats.cache_misses += 1;
            }
            stats.total_mining_time_ms += elapsed_ms;
            stats.total_rules_mined += result.len();
        }

        Ok(result)
    }

    /// Mines every parameter set, in input order.
    ///
    /// With the `parallel` feature the runs are spread over the rayon pool.
    #[cfg(feature = "parallel")]
    pub fn run_batch(&self, params: &[MiningParams]) -> ServiceResult<Vec<Arc<MiningResult>>> {
        use rayon::prelude::*;

        params.par_iter().map(|p| self.mine(p)).collect()
    }

    /// Mines every parameter set, in input order.
    ///
    /// With the `parallel` feature the runs are spread over the rayon pool.
    #[cfg(not(feature = "parallel"))]
    pub fn run_batch(&self, params: &[MiningParams]) -> ServiceResult<Vec<Arc<MiningResult>>> {
        params.iter().map(|p| self.mine(p)).collect()
    }

    /// Pre-populates the cache.
    ///
    /// Invalid parameter sets are skipped. Returns how many sets are cached
    /// afterwards.
    pub fn warm_cache(&self, params: &[MiningParams]) -> usize {
        let mut warmed = 0;
        for p in params {
            if self.mine(p).is_ok() {
                warmed += 1;
            }
        }
        warmed
    }

    /// Drops all cached results.
    pub fn clear_cache(&self) {
        if let Some(ref cache) = self.cache {
            cache.write().clear();
        }
    }

    /// Returns the number of cached results.
    pub fn cache_len(&self) -> usize {
        self.cache.as_ref().map(|c| c.read().len()).unwrap_or(0)
    }

    /// Returns a snapshot of the usage statistics.
    pub fn stats(&self) -> ServiceStats {
        self.stats.read().clone()
    }

    /// Resets the usage statistics.
    pub fn reset_stats(&self) {
        *self.stats.write() = ServiceStats::default();
    }

    /// The pristine database requests are mined from.
    pub fn database(&self) -> &VerticalDatabase {
        &self.database
    }

    /// Returns the service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

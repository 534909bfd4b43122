//! Top-k non-redundant rule mining engine.
//!
//! The search runs in three phases over one [`VerticalDatabase`]:
//!
//! 1. **Level-1 generation**: every pair of frequent items `i < j` yields
//!    the rules `i ==> j` and `j ==> i`.
//! 2. **Best-first expansion**: the frontier candidate with the highest
//!    support is grown by one item at a time. Candidates grown on the left
//!    may keep growing on both sides; candidates grown on the right only
//!    grow on the right, so each rule is derived along one path.
//! 3. **Finalization**: the retained set is cut back to `k` rules.
//!
//! The minimum support threshold starts at 1 and rises whenever the retained
//! set overflows `k + delta`. Once the best frontier candidate falls below
//! it, no remaining candidate can enter the top-k and the search stops.

use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Instant;

use arules::{itemset, Item};
use tracing::{debug, trace};

use crate::candidate::RuleCandidate;
use crate::config::MinerConfig;
use crate::database::VerticalDatabase;
use crate::error::MinerResult;
use crate::multiset::OrderedRuleMultiset;
use crate::observer::{MiningObserver, NoopObserver};
use crate::result::MiningResult;
use crate::statistics::MiningStats;

/// Extension item -> transactions where it co-occurs with the rule.
type ExtensionMap = BTreeMap<Item, crate::tidset::TidSet>;

/// Mines the top-k non-redundant association rules.
///
/// A run consumes the database in the sense that transactions lose items
/// which fell below the rising support threshold. Clone the database first
/// if it has to be mined again.
///
/// # Example
///
/// ```rust
/// use arules_miner::{RuleMiner, VerticalDatabase};
///
/// let mut db = VerticalDatabase::from_transactions(vec![
///     vec![1, 2, 3],
///     vec![1, 2],
///     vec![1, 3],
///     vec![2, 3],
/// ]).unwrap();
///
/// let result = RuleMiner::new().run(2, 0.5, &mut db, 0).unwrap();
/// assert_eq!(result.len(), 2);
/// for rule in &result {
///     assert_eq!(rule.support(), 2);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleMiner {
    config: MinerConfig,
}

impl RuleMiner {
    /// Creates a miner with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a miner with the given configuration.
    pub fn with_config(config: MinerConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration used by [`mine`](Self::mine).
    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// Mines up to `k` rules with confidence at least `min_confidence`,
    /// searching with `k + delta` retained rules.
    ///
    /// Frontier seeding follows this miner's configuration.
    ///
    /// The result holds at most `k` rules and usually exactly
    /// `min(k, qualifying non-redundant rules)`. It can fall short when a
    /// retained rule is superseded after the threshold has already cut the
    /// lower-support rules that would have replaced it. `delta` keeps that
    /// many extra rules during the search to absorb such removals; a `delta`
    /// at least as large as the number of qualifying rules makes the count
    /// exact.
    ///
    /// # Errors
    ///
    /// Returns [`MinerError::InvalidParameter`](crate::MinerError::InvalidParameter)
    /// before touching the database if `k` is zero or `min_confidence` is
    /// outside `[0, 1]`.
    pub fn run(
        &self,
        k: usize,
        min_confidence: f64,
        db: &mut VerticalDatabase,
        delta: usize,
    ) -> MinerResult<MiningResult> {
        self.run_with_observer(k, min_confidence, db, delta, &mut NoopObserver)
    }

    /// Like [`run`](Self::run), reporting progress to `observer`.
    pub fn run_with_observer(
        &self,
        k: usize,
        min_confidence: f64,
        db: &mut VerticalDatabase,
        delta: usize,
        observer: &mut dyn MiningObserver,
    ) -> MinerResult<MiningResult> {
        let config = MinerConfig {
            k,
            min_confidence,
            delta,
            seed_frontier_with_pairs: self.config.seed_frontier_with_pairs,
        };
        config.validate()?;
        MiningRun::new(&config, db, observer).execute()
    }

    /// Mines with the stored configuration.
    pub fn mine(&self, db: &mut VerticalDatabase) -> MinerResult<MiningResult> {
        self.mine_with_observer(db, &mut NoopObserver)
    }

    /// Mines with the stored configuration, reporting progress to `observer`.
    pub fn mine_with_observer(
        &self,
        db: &mut VerticalDatabase,
        observer: &mut dyn MiningObserver,
    ) -> MinerResult<MiningResult> {
        self.config.validate()?;
        MiningRun::new(&self.config, db, observer).execute()
    }
}

/// State of one run. `minsup` only ever rises.
struct MiningRun<'a> {
    config: &'a MinerConfig,
    db: &'a mut VerticalDatabase,
    observer: &'a mut dyn MiningObserver,
    minsup: u32,
    retained: OrderedRuleMultiset,
    frontier: OrderedRuleMultiset,
    /// Approximate tid-set bytes held by the frontier.
    frontier_bytes: usize,
    stats: MiningStats,
}

impl<'a> MiningRun<'a> {
    fn new(
        config: &'a MinerConfig,
        db: &'a mut VerticalDatabase,
        observer: &'a mut dyn MiningObserver,
    ) -> Self {
        Self {
            config,
            db,
            observer,
            minsup: 1,
            retained: OrderedRuleMultiset::new(),
            frontier: OrderedRuleMultiset::new(),
            frontier_bytes: 0,
            stats: MiningStats::default(),
        }
    }

    fn execute(mut self) -> MinerResult<MiningResult> {
        let start = Instant::now();
        debug!(
            k = self.config.k,
            delta = self.config.delta,
            min_confidence = self.config.min_confidence,
            max_item = self.db.max_item(),
            transactions = self.db.transaction_count(),
            database_bytes = self.db.memory_size(),
            "mining started"
        );

        self.generate_pairs()?;
        self.expand_frontier()?;
        self.finalize(start)
    }

    /// Builds every single-item to single-item rule.
    fn generate_pairs(&mut self) -> MinerResult<()> {
        let max_item = self.db.max_item();
        for item_i in 1..=max_item {
            if !self.db.is_frequent(item_i, self.minsup) {
                continue;
            }
            for item_j in (item_i..=max_item).skip(1) {
                if !self.db.is_frequent(item_j, self.minsup) {
                    continue;
                }
                let tids_i = self.db.tids(item_i);
                let tids_j = self.db.tids(item_j);
                self.stats.pair_rules_considered += 1;

                if (tids_i.intersection_len(tids_j) as u32) < self.minsup {
                    continue;
                }
                let common = tids_i.intersection(tids_j);
                let (forward, backward) = RuleCandidate::pair(item_i, tids_i, item_j, tids_j, common);
                let seed = self.config.seed_frontier_with_pairs;
                self.consider(forward, seed)?;
                self.consider(backward, seed)?;
            }
        }

        debug!(
            pairs = self.stats.pair_rules_considered,
            retained = self.retained.len(),
            frontier = self.frontier.len(),
            minsup = self.minsup,
            "level-1 rules generated"
        );
        Ok(())
    }

    /// Pops and grows frontier candidates, best support first.
    fn expand_frontier(&mut self) -> MinerResult<()> {
        while !self.frontier.is_empty() {
            let candidate = self.frontier.pop_maximum()?;
            self.frontier_bytes = self.frontier_bytes.saturating_sub(candidate.memory_size());
            if candidate.support() < self.minsup {
                debug!(
                    support = candidate.support(),
                    minsup = self.minsup,
                    remaining = self.frontier.len(),
                    "frontier cut below threshold"
                );
                return Ok(());
            }

            self.stats.candidates_expanded += 1;
            self.observer.on_candidate_expanded(&candidate);

            if candidate.expands_both_sides() {
                self.expand_both(&candidate)?;
            } else {
                self.expand_right(&candidate)?;
            }
        }

        debug!(
            expanded = self.stats.candidates_expanded,
            minsup = self.minsup,
            "frontier exhausted"
        );
        Ok(())
    }

    fn expand_both(&mut self, rule: &RuleCandidate) -> MinerResult<()> {
        let (left, right) = self.scan_extensions(rule, true);

        for (item, common_tids) in right {
            if (common_tids.len() as u32) < self.minsup {
                continue;
            }
            self.consider(rule.grow_right(item, common_tids), true)?;
        }

        for (item, common_tids) in left {
            if (common_tids.len() as u32) < self.minsup {
                continue;
            }
            let antecedent_tids = rule.antecedent_tids().intersection(self.db.tids(item));
            self.consider(rule.grow_left(item, antecedent_tids, common_tids), true)?;
        }
        Ok(())
    }

    fn expand_right(&mut self, rule: &RuleCandidate) -> MinerResult<()> {
        let (_, right) = self.scan_extensions(rule, false);

        for (item, common_tids) in right {
            if (common_tids.len() as u32) < self.minsup {
                continue;
            }
            self.consider(rule.grow_right(item, common_tids), true)?;
        }
        Ok(())
    }

    /// Scans the transactions supporting `rule` and collects, per extension
    /// item, the transactions it occurs in. Returns `(left, right)` maps;
    /// `left` stays empty unless `both_sides`.
    ///
    /// Items below the threshold are dropped from the scanned transactions
    /// for good.
    fn scan_extensions(&mut self, rule: &RuleCandidate, both_sides: bool) -> (ExtensionMap, ExtensionMap) {
        let mut left = ExtensionMap::new();
        let mut right = ExtensionMap::new();
        let (max_left, max_right) = (rule.max_left(), rule.max_right());

        for tid in rule.common_tids().iter() {
            let mut stale = false;

            // Live items are descending: once an item is below every bound,
            // so is the rest of the transaction.
            for &item in self.db.live_items(tid) {
                if !self.db.is_frequent(item, self.minsup) {
                    stale = true;
                    continue;
                }
                let below_bounds = if both_sides {
                    item < max_left && item < max_right
                } else {
                    item < max_right
                };
                if below_bounds {
                    break;
                }

                if both_sides
                    && item > max_left
                    && !itemset::contains_bounded(rule.consequent(), item, max_right)
                {
                    left.entry(item).or_default().insert(tid);
                }
                if item > max_right && !itemset::contains_bounded(rule.antecedent(), item, max_left) {
                    right.entry(item).or_default().insert(tid);
                }
            }

            if stale {
                let pruned = self.db.prune_transaction(tid, self.minsup);
                trace!(tid, pruned, minsup = self.minsup, "pruned stale items");
            }
        }

        (left, right)
    }

    /// Saves `candidate` if confident enough and optionally queues it for
    /// expansion.
    fn consider(&mut self, candidate: RuleCandidate, register: bool) -> MinerResult<()> {
        let candidate = Rc::new(candidate);
        if candidate.confidence() >= self.config.min_confidence {
            self.save(Rc::clone(&candidate))?;
        }
        if register {
            self.frontier_bytes += candidate.memory_size();
            self.frontier.add(candidate);
            let size = self.frontier.len();
            self.stats.peak_frontier = self.stats.peak_frontier.max(size);
            self.stats.peak_frontier_bytes = self.stats.peak_frontier_bytes.max(self.frontier_bytes);
            self.observer.on_frontier_size(size);
            self.observer.on_frontier_memory(self.frontier_bytes);
        }
        Ok(())
    }

    /// Inserts a qualifying rule into the retained set, applying both
    /// redundancy strategies and the `k + delta` bound.
    fn save(&mut self, candidate: Rc<RuleCandidate>) -> MinerResult<()> {
        let support = candidate.support();
        let mut superseded = Vec::new();

        for retained in self.retained.with_support(support) {
            if retained.confidence() != candidate.confidence() {
                continue;
            }
            if retained.subsumes(&candidate) {
                self.stats.rules_suppressed += 1;
                trace!(rule = %candidate, by = %retained, "suppressed");
                return Ok(());
            }
            if candidate.subsumes(retained) {
                superseded.push(Rc::clone(retained));
            }
        }

        for rule in superseded {
            let removed = self.retained.remove(&rule);
            debug_assert!(removed, "superseded rule vanished from retained set");
            self.stats.rules_superseded += 1;
            trace!(rule = %rule, by = %candidate, "superseded");
        }

        self.retained.add(candidate);
        self.observer.on_retained_size(self.retained.len());

        let k_total = self.config.k_total();
        if self.retained.len() > k_total {
            if support > self.minsup {
                while self.retained.len() > k_total {
                    if self.retained.minimum()?.support() > self.minsup {
                        break;
                    }
                    self.retained.pop_minimum()?;
                }
            }
            let lowest = self.retained.minimum()?.support();
            self.raise_threshold(lowest);
        }
        Ok(())
    }

    fn raise_threshold(&mut self, support: u32) {
        if support <= self.minsup {
            return;
        }
        debug!(old = self.minsup, new = support, retained = self.retained.len(), "minsup raised");
        self.observer.on_threshold_raised(self.minsup, support);
        self.minsup = support;
    }

    /// Cuts the retained set back to `k` and collects the result.
    fn finalize(mut self, start: Instant) -> MinerResult<MiningResult> {
        while self.retained.len() > self.config.k {
            self.retained.pop_minimum()?;
        }
        if let Some(lowest) = self.retained.min_support() {
            self.raise_threshold(lowest);
        }

        self.stats.final_min_support = self.minsup;
        self.stats.duration = start.elapsed();

        // Release the frontier's shares so retained rules unwrap without cloning.
        self.frontier = OrderedRuleMultiset::new();
        let rules: Vec<RuleCandidate> = self
            .retained
            .into_descending()
            .into_iter()
            .map(|rule| Rc::try_unwrap(rule).unwrap_or_else(|shared| (*shared).clone()))
            .collect();

        debug!(
            rules = rules.len(),
            minsup = self.stats.final_min_support,
            suppressed = self.stats.rules_suppressed,
            superseded = self.stats.rules_superseded,
            peak_frontier_bytes = self.stats.peak_frontier_bytes,
            duration_ms = self.stats.duration.as_millis() as u64,
            "mining finished"
        );
        Ok(MiningResult::new(rules, self.stats))
    }
}

//! Ordered multiset of rule candidates keyed by support.
//!
//! The miner keeps two of these: the retained top-k rules and the frontier
//! of candidates awaiting expansion. Both need the lowest and highest
//! support entries and the run of entries sharing one support value.
//!
//! # Ordering
//!
//! Entries are ranked in ascending order by:
//!
//! 1. support
//! 2. confidence
//! 3. total item count, larger first
//! 4. antecedent, lexically larger first
//! 5. consequent, lexically larger first
//!
//! so among equally supported and equally confident rules the shortest,
//! lexically smallest rule is the maximum and the last to be evicted.
//! Structurally equal candidates share a rank and are kept side by side.

use std::cmp::{Ordering, Reverse};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::rc::Rc;

use arules::Item;

use crate::candidate::RuleCandidate;
use crate::error::{MinerError, MinerResult};

/// Confidence with a total order.
#[derive(Debug, Clone, Copy)]
struct Confidence(f64);

impl PartialEq for Confidence {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Confidence {}

impl PartialOrd for Confidence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Confidence {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Position of an entry, or of a lookup target, in the support order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct RankKey {
    support: u32,
    tail: RankTail,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum RankTail {
    /// Sorts before every rule of the same support.
    Floor,
    Rule {
        confidence: Confidence,
        item_count: Reverse<usize>,
        antecedent: Reverse<Vec<Item>>,
        consequent: Reverse<Vec<Item>>,
    },
}

impl RankKey {
    fn of(rule: &RuleCandidate) -> Self {
        Self {
            support: rule.support(),
            tail: RankTail::Rule {
                confidence: Confidence(rule.confidence()),
                item_count: Reverse(rule.item_count()),
                antecedent: Reverse(rule.antecedent().to_vec()),
                consequent: Reverse(rule.consequent().to_vec()),
            },
        }
    }

    fn floor(support: u32) -> Self {
        Self {
            support,
            tail: RankTail::Floor,
        }
    }

    /// Exclusive upper bound for entries with support `<= support`.
    fn above(support: u32) -> Bound<Self> {
        match support.checked_add(1) {
            Some(next) => Bound::Excluded(Self::floor(next)),
            None => Bound::Unbounded,
        }
    }
}

/// A balanced, duplicate-tolerant ordered multiset of shared rule candidates.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use arules_miner::{OrderedRuleMultiset, RuleCandidate, TidSet};
///
/// let tids_1: TidSet = [0, 1, 2].into_iter().collect();
/// let tids_2: TidSet = [0, 1].into_iter().collect();
/// let (forward, backward) =
///     RuleCandidate::pair(1, &tids_1, 2, &tids_2, tids_1.intersection(&tids_2));
///
/// let mut set = OrderedRuleMultiset::new();
/// set.add(Rc::new(forward));
/// set.add(Rc::new(backward));
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.with_support(2).count(), 2);
/// // 2 ==> 1 has confidence 1.0 and ranks above 1 ==> 2
/// assert_eq!(set.pop_maximum().unwrap().antecedent(), &[2]);
/// ```
#[derive(Debug, Default)]
pub struct OrderedRuleMultiset {
    entries: BTreeMap<RankKey, Vec<Rc<RuleCandidate>>>,
    len: usize,
}

impl OrderedRuleMultiset {
    /// Creates an empty multiset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, counting duplicates.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if there are no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts a candidate. O(log n).
    pub fn add(&mut self, rule: Rc<RuleCandidate>) {
        self.entries.entry(RankKey::of(&rule)).or_default().push(rule);
        self.len += 1;
    }

    /// Removes one entry structurally equal to `rule`.
    ///
    /// Returns false if no such entry exists.
    pub fn remove(&mut self, rule: &RuleCandidate) -> bool {
        let key = RankKey::of(rule);
        let Some(bucket) = self.entries.get_mut(&key) else {
            return false;
        };
        let Some(idx) = bucket.iter().position(|entry| entry.as_ref() == rule) else {
            return false;
        };
        bucket.swap_remove(idx);
        if bucket.is_empty() {
            self.entries.remove(&key);
        }
        self.len -= 1;
        true
    }

    /// Returns the lowest-ranked entry.
    ///
    /// # Errors
    ///
    /// Returns [`MinerError::EmptyCollection`] if the multiset is empty.
    pub fn minimum(&self) -> MinerResult<&Rc<RuleCandidate>> {
        self.entries
            .values()
            .next()
            .and_then(|bucket| bucket.last())
            .ok_or(MinerError::EmptyCollection("minimum"))
    }

    /// Returns the highest-ranked entry.
    ///
    /// # Errors
    ///
    /// Returns [`MinerError::EmptyCollection`] if the multiset is empty.
    pub fn maximum(&self) -> MinerResult<&Rc<RuleCandidate>> {
        self.entries
            .values()
            .next_back()
            .and_then(|bucket| bucket.last())
            .ok_or(MinerError::EmptyCollection("maximum"))
    }

    /// Removes and returns the lowest-ranked entry.
    ///
    /// # Errors
    ///
    /// Returns [`MinerError::EmptyCollection`] if the multiset is empty.
    pub fn pop_minimum(&mut self) -> MinerResult<Rc<RuleCandidate>> {
        let mut entry = self
            .entries
            .first_entry()
            .ok_or(MinerError::EmptyCollection("pop_minimum"))?;
        let rule = entry
            .get_mut()
            .pop()
            .ok_or(MinerError::EmptyCollection("pop_minimum"))?;
        if entry.get().is_empty() {
            entry.remove();
        }
        self.len -= 1;
        Ok(rule)
    }

    /// Removes and returns the highest-ranked entry.
    ///
    /// # Errors
    ///
    /// Returns [`MinerError::EmptyCollection`] if the multiset is empty.
    pub fn pop_maximum(&mut self) -> MinerResult<Rc<RuleCandidate>> {
        let mut entry = self
            .entries
            .last_entry()
            .ok_or(MinerError::EmptyCollection("pop_maximum"))?;
        let rule = entry
            .get_mut()
            .pop()
            .ok_or(MinerError::EmptyCollection("pop_maximum"))?;
        if entry.get().is_empty() {
            entry.remove();
        }
        self.len -= 1;
        Ok(rule)
    }

    /// Returns the highest-ranked entry whose support is strictly below
    /// `target_support`.
    ///
    /// Looking up `s + 1` lands on the top of the `support == s` run when
    /// one exists.
    pub fn predecessor(&self, target_support: u32) -> Option<&Rc<RuleCandidate>> {
        self.entries
            .range(..RankKey::floor(target_support))
            .next_back()
            .and_then(|(_, bucket)| bucket.last())
    }

    /// Returns the highest-ranked entry strictly below `rule`'s rank.
    ///
    /// Entries sharing `rule`'s exact rank are skipped; use
    /// [`with_support`](Self::with_support) to visit a whole run.
    pub fn predecessor_of(&self, rule: &RuleCandidate) -> Option<&Rc<RuleCandidate>> {
        self.entries
            .range(..RankKey::of(rule))
            .next_back()
            .and_then(|(_, bucket)| bucket.last())
    }

    /// Visits every entry with exactly `support`, walking down from the
    /// highest rank of the run.
    pub fn with_support(&self, support: u32) -> impl Iterator<Item = &Rc<RuleCandidate>> + '_ {
        self.entries
            .range((Bound::Included(RankKey::floor(support)), RankKey::above(support)))
            .rev()
            .flat_map(|(_, bucket)| bucket.iter().rev())
    }

    /// Lowest support present, if any.
    pub fn min_support(&self) -> Option<u32> {
        self.entries.keys().next().map(|key| key.support)
    }

    /// Iterates over all entries from the lowest rank to the highest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Rc<RuleCandidate>> + '_ {
        self.entries.values().flat_map(|bucket| bucket.iter())
    }

    /// Consumes the multiset, returning entries from the highest rank down.
    pub fn into_descending(self) -> Vec<Rc<RuleCandidate>> {
        self.entries
            .into_values()
            .rev()
            .flat_map(|bucket| bucket.into_iter().rev())
            .collect()
    }
}

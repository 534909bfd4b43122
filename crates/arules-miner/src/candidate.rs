//! Rule candidates: immutable snapshots of one directional rule hypothesis.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use arules::{itemset, AssociationRule, Item};

use crate::tidset::TidSet;

/// A rule `antecedent ==> consequent` together with the tid sets it was
/// derived from and the bookkeeping needed to grow it further.
///
/// Candidates never change after construction; growing one produces a new
/// candidate. Equality and hashing are structural on the two itemsets.
#[derive(Debug, Clone)]
pub struct RuleCandidate {
    antecedent: Vec<Item>,
    consequent: Vec<Item>,
    support: u32,
    confidence: f64,
    /// Transactions containing the antecedent. Shared between a candidate
    /// and every rule grown from it on the right.
    antecedent_tids: Arc<TidSet>,
    /// Transactions containing antecedent and consequent.
    common_tids: TidSet,
    max_left: Item,
    max_right: Item,
    expand_both_sides: bool,
}

impl RuleCandidate {
    /// Builds the two level-1 rules `i ==> j` and `j ==> i`.
    ///
    /// `common` is `tids_i ∩ tids_j`; both rules share it as their common
    /// tid set and are eligible for expansion on both sides.
    pub fn pair(
        item_i: Item,
        tids_i: &TidSet,
        item_j: Item,
        tids_j: &TidSet,
        common: TidSet,
    ) -> (Self, Self) {
        let support = common.len() as u32;
        let forward = Self {
            antecedent: vec![item_i],
            consequent: vec![item_j],
            support,
            confidence: ratio(support, tids_i.len()),
            antecedent_tids: Arc::new(tids_i.clone()),
            common_tids: common.clone(),
            max_left: item_i,
            max_right: item_j,
            expand_both_sides: true,
        };
        let backward = Self {
            antecedent: vec![item_j],
            consequent: vec![item_i],
            support,
            confidence: ratio(support, tids_j.len()),
            antecedent_tids: Arc::new(tids_j.clone()),
            common_tids: common,
            max_left: item_j,
            max_right: item_i,
            expand_both_sides: true,
        };
        (forward, backward)
    }

    /// Grows the consequent by `item`.
    ///
    /// `common_tids` are the transactions of the grown rule. The antecedent
    /// is unchanged, so its tid set is shared. The result only expands
    /// further on the right.
    pub fn grow_right(&self, item: Item, common_tids: TidSet) -> Self {
        let support = common_tids.len() as u32;
        Self {
            antecedent: self.antecedent.clone(),
            consequent: itemset::with_item(&self.consequent, item),
            support,
            confidence: ratio(support, self.antecedent_tids.len()),
            antecedent_tids: Arc::clone(&self.antecedent_tids),
            common_tids,
            max_left: self.max_left,
            max_right: self.max_right.max(item),
            expand_both_sides: false,
        }
    }

    /// Grows the antecedent by `item`.
    ///
    /// `antecedent_tids` must be the recomputed antecedent occurrence
    /// (`self.antecedent_tids ∩ tids[item]`); confidence is taken against it.
    pub fn grow_left(&self, item: Item, antecedent_tids: TidSet, common_tids: TidSet) -> Self {
        let support = common_tids.len() as u32;
        Self {
            antecedent: itemset::with_item(&self.antecedent, item),
            consequent: self.consequent.clone(),
            support,
            confidence: ratio(support, antecedent_tids.len()),
            antecedent_tids: Arc::new(antecedent_tids),
            common_tids,
            max_left: self.max_left.max(item),
            max_right: self.max_right,
            expand_both_sides: true,
        }
    }

    /// Returns true if `self` makes `other` redundant.
    ///
    /// `self` subsumes `other` when its antecedent is no larger and contained
    /// in `other`'s, and its consequent is no smaller and contains `other`'s.
    /// Confidence and support are not compared here.
    pub fn subsumes(&self, other: &RuleCandidate) -> bool {
        self.antecedent.len() <= other.antecedent.len()
            && self.consequent.len() >= other.consequent.len()
            && itemset::contains_all(&other.antecedent, &self.antecedent)
            && itemset::contains_all(&self.consequent, &other.consequent)
    }

    /// Left-hand side, sorted ascending.
    pub fn antecedent(&self) -> &[Item] {
        &self.antecedent
    }

    /// Right-hand side, sorted ascending.
    pub fn consequent(&self) -> &[Item] {
        &self.consequent
    }

    /// Absolute support (`common_tids().len()`).
    #[inline]
    pub fn support(&self) -> u32 {
        self.support
    }

    /// `support / antecedent_tids().len()`.
    #[inline]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Transactions containing the antecedent.
    pub fn antecedent_tids(&self) -> &TidSet {
        &self.antecedent_tids
    }

    /// Transactions containing the whole rule.
    pub fn common_tids(&self) -> &TidSet {
        &self.common_tids
    }

    /// Largest antecedent item.
    #[inline]
    pub fn max_left(&self) -> Item {
        self.max_left
    }

    /// Largest consequent item.
    #[inline]
    pub fn max_right(&self) -> Item {
        self.max_right
    }

    /// Whether this candidate grows on both sides or only on the right.
    #[inline]
    pub fn expands_both_sides(&self) -> bool {
        self.expand_both_sides
    }

    /// Total number of items on both sides.
    pub fn item_count(&self) -> usize {
        self.antecedent.len() + self.consequent.len()
    }

    /// Approximate bytes held by the two tid sets.
    ///
    /// A shared antecedent set is counted in full by every sharer.
    pub fn memory_size(&self) -> usize {
        self.antecedent_tids.memory_size() + self.common_tids.memory_size()
    }

    /// Returns the plain, bitset-free rule.
    pub fn to_rule(&self) -> AssociationRule {
        AssociationRule::new(
            self.antecedent.clone(),
            self.consequent.clone(),
            self.support,
            self.confidence,
        )
    }
}

fn ratio(support: u32, antecedent_support: usize) -> f64 {
    debug_assert!(antecedent_support > 0, "antecedent never occurs");
    if antecedent_support == 0 {
        return 0.0;
    }
    f64::from(support) / antecedent_support as f64
}

impl PartialEq for RuleCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.antecedent == other.antecedent && self.consequent == other.consequent
    }
}

impl Eq for RuleCandidate {}

impl Hash for RuleCandidate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.antecedent.hash(state);
        self.consequent.hash(state);
    }
}

impl fmt::Display for RuleCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ==> {}",
            itemset::render(&self.antecedent),
            itemset::render(&self.consequent)
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a candidate from explicit tid lists, for tests elsewhere too.
    pub(crate) fn candidate(
        antecedent: &[Item],
        consequent: &[Item],
        antecedent_tids: &[u32],
        common_tids: &[u32],
    ) -> RuleCandidate {
        let antecedent_tids: TidSet = antecedent_tids.iter().copied().collect();
        let common_tids: TidSet = common_tids.iter().copied().collect();
        let support = common_tids.len() as u32;
        RuleCandidate {
            antecedent: antecedent.to_vec(),
            consequent: consequent.to_vec(),
            support,
            confidence: ratio(support, antecedent_tids.len()),
            antecedent_tids: Arc::new(antecedent_tids),
            common_tids,
            max_left: antecedent.iter().copied().max().unwrap_or(0),
            max_right: consequent.iter().copied().max().unwrap_or(0),
            expand_both_sides: true,
        }
    }

    #[test]
    fn test_pair_confidences() {
        let tids_1: TidSet = [0, 1, 2].into_iter().collect();
        let tids_2: TidSet = [0, 1, 3, 4].into_iter().collect();
        let common = tids_1.intersection(&tids_2);

        let (forward, backward) = RuleCandidate::pair(1, &tids_1, 2, &tids_2, common);

        assert_eq!(forward.antecedent(), &[1]);
        assert_eq!(forward.consequent(), &[2]);
        assert_eq!(forward.support(), 2);
        assert!((forward.confidence() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(forward.max_left(), 1);
        assert_eq!(forward.max_right(), 2);

        assert_eq!(backward.antecedent(), &[2]);
        assert_eq!(backward.consequent(), &[1]);
        assert!((backward.confidence() - 0.5).abs() < 1e-12);
        assert_eq!(backward.max_left(), 2);
        assert_eq!(backward.max_right(), 1);

        assert!(forward.expands_both_sides());
        assert!(backward.expands_both_sides());
    }

    #[test]
    fn test_grow_right_shares_antecedent() {
        let base = candidate(&[1], &[2], &[0, 1, 2, 3], &[0, 1, 2]);
        let grown = base.grow_right(5, [0, 2].into_iter().collect());

        assert_eq!(grown.antecedent(), &[1]);
        assert_eq!(grown.consequent(), &[2, 5]);
        assert_eq!(grown.support(), 2);
        assert!((grown.confidence() - 0.5).abs() < 1e-12);
        assert_eq!(grown.max_right(), 5);
        assert_eq!(grown.max_left(), 1);
        assert!(!grown.expands_both_sides());
        assert_eq!(grown.antecedent_tids(), base.antecedent_tids());
    }

    #[test]
    fn test_grow_left_recomputes_confidence() {
        let base = candidate(&[1], &[2], &[0, 1, 2, 3], &[0, 1, 2]);
        let grown = base.grow_left(4, [0, 1, 3].into_iter().collect(), [0, 1].into_iter().collect());

        assert_eq!(grown.antecedent(), &[1, 4]);
        assert_eq!(grown.consequent(), &[2]);
        assert_eq!(grown.support(), 2);
        assert!((grown.confidence() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(grown.max_left(), 4);
        assert!(grown.expands_both_sides());
    }

    #[test]
    fn test_growth_is_anti_monotone() {
        let base = candidate(&[1], &[2], &[0, 1, 2, 3], &[0, 1, 2]);
        let extra: TidSet = [1, 2, 7].into_iter().collect();
        let grown = base.grow_right(3, base.common_tids().intersection(&extra));
        assert!(grown.support() <= base.support());
    }

    #[test]
    fn test_subsumption() {
        // {1} => {2,3} subsumes {1,4} => {2,3}
        let general = candidate(&[1], &[2, 3], &[0, 1], &[0, 1]);
        let specific = candidate(&[1, 4], &[2, 3], &[0, 1], &[0, 1]);

        assert!(general.subsumes(&specific));
        assert!(!specific.subsumes(&general));
    }

    #[test]
    fn test_subsumption_larger_consequent() {
        // {1} => {2,3} subsumes {1} => {2}
        let wide = candidate(&[1], &[2, 3], &[0, 1], &[0, 1]);
        let narrow = candidate(&[1], &[2], &[0, 1], &[0, 1]);

        assert!(wide.subsumes(&narrow));
        assert!(!narrow.subsumes(&wide));
    }

    #[test]
    fn test_subsumption_unrelated() {
        let a = candidate(&[1], &[2], &[0], &[0]);
        let b = candidate(&[3], &[2], &[0], &[0]);
        assert!(!a.subsumes(&b));
        assert!(!b.subsumes(&a));
    }

    #[test]
    fn test_structural_equality() {
        let a = candidate(&[1], &[2], &[0, 1], &[0]);
        let b = candidate(&[1], &[2], &[0, 1, 2], &[0, 1]);
        let c = candidate(&[2], &[1], &[0, 1], &[0]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_memory_size_counts_both_sets() {
        let rule = candidate(&[1], &[2], &[0, 1, 2, 3], &[0, 1]);
        assert_eq!(
            rule.memory_size(),
            rule.antecedent_tids().memory_size() + rule.common_tids().memory_size()
        );
        assert!(rule.memory_size() > 0);
    }

    #[test]
    fn test_to_rule_and_display() {
        let rule = candidate(&[1, 4], &[2], &[0, 1], &[0]);
        assert_eq!(rule.to_string(), "1 4 ==> 2");
        assert_eq!(rule.to_rule().to_string(), "1 4 ==> 2 #SUP: 1 #CONF: 0.5");
    }
}

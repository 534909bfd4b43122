//! Result of a mining run.

use std::cmp::Ordering;

use arules::AssociationRule;

use crate::candidate::RuleCandidate;
use crate::statistics::MiningStats;

/// The top-k rules of a run together with its statistics.
///
/// Rules are held from the highest rank down: support, then confidence,
/// then the shortest, lexically smallest rule first.
#[derive(Debug, Clone)]
pub struct MiningResult {
    rules: Vec<RuleCandidate>,
    /// Run statistics.
    pub stats: MiningStats,
}

impl MiningResult {
    /// Creates a result from rules already in rank order.
    pub fn new(rules: Vec<RuleCandidate>, stats: MiningStats) -> Self {
        Self { rules, stats }
    }

    /// Creates an empty result.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            stats: MiningStats::default(),
        }
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rule was found.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the rules in rank order.
    pub fn rules(&self) -> &[RuleCandidate] {
        &self.rules
    }

    /// Returns an iterator over the rules in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, RuleCandidate> {
        self.rules.iter()
    }

    /// Returns true if a rule with exactly these sides was found.
    pub fn contains(&self, antecedent: &[arules::Item], consequent: &[arules::Item]) -> bool {
        self.rules
            .iter()
            .any(|r| r.antecedent() == antecedent && r.consequent() == consequent)
    }

    /// Converts to plain rules in rank order.
    pub fn to_rules(&self) -> Vec<AssociationRule> {
        self.rules.iter().map(RuleCandidate::to_rule).collect()
    }

    /// Plain rules ordered for output: support descending, confidence
    /// descending, then antecedent and consequent ascending.
    pub fn sorted_rules(&self) -> Vec<AssociationRule> {
        let mut rules = self.to_rules();
        rules.sort_by(output_order);
        rules
    }

    /// Renders [`sorted_rules`](Self::sorted_rules) one per line.
    pub fn render(&self) -> String {
        self.sorted_rules()
            .iter()
            .map(|rule| format!("{rule}\n"))
            .collect()
    }
}

fn output_order(a: &AssociationRule, b: &AssociationRule) -> Ordering {
    b.support
        .cmp(&a.support)
        .then_with(|| b.confidence.total_cmp(&a.confidence))
        .then_with(|| a.antecedent.cmp(&b.antecedent))
        .then_with(|| a.consequent.cmp(&b.consequent))
}

impl IntoIterator for MiningResult {
    type Item = RuleCandidate;
    type IntoIter = std::vec::IntoIter<RuleCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

impl<'a> IntoIterator for &'a MiningResult {
    type Item = &'a RuleCandidate;
    type IntoIter = std::slice::Iter<'a, RuleCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

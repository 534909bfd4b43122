//! The rendered association rule value.

use std::fmt;

use crate::itemset;
use crate::Item;

/// An association rule `antecedent ==> consequent` with its measures.
///
/// This is the plain, bitset-free form of a mined rule. It is what miners
/// hand back to callers and what the rule text format encodes.
///
/// # Example
///
/// ```rust
/// use arules::AssociationRule;
///
/// let rule = AssociationRule::new(vec![1, 2], vec![3], 2, 0.5);
/// assert_eq!(rule.to_string(), "1 2 ==> 3 #SUP: 2 #CONF: 0.5");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssociationRule {
    /// Left-hand side, sorted ascending.
    pub antecedent: Vec<Item>,
    /// Right-hand side, sorted ascending and disjoint from the antecedent.
    pub consequent: Vec<Item>,
    /// Absolute support: transactions containing both sides.
    pub support: u32,
    /// `support / support(antecedent)`.
    pub confidence: f64,
}

impl AssociationRule {
    /// Creates a new rule.
    pub fn new(antecedent: Vec<Item>, consequent: Vec<Item>, support: u32, confidence: f64) -> Self {
        Self {
            antecedent,
            consequent,
            support,
            confidence,
        }
    }

    /// Returns the antecedent items.
    pub fn antecedent(&self) -> &[Item] {
        &self.antecedent
    }

    /// Returns the consequent items.
    pub fn consequent(&self) -> &[Item] {
        &self.consequent
    }

    /// Total number of items on both sides.
    pub fn item_count(&self) -> usize {
        self.antecedent.len() + self.consequent.len()
    }
}

/// Renders `<antecedent> ==> <consequent> #SUP: <support> #CONF: <confidence>`.
///
/// The confidence always carries a decimal point (`1.0`, not `1`).
impl fmt::Display for AssociationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ==> {} #SUP: {} #CONF: {:?}",
            itemset::render(&self.antecedent),
            itemset::render(&self.consequent),
            self.support,
            self.confidence
        )
    }
}

//! Integration tests for the top-k rule miner.
//!
//! Small databases are cross-checked against an exhaustive enumeration of
//! every rule they contain.

use std::collections::BTreeSet;

use arules_miner::{
    Item, MinerConfig, MinerError, MiningResult, PeakUsage, RuleMiner, VerticalDatabase,
};

type Sides = (Vec<Item>, Vec<Item>);

/// Deterministic pseudo-random transactions (64-bit LCG).
fn generated_transactions(seed: u64, count: usize, max_item: Item) -> Vec<Vec<Item>> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as u32
    };

    (0..count)
        .map(|_| {
            let items: Vec<Item> = (1..=max_item).filter(|_| next() % 100 < 55).collect();
            if items.is_empty() {
                vec![1 + next() % max_item]
            } else {
                items
            }
        })
        .collect()
}

fn occurrences(transactions: &[Vec<Item>], itemset: &[Item]) -> u32 {
    transactions
        .iter()
        .filter(|t| itemset.iter().all(|item| t.contains(item)))
        .count() as u32
}

/// A rule from the exhaustive enumeration.
#[derive(Debug, Clone)]
struct ReferenceRule {
    antecedent: Vec<Item>,
    consequent: Vec<Item>,
    support: u32,
    confidence: f64,
}

impl ReferenceRule {
    fn subsumes(&self, other: &ReferenceRule) -> bool {
        self.antecedent.len() <= other.antecedent.len()
            && self.consequent.len() >= other.consequent.len()
            && self.antecedent.iter().all(|i| other.antecedent.contains(i))
            && other.consequent.iter().all(|i| self.consequent.contains(i))
    }
}

/// Every rule with support >= 1 and confidence >= `min_confidence`.
fn all_rules(transactions: &[Vec<Item>], max_item: Item, min_confidence: f64) -> Vec<ReferenceRule> {
    let mut rules = Vec::new();
    let assignments = 3u32.pow(max_item);
    for code in 0..assignments {
        let mut antecedent = Vec::new();
        let mut consequent = Vec::new();
        let mut rest = code;
        for item in 1..=max_item {
            match rest % 3 {
                1 => antecedent.push(item),
                2 => consequent.push(item),
                _ => {}
            }
            rest /= 3;
        }
        if antecedent.is_empty() || consequent.is_empty() {
            continue;
        }
        let union: Vec<Item> = antecedent.iter().chain(&consequent).copied().collect();
        let support = occurrences(transactions, &union);
        if support == 0 {
            continue;
        }
        let confidence = f64::from(support) / f64::from(occurrences(transactions, &antecedent));
        if confidence >= min_confidence {
            rules.push(ReferenceRule {
                antecedent,
                consequent,
                support,
                confidence,
            });
        }
    }
    rules
}

/// Rules no equally supported, equally confident rule subsumes.
fn non_redundant(rules: &[ReferenceRule]) -> BTreeSet<Sides> {
    rules
        .iter()
        .filter(|rule| {
            !rules.iter().any(|other| {
                (other.antecedent != rule.antecedent || other.consequent != rule.consequent)
                    && other.support == rule.support
                    && other.confidence == rule.confidence
                    && other.subsumes(rule)
            })
        })
        .map(|rule| (rule.antecedent.clone(), rule.consequent.clone()))
        .collect()
}

fn sides(result: &MiningResult) -> BTreeSet<Sides> {
    result
        .iter()
        .map(|rule| (rule.antecedent().to_vec(), rule.consequent().to_vec()))
        .collect()
}

/// Checks support, confidence, bounds and pairwise non-redundancy.
fn assert_consistent(result: &MiningResult, transactions: &[Vec<Item>], k: usize, min_confidence: f64) {
    assert!(result.len() <= k);
    for rule in result {
        let union: Vec<Item> = rule.antecedent().iter().chain(rule.consequent()).copied().collect();
        assert_eq!(rule.support(), occurrences(transactions, &union), "support of {rule}");
        let expected = f64::from(rule.support()) / f64::from(occurrences(transactions, rule.antecedent()));
        assert_eq!(rule.confidence(), expected, "confidence of {rule}");
        assert!(rule.confidence() >= min_confidence);
        assert!(rule.antecedent().iter().all(|i| !rule.consequent().contains(i)));
    }
    for a in result {
        for b in result {
            if a == b {
                continue;
            }
            let redundant =
                a.support() == b.support() && a.confidence() == b.confidence() && a.subsumes(b);
            assert!(!redundant, "{a} makes {b} redundant");
        }
    }
}

// ============================================================================
// Worked example
// ============================================================================

#[test]
fn test_worked_example() {
    let input = "1 2 3\n1 2\n1 3\n2 3\n";
    let mut db = VerticalDatabase::parse(input).unwrap();
    let result = RuleMiner::new().run(2, 0.5, &mut db, 0).unwrap();

    let tied: BTreeSet<Sides> = [(1, 2), (2, 1), (1, 3), (3, 1), (2, 3), (3, 2)]
        .into_iter()
        .map(|(a, c)| (vec![a], vec![c]))
        .collect();

    assert_eq!(result.len(), 2);
    assert!(sides(&result).is_subset(&tied));
    for line in result.render().lines() {
        assert!(line.ends_with("#SUP: 2 #CONF: 0.6666666666666666"), "{line}");
    }
}

#[test]
fn test_subsumed_rule_is_eliminated() {
    // {1} => {2,3} and {1,4} => {2,3} both have support 2 and confidence 1
    let mut db = VerticalDatabase::from_transactions(vec![
        vec![1, 2, 3, 4],
        vec![1, 2, 3, 4],
        vec![4, 5],
    ])
    .unwrap();
    let result = RuleMiner::new().run(50, 1.0, &mut db, 0).unwrap();

    assert!(result.contains(&[1], &[2, 3, 4]));
    assert!(!result.contains(&[1], &[2, 3]));
    assert!(!result.contains(&[1, 4], &[2, 3]));
}

// ============================================================================
// Cross-checks against exhaustive enumeration
// ============================================================================

#[test]
fn test_large_k_finds_every_non_redundant_rule() {
    for seed in 0..6 {
        let max_item = 5;
        let transactions = generated_transactions(seed, 12, max_item);
        let min_confidence = 0.4;

        let mut db = VerticalDatabase::from_transactions(transactions.clone()).unwrap();
        let result = RuleMiner::new().run(10_000, min_confidence, &mut db, 0).unwrap();

        let expected = non_redundant(&all_rules(&transactions, max_item, min_confidence));
        assert_eq!(sides(&result), expected, "seed {seed}");
        assert_consistent(&result, &transactions, 10_000, min_confidence);
    }
}

#[test]
fn test_small_k_results_are_consistent() {
    for seed in 10..18 {
        let max_item = 6;
        let transactions = generated_transactions(seed, 20, max_item);
        for (k, min_confidence, delta) in [(1, 0.0, 0), (5, 0.5, 0), (8, 0.7, 3), (20, 0.9, 1)] {
            let mut db = VerticalDatabase::from_transactions(transactions.clone()).unwrap();
            let result = RuleMiner::new().run(k, min_confidence, &mut db, delta).unwrap();
            assert_consistent(&result, &transactions, k, min_confidence);
        }
    }
}

#[test]
fn test_wide_delta_returns_exactly_min_of_k_and_total() {
    for seed in 20..26 {
        let max_item = 6;
        let transactions = generated_transactions(seed, 20, max_item);
        let min_confidence = 0.3;
        let total = non_redundant(&all_rules(&transactions, max_item, min_confidence)).len();

        for k in [1, 3, 7, 12, total.max(1), total + 5] {
            let mut db = VerticalDatabase::from_transactions(transactions.clone()).unwrap();
            let result = RuleMiner::new()
                .run(k, min_confidence, &mut db, 10_000)
                .unwrap();
            assert_eq!(result.len(), k.min(total), "seed {seed} k {k}");
            assert_consistent(&result, &transactions, k, min_confidence);
        }
    }
}

#[test]
fn test_top_rule_has_highest_support() {
    let max_item = 5;
    let transactions = generated_transactions(42, 16, max_item);
    let reference = all_rules(&transactions, max_item, 0.0);
    let best = reference.iter().map(|rule| rule.support).max().unwrap();

    let mut db = VerticalDatabase::from_transactions(transactions).unwrap();
    let result = RuleMiner::new().run(1, 0.0, &mut db, 0).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.rules()[0].support(), best);
}

// ============================================================================
// Run-level properties
// ============================================================================

#[test]
fn test_deterministic_across_runs() {
    let transactions = generated_transactions(7, 30, 7);
    let db = VerticalDatabase::from_transactions(transactions).unwrap();

    let first = RuleMiner::new().run(15, 0.6, &mut db.clone(), 2).unwrap();
    let second = RuleMiner::new().run(15, 0.6, &mut db.clone(), 2).unwrap();

    assert_eq!(first.to_rules(), second.to_rules());
    assert_eq!(first.stats.final_min_support, second.stats.final_min_support);
}

#[test]
fn test_threshold_never_decreases() {
    let transactions = generated_transactions(3, 40, 8);
    let mut db = VerticalDatabase::from_transactions(transactions).unwrap();
    let mut usage = PeakUsage::default();

    let result = RuleMiner::new()
        .run_with_observer(5, 0.5, &mut db, 0, &mut usage)
        .unwrap();

    assert!(usage.threshold_is_monotone());
    if let Some(&(_, last)) = usage.threshold_history.last() {
        assert!(result.stats.final_min_support >= last);
    }
    for rule in &result {
        assert!(rule.support() >= result.stats.final_min_support);
    }
}

#[test]
fn test_pairs_only_without_frontier_seeding() {
    let transactions = generated_transactions(5, 25, 6);
    let config = MinerConfig::builder()
        .k(1_000)
        .min_confidence(0.0)
        .seed_frontier_with_pairs(false)
        .build()
        .unwrap();

    let mut db = VerticalDatabase::from_transactions(transactions).unwrap();
    let result = RuleMiner::with_config(config).mine(&mut db).unwrap();

    assert!(!result.is_empty());
    assert_eq!(result.stats.candidates_expanded, 0);
    assert!(result.iter().all(|rule| rule.item_count() == 2));
}

#[test]
fn test_rendered_rules_parse_back() {
    let transactions = generated_transactions(9, 20, 5);
    let mut db = VerticalDatabase::from_transactions(transactions).unwrap();
    let result = RuleMiner::new().run(10, 0.5, &mut db, 0).unwrap();

    let parsed = arules::parse_rules(&result.render()).unwrap();
    assert_eq!(parsed, result.sorted_rules());
}

#[test]
fn test_labels_of_supporting_transactions() {
    let mut builder = VerticalDatabase::builder();
    builder.add_labeled_transaction("r-100", [1, 2]).unwrap();
    builder.add_labeled_transaction("r-101", [1, 2]).unwrap();
    builder.add_labeled_transaction("r-102", [3]).unwrap();
    let mut db = builder.build();

    let result = RuleMiner::new().run(1, 1.0, &mut db, 0).unwrap();
    let rule = &result.rules()[0];
    assert_eq!(db.labels_of(rule.common_tids()), vec!["r-100", "r-101"]);
}

// ============================================================================
// Errors and degenerate input
// ============================================================================

#[test]
fn test_invalid_parameters() {
    let mut db = VerticalDatabase::from_transactions(vec![vec![1, 2]]).unwrap();
    let miner = RuleMiner::new();

    assert!(matches!(
        miner.run(0, 0.5, &mut db, 0),
        Err(MinerError::InvalidParameter { name: "k", .. })
    ));
    assert!(matches!(
        miner.run(1, -0.5, &mut db, 0),
        Err(MinerError::InvalidParameter {
            name: "min_confidence",
            ..
        })
    ));
}

#[test]
fn test_single_item_transactions_yield_nothing() {
    let mut db = VerticalDatabase::from_transactions(vec![vec![1], vec![2], vec![3]]).unwrap();
    let result = RuleMiner::new().run(10, 0.0, &mut db, 0).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_malformed_input_is_a_format_error() {
    let err = VerticalDatabase::parse("1 2\n1 x\n").unwrap_err();
    assert!(matches!(err, MinerError::Format(_)));
}

//! Helpers for itemsets stored as sorted, duplicate-free slices.
//!
//! All functions assume ascending order. Membership tests exploit the
//! order to stop early instead of scanning the whole slice.

use crate::Item;

/// Sorts and deduplicates a collection of items into a canonical itemset.
pub fn normalize<I: IntoIterator<Item = Item>>(items: I) -> Vec<Item> {
    let mut items: Vec<Item> = items.into_iter().collect();
    items.sort_unstable();
    items.dedup();
    items
}

/// Returns true if `items` is strictly ascending.
pub fn is_canonical(items: &[Item]) -> bool {
    items.windows(2).all(|w| w[0] < w[1])
}

/// Returns true if `superset` contains every item of `subset`.
///
/// Both slices must be canonical. Equal itemsets contain each other.
pub fn contains_all(superset: &[Item], subset: &[Item]) -> bool {
    if subset.len() > superset.len() {
        return false;
    }
    let mut rest = superset;
    for &item in subset {
        match rest.iter().position(|&candidate| candidate >= item) {
            Some(idx) if rest[idx] == item => rest = &rest[idx + 1..],
            _ => return false,
        }
    }
    true
}

/// Returns true if `item` is in `itemset`, whose largest item is `max_item`.
///
/// Items above `max_item` are rejected without touching the slice.
#[inline]
pub fn contains_bounded(itemset: &[Item], item: Item, max_item: Item) -> bool {
    item <= max_item && itemset.binary_search(&item).is_ok()
}

/// Returns a copy of `itemset` with `item` inserted at its ordered position.
///
/// If the item is already present the copy is returned unchanged.
pub fn with_item(itemset: &[Item], item: Item) -> Vec<Item> {
    let mut grown = Vec::with_capacity(itemset.len() + 1);
    match itemset.binary_search(&item) {
        Ok(_) => grown.extend_from_slice(itemset),
        Err(idx) => {
            grown.extend_from_slice(&itemset[..idx]);
            grown.push(item);
            grown.extend_from_slice(&itemset[idx..]);
        }
    }
    grown
}

/// Renders an itemset as space-separated identifiers.
pub fn render(itemset: &[Item]) -> String {
    itemset
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

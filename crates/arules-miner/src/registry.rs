//! Registry mapping external transaction labels to dense transaction ids.

use std::collections::HashMap;

use arules::Tid;

use crate::error::{MinerError, MinerResult};

/// Registry that maps between transaction labels and dense [`Tid`] indices.
///
/// Source systems identify transactions by opaque strings (order numbers,
/// session ids). Tid sets need dense `u32` indices, assigned here in
/// registration order starting from 0.
///
/// # Example
///
/// ```rust
/// use arules_miner::TransactionRegistry;
///
/// let mut registry = TransactionRegistry::new();
/// let tid = registry.register("order-17").unwrap();
/// assert_eq!(registry.get_tid("order-17"), Some(tid));
/// assert_eq!(registry.get_label(tid), Some("order-17"));
/// ```
#[derive(Clone, Default)]
pub struct TransactionRegistry {
    /// Label -> tid mapping.
    label_to_tid: HashMap<String, Tid>,
    /// Tid -> label mapping.
    tid_to_label: Vec<String>,
}

impl TransactionRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            label_to_tid: HashMap::with_capacity(capacity),
            tid_to_label: Vec::with_capacity(capacity),
        }
    }

    /// Registers a label and returns its tid.
    ///
    /// If the label is already registered, returns the existing tid.
    ///
    /// # Errors
    ///
    /// Returns [`MinerError::InconsistentDatabase`] once the `u32` tid space
    /// is exhausted.
    pub fn register(&mut self, label: &str) -> MinerResult<Tid> {
        if let Some(&tid) = self.label_to_tid.get(label) {
            return Ok(tid);
        }
        let tid = Tid::try_from(self.tid_to_label.len()).map_err(|_| {
            MinerError::InconsistentDatabase("too many transactions for u32 ids".to_string())
        })?;
        self.label_to_tid.insert(label.to_string(), tid);
        self.tid_to_label.push(label.to_string());
        Ok(tid)
    }

    /// Gets the tid for a label.
    #[inline]
    pub fn get_tid(&self, label: &str) -> Option<Tid> {
        self.label_to_tid.get(label).copied()
    }

    /// Gets the label for a tid.
    #[inline]
    pub fn get_label(&self, tid: Tid) -> Option<&str> {
        self.tid_to_label.get(tid as usize).map(String::as_str)
    }

    /// Returns the number of registered labels.
    #[inline]
    pub fn len(&self) -> usize {
        self.tid_to_label.len()
    }

    /// Returns true if the registry is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tid_to_label.is_empty()
    }

    /// Returns true if the label is registered.
    #[inline]
    pub fn contains(&self, label: &str) -> bool {
        self.label_to_tid.contains_key(label)
    }

    /// Returns an iterator over (tid, label) pairs in tid order.
    pub fn iter(&self) -> impl Iterator<Item = (Tid, &str)> + '_ {
        self.tid_to_label
            .iter()
            .enumerate()
            .map(|(i, label)| (i as Tid, label.as_str()))
    }

    /// Converts tids back to labels. Unknown tids are filtered out.
    pub fn to_labels<I: IntoIterator<Item = Tid>>(&self, tids: I) -> Vec<&str> {
        tids.into_iter()
            .filter_map(|tid| self.get_label(tid))
            .collect()
    }
}

impl std::fmt::Debug for TransactionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionRegistry")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_empty() {
        let registry = TransactionRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = TransactionRegistry::with_capacity(4);

        let t1 = registry.register("a").unwrap();
        let t2 = registry.register("b").unwrap();
        let t3 = registry.register("a").unwrap(); // Duplicate

        assert_eq!(t1, 0);
        assert_eq!(t2, 1);
        assert_eq!(t3, 0);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get_tid("b"), Some(1));
        assert_eq!(registry.get_tid("c"), None);
        assert_eq!(registry.get_label(0), Some("a"));
        assert_eq!(registry.get_label(2), None);
        assert!(registry.contains("a"));
        assert!(!registry.contains("z"));
    }

    #[test]
    fn test_iter_in_tid_order() {
        let mut registry = TransactionRegistry::new();
        for label in ["x", "y", "z"] {
            registry.register(label).unwrap();
        }

        let collected: Vec<(Tid, &str)> = registry.iter().collect();
        assert_eq!(collected, vec![(0, "x"), (1, "y"), (2, "z")]);
    }

    #[test]
    fn test_to_labels() {
        let mut registry = TransactionRegistry::new();
        for label in ["x", "y", "z"] {
            registry.register(label).unwrap();
        }

        assert_eq!(registry.to_labels([2, 0, 9]), vec!["z", "x"]);
    }
}

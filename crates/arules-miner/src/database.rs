//! Vertical (item -> transaction-id set) database.
//!
//! The vertical layout turns support counting into bitset intersection:
//! the support of an itemset is the cardinality of the intersection of its
//! items' tid sets. Alongside the tid sets the database keeps the horizontal
//! transaction lists, which the miner scans to discover extension items and
//! prunes destructively as the support threshold rises.

use arules::{itemset, Item, Tid, MAX_ITEM};

use crate::error::{MinerError, MinerResult};
use crate::registry::TransactionRegistry;
use crate::tidset::TidSet;

/// One transaction: an identifying label and its live items.
///
/// Items are kept in descending order so scans can stop as soon as the
/// remaining items are too small to extend a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    label: String,
    items: Vec<Item>,
}

impl Transaction {
    /// Creates a transaction, sorting items descending and dropping duplicates.
    pub fn new<I: IntoIterator<Item = Item>>(label: impl Into<String>, items: I) -> Self {
        let mut items = itemset::normalize(items);
        items.reverse();
        Self {
            label: label.into(),
            items,
        }
    }

    /// Returns the transaction label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the live items, largest first.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Returns the number of live items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no live item remains.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if the items are strictly descending.
    fn is_descending(&self) -> bool {
        self.items.windows(2).all(|w| w[0] > w[1])
    }
}

/// Vertical database: per-item tid sets and support counts plus the
/// per-transaction live item lists.
///
/// Tables are indexed by item and cover `0..=max_item`; slot 0 is reserved
/// and always empty.
///
/// # Example
///
/// ```rust
/// use arules_miner::VerticalDatabase;
///
/// let db = VerticalDatabase::from_transactions(vec![
///     vec![1, 2, 3],
///     vec![1, 2],
///     vec![1, 3],
///     vec![2, 3],
/// ]).unwrap();
///
/// assert_eq!(db.max_item(), 3);
/// assert_eq!(db.support(1), 3);
/// assert!(db.is_frequent(2, 3));
/// assert_eq!(db.tids(1).intersection(db.tids(2)).len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct VerticalDatabase {
    /// `tids[item]`: ids of transactions containing the item.
    tids: Vec<TidSet>,
    /// `support[item]`: original occurrence count.
    support: Vec<u32>,
    /// Transactions indexed by tid.
    transactions: Vec<Transaction>,
    /// Largest item identifier covered by the tables.
    max_item: Item,
    /// Label lookup for transactions.
    registry: TransactionRegistry,
}

impl VerticalDatabase {
    /// Creates a new builder.
    pub fn builder() -> VerticalDatabaseBuilder {
        VerticalDatabaseBuilder::default()
    }

    /// Builds a database from unlabelled item lists.
    ///
    /// Transactions are labelled by their position (`"0"`, `"1"`, ...).
    pub fn from_transactions<T, I>(transactions: T) -> MinerResult<Self>
    where
        T: IntoIterator<Item = I>,
        I: IntoIterator<Item = Item>,
    {
        let mut builder = Self::builder();
        for items in transactions {
            builder.add_transaction(items)?;
        }
        Ok(builder.build())
    }

    /// Builds a database from the line-per-transaction text format.
    ///
    /// See [`arules::parse_transactions`] for the accepted syntax.
    pub fn parse(input: &str) -> MinerResult<Self> {
        let transactions = arules::parse_transactions(input)?;
        Self::from_transactions(transactions)
    }

    /// Assembles a database from precomputed tables.
    ///
    /// This is the entry point for externally built indexes. The tables must
    /// cover items `0..=max_item`, slot 0 must be empty, every support count
    /// must equal its tid set's cardinality, tids must address existing
    /// transactions, transaction items must be strictly descending and every
    /// live item must occur in its own tid set. `max_item` may not exceed
    /// [`MAX_ITEM`].
    ///
    /// # Errors
    ///
    /// Returns [`MinerError::InconsistentDatabase`] describing the first
    /// violated condition.
    pub fn from_parts(
        tids: Vec<TidSet>,
        support: Vec<u32>,
        transactions: Vec<Transaction>,
        max_item: Item,
    ) -> MinerResult<Self> {
        if max_item > MAX_ITEM {
            return Err(inconsistent(format!(
                "max item {} exceeds the largest accepted item {}",
                max_item, MAX_ITEM
            )));
        }
        let width = max_item as usize + 1;
        if tids.len() != width || support.len() != width {
            return Err(inconsistent(format!(
                "tables cover {} tid sets and {} counts, expected {} (max item {})",
                tids.len(),
                support.len(),
                width,
                max_item
            )));
        }
        if support[0] != 0 || !tids[0].is_empty() {
            return Err(inconsistent("item 0 is reserved but has occurrences".to_string()));
        }

        let transaction_count = transactions.len();
        for (item, (set, &count)) in tids.iter().zip(&support).enumerate() {
            if set.len() != count as usize {
                return Err(inconsistent(format!(
                    "support[{}] = {} but tids[{}] has {}",
                    item,
                    count,
                    item,
                    set.len()
                )));
            }
            if let Some(max_tid) = set.as_bitmap().max() {
                if max_tid as usize >= transaction_count {
                    return Err(inconsistent(format!(
                        "tids[{}] references transaction {} of {}",
                        item, max_tid, transaction_count
                    )));
                }
            }
        }

        let mut registry = TransactionRegistry::with_capacity(transaction_count);
        for (tid, transaction) in transactions.iter().enumerate() {
            if !transaction.is_descending() {
                return Err(inconsistent(format!(
                    "transaction {} is not sorted descending",
                    tid
                )));
            }
            for &item in transaction.items() {
                if item == 0 || item > max_item {
                    return Err(inconsistent(format!(
                        "transaction {} holds item {} outside 1..={}",
                        tid, item, max_item
                    )));
                }
                if !tids[item as usize].contains(tid as Tid) {
                    return Err(inconsistent(format!(
                        "transaction {} holds item {} missing from its tid set",
                        tid, item
                    )));
                }
            }
            register_label(&mut registry, transaction.label())?;
        }

        Ok(Self {
            tids,
            support,
            transactions,
            max_item,
            registry,
        })
    }

    /// Largest item identifier covered by the tables.
    #[inline]
    pub fn max_item(&self) -> Item {
        self.max_item
    }

    /// Number of transactions.
    #[inline]
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Original support count of an item (0 for unknown items).
    #[inline]
    pub fn support(&self, item: Item) -> u32 {
        self.support.get(item as usize).copied().unwrap_or(0)
    }

    /// Returns true if `support(item) >= threshold`.
    #[inline]
    pub fn is_frequent(&self, item: Item, threshold: u32) -> bool {
        self.support(item) >= threshold
    }

    /// Tid set of an item. Unknown items map to the empty set of item 0.
    #[inline]
    pub fn tids(&self, item: Item) -> &TidSet {
        self.tids.get(item as usize).unwrap_or(&self.tids[0])
    }

    /// Returns a transaction by tid.
    pub fn transaction(&self, tid: Tid) -> Option<&Transaction> {
        self.transactions.get(tid as usize)
    }

    /// Returns the live items of a transaction (empty for unknown tids).
    pub fn live_items(&self, tid: Tid) -> &[Item] {
        self.transaction(tid).map(Transaction::items).unwrap_or(&[])
    }

    /// Returns all transactions in tid order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Returns the support table, indexed by item.
    pub fn support_table(&self) -> &[u32] {
        &self.support
    }

    /// Returns the tid-set table, indexed by item.
    pub fn tid_table(&self) -> &[TidSet] {
        &self.tids
    }

    /// Returns the label registry.
    pub fn registry(&self) -> &TransactionRegistry {
        &self.registry
    }

    /// Resolves a tid set to transaction labels.
    pub fn labels_of(&self, tids: &TidSet) -> Vec<&str> {
        self.registry.to_labels(tids.iter())
    }

    /// Permanently removes items below `threshold` from a transaction's
    /// live list, returning how many were removed.
    ///
    /// Tid sets and support counts are left untouched: they keep describing
    /// original occurrence.
    pub fn prune_transaction(&mut self, tid: Tid, threshold: u32) -> usize {
        let support = &self.support;
        match self.transactions.get_mut(tid as usize) {
            Some(transaction) => {
                let before = transaction.items.len();
                transaction
                    .items
                    .retain(|&item| support[item as usize] >= threshold);
                before - transaction.items.len()
            }
            None => 0,
        }
    }

    /// Returns approximate memory usage in bytes.
    pub fn memory_size(&self) -> usize {
        let tid_bytes: usize = self.tids.iter().map(TidSet::memory_size).sum();
        let item_bytes: usize = self
            .transactions
            .iter()
            .map(|t| t.items.capacity() * std::mem::size_of::<Item>() + t.label.capacity())
            .sum();
        tid_bytes + item_bytes + self.support.capacity() * 4 + std::mem::size_of::<Self>()
    }
}

fn inconsistent(message: String) -> MinerError {
    MinerError::InconsistentDatabase(message)
}

fn register_label(registry: &mut TransactionRegistry, label: &str) -> MinerResult<Tid> {
    if registry.contains(label) {
        return Err(inconsistent(format!("duplicate transaction label '{}'", label)));
    }
    registry.register(label)
}

/// Builder for [`VerticalDatabase`].
///
/// # Example
///
/// ```rust
/// use arules_miner::VerticalDatabase;
///
/// let mut builder = VerticalDatabase::builder();
/// builder.add_labeled_transaction("receipt-1", [3, 1]).unwrap();
/// builder.add_labeled_transaction("receipt-2", [1]).unwrap();
/// let db = builder.with_max_item(5).build();
///
/// assert_eq!(db.max_item(), 5);
/// assert_eq!(db.support(1), 2);
/// assert_eq!(db.registry().get_tid("receipt-2"), Some(1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct VerticalDatabaseBuilder {
    transactions: Vec<Transaction>,
    registry: TransactionRegistry,
    max_item: Item,
}

impl VerticalDatabaseBuilder {
    /// Adds a transaction labelled by its position.
    pub fn add_transaction<I: IntoIterator<Item = Item>>(&mut self, items: I) -> MinerResult<Tid> {
        let label = self.transactions.len().to_string();
        self.add_labeled_transaction(&label, items)
    }

    /// Adds a transaction with an explicit label.
    ///
    /// # Errors
    ///
    /// Returns [`MinerError::InconsistentDatabase`] if the label is already
    /// taken, the items contain the reserved item 0 or an item exceeds
    /// [`MAX_ITEM`].
    pub fn add_labeled_transaction<I: IntoIterator<Item = Item>>(
        &mut self,
        label: &str,
        items: I,
    ) -> MinerResult<Tid> {
        let transaction = Transaction::new(label, items);
        if transaction.items.last() == Some(&0) {
            return Err(inconsistent(format!(
                "item 0 is reserved (transaction '{}')",
                label
            )));
        }
        if let Some(&largest) = transaction.items.first().filter(|&&item| item > MAX_ITEM) {
            return Err(inconsistent(format!(
                "item {} exceeds the largest accepted item {} (transaction '{}')",
                largest, MAX_ITEM, label
            )));
        }
        let tid = register_label(&mut self.registry, label)?;
        if let Some(&largest) = transaction.items.first() {
            self.max_item = self.max_item.max(largest);
        }
        self.transactions.push(transaction);
        Ok(tid)
    }

    /// Widens the item tables to cover at least `max_item`, saturating at
    /// [`MAX_ITEM`].
    pub fn with_max_item(mut self, max_item: Item) -> Self {
        self.max_item = self.max_item.max(max_item.min(MAX_ITEM));
        self
    }

    /// Builds the vertical database.
    pub fn build(self) -> VerticalDatabase {
        let width = self.max_item as usize + 1;
        let mut tids = vec![TidSet::new(); width];
        for (tid, transaction) in self.transactions.iter().enumerate() {
            for &item in transaction.items() {
                tids[item as usize].insert(tid as Tid);
            }
        }
        let support = tids.iter().map(|set| set.len() as u32).collect();

        VerticalDatabase {
            tids,
            support,
            transactions: self.transactions,
            max_item: self.max_item,
            registry: self.registry,
        }
    }
}

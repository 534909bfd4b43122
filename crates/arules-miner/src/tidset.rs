//! Roaring bitmap-based transaction-id sets.
//!
//! Every support count in the miner is the cardinality of one of these sets,
//! and every grown rule is derived from them by intersection.
//!
//! # Example
//!
//! ```rust
//! use arules_miner::TidSet;
//!
//! let with_bread: TidSet = [0, 1, 2].into_iter().collect();
//! let with_milk: TidSet = [1, 2, 3].into_iter().collect();
//!
//! let both = with_bread.intersection(&with_milk);
//! assert_eq!(both.len(), 2);
//! assert!(both.contains(1));
//! ```

use std::io;

use arules::Tid;
use roaring::RoaringBitmap;

/// A set of transaction ids stored as a Roaring Bitmap.
///
/// Supports are cardinalities and rule tid sets are intersections; the
/// roaring containers keep both cheap for sparse and dense items alike.
#[derive(Clone, Default, PartialEq)]
pub struct TidSet {
    bitmap: RoaringBitmap,
}

impl TidSet {
    /// Creates a new empty set.
    pub fn new() -> Self {
        Self {
            bitmap: RoaringBitmap::new(),
        }
    }

    /// Inserts a transaction id.
    ///
    /// Returns `true` if the id was newly inserted.
    pub fn insert(&mut self, tid: Tid) -> bool {
        self.bitmap.insert(tid)
    }

    /// Checks if a transaction id is in the set.
    #[inline]
    pub fn contains(&self, tid: Tid) -> bool {
        self.bitmap.contains(tid)
    }

    /// Returns the cardinality of the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.bitmap.len() as usize
    }

    /// Returns true if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bitmap.is_empty()
    }

    /// Computes intersection (AND) - returns a new set.
    pub fn intersection(&self, other: &Self) -> Self {
        Self {
            bitmap: &self.bitmap & &other.bitmap,
        }
    }

    /// Computes the cardinality of the intersection without materializing it.
    pub fn intersection_len(&self, other: &Self) -> usize {
        self.bitmap.intersection_len(&other.bitmap) as usize
    }

    /// Returns an iterator over transaction ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Tid> + '_ {
        self.bitmap.iter()
    }

    /// Returns the serialized size in bytes.
    pub fn serialized_size(&self) -> usize {
        self.bitmap.serialized_size()
    }

    /// Returns approximate memory usage in bytes.
    pub fn memory_size(&self) -> usize {
        self.serialized_size() + std::mem::size_of::<Self>()
    }

    /// Serializes the bitmap to a byte vector in the portable roaring format.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.serialized_size());
        self.bitmap.serialize_into(&mut buf)?;
        Ok(buf)
    }

    /// Deserializes a set from bytes produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> io::Result<Self> {
        let bitmap = RoaringBitmap::deserialize_from(bytes)?;
        Ok(Self { bitmap })
    }

    /// Returns a reference to the underlying bitmap (for advanced use).
    pub fn as_bitmap(&self) -> &RoaringBitmap {
        &self.bitmap
    }
}

impl FromIterator<Tid> for TidSet {
    fn from_iter<I: IntoIterator<Item = Tid>>(iter: I) -> Self {
        Self {
            bitmap: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Debug for TidSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TidSet")
            .field("len", &self.len())
            .field("serialized_size", &self.serialized_size())
            .finish()
    }
}

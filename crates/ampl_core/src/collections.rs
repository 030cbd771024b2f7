//! Custom collection types used throughout the compiler.
//!
//! [`HashTable`] is a separately chained hash map whose bucket function is
//! supplied by the caller. Capacities walk a table of primes just below
//! successive powers of two, so a weak hash (like the symbol table's
//! shift-and-add string hash) still spreads reasonably across buckets.

use rustc_hash::FxHasher;
use std::borrow::Borrow;
use std::collections::TryReserveError;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// `DELTA[k]` is `2^k` minus the largest prime below `2^k`.
const DELTA: [usize; 32] = [
    0, 0, 1, 1, 3, 1, 3, 1, 5, 3, 3, 9, 3, 1, 3, 19, 15, 1, 5, 1, 3, 9, 3, 15, 3, 39, 5, 39, 57,
    3, 35, 1,
];

/// Index into [`DELTA`] for a freshly created table (capacity 13).
const INITIAL_DELTA_INDEX: usize = 4;

/// Load factor used by [`HashTable::new`].
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

#[inline]
fn capacity_at(delta_index: usize) -> usize {
    (1usize << delta_index) - DELTA[delta_index]
}

/// Maps a key to a bucket index for a given capacity.
///
/// Implementations must agree with the key type's `Eq`: keys that compare
/// equal must land in the same bucket for every capacity. When a table is
/// searched through a borrowed form `Q` of its key type `K`, the hasher must
/// produce the same index for `k` and `k.borrow()`.
pub trait BucketHasher<Q: ?Sized> {
    /// Returns a bucket index in `0..capacity`.
    fn bucket(&self, key: &Q, capacity: usize) -> usize;
}

/// Buckets keys by their `Hash` impl run through FxHash.
#[derive(Debug, Clone, Copy, Default)]
pub struct FxBucketHasher;

impl<Q: Hash + ?Sized> BucketHasher<Q> for FxBucketHasher {
    #[inline]
    fn bucket(&self, key: &Q, capacity: usize) -> usize {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        (hasher.finish() % capacity as u64) as usize
    }
}

/// Errors raised by [`HashTable`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HashTableError {
    #[error("hash table allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
    #[error("hash table cannot grow beyond {capacity} buckets")]
    CapacityOverflow { capacity: usize },
    #[error("invalid maximum load factor {0}")]
    InvalidLoadFactor(f32),
}

/// Outcome of [`HashTable::insert`].
#[must_use = "a rejected insertion hands the key and value back"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion<K, V> {
    /// The pair was stored.
    Inserted,
    /// An equal key was already present. The stored value is unchanged and
    /// the rejected pair is returned to the caller.
    Exists(K, V),
}

impl<K, V> Insertion<K, V> {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Insertion::Inserted)
    }
}

type Link<K, V> = Option<Box<Entry<K, V>>>;

struct Entry<K, V> {
    key: K,
    value: V,
    next: Link<K, V>,
}

/// Walks one collision chain, most recently inserted entry first.
struct Chain<'a, K, V> {
    link: Option<&'a Entry<K, V>>,
}

impl<'a, K, V> Iterator for Chain<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.link?;
        self.link = entry.next.as_deref();
        Some(entry)
    }
}

fn alloc_buckets<K, V>(capacity: usize) -> Result<Vec<Link<K, V>>, TryReserveError> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(capacity)?;
    buckets.resize_with(capacity, || None);
    Ok(buckets)
}

/// A separately chained hash table with caller-supplied bucketing.
pub struct HashTable<K, V, H = FxBucketHasher> {
    buckets: Vec<Link<K, V>>,
    len: usize,
    max_load_factor: f32,
    delta_index: usize,
    hasher: H,
}

impl<K, V, H: Default> HashTable<K, V, H> {
    /// Create an empty table with the default load factor.
    pub fn new() -> Result<Self, HashTableError> {
        Self::with_load_factor(DEFAULT_LOAD_FACTOR, H::default())
    }
}

impl<K, V, H> HashTable<K, V, H> {
    /// Create an empty table that grows once `len / capacity` would exceed
    /// `max_load_factor`.
    pub fn with_load_factor(max_load_factor: f32, hasher: H) -> Result<Self, HashTableError> {
        if !max_load_factor.is_finite() || max_load_factor <= 0.0 {
            return Err(HashTableError::InvalidLoadFactor(max_load_factor));
        }
        Ok(Self {
            buckets: alloc_buckets(capacity_at(INITIAL_DELTA_INDEX))?,
            len: 0,
            max_load_factor,
            delta_index: INITIAL_DELTA_INDEX,
            hasher,
        })
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }

    /// Current ratio of entries to buckets.
    pub fn load_factor(&self) -> f32 {
        self.len as f32 / self.capacity() as f32
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    fn chain(&self, index: usize) -> Chain<'_, K, V> {
        Chain {
            link: self.buckets[index].as_deref(),
        }
    }

    /// Iterate over all entries in bucket order, each chain newest first.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        (0..self.buckets.len())
            .flat_map(move |index| self.chain(index))
            .map(|entry| (&entry.key, &entry.value))
    }

    /// Visit every entry with its bucket index, in bucket order and, within
    /// a bucket, newest first.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(usize, &K, &V),
    {
        for index in 0..self.buckets.len() {
            for entry in self.chain(index) {
                visit(index, &entry.key, &entry.value);
            }
        }
    }

    /// Write one line per bucket, e.g. `bucket[ 3] --> a:[1] --> NULL`.
    pub fn write_buckets<W, F>(&self, out: &mut W, mut write_entry: F) -> fmt::Result
    where
        W: fmt::Write,
        F: FnMut(&mut W, &K, &V) -> fmt::Result,
    {
        for index in 0..self.buckets.len() {
            write!(out, "bucket[{:2}]", index)?;
            for entry in self.chain(index) {
                out.write_str(" --> ")?;
                write_entry(out, &entry.key, &entry.value)?;
            }
            out.write_str(" --> NULL\n")?;
        }
        Ok(())
    }

    fn exceeds_load_factor(&self, entries: usize, capacity: usize) -> bool {
        entries as f64 / capacity as f64 > f64::from(self.max_load_factor)
    }

    /// The smallest [`DELTA`] index past the current one whose capacity
    /// holds `entries` within the load factor.
    fn delta_index_for(&self, entries: usize) -> Result<usize, HashTableError> {
        (self.delta_index + 1..DELTA.len())
            .find(|&index| !self.exceeds_load_factor(entries, capacity_at(index)))
            .ok_or(HashTableError::CapacityOverflow {
                capacity: self.capacity(),
            })
    }
}

impl<K: Eq, V, H> HashTable<K, V, H> {
    #[inline]
    fn bucket_of<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        H: BucketHasher<Q>,
    {
        let capacity = self.capacity();
        // Out-of-range indices from a careless hasher fold back into range.
        self.hasher.bucket(key, capacity) % capacity
    }

    /// Look up the value stored under `key`.
    pub fn search<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: BucketHasher<Q>,
    {
        self.chain(self.bucket_of(key))
            .find(|entry| entry.key.borrow() == key)
            .map(|entry| &entry.value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: BucketHasher<Q>,
    {
        self.search(key).is_some()
    }

    /// Insert `key -> value` unless an equal key is already present.
    ///
    /// Growth happens before the target bucket is chosen. New entries go to
    /// the front of their chain.
    pub fn insert(&mut self, key: K, value: V) -> Result<Insertion<K, V>, HashTableError>
    where
        H: BucketHasher<K>,
    {
        if self.exceeds_load_factor(self.len + 1, self.capacity()) {
            let target = self.delta_index_for(self.len + 1)?;
            self.grow(target)?;
        }

        let index = self.bucket_of(&key);
        if self.chain(index).any(|entry| entry.key == key) {
            return Ok(Insertion::Exists(key, value));
        }

        let next = self.buckets[index].take();
        self.buckets[index] = Some(Box::new(Entry { key, value, next }));
        self.len += 1;
        Ok(Insertion::Inserted)
    }

    /// Move every entry into a bucket array with the capacity at
    /// `next_index`, in a single rehash.
    ///
    /// The only allocation is the new bucket array; if it fails the table
    /// is left exactly as it was.
    fn grow(&mut self, next_index: usize) -> Result<(), HashTableError>
    where
        H: BucketHasher<K>,
    {
        let old_capacity = self.capacity();
        let new_capacity = capacity_at(next_index);
        let mut buckets = alloc_buckets(new_capacity)?;

        for mut link in std::mem::take(&mut self.buckets) {
            while let Some(mut entry) = link {
                link = entry.next.take();
                let index = self.hasher.bucket(&entry.key, new_capacity) % new_capacity;
                entry.next = buckets[index].take();
                buckets[index] = Some(entry);
            }
        }

        self.buckets = buckets;
        self.delta_index = next_index;
        tracing::trace!(old_capacity, new_capacity, entries = self.len, "hash table grew");
        Ok(())
    }
}

impl<K, V, H> Drop for HashTable<K, V, H> {
    fn drop(&mut self) {
        // Unlink chains one node at a time so long chains cannot exhaust
        // the stack through recursive box drops.
        for bucket in &mut self.buckets {
            let mut link = bucket.take();
            while let Some(mut entry) = link {
                link = entry.next.take();
            }
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, H> fmt::Debug for HashTable<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

//! A single naming scope and the hash used to bucket its names.

use crate::symbol::IdProperty;
use ampl_core::collections::{BucketHasher, HashTable};

/// Rotate-and-add string hash.
///
/// Each byte rotates the running hash left by five bits before being added,
/// so anagrams land in different buckets.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftHash;

impl ShiftHash {
    pub fn hash(bytes: &[u8]) -> u32 {
        bytes
            .iter()
            .fold(0u32, |hash, &byte| hash.rotate_left(5).wrapping_add(u32::from(byte)))
    }
}

impl<Q: AsRef<[u8]> + ?Sized> BucketHasher<Q> for ShiftHash {
    #[inline]
    fn bucket(&self, key: &Q, capacity: usize) -> usize {
        Self::hash(key.as_ref()) as usize % capacity
    }
}

/// Names declared in one scope.
pub type Scope = HashTable<String, IdProperty, ShiftHash>;

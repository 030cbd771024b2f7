//! ampl_core: Core utilities for the AMPL compiler front end.
//!
//! Provides source positions and the chained hash table that backs the
//! symbol table.

pub mod collections;
pub mod text;

// Re-export commonly used types
pub use collections::{BucketHasher, FxBucketHasher, HashTable, HashTableError, Insertion};
pub use text::SourcePos;

#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod chain;

/// A hash table resolving collisions with separate chaining.
///
/// Every bucket owns a singly-linked [`Chain`] of the entries hashed to it.
pub mod chained;

/// The key/value record stored by both tables.
pub mod entry;

/// Construction and insertion errors.
pub mod error;

/// Bucket hash functions.
///
/// Every variant reduces a canonical token to an index in `[0, capacity)`.
/// They are deterministic and pure; none aims for cryptographic quality.
pub mod hash_fn;

pub mod key;

/// A hash table resolving collisions with linear probing and compacting
/// removal.
pub mod probing;

mod table;

cfg_if::cfg_if! {
    if #[cfg(feature = "stats")] {
        /// Occupancy statistics for inspecting how keys spread over buckets.
        pub mod stats;

        pub use stats::Histogram;
        pub use stats::TableStats;
    }
}

pub use chain::Chain;
pub use chained::ChainedHashTable;
pub use entry::ValuePair;
pub use error::TableError;
pub use hash_fn::HashFunction;
pub use key::Canonicalize;
pub use key::DefaultCanonicalizer;
pub use key::HashKey;
pub use key::Key;
pub use key::Unset;
pub use probing::ProbingHashTable;
pub use table::KeyValueTable;

//! prime-hashmap: string-keyed hash tables over prime-sized bucket
//! arrays, with two interchangeable collision strategies.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: two tables with one operational contract ([`StringTable`]) so
//!   the collision strategy can be swapped without touching callers.
//! - Variants:
//!   - [`QuadraticMap`]: open addressing. Slots are `Empty`, `Tombstone`
//!     or `Occupied`; probes walk `home + i*i`; `put` doubles the table
//!     before inserting once the load factor reaches 0.5.
//!   - [`ChainedMap`]: separate chaining. Chain nodes live in a `slotmap`
//!     arena owned by the map; buckets hold the head key. Growth is only
//!     ever requested by the caller.
//! - [`find_mode`] counts occurrences with a `ChainedMap` to report the
//!   most frequent elements of a sequence.
//!
//! Constraints
//! - Capacity is prime after construction and after every accepted
//!   resize. Construction rounds with [`next_prime`] (an even request is
//!   bumped to odd first); resizing keeps a request that is already prime.
//! - Single-threaded: both maps are `!Send`/`!Sync`.
//! - Keys are `String`; values are any `V`.
//! - The hash function is injected at construction as any [`KeyHasher`]
//!   (plain functions and closures qualify) and kept for the map's life.
//!
//! Probing caveat
//! - `QuadraticMap::put` and `get` stop at the first tombstone, while
//!   `remove` walks over tombstones until an empty slot. A key stored past
//!   a tombstone is therefore invisible to `get`, and `put` creates a
//!   second live slot for it; `remove` retires every copy. This is the
//!   table's documented behavior, not an accident to be fixed in place.
//!
//! Failure model
//! - Nothing panics on the documented edge cases. Rejected resizes return
//!   [`ResizeError`] and leave the map untouched; missing keys read as
//!   `None` and removing them is a no-op.
//!
//! Reentrancy
//! - The only user code a map runs is its hasher. In debug builds each
//!   public operation marks the map busy and a hasher that calls back
//!   into the same map panics instead of observing a half-built table.
//!
//! Logging
//! - Resizes and rejected resizes are reported at `debug` through the
//!   `log` facade; automatic growth and mode counting at `trace`. The
//!   crate never installs a logger.

mod chained;
mod error;
mod hash;
mod mode;
mod prime;
mod quadratic;
mod quadratic_proptest;
mod reentrancy;
mod table;

// Public surface
pub use chained::ChainedMap;
pub use error::ResizeError;
pub use hash::{hash_function_1, hash_function_2, BuildKeyHasher, HashFn, KeyHasher};
pub use mode::{find_mode, Mode};
pub use prime::{is_prime, next_prime};
pub use quadratic::QuadraticMap;
pub use reentrancy::DebugReentrancy;
pub use table::{StringTable, DEFAULT_CAPACITY, GROWTH_FACTOR, MAX_LOAD_FACTOR};

/// Iterators borrowed from the maps.
pub mod iter {
    pub use crate::chained::Iter as ChainedIter;
    pub use crate::quadratic::Iter as QuadraticIter;
}

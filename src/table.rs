//! Operational contract shared by both table variants.

use crate::error::ResizeError;

/// Capacity used by `Default` and by `find_mode`'s frequency table.
pub const DEFAULT_CAPACITY: usize = 11;

/// `QuadraticMap::put` grows first when the load factor is at or above this.
pub const MAX_LOAD_FACTOR: f64 = 0.5;

/// Automatic growth multiplies the capacity by this before rounding to a prime.
pub const GROWTH_FACTOR: usize = 2;

/// String-keyed table with a prime-sized bucket array.
///
/// `QuadraticMap` and `ChainedMap` implement this identically except where
/// their collision strategy shows through (automatic growth, the resize
/// guard against shrinking below `len`, and export order).
pub trait StringTable<V> {
    /// Number of live key/value pairs.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of the bucket array; always prime.
    fn capacity(&self) -> usize;

    /// Insert or update.
    fn put(&mut self, key: &str, value: V);

    fn get(&self, key: &str) -> Option<&V>;

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove `key`; absent keys are a no-op.
    fn remove(&mut self, key: &str);

    /// Drop every entry and keep the capacity.
    fn clear(&mut self);

    /// Buckets holding nothing at all.
    fn empty_buckets(&self) -> usize;

    fn table_load(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Rebuild the bucket array with (at least) `new_capacity` buckets.
    fn resize_table(&mut self, new_capacity: usize) -> Result<(), ResizeError>;

    /// Owned snapshot of every live pair in bucket order.
    fn get_keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone;
}

//! QuadraticMap: open addressing with quadratic probing and tombstones.
//!
//! Layout
//! - A flat `Vec<Slot<V>>` whose length is the (prime) capacity. Each slot is
//!   `Empty`, `Tombstone` or `Occupied`.
//! - `len` counts `Occupied` slots.
//!
//! Probing
//! - Home slot is `hash mod capacity`; the i-th probe is
//!   `(home + i*i) mod capacity`.
//! - `put` and `get` stop at the first slot that is not `Occupied`. `remove`
//!   only stops at `Empty` and walks over tombstones. Because `put` does not
//!   look past a tombstone, a key whose live slot sits beyond one is not seen
//!   and gets a second live slot; `remove` retires both.
//! - Every walk visits at most `capacity` positions. `i*i mod p` repeats with
//!   period `p`, so nothing new is reachable after that.
//!
//! Growth
//! - `put` doubles the capacity (rounded up to a prime) before placing an
//!   entry whenever the load factor is already >= 0.5. Tombstones are
//!   discarded by every resize.

use std::borrow::Cow;
use std::fmt;
use std::mem;

use log::{debug, trace};

use crate::error::ResizeError;
use crate::hash::{hash_function_1, HashFn, KeyHasher};
use crate::prime::{next_prime, prime_capacity};
use crate::reentrancy::DebugReentrancy;
use crate::table::{StringTable, DEFAULT_CAPACITY, GROWTH_FACTOR, MAX_LOAD_FACTOR};

#[derive(Clone, Debug, PartialEq)]
enum Slot<V> {
    Empty,
    Tombstone,
    Occupied { key: String, value: V },
}

fn empty_slots<V>(capacity: usize) -> Vec<Slot<V>> {
    (0..capacity).map(|_| Slot::Empty).collect()
}

/// Quadratic probe sequence over a table of `capacity` slots.
///
/// Offsets are kept reduced and advanced by `2i + 1`, so the walk never
/// squares a large index.
struct Probe {
    home: usize,
    offset: usize,
    i: usize,
    capacity: usize,
}

impl Probe {
    fn start(hash: u64, capacity: usize) -> Self {
        Probe {
            home: (hash % capacity as u64) as usize,
            offset: 0,
            i: 0,
            capacity,
        }
    }
}

impl Iterator for Probe {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.i == self.capacity {
            return None;
        }
        let index = (self.home + self.offset) % self.capacity;
        self.offset = (self.offset + 2 * self.i + 1) % self.capacity;
        self.i += 1;
        Some(index)
    }
}

/// Where `put` lands for a key.
enum Placement {
    /// Live slot already holding the key.
    Existing(usize),
    /// First `Empty` or `Tombstone` slot on the walk.
    Vacant(usize),
}

/// Slot storage and probing discipline. The hasher is passed in so the owning
/// map can hold its reentrancy guard while this layer mutates.
struct SlotArray<V> {
    slots: Vec<Slot<V>>,
    len: usize,
}

impl<V> SlotArray<V> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: empty_slots(capacity),
            len: 0,
        }
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn load(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    fn locate(&self, key: &str, hash: u64) -> Option<Placement> {
        for index in Probe::start(hash, self.capacity()) {
            match &self.slots[index] {
                Slot::Occupied { key: k, .. } if k == key => {
                    return Some(Placement::Existing(index));
                }
                Slot::Occupied { .. } => {}
                Slot::Empty | Slot::Tombstone => return Some(Placement::Vacant(index)),
            }
        }
        None
    }

    fn find(&self, key: &str, hash: u64) -> Option<&V> {
        for index in Probe::start(hash, self.capacity()) {
            match &self.slots[index] {
                Slot::Occupied { key: k, value } if k == key => return Some(value),
                Slot::Occupied { .. } => {}
                Slot::Empty | Slot::Tombstone => return None,
            }
        }
        None
    }

    fn insert<H: KeyHasher>(&mut self, hasher: &H, key: Cow<'_, str>, value: V) {
        if self.load() >= MAX_LOAD_FACTOR {
            trace!(
                "load {:.3} reached the limit; growing before insert",
                self.load()
            );
            self.grow(hasher);
        }
        let hash = hasher.hash_key(&key);
        loop {
            match self.locate(&key, hash) {
                Some(Placement::Existing(index)) => {
                    if let Slot::Occupied { value: v, .. } = &mut self.slots[index] {
                        *v = value;
                    }
                    return;
                }
                Some(Placement::Vacant(index)) => {
                    self.slots[index] = Slot::Occupied {
                        key: key.into_owned(),
                        value,
                    };
                    self.len += 1;
                    return;
                }
                // Only reachable if every probed slot is live, which the load
                // limit rules out; grow and retry rather than lose the entry.
                None => self.grow(hasher),
            }
        }
    }

    fn grow<H: KeyHasher>(&mut self, hasher: &H) {
        let target = self.capacity().saturating_mul(GROWTH_FACTOR);
        // Doubling never drops below len, so this cannot be rejected.
        let _ = self.resize(hasher, target);
    }

    /// Tombstones every live slot holding `key` on its probe walk.
    fn remove(&mut self, key: &str, hash: u64) -> usize {
        let mut removed = 0;
        for index in Probe::start(hash, self.capacity()) {
            match &self.slots[index] {
                Slot::Empty => break,
                Slot::Occupied { key: k, .. } if k == key => {
                    self.slots[index] = Slot::Tombstone;
                    self.len -= 1;
                    removed += 1;
                }
                Slot::Occupied { .. } | Slot::Tombstone => {}
            }
        }
        removed
    }

    fn resize<H: KeyHasher>(&mut self, hasher: &H, new_capacity: usize) -> Result<(), ResizeError> {
        if new_capacity < 1 {
            debug!("ignoring resize of quadratic table to 0 slots");
            return Err(ResizeError::ZeroCapacity);
        }
        if new_capacity < self.len {
            debug!(
                "ignoring resize of quadratic table to {} slots below {} live entries",
                new_capacity, self.len
            );
            return Err(ResizeError::BelowSize {
                requested: new_capacity,
                len: self.len,
            });
        }
        let capacity = prime_capacity(new_capacity);
        debug!(
            "resizing quadratic table: {} -> {} slots ({} live)",
            self.capacity(),
            capacity,
            self.len
        );
        let old = mem::replace(&mut self.slots, empty_slots(capacity));
        self.len = 0;
        for slot in old {
            if let Slot::Occupied { key, value } = slot {
                self.insert(hasher, Cow::Owned(key), value);
            }
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.slots = empty_slots(self.capacity());
        self.len = 0;
    }
}

/// Open-addressing string map with quadratic probing.
///
/// ```
/// use prime_hashmap::{hash_function_1, QuadraticMap};
///
/// let mut m = QuadraticMap::new(11, hash_function_1);
/// m.put("a", 1);
/// m.put("b", 2);
/// m.remove("a");
/// assert_eq!(m.get("a"), None);
/// assert_eq!(m.get("b"), Some(&2));
/// assert_eq!(m.capacity(), 11);
/// ```
pub struct QuadraticMap<V, H = HashFn> {
    table: SlotArray<V>,
    hasher: H,
    reentrancy: DebugReentrancy,
}

impl<V> QuadraticMap<V> {
    /// Map hashed by [`hash_function_1`].
    pub fn with_default_hasher(capacity: usize) -> Self {
        Self::new(capacity, hash_function_1 as HashFn)
    }
}

impl<V> Default for QuadraticMap<V> {
    fn default() -> Self {
        Self::with_default_hasher(DEFAULT_CAPACITY)
    }
}

/// Iterator over live `(key, value)` pairs in slot order.
pub struct Iter<'a, V> {
    it: std::slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.find_map(|slot| match slot {
            Slot::Occupied { key, value } => Some((key.as_str(), value)),
            Slot::Empty | Slot::Tombstone => None,
        })
    }
}

impl<V, H: KeyHasher> QuadraticMap<V, H> {
    /// Creates a map whose capacity is the next prime from `capacity`.
    pub fn new(capacity: usize, hash_function: H) -> Self {
        Self {
            table: SlotArray::with_capacity(next_prime(capacity)),
            hasher: hash_function,
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len
    }

    pub fn is_empty(&self) -> bool {
        self.table.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Inserts `key` or overwrites its value, growing first if the load
    /// factor is already at 0.5.
    pub fn put(&mut self, key: &str, value: V) {
        let _g = self.reentrancy.enter("put");
        self.table.insert(&self.hasher, Cow::Borrowed(key), value);
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let _g = self.reentrancy.enter("get");
        let hash = self.hasher.hash_key(key);
        self.table.find(key, hash)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Tombstones `key`. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) {
        let _g = self.reentrancy.enter("remove");
        let hash = self.hasher.hash_key(key);
        let removed = self.table.remove(key, hash);
        if removed > 1 {
            trace!("remove retired {} live slots for one key", removed);
        }
    }

    /// Empties every slot, tombstones included. Capacity is kept.
    pub fn clear(&mut self) {
        let _g = self.reentrancy.enter("clear");
        self.table.clear();
    }

    /// Slots that are neither live nor tombstoned.
    pub fn empty_buckets(&self) -> usize {
        self.table
            .slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Empty))
            .count()
    }

    pub fn table_load(&self) -> f64 {
        self.table.load()
    }

    /// Rehashes every live entry into a fresh array of `new_capacity` slots,
    /// rounded up to a prime.
    ///
    /// Rejected (and the map left untouched) when `new_capacity` is 0 or
    /// smaller than `len()`. Re-insertion follows the `put` discipline, so a
    /// target at or below twice `len()` grows again while rehashing.
    pub fn resize_table(&mut self, new_capacity: usize) -> Result<(), ResizeError> {
        let _g = self.reentrancy.enter("resize_table");
        self.table.resize(&self.hasher, new_capacity)
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.table.slots.iter(),
        }
    }

    pub fn get_keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        self.iter()
            .map(|(k, v)| (k.to_owned(), v.clone()))
            .collect()
    }

    /// `(empty, tombstone, occupied)` slot counts.
    #[cfg(test)]
    pub(crate) fn slot_census(&self) -> (usize, usize, usize) {
        self.table
            .slots
            .iter()
            .fold((0, 0, 0), |(e, t, o), slot| match slot {
                Slot::Empty => (e + 1, t, o),
                Slot::Tombstone => (e, t + 1, o),
                Slot::Occupied { .. } => (e, t, o + 1),
            })
    }
}

impl<V, H: KeyHasher> StringTable<V> for QuadraticMap<V, H> {
    fn len(&self) -> usize {
        QuadraticMap::len(self)
    }
    fn capacity(&self) -> usize {
        QuadraticMap::capacity(self)
    }
    fn put(&mut self, key: &str, value: V) {
        QuadraticMap::put(self, key, value)
    }
    fn get(&self, key: &str) -> Option<&V> {
        QuadraticMap::get(self, key)
    }
    fn remove(&mut self, key: &str) {
        QuadraticMap::remove(self, key)
    }
    fn clear(&mut self) {
        QuadraticMap::clear(self)
    }
    fn empty_buckets(&self) -> usize {
        QuadraticMap::empty_buckets(self)
    }
    fn table_load(&self) -> f64 {
        QuadraticMap::table_load(self)
    }
    fn resize_table(&mut self, new_capacity: usize) -> Result<(), ResizeError> {
        QuadraticMap::resize_table(self, new_capacity)
    }
    fn get_keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        QuadraticMap::get_keys_and_values(self)
    }
}

impl<V: fmt::Display, H> fmt::Display for QuadraticMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slot) in self.table.slots.iter().enumerate() {
            match slot {
                Slot::Empty => writeln!(f, "{i}: None")?,
                Slot::Tombstone => writeln!(f, "{i}: <tombstone>")?,
                Slot::Occupied { key, value } => writeln!(f, "{i}: {key}: {value}")?,
            }
        }
        Ok(())
    }
}

//! ChainedMap: separate chaining over a prime number of buckets.
//!
//! Storage
//! - Every node of every chain lives in one `SlotMap` arena owned by the map;
//!   a bucket is just the arena key of its chain head plus the chain length.
//!   Links are arena keys, so unlinking never touches raw pointers and a
//!   stale link cannot alias a node allocated later.
//! - New nodes go to the front of their chain. Updating a key unlinks its
//!   node and pushes it back at the front with the new value.
//!
//! Growth is caller driven: `put` never resizes, so the load factor can go
//! well above 1.0. `resize_table` relinks the existing nodes into the new
//! buckets without reallocating them.

use std::fmt;
use std::mem;

use log::debug;
use slotmap::{DefaultKey, SlotMap};

use crate::error::ResizeError;
use crate::hash::{hash_function_1, HashFn, KeyHasher};
use crate::prime::{next_prime, prime_capacity};
use crate::reentrancy::DebugReentrancy;
use crate::table::{StringTable, DEFAULT_CAPACITY};

#[derive(Debug)]
struct Node<V> {
    key: String,
    value: V,
    next: Option<DefaultKey>,
}

type Arena<V> = SlotMap<DefaultKey, Node<V>>;

/// Singly linked chain threaded through the arena.
#[derive(Clone, Copy, Debug, Default)]
struct Chain {
    head: Option<DefaultKey>,
    len: usize,
}

impl Chain {
    fn push_front<V>(&mut self, nodes: &mut Arena<V>, key: String, value: V) {
        let k = nodes.insert(Node {
            key,
            value,
            next: self.head,
        });
        self.head = Some(k);
        self.len += 1;
    }

    /// Moves an existing arena node to the front of this chain.
    fn link_front<V>(&mut self, nodes: &mut Arena<V>, k: DefaultKey) {
        nodes[k].next = self.head;
        self.head = Some(k);
        self.len += 1;
    }

    fn find<'a, V>(&self, nodes: &'a Arena<V>, key: &str) -> Option<&'a Node<V>> {
        self.iter(nodes).map(|(_, node)| node).find(|node| node.key == key)
    }

    /// Unlinks the node holding `key` and frees its arena slot.
    fn unlink<V>(&mut self, nodes: &mut Arena<V>, key: &str) -> Option<Node<V>> {
        let mut prev: Option<DefaultKey> = None;
        let mut cur = self.head;
        while let Some(k) = cur {
            let next = nodes[k].next;
            if nodes[k].key == key {
                match prev {
                    None => self.head = next,
                    Some(p) => nodes[p].next = next,
                }
                self.len -= 1;
                return nodes.remove(k);
            }
            prev = Some(k);
            cur = next;
        }
        None
    }

    fn iter<'a, V>(&self, nodes: &'a Arena<V>) -> ChainIter<'a, V> {
        ChainIter {
            nodes,
            cur: self.head,
        }
    }
}

struct ChainIter<'a, V> {
    nodes: &'a Arena<V>,
    cur: Option<DefaultKey>,
}

impl<'a, V> Iterator for ChainIter<'a, V> {
    type Item = (DefaultKey, &'a Node<V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        let nodes = self.nodes;
        let node = &nodes[k];
        self.cur = node.next;
        Some((k, node))
    }
}

#[inline]
fn bucket_for<H: KeyHasher>(hasher: &H, key: &str, capacity: usize) -> usize {
    (hasher.hash_key(key) % capacity as u64) as usize
}

/// Separate-chaining string map.
///
/// ```
/// use prime_hashmap::ChainedMap;
///
/// let mut m: ChainedMap<i32> = ChainedMap::default();
/// for i in 0..100 {
///     m.put(&format!("key{i}"), i);
/// }
/// assert_eq!(m.capacity(), 11);
/// assert!(m.table_load() > 1.0);
/// assert_eq!(m.get("key42"), Some(&42));
/// ```
pub struct ChainedMap<V, H = HashFn> {
    buckets: Vec<Chain>,
    nodes: Arena<V>,
    len: usize,
    hasher: H,
    reentrancy: DebugReentrancy,
}

impl<V> ChainedMap<V> {
    /// Map hashed by [`hash_function_1`].
    pub fn with_default_hasher(capacity: usize) -> Self {
        Self::new(capacity, hash_function_1 as HashFn)
    }
}

impl<V> Default for ChainedMap<V> {
    fn default() -> Self {
        Self::with_default_hasher(DEFAULT_CAPACITY)
    }
}

/// Iterator over `(key, value)` pairs, buckets ascending, chain order within
/// a bucket.
pub struct Iter<'a, V> {
    buckets: std::slice::Iter<'a, Chain>,
    chain: ChainIter<'a, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((_, node)) = self.chain.next() {
                return Some((node.key.as_str(), &node.value));
            }
            let chain = self.buckets.next()?;
            self.chain.cur = chain.head;
        }
    }
}

impl<V, H: KeyHasher> ChainedMap<V, H> {
    /// Creates a map whose capacity is the next prime from `capacity`.
    pub fn new(capacity: usize, hash_function: H) -> Self {
        Self {
            buckets: vec![Chain::default(); next_prime(capacity)],
            nodes: SlotMap::with_key(),
            len: 0,
            hasher: hash_function,
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Inserts `key` at the front of its chain, or moves it there with the
    /// new value if it is already present. Never resizes.
    pub fn put(&mut self, key: &str, value: V) {
        let _g = self.reentrancy.enter("put");
        let index = bucket_for(&self.hasher, key, self.buckets.len());
        let chain = &mut self.buckets[index];
        match chain.unlink(&mut self.nodes, key) {
            Some(old) => chain.push_front(&mut self.nodes, old.key, value),
            None => {
                chain.push_front(&mut self.nodes, key.to_owned(), value);
                self.len += 1;
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let _g = self.reentrancy.enter("get");
        let index = bucket_for(&self.hasher, key, self.buckets.len());
        self.buckets[index]
            .find(&self.nodes, key)
            .map(|node| &node.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Unlinks `key`; absent keys are a no-op.
    pub fn remove(&mut self, key: &str) {
        let _g = self.reentrancy.enter("remove");
        let index = bucket_for(&self.hasher, key, self.buckets.len());
        if self.buckets[index].unlink(&mut self.nodes, key).is_some() {
            self.len -= 1;
        }
    }

    /// Empties every chain. Capacity is kept.
    pub fn clear(&mut self) {
        let _g = self.reentrancy.enter("clear");
        self.nodes.clear();
        self.buckets = vec![Chain::default(); self.buckets.len()];
        self.len = 0;
    }

    /// Buckets whose chain is empty.
    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|chain| chain.len == 0).count()
    }

    pub fn table_load(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Redistributes every node over `new_capacity` buckets, rounded up to a
    /// prime.
    ///
    /// Only a zero capacity is rejected; shrinking below `len()` is allowed
    /// since chains have no per-bucket limit. Old buckets are walked in
    /// ascending order and each node is pushed onto the front of its new
    /// chain, the same order repeated `put` calls would produce.
    pub fn resize_table(&mut self, new_capacity: usize) -> Result<(), ResizeError> {
        let _g = self.reentrancy.enter("resize_table");
        if new_capacity < 1 {
            debug!("ignoring resize of chained table to 0 buckets");
            return Err(ResizeError::ZeroCapacity);
        }
        let capacity = prime_capacity(new_capacity);
        debug!(
            "resizing chained table: {} -> {} buckets ({} entries)",
            self.buckets.len(),
            capacity,
            self.len
        );
        let old = mem::replace(&mut self.buckets, vec![Chain::default(); capacity]);
        for chain in &old {
            let order: Vec<DefaultKey> = chain.iter(&self.nodes).map(|(k, _)| k).collect();
            for k in order {
                let index = bucket_for(&self.hasher, &self.nodes[k].key, capacity);
                self.buckets[index].link_front(&mut self.nodes, k);
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: ChainIter {
                nodes: &self.nodes,
                cur: None,
            },
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
}

impl<V, H: KeyHasher> StringTable<V> for ChainedMap<V, H> {
    fn len(&self) -> usize {
        ChainedMap::len(self)
    }
    fn capacity(&self) -> usize {
        ChainedMap::capacity(self)
    }
    fn put(&mut self, key: &str, value: V) {
        ChainedMap::put(self, key, value)
    }
    fn get(&self, key: &str) -> Option<&V> {
        ChainedMap::get(self, key)
    }
    fn remove(&mut self, key: &str) {
        ChainedMap::remove(self, key)
    }
    fn clear(&mut self) {
        ChainedMap::clear(self)
    }
    fn empty_buckets(&self) -> usize {
        ChainedMap::empty_buckets(self)
    }
    fn table_load(&self) -> f64 {
        ChainedMap::table_load(self)
    }
    fn resize_table(&mut self, new_capacity: usize) -> Result<(), ResizeError> {
        ChainedMap::resize_table(self, new_capacity)
    }
    fn get_keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        ChainedMap::get_keys_and_values(self)
    }
}

impl<V: fmt::Display, H> fmt::Display for ChainedMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chain) in self.buckets.iter().enumerate() {
            write!(f, "{i}: [")?;
            for (n, (_, node)) in chain.iter(&self.nodes).enumerate() {
                if n > 0 {
                    f.write_str(" -> ")?;
                }
                write!(f, "{}: {}", node.key, node.value)?;
            }
            f.write_str("]\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_function_2;
    use crate::prime::is_prime;

    fn collide(_: &str) -> u64 {
        0
    }

    fn keys<H: KeyHasher>(m: &ChainedMap<i32, H>) -> Vec<String> {
        m.iter().map(|(k, _)| k.to_string()).collect()
    }

    /// Invariant: new nodes go to the chain front; an update moves the node
    /// to the front without changing len.
    #[test]
    fn update_moves_node_to_front() {
        let mut m = ChainedMap::new(11, collide);
        m.put("a", 1);
        m.put("b", 2);
        m.put("c", 3);
        assert_eq!(keys(&m), vec!["c", "b", "a"]);

        m.put("a", 10);
        assert_eq!(m.len(), 3);
        assert_eq!(keys(&m), vec!["a", "c", "b"]);
        assert_eq!(m.get("a"), Some(&10));
        assert_eq!(m.buckets[0].len, 3);
    }

    /// Invariant: unlinking from the head, middle and tail keeps the chain intact
    /// and frees the arena slot.
    #[test]
    fn unlink_head_middle_tail() {
        let mut m = ChainedMap::new(11, collide);
        for (i, k) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            m.put(k, i as i32);
        }
        m.remove("e"); // head
        m.remove("c"); // middle
        m.remove("a"); // tail
        assert_eq!(keys(&m), vec!["d", "b"]);
        assert_eq!(m.len(), 2);
        assert_eq!(m.nodes.len(), 2);
        assert_eq!(m.buckets[0].len, 2);

        m.remove("zzz");
        assert_eq!(m.len(), 2);
    }

    /// Invariant: resize re-inserts old buckets ascending and chain order within
    /// each, so a single chain comes out reversed.
    #[test]
    fn resize_relinks_in_put_order() {
        let mut m = ChainedMap::new(11, collide);
        m.put("a", 1);
        m.put("b", 2);
        m.put("c", 3);
        let arena_before: Vec<DefaultKey> = m.nodes.keys().collect();

        m.resize_table(4).unwrap();
        assert_eq!(m.capacity(), 5);
        assert_eq!(keys(&m), vec!["a", "b", "c"]);
        // Nodes are relinked, not reallocated.
        let arena_after: Vec<DefaultKey> = m.nodes.keys().collect();
        assert_eq!(arena_before, arena_after);
    }

    /// Invariant: chained resize accepts capacities below len; only zero is rejected.
    #[test]
    fn resize_below_len_is_allowed() {
        let mut m = ChainedMap::new(53, hash_function_2);
        for i in 0..20 {
            m.put(&format!("k{i}"), i);
        }
        assert_eq!(m.resize_table(0), Err(ResizeError::ZeroCapacity));
        assert_eq!(m.capacity(), 53);

        m.resize_table(2).unwrap();
        assert_eq!(m.capacity(), 2);
        assert_eq!(m.len(), 20);
        assert!(m.table_load() >= 10.0);
        for i in 0..20 {
            assert_eq!(m.get(&format!("k{i}")), Some(&i));
        }
        assert!(is_prime(m.capacity()));
    }

    #[test]
    fn clear_releases_nodes() {
        let mut m = ChainedMap::with_default_hasher(7);
        for i in 0..30 {
            m.put(&format!("key{i}"), i);
        }
        m.clear();
        assert_eq!(m.len(), 0);
        assert_eq!(m.capacity(), 7);
        assert_eq!(m.empty_buckets(), 7);
        assert!(m.nodes.is_empty());
        m.put("key1", 1);
        assert_eq!(m.get("key1"), Some(&1));
    }

    #[test]
    fn display_shows_chains() {
        let mut m = ChainedMap::new(3, |key: &str| key.len() as u64);
        m.put("a", 1);
        m.put("bb", 2);
        m.put("c", 3);
        assert_eq!(m.to_string(), "0: []\n1: [c: 3 -> a: 1]\n2: [bb: 2]\n");
    }
}

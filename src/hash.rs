//! Key hashing seam shared by both tables.

use core::hash::BuildHasher;
use hashbrown::hash_map::DefaultHashBuilder;

/// Maps a string key to a non-negative integer.
///
/// Tables reduce the result modulo their (prime) capacity, so the
/// function only needs to be deterministic for the lifetime of a table.
pub trait KeyHasher {
    fn hash_key(&self, key: &str) -> u64;
}

impl<F> KeyHasher for F
where
    F: Fn(&str) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        self(key)
    }
}

/// Function-pointer form of a key hasher; the default `H` of both tables.
pub type HashFn = fn(&str) -> u64;

/// Sum of the key's code points.
///
/// Anagrams collide, which makes it handy for exercising collision paths.
pub fn hash_function_1(key: &str) -> u64 {
    key.chars()
        .fold(0u64, |hash, c| hash.wrapping_add(u64::from(c)))
}

/// Position-weighted sum of the key's code points: the character at
/// index `i` contributes `(i + 1) * code_point`.
pub fn hash_function_2(key: &str) -> u64 {
    key.chars().enumerate().fold(0u64, |hash, (i, c)| {
        hash.wrapping_add((i as u64 + 1).wrapping_mul(u64::from(c)))
    })
}

/// Adapts any [`BuildHasher`] into a [`KeyHasher`].
///
/// The builder must produce identical hashers on every call (as
/// `BuildHasherDefault` does); a randomly seeded builder is fine as long as
/// it is seeded once and then moved into the table.
#[derive(Clone, Debug, Default)]
pub struct BuildKeyHasher<S = DefaultHashBuilder> {
    builder: S,
}

impl<S> BuildKeyHasher<S> {
    pub fn new(builder: S) -> Self {
        Self { builder }
    }
}

impl<S: BuildHasher> KeyHasher for BuildKeyHasher<S> {
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        self.builder.hash_one(key)
    }
}

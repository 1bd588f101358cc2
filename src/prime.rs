//! Prime sizing for bucket arrays.
//!
//! Both tables keep their capacity prime. A prime modulus spreads the
//! weak stock hash functions more evenly, and for quadratic probing it
//! guarantees that the first `(p + 1) / 2` probe positions are distinct.

/// Returns true if `n` is prime.
///
/// 2 and 3 are prime; 0, 1 and every other even number are not. Anything
/// else is trial-divided by odd factors up to `sqrt(n)`.
pub fn is_prime(n: usize) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n < 2 || n % 2 == 0 {
        return false;
    }
    let mut factor = 3usize;
    while factor.saturating_mul(factor) <= n {
        if n % factor == 0 {
            return false;
        }
        factor += 2;
    }
    true
}

/// Smallest odd prime reachable from `n`.
///
/// An even `n` is bumped to the next odd value first, then the search
/// walks odd numbers. Note that this means `next_prime(2) == 3`.
pub fn next_prime(n: usize) -> usize {
    let mut candidate = if n % 2 == 0 { n + 1 } else { n };
    while !is_prime(candidate) {
        candidate += 2;
    }
    candidate
}

/// Capacity actually used for a requested capacity: kept as-is when it is
/// already prime, otherwise rounded up with [`next_prime`].
pub(crate) fn prime_capacity(requested: usize) -> usize {
    if is_prime(requested) {
        requested
    } else {
        next_prime(requested)
    }
}

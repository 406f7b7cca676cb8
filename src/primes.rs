//! Prime sizing for the bucket array.
//!
//! Double hashing probes with a stride derived from the secondary hash;
//! keeping the bucket count prime makes every nonzero stride coprime
//! with it, so a probe sequence covers the whole array before cycling.

/// Trial-division primality check. Intended for bucket-count sizing,
/// where candidates are small (they grow by doubling from the base
/// size), not for cryptographic use.
pub(crate) fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Smallest prime >= `n`. For `n <= 2` this is 2.
pub(crate) fn next_prime(n: usize) -> usize {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

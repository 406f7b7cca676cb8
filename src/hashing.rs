//! Polynomial string hashing and the double-hashing probe sequence.
//!
//! Two independent hashes of the key are combined into a per-key probe
//! order: the primary hash picks the starting bucket and the secondary
//! hash (plus one, so it is never zero) is the stride between probes.
//! With a prime bucket count, any stride not divisible by the count
//! walks every bucket exactly once before repeating.

/// Primary polynomial base. Both bases are primes larger than the
/// ASCII alphabet, so distinct short keys rarely agree on a hash; this
/// is the classic 131/151 pair.
const PRIME_BASE_A: u64 = 131;

/// Secondary polynomial base, distinct from the primary so the two
/// hashes disagree on colliding keys.
const PRIME_BASE_B: u64 = 151;

/// Polynomial rolling hash of `s` over `base`, reduced mod `modulus`.
///
/// Horner form of `Σ s[i] * base^(len-1-i) mod modulus`: the
/// accumulator is reduced every step, so intermediate values stay
/// below `modulus * base + 255` and never overflow u64 for any
/// realistic bucket count.
fn poly_hash(s: &str, base: u64, modulus: u64) -> u64 {
    s.bytes()
        .fold(0u64, |acc, b| (acc * base + u64::from(b)) % modulus)
}

/// Bucket index for `key` on probe number `attempt` in a table of
/// `bucket_count` buckets:
///
/// ```text
/// index(attempt) = (hash_a + attempt * (hash_b + 1)) mod bucket_count
/// ```
///
/// The `+ 1` keeps the stride nonzero. One degenerate case survives:
/// `hash_b == bucket_count - 1` makes the stride a multiple of the
/// bucket count, pinning every attempt to the same index. Callers
/// bound their scans to `bucket_count` attempts to stay finite there.
pub(crate) fn probe_index(key: &str, bucket_count: usize, attempt: usize) -> usize {
    let m = bucket_count as u64;
    let hash_a = poly_hash(key, PRIME_BASE_A, m);
    let hash_b = poly_hash(key, PRIME_BASE_B, m);
    // u128 keeps attempt * stride exact for any usize bucket count.
    let idx = (u128::from(hash_a) + attempt as u128 * u128::from(hash_b + 1)) % u128::from(m);
    idx as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Invariant: the hash is deterministic and bounded by the modulus.
    #[test]
    fn hash_is_deterministic_and_in_range() {
        for key in ["", "a", "cat", "hello world", "ħęľłø"] {
            let h1 = poly_hash(key, PRIME_BASE_A, 53);
            let h2 = poly_hash(key, PRIME_BASE_A, 53);
            assert_eq!(h1, h2);
            assert!(h1 < 53);
        }
    }

    /// Invariant: Horner accumulation equals the positional polynomial
    /// it is folding.
    #[test]
    fn horner_matches_positional_polynomial() {
        let key = "cat";
        let m = 101u64;
        let mut expected = 0u64;
        let bytes: Vec<u64> = key.bytes().map(u64::from).collect();
        for (i, &b) in bytes.iter().enumerate() {
            let mut power = 1u64;
            for _ in 0..(bytes.len() - 1 - i) {
                power = power * PRIME_BASE_A % m;
            }
            expected = (expected + b * power) % m;
        }
        assert_eq!(poly_hash(key, PRIME_BASE_A, m), expected);
    }

    /// Invariant: attempt 0 is the primary hash and consecutive
    /// attempts differ by the secondary-hash stride (mod bucket count).
    #[test]
    fn probe_stride_is_fixed() {
        let key = "stride-check";
        let m = 53;
        let first = probe_index(key, m, 0);
        assert_eq!(first, poly_hash(key, PRIME_BASE_A, m as u64) as usize);

        let stride = (probe_index(key, m, 1) + m - first) % m;
        assert_eq!(stride as u64, (poly_hash(key, PRIME_BASE_B, m as u64) + 1) % m as u64);
        for attempt in 1..m {
            let prev = probe_index(key, m, attempt - 1);
            let cur = probe_index(key, m, attempt);
            assert_eq!((cur + m - prev) % m, stride);
        }
    }

    /// Invariant: over a prime bucket count, the first `m` attempts
    /// for a key visit `m` distinct indices whenever the stride is not
    /// a multiple of `m`; statistically, nearly all keys. Checked on
    /// a generated corpus; keys hitting the degenerate stride are
    /// counted and must be rare.
    #[test]
    fn probe_sequence_permutes_prime_table() {
        let m = 53;
        let mut degenerate = 0u32;
        let total = 500;
        for n in 0..total {
            let key = format!("key-{n:04}");
            let seen: BTreeSet<usize> = (0..m).map(|a| probe_index(&key, m, a)).collect();
            if seen.len() == m {
                continue;
            }
            // Non-permutation implies the degenerate stride, which
            // pins the whole sequence to one index.
            assert_eq!(seen.len(), 1, "partial coverage for {key}");
            degenerate += 1;
        }
        assert!(
            degenerate <= total / 20,
            "degenerate strides should be rare, got {degenerate}/{total}"
        );
    }

    /// Invariant: the two bases disagree. Keys colliding on the
    /// primary hash should mostly split on the secondary, otherwise
    /// double hashing degrades to linear probing.
    #[test]
    fn secondary_hash_splits_primary_collisions() {
        let m = 53u64;
        let mut primary_buckets: std::collections::HashMap<u64, Vec<String>> =
            std::collections::HashMap::new();
        for n in 0..2000 {
            let key = format!("k{n}");
            primary_buckets
                .entry(poly_hash(&key, PRIME_BASE_A, m))
                .or_default()
                .push(key);
        }
        let mut colliding_pairs = 0u32;
        let mut split_pairs = 0u32;
        for keys in primary_buckets.values() {
            for pair in keys.windows(2) {
                colliding_pairs += 1;
                if poly_hash(&pair[0], PRIME_BASE_B, m) != poly_hash(&pair[1], PRIME_BASE_B, m) {
                    split_pairs += 1;
                }
            }
        }
        assert!(colliding_pairs > 0, "corpus too small to collide");
        assert!(
            split_pairs * 10 >= colliding_pairs * 9,
            "secondary hash split only {split_pairs}/{colliding_pairs} primary collisions"
        );
    }
}

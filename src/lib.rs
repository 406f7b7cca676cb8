//! oa-hashmap: a single-threaded, string-keyed map built on open
//! addressing with double hashing, tombstone deletion, and prime-sized
//! bucket arrays.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the interesting machinery (the hash family, the probe
//!   sequence, deletion via tombstones, and load-factor resizing) in
//!   small layers that can be reasoned about independently.
//! - Layers:
//!   - primes: prime sizing oracle (`next_prime`) so the bucket count
//!     is always prime and nonzero probe strides cover every slot.
//!   - hashing: two polynomial string hashes over distinct prime
//!     bases, combined into the double-hashing probe index
//!     `(h_a + attempt * (h_b + 1)) mod bucket_count`.
//!   - item_store: owned key/value pairs in a slotmap; stable keys
//!     decouple item storage from the bucket index, so a resize
//!     rebuilds the index without moving or cloning any string.
//!   - table: `OaHashMap`: the bucket array, probing, and the
//!     resize-up / resize-down protocol.
//!
//! Constraints
//! - Single-threaded; callers serialize access, there is no internal
//!   locking.
//! - Keys and values are owned `String`s; no generic key support.
//! - Bucket count is always prime and never shrinks below the prime
//!   for the construction-time capacity.
//! - Iteration order is arbitrary.
//!
//! Probing and deletion
//! - A probe sequence stops at the first `Empty` bucket; `Tombstone`
//!   buckets (left by removals) are stepped over, so keys stored past
//!   a deletion hole stay reachable. Inserts reuse the first free
//!   bucket, empty or tombstoned, on their path.
//! - Resize-up triggers above 70% load before an insert; resize-down
//!   below 10% load before a removal. Both re-derive the bucket count
//!   from a doubled/halved logical base size via the prime oracle and
//!   re-probe every live item against the new modulus.
//!
//! Why this split?
//! - Localize invariants: the oracle and hash engine are pure
//!   functions; only `table` mutates state.
//! - The store owns allocation and teardown; the table owns placement
//!   and bookkeeping, and never frees through a dangling bucket
//!   reference (slotmap keys are generational).
//!
//! Notes and non-goals
//! - No ordered iteration, no persistence, no generic `K`/`V`.
//! - Probe sequences are a permutation of the bucket indices for
//!   almost all keys; the one degenerate stride (secondary hash equal
//!   to `bucket_count - 1`) is contained by bounding every scan to one
//!   full cycle.

mod hashing;
mod item_store;
mod primes;
mod table;
mod table_proptest;

// Public surface
pub use table::OaHashMap;

//! Table core: the bucket array, probing, and resize orchestration.

use crate::hashing::probe_index;
use crate::item_store::{ItemKey, ItemStore};
use crate::primes::next_prime;

/// Default logical capacity target; the first bucket array is
/// `next_prime(50) == 53` slots.
pub(crate) const INITIAL_BASE_SIZE: usize = 50;

/// Resize up when live entries exceed this percentage of the buckets.
const MAX_LOAD_PERCENT: usize = 70;

/// Resize down when live entries fall under this percentage.
const MIN_LOAD_PERCENT: usize = 10;

/// One slot of the bucket array. `Tombstone` marks a slot that held an
/// item before a removal: probes must continue past it (a key inserted
/// later in the same sequence may live beyond), while `Empty` means the
/// sequence never reached further and terminates a search.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Bucket {
    Empty,
    Tombstone,
    Occupied(ItemKey),
}

/// A string-keyed, string-valued map using open addressing with double
/// hashing over a prime-sized bucket array.
///
/// `base_size` is the logical capacity target; the bucket count is the
/// next prime at or above it, so repeated doubling/halving cycles stay
/// numerically stable instead of drifting through prime gaps. The
/// bucket count can exceed `next_prime(base_size)` only after a
/// degenerate-stride rebuild (see [`OaHashMap::resize`]).
#[derive(Debug)]
pub struct OaHashMap {
    buckets: Vec<Bucket>,
    items: ItemStore,
    base_size: usize,
    // Floor for resize-down, captured at construction.
    min_base_size: usize,
    count: usize,
}

impl OaHashMap {
    /// Creates an empty map with the default 53-bucket array.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_BASE_SIZE)
    }

    /// Creates an empty map whose bucket array holds at least
    /// `capacity` slots (rounded up to a prime). The given capacity is
    /// also the floor below which the map never shrinks.
    pub fn with_capacity(capacity: usize) -> Self {
        let base_size = capacity.max(1);
        Self {
            buckets: vec![Bucket::Empty; next_prime(base_size)],
            items: ItemStore::new(),
            base_size,
            min_base_size: base_size,
            count: 0,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Current bucket count. Always prime.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn load_percent(&self) -> usize {
        self.count * 100 / self.buckets.len()
    }

    /// Inserts a key/value pair. If the key is already reachable along
    /// its probe sequence, the value is overwritten in place and the
    /// old value returned; otherwise the pair lands in the first free
    /// (empty or tombstoned) bucket and `None` is returned.
    ///
    /// The scan is a single forward probe sequence that stops at the
    /// first match or first free slot. A matching entry reachable only
    /// beyond a free slot is shadowed, not reconciled; searches then
    /// find the newer entry first, so last-write-wins still holds for
    /// lookups.
    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        if self.load_percent() > MAX_LOAD_PERCENT {
            self.resize(self.base_size * 2);
        }
        loop {
            let size = self.buckets.len();
            for attempt in 0..size {
                let idx = probe_index(&key, size, attempt);
                match self.buckets[idx] {
                    Bucket::Empty | Bucket::Tombstone => {
                        let item = self.items.alloc(key, value);
                        self.buckets[idx] = Bucket::Occupied(item);
                        self.count += 1;
                        return None;
                    }
                    Bucket::Occupied(item) => {
                        if let Some(slot) = self.items.get_mut(item) {
                            if slot.key == key {
                                return Some(std::mem::replace(&mut slot.value, value));
                            }
                        }
                    }
                }
            }
            // Full cycle with no free slot: only reachable through the
            // degenerate stride (hash_b + 1 a multiple of the bucket
            // count). A larger modulus changes the stride.
            self.resize(self.base_size * 2);
        }
    }

    /// Looks up the value for `key`. Probing stops at the first empty
    /// bucket; tombstones are skipped over.
    pub fn get(&self, key: &str) -> Option<&str> {
        let size = self.buckets.len();
        for attempt in 0..size {
            match self.buckets[probe_index(key, size, attempt)] {
                Bucket::Empty => return None,
                Bucket::Tombstone => continue,
                Bucket::Occupied(item) => {
                    if let Some(slot) = self.items.get(item) {
                        if slot.key == key {
                            return Some(&slot.value);
                        }
                    }
                }
            }
        }
        None
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key`, leaving a tombstone so probe sequences that pass
    /// through the slot still reach entries stored beyond it. Returns
    /// the removed value, or `None` if the key was absent.
    ///
    /// A miss returns `None` and leaves the entry count untouched, so
    /// repeated removals of absent keys cannot skew the load factor.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        if self.load_percent() < MIN_LOAD_PERCENT {
            self.resize(self.base_size / 2);
        }
        let size = self.buckets.len();
        for attempt in 0..size {
            let idx = probe_index(key, size, attempt);
            match self.buckets[idx] {
                Bucket::Empty => return None,
                Bucket::Tombstone => continue,
                Bucket::Occupied(item) => {
                    if self.items.get(item).is_some_and(|slot| slot.key == key) {
                        self.buckets[idx] = Bucket::Tombstone;
                        self.count -= 1;
                        return self.items.free(item).map(|slot| slot.value);
                    }
                }
            }
        }
        None
    }

    /// Iterates over live entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items
            .iter()
            .map(|(_, item)| (item.key.as_str(), item.value.as_str()))
    }

    /// Rebuilds the bucket index for a new logical size. No-op below
    /// the construction-time floor. Items stay in place in the store;
    /// only their bucket positions are recomputed against the new
    /// modulus (probe sequences are size-dependent). Tombstones do not
    /// survive a rebuild.
    fn resize(&mut self, new_base_size: usize) {
        if new_base_size < self.min_base_size {
            return;
        }
        let mut new_size = next_prime(new_base_size);
        let new_buckets = loop {
            match Self::build_index(&self.items, new_size) {
                Some(buckets) => break buckets,
                // An item's stride was a multiple of new_size and its
                // start slot taken; the next prime changes every stride.
                None => new_size = next_prime(new_size + 1),
            }
        };
        self.buckets = new_buckets;
        self.base_size = new_base_size;
        debug_assert_eq!(self.count, self.items.len());
    }

    /// Probes every live item into a fresh array of `size` buckets.
    /// Returns `None` if some item's bounded probe sequence found no
    /// empty slot (degenerate stride), in which case the caller picks
    /// a different size.
    fn build_index(items: &ItemStore, size: usize) -> Option<Vec<Bucket>> {
        let mut buckets = vec![Bucket::Empty; size];
        'items: for (item_key, item) in items.iter() {
            for attempt in 0..size {
                let idx = probe_index(&item.key, size, attempt);
                if buckets[idx] == Bucket::Empty {
                    buckets[idx] = Bucket::Occupied(item_key);
                    continue 'items;
                }
            }
            return None;
        }
        Some(buckets)
    }
}

impl Default for OaHashMap {
    fn default() -> Self {
        Self::new()
    }
}

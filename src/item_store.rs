//! ItemStore: owned key/value storage behind stable keys.
//!
//! Items live in a slotmap; buckets refer to them by `ItemKey`. A
//! resize replaces only the bucket index, so the strings are never
//! moved or cloned and keys handed to the new index stay valid.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub(crate) struct ItemKey;
}

/// One owned key/value pair. Identity is the key alone; the value is
/// payload.
#[derive(Debug)]
pub(crate) struct Item {
    pub(crate) key: String,
    pub(crate) value: String,
}

#[derive(Debug, Default)]
pub(crate) struct ItemStore {
    slots: SlotMap<ItemKey, Item>,
}

impl ItemStore {
    pub(crate) fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
        }
    }

    /// Take ownership of a pair and return its stable key.
    pub(crate) fn alloc(&mut self, key: String, value: String) -> ItemKey {
        self.slots.insert(Item { key, value })
    }

    /// Release an item, returning it to the caller. `None` only for a
    /// key that was already freed, which the table never does.
    pub(crate) fn free(&mut self, item: ItemKey) -> Option<Item> {
        self.slots.remove(item)
    }

    pub(crate) fn get(&self, item: ItemKey) -> Option<&Item> {
        self.slots.get(item)
    }

    pub(crate) fn get_mut(&mut self, item: ItemKey) -> Option<&mut Item> {
        self.slots.get_mut(item)
    }

    /// Number of live items; the table's `count` must always agree.
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (ItemKey, &Item)> {
        self.slots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: alloc/free round-trips ownership of both strings.
    #[test]
    fn alloc_then_free_returns_the_pair() {
        let mut store = ItemStore::new();
        let k = store.alloc("cat".to_string(), "feline".to_string());
        assert_eq!(store.len(), 1);

        let item = store.free(k).expect("live item");
        assert_eq!(item.key, "cat");
        assert_eq!(item.value, "feline");
        assert_eq!(store.len(), 0);
        assert!(store.get(k).is_none(), "freed key must not resolve");
    }

    /// Invariant: a freed key stays dead even after the physical slot
    /// is reused (generational keys), so a stale bucket entry can
    /// never alias a newer item.
    #[test]
    fn stale_key_does_not_alias_reused_slot() {
        let mut store = ItemStore::new();
        let k1 = store.alloc("old".to_string(), "1".to_string());
        store.free(k1);
        let k2 = store.alloc("new".to_string(), "2".to_string());
        assert_ne!(k1, k2);
        assert!(store.get(k1).is_none());
        assert_eq!(store.get(k2).map(|i| i.key.as_str()), Some("new"));
    }

    /// Invariant: in-place mutation through `get_mut` is visible to
    /// later reads without changing the item's key.
    #[test]
    fn value_overwrite_in_place() {
        let mut store = ItemStore::new();
        let k = store.alloc("k".to_string(), "v1".to_string());
        store.get_mut(k).expect("live item").value = "v2".to_string();
        assert_eq!(store.get(k).map(|i| i.value.as_str()), Some("v2"));
        assert_eq!(store.get(k).map(|i| i.key.as_str()), Some("k"));
    }
}

//! Removal: tombstoning single entries and whole batches.

use std::hash::Hash;

use crate::key::{CompositeKey, Parts};
use crate::ops::compact;
use crate::store::Store;

/// Removes the entry stored under `key`, then checks the compaction
/// thresholds. Returns the removed value.
pub fn remove_key<K, V>(store: &mut Store<K, V>, key: &CompositeKey<K>) -> Option<V>
where
    K: Hash + Eq,
{
    let slot = store.full.get(key).copied()?;
    let value = release(store, slot);
    compact::check_compact(store);
    value
}

/// Removes every slot in `slots`, then checks the compaction thresholds
/// once for the whole batch. Returns how many entries were removed.
pub fn remove_slots<K, V>(store: &mut Store<K, V>, slots: &[usize]) -> usize
where
    K: Hash + Eq,
{
    let removed = release_all(store, slots);
    compact::check_compact(store);
    removed
}

/// Tombstones every slot in `slots` without checking the thresholds.
pub fn release_all<K, V>(store: &mut Store<K, V>, slots: &[usize]) -> usize
where
    K: Hash + Eq,
{
    slots
        .iter()
        .filter(|&&slot| release(store, slot).is_some())
        .count()
}

/// Tombstones one live slot.
///
/// The full key is rebuilt from the slot's stored components, so callers
/// only need the position. Dropping the slot from the per-dimension sets also
/// drops it from every slice constraint over those sets.
fn release<K, V>(store: &mut Store<K, V>, slot: usize) -> Option<V>
where
    K: Hash + Eq,
{
    if !store.is_live(slot) {
        return None;
    }
    let parts = store
        .columns
        .iter_mut()
        .map(|column| column.get_mut(slot).and_then(Option::take))
        .collect::<Option<Parts<K>>>()?;
    for (dim, part) in parts.iter().enumerate() {
        store.dims[dim].remove(part, slot);
    }
    store.full.remove(&CompositeKey::new(parts));
    store.tombstones.insert(slot);
    store.values[slot].take()
}

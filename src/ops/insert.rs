//! Insertion: slot allocation and index registration.

use std::hash::Hash;

use crate::key::CompositeKey;
use crate::store::Store;

/// Writes `value` under `key`, overwriting in place if the key exists.
/// Returns the previous value.
///
/// An overwrite keeps the slot, so no index needs touching.
pub fn upsert<K, V>(store: &mut Store<K, V>, key: CompositeKey<K>, value: V) -> Option<V>
where
    K: Hash + Eq + Clone,
{
    if let Some(&slot) = store.full.get(&key) {
        return store.values[slot].replace(value);
    }
    insert_new(store, key, value);
    None
}

/// Stores an entry whose key is known to be absent and returns its slot.
///
/// The slot is registered in every per-dimension index. Slices share those
/// sets, so every view whose fixed components match sees the entry at once.
pub fn insert_new<K, V>(store: &mut Store<K, V>, key: CompositeKey<K>, value: V) -> usize
where
    K: Hash + Eq + Clone,
{
    debug_assert_eq!(key.arity(), store.arity());
    let slot = allocate(store);
    store.values[slot] = Some(value);
    for (dim, part) in key.parts().iter().enumerate() {
        store.columns[dim][slot] = Some(part.clone());
        store.dims[dim].insert(part.clone(), slot);
    }
    store.full.insert(key, slot);
    slot
}

/// Reuses the lowest tombstoned slot, or appends a fresh one.
fn allocate<K, V>(store: &mut Store<K, V>) -> usize {
    if let Some(slot) = store.tombstones.pop_first() {
        return slot;
    }
    store.values.push(None);
    for column in &mut store.columns {
        column.push(None);
    }
    store.values.len() - 1
}

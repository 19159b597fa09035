//! Exact lookup through the full index.

use std::hash::Hash;

use crate::key::CompositeKey;
use crate::store::Store;

/// Resolves a full key to its slot.
pub fn lookup<K, V>(store: &Store<K, V>, key: &CompositeKey<K>) -> Option<usize>
where
    K: Hash + Eq,
{
    store.full.get(key).copied()
}

/// Returns the value stored for a full key.
pub fn get<'a, K, V>(store: &'a Store<K, V>, key: &CompositeKey<K>) -> Option<&'a V>
where
    K: Hash + Eq,
{
    let slot = lookup(store, key)?;
    store.values.get(slot)?.as_ref()
}

/// Returns the value stored for a full key, mutably.
pub fn get_mut<'a, K, V>(store: &'a mut Store<K, V>, key: &CompositeKey<K>) -> Option<&'a mut V>
where
    K: Hash + Eq,
{
    let slot = lookup(store, key)?;
    store.values.get_mut(slot)?.as_mut()
}

//! Iterator types for multi-key maps.
//!
//! Every iterator holds a shared borrow of the lineage's storage until it is
//! dropped, and yields clones of keys and values.

use std::cell::Ref;
use std::ops::Range;
use std::vec;

use crate::store::Store;

/// Source of slot positions for one iteration.
pub(crate) enum Cursor {
    /// Every slot of a root, tombstones skipped on the fly.
    Scan(Range<usize>),
    /// Precomputed live slots of a slice.
    Listed(vec::IntoIter<usize>),
}

impl Cursor {
    pub(crate) const fn scan(slot_len: usize) -> Self {
        Self::Scan(0..slot_len)
    }

    pub(crate) fn listed(slots: Vec<usize>) -> Self {
        Self::Listed(slots.into_iter())
    }

    fn next_live<K, V>(&mut self, store: &Store<K, V>) -> Option<usize> {
        match self {
            Self::Scan(range) => range.find(|&slot| store.is_live(slot)),
            Self::Listed(slots) => slots.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Scan(range) => (0, Some(range.len())),
            Self::Listed(slots) => (slots.len(), Some(slots.len())),
        }
    }
}

/// Iterator over `(key, value)` pairs of a [`MultiKeyMap`](crate::MultiKeyMap)
/// view.
pub struct Iter<'a, K, V, const N: usize> {
    store: Ref<'a, Store<K, V>>,
    cursor: Cursor,
    free: [usize; N],
}

impl<'a, K, V, const N: usize> Iter<'a, K, V, N> {
    pub(crate) const fn new(store: Ref<'a, Store<K, V>>, cursor: Cursor, free: [usize; N]) -> Self {
        Self {
            store,
            cursor,
            free,
        }
    }
}

impl<K: Clone, V: Clone, const N: usize> Iterator for Iter<'_, K, V, N> {
    type Item = ([K; N], V);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor.next_live(&*self.store)?;
        let key = self.store.project(slot, &self.free)?;
        let value = self.store.values.get(slot)?.clone()?;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cursor.size_hint()
    }
}

/// Iterator over the keys of a [`MultiKeyMap`](crate::MultiKeyMap) view.
pub struct Keys<'a, K, V, const N: usize> {
    store: Ref<'a, Store<K, V>>,
    cursor: Cursor,
    free: [usize; N],
}

impl<'a, K, V, const N: usize> Keys<'a, K, V, N> {
    pub(crate) const fn new(store: Ref<'a, Store<K, V>>, cursor: Cursor, free: [usize; N]) -> Self {
        Self {
            store,
            cursor,
            free,
        }
    }
}

impl<K: Clone, V, const N: usize> Iterator for Keys<'_, K, V, N> {
    type Item = [K; N];

    fn next(&mut self) -> Option<[K; N]> {
        let slot = self.cursor.next_live(&*self.store)?;
        self.store.project(slot, &self.free)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cursor.size_hint()
    }
}

/// Iterator over the values of a [`MultiKeyMap`](crate::MultiKeyMap) view.
pub struct Values<'a, K, V> {
    store: Ref<'a, Store<K, V>>,
    cursor: Cursor,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) const fn new(store: Ref<'a, Store<K, V>>, cursor: Cursor) -> Self {
        Self { store, cursor }
    }
}

impl<K, V: Clone> Iterator for Values<'_, K, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        let slot = self.cursor.next_live(&*self.store)?;
        self.store.values.get(slot)?.clone()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cursor.size_hint()
    }
}

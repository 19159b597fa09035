//! The multi-key map and its slice views.

use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::iter;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::iter::{Cursor, Iter, Keys, Values};
use crate::ops::{compact, get, insert, remove};
use crate::slice::Constraint;
use crate::store::Store;
use crate::{CompactionThresholds, MAX_ARITY};

/// Map from `N`-component keys to values, or a live view over part of one.
///
/// A map created with [`new`](Self::new) is a *root*. Fixing a component with
/// [`slice`](Self::slice) yields a view of arity `N - 1` over the entries
/// carrying that component. Views share the root's storage: every operation
/// on any view of a lineage is immediately visible through all the others.
/// Every operation on a view is scoped to the entries it can see.
///
/// Key components are all of type `K`; use an enum for heterogeneous keys.
/// Dimensions are numbered from 0 and always refer to this view's free
/// dimensions, in the order they had in the root.
///
/// The map is single-threaded (`!Send`, `!Sync`). Reads clone values out of
/// the shared storage, so most read methods need `V: Clone`.
///
/// # Panics
///
/// Mutating any view while an iterator over a view of the same lineage is
/// alive panics, as does touching the lineage from inside an
/// [`update`](Self::update) closure.
pub struct MultiKeyMap<K, V, const N: usize> {
    pub(crate) store: Rc<RefCell<Store<K, V>>>,
    pub(crate) constraints: Vec<Constraint<K>>,
    /// Root dimension of each free dimension, ascending.
    pub(crate) free: [usize; N],
}

// ---------------------------------------------------------------------------
// Construction & configuration (no trait bounds)
// ---------------------------------------------------------------------------

impl<K, V, const N: usize> MultiKeyMap<K, V, N> {
    /// Creates an empty root map with default compaction thresholds.
    ///
    /// `N` must be between 1 and [`MAX_ARITY`]; anything else fails to
    /// compile.
    #[must_use]
    pub fn new() -> Self {
        Self::with_thresholds(CompactionThresholds::default())
    }

    /// Creates an empty root map with the given compaction thresholds.
    #[must_use]
    pub fn with_thresholds(thresholds: CompactionThresholds) -> Self {
        const {
            assert!(N >= 1 && N <= MAX_ARITY, "a map has between 1 and 5 key components");
        }
        Self {
            store: Rc::new(RefCell::new(Store::new(N, thresholds))),
            constraints: Vec::new(),
            free: std::array::from_fn(|i| i),
        }
    }

    /// Number of free key components of this view.
    #[must_use]
    pub const fn arity(&self) -> usize {
        N
    }

    /// Returns `true` if this view fixes at least one component.
    #[must_use]
    pub const fn is_slice(&self) -> bool {
        !self.constraints.is_empty()
    }

    /// Compaction thresholds of this lineage.
    #[must_use]
    pub fn compaction_thresholds(&self) -> CompactionThresholds {
        self.store.borrow().thresholds
    }

    /// Replaces the compaction thresholds of this lineage.
    ///
    /// Takes effect on the next removal.
    pub fn set_compaction_thresholds(&mut self, thresholds: CompactionThresholds) {
        self.store.borrow_mut().thresholds = thresholds;
    }

    /// Sets the tombstone count that must be exceeded before compacting.
    pub fn set_absolute_threshold(&mut self, absolute: usize) {
        self.store.borrow_mut().thresholds.absolute = absolute;
    }

    /// Sets the tombstone fraction of all slots that must be exceeded before
    /// compacting.
    pub fn set_relative_threshold(&mut self, relative: f64) {
        self.store.borrow_mut().thresholds.relative = relative;
    }

    /// Returns `(slots, tombstones)` of the shared storage.
    ///
    /// Covers the whole lineage; tombstones are slots awaiting compaction.
    #[must_use]
    pub fn storage_len(&self) -> (usize, usize) {
        let store = self.store.borrow();
        (store.slot_len(), store.tombstones.len())
    }
}

// ---------------------------------------------------------------------------
// Read operations (K: Hash + Eq + Clone)
// ---------------------------------------------------------------------------

impl<K, V, const N: usize> MultiKeyMap<K, V, N>
where
    K: Hash + Eq + Clone,
{
    /// Returns the number of entries visible through this view.
    #[must_use]
    pub fn len(&self) -> usize {
        let store = self.store.borrow();
        if self.constraints.is_empty() {
            store.live_len()
        } else {
            store.intersection(self.filters()).count()
        }
    }

    /// Returns `true` if no entry is visible through this view.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let store = self.store.borrow();
        if self.constraints.is_empty() {
            store.live_len() == 0
        } else {
            store.intersection(self.filters()).next().is_none()
        }
    }

    /// Returns `true` if an entry with this key is visible.
    #[must_use]
    pub fn contains_key(&self, key: &[K; N]) -> bool {
        let key = self.full_key(key);
        get::lookup(&*self.store.borrow(), &key).is_some()
    }

    /// Returns `true` if any visible entry carries `value` in dimension `dim`.
    ///
    /// # Panics
    ///
    /// Panics if `dim >= N`.
    #[must_use]
    pub fn contains_in(&self, dim: usize, value: &K) -> bool {
        let root = self.free[dim];
        let store = self.store.borrow();
        store
            .intersection(self.filters().chain(iter::once((root, value))))
            .next()
            .is_some()
    }

    /// Returns an iterator over the keys visible through this view.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V, N> {
        let store = self.store.borrow();
        let cursor = self.cursor(&store);
        Keys::new(store, cursor, self.free)
    }

    /// Visible live slots. A root scans its columns; a slice intersects its
    /// constraint sets.
    fn cursor(&self, store: &Store<K, V>) -> Cursor {
        if self.constraints.is_empty() {
            Cursor::scan(store.slot_len())
        } else {
            Cursor::listed(store.intersection(self.filters()).into_sorted())
        }
    }
}

impl<K, V, const N: usize> MultiKeyMap<K, V, N>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Returns a clone of the value stored under `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if no visible entry has this key.
    pub fn get(&self, key: &[K; N]) -> Result<V>
    where
        K: fmt::Debug,
    {
        let key = self.full_key(key);
        get::get(&*self.store.borrow(), &key)
            .cloned()
            .ok_or_else(|| Error::KeyNotFound {
                key: format!("{key:?}"),
            })
    }

    /// Non-failing twin of [`get`](Self::get).
    #[must_use]
    pub fn try_get(&self, key: &[K; N]) -> Option<V> {
        let key = self.full_key(key);
        get::get(&*self.store.borrow(), &key).cloned()
    }

    /// Returns an iterator over the `(key, value)` pairs visible through this
    /// view.
    ///
    /// A root yields entries in slot order; a slice yields them in ascending
    /// slot order of its intersection. Calling `iter` again restarts.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, N> {
        let store = self.store.borrow();
        let cursor = self.cursor(&store);
        Iter::new(store, cursor, self.free)
    }

    /// Returns an iterator over the values visible through this view.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        let store = self.store.borrow();
        let cursor = self.cursor(&store);
        Values::new(store, cursor)
    }

    /// Copies every visible entry into a map keyed by this view's key tuple.
    #[must_use]
    pub fn to_map(&self) -> FxHashMap<[K; N], V> {
        self.iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Write operations (K: Hash + Eq + Clone)
// ---------------------------------------------------------------------------

impl<K, V, const N: usize> MultiKeyMap<K, V, N>
where
    K: Hash + Eq + Clone,
{
    /// Inserts or overwrites the entry under `key`.
    ///
    /// Overwriting keeps the entry's slot. A new entry takes the lowest
    /// reclaimable slot and becomes visible to every view whose fixed
    /// components match. Returns the previous value, if any.
    pub fn insert(&mut self, key: [K; N], value: V) -> Option<V> {
        let key = self.owned_full_key(key);
        insert::upsert(&mut *self.store.borrow_mut(), key, value)
    }

    /// Inserts a new entry, refusing to overwrite.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateKey`] if an entry with this key already exists; the
    /// map is left unchanged.
    pub fn add(&mut self, key: [K; N], value: V) -> Result<()>
    where
        K: fmt::Debug,
    {
        let full = self.owned_full_key(key);
        let mut store = self.store.borrow_mut();
        if get::lookup(&*store, &full).is_some() {
            return Err(Error::DuplicateKey {
                key: format!("{full:?}"),
            });
        }
        insert::insert_new(&mut *store, full, value);
        Ok(())
    }

    /// Applies `f` to the value stored under `key` in place. Returns `false`
    /// if no visible entry has this key.
    ///
    /// # Panics
    ///
    /// Panics if `f` touches any view of this lineage.
    pub fn update<F>(&mut self, key: &[K; N], f: F) -> bool
    where
        F: FnOnce(&mut V),
    {
        let key = self.full_key(key);
        get::get_mut(&mut *self.store.borrow_mut(), &key).map(f).is_some()
    }

    /// Overwrites the value of every entry in scope with clones of `value`.
    ///
    /// On a root this writes every slot, reclaimable ones included; they
    /// stay removed.
    pub fn set_all(&mut self, value: V)
    where
        V: Clone,
    {
        let mut store = self.store.borrow_mut();
        if self.constraints.is_empty() {
            for slot in &mut store.values {
                *slot = Some(value.clone());
            }
        } else {
            let slots = store.intersection(self.filters()).into_sorted();
            for slot in slots {
                store.values[slot] = Some(value.clone());
            }
        }
    }

    /// Removes the entry under `key`, returning its value.
    ///
    /// May trigger compaction.
    pub fn remove(&mut self, key: &[K; N]) -> Option<V> {
        let key = self.full_key(key);
        remove::remove_key(&mut *self.store.borrow_mut(), &key)
    }

    /// Removes every visible entry carrying `value` in dimension `dim` and
    /// returns how many were removed.
    ///
    /// May trigger compaction.
    ///
    /// # Panics
    ///
    /// Panics if `dim >= N`.
    pub fn remove_in(&mut self, dim: usize, value: &K) -> usize {
        let root = self.free[dim];
        let mut store = self.store.borrow_mut();
        let slots: Vec<usize> = store
            .intersection(self.filters().chain(iter::once((root, value))))
            .collect();
        if slots.is_empty() {
            return 0;
        }
        remove::remove_slots(&mut *store, &slots)
    }

    /// Removes every visible entry.
    ///
    /// A root drops its storage wholesale, emptying every slice too. A slice
    /// removes its own entries one by one and then compacts.
    pub fn clear(&mut self) {
        let mut store = self.store.borrow_mut();
        if self.constraints.is_empty() {
            store.reset();
            return;
        }
        let slots = store.intersection(self.filters()).into_sorted();
        remove::release_all(&mut *store, &slots);
        compact::compact(&mut *store);
    }

    /// Reclaims every tombstoned slot now, regardless of the thresholds.
    pub fn compact(&mut self) {
        compact::compact(&mut *self.store.borrow_mut());
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<K, V, const N: usize> Default for MultiKeyMap<K, V, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, const N: usize> fmt::Debug for MultiKeyMap<K, V, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slots, tombstones) = self.storage_len();
        f.debug_struct("MultiKeyMap")
            .field("arity", &N)
            .field("fixed", &self.constraints.len())
            .field("slots", &slots)
            .field("tombstones", &tombstones)
            .finish_non_exhaustive()
    }
}

impl<K, V, const N: usize> Extend<([K; N], V)> for MultiKeyMap<K, V, N>
where
    K: Hash + Eq + Clone,
{
    fn extend<I: IntoIterator<Item = ([K; N], V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.store.borrow_mut().reserve(iter.size_hint().0);
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, const N: usize> FromIterator<([K; N], V)> for MultiKeyMap<K, V, N>
where
    K: Hash + Eq + Clone,
{
    fn from_iter<I: IntoIterator<Item = ([K; N], V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, const N: usize> IntoIterator for &'a MultiKeyMap<K, V, N>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    type Item = ([K; N], V);
    type IntoIter = Iter<'a, K, V, N>;

    fn into_iter(self) -> Iter<'a, K, V, N> {
        self.iter()
    }
}

//! Dense slot storage shared by a root map and every slice derived from it.

use std::collections::BTreeSet;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::CompactionThresholds;
use crate::index::{DimensionIndex, Intersection};
use crate::key::CompositeKey;

/// Parallel slot columns plus every index over them.
///
/// A slot is live iff its position is below `values.len()` and not in
/// `tombstones`. Tombstoned slots keep their position (holding `None`) until
/// compaction reclaims them.
pub struct Store<K, V> {
    /// One value per slot.
    pub values: Vec<Option<V>>,
    /// `columns[d][slot]` is the slot's component in root dimension `d`.
    pub columns: Vec<Vec<Option<K>>>,
    /// Full key → slot. Bijective onto live slots.
    pub full: FxHashMap<CompositeKey<K>, usize>,
    /// One index per root dimension.
    pub dims: Vec<DimensionIndex<K>>,
    /// Removed but not yet reclaimed slots. Ordered so reuse takes the
    /// lowest position and compaction can walk them ascending.
    pub tombstones: BTreeSet<usize>,
    /// When removals trigger compaction.
    pub thresholds: CompactionThresholds,
}

impl<K, V> Store<K, V> {
    /// Creates empty storage for keys of `arity` components.
    pub fn new(arity: usize, thresholds: CompactionThresholds) -> Self {
        Self {
            values: Vec::new(),
            columns: (0..arity).map(|_| Vec::new()).collect(),
            full: FxHashMap::default(),
            dims: (0..arity).map(|_| DimensionIndex::new()).collect(),
            tombstones: BTreeSet::new(),
            thresholds,
        }
    }

    /// Number of root key components.
    pub const fn arity(&self) -> usize {
        self.columns.len()
    }

    /// Allocated slots, tombstoned ones included.
    pub const fn slot_len(&self) -> usize {
        self.values.len()
    }

    /// Live entries across the whole lineage.
    pub fn live_len(&self) -> usize {
        self.values.len() - self.tombstones.len()
    }

    /// Returns `true` if `slot` holds a live entry.
    pub fn is_live(&self, slot: usize) -> bool {
        slot < self.values.len() && !self.tombstones.contains(&slot)
    }

    /// Reserves room for `additional` more slots.
    pub fn reserve(&mut self, additional: usize) {
        self.values.reserve(additional);
        for column in &mut self.columns {
            column.reserve(additional);
        }
    }

    /// Drops all storage, indices and tombstones without visiting entries.
    pub fn reset(&mut self) {
        tracing::trace!(slots = self.values.len(), "resetting slot storage");
        self.values.clear();
        for column in &mut self.columns {
            column.clear();
        }
        self.full.clear();
        for dim in &mut self.dims {
            dim.clear();
        }
        self.tombstones.clear();
    }
}

impl<K: Clone, V> Store<K, V> {
    /// Reads the components of `slot` at the given root dimensions.
    ///
    /// Returns `None` for a tombstoned slot.
    pub fn project<const N: usize>(&self, slot: usize, dims: &[usize; N]) -> Option<[K; N]> {
        let parts = dims
            .iter()
            .map(|&dim| self.columns[dim].get(slot).cloned().flatten())
            .collect::<Option<Vec<K>>>()?;
        parts.try_into().ok()
    }
}

impl<K: Hash + Eq, V> Store<K, V> {
    /// Intersects the per-dimension sets named by `filters`, each a
    /// `(root dimension, component value)` pair.
    ///
    /// An empty filter list yields an empty intersection; callers scan the
    /// slot columns directly in that case.
    pub fn intersection<'s, 'k>(
        &'s self,
        filters: impl IntoIterator<Item = (usize, &'k K)>,
    ) -> Intersection<'s>
    where
        K: 'k,
    {
        Intersection::new(
            filters
                .into_iter()
                .map(|(dim, value)| self.dims[dim].get(value)),
        )
    }
}

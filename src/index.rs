//! Per-dimension indices and smallest-first set intersection.

use std::collections::hash_set;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ops::compact::Relocation;

/// Slot positions sharing one component value.
pub type SlotSet = FxHashSet<usize>;

/// `component value → slots` for one dimension.
///
/// Invariant: a slot is in `sets[v]` iff its component in this dimension is
/// `v` and it is live. Values whose set drains are dropped from the map, so
/// `get` never returns an empty set.
pub struct DimensionIndex<K> {
    sets: FxHashMap<K, SlotSet>,
}

impl<K> DimensionIndex<K> {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            sets: FxHashMap::default(),
        }
    }

    /// Drops every value and slot.
    pub fn clear(&mut self) {
        self.sets.clear();
    }
}

impl<K> Default for DimensionIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq> DimensionIndex<K> {
    /// Returns the live slots whose component equals `value`.
    pub fn get(&self, value: &K) -> Option<&SlotSet> {
        self.sets.get(value)
    }

    /// Registers `slot` under `value`.
    pub fn insert(&mut self, value: K, slot: usize) {
        self.sets.entry(value).or_default().insert(slot);
    }

    /// Unregisters `slot` from `value`, dropping the value once its set
    /// drains.
    pub fn remove(&mut self, value: &K, slot: usize) {
        if let Some(set) = self.sets.get_mut(value) {
            set.remove(&slot);
            if set.is_empty() {
                self.sets.remove(value);
            }
        }
    }

    /// Rewrites every member through `relocation`, discarding reclaimed
    /// positions.
    pub fn relocate(&mut self, relocation: &Relocation) {
        for set in self.sets.values_mut() {
            *set = set.iter().filter_map(|&slot| relocation.target(slot)).collect();
        }
        self.sets.retain(|_, set| !set.is_empty());
    }
}

/// Lazy intersection of several slot sets.
///
/// Iteration is driven by the smallest set; every candidate is probed
/// against the remaining sets.
pub struct Intersection<'a> {
    driver: Option<hash_set::Iter<'a, usize>>,
    others: Vec<&'a SlotSet>,
}

impl<'a> Intersection<'a> {
    /// Intersects `sets`. A `None` entry stands for an unknown value and
    /// makes the intersection empty, as does an empty input.
    pub fn new(sets: impl IntoIterator<Item = Option<&'a SlotSet>>) -> Self {
        let Some(mut sets) = sets.into_iter().collect::<Option<Vec<_>>>() else {
            return Self::empty();
        };
        sets.sort_unstable_by_key(|set| set.len());
        let mut sets = sets.into_iter();
        sets.next().map_or_else(Self::empty, |first| Self {
            driver: Some(first.iter()),
            others: sets.collect(),
        })
    }

    const fn empty() -> Self {
        Self {
            driver: None,
            others: Vec::new(),
        }
    }

    /// Collects the surviving slots in ascending order.
    pub fn into_sorted(self) -> Vec<usize> {
        let mut slots: Vec<usize> = self.collect();
        slots.sort_unstable();
        slots
    }
}

impl Iterator for Intersection<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let others = &self.others;
        self.driver
            .as_mut()?
            .find(|slot| others.iter().all(|set| set.contains(*slot)))
            .copied()
    }

    fn count(self) -> usize {
        match self.driver {
            None => 0,
            Some(driver) if self.others.is_empty() => driver.len(),
            Some(driver) => driver
                .filter(|slot| self.others.iter().all(|set| set.contains(*slot)))
                .count(),
        }
    }
}

//! Compaction: reclaims tombstoned slots and renumbers every index.
//!
//! Each surviving slot moves down by the number of tombstones strictly below
//! it. Slices hold no slot positions of their own (their constraints resolve
//! through the shared per-dimension sets), so rewriting the store's indices
//! keeps every live view correct.

use std::collections::BTreeSet;
use std::hash::Hash;

use crate::store::Store;

/// Old slot position → new slot position for one compaction pass.
pub struct Relocation {
    targets: Vec<Option<usize>>,
}

impl Relocation {
    /// Builds the offset table for `slot_len` slots, reclaiming `tombstones`.
    pub fn new(slot_len: usize, tombstones: &BTreeSet<usize>) -> Self {
        let mut dead = tombstones.iter().copied().peekable();
        let mut offset = 0;
        let targets = (0..slot_len)
            .map(|slot| {
                if dead.next_if_eq(&slot).is_some() {
                    offset += 1;
                    None
                } else {
                    Some(slot - offset)
                }
            })
            .collect();
        Self { targets }
    }

    /// New position of `slot`, or `None` if it is being reclaimed.
    pub fn target(&self, slot: usize) -> Option<usize> {
        self.targets.get(slot).copied().flatten()
    }
}

/// Returns `true` if the tombstone count exceeds both thresholds.
#[allow(clippy::cast_precision_loss)]
pub fn needs_compaction<K, V>(store: &Store<K, V>) -> bool {
    let dead = store.tombstones.len();
    dead > store.thresholds.absolute
        && dead as f64 > store.thresholds.relative * store.slot_len() as f64
}

/// Compacts if [`needs_compaction`] holds. Returns whether it ran.
pub fn check_compact<K, V>(store: &mut Store<K, V>) -> bool
where
    K: Hash + Eq,
{
    let due = needs_compaction(store);
    if due {
        compact(store);
    }
    due
}

/// Physically removes every tombstoned slot.
///
/// Storage shrinks by exactly the tombstone count; the full index and every
/// per-dimension set are rewritten through the offset table.
pub fn compact<K, V>(store: &mut Store<K, V>)
where
    K: Hash + Eq,
{
    if store.tombstones.is_empty() {
        return;
    }
    let reclaimed = store.tombstones.len();
    let relocation = Relocation::new(store.slot_len(), &store.tombstones);

    retain_survivors(&mut store.values, &relocation);
    for column in &mut store.columns {
        retain_survivors(column, &relocation);
    }
    store.full.retain(|_, slot| {
        let target = relocation.target(*slot);
        if let Some(target) = target {
            *slot = target;
        }
        target.is_some()
    });
    for dim in &mut store.dims {
        dim.relocate(&relocation);
    }
    store.tombstones.clear();

    tracing::debug!(reclaimed, remaining = store.slot_len(), "compacted slot storage");
}

fn retain_survivors<T>(column: &mut Vec<T>, relocation: &Relocation) {
    let mut slot = 0;
    column.retain(|_| {
        let keep = relocation.target(slot).is_some();
        slot += 1;
        keep
    });
}

//! Multi-key indexed map with live slice views.
//!
//! A [`MultiKeyMap<K, V, N>`] maps keys of `N` components (1 to
//! [`MAX_ARITY`]) to values. Besides exact lookup, any component can be
//! fixed to obtain a *slice*: a map of arity `N - 1` over the entries carrying
//! that component. Slices copy nothing. They share the parent's storage and
//! indices, so they stay live as the parent changes, and can themselves be
//! sliced down to zero free components.
//!
//! # Storage
//!
//! - **Dense slots**: values and each key component live in parallel
//!   columns addressed by a slot position.
//! - **Full index**: composite key → slot, for O(1) exact lookup.
//! - **Per-dimension indices**: component value → set of slots, one per
//!   dimension. Slices and dimension-wide queries intersect these sets,
//!   smallest first.
//! - **Tombstones**: removal only marks slots; the lowest marked slot is
//!   reused by the next insert.
//! - **Compaction**: once the tombstone count exceeds both
//!   [`CompactionThresholds`], marked slots are dropped and every index is
//!   renumbered through an offset table.
//!
//! # Example
//!
//! ```
//! use multikey_index::MultiKeyMap;
//!
//! let mut map: MultiKeyMap<&str, i32, 2> = MultiKeyMap::new();
//! map.insert(["1", "a"], 10);
//! map.insert(["1", "b"], 20);
//! map.insert(["2", "a"], 30);
//!
//! let ones: MultiKeyMap<&str, i32, 1> = map.slice(0, "1")?;
//! assert_eq!(ones.len(), 2);
//!
//! map.insert(["1", "c"], 40);
//! assert_eq!(ones.get(&["c"])?, 40);
//! # Ok::<(), multikey_index::Error>(())
//! ```
//!
//! # Threading
//!
//! The map performs no synchronization and is neither `Send` nor `Sync`.
//! Wrap it in a lock of your own (on a thread that owns the whole lineage)
//! if concurrent access is needed.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod iter;

mod error;
mod index;
mod key;
mod map;
mod ops;
mod slice;
mod store;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use map::MultiKeyMap;

/// Largest supported number of key components.
pub const MAX_ARITY: usize = 5;

/// When removals trigger compaction.
///
/// Compaction runs once the tombstone count exceeds `absolute` *and*
/// `relative × slots`. Thresholds belong to the shared storage, so a change
/// made through any view applies to its whole lineage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompactionThresholds {
    /// Tombstone count that must be exceeded.
    pub absolute: usize,
    /// Fraction of allocated slots the tombstone count must exceed.
    pub relative: f64,
}

impl CompactionThresholds {
    /// 1000 tombstones, 1 % of slots.
    pub const DEFAULT: Self = Self::new(1000, 0.01);

    /// Creates thresholds from an absolute count and a fraction of slots.
    #[must_use]
    pub const fn new(absolute: usize, relative: f64) -> Self {
        Self { absolute, relative }
    }
}

impl Default for CompactionThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

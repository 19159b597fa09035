//! Slicing: fixing one key component to get a live, reduced-arity view.
//!
//! A slice records each fixed component as a [`Constraint`]: the value and
//! the root dimension it was fixed in. The constraint's slot set is the
//! store's own per-dimension set for that value, looked up on every query,
//! so inserts, removals and compaction through any view of the lineage are
//! visible to all of them without notification.

use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use smallvec::{SmallVec, smallvec};

use crate::MAX_ARITY;
use crate::error::{Error, Result};
use crate::key::CompositeKey;
use crate::map::MultiKeyMap;

/// One fixed key component of a slice.
#[derive(Clone, Debug)]
pub struct Constraint<K> {
    /// The fixed component value.
    pub value: K,
    /// Root dimension the value was fixed in.
    pub dim: usize,
}

impl<K, V, const N: usize> MultiKeyMap<K, V, N>
where
    K: Hash + Eq + Clone,
{
    /// Fixes dimension `dim` of this view to `value`, returning a view with
    /// one dimension fewer.
    ///
    /// The new view shares storage with this one: later inserts matching
    /// `value` show up in it, and removals through either view affect both.
    /// `M` must equal `N - 1`; any other choice fails to compile.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if no live entry carries `value` in dimension
    /// `dim`.
    ///
    /// # Panics
    ///
    /// Panics if `dim >= N`.
    pub fn slice<const M: usize>(&self, dim: usize, value: K) -> Result<MultiKeyMap<K, V, M>>
    where
        K: fmt::Debug,
    {
        let key = pattern::<K, N>(dim, &value);
        self.try_slice(dim, value).ok_or(Error::KeyNotFound { key })
    }

    /// Non-failing twin of [`slice`](Self::slice): returns `None` and
    /// leaves every view untouched when `value` is unknown.
    ///
    /// # Panics
    ///
    /// Panics if `dim >= N`.
    #[must_use]
    pub fn try_slice<const M: usize>(&self, dim: usize, value: K) -> Option<MultiKeyMap<K, V, M>> {
        const {
            assert!(M + 1 == N, "a slice has exactly one free dimension fewer than its parent");
        }
        let root = self.free[dim];
        self.store.borrow().dims[root].get(&value)?;

        let mut constraints = Vec::with_capacity(self.constraints.len() + 1);
        constraints.extend(self.constraints.iter().cloned());
        constraints.push(Constraint { value, dim: root });
        let free = std::array::from_fn(|i| if i < dim { self.free[i] } else { self.free[i + 1] });
        tracing::trace!(dim = root, fixed = constraints.len(), "created slice view");

        Some(MultiKeyMap {
            store: Rc::clone(&self.store),
            constraints,
            free,
        })
    }

    /// Rebuilds the full root key from this view's free components and the
    /// fixed ones, each at its original dimension.
    pub(crate) fn full_key(&self, key: &[K; N]) -> CompositeKey<K> {
        self.assemble(key.iter().cloned())
    }

    /// Like [`full_key`](Self::full_key), moving the free components in.
    pub(crate) fn owned_full_key(&self, key: [K; N]) -> CompositeKey<K> {
        self.assemble(key)
    }

    fn assemble(&self, free: impl IntoIterator<Item = K>) -> CompositeKey<K> {
        let mut parts: SmallVec<[Option<K>; MAX_ARITY]> =
            smallvec![None; N + self.constraints.len()];
        for constraint in &self.constraints {
            parts[constraint.dim] = Some(constraint.value.clone());
        }
        for (component, &dim) in free.into_iter().zip(&self.free) {
            parts[dim] = Some(component);
        }
        parts.into_iter().flatten().collect()
    }

    /// `(root dimension, value)` for every fixed component.
    pub(crate) fn filters(&self) -> impl Iterator<Item = (usize, &K)> {
        self.constraints.iter().map(|c| (c.dim, &c.value))
    }
}

/// Renders a partially specified key, e.g. `[_, 3, _]`.
fn pattern<K: fmt::Debug, const N: usize>(dim: usize, value: &K) -> String {
    let parts: Vec<String> = (0..N)
        .map(|i| {
            if i == dim {
                format!("{value:?}")
            } else {
                "_".to_owned()
            }
        })
        .collect();
    format!("[{}]", parts.join(", "))
}

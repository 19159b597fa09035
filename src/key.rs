//! Composite keys: ordered, fixed-arity tuples of key components.
//!
//! The hash folds component hashes left to right starting from a fixed seed:
//! `h = (… ((SEED · M + h₀) · M + h₁) …) · M + hₙ₋₁`, so permuting the
//! components changes the hash.

use std::hash::{BuildHasher, Hash, Hasher};

use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;

use crate::MAX_ARITY;

/// Starting value of the component fold (golden ratio constant).
const SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Per-component multiplier (large prime).
const MULTIPLIER: u64 = 0x517C_C1B7_2722_0A95;

/// Inline component buffer; never spills for supported arities.
pub type Parts<K> = SmallVec<[K; MAX_ARITY]>;

/// Computes the 64-bit hash of a single component.
#[must_use]
pub fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    FxBuildHasher.hash_one(value)
}

/// Folds already-hashed components into one order-sensitive hash.
#[must_use]
pub fn combine(component_hashes: impl IntoIterator<Item = u64>) -> u64 {
    component_hashes
        .into_iter()
        .fold(SEED, |acc, h| acc.wrapping_mul(MULTIPLIER).wrapping_add(h))
}

/// Every key component of one entry, in root dimension order.
#[derive(Clone, PartialEq, Eq)]
pub struct CompositeKey<K> {
    parts: Parts<K>,
}

impl<K> CompositeKey<K> {
    /// Wraps components that are already in root dimension order.
    #[must_use]
    pub const fn new(parts: Parts<K>) -> Self {
        Self { parts }
    }

    /// Number of components.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.parts.len()
    }

    /// Components in root dimension order.
    #[must_use]
    pub fn parts(&self) -> &[K] {
        &self.parts
    }
}

impl<K: Hash> CompositeKey<K> {
    /// The seeded, order-sensitive hash of all components.
    #[must_use]
    pub fn combined_hash(&self) -> u64 {
        combine(self.parts.iter().map(hash_one))
    }
}

impl<K: Hash> Hash for CompositeKey<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.combined_hash());
    }
}

impl<K: std::fmt::Debug> std::fmt::Debug for CompositeKey<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.parts.iter()).finish()
    }
}

impl<K> FromIterator<K> for CompositeKey<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

//! Error type for fallible map operations.

use thiserror::Error;

/// Failure of a map operation that has a non-failing `try_` twin.
///
/// Both variants signal a programmer error at the call site; retrying the
/// same call cannot succeed. Removal never fails: a missing key is reported
/// through its return value instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No entry matches the key, or no entry carries the value a slice
    /// tried to fix.
    ///
    /// For a lookup, `key` renders the full root key, fixed components of a
    /// slice included. For a failed slice it renders the view's key tuple
    /// with every other dimension shown as `_`.
    #[error("key not found: {key}")]
    KeyNotFound {
        /// The offending key tuple.
        key: String,
    },
    /// [`add`](crate::MultiKeyMap::add) was called with a key that is already
    /// present.
    #[error("an entry with key {key} already exists")]
    DuplicateKey {
        /// The offending key tuple.
        key: String,
    },
}

/// Result alias for fallible map operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Hash containers built on *hashbrown* with *foldhash* hashing.
//!
//! All containers use a fixed seed, so iteration order only depends on
//! the inserted data. That keeps serializer output of hash maps stable
//! between runs.

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{FixedHashState, FixedHasher};
pub use hasher::{NoOpHashState, NoOpHasher};

/// A [`hashbrown::HashMap`] using [`FixedHashState`].
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`].
pub type HashSet<T> = hashbrown::HashSet<T, FixedHashState>;

/// Creates an empty [`HashMap`].
#[inline]
pub const fn new_map<K, V>() -> HashMap<K, V> {
    HashMap::with_hasher(FixedHashState)
}

/// Creates an empty [`HashSet`].
#[inline]
pub const fn new_set<T>() -> HashSet<T> {
    HashSet::with_hasher(FixedHashState)
}

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;

// Hash functions for table keys

use std::hash::{BuildHasher, Hasher};
use xxhash_rust::xxh64::Xxh64;

/// Default seed shared by every key map in the engine
pub const DEFAULT_SEED: u64 = 0x9e3779b97f4a7c15;

/// Streaming hasher over xxh64
pub struct KeyHasher {
    inner: Xxh64,
}

impl KeyHasher {
    /// Create a hasher with the given seed
    pub fn with_seed(seed: u64) -> Self {
        KeyHasher {
            inner: Xxh64::new(seed),
        }
    }
}

impl Default for KeyHasher {
    fn default() -> Self {
        KeyHasher::with_seed(DEFAULT_SEED)
    }
}

impl Hasher for KeyHasher {
    fn write(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    fn finish(&self) -> u64 {
        self.inner.digest()
    }
}

/// `BuildHasher` used by the row/column indexes and sparse overlays
#[derive(Debug, Clone, Copy)]
pub struct KeyHashBuilder {
    seed: u64,
}

impl KeyHashBuilder {
    pub fn new() -> Self {
        KeyHashBuilder { seed: DEFAULT_SEED }
    }

    pub fn with_seed(seed: u64) -> Self {
        KeyHashBuilder { seed }
    }
}

impl Default for KeyHashBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildHasher for KeyHashBuilder {
    type Hasher = KeyHasher;

    fn build_hasher(&self) -> KeyHasher {
        KeyHasher::with_seed(self.seed)
    }
}

/// Hash map keyed through [`KeyHashBuilder`]
pub type KeyMap<K, V> = std::collections::HashMap<K, V, KeyHashBuilder>;

/// Creates an empty [`KeyMap`] with room for `capacity` entries
pub fn key_map<K, V>(capacity: usize) -> KeyMap<K, V> {
    KeyMap::with_capacity_and_hasher(capacity, KeyHashBuilder::new())
}

//! Index module mapping keys to dense ordinals
//!
//! An [`Index`] is a bijection between keys of type `K` and the ordinals
//! `0..len`. Ordinals are handed out in insertion order and stay stable
//! until the key is replaced. Lookups and appends are O(1) amortized.

use crate::error::{FrameError, FrameResult};
use crate::infrastructure::hash::{key_map, KeyMap};
use crate::types::{grow_capacity, MIN_CAPACITY};
use std::fmt::Debug;
use std::hash::Hash;

/// Bounds every row and column key type satisfies
pub trait Key: Eq + Hash + Clone + Debug {}

impl<T: Eq + Hash + Clone + Debug> Key for T {}

/// Bidirectional key to ordinal mapping
///
/// # Example
/// ```
/// use framestore::index::Index;
///
/// let mut index = Index::with_capacity(10);
/// assert_eq!(index.add("a"), 0);
/// assert_eq!(index.add("b"), 1);
/// assert_eq!(index.add("a"), 0);
/// assert_eq!(index.coordinate(&"b").unwrap(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Index<K> {
    /// Keys in ordinal order
    keys: Vec<K>,
    /// Reverse mapping from key to ordinal
    ordinals: KeyMap<K, usize>,
}

impl<K> Index<K>
where
    K: Key,
{
    /// Create an empty index with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(MIN_CAPACITY)
    }

    /// Create an empty index with room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        Self {
            keys: Vec::with_capacity(capacity),
            ordinals: key_map(capacity),
        }
    }

    /// Create an index from a sequence of keys
    ///
    /// Repeated keys keep the ordinal of their first occurrence.
    pub fn of<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let keys = keys.into_iter();
        let mut index = Self::with_capacity(keys.size_hint().0);
        index.add_all(keys);
        index
    }

    /// Returns the number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the index holds no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the number of keys that fit before the next reallocation
    pub fn capacity(&self) -> usize {
        self.keys.capacity()
    }

    /// Adds the key if absent and returns its ordinal
    ///
    /// Adding a key that is already present is a no-op returning the existing ordinal.
    pub fn add(&mut self, key: K) -> usize {
        if let Some(&ordinal) = self.ordinals.get(&key) {
            return ordinal;
        }
        let ordinal = self.keys.len();
        if ordinal == self.keys.capacity() {
            self.grow(ordinal + 1);
        }
        self.keys.push(key.clone());
        self.ordinals.insert(key, ordinal);
        ordinal
    }

    /// Adds every key and returns how many were new
    pub fn add_all<I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
    {
        let before = self.len();
        for key in keys {
            self.add(key);
        }
        self.len() - before
    }

    /// Returns the ordinal for a key that must be present
    pub fn coordinate(&self, key: &K) -> FrameResult<usize> {
        self.get_coordinate(key)
            .ok_or_else(|| FrameError::key_not_found(key))
    }

    /// Returns the ordinal for a key, if present
    pub fn get_coordinate(&self, key: &K) -> Option<usize> {
        self.ordinals.get(key).copied()
    }

    /// Returns true if the key is present
    pub fn contains(&self, key: &K) -> bool {
        self.ordinals.contains_key(key)
    }

    /// Returns the key at an ordinal, if in range
    pub fn key(&self, ordinal: usize) -> Option<&K> {
        self.keys.get(ordinal)
    }

    /// Returns the key at an ordinal that must be in range
    pub fn key_at(&self, ordinal: usize) -> FrameResult<&K> {
        self.keys.get(ordinal).ok_or(FrameError::OutOfBounds {
            ordinal,
            len: self.keys.len(),
        })
    }

    /// Replaces an existing key with a new one, keeping its ordinal
    ///
    /// Fails without modifying the index if `existing` is absent or
    /// `replacement` is already present.
    pub fn replace(&mut self, existing: &K, replacement: K) -> FrameResult<()> {
        let ordinal = self.coordinate(existing)?;
        if self.ordinals.contains_key(&replacement) {
            return Err(FrameError::duplicate_key(&replacement));
        }
        self.ordinals.remove(existing);
        self.ordinals.insert(replacement.clone(), ordinal);
        self.keys[ordinal] = replacement;
        Ok(())
    }

    /// Returns the keys in ordinal order
    ///
    /// The iterator is cheap to clone, and calling `keys()` again restarts it.
    pub fn keys(&self) -> Keys<'_, K> {
        Keys {
            inner: self.keys.iter(),
        }
    }

    /// Returns the keys as a slice in ordinal order
    pub fn as_slice(&self) -> &[K] {
        &self.keys
    }

    /// Reserve space for at least `required` keys, growing by half again at a time
    fn grow(&mut self, required: usize) {
        let target = grow_capacity(self.keys.capacity(), required);
        self.keys.reserve_exact(target - self.keys.len());
        self.ordinals.reserve(target - self.ordinals.len());
    }
}

impl<K> Default for Index<K>
where
    K: Key,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> FromIterator<K> for Index<K>
where
    K: Key,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::of(iter)
    }
}

impl<K: PartialEq> PartialEq for Index<K> {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys
    }
}

/// Iterator over the keys of an [`Index`] in ordinal order
#[derive(Debug, Clone)]
pub struct Keys<'a, K> {
    inner: std::slice::Iter<'a, K>,
}

impl<'a, K> Iterator for Keys<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for Keys<'_, K> {}

impl<K> DoubleEndedIterator for Keys<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

//! Ordered key/value container used as the storage for every registry.
//!
//! Entries live in a `Vec` kept sorted by key, so iteration follows key order and
//! lookups are binary searches. Growth goes through `Vec::try_reserve`, which lets an
//! out-of-memory condition surface as [`MapError::AllocationFailure`] instead of an abort.
//! A map can also be given an entry limit; inserting a new key past that limit fails the
//! same way.

use crate::error::MapError;

/// Sorted map that owns clones of everything put into it.
#[derive(Clone, Debug)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    capacity_limit: Option<usize>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            capacity_limit: None,
        }
    }
}

impl<K: Ord + Clone, V: Clone> OrderedMap<K, V> {
    /// Create an empty, unbounded map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map that holds at most `limit` entries (`None` = unbounded).
    pub fn with_capacity_limit(limit: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            capacity_limit: limit,
        }
    }

    fn search(&self, key: &K) -> Result<usize, usize> {
        self.entries.binary_search_by(|(k, _)| k.cmp(key))
    }

    /// Insert or overwrite. The map stores its own clones of `key` and `value`.
    pub fn put(&mut self, key: &K, value: &V) -> Result<(), MapError> {
        self.put_owned(key.clone(), value.clone())
    }

    /// Insert or overwrite, taking ownership of `key` and `value`.
    pub fn put_owned(&mut self, key: K, value: V) -> Result<(), MapError> {
        match self.search(&key) {
            Ok(idx) => {
                self.entries[idx].1 = value;
                Ok(())
            }
            Err(idx) => {
                if self
                    .capacity_limit
                    .is_some_and(|limit| self.entries.len() >= limit)
                {
                    return Err(MapError::AllocationFailure);
                }
                self.entries
                    .try_reserve(1)
                    .map_err(|_| MapError::AllocationFailure)?;
                self.entries.insert(idx, (key, value));
                Ok(())
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.search(key).ok().map(|idx| &self.entries[idx].1)
    }

    /// Mutable access to the stored value, without copying it.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.search(key) {
            Ok(idx) => Some(&mut self.entries[idx].1),
            Err(_) => None,
        }
    }

    /// Remove `key` and return its value. Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.search(key)
            .ok()
            .map(|idx| self.entries.remove(idx).1)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_ok()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deep copy with independent lifetime. Keeps the capacity limit.
    pub fn try_copy(&self) -> Result<Self, MapError> {
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(self.entries.len())
            .map_err(|_| MapError::AllocationFailure)?;
        entries.extend(self.entries.iter().cloned());
        Ok(Self {
            entries,
            capacity_limit: self.capacity_limit,
        })
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> + '_ {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn first_key(&self) -> Option<&K> {
        self.entries.first().map(|(k, _)| k)
    }

    /// Smallest key strictly greater than `key`, whether or not `key` is still present.
    ///
    /// Walking a map with `first_key` / `next_key_after` stays valid when the current key
    /// is removed between steps.
    pub fn next_key_after(&self, key: &K) -> Option<&K> {
        let idx = match self.search(key) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        };
        self.entries.get(idx).map(|(k, _)| k)
    }
}

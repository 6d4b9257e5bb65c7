//! Bounded map with least-recently-used eviction.
//!
//! Entry-count bounded, strict LRU: every access refreshes an entry's
//! recency and inserting a fresh key at capacity evicts the stalest
//! entry first. Recency is tracked with a monotonic sequence counter
//! instead of wall-clock time, so eviction order is deterministic and
//! testable.
//!
//! The cache is not internally synchronized; share it behind a `Mutex`
//! when several threads need it.

use std::collections::HashMap;
use std::hash::Hash;

/// Default capacity, in entries.
pub const DEFAULT_CAPACITY: usize = 8192;

/// Hit/miss/eviction counters for monitoring and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    /// Sequence number of the most recent access.
    last_used: u64,
}

/// An LRU cache over owned keys and values.
#[derive(Debug)]
pub struct LruCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    capacity: usize,
    tick: u64,
    stats: CacheStats,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// A zero capacity is clamped to one entry.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            tick: 0,
            stats: CacheStats::default(),
        }
    }

    /// Look up a key, refreshing its recency on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.tick += 1;
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used = self.tick;
                self.stats.hits += 1;
                Some(&entry.value)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Insert or replace a value.
    ///
    /// Replacing an existing key counts as a hit and refreshes its
    /// recency; inserting a fresh key counts as a miss and evicts the
    /// least recently used entry first when the cache is full.
    pub fn insert(&mut self, key: K, value: V) {
        self.tick += 1;
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.value = value;
            entry.last_used = self.tick;
            self.stats.hits += 1;
            return;
        }

        self.stats.misses += 1;
        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        let last_used = self.tick;
        self.entries.insert(key, Entry { value, last_used });
    }

    /// Remove a key, returning its value if present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    /// Whether a key is present. Does not refresh recency.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry limit this cache was created with.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the hit/miss/eviction counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.stats.evictions += 1;
        }
    }
}

impl<K: Eq + Hash + Clone, V> Default for LruCache<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

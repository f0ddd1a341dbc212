//! Fixed-capacity least-recently-used cache.
//!
//! [`LruCache`] is the single-owner structure; [`MatchCache`] wraps it in a
//! mutex because promote-on-get and evict-on-insert are two-step updates
//! of the recency list.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, instrument};

use crate::target::TargetId;

/// Default capacity of the match verdict cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

const NIL: usize = usize::MAX;

#[derive(Debug, Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: usize,
    next: usize,
}

/// Strict LRU map with O(1) `get` and `insert`.
///
/// Entries live in a slab; recency is an index-linked list from `head`
/// (most recent) to `tail` (least recent). Evicted slots are reused, so the
/// slab never grows past `capacity`.
#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    capacity: usize,
    index: HashMap<K, usize>,
    nodes: Vec<Node<K, V>>,
    head: usize,
    tail: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            index: HashMap::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
            head: NIL,
            tail: NIL,
        }
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Looks up `key`, marking it most recently used on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let slot = *self.index.get(key)?;
        self.promote(slot);
        Some(&self.nodes[slot].value)
    }

    /// Looks up `key` without touching recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&slot| &self.nodes[slot].value)
    }

    /// Returns `true` if `key` is present, without touching recency.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Inserts or replaces `key`, evicting the least recently used entry
    /// first when the cache is full. Returns the evicted key, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<K> {
        if let Some(&slot) = self.index.get(&key) {
            self.nodes[slot].value = value;
            self.promote(slot);
            return None;
        }

        if self.nodes.len() < self.capacity {
            let slot = self.nodes.len();
            self.nodes.push(Node {
                key: key.clone(),
                value,
                prev: NIL,
                next: NIL,
            });
            self.index.insert(key, slot);
            self.push_front(slot);
            return None;
        }

        // Full: recycle the tail slot for the new entry.
        let slot = self.tail;
        self.unlink(slot);
        let evicted = std::mem::replace(&mut self.nodes[slot].key, key.clone());
        self.nodes[slot].value = value;
        self.index.remove(&evicted);
        self.index.insert(key, slot);
        self.push_front(slot);
        Some(evicted)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    /// Keys from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while cursor != NIL {
            keys.push(&self.nodes[cursor].key);
            cursor = self.nodes[cursor].next;
        }
        keys
    }

    fn promote(&mut self, slot: usize) {
        if self.head == slot {
            return;
        }
        self.unlink(slot);
        self.push_front(slot);
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);
        if prev == NIL {
            self.head = next;
        } else {
            self.nodes[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.nodes[next].prev = prev;
        }
        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = NIL;
    }

    fn push_front(&mut self, slot: usize) {
        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = self.head;
        if self.head != NIL {
            self.nodes[self.head].prev = slot;
        }
        self.head = slot;
        if self.tail == NIL {
            self.tail = slot;
        }
    }
}

/// Cache key: capped normalized input plus the target it was checked against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    input: String,
    target: TargetId,
}

impl MatchKey {
    /// Builds a key, keeping at most `max_chars` characters of `normalized`.
    pub fn new(normalized: &str, target: &TargetId, max_chars: usize) -> Self {
        Self {
            input: normalized.chars().take(max_chars).collect(),
            target: target.clone(),
        }
    }
}

/// Thread-safe verdict cache used by the matching engine.
#[derive(Debug)]
pub struct MatchCache {
    inner: Mutex<LruCache<MatchKey, bool>>,
}

impl MatchCache {
    /// Creates a cache with the given capacity.
    #[instrument]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Returns the cached verdict, promoting the entry on a hit.
    pub fn get(&self, key: &MatchKey) -> Option<bool> {
        self.lock().get(key).copied()
    }

    /// Stores a verdict.
    pub fn set(&self, key: MatchKey, verdict: bool) {
        if let Some(evicted) = self.lock().insert(key, verdict) {
            debug!(target_id = %evicted.target, "Evicted match verdict");
        }
    }

    /// Drops every cached verdict.
    #[instrument(skip(self))]
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of cached verdicts.
    pub fn size(&self) -> usize {
        self.lock().len()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<MatchKey, bool>> {
        // Mutations finish before the guard drops, so a poisoned lock
        // still guards a consistent list.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MatchCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

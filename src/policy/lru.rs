//! # Heap-Ordered LRU Cache
//!
//! Fixed-capacity key/value cache that evicts the least recently used entry.
//! Recency is a logical clock (`epoch`) stamped on every read and write; an
//! index-tracking binary heap keeps the oldest entry at its root.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                           LruCache<K, V>                                 │
//!   │                                                                          │
//!   │   by_key: FxHashMap<K, SlotId>                                           │
//!   │   ┌──────────┬────────┐                                                  │
//!   │   │   key    │  slot  │                                                  │
//!   │   ├──────────┼────────┤                                                  │
//!   │   │  "a"     │   0    │──────┐                                           │
//!   │   │  "b"     │   1    │──────┼──┐                                        │
//!   │   │  "c"     │   2    │──────┼──┼──┐                                     │
//!   │   └──────────┴────────┘      │  │  │                                     │
//!   │                              ▼  ▼  ▼                                     │
//!   │   by_age: Heap<SlotId, RecencyOrder>                                     │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │ data:  [ 1 | 2 | 0 ]       (slot ids, oldest epoch at the root)    │ │
//!   │   │                                                                    │ │
//!   │   │ order.slots: SlotArena<Entry>   (sole owner of entries)            │ │
//!   │   │   slot 0: { epoch: 7, heap_pos: 2, key: "a", value }               │ │
//!   │   │   slot 1: { epoch: 3, heap_pos: 0, key: "b", value }  ← LRU        │ │
//!   │   │   slot 2: { epoch: 5, heap_pos: 1, key: "c", value }               │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   │                                                                          │
//!   │   epoch: 7      capacity: 3                                              │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The heap's ordering owns the slot arena, so comparisons always read the
//! current epochs, and the heap reports every move back into the entry's
//! `heap_pos`. A refreshed entry is therefore re-sifted in O(log n) from the
//! position stored in its slot.
//!
//! ## Operation Flow
//!
//! ```text
//!   get(k):
//!     miss → None (no state change)
//!     hit  → epoch += 1; slots[id].epoch = epoch; by_age.fix(slots[id].heap_pos)
//!
//!   insert(k, v):
//!     epoch += 1
//!     existing → replace value, stamp epoch, fix; return old value
//!     new, full → id = by_age.pop(); drop slots[id]; by_key.remove(old key)
//!     new      → id = slots.insert({epoch, k, v}); by_key[k] = id; by_age.push(id)
//! ```
//!
//! ## Operations
//!
//! | Operation        | Complexity | Notes                                  |
//! |------------------|------------|----------------------------------------|
//! | `insert`         | O(log n)   | May evict the root first               |
//! | `get`            | O(log n)   | Refreshes recency                      |
//! | `peek`           | O(1)       | No recency change                      |
//! | `touch`          | O(log n)   | Refresh without reading                |
//! | `remove`         | O(log n)   | Heap removal at the tracked position   |
//! | `pop_lru`        | O(log n)   |                                        |
//! | `peek_lru`       | O(1)       |                                        |
//! | `recency_rank`   | O(n)       | Scan                                   |
//!
//! ## Example Usage
//!
//! ```
//! use heapcache::policy::lru::LruCache;
//! use heapcache::traits::CoreCache;
//!
//! let mut cache = LruCache::new(2);
//! cache.insert("a", 1);
//! cache.insert("b", 2);
//!
//! // Reading "a" makes "b" the least recently used entry.
//! assert_eq!(cache.get(&"a"), Some(&1));
//!
//! cache.insert("c", 3);
//! assert!(cache.contains(&"a"));
//! assert!(!cache.contains(&"b"));
//! ```
//!
//! ## Thread Safety
//!
//! `LruCache` is **not** thread-safe. Every call, `get` included, mutates
//! recency state; share it behind a single exclusive lock.
//!
//! ## Capacity
//!
//! Capacity is fixed at construction and storage for that many entries is
//! reserved up front; the arena never grows past it. A capacity of 0 creates
//! a cache that stores nothing. Use [`LruCache::try_new`] to reject it.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::heap::{Heap, HeapOrder};
use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LruMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, LruMetricsReadRecorder, LruMetricsRecorder, MetricsSnapshotProvider,
};
use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

/// One occupied slot.
#[derive(Debug)]
struct Entry<K, V> {
    epoch: u64,
    heap_pos: usize,
    key: K,
    value: V,
}

/// Orders slot ids by the epoch of their entry, oldest first.
///
/// Owns the arena the ids point into, and writes each id's heap position
/// back into its entry whenever the heap moves it.
struct RecencyOrder<K, V> {
    slots: SlotArena<Entry<K, V>>,
}

impl<K, V> RecencyOrder<K, V> {
    #[inline]
    fn epoch(&self, id: SlotId) -> u64 {
        // Vacant ids never reach the heap; treat them as newest.
        self.slots.get(id).map_or(u64::MAX, |entry| entry.epoch)
    }
}

impl<K, V> HeapOrder<SlotId> for RecencyOrder<K, V> {
    #[inline]
    fn better(&self, a: &SlotId, b: &SlotId) -> bool {
        self.epoch(*a) < self.epoch(*b)
    }

    #[inline]
    fn placed(&mut self, id: &SlotId, index: usize) {
        if let Some(entry) = self.slots.get_mut(*id) {
            entry.heap_pos = index;
        }
    }
}

/// Bounded LRU cache over an arena of slots, a key index and an age heap.
///
/// All three structures refer to entries by [`SlotId`]; the arena is the
/// only owner of keys and values besides the key index's own copy of each
/// key.
///
/// # Type Parameters
///
/// - `K`: Key type (`Eq + Hash + Clone`; one clone is kept in the index)
/// - `V`: Value type (no bounds)
pub struct LruCache<K, V> {
    by_key: FxHashMap<K, SlotId>,
    by_age: Heap<SlotId, RecencyOrder<K, V>>,
    capacity: usize,
    epoch: u64,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 creates a cache that accepts no items (all inserts
    /// are no-ops).
    ///
    /// # Example
    ///
    /// ```
    /// use heapcache::policy::lru::LruCache;
    /// use heapcache::traits::CoreCache;
    ///
    /// let cache: LruCache<u32, String> = LruCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        let order = RecencyOrder {
            slots: SlotArena::with_capacity(capacity),
        };
        LruCache {
            by_key: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            by_age: Heap::with_capacity(capacity, order),
            capacity,
            epoch: 0,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        }
    }

    /// Like [`new`](Self::new), but rejects a zero capacity.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if `capacity == 0`.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be greater than 0"));
        }
        Ok(Self::new(capacity))
    }

    /// Current value of the logical clock.
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Reads a value without refreshing its recency.
    ///
    /// # Example
    ///
    /// ```
    /// use heapcache::policy::lru::LruCache;
    /// use heapcache::traits::{CoreCache, LruCacheTrait};
    ///
    /// let mut cache = LruCache::new(2);
    /// cache.insert(1, "one");
    /// cache.insert(2, "two");
    ///
    /// assert_eq!(cache.peek(&1), Some(&"one"));
    /// // Still the least recently used.
    /// assert_eq!(cache.peek_lru(), Some((&1, &"one")));
    /// ```
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.by_key.get(key)?;
        self.slots().get(id).map(|entry| &entry.value)
    }

    /// Verifies that the key index, the age heap and the arena agree.
    ///
    /// Checked after every mutating call in debug builds.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let len = self.by_key.len();
        if self.by_age.len() != len || self.slots().len() != len {
            return Err(InvariantError::new(format!(
                "size mismatch: by_key={} by_age={} slots={}",
                len,
                self.by_age.len(),
                self.slots().len()
            )));
        }
        if len > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                len, self.capacity
            )));
        }
        if self.slots().slots_used() > self.capacity {
            return Err(InvariantError::new(format!(
                "arena handed out {} slots for capacity {}",
                self.slots().slots_used(),
                self.capacity
            )));
        }

        for (key, &id) in &self.by_key {
            let entry = self.slots().get(id).ok_or_else(|| {
                InvariantError::new(format!("key maps to vacant slot {}", id.index()))
            })?;
            if entry.key != *key {
                return Err(InvariantError::new(format!(
                    "slot {} holds a different key than the index",
                    id.index()
                )));
            }
            if self.by_age.as_slice().get(entry.heap_pos) != Some(&id) {
                return Err(InvariantError::new(format!(
                    "slot {} records stale heap position {}",
                    id.index(),
                    entry.heap_pos
                )));
            }
            if entry.epoch > self.epoch {
                return Err(InvariantError::new(format!(
                    "slot {} epoch {} is ahead of the clock {}",
                    id.index(),
                    entry.epoch,
                    self.epoch
                )));
            }
        }

        self.by_age.check_invariants()
    }

    #[inline]
    fn slots(&self) -> &SlotArena<Entry<K, V>> {
        &self.by_age.order().slots
    }

    /// Mutable arena access. Epoch changes must be followed by a heap fix.
    #[inline]
    fn slots_mut(&mut self) -> &mut SlotArena<Entry<K, V>> {
        &mut self.by_age.order_mut().slots
    }

    #[inline]
    fn next_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    /// Re-sifts the heap at `pos` after the entry there was restamped.
    #[inline]
    fn fix_age(&mut self, pos: usize) {
        let fixed = self.by_age.fix(pos);
        debug_assert!(fixed.is_ok(), "tracked heap position {} out of range", pos);
        #[cfg(feature = "metrics")]
        self.metrics.record_heap_fix();
    }

    /// Stamps `id` with a fresh epoch and restores age order.
    fn refresh(&mut self, id: SlotId) {
        let epoch = self.next_epoch();
        let pos = match self.slots_mut().get_mut(id) {
            Some(entry) => {
                entry.epoch = epoch;
                entry.heap_pos
            },
            None => return,
        };
        self.fix_age(pos);
    }

    /// Pops the heap root and releases its slot.
    fn evict_lru(&mut self) -> Option<(K, V)> {
        let id = self.by_age.pop().ok()?;
        let entry = self.slots_mut().remove(id)?;
        self.by_key.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    fn validate_invariants(&self) {
        #[cfg(debug_assertions)]
        if let Err(err) = self.check_invariants() {
            panic!("LruCache {}", err);
        }
    }
}

impl<K, V> CoreCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        let epoch = self.next_epoch();

        if let Some(&id) = self.by_key.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            let (previous, pos) = match self.slots_mut().get_mut(id) {
                Some(entry) => {
                    entry.epoch = epoch;
                    (std::mem::replace(&mut entry.value, value), entry.heap_pos)
                },
                None => return None,
            };
            self.fix_age(pos);
            self.validate_invariants();
            return Some(previous);
        }

        if self.capacity == 0 {
            return None;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        if self.by_key.len() >= self.capacity {
            #[cfg(feature = "metrics")]
            self.metrics.record_evict_call();

            if self.evict_lru().is_some() {
                #[cfg(feature = "metrics")]
                self.metrics.record_evicted_entry();
            }
        }

        // The slot freed by eviction, if any, is the one handed out here.
        let heap_pos = self.by_age.len();
        let id = self.slots_mut().insert(Entry {
            epoch,
            heap_pos,
            key: key.clone(),
            value,
        });
        self.by_key.insert(key, id);
        self.by_age.push(id);

        self.validate_invariants();
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let id = match self.by_key.get(key) {
            Some(&id) => id,
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                return None;
            },
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.refresh(id);
        self.validate_invariants();

        self.slots().get(id).map(|entry| &entry.value)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.by_key.contains_key(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.by_key.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.by_key.clear();
        self.by_age.clear();
        self.slots_mut().clear();

        self.validate_invariants();
    }
}

impl<K, V> MutableCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let id = self.by_key.remove(key)?;
        let pos = self.slots().get(id)?.heap_pos;
        let removed = self.by_age.remove(pos);
        debug_assert_eq!(removed, Ok(id));
        let entry = self.slots_mut().remove(id)?;

        #[cfg(feature = "metrics")]
        self.metrics.record_remove_found();

        self.validate_invariants();
        Some(entry.value)
    }
}

impl<K, V> LruCacheTrait<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_lru(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_call();

        let evicted = self.evict_lru()?;

        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_found();

        self.validate_invariants();
        Some(evicted)
    }

    fn peek_lru(&self) -> Option<(&K, &V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_lru_call();

        let id = *self.by_age.peek()?;
        let entry = self.slots().get(id)?;

        #[cfg(feature = "metrics")]
        self.metrics.record_peek_lru_found();

        Some((&entry.key, &entry.value))
    }

    fn touch(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_touch_call();

        let id = match self.by_key.get(key) {
            Some(&id) => id,
            None => return false,
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_touch_found();

        self.refresh(id);
        self.validate_invariants();
        true
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        #[cfg(feature = "metrics")]
        self.metrics.record_recency_rank_call();

        let id = *self.by_key.get(key)?;
        let epoch = self.slots().get(id)?.epoch;

        // Epochs are unique per entry, so the rank is the count of newer ones.
        let mut rank = 0;
        for (_, entry) in self.slots().iter() {
            #[cfg(feature = "metrics")]
            self.metrics.record_recency_rank_scan_step();
            if entry.epoch > epoch {
                rank += 1;
            }
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_recency_rank_found();

        Some(rank)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            insert_calls: self.metrics.insert_calls,
            insert_updates: self.metrics.insert_updates,
            insert_new: self.metrics.insert_new,
            evict_calls: self.metrics.evict_calls,
            evicted_entries: self.metrics.evicted_entries,
            pop_lru_calls: self.metrics.pop_lru_calls,
            pop_lru_found: self.metrics.pop_lru_found,
            peek_lru_calls: self.metrics.peek_lru_calls.get(),
            peek_lru_found: self.metrics.peek_lru_found.get(),
            touch_calls: self.metrics.touch_calls,
            touch_found: self.metrics.touch_found,
            remove_calls: self.metrics.remove_calls,
            remove_found: self.metrics.remove_found,
            recency_rank_calls: self.metrics.recency_rank_calls.get(),
            recency_rank_found: self.metrics.recency_rank_found.get(),
            recency_rank_scan_steps: self.metrics.recency_rank_scan_steps.get(),
            heap_fixes: self.metrics.heap_fixes,
            cache_len: self.by_key.len(),
            capacity: self.capacity,
            epoch: self.epoch,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LruMetricsSnapshot> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> LruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.by_key.len())
            .field("capacity", &self.capacity)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU cache with a default capacity of 16.
    fn default() -> Self {
        Self::new(16)
    }
}

impl<K, V> Extend<(K, V)> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys_of<V>(cache: &LruCache<u32, V>) -> Vec<u32> {
        let mut keys: Vec<u32> = cache.by_key.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    // ==============================================
    // CORRECTNESS TESTS MODULE
    // ==============================================
    mod correctness {
        use super::*;

        mod basic_behavior {
            use super::*;

            #[test]
            fn test_new_cache_creation() {
                let cache1: LruCache<i32, i32> = LruCache::new(0);
                assert_eq!(cache1.capacity(), 0);
                assert_eq!(cache1.len(), 0);

                let cache2: LruCache<i32, i32> = LruCache::new(10);
                assert_eq!(cache2.capacity(), 10);
                assert!(cache2.is_empty());
                assert_eq!(cache2.epoch(), 0);
            }

            #[test]
            fn test_insert_then_get_round_trip() {
                let mut cache = LruCache::new(5);
                assert_eq!(cache.insert(1, "one"), None);
                assert_eq!(cache.get(&1), Some(&"one"));
                assert_eq!(cache.len(), 1);
            }

            #[test]
            fn test_insert_existing_returns_previous_and_keeps_len() {
                let mut cache = LruCache::new(2);
                cache.insert(1, "first".to_string());
                cache.insert(2, "second".to_string());
                assert_eq!(cache.insert(1, "updated".to_string()), Some("first".to_string()));
                assert_eq!(cache.len(), 2);
                assert_eq!(cache.get(&1).map(String::as_str), Some("updated"));
            }

            #[test]
            fn test_get_miss_has_no_side_effects() {
                let mut cache = LruCache::new(3);
                cache.insert(1, 10);
                cache.insert(2, 20);
                let epoch = cache.epoch();

                assert_eq!(cache.get(&99), None);
                assert_eq!(cache.len(), 2);
                assert_eq!(cache.epoch(), epoch);
                assert_eq!(cache.peek_lru(), Some((&1, &10)));
            }

            #[test]
            fn test_peek_does_not_refresh() {
                let mut cache = LruCache::new(2);
                cache.insert(1, 'a');
                cache.insert(2, 'b');
                assert_eq!(cache.peek(&1), Some(&'a'));

                cache.insert(3, 'c');
                assert!(!cache.contains(&1));
                assert!(cache.contains(&2));
            }

            #[test]
            fn test_epoch_advances_on_hits_and_writes() {
                let mut cache = LruCache::new(2);
                cache.insert(1, ());
                assert_eq!(cache.epoch(), 1);
                cache.insert(1, ());
                assert_eq!(cache.epoch(), 2);
                cache.get(&1);
                assert_eq!(cache.epoch(), 3);
                cache.touch(&1);
                assert_eq!(cache.epoch(), 4);
                cache.get(&7);
                assert_eq!(cache.epoch(), 4);
            }
        }

        mod eviction_order {
            use super::*;

            #[test]
            fn test_reference_scenario() {
                let mut cache = LruCache::new(5);
                cache.insert(1, "one");
                cache.insert(2, "two");
                cache.insert(3, "three");

                assert_eq!(cache.get(&1), Some(&"one"));
                cache.insert(100, "one hundred");
                cache.insert(200, "two hundred");
                cache.insert(300, "three hundred");
                cache.insert(400, "four hundred");

                assert_eq!(keys_of(&cache), vec![1, 100, 200, 300, 400]);
                assert_eq!(cache.get(&1), Some(&"one"));
                assert_eq!(cache.get(&2), None);
                assert_eq!(cache.get(&3), None);
                assert_eq!(cache.get(&400), Some(&"four hundred"));
            }

            #[test]
            fn test_read_refresh_protects_entry() {
                let capacity = 4;
                let mut cache = LruCache::new(capacity);
                for k in 1..=capacity as u32 {
                    cache.insert(k, k * 10);
                }
                cache.get(&1);
                cache.insert(5, 50);

                assert!(cache.contains(&1));
                assert!(!cache.contains(&2));
                assert_eq!(keys_of(&cache), vec![1, 3, 4, 5]);
            }

            #[test]
            fn test_update_refreshes_without_evicting() {
                let mut cache = LruCache::new(3);
                cache.insert(1, 1);
                cache.insert(2, 2);
                cache.insert(3, 3);
                cache.insert(1, 11);
                assert_eq!(cache.len(), 3);

                cache.insert(4, 4);
                assert_eq!(keys_of(&cache), vec![1, 3, 4]);
            }

            #[test]
            fn test_evicted_slot_is_reused() {
                let mut cache = LruCache::new(3);
                for k in 0..3u32 {
                    cache.insert(k, k);
                }
                let victim_slot = cache.by_key[&0];
                cache.insert(10, 10);
                assert_eq!(cache.by_key[&10], victim_slot);
                assert_eq!(cache.slots().slots_used(), 3);
            }

            #[test]
            fn test_pop_lru_drains_oldest_first() {
                let mut cache = LruCache::new(4);
                for k in [4u32, 2, 3, 1] {
                    cache.insert(k, ());
                }
                cache.touch(&4);

                let order: Vec<u32> = std::iter::from_fn(|| cache.pop_lru().map(|(k, _)| k)).collect();
                assert_eq!(order, vec![2, 3, 1, 4]);
                assert!(cache.is_empty());
            }

            #[test]
            fn test_recency_rank_tracks_reads() {
                let mut cache = LruCache::new(3);
                cache.insert(1, ());
                cache.insert(2, ());
                cache.insert(3, ());
                cache.get(&1);

                assert_eq!(cache.recency_rank(&1), Some(0));
                assert_eq!(cache.recency_rank(&3), Some(1));
                assert_eq!(cache.recency_rank(&2), Some(2));
                assert_eq!(cache.recency_rank(&9), None);
            }
        }

        mod removal {
            use super::*;

            #[test]
            fn test_remove_frees_slot_for_new_key() {
                let mut cache = LruCache::new(3);
                cache.insert(1, "a");
                cache.insert(2, "b");
                cache.insert(3, "c");

                assert_eq!(cache.remove(&2), Some("b"));
                assert_eq!(cache.remove(&2), None);
                assert_eq!(cache.len(), 2);

                // Room again: no eviction.
                cache.insert(4, "d");
                assert_eq!(keys_of(&cache), vec![1, 3, 4]);
                assert_eq!(cache.slots().slots_used(), 3);
            }

            #[test]
            fn test_remove_middle_of_heap_keeps_order() {
                let mut cache = LruCache::new(8);
                for k in 0..8u32 {
                    cache.insert(k, k);
                }
                cache.remove(&3);
                cache.remove(&0);
                cache.get(&1);

                let order: Vec<u32> = std::iter::from_fn(|| cache.pop_lru().map(|(k, _)| k)).collect();
                assert_eq!(order, vec![2, 4, 5, 6, 7, 1]);
            }

            #[test]
            fn test_clear_resets_everything_but_clock() {
                let mut cache = LruCache::new(3);
                cache.extend([(1, 1), (2, 2), (3, 3)]);
                let epoch = cache.epoch();
                cache.clear();

                assert!(cache.is_empty());
                assert_eq!(cache.peek_lru(), None);
                assert_eq!(cache.epoch(), epoch);

                cache.insert(9, 9);
                assert_eq!(cache.get(&9), Some(&9));
            }
        }
    }

    // ==============================================
    // EDGE CASES MODULE
    // ==============================================
    mod edge_cases {
        use super::*;

        #[test]
        fn test_zero_capacity_rejects_inserts() {
            let mut cache = LruCache::new(0);
            assert_eq!(cache.insert(1, 1), None);
            assert_eq!(cache.len(), 0);
            assert_eq!(cache.get(&1), None);
            assert_eq!(cache.pop_lru(), None);
        }

        #[test]
        fn test_try_new_rejects_zero() {
            assert!(LruCache::<u8, u8>::try_new(0).is_err());
            assert_eq!(LruCache::<u8, u8>::try_new(4).map(|c| c.capacity()), Ok(4));
        }

        #[test]
        fn test_capacity_one() {
            let mut cache = LruCache::new(1);
            cache.insert("a", 1);
            cache.insert("b", 2);
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.peek(&"a"), None);
            assert_eq!(cache.get(&"b"), Some(&2));
        }

        #[test]
        fn test_arena_never_reallocates() {
            let mut cache = LruCache::new(16);
            let reserved = cache.slots().capacity();
            for k in 0..200u32 {
                cache.insert(k, k);
                if k % 3 == 0 {
                    cache.remove(&(k / 2));
                }
                cache.get(&(k / 4));
            }
            assert_eq!(cache.slots().capacity(), reserved);
            assert!(cache.slots().slots_used() <= 16);
        }

        #[test]
        fn test_non_copy_keys() {
            let mut cache: LruCache<String, Vec<u8>> = LruCache::new(2);
            cache.insert("x".to_string(), vec![1]);
            cache.insert("y".to_string(), vec![2]);
            cache.get(&"x".to_string());
            cache.insert("z".to_string(), vec![3]);
            assert!(cache.contains(&"x".to_string()));
            assert!(!cache.contains(&"y".to_string()));
        }

        #[test]
        fn test_check_invariants_catches_stale_position() {
            let mut cache = LruCache::new(4);
            for k in 0..4u32 {
                cache.insert(k, ());
            }
            assert!(cache.check_invariants().is_ok());

            let id = cache.by_key[&2];
            if let Some(entry) = cache.slots_mut().get_mut(id) {
                entry.heap_pos = 99;
            }
            let err = cache.check_invariants().unwrap_err();
            assert!(err.message().contains("heap position"));
        }

        #[test]
        fn test_debug_output() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 1);
            let dbg = format!("{:?}", cache);
            assert!(dbg.contains("LruCache"));
            assert!(dbg.contains("len: 1"));
        }

        #[test]
        fn test_default_capacity() {
            let cache: LruCache<u8, u8> = LruCache::default();
            assert_eq!(cache.capacity(), 16);
        }
    }

    // ==============================================
    // METRICS MODULE
    // ==============================================
    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn test_snapshot_counts_hits_misses_and_evictions() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.get(&1);
            cache.get(&5);
            cache.insert(3, 3);
            cache.insert(3, 30);
            cache.peek_lru();

            let snapshot = cache.snapshot();
            assert_eq!(snapshot.get_hits, 1);
            assert_eq!(snapshot.get_misses, 1);
            assert_eq!(snapshot.insert_calls, 4);
            assert_eq!(snapshot.insert_new, 3);
            assert_eq!(snapshot.insert_updates, 1);
            assert_eq!(snapshot.evicted_entries, 1);
            assert_eq!(snapshot.heap_fixes, 2);
            assert_eq!(snapshot.peek_lru_calls, 1);
            assert_eq!(snapshot.cache_len, 2);
            assert_eq!(snapshot.epoch, cache.epoch());
        }
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Insert(u8, u16),
        Get(u8),
        Touch(u8),
        Remove(u8),
        PopLru,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (any::<u8>(), any::<u16>()).prop_map(|(k, v)| Op::Insert(k % 32, v)),
            3 => any::<u8>().prop_map(|k| Op::Get(k % 32)),
            1 => any::<u8>().prop_map(|k| Op::Touch(k % 32)),
            1 => any::<u8>().prop_map(|k| Op::Remove(k % 32)),
            1 => Just(Op::PopLru),
        ]
    }

    /// Reference model: most recent key at the back.
    #[derive(Default)]
    struct Model {
        order: Vec<(u8, u16)>,
    }

    impl Model {
        fn position(&self, key: u8) -> Option<usize> {
            self.order.iter().position(|(k, _)| *k == key)
        }

        fn bump(&mut self, at: usize) {
            let item = self.order.remove(at);
            self.order.push(item);
        }
    }

    proptest! {
        /// Property: cache agrees with a vector-backed LRU model
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_matches_reference_model(
            capacity in 1usize..12,
            ops in prop::collection::vec(op_strategy(), 0..200),
        ) {
            let mut cache = LruCache::new(capacity);
            let mut model = Model::default();

            for op in ops {
                match op {
                    Op::Insert(k, v) => {
                        let expected = match model.position(k) {
                            Some(at) => {
                                let old = model.order[at].1;
                                model.order[at].1 = v;
                                model.bump(at);
                                Some(old)
                            },
                            None => {
                                if model.order.len() == capacity {
                                    model.order.remove(0);
                                }
                                model.order.push((k, v));
                                None
                            },
                        };
                        prop_assert_eq!(cache.insert(k, v), expected);
                    },
                    Op::Get(k) => {
                        let expected = model.position(k).map(|at| {
                            let v = model.order[at].1;
                            model.bump(at);
                            v
                        });
                        prop_assert_eq!(cache.get(&k).copied(), expected);
                    },
                    Op::Touch(k) => {
                        let found = model.position(k).map(|at| model.bump(at)).is_some();
                        prop_assert_eq!(cache.touch(&k), found);
                    },
                    Op::Remove(k) => {
                        let expected = model.position(k).map(|at| model.order.remove(at).1);
                        prop_assert_eq!(cache.remove(&k), expected);
                    },
                    Op::PopLru => {
                        let expected = if model.order.is_empty() {
                            None
                        } else {
                            Some(model.order.remove(0))
                        };
                        prop_assert_eq!(cache.pop_lru(), expected);
                    },
                }

                prop_assert!(cache.len() <= capacity);
                prop_assert_eq!(cache.len(), model.order.len());
                prop_assert_eq!(cache.peek_lru().map(|(k, v)| (*k, *v)), model.order.first().copied());
                prop_assert!(cache.check_invariants().is_ok());
            }
        }

        /// Property: insert-only workloads fill to min(distinct, capacity)
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_len_is_min_of_distinct_and_capacity(
            capacity in 1usize..20,
            keys in prop::collection::vec(any::<u8>(), 0..100),
        ) {
            let mut cache = LruCache::new(capacity);
            let mut distinct = std::collections::HashSet::new();
            for k in keys {
                cache.insert(k, ());
                distinct.insert(k);
                prop_assert_eq!(cache.len(), distinct.len().min(capacity));
            }
        }
    }
}

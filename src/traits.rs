//! # Cache Traits
//!
//! Bounded-cache interface in three layers. Generic code asks for the
//! narrowest layer it needs; [`LruCache`](crate::policy::lru::LruCache)
//! implements all three.
//!
//! ```text
//!   CoreCache<K, V>        insert · get · contains · len · is_empty
//!        │                 capacity · clear
//!        ▼
//!   MutableCache<K, V>     remove · remove_batch
//!        │
//!        ▼
//!   LruCacheTrait<K, V>    pop_lru · peek_lru · touch · recency_rank
//! ```
//!
//! `get` and `touch` take `&mut self` because a read moves the entry to the
//! fresh end of the recency order. Sharing a cache across threads therefore
//! needs an exclusive lock around every call.
//!
//! `is_empty` and `remove_batch` have default bodies; everything else is
//! per-implementation.

/// Insertion, lookup and sizing.
///
/// # Example
///
/// ```
/// use heapcache::policy::lru::LruCache;
/// use heapcache::traits::CoreCache;
///
/// fn load_pages<C: CoreCache<u32, Vec<u8>>>(cache: &mut C, pages: u32) {
///     for page in 0..pages {
///         cache.insert(page, vec![0; 4]);
///     }
/// }
///
/// let mut pages = LruCache::new(8);
/// load_pages(&mut pages, 20);
/// assert_eq!(pages.len(), 8);
/// assert!(pages.contains(&19));
/// assert!(!pages.contains(&0));
/// ```
pub trait CoreCache<K, V> {
    /// Stores `value` under `key` and returns the value it replaced.
    ///
    /// A new key arriving at a full cache first evicts one entry chosen by
    /// the cache's policy. Replacing an existing key never evicts.
    ///
    /// ```
    /// use heapcache::policy::lru::LruCache;
    /// use heapcache::traits::CoreCache;
    ///
    /// let mut sessions = LruCache::new(4);
    /// assert_eq!(sessions.insert("alice", 1), None);
    /// assert_eq!(sessions.insert("alice", 2), Some(1));
    /// assert_eq!(sessions.len(), 1);
    /// ```
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Looks up `key`, counting the lookup as a use.
    ///
    /// A miss changes nothing. [`contains`](Self::contains) answers the same
    /// question without the side effect.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Membership test that leaves the eviction order alone.
    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upper bound on `len()`, fixed at construction.
    fn capacity(&self) -> usize;

    /// Drops every entry. Capacity is unchanged.
    fn clear(&mut self);
}

/// Explicit invalidation by key.
///
/// # Example
///
/// ```
/// use heapcache::policy::lru::LruCache;
/// use heapcache::traits::{CoreCache, MutableCache};
///
/// let mut routes = LruCache::new(4);
/// routes.insert("/a", 200);
/// routes.insert("/b", 404);
///
/// assert_eq!(routes.remove(&"/b"), Some(404));
/// assert_eq!(routes.remove(&"/b"), None);
/// assert_eq!(routes.len(), 1);
/// ```
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Deletes `key`, returning its value if it was resident.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// [`remove`](Self::remove) for each key; results line up with `keys`.
    ///
    /// ```
    /// use heapcache::policy::lru::LruCache;
    /// use heapcache::traits::{CoreCache, MutableCache};
    ///
    /// let mut cache = LruCache::new(4);
    /// cache.extend([(10, 'x'), (20, 'y')]);
    ///
    /// assert_eq!(cache.remove_batch(&[20, 30, 10]), vec![Some('y'), None, Some('x')]);
    /// assert!(cache.is_empty());
    /// ```
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }
}

/// Direct access to the recency order.
///
/// # Example
///
/// ```
/// use heapcache::policy::lru::LruCache;
/// use heapcache::traits::{CoreCache, LruCacheTrait};
///
/// let mut cache = LruCache::new(3);
/// cache.extend([('a', 1), ('b', 2), ('c', 3)]);
///
/// cache.get(&'a');
/// assert_eq!(cache.peek_lru(), Some((&'b', &2)));
///
/// cache.touch(&'b');
/// assert_eq!(cache.pop_lru(), Some(('c', 3)));
/// ```
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Evicts the stalest entry. `None` when empty.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// The entry `pop_lru` would return, without removing or refreshing it.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Counts as a use of `key` without reading it. `false` on a miss.
    fn touch(&mut self, key: &K) -> bool;

    /// How many resident entries were used more recently than `key`.
    ///
    /// ```
    /// use heapcache::policy::lru::LruCache;
    /// use heapcache::traits::{CoreCache, LruCacheTrait};
    ///
    /// let mut cache = LruCache::new(4);
    /// cache.extend([(1, ()), (2, ()), (3, ())]);
    /// cache.get(&1);
    ///
    /// assert_eq!(cache.recency_rank(&1), Some(0));
    /// assert_eq!(cache.recency_rank(&3), Some(1));
    /// assert_eq!(cache.recency_rank(&2), Some(2));
    /// assert_eq!(cache.recency_rank(&9), None);
    /// ```
    fn recency_rank(&self, key: &K) -> Option<usize>;
}

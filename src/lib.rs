#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

mod entry;
mod stats;

use std::{
    fmt,
    hash::Hash,
    mem,
    num::NonZeroUsize,
};

use indexmap::IndexMap;

pub use entry::EntryMut;
pub use stats::CacheStats;

#[cfg(not(feature = "ahash"))]
type RandomState = std::hash::RandomState;
#[cfg(feature = "ahash")]
type RandomState = ahash::RandomState;

/// One cached entry plus its links into the recency list.
///
/// Links are positions in the owning `IndexMap`, not pointers: `next` walks
/// toward the most-recently-used end, `prev` toward the least-recently-used
/// end. A boundary node has `None` on the open side.
#[derive(Debug, Clone, Copy)]
struct Node<V> {
    value: V,
    next: Option<usize>,
    prev: Option<usize>,
}

impl<V> Node<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            next: None,
            prev: None,
        }
    }
}

/// A fixed-capacity key-value cache with least-recently-used eviction.
///
/// The cache holds at most `capacity` entries. Inserting a new key into a
/// full cache evicts the entry that has gone the longest without being used
/// and returns it to the caller. Operations that use a value ([`get`],
/// [`get_mut`], [`insert`], [`replace`], [`get_or_insert_with`]) promote the
/// entry to most-recently-used; [`peek`], [`tail`], [`iter`], and
/// [`contains_key`] never disturb the order.
///
/// Entries live in a single [`IndexMap`] that doubles as the list arena: the
/// map provides the key index, and each entry carries `prev`/`next` positions
/// threading an intrusive doubly linked list from the least-recently-used
/// tail to the most-recently-used head. Removal uses `swap_remove`, patching
/// the links of whichever entry gets relocated into the vacated slot.
///
/// # Time Complexity
/// - Insert/Get/Replace/Remove: O(1) average, O(n) worst case
/// - Peek/Contains: O(1) average, O(n) worst case
/// - Pop/Clear: O(1)
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use recency::LruCache;
///
/// let mut cache = LruCache::new(NonZeroUsize::new(3).unwrap());
/// cache.insert(1, "one");
/// cache.insert(2, "two");
/// cache.insert(3, "three");
///
/// cache.get(&1); // Mark as recently used
/// cache.insert(4, "four"); // Evicts key 2
///
/// // Iteration runs in eviction order, least recently used first.
/// assert_eq!(
///     cache.into_iter().collect::<Vec<_>>(),
///     [(3, "three"), (1, "one"), (4, "four")]
/// );
/// ```
///
/// [`get`]: Self::get
/// [`get_mut`]: Self::get_mut
/// [`insert`]: Self::insert
/// [`replace`]: Self::replace
/// [`get_or_insert_with`]: Self::get_or_insert_with
/// [`peek`]: Self::peek
/// [`tail`]: Self::tail
/// [`iter`]: Self::iter
/// [`contains_key`]: Self::contains_key
#[derive(Clone)]
pub struct LruCache<K, V> {
    entries: IndexMap<K, Node<V>, RandomState>,
    capacity: NonZeroUsize,
    head: usize,
    tail: usize,
    stats: CacheStats,
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("entries", &self.entries)
            .field("capacity", &self.capacity)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Link maintenance. None of these touch the hash index, so they carry no
/// `Hash + Eq` bounds; this also lets the [`EntryMut`] guard reorder entries
/// from its `Drop` impl.
impl<K, V> LruCache<K, V> {
    /// Moves the entry at `index` to the most-recently-used position.
    ///
    /// The entry may currently be the head (no-op, which also covers the
    /// solitary-node case), the tail, or an interior node. Each case leaves
    /// the list a valid chain of unchanged length.
    pub(crate) fn touch(&mut self, index: usize) {
        if self.head == index {
            return;
        }

        let old_prev = self.entries[index].prev;
        let old_next = self.entries[index].next;

        if self.tail == index {
            // Not the head, so a successor exists.
            self.tail = old_next.unwrap_or_default();
        }
        if let Some(prev) = old_prev {
            self.entries[prev].next = old_next;
        }
        if let Some(next) = old_next {
            self.entries[next].prev = old_prev;
        }

        let old_head = self.head;
        self.entries[index].next = None;
        self.entries[index].prev = Some(old_head);
        self.entries[old_head].next = Some(index);
        self.head = index;
    }

    /// Links a freshly inserted entry (at map position `index`, with both
    /// links unset) as the new head.
    fn attach(&mut self, index: usize) {
        if self.entries.len() == 1 {
            self.head = index;
            self.tail = index;
            return;
        }

        let old_head = self.head;
        self.entries[index].prev = Some(old_head);
        self.entries[old_head].next = Some(index);
        self.head = index;
    }

    /// Removes the entry at `index`, unlinking it and repairing the links of
    /// the entry that `swap_remove` relocates into the vacated slot.
    fn detach(&mut self, index: usize) -> Option<(K, Node<V>)> {
        if index >= self.entries.len() {
            return None;
        }
        if self.entries.len() == 1 {
            return self.entries.swap_remove_index(index);
        }

        let (key, node) = self.entries.swap_remove_index(index)?;
        if self.entries.len() == 1 {
            self.head = 0;
            self.tail = 0;
            self.entries[0].prev = None;
            self.entries[0].next = None;
            return Some((key, node));
        }

        // The entry that used to sit at position `moved` now sits at `index`
        // (unless `index` itself was the last position). Any link or
        // head/tail position still naming `moved` has to be redirected.
        let moved = self.entries.len();

        if index == self.head {
            self.head = node.prev.unwrap_or_default();
        }
        if self.head == moved {
            self.head = index;
        }
        if index == self.tail {
            self.tail = node.next.unwrap_or_default();
        }
        if self.tail == moved {
            self.tail = index;
        }

        if let Some(prev) = node.prev {
            let next = if prev == moved {
                &mut self.entries[index].next
            } else {
                &mut self.entries[prev].next
            };
            *next = if node.next == Some(moved) {
                Some(index)
            } else {
                node.next
            };
        }
        if let Some(next) = node.next {
            let prev = if next == moved {
                &mut self.entries[index].prev
            } else {
                &mut self.entries[next].prev
            };
            *prev = if node.prev == Some(moved) {
                Some(index)
            } else {
                node.prev
            };
        }

        if index == moved {
            return Some((key, node));
        }

        // Point the relocated entry's neighbors back at its new position.
        if let Some(next) = self.entries[index].next {
            self.entries[next].prev = Some(index);
        }
        if let Some(prev) = self.entries[index].prev {
            self.entries[prev].next = Some(index);
        }

        Some((key, node))
    }

    /// Removes and returns the least-recently-used entry.
    fn evict(&mut self) -> Option<(K, V)> {
        if self.entries.is_empty() {
            return None;
        }
        let index = self.tail;
        self.detach(index).map(|(key, node)| (key, node.value))
    }
}

impl<K: Hash + Eq, V> LruCache<K, V> {
    /// Creates a new, empty cache with the specified capacity.
    ///
    /// The capacity is fixed for the lifetime of the cache. Taking a
    /// [`NonZeroUsize`] rejects a zero capacity before construction: a cache
    /// that can hold nothing has no meaningful eviction behavior.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use recency::LruCache;
    ///
    /// let cache: LruCache<i32, String> = LruCache::new(NonZeroUsize::new(100).unwrap());
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: IndexMap::with_capacity_and_hasher(capacity.get(), RandomState::default()),
            capacity,
            head: 0,
            tail: 0,
            stats: CacheStats::default(),
        }
    }

    /// Removes all entries from the cache.
    ///
    /// Afterwards the cache behaves as freshly constructed with the same
    /// capacity; calling it again is a no-op. Statistics counters are
    /// cumulative and survive a clear, see
    /// [`reset_stats`](Self::reset_stats).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use recency::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(3).unwrap());
    /// cache.insert(1, "one");
    /// cache.insert(2, "two");
    ///
    /// cache.clear();
    /// assert!(cache.is_empty());
    /// assert_eq!(cache.capacity(), 3);
    /// ```
    pub fn clear(&mut self) {
        self.entries.clear();
        self.head = 0;
        self.tail = 0;
    }

    /// Returns a reference to the value without updating its position in the
    /// recency order.
    ///
    /// Unlike [`get()`](Self::get), this will not mark the entry as used, so
    /// repeated peeks leave the eviction order exactly as it was.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use recency::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
    /// cache.insert("a", 1);
    /// cache.insert("b", 2);
    ///
    /// assert_eq!(cache.peek(&"a"), Some(&1));
    /// // "a" is still the eviction victim.
    /// assert_eq!(cache.tail(), Some((&"a", &1)));
    /// ```
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|node| &node.value)
    }

    /// Returns a guard for mutable access that only promotes the entry if it
    /// is actually written through.
    ///
    /// The returned [`EntryMut`] dereferences to the value. Reading through
    /// it leaves the recency order untouched; any mutable access marks the
    /// guard dirty, and a dirty guard moves its entry to the
    /// most-recently-used position when dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use recency::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(3).unwrap());
    /// cache.insert("a", vec![1]);
    /// cache.insert("b", vec![2]);
    ///
    /// // Read-only use: "a" stays the eviction victim.
    /// if let Some(entry) = cache.peek_mut(&"a") {
    ///     assert_eq!(entry.len(), 1);
    /// }
    /// assert_eq!(cache.tail().unwrap().0, &"a");
    ///
    /// // Writing through the guard promotes "a" on drop.
    /// if let Some(mut entry) = cache.peek_mut(&"a") {
    ///     entry.push(10);
    /// }
    /// assert_eq!(cache.tail().unwrap().0, &"b");
    /// ```
    pub fn peek_mut(&'_ mut self, key: &K) -> Option<EntryMut<'_, K, V>> {
        self.entries
            .get_index_of(key)
            .map(|index| EntryMut::new(index, self))
    }

    /// Returns a reference to the entry that would be evicted next, without
    /// touching it.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use recency::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(3).unwrap());
    /// assert_eq!(cache.tail(), None);
    ///
    /// cache.insert(1, "one");
    /// cache.insert(2, "two");
    /// assert_eq!(cache.tail(), Some((&1, &"one")));
    /// ```
    pub fn tail(&self) -> Option<(&K, &V)> {
        self.entries
            .get_index(self.tail)
            .map(|(key, node)| (key, &node.value))
    }

    /// Returns true if the cache contains the given key.
    ///
    /// Does not update the entry's position in the recency order.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Gets the value for a key, or inserts it using the provided function.
    ///
    /// A hit marks the entry as used; a miss inserts, evicting the
    /// least-recently-used entry if the cache is full.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use recency::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(3).unwrap());
    ///
    /// let value = cache.get_or_insert_with(1, |&key| format!("value_{}", key));
    /// assert_eq!(value, "value_1");
    ///
    /// // Existing key: the function is not called.
    /// let value = cache.get_or_insert_with(1, |&key| format!("different_{}", key));
    /// assert_eq!(value, "value_1");
    /// ```
    pub fn get_or_insert_with(&mut self, key: K, or_insert: impl FnOnce(&K) -> V) -> &V {
        self.get_or_insert_with_mut(key, or_insert)
    }

    /// Gets the value for a key, or inserts it using the provided function,
    /// returning a mutable reference.
    ///
    /// This is the mutable version of
    /// [`get_or_insert_with()`](Self::get_or_insert_with).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use recency::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(3).unwrap());
    ///
    /// let value = cache.get_or_insert_with_mut(1, |&key| format!("value_{}", key));
    /// value.push_str("_modified");
    /// assert_eq!(cache.peek(&1), Some(&"value_1_modified".to_string()));
    /// ```
    pub fn get_or_insert_with_mut(&mut self, key: K, or_insert: impl FnOnce(&K) -> V) -> &mut V {
        if let Some(index) = self.entries.get_index_of(&key) {
            self.touch(index);
            self.stats.record_hit();
            return &mut self.entries[index].value;
        }

        self.stats.record_miss();
        if self.entries.len() >= self.capacity.get() {
            self.evict();
            self.stats.record_eviction();
        }

        let value = or_insert(&key);
        let (index, _) = self.entries.insert_full(key, Node::new(value));
        self.attach(index);
        self.stats.record_insert();
        &mut self.entries[index].value
    }

    /// Inserts a key-value pair, returning the entry evicted to make room.
    ///
    /// If the key already exists its value is overwritten in place and the
    /// entry moves to the most-recently-used position; the cache size is
    /// unchanged and nothing is evicted. If the key is new and the cache is
    /// full, the least-recently-used entry is evicted and returned as
    /// `Some((key, value))`.
    ///
    /// Note the return value is the *evicted* entry, not the previous value
    /// of an overwritten key; use [`replace()`](Self::replace) to observe the
    /// value being replaced.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use recency::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
    /// assert_eq!(cache.insert("a", 1), None);
    /// assert_eq!(cache.insert("b", 2), None);
    ///
    /// // Overwriting an existing key never evicts.
    /// assert_eq!(cache.insert("a", 10), None);
    /// assert_eq!(cache.len(), 2);
    ///
    /// // A new key in a full cache evicts the least recently used entry.
    /// assert_eq!(cache.insert("c", 3), Some(("b", 2)));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(index) = self.entries.get_index_of(&key) {
            self.entries[index].value = value;
            self.touch(index);
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity.get() {
            self.stats.record_eviction();
            self.evict()
        } else {
            None
        };

        let (index, _) = self.entries.insert_full(key, Node::new(value));
        self.attach(index);
        self.stats.record_insert();
        evicted
    }

    /// Gets a value from the cache, marking it as used.
    ///
    /// A hit moves the entry to the most-recently-used position; lookups are
    /// not read-only from the cache's perspective. Use
    /// [`peek()`](Self::peek) when the eviction order must not change.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use recency::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
    /// cache.insert("a", 1);
    /// cache.insert("b", 2);
    ///
    /// assert_eq!(cache.get(&"a"), Some(&1));
    /// // "a" was just used, so "b" is now the victim.
    /// assert_eq!(cache.insert("c", 3), Some(("b", 2)));
    /// ```
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.get_mut(key).map(|value| &*value)
    }

    /// Gets a mutable reference to a value, marking the entry as used.
    ///
    /// This is the mutable version of [`get()`](Self::get).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use recency::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
    /// cache.insert(1, "one".to_string());
    ///
    /// if let Some(value) = cache.get_mut(&1) {
    ///     value.push_str("_modified");
    /// }
    /// assert_eq!(cache.peek(&1), Some(&"one_modified".to_string()));
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        if let Some(index) = self.entries.get_index_of(key) {
            self.touch(index);
            self.stats.record_hit();
            Some(&mut self.entries[index].value)
        } else {
            self.stats.record_miss();
            None
        }
    }

    /// Updates the value of an existing key, returning the previous value.
    ///
    /// Never inserts: if the key is absent the cache is left untouched and
    /// `None` is returned. A successful replace counts as a use and moves
    /// the entry to the most-recently-used position. Size never changes and
    /// nothing is ever evicted.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use recency::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
    /// cache.insert("a", 1);
    /// cache.insert("b", 2);
    ///
    /// assert_eq!(cache.replace(&"a", 10), Some(1));
    /// assert_eq!(cache.replace(&"c", 30), None);
    /// assert_eq!(cache.len(), 2);
    ///
    /// // The replaced entry counts as used, so "b" is now the victim.
    /// assert_eq!(cache.insert("d", 4), Some(("b", 2)));
    /// ```
    pub fn replace(&mut self, key: &K, value: V) -> Option<V> {
        let Some(index) = self.entries.get_index_of(key) else {
            self.stats.record_miss();
            return None;
        };

        let previous = mem::replace(&mut self.entries[index].value, value);
        self.touch(index);
        self.stats.record_hit();
        Some(previous)
    }

    /// Removes and returns the least-recently-used entry.
    ///
    /// Returns `None` when the cache is empty. This is the eviction
    /// primitive; [`insert()`](Self::insert) performs the same removal when
    /// it overflows capacity, and it is exposed here for manual capacity
    /// management.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use recency::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(3).unwrap());
    /// cache.insert(1, "one");
    /// cache.insert(2, "two");
    ///
    /// assert_eq!(cache.pop(), Some((1, "one")));
    /// assert_eq!(cache.pop(), Some((2, "two")));
    /// assert_eq!(cache.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<(K, V)> {
        self.evict()
    }

    /// Removes a specific entry from the cache, returning its value.
    ///
    /// The entry is spliced out of the recency list wherever it sits; the
    /// surviving entries keep their relative order.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use recency::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(3).unwrap());
    /// cache.insert(1, "one");
    /// cache.insert(2, "two");
    ///
    /// assert_eq!(cache.remove(&1), Some("one"));
    /// assert_eq!(cache.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.entries.get_index_of(key)?;
        self.detach(index).map(|(_, node)| node.value)
    }

    /// Returns true if the cache contains no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of entries currently in the cache.
    ///
    /// Never exceeds [`capacity()`](Self::capacity).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the maximum number of entries the cache can hold.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Returns a copy of the usage counters gathered so far.
    ///
    /// Hits and misses are recorded by [`get`](Self::get),
    /// [`get_mut`](Self::get_mut),
    /// [`get_or_insert_with`](Self::get_or_insert_with), and
    /// [`replace`](Self::replace), plus a hit for every [`EntryMut`] that is
    /// written through. Evictions count capacity-driven removals only;
    /// [`pop`](Self::pop) and [`remove`](Self::remove) are caller decisions
    /// and are not counted. [`peek`](Self::peek) records nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use recency::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
    /// cache.insert("a", 1);
    /// cache.get(&"a");
    /// cache.get(&"b");
    ///
    /// assert_eq!(cache.stats().hits(), 1);
    /// assert_eq!(cache.stats().misses(), 1);
    /// assert_eq!(cache.stats().insertions(), 1);
    /// ```
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Resets all usage counters to zero. Cached entries are unaffected.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Returns an iterator over the entries in eviction order.
    ///
    /// The first item is the least-recently-used entry (the same one
    /// [`tail()`](Self::tail) reports), the last the most-recently-used.
    /// Iterating does not perturb the order.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use recency::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(3).unwrap());
    /// cache.insert("a", 1);
    /// cache.insert("b", 2);
    /// cache.insert("c", 3);
    /// cache.get(&"a");
    ///
    /// let items: Vec<_> = cache.iter().collect();
    /// assert_eq!(items, [(&"b", &2), (&"c", &3), (&"a", &1)]);
    /// assert_eq!(cache.iter().next(), cache.tail());
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        Iter {
            entries: &self.entries,
            index: (!self.entries.is_empty()).then_some(self.tail),
        }
    }

    /// Returns an iterator over the keys currently held.
    ///
    /// The order carries no contract; keys happen to be yielded in eviction
    /// order, matching [`iter()`](Self::iter).
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values in eviction order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Returns a point-in-time copy of the cache contents in eviction order.
    ///
    /// The snapshot is an owned `Vec`, not a live view, and taking it does
    /// not perturb the recency order. Replaying the snapshot through
    /// [`insert()`](Self::insert) into a fresh cache of the same capacity
    /// reproduces the same key set and recency order.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use recency::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(3).unwrap());
    /// cache.insert("a", 1);
    /// cache.insert("b", 2);
    /// cache.get(&"a");
    ///
    /// assert_eq!(cache.snapshot(), vec![("b", 2), ("a", 1)]);
    ///
    /// let mut rebuilt = LruCache::new(NonZeroUsize::new(3).unwrap());
    /// for (key, value) in cache.snapshot() {
    ///     rebuilt.insert(key, value);
    /// }
    /// assert_eq!(rebuilt.snapshot(), cache.snapshot());
    /// ```
    pub fn snapshot(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Retains only the entries for which the predicate returns `true`.
    ///
    /// The predicate sees entries in arbitrary order and may modify values
    /// in place. Surviving entries keep their relative recency order.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use recency::LruCache;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(5).unwrap());
    /// for i in 1..=4 {
    ///     cache.insert(i, i * 10);
    /// }
    ///
    /// cache.retain(|&key, _| key % 2 == 0);
    /// assert_eq!(cache.into_iter().collect::<Vec<_>>(), [(2, 20), (4, 40)]);
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut offset = 0;
        for idx in 0..self.entries.len() {
            let Some((key, node)) = self.entries.get_index_mut(idx - offset) else {
                break;
            };
            if !f(key, &mut node.value) {
                self.detach(idx - offset);
                offset += 1;
            }
        }
    }

    /// Shrinks the internal storage to fit the current number of entries.
    pub fn shrink_to_fit(&mut self) {
        self.entries.shrink_to_fit();
    }
}

/// Renders the cache contents tail-first as `k1:v1 < k2:v2 < k3:v3`, the
/// least-recently-used entry leftmost. Intended for diagnostics; the format
/// carries no parseability contract.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use recency::LruCache;
///
/// let mut cache = LruCache::new(NonZeroUsize::new(3).unwrap());
/// cache.insert(1, "one");
/// cache.insert(2, "two");
/// cache.get(&1);
///
/// assert_eq!(cache.to_string(), "2:two < 1:one");
/// ```
impl<K, V> fmt::Display for LruCache<K, V>
where
    K: Hash + Eq + fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" < ")?;
            }
            write!(f, "{}:{}", key, value)?;
        }
        Ok(())
    }
}

struct Iter<'c, K, V> {
    entries: &'c IndexMap<K, Node<V>, RandomState>,
    index: Option<usize>,
}

impl<'c, K, V> Iterator for Iter<'c, K, V> {
    type Item = (&'c K, &'c V);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index?;
        let (key, node) = self.entries.get_index(index)?;
        self.index = node.next;
        Some((key, &node.value))
    }
}

/// Consuming iterator over cache entries in eviction order.
#[doc(hidden)]
pub struct IntoIter<K, V> {
    entries: Vec<Option<(K, Node<V>)>>,
    index: Option<usize>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index?;
        let (key, node) = self.entries.get_mut(index)?.take()?;
        self.index = node.next;
        Some((key, node.value))
    }
}

impl<K, V> IntoIterator for LruCache<K, V> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    /// Consumes the cache, yielding key-value pairs in eviction order,
    /// least-recently-used first.
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            index: (!self.entries.is_empty()).then_some(self.tail),
            entries: self.entries.into_iter().map(Some).collect(),
        }
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for LruCache<K, V> {
    /// Creates a cache from an iterator of key-value pairs, with a capacity
    /// of at least 1 and at most the number of distinct keys yielded. Later
    /// duplicates overwrite earlier ones and count as uses.
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut cache = Self {
            entries: IndexMap::with_hasher(RandomState::default()),
            capacity: NonZeroUsize::MAX,
            head: 0,
            tail: 0,
            stats: CacheStats::default(),
        };

        for (key, value) in iter {
            cache.insert(key, value);
        }

        cache.capacity = NonZeroUsize::new(cache.entries.len().max(1)).unwrap();
        cache
    }
}

impl<K: Hash + Eq, V> Extend<(K, V)> for LruCache<K, V> {
    /// Inserts each pair in turn, evicting as needed once the cache is full.
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

#[cfg(test)]
impl<K, V> LruCache<K, V> {
    /// Walks the recency list both ways and checks it against the index:
    /// symmetric links, exactly `len` reachable nodes, boundary links unset.
    fn assert_valid(&self) {
        if self.entries.is_empty() {
            return;
        }

        assert!(self.head < self.entries.len());
        assert!(self.tail < self.entries.len());
        assert_eq!(self.entries[self.head].next, None);
        assert_eq!(self.entries[self.tail].prev, None);

        let mut seen = 0;
        let mut index = self.tail;
        loop {
            seen += 1;
            assert!(seen <= self.entries.len(), "recency list is cyclic");
            match self.entries[index].next {
                Some(next) => {
                    assert_eq!(self.entries[next].prev, Some(index));
                    index = next;
                }
                None => break,
            }
        }
        assert_eq!(index, self.head);
        assert_eq!(seen, self.entries.len());

        let mut seen = 0;
        let mut index = self.head;
        loop {
            seen += 1;
            assert!(seen <= self.entries.len(), "recency list is cyclic");
            match self.entries[index].prev {
                Some(prev) => {
                    assert_eq!(self.entries[prev].next, Some(index));
                    index = prev;
                }
                None => break,
            }
        }
        assert_eq!(index, self.tail);
        assert_eq!(seen, self.entries.len());
    }
}

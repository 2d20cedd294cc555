use std::ops::{
    Deref,
    DerefMut,
};

use crate::LruCache;

/// A smart reference to a cached value that tracks modifications.
///
/// Returned by [`LruCache::peek_mut`]. The guard provides transparent access
/// to the underlying value through `Deref` and `DerefMut`.
///
/// # Behavior
///
/// When an `EntryMut` is dropped:
/// - If the value was **modified** during the borrow (via `DerefMut`,
///   `AsMut`, or [`value_mut()`](Self::value_mut)), the entry moves to the
///   most-recently-used position and a hit is recorded.
/// - If the value was **never modified**, the recency order and statistics
///   are left unchanged.
///
/// Read-only access (`Deref`, `AsRef`, [`value()`](Self::value),
/// [`key()`](Self::key)) does not mark the guard as dirty.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use recency::LruCache;
///
/// let mut cache = LruCache::new(NonZeroUsize::new(3).unwrap());
/// cache.insert("a", vec![1, 2, 3]);
/// cache.insert("b", vec![4, 5, 6]);
///
/// // Before: "a" would be evicted first.
/// assert_eq!(cache.tail().unwrap().0, &"a");
///
/// if let Some(mut entry) = cache.peek_mut(&"a") {
///     entry.push(4); // Modification via DerefMut
/// } // Guard dropped here, promoting "a"
///
/// assert_eq!(cache.tail().unwrap().0, &"b");
/// ```
pub struct EntryMut<'c, K, V> {
    index: usize,
    dirty: bool,
    cache: &'c mut LruCache<K, V>,
}

impl<K, V> Drop for EntryMut<'_, K, V> {
    fn drop(&mut self) {
        if self.dirty {
            self.cache.touch(self.index);
            self.cache.stats.record_hit();
        }
    }
}

impl<K, V> AsRef<V> for EntryMut<'_, K, V> {
    fn as_ref(&self) -> &V {
        self.value()
    }
}

impl<K, V> AsMut<V> for EntryMut<'_, K, V> {
    fn as_mut(&mut self) -> &mut V {
        self.value_mut()
    }
}

impl<K, V> Deref for EntryMut<'_, K, V> {
    type Target = V;

    fn deref(&self) -> &Self::Target {
        self.value()
    }
}

impl<K, V> DerefMut for EntryMut<'_, K, V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.value_mut()
    }
}

impl<'c, K, V> EntryMut<'c, K, V> {
    pub(crate) fn new(index: usize, cache: &'c mut LruCache<K, V>) -> Self {
        Self {
            index,
            dirty: false,
            cache,
        }
    }
}

impl<K, V> EntryMut<'_, K, V> {
    /// Returns a reference to the key for this cache entry.
    ///
    /// Key access never marks the guard as dirty.
    pub fn key(&self) -> &K {
        self.cache
            .entries
            .get_index(self.index)
            .expect("entry index out of bounds")
            .0
    }

    /// Returns an immutable reference to the cached value.
    ///
    /// Equivalent to going through `Deref` or `AsRef`; does not mark the
    /// guard as dirty.
    pub fn value(&self) -> &V {
        &self.cache.entries[self.index].value
    }

    /// Returns a mutable reference to the cached value and marks the guard
    /// as dirty.
    ///
    /// Unlike `DerefMut`, which only marks the guard when actually
    /// dereferenced mutably, this **always** marks it, even if the returned
    /// reference is never written through. A dirty guard promotes its entry
    /// when dropped.
    pub fn value_mut(&mut self) -> &mut V {
        self.dirty = true;
        &mut self.cache.entries[self.index].value
    }
}

use std::num::NonZeroUsize;

use recency::LruCache;

fn cap(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

#[test]
fn test_lru_new_empty() {
    let cache = LruCache::<i32, String>::new(cap(3));
    assert_eq!(cache.len(), 0);
    assert!(cache.is_empty());
    assert_eq!(cache.capacity(), 3);
    assert_eq!(cache.tail(), None);
    assert_eq!(cache.into_iter().collect::<Vec<_>>(), vec![]);
}

#[test]
fn test_lru_insert_single() {
    let mut cache = LruCache::new(cap(3));
    assert_eq!(cache.insert(1, "one".to_string()), None);
    assert_eq!(cache.len(), 1);
    assert!(!cache.is_empty());
    assert_eq!(
        cache.into_iter().collect::<Vec<_>>(),
        vec![(1, "one".to_string())]
    );
}

#[test]
fn test_lru_insert_multiple() {
    let mut cache = LruCache::new(cap(3));
    cache.insert(1, "one".to_string());
    cache.insert(2, "two".to_string());
    cache.insert(3, "three".to_string());
    assert_eq!(cache.len(), 3);
    assert_eq!(
        cache.into_iter().collect::<Vec<_>>(),
        vec![
            (1, "one".to_string()),
            (2, "two".to_string()),
            (3, "three".to_string())
        ]
    );
}

#[test]
fn test_lru_insert_overflow_returns_evicted() {
    let mut cache = LruCache::new(cap(2));
    assert_eq!(cache.insert("a", 1), None);
    assert_eq!(cache.insert("b", 2), None);
    assert_eq!(cache.insert("c", 3), Some(("a", 1)));

    assert_eq!(cache.len(), 2);
    let mut keys: Vec<_> = cache.keys().copied().collect();
    keys.sort_unstable();
    assert_eq!(keys, ["b", "c"]);
}

#[test]
fn test_lru_insert_update_never_evicts() {
    let mut cache = LruCache::new(cap(2));
    cache.insert(1, "one".to_string());
    cache.insert(2, "two".to_string());

    // Full cache, existing key: overwrite in place, promote, no eviction.
    assert_eq!(cache.insert(1, "ONE".to_string()), None);
    assert_eq!(cache.len(), 2);
    assert_eq!(
        cache.into_iter().collect::<Vec<_>>(),
        vec![(2, "two".to_string()), (1, "ONE".to_string())]
    );
}

#[test]
fn test_lru_capacity_bound_holds() {
    let mut cache = LruCache::new(cap(5));
    for i in 0..20 {
        let evicted = cache.insert(i, i * 2);
        assert!(cache.len() <= cache.capacity());
        if i >= 5 {
            // Once full, every new key evicts exactly the current tail.
            assert_eq!(evicted, Some((i - 5, (i - 5) * 2)));
        } else {
            assert_eq!(evicted, None);
        }
    }
    assert_eq!(cache.len(), 5);
}

#[test]
fn test_lru_get_promotes() {
    let mut cache = LruCache::new(cap(3));
    cache.insert("a", 1);
    cache.insert("b", 2);
    cache.insert("c", 3);

    assert_eq!(cache.get(&"a"), Some(&1));
    assert_eq!(
        cache.into_iter().collect::<Vec<_>>(),
        vec![("b", 2), ("c", 3), ("a", 1)]
    );
}

#[test]
fn test_lru_get_nonexistent() {
    let mut cache = LruCache::new(cap(3));
    cache.insert(1, "one".to_string());
    assert_eq!(cache.get(&2), None);
    assert_eq!(
        cache.into_iter().collect::<Vec<_>>(),
        vec![(1, "one".to_string())]
    );
}

#[test]
fn test_lru_get_mut() {
    let mut cache = LruCache::new(cap(3));
    cache.insert(1, "one".to_string());
    cache.insert(2, "two".to_string());
    if let Some(value) = cache.get_mut(&1) {
        *value = "ONE".to_string();
    }
    assert_eq!(
        cache.into_iter().collect::<Vec<_>>(),
        vec![(2, "two".to_string()), (1, "ONE".to_string())]
    );
}

#[test]
fn test_lru_eviction_after_access_pattern() {
    let mut cache = LruCache::new(cap(3));
    cache.insert(1, "one".to_string());
    cache.insert(2, "two".to_string());
    cache.insert(3, "three".to_string());
    cache.get(&1);
    cache.insert(4, "four".to_string());

    assert_eq!(
        cache.into_iter().collect::<Vec<_>>(),
        vec![
            (3, "three".to_string()),
            (1, "one".to_string()),
            (4, "four".to_string())
        ]
    );
}

#[test]
fn test_lru_peek_does_not_promote() {
    let mut cache = LruCache::new(cap(3));
    cache.insert(1, "one".to_string());
    cache.insert(2, "two".to_string());

    let order_before: Vec<_> = cache.iter().map(|(k, v)| (*k, v.clone())).collect();

    // Any number of peeks leaves the eviction order untouched.
    for _ in 0..5 {
        assert_eq!(cache.peek(&1), Some(&"one".to_string()));
        assert_eq!(cache.peek(&3), None);
    }

    assert_eq!(cache.into_iter().collect::<Vec<_>>(), order_before);
}

#[test]
fn test_lru_peek_mut_only_promotes_when_written() {
    let mut cache = LruCache::new(cap(3));
    cache.insert("a", 1);
    cache.insert("b", 2);

    if let Some(entry) = cache.peek_mut(&"a") {
        assert_eq!(*entry, 1);
    }
    assert_eq!(cache.tail(), Some((&"a", &1)));

    if let Some(mut entry) = cache.peek_mut(&"a") {
        *entry = 10;
    }
    assert_eq!(cache.tail(), Some((&"b", &2)));
    assert_eq!(cache.peek(&"a"), Some(&10));
}

#[test]
fn test_lru_replace_existing() {
    let mut cache = LruCache::new(cap(3));
    cache.insert(1, "one".to_string());
    cache.insert(2, "two".to_string());

    assert_eq!(cache.replace(&1, "ONE".to_string()), Some("one".to_string()));
    assert_eq!(cache.len(), 2);
    // The replaced entry counts as used and moves to the head.
    assert_eq!(
        cache.into_iter().collect::<Vec<_>>(),
        vec![(2, "two".to_string()), (1, "ONE".to_string())]
    );
}

#[test]
fn test_lru_replace_never_inserts() {
    let mut cache = LruCache::<i32, String>::new(cap(3));
    assert_eq!(cache.replace(&1, "one".to_string()), None);
    assert_eq!(cache.len(), 0);

    cache.insert(2, "two".to_string());
    assert_eq!(cache.replace(&1, "one".to_string()), None);
    assert_eq!(cache.len(), 1);
    assert!(!cache.contains_key(&1));
}

#[test]
fn test_lru_replace_never_evicts() {
    let mut cache = LruCache::new(cap(2));
    cache.insert(1, 10);
    cache.insert(2, 20);

    assert_eq!(cache.replace(&1, 100), Some(10));
    assert_eq!(cache.len(), 2);
    assert!(cache.contains_key(&1));
    assert!(cache.contains_key(&2));
}

#[test]
fn test_lru_remove_existing() {
    let mut cache = LruCache::new(cap(3));
    cache.insert(1, "one".to_string());
    cache.insert(2, "two".to_string());
    cache.insert(3, "three".to_string());
    assert_eq!(cache.remove(&2), Some("two".to_string()));
    assert_eq!(cache.len(), 2);
    assert_eq!(
        cache.into_iter().collect::<Vec<_>>(),
        vec![(1, "one".to_string()), (3, "three".to_string())]
    );
}

#[test]
fn test_lru_remove_nonexistent() {
    let mut cache = LruCache::new(cap(3));
    cache.insert(1, "one".to_string());
    assert_eq!(cache.remove(&2), None);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_lru_remove_consistency() {
    for victim in 1..=4 {
        let mut cache = LruCache::new(cap(4));
        for i in 1..=4 {
            cache.insert(i, i * 10);
        }

        assert_eq!(cache.remove(&victim), Some(victim * 10));
        assert_eq!(cache.len(), 3);
        assert!(cache.keys().all(|&k| k != victim));

        // The remaining entries still form one valid chain: walking it by
        // popping yields every survivor exactly once, in recency order.
        let expected: Vec<_> = (1..=4).filter(|&k| k != victim).map(|k| (k, k * 10)).collect();
        let mut popped = Vec::new();
        while let Some(kv) = cache.pop() {
            popped.push(kv);
        }
        assert_eq!(popped, expected);
    }
}

#[test]
fn test_lru_pop_order() {
    let mut cache = LruCache::new(cap(3));
    cache.insert(1, "one".to_string());
    cache.insert(2, "two".to_string());
    cache.insert(3, "three".to_string());

    assert_eq!(cache.pop(), Some((1, "one".to_string())));
    assert_eq!(cache.len(), 2);

    cache.get(&2);
    assert_eq!(cache.pop(), Some((3, "three".to_string())));
    assert_eq!(cache.pop(), Some((2, "two".to_string())));
    assert_eq!(cache.pop(), None);
}

#[test]
fn test_lru_pop_empty() {
    let mut cache = LruCache::<i32, String>::new(cap(3));
    assert_eq!(cache.pop(), None);
}

#[test]
fn test_lru_tail() {
    let mut cache = LruCache::new(cap(3));
    cache.insert(1, "one".to_string());
    cache.insert(2, "two".to_string());

    assert_eq!(cache.tail(), Some((&1, &"one".to_string())));
    // Inspecting the victim does not promote it.
    assert_eq!(cache.tail(), Some((&1, &"one".to_string())));

    cache.get(&1);
    assert_eq!(cache.tail(), Some((&2, &"two".to_string())));
}

#[test]
fn test_lru_tail_empty() {
    let cache = LruCache::<i32, String>::new(cap(3));
    assert_eq!(cache.tail(), None);
}

#[test]
fn test_lru_clear_idempotent() {
    let mut cache = LruCache::new(cap(3));
    cache.insert(1, "one".to_string());
    cache.insert(2, "two".to_string());

    cache.clear();
    assert_eq!(cache.len(), 0);
    assert!(cache.is_empty());
    assert_eq!(cache.peek(&1), None);
    assert_eq!(cache.tail(), None);
    assert_eq!(cache.pop(), None);
    assert_eq!(cache.capacity(), 3);

    // A second clear changes nothing.
    cache.clear();
    assert_eq!(cache.len(), 0);

    // The cache is usable as if freshly constructed.
    assert_eq!(cache.insert(5, "five".to_string()), None);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.tail(), Some((&5, &"five".to_string())));
}

#[test]
fn test_lru_snapshot_order_and_isolation() {
    let mut cache = LruCache::new(cap(3));
    cache.insert("a", 1);
    cache.insert("b", 2);
    cache.insert("c", 3);
    cache.get(&"a");

    let snapshot = cache.snapshot();
    assert_eq!(snapshot, vec![("b", 2), ("c", 3), ("a", 1)]);

    // Taking the snapshot did not perturb the order.
    assert_eq!(
        cache.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
        snapshot
    );

    // The snapshot is a copy, not a live view.
    cache.insert("d", 4);
    cache.get(&"b");
    assert_eq!(snapshot, vec![("b", 2), ("c", 3), ("a", 1)]);
}

#[test]
fn test_lru_snapshot_round_trip() {
    let mut cache = LruCache::new(cap(3));
    cache.insert("a", 1);
    cache.insert("b", 2);
    cache.insert("c", 3);
    cache.get(&"b");
    cache.replace(&"a", 10);

    let mut rebuilt = LruCache::new(cap(3));
    for (key, value) in cache.snapshot() {
        rebuilt.insert(key, value);
    }

    assert_eq!(rebuilt.snapshot(), cache.snapshot());
    assert_eq!(rebuilt.len(), cache.len());
    assert_eq!(rebuilt.tail(), cache.tail());
}

#[test]
fn test_lru_display_tail_first() {
    let mut cache = LruCache::new(cap(3));
    cache.insert(1, "one");
    cache.insert(2, "two");
    cache.insert(3, "three");

    assert_eq!(cache.to_string(), "1:one < 2:two < 3:three");

    cache.get(&1);
    assert_eq!(cache.to_string(), "2:two < 3:three < 1:one");

    cache.clear();
    assert_eq!(cache.to_string(), "");
}

#[test]
fn test_lru_keys() {
    let mut cache = LruCache::new(cap(3));
    cache.insert(1, "one");
    cache.insert(2, "two");
    cache.insert(3, "three");
    cache.remove(&2);

    let mut keys: Vec<_> = cache.keys().copied().collect();
    keys.sort_unstable();
    assert_eq!(keys, [1, 3]);
}

#[test]
fn test_lru_values() {
    let mut cache = LruCache::new(cap(3));
    cache.insert("a", 1);
    cache.insert("b", 2);
    cache.get(&"a");

    let values: Vec<_> = cache.values().copied().collect();
    assert_eq!(values, [2, 1]);
}

#[test]
fn test_lru_iter_agrees_with_tail_and_pop() {
    let mut cache = LruCache::new(cap(4));
    cache.insert(1, "one".to_string());
    cache.insert(2, "two".to_string());
    cache.insert(3, "three".to_string());
    cache.get(&2);

    assert_eq!(cache.iter().next(), cache.tail());

    let items: Vec<_> = cache.iter().map(|(k, v)| (*k, v.clone())).collect();
    let mut popped = Vec::new();
    while let Some(kv) = cache.pop() {
        popped.push(kv);
    }
    assert_eq!(popped, items);
}

#[test]
fn test_lru_contains_key() {
    let mut cache = LruCache::new(cap(3));
    cache.insert(1, "one".to_string());

    assert!(cache.contains_key(&1));
    assert!(!cache.contains_key(&2));

    cache.remove(&1);
    assert!(!cache.contains_key(&1));
}

#[test]
fn test_lru_get_or_insert_with() {
    let mut cache = LruCache::new(cap(3));
    let mut calls = 0;

    let value = cache.get_or_insert_with(1, |_| {
        calls += 1;
        "one".to_string()
    });
    assert_eq!(value, &"one".to_string());
    assert_eq!(calls, 1);

    let value = cache.get_or_insert_with(1, |_| {
        calls += 1;
        "different".to_string()
    });
    assert_eq!(value, &"one".to_string());
    assert_eq!(calls, 1);
}

#[test]
fn test_lru_get_or_insert_with_capacity_behavior() {
    let mut cache = LruCache::new(cap(2));
    cache.insert(1, "one".to_string());
    cache.insert(2, "two".to_string());

    cache.get_or_insert_with(1, |_| "new_one".to_string());
    assert_eq!(cache.len(), 2);
    assert!(cache.contains_key(&1));
    assert!(cache.contains_key(&2));

    cache.get_or_insert_with(3, |_| "three".to_string());
    assert_eq!(cache.len(), 2);
    assert!(cache.contains_key(&1));
    assert!(!cache.contains_key(&2));
    assert!(cache.contains_key(&3));
}

#[test]
fn test_lru_extend() {
    let mut cache = LruCache::new(cap(4));
    cache.insert(1, "one".to_string());
    cache.extend(vec![(2, "two".to_string()), (3, "three".to_string())]);

    assert_eq!(cache.len(), 3);
    assert_eq!(
        cache.into_iter().collect::<Vec<_>>(),
        vec![
            (1, "one".to_string()),
            (2, "two".to_string()),
            (3, "three".to_string())
        ]
    );
}

#[test]
fn test_lru_from_iter() {
    let items = vec![
        (1, "one".to_string()),
        (2, "two".to_string()),
        (3, "three".to_string()),
    ];
    let cache: LruCache<i32, String> = items.into_iter().collect();

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.capacity(), 3);
    assert_eq!(cache.tail(), Some((&1, &"one".to_string())));
}

#[test]
fn test_lru_retain() {
    let mut cache = LruCache::new(cap(5));
    for i in 1..=4 {
        cache.insert(i, i * 10);
    }
    cache.get(&1);

    cache.retain(|&key, _| key % 2 == 0);

    assert_eq!(cache.len(), 2);
    // Survivors keep their relative recency order.
    assert_eq!(cache.into_iter().collect::<Vec<_>>(), vec![(2, 20), (4, 40)]);
}

#[test]
fn test_lru_retain_modifies_values() {
    let mut cache = LruCache::new(cap(3));
    cache.insert(1, 10);
    cache.insert(2, 20);

    cache.retain(|_, value| {
        *value *= 2;
        true
    });

    assert_eq!(cache.peek(&1), Some(&20));
    assert_eq!(cache.peek(&2), Some(&40));
}

#[test]
fn test_lru_shrink_to_fit() {
    let mut cache = LruCache::new(cap(10));
    for i in 1..=5 {
        cache.insert(i, format!("value_{}", i));
    }
    cache.remove(&1);
    cache.remove(&2);

    cache.shrink_to_fit();

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.peek(&3), Some(&"value_3".to_string()));
    assert_eq!(cache.peek(&4), Some(&"value_4".to_string()));
    assert_eq!(cache.peek(&5), Some(&"value_5".to_string()));
}

#[test]
fn test_lru_capacity_one() {
    let mut cache = LruCache::new(cap(1));
    assert_eq!(cache.insert(1, "one".to_string()), None);
    assert_eq!(
        cache.insert(2, "two".to_string()),
        Some((1, "one".to_string()))
    );
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.tail(), Some((&2, &"two".to_string())));

    // Updating the sole entry never evicts it.
    assert_eq!(cache.insert(2, "TWO".to_string()), None);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_lru_stats_counters() {
    let mut cache = LruCache::new(cap(2));
    cache.insert("a", 1);
    cache.insert("b", 2);
    cache.get(&"a");
    cache.get(&"missing");
    cache.replace(&"b", 20);
    cache.replace(&"missing", 0);
    cache.insert("c", 3);

    let stats = cache.stats();
    assert_eq!(stats.hits(), 2);
    assert_eq!(stats.misses(), 2);
    assert_eq!(stats.insertions(), 3);
    assert_eq!(stats.evictions(), 1);
    assert_eq!(stats.hit_ratio(), 0.5);
}

#[test]
fn test_lru_stats_manual_removal_not_an_eviction() {
    let mut cache = LruCache::new(cap(3));
    cache.insert(1, 10);
    cache.insert(2, 20);
    cache.pop();
    cache.remove(&2);

    assert_eq!(cache.stats().evictions(), 0);
    assert_eq!(cache.stats().insertions(), 2);
}

#[test]
fn test_lru_stats_reset() {
    let mut cache = LruCache::new(cap(2));
    cache.insert(1, 10);
    cache.get(&1);
    cache.get(&2);

    cache.reset_stats();
    let stats = cache.stats();
    assert_eq!(stats.hits(), 0);
    assert_eq!(stats.misses(), 0);
    assert_eq!(stats.insertions(), 0);
    assert_eq!(stats.evictions(), 0);
    assert_eq!(stats.hit_ratio(), 0.0);

    // Entries survive a counter reset.
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_lru_iter_into_iter_agree() {
    let mut cache = LruCache::new(cap(3));
    cache.insert(1, "one".to_string());
    cache.insert(2, "two".to_string());
    cache.insert(3, "three".to_string());

    let iter = cache
        .iter()
        .map(|(k, v)| (*k, v.clone()))
        .collect::<Vec<_>>();
    let into_iter: Vec<_> = cache.into_iter().collect();

    assert_eq!(iter, into_iter);
}

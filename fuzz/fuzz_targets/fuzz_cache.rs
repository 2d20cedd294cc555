#![no_main]

use std::num::NonZeroUsize;

use libfuzzer_sys::fuzz_target;
use recency::LruCache;

#[derive(Debug)]
enum CacheOperation {
    Insert(u16, u16),
    Get(u16),
    Peek(u16),
    Replace(u16, u16),
    Remove(u16),
    Pop,
    Clear,
    GetOrInsertWith(u16, u16),
    Retain,
    Iter,
    Snapshot,
}

impl<'a> arbitrary::Arbitrary<'a> for CacheOperation {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        match u.int_in_range(0..=10)? {
            0 => Ok(CacheOperation::Insert(u.arbitrary()?, u.arbitrary()?)),
            1 => Ok(CacheOperation::Get(u.arbitrary()?)),
            2 => Ok(CacheOperation::Peek(u.arbitrary()?)),
            3 => Ok(CacheOperation::Replace(u.arbitrary()?, u.arbitrary()?)),
            4 => Ok(CacheOperation::Remove(u.arbitrary()?)),
            5 => Ok(CacheOperation::Pop),
            6 => Ok(CacheOperation::Clear),
            7 => Ok(CacheOperation::GetOrInsertWith(
                u.arbitrary()?,
                u.arbitrary()?,
            )),
            8 => Ok(CacheOperation::Retain),
            9 => Ok(CacheOperation::Iter),
            10 => Ok(CacheOperation::Snapshot),
            _ => unreachable!(),
        }
    }
}

fuzz_target!(|data: (u16, Vec<CacheOperation>)| {
    let (capacity_raw, operations) = data;

    let capacity = NonZeroUsize::new((capacity_raw % 4).max(1) as usize).unwrap();
    let mut cache = LruCache::<u16, u16>::new(capacity);

    let initial_capacity = cache.capacity();

    for op in operations {
        match op {
            CacheOperation::Insert(key, value) => {
                let old_len = cache.len();
                let contained_before = cache.contains_key(&key);
                let tail_before = cache.tail().map(|(k, v)| (*k, *v));

                let evicted = cache.insert(key, value);

                assert!(cache.len() <= cache.capacity());
                assert!(cache.contains_key(&key));
                assert_eq!(cache.peek(&key), Some(&value));

                if contained_before {
                    // Updates never evict and never change the size.
                    assert_eq!(evicted, None);
                    assert_eq!(cache.len(), old_len);
                } else if old_len < cache.capacity() {
                    assert_eq!(evicted, None);
                    assert_eq!(cache.len(), old_len + 1);
                } else {
                    // A full cache evicts exactly the previous tail.
                    assert_eq!(evicted, tail_before);
                    assert_eq!(cache.len(), old_len);
                }
            }

            CacheOperation::Get(key) => {
                let contains_before = cache.contains_key(&key);
                let len_before = cache.len();
                let result = cache.get(&key).copied();

                assert_eq!(result.is_some(), contains_before);
                assert_eq!(cache.contains_key(&key), contains_before);
                assert_eq!(cache.len(), len_before);
            }

            CacheOperation::Peek(key) => {
                let contains_before = cache.contains_key(&key);
                let len_before = cache.len();
                let tail_before = cache.tail().map(|(k, v)| (*k, *v));

                let result = cache.peek(&key);

                assert_eq!(result.is_some(), contains_before);
                assert_eq!(cache.tail().map(|(k, v)| (*k, *v)), tail_before);
                assert_eq!(cache.len(), len_before);
            }

            CacheOperation::Replace(key, value) => {
                let contains_before = cache.contains_key(&key);
                let len_before = cache.len();

                let previous = cache.replace(&key, value);

                // Replace never inserts and never evicts.
                assert_eq!(previous.is_some(), contains_before);
                assert_eq!(cache.len(), len_before);
                if contains_before {
                    assert_eq!(cache.peek(&key), Some(&value));
                } else {
                    assert!(!cache.contains_key(&key));
                }
            }

            CacheOperation::Remove(key) => {
                let contains_before = cache.contains_key(&key);
                let len_before = cache.len();

                let result = cache.remove(&key);

                assert!(!cache.contains_key(&key));
                assert_eq!(result.is_some(), contains_before);
                if contains_before {
                    assert_eq!(cache.len(), len_before - 1);
                } else {
                    assert_eq!(cache.len(), len_before);
                }
            }

            CacheOperation::Pop => {
                let len_before = cache.len();
                let was_empty = cache.is_empty();
                let tail_before = cache.tail().map(|(k, v)| (*k, *v));

                let result = cache.pop();

                if was_empty {
                    assert_eq!(result, None);
                    assert_eq!(cache.len(), 0);
                } else {
                    assert_eq!(result, tail_before);
                    assert_eq!(cache.len(), len_before - 1);
                    if let Some((key, _)) = result {
                        assert!(!cache.contains_key(&key));
                    }
                }
            }

            CacheOperation::Clear => {
                cache.clear();
                assert_eq!(cache.len(), 0);
                assert!(cache.is_empty());
                assert_eq!(cache.tail(), None);
                assert_eq!(cache.capacity(), initial_capacity);
            }

            CacheOperation::GetOrInsertWith(key, value) => {
                let contains_before = cache.contains_key(&key);
                let len_before = cache.len();

                let result = *cache.get_or_insert_with(key, |_| value);

                assert!(cache.contains_key(&key));
                if contains_before {
                    assert_eq!(cache.len(), len_before);
                } else {
                    assert_eq!(result, value);
                    if len_before < cache.capacity() {
                        assert_eq!(cache.len(), len_before + 1);
                    } else {
                        assert_eq!(cache.len(), len_before);
                    }
                }
            }

            CacheOperation::Retain => {
                let expected: Vec<_> = cache
                    .iter()
                    .filter(|(_, v)| **v % 2 == 0)
                    .map(|(k, v)| (*k, *v))
                    .collect();

                cache.retain(|_, v| *v % 2 == 0);

                let after: Vec<_> = cache.iter().map(|(k, v)| (*k, *v)).collect();
                assert_eq!(after, expected, "retain changed the surviving order");
            }

            CacheOperation::Iter => {
                let items: Vec<_> = cache.iter().map(|(k, v)| (*k, *v)).collect();
                assert_eq!(items.len(), cache.len());
                assert_eq!(items.first().copied(), cache.tail().map(|(k, v)| (*k, *v)));

                for (key, value) in &items {
                    assert_eq!(cache.peek(key), Some(value));
                }

                // Draining by pop yields exactly the iteration order.
                let mut popped = Vec::new();
                while let Some(kv) = cache.pop() {
                    popped.push(kv);
                }
                assert_eq!(popped, items);
            }

            CacheOperation::Snapshot => {
                let snapshot = cache.snapshot();
                assert_eq!(snapshot.len(), cache.len());
                assert_eq!(
                    snapshot,
                    cache.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>()
                );

                // Rebuilding from the snapshot reproduces the recency order.
                let mut rebuilt = LruCache::new(NonZeroUsize::new(initial_capacity).unwrap());
                for (key, value) in &snapshot {
                    rebuilt.insert(*key, *value);
                }
                assert_eq!(rebuilt.snapshot(), snapshot);
            }
        }

        assert!(cache.len() <= cache.capacity());
        assert_eq!(cache.capacity(), initial_capacity);
        assert_eq!(cache.is_empty(), cache.len() == 0);

        if cache.is_empty() {
            assert_eq!(cache.tail(), None);
        } else {
            assert!(cache.tail().is_some());
        }
    }
});

#![no_main]

use heapcache::policy::lru::LruCache;
use heapcache::traits::{CoreCache, LruCacheTrait, MutableCache};
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on LruCache
//
// Tests random sequences of insert, get, touch, remove, pop_lru and clear
// against a recency-ordered vector model.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let capacity = usize::from(data[0] % 16) + 1;
    let mut cache: LruCache<u8, u8> = LruCache::new(capacity);
    // Least recent first.
    let mut model: Vec<(u8, u8)> = Vec::new();

    let mut idx = 1;
    while idx + 1 < data.len() {
        let op = data[idx] % 7;
        let key = data[idx + 1] % 32;
        idx += 2;

        let found = model.iter().position(|(k, _)| *k == key);
        match op {
            0 | 1 => {
                let value = key.wrapping_add(op);
                let previous = cache.insert(key, value);
                match found {
                    Some(at) => {
                        let (_, old) = model.remove(at);
                        assert_eq!(previous, Some(old));
                    }
                    None => {
                        assert_eq!(previous, None);
                        if model.len() == capacity {
                            model.remove(0);
                        }
                    }
                }
                model.push((key, value));
            }
            2 => {
                let got = cache.get(&key).copied();
                match found {
                    Some(at) => {
                        let entry = model.remove(at);
                        assert_eq!(got, Some(entry.1));
                        model.push(entry);
                    }
                    None => assert_eq!(got, None),
                }
            }
            3 => {
                assert_eq!(cache.touch(&key), found.is_some());
                if let Some(at) = found {
                    let entry = model.remove(at);
                    model.push(entry);
                }
            }
            4 => {
                let removed = cache.remove(&key);
                assert_eq!(removed, found.map(|at| model.remove(at).1));
            }
            5 => {
                let expected = if model.is_empty() {
                    None
                } else {
                    Some(model.remove(0))
                };
                assert_eq!(cache.pop_lru(), expected);
            }
            _ => {
                if key == 0 {
                    cache.clear();
                    model.clear();
                }
            }
        }

        assert_eq!(cache.len(), model.len());
        assert!(cache.len() <= capacity);
        assert_eq!(
            cache.peek_lru().map(|(k, v)| (*k, *v)),
            model.first().copied()
        );
        assert!(cache.check_invariants().is_ok());
    }
});

use heapcache::policy::lru::LruCache;
use heapcache::traits::{CoreCache, LruCacheTrait};

fn main() {
    let mut cache: LruCache<u32, String> = LruCache::new(5);

    for (k, v) in [(1, "one"), (2, "two"), (3, "three")] {
        cache.insert(k, v.to_string());
    }

    if let Some(value) = cache.get(&1) {
        println!("hit 1: {}", value);
    }

    for k in [100, 200, 300, 400] {
        cache.insert(k, k.to_string());
    }

    println!("contains 1? {}", cache.contains(&1));
    println!("contains 2? {}", cache.contains(&2));
    println!("contains 3? {}", cache.contains(&3));
    println!("lru: {:?}", cache.peek_lru().map(|(k, _)| *k));
}

// Expected output:
// hit 1: one
// contains 1? true
// contains 2? false
// contains 3? false
// lru: Some(1)
//
// Explanation: capacity=5; get(&1) makes key 1 newer than 2 and 3. The four
// inserts that follow overflow the cache twice, evicting 2 then 3. Key 1 is
// now the oldest resident entry.

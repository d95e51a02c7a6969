//! Cache Module Tests
//!
//! ## Test Scopes
//! - **ByteView**: Copy-on-read safety and conversions.
//! - **LruCache**: Byte accounting, recency order, eviction order and the oversized-value edge case.
//! - **Cache**: Eviction callback contract and behaviour under concurrent access.

#[cfg(test)]
mod tests {
    use crate::cache::{ByteView, Cache, LruCache, Value};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, OnceLock};

    fn recomputed_bytes(lru: &LruCache<String>) -> usize {
        lru.keys()
            .map(|k| k.len() + lru.peek(k).map_or(0, |v| v.len()))
            .sum()
    }

    // ============================================================
    // BYTEVIEW TESTS
    // ============================================================

    #[test]
    fn test_byteview_copy_is_detached() {
        let view = ByteView::from("hello");

        let mut copy = view.byte_slice();
        copy[0] = b'J';
        copy.push(b'!');

        assert_eq!(view.byte_slice(), b"hello".to_vec());
        assert_eq!(view.to_string(), "hello");
        assert_eq!(view.len(), 5);
    }

    #[test]
    fn test_byteview_clone_shares_content() {
        let view = ByteView::new(vec![1u8, 2, 3]);
        let clone = view.clone();

        assert_eq!(view, clone);
        assert_eq!(clone.as_slice(), &[1, 2, 3]);
        assert_eq!(Value::len(&clone), 3);
    }

    #[test]
    fn test_byteview_empty_and_lossy_string() {
        assert!(ByteView::default().is_empty());

        let view = ByteView::new(vec![0xff, b'a']);
        assert_eq!(view.to_string(), "\u{fffd}a");
    }

    // ============================================================
    // LRU CORE TESTS
    // ============================================================

    #[test]
    fn test_get_hit_and_miss() {
        let mut lru = LruCache::new(0);
        lru.add("key1", "1234".to_string());

        assert_eq!(lru.get("key1").map(String::as_str), Some("1234"));
        assert!(lru.get("key2").is_none());
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_used_bytes_tracks_updates() {
        let mut lru = LruCache::new(0);

        lru.add("key", "a".to_string());
        assert_eq!(lru.used_bytes(), 4);

        lru.add("key", "abcd".to_string());
        assert_eq!(lru.used_bytes(), 7);
        assert_eq!(lru.len(), 1);

        lru.add("key", String::new());
        assert_eq!(lru.used_bytes(), 3);
    }

    #[test]
    fn test_evicts_least_recently_added() {
        // Each entry costs 4 bytes, so only two fit.
        let mut lru = LruCache::new(8);
        lru.add("k1", "v1".to_string());
        lru.add("k2", "v2".to_string());
        let evicted = lru.add("k3", "v3".to_string());

        assert_eq!(evicted, vec![("k1".to_string(), "v1".to_string())]);
        assert!(lru.get("k1").is_none());
        assert!(lru.get("k2").is_some());
        assert!(lru.get("k3").is_some());
        assert_eq!(lru.used_bytes(), 8);
    }

    #[test]
    fn test_read_shifts_eviction_order() {
        let mut lru = LruCache::new(8);
        lru.add("k1", "v1".to_string());
        lru.add("k2", "v2".to_string());

        // Touching k1 makes k2 the oldest.
        assert!(lru.get("k1").is_some());
        lru.add("k3", "v3".to_string());

        assert!(lru.get("k2").is_none());
        assert!(lru.get("k1").is_some());
        assert!(lru.get("k3").is_some());
    }

    #[test]
    fn test_update_promotes_entry() {
        let mut lru = LruCache::new(8);
        lru.add("k1", "v1".to_string());
        lru.add("k2", "v2".to_string());
        lru.add("k1", "x1".to_string());
        lru.add("k3", "v3".to_string());

        assert_eq!(lru.peek("k1").map(String::as_str), Some("x1"));
        assert!(!lru.contains("k2"));
    }

    #[test]
    fn test_peek_does_not_promote() {
        let mut lru = LruCache::new(8);
        lru.add("k1", "v1".to_string());
        lru.add("k2", "v2".to_string());

        assert!(lru.peek("k1").is_some());
        lru.add("k3", "v3".to_string());

        assert!(!lru.contains("k1"));
    }

    #[test]
    fn test_oversized_value_is_inserted_then_evicted() {
        let mut lru = LruCache::new(10);
        lru.add("k1", "v1".to_string());

        let evicted = lru.add("big", "x".repeat(20));

        let keys: Vec<_> = evicted.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["k1", "big"]);
        assert!(lru.is_empty());
        assert_eq!(lru.used_bytes(), 0);

        // The cache keeps working afterwards.
        lru.add("k2", "v2".to_string());
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_remove_oldest_and_empty_noop() {
        let mut lru: LruCache<String> = LruCache::new(0);
        assert!(lru.remove_oldest().is_none());

        lru.add("a", "1".to_string());
        lru.add("b", "2".to_string());

        assert_eq!(lru.remove_oldest(), Some(("a".to_string(), "1".to_string())));
        assert_eq!(lru.used_bytes(), 2);
        assert_eq!(lru.keys().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_remove_middle_keeps_list_consistent() {
        let mut lru = LruCache::new(0);
        for key in ["a", "b", "c", "d"] {
            lru.add(key, key.to_uppercase());
        }

        assert_eq!(lru.remove("b").as_deref(), Some("B"));
        assert_eq!(lru.keys().collect::<Vec<_>>(), vec!["d", "c", "a"]);

        // "d" sat at the end of the slot vector and was moved into b's slot.
        assert_eq!(lru.get("d").map(String::as_str), Some("D"));
        assert_eq!(lru.remove_oldest().map(|(k, _)| k), Some("a".to_string()));
        assert_eq!(lru.keys().collect::<Vec<_>>(), vec!["d", "c"]);
        assert_eq!(lru.used_bytes(), recomputed_bytes(&lru));
    }

    #[test]
    fn test_clear_resets_accounting() {
        let mut lru = LruCache::new(100);
        lru.add("a", "1".to_string());
        lru.clear();

        assert!(lru.is_empty());
        assert_eq!(lru.used_bytes(), 0);
        assert!(lru.remove_oldest().is_none());
    }

    #[test]
    fn test_random_operations_respect_budget() {
        let mut rng = StdRng::seed_from_u64(42);
        let max_bytes = 64;
        let mut lru = LruCache::new(max_bytes);

        for _ in 0..5_000 {
            let key = format!("key{}", rng.gen_range(0..32));
            if rng.gen_bool(0.6) {
                let value = "v".repeat(rng.gen_range(0..24));
                lru.add(key, value);
            } else {
                lru.get(&key);
            }

            assert!(lru.used_bytes() <= max_bytes);
            assert_eq!(lru.used_bytes(), recomputed_bytes(&lru));
            assert_eq!(lru.keys().count(), lru.len());
        }
    }

    // ============================================================
    // SHARED CACHE TESTS
    // ============================================================

    #[test]
    fn test_callback_called_once_per_eviction() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let evicted_clone = evicted.clone();
        let cache = Cache::with_eviction_callback(8, move |key: &str, value: &String| {
            evicted_clone
                .lock()
                .unwrap()
                .push((key.to_string(), value.clone()));
        });

        cache.add("k1", "v1".to_string());
        cache.add("k2", "v2".to_string());
        assert_eq!(cache.len(), 2);

        cache.add("k3", "v3".to_string());
        cache.add("k4", "v4".to_string());

        let evicted = evicted.lock().unwrap();
        assert_eq!(
            *evicted,
            vec![
                ("k1".to_string(), "v1".to_string()),
                ("k2".to_string(), "v2".to_string()),
            ]
        );
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_remove_oldest_triggers_callback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let cache = Cache::with_eviction_callback(0, move |_: &str, _: &ByteView| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        cache.remove_oldest();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        cache.add("a", ByteView::from("1"));
        cache.add("b", ByteView::from("2"));
        cache.remove_oldest();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("a").is_none());
        assert_eq!(cache.get("b"), Some(ByteView::from("2")));
    }

    #[test]
    fn test_callback_may_reenter_cache() {
        let slot: Arc<OnceLock<Arc<Cache<String>>>> = Arc::new(OnceLock::new());
        let seen_len = Arc::new(AtomicUsize::new(usize::MAX));

        let slot_clone = slot.clone();
        let seen_clone = seen_len.clone();
        let cache = Arc::new(Cache::with_eviction_callback(
            8,
            move |_: &str, _: &String| {
                if let Some(cache) = slot_clone.get() {
                    seen_clone.store(cache.len(), Ordering::SeqCst);
                }
            },
        ));
        let _ = slot.set(cache.clone());

        cache.add("k1", "v1".to_string());
        cache.add("k2", "v2".to_string());
        cache.add("k3", "v3".to_string());

        // The callback observed the cache after k1 was fully removed.
        assert_eq!(seen_len.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_multi_eviction_reports_one_entry_at_a_time() {
        let slot: Arc<OnceLock<Arc<Cache<String>>>> = Arc::new(OnceLock::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let slot_clone = slot.clone();
        let seen_clone = seen.clone();
        let cache = Arc::new(Cache::with_eviction_callback(
            10,
            move |key: &str, _: &String| {
                if let Some(cache) = slot_clone.get() {
                    seen_clone.lock().unwrap().push((key.to_string(), cache.len()));
                }
            },
        ));
        let _ = slot.set(cache.clone());

        cache.add("k1", "v1".to_string());
        cache.add("big", "x".repeat(20));

        // len() drops by exactly one per callback.
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("k1".to_string(), 1), ("big".to_string(), 0)]
        );
        assert!(cache.is_empty());
        assert_eq!(cache.used_bytes(), 0);
    }

    #[test]
    fn test_empty_shared_cache() {
        let cache: Cache<ByteView> = Cache::new(1024);

        assert!(cache.is_empty());
        assert_eq!(cache.used_bytes(), 0);
        assert!(cache.get("missing").is_none());
        assert_eq!(cache.max_bytes(), 1024);
    }

    #[test]
    fn test_concurrent_access_stays_within_budget() {
        let cache = Arc::new(Cache::new(256));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..500 {
                        let key = format!("t{}-{}", t, i % 40);
                        cache.add(key.clone(), ByteView::from(format!("value-{}", i)));
                        cache.get(&key);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.used_bytes() <= 256);
        assert!(!cache.is_empty());
    }
}

//! Tests for the sharded LRU core: round-trip puts, the two
//! `update_existing` policies, capacity trimming, and TLRU expiry.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::LruCache;

    fn cache(capacity: usize, shards: usize, update_existing: bool) -> LruCache<String, String> {
        LruCache::new(capacity, shards, update_existing, None)
    }

    #[test]
    fn put_then_get_round_trips() {
        let c = cache(10, 4, false);
        c.put("k".into(), "v".into());
        assert_eq!(c.get(&"k".into()), Some("v".into()));
    }

    #[test]
    fn get_on_missing_key_is_absent_and_counts_a_miss() {
        let c = cache(10, 4, false);
        assert_eq!(c.get(&"nope".into()), None);
        assert_eq!(c.counters().requests(), 1);
        assert_eq!(c.counters().misses(), 1);
    }

    #[test]
    fn update_existing_false_keeps_the_first_value() {
        let c = cache(10, 4, false);
        c.put("k".into(), "v1".into());
        c.put("k".into(), "v2".into());
        assert_eq!(c.get(&"k".into()), Some("v1".into()));
    }

    #[test]
    fn update_existing_true_replaces_the_value() {
        let c = cache(10, 4, true);
        c.put("k".into(), "v1".into());
        c.put("k".into(), "v2".into());
        assert_eq!(c.get(&"k".into()), Some("v2".into()));
    }

    #[test]
    fn capacity_one_evicts_on_every_distinct_key() {
        let c = cache(1, 1, false);
        c.put("a".into(), "1".into());
        c.put("b".into(), "2".into());
        assert!(c.len() <= 1);
        assert_eq!(c.get(&"a".into()), None);
        assert_eq!(c.get(&"b".into()), Some("2".into()));
    }

    #[test]
    fn single_shard_evicts_in_exact_lru_order() {
        // capacity 2, concurrency 1: put K1,V1; put K2,V2; get K1; put K3,V3.
        // K1 was just touched, so K2 (least recently used) is evicted.
        let c = cache(2, 1, false);
        c.put("k1".into(), "v1".into());
        c.put("k2".into(), "v2".into());
        assert_eq!(c.get(&"k1".into()), Some("v1".into()));
        c.put("k3".into(), "v3".into());

        assert_eq!(c.get(&"k1".into()), Some("v1".into()));
        assert_eq!(c.get(&"k2".into()), None);
        assert_eq!(c.get(&"k3".into()), Some("v3".into()));
    }

    #[test]
    fn index_size_never_exceeds_capacity() {
        let c = cache(5, 3, false);
        for i in 0..100 {
            c.put(format!("k{i}"), format!("v{i}"));
            assert!(c.len() <= 5);
        }
    }

    #[test]
    fn reset_clears_entries_and_counters() {
        let c = cache(10, 4, false);
        c.put("k".into(), "v".into());
        c.get(&"k".into());
        c.reset();
        assert_eq!(c.len(), 0);
        assert_eq!(c.counters().requests(), 0);
        assert_eq!(c.get(&"k".into()), None);
    }

    #[test]
    fn tlru_short_lifetime_expires_after_a_delay() {
        let c: LruCache<String, String> =
            LruCache::new(10, 2, false, Some(Duration::from_millis(1)));
        c.put("k".into(), "v".into());
        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(c.get(&"k".into()), None);
    }

    #[test]
    fn tlru_long_lifetime_survives_a_short_test() {
        let c: LruCache<String, String> =
            LruCache::new(10, 2, false, Some(Duration::from_secs(86_400)));
        c.put("k".into(), "v".into());
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(c.get(&"k".into()), Some("v".into()));
    }
}

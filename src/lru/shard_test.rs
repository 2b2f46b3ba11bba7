//! Tests for the per-shard arena: insertion order, promotion, and the
//! tail-eviction path used by the cache's capacity trim.

#[cfg(test)]
mod tests {
    use super::super::Shard;

    #[test]
    fn insert_head_orders_most_recent_first() {
        let shard: Shard<&str, i32> = Shard::new();
        let mut g = shard.inner.lock();
        g.insert_head("a", 1, None);
        g.insert_head("b", 2, None);
        g.insert_head("c", 3, None);
        assert_eq!(g.tail_key(), Some(&"a"));
    }

    #[test]
    fn move_to_head_reorders_without_duplicating() {
        let shard: Shard<&str, i32> = Shard::new();
        let mut g = shard.inner.lock();
        let a = g.insert_head("a", 1, None);
        let b = g.insert_head("b", 2, None);
        let _c = g.insert_head("c", 3, None);
        assert_eq!(g.tail_key(), Some(&"a"));

        g.move_to_head(a);
        assert!(g.is_head(a));
        assert_eq!(g.tail_key(), Some(&"b"));

        // Moving the current head is a no-op.
        g.move_to_head(a);
        assert!(g.is_head(a));
        let _ = b;
    }

    #[test]
    fn unlink_frees_the_slot_for_reuse() {
        let shard: Shard<&str, i32> = Shard::new();
        let mut g = shard.inner.lock();
        let a = g.insert_head("a", 1, None);
        g.unlink(a);
        assert!(g.node(a).is_none());

        let b = g.insert_head("b", 2, None);
        assert_eq!(b, a, "freed slot should be recycled");
    }

    #[test]
    fn tail_slot_tracks_least_recently_used() {
        let shard: Shard<&str, i32> = Shard::new();
        let mut g = shard.inner.lock();
        g.insert_head("a", 1, None);
        g.insert_head("b", 2, None);
        let tail = g.tail_slot().unwrap();
        assert_eq!(g.node(tail).unwrap().key, "a");
    }

    #[test]
    #[should_panic(expected = "invariant violation")]
    fn unlinking_an_empty_slot_panics() {
        let shard: Shard<&str, i32> = Shard::new();
        let mut g = shard.inner.lock();
        let a = g.insert_head("a", 1, None);
        g.unlink(a);
        g.unlink(a);
    }
}

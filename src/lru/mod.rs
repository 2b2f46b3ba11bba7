//! Sharded, concurrency-optimized LRU/TLRU cache and its loading variant.
//!
//! [`LruCache`] is the bounded, capacity-enforced core: a global
//! `dashmap::DashMap` hash index paired with an array of independently
//! mutex-guarded recency-list shards (see [`shard`] for the arena that
//! backs each one). [`LoadingLruCache`] composes it with a
//! [`crate::loader::Loader`] for the common "miss populates itself"
//! shape; [`NoopCache`] is the null-object stub for when caching needs
//! to be switched off without branching at every call site.

mod builder;
mod core;
mod loading;
mod noop;
mod shard;

pub use builder::CacheBuilder;
pub use core::LruCache;
pub use loading::LoadingLruCache;
pub use noop::NoopCache;

/// Common surface shared by [`LruCache`], [`LoadingLruCache`], and
/// [`NoopCache`], so callers can hold a trait object and swap variants
/// without branching on which one is active.
pub trait Cache<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;
    fn put(&self, key: K, value: V);
    fn reset(&self);
}

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: std::hash::Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Option<V> {
        LruCache::get(self, key)
    }

    fn put(&self, key: K, value: V) {
        LruCache::put(self, key, value)
    }

    fn reset(&self) {
        LruCache::reset(self)
    }
}

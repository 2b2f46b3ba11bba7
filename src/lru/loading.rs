//! The LRU loading variant: a synchronous loader layered beneath the
//! sharded LRU core.

use std::hash::Hash;

use crate::loader::Loader;

use super::core::LruCache;
use super::Cache;

/// Composes a [`LruCache`] with a [`Loader`]: on a miss (or TLRU expiry),
/// the loader runs on the caller's thread and the result is inserted via
/// the cache's existing put path before being returned.
pub struct LoadingLruCache<K, V, L> {
    inner: LruCache<K, V>,
    loader: L,
}

impl<K, V, L> LoadingLruCache<K, V, L>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    L: Loader<K, V>,
{
    pub(crate) fn new(inner: LruCache<K, V>, loader: L) -> Self {
        Self { inner, loader }
    }

    /// Returns the cached value for `key`, loading it on a miss.
    pub fn get(&self, key: &K) -> anyhow::Result<V> {
        if let Some(v) = self.inner.get(key) {
            return Ok(v);
        }
        let value = self.loader.load(key)?;
        self.inner.put(key.clone(), value.clone());
        Ok(value)
    }

    /// Eagerly populates the cache for every key in `keys`. The caller is
    /// responsible for ensuring the set fits within capacity — `warm`
    /// does not special-case eviction pressure.
    pub fn warm(&self, keys: impl IntoIterator<Item = K>) -> anyhow::Result<()> {
        for key in keys {
            let value = self.loader.load(&key)?;
            self.inner.put(key, value);
        }
        Ok(())
    }

    pub fn counters(&self) -> &crate::metrics::Counters {
        self.inner.counters()
    }

    pub fn reset(&self) {
        self.inner.reset()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// `Cache` is implemented for the loading variant too, with loader
/// failures swallowed into an absent result so it is interchangeable
/// with a plain `LruCache` or `NoopCache` behind a trait object. Callers
/// that need the failure should use [`LoadingLruCache::get`] directly.
impl<K, V, L> Cache<K, V> for LoadingLruCache<K, V, L>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    L: Loader<K, V>,
{
    fn get(&self, key: &K) -> Option<V> {
        LoadingLruCache::get(self, key).ok()
    }

    fn put(&self, key: K, value: V) {
        self.inner.put(key, value);
    }

    fn reset(&self) {
        self.inner.reset();
    }
}

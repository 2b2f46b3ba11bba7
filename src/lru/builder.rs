//! Builder-style construction for [`LruCache`] and [`LoadingLruCache`].
//!
//! As an embedded library with no config file of its own, builders are
//! the construction surface: every setting is validated and returned as
//! a `Result` rather than panicking on bad input.

use std::hash::Hash;
use std::time::Duration;

use crate::error::CacheError;
use crate::loader::Loader;

use super::core::LruCache;
use super::loading::LoadingLruCache;

pub struct CacheBuilder<K, V> {
    capacity: usize,
    concurrency: usize,
    update_existing: bool,
    item_lifetime: Option<Duration>,
    _marker: std::marker::PhantomData<fn(K, V)>,
}

impl<K, V> CacheBuilder<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            concurrency: num_cpus::get().max(1),
            update_existing: false,
            item_lifetime: None,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn concurrency(mut self, shard_count: usize) -> Self {
        self.concurrency = shard_count;
        self
    }

    pub fn update_existing(mut self, update_existing: bool) -> Self {
        self.update_existing = update_existing;
        self
    }

    pub fn item_lifetime(mut self, lifetime: Duration) -> Self {
        self.item_lifetime = Some(lifetime);
        self
    }

    fn validate(&self) -> Result<(), CacheError> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidArgument(
                "capacity must be positive".into(),
            ));
        }
        if self.concurrency == 0 {
            return Err(CacheError::InvalidArgument(
                "concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Builds a plain LRU/TLRU cache with no attached loader.
    pub fn build(self) -> Result<LruCache<K, V>, CacheError> {
        self.validate()?;
        Ok(LruCache::new(
            self.capacity,
            self.concurrency,
            self.update_existing,
            self.item_lifetime,
        ))
    }

    /// Builds the loading variant, with `loader` invoked synchronously
    /// on a miss.
    pub fn build_loading<L>(self, loader: L) -> Result<LoadingLruCache<K, V, L>, CacheError>
    where
        L: Loader<K, V>,
    {
        self.validate()?;
        let inner = LruCache::new(
            self.capacity,
            self.concurrency,
            self.update_existing,
            self.item_lifetime,
        );
        Ok(LoadingLruCache::new(inner, loader))
    }
}

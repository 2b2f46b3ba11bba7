//! The no-op cache stub.

use std::marker::PhantomData;

use super::Cache;

/// A `Cache<K, V>` whose `get` always returns absent and whose
/// `put`/`reset` are no-ops.
///
/// Exists so callers can depend on the `Cache<K, V>` trait object and
/// swap in a stub, e.g. to disable caching entirely via configuration,
/// without branching on "is caching enabled" at every call site.
pub struct NoopCache<K, V> {
    _marker: PhantomData<fn(K, V)>,
}

impl<K, V> NoopCache<K, V> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<K, V> Default for NoopCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Cache<K, V> for NoopCache<K, V>
where
    K: Send + Sync,
    V: Send + Sync,
{
    fn get(&self, _key: &K) -> Option<V> {
        None
    }

    fn put(&self, _key: K, _value: V) {}

    fn reset(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_is_always_absent_and_put_is_a_no_op() {
        let cache: NoopCache<String, String> = NoopCache::new();
        cache.put("k".into(), "v".into());
        assert_eq!(cache.get(&"k".into()), None);
        cache.reset();
    }
}

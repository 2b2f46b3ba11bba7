//! Loader contracts consumed by the LRU loading variant and the loading
//! dictionary respectively.

use tokio_util::sync::CancellationToken;

/// A synchronous loader: invoked on the calling thread on a cache miss.
///
/// Consumed by [`crate::lru::LoadingLruCache`].
pub trait Loader<K, V>: Send + Sync {
    fn load(&self, key: &K) -> anyhow::Result<V>;
}

/// Blanket impl so a plain closure can stand in for a [`Loader`].
impl<K, V, F> Loader<K, V> for F
where
    F: Fn(&K) -> anyhow::Result<V> + Send + Sync,
{
    fn load(&self, key: &K) -> anyhow::Result<V> {
        self(key)
    }
}

/// A deferred loader: returns quickly, doing the heavy work inside the
/// returned future, which must observe `cancel` cooperatively.
///
/// Consumed by [`crate::loading_dict::LoadingDictionary`].
#[async_trait::async_trait]
pub trait DeferredLoader<K, V>: Send + Sync {
    async fn load(&self, key: K, cancel: CancellationToken) -> anyhow::Result<V>;
}

/// Adapts any `Fn(K, CancellationToken) -> Fut` closure into a [`DeferredLoader`].
pub struct FnDeferredLoader<F> {
    f: F,
}

impl<F> FnDeferredLoader<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait::async_trait]
impl<K, V, F, Fut> DeferredLoader<K, V> for FnDeferredLoader<F>
where
    K: Send + 'static,
    V: Send + 'static,
    F: Fn(K, CancellationToken) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = anyhow::Result<V>> + Send + 'static,
{
    async fn load(&self, key: K, cancel: CancellationToken) -> anyhow::Result<V> {
        (self.f)(key, cancel).await
    }
}

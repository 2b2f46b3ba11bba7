//! The lazy loading dictionary: a read-mostly map that materializes
//! values on first access, guaranteeing single-flight loading with
//! cooperative cancellation and bounded loader lifetime.

mod builder;
mod cell;

pub use builder::LoadingDictionaryBuilder;

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures::future::BoxFuture;
use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::error::DictError;
use crate::loader::DeferredLoader;

use cell::DeferredCell;

/// A read-mostly map from keys to values, producing values on demand via
/// a [`DeferredLoader`] while guaranteeing single-flight loading and
/// prompt caller cancellation.
pub struct LoadingDictionary<K, V, L> {
    cells: DashMap<K, Arc<DeferredCell<V>>>,
    loader: Arc<L>,
    task_timeout: Duration,
    key_validator: Option<Arc<dyn Fn(&K) -> bool + Send + Sync>>,
    log_target: String,
}

impl<K, V, L> LoadingDictionary<K, V, L>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    L: DeferredLoader<K, V> + 'static,
{
    pub(crate) fn new(
        loader: L,
        initial: Vec<(K, V)>,
        concurrency_level: usize,
        capacity: usize,
        task_timeout: Duration,
        key_validator: Option<Arc<dyn Fn(&K) -> bool + Send + Sync>>,
        log_target: String,
    ) -> Self {
        let shard_amount = concurrency_level.max(1).next_power_of_two();
        let cells = DashMap::with_capacity_and_shard_amount(capacity.max(1), shard_amount);
        for (k, v) in initial {
            cells.insert(k, Arc::new(DeferredCell::pre_completed(v)));
        }
        Self {
            cells,
            loader: Arc::new(loader),
            task_timeout,
            key_validator,
            log_target,
        }
    }

    fn cell_for(&self, key: &K) -> Arc<DeferredCell<V>> {
        self.cells
            .entry(key.clone())
            .or_insert_with(|| Arc::new(DeferredCell::new()))
            .clone()
    }

    /// Awaits the value for `key`, sharing the loader's single flight
    /// with every other concurrent caller racing the same key.
    ///
    /// Fails with `KeyNotFound` if the loader faults, `Cancelled` if
    /// `cancel` fires first — in which case the cell is retained so a
    /// later caller (or this one, with a fresh token) may still observe
    /// the loader's result.
    pub async fn get(&self, key: K, cancel: CancellationToken) -> Result<V, DictError> {
        if let Some(validator) = &self.key_validator {
            if !validator(&key) {
                return Err(DictError::InvalidArgument(
                    "key failed the configured validity precondition".into(),
                ));
            }
        }
        let cell = self.cell_for(&key);
        let shared = cell.ensure_started(key.clone(), self.loader.clone(), self.task_timeout);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DictError::Cancelled),
            result = shared => match result {
                Ok(value) => Ok(value),
                Err(fault) => {
                    self.remove_faulted(&key, &cell);
                    // `fault` is shared with the `Shared` future's own
                    // cached output, so it almost never has a unique
                    // strong count: `Arc::try_unwrap` would silently
                    // collapse every cause to a generic `Failed` and lose
                    // `TimedOut`/`Panicked`. Reconstruct by variant instead.
                    Err(DictError::KeyNotFound {
                        cause: crate::error::clone_fault(&fault),
                    })
                }
            },
        }
    }

    /// Identical to [`Self::get`], but surfaces a loader fault as `None`
    /// rather than an error. Caller cancellation still propagates as
    /// `Err(Cancelled)`: a cancelled call never really observed the
    /// loader's outcome, so there is nothing to swallow.
    pub async fn try_get(&self, key: K, cancel: CancellationToken) -> Result<Option<V>, DictError> {
        match self.get(key, cancel).await {
            Ok(v) => Ok(Some(v)),
            Err(DictError::KeyNotFound { .. }) => Ok(None),
            Err(other) => Err(other),
        }
    }

    /// A non-blocking handle equivalent to [`Self::get`]. Requires the
    /// dictionary to be held behind an `Arc` so the returned future can
    /// outlive the borrow of `self`.
    pub fn get_async(
        self: &Arc<Self>,
        key: K,
        cancel: CancellationToken,
    ) -> BoxFuture<'static, Result<V, DictError>> {
        let this = self.clone();
        async move { this.get(key, cancel).await }.boxed()
    }

    fn remove_faulted(&self, key: &K, cell: &Arc<DeferredCell<V>>) {
        if !self.cells.contains_key(key) {
            tracing::info!(target: "shardcache::loading_dict", prefix = %self.log_target, "key to remove was already absent");
        }
        self.cells.remove_if(key, |_, v| Arc::ptr_eq(v, cell));
    }

    /// Reports whether a deferred cell currently exists for `key`
    /// (pending or completed; it does not distinguish the two).
    pub fn contains(&self, key: &K) -> bool {
        self.cells.contains_key(key)
    }

    /// A best-effort snapshot of currently-stored keys, pending cells
    /// included.
    pub fn keys(&self) -> Vec<K> {
        self.cells.iter().map(|e| e.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

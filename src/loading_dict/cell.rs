//! The deferred cell: a lazily-started, single-flight future.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use once_cell::sync::OnceCell;
use tokio_util::sync::CancellationToken;

use crate::error::{normalize_fault, LoaderFault};
use crate::loader::DeferredLoader;

type CellResult<V> = Result<V, Arc<LoaderFault>>;
type CellFuture<V> = Shared<BoxFuture<'static, CellResult<V>>>;

/// Wraps a loader's future so that construction (cheap: allocate a cell)
/// and the actual loader invocation (first read) are separate steps.
///
/// This two-layer indirection is what makes single-flight loading
/// correct regardless of whether the backing concurrent map's
/// insert-if-absent runs its factory more than once under contention:
/// the factory here only ever builds an un-started cell, and
/// `ensure_started` uses `OnceCell::get_or_init`, which *is* guaranteed
/// to run its closure at most once, to win the race to spawn the
/// actual loader task.
pub(crate) struct DeferredCell<V> {
    shared: OnceCell<CellFuture<V>>,
}

impl<V> DeferredCell<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub(crate) fn new() -> Self {
        Self {
            shared: OnceCell::new(),
        }
    }

    /// A cell that is already resolved to `value` and will never invoke
    /// a loader (used for preloading).
    pub(crate) fn pre_completed(value: V) -> Self {
        let cell = Self::new();
        let fut: BoxFuture<'static, CellResult<V>> = futures::future::ready(Ok(value)).boxed();
        let _ = cell.shared.set(fut.shared());
        cell
    }

    /// Returns the shared future backing this cell, spawning the loader
    /// task on the first call and handing every subsequent caller a
    /// clone of the same `Shared` future.
    pub(crate) fn ensure_started<K, L>(
        &self,
        key: K,
        loader: Arc<L>,
        task_timeout: std::time::Duration,
    ) -> CellFuture<V>
    where
        K: Clone + Send + 'static,
        L: DeferredLoader<K, V> + 'static,
    {
        self.shared
            .get_or_init(|| {
                let fut: BoxFuture<'static, CellResult<V>> = async move {
                    // The loader receives a token derived from (but
                    // independent of) any caller's token, bounded by the
                    // per-cell timeout, so a churning caller can never
                    // extend a slow loader's lifetime.
                    let loader_token = CancellationToken::new();
                    let load = loader.load(key, loader_token.clone());
                    let outcome = tokio::time::timeout(task_timeout, load).await;
                    loader_token.cancel();
                    match outcome {
                        Ok(Ok(value)) => Ok(value),
                        Ok(Err(err)) => Err(Arc::new(normalize_fault(err))),
                        Err(_elapsed) => Err(Arc::new(LoaderFault::TimedOut)),
                    }
                }
                .boxed();

                tokio::spawn(fut)
                    .map(|joined| match joined {
                        Ok(result) => result,
                        Err(join_err) => Err(Arc::new(LoaderFault::Panicked(join_err.to_string()))),
                    })
                    .boxed()
                    .shared()
            })
            .clone()
    }

    /// True once the loader task has been spawned (whether or not it has
    /// finished) or the cell was preloaded.
    pub(crate) fn is_started(&self) -> bool {
        self.shared.get().is_some()
    }
}

#[cfg(test)]
#[path = "cell_test.rs"]
mod cell_test;

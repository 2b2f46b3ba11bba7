//! Builder-style construction for [`LoadingDictionary`].
//!
//! Construction-time misconfiguration (non-positive concurrency or
//! capacity) is rejected with `InvalidArgument` rather than panicking:
//! it is caller-correctable input, unlike the internal invariant
//! breaches the core treats as fatal.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use crate::error::DictError;
use crate::loader::DeferredLoader;

use super::LoadingDictionary;

const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CAPACITY: usize = 50_000;

const DEFAULT_LOG_TARGET: &str = "loading_dict";

pub struct LoadingDictionaryBuilder<K, V, L> {
    loader: L,
    initial: Vec<(K, V)>,
    concurrency_level: usize,
    capacity: usize,
    task_timeout: Duration,
    key_validator: Option<Arc<dyn Fn(&K) -> bool + Send + Sync>>,
    log_target: String,
}

impl<K, V, L> LoadingDictionaryBuilder<K, V, L>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    L: DeferredLoader<K, V> + 'static,
{
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            initial: Vec::new(),
            concurrency_level: num_cpus::get().max(1),
            capacity: DEFAULT_CAPACITY,
            task_timeout: DEFAULT_TASK_TIMEOUT,
            key_validator: None,
            log_target: DEFAULT_LOG_TARGET.to_string(),
        }
    }

    /// Supplies pre-completed (key, value) pairs; each becomes a
    /// pre-completed deferred cell that will never invoke the loader.
    pub fn initial(mut self, initial: impl IntoIterator<Item = (K, V)>) -> Self {
        self.initial = initial.into_iter().collect();
        self
    }

    pub fn concurrency_level(mut self, concurrency_level: usize) -> Self {
        self.concurrency_level = concurrency_level;
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn task_timeout(mut self, task_timeout: Duration) -> Self {
        self.task_timeout = task_timeout;
        self
    }

    /// Installs a precondition every key must pass before a load is
    /// attempted; a key that fails it surfaces `InvalidArgument` instead
    /// of reaching the loader (e.g. rejecting a zero-length key).
    pub fn validate_keys_with(mut self, validator: impl Fn(&K) -> bool + Send + Sync + 'static) -> Self {
        self.key_validator = Some(Arc::new(validator));
        self
    }

    /// Sets the prefix attached to the dictionary's diagnostic log
    /// events, so a caller embedding more than one dictionary can tell
    /// their log output apart. Defaults to `"loading_dict"`.
    pub fn log_target(mut self, log_target: impl Into<String>) -> Self {
        self.log_target = log_target.into();
        self
    }

    pub fn build(self) -> Result<LoadingDictionary<K, V, L>, DictError> {
        if self.concurrency_level == 0 {
            return Err(DictError::InvalidArgument(
                "concurrency_level must be at least 1".into(),
            ));
        }
        if self.capacity == 0 {
            return Err(DictError::InvalidArgument("capacity must be positive".into()));
        }
        Ok(LoadingDictionary::new(
            self.loader,
            self.initial,
            self.concurrency_level,
            self.capacity,
            self.task_timeout,
            self.key_validator,
            self.log_target,
        ))
    }
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;

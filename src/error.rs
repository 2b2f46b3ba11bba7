//! Error types for the LRU core and the loading dictionary.
//!
//! Recoverable, caller-facing variants are `thiserror` enums; internal
//! plumbing that runs before a `Result` is even meaningful (builder
//! validation, construction) uses `anyhow`.

use std::fmt;

/// Errors returned by cache/dictionary builders and public entry points
/// that are not part of the loading-dictionary's own error surface.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Errors returned by [`crate::loading_dict::LoadingDictionary`] operations.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("key not found")]
    KeyNotFound {
        #[source]
        cause: LoaderFault,
    },
    #[error("operation cancelled")]
    Cancelled,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// A loader's fault, normalized to at most one level of wrapping.
///
/// Source loaders may fail outright, exceed their per-cell timeout, or
/// panic inside the spawned task; all three collapse into this type so
/// callers deal with a single cause shape.
#[derive(Debug, thiserror::Error)]
pub enum LoaderFault {
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
    #[error("loader exceeded its task timeout")]
    TimedOut,
    #[error("loader task panicked: {0}")]
    Panicked(String),
}

/// Represents a loader failure composed of more than one underlying cause.
///
/// Rust loaders are not expected to produce these themselves — this exists
/// so that a loader adapting a foreign, aggregate-exception-raising source
/// (as the originating design anticipates) can still round-trip through
/// [`normalize_fault`] and have a lone inner cause unwrapped for clarity.
#[derive(Debug)]
pub struct AggregateError(pub Vec<anyhow::Error>);

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} aggregated loader failures", self.0.len())
    }
}

impl std::error::Error for AggregateError {}

/// Wraps a raw loader failure at most one level deep: an aggregate with
/// a single inner cause is unwrapped so the caller sees the real domain
/// error instead of the aggregate's own wrapper.
pub fn normalize_fault(err: anyhow::Error) -> LoaderFault {
    match err.downcast::<AggregateError>() {
        Ok(mut agg) if agg.0.len() == 1 => LoaderFault::Failed(agg.0.pop().unwrap()),
        Ok(agg) => LoaderFault::Failed(anyhow::Error::new(agg)),
        Err(err) => LoaderFault::Failed(err),
    }
}

/// Rebuilds an owned `LoaderFault` from a shared reference, preserving
/// which variant it is. `anyhow::Error` is not `Clone`, so a `Failed`
/// cause is reconstructed from its full display chain (`{:#}`) rather
/// than the original error object — everything a caller can observe
/// through `Display`/`{:?}` survives, only downcasting the original
/// value does not.
pub(crate) fn clone_fault(fault: &LoaderFault) -> LoaderFault {
    match fault {
        LoaderFault::Failed(err) => LoaderFault::Failed(anyhow::anyhow!(format!("{err:#}"))),
        LoaderFault::TimedOut => LoaderFault::TimedOut,
        LoaderFault::Panicked(msg) => LoaderFault::Panicked(msg.clone()),
    }
}

//! Sharded, concurrency-optimized LRU/TLRU cache and a single-flight
//! loading dictionary.
//!
//! The two primitives share only a conceptual "loader" abstraction
//! ([`loader::Loader`] / [`loader::DeferredLoader`]); see [`lru`] and
//! [`loading_dict`] for the respective entry points.

pub mod error;
pub mod loader;
pub mod metrics;
pub mod rand;
pub mod time;

pub mod loading_dict;
pub mod lru;

pub use error::{CacheError, DictError, LoaderFault};
pub use loading_dict::{LoadingDictionary, LoadingDictionaryBuilder};
pub use lru::{Cache, CacheBuilder, LoadingLruCache, LruCache, NoopCache};

//! The sharded LRU core.

use std::hash::Hash;
use std::time::Duration;

use dashmap::DashMap;

use crate::metrics::Counters;
use crate::rand;
use crate::time;

use super::shard::Shard;

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct IndexRef {
    pub(crate) shard: usize,
    pub(crate) slot: usize,
}

/// A bounded, recency-ordered key-value store, safe for many concurrent
/// readers and writers (see the module-level docs in `crate::lru`).
pub struct LruCache<K, V> {
    capacity: usize,
    update_existing: bool,
    item_lifetime: Option<Duration>,
    index: DashMap<K, IndexRef>,
    shards: Vec<Shard<K, V>>,
    counters: Counters,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(
        capacity: usize,
        shard_count: usize,
        update_existing: bool,
        item_lifetime: Option<Duration>,
    ) -> Self {
        if item_lifetime.is_some() {
            time::ensure_started();
        }
        let mut shards = Vec::with_capacity(shard_count);
        for _ in 0..shard_count {
            shards.push(Shard::new());
        }
        Self {
            capacity,
            update_existing,
            item_lifetime,
            index: DashMap::with_capacity(capacity),
            shards,
            counters: Counters::new(),
        }
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    fn expiry_for_insert(&self) -> Option<i64> {
        self.item_lifetime
            .map(|d| time::now_nanos() + d.as_nanos() as i64)
    }

    fn pick_shard(&self) -> usize {
        rand::index(self.shards.len())
    }

    /// Look up `key`, promoting it to the head of its shard on a hit.
    pub fn get(&self, key: &K) -> Option<V> {
        self.counters.record_request();

        let idx_ref = match self.index.get(key) {
            Some(r) => *r,
            None => {
                self.counters.record_miss();
                return None;
            }
        };

        let shard = &self.shards[idx_ref.shard];
        let mut guard = shard.inner.lock();

        // Re-check under the lock: the entry may have been evicted or
        // replaced between the index read above and acquiring the lock.
        let expired = match guard.node(idx_ref.slot) {
            Some(node) if node.valid && &node.key == key => node
                .expires_at_nanos
                .is_some_and(|exp| exp <= time::now_nanos()),
            _ => {
                drop(guard);
                self.counters.record_miss();
                return None;
            }
        };

        if expired {
            guard.unlink(idx_ref.slot);
            drop(guard);
            self.index
                .remove_if(key, |_, v| *v == idx_ref);
            self.counters.record_miss();
            return None;
        }

        let value = guard.node(idx_ref.slot).unwrap().value.clone();
        if !guard.is_head(idx_ref.slot) {
            guard.move_to_head(idx_ref.slot);
        }
        Some(value)
    }

    /// Inserts or updates `key` per the cache's `update_existing` policy.
    pub fn put(&self, key: K, value: V) {
        use dashmap::mapref::entry::Entry as DEntry;

        let shard_idx = self.pick_shard();
        let expires_at = self.expiry_for_insert();

        match self.index.entry(key.clone()) {
            DEntry::Vacant(v) => {
                let slot = {
                    let mut guard = self.shards[shard_idx].inner.lock();
                    guard.insert_head(key, value, expires_at)
                };
                v.insert(IndexRef {
                    shard: shard_idx,
                    slot,
                });
                self.maybe_trim(shard_idx);
            }
            DEntry::Occupied(mut o) => {
                let old_ref = *o.get();
                if self.update_existing {
                    let new_slot = self.replace(old_ref, shard_idx, key, value, expires_at);
                    o.insert(IndexRef {
                        shard: shard_idx,
                        slot: new_slot,
                    });
                } else {
                    let mut guard = self.shards[old_ref.shard].inner.lock();
                    if guard.node(old_ref.slot).is_some() && !guard.is_head(old_ref.slot) {
                        guard.move_to_head(old_ref.slot);
                    }
                    // `value` (the discarded candidate) drops here.
                }
            }
        }
    }

    /// Replaces the entry behind `old_ref` with a freshly-built one bound
    /// to `new_shard`. Locks are always taken in ascending shard order so
    /// two concurrent cross-shard replaces can never deadlock on each
    /// other.
    fn replace(
        &self,
        old_ref: IndexRef,
        new_shard: usize,
        key: K,
        value: V,
        expires_at: Option<i64>,
    ) -> usize {
        if old_ref.shard == new_shard {
            let mut guard = self.shards[new_shard].inner.lock();
            guard.unlink(old_ref.slot);
            return guard.insert_head(key, value, expires_at);
        }

        let (lo, hi) = if old_ref.shard < new_shard {
            (old_ref.shard, new_shard)
        } else {
            (new_shard, old_ref.shard)
        };
        let mut lo_guard = self.shards[lo].inner.lock();
        let mut hi_guard = self.shards[hi].inner.lock();

        if old_ref.shard == lo {
            lo_guard.unlink(old_ref.slot);
            hi_guard.insert_head(key, value, expires_at)
        } else {
            hi_guard.unlink(old_ref.slot);
            lo_guard.insert_head(key, value, expires_at)
        }
    }

    /// Enforces `capacity` after a growing insert by dropping exactly one
    /// entry from the shard that just grew (a soft-bound trim: total size
    /// can transiently exceed capacity by up to one entry per shard).
    fn maybe_trim(&self, shard_idx: usize) {
        if self.index.len() <= self.capacity {
            return;
        }
        let mut guard = self.shards[shard_idx].inner.lock();
        let Some(slot) = guard.tail_slot() else {
            return;
        };
        let key = guard.tail_key().expect("tail slot implies a tail key").clone();
        guard.unlink(slot);
        drop(guard);
        // Shard lock released before touching the index: put/replace
        // always lock the index entry before the shard, so this path must
        // never hold them in the opposite order or two threads can
        // deadlock AB-BA. The predicate is still keyed on `key`, so even
        // if the freed slot is reused by a concurrent insert before this
        // runs, it can only match the entry actually stored under `key`.
        self.index
            .remove_if(&key, |_, v| v.shard == shard_idx && v.slot == slot);
    }

    /// Drops every entry and resets the counters.
    pub fn reset(&self) {
        self.index.clear();
        for shard in &self.shards {
            shard.inner.lock().clear();
        }
        self.counters.reset();
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
#[path = "core_test.rs"]
mod core_test;

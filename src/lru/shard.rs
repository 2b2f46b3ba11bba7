//! A single shard's recency list.
//!
//! Implemented as an arena — a growable slot vector plus a free list —
//! addressed by index rather than by raw pointer, so the doubly-linked
//! list's ownership cycle never has to be expressed as unsafe pointer
//! juggling. The whole arena lives behind one `parking_lot::Mutex`;
//! every operation here assumes the caller already holds it.

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
    pub(crate) valid: bool,
    pub(crate) expires_at_nanos: Option<i64>,
}

#[derive(Default)]
pub(crate) struct ShardInner<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<K, V> ShardInner<K, V> {
    pub(crate) fn is_head(&self, slot: usize) -> bool {
        self.head == Some(slot)
    }

    pub(crate) fn node(&self, slot: usize) -> Option<&Node<K, V>> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Links a fresh node at the head of the list, returning its slot.
    pub(crate) fn insert_head(
        &mut self,
        key: K,
        value: V,
        expires_at_nanos: Option<i64>,
    ) -> usize {
        let node = Node {
            key,
            value,
            prev: None,
            next: self.head,
            valid: true,
            expires_at_nanos,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        if let Some(old_head) = self.head {
            self.slots[old_head]
                .as_mut()
                .expect("head slot must be occupied")
                .prev = Some(slot);
        } else {
            self.tail = Some(slot);
        }
        self.head = Some(slot);
        slot
    }

    /// Moves an already-linked slot to the head. No-op if it is already
    /// there, so promoting an entry that's already the most recent
    /// doesn't pay for list surgery it doesn't need.
    pub(crate) fn move_to_head(&mut self, slot: usize) {
        if self.head == Some(slot) {
            return;
        }
        self.unlink_from_list(slot);
        let node = self.slots[slot].as_mut().expect("slot must be occupied");
        node.prev = None;
        node.next = self.head;
        if let Some(old_head) = self.head {
            self.slots[old_head]
                .as_mut()
                .expect("head slot must be occupied")
                .prev = Some(slot);
        }
        self.head = Some(slot);
    }

    /// Splices a slot out of the recency list without freeing it.
    fn unlink_from_list(&mut self, slot: usize) {
        let (prev, next) = {
            let node = self.slots[slot].as_ref().expect("slot must be occupied");
            (node.prev, node.next)
        };
        match prev {
            Some(p) => {
                self.slots[p]
                    .as_mut()
                    .expect("prev slot must be occupied")
                    .next = next;
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                self.slots[n]
                    .as_mut()
                    .expect("next slot must be occupied")
                    .prev = prev;
            }
            None => self.tail = prev,
        }
    }

    /// Fully removes a slot: unlinks it from the list, marks it invalid
    /// and returns it to the free list. Panics if the slot is not
    /// currently occupied: a misaligned removal is a programming error,
    /// not a benign race, because every caller already holds the shard
    /// lock and derived the slot from data it owns exclusively.
    pub(crate) fn unlink(&mut self, slot: usize) -> Node<K, V> {
        self.unlink_from_list(slot);
        let mut node = self.slots[slot]
            .take()
            .unwrap_or_else(|| panic!("invariant violation: unlink of empty slot {slot}"));
        node.valid = false;
        node.prev = None;
        node.next = None;
        self.free.push(slot);
        node
    }

    /// Returns the key currently at the tail, if any, without removing it.
    pub(crate) fn tail_key(&self) -> Option<&K> {
        self.tail
            .map(|slot| &self.slots[slot].as_ref().expect("tail slot must be occupied").key)
    }

    pub(crate) fn tail_slot(&self) -> Option<usize> {
        self.tail
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }
}

pub(crate) struct Shard<K, V> {
    pub(crate) inner: parking_lot::Mutex<ShardInner<K, V>>,
}

impl<K, V> Shard<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            inner: parking_lot::Mutex::new(ShardInner::default()),
        }
    }
}

#[cfg(test)]
#[path = "shard_test.rs"]
mod shard_test;

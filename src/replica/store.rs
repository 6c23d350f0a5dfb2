use std::collections::BTreeMap;

/// RecordOp is a write with its key already resolved by the leader. This is what gets
/// replicated to followers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RecordOp {
    Create { key: u64, value: String },
    Modify { key: u64, value: String },
    Delete { key: u64 },
}

/// RecordStore is the board. On the leader it's authoritative and assigns keys. On a follower
/// it's a shadow copy, only touched by ops the leader propagated.
///
/// Keys only go up, so iterating in key order is also insertion order.
#[derive(Default)]
pub(crate) struct RecordStore {
    records: BTreeMap<u64, String>,
    next_key: u64,
}

impl RecordStore {
    pub(crate) fn new() -> Self {
        RecordStore::default()
    }

    /// Leader side: store `value` under the next key.
    pub(crate) fn create(&mut self, value: String) -> u64 {
        let key = self.next_key;
        self.next_key += 1;
        self.records.insert(key, value);
        key
    }

    /// Modifying a key that doesn't exist is a no-op, not an error. Returns whether anything
    /// changed.
    pub(crate) fn modify(&mut self, key: u64, value: String) -> bool {
        match self.records.get_mut(&key) {
            Some(existing) => {
                *existing = value;
                true
            }
            None => false,
        }
    }

    /// Deleting a key that doesn't exist is a no-op, not an error.
    pub(crate) fn delete(&mut self, key: u64) -> bool {
        self.records.remove(&key).is_some()
    }

    /// Follower side: apply an op exactly as the leader resolved it. No conflict detection.
    pub(crate) fn apply_replicated(&mut self, op: RecordOp) {
        match op {
            RecordOp::Create { key, value } => {
                self.records.insert(key, value);
                // In case failover promotes us, we must not hand out this key again.
                if key >= self.next_key {
                    self.next_key = key + 1;
                }
            }
            RecordOp::Modify { key, value } => {
                self.modify(key, value);
            }
            RecordOp::Delete { key } => {
                self.delete(key);
            }
        }
    }

    pub(crate) fn entries(&self) -> Vec<(u64, String)> {
        self.records.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    #[cfg(test)]
    pub(crate) fn next_key(&self) -> u64 {
        self.next_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_assigns_increasing_keys_from_zero() {
        let mut store = RecordStore::new();

        assert_eq!(store.create("a".into()), 0);
        assert_eq!(store.create("b".into()), 1);
        assert_eq!(store.create("c".into()), 2);
        assert_eq!(store.next_key(), 3);
    }

    #[test]
    fn keys_are_not_reused_after_delete() {
        let mut store = RecordStore::new();
        store.create("a".into());
        store.create("b".into());

        store.delete(1);

        assert_eq!(store.create("c".into()), 2);
        assert_eq!(store.entries(), vec![(0, "a".to_string()), (2, "c".to_string())]);
    }

    #[test]
    fn modify_absent_key_is_silent_noop() {
        let mut store = RecordStore::new();
        store.create("a".into());

        assert!(!store.modify(7, "x".into()));
        assert!(store.modify(0, "z".into()));
        assert_eq!(store.entries(), vec![(0, "z".to_string())]);
    }

    #[test]
    fn replicated_delete_twice_is_idempotent() {
        let mut store = RecordStore::new();
        store.apply_replicated(RecordOp::Create {
            key: 0,
            value: "hello".into(),
        });
        store.apply_replicated(RecordOp::Create {
            key: 1,
            value: "world".into(),
        });

        store.apply_replicated(RecordOp::Delete { key: 0 });
        let after_first = store.entries();
        store.apply_replicated(RecordOp::Delete { key: 0 });

        assert_eq!(store.entries(), after_first);
        assert_eq!(store.entries(), vec![(1, "world".to_string())]);
    }

    #[test]
    fn replicated_create_moves_next_key_past_it() {
        let mut store = RecordStore::new();
        store.apply_replicated(RecordOp::Create {
            key: 4,
            value: "late".into(),
        });

        // Promoted to leader: the next create must not collide.
        assert_eq!(store.create("mine".into()), 5);
    }

    #[test]
    fn replicated_create_out_of_order_keeps_key_order() {
        let mut store = RecordStore::new();
        store.apply_replicated(RecordOp::Create {
            key: 1,
            value: "second".into(),
        });
        store.apply_replicated(RecordOp::Create {
            key: 0,
            value: "first".into(),
        });

        assert_eq!(
            store.entries(),
            vec![(0, "first".to_string()), (1, "second".to_string())]
        );
        assert_eq!(store.next_key(), 2);
    }
}
